//! Trend extractor state machine
//!
//! Walks the listing page by page: enumerate rows, open each row's detail
//! panel, collect fields, close the panel, advance. The Renderer session
//! is owned exclusively for the whole walk; extraction must finish (or hit
//! the cap) before enrichment starts.

use crate::config::JobConfig;
use crate::extract::rows::{parse_source_and_time, parse_triple_cell};
use crate::extract::selectors;
use crate::model::{ArticleRef, SessionArtifacts, TrendStatus, TrendStub};
use crate::renderer::{ElementHandle, Renderer, RendererResult};
use std::time::Duration;

/// Settle delays between navigation steps
///
/// The listing re-renders asynchronously after every interaction; these
/// pauses match the upstream's observed settle times. Tests zero them.
#[derive(Debug, Clone)]
pub struct ExtractTiming {
    /// Wait for the listing container after the initial load
    pub page_load_wait: Duration,

    /// Pause after opening a row's detail panel
    pub modal_settle: Duration,

    /// Pause after expanding the query list
    pub expand_settle: Duration,

    /// Pause after closing the detail panel
    pub close_settle: Duration,

    /// Pause after switching pages or page size
    pub page_settle: Duration,
}

impl Default for ExtractTiming {
    fn default() -> Self {
        Self {
            page_load_wait: Duration::from_secs(20),
            modal_settle: Duration::from_secs(1),
            expand_settle: Duration::from_millis(500),
            close_settle: Duration::from_millis(500),
            page_settle: Duration::from_secs(3),
        }
    }
}

impl ExtractTiming {
    /// Zero delays, for driving a scripted renderer in tests
    pub fn immediate() -> Self {
        Self {
            page_load_wait: Duration::from_secs(1),
            modal_settle: Duration::ZERO,
            expand_settle: Duration::ZERO,
            close_settle: Duration::ZERO,
            page_settle: Duration::ZERO,
        }
    }
}

/// Stateful extractor over one Renderer session
pub struct TrendExtractor<'a, R: Renderer> {
    renderer: &'a mut R,
    job: &'a JobConfig,
    timing: ExtractTiming,
}

impl<'a, R: Renderer> TrendExtractor<'a, R> {
    pub fn new(renderer: &'a mut R, job: &'a JobConfig, timing: ExtractTiming) -> Self {
        Self {
            renderer,
            job,
            timing,
        }
    }

    /// Runs the full extraction walk
    ///
    /// Terminates when the configured item cap is reached (mid-page
    /// allowed), the next-page control is absent or disabled, or the
    /// listing container disappears. Only the initial load and the wait
    /// for the listing container can fail; everything after degrades.
    ///
    /// # Arguments
    ///
    /// * `listing_url` - Fully-formed listing URL
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<TrendStub>)` - Stubs in source row order, at most `max_items`
    /// * `Err(RendererError)` - The listing never rendered
    pub async fn run(&mut self, listing_url: &str) -> RendererResult<Vec<TrendStub>> {
        tracing::info!(url = listing_url, "loading trending listing");
        self.renderer.load(listing_url).await?;
        self.renderer
            .wait_for(selectors::TREND_TABLE_BODY, self.timing.page_load_wait)
            .await?;

        // One shared snapshot for the whole run, not per row
        let session = self.capture_session().await;

        self.expand_page_size().await;

        let mut stubs: Vec<TrendStub> = Vec::new();
        let mut page = 1usize;

        'pages: loop {
            let table = match self.renderer.find(selectors::TREND_TABLE_BODY).await {
                Ok(table) => table,
                Err(e) => {
                    tracing::warn!(page, error = %e, "listing container gone, stopping");
                    break;
                }
            };

            let rows = self
                .renderer
                .find_all_in(&table, selectors::TREND_ROW)
                .await
                .unwrap_or_default();
            if rows.is_empty() {
                tracing::info!(page, "no rows rendered, stopping");
                break;
            }
            tracing::debug!(page, rows = rows.len(), "enumerated rows");

            for row in &rows {
                if stubs.len() >= self.job.max_items {
                    tracing::info!(count = stubs.len(), "item cap reached");
                    break 'pages;
                }

                let position = stubs.len();
                match self.extract_row(row, position, &session).await {
                    Ok(stub) => {
                        tracing::info!(position, title = %stub.title, "extracted trend");
                        stubs.push(stub);
                    }
                    Err(e) => {
                        tracing::warn!(position, page, error = %e, "row navigation failed, skipping row");
                    }
                }
            }

            if !self.advance_page().await {
                break;
            }
            page += 1;
        }

        tracing::info!(count = stubs.len(), pages = page, "extraction complete");
        Ok(stubs)
    }

    /// Captures cookies and user agent from the live session
    ///
    /// Best-effort: a session without artifacts still extracts; enrichment
    /// just runs without replayed cookies.
    async fn capture_session(&mut self) -> SessionArtifacts {
        let cookies = match self.renderer.cookies().await {
            Ok(cookies) => cookies,
            Err(e) => {
                tracing::warn!(error = %e, "failed to capture cookies");
                Vec::new()
            }
        };
        let user_agent = match self.renderer.user_agent().await {
            Ok(user_agent) => user_agent,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read user agent");
                String::new()
            }
        };
        tracing::info!(cookie_count = cookies.len(), "captured session artifacts");
        SessionArtifacts {
            cookies,
            user_agent,
        }
    }

    /// Switches the page-size control to the maximum supported value
    ///
    /// Best-effort: the listing still paginates at the default size.
    async fn expand_page_size(&mut self) {
        let button = match self.renderer.find(selectors::PAGE_SIZE_BUTTON).await {
            Ok(button) => button,
            Err(e) => {
                tracing::warn!(error = %e, "page size control not found");
                return;
            }
        };
        if let Err(e) = self.renderer.click(&button).await {
            tracing::warn!(error = %e, "failed to open page size menu");
            return;
        }
        tokio::time::sleep(self.timing.expand_settle).await;

        let menu = match self.renderer.find(selectors::PAGE_SIZE_MENU).await {
            Ok(menu) => menu,
            Err(e) => {
                tracing::warn!(error = %e, "page size menu not found");
                return;
            }
        };
        let options = self
            .renderer
            .find_all_in(&menu, selectors::PAGE_SIZE_OPTION)
            .await
            .unwrap_or_default();

        for option in &options {
            let label = self.text_of(option).await;
            if label.contains(selectors::MAX_PAGE_SIZE_LABEL) {
                if let Err(e) = self.renderer.click(option).await {
                    tracing::warn!(error = %e, "failed to select page size");
                }
                tokio::time::sleep(self.timing.page_settle).await;
                return;
            }
        }
        tracing::warn!("no page size option matched {}", selectors::MAX_PAGE_SIZE_LABEL);
    }

    /// Extracts one row into a stub
    ///
    /// Row activation and panel location errors propagate (the row is
    /// skipped); every field read degrades independently.
    async fn extract_row(
        &mut self,
        row: &ElementHandle,
        position: usize,
        session: &SessionArtifacts,
    ) -> RendererResult<TrendStub> {
        // Positional cells first; they survive even if the panel misbehaves
        let cells = self
            .renderer
            .find_all_in(row, selectors::ROW_CELL)
            .await
            .unwrap_or_default();

        let (search_volume, search_volume_delta) = match cells.get(2) {
            Some(cell) => parse_triple_cell(&self.text_of(cell).await),
            None => (String::new(), String::new()),
        };
        let (started, status_text) = match cells.get(3) {
            Some(cell) => parse_triple_cell(&self.text_of(cell).await),
            None => (String::new(), String::new()),
        };

        // ModalOpen: activation and panel location are the row's only
        // hard requirements
        self.renderer.click(row).await?;
        tokio::time::sleep(self.timing.modal_settle).await;
        let modal = self.renderer.find(selectors::MODAL).await?;

        let title = match self.renderer.find_in(&modal, selectors::MODAL_TITLE).await {
            Ok(heading) => self.text_of(&heading).await,
            Err(_) => String::new(),
        };

        // The Explore deep-link is authoritative here; the last anchor wins
        if let Ok(links) = self.renderer.find_all_in(&modal, selectors::EXPLORE_LINK).await {
            if let Some(last) = links.last() {
                if let Ok(Some(href)) = self.renderer.attribute(last, "href").await {
                    tracing::debug!(position, explore_url = %href, "explore deep-link");
                }
            }
        }

        // QueriesExpanded
        if let Ok(expand) = self.renderer.find(selectors::QUERY_EXPAND).await {
            if self.renderer.click(&expand).await.is_ok() {
                tokio::time::sleep(self.timing.expand_settle).await;
            }
        }

        let mut queries = Vec::new();
        for query in self
            .renderer
            .find_all(selectors::QUERY_ITEM)
            .await
            .unwrap_or_default()
        {
            let text = self.text_of(&query).await;
            if !text.is_empty() {
                queries.push(text);
            }
        }

        let articles = self.extract_articles().await;

        // ModalClosed: best-effort, never blocks the next row
        match self.renderer.find_in(&modal, selectors::MODAL_CLOSE).await {
            Ok(close) => {
                if let Err(e) = self.renderer.click(&close).await {
                    tracing::warn!(position, error = %e, "failed to close detail panel");
                }
            }
            Err(e) => {
                tracing::warn!(position, error = %e, "close control not found");
            }
        }
        tokio::time::sleep(self.timing.close_settle).await;

        Ok(TrendStub {
            position,
            title,
            search_volume,
            search_volume_delta,
            started,
            status: TrendStatus::parse(&status_text),
            queries,
            articles,
            session: session.clone(),
        })
    }

    /// Collects article entries from the open detail panel
    async fn extract_articles(&mut self) -> Vec<ArticleRef> {
        let anchors = self
            .renderer
            .find_all(selectors::ARTICLE_LINK)
            .await
            .unwrap_or_default();

        let mut articles = Vec::with_capacity(anchors.len());
        for anchor in &anchors {
            let url = match self.renderer.attribute(anchor, "href").await {
                Ok(Some(href)) => href,
                _ => String::new(),
            };
            let image_url = match self.renderer.find_in(anchor, selectors::ARTICLE_IMAGE).await {
                Ok(image) => match self.renderer.attribute(&image, "src").await {
                    Ok(Some(src)) => src,
                    _ => String::new(),
                },
                Err(_) => String::new(),
            };
            let title = match self.renderer.find_in(anchor, selectors::ARTICLE_TITLE).await {
                Ok(block) => self.text_of(&block).await,
                Err(_) => String::new(),
            };
            let (source, published_at) = match self
                .renderer
                .find_in(anchor, selectors::ARTICLE_SOURCE_TIME)
                .await
            {
                Ok(block) => parse_source_and_time(&self.text_of(&block).await),
                Err(_) => (String::new(), String::new()),
            };

            articles.push(ArticleRef {
                title,
                url,
                image_url,
                source,
                published_at,
            });
        }
        articles
    }

    /// Activates the next-page control
    ///
    /// Returns false when the control is absent, reports disabled, or the
    /// click fails - all of which end the walk.
    async fn advance_page(&mut self) -> bool {
        let next = match self.renderer.find(selectors::NEXT_PAGE).await {
            Ok(next) => next,
            Err(_) => {
                tracing::info!("next-page control absent, stopping");
                return false;
            }
        };

        if let Ok(Some(_)) = self.renderer.attribute(&next, "disabled").await {
            tracing::info!("next-page control disabled, stopping");
            return false;
        }

        if let Err(e) = self.renderer.click(&next).await {
            tracing::warn!(error = %e, "failed to activate next page");
            return false;
        }
        tokio::time::sleep(self.timing.page_settle).await;
        true
    }

    /// Reads an element's text, degrading to empty on failure
    async fn text_of(&mut self, element: &ElementHandle) -> String {
        self.renderer
            .text(element)
            .await
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    }
}

// The extractor's behavior is exercised end-to-end against a scripted
// renderer in tests/integration/extract_tests.rs
