//! Scripted renderer double
//!
//! Emulates the listing DOM the extractor navigates: a paginated table,
//! per-row detail panels, query lists, and articles. Element handles are
//! small coordinate strings (e.g. "row:0:3", "cell:0:3:2") resolved
//! against the fixture data.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use trendlens::extract::selectors;
use trendlens::renderer::{ElementHandle, Renderer, RendererError, RendererResult};

/// One fixture article
#[derive(Debug, Clone)]
pub struct FakeArticle {
    pub title: String,
    pub url: String,
    pub image_url: String,
    /// Rendered "time ● source" block
    pub source_time: String,
}

impl FakeArticle {
    pub fn new(title: &str, url: &str, image_url: &str, source_time: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            image_url: image_url.to_string(),
            source_time: source_time.to_string(),
        }
    }
}

/// One fixture listing row
#[derive(Debug, Clone)]
pub struct FakeRow {
    pub title: String,
    /// Rendered volume cell text; None removes the cell entirely
    pub volume_cell: Option<String>,
    /// Rendered timing cell text; None removes the cell entirely
    pub started_cell: Option<String>,
    pub queries: Vec<String>,
    pub articles: Vec<FakeArticle>,
    /// Row shows a "show more queries" control hiding all but two queries
    pub has_more_queries: bool,
    /// Row activation fails (navigation failure; the row gets skipped)
    pub activation_fails: bool,
}

impl FakeRow {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            volume_cell: Some("100K+\narrow_upward\n1,000%".to_string()),
            started_cell: Some("3 hours ago\ntrending_up\nActive".to_string()),
            queries: vec![format!("{} query", title)],
            articles: vec![],
            has_more_queries: false,
            activation_fails: false,
        }
    }

    pub fn without_volume_cell(mut self) -> Self {
        self.volume_cell = None;
        self.started_cell = None;
        self
    }

    pub fn with_queries(mut self, queries: &[&str]) -> Self {
        self.queries = queries.iter().map(|q| q.to_string()).collect();
        self
    }

    pub fn with_more_queries_control(mut self) -> Self {
        self.has_more_queries = true;
        self
    }

    pub fn with_articles(mut self, articles: Vec<FakeArticle>) -> Self {
        self.articles = articles;
        self
    }

    pub fn failing_activation(mut self) -> Self {
        self.activation_fails = true;
        self
    }
}

/// Scripted renderer over a fixture listing
pub struct FakeRenderer {
    pages: Vec<Vec<FakeRow>>,
    cookies: Vec<(String, String)>,
    user_agent: String,

    current_page: usize,
    open_row: Option<usize>,
    queries_expanded: bool,
    menu_open: bool,

    pub loaded_url: Option<String>,
    pub next_clicks: usize,
    pub quit_called: bool,
    pub selected_page_size: Option<String>,
}

impl FakeRenderer {
    pub fn new(pages: Vec<Vec<FakeRow>>) -> Self {
        Self {
            pages,
            cookies: vec![("NID".to_string(), "fixture-cookie".to_string())],
            user_agent: "FixtureAgent/1.0".to_string(),
            current_page: 0,
            open_row: None,
            queries_expanded: false,
            menu_open: false,
            loaded_url: None,
            next_clicks: 0,
            quit_called: false,
            selected_page_size: None,
        }
    }

    /// Builds a listing of `pages` pages with `rows_per_page` rows each,
    /// titled "trend {page}-{row}"
    pub fn with_grid(pages: usize, rows_per_page: usize) -> Self {
        let pages = (0..pages)
            .map(|p| {
                (0..rows_per_page)
                    .map(|r| FakeRow::new(&format!("trend {}-{}", p, r)))
                    .collect()
            })
            .collect();
        Self::new(pages)
    }

    fn rows(&self) -> &[FakeRow] {
        self.pages.get(self.current_page).map(Vec::as_slice).unwrap_or(&[])
    }

    fn open_row_data(&self) -> Option<&FakeRow> {
        self.open_row.and_then(|index| self.rows().get(index))
    }

    fn visible_queries(&self) -> Vec<String> {
        match self.open_row_data() {
            Some(row) => {
                if row.has_more_queries && !self.queries_expanded {
                    row.queries.iter().take(2).cloned().collect()
                } else {
                    row.queries.clone()
                }
            }
            None => Vec::new(),
        }
    }

    fn on_last_page(&self) -> bool {
        self.current_page + 1 >= self.pages.len()
    }

    fn not_found(selector: &str) -> RendererError {
        RendererError::ElementNotFound {
            selector: selector.to_string(),
        }
    }

    fn coord(handle: &ElementHandle, index: usize) -> usize {
        handle
            .0
            .split(':')
            .nth(index)
            .and_then(|part| part.parse().ok())
            .unwrap_or(0)
    }
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn load(&mut self, url: &str) -> RendererResult<()> {
        self.loaded_url = Some(url.to_string());
        Ok(())
    }

    async fn find(&mut self, selector: &str) -> RendererResult<ElementHandle> {
        match selector {
            selectors::TREND_TABLE_BODY => {
                if self.pages.is_empty() {
                    Err(Self::not_found(selector))
                } else {
                    Ok(ElementHandle("table".to_string()))
                }
            }
            selectors::MODAL => match self.open_row {
                Some(_) => Ok(ElementHandle("modal".to_string())),
                None => Err(Self::not_found(selector)),
            },
            selectors::QUERY_EXPAND => match self.open_row_data() {
                Some(row) if row.has_more_queries && !self.queries_expanded => {
                    Ok(ElementHandle("expand".to_string()))
                }
                _ => Err(Self::not_found(selector)),
            },
            selectors::PAGE_SIZE_BUTTON => Ok(ElementHandle("pagesize-button".to_string())),
            selectors::PAGE_SIZE_MENU => {
                if self.menu_open {
                    Ok(ElementHandle("pagesize-menu".to_string()))
                } else {
                    Err(Self::not_found(selector))
                }
            }
            selectors::NEXT_PAGE => {
                if self.pages.len() > 1 {
                    Ok(ElementHandle("next".to_string()))
                } else {
                    // Single-page listings render no pagination controls
                    Err(Self::not_found(selector))
                }
            }
            other => Err(Self::not_found(other)),
        }
    }

    async fn find_all(&mut self, selector: &str) -> RendererResult<Vec<ElementHandle>> {
        match selector {
            selectors::QUERY_ITEM => Ok((0..self.visible_queries().len())
                .map(|i| ElementHandle(format!("query:{}", i)))
                .collect()),
            selectors::ARTICLE_LINK => {
                let count = self.open_row_data().map(|row| row.articles.len()).unwrap_or(0);
                Ok((0..count)
                    .map(|i| ElementHandle(format!("article:{}", i)))
                    .collect())
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn find_in(
        &mut self,
        parent: &ElementHandle,
        selector: &str,
    ) -> RendererResult<ElementHandle> {
        match (parent.0.as_str(), selector) {
            ("modal", selectors::MODAL_TITLE) => Ok(ElementHandle("modal-title".to_string())),
            ("modal", selectors::MODAL_CLOSE) => Ok(ElementHandle("close".to_string())),
            (article, selectors::ARTICLE_IMAGE) if article.starts_with("article:") => {
                let index = Self::coord(parent, 1);
                match self.open_row_data().and_then(|row| row.articles.get(index)) {
                    Some(a) if !a.image_url.is_empty() => {
                        Ok(ElementHandle(format!("article-img:{}", index)))
                    }
                    _ => Err(Self::not_found(selector)),
                }
            }
            (article, selectors::ARTICLE_TITLE) if article.starts_with("article:") => {
                Ok(ElementHandle(format!("article-title:{}", Self::coord(parent, 1))))
            }
            (article, selectors::ARTICLE_SOURCE_TIME) if article.starts_with("article:") => {
                Ok(ElementHandle(format!("article-st:{}", Self::coord(parent, 1))))
            }
            _ => Err(Self::not_found(selector)),
        }
    }

    async fn find_all_in(
        &mut self,
        parent: &ElementHandle,
        selector: &str,
    ) -> RendererResult<Vec<ElementHandle>> {
        match (parent.0.as_str(), selector) {
            ("table", selectors::TREND_ROW) => {
                let page = self.current_page;
                Ok((0..self.rows().len())
                    .map(|i| ElementHandle(format!("row:{}:{}", page, i)))
                    .collect())
            }
            (row, selectors::ROW_CELL) if row.starts_with("row:") => {
                let page = Self::coord(parent, 1);
                let index = Self::coord(parent, 2);
                let row = match self.pages.get(page).and_then(|rows| rows.get(index)) {
                    Some(row) => row,
                    None => return Ok(Vec::new()),
                };

                // Two leading generic cells, then volume and timing
                let mut cells = vec![
                    ElementHandle(format!("cell:{}:{}:0", page, index)),
                    ElementHandle(format!("cell:{}:{}:1", page, index)),
                ];
                if row.volume_cell.is_some() {
                    cells.push(ElementHandle(format!("cell:{}:{}:2", page, index)));
                    if row.started_cell.is_some() {
                        cells.push(ElementHandle(format!("cell:{}:{}:3", page, index)));
                    }
                }
                Ok(cells)
            }
            ("modal", selectors::EXPLORE_LINK) => {
                Ok(vec![ElementHandle("explore".to_string())])
            }
            ("pagesize-menu", selectors::PAGE_SIZE_OPTION) => Ok((0..3)
                .map(|i| ElementHandle(format!("pagesize-opt:{}", i)))
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    async fn click(&mut self, element: &ElementHandle) -> RendererResult<()> {
        let id = element.0.clone();
        if id.starts_with("row:") {
            let index = Self::coord(element, 2);
            if let Some(row) = self.rows().get(index) {
                if row.activation_fails {
                    return Err(RendererError::Command("row activation failed".to_string()));
                }
            }
            self.open_row = Some(index);
            self.queries_expanded = false;
            return Ok(());
        }
        match id.as_str() {
            "close" => {
                self.open_row = None;
            }
            "next" => {
                self.next_clicks += 1;
                if !self.on_last_page() {
                    self.current_page += 1;
                }
            }
            "expand" => {
                self.queries_expanded = true;
            }
            "pagesize-button" => {
                self.menu_open = true;
            }
            other if other.starts_with("pagesize-opt:") => {
                let index = Self::coord(element, 1);
                self.selected_page_size = ["10", "25", "50"].get(index).map(|s| s.to_string());
                self.menu_open = false;
            }
            _ => {}
        }
        Ok(())
    }

    async fn text(&mut self, element: &ElementHandle) -> RendererResult<String> {
        let id = element.0.as_str();
        if id.starts_with("cell:") {
            let page = Self::coord(element, 1);
            let row_index = Self::coord(element, 2);
            let cell = Self::coord(element, 3);
            let row = self
                .pages
                .get(page)
                .and_then(|rows| rows.get(row_index))
                .ok_or_else(|| RendererError::Command("stale cell".to_string()))?;
            let text = match cell {
                2 => row.volume_cell.clone().unwrap_or_default(),
                3 => row.started_cell.clone().unwrap_or_default(),
                _ => String::new(),
            };
            return Ok(text);
        }
        if id.starts_with("query:") {
            let index = Self::coord(element, 1);
            return Ok(self.visible_queries().get(index).cloned().unwrap_or_default());
        }
        if id.starts_with("article-title:") {
            let index = Self::coord(element, 1);
            return Ok(self
                .open_row_data()
                .and_then(|row| row.articles.get(index))
                .map(|a| a.title.clone())
                .unwrap_or_default());
        }
        if id.starts_with("article-st:") {
            let index = Self::coord(element, 1);
            return Ok(self
                .open_row_data()
                .and_then(|row| row.articles.get(index))
                .map(|a| a.source_time.clone())
                .unwrap_or_default());
        }
        if id.starts_with("pagesize-opt:") {
            let index = Self::coord(element, 1);
            return Ok(["10", "25", "50"].get(index).unwrap_or(&"").to_string());
        }
        match id {
            "modal-title" => Ok(self
                .open_row_data()
                .map(|row| row.title.clone())
                .unwrap_or_default()),
            _ => Ok(String::new()),
        }
    }

    async fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> RendererResult<Option<String>> {
        let id = element.0.as_str();
        match (id, name) {
            ("next", "disabled") => {
                if self.on_last_page() {
                    Ok(Some("true".to_string()))
                } else {
                    Ok(None)
                }
            }
            ("explore", "href") => {
                let title = self
                    .open_row_data()
                    .map(|row| row.title.clone())
                    .unwrap_or_default();
                Ok(Some(format!("https://trends.example/explore?q={}", title)))
            }
            (article, "href") if article.starts_with("article:") => {
                let index = Self::coord(element, 1);
                Ok(self
                    .open_row_data()
                    .and_then(|row| row.articles.get(index))
                    .map(|a| a.url.clone()))
            }
            (image, "src") if image.starts_with("article-img:") => {
                let index = Self::coord(element, 1);
                Ok(self
                    .open_row_data()
                    .and_then(|row| row.articles.get(index))
                    .map(|a| a.image_url.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn execute_script(&mut self, _script: &str) -> RendererResult<Value> {
        Ok(Value::Null)
    }

    async fn cookies(&mut self) -> RendererResult<Vec<(String, String)>> {
        Ok(self.cookies.clone())
    }

    async fn user_agent(&mut self) -> RendererResult<String> {
        Ok(self.user_agent.clone())
    }

    async fn wait_for(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> RendererResult<ElementHandle> {
        match self.find(selector).await {
            Ok(element) => Ok(element),
            Err(_) => Err(RendererError::WaitTimeout {
                selector: selector.to_string(),
                seconds: timeout.as_secs(),
            }),
        }
    }

    async fn quit(&mut self) -> RendererResult<()> {
        self.quit_called = true;
        Ok(())
    }
}
