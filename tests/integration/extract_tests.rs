//! Extractor tests against the scripted renderer

use crate::fake_renderer::{FakeArticle, FakeRenderer, FakeRow};
use trendlens::config::{JobConfig, SortOrder, StatusFilter};
use trendlens::extract::{ExtractTiming, TrendExtractor};
use trendlens::TrendStatus;

fn create_test_job(max_items: usize) -> JobConfig {
    JobConfig {
        geography: "US".to_string(),
        language: "en-US".to_string(),
        sort_order: SortOrder::SearchVolume,
        status_filter: StatusFilter::Active,
        max_items,
        verbose: false,
    }
}

async fn run_extraction(renderer: &mut FakeRenderer, max_items: usize) -> Vec<trendlens::TrendStub> {
    let job = create_test_job(max_items);
    let mut extractor = TrendExtractor::new(renderer, &job, ExtractTiming::immediate());
    extractor
        .run("https://trends.example/trending?geo=US")
        .await
        .expect("extraction failed")
}

#[tokio::test]
async fn test_item_cap_stops_mid_page() {
    // 3 pages x 25 rows with a cap of 10: exactly 10 stubs, and page 1
    // is never left
    let mut renderer = FakeRenderer::with_grid(3, 25);
    let stubs = run_extraction(&mut renderer, 10).await;

    assert_eq!(stubs.len(), 10);
    assert_eq!(renderer.next_clicks, 0, "should stop before paginating");
    assert_eq!(
        renderer.loaded_url.as_deref(),
        Some("https://trends.example/trending?geo=US")
    );

    let positions: Vec<usize> = stubs.iter().map(|s| s.position).collect();
    assert_eq!(positions, (0..10).collect::<Vec<_>>());
    assert_eq!(stubs[9].title, "trend 0-9");
}

#[tokio::test]
async fn test_walks_all_pages_until_disabled() {
    let mut renderer = FakeRenderer::with_grid(2, 3);
    let stubs = run_extraction(&mut renderer, 100).await;

    assert_eq!(stubs.len(), 6);
    assert_eq!(renderer.next_clicks, 1, "one advance, then disabled");
    assert_eq!(stubs[3].title, "trend 1-0");
    assert_eq!(stubs[5].position, 5);
}

#[tokio::test]
async fn test_missing_volume_cell_degrades_to_empty() {
    let rows = vec![
        FakeRow::new("alpha"),
        FakeRow::new("beta").without_volume_cell(),
        FakeRow::new("gamma"),
    ];
    let mut renderer = FakeRenderer::new(vec![rows]);
    let stubs = run_extraction(&mut renderer, 25).await;

    // The broken row still appears and does not block its successors
    assert_eq!(stubs.len(), 3);
    assert_eq!(stubs[1].title, "beta");
    assert_eq!(stubs[1].search_volume, "");
    assert_eq!(stubs[1].search_volume_delta, "");
    assert_eq!(stubs[2].title, "gamma");
    assert_eq!(stubs[2].search_volume, "100K+");
}

#[tokio::test]
async fn test_row_activation_failure_skips_only_that_row() {
    let rows = vec![
        FakeRow::new("first"),
        FakeRow::new("broken").failing_activation(),
        FakeRow::new("third"),
    ];
    let mut renderer = FakeRenderer::new(vec![rows]);
    let stubs = run_extraction(&mut renderer, 25).await;

    assert_eq!(stubs.len(), 2);
    let titles: Vec<&str> = stubs.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "third"]);
    // Positions stay dense; identity is emit order
    assert_eq!(stubs[1].position, 1);
}

#[tokio::test]
async fn test_expands_hidden_queries() {
    let rows = vec![FakeRow::new("expandable")
        .with_queries(&["q1", "q2", "q3", "q4", "q5"])
        .with_more_queries_control()];
    let mut renderer = FakeRenderer::new(vec![rows]);
    let stubs = run_extraction(&mut renderer, 25).await;

    assert_eq!(stubs[0].queries, vec!["q1", "q2", "q3", "q4", "q5"]);
}

#[tokio::test]
async fn test_article_fields_mapped_and_degraded() {
    let articles = vec![
        FakeArticle::new(
            "Big Story",
            "https://news.example/big",
            "https://img.example/big.png",
            "2 hours ago ● Example News",
        ),
        // No image, no separator in the source/time block
        FakeArticle::new("Plain Story", "https://news.example/plain", "", "recently"),
    ];
    let rows = vec![FakeRow::new("newsy").with_articles(articles)];
    let mut renderer = FakeRenderer::new(vec![rows]);
    let stubs = run_extraction(&mut renderer, 25).await;

    let articles = &stubs[0].articles;
    assert_eq!(articles.len(), 2);

    assert_eq!(articles[0].title, "Big Story");
    assert_eq!(articles[0].url, "https://news.example/big");
    assert_eq!(articles[0].image_url, "https://img.example/big.png");
    assert_eq!(articles[0].source, "Example News");
    assert_eq!(articles[0].published_at, "2 hours ago");

    assert_eq!(articles[1].image_url, "");
    assert_eq!(articles[1].source, "");
    assert_eq!(articles[1].published_at, "");
}

#[tokio::test]
async fn test_session_captured_once_and_shared() {
    let mut renderer = FakeRenderer::with_grid(1, 3);
    let stubs = run_extraction(&mut renderer, 25).await;

    for stub in &stubs {
        assert_eq!(
            stub.session.cookies,
            vec![("NID".to_string(), "fixture-cookie".to_string())]
        );
        assert_eq!(stub.session.user_agent, "FixtureAgent/1.0");
    }
}

#[tokio::test]
async fn test_status_and_timing_parsed_from_cells() {
    let mut renderer = FakeRenderer::with_grid(1, 1);
    let stubs = run_extraction(&mut renderer, 25).await;

    assert_eq!(stubs[0].status, TrendStatus::Active);
    assert_eq!(stubs[0].started, "3 hours ago");
    assert_eq!(stubs[0].search_volume, "100K+");
    assert_eq!(stubs[0].search_volume_delta, "1,000%");
}

#[tokio::test]
async fn test_page_size_expanded_to_maximum() {
    let mut renderer = FakeRenderer::with_grid(1, 2);
    run_extraction(&mut renderer, 25).await;

    assert_eq!(renderer.selected_page_size.as_deref(), Some("50"));
}

#[tokio::test]
async fn test_empty_listing_fails_the_wait() {
    let mut renderer = FakeRenderer::new(vec![]);
    let job = create_test_job(10);
    let mut extractor = TrendExtractor::new(&mut renderer, &job, ExtractTiming::immediate());

    let result = extractor.run("https://trends.example/trending").await;
    assert!(result.is_err(), "listing never rendered");
}
