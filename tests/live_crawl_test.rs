use kodegen_tools_rendercrawl::{CrawlSession, ExtractMode, crawl_urls};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test]
#[ignore] // Requires browser installation
async fn test_live_session_crawl() {
    init_tracing();
    let mut session = CrawlSession::new().await.unwrap();
    session.set_url_rewriter(|url: &str| {
        if url.starts_with("https://www.reddit.com/") {
            url.replacen("www.reddit.com", "old.reddit.com", 1)
        } else {
            url.to_string()
        }
    });

    let report = session
        .crawl_urls(&["https://github.com/meinside"], ExtractMode::Text)
        .await
        .unwrap();
    session.close().await.unwrap();

    assert!(report.is_complete(), "failures: {:?}", report.failures);
    assert!(!report.get("https://github.com/meinside").unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires browser installation
async fn test_live_one_shot_crawl_html() {
    init_tracing();
    let report = crawl_urls(Some("RenderCrawlTest/1.0"), &["https://example.com/"], ExtractMode::Html)
        .await
        .unwrap();

    let html = report.get("https://example.com/").unwrap();
    assert!(html.contains("Example Domain"));
    assert!(!html.contains("<script"));
}
