//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and drive the full
//! listing walk and item fetch cycle through the real HTTP client.

use pagewalk::config::{Config, CrawlerConfig, OutputConfig, SelectorConfig, UserAgentConfig};
use pagewalk::crawler::Coordinator;
use pagewalk::output::write_json_report;
use pagewalk::state::RequestKind;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the given listing URL
fn create_test_config(start_url: &str, max_listing_pages: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            start_url: start_url.to_string(),
            max_listing_pages,
            max_item_retries: 2,
            rate_limit_floor_secs: 10,
            rate_limit_padding_secs: 0, // Keep 429 tests fast
            request_timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        selectors: SelectorConfig::default(),
        output: OutputConfig::default(),
    }
}

/// One listing entry: (title, href, submitted, score)
type Entry<'a> = (&'a str, &'a str, &'a str, &'a str);

/// Renders a listing page in the default selector layout
fn listing_html(entries: &[Entry<'_>], next: Option<&str>) -> String {
    let mut html = String::from("<html><body><div id=\"siteTable\">\n");
    for (title, href, submitted, score) in entries {
        html.push_str(&format!(
            r#"<div class="thing">
              <div class="score unvoted">{score}</div>
              <div class="top-matter">
                <p class="title"><a class="title" href="{href}">{title}</a></p>
                <p class="tagline">submitted <time datetime="{submitted}">an hour ago</time></p>
              </div>
            </div>
"#
        ));
    }
    if let Some(next) = next {
        html.push_str(&format!(
            r#"<span class="next-button"><a href="{next}">next ›</a></span>"#
        ));
    }
    html.push_str("</div></body></html>");
    html
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_page_walk_pairs_metadata_with_responses() {
    let server = MockServer::start().await;
    let base = server.uri();

    let a = format!("{base}/items/a");
    let b = format!("{base}/items/b");
    let c = format!("{base}/items/c");
    let d = format!("{base}/items/d");
    let e = format!("{base}/items/e");

    mount_page(
        &server,
        "/listing",
        listing_html(
            &[
                ("Alpha", &a, "2024-05-01T10:00:00+00:00", "101"),
                ("Bravo", &b, "2024-05-01T09:00:00+00:00", "88"),
                ("Self post", "/r/test/comments/xyz", "2024-05-01T08:30:00+00:00", "12"),
                ("Charlie", &c, "2024-05-01T08:00:00+00:00", "7"),
            ],
            Some("/listing/2"),
        ),
    )
    .await;
    mount_page(
        &server,
        "/listing/2",
        listing_html(
            &[
                ("Delta", &d, "2024-04-30T23:00:00+00:00", "5"),
                ("Echo", &e, "2024-04-30T22:00:00+00:00", "3"),
            ],
            Some("/listing/3"),
        ),
    )
    .await;
    for (route, body) in [
        ("/items/a", "alpha body"),
        ("/items/b", "bravo body"),
        ("/items/c", "charlie body"),
        ("/items/d", "delta body"),
        ("/items/e", "echo body"),
    ] {
        mount_page(&server, route, body.to_string()).await;
    }

    let config = create_test_config(&format!("{base}/listing"), 2);
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let report = coordinator.run().await;

    assert_eq!(report.listing_requests, 2);
    assert_eq!(report.listing_pages_walked, 2);
    assert_eq!(report.items_dispatched, 5);
    assert!(report.dead_letters.is_empty());
    assert!(report.shape_mismatches.is_empty());

    let titles: Vec<&str> = report.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Bravo", "Charlie", "Delta", "Echo"]);

    let bravo = &report.articles[1];
    assert_eq!(bravo.url, b);
    assert_eq!(bravo.when_submitted, "2024-05-01T09:00:00+00:00");
    assert_eq!(bravo.score, "88");
    let response = bravo.response.as_ref().expect("Bravo should be resolved");
    assert_eq!(response.status_code, 200);
    assert_eq!(response.text(), "bravo body");

    // The third page was never requested
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/listing/3"));
}

#[tokio::test]
async fn test_rate_limited_listing_is_retried() {
    let server = MockServer::start().await;
    let base = server.uri();
    let item = format!("{base}/items/only");

    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/listing",
        listing_html(&[("Only", &item, "2024-05-02T00:00:00+00:00", "1")], None),
    )
    .await;
    mount_page(&server, "/items/only", "only body".to_string()).await;

    let config = create_test_config(&format!("{base}/listing"), 3);
    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(report.listing_requests, 2);
    assert_eq!(report.listing_pages_walked, 1);
    assert_eq!(report.articles.len(), 1);
    assert_eq!(report.articles[0].title, "Only");

    // No next link on the recovered page
    assert_eq!(report.shape_mismatches.len(), 1);
}

#[tokio::test]
async fn test_failing_item_becomes_dead_letter() {
    let server = MockServer::start().await;
    let base = server.uri();
    let good = format!("{base}/items/good");
    let gone = format!("{base}/items/gone");

    mount_page(
        &server,
        "/listing",
        listing_html(
            &[
                ("Good", &good, "2024-05-03T00:00:00+00:00", "9"),
                ("Gone", &gone, "2024-05-03T01:00:00+00:00", "4"),
            ],
            None,
        ),
    )
    .await;
    mount_page(&server, "/items/good", "good body".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/items/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{base}/listing"), 1);
    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(report.articles.len(), 1);
    assert_eq!(report.articles[0].title, "Good");
    assert_eq!(report.item_retries, 2);
    assert_eq!(report.dead_letters.len(), 1);

    let letter = &report.dead_letters[0];
    assert_eq!(letter.kind, RequestKind::Item);
    assert_eq!(letter.url, gone);
    assert_eq!(letter.title.as_deref(), Some("Gone"));
    assert_eq!(letter.attempts, 3);
}

#[tokio::test]
async fn test_listing_failure_at_cap_is_dead_lettered() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{base}/listing"), 2);
    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(report.listing_requests, 2);
    assert_eq!(report.listing_pages_walked, 0);
    assert!(report.articles.is_empty());
    assert_eq!(report.dead_letters.len(), 1);
    assert_eq!(report.dead_letters[0].kind, RequestKind::Listing);
}

#[tokio::test]
async fn test_requests_carry_configured_user_agent() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/listing"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[], None)))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&format!("{base}/listing"), 1);
    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(report.listing_pages_walked, 1);
    assert!(report.dead_letters.is_empty());
}

#[tokio::test]
async fn test_json_report_round_trips_through_disk() {
    let server = MockServer::start().await;
    let base = server.uri();
    let item = format!("{base}/items/x");

    mount_page(
        &server,
        "/listing",
        listing_html(&[("Xray", &item, "2024-05-04T00:00:00+00:00", "66")], None),
    )
    .await;
    mount_page(&server, "/items/x", "xray".to_string()).await;

    let config = create_test_config(&format!("{base}/listing"), 1);
    let report = Coordinator::new(&config).unwrap().run().await;

    let temp_dir = TempDir::new().unwrap();
    let json_path = temp_dir.path().join("report.json");
    write_json_report(&report, &json_path).expect("Failed to write report");

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["articles"][0]["title"], "Xray");
    assert_eq!(value["articles"][0]["score"], "66");
    assert_eq!(value["articles"][0]["status"], 200);
    assert_eq!(value["articles"][0]["content_length"], 4);
}
