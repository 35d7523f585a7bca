//! Integration tests for the content lifecycle across cycles: the 4-hour
//! active window for alerts and tickers, the gated deactivation sweeps, and
//! rolling article retention.
//!
//! Each test creates its own in-memory SQLite database and drives
//! `run_cycle` directly with explicit clock values, so cycle spacing is
//! exact rather than wall-clock dependent.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tidewire::newsroom::{run_cycle, ContentGateway, CycleOutcome, GatewayError};
use tidewire::storage::{Category, Database, NewArticle};

const RETENTION_HOURS: u64 = 72;

async fn test_db() -> Database {
    Database::open(":memory:").await.unwrap()
}

/// A fixed cycle time; tests add offsets to it.
fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 8, 0, 0).unwrap()
}

/// Start a mock completion endpoint serving `payload` and a gateway pointed
/// at it. The server must outlive the gateway, so both come back.
async fn gateway_serving(payload: &Value) -> (MockServer, ContentGateway) {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "message": { "content": payload.to_string() } }
            ]
        })))
        .mount(&mock)
        .await;
    let gateway =
        ContentGateway::new(&mock.uri(), SecretString::from("test-key"), "test-model").unwrap();
    (mock, gateway)
}

/// A complete payload whose text carries `tag`, so rows from different
/// cycles are tellable apart.
fn cycle_payload(tag: &str) -> Value {
    json!({
        "informational_pieces": [
            {
                "title": format!("{tag} harbor notes"),
                "excerpt": "Skiff traffic and moorage updates.",
                "content": "Harbormaster's office reports normal operations across all floats.",
                "category": "Maritime"
            },
            {
                "title": format!("{tag} trail report"),
                "excerpt": "Conditions from Deer Mountain.",
                "content": "The lower switchbacks are clear; snowline holds at about two thousand feet.",
                "category": "Recreation"
            }
        ],
        "advisory": { "message": format!("{tag} advisory"), "severity": "warning" },
        "tickers": [
            { "label": "HARBOR", "message": format!("{tag} harbor line") },
            { "label": "WEATHER", "message": format!("{tag} weather line") }
        ]
    })
}

fn single_article_payload(title: &str) -> Value {
    json!({
        "informational_pieces": [
            {
                "title": title,
                "excerpt": "Excerpt",
                "content": "Content",
                "category": "Local"
            }
        ],
        "tickers": []
    })
}

// ============================================================================
// Single Cycle
// ============================================================================

#[tokio::test]
async fn test_cycle_stores_every_section() {
    let db = test_db().await;
    let (_mock, gateway) = gateway_serving(&cycle_payload("first")).await;

    let outcome = run_cycle(&db, &gateway, RETENTION_HOURS, t0()).await.unwrap();
    assert_eq!(
        outcome,
        CycleOutcome { articles: 2, alerts: 1, tickers: 2, skipped: 0 }
    );

    assert_eq!(db.count_articles().await.unwrap(), 2);
    let alerts = db.active_alerts().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].message, "first advisory");
    assert_eq!(alerts[0].severity, "warning");
    assert_eq!(db.active_tickers().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_cycle_counts_every_discarded_item() {
    let db = test_db().await;
    let payload = json!({
        "informational_pieces": [
            {
                "title": "Eulachon Run Draws Sea Lions to the Narrows",
                "excerpt": "Early returns this spring.",
                "content": "Observers report heavy feeding activity near the river mouth.",
                "category": "Wildlife"
            },
            // Unknown category rejects the whole item
            { "title": "T", "excerpt": "E", "content": "C", "category": "Sports" }
        ],
        "advisory": { "message": "" },
        "tickers": [
            { "label": "HARBOR", "message": "Grid open by appointment" },
            { "label": "EVENTS", "message": "Museum talk Thursday evening" },
            { "label": "WEATHER", "message": "   " }
        ]
    });
    let (_mock, gateway) = gateway_serving(&payload).await;

    let outcome = run_cycle(&db, &gateway, RETENTION_HOURS, t0()).await.unwrap();
    assert_eq!(
        outcome,
        CycleOutcome { articles: 1, alerts: 0, tickers: 2, skipped: 3 }
    );
    assert_eq!(db.count_articles().await.unwrap(), 1);
    assert!(db.active_alerts().await.unwrap().is_empty());
}

// ============================================================================
// Deactivation Sweeps
// ============================================================================

#[tokio::test]
async fn test_next_cycle_retires_previous_alerts_and_tickers() {
    let db = test_db().await;

    let (_mock_a, gateway_a) = gateway_serving(&cycle_payload("first")).await;
    run_cycle(&db, &gateway_a, RETENTION_HOURS, t0()).await.unwrap();

    let (_mock_b, gateway_b) = gateway_serving(&cycle_payload("second")).await;
    run_cycle(&db, &gateway_b, RETENTION_HOURS, t0() + Duration::hours(5))
        .await
        .unwrap();

    // Old rows are deactivated, not deleted
    assert_eq!(db.count_alerts().await.unwrap(), 2);
    let alerts = db.active_alerts().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].message, "second advisory");

    assert_eq!(db.count_tickers().await.unwrap(), 4);
    let tickers = db.active_tickers().await.unwrap();
    assert_eq!(tickers.len(), 2);
    assert_eq!(tickers[0].message, "second harbor line");
    assert_eq!(tickers[1].message, "second weather line");

    // Articles are append-only; both cycles' pieces remain
    assert_eq!(db.count_articles().await.unwrap(), 4);
}

#[tokio::test]
async fn test_cycle_without_advisory_keeps_previous_alert_active() {
    let db = test_db().await;

    let (_mock_a, gateway_a) = gateway_serving(&cycle_payload("first")).await;
    run_cycle(&db, &gateway_a, RETENTION_HOURS, t0()).await.unwrap();

    // Next cycle brings tickers but no advisory
    let payload = json!({
        "informational_pieces": [],
        "tickers": [{ "label": "HARBOR", "message": "second harbor line" }]
    });
    let (_mock_b, gateway_b) = gateway_serving(&payload).await;
    let outcome = run_cycle(&db, &gateway_b, RETENTION_HOURS, t0() + Duration::hours(5))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        CycleOutcome { articles: 0, alerts: 0, tickers: 1, skipped: 0 }
    );

    // The stale alert outlives its window rather than leaving the site blank
    let alerts = db.active_alerts().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].message, "first advisory");

    // Tickers had a replacement, so their sweep ran
    let tickers = db.active_tickers().await.unwrap();
    assert_eq!(tickers.len(), 1);
    assert_eq!(tickers[0].message, "second harbor line");
}

#[tokio::test]
async fn test_all_invalid_tickers_keep_previous_crawl_active() {
    let db = test_db().await;

    let (_mock_a, gateway_a) = gateway_serving(&cycle_payload("first")).await;
    run_cycle(&db, &gateway_a, RETENTION_HOURS, t0()).await.unwrap();

    let payload = json!({
        "informational_pieces": [],
        "tickers": [
            { "label": "HARBOR", "message": "" },
            { "label": "", "message": "orphan line" }
        ]
    });
    let (_mock_b, gateway_b) = gateway_serving(&payload).await;
    let outcome = run_cycle(&db, &gateway_b, RETENTION_HOURS, t0() + Duration::hours(5))
        .await
        .unwrap();
    assert_eq!(outcome.tickers, 0);
    assert_eq!(outcome.skipped, 2);

    // No valid replacement arrived, so the first cycle's crawl stays up
    let tickers = db.active_tickers().await.unwrap();
    assert_eq!(tickers.len(), 2);
    assert_eq!(tickers[0].message, "first harbor line");
    assert_eq!(db.count_tickers().await.unwrap(), 2);
}

// ============================================================================
// Article Retention
// ============================================================================

#[tokio::test]
async fn test_articles_survive_until_retention_window_passes() {
    let db = test_db().await;

    let (_mock_a, gateway_a) = gateway_serving(&single_article_payload("Day one story")).await;
    run_cycle(&db, &gateway_a, RETENTION_HOURS, t0()).await.unwrap();

    // 70 hours in: still inside the 72-hour window
    let (_mock_b, gateway_b) = gateway_serving(&single_article_payload("Day four story")).await;
    run_cycle(&db, &gateway_b, RETENTION_HOURS, t0() + Duration::hours(70))
        .await
        .unwrap();
    assert_eq!(db.count_articles().await.unwrap(), 2);

    // 73 hours in: the first story ages out, the rest stay
    let (_mock_c, gateway_c) = gateway_serving(&single_article_payload("Day five story")).await;
    run_cycle(&db, &gateway_c, RETENTION_HOURS, t0() + Duration::hours(73))
        .await
        .unwrap();

    let titles: Vec<String> = db
        .recent_articles(10)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.title)
        .collect();
    assert_eq!(titles, vec!["Day five story", "Day four story"]);
}

#[tokio::test]
async fn test_oversized_retention_window_is_capped() {
    let db = test_db().await;
    let (_mock, gateway) = gateway_serving(&single_article_payload("Capped window story")).await;

    // A nonsense window from config must not reach the date math raw
    let outcome = run_cycle(&db, &gateway, u64::MAX, t0()).await.unwrap();

    assert_eq!(outcome.articles, 1);
    assert_eq!(db.count_articles().await.unwrap(), 1);
}

#[tokio::test]
async fn test_sweeps_never_touch_articles() {
    let db = test_db().await;
    let article = NewArticle {
        title: "Standing story".to_string(),
        excerpt: "Excerpt".to_string(),
        content: "Content".to_string(),
        category: Category::Community,
    };
    db.insert_article(&article, t0().timestamp()).await.unwrap();

    // A cycle with alerts and tickers but no articles runs its sweeps
    let payload = json!({
        "informational_pieces": [],
        "advisory": { "message": "Fresh advisory", "severity": "info" },
        "tickers": [{ "label": "WEATHER", "message": "Fresh weather line" }]
    });
    let (_mock, gateway) = gateway_serving(&payload).await;
    run_cycle(&db, &gateway, RETENTION_HOURS, t0() + Duration::hours(5))
        .await
        .unwrap();

    // Deactivation is an alert/ticker concept; the article is untouched
    assert_eq!(db.count_articles().await.unwrap(), 1);
}

// ============================================================================
// Gateway Failure
// ============================================================================

#[tokio::test]
async fn test_failed_generation_changes_nothing() {
    let db = test_db().await;

    let (_mock_a, gateway_a) = gateway_serving(&cycle_payload("first")).await;
    run_cycle(&db, &gateway_a, RETENTION_HOURS, t0()).await.unwrap();

    let failing_mock = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&failing_mock)
        .await;
    let failing_gateway = ContentGateway::new(
        &failing_mock.uri(),
        SecretString::from("test-key"),
        "test-model",
    )
    .unwrap();

    let result = run_cycle(&db, &failing_gateway, RETENTION_HOURS, t0() + Duration::hours(5)).await;
    assert!(matches!(result, Err(GatewayError::Upstream(500))));

    // No payload, no sweeps, no retention pass: the site is exactly as it was
    assert_eq!(db.count_articles().await.unwrap(), 2);
    let alerts = db.active_alerts().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].message, "first advisory");
    assert_eq!(db.active_tickers().await.unwrap().len(), 2);
}
