/// API integration tests
///
/// Drives the full router (upload, list, latest, by-date, metadata, clear)
/// against the in-memory price store.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use goldprice_api::app::create_app;
use goldprice_api::state::AppState;
use goldprice_api::store::MemoryPriceStore;

const BOUNDARY: &str = "goldprice-test-boundary";

const PRICES_CSV: &str = "\
Gold Prices (USD/oz),,
Day,Date,Price
Wed,24-Dec-25,2600.00
Thu,12/25/2025,2625.75
Fri,2025-12-26,2650.50
";

fn test_app() -> Router {
    let state = AppState::new(Arc::new(MemoryPriceStore::new()));
    create_app(state, 1024 * 1024)
}

fn upload_request(filename: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: text/csv\r\n\r\n{c}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = filename,
        c = content,
    );

    Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_upload_then_read_back_by_either_date_form() {
    let app = test_app();

    let (status, body) = send(&app, upload_request("prices.csv", PRICES_CSV)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["records_processed"], 3);
    assert_eq!(body["filename"], "prices.csv");
    assert_eq!(body["message"], "Successfully processed 3 records (new or updated)");

    let (status, body) = send(&app, get("/api/prices/2025-12-26")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "26-Dec-25");
    assert_eq!(body["prices"]["24K"], 85);
    assert_eq!(body["prices"]["22K"], 78);
    assert_eq!(body["prices"]["18K"], 64);
    assert_eq!(body["price_per_ounce"], 2650.5);

    let (status, body) = send(&app, get("/api/prices/24-Dec-25")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "24-Dec-25");
}

#[tokio::test]
async fn test_reupload_reports_up_to_date() {
    let app = test_app();

    send(&app, upload_request("prices.csv", PRICES_CSV)).await;
    let (status, body) = send(&app, upload_request("prices.csv", PRICES_CSV)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["records_processed"], 0);
    assert_eq!(
        body["message"],
        "No new or updated records found. All data is already up to date."
    );
}

#[tokio::test]
async fn test_changed_price_updates_single_record() {
    let app = test_app();
    send(&app, upload_request("prices.csv", PRICES_CSV)).await;

    let changed = PRICES_CSV.replace("2650.50", "2700.00");
    let (_, body) = send(&app, upload_request("prices-v2.csv", &changed)).await;
    assert_eq!(body["records_processed"], 1);

    let (_, body) = send(&app, get("/api/prices/2025-12-26")).await;
    assert_eq!(body["price_per_ounce"], 2700.0);
    assert_eq!(body["prices"]["24K"], 87);

    let (_, body) = send(&app, get("/api/metadata")).await;
    assert_eq!(body["metadata"]["filename"], "prices-v2.csv");
    assert_eq!(body["metadata"]["total_records"], 1);
}

#[tokio::test]
async fn test_upload_validation_errors() {
    let app = test_app();

    let (status, body) = send(&app, upload_request("prices.csv", "a,b,c\nd,e,f\n")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("at least 3 lines"));

    let (status, body) = send(&app, upload_request("prices.txt", PRICES_CSV)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "File must be a CSV");

    let bad_rows = "header,,\nDay,Date,Price\nx,someday,2600\n";
    let (status, body) = send(&app, upload_request("prices.csv", bad_rows)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no valid data rows found in CSV");
}

#[tokio::test]
async fn test_list_prices_with_and_without_carat() {
    let app = test_app();
    send(&app, upload_request("prices.csv", PRICES_CSV)).await;

    let (status, body) = send(&app, get("/api/prices")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 9);
    assert_eq!(body["data"][0]["date"], "26-Dec-25");
    assert_eq!(body["data"][0]["carat"], "24K");
    assert_eq!(body["data"][1]["carat"], "22K");

    let (_, body) = send(&app, get("/api/prices?carat=22k&limit=2")).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["carat"], "22K");
    assert_eq!(body["data"][0]["price_lkr"], 78);
    assert_eq!(body["data"][1]["date"], "25-Dec-25");

    let (_, body) = send(&app, get("/api/prices?carat=14K")).await;
    assert_eq!(body["count"], 0);

    let (_, body) = send(&app, get("/api/prices?limit=abc")).await;
    assert_eq!(body["count"], 9);
}

#[tokio::test]
async fn test_latest_metadata_and_clear() {
    let app = test_app();

    let (status, body) = send(&app, get("/api/prices/latest")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No data available");

    let (_, body) = send(&app, get("/api/metadata")).await;
    assert_eq!(body["metadata"]["message"], "No uploads yet");

    send(&app, upload_request("prices.csv", PRICES_CSV)).await;

    let (_, body) = send(&app, get("/api/prices/latest")).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["date"], "26-Dec-25");
    assert_eq!(body["prices"]["18K"]["price_lkr"], 64);
    assert_eq!(body["prices"]["18K"]["carat"], "18K");

    let (_, body) = send(&app, get("/api/metadata")).await;
    assert_eq!(body["metadata"]["total_records"], 3);

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/prices/clear")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deleted 3 records");

    let (status, _) = send(&app, get("/api/prices/2025-12-26")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_and_invalid_dates() {
    let app = test_app();

    let (status, body) = send(&app, get("/api/prices/2030-01-01")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No data found for date: 2030-01-01");

    let (status, _) = send(&app, get("/api/prices/not-a-date")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_lists_endpoints() {
    let app = test_app();

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
    assert_eq!(body["endpoints"]["upload"], "/api/upload (POST)");

    let (status, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected_with_413() {
    let state = AppState::new(Arc::new(MemoryPriceStore::new()));
    let app = create_app(state, 256);

    let mut csv = String::from(PRICES_CSV);
    for day in 1..=28 {
        csv.push_str(&format!("x,2025-11-{:02},2600.00\n", day));
    }

    let (status, body) = send(&app, upload_request("prices.csv", &csv)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, get("/api/prices/2025-11-01")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_short_year_rows_are_not_stored() {
    let app = test_app();

    let csv = format!("{}Sat,12/27/25,2660.00\n", PRICES_CSV);
    let (_, body) = send(&app, upload_request("prices.csv", &csv)).await;
    assert_eq!(body["records_processed"], 3);

    let (status, _) = send(&app, get("/api/prices/0025-12-27")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, get("/api/prices/27-Dec-25")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
