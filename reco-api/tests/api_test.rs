use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use flate2::write::GzEncoder;
use flate2::Compression;
use reco_api::{app, AppState};
use reco_core::FallbackGeoResolver;
use reco_store::GeoDatabase;
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

const CITIES: &str = "\
city_code,country_code,latitude,longitude
PAR,FR,48.8566,2.3522
NCE,FR,43.7102,7.2620
NYC,US,40.7128,-74.0060
";

fn rates_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("reco-api-{}-{}", std::process::id(), name));
    std::fs::write(&path, content).unwrap();
    path
}

fn test_app(rates_path: PathBuf) -> Router {
    let geo = GeoDatabase::from_reader(CITIES.as_bytes()).expect("Failed to load cities");
    app(AppState {
        geo: Arc::new(geo),
        rates_path,
        max_body_bytes: 1024 * 1024,
    })
}

fn line(search_id: &str, destination: &str, currency: &str, price: &str) -> String {
    format!(
        "1.0^{search_id}^FR^2024-03-01^10:15:00^PAR^{destination}^2024-04-10^2024-04-20^ADT=2,CHD=1^\
         {currency}^{price}^20.00^5.00^1^CDG^2024-04-10^0930^JFK^2024-04-10^1200^AF^AF^006^Y"
    )
}

async fn post(app: Router, uri: &str, body: Vec<u8>) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::post(uri).body(Body::from(body)).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_gzip_stream_produces_searches() {
    let rates = rates_file("gzip.csv", "Date, USD\n26 March 2024, 1.25\n");
    let text = [
        line("100", "NYC", "USD", "100.00"),
        line("100", "NYC", "USD", "150.00"),
        line("100", "NYC", "USD", "200.00"),
        "not a record".to_string(),
        line("200", "NCE", "EUR", "80.00"),
        line("200", "NCE", "EUR", "90.00"),
    ]
    .join("\n");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();

    let (status, body) = post(test_app(rates.clone()), "/v1/searches", encoder.finish().unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skipped"], 1);
    assert_eq!(body["failed"], 0);

    let searches = body["searches"].as_array().unwrap();
    assert_eq!(searches.len(), 2);

    let first = &searches[0];
    assert_eq!(first["search_id"], "100");
    assert_eq!(first["recos"].as_array().unwrap().len(), 3);
    assert_eq!(first["recos"][0]["price"], 80.0);
    assert_eq!(first["recos"][0]["flights"][0]["dep_airport"], "CDG");
    assert_eq!(first["advance_purchase"], 40);
    assert_eq!(first["stay_duration"], 10);
    assert_eq!(first["trip_type"], "RT");
    assert_eq!(first["geo"], "I");
    assert_eq!(first["OnD"], "PAR-NYC");
    assert_eq!(first["OnD_distance"], 5837);
    assert_eq!(first["passengers"][1]["passenger_type"], "CHD");
    assert_eq!(first["passengers"][1]["passenger_nb"], 1);
    assert!(first.get("passengers_string").is_none());

    let second = &searches[1];
    assert_eq!(second["search_id"], "200");
    assert_eq!(second["recos"].as_array().unwrap().len(), 2);
    assert_eq!(second["geo"], "D");
    assert_eq!(second["recos"][1]["price"], 90.0);

    std::fs::remove_file(rates).unwrap();
}

#[tokio::test]
async fn test_concatenated_gzip_members_are_all_read() {
    let rates = rates_file("members.csv", "Date, USD\n26 March 2024, 1.25\n");
    let mut body = Vec::new();
    for search_id in ["1", "2"] {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all((line(search_id, "NCE", "EUR", "10") + "\n").as_bytes()).unwrap();
        body.extend(encoder.finish().unwrap());
    }

    let (status, body) = post(test_app(rates.clone()), "/v1/searches", body).await;

    assert_eq!(status, StatusCode::OK);
    let searches = body["searches"].as_array().unwrap();
    assert_eq!(searches.len(), 2);
    assert_eq!(searches[1]["search_id"], "2");
    std::fs::remove_file(rates).unwrap();
}

#[tokio::test]
async fn test_empty_stream_is_empty_batch() {
    let rates = rates_file("empty.csv", "Date, USD\n26 March 2024, 1.25\n");
    let (status, body) = post(test_app(rates.clone()), "/v1/searches", Vec::new()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["searches"].as_array().unwrap().len(), 0);
    std::fs::remove_file(rates).unwrap();
}

#[tokio::test]
async fn test_missing_rates_file_is_reported() {
    let app = test_app(PathBuf::from("/nonexistent/rates.csv"));
    let body = line("1", "NYC", "EUR", "1").into_bytes();
    let (status, body) = post(app, "/v1/searches", body).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Rate snapshot unavailable");
}

#[tokio::test]
async fn test_corrupt_gzip_is_bad_request() {
    let rates = rates_file("corrupt.csv", "Date, USD\n26 March 2024, 1.25\n");
    let body = vec![0x1f, 0x8b, 0x00, 0x01, 0x02];
    let (status, body) = post(test_app(rates.clone()), "/v1/searches", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Unreadable record stream"));
    std::fs::remove_file(rates).unwrap();
}

#[tokio::test]
async fn test_single_reco_event() {
    let app = app(AppState {
        geo: Arc::new(FallbackGeoResolver::default()),
        rates_path: PathBuf::from("/nonexistent/rates.csv"),
        max_body_bytes: 1024,
    });

    let (status, body) = post(app.clone(), "/v1/recos", line("42", "NYC", "EUR", "10").into_bytes()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["search_id"], "42");
    assert_eq!(body["nb_of_flights"], 1);
    assert_eq!(body["flights"][0]["arr_airport"], "JFK");

    let (status, body) = post(app, "/v1/recos", b"garbage".to_vec()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Degenerate line: fewer than 2 fields");
}
