use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::RateSource;
use engine::{AnchorResolver, HttpRateSource, RatesCache};

async fn rates_server(body: serde_json::Value, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

fn usd_table() -> serde_json::Value {
    json!({
        "base": "USD",
        "date": "2024-05-01",
        "rates": { "USD": 1.0, "EUR": 0.8, "JPY": 150.0, "CHF": 0.9, "AUD": 1.5 }
    })
}

#[tokio::test]
async fn resolves_cross_rate_from_endpoint() {
    let server = rates_server(usd_table(), 1).await;
    let source = HttpRateSource::new(format!("{}/v4/latest/USD", server.uri()), None).unwrap();
    let resolver = AnchorResolver::new(Arc::new(source));

    let price = resolver.resolve("EURJPY_OTC").await;
    assert!((price - 187.5).abs() < 1e-9);
}

#[tokio::test]
async fn second_lookup_within_ttl_hits_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    // The mock panics on drop if called more than once
    let server = rates_server(usd_table(), 1).await;
    let url = format!("{}/v4/latest/USD", server.uri());

    let source = HttpRateSource::new(url.clone(), Some(RatesCache::new(dir.path()))).unwrap();
    let first = source.usd_rates().await.unwrap();
    assert!(dir.path().join("REAL_MARKET_RATES.json").exists());

    // A fresh client sharing the same cache directory
    let source = HttpRateSource::new(url, Some(RatesCache::new(dir.path()))).unwrap();
    let second = source.usd_rates().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn server_error_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = HttpRateSource::new(format!("{}/v4/latest/USD", server.uri()), None).unwrap();
    assert!(source.usd_rates().await.is_err());

    let resolver = AnchorResolver::new(Arc::new(source));
    assert_eq!(resolver.resolve("USDJPY_OTC").await, 145.50);
    assert_eq!(resolver.resolve("AUDCAD_OTC").await, 1.08);
}

#[tokio::test]
async fn non_usd_table_is_rejected() {
    let body = json!({ "base": "EUR", "rates": { "USD": 1.25 } });
    let server = rates_server(body, 1).await;
    let source = HttpRateSource::new(format!("{}/v4/latest/USD", server.uri()), None).unwrap();
    assert!(source.usd_rates().await.is_err());
}

#[tokio::test]
async fn unreachable_endpoint_falls_back() {
    // Nothing listens on port 9 locally
    let source = HttpRateSource::new("http://127.0.0.1:9/v4/latest/USD", None).unwrap();
    let resolver = AnchorResolver::new(Arc::new(source));
    assert_eq!(resolver.resolve("EURUSD_OTC").await, 1.08);
}
