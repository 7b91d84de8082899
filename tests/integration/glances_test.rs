use dashstat::core::SystemSource;
use dashstat::{fetch_stats, test_connection, MemoryStore, ProviderKind, StatsService};
use serde_json::{json, Value};
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{blocking, config, to_json};

fn glances_document() -> Value {
    json!({
        "cpu": {"total": 12.5},
        "mem": {"used": 4294967296u64, "total": 17179869184u64, "percent": 25.0},
        "uptime": 266400,
        "load": {"min1": 0.42, "min5": 0.3, "min15": 0.2},
        "processcount": {"running": 3, "total": 210},
        "sensors": [
            {"label": "acpitz 1", "value": 30.0},
            {"label": "Core 0", "value": 47.0}
        ]
    })
}

async fn mount_all(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/4/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(glances_document()))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_glances_fetch() {
    let server = MockServer::start().await;
    mount_all(&server).await;

    let cfg = config(&[("url", server.uri().as_str())]);
    let stats = blocking(move || fetch_stats(ProviderKind::Glances, &cfg))
        .await
        .unwrap();
    let json = to_json(&stats);

    assert_eq!(json["cpu"]["usage"], 12.5);
    assert_eq!(json["cpu"]["temperature"], 47.0);
    assert_eq!(json["memory"]["used"], 4.0);
    assert_eq!(json["memory"]["total"], 16.0);
    assert_eq!(json["memory"]["percentage"], 25.0);
    assert_eq!(json["uptime"]["days"], 3);
    assert_eq!(json["loadAverage"], 0.42);
    assert_eq!(json["processes"], 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_glances_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/4/all"))
        .and(basic_auth("glances", "pw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(glances_document()))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = config(&[
        ("url", server.uri().as_str()),
        ("username", "glances"),
        ("password", "pw"),
    ]);
    let result = blocking(move || fetch_stats(ProviderKind::Glances, &cfg)).await;

    assert!(result.is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_glances_probe_does_not_decode_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/4/all"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let raw = json!({"url": server.uri()});
    let result = blocking(move || test_connection(ProviderKind::Glances, &raw)).await;

    assert!(result.success, "{}", result.detail);
    assert_eq!(result.detail, "Successfully connected to Glances");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_system_stats_prefer_configured_agent() {
    let server = MockServer::start().await;
    mount_all(&server).await;

    let store = MemoryStore::new().with_metrics_config(config(&[("url", server.uri().as_str())]));
    let report = blocking(move || StatsService::new(store).system_stats()).await;

    assert!(report.success);
    assert_eq!(report.source, SystemSource::Glances);
    assert_eq!(report.data.cpu.usage, 12.5);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_system_stats_fall_back_when_agent_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/4/all"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = MemoryStore::new().with_metrics_config(config(&[("url", server.uri().as_str())]));
    let report = blocking(move || StatsService::new(store).system_stats()).await;

    assert!(report.success);
    assert_eq!(report.source, SystemSource::Local);
    assert!(report.data.memory.total > 0.0);
}
