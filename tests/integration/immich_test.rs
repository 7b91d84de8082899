use dashstat::{fetch_stats, test_connection, ErrorKind, ProviderKind};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{blocking, config, to_json};

async fn mount_core(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/server/statistics"))
        .and(header("x-api-key", "immich-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "photos": 1200,
            "videos": 80,
            "usage": 5368709120u64,
            "usageByUser": [
                {"userId": "u1", "userName": "alice", "photos": 1000, "videos": 50, "usage": 4294967296u64},
                {"userId": "u2", "userName": "bob", "photos": 200, "videos": 30, "usage": 1073741824u64}
            ]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/server/storage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "diskAvailable": "1.5 TiB",
            "diskSize": "2.0 TiB",
            "diskUse": "512.0 GiB",
            "diskUsagePercentage": 25.0,
            "diskAvailableRaw": 1649267441664u64
        })))
        .mount(server)
        .await;
}

fn immich_config(server: &MockServer) -> dashstat::ProviderConfig {
    config(&[("serverUrl", server.uri().as_str()), ("apiKey", "immich-key")])
}

#[tokio::test(flavor = "multi_thread")]
async fn test_immich_stats_with_alerts() {
    let server = MockServer::start().await;
    mount_core(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/server/about"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "v1.118.0"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "n1"}, {"id": "n2"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/server/version-check"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"releaseVersion": "v1.119.1"})),
        )
        .mount(&server)
        .await;

    let cfg = immich_config(&server);
    let stats = blocking(move || fetch_stats(ProviderKind::Immich, &cfg))
        .await
        .unwrap();
    let json = to_json(&stats);

    assert_eq!(json["serverStats"]["photos"], 1200);
    assert_eq!(json["serverStats"]["usageByUser"][1]["userName"], "bob");
    assert_eq!(json["storage"]["diskSize"], "2.0 TiB");
    assert_eq!(json["storage"]["diskUsagePercentage"], 25.0);
    assert_eq!(json["users"], 2);
    assert_eq!(
        json["alerts"],
        json!([
            {"message": "You have 2 unread notifications", "level": "warning"},
            {
                "message": "A new Immich version v1.119.1 is available! You are running version v1.118.0.",
                "level": "warning"
            }
        ])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_immich_optional_endpoints_degrade() {
    let server = MockServer::start().await;
    mount_core(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/server/about"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/server/version-check"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"releaseVersion": "v9.9.9"})),
        )
        .mount(&server)
        .await;

    let cfg = immich_config(&server);
    let stats = blocking(move || fetch_stats(ProviderKind::Immich, &cfg))
        .await
        .unwrap();

    assert_eq!(to_json(&stats)["alerts"], json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_immich_storage_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/server/statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"photos": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/server/storage"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let cfg = immich_config(&server);
    let err = blocking(move || fetch_stats(ProviderKind::Immich, &cfg))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(err.to_string().contains("failed to fetch storage"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_immich_connection_test_rejected_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let raw = json!({"serverUrl": server.uri(), "apiKey": "wrong"});
    let result = blocking(move || test_connection(ProviderKind::Immich, &raw)).await;

    assert!(!result.success);
    assert_eq!(result.kind, Some(ErrorKind::Auth));
}
