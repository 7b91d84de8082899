use dashstat::{fetch_stats, test_connection, ErrorKind, ProviderConfig, ProviderKind};
use serde_json::json;
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{blocking, config};

/// One key short of a valid configuration for each provider
fn incomplete_config(kind: ProviderKind, base: &str) -> (ProviderConfig, &'static str) {
    match kind {
        ProviderKind::AdGuardHome => (
            config(&[("serverUrl", base), ("username", "admin")]),
            "password is required",
        ),
        ProviderKind::Radarr
        | ProviderKind::Sonarr
        | ProviderKind::Lidarr
        | ProviderKind::Prowlarr
        | ProviderKind::Immich => (config(&[("serverUrl", base)]), "apiKey is required"),
        ProviderKind::QBittorrent | ProviderKind::Transmission => (
            config(&[("username", "admin"), ("password", "pw")]),
            "serverUrl is required",
        ),
        ProviderKind::Glances => (config(&[("serverUrl", base)]), "url is required"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_keys_never_reach_the_network() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let base = server.uri();

    for kind in ProviderKind::ALL {
        let (cfg, message) = incomplete_config(kind, &base);
        let raw = serde_json::Value::Object(cfg.as_map().clone());

        let (fetched, tested) = blocking(move || {
            (fetch_stats(kind, &cfg), test_connection(kind, &raw))
        })
        .await;

        let err = fetched.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{}", kind);
        assert!(err.to_string().contains(message), "{}: {}", kind, err);

        assert!(!tested.success, "{}", kind);
        assert_eq!(tested.kind, Some(ErrorKind::Validation), "{}", kind);
        assert!(tested.detail.contains(message), "{}: {}", kind, tested.detail);
    }
}

#[test]
fn test_malformed_server_url() {
    let raw = json!({"serverUrl": "ftp://radarr.lan", "apiKey": "k"});
    let result = test_connection(ProviderKind::Radarr, &raw);

    assert!(!result.success);
    assert_eq!(result.kind, Some(ErrorKind::Validation));
    assert!(result.detail.contains("serverUrl is invalid"));
}

#[test]
fn test_unreachable_host_is_a_connection_error() {
    let cfg = config(&[("serverUrl", "http://127.0.0.1:1"), ("apiKey", "k")]);
    let err = fetch_stats(ProviderKind::Prowlarr, &cfg).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Connection);
}
