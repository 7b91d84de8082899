use dashstat::{fetch_stats, test_connection, ErrorKind, ProviderKind};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{blocking, config, to_json};

async fn mount_qbittorrent_data(server: &MockServer, cookie: Option<&str>) {
    let mut torrents = Mock::given(method("GET")).and(path("/api/v2/torrents/info"));
    let mut transfer = Mock::given(method("GET")).and(path("/api/v2/transfer/info"));
    if let Some(cookie) = cookie {
        torrents = torrents.and(header("cookie", cookie));
        transfer = transfer.and(header("cookie", cookie));
    }

    torrents
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"hash": "a", "name": "one", "state": "downloading"},
            {"hash": "b", "name": "two", "state": "uploading"},
            {"hash": "c", "name": "three", "state": "stalledUP"},
            {"hash": "d", "name": "four", "state": "pausedUP"}
        ])))
        .mount(server)
        .await;
    transfer
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dl_info_speed": 2048,
            "up_info_speed": 1024,
            "connection_status": "connected"
        })))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_qbittorrent_login_and_buckets() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .and(body_string_contains("username=admin"))
        .and(body_string_contains("password=adminadmin"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "SID=session42; HttpOnly; path=/")
                .set_body_string("Ok."),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_qbittorrent_data(&server, Some("SID=session42")).await;

    let cfg = config(&[
        ("serverUrl", server.uri().as_str()),
        ("username", "admin"),
        ("password", "adminadmin"),
    ]);
    let stats = blocking(move || fetch_stats(ProviderKind::QBittorrent, &cfg))
        .await
        .unwrap();
    let json = to_json(&stats);

    assert_eq!(json["downloadingTorrents"], 1);
    assert_eq!(json["seedingTorrents"], 1);
    assert_eq!(json["errorTorrents"], 1);
    assert_eq!(json["totalTorrents"], 4);
    assert_eq!(json["downloadSpeed"], 2048.0);
    assert_eq!(json["uploadSpeed"], 1024.0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_qbittorrent_without_credentials_skips_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Ok."))
        .expect(0)
        .mount(&server)
        .await;
    mount_qbittorrent_data(&server, None).await;

    let cfg = config(&[("serverUrl", server.uri().as_str()), ("username", "admin")]);
    let stats = blocking(move || fetch_stats(ProviderKind::QBittorrent, &cfg))
        .await
        .unwrap();

    assert_eq!(to_json(&stats)["totalTorrents"], 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_qbittorrent_login_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Fails."))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/torrents/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let raw = json!({"serverUrl": server.uri(), "username": "admin", "password": "nope"});
    let result = blocking(move || test_connection(ProviderKind::QBittorrent, &raw)).await;

    assert!(!result.success);
    assert_eq!(result.kind, Some(ErrorKind::Auth));
    assert!(result.detail.contains("failed to login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_transmission_session_handshake() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transmission/rpc"))
        .and(body_string_contains("session-get"))
        .and(basic_auth("transmission", "secret"))
        .respond_with(
            ResponseTemplate::new(409).insert_header("X-Transmission-Session-Id", "abc123"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/transmission/rpc"))
        .and(body_string_contains("torrent-get"))
        .and(header("X-Transmission-Session-Id", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "success",
            "arguments": {"torrents": [
                {"id": 1, "name": "a", "status": 4, "percentDone": 0.5, "rateDownload": 5000, "rateUpload": 100, "error": 0},
                {"id": 2, "name": "b", "status": 6, "percentDone": 1.0, "rateDownload": 0, "rateUpload": 700, "error": 0},
                {"id": 3, "name": "c", "status": 0, "percentDone": 0.1, "rateDownload": 0, "rateUpload": 0, "error": 2}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = config(&[
        ("serverUrl", server.uri().as_str()),
        ("username", "transmission"),
        ("password", "secret"),
    ]);
    let stats = blocking(move || fetch_stats(ProviderKind::Transmission, &cfg))
        .await
        .unwrap();
    let json = to_json(&stats);

    assert_eq!(json["downloadingTorrents"], 1);
    assert_eq!(json["seedingTorrents"], 1);
    assert_eq!(json["errorTorrents"], 1);
    assert_eq!(json["totalTorrents"], 3);
    assert_eq!(json["downloadSpeed"], 5000.0);
    assert_eq!(json["uploadSpeed"], 800.0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_transmission_custom_rpc_path_without_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_string_contains("session-get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "success"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_string_contains("torrent-get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "success",
            "arguments": {"torrents": []}
        })))
        .mount(&server)
        .await;

    let cfg = config(&[("serverUrl", server.uri().as_str()), ("rpcPath", "/rpc")]);
    let stats = blocking(move || fetch_stats(ProviderKind::Transmission, &cfg))
        .await
        .unwrap();

    assert_eq!(to_json(&stats)["totalTorrents"], 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_transmission_unauthorized_handshake() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transmission/rpc"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let cfg = config(&[("serverUrl", server.uri().as_str())]);
    let err = blocking(move || fetch_stats(ProviderKind::Transmission, &cfg))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_transmission_rpc_failure_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transmission/rpc"))
        .and(body_string_contains("session-get"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/transmission/rpc"))
        .and(body_string_contains("torrent-get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "method name not recognized",
            "arguments": {}
        })))
        .mount(&server)
        .await;

    let cfg = config(&[("serverUrl", server.uri().as_str())]);
    let err = blocking(move || fetch_stats(ProviderKind::Transmission, &cfg))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(err.to_string().contains("method name not recognized"));
}
