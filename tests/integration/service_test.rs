use std::path::Path;

use dashstat::core::SystemSource;
use dashstat::{ErrorKind, ProviderKind, SqliteStore, StatsService, WidgetStore};
use rusqlite::{params, Connection};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{blocking, to_json};

const SCHEMA: &str = "
    CREATE TABLE widgets (
        id INTEGER PRIMARY KEY,
        type TEXT NOT NULL,
        config,
        deleted_at TEXT
    );
    CREATE TABLE dashboards (
        id INTEGER PRIMARY KEY,
        name TEXT,
        glances_config,
        deleted_at TEXT
    );
";

fn create_db(dir: &TempDir, radarr_url: &str, glances_config: Option<&str>) -> std::path::PathBuf {
    let db_path = dir.path().join("dashboard.db");
    let conn = Connection::open(&db_path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();

    let radarr = json!({"serverUrl": radarr_url, "apiKey": "radarr-key"}).to_string();
    conn.execute(
        "INSERT INTO widgets (id, type, config) VALUES (?1, ?2, ?3)",
        params![1, "radarr", radarr],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO widgets (id, type, config, deleted_at) VALUES (?1, ?2, ?3, ?4)",
        params![2, "sonarr", "{}", "2024-01-01T00:00:00Z"],
    )
    .unwrap();
    let adguard = json!({
        "serverUrl": "http://adguard.lan",
        "username": "admin",
        "password": "hunter2",
        "display": {"title": "DNS", "accessToken": "t"}
    });
    conn.execute(
        "INSERT INTO widgets (id, type, config) VALUES (?1, ?2, ?3)",
        params![3, "adguard-home", adguard.to_string().into_bytes()],
    )
    .unwrap();

    conn.execute(
        "INSERT INTO dashboards (id, name, glances_config, deleted_at) VALUES (?1, ?2, ?3, ?4)",
        params![1, "old", r#"{"url": "http://127.0.0.1:1"}"#, "2024-01-01T00:00:00Z"],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO dashboards (id, name, glances_config) VALUES (?1, ?2, ?3)",
        params![2, "home", glances_config],
    )
    .unwrap();

    db_path
}

fn open(path: &Path) -> SqliteStore {
    SqliteStore::open(path).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_widget_stats_from_database() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/movie"))
        .and(header("x-api-key", "radarr-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "hasFile": true},
            {"id": 2, "hasFile": false, "monitored": true}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/diskspace"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"path": "/movies", "label": "", "freeSpace": 100, "totalSpace": 1000}
        ])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = create_db(&dir, &server.uri(), None);

    let stats = blocking(move || {
        StatsService::new(open(&db_path)).fetch_widget_stats(1, Some(ProviderKind::Radarr))
    })
    .await
    .unwrap();
    let json = to_json(&stats);

    assert_eq!(json["totalMovies"], 2);
    assert_eq!(json["downloadedMovies"], 1);
    assert_eq!(json["missingMovies"], 1);
    assert_eq!(json["totalStorage"], 1000);
}

#[test]
fn test_soft_deleted_widget_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = create_db(&dir, "http://radarr.lan", None);
    let store = open(&db_path);

    assert!(store.widget_by_id(2).unwrap().is_none());
    let err = StatsService::new(store).fetch_widget_stats(2, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_wrong_widget_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = create_db(&dir, "http://127.0.0.1:1", None);

    let err = StatsService::new(open(&db_path))
        .fetch_widget_stats(1, Some(ProviderKind::Sonarr))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("Widget is not a Sonarr widget"));
}

#[test]
fn test_widget_config_from_blob_is_redacted() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = create_db(&dir, "http://radarr.lan", None);

    let config = StatsService::new(open(&db_path)).widget_config(3).unwrap();

    assert_eq!(
        serde_json::Value::Object(config),
        json!({
            "serverUrl": "http://adguard.lan",
            "username": "admin",
            "display": {"title": "DNS"}
        })
    );
}

#[test]
fn test_metrics_config_skips_deleted_dashboards() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = create_db(&dir, "http://radarr.lan", Some(r#"{"url": "http://glances.lan:61208"}"#));

    let config = open(&db_path).first_dashboard_metrics_config().unwrap().unwrap();
    assert_eq!(config.optional_str("url"), Some("http://glances.lan:61208"));
}

#[test]
fn test_blank_metrics_config_means_local() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = create_db(&dir, "http://radarr.lan", Some("  "));
    let store = open(&db_path);

    assert!(store.first_dashboard_metrics_config().unwrap().is_none());
    let report = StatsService::new(store).system_stats();
    assert_eq!(report.source, SystemSource::Local);
}
