//! Transmission JSON-RPC.
//!
//! The RPC endpoint answers the first request of a session with 409 and an
//! `X-Transmission-Session-Id` header that must be echoed on every later call,
//! so a `session-get` handshake always precedes `torrent-get`.

use std::time::Duration;

use reqwest::blocking::RequestBuilder;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{CanonicalStats, Provider, ProviderKind, TorrentStats};
use crate::core::provider_config::ProviderConfig;
use crate::core::transport::{check_status, decode_json, is_auth_status, new_client, HttpClient};
use crate::error::{Result, StatsError};

const TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RPC_PATH: &str = "/transmission/rpc";
const SESSION_HEADER: &str = "X-Transmission-Session-Id";

const TORRENT_FIELDS: &[&str] = &[
    "id",
    "name",
    "status",
    "percentDone",
    "rateDownload",
    "rateUpload",
    "error",
];

const STATUS_DOWNLOADING: i64 = 4;
const STATUS_SEED_WAIT: i64 = 5;
const STATUS_SEEDING: i64 = 6;

pub struct TransmissionProvider;

#[derive(Debug, Clone)]
struct TransmissionSettings {
    rpc_url: String,
    credentials: Option<(String, String)>,
}

impl TransmissionSettings {
    fn from_config(config: &ProviderConfig) -> Result<Self> {
        let server_url = config.server_url("serverUrl")?;
        let rpc_path = config.optional_str("rpcPath").unwrap_or(DEFAULT_RPC_PATH);
        let rpc_url = if rpc_path.starts_with('/') {
            format!("{}{}", server_url, rpc_path)
        } else {
            format!("{}/{}", server_url, rpc_path)
        };

        let credentials = match (config.optional_str("username"), config.optional_str("password")) {
            (Some(user), Some(pass)) => Some((user.to_string(), pass.to_string())),
            _ => None,
        };

        Ok(Self {
            rpc_url,
            credentials,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: String,
    #[serde(default)]
    arguments: TorrentGetArguments,
}

#[derive(Debug, Default, Deserialize)]
struct TorrentGetArguments {
    #[serde(default)]
    torrents: Vec<Torrent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Torrent {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    rate_download: f64,
    #[serde(default)]
    rate_upload: f64,
    #[serde(default)]
    error: i64,
}

fn summarize(torrents: &[Torrent]) -> TorrentStats {
    let mut stats = TorrentStats {
        total_torrents: torrents.len() as u64,
        ..Default::default()
    };

    for torrent in torrents {
        stats.download_speed += torrent.rate_download;
        stats.upload_speed += torrent.rate_upload;

        if torrent.error != 0 {
            stats.error_torrents += 1;
        }
        match torrent.status {
            STATUS_DOWNLOADING => stats.downloading_torrents += 1,
            STATUS_SEED_WAIT | STATUS_SEEDING => stats.seeding_torrents += 1,
            _ => {}
        }
    }

    stats
}

impl TransmissionProvider {
    fn rpc(
        client: &HttpClient,
        settings: &TransmissionSettings,
        body: &Value,
        session_id: Option<&str>,
    ) -> RequestBuilder {
        let mut request = client.post(&settings.rpc_url).json(body);
        if let Some((user, pass)) = &settings.credentials {
            request = request.basic_auth(user, Some(pass));
        }
        if let Some(id) = session_id {
            request = request.header(SESSION_HEADER, id);
        }
        request
    }

    /// Session id to echo, or `None` when the server does not require one
    fn session_id(client: &HttpClient, settings: &TransmissionSettings) -> Result<Option<String>> {
        let body = json!({"method": "session-get", "arguments": {"fields": ["version"]}});
        let response = client.send(Self::rpc(client, settings, &body, None))?;
        let status = response.status();

        if status == StatusCode::CONFLICT {
            return response
                .headers()
                .get(SESSION_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(|v| Some(v.to_string()))
                .ok_or_else(|| StatsError::protocol("409 without a session id"));
        }
        if status == StatusCode::OK {
            return Ok(None);
        }
        if is_auth_status(status) {
            return Err(StatsError::auth(format!("HTTP {}", status.as_u16())));
        }
        Err(StatsError::protocol(format!(
            "unexpected response status: {}",
            status.as_u16()
        )))
    }

    fn fetch(settings: &TransmissionSettings) -> Result<TorrentStats> {
        let client = new_client(TIMEOUT, true)?;

        let session_id =
            Self::session_id(&client, settings).map_err(|e| e.during("failed to get session ID"))?;

        let body = json!({"method": "torrent-get", "arguments": {"fields": TORRENT_FIELDS}});
        let response = client
            .send(Self::rpc(&client, settings, &body, session_id.as_deref()))
            .and_then(check_status)
            .and_then(decode_json::<RpcResponse>)
            .map_err(|e| e.during("failed to get torrents"))?;

        if response.result != "success" {
            return Err(StatsError::protocol(format!(
                "failed to get torrents: RPC error: {}",
                response.result
            )));
        }

        Ok(summarize(&response.arguments.torrents))
    }
}

impl Provider for TransmissionProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Transmission
    }

    fn validate(&self, config: &ProviderConfig) -> Result<()> {
        TransmissionSettings::from_config(config).map(|_| ())
    }

    fn fetch_stats(&self, config: &ProviderConfig) -> Result<CanonicalStats> {
        let settings = TransmissionSettings::from_config(config)?;
        Self::fetch(&settings).map(CanonicalStats::Torrent)
    }
}
