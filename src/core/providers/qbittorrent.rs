//! qBittorrent Web API.
//!
//! Login is cookie based: a successful `auth/login` answers `Ok.` and sets a
//! `SID` cookie that is replayed on the following requests. Without both a
//! username and password the login step is skipped, which works when the Web
//! UI whitelists the dashboard host.

use std::time::Duration;

use reqwest::header::{COOKIE, SET_COOKIE};
use serde::Deserialize;

use super::{CanonicalStats, Provider, ProviderKind, TorrentStats};
use crate::core::provider_config::ProviderConfig;
use crate::core::transport::{check_status, new_client, HttpClient};
use crate::error::{Result, StatsError};

const TIMEOUT: Duration = Duration::from_secs(30);

const DOWNLOADING_STATES: &[&str] = &[
    "downloading",
    "queuedDL",
    "allocating",
    "metaDL",
    "pausedDL",
    "forcedDL",
];
const SEEDING_STATES: &[&str] = &["uploading", "queuedUP", "forcedUP"];
const ERROR_STATES: &[&str] = &["error", "missingFiles", "stalledDL", "stalledUP"];

pub struct QBittorrentProvider;

#[derive(Debug, Clone)]
struct QBittorrentSettings {
    server_url: String,
    credentials: Option<(String, String)>,
}

impl QBittorrentSettings {
    fn from_config(config: &ProviderConfig) -> Result<Self> {
        let credentials = match (config.optional_str("username"), config.optional_str("password")) {
            (Some(user), Some(pass)) => Some((user.to_string(), pass.to_string())),
            _ => None,
        };
        Ok(Self {
            server_url: config.server_url("serverUrl")?,
            credentials,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Torrent {
    #[serde(default)]
    state: String,
}

#[derive(Debug, Default, Deserialize)]
struct TransferInfo {
    #[serde(default)]
    dl_info_speed: f64,
    #[serde(default)]
    up_info_speed: f64,
}

/// Bucket torrents by their `state` string; unknown states only count toward the total
fn bucket_torrents(torrents: &[Torrent], transfer: &TransferInfo) -> TorrentStats {
    let mut stats = TorrentStats {
        total_torrents: torrents.len() as u64,
        download_speed: transfer.dl_info_speed,
        upload_speed: transfer.up_info_speed,
        ..Default::default()
    };

    for torrent in torrents {
        let state = torrent.state.as_str();
        if DOWNLOADING_STATES.contains(&state) {
            stats.downloading_torrents += 1;
        } else if SEEDING_STATES.contains(&state) {
            stats.seeding_torrents += 1;
        } else if ERROR_STATES.contains(&state) {
            stats.error_torrents += 1;
        }
    }

    stats
}

/// `SID=...` pair from a `Set-Cookie` header value
fn session_cookie(set_cookie: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    if name.trim() == "SID" && !value.is_empty() {
        Some(format!("SID={}", value.trim()))
    } else {
        None
    }
}

impl QBittorrentProvider {
    fn login(client: &HttpClient, base: &str, username: &str, password: &str) -> Result<String> {
        let url = format!("{}/api/v2/auth/login", base);
        let response = check_status(
            client.send(
                client
                    .post(&url)
                    .form(&[("username", username), ("password", password)]),
            )?,
        )?;

        let cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(session_cookie);

        let body = response
            .text()
            .map_err(|e| StatsError::protocol(format!("failed to read login response: {}", e)))?;
        if body.trim() != "Ok." {
            return Err(StatsError::auth(format!(
                "login rejected: {}",
                body.trim()
            )));
        }

        cookie.ok_or_else(|| StatsError::protocol("no session cookie found"))
    }

    fn get<T: serde::de::DeserializeOwned>(
        client: &HttpClient,
        base: &str,
        endpoint: &str,
        cookie: Option<&str>,
    ) -> Result<T> {
        let url = format!("{}{}", base, endpoint);
        let mut request = client.get(&url);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        client.get_json(request)
    }

    fn fetch(settings: &QBittorrentSettings) -> Result<TorrentStats> {
        let client = new_client(TIMEOUT, true)?;
        let base = settings.server_url.as_str();

        let cookie = match &settings.credentials {
            Some((user, pass)) => Some(
                Self::login(&client, base, user, pass).map_err(|e| e.during("failed to login"))?,
            ),
            None => None,
        };

        let torrents: Vec<Torrent> =
            Self::get(&client, base, "/api/v2/torrents/info", cookie.as_deref())
                .map_err(|e| e.during("failed to get torrents"))?;
        let transfer: TransferInfo =
            Self::get(&client, base, "/api/v2/transfer/info", cookie.as_deref())
                .map_err(|e| e.during("failed to get global stats"))?;

        Ok(bucket_torrents(&torrents, &transfer))
    }
}

impl Provider for QBittorrentProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::QBittorrent
    }

    fn validate(&self, config: &ProviderConfig) -> Result<()> {
        QBittorrentSettings::from_config(config).map(|_| ())
    }

    fn fetch_stats(&self, config: &ProviderConfig) -> Result<CanonicalStats> {
        let settings = QBittorrentSettings::from_config(config)?;
        Self::fetch(&settings).map(CanonicalStats::Torrent)
    }
}
