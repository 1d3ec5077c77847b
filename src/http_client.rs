use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, REFERER, USER_AGENT};

const REQUEST_TIMEOUT_SECS: u64 = 30;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client. stats.nba.com rejects requests without the
/// browser-ish headers below, so they are baked into the builder.
pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(REFERER, HeaderValue::from_static("https://stats.nba.com/"));
        headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
        headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .context("failed to build http client")
    })
}
