//! HTTP client for the flashcard server.
//!
//! Two endpoints: `GET /api/tarjetas` returns a batch of cards, and
//! `POST /api/stats` takes one counter increment per call.

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{Card, SessionRequest, StatDelta};
use reqwest::blocking::Client;
use std::time::Duration;
use url::Url;

/// Where session cards come from.
pub trait CardSource {
    fn fetch_cards(&self, request: &SessionRequest) -> Result<Vec<Card>, ApiError>;
}

/// Where stat deltas go.
///
/// Reporting is best-effort: implementations must return immediately and
/// deal with delivery failures themselves. Callers never learn the outcome.
pub trait StatSink {
    fn report(&self, delta: StatDelta);
}

pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// `timeout` of `None` waits on the server indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;
        // Keep any path prefix when joining endpoint paths onto it
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    /// Builds the client from configuration. An unusable `server_url` is
    /// logged and replaced by the default address.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        match Self::new(&config.server_url, config.request_timeout()) {
            Err(ApiError::Url(e)) => {
                let fallback = Config::default().server_url;
                log::warn!(
                    "invalid server_url {:?} ({}); using {}",
                    config.server_url,
                    e,
                    fallback
                );
                Self::new(&fallback, config.request_timeout())
            }
            result => result,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn cards_url(&self, request: &SessionRequest) -> Result<Url, ApiError> {
        let mut url = self.base_url.join("api/tarjetas")?;
        url.query_pairs_mut()
            .append_pair("categoria", &request.category)
            .append_pair("modo", request.mode.as_str())
            .append_pair("n", &request.count.to_string());
        Ok(url)
    }

    pub fn stats_url(&self) -> Result<Url, ApiError> {
        Ok(self.base_url.join("api/stats")?)
    }

    /// Sends one delta and waits for the server to accept it.
    pub fn post_stat(&self, delta: &StatDelta) -> Result<(), ApiError> {
        let response = self.http.post(self.stats_url()?).json(delta).send()?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(())
    }
}

impl CardSource for ApiClient {
    fn fetch_cards(&self, request: &SessionRequest) -> Result<Vec<Card>, ApiError> {
        let url = self.cards_url(request)?;
        log::debug!("GET {url}");

        let response = self.http.get(url).send()?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        let body = response.text()?;
        Ok(serde_json::from_str::<Vec<Card>>(&body)?)
    }
}
