//! HTTP implementation of the snapshot source port.

use std::time::Duration;

use async_trait::async_trait;
use pathscope_core_types::{HistoryEntry, SnapshotModel, ToggleResponse};
use pathscope_session::{SnapshotSource, SourceError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::errors::{CliError, CliResult};

pub const STATS_PATH: &str = "api/stats";
pub const TOGGLE_PATH: &str = "api/transmission/toggle";
pub const HISTORY_PATH: &str = "api/history";
pub const HISTORY_CLEAR_PATH: &str = "api/history/clear";

#[derive(Clone, Debug)]
pub struct HttpSnapshotSource {
    client: Client,
    base: Url,
}

impl HttpSnapshotSource {
    pub fn new(base: Url, timeout: Duration) -> CliResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| CliError::HttpClient(err.to_string()))?;
        Ok(Self {
            client,
            base: with_trailing_slash(base),
        })
    }

    pub fn from_config(config: &Config) -> CliResult<Self> {
        Self::new(config.backend()?, config.request_timeout())
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, SourceError> {
        self.base
            .join(path)
            .map_err(|err| SourceError::Transport(format!("invalid endpoint {path}: {err}")))
    }

    async fn get(&self, path: &str) -> Result<Response, SourceError> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let response = self.client.get(url).send().await.map_err(transport)?;
        check_status(path, response)
    }

    async fn post(&self, path: &str) -> Result<Response, SourceError> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(transport)?;
        check_status(path, response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SourceError> {
        let bytes = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&bytes).map_err(|err| SourceError::Decode(err.to_string()))
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<SnapshotModel, SourceError> {
        let response = self.get(STATS_PATH).await?;
        let bytes = response.bytes().await.map_err(transport)?;
        SnapshotModel::from_slice(&bytes).map_err(|err| SourceError::Decode(err.to_string()))
    }

    async fn toggle(&self) -> Result<ToggleResponse, SourceError> {
        let response = self.post(TOGGLE_PATH).await?;
        Self::decode(response).await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, SourceError> {
        let response = self.get(HISTORY_PATH).await?;
        Self::decode(response).await
    }

    async fn clear_history(&self) -> Result<(), SourceError> {
        self.post(HISTORY_CLEAR_PATH).await.map(|_| ())
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn check_status(path: &str, response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SourceError::Status {
            endpoint: format!("/{path}"),
            status: status.as_u16(),
        })
    }
}

fn transport(err: reqwest::Error) -> SourceError {
    if err.is_decode() {
        SourceError::Decode(err.to_string())
    } else {
        SourceError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(base: &str) -> HttpSnapshotSource {
        HttpSnapshotSource::new(Url::parse(base).unwrap(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn endpoints_resolve_under_base_path() {
        let root = source("http://127.0.0.1:5000");
        assert_eq!(
            root.endpoint(STATS_PATH).unwrap().as_str(),
            "http://127.0.0.1:5000/api/stats"
        );

        let nested = source("http://monitor.local/lab");
        assert_eq!(
            nested.endpoint(TOGGLE_PATH).unwrap().as_str(),
            "http://monitor.local/lab/api/transmission/toggle"
        );
    }
}
