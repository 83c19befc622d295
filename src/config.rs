//! Runtime configuration, read from YAML with environment overrides.

use std::time::Duration;

use pathscope_chart::LaneScale;
use pathscope_session::PollConfig;
use pathscope_timeline::TimelineLayout;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::errors::{CliError, CliResult};
use crate::render::OutputFormat;

pub const ENV_BACKEND_URL: &str = "PATHSCOPE_BACKEND_URL";
pub const ENV_POLL_MS: &str = "PATHSCOPE_POLL_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    /// Fetch once when `watch` starts, before any toggle.
    pub fetch_on_start: bool,
    pub output: OutputFormat,
    pub timeline: TimelineLayout,
    pub chart: LaneScale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".to_string(),
            poll_interval_ms: 1000,
            request_timeout_ms: 2000,
            fetch_on_start: true,
            output: OutputFormat::Human,
            timeline: TimelineLayout::default(),
            chart: LaneScale::default(),
        }
    }
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            fetch_on_start: self.fetch_on_start,
            ..PollConfig::default().with_interval(self.poll_interval())
        }
    }

    pub fn backend(&self) -> CliResult<Url> {
        Url::parse(&self.backend_url).map_err(|source| CliError::BackendUrl {
            url: self.backend_url.clone(),
            source,
        })
    }

    pub fn validate(&self) -> CliResult<()> {
        let url = self.backend()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CliError::InvalidConfig(format!(
                "backend_url must use http or https, got {}",
                url.scheme()
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(CliError::InvalidConfig(
                "poll_interval_ms must be greater than zero".into(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(CliError::InvalidConfig(
                "request_timeout_ms must be greater than zero".into(),
            ));
        }
        self.timeline.validate()?;
        Ok(())
    }

    /// Applies `PATHSCOPE_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BACKEND_URL) {
            info!(%url, "backend url overridden from environment");
            self.backend_url = url;
        }
        if let Some(raw) = lookup(ENV_POLL_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.poll_interval_ms = ms,
                Err(err) => warn!(value = %raw, %err, "ignoring invalid {ENV_POLL_MS}"),
            }
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(1000));
        assert_eq!(config.timeline.px_per_second, 50.0);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str(
            "backend_url: http://10.0.0.2:8080\ntimeline:\n  px_per_second: 80\n",
        )
        .unwrap();
        assert_eq!(config.backend_url, "http://10.0.0.2:8080");
        assert_eq!(config.timeline.px_per_second, 80.0);
        assert_eq!(config.timeline.lane_offsets.path_a, 25.0);
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn env_overrides_replace_values() {
        let env: HashMap<&str, &str> = [(ENV_BACKEND_URL, "http://backend:9000"), (ENV_POLL_MS, "250")]
            .into_iter()
            .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.backend_url, "http://backend:9000");
        assert_eq!(config.poll_interval_ms, 250);
    }

    #[test]
    fn bad_poll_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == ENV_POLL_MS).then(|| "soon".to_string()));
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn rejects_non_http_backend() {
        let config = Config {
            backend_url: "ftp://example.com".into(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(CliError::InvalidConfig(_))));

        let config = Config {
            backend_url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(CliError::BackendUrl { .. })));
    }
}
