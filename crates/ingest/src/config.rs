use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rollcall_core::{ScrapeTarget, BUILTIN_TARGETS};
use validator::Validate;

use crate::error::ScrapeError;
use crate::fetcher::FetchStrategy;
use crate::pipeline::{RetryPolicy, RosterReader};

const DEFAULT_TARGET: &str = "akleg-senate";
const DEFAULT_OUTPUT: &str = "data.json";

#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub target: ScrapeTarget,
    pub strategy: FetchStrategy,
    pub output: PathBuf,
    pub http_timeout: Duration,
    pub ready_timeout: Duration,
    pub retry: RetryPolicy,
    pub headless: bool,
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, ScrapeError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ScrapeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup("ROLLCALL_TARGET").unwrap_or_else(|| DEFAULT_TARGET.to_string());
        let mut target = ScrapeTarget::builtin(&key).ok_or_else(|| {
            ScrapeError::Config(format!(
                "unknown target '{}' (expected one of: {})",
                key,
                BUILTIN_TARGETS.join(", ")
            ))
        })?;
        if let Some(url) = lookup("ROLLCALL_TARGET_URL") {
            target = target.with_url(url);
        }
        target
            .validate()
            .map_err(|e| ScrapeError::Config(format!("target '{}': {}", key, e)))?;
        RosterReader::new(&target)?;

        let strategy = match lookup("ROLLCALL_FETCHER") {
            Some(raw) => raw.parse()?,
            None => FetchStrategy::Static,
        };

        Ok(Self {
            target,
            strategy,
            output: lookup("ROLLCALL_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            http_timeout: seconds(&lookup, "ROLLCALL_HTTP_TIMEOUT_SECS", 15)?,
            ready_timeout: seconds(&lookup, "ROLLCALL_READY_TIMEOUT_SECS", 45)?,
            retry: RetryPolicy {
                max_reloads: parsed(&lookup, "ROLLCALL_MAX_RELOADS", 1)?,
                delay: seconds(&lookup, "ROLLCALL_RETRY_DELAY_SECS", 10)?,
            },
            headless: parsed(&lookup, "ROLLCALL_HEADLESS", false)?,
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ScrapeError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ScrapeError::Config(format!("{} has invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}

fn seconds<F>(lookup: &F, key: &str, default: u64) -> Result<Duration, ScrapeError>
where
    F: Fn(&str) -> Option<String>,
{
    parsed(lookup, key, default).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<IngestConfig, ScrapeError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        IngestConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.target.key, "akleg-senate");
        assert_eq!(config.target.url, "https://akleg.gov/senate.php");
        assert_eq!(config.strategy, FetchStrategy::Static);
        assert_eq!(config.output, PathBuf::from("data.json"));
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.ready_timeout, Duration::from_secs(45));
        assert_eq!(config.retry.max_reloads, 1);
        assert_eq!(config.retry.delay, Duration::from_secs(10));
        assert!(!config.headless);
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("ROLLCALL_TARGET", "akleg-house"),
            ("ROLLCALL_TARGET_URL", "http://127.0.0.1:9000/house.html"),
            ("ROLLCALL_FETCHER", "rendered"),
            ("ROLLCALL_OUTPUT", "out/house.json"),
            ("ROLLCALL_RETRY_DELAY_SECS", "0"),
            ("ROLLCALL_MAX_RELOADS", "3"),
            ("ROLLCALL_HEADLESS", "true"),
        ])
        .unwrap();

        assert_eq!(config.target.role, "Representative");
        assert_eq!(config.target.url, "http://127.0.0.1:9000/house.html");
        assert_eq!(config.target.base_url, "https://akleg.gov");
        assert_eq!(config.strategy, FetchStrategy::Rendered);
        assert_eq!(config.output, PathBuf::from("out/house.json"));
        assert_eq!(config.retry.delay, Duration::ZERO);
        assert_eq!(config.retry.max_reloads, 3);
        assert!(config.headless);
    }

    #[test]
    fn rejects_bad_values() {
        for pairs in [
            &[("ROLLCALL_TARGET", "ak-assembly")][..],
            &[("ROLLCALL_FETCHER", "curl")][..],
            &[("ROLLCALL_HTTP_TIMEOUT_SECS", "soon")][..],
            &[("ROLLCALL_TARGET_URL", "akleg.gov")][..],
            &[("ROLLCALL_HEADLESS", "maybe")][..],
        ] {
            let err = config_from(pairs).unwrap_err();
            assert!(matches!(err, ScrapeError::Config(_)), "{:?}", pairs);
        }
    }
}
