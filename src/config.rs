use crate::error::{EngineError, EngineResult};
use chrono::{Datelike, Local};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ROSTER_PATH: &str = "./roster.json";
pub const DEFAULT_SPREAD_CACHE_PATH: &str = "./.spread_cache.json";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Runtime settings, read from `ATS_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub odds_api_key: String,
    pub roster_path: PathBuf,
    /// None when caching is turned off.
    pub spread_cache_path: Option<PathBuf>,
    pub poll_interval: Duration,
    /// Scoreboard date token replayed once at startup.
    pub backfill_dates: String,
    pub log_level: LevelFilter,
}

impl Settings {
    pub fn from_env() -> EngineResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> EngineResult<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let odds_api_key = get("ATS_ODDS_API_KEY")
            .ok_or_else(|| EngineError::Config("ATS_ODDS_API_KEY is not set".into()))?;

        let roster_path = get("ATS_ROSTER_JSON")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROSTER_PATH));

        let spread_cache_path = match get("ATS_SPREAD_CACHE") {
            Some(v) if v.eq_ignore_ascii_case("off") => None,
            Some(v) => Some(PathBuf::from(v)),
            None => Some(PathBuf::from(DEFAULT_SPREAD_CACHE_PATH)),
        };

        let poll_interval = match get("ATS_POLL_INTERVAL_SECS") {
            Some(v) => match v.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(EngineError::Config(format!(
                        "ATS_POLL_INTERVAL_SECS must be a positive number of seconds, got {v}"
                    )));
                }
            },
            None => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        };

        let backfill_dates =
            get("ATS_BACKFILL_DATES").unwrap_or_else(|| format!("{}03", Local::now().year()));

        let log_level = match get("ATS_LOG_LEVEL") {
            Some(v) => LevelFilter::from_str(&v)
                .map_err(|_| EngineError::Config(format!("unknown ATS_LOG_LEVEL {v}")))?,
            None => LevelFilter::Info,
        };

        Ok(Self {
            odds_api_key,
            roster_path,
            spread_cache_path,
            poll_interval,
            backfill_dates,
            log_level,
        })
    }
}
