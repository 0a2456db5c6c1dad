use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

const DEFAULT_DATA_DIR: &str = "data/insights";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_RECORD_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory of `<TICKER>.json` record files
    pub data_dir: PathBuf,
    /// Optional CSV replacing the built-in company directory
    pub company_directory_csv: Option<PathBuf>,
    pub bind_addr: SocketAddr,
    /// 0 disables the record cache
    pub record_cache_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            company_directory_csv: None,
            bind_addr: default_bind_addr(),
            record_cache_ttl_secs: DEFAULT_RECORD_CACHE_TTL_SECS,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match non_empty("BIND_ADDR") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Invalid BIND_ADDR '{}', using {}", raw, DEFAULT_BIND_ADDR);
                default_bind_addr()
            }),
            None => default_bind_addr(),
        };

        let record_cache_ttl_secs = match non_empty("RECORD_CACHE_TTL_SECS") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(
                    "Invalid RECORD_CACHE_TTL_SECS '{}', using {}",
                    raw, DEFAULT_RECORD_CACHE_TTL_SECS
                );
                DEFAULT_RECORD_CACHE_TTL_SECS
            }),
            None => DEFAULT_RECORD_CACHE_TTL_SECS,
        };

        Self {
            data_dir: non_empty("INSIGHTS_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            company_directory_csv: non_empty("COMPANY_DIRECTORY_CSV").map(PathBuf::from),
            bind_addr,
            record_cache_ttl_secs,
        }
    }
}
