use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{info, warn};

use crate::errors::StoreError;
use crate::models::CompanyRecordSet;
use crate::store::InsightSource;

/// Reads `<root>/<TICKER>.json`, one file per company
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    root: PathBuf,
}

impl JsonDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.root.join(format!("{}.json", ticker.trim().to_uppercase()))
    }
}

#[async_trait]
impl InsightSource for JsonDirSource {
    async fn load_company(&self, ticker: &str) -> Result<Option<CompanyRecordSet>, StoreError> {
        let path = self.path_for(ticker);
        let body = match tokio::fs::read_to_string(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: path.display().to_string(),
                source,
            })
    }

    /// A missing data directory means nothing is stored yet and yields an empty
    /// map. Fails only when the directory exists but cannot be read; individual
    /// companies are loaded concurrently and skipped on error.
    async fn load_all(
        &self,
        tickers: &[String],
    ) -> Result<BTreeMap<String, CompanyRecordSet>, StoreError> {
        match tokio::fs::metadata(&self.root).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Insight data directory {} not found", self.root.display());
                return Ok(BTreeMap::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.root.display().to_string(),
                    source,
                })
            }
        }

        let loads = tickers.iter().map(|ticker| async move {
            (ticker.to_uppercase(), self.load_company(ticker).await)
        });

        let mut all = BTreeMap::new();
        for (ticker, result) in join_all(loads).await {
            match result {
                Ok(Some(set)) => {
                    all.insert(ticker, set);
                }
                Ok(None) => {}
                Err(e) => warn!("Skipping {}: {}", ticker, e),
            }
        }

        info!(
            "Loaded insight records for {}/{} companies from {}",
            all.len(),
            tickers.len(),
            self.root.display()
        );
        Ok(all)
    }
}
