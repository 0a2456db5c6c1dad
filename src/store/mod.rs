//! Where insight records come from.
//!
//! The analysis code only ever sees a fully loaded `BTreeMap<ticker, CompanyRecordSet>`;
//! how that map is filled is decided here.

mod cache;
mod json_dir;
mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::StoreError;
use crate::models::CompanyRecordSet;
use crate::services::company_directory::CompanyDirectory;

pub use cache::CachedSource;
pub use json_dir::JsonDirSource;
pub use memory::InMemorySource;

#[async_trait]
pub trait InsightSource: Send + Sync {
    /// Load one company's records. `Ok(None)` when nothing is stored for it.
    async fn load_company(&self, ticker: &str) -> Result<Option<CompanyRecordSet>, StoreError>;

    /// Load several companies, keyed by upper-case ticker. A company that fails
    /// to load is skipped and logged rather than failing the batch.
    async fn load_all(
        &self,
        tickers: &[String],
    ) -> Result<BTreeMap<String, CompanyRecordSet>, StoreError> {
        let mut all = BTreeMap::new();
        for ticker in tickers {
            match self.load_company(ticker).await {
                Ok(Some(set)) => {
                    all.insert(ticker.to_uppercase(), set);
                }
                Ok(None) => debug!("No insight records stored for {}", ticker),
                Err(e) => warn!("Skipping {}: {}", ticker, e),
            }
        }
        Ok(all)
    }
}

/// Load records for every directory company. The directory is authoritative for
/// company metadata, so stored metadata is replaced with the directory entry.
pub async fn load_directory_records(
    directory: &CompanyDirectory,
    source: &dyn InsightSource,
) -> Result<BTreeMap<String, CompanyRecordSet>, StoreError> {
    let mut records = source.load_all(&directory.tickers()).await?;
    for (ticker, set) in records.iter_mut() {
        if let Some(company) = directory.get(ticker) {
            set.company = company.clone();
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Company, InsightRecord, Sector, SubCategory};

    #[tokio::test]
    async fn test_directory_metadata_wins() {
        let stale = Company::new("MSFT", "Microsoft (old)", Sector::Financials, SubCategory::Other);
        let source = InMemorySource::new(vec![
            CompanyRecordSet::new(stale, vec![InsightRecord::new("Q4 2024")]),
            CompanyRecordSet::new(
                Company::new("ZZZZ", "Untracked", Sector::Energy, SubCategory::Other),
                vec![InsightRecord::new("Q4 2024")],
            ),
        ]);
        let directory = CompanyDirectory::builtin();

        let records = load_directory_records(&directory, &source).await.unwrap();
        assert_eq!(records.len(), 1);
        let msft = &records["MSFT"];
        assert_eq!(msft.company.name, "Microsoft");
        assert_eq!(msft.company.sector, Sector::Technology);
    }
}
