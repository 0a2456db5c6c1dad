use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;

use crate::errors::StoreError;
use crate::models::CompanyRecordSet;
use crate::store::InsightSource;

const MAX_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone)]
struct CachedEntry {
    loaded_at: DateTime<Utc>,
    records: Option<CompanyRecordSet>,
}

/// Keeps loaded record sets for a while so repeated dashboard requests do not
/// re-read the store. Only raw inputs are cached, never computed analyses.
/// A failed `load_company` is not cached. Batch loads skip failing companies, so
/// those are remembered as absent until the entry expires.
#[derive(Clone)]
pub struct CachedSource<S> {
    inner: S,
    cache: Arc<DashMap<String, CachedEntry>>,
    ttl: Duration,
}

impl<S: InsightSource> CachedSource<S> {
    /// A zero `ttl_secs` disables caching
    pub fn new(inner: S, ttl_secs: u64) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
            ttl: Duration::seconds(i64::try_from(ttl_secs).unwrap_or(MAX_TTL_SECS).min(MAX_TTL_SECS)),
        }
    }

    fn fresh(&self, key: &str) -> Option<Option<CompanyRecordSet>> {
        let entry = self.cache.get(key)?;
        if Utc::now() < entry.loaded_at + self.ttl {
            return Some(entry.records.clone());
        }
        drop(entry); // release the read lock before removing
        self.cache.remove(key);
        None
    }

    pub fn invalidate(&self, ticker: &str) {
        self.cache.remove(&ticker.trim().to_uppercase());
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[async_trait]
impl<S: InsightSource> InsightSource for CachedSource<S> {
    async fn load_company(&self, ticker: &str) -> Result<Option<CompanyRecordSet>, StoreError> {
        let key = ticker.trim().to_uppercase();
        if self.ttl <= Duration::zero() {
            return self.inner.load_company(&key).await;
        }

        if let Some(records) = self.fresh(&key) {
            debug!("Record cache hit for {}", key);
            return Ok(records);
        }

        let records = self.inner.load_company(&key).await?;
        self.cache.insert(
            key,
            CachedEntry {
                loaded_at: Utc::now(),
                records: records.clone(),
            },
        );
        Ok(records)
    }

    /// Serves fresh entries from the cache and hands every miss to the inner
    /// source in one batch.
    async fn load_all(
        &self,
        tickers: &[String],
    ) -> Result<BTreeMap<String, CompanyRecordSet>, StoreError> {
        if self.ttl <= Duration::zero() {
            return self.inner.load_all(tickers).await;
        }

        let mut all = BTreeMap::new();
        let mut misses = Vec::new();
        for ticker in tickers {
            let key = ticker.trim().to_uppercase();
            match self.fresh(&key) {
                Some(Some(set)) => {
                    all.insert(key, set);
                }
                Some(None) => {}
                None => misses.push(key),
            }
        }

        if !misses.is_empty() {
            debug!("Record cache: {} hits, {} misses", all.len(), misses.len());
            let loaded_at = Utc::now();
            let mut loaded = self.inner.load_all(&misses).await?;
            for key in misses {
                let records = loaded.remove(&key);
                self.cache.insert(
                    key.clone(),
                    CachedEntry {
                        loaded_at,
                        records: records.clone(),
                    },
                );
                if let Some(set) = records {
                    all.insert(key, set);
                }
            }
        }
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::models::{Company, InsightRecord, Sector, SubCategory};

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl InsightSource for CountingSource {
        async fn load_company(&self, ticker: &str) -> Result<Option<CompanyRecordSet>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if ticker == "NONE" {
                return Ok(None);
            }
            Ok(Some(CompanyRecordSet::new(
                Company::new(ticker, ticker, Sector::Technology, SubCategory::Other),
                vec![InsightRecord::new("Q4 2024")],
            )))
        }
    }

    fn counting() -> CountingSource {
        CountingSource {
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_second_load_hits_cache() {
        let source = CachedSource::new(counting(), 300);
        let first = source.load_company("msft").await.unwrap();
        let second = source.load_company("MSFT").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.len(), 1);
    }

    #[tokio::test]
    async fn test_absent_companies_are_cached_too() {
        let source = CachedSource::new(counting(), 300);
        assert!(source.load_company("NONE").await.unwrap().is_none());
        assert!(source.load_company("NONE").await.unwrap().is_none());
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let source = CachedSource::new(counting(), 0);
        source.load_company("MSFT").await.unwrap();
        source.load_company("MSFT").await.unwrap();
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 2);
        assert!(source.is_empty());
    }

    #[tokio::test]
    async fn test_load_all_only_fetches_misses() {
        let source = CachedSource::new(counting(), 300);
        source.load_company("MSFT").await.unwrap();

        let tickers = vec!["MSFT".to_string(), "NVDA".to_string()];
        let all = source.load_all(&tickers).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 2);

        source.load_all(&tickers).await.unwrap();
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_load_all_remembers_absent_companies() {
        let source = CachedSource::new(counting(), 300);
        let tickers = vec!["MSFT".to_string(), "NONE".to_string()];

        let all = source.load_all(&tickers).await.unwrap();
        assert_eq!(all.keys().collect::<Vec<_>>(), vec!["MSFT"]);
        assert_eq!(source.len(), 2);
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 2);

        let again = source.load_all(&tickers).await.unwrap();
        assert_eq!(again.len(), 1);
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let source = CachedSource::new(counting(), 300);
        source.load_company("MSFT").await.unwrap();
        source.invalidate("msft");
        source.load_company("MSFT").await.unwrap();
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 2);
    }
}
