use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::models::CompanyRecordSet;
use crate::store::InsightSource;

/// Records held in memory, keyed by upper-case ticker
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: BTreeMap<String, CompanyRecordSet>,
}

impl InMemorySource {
    pub fn new(sets: Vec<CompanyRecordSet>) -> Self {
        let records = sets
            .into_iter()
            .map(|set| (set.ticker().to_uppercase(), set))
            .collect();
        Self { records }
    }
}

#[async_trait]
impl InsightSource for InMemorySource {
    async fn load_company(&self, ticker: &str) -> Result<Option<CompanyRecordSet>, StoreError> {
        Ok(self.records.get(&ticker.trim().to_uppercase()).cloned())
    }
}
