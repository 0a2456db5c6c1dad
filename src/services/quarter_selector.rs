use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Company, CompanyRecordSet, InsightRecord};

/// Period reported when no records exist anywhere
pub const UNKNOWN_QUARTER: &str = "Unknown";

/// A company paired with its record for the period being analyzed
#[derive(Debug, Clone, Copy)]
pub struct SelectedCompany<'a> {
    pub ticker: &'a str,
    pub company: &'a Company,
    pub record: &'a InsightRecord,
}

/// Every quarter label present across all companies, most recent first.
///
/// Labels are compared as plain strings. "Q4 2023" therefore sorts ahead of
/// "Q1 2024"; see DESIGN.md for why this ordering is kept.
pub fn available_quarters(records: &BTreeMap<String, CompanyRecordSet>) -> Vec<String> {
    let labels: BTreeSet<&str> = records
        .values()
        .flat_map(|set| set.insights.iter())
        .map(|r| r.quarter.as_str())
        .filter(|q| !q.trim().is_empty())
        .collect();

    labels.into_iter().rev().map(str::to_string).collect()
}

/// Most recent quarter label among one company's records
pub fn latest_quarter<'a, I>(insights: I) -> Option<String>
where
    I: IntoIterator<Item = &'a InsightRecord>,
{
    insights
        .into_iter()
        .map(|r| r.quarter.as_str())
        .filter(|q| !q.trim().is_empty())
        .max()
        .map(str::to_string)
}

/// Use the requested quarter when given, otherwise the latest label seen in any
/// company, otherwise [`UNKNOWN_QUARTER`].
pub fn resolve_quarter(
    records: &BTreeMap<String, CompanyRecordSet>,
    target_quarter: Option<&str>,
) -> String {
    match target_quarter.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => q.to_string(),
        None => available_quarters(records)
            .into_iter()
            .next()
            .unwrap_or_else(|| UNKNOWN_QUARTER.to_string()),
    }
}

/// Each company's record for `quarter`. Companies without one are left out.
pub fn select_for_quarter<'a>(
    records: &'a BTreeMap<String, CompanyRecordSet>,
    quarter: &str,
) -> Vec<SelectedCompany<'a>> {
    records
        .iter()
        .filter_map(|(ticker, set)| {
            set.record_for(quarter).map(|record| SelectedCompany {
                ticker: ticker.as_str(),
                company: &set.company,
                record,
            })
        })
        .collect()
}
