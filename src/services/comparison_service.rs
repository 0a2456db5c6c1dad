use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{Company, CompanyMetrics, CompanyRecordSet, ComparisonResult, PeerGroupStats};
use crate::services::company_directory::CompanyDirectory;
use crate::services::metrics::null_safe_mean;
use crate::services::quarter_selector::{latest_quarter, SelectedCompany};

/// Compare one company against its sector and sub-category peers for a quarter.
///
/// Without `target_quarter` the company's own latest quarter is used, not the
/// latest across all companies. Returns `None` when the ticker is not in the
/// directory, has no records, or has no record for the resolved quarter. Peers
/// missing that quarter are left out of both groups.
pub fn get_sector_comparison(
    ticker: &str,
    directory: &CompanyDirectory,
    records: &BTreeMap<String, CompanyRecordSet>,
    target_quarter: Option<&str>,
) -> Option<ComparisonResult> {
    let company = directory.get(ticker)?;
    let own = records.get(&company.ticker)?;

    let quarter = match target_quarter.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => q.to_string(),
        None => latest_quarter(&own.insights)?,
    };
    let record = own.record_for(&quarter)?;

    let sector_peers = peers_with_record(directory.in_sector(company.sector), records, &quarter);
    let sub_category_peers = peers_with_record(
        directory.in_sub_category(company.sector, company.sub_category),
        records,
        &quarter,
    );

    Some(ComparisonResult {
        company: company.clone(),
        metrics: CompanyMetrics {
            capex_growth: record.capex_growth,
            revenue: record.revenue,
            guidance_direction: record.guidance_direction,
            overall_sentiment: record.overall_sentiment,
            ai_investment_mentioned: record.ai_investment_mentioned,
        },
        in_sector: peer_group_stats(&company.ticker, sector_peers),
        in_sub_category: peer_group_stats(&company.ticker, sub_category_peers),
        quarter,
    })
}

fn peers_with_record<'a>(
    candidates: Vec<&'a Company>,
    records: &'a BTreeMap<String, CompanyRecordSet>,
    quarter: &str,
) -> Vec<SelectedCompany<'a>> {
    candidates
        .into_iter()
        .filter_map(|company| {
            let record = records.get(&company.ticker)?.record_for(quarter)?;
            Some(SelectedCompany {
                ticker: company.ticker.as_str(),
                company,
                record,
            })
        })
        .collect()
}

fn peer_group_stats(ticker: &str, mut peers: Vec<SelectedCompany>) -> PeerGroupStats {
    let average_capex_growth = null_safe_mean(peers.iter().map(|p| p.record.capex_growth));
    let average_revenue = null_safe_mean(peers.iter().map(|p| p.record.revenue));

    // missing revenue ranks as zero; the value itself stays absent elsewhere
    let sort_revenue = |p: &SelectedCompany| p.record.revenue.filter(|r| r.is_finite()).unwrap_or(0.0);
    peers.sort_by(|a, b| {
        sort_revenue(b)
            .partial_cmp(&sort_revenue(a))
            .unwrap_or(Ordering::Equal)
    });

    let rank = peers
        .iter()
        .position(|p| p.ticker == ticker)
        .map(|i| i + 1)
        .unwrap_or(0);

    PeerGroupStats {
        total: peers.len(),
        peers: peers.iter().map(|p| p.ticker.to_string()).collect(),
        average_capex_growth,
        average_revenue,
        rank,
    }
}
