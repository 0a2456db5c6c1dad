use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::models::{
    AggregateStats, CompanyRecordSet, DivergenceEntry, GuidanceCounts, GuidanceDirection,
    MacroAnalysis, OverallSentiment, PartnershipEdge, Sector, SectorBreakdown, SubCategory,
    SupplyChainCounts,
};
use crate::services::metrics::{null_safe_mean, percentage};
use crate::services::partner_normalizer::normalize_partner_name;
use crate::services::quarter_selector::{resolve_quarter, select_for_quarter, SelectedCompany};

/// Edges need this many distinct companies to count as cross-company signal
pub const MIN_CROSS_COMPANY_MENTIONS: usize = 2;
/// Network size when no edge reaches the cross-company threshold
pub const NETWORK_FALLBACK_LIMIT: usize = 15;
/// Per-bucket cap on cross-company edges
pub const SECTOR_PARTNER_LIMIT: usize = 5;
/// Per-bucket size when no edge reaches the cross-company threshold
pub const SECTOR_FALLBACK_LIMIT: usize = 3;

/// Capex growth above this (percent) puts a company on the winning side
pub const CAPEX_EXPANSION_THRESHOLD: f64 = 20.0;
/// Capex growth below this (percent) puts a company on the losing side
pub const CAPEX_CUT_THRESHOLD: f64 = -10.0;

pub const THEME_AI_INFRASTRUCTURE: &str = "AI Infrastructure Investment";
pub const THEME_SUPPLY_EASING: &str = "Supply Chain Easing";
pub const THEME_SUPPLY_CONSTRAINTS: &str = "Supply Chain Constraints";
pub const THEME_OPTIMISTIC: &str = "Optimistic Outlook";
pub const THEME_CAUTIOUS: &str = "Cautious Guidance";
pub const THEME_COST_CUTTING: &str = "Cost Cutting Measures";
pub const THEME_PRICING_PRESSURE: &str = "Pricing Pressure";
pub const THEME_MIXED: &str = "Mixed Signals";

/// Build the cross-company view for one period.
///
/// When `target_quarter` is `None` the most recent label present in any company is
/// used. Companies without a record for the period are excluded, and no input shape
/// makes this fail: empty input yields an empty, neutral analysis. The result is a
/// pure function of the input.
pub fn compute_macro_analysis(
    records: &BTreeMap<String, CompanyRecordSet>,
    target_quarter: Option<&str>,
) -> MacroAnalysis {
    let quarter = resolve_quarter(records, target_quarter);
    let selected = select_for_quarter(records, &quarter);

    let aggregate = aggregate_stats(&selected);
    let partnership_network = select_edges(
        build_partnership_edges(&selected),
        None,
        NETWORK_FALLBACK_LIMIT,
    );
    let sector_breakdown = sector_breakdown(&selected);
    let divergences = detect_divergences(&selected);
    let top_themes = top_themes(&aggregate, selected.len());

    debug!(
        "Macro analysis for {}: {} companies, {} partners, {} buckets, {} divergences",
        quarter,
        selected.len(),
        partnership_network.len(),
        sector_breakdown.len(),
        divergences.len()
    );

    MacroAnalysis {
        quarter,
        companies: selected.iter().map(|s| s.ticker.to_string()).collect(),
        aggregate,
        partnership_network,
        sector_breakdown,
        divergences,
        top_themes,
    }
}

// ---------------------------------------------------------------------------
// Scalar aggregates
// ---------------------------------------------------------------------------

fn aggregate_stats(selected: &[SelectedCompany]) -> AggregateStats {
    let mut stats = AggregateStats {
        average_capex_growth: null_safe_mean(selected.iter().map(|s| s.record.capex_growth)),
        ..Default::default()
    };

    for s in selected {
        stats.guidance.record(s.record.guidance_direction);
        stats.supply_chain.record(s.record.supply_chain_status);
        stats.headcount.record(s.record.headcount_trend);
        stats.pricing_power.record(s.record.pricing_power);
        if s.record.ai_investment_mentioned {
            stats.ai_investment_count += 1;
        }
    }

    stats.sentiment_score = average_sentiment(selected);
    stats.overall_sentiment = OverallSentiment::classify(stats.sentiment_score);
    stats
}

fn average_sentiment(selected: &[SelectedCompany]) -> f64 {
    null_safe_mean(
        selected
            .iter()
            .map(|s| Some(s.record.overall_sentiment.score())),
    )
}

// ---------------------------------------------------------------------------
// Partnership network
// ---------------------------------------------------------------------------

/// Canonical partner -> distinct mentioning tickers, most-connected first.
/// Ties keep first-seen order.
pub fn build_partnership_edges(selected: &[SelectedCompany]) -> Vec<PartnershipEdge> {
    let mut first_seen: Vec<String> = Vec::new();
    let mut connected: HashMap<String, BTreeSet<String>> = HashMap::new();

    for s in selected {
        for raw in &s.record.partnerships {
            let Some(partner) = normalize_partner_name(raw) else {
                continue;
            };
            match connected.get_mut(&partner) {
                Some(tickers) => {
                    tickers.insert(s.ticker.to_string());
                }
                None => {
                    first_seen.push(partner.clone());
                    connected.insert(partner, BTreeSet::from([s.ticker.to_string()]));
                }
            }
        }
    }

    let mut edges: Vec<PartnershipEdge> = first_seen
        .into_iter()
        .filter_map(|partner| {
            connected.remove(&partner).map(|tickers| PartnershipEdge {
                mentions: tickers.len(),
                connected_companies: tickers,
                partner,
            })
        })
        .collect();

    // stable: equal counts stay in first-seen order
    edges.sort_by(|a, b| b.mentions.cmp(&a.mentions));
    edges
}

/// Keep cross-company edges (capped at `limit` when given). With none, fall back to
/// the top `fallback` edges so a sparse period still shows a network.
fn select_edges(
    edges: Vec<PartnershipEdge>,
    limit: Option<usize>,
    fallback: usize,
) -> Vec<PartnershipEdge> {
    let cross_company: Vec<PartnershipEdge> = edges
        .iter()
        .filter(|e| e.mentions >= MIN_CROSS_COMPANY_MENTIONS)
        .cloned()
        .collect();

    if cross_company.is_empty() {
        edges.into_iter().take(fallback).collect()
    } else {
        cross_company
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Sector breakdown
// ---------------------------------------------------------------------------

fn sector_breakdown(selected: &[SelectedCompany]) -> Vec<SectorBreakdown> {
    let mut buckets: BTreeMap<(Sector, SubCategory), Vec<SelectedCompany>> = BTreeMap::new();
    for s in selected {
        buckets
            .entry((s.company.sector, s.company.sub_category))
            .or_default()
            .push(*s);
    }

    buckets
        .into_iter()
        .map(|((sector, sub_category), members)| {
            let mut guidance = GuidanceCounts::default();
            let mut supply_chain = SupplyChainCounts::default();
            for m in &members {
                guidance.record(m.record.guidance_direction);
                supply_chain.record(m.record.supply_chain_status);
            }
            let ai_mentions = members
                .iter()
                .filter(|m| m.record.ai_investment_mentioned)
                .count();

            SectorBreakdown {
                sector,
                sub_category,
                companies: members.iter().map(|m| m.ticker.to_string()).collect(),
                average_capex_growth: null_safe_mean(members.iter().map(|m| m.record.capex_growth)),
                guidance,
                supply_chain,
                ai_mention_pct: percentage(ai_mentions, members.len()),
                average_sentiment: average_sentiment(&members),
                partnerships: select_edges(
                    build_partnership_edges(&members),
                    Some(SECTOR_PARTNER_LIMIT),
                    SECTOR_FALLBACK_LIMIT,
                ),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Divergences
// ---------------------------------------------------------------------------

pub fn detect_divergences(selected: &[SelectedCompany]) -> Vec<DivergenceEntry> {
    [guidance_divergence(selected), capex_divergence(selected)]
        .into_iter()
        .flatten()
        .collect()
}

fn guidance_divergence(selected: &[SelectedCompany]) -> Option<DivergenceEntry> {
    let tickers_with = |direction: GuidanceDirection| -> BTreeSet<String> {
        selected
            .iter()
            .filter(|s| s.record.guidance_direction == direction)
            .map(|s| s.ticker.to_string())
            .collect()
    };
    let winners = tickers_with(GuidanceDirection::Raised);
    let losers = tickers_with(GuidanceDirection::Lowered);

    if winners.is_empty() && losers.is_empty() {
        return None;
    }

    Some(DivergenceEntry {
        theme: "Guidance Divergence".to_string(),
        details: format!(
            "{} companies raised guidance while {} lowered it",
            winners.len(),
            losers.len()
        ),
        winners,
        losers,
    })
}

fn capex_divergence(selected: &[SelectedCompany]) -> Option<DivergenceEntry> {
    let tickers_where = |predicate: &dyn Fn(f64) -> bool| -> BTreeSet<String> {
        selected
            .iter()
            .filter(|s| {
                s.record
                    .capex_growth
                    .filter(|g| g.is_finite())
                    .is_some_and(|g| predicate(g))
            })
            .map(|s| s.ticker.to_string())
            .collect()
    };
    let winners = tickers_where(&|g| g > CAPEX_EXPANSION_THRESHOLD);
    let losers = tickers_where(&|g| g < CAPEX_CUT_THRESHOLD);

    if winners.is_empty() && losers.is_empty() {
        return None;
    }

    Some(DivergenceEntry {
        theme: "Capex Divergence".to_string(),
        details: format!(
            "{} companies grew capex more than {}% while {} cut it by more than {}%",
            winners.len(),
            CAPEX_EXPANSION_THRESHOLD,
            losers.len(),
            -CAPEX_CUT_THRESHOLD
        ),
        winners,
        losers,
    })
}

// ---------------------------------------------------------------------------
// Themes
// ---------------------------------------------------------------------------

/// Independent rules over the period aggregates; each adds at most one theme.
fn top_themes(stats: &AggregateStats, company_count: usize) -> Vec<String> {
    if company_count == 0 {
        return Vec::new();
    }
    let mut themes: Vec<&str> = Vec::new();

    if stats.ai_investment_count * 2 > company_count {
        themes.push(THEME_AI_INFRASTRUCTURE);
    }

    let supply = &stats.supply_chain;
    if supply.improving > supply.constrained {
        themes.push(THEME_SUPPLY_EASING);
    } else if supply.constrained > supply.improving {
        themes.push(THEME_SUPPLY_CONSTRAINTS);
    }

    let guidance = &stats.guidance;
    if guidance.raised > 0 && guidance.raised >= guidance.lowered * 2 {
        themes.push(THEME_OPTIMISTIC);
    } else if guidance.lowered > guidance.raised {
        themes.push(THEME_CAUTIOUS);
    }

    if stats.headcount.reducing > stats.headcount.expanding {
        themes.push(THEME_COST_CUTTING);
    }

    if stats.pricing_power.weak > stats.pricing_power.strong {
        themes.push(THEME_PRICING_PRESSURE);
    }

    if themes.is_empty() {
        themes.push(THEME_MIXED);
    }

    themes.into_iter().map(str::to_string).collect()
}
