use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{
    GuidanceDirection, HeadcountTrend, OverallSentiment, PricingPower, Sector, SubCategory,
    SupplyChainStatus,
};

// ---------------------------------------------------------------------------
// Frequency tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuidanceCounts {
    pub raised: usize,
    pub lowered: usize,
    pub maintained: usize,
    pub not_provided: usize,
}

impl GuidanceCounts {
    pub fn record(&mut self, direction: GuidanceDirection) {
        match direction {
            GuidanceDirection::Raised => self.raised += 1,
            GuidanceDirection::Lowered => self.lowered += 1,
            GuidanceDirection::Maintained => self.maintained += 1,
            GuidanceDirection::NotProvided => self.not_provided += 1,
        }
    }
}

/// Unknown statuses are not counted in any bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupplyChainCounts {
    pub improving: usize,
    pub stable: usize,
    pub constrained: usize,
}

impl SupplyChainCounts {
    pub fn record(&mut self, status: SupplyChainStatus) {
        match status {
            SupplyChainStatus::Improving => self.improving += 1,
            SupplyChainStatus::Stable => self.stable += 1,
            SupplyChainStatus::Constrained => self.constrained += 1,
            SupplyChainStatus::Unknown => {}
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadcountCounts {
    pub expanding: usize,
    pub stable: usize,
    pub reducing: usize,
}

impl HeadcountCounts {
    pub fn record(&mut self, trend: HeadcountTrend) {
        match trend {
            HeadcountTrend::Expanding => self.expanding += 1,
            HeadcountTrend::Stable => self.stable += 1,
            HeadcountTrend::Reducing => self.reducing += 1,
            HeadcountTrend::Unknown => {}
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricingPowerCounts {
    pub strong: usize,
    pub moderate: usize,
    pub weak: usize,
}

impl PricingPowerCounts {
    pub fn record(&mut self, power: PricingPower) {
        match power {
            PricingPower::Strong => self.strong += 1,
            PricingPower::Moderate => self.moderate += 1,
            PricingPower::Weak => self.weak += 1,
            PricingPower::Unknown => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Derived entities
// ---------------------------------------------------------------------------

/// A canonical partner and the distinct companies that mentioned it.
///
/// `mentions` always equals `connected_companies.len()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartnershipEdge {
    pub partner: String,
    pub mentions: usize,
    pub connected_companies: BTreeSet<String>,
}

/// One side moving opposite to another on some metric
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DivergenceEntry {
    pub theme: String,
    pub winners: BTreeSet<String>,
    pub losers: BTreeSet<String>,
    pub details: String,
}

/// Aggregate statistics over every company selected for the period
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AggregateStats {
    pub average_capex_growth: f64,
    pub guidance: GuidanceCounts,
    pub ai_investment_count: usize,
    pub supply_chain: SupplyChainCounts,
    pub headcount: HeadcountCounts,
    pub pricing_power: PricingPowerCounts,
    /// Mean of per-company sentiment scores (-1.0 to +1.0)
    pub sentiment_score: f64,
    pub overall_sentiment: OverallSentiment,
}

/// Rollup for one (sector, sub-category) bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorBreakdown {
    pub sector: Sector,
    pub sub_category: SubCategory,
    pub companies: Vec<String>,
    pub average_capex_growth: f64,
    pub guidance: GuidanceCounts,
    pub supply_chain: SupplyChainCounts,
    /// Share of bucket companies mentioning AI investment, 0-100
    pub ai_mention_pct: f64,
    pub average_sentiment: f64,
    pub partnerships: Vec<PartnershipEdge>,
}

/// Cross-company view of a single period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MacroAnalysis {
    pub quarter: String,
    /// Tickers that had a record for `quarter`
    pub companies: Vec<String>,
    pub aggregate: AggregateStats,
    pub partnership_network: Vec<PartnershipEdge>,
    pub sector_breakdown: Vec<SectorBreakdown>,
    pub divergences: Vec<DivergenceEntry>,
    pub top_themes: Vec<String>,
}

impl MacroAnalysis {
    pub fn company_count(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}
