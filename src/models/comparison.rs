use serde::{Deserialize, Serialize};

use crate::models::{Company, GuidanceDirection, OverallSentiment};

/// The compared company's own figures for the resolved quarter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyMetrics {
    pub capex_growth: Option<f64>,
    pub revenue: Option<f64>,
    pub guidance_direction: GuidanceDirection,
    pub overall_sentiment: OverallSentiment,
    pub ai_investment_mentioned: bool,
}

/// Averages and rank within one peer group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeerGroupStats {
    /// Peer tickers ordered by revenue, highest first
    pub peers: Vec<String>,
    pub total: usize,
    pub average_capex_growth: f64,
    pub average_revenue: f64,
    /// 1-based revenue rank; 0 when the company is missing from the group
    pub rank: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonResult {
    pub company: Company,
    pub quarter: String,
    pub metrics: CompanyMetrics,
    pub in_sector: PeerGroupStats,
    pub in_sub_category: PeerGroupStats,
}
