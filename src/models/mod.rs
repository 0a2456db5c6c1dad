mod company;
mod insight;
mod macro_analysis;
mod comparison;
mod partner;

pub use company::{Company, Sector, SubCategory};
pub use insight::{
    InsightRecord, CompanyRecordSet, GuidanceDirection, SupplyChainStatus, HeadcountTrend,
    PricingPower, OverallSentiment, BULLISH_THRESHOLD, BEARISH_THRESHOLD,
};
pub use macro_analysis::{
    MacroAnalysis, AggregateStats, SectorBreakdown, PartnershipEdge, DivergenceEntry,
    GuidanceCounts, SupplyChainCounts, HeadcountCounts, PricingPowerCounts,
};
pub use comparison::{ComparisonResult, CompanyMetrics, PeerGroupStats};
pub use partner::{NormalizedPartner, PartnerAudit, PartnerAuditRequest};
