use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::Company;

/// Direction of forward guidance relative to the prior quarter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GuidanceDirection {
    Raised,
    Lowered,
    Maintained,
    #[default]
    #[serde(other)]
    NotProvided,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SupplyChainStatus {
    Improving,
    Stable,
    Constrained,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeadcountTrend {
    Expanding,
    Stable,
    Reducing,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PricingPower {
    Strong,
    Moderate,
    Weak,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Overall tone of a filing as judged by the extraction step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverallSentiment {
    Bullish,
    Bearish,
    #[default]
    #[serde(other)]
    Neutral,
}

/// Average sentiment above this classifies a group as bullish
pub const BULLISH_THRESHOLD: f64 = 0.3;
/// Average sentiment below this classifies a group as bearish
pub const BEARISH_THRESHOLD: f64 = -0.3;

impl OverallSentiment {
    pub fn score(self) -> f64 {
        match self {
            OverallSentiment::Bullish => 1.0,
            OverallSentiment::Bearish => -1.0,
            OverallSentiment::Neutral => 0.0,
        }
    }

    pub fn classify(average_score: f64) -> Self {
        if average_score > BULLISH_THRESHOLD {
            OverallSentiment::Bullish
        } else if average_score < BEARISH_THRESHOLD {
            OverallSentiment::Bearish
        } else {
            OverallSentiment::Neutral
        }
    }
}

/// Structured signals extracted from one company's filing for one fiscal quarter.
///
/// Every field is optional in the stored JSON. Values of the wrong
/// type or outside a known enum decode to the absent/unknown member instead of
/// failing the whole record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InsightRecord {
    /// Period label such as "Q4 2024". Empty when the extraction produced none.
    #[serde(default, deserialize_with = "lenient")]
    pub quarter: String,

    /// Capital expenditure growth, percent
    #[serde(default, deserialize_with = "lenient_number")]
    pub capex_growth: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub guidance_direction: GuidanceDirection,

    #[serde(default, deserialize_with = "lenient")]
    pub ai_investment_mentioned: bool,

    /// Raw partner mentions as extracted, before normalization
    #[serde(default, deserialize_with = "lenient_strings")]
    pub partnerships: Vec<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub supply_chain_status: SupplyChainStatus,

    #[serde(default, deserialize_with = "lenient")]
    pub headcount_trend: HeadcountTrend,

    #[serde(default, deserialize_with = "lenient")]
    pub pricing_power: PricingPower,

    #[serde(default, deserialize_with = "lenient")]
    pub overall_sentiment: OverallSentiment,

    /// Quarterly revenue in millions
    #[serde(default, deserialize_with = "lenient_number")]
    pub revenue: Option<f64>,
}

impl InsightRecord {
    pub fn new(quarter: &str) -> Self {
        Self {
            quarter: quarter.to_string(),
            ..Default::default()
        }
    }
}

/// Everything stored for one company: its metadata plus per-quarter records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyRecordSet {
    pub company: Company,
    #[serde(default)]
    pub insights: Vec<InsightRecord>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CompanyRecordSet {
    pub fn new(company: Company, insights: Vec<InsightRecord>) -> Self {
        Self {
            company,
            insights,
            last_updated: None,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.company.ticker
    }

    pub fn record_for(&self, quarter: &str) -> Option<&InsightRecord> {
        self.insights.iter().find(|r| r.quarter == quarter)
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Accepts JSON numbers and numeric strings ("12.5", "12.5%"). Anything else,
/// including non-finite results, becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_enum_values_decode_as_unknown() {
        let json = r#"{
            "quarter": "Q3 2024",
            "supply_chain_status": "chaotic",
            "headcount_trend": 42,
            "pricing_power": null,
            "guidance_direction": "withdrawn",
            "overall_sentiment": "euphoric"
        }"#;
        let record: InsightRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.supply_chain_status, SupplyChainStatus::Unknown);
        assert_eq!(record.headcount_trend, HeadcountTrend::Unknown);
        assert_eq!(record.pricing_power, PricingPower::Unknown);
        assert_eq!(record.guidance_direction, GuidanceDirection::NotProvided);
        assert_eq!(record.overall_sentiment, OverallSentiment::Neutral);
    }

    #[test]
    fn test_known_values_decode() {
        let json = r#"{
            "quarter": "Q3 2024",
            "capex_growth": 18.5,
            "guidance_direction": "raised",
            "ai_investment_mentioned": true,
            "partnerships": ["Microsoft", "NVIDIA Corp"],
            "supply_chain_status": "improving",
            "overall_sentiment": "bullish",
            "revenue": 61858
        }"#;
        let record: InsightRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.capex_growth, Some(18.5));
        assert_eq!(record.guidance_direction, GuidanceDirection::Raised);
        assert!(record.ai_investment_mentioned);
        assert_eq!(record.partnerships.len(), 2);
        assert_eq!(record.supply_chain_status, SupplyChainStatus::Improving);
        assert_eq!(record.overall_sentiment, OverallSentiment::Bullish);
        assert_eq!(record.revenue, Some(61858.0));
    }

    #[test]
    fn test_malformed_numbers_become_absent() {
        let json = r#"{
            "quarter": "Q1 2024",
            "capex_growth": "not disclosed",
            "revenue": "1,200",
            "partnerships": "Microsoft"
        }"#;
        let record: InsightRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.capex_growth, None);
        assert_eq!(record.revenue, None);
        assert!(record.partnerships.is_empty());
    }

    #[test]
    fn test_percent_string_parses() {
        let json = r#"{ "quarter": "Q1 2024", "capex_growth": "25%" }"#;
        let record: InsightRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.capex_growth, Some(25.0));
    }

    #[test]
    fn test_partnerships_skip_non_strings() {
        let json = r#"{ "quarter": "Q1 2024", "partnerships": ["OpenAI", 7, null, "TSMC"] }"#;
        let record: InsightRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.partnerships, vec!["OpenAI".to_string(), "TSMC".to_string()]);
    }

    #[test]
    fn test_sentiment_classification_thresholds() {
        assert_eq!(OverallSentiment::classify(0.31), OverallSentiment::Bullish);
        assert_eq!(OverallSentiment::classify(0.3), OverallSentiment::Neutral);
        assert_eq!(OverallSentiment::classify(-0.3), OverallSentiment::Neutral);
        assert_eq!(OverallSentiment::classify(-0.31), OverallSentiment::Bearish);
    }

    #[test]
    fn test_sentiment_serde_by_name() {
        for (raw, expected) in [
            ("\"bullish\"", OverallSentiment::Bullish),
            ("\"bearish\"", OverallSentiment::Bearish),
            ("\"neutral\"", OverallSentiment::Neutral),
            ("\"euphoric\"", OverallSentiment::Neutral),
        ] {
            let parsed: OverallSentiment = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, expected);
        }
        assert_eq!(
            serde_json::to_string(&OverallSentiment::Bearish).unwrap(),
            "\"bearish\""
        );
    }
}
