use serde::{Deserialize, Serialize};

/// Top-level industry sector of a tracked company
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Technology,
    Semiconductors,
    Communication,
    ConsumerDiscretionary,
    Financials,
    Healthcare,
    Industrials,
    Energy,
}

/// Finer-grained grouping inside a sector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SubCategory {
    Hyperscaler,
    EnterpriseSoftware,
    Hardware,
    AiChips,
    Foundry,
    Memory,
    Equipment,
    SocialMedia,
    Ecommerce,
    Payments,
    Other,
}

/// A tracked company. Static reference data owned by the company directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub ticker: String,
    pub name: String,
    pub sector: Sector,
    pub sub_category: SubCategory,
    /// Month (1-12) the fiscal year closes in
    #[serde(default = "default_fiscal_year_end")]
    pub fiscal_year_end_month: u32,
}

fn default_fiscal_year_end() -> u32 {
    12
}

impl Company {
    pub fn new(ticker: &str, name: &str, sector: Sector, sub_category: SubCategory) -> Self {
        Self {
            ticker: ticker.to_uppercase(),
            name: name.to_string(),
            sector,
            sub_category,
            fiscal_year_end_month: default_fiscal_year_end(),
        }
    }

    pub fn with_fiscal_year_end(mut self, month: u32) -> Self {
        self.fiscal_year_end_month = month;
        self
    }
}
