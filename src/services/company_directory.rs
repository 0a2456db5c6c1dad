use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::info;

use crate::errors::DirectoryError;
use crate::models::{Company, Sector, SubCategory};

/// Registry of tracked companies. Read-only once built.
#[derive(Debug, Clone)]
pub struct CompanyDirectory {
    companies: Vec<Company>,
    index: HashMap<String, usize>,
}

impl CompanyDirectory {
    /// Build a directory, rejecting duplicate tickers (compared case-insensitively)
    pub fn new(companies: Vec<Company>) -> Result<Self, DirectoryError> {
        let mut index = HashMap::with_capacity(companies.len());
        for (i, company) in companies.iter().enumerate() {
            let key = company.ticker.to_uppercase();
            if index.insert(key.clone(), i).is_some() {
                return Err(DirectoryError::DuplicateTicker(key));
            }
        }
        Ok(Self { companies, index })
    }

    /// The companies tracked by default
    pub fn builtin() -> Self {
        use Sector::*;
        use SubCategory::*;

        let companies = vec![
            Company::new("MSFT", "Microsoft", Technology, Hyperscaler).with_fiscal_year_end(6),
            Company::new("GOOGL", "Alphabet", Technology, Hyperscaler),
            Company::new("AMZN", "Amazon", Technology, Hyperscaler),
            Company::new("ORCL", "Oracle", Technology, EnterpriseSoftware).with_fiscal_year_end(5),
            Company::new("CRM", "Salesforce", Technology, EnterpriseSoftware).with_fiscal_year_end(1),
            Company::new("NOW", "ServiceNow", Technology, EnterpriseSoftware),
            Company::new("ADBE", "Adobe", Technology, EnterpriseSoftware).with_fiscal_year_end(11),
            Company::new("AAPL", "Apple", Technology, Hardware).with_fiscal_year_end(9),
            Company::new("DELL", "Dell Technologies", Technology, Hardware).with_fiscal_year_end(1),
            Company::new("NVDA", "NVIDIA", Semiconductors, AiChips).with_fiscal_year_end(1),
            Company::new("AMD", "Advanced Micro Devices", Semiconductors, AiChips),
            Company::new("AVGO", "Broadcom", Semiconductors, AiChips).with_fiscal_year_end(10),
            Company::new("TSM", "Taiwan Semiconductor Manufacturing", Semiconductors, Foundry),
            Company::new("INTC", "Intel", Semiconductors, Foundry),
            Company::new("MU", "Micron Technology", Semiconductors, Memory).with_fiscal_year_end(8),
            Company::new("ASML", "ASML Holding", Semiconductors, Equipment),
            Company::new("AMAT", "Applied Materials", Semiconductors, Equipment).with_fiscal_year_end(10),
            Company::new("META", "Meta Platforms", Communication, SocialMedia),
            Company::new("V", "Visa", Financials, Payments).with_fiscal_year_end(9),
            Company::new("MA", "Mastercard", Financials, Payments),
        ];

        let index = companies
            .iter()
            .enumerate()
            .map(|(i, c)| (c.ticker.clone(), i))
            .collect();
        Self { companies, index }
    }

    /// Load from CSV with header `ticker,name,sector,sub_category,fiscal_year_end_month`
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DirectoryError> {
        let mut csv_reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut companies = Vec::new();
        for row in csv_reader.deserialize::<Company>() {
            let mut company = row?;
            company.ticker = company.ticker.to_uppercase();
            companies.push(company);
        }
        Self::new(companies)
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, DirectoryError> {
        let file = std::fs::File::open(path).map_err(|source| DirectoryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let directory = Self::from_csv_reader(file)?;
        info!("Loaded {} companies from {}", directory.len(), path.display());
        Ok(directory)
    }

    pub fn get(&self, ticker: &str) -> Option<&Company> {
        self.index
            .get(&ticker.trim().to_uppercase())
            .map(|&i| &self.companies[i])
    }

    pub fn all(&self) -> &[Company] {
        &self.companies
    }

    pub fn tickers(&self) -> Vec<String> {
        self.companies.iter().map(|c| c.ticker.clone()).collect()
    }

    pub fn in_sector(&self, sector: Sector) -> Vec<&Company> {
        self.companies.iter().filter(|c| c.sector == sector).collect()
    }

    pub fn in_sub_category(&self, sector: Sector, sub_category: SubCategory) -> Vec<&Company> {
        self.companies
            .iter()
            .filter(|c| c.sector == sector && c.sub_category == sub_category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

impl Default for CompanyDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_is_case_insensitive() {
        let directory = CompanyDirectory::builtin();
        assert_eq!(directory.get("msft").map(|c| c.name.as_str()), Some("Microsoft"));
        assert_eq!(directory.get(" NVDA ").map(|c| c.sector), Some(Sector::Semiconductors));
        assert!(directory.get("NONEXISTENT").is_none());
    }

    #[test]
    fn test_builtin_has_unique_tickers() {
        let directory = CompanyDirectory::builtin();
        assert!(CompanyDirectory::new(directory.all().to_vec()).is_ok());
    }

    #[test]
    fn test_sector_lookups() {
        let directory = CompanyDirectory::builtin();
        let hyperscalers = directory.in_sub_category(Sector::Technology, SubCategory::Hyperscaler);
        assert_eq!(hyperscalers.len(), 3);
        assert!(directory.in_sector(Sector::Technology).len() > hyperscalers.len());
    }

    #[test]
    fn test_csv_directory() {
        let csv = "ticker,name,sector,sub_category,fiscal_year_end_month\n\
                   snow, Snowflake ,technology,enterprise_software,1\n\
                   ARM,Arm Holdings,semiconductors,ai_chips,3\n";
        let directory = CompanyDirectory::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(directory.len(), 2);
        let snow = directory.get("SNOW").unwrap();
        assert_eq!(snow.name, "Snowflake");
        assert_eq!(snow.sub_category, SubCategory::EnterpriseSoftware);
        assert_eq!(snow.fiscal_year_end_month, 1);
    }

    #[test]
    fn test_csv_duplicate_ticker_rejected() {
        let csv = "ticker,name,sector,sub_category,fiscal_year_end_month\n\
                   ARM,Arm,semiconductors,ai_chips,3\n\
                   arm,Arm again,semiconductors,ai_chips,3\n";
        let result = CompanyDirectory::from_csv_reader(csv.as_bytes());
        assert!(matches!(result, Err(DirectoryError::DuplicateTicker(t)) if t == "ARM"));
    }

    #[test]
    fn test_csv_unknown_sector_is_an_error() {
        let csv = "ticker,name,sector,sub_category,fiscal_year_end_month\n\
                   XYZ,Xyz,shipping,other,12\n";
        assert!(CompanyDirectory::from_csv_reader(csv.as_bytes()).is_err());
    }
}
