pub mod company_directory;
pub mod comparison_service;
pub mod macro_service;
pub mod metrics;
pub mod partner_normalizer;
pub mod quarter_selector;
