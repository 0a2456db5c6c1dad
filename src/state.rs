use std::sync::Arc;

use crate::services::company_directory::CompanyDirectory;
use crate::store::InsightSource;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<CompanyDirectory>,
    pub source: Arc<dyn InsightSource>,
}

impl AppState {
    pub fn new(directory: CompanyDirectory, source: impl InsightSource + 'static) -> Self {
        Self {
            directory: Arc::new(directory),
            source: Arc::new(source),
        }
    }
}
