// Defines the trait and data carrier for vacancy source collectors.

mod headhunter;

pub use headhunter::HeadHunter;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;

/// Raw payloads accumulated from a source, unordered, not yet normalized.
#[derive(Debug, Default)]
pub struct CollectedData {
    pub employers: Vec<Value>,
    pub vacancies: Vec<Value>,
}

/// Trait that all vacancy collectors must implement.
/// A collector walks an external source for the given employer IDs and
/// returns the raw employer and vacancy payloads for normalization.
#[async_trait]
pub trait VacancyCollector: Send + Sync {
    /// Human-readable source name.
    #[allow(dead_code)]
    fn name(&self) -> &str;

    /// Connectivity probe against the source endpoints.
    async fn probe(&self) -> Result<(), AppError>;

    /// Fetch employer details and all their vacancies. IDs that fail
    /// validation or the existence check are skipped, never fatal.
    async fn collect(&self, employer_ids: &[i64]) -> Result<CollectedData, AppError>;
}
