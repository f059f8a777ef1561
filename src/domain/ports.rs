use crate::core::scoring::ScoringWeights;
use crate::domain::model::{BoundingBox, Geometry, PostcodeFragment, SearchCandidate};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Write-only sink for rendered output, keyed by a path relative to its root.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn search_endpoint(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn result_limit(&self) -> usize;
    fn country_suffix(&self) -> &str;
    fn query_delay(&self) -> Duration;
    fn scoring_weights(&self) -> ScoringWeights;
    fn output_path(&self) -> Option<&str>;
}

/// Free-text geocoding search. Each call is independent and may fail on its own.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>>;
}

/// Receives the accepted boundary for display; returns where it went.
#[async_trait]
pub trait BoundaryRenderer: Send + Sync {
    async fn render(
        &self,
        fragment: &PostcodeFragment,
        candidate: &SearchCandidate,
        geometry: &Geometry,
        bounds: Option<BoundingBox>,
    ) -> Result<String>;
}
