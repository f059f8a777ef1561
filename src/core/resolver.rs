use crate::core::hierarchy;
use crate::core::scoring::{self, ScoringWeights};
use crate::domain::model::{PostcodeFragment, ResolutionResult, SearchCandidate};
use crate::domain::ports::{ConfigProvider, SearchClient};
use crate::utils::error::{ResolveError, Result};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_COUNTRY_SUFFIX: &str = "United Kingdom";
/// Upstream allows one request per second.
pub const DEFAULT_QUERY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub country_suffix: String,
    pub query_delay: Duration,
    pub weights: ScoringWeights,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            country_suffix: DEFAULT_COUNTRY_SUFFIX.to_string(),
            query_delay: DEFAULT_QUERY_DELAY,
            weights: ScoringWeights::default(),
        }
    }
}

impl ResolverSettings {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            country_suffix: config.country_suffix().to_string(),
            query_delay: config.query_delay(),
            weights: config.scoring_weights(),
        }
    }
}

/// Walks the postcode hierarchy from most to least specific and stops at the
/// first fragment whose best candidate is confident enough.
///
/// Holds no per-request state, so one resolver can serve concurrent calls.
pub struct BoundaryResolver<S: SearchClient> {
    client: S,
    settings: ResolverSettings,
}

impl<S: SearchClient> BoundaryResolver<S> {
    pub fn new(client: S, settings: ResolverSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn query_for(&self, fragment: &PostcodeFragment) -> String {
        if self.settings.country_suffix.is_empty() {
            fragment.to_string()
        } else {
            format!("{}, {}", fragment, self.settings.country_suffix)
        }
    }

    pub async fn resolve(&self, postcode: &str, cancel: &CancellationToken) -> Result<ResolutionResult> {
        let fragments = hierarchy::generate(postcode);
        if fragments.is_empty() {
            return Err(ResolveError::InvalidInput);
        }

        tracing::info!(
            "Resolving '{}' via {} fragment(s): {}",
            postcode.trim(),
            fragments.len(),
            fragments.iter().map(PostcodeFragment::as_str).collect::<Vec<_>>().join(" -> ")
        );

        let mut attempted: Vec<PostcodeFragment> = Vec::with_capacity(fragments.len());

        for (index, fragment) in fragments.iter().enumerate() {
            if index > 0 {
                self.pause(cancel).await?;
            }
            if cancel.is_cancelled() {
                return Err(ResolveError::Cancelled);
            }

            attempted.push(fragment.clone());

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ResolveError::Cancelled),
                response = self.search_fragment(fragment) => response,
            };

            let candidates = match response {
                Ok(candidates) => candidates,
                Err(e) => {
                    tracing::warn!("⚠️ {}; trying a broader fragment", e);
                    continue;
                }
            };

            tracing::debug!("{} candidate(s) returned for {}", candidates.len(), fragment);

            match scoring::select_best(candidates, fragment, &self.settings.weights) {
                Some(best) => {
                    tracing::info!(
                        "✅ Accepted '{}' for {} (score {:.1})",
                        best.candidate.display_name,
                        fragment,
                        best.score
                    );
                    return Ok(ResolutionResult {
                        fragment: fragment.clone(),
                        candidate: best.candidate,
                        score: best.score,
                        attempted,
                    });
                }
                None => {
                    tracing::info!("No confident boundary for {}", fragment);
                }
            }
        }

        Err(ResolveError::NoBoundaryFound {
            attempted: attempted.iter().map(PostcodeFragment::to_string).collect(),
        })
    }

    /// One upstream search, with any failure reported against `fragment`.
    async fn search_fragment(&self, fragment: &PostcodeFragment) -> Result<Vec<SearchCandidate>> {
        let query = self.query_for(fragment);
        tracing::debug!("Searching for: {}", query);

        self.client.search(&query).await.map_err(|e| {
            let message = match e {
                ResolveError::UpstreamUnavailable { message, .. } => message,
                other => other.to_string(),
            };
            ResolveError::UpstreamUnavailable {
                fragment: fragment.to_string(),
                message,
            }
        })
    }

    /// Rate-limit wait between two queries; wakes early on cancellation.
    async fn pause(&self, cancel: &CancellationToken) -> Result<()> {
        if self.settings.query_delay.is_zero() {
            return Ok(());
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ResolveError::Cancelled),
            _ = tokio::time::sleep(self.settings.query_delay) => Ok(()),
        }
    }
}
