use crate::adapters::{GeoJsonRenderer, NominatimClient};
use crate::config::cli::LocalStorage;
use crate::core::resolver::{BoundaryResolver, ResolverSettings};
use crate::core::{BoundaryRenderer, ConfigProvider, ResolutionResult};
use crate::utils::error::{ResolveError, Result};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct SessionOutcome {
    pub result: ResolutionResult,
    pub output_file: Option<String>,
}

/// Resolve one postcode against the configured search backend and, when an
/// output path is configured, hand the boundary to the GeoJSON renderer.
pub async fn run_resolution<C: ConfigProvider>(
    config: &C,
    postcode: &str,
    cancel: &CancellationToken,
) -> Result<SessionOutcome> {
    let client = NominatimClient::from_config(config);
    let resolver = BoundaryResolver::new(client, ResolverSettings::from_config(config));

    let result = resolver.resolve(postcode, cancel).await?;

    let output_file = match (config.output_path(), result.geometry()) {
        (Some(path), Some(geometry)) => {
            let renderer = GeoJsonRenderer::new(LocalStorage::new(path.to_string()), path.to_string());
            let written = renderer
                .render(&result.fragment, &result.candidate, geometry, result.bounding_box())
                .await?;
            tracing::info!("📁 Boundary written to: {}", written);
            Some(written)
        }
        _ => None,
    };

    Ok(SessionOutcome { result, output_file })
}

/// Resolve several postcodes in order, calling `report` after each one.
///
/// The upstream rate limit spans postcodes too, so the configured query delay
/// also separates the last query of one postcode from the first of the next.
/// Returns how many postcodes failed; a cancellation stops the batch.
pub async fn run_batch<C, F>(
    config: &C,
    postcodes: &[String],
    cancel: &CancellationToken,
    mut report: F,
) -> usize
where
    C: ConfigProvider,
    F: FnMut(&str, &Result<SessionOutcome>),
{
    let delay = config.query_delay();
    let mut failures = 0;

    for (index, postcode) in postcodes.iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            let paused = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(ResolveError::Cancelled),
                _ = tokio::time::sleep(delay) => Ok(()),
            };
            if let Err(e) = paused {
                report(postcode.as_str(), &Err(e));
                failures += 1;
                break;
            }
        }

        let outcome = run_resolution(config, postcode, cancel).await;
        if outcome.is_err() {
            failures += 1;
        }
        report(postcode.as_str(), &outcome);

        if cancel.is_cancelled() {
            break;
        }
    }

    failures
}

/// Cancel `token` when the process receives Ctrl-C.
pub fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, abandoning resolution");
            token.cancel();
        }
    });
}

pub fn print_outcome(outcome: &SessionOutcome) {
    let result = &outcome.result;
    println!("✅ Boundary found for {}", result.fragment);
    println!("   {}", result.candidate.display_name);
    println!(
        "   {}/{} (score {:.1})",
        result.candidate.classification, result.candidate.subtype, result.score
    );
    if let Some(bbox) = result.bounding_box() {
        println!(
            "   bounds: south {:.5}, north {:.5}, west {:.5}, east {:.5}",
            bbox.south, bbox.north, bbox.west, bbox.east
        );
    }
    if result.attempted.len() > 1 {
        let attempted: Vec<&str> = result.attempted.iter().map(|f| f.as_str()).collect();
        println!("   tried: {}", attempted.join(" -> "));
    }
    if let Some(file) = &outcome.output_file {
        println!("📁 Output saved to: {}", file);
    }
}
