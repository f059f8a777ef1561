pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use adapters::{GeoJsonRenderer, NominatimClient};
pub use core::resolver::{BoundaryResolver, ResolverSettings};
pub use core::scoring::ScoringWeights;
pub use utils::error::{ResolveError, Result};
pub use tokio_util::sync::CancellationToken;
