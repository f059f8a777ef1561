// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod geojson;
pub mod nominatim;

pub use geojson::GeoJsonRenderer;
pub use nominatim::{NominatimClient, NominatimPlace};
