use crate::core::{BoundingBox, ConfigProvider, Geometry, SearchCandidate, SearchClient};
use crate::utils::error::{ResolveError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = concat!("postcode-boundary/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_RESULT_LIMIT: usize = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One record of a Nominatim `/search` response (`format=json`).
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub place_id: Option<u64>,
    #[serde(default)]
    pub display_name: String,
    // jsonv2 renames `class` to `category`
    #[serde(default, alias = "category")]
    pub class: String,
    #[serde(default, rename = "type")]
    pub place_type: String,
    pub importance: Option<f64>,
    pub address: Option<NominatimAddress>,
    pub geojson: Option<serde_json::Value>,
    pub boundingbox: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NominatimAddress {
    pub postcode: Option<String>,
}

impl NominatimPlace {
    /// `boundingbox` arrives as four decimal strings: south, north, west, east.
    fn bounding_box(&self) -> Option<BoundingBox> {
        let parts = self.boundingbox.as_ref()?;
        if parts.len() != 4 {
            return None;
        }
        let values: Vec<f64> = parts.iter().filter_map(|p| p.trim().parse().ok()).collect();
        match values.as_slice() {
            [south, north, west, east] => Some(BoundingBox {
                south: *south,
                north: *north,
                west: *west,
                east: *east,
            }),
            _ => None,
        }
    }
}

impl From<NominatimPlace> for SearchCandidate {
    fn from(place: NominatimPlace) -> Self {
        let bounding_box = place.bounding_box();
        SearchCandidate {
            place_id: place.place_id,
            display_name: place.display_name,
            classification: place.class,
            subtype: place.place_type,
            importance: place.importance,
            structured_postcode: place.address.and_then(|a| a.postcode),
            geometry: place.geojson.map(Geometry::new),
            bounding_box,
        }
    }
}

pub struct NominatimClient {
    client: Client,
    search_url: String,
    user_agent: String,
    timeout: Duration,
    limit: usize,
}

impl NominatimClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            search_url: format!("{}/search", endpoint.trim_end_matches('/')),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.search_endpoint())
            .with_user_agent(config.user_agent())
            .with_timeout(config.request_timeout())
            .with_limit(config.result_limit())
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
impl SearchClient for NominatimClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>> {
        tracing::debug!("Making search request to: {} (q={})", self.search_url, query);

        let limit = self.limit.to_string();
        let response = self
            .client
            .get(&self.search_url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("polygon_geojson", "1"),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Search response status: {}", status);

        if !status.is_success() {
            return Err(ResolveError::UpstreamUnavailable {
                fragment: query.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        Ok(places.into_iter().map(SearchCandidate::from).collect())
    }
}
