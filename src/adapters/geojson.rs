use crate::core::{BoundaryRenderer, BoundingBox, Geometry, PostcodeFragment, SearchCandidate, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::json;

/// Writes the accepted boundary as a one-feature GeoJSON `FeatureCollection`,
/// so any map viewer can draw it and frame the viewport from `bbox`.
pub struct GeoJsonRenderer<S: Storage> {
    storage: S,
    base_path: String,
}

impl<S: Storage> GeoJsonRenderer<S> {
    pub fn new(storage: S, base_path: String) -> Self {
        Self { storage, base_path }
    }

    /// Only ASCII letters and digits survive; anything else, separators and
    /// dots included, becomes `_` so the file stays inside `base_path`.
    pub fn file_name(fragment: &PostcodeFragment) -> String {
        let stem: String = fragment
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{}.geojson", stem)
    }

    pub fn feature_collection(
        fragment: &PostcodeFragment,
        candidate: &SearchCandidate,
        geometry: &Geometry,
        bounds: Option<BoundingBox>,
    ) -> serde_json::Value {
        let mut feature = json!({
            "type": "Feature",
            "geometry": geometry.as_json(),
            "properties": {
                "fragment": fragment.as_str(),
                "display_name": candidate.display_name,
                "class": candidate.classification,
                "type": candidate.subtype,
                "place_id": candidate.place_id,
                "postcode": candidate.structured_postcode,
                "resolved_at": chrono::Utc::now().to_rfc3339(),
            }
        });

        let mut collection = json!({
            "type": "FeatureCollection",
            "features": [],
        });

        if let Some(bbox) = bounds {
            let bbox = bbox.to_geojson_bbox();
            feature["bbox"] = json!(bbox);
            collection["bbox"] = json!(bbox);
        }
        collection["features"] = json!([feature]);
        collection
    }
}

#[async_trait]
impl<S: Storage> BoundaryRenderer for GeoJsonRenderer<S> {
    async fn render(
        &self,
        fragment: &PostcodeFragment,
        candidate: &SearchCandidate,
        geometry: &Geometry,
        bounds: Option<BoundingBox>,
    ) -> Result<String> {
        let file_name = Self::file_name(fragment);
        let document = Self::feature_collection(fragment, candidate, geometry, bounds);
        let data = serde_json::to_vec_pretty(&document)?;

        tracing::debug!("Writing GeoJSON ({} bytes) as {}", data.len(), file_name);
        self.storage.write_file(&file_name, &data).await?;

        Ok(format!("{}/{}", self.base_path.trim_end_matches('/'), file_name))
    }
}
