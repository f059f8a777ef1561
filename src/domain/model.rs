use serde::{Deserialize, Serialize};
use std::fmt;

/// Uppercase, whitespace-normalized postcode or postcode prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostcodeFragment(String);

impl PostcodeFragment {
    /// Caller guarantees the value is already normalized.
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_full_postcode(&self) -> bool {
        self.0.contains(' ')
    }
}

impl fmt::Display for PostcodeFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PostcodeFragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPolygon,
    Other,
}

/// GeoJSON geometry object passed through untouched to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Geometry(serde_json::Value);

impl Geometry {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn kind(&self) -> GeometryKind {
        match self.0.get("type").and_then(|t| t.as_str()) {
            Some("Point") => GeometryKind::Point,
            Some("LineString") => GeometryKind::LineString,
            Some("Polygon") => GeometryKind::Polygon,
            Some("MultiPolygon") => GeometryKind::MultiPolygon,
            _ => GeometryKind::Other,
        }
    }

    /// Only areal geometries can be drawn as a boundary.
    pub fn is_boundary(&self) -> bool {
        matches!(self.kind(), GeometryKind::Polygon | GeometryKind::MultiPolygon)
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    /// GeoJSON `bbox` member order: west, south, east, north.
    pub fn to_geojson_bbox(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub place_id: Option<u64>,
    pub display_name: String,
    pub classification: String,
    pub subtype: String,
    pub importance: Option<f64>,
    pub structured_postcode: Option<String>,
    pub geometry: Option<Geometry>,
    pub bounding_box: Option<BoundingBox>,
}

impl SearchCandidate {
    pub fn has_boundary_geometry(&self) -> bool {
        self.geometry.as_ref().is_some_and(Geometry::is_boundary)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: SearchCandidate,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct ResolutionResult {
    pub fragment: PostcodeFragment,
    pub candidate: SearchCandidate,
    pub score: f64,
    pub attempted: Vec<PostcodeFragment>,
}

impl ResolutionResult {
    pub fn geometry(&self) -> Option<&Geometry> {
        self.candidate.geometry.as_ref()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.candidate.bounding_box
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_geometry_kind_detection() {
        let polygon = Geometry::new(json!({"type": "Polygon", "coordinates": [[[0.0, 0.0]]]}));
        let multi = Geometry::new(json!({"type": "MultiPolygon", "coordinates": []}));
        let point = Geometry::new(json!({"type": "Point", "coordinates": [0.1, 51.5]}));
        let junk = Geometry::new(json!({"coordinates": []}));

        assert!(polygon.is_boundary());
        assert!(multi.is_boundary());
        assert!(!point.is_boundary());
        assert_eq!(junk.kind(), GeometryKind::Other);
    }

    #[test]
    fn test_geojson_bbox_order() {
        let bbox = BoundingBox { south: 51.0, north: 52.0, west: -0.2, east: 0.1 };
        assert_eq!(bbox.to_geojson_bbox(), [-0.2, 51.0, 0.1, 52.0]);
    }
}
