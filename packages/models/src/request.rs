//! Request bodies accepted by the HTTP surface.

use serde::Deserialize;

/// A GeoJSON feature; only the geometry member is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<serde_json::Value>,
}

/// Body of every query endpoint: a GeoJSON `Feature` or `FeatureCollection`
/// plus, for the competitor endpoints, the NAF activity code to match.
///
/// The geometry is kept as raw JSON here; the handlers validate its type
/// and hand the serialized geometry to the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoRequest {
    /// Activity code filter; required by the competitor endpoints.
    #[serde(rename = "nafCode", default)]
    pub naf_code: Option<String>,
    /// `"Feature"` or `"FeatureCollection"`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub geometry: Option<serde_json::Value>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl GeoRequest {
    /// Extracts the geometry object this request targets: the direct
    /// geometry of a `Feature`, or the first feature's geometry of a
    /// `FeatureCollection`.
    #[must_use]
    pub fn geometry(&self) -> Option<&serde_json::Value> {
        match self.kind.as_str() {
            "Feature" => self.geometry.as_ref(),
            "FeatureCollection" => self.features.first().and_then(|f| f.geometry.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_geometry_is_taken_directly() {
        let req: GeoRequest = serde_json::from_str(
            r#"{"nafCode":"56.30Z","type":"Feature","geometry":{"type":"Polygon","coordinates":[]}}"#,
        )
        .unwrap();
        assert_eq!(req.naf_code.as_deref(), Some("56.30Z"));
        assert_eq!(req.geometry().unwrap()["type"], "Polygon");
    }

    #[test]
    fn feature_collection_uses_first_feature() {
        let req: GeoRequest = serde_json::from_str(
            r#"{"type":"FeatureCollection","features":[
                {"geometry":{"type":"Polygon","coordinates":[]}},
                {"geometry":{"type":"Point","coordinates":[0,0]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(req.geometry().unwrap()["type"], "Polygon");
    }

    #[test]
    fn unknown_kind_has_no_geometry() {
        let req: GeoRequest =
            serde_json::from_str(r#"{"type":"GeometryCollection"}"#).unwrap();
        assert!(req.geometry().is_none());
    }
}
