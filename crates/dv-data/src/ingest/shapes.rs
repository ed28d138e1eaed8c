//! Country shapes from a GeoJSON feature collection

use std::convert::TryFrom;

use dv_core::{CountryShape, ShapeGeometry};
use geojson::{feature::Id, Feature, GeoJson};
use serde_json::Value;

use crate::DataError;

/// Parse a GeoJSON `FeatureCollection` into unreconciled country shapes.
///
/// Features without a polygonal geometry are skipped; a document that is not
/// a feature collection is an error.
pub fn parse_shapes(source_name: &str, text: &str) -> Result<Vec<CountryShape>, DataError> {
    let document = text.parse::<GeoJson>()?;
    let collection = match document {
        GeoJson::FeatureCollection(collection) => collection,
        _ => {
            return Err(DataError::GeoJson(format!(
                "{}: expected a FeatureCollection",
                source_name
            )))
        }
    };

    let total = collection.features.len();
    let mut shapes = Vec::with_capacity(total);
    for feature in collection.features {
        if let Some(shape) = feature_to_shape(source_name, feature)? {
            shapes.push(shape);
        }
    }

    tracing::info!("{}: {} of {} features are country shapes", source_name, shapes.len(), total);
    Ok(shapes)
}

fn feature_to_shape(source_name: &str, feature: Feature) -> Result<Option<CountryShape>, DataError> {
    let raw_id = feature_id(&feature);
    let name = feature
        .property("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let Some(geometry) = feature.geometry else {
        tracing::debug!("{}: feature {:?} has no geometry", source_name, name);
        return Ok(None);
    };

    let geometry = match geo_types::Geometry::<f64>::try_from(geometry)? {
        geo_types::Geometry::Polygon(polygon) => ShapeGeometry::Polygon(polygon),
        geo_types::Geometry::MultiPolygon(multi) => ShapeGeometry::MultiPolygon(multi),
        _ => {
            tracing::debug!("{}: feature {:?} is not polygonal", source_name, name);
            return Ok(None);
        }
    };

    Ok(Some(CountryShape { raw_id, name, geometry }))
}

/// Feature id, falling back to an `id` property
fn feature_id(feature: &Feature) -> Option<String> {
    match &feature.id {
        Some(Id::String(s)) => return Some(s.clone()),
        Some(Id::Number(n)) => return Some(n.to_string()),
        None => {}
    }
    match feature.property("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "250",
                "properties": { "name": "France" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 40], [6, 40], [6, 48], [0, 48], [0, 40]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Canada", "id": 124 },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-120, 50], [-60, 50], [-60, 70], [-120, 70], [-120, 50]]],
                        [[[-70, 45], [-65, 45], [-65, 48], [-70, 48], [-70, 45]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "id": 1,
                "properties": { "name": "Marker" },
                "geometry": { "type": "Point", "coordinates": [0, 0] }
            },
            {
                "type": "Feature",
                "id": 2,
                "properties": null,
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_polygonal_features() {
        let shapes = parse_shapes("world", SHAPES).unwrap();
        assert_eq!(shapes.len(), 2);

        assert_eq!(shapes[0].raw_id.as_deref(), Some("250"));
        assert_eq!(shapes[0].name, "France");
        assert!(matches!(shapes[0].geometry, ShapeGeometry::Polygon(_)));

        assert_eq!(shapes[1].raw_id.as_deref(), Some("124"));
        match &shapes[1].geometry {
            ShapeGeometry::MultiPolygon(multi) => assert_eq!(multi.0.len(), 2),
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_collection() {
        let point = r#"{ "type": "Point", "coordinates": [0, 0] }"#;
        assert!(matches!(parse_shapes("world", point), Err(DataError::GeoJson(_))));
        assert!(parse_shapes("world", "not json").is_err());
    }
}
