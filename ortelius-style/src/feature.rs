use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::value::PropertyValue;

/// Geometry type of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GeometryType {
    /// Point or multi-point geometry.
    Point,
    /// Line or multi-line geometry.
    LineString,
    /// Polygon or multi-polygon geometry.
    Polygon,
    /// Geometry of a type the decoder did not recognize.
    #[default]
    Unknown,
}

impl GeometryType {
    /// Name of the type as matched by the `$type` filter key.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::Unknown => "Unknown",
        }
    }
}

/// Read-only view of one feature's typed properties and geometry type.
///
/// This is the only interface the filter evaluator sees; tile decoders
/// implement it over whatever representation they keep features in.
pub trait FeatureProperties {
    /// Returns the value of property `key`, or `None` if the feature has no
    /// such property.
    fn property(&self, key: &str) -> Option<PropertyValue>;

    /// Geometry type of the feature.
    fn geometry_type(&self) -> GeometryType;
}

/// Owned feature backed by a property map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feature {
    /// Feature id from the source data, if any.
    pub id: Option<u64>,
    /// Properties of the feature.
    pub properties: HashMap<String, PropertyValue>,
    /// Geometry type tag.
    pub geometry: GeometryType,
}

impl FeatureProperties for Feature {
    fn property(&self, key: &str) -> Option<PropertyValue> {
        self.properties.get(key).cloned()
    }

    fn geometry_type(&self) -> GeometryType {
        self.geometry
    }
}
