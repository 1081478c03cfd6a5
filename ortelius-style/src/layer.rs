use serde::{Deserialize, Serialize};

use crate::feature::FeatureProperties;
use crate::filter::Filter;

/// Kind of tile data a style layer renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    /// Prerendered tile imagery.
    Raster,
    /// Features derived from vector tiles.
    Vector,
}

/// A single layer of a map style.
///
/// Layers are parsed from a style document. A raster layer draws the tile
/// image as is; a vector layer selects features from its source layer using
/// an optional [`Filter`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleLayer {
    /// Identifier of the layer, unique within the style.
    pub id: String,
    /// Kind of data the layer renders.
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    /// Name of the source data layer, for vector layers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,
    /// Filter selecting the features the layer renders. A layer without a
    /// filter renders every feature of its source layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

impl StyleLayer {
    /// Creates a raster layer.
    pub fn raster(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layer_type: LayerType::Raster,
            source_layer: None,
            filter: None,
        }
    }

    /// Creates a vector layer.
    pub fn vector(id: impl Into<String>, filter: Option<Filter>) -> Self {
        Self {
            id: id.into(),
            layer_type: LayerType::Vector,
            source_layer: None,
            filter,
        }
    }

    /// Returns true if the layer renders `feature`.
    pub fn applies_to<F: FeatureProperties + ?Sized>(&self, feature: &F) -> bool {
        match &self.filter {
            Some(filter) => filter.evaluate(feature),
            None => true,
        }
    }
}
