//! Renderable payloads produced by tile loading.

use std::any::Any;
use std::sync::Arc;

use maybe_sync::{MaybeSend, MaybeSync};
use ortelius_style::{Feature, StyleLayer};

use crate::texture::{TextureHandle, TexturePool};

/// Renderable payload of a loaded tile.
///
/// A bucket is produced by a decode job, exclusively owned by its tile data
/// and only borrowed by the renderer for the duration of a draw call. The
/// concrete shape depends on the tile kind; the renderer downcasts through
/// [`Bucket::as_any`].
pub trait Bucket: MaybeSend + MaybeSync {
    /// The bucket as [`Any`] for downcasting by the renderer.
    fn as_any(&self) -> &dyn Any;
}

/// Bucket of a raster tile: a single texture holding the tile image.
pub struct RasterBucket {
    texture: TextureHandle,
    pool: Arc<dyn TexturePool>,
}

impl RasterBucket {
    /// Wraps a texture allocated from `pool`.
    ///
    /// The texture is returned to the pool when the bucket is dropped.
    pub fn new(texture: TextureHandle, pool: Arc<dyn TexturePool>) -> Self {
        Self { texture, pool }
    }

    /// Texture holding the tile image.
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }
}

impl Bucket for RasterBucket {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for RasterBucket {
    fn drop(&mut self) {
        self.pool.release(self.texture);
    }
}

impl std::fmt::Debug for RasterBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBucket")
            .field("texture", &self.texture)
            .finish()
    }
}

/// Bucket of a vector-derived tile: the features of the tile selected for one
/// style layer.
///
/// Construction consults the layer's filter for every feature. Raster layers
/// have no per-feature filtering and never produce this bucket.
#[derive(Debug, Clone)]
pub struct VectorBucket {
    layer_id: String,
    features: Vec<Feature>,
}

impl VectorBucket {
    /// Builds the bucket for `layer` from a tile's decoded features.
    pub fn build(features: &[Feature], layer: &StyleLayer) -> Self {
        let selected = features
            .iter()
            .filter(|feature| layer.applies_to(*feature))
            .cloned()
            .collect();

        Self {
            layer_id: layer.id.clone(),
            features: selected,
        }
    }

    /// Id of the style layer the bucket was built for.
    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    /// Features selected by the layer's filter.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }
}

impl Bucket for VectorBucket {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use ortelius_style::{FeatureProperties, Filter, GeometryType, PropertyValue};

    use super::*;

    fn road(class: &str) -> Feature {
        Feature {
            id: None,
            properties: HashMap::from([(
                "class".to_string(),
                PropertyValue::String(class.to_string()),
            )]),
            geometry: GeometryType::LineString,
        }
    }

    #[test]
    fn build_applies_layer_filter() {
        let features = [road("motorway"), road("path"), road("street")];
        let filter_json: serde_json::Value =
            serde_json::from_str(r#"["!in", "class", "path"]"#).expect("invalid JSON in test");
        let filter = Filter::parse(&filter_json).expect("failed to parse filter");
        let layer = StyleLayer::vector("roads", Some(filter));

        let bucket = VectorBucket::build(&features, &layer);

        assert_eq!(bucket.layer_id(), "roads");
        assert_eq!(bucket.features().len(), 2);
        assert!(bucket
            .features()
            .iter()
            .all(|feature| feature.property("class").is_some_and(
                |value| !value.eq_value(&PropertyValue::String("path".to_string()))
            )));
    }

    #[test]
    fn build_without_filter_keeps_all_features() {
        let features = [road("motorway"), road("path")];
        let layer = StyleLayer::vector("roads", None);

        let bucket = VectorBucket::build(&features, &layer);
        assert_eq!(bucket.features().len(), 2);
    }
}
