//! Tile identifiers used by the loading pipeline.

use serde::{Deserialize, Serialize};

/// Tile index.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
pub struct TileIndex {
    /// X index.
    pub x: i32,
    /// Y index.
    pub y: i32,
    /// Z index.
    pub z: u32,
}

impl TileIndex {
    /// Create a new index instance.
    pub fn new(x: i32, y: i32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// Identifier of a tile as it is rendered on the map.
///
/// When no tile data exists for a zoom level, a tile from a lower zoom is
/// reused and scaled up; `overscaled_z` is then the zoom the tile is rendered
/// at while `index` stays the canonical address of the data to fetch. The id
/// is immutable for the lifetime of a tile data object and, together with the
/// pixel ratio, uniquely determines the resource to load.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
pub struct OverscaledTileId {
    /// Zoom level the tile is rendered at. Never less than `index.z`.
    pub overscaled_z: u32,
    /// Canonical index of the tile data.
    pub index: TileIndex,
}

impl OverscaledTileId {
    /// Creates an id that renders the tile at its canonical zoom.
    pub fn new(index: TileIndex) -> Self {
        Self {
            overscaled_z: index.z,
            index,
        }
    }

    /// Creates an id that renders the tile scaled up to `overscaled_z`.
    pub fn overscaled(index: TileIndex, overscaled_z: u32) -> Self {
        Self {
            overscaled_z: overscaled_z.max(index.z),
            index,
        }
    }

    /// Scale factor between the rendered zoom and the canonical zoom.
    pub fn overscale_factor(&self) -> u32 {
        1 << (self.overscaled_z - self.index.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_id_is_not_overscaled() {
        let id = OverscaledTileId::new(TileIndex::new(5, 3, 3));
        assert_eq!(id.overscaled_z, 3);
        assert_eq!(id.overscale_factor(), 1);
    }

    #[test]
    fn overscale_factor_doubles_per_level() {
        let id = OverscaledTileId::overscaled(TileIndex::new(5, 3, 3), 6);
        assert_eq!(id.overscale_factor(), 8);
    }

    #[test]
    fn overscaled_zoom_is_clamped_to_canonical() {
        let id = OverscaledTileId::overscaled(TileIndex::new(5, 3, 3), 1);
        assert_eq!(id.overscaled_z, 3);
        assert_eq!(id.overscale_factor(), 1);
    }
}
