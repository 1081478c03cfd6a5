//! Tile data lifecycle: asynchronous loading, cancellation, buckets.
//!
//! A tile data object owns everything one tile needs while it is on screen:
//! the outstanding fetch and decode requests, the renderable
//! [`Bucket`](crate::bucket::Bucket) once loading succeeded, and the protocol
//! that tells the owner about completion. Tiles are requested and discarded
//! rapidly while the map moves, so the lifecycle is built around one hard
//! guarantee: after [`TileData::cancel`] returns, the completion listener is
//! never invoked again and no background job touches the tile's state.

mod raster;
pub use raster::{RasterTileData, RasterTileResource};

use std::sync::Arc;

use maybe_sync::{MaybeSend, MaybeSync};
use ortelius_style::StyleLayer;

use crate::bucket::Bucket;
use crate::error::TileLoadError;
use crate::tile_id::OverscaledTileId;

/// Load state of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileLoadState {
    /// Fetch or decode is still outstanding.
    Loading,
    /// The last load attempt completed; a bucket may be present.
    Loaded,
    /// The last load attempt failed. The tile stays failed until it is
    /// constructed anew.
    Error,
    /// The tile was cancelled; no listener notification will ever follow.
    Cancelled,
}

/// Receiver of tile load completion notifications.
///
/// For every load attempt of a tile the listener is notified at most once,
/// with `Ok(())` on success or the error that stopped the attempt. The
/// notification may arrive on any thread, but never after the tile was
/// cancelled.
pub trait TileLoadListener: MaybeSend + MaybeSync {
    /// Called when a load attempt of tile `id` completes.
    fn tile_load_complete(&self, id: OverscaledTileId, result: Result<(), TileLoadError>);
}

impl<F> TileLoadListener for F
where
    F: Fn(OverscaledTileId, Result<(), TileLoadError>) + MaybeSend + MaybeSync,
{
    fn tile_load_complete(&self, id: OverscaledTileId, result: Result<(), TileLoadError>) {
        self(id, result)
    }
}

/// One tile's loading lifecycle.
///
/// Implementations are owned by a single caller thread; completion arrives
/// through the [`TileLoadListener`] supplied at construction. None of the
/// methods block.
pub trait TileData: MaybeSend + MaybeSync {
    /// Identifier the tile data was constructed for. A tile data object is
    /// never reused for another id.
    fn id(&self) -> OverscaledTileId;

    /// Current load state.
    fn load_state(&self) -> TileLoadState;

    /// Cancels loading.
    ///
    /// Idempotent and safe to call at any point of the lifecycle. After this
    /// method returns the listener is guaranteed not to be invoked again, all
    /// outstanding request handles are released, and a bucket that was
    /// already produced is discarded: cancellation means the tile is no
    /// longer wanted.
    fn cancel(&self);

    /// Returns the tile's bucket if one exists and applies to `layer`.
    ///
    /// Returns `None` while the tile is loading, after a failed or cancelled
    /// load, and for layers the tile kind cannot serve.
    fn get_bucket(&self, layer: &StyleLayer) -> Option<Arc<dyn Bucket>>;
}
