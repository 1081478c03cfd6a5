//! Ortelius is the loading core of a map rendering engine.
//!
//! A map shows tiles: rectangular pieces of imagery or geometry addressed by
//! `(z, x, y)` coordinates. As the user pans and zooms, tiles are requested
//! and discarded far faster than networks and image decoders can keep up, so
//! the heart of this crate is a lifecycle that stays correct under constant
//! cancellation:
//!
//! * [`RasterTileData`](tile_data::RasterTileData) drives one tile through
//!   fetch, decode and texture upload, reporting completion through a
//!   caller-supplied [`TileLoadListener`](tile_data::TileLoadListener);
//! * [`AsyncRequest`](async_request::AsyncRequest) handles make every stage
//!   cancellable: dropping a handle guarantees its completion stage never
//!   runs;
//! * [`Workers`](workers::Workers) dispatches CPU-bound decode jobs to
//!   background threads;
//! * [`FileSource`](source::FileSource) implementations retrieve encoded
//!   payloads from the network or a persistent cache.
//!
//! Once a tile is loaded, the renderer borrows its
//! [`Bucket`](bucket::Bucket) through
//! [`TileData::get_bucket`](tile_data::TileData::get_bucket), which for
//! vector-derived buckets consults the style layer filters from the
//! [`ortelius_style`] crate.
//!
//! The pipeline never blocks the calling thread: construction starts the
//! fetch and returns, completion arrives via the listener on an unspecified
//! thread, and `cancel` only revokes handles. All public methods are intended
//! to be called from within a tokio runtime.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub(crate) mod async_runtime;
pub mod async_request;
pub mod bucket;
pub mod decoded_image;
pub mod error;
pub mod source;
pub mod texture;
pub mod tile_data;
pub mod tile_id;
pub mod workers;

pub use error::{OrteliusError, TileLoadError};
pub use tile_data::{RasterTileData, TileData, TileLoadListener, TileLoadState};
pub use tile_id::{OverscaledTileId, TileIndex};

// Reexport ortelius_style
pub use ortelius_style;
