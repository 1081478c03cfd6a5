use std::sync::Arc;

use bytes::Bytes;
use ortelius_style::{LayerType, StyleLayer};
use parking_lot::{Mutex, MutexGuard};

use super::{TileData, TileLoadListener, TileLoadState};
use crate::async_request::AsyncRequest;
use crate::bucket::{Bucket, RasterBucket};
use crate::decoded_image::DecodedImage;
use crate::error::TileLoadError;
use crate::source::{FileSource, UrlSource};
use crate::texture::TexturePool;
use crate::tile_id::OverscaledTileId;
use crate::workers::Workers;

/// Parameters identifying the remote resource of a raster tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterTileResource {
    /// Tile id.
    pub id: OverscaledTileId,
    /// Device pixel ratio the tile will be displayed at. Sources with
    /// high-dpi tile sets serve larger images for ratios above 1.
    pub pixel_ratio: f32,
}

/// Tile data of a raster tile.
///
/// Loading runs in two chained asynchronous stages. The fetch stage retrieves
/// the encoded image bytes through the [`FileSource`]; the decode stage runs
/// on the [`Workers`] pool, decodes the image, uploads it to the
/// [`TexturePool`] and stores the resulting [`RasterBucket`]. Completion of
/// every load attempt is reported once through the [`TileLoadListener`].
///
/// Each stage holds its own [`AsyncRequest`] slot. Cancelling the tile (or
/// dropping it) revokes both slots, and every stage re-checks the tile state
/// before committing, so a job that finishes after cancellation or after a
/// superseding [`refresh`](RasterTileData::refresh) discards its result
/// instead of touching the tile.
pub struct RasterTileData {
    inner: Arc<TileInner>,
}

struct TileInner {
    id: OverscaledTileId,
    url: String,
    source: Arc<dyn FileSource>,
    workers: Workers,
    textures: Arc<dyn TexturePool>,
    listener: Arc<dyn TileLoadListener>,
    state: Mutex<TileState>,
}

struct TileState {
    load_state: TileLoadState,
    attempt: u64,
    bucket: Option<Arc<dyn Bucket>>,
    fetch: Option<AsyncRequest>,
    decode: Option<AsyncRequest>,
}

impl TileState {
    fn is_current(&self, attempt: u64) -> bool {
        self.load_state != TileLoadState::Cancelled && self.attempt == attempt
    }
}

impl RasterTileData {
    /// Creates the tile data and immediately begins loading.
    ///
    /// The url of the tile is resolved once from `url_source`; the id and
    /// pixel ratio of `resource` never change afterwards. Construction only
    /// spawns the fetch and returns, it never blocks. Must be called within a
    /// tokio runtime.
    pub fn new(
        resource: RasterTileResource,
        url_source: impl UrlSource<RasterTileResource>,
        source: Arc<dyn FileSource>,
        workers: Workers,
        textures: Arc<dyn TexturePool>,
        listener: Arc<dyn TileLoadListener>,
    ) -> Self {
        let inner = Arc::new(TileInner {
            id: resource.id,
            url: url_source(&resource),
            source,
            workers,
            textures,
            listener,
            state: Mutex::new(TileState {
                load_state: TileLoadState::Loading,
                attempt: 0,
                bucket: None,
                fetch: None,
                decode: None,
            }),
        });

        TileInner::start_fetch(&inner);

        Self { inner }
    }

    /// Requests the tile payload anew, e.g. after the source data changed.
    ///
    /// Starts a new load attempt; a decode still outstanding from the
    /// previous attempt is superseded and its result is discarded when it
    /// arrives. The previous bucket stays available until the new attempt
    /// produces one. No-op on an errored or cancelled tile: a failed tile
    /// stays failed until it is constructed anew.
    pub fn refresh(&self) {
        TileInner::start_fetch(&self.inner);
    }
}

impl TileData for RasterTileData {
    fn id(&self) -> OverscaledTileId {
        self.inner.id
    }

    fn load_state(&self) -> TileLoadState {
        self.inner.state.lock().load_state
    }

    fn cancel(&self) {
        self.inner.cancel();
    }

    fn get_bucket(&self, layer: &StyleLayer) -> Option<Arc<dyn Bucket>> {
        // Raster imagery has no discrete features, so layer filters do not
        // apply; only the layer type is checked.
        if layer.layer_type != LayerType::Raster {
            return None;
        }

        self.inner.state.lock().bucket.clone()
    }
}

impl Drop for RasterTileData {
    fn drop(&mut self) {
        self.inner.cancel();
    }
}

impl TileInner {
    fn start_fetch(inner: &Arc<TileInner>) {
        let mut state = inner.state.lock();
        if matches!(
            state.load_state,
            TileLoadState::Cancelled | TileLoadState::Error
        ) {
            return;
        }

        state.attempt += 1;
        let attempt = state.attempt;

        log::trace!("Loading tile {:?} from url {}", inner.id, inner.url);

        let inner_clone = inner.clone();
        let request = AsyncRequest::spawn(move |liveness| async move {
            let result = inner_clone.source.load(&inner_clone.url).await;
            if !liveness.is_live() {
                return;
            }

            Self::fetch_complete(&inner_clone, attempt, result);
        });

        // Installing the new request into the slot drops, and thereby
        // cancels, whatever request was there before.
        state.fetch = Some(request);
    }

    fn fetch_complete(
        inner: &Arc<TileInner>,
        attempt: u64,
        result: Result<Option<Bytes>, TileLoadError>,
    ) {
        let mut state = inner.state.lock();
        if !state.is_current(attempt) {
            log::trace!("Discarding superseded fetch result for tile {:?}", inner.id);
            return;
        }

        match result {
            Err(error) => {
                log::debug!("Failed to load tile {:?}: {error}", inner.id);
                state.load_state = TileLoadState::Error;
                state.bucket = None;
                inner.complete(state, Err(error));
            }
            Ok(None) => {
                // Nothing new to decode; the attempt is done and whatever
                // bucket the tile already has stays valid.
                state.load_state = TileLoadState::Loaded;
                inner.complete(state, Ok(()));
            }
            Ok(Some(bytes)) => {
                log::trace!(
                    "Tile {:?} loaded. Byte size: {}. Scheduling decode.",
                    inner.id,
                    bytes.len()
                );
                state.decode = Some(Self::start_decode(inner, attempt, bytes));
            }
        }
    }

    fn start_decode(inner: &Arc<TileInner>, attempt: u64, bytes: Bytes) -> AsyncRequest {
        let textures = inner.textures.clone();
        let job = move || -> Result<Arc<dyn Bucket>, TileLoadError> {
            let image = DecodedImage::decode(&bytes).map_err(|error| {
                log::debug!("Failed to decode tile image: {error}");
                TileLoadError::Decoding
            })?;
            let texture = textures.allocate(&image).map_err(|error| {
                log::warn!("Failed to allocate tile texture: {error}");
                TileLoadError::Decoding
            })?;

            Ok(Arc::new(RasterBucket::new(texture, textures.clone())))
        };

        let inner_clone = inner.clone();
        inner.workers.submit(job, move |result| {
            Self::decode_complete(&inner_clone, attempt, result)
        })
    }

    fn decode_complete(
        inner: &Arc<TileInner>,
        attempt: u64,
        result: Result<Arc<dyn Bucket>, TileLoadError>,
    ) {
        let mut state = inner.state.lock();
        if !state.is_current(attempt) {
            log::trace!(
                "Discarding superseded decode result for tile {:?}",
                inner.id
            );
            return;
        }

        let outcome = match result {
            Ok(bucket) => {
                state.bucket = Some(bucket);
                state.load_state = TileLoadState::Loaded;
                Ok(())
            }
            Err(error) => {
                state.bucket = None;
                state.load_state = TileLoadState::Error;
                Err(error)
            }
        };

        inner.complete(state, outcome);
    }

    /// Releases the state lock before notifying, so the listener is free to
    /// call back into the tile.
    fn complete(&self, state: MutexGuard<'_, TileState>, result: Result<(), TileLoadError>) {
        drop(state);
        self.listener.tile_load_complete(self.id, result);
    }

    fn cancel(&self) {
        let mut state = self.state.lock();
        state.load_state = TileLoadState::Cancelled;

        // The bucket is discarded together with the outstanding requests:
        // cancellation means the tile is no longer wanted.
        let bucket = state.bucket.take();
        let fetch = state.fetch.take();
        let decode = state.decode.take();
        drop(state);

        drop(fetch);
        drop(decode);
        drop(bucket);
    }
}
