//! Texture pool collaborator interface.

use maybe_sync::{MaybeSend, MaybeSync};

use crate::decoded_image::DecodedImage;
use crate::error::OrteliusError;

/// Opaque handle of a texture allocated from a [`TexturePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    id: u64,
    width: u32,
    height: u32,
}

impl TextureHandle {
    /// Creates a handle. Pool implementations assign the ids.
    pub fn new(id: u64, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    /// Pool-assigned id of the texture.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Width of the texture in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the texture in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Pool of GPU texture resources shared by all tiles.
///
/// The pool serializes allocation internally; `allocate` and `release` are
/// called from worker threads and from bucket destructors.
pub trait TexturePool: MaybeSend + MaybeSync {
    /// Uploads the image and returns a handle of the new texture.
    fn allocate(&self, image: &DecodedImage) -> Result<TextureHandle, OrteliusError>;

    /// Returns the texture to the pool.
    fn release(&self, handle: TextureHandle);
}
