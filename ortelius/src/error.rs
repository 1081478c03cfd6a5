//! Error types used by the crate.

use image::ImageError;
use thiserror::Error;

/// Ortelius error type.
#[derive(Debug, Error)]
pub enum OrteliusError {
    /// I/O error (network or file).
    #[error("failed to load data")]
    Io,
    /// Item not found.
    #[error("item not found")]
    NotFound,
    /// Image decoding error.
    #[error("image decode error: {0:?}")]
    ImageDecode(#[from] ImageError),
    /// Generic error - details are inside.
    #[error("{0}")]
    Generic(String),
    /// Error reading/writing data to the FS.
    #[error("failed to read file")]
    FsIo(#[from] std::io::Error),
}

impl From<reqwest::Error> for OrteliusError {
    fn from(_value: reqwest::Error) -> Self {
        Self::Io
    }
}

/// Error delivered to a tile's completion callback when a load attempt fails.
///
/// Cancellation is not an error: a cancelled tile simply never calls back
/// again. Retry policy belongs to the file source, not to the tile lifecycle,
/// so a failed tile stays failed until it is constructed anew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TileLoadError {
    /// Could not retrieve the tile payload from its source.
    #[error("failed to fetch tile data")]
    Network,
    /// Tile with the given id does not exist at the source.
    #[error("tile does not exist")]
    DoesNotExist,
    /// The tile payload could not be decoded into a renderable resource.
    #[error("failed to decode tile data")]
    Decoding,
}
