//! Decoded raster images ready for upload to a texture pool.

use crate::error::OrteliusError;

/// An image that has been decoded into RGBA8 pixels.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    bytes: Vec<u8>,
    dimensions: (u32, u32),
}

impl DecodedImage {
    /// Decodes an image from encoded bytes.
    ///
    /// Attempts to guess the format of the image from the data. Non-RGBA
    /// images are converted to RGBA.
    pub fn decode(bytes: &[u8]) -> Result<Self, OrteliusError> {
        use image::GenericImageView;
        let decoded = image::load_from_memory(bytes)?;
        let dimensions = decoded.dimensions();

        Ok(Self {
            bytes: decoded.to_rgba8().into_vec(),
            dimensions,
        })
    }

    /// Creates an image from raw RGBA8 pixel data.
    pub fn from_raw(bytes: Vec<u8>, width: u32, height: u32) -> Result<Self, OrteliusError> {
        if bytes.len() != width as usize * height as usize * 4 {
            return Err(OrteliusError::Generic(format!(
                "invalid image buffer length {} for dimensions {width}x{height}",
                bytes.len()
            )));
        }

        Ok(Self {
            bytes,
            dimensions: (width, height),
        })
    }

    /// Raw RGBA8 pixel data.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Width of the image in pixels.
    pub fn width(&self) -> u32 {
        self.dimensions.0
    }

    /// Height of the image in pixels.
    pub fn height(&self) -> u32 {
        self.dimensions.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer_length() {
        assert!(DecodedImage::from_raw(vec![0; 12], 2, 2).is_err());
        assert!(DecodedImage::from_raw(vec![0; 16], 2, 2).is_ok());
    }

    #[test]
    fn rejects_corrupt_data() {
        assert!(DecodedImage::decode(b"not an image").is_err());
    }
}
