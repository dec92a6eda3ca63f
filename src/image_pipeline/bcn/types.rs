//! Types shared by the block decoder

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Edge length of a compressed tile in texels.
pub const TILE_SIZE: usize = 4;

/// Block-compressed pixel formats the decoder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One channel, one block per tile
    Bc4,
    /// Two channels, a red block followed by a green block per tile
    Bc5,
}

impl PixelFormat {
    /// Number of 8-byte blocks stored for each 4x4 tile.
    pub fn blocks_per_tile(self) -> usize {
        match self {
            PixelFormat::Bc4 => 1,
            PixelFormat::Bc5 => 2,
        }
    }
}

/// Image size in texels. Both sides are non-zero multiples of [`TILE_SIZE`], and
/// the decoded RGB buffer size fits in `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageGeometry {
    width: usize,
    height: usize,
}

impl ImageGeometry {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 || width % TILE_SIZE != 0 || height % TILE_SIZE != 0 {
            return Err(ConversionError::MalformedGeometry { width, height });
        }
        width
            .checked_mul(height)
            .and_then(|texels| texels.checked_mul(3))
            .ok_or(ConversionError::MalformedGeometry { width, height })?;
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tiles(&self) -> usize {
        (self.width / TILE_SIZE) * (self.height / TILE_SIZE)
    }

    /// Total blocks a full image of `format` occupies in the stream.
    pub fn block_count(&self, format: PixelFormat) -> usize {
        self.tiles() * format.blocks_per_tile()
    }
}

/// Decoded RGB image data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<u8>,
}

impl RgbImageData {
    /// Zero-filled image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width * height * 3],
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let offset = (y * self.width + x) * 3;
        [self.data[offset], self.data[offset + 1], self.data[offset + 2]]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let offset = (y * self.width + x) * 3;
        self.data[offset..offset + 3].copy_from_slice(&rgb);
    }
}
