use crate::image_pipeline::bcn::{PassKind, RgbImageData};
use crate::image_pipeline::common::error::Result;

pub trait TextureDecoder {
    /// Declared `(width, height)` of the texture, read without decoding any pixels.
    fn read_dimensions(&self, data: &[u8]) -> Result<(usize, usize)>;
    fn decode_texture(&self, data: &[u8], pass: PassKind) -> Result<RgbImageData>;
}
