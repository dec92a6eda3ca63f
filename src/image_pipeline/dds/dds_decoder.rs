//! Texture decoder for BC4/BC5 surfaces stored in DDS files.
//!
//! Only the top-level surface is decoded. Mipmaps and array layers that follow
//! it in the file are ignored.

use std::io::Cursor;

use tracing::debug;

use crate::image_pipeline::bcn::{BcDecoder, PassKind, RgbImageData};
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::dds::decoder::TextureDecoder;
use crate::image_pipeline::dds::header::DdsHeader;

pub struct DdsTextureDecoder;

impl TextureDecoder for DdsTextureDecoder {
    fn read_dimensions(&self, data: &[u8]) -> Result<(usize, usize)> {
        let header = DdsHeader::read(&mut Cursor::new(data))?;
        Ok((header.width as usize, header.height as usize))
    }

    /// Parses the DDS header in `data` and decodes the first surface with `pass`.
    ///
    /// # Errors
    ///
    /// * [`ConversionError::InvalidHeader`] - the container header is missing or damaged
    /// * [`ConversionError::UnsupportedFormat`] - the surface is not BC4 or BC5
    /// * [`ConversionError::MalformedGeometry`] - width or height is zero or not a multiple of 4
    /// * [`ConversionError::StreamUnderrun`] - the file ends before the last block
    ///
    /// [`ConversionError::InvalidHeader`]: crate::image_pipeline::ConversionError::InvalidHeader
    /// [`ConversionError::UnsupportedFormat`]: crate::image_pipeline::ConversionError::UnsupportedFormat
    /// [`ConversionError::MalformedGeometry`]: crate::image_pipeline::ConversionError::MalformedGeometry
    /// [`ConversionError::StreamUnderrun`]: crate::image_pipeline::ConversionError::StreamUnderrun
    fn decode_texture(&self, data: &[u8], pass: PassKind) -> Result<RgbImageData> {
        debug!("Decoding DDS texture, {} bytes", data.len());

        let mut decoder = BcDecoder::from_dds(Cursor::new(data))?;
        let image = decoder.decode_with(&pass.pass())?;

        debug!("Decoded texture: {}x{} ({:?})", image.width, image.height, decoder.format());
        Ok(image)
    }
}
