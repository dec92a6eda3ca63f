use std::io::{Read, Seek, SeekFrom};

use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::dds::DdsHeader;
use crate::image_pipeline::bcn::block::{BLOCK_SIZE, BlockReader, TEXELS_PER_BLOCK};
use crate::image_pipeline::bcn::interpolate::palette;
use crate::image_pipeline::bcn::pass::{CompositePass, quantize, void_pass};
use crate::image_pipeline::bcn::types::{ImageGeometry, PixelFormat, RgbImageData, TILE_SIZE};

/// Decodes a full BC4/BC5 surface from a seekable stream.
///
/// The stream offset at construction marks the first block. Every call to
/// [`decode_with`](Self::decode_with) seeks back there and returns a freshly
/// allocated image, so a decoder can be run repeatedly with different passes.
pub struct BcDecoder<R: Read + Seek> {
    stream: R,
    start: u64,
    format: PixelFormat,
    geometry: ImageGeometry,
}

impl<R: Read + Seek> BcDecoder<R> {
    /// Wraps a stream already positioned at the first compressed block.
    pub fn new(mut stream: R, format: PixelFormat, geometry: ImageGeometry) -> Result<Self> {
        let start = stream.stream_position()?;
        Ok(Self {
            stream,
            start,
            format,
            geometry,
        })
    }

    /// Reads and validates a DDS header, leaving the stream at the pixel data.
    pub fn from_dds(mut stream: R) -> Result<Self> {
        let header = DdsHeader::read(&mut stream)?;
        let format = header.pixel_format()?;
        let geometry = ImageGeometry::new(header.width as usize, header.height as usize)?;

        debug!(
            ?format,
            width = geometry.width(),
            height = geometry.height(),
            "DDS header accepted"
        );
        Self::new(stream, format, geometry)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn geometry(&self) -> ImageGeometry {
        self.geometry
    }

    pub fn into_inner(self) -> R {
        self.stream
    }

    /// Decodes with the void pass (red and green from the channels, blue zero).
    pub fn decode(&mut self) -> Result<RgbImageData> {
        self.decode_with(&void_pass)
    }

    /// Decodes the whole surface, running `pass` on every texel.
    #[instrument(skip_all, fields(format = ?self.format, width = self.geometry.width(), height = self.geometry.height()))]
    pub fn decode_with<P: CompositePass + ?Sized>(&mut self, pass: &P) -> Result<RgbImageData> {
        self.ensure_stream_length()?;
        self.stream.seek(SeekFrom::Start(self.start))?;

        let width = self.geometry.width();
        let height = self.geometry.height();
        let mut image = RgbImageData::new(width, height);
        let mut blocks = BlockReader::new(&mut self.stream);

        for tile_y in (0..height).step_by(TILE_SIZE) {
            for tile_x in (0..width).step_by(TILE_SIZE) {
                let red = blocks.read_block()?;
                let green = match self.format {
                    PixelFormat::Bc4 => None,
                    PixelFormat::Bc5 => Some(blocks.read_block()?),
                };

                let red_values = palette(red.ref0, red.ref1);
                let green_values = green.map(|block| (block, palette(block.ref0, block.ref1)));

                for texel in 0..TEXELS_PER_BLOCK {
                    let channel0 = red_values[red.indices[texel] as usize];
                    let channel1 = match &green_values {
                        Some((block, values)) => values[block.indices[texel] as usize],
                        None => 0.0,
                    };

                    let [r, g, b] = pass.apply(channel0, channel1);
                    image.set_pixel(
                        tile_x + texel % TILE_SIZE,
                        tile_y + texel / TILE_SIZE,
                        [quantize(r), quantize(g), quantize(b)],
                    );
                }
            }
        }

        debug_assert_eq!(blocks.blocks_read(), self.geometry.block_count(self.format));
        debug!(blocks = blocks.blocks_read(), "Decode complete");
        Ok(image)
    }

    // Checked before the output buffer is allocated, so a header claiming a huge
    // surface over a short stream fails without touching memory.
    fn ensure_stream_length(&mut self) -> Result<()> {
        let needed = self.geometry.block_count(self.format) * BLOCK_SIZE;
        let end = self.stream.seek(SeekFrom::End(0))?;
        let available = usize::try_from(end.saturating_sub(self.start)).unwrap_or(usize::MAX);

        if available < needed {
            return Err(ConversionError::StreamUnderrun { needed, available });
        }
        Ok(())
    }
}
