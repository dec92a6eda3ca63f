use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::bcn::RgbImageData;
use crate::image_pipeline::tiff::types::ConversionConfig;

pub trait TiffWriter {
    fn write_rgb_tiff(&self, image: &RgbImageData, output: &mut dyn Write, config: &ConversionConfig) -> Result<()>;
}
