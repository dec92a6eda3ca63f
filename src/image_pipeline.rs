//! Image processing pipeline module
//!
//! This module decodes BC4/BC5 DDS textures and converts them to TIFF, with
//! separate modules for container parsing, block decompression, TIFF writing
//! and conversion orchestration.

pub mod bcn;
pub mod dds;
pub mod tiff;
pub mod conversions;
pub mod common;

pub use common::{
    ConversionError,
    Result,
};

pub use bcn::{
    BcDecoder,
    CompositePass,
    ImageGeometry,
    PassKind,
    PixelFormat,
    RgbImageData,
};

pub use dds::{
    DdsHeader,
    DdsTextureDecoder,
    TextureDecoder,
};

pub use self::tiff::{
    TiffCompression,
    ConversionConfig,
    ConversionConfigBuilder,
    TiffWriter,
    StandardTiffWriter,
};

pub use conversions::{
    DdsToTiffPipeline,
};
