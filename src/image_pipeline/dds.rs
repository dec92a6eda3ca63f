//! DDS container module
//!
//! This module validates DDS headers and exposes the texture decoder used by the pipeline.

mod decoder;
mod dds_decoder;
pub mod header;

pub use decoder::TextureDecoder;
pub use dds_decoder::DdsTextureDecoder;
pub use header::{DdsHeader, FourCC};
