//! BC4/BC5 block decompression
//!
//! Blocks are read from the stream, expanded into per-texel channel values,
//! combined by a composite pass and written into an RGB image tile by tile.

pub mod block;
pub mod interpolate;
pub mod pass;
pub mod types;
mod decoder;

#[cfg(test)]
mod tests;

pub use block::{Bc4Block, BlockReader};
pub use interpolate::interpolate;
pub use pass::{CompositePass, PassKind, normal_map_pass, void_pass};
pub use types::{ImageGeometry, PixelFormat, RgbImageData};
pub use decoder::BcDecoder;
