//! Reading of 8-byte BC4 blocks from a compressed stream.

use std::io::{ErrorKind, Read};

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Size in bytes of one BC4 block (and of each half of a BC5 block pair).
pub const BLOCK_SIZE: usize = 8;

/// Number of texels covered by one block.
pub const TEXELS_PER_BLOCK: usize = 16;

const INDEX_BITS: u32 = 3;
const INDEX_MASK: u64 = 0b111;

/// One decoded single-channel block: two reference values and a 3-bit index per texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bc4Block {
    pub ref0: u8,
    pub ref1: u8,
    /// Indices in texel order (row-major within the 4x4 tile), each in `0..=7`.
    pub indices: [u8; TEXELS_PER_BLOCK],
}

impl Bc4Block {
    /// Parses a block from its on-disk representation.
    ///
    /// Bytes 2..8 hold a little-endian 48-bit field; texel `i` uses bits `3*i..3*i+3`.
    pub fn from_bytes(bytes: [u8; BLOCK_SIZE]) -> Self {
        let mut field = [0u8; 8];
        field[..6].copy_from_slice(&bytes[2..]);
        let packed = u64::from_le_bytes(field);

        let mut indices = [0u8; TEXELS_PER_BLOCK];
        for (i, index) in indices.iter_mut().enumerate() {
            *index = ((packed >> (INDEX_BITS * i as u32)) & INDEX_MASK) as u8;
        }

        Self {
            ref0: bytes[0],
            ref1: bytes[1],
            indices,
        }
    }
}

/// Pulls consecutive blocks out of a byte stream.
pub struct BlockReader<R: Read> {
    inner: R,
    blocks_read: usize,
}

impl<R: Read> BlockReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            blocks_read: 0,
        }
    }

    /// Reads the next block, advancing the stream by exactly [`BLOCK_SIZE`] bytes.
    ///
    /// Fails with [`ConversionError::StreamUnderrun`] when the stream ends before a
    /// full block is available.
    pub fn read_block(&mut self) -> Result<Bc4Block> {
        let mut bytes = [0u8; BLOCK_SIZE];
        let available = fill(&mut self.inner, &mut bytes)?;
        if available < BLOCK_SIZE {
            return Err(ConversionError::StreamUnderrun {
                needed: BLOCK_SIZE,
                available,
            });
        }

        self.blocks_read += 1;
        Ok(Bc4Block::from_bytes(bytes))
    }

    /// Number of complete blocks consumed so far.
    pub fn blocks_read(&self) -> usize {
        self.blocks_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

// Like `read_exact`, but reports how many bytes made it in before EOF.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
