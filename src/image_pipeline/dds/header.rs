//! DDS container header parsing
//!
//! Only the fields needed to locate and classify BC4/BC5 data are kept: the
//! surface size, the legacy FourCC and the DXGI format of the DX10 extension.

use std::io::Read;

use tracing::debug;

use crate::image_pipeline::bcn::PixelFormat;
use crate::image_pipeline::common::error::{ConversionError, Result};

/// Four-character code stored little-endian in the pixel format block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FourCC(pub u32);

impl FourCC {
    pub const DX10: Self = FourCC(u32::from_le_bytes(*b"DX10"));
    pub const ATI1: Self = FourCC(u32::from_le_bytes(*b"ATI1"));
    pub const BC4U: Self = FourCC(u32::from_le_bytes(*b"BC4U"));
    pub const ATI2: Self = FourCC(u32::from_le_bytes(*b"ATI2"));
    pub const BC5U: Self = FourCC(u32::from_le_bytes(*b"BC5U"));
}

impl std::fmt::Display for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.0.to_le_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            write!(f, "{}", String::from_utf8_lossy(&bytes))
        } else {
            write!(f, "0x{:08X}", self.0)
        }
    }
}

/// DXGI format codes from the DX10 extension header.
pub mod dxgi {
    pub const BC4_TYPELESS: u32 = 79;
    pub const BC4_UNORM: u32 = 80;
    pub const BC5_TYPELESS: u32 = 82;
    pub const BC5_UNORM: u32 = 83;
}

pub const MAGIC: [u8; 4] = *b"DDS ";

const HEADER_SIZE: usize = 124;
const PIXEL_FORMAT_SIZE: u32 = 32;
const DX10_HEADER_SIZE: usize = 20;

// Dword offsets inside the 124-byte header
const SIZE: usize = 0;
const FLAGS: usize = 1;
const HEIGHT: usize = 2;
const WIDTH: usize = 3;
const PF_SIZE: usize = 18;
const PF_FLAGS: usize = 19;
const PF_FOURCC: usize = 20;
const CAPS: usize = 26;

const DDSD_CAPS: u32 = 0x1;
const DDSD_HEIGHT: u32 = 0x2;
const DDSD_WIDTH: u32 = 0x4;
const DDSD_PIXELFORMAT: u32 = 0x1000;
const DDPF_FOURCC: u32 = 0x4;
const DDSCAPS_TEXTURE: u32 = 0x1000;
const D3D10_RESOURCE_DIMENSION_TEXTURE2D: u32 = 3;

/// The parts of a DDS header the decoder cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsHeader {
    pub width: u32,
    pub height: u32,
    /// `None` when the pixel format does not carry the FourCC flag.
    pub four_cc: Option<FourCC>,
    /// DXGI format, present only when `four_cc` is `DX10`.
    pub dxgi_format: Option<u32>,
}

impl DdsHeader {
    /// Reads magic, header and the optional DX10 extension.
    ///
    /// On success the reader is positioned at the first compressed block.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        read_exact(reader, &mut magic, "magic")?;
        if magic != MAGIC {
            return Err(ConversionError::InvalidHeader(format!(
                "bad magic {:?}",
                String::from_utf8_lossy(&magic)
            )));
        }

        let mut raw = [0u8; HEADER_SIZE];
        read_exact(reader, &mut raw, "header")?;
        let dword = |index: usize| {
            let offset = index * 4;
            u32::from_le_bytes([raw[offset], raw[offset + 1], raw[offset + 2], raw[offset + 3]])
        };

        if dword(SIZE) as usize != HEADER_SIZE {
            return Err(ConversionError::InvalidHeader(format!(
                "header size {} (expected {})",
                dword(SIZE),
                HEADER_SIZE
            )));
        }
        if dword(PF_SIZE) != PIXEL_FORMAT_SIZE {
            return Err(ConversionError::InvalidHeader(format!(
                "pixel format size {} (expected {})",
                dword(PF_SIZE),
                PIXEL_FORMAT_SIZE
            )));
        }

        let four_cc = if dword(PF_FLAGS) & DDPF_FOURCC != 0 {
            Some(FourCC(dword(PF_FOURCC)))
        } else {
            None
        };

        let dxgi_format = if four_cc == Some(FourCC::DX10) {
            let mut dx10 = [0u8; DX10_HEADER_SIZE];
            read_exact(reader, &mut dx10, "DX10 header")?;
            Some(u32::from_le_bytes([dx10[0], dx10[1], dx10[2], dx10[3]]))
        } else {
            None
        };

        let header = Self {
            width: dword(WIDTH),
            height: dword(HEIGHT),
            four_cc,
            dxgi_format,
        };
        debug!(?header, "Parsed DDS header");
        Ok(header)
    }

    /// Classifies the surface as BC4 or BC5, rejecting every other format.
    pub fn pixel_format(&self) -> Result<PixelFormat> {
        match (self.four_cc, self.dxgi_format) {
            (Some(FourCC::DX10), Some(code)) => match code {
                dxgi::BC4_TYPELESS | dxgi::BC4_UNORM => Ok(PixelFormat::Bc4),
                dxgi::BC5_TYPELESS | dxgi::BC5_UNORM => Ok(PixelFormat::Bc5),
                other => Err(ConversionError::UnsupportedFormat(format!(
                    "DXGI format {other}"
                ))),
            },
            (Some(FourCC::ATI1 | FourCC::BC4U), _) => Ok(PixelFormat::Bc4),
            (Some(FourCC::ATI2 | FourCC::BC5U), _) => Ok(PixelFormat::Bc5),
            (Some(other), _) => Err(ConversionError::UnsupportedFormat(format!(
                "FourCC {other}"
            ))),
            (None, _) => Err(ConversionError::UnsupportedFormat(
                "uncompressed pixel format".to_string(),
            )),
        }
    }
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => {
            ConversionError::InvalidHeader(format!("truncated {what}"))
        }
        _ => ConversionError::IoError(e),
    })
}

/// Serializes a minimal header for a BC4/BC5 surface. Used to build fixtures.
pub fn encode_header(width: u32, height: u32, four_cc: FourCC, dxgi_format: Option<u32>) -> Vec<u8> {
    let mut dwords = [0u32; HEADER_SIZE / 4];
    dwords[SIZE] = HEADER_SIZE as u32;
    dwords[FLAGS] = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT;
    dwords[HEIGHT] = height;
    dwords[WIDTH] = width;
    dwords[PF_SIZE] = PIXEL_FORMAT_SIZE;
    dwords[PF_FLAGS] = DDPF_FOURCC;
    dwords[PF_FOURCC] = four_cc.0;
    dwords[CAPS] = DDSCAPS_TEXTURE;

    let mut out = Vec::with_capacity(4 + HEADER_SIZE + DX10_HEADER_SIZE);
    out.extend_from_slice(&MAGIC);
    for dword in dwords {
        out.extend_from_slice(&dword.to_le_bytes());
    }
    if let Some(code) = dxgi_format {
        // dxgiFormat, resourceDimension, miscFlag, arraySize, miscFlags2
        for dword in [code, D3D10_RESOURCE_DIMENSION_TEXTURE2D, 0, 1, 0] {
            out.extend_from_slice(&dword.to_le_bytes());
        }
    }
    out
}
