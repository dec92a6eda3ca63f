use std::io::Cursor;

use crate::image_pipeline::bcn::{
    BcDecoder, ImageGeometry, PixelFormat, RgbImageData, normal_map_pass,
};
use crate::image_pipeline::common::error::ConversionError;
use crate::image_pipeline::dds::FourCC;
use crate::image_pipeline::dds::header::{dxgi, encode_header};

fn block(ref0: u8, ref1: u8, indices: [u8; 16]) -> [u8; 8] {
    let packed = indices
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &idx)| acc | ((idx as u64) << (3 * i)));
    let field = packed.to_le_bytes();
    [ref0, ref1, field[0], field[1], field[2], field[3], field[4], field[5]]
}

fn decoder(data: Vec<u8>, format: PixelFormat, width: usize, height: usize) -> BcDecoder<Cursor<Vec<u8>>> {
    let geometry = ImageGeometry::new(width, height).unwrap();
    BcDecoder::new(Cursor::new(data), format, geometry).unwrap()
}

fn assert_uniform(image: &RgbImageData, expected: [u8; 3]) {
    for y in 0..image.height {
        for x in 0..image.width {
            assert_eq!(image.pixel(x, y), expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_bc4_reference0_everywhere() {
    let data = block(255, 0, [0; 16]).to_vec();
    let image = decoder(data, PixelFormat::Bc4, 4, 4).decode().unwrap();

    assert_eq!((image.width, image.height), (4, 4));
    assert_eq!(image.data.len(), 4 * 4 * 3);
    assert_uniform(&image, [255, 0, 0]);
}

#[test]
fn test_bc4_reference1_everywhere() {
    let data = block(255, 0, [1; 16]).to_vec();
    let image = decoder(data, PixelFormat::Bc4, 4, 4).decode().unwrap();
    assert_uniform(&image, [0, 0, 0]);
}

#[test]
fn test_bc5_normal_map_flat() {
    let mut data = block(128, 128, [0; 16]).to_vec();
    data.extend_from_slice(&block(128, 128, [0; 16]));

    let image = decoder(data, PixelFormat::Bc5, 4, 4)
        .decode_with(&normal_map_pass)
        .unwrap();

    // nx = ny = 1/255 leaves z just under 1.0, and truncation lands on 254
    assert_uniform(&image, [128, 128, 254]);
}

#[test]
fn test_bc5_channels_are_red_then_green() {
    let mut data = block(200, 0, [0; 16]).to_vec();
    data.extend_from_slice(&block(0, 60, [1; 16]));

    let image = decoder(data, PixelFormat::Bc5, 4, 4).decode().unwrap();
    assert_uniform(&image, [200, 60, 0]);
}

#[test]
fn test_bc4_four_step_anchors_end_to_end() {
    let mut indices = [6u8; 16];
    indices[5] = 7;
    let data = block(10, 20, indices).to_vec();

    let image = decoder(data, PixelFormat::Bc4, 4, 4).decode().unwrap();
    assert_eq!(image.pixel(0, 0), [0, 0, 0]);
    assert_eq!(image.pixel(1, 1), [255, 0, 0]);
}

#[test]
fn test_texel_order_within_tile() {
    // texel i sits at (i % 4, i / 4); use a distinct ladder value per row
    let indices = [0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 7, 7, 7, 7];
    let data = block(255, 0, indices).to_vec();

    let image = decoder(data, PixelFormat::Bc4, 4, 4).decode().unwrap();
    let rows: Vec<u8> = (0..4).map(|y| image.pixel(0, y)[0]).collect();

    assert_eq!(rows[0], 255);
    assert_eq!(rows[1], 0);
    assert!(rows[2] > rows[3] && rows[3] > rows[1]);
    for y in 0..4 {
        for x in 1..4 {
            assert_eq!(image.pixel(x, y), image.pixel(0, y));
        }
    }
}

#[test]
fn test_single_texel_position() {
    let mut indices = [1u8; 16];
    indices[6] = 0; // third column, second row
    let data = block(255, 0, indices).to_vec();

    let image = decoder(data, PixelFormat::Bc4, 4, 4).decode().unwrap();
    for y in 0..4 {
        for x in 0..4 {
            let expected = if (x, y) == (2, 1) { 255 } else { 0 };
            assert_eq!(image.pixel(x, y)[0], expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_tiles_are_row_major() {
    // 8x8 image: tiles (0,0), (4,0), (0,4), (4,4) in stream order
    let mut data = Vec::new();
    for value in [10u8, 20, 30, 40] {
        data.extend_from_slice(&block(value, 0, [0; 16]));
    }

    let image = decoder(data, PixelFormat::Bc4, 8, 8).decode().unwrap();
    assert_eq!(image.pixel(0, 0)[0], 10);
    assert_eq!(image.pixel(3, 3)[0], 10);
    assert_eq!(image.pixel(4, 0)[0], 20);
    assert_eq!(image.pixel(7, 3)[0], 20);
    assert_eq!(image.pixel(0, 4)[0], 30);
    assert_eq!(image.pixel(3, 7)[0], 30);
    assert_eq!(image.pixel(4, 4)[0], 40);
    assert_eq!(image.pixel(7, 7)[0], 40);
}

#[test]
fn test_wide_image_tile_order() {
    // 12x4 image is a single row of three tiles
    let mut data = Vec::new();
    for value in [1u8, 2, 3] {
        data.extend_from_slice(&block(value, 0, [0; 16]));
    }

    let image = decoder(data, PixelFormat::Bc4, 12, 4).decode().unwrap();
    assert_eq!(image.pixel(0, 3)[0], 1);
    assert_eq!(image.pixel(5, 2)[0], 2);
    assert_eq!(image.pixel(11, 0)[0], 3);
}

#[test]
fn test_bc4_block_count() {
    let geometry = ImageGeometry::new(8, 12).unwrap();
    assert_eq!(geometry.block_count(PixelFormat::Bc4), 6);

    let mut data = vec![0u8; 6 * 8];
    data.extend_from_slice(&[0xAA; 16]); // trailing mip data
    let mut dec = decoder(data, PixelFormat::Bc4, 8, 12);
    dec.decode().unwrap();

    assert_eq!(dec.into_inner().position(), 48);
}

#[test]
fn test_bc5_block_count() {
    let geometry = ImageGeometry::new(8, 12).unwrap();
    assert_eq!(geometry.block_count(PixelFormat::Bc5), 12);

    let mut data = vec![0u8; 12 * 8];
    data.extend_from_slice(&[0xAA; 16]);
    let mut dec = decoder(data, PixelFormat::Bc5, 8, 12);
    dec.decode().unwrap();

    assert_eq!(dec.into_inner().position(), 96);
}

#[test]
fn test_short_stream_underruns() {
    let result = decoder(vec![255, 0, 0], PixelFormat::Bc4, 4, 4).decode();
    assert!(matches!(
        result.unwrap_err(),
        ConversionError::StreamUnderrun { .. }
    ));
}

#[test]
fn test_bc5_missing_green_block_underruns() {
    let data = block(255, 0, [0; 16]).to_vec();
    let result = decoder(data, PixelFormat::Bc5, 4, 4).decode();
    assert!(matches!(
        result.unwrap_err(),
        ConversionError::StreamUnderrun { needed: 16, available: 8 }
    ));
}

#[test]
fn test_last_tile_underruns() {
    // 8x4 needs two blocks, only one and a half present
    let mut data = block(255, 0, [0; 16]).to_vec();
    data.extend_from_slice(&[1, 2, 3, 4]);
    let result = decoder(data, PixelFormat::Bc4, 8, 4).decode();
    assert!(matches!(
        result.unwrap_err(),
        ConversionError::StreamUnderrun { needed: 16, available: 12 }
    ));
}

#[test]
fn test_decode_is_repeatable() {
    let mut data = block(128, 128, [0; 16]).to_vec();
    data.extend_from_slice(&block(64, 192, [3; 16]));
    let mut dec = decoder(data, PixelFormat::Bc5, 4, 4);

    let first = dec.decode().unwrap();
    let second = dec.decode().unwrap();
    let normal = dec.decode_with(&normal_map_pass).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.pixel(0, 0)[2], 0);
    assert_ne!(normal.pixel(0, 0)[2], 0);
    assert_eq!(normal.pixel(0, 0)[..2], first.pixel(0, 0)[..2]);
}

#[test]
fn test_decode_starts_at_construction_offset() {
    let mut data = vec![0xEE; 5];
    data.extend_from_slice(&block(77, 0, [0; 16]));
    let mut cursor = Cursor::new(data);
    cursor.set_position(5);

    let geometry = ImageGeometry::new(4, 4).unwrap();
    let mut dec = BcDecoder::new(cursor, PixelFormat::Bc4, geometry).unwrap();

    assert_uniform(&dec.decode().unwrap(), [77, 0, 0]);
    assert_uniform(&dec.decode().unwrap(), [77, 0, 0]);
}

#[test]
fn test_custom_pass() {
    let data = block(255, 0, [0; 16]).to_vec();
    let invert = |c0: f32, c1: f32| [1.0 - c0, 1.0 - c1, 0.5];

    let image = decoder(data, PixelFormat::Bc4, 4, 4)
        .decode_with(&invert)
        .unwrap();
    assert_uniform(&image, [0, 255, 127]);
}

#[test]
fn test_malformed_geometry_rejected() {
    for (width, height) in [(6, 4), (4, 10), (0, 4), (4, 0), (3, 3)] {
        assert!(matches!(
            ImageGeometry::new(width, height),
            Err(ConversionError::MalformedGeometry { .. })
        ));
    }
}

#[test]
fn test_from_dds_legacy() {
    let mut data = encode_header(4, 8, FourCC::ATI1, None);
    data.extend_from_slice(&block(255, 0, [0; 16]));
    data.extend_from_slice(&block(0, 255, [0; 16]));

    let mut dec = BcDecoder::from_dds(Cursor::new(data)).unwrap();
    assert_eq!(dec.format(), PixelFormat::Bc4);
    assert_eq!(dec.geometry(), ImageGeometry::new(4, 8).unwrap());

    let image = dec.decode().unwrap();
    assert_eq!(image.pixel(2, 2), [255, 0, 0]);
    assert_eq!(image.pixel(2, 6), [0, 0, 0]);
}

#[test]
fn test_from_dds_dx10() {
    let mut data = encode_header(4, 4, FourCC::DX10, Some(dxgi::BC5_UNORM));
    data.extend_from_slice(&block(255, 0, [0; 16]));
    data.extend_from_slice(&block(255, 0, [1; 16]));

    let mut dec = BcDecoder::from_dds(Cursor::new(data)).unwrap();
    assert_eq!(dec.format(), PixelFormat::Bc5);
    assert_uniform(&dec.decode().unwrap(), [255, 0, 0]);
}

#[test]
fn test_from_dds_rejects_unaligned_size() {
    let mut data = encode_header(5, 4, FourCC::ATI2, None);
    data.extend_from_slice(&[0u8; 64]);

    assert!(matches!(
        BcDecoder::from_dds(Cursor::new(data)),
        Err(ConversionError::MalformedGeometry { width: 5, height: 4 })
    ));
}

#[test]
fn test_from_dds_rejects_other_formats() {
    let data = encode_header(4, 4, FourCC(u32::from_le_bytes(*b"DXT1")), None);
    assert!(matches!(
        BcDecoder::from_dds(Cursor::new(data)),
        Err(ConversionError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_short_stream_underruns_after_offset() {
    let mut data = vec![0xEE; 6];
    data.extend_from_slice(&[1, 2, 3, 4]);
    let mut cursor = Cursor::new(data);
    cursor.set_position(6);

    let geometry = ImageGeometry::new(4, 4).unwrap();
    let mut dec = BcDecoder::new(cursor, PixelFormat::Bc4, geometry).unwrap();
    assert!(matches!(
        dec.decode().unwrap_err(),
        ConversionError::StreamUnderrun { needed: 8, available: 4 }
    ));
}

#[test]
fn test_overflowing_geometry_rejected() {
    let side = 4_294_967_292usize;
    assert!(matches!(
        ImageGeometry::new(side, side),
        Err(ConversionError::MalformedGeometry { .. })
    ));
    assert!(matches!(
        ImageGeometry::new(usize::MAX - 3, 4),
        Err(ConversionError::MalformedGeometry { .. })
    ));
}

#[test]
fn test_from_dds_huge_header_is_an_error() {
    let mut data = encode_header(4_294_967_292, 4_294_967_292, FourCC::ATI1, None);
    data.extend_from_slice(&[255, 0, 0, 0]);

    let result = BcDecoder::from_dds(Cursor::new(data)).and_then(|mut dec| dec.decode());
    assert!(matches!(
        result,
        Err(ConversionError::MalformedGeometry { .. } | ConversionError::StreamUnderrun { .. })
    ));
}

#[test]
fn test_large_surface_over_short_stream_underruns_before_allocating() {
    let mut data = encode_header(65536, 65536, FourCC::ATI2, None);
    data.extend_from_slice(&block(255, 0, [0; 16]));

    let mut dec = BcDecoder::from_dds(Cursor::new(data)).unwrap();
    assert!(matches!(
        dec.decode().unwrap_err(),
        ConversionError::StreamUnderrun { needed, available: 8 } if needed == 65536 * 65536 / 2
    ));
}
