//! Reconstruction of a single channel value from a block's reference pair.

/// Returns the normalized value for `index` on the ladder built from `ref0` and `ref1`.
///
/// When `ref0 > ref1` the block uses six interpolated steps between the references.
/// Otherwise it uses four, with indices 6 and 7 pinned to 0.0 and 1.0.
pub fn interpolate(ref0: u8, ref1: u8, index: u8) -> f32 {
    let r0 = ref0 as f32 / 255.0;
    let r1 = ref1 as f32 / 255.0;

    let value = match index & 0b111 {
        0 => r0,
        1 => r1,
        index if ref0 > ref1 => {
            let step = (index - 1) as f32;
            (r0 * (7.0 - step) + r1 * step) / 7.0
        }
        6 => 0.0,
        7 => 1.0,
        index => {
            let step = (index - 1) as f32;
            (r0 * (5.0 - step) + r1 * step) / 5.0
        }
    };

    value.clamp(0.0, 1.0)
}

/// Expands a block's reference pair into all eight ladder values.
pub fn palette(ref0: u8, ref1: u8) -> [f32; 8] {
    std::array::from_fn(|index| interpolate(ref0, ref1, index as u8))
}
