//! Composite passes turning a decoded channel pair into an RGB triple.

/// Maps the reconstructed `(channel0, channel1)` of a texel to normalized RGB.
///
/// Any `Fn(f32, f32) -> [f32; 3]` is a pass, so plain functions and closures can be
/// handed straight to the decoder.
pub trait CompositePass {
    fn apply(&self, channel0: f32, channel1: f32) -> [f32; 3];
}

impl<F> CompositePass for F
where
    F: Fn(f32, f32) -> [f32; 3],
{
    fn apply(&self, channel0: f32, channel1: f32) -> [f32; 3] {
        self(channel0, channel1)
    }
}

/// Passes both channels through as red and green, blue is always zero.
pub fn void_pass(channel0: f32, channel1: f32) -> [f32; 3] {
    [channel0, channel1, 0.0]
}

/// Treats the channels as tangent-space X/Y and rebuilds Z into the blue channel.
pub fn normal_map_pass(channel0: f32, channel1: f32) -> [f32; 3] {
    let nx = channel0 * 2.0 - 1.0;
    let ny = channel1 * 2.0 - 1.0;
    let nz = (1.0 - nx * nx - ny * ny).max(0.0).sqrt();

    [channel0, channel1, ((nz + 1.0) / 2.0).clamp(0.0, 1.0)]
}

/// Converts a normalized channel to 8 bits. Truncates rather than rounds.
pub fn quantize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).floor() as u8
}

/// Built-in passes selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PassKind {
    /// Red/green straight from the channels (default)
    #[default]
    Void,
    /// Reconstruct normal-map Z into blue
    NormalMap,
}

impl PassKind {
    pub fn pass(self) -> fn(f32, f32) -> [f32; 3] {
        match self {
            PassKind::Void => void_pass,
            PassKind::NormalMap => normal_map_pass,
        }
    }
}
