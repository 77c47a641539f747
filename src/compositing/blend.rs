//! Blend modes and source-over alpha algebra

use crate::engine::clamp_channel;
use crate::layers::BlendMode;

/// Blend one channel of source `s` over destination `d`, both `0..=255`
#[inline]
pub fn blend_channel(mode: BlendMode, s: f32, d: f32) -> f32 {
    match mode {
        BlendMode::Normal => s,
        BlendMode::Multiply => d * s / 255.0,
        BlendMode::Screen => 255.0 - (255.0 - d) * (255.0 - s) / 255.0,
        BlendMode::Overlay => {
            if d < 128.0 {
                2.0 * d * s / 255.0
            } else {
                255.0 - 2.0 * (255.0 - d) * (255.0 - s) / 255.0
            }
        }
    }
}

/// Composite one source pixel over one destination pixel
///
/// `sA = (alpha_hidden ? 255 : src.a) / 255 * opacity`, `dA = dst.a / 255`,
/// `outA = sA + dA(1 - sA)` and each colour channel is
/// `(B(s, d) sA + d dA (1 - sA)) / outA`. A fully transparent result keeps
/// the destination colour.
#[inline]
pub fn blend_pixel(
    mode: BlendMode,
    src: [u8; 4],
    dst: [u8; 4],
    opacity: f32,
    alpha_hidden: bool,
) -> [u8; 4] {
    let src_alpha = if alpha_hidden { 255.0 } else { src[3] as f32 };
    let sa = src_alpha / 255.0 * opacity;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a <= 0.0 {
        return [dst[0], dst[1], dst[2], 0];
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let (s, d) = (src[c] as f32, dst[c] as f32);
        let b = blend_channel(mode, s, d);
        out[c] = clamp_channel((b * sa + d * da * (1.0 - sa)) / out_a, 255);
    }
    out[3] = clamp_channel(out_a * 255.0, 255);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test_case(BlendMode::Normal, 200.0, 50.0, 200.0)]
    #[test_case(BlendMode::Multiply, 255.0, 100.0, 100.0)]
    #[test_case(BlendMode::Multiply, 0.0, 100.0, 0.0)]
    #[test_case(BlendMode::Screen, 0.0, 100.0, 100.0)]
    #[test_case(BlendMode::Screen, 255.0, 100.0, 255.0)]
    #[test_case(BlendMode::Overlay, 255.0, 64.0, 128.0; "overlay dark destination")]
    #[test_case(BlendMode::Overlay, 0.0, 200.0, 145.0; "overlay light destination")]
    #[test_case(BlendMode::Overlay, 0.0, 127.0, 0.0; "overlay last dark destination")]
    #[test_case(BlendMode::Overlay, 0.0, 128.0, 1.0; "overlay first light destination")]
    fn test_blend_channel(mode: BlendMode, s: f32, d: f32, expected: f32) {
        assert_relative_eq!(blend_channel(mode, s, d), expected, epsilon = 1e-3);
    }

    #[test]
    fn test_opaque_normal_replaces() {
        let out = blend_pixel(BlendMode::Normal, [10, 20, 30, 255], [200, 200, 200, 255], 1.0, false);
        assert_eq!(out, [10, 20, 30, 255]);
    }

    #[test]
    fn test_over_transparent_destination() {
        let out = blend_pixel(BlendMode::Multiply, [10, 20, 30, 128], [0, 0, 0, 0], 1.0, false);
        // blend result is weighted only by the source
        assert_eq!(out, [0, 0, 0, 128]);
    }

    #[test]
    fn test_half_opacity() {
        let out = blend_pixel(BlendMode::Normal, [0, 0, 255, 255], [255, 0, 0, 255], 0.5, false);
        assert_eq!(out, [128, 0, 128, 255]);
    }

    #[test]
    fn test_alpha_hidden_treats_source_opaque() {
        let out = blend_pixel(BlendMode::Normal, [50, 60, 70, 0], [0, 0, 0, 0], 1.0, true);
        assert_eq!(out, [50, 60, 70, 255]);
    }

    #[test]
    fn test_fully_transparent_keeps_destination_colour() {
        let out = blend_pixel(BlendMode::Screen, [1, 2, 3, 0], [9, 8, 7, 0], 1.0, false);
        assert_eq!(out, [9, 8, 7, 0]);
    }
}
