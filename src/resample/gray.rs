//! Corner-aligned GB7 gray resampling

use tracing::debug;

use super::ResampleMethod;
use crate::engine::{clamp_channel, GrayBuffer, GRAY_BITS, GRAY_MAX, OPACITY_BIT};

/// Resample a GB7 gray buffer to `dst_width` x `dst_height`
///
/// Nearest maps `src = round(dst * s / d)`, clamped, and copies the whole
/// pixel byte including its mask bit. Bilinear uses the ratio
/// `(s - 1) / max(1, d - 1)`, interpolates the 7-bit gray (output clamped to
/// `0..=127`) and keeps a pixel opaque when the interpolated mask coverage
/// is at least one half.
///
/// # Panics
/// The source must not be zero-area; callers validate this beforehand.
pub fn resample_gray(
    src: &GrayBuffer,
    dst_width: u32,
    dst_height: u32,
    method: ResampleMethod,
) -> GrayBuffer {
    debug_assert!(
        src.width() > 0 && src.height() > 0,
        "resample_gray requires a non-empty source"
    );
    debug!(
        from = ?src.dimensions(),
        to = ?(dst_width, dst_height),
        ?method,
        "resampling GB7 buffer"
    );

    match method {
        ResampleMethod::Nearest => nearest(src, dst_width, dst_height),
        ResampleMethod::Bilinear => bilinear(src, dst_width, dst_height),
    }
}

fn nearest_index(d: u32, src_dim: u32, dst_dim: u32) -> usize {
    let s = (d as f64 * src_dim as f64 / dst_dim as f64).round() as u32;
    s.min(src_dim - 1) as usize
}

fn nearest(src: &GrayBuffer, dw: u32, dh: u32) -> GrayBuffer {
    let sw = src.width() as usize;
    let xs: Vec<usize> = (0..dw).map(|x| nearest_index(x, src.width(), dw)).collect();
    let pixels = src.pixels();

    GrayBuffer::from_rows(dw, dh, src.depth(), |y, row| {
        let sy = nearest_index(y as u32, src.height(), dh);
        let src_row = &pixels[sy * sw..(sy + 1) * sw];
        for (out, &sx) in row.iter_mut().zip(&xs) {
            *out = src_row[sx];
        }
    })
}

fn bilinear(src: &GrayBuffer, dw: u32, dh: u32) -> GrayBuffer {
    let (sw, sh) = (src.width() as usize, src.height() as usize);
    let scale_x = (sw - 1) as f64 / dw.saturating_sub(1).max(1) as f64;
    let scale_y = (sh - 1) as f64 / dh.saturating_sub(1).max(1) as f64;
    let has_mask = src.has_mask();
    let pixels = src.pixels();

    let axis = |d: usize, scale: f64, max: usize| {
        let f = d as f64 * scale;
        let i0 = (f.floor() as usize).min(max);
        let i1 = (i0 + 1).min(max);
        (i0, i1, (f - i0 as f64) as f32)
    };
    let xs: Vec<(usize, usize, f32)> = (0..dw as usize).map(|x| axis(x, scale_x, sw - 1)).collect();

    GrayBuffer::from_rows(dw, dh, src.depth(), |y, row| {
        let (y0, y1, wy) = axis(y, scale_y, sh - 1);
        for (out, &(x0, x1, wx)) in row.iter_mut().zip(&xs) {
            let p = |x: usize, y: usize| pixels[y * sw + x];
            let lerp = |f: &dyn Fn(u8) -> f32| {
                let top = f(p(x0, y0)) * (1.0 - wx) + f(p(x1, y0)) * wx;
                let bottom = f(p(x0, y1)) * (1.0 - wx) + f(p(x1, y1)) * wx;
                top * (1.0 - wy) + bottom * wy
            };

            let gray = clamp_channel(lerp(&|b| (b & GRAY_BITS) as f32), GRAY_MAX);
            let opaque = has_mask && lerp(&|b| if b & OPACITY_BIT != 0 { 1.0 } else { 0.0 }) >= 0.5;
            *out = if opaque { gray | OPACITY_BIT } else { gray };
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GrayDepth;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn ramp(width: u32, height: u32, depth: GrayDepth) -> GrayBuffer {
        let pixels = (0..width * height)
            .map(|i| {
                let g = (i * 7 % 128) as u8;
                if depth == GrayDepth::Eight && i % 3 == 0 {
                    g | OPACITY_BIT
                } else {
                    g
                }
            })
            .collect();
        GrayBuffer::from_raw(width, height, depth, pixels).unwrap()
    }

    #[test_case(GrayDepth::Seven)]
    #[test_case(GrayDepth::Eight)]
    fn test_nearest_same_size_is_identity(depth: GrayDepth) {
        let src = ramp(6, 4, depth);
        assert_eq!(resample_gray(&src, 6, 4, ResampleMethod::Nearest), src);
    }

    #[test]
    fn test_bilinear_same_size_is_identity() {
        let src = ramp(5, 3, GrayDepth::Eight);
        assert_eq!(resample_gray(&src, 5, 3, ResampleMethod::Bilinear), src);
    }

    #[test]
    fn test_nearest_corner_aligned() {
        let src = GrayBuffer::from_raw(4, 1, GrayDepth::Seven, vec![0, 10, 20, 30]).unwrap();
        let out = resample_gray(&src, 2, 1, ResampleMethod::Nearest);
        // round(0 * 2) = 0, round(1 * 2) = 2
        assert_eq!(out.pixels(), &[0, 20]);
    }

    #[test]
    fn test_bilinear_endpoints_map_to_corners() {
        let src = GrayBuffer::from_raw(2, 1, GrayDepth::Seven, vec![0, 127]).unwrap();
        let out = resample_gray(&src, 5, 1, ResampleMethod::Bilinear);
        // ratio 1/4: 0, 0.25, 0.5, 0.75, 1
        assert_eq!(out.pixels(), &[0, 32, 64, 95, 127]);
    }

    #[test]
    fn test_bilinear_mask_coverage() {
        let src = GrayBuffer::from_raw(2, 1, GrayDepth::Eight, vec![0x80 | 100, 100]).unwrap();
        let out = resample_gray(&src, 4, 1, ResampleMethod::Bilinear);
        // coverage 1, 2/3, 1/3, 0
        let opaque: Vec<bool> = (0..4).map(|x| out.is_opaque_at(x, 0)).collect();
        assert_eq!(opaque, vec![true, true, false, false]);
        assert!((0..4).all(|x| out.gray_at(x, 0) == 100));
    }

    #[test]
    fn test_differs_from_rgba_mapping() {
        // Same 4 -> 2 downscale picks different source pixels than the
        // half-pixel-centred RGBA path (which lands on 1 and 3).
        let src = GrayBuffer::from_raw(4, 1, GrayDepth::Seven, vec![0, 10, 20, 30]).unwrap();
        let gray = resample_gray(&src, 2, 1, ResampleMethod::Nearest);
        let rgba = super::super::resample_rgba(&src.to_rgba(), 2, 1, ResampleMethod::Nearest);
        let rgba_gray: Vec<u8> = (0..2)
            .map(|x| crate::color::rgb_to_gb7(crate::color::Rgb::gray(rgba.pixel(x, 0)[0])))
            .collect();
        assert_ne!(gray.pixels(), rgba_gray.as_slice());
    }
}
