//! Half-pixel-centred RGBA resampling

use tracing::debug;

use super::ResampleMethod;
use crate::engine::{clamp_channel, PixelBuffer, RGBA_CHANNELS};

/// Source sampling position for one destination column or row
#[derive(Debug, Clone, Copy)]
struct Tap {
    i0: usize,
    i1: usize,
    frac: f32,
}

/// Map every destination index on one axis to its source neighbours
fn taps(src_dim: u32, dst_dim: u32, method: ResampleMethod) -> Vec<Tap> {
    let max = (src_dim - 1) as f64;
    let ratio = src_dim as f64 / dst_dim as f64;
    (0..dst_dim)
        .map(|d| {
            let c = ((d as f64 + 0.5) * ratio - 0.5).clamp(0.0, max);
            match method {
                ResampleMethod::Nearest => {
                    let i = c.round() as usize;
                    Tap { i0: i, i1: i, frac: 0.0 }
                }
                ResampleMethod::Bilinear => {
                    let i0 = c.floor() as usize;
                    let i1 = (i0 + 1).min(src_dim as usize - 1);
                    Tap {
                        i0,
                        i1,
                        frac: (c - i0 as f64) as f32,
                    }
                }
            }
        })
        .collect()
}

/// Resample an RGBA buffer to `dst_width` x `dst_height`
///
/// Source coordinates use half-pixel centres and are clamped into the
/// source. Bilinear interpolates each channel independently and rounds.
///
/// # Panics
/// The source must not be zero-area; callers validate this beforehand.
pub fn resample_rgba(
    src: &PixelBuffer,
    dst_width: u32,
    dst_height: u32,
    method: ResampleMethod,
) -> PixelBuffer {
    debug_assert!(!src.is_empty(), "resample_rgba requires a non-empty source");
    debug!(
        from = ?src.dimensions(),
        to = ?(dst_width, dst_height),
        ?method,
        "resampling RGBA buffer"
    );

    let xs = taps(src.width(), dst_width, method);
    let ys = taps(src.height(), dst_height, method);

    PixelBuffer::from_rows(dst_width, dst_height, |y, row| {
        let ty = ys[y];
        let top = src.row(ty.i0 as u32);
        let bottom = src.row(ty.i1 as u32);
        for (px, tx) in row.chunks_exact_mut(RGBA_CHANNELS).zip(&xs) {
            let (a, b) = (tx.i0 * RGBA_CHANNELS, tx.i1 * RGBA_CHANNELS);
            match method {
                ResampleMethod::Nearest => px.copy_from_slice(&top[a..a + RGBA_CHANNELS]),
                ResampleMethod::Bilinear => {
                    let (fx, fy) = (tx.frac, ty.frac);
                    let w00 = (1.0 - fx) * (1.0 - fy);
                    let w10 = fx * (1.0 - fy);
                    let w01 = (1.0 - fx) * fy;
                    let w11 = fx * fy;
                    for c in 0..RGBA_CHANNELS {
                        let v = top[a + c] as f32 * w00
                            + top[b + c] as f32 * w10
                            + bottom[a + c] as f32 * w01
                            + bottom[b + c] as f32 * w11;
                        px[c] = clamp_channel(v, 255);
                    }
                }
            }
        }
    })
}
