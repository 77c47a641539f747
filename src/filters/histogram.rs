//! Channel histograms for the curves panel

use serde::Serialize;

use crate::engine::{PixelBuffer, RGBA_CHANNELS};

/// Per-channel colour histogram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RgbHistogram {
    pub r: Vec<u32>,
    pub g: Vec<u32>,
    pub b: Vec<u32>,
}

#[inline]
fn bin(value: u8, bins: usize) -> usize {
    value as usize * bins / 256
}

/// Histogram of R, G and B with `bins` buckets (1..=256)
///
/// Use 128 bins for GB7 material and 256 for 8-bit colour.
pub fn histogram_rgb(buffer: &PixelBuffer, bins: usize) -> RgbHistogram {
    let bins = bins.clamp(1, 256);
    let mut hist = RgbHistogram {
        r: vec![0; bins],
        g: vec![0; bins],
        b: vec![0; bins],
    };
    for px in buffer.data().chunks_exact(RGBA_CHANNELS) {
        hist.r[bin(px[0], bins)] += 1;
        hist.g[bin(px[1], bins)] += 1;
        hist.b[bin(px[2], bins)] += 1;
    }
    hist
}

/// Histogram of alpha with `bins` buckets (1..=256)
pub fn histogram_alpha(buffer: &PixelBuffer, bins: usize) -> Vec<u32> {
    let bins = bins.clamp(1, 256);
    let mut hist = vec![0; bins];
    for px in buffer.data().chunks_exact(RGBA_CHANNELS) {
        hist[bin(px[3], bins)] += 1;
    }
    hist
}
