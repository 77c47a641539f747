//! 3x3 convolution with clamp-to-edge sampling

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{clamp_channel, PixelBuffer, RGBA_CHANNELS};

/// Row-major 3x3 kernel `[k00, k01, k02, k10, .., k22]`
pub type Kernel3x3 = [f32; 9];

/// Channels rewritten by [`convolve3x3`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvolveTarget {
    /// R, G, B convolved; alpha copied
    #[default]
    Rgb,
    /// Alpha convolved; R, G, B copied
    Alpha,
    /// R, G, B convolved; alpha convolved too unless `preserve_alpha`
    Rgba,
}

/// Convolution settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvolveOptions {
    pub target: ConvolveTarget,
    /// `None` normalises whenever the kernel sum is non-zero
    pub normalize: Option<bool>,
    /// With [`ConvolveTarget::Rgba`], copy alpha instead of convolving it
    pub preserve_alpha: bool,
}

impl Default for ConvolveOptions {
    fn default() -> Self {
        Self {
            target: ConvolveTarget::Rgb,
            normalize: None,
            preserve_alpha: true,
        }
    }
}

impl ConvolveOptions {
    /// Options for a target with automatic normalisation
    pub fn for_target(target: ConvolveTarget) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }
}

/// Kernel actually applied: divided by its sum when normalising
///
/// Zero-sum kernels (edge detectors) are never divided.
pub fn effective_kernel(kernel: &Kernel3x3, normalize: Option<bool>) -> Kernel3x3 {
    let sum: f32 = kernel.iter().sum();
    let nonzero = sum.abs() > f32::EPSILON;
    if normalize.unwrap_or(nonzero) && nonzero {
        kernel.map(|k| k / sum)
    } else {
        *kernel
    }
}

/// Convolve with a target and optional normalisation override
pub fn convolve3x3(
    buffer: &PixelBuffer,
    kernel: &Kernel3x3,
    target: ConvolveTarget,
    normalize: Option<bool>,
) -> PixelBuffer {
    convolve3x3_with(
        buffer,
        kernel,
        &ConvolveOptions {
            target,
            normalize,
            ..Default::default()
        },
    )
}

/// Convolve a buffer with a 3x3 kernel, returning a new buffer
///
/// Samples outside the image reuse the nearest border pixel. Each targeted
/// channel is summed over its neighbourhood, rounded and clamped to
/// `0..=255`; untouched channels are copied.
pub fn convolve3x3_with(buffer: &PixelBuffer, kernel: &Kernel3x3, opts: &ConvolveOptions) -> PixelBuffer {
    let k = effective_kernel(kernel, opts.normalize);
    let color = matches!(opts.target, ConvolveTarget::Rgb | ConvolveTarget::Rgba);
    let alpha = match opts.target {
        ConvolveTarget::Alpha => true,
        ConvolveTarget::Rgba => !opts.preserve_alpha,
        ConvolveTarget::Rgb => false,
    };
    debug!(
        size = ?buffer.dimensions(),
        target = ?opts.target,
        kernel = ?k,
        "convolving 3x3"
    );

    let (width, height) = (buffer.width() as usize, buffer.height() as usize);
    if width == 0 || height == 0 {
        return buffer.clone();
    }

    PixelBuffer::from_rows(buffer.width(), buffer.height(), |y, row| {
        let rows = [
            buffer.row(y.saturating_sub(1) as u32),
            buffer.row(y as u32),
            buffer.row((y + 1).min(height - 1) as u32),
        ];
        let centre = rows[1];
        for x in 0..width {
            let cols = [x.saturating_sub(1), x, (x + 1).min(width - 1)];
            let sample = |c: usize| {
                let mut acc = 0.0f32;
                for (ky, src) in rows.iter().enumerate() {
                    for (kx, &sx) in cols.iter().enumerate() {
                        acc += src[sx * RGBA_CHANNELS + c] as f32 * k[ky * 3 + kx];
                    }
                }
                clamp_channel(acc, 255)
            };

            let i = x * RGBA_CHANNELS;
            for c in 0..3 {
                row[i + c] = if color { sample(c) } else { centre[i + c] };
            }
            row[i + 3] = if alpha { sample(3) } else { centre[i + 3] };
        }
    })
}
