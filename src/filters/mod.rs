//! Filters Module
//!
//! 3x3 convolution engine with kernel presets, alpha utilities and channel
//! histograms.

mod adjust;
mod convolution;
mod histogram;
mod kernels;

pub use adjust::{burn_alpha_to_white, is_fully_transparent, strip_alpha};
pub use convolution::{
    convolve3x3, convolve3x3_with, effective_kernel, ConvolveOptions, ConvolveTarget, Kernel3x3,
};
pub use histogram::{histogram_alpha, histogram_rgb, RgbHistogram};
pub use kernels::KernelPreset;
