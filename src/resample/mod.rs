//! Resampling Engine
//!
//! Geometric scaling with nearest-neighbour and bilinear interpolation.
//! RGBA buffers and GB7 gray buffers use two deliberately different
//! coordinate mappings:
//! - [`resample_rgba`]: half-pixel centred, `src = (dst + 0.5) * s / d - 0.5`
//! - [`resample_gray`]: corner aligned, `src = dst * s / d` (nearest) and
//!   `src = dst * (s - 1) / (d - 1)` (bilinear)
//!
//! They do not agree pixel-for-pixel at the same scale factor.

mod fit;
mod gray;
mod rgba;

use serde::{Deserialize, Serialize};

pub use fit::{fit_placement, fit_scale, fit_within, Placement};
pub use gray::resample_gray;
pub use rgba::resample_rgba;

/// Interpolation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleMethod {
    /// Nearest neighbour: fast, blocky when enlarging
    Nearest,
    /// Bilinear: smooth, the default for general scaling
    #[default]
    Bilinear,
}
