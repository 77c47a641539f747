//! Built-in 3x3 kernel presets

use serde::{Deserialize, Serialize};

use super::convolution::Kernel3x3;

/// Named kernel presets offered by the filter dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelPreset {
    Identity,
    Sharpen,
    /// σ ≈ 1, normalised automatically
    Gaussian3x3,
    BoxBlur3x3,
    /// Horizontal gradient (responds to vertical edges)
    PrewittX,
    /// Vertical gradient (responds to horizontal edges)
    PrewittY,
}

impl KernelPreset {
    /// Every preset, in menu order
    pub const ALL: [KernelPreset; 6] = [
        KernelPreset::Identity,
        KernelPreset::Sharpen,
        KernelPreset::Gaussian3x3,
        KernelPreset::BoxBlur3x3,
        KernelPreset::PrewittX,
        KernelPreset::PrewittY,
    ];

    /// The preset's weights
    pub fn kernel(self) -> Kernel3x3 {
        match self {
            KernelPreset::Identity => [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            KernelPreset::Sharpen => [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0],
            KernelPreset::Gaussian3x3 => [1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0],
            KernelPreset::BoxBlur3x3 => [1.0; 9],
            KernelPreset::PrewittX => [-1.0, 0.0, 1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0],
            KernelPreset::PrewittY => [1.0, 1.0, 1.0, 0.0, 0.0, 0.0, -1.0, -1.0, -1.0],
        }
    }

    /// Get human-readable display name
    pub fn display_name(self) -> &'static str {
        match self {
            KernelPreset::Identity => "Identity",
            KernelPreset::Sharpen => "Sharpen",
            KernelPreset::Gaussian3x3 => "Gaussian 3x3",
            KernelPreset::BoxBlur3x3 => "Box Blur 3x3",
            KernelPreset::PrewittX => "Prewitt X",
            KernelPreset::PrewittY => "Prewitt Y",
        }
    }
}
