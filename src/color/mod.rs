//! Colour Conversion Module
//!
//! Stateless numeric conversions between sRGB, linear RGB, CIE XYZ, CIE Lab,
//! LCH, OKLab, OKLch and the GB7 7-bit gray scale, plus the eyedropper and
//! contrast metrics built on them.

mod contrast;
mod convert;
mod pick;

pub use contrast::{apca_contrast, wcag_contrast};
pub use convert::{
    gb7_to_level, gb7_to_rgb, lab_to_lch, lab_to_xyz, lch_to_lab, level_to_gb7, linear_to_srgb,
    luminance, oklab_to_oklch, oklab_to_rgb, oklch_to_oklab, rgb_to_gb7, rgb_to_oklab,
    rgb_to_oklch, rgb_to_xyz, srgb_to_linear, xyz_to_lab, xyz_to_rgb, Lab, Lch, OkLab, OkLch, Rgb,
    Xyz,
};
pub use pick::{pick, PickInfo, PickSource};
