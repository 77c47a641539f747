//! Eyedropper: sample a pixel and report it in every supported space

use serde::Serialize;

use super::convert::{gb7_to_rgb, rgb_to_oklch, rgb_to_xyz, xyz_to_lab, Lab, OkLch, Rgb, Xyz};
use crate::engine::{GrayBuffer, PixelBuffer};

/// What the eyedropper samples from
#[derive(Debug, Clone, Copy)]
pub enum PickSource<'a> {
    /// A rendered or flattened RGBA buffer
    Rgba(&'a PixelBuffer),
    /// Original GB7 samples; the 7-bit value is reported alongside the colour
    Gray(&'a GrayBuffer),
}

/// Colour information under the eyedropper
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickInfo {
    /// Sampled pixel coordinate after clamping
    pub x: u32,
    pub y: u32,
    pub rgb: Rgb,
    pub xyz: Xyz,
    pub lab: Lab,
    pub oklch: OkLch,
    /// Raw 7-bit gray sample when picking from a GB7 source
    pub gb7: Option<u8>,
}

/// Sample `(x, y)`, clamped into the source bounds
///
/// The source must not be zero-area.
pub fn pick(source: PickSource<'_>, x: i64, y: i64) -> PickInfo {
    let (width, height) = match source {
        PickSource::Rgba(buf) => buf.dimensions(),
        PickSource::Gray(buf) => buf.dimensions(),
    };
    let x = x.clamp(0, width as i64 - 1) as u32;
    let y = y.clamp(0, height as i64 - 1) as u32;

    let (rgb, gb7) = match source {
        PickSource::Rgba(buf) => {
            let [r, g, b, _] = buf.pixel(x, y);
            (Rgb::new(r, g, b), None)
        }
        PickSource::Gray(buf) => {
            let v = buf.gray_at(x, y);
            (gb7_to_rgb(v), Some(v))
        }
    };

    let xyz = rgb_to_xyz(rgb);
    PickInfo {
        x,
        y,
        rgb,
        xyz,
        lab: xyz_to_lab(xyz),
        oklch: rgb_to_oklch(rgb),
        gb7,
    }
}
