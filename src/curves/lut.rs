//! 256-entry lookup tables built from two-point curves

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::luminance;
use crate::engine::{clamp_channel, PixelBuffer, RGBA_CHANNELS};

/// Lookup table mapping an input byte to an output byte
pub type Lut = [u8; 256];

/// Curve control point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    #[serde(rename = "in")]
    pub input: u8,
    #[serde(rename = "out")]
    pub output: u8,
}

impl CurvePoint {
    pub const fn new(input: u8, output: u8) -> Self {
        Self { input, output }
    }
}

/// Two control points of a piecewise-linear tone curve
///
/// The editor keeps `p1.input <= p2.input`; the engine does not enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePair {
    pub p1: CurvePoint,
    pub p2: CurvePoint,
}

impl CurvePair {
    pub const fn new(p1: CurvePoint, p2: CurvePoint) -> Self {
        Self { p1, p2 }
    }

    /// The identity curve `(0, 0) - (255, 255)`
    pub const fn identity() -> Self {
        Self::new(CurvePoint::new(0, 0), CurvePoint::new(255, 255))
    }

    /// Build this curve's table with the given semantic
    pub fn to_lut(&self, semantic: CurveSemantic) -> Lut {
        build_lut_with(self.p1, self.p2, semantic)
    }
}

impl Default for CurvePair {
    fn default() -> Self {
        Self::identity()
    }
}

/// How a curve behaves outside its two control points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveSemantic {
    /// Lines from the origin to `p1` and from `p2` to `(255, 255)`
    #[default]
    Ramped,
    /// Flat at `p1.out` below `p1` and at `p2.out` above `p2`
    Clamped,
}

/// The identity table
pub fn identity_lut() -> Lut {
    std::array::from_fn(|i| i as u8)
}

/// Build a table with ramped extrapolation (the canonical curve)
///
/// - `x <= p1.in`: `y = p1.out / max(1, p1.in) * x`
/// - `x >= p2.in`: `y = p2.out + (x - p2.in) * (255 - p2.out) / max(1, 255 - p2.in)`
/// - otherwise linear between `p1` and `p2`
pub fn build_lut(p1: CurvePoint, p2: CurvePoint) -> Lut {
    let (x1, y1) = (p1.input as f64, p1.output as f64);
    let (x2, y2) = (p2.input as f64, p2.output as f64);

    std::array::from_fn(|i| {
        let x = i as f64;
        let y = if x <= x1 {
            y1 / x1.max(1.0) * x
        } else if x >= x2 {
            y2 + (x - x2) * ((255.0 - y2) / (255.0 - x2).max(1.0))
        } else {
            y1 + (y2 - y1) * ((x - x1) / (x2 - x1).max(1.0))
        };
        y.round().clamp(0.0, 255.0) as u8
    })
}

/// Build a table with flat clamping outside the control points
///
/// Points are ordered by input first, so swapped points behave the same.
pub fn build_lut_clamped(p1: CurvePoint, p2: CurvePoint) -> Lut {
    let (lo, hi) = if p1.input <= p2.input { (p1, p2) } else { (p2, p1) };
    let (x1, y1) = (lo.input as f64, lo.output as f64);
    let (x2, y2) = (hi.input as f64, hi.output as f64);

    std::array::from_fn(|i| {
        let x = i as f64;
        let y = if x <= x1 {
            y1
        } else if x >= x2 {
            y2
        } else {
            y1 + (x - x1) / (x2 - x1) * (y2 - y1)
        };
        y.round().clamp(0.0, 255.0) as u8
    })
}

/// Build a table with an explicit semantic
pub fn build_lut_with(p1: CurvePoint, p2: CurvePoint, semantic: CurveSemantic) -> Lut {
    match semantic {
        CurveSemantic::Ramped => build_lut(p1, p2),
        CurveSemantic::Clamped => build_lut_clamped(p1, p2),
    }
}

/// Optional per-channel tables; a missing table leaves its channel unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LutSet {
    pub r: Option<Lut>,
    pub g: Option<Lut>,
    pub b: Option<Lut>,
    pub a: Option<Lut>,
}

impl LutSet {
    /// Same table on R, G and B
    pub fn uniform_rgb(lut: Lut) -> Self {
        Self {
            r: Some(lut),
            g: Some(lut),
            b: Some(lut),
            a: None,
        }
    }

    /// Table on alpha only
    pub fn alpha(lut: Lut) -> Self {
        Self {
            a: Some(lut),
            ..Default::default()
        }
    }
}

/// Which channels [`apply_lut`] rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LutTarget {
    /// R, G and B through their own tables; alpha copied
    #[default]
    Rgb,
    /// Alpha through the alpha table; colour copied
    Alpha,
    /// Rec. 709 luminance through the R table, written to all three colour
    /// channels; alpha copied
    Gray,
}

#[inline]
fn map(lut: &Option<Lut>, v: u8) -> u8 {
    lut.as_ref().map_or(v, |t| t[v as usize])
}

/// Apply lookup tables to a buffer, returning a new buffer
pub fn apply_lut(buffer: &PixelBuffer, luts: &LutSet, target: LutTarget) -> PixelBuffer {
    debug!(size = ?buffer.dimensions(), ?target, "applying LUT");

    PixelBuffer::from_rows(buffer.width(), buffer.height(), |y, row| {
        let src = buffer.row(y as u32);
        for (d, s) in row
            .chunks_exact_mut(RGBA_CHANNELS)
            .zip(src.chunks_exact(RGBA_CHANNELS))
        {
            match target {
                LutTarget::Rgb => {
                    d[0] = map(&luts.r, s[0]);
                    d[1] = map(&luts.g, s[1]);
                    d[2] = map(&luts.b, s[2]);
                    d[3] = s[3];
                }
                LutTarget::Alpha => {
                    d[..3].copy_from_slice(&s[..3]);
                    d[3] = map(&luts.a, s[3]);
                }
                LutTarget::Gray => {
                    let level = clamp_channel(luminance(s[0], s[1], s[2]) as f32, 255);
                    let v = map(&luts.r, level);
                    d[..3].fill(v);
                    d[3] = s[3];
                }
            }
        }
    })
}
