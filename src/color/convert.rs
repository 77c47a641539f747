//! Colour space conversions
//!
//! Pure functions between sRGB (0..255), linear RGB, CIE XYZ (D65),
//! CIE Lab, LCH, OKLab, OKLch and the 7-bit GB7 gray scale.

use serde::{Deserialize, Serialize};

// ============================================================================
// Types
// ============================================================================

/// 8-bit sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Neutral gray with all channels equal to `level`
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }
}

/// CIE XYZ tristimulus values (D65, Y of white = 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// CIE L*a*b*
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Polar CIE Lab: lightness, chroma, hue in degrees `[0, 360)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

/// Björn Ottosson's OKLab
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OkLab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Polar OKLab: lightness, chroma, hue in degrees `[0, 360)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OkLch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

// ============================================================================
// Constants
// ============================================================================

const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// D65 reference white
const WHITE_X: f64 = 0.95047;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.08883;

const DELTA: f64 = 6.0 / 29.0;

const LINEAR_TO_LMS: [[f64; 3]; 3] = [
    [0.4122214708, 0.5363325363, 0.0514459929],
    [0.2119034982, 0.6806995451, 0.1073969566],
    [0.0883024619, 0.2817188376, 0.6299787005],
];

const LMS_TO_OKLAB: [[f64; 3]; 3] = [
    [0.2104542553, 0.7936177850, -0.0040720468],
    [1.9779984951, -2.4285922050, 0.4505937099],
    [0.0259040371, 0.7827717662, -0.8086757660],
];

const OKLAB_TO_LMS: [[f64; 3]; 3] = [
    [1.0, 0.3963377774, 0.2158037573],
    [1.0, -0.1055613458, -0.0638541728],
    [1.0, -0.0894841775, -1.2914855480],
];

const LMS_TO_LINEAR: [[f64; 3]; 3] = [
    [4.0767416621, -3.3077115913, 0.2309699292],
    [-1.2684380046, 2.6097574011, -0.3413193965],
    [-0.0041960863, -0.7034186147, 1.7076147010],
];

/// Rec. 709 luma weights used for gray derivation
const LUMA: [f64; 3] = [0.2126, 0.7152, 0.0722];

// ============================================================================
// Helpers
// ============================================================================

#[inline]
fn mul3(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

#[inline]
fn to_unit(c: u8) -> f64 {
    c as f64 / 255.0
}

#[inline]
fn from_unit(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn polar(l: f64, a: f64, b: f64) -> (f64, f64, f64) {
    let c = a.hypot(b);
    let mut h = b.atan2(a).to_degrees();
    if h < 0.0 {
        h += 360.0;
    }
    // -0.0 and rounding at the wrap point
    if h >= 360.0 {
        h -= 360.0;
    }
    (l, c, h)
}

fn cartesian(l: f64, c: f64, h: f64) -> (f64, f64, f64) {
    let hr = h.to_radians();
    (l, c * hr.cos(), c * hr.sin())
}

// ============================================================================
// sRGB <-> linear
// ============================================================================

/// sRGB transfer function: encoded `[0, 1]` to linear `[0, 1]`
#[inline]
pub fn srgb_to_linear(v: f64) -> f64 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Inverse sRGB transfer function: linear `[0, 1]` to encoded `[0, 1]`
#[inline]
pub fn linear_to_srgb(v: f64) -> f64 {
    if v <= 0.0031308 {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

fn rgb_to_linear(rgb: Rgb) -> [f64; 3] {
    [
        srgb_to_linear(to_unit(rgb.r)),
        srgb_to_linear(to_unit(rgb.g)),
        srgb_to_linear(to_unit(rgb.b)),
    ]
}

fn linear_to_rgb(lin: [f64; 3]) -> Rgb {
    Rgb::new(
        from_unit(linear_to_srgb(lin[0].clamp(0.0, 1.0))),
        from_unit(linear_to_srgb(lin[1].clamp(0.0, 1.0))),
        from_unit(linear_to_srgb(lin[2].clamp(0.0, 1.0))),
    )
}

// ============================================================================
// RGB <-> XYZ
// ============================================================================

/// sRGB to CIE XYZ (D65)
pub fn rgb_to_xyz(rgb: Rgb) -> Xyz {
    let [x, y, z] = mul3(&RGB_TO_XYZ, rgb_to_linear(rgb));
    Xyz { x, y, z }
}

/// CIE XYZ (D65) to sRGB; out-of-gamut values are clamped
pub fn xyz_to_rgb(xyz: Xyz) -> Rgb {
    linear_to_rgb(mul3(&XYZ_TO_RGB, [xyz.x, xyz.y, xyz.z]))
}

// ============================================================================
// XYZ <-> Lab
// ============================================================================

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > DELTA.powi(3) {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

#[inline]
fn lab_finv(t: f64) -> f64 {
    if t > DELTA {
        t.powi(3)
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

/// CIE XYZ to CIE Lab against the D65 white point
pub fn xyz_to_lab(xyz: Xyz) -> Lab {
    let fx = lab_f(xyz.x / WHITE_X);
    let fy = lab_f(xyz.y / WHITE_Y);
    let fz = lab_f(xyz.z / WHITE_Z);
    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// CIE Lab to CIE XYZ
pub fn lab_to_xyz(lab: Lab) -> Xyz {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = fy + lab.a / 500.0;
    let fz = fy - lab.b / 200.0;
    Xyz {
        x: WHITE_X * lab_finv(fx),
        y: WHITE_Y * lab_finv(fy),
        z: WHITE_Z * lab_finv(fz),
    }
}

// ============================================================================
// Lab <-> LCH
// ============================================================================

/// Lab to polar LCH
pub fn lab_to_lch(lab: Lab) -> Lch {
    let (l, c, h) = polar(lab.l, lab.a, lab.b);
    Lch { l, c, h }
}

/// Polar LCH to Lab
pub fn lch_to_lab(lch: Lch) -> Lab {
    let (l, a, b) = cartesian(lch.l, lch.c, lch.h);
    Lab { l, a, b }
}

// ============================================================================
// OKLab / OKLch
// ============================================================================

/// sRGB to OKLab
pub fn rgb_to_oklab(rgb: Rgb) -> OkLab {
    let lms = mul3(&LINEAR_TO_LMS, rgb_to_linear(rgb));
    let lms = [lms[0].cbrt(), lms[1].cbrt(), lms[2].cbrt()];
    let [l, a, b] = mul3(&LMS_TO_OKLAB, lms);
    OkLab { l, a, b }
}

/// OKLab to sRGB; out-of-gamut values are clamped
pub fn oklab_to_rgb(lab: OkLab) -> Rgb {
    let lms = mul3(&OKLAB_TO_LMS, [lab.l, lab.a, lab.b]);
    let lms = [lms[0].powi(3), lms[1].powi(3), lms[2].powi(3)];
    linear_to_rgb(mul3(&LMS_TO_LINEAR, lms))
}

/// OKLab to polar OKLch
pub fn oklab_to_oklch(lab: OkLab) -> OkLch {
    let (l, c, h) = polar(lab.l, lab.a, lab.b);
    OkLch { l, c, h }
}

/// Polar OKLch to OKLab
pub fn oklch_to_oklab(lch: OkLch) -> OkLab {
    let (l, a, b) = cartesian(lch.l, lch.c, lch.h);
    OkLab { l, a, b }
}

/// sRGB to OKLch
pub fn rgb_to_oklch(rgb: Rgb) -> OkLch {
    oklab_to_oklch(rgb_to_oklab(rgb))
}

// ============================================================================
// GB7
// ============================================================================

/// Rec. 709 luminance of 8-bit sRGB values, on the 0..255 scale
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    LUMA[0] * r as f64 + LUMA[1] * g as f64 + LUMA[2] * b as f64
}

/// Expand a 7-bit gray sample to 8 bits: `round(v * 255 / 127)`
///
/// Samples above 127 are clamped. Linear scaling is used everywhere a GB7
/// sample becomes visible (rendering, eyedropper, raw preview).
#[inline]
pub fn gb7_to_level(v: u8) -> u8 {
    let v = v.min(127) as f32;
    (v * 255.0 / 127.0).round() as u8
}

/// GB7 gray sample to a neutral sRGB colour
pub fn gb7_to_rgb(v: u8) -> Rgb {
    Rgb::gray(gb7_to_level(v))
}

/// Quantise an 8-bit luminance to a 7-bit gray sample: `round(y * 127 / 255)`
#[inline]
pub fn level_to_gb7(y: f64) -> u8 {
    (y * 127.0 / 255.0).round().clamp(0.0, 127.0) as u8
}

/// sRGB to a 7-bit gray sample via Rec. 709 luminance
pub fn rgb_to_gb7(rgb: Rgb) -> u8 {
    level_to_gb7(luminance(rgb.r, rgb.g, rgb.b))
}
