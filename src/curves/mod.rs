//! Tone Curve (LUT) Engine
//!
//! Builds 256-entry lookup tables from two-point piecewise-linear curves and
//! applies them to RGBA buffers. Ramped extrapolation is the canonical curve
//! shape; flat clamping is available as [`CurveSemantic::Clamped`].

mod channels;
mod lut;

pub use channels::{ChannelCurves, CurveChannel};
pub use lut::{
    apply_lut, build_lut, build_lut_clamped, build_lut_with, identity_lut, CurvePair,
    CurvePoint, CurveSemantic, Lut, LutSet, LutTarget,
};
