//! Per-channel curve state as edited by the host's curves panel

use serde::{Deserialize, Serialize};

use super::lut::{CurvePair, CurveSemantic, LutSet, LutTarget};

/// Channel selector for curve editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveChannel {
    R,
    G,
    B,
    /// Combined gray; drives R, G and B for GB7 documents
    Gray,
    A,
}

impl CurveChannel {
    /// Which channels editing this curve rewrites
    pub fn target(self) -> LutTarget {
        match self {
            CurveChannel::A => LutTarget::Alpha,
            _ => LutTarget::Rgb,
        }
    }
}

/// One curve per editable channel, all starting as identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelCurves {
    pub r: CurvePair,
    pub g: CurvePair,
    pub b: CurvePair,
    pub gray: CurvePair,
    pub a: CurvePair,
}

impl ChannelCurves {
    /// Curve of one channel
    pub fn get(&self, channel: CurveChannel) -> &CurvePair {
        match channel {
            CurveChannel::R => &self.r,
            CurveChannel::G => &self.g,
            CurveChannel::B => &self.b,
            CurveChannel::Gray => &self.gray,
            CurveChannel::A => &self.a,
        }
    }

    /// Replace the curve of one channel
    pub fn set(&mut self, channel: CurveChannel, pair: CurvePair) {
        match channel {
            CurveChannel::R => self.r = pair,
            CurveChannel::G => self.g = pair,
            CurveChannel::B => self.b = pair,
            CurveChannel::Gray => self.gray = pair,
            CurveChannel::A => self.a = pair,
        }
    }

    /// Reset every channel to identity
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build the full table set
    ///
    /// For GB7 documents the gray curve is used for R, G and B; otherwise each
    /// colour channel uses its own curve. Alpha always uses the A curve.
    pub fn build_luts(&self, gb7: bool, semantic: CurveSemantic) -> LutSet {
        let a = Some(self.a.to_lut(semantic));
        if gb7 {
            let gray = self.gray.to_lut(semantic);
            LutSet {
                a,
                ..LutSet::uniform_rgb(gray)
            }
        } else {
            LutSet {
                r: Some(self.r.to_lut(semantic)),
                g: Some(self.g.to_lut(semantic)),
                b: Some(self.b.to_lut(semantic)),
                a,
            }
        }
    }
}
