//! Layer model
//!
//! A layer is either an image (an RGBA buffer the size of the document) or a
//! flat colour. Layers are stacked bottom to top and flattened by
//! [`crate::compositing::composite`].

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::engine::PixelBuffer;

/// Per-pixel channel combination applied before alpha compositing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
}

impl BlendMode {
    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            BlendMode::Normal => "Normal",
            BlendMode::Multiply => "Multiply",
            BlendMode::Screen => "Screen",
            BlendMode::Overlay => "Overlay",
        }
    }
}

/// Layer content
#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    /// Image pixels; must match the document size to be composited
    Image { buffer: PixelBuffer },
    /// Flat colour covering the whole document
    Color { rgb: Rgb, a: u8 },
}

/// One entry of the layer stack
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Hidden layers are not composited
    pub visible: bool,
    /// Layer opacity in `[0, 1]`
    pub opacity: f32,
    pub blend_mode: BlendMode,
    /// Whether the content carries meaningful transparency
    pub has_alpha: bool,
    /// Treat source alpha as 255 while compositing, without touching pixels
    pub alpha_hidden: bool,
    pub kind: LayerKind,
}

fn new_layer_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("layer_{}", &uuid[..8])
}

impl Layer {
    /// Create a visible, fully opaque, normal-mode image layer
    pub fn image(name: impl Into<String>, buffer: PixelBuffer) -> Self {
        Self {
            id: new_layer_id(),
            name: name.into(),
            visible: true,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            has_alpha: buffer.has_transparency(),
            alpha_hidden: false,
            kind: LayerKind::Image { buffer },
        }
    }

    /// Create a flat colour layer
    pub fn color(name: impl Into<String>, rgb: Rgb, a: u8) -> Self {
        Self {
            id: new_layer_id(),
            name: name.into(),
            visible: true,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            has_alpha: a < u8::MAX,
            alpha_hidden: false,
            kind: LayerKind::Color { rgb, a },
        }
    }

    /// Set the opacity, clamped to `[0, 1]`
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_alpha_hidden(mut self, hidden: bool) -> Self {
        self.alpha_hidden = hidden;
        self
    }

    /// True if the layer contributes to the composite
    pub fn is_composited(&self) -> bool {
        self.visible && self.opacity > 0.0
    }

    /// Image pixels, if this is an image layer
    pub fn buffer(&self) -> Option<&PixelBuffer> {
        match &self.kind {
            LayerKind::Image { buffer } => Some(buffer),
            LayerKind::Color { .. } => None,
        }
    }

    /// Summary for UI/state inspection
    pub fn summary(&self) -> LayerSummary {
        LayerSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: match self.kind {
                LayerKind::Image { .. } => "image",
                LayerKind::Color { .. } => "color",
            },
            visible: self.visible,
            opacity: self.opacity,
            blend_mode: self.blend_mode,
            has_alpha: self.has_alpha,
            alpha_hidden: self.alpha_hidden,
            dimensions: self.buffer().map(PixelBuffer::dimensions),
        }
    }
}

/// Serializable snapshot of a layer's settings (pixels excluded)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSummary {
    pub id: String,
    pub name: String,
    pub kind: &'static str,
    pub visible: bool,
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub has_alpha: bool,
    pub alpha_hidden: bool,
    pub dimensions: Option<(u32, u32)>,
}
