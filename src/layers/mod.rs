//! Layer Model Module
//!
//! Layers and the caller-owned document that stacks them:
//! - [`Layer`]: an image buffer or a flat colour with blend settings
//! - [`Document`]: source kind, canvas size, layer stack and active layer

mod document;
mod layer;

pub use document::Document;
pub use layer::{BlendMode, Layer, LayerKind, LayerSummary};
