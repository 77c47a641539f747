//! Compositing Engine
//!
//! Flattens an ordered stack of image and colour layers into one RGBA buffer
//! using per-pixel blend modes and source-over alpha.

mod blend;
mod composite;

pub use blend::{blend_channel, blend_pixel};
pub use composite::composite;
