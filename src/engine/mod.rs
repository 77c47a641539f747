//! Pixel Engine Module
//!
//! Core buffer types shared by every engine plus GB7 file I/O.

pub mod buffer;
pub mod io;

pub(crate) use buffer::clamp_channel;
pub use buffer::{
    GrayBuffer, GrayDepth, ImageKind, PixelBuffer, GRAY_BITS, GRAY_MAX, OPACITY_BIT,
    RGBA_CHANNELS,
};
pub use io::{read_gb7, write_gb7};
