//! Rastra - In-Memory Raster Processing Engine
//!
//! Rastra provides the pixel-level core of a layered image editor:
//! 1. GB7 codec - a 7-bit grayscale format with an optional opacity mask
//! 2. Compositing - blend modes and source-over alpha over a layer stack
//! 3. Colour conversion - sRGB, XYZ, Lab, LCH, OKLab, OKLch and GB7 gray
//! 4. Resampling, tone curves (LUTs) and 3x3 convolution
//!
//! # Architecture
//!
//! Every transform is a pure function over explicit buffers and returns a
//! new buffer. Editing state lives in a caller-owned [`Document`]:
//! - `preview_*` methods compute a result without storing it
//! - [`Document::commit`] stores a result on a layer
//!
//! # Example
//! ```
//! use rastra::{decode_gb7, Document};
//!
//! let bytes = [0x47, 0x42, 0x37, 0x1D, 1, 0, 0, 2, 0, 1, 0, 0, 0x00, 0x7F];
//! let gray = decode_gb7(&bytes).unwrap();
//! let doc = Document::from_gb7(gray);
//! let flat = doc.composite();
//! assert_eq!(flat.pixel(0, 0), [0, 0, 0, 255]);
//! assert_eq!(flat.pixel(1, 0), [255, 255, 255, 255]);
//! ```

pub mod codec;
pub mod color;
pub mod compositing;
pub mod config;
pub mod curves;
pub mod engine;
pub mod error;
pub mod filters;
pub mod layers;
pub mod logging;
pub mod resample;

pub use codec::{decode_gb7, decode_gb7_with_mask_plane, encode_gb7, Gb7EncodeOptions, MaskLayout};
pub use color::{gb7_to_rgb, pick, rgb_to_gb7, PickInfo, PickSource, Rgb};
pub use compositing::composite;
pub use config::{EngineConfig, LoggingConfig};
pub use curves::{
    apply_lut, build_lut, ChannelCurves, CurvePair, CurvePoint, CurveSemantic, Lut, LutSet,
    LutTarget,
};
pub use engine::{GrayBuffer, GrayDepth, ImageKind, PixelBuffer};
pub use error::{RastraError, Result};
pub use filters::{convolve3x3, ConvolveOptions, ConvolveTarget, Kernel3x3, KernelPreset};
pub use layers::{BlendMode, Document, Layer, LayerKind};
pub use resample::{resample_gray, resample_rgba, ResampleMethod};
