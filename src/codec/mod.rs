//! Codec Module
//!
//! Binary codecs owned by the engine. GB7 is the only wire format; generic
//! raster formats are handled by the host.

mod gb7;

pub use gb7::{
    decode_gb7, decode_gb7_with_mask_plane, encode_gb7, read_gb7_header, Gb7EncodeOptions,
    Gb7Header, MaskLayout, GB7_HEADER_LEN, GB7_MAGIC, GB7_VERSION,
};
