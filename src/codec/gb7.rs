//! GB7 binary codec
//!
//! Layout (header fields big-endian):
//!
//! | offset | size | field                                  |
//! |--------|------|----------------------------------------|
//! | 0      | 4    | magic `47 42 37 1D` ("GB7" + 0x1D)     |
//! | 4      | 1    | version                                |
//! | 5      | 1    | flags, bit 0 = has mask                |
//! | 6      | 2    | width (u16)                            |
//! | 8      | 2    | height (u16)                           |
//! | 10     | 2    | reserved, must be `0x0000`             |
//! | 12     | w*h  | pixel plane                            |
//!
//! Canonical layout: the opacity mask lives inline in bit 7 of each pixel
//! byte, the low 7 bits hold gray. [`MaskLayout::Plane`] is the alternate
//! layout where the gray plane is followed by a separate 1-bit mask plane
//! (MSB first, rows padded to whole bytes); it is read back only through
//! [`decode_gb7_with_mask_plane`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::{level_to_gb7, luminance};
use crate::engine::{GrayBuffer, GrayDepth, PixelBuffer, GRAY_BITS, OPACITY_BIT, RGBA_CHANNELS};
use crate::error::{RastraError, Result};

// ============================================================================
// Constants
// ============================================================================

/// File signature
pub const GB7_MAGIC: [u8; 4] = [0x47, 0x42, 0x37, 0x1D];

/// Version byte written by the encoder
pub const GB7_VERSION: u8 = 1;

/// Header size in bytes
pub const GB7_HEADER_LEN: usize = 12;

const FLAG_HAS_MASK: u8 = 0b0000_0001;

// ============================================================================
// Options
// ============================================================================

/// Where the encoder stores the opacity mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskLayout {
    /// Bit 7 of each pixel byte
    #[default]
    Inline,
    /// Trailing bitmask plane after the gray plane
    Plane,
}

/// Encoder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gb7EncodeOptions {
    /// Alpha at or above this value is written as opaque
    pub alpha_opaque_threshold: u8,
    /// Write a mask even when every pixel is opaque
    pub force_alpha_mask: bool,
    /// Mask placement
    pub mask_layout: MaskLayout,
}

impl Default for Gb7EncodeOptions {
    fn default() -> Self {
        Self {
            alpha_opaque_threshold: 128,
            force_alpha_mask: false,
            mask_layout: MaskLayout::Inline,
        }
    }
}

// ============================================================================
// Header
// ============================================================================

/// Parsed GB7 header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gb7Header {
    pub version: u8,
    pub has_mask: bool,
    pub width: u16,
    pub height: u16,
}

impl Gb7Header {
    /// Size of the gray plane in bytes
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of a separate mask plane in bytes
    pub fn mask_plane_len(&self) -> usize {
        mask_row_bytes(self.width as usize) * self.height as usize
    }

    fn to_bytes(self) -> [u8; GB7_HEADER_LEN] {
        let mut out = [0; GB7_HEADER_LEN];
        out[..4].copy_from_slice(&GB7_MAGIC);
        out[4] = self.version;
        out[5] = if self.has_mask { FLAG_HAS_MASK } else { 0 };
        out[6..8].copy_from_slice(&self.width.to_be_bytes());
        out[8..10].copy_from_slice(&self.height.to_be_bytes());
        out
    }
}

#[inline]
fn mask_row_bytes(width: usize) -> usize {
    width.div_ceil(8)
}

/// Parse and validate the 12-byte header
///
/// # Errors
/// - `InvalidMagic` if the first four bytes are not `47 42 37 1D`
/// - `Truncated` if fewer than 12 bytes are available
/// - `ReservedNotZero` if bytes 10..12 are not zero
pub fn read_gb7_header(bytes: &[u8]) -> Result<Gb7Header> {
    let magic_len = bytes.len().min(GB7_MAGIC.len());
    if bytes[..magic_len] != GB7_MAGIC[..magic_len] {
        warn!(found = ?&bytes[..magic_len], "rejecting GB7 input with bad magic");
        return Err(RastraError::InvalidMagic {
            found: bytes[..magic_len].to_vec(),
        });
    }
    if bytes.len() < GB7_HEADER_LEN {
        return Err(RastraError::Truncated {
            expected: GB7_HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let reserved = u16::from_be_bytes([bytes[10], bytes[11]]);
    if reserved != 0 {
        warn!(reserved, "rejecting GB7 input with non-zero reserved field");
        return Err(RastraError::ReservedNotZero { value: reserved });
    }

    Ok(Gb7Header {
        version: bytes[4],
        has_mask: bytes[5] & FLAG_HAS_MASK != 0,
        width: u16::from_be_bytes([bytes[6], bytes[7]]),
        height: u16::from_be_bytes([bytes[8], bytes[9]]),
    })
}

fn require_len(bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() < expected {
        warn!(expected, actual = bytes.len(), "rejecting truncated GB7 input");
        return Err(RastraError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

// ============================================================================
// Decode
// ============================================================================

/// Decode a GB7 stream in the canonical inline-mask layout
///
/// Exactly `width * height` pixel bytes are read after the header; any
/// trailing bytes are ignored.
///
/// # Example
/// ```
/// use rastra::decode_gb7;
///
/// let bytes = [0x47, 0x42, 0x37, 0x1D, 1, 0, 0, 2, 0, 1, 0, 0, 0x00, 0x7F];
/// let gray = decode_gb7(&bytes).unwrap();
/// assert_eq!(gray.pixels(), &[0, 127]);
/// ```
pub fn decode_gb7(bytes: &[u8]) -> Result<GrayBuffer> {
    let header = read_gb7_header(bytes)?;
    let count = header.pixel_count();
    require_len(bytes, GB7_HEADER_LEN + count)?;

    let depth = if header.has_mask {
        GrayDepth::Eight
    } else {
        GrayDepth::Seven
    };
    debug!(
        width = header.width,
        height = header.height,
        has_mask = header.has_mask,
        "decoded GB7"
    );
    let plane = &bytes[GB7_HEADER_LEN..GB7_HEADER_LEN + count];
    let pixels = if header.has_mask {
        plane.to_vec()
    } else {
        // without a mask bit 7 carries nothing
        plane.iter().map(|&g| g & GRAY_BITS).collect()
    };
    GrayBuffer::from_raw(header.width as u32, header.height as u32, depth, pixels)
}

/// Decode a GB7 stream written with [`MaskLayout::Plane`]
///
/// The trailing mask plane is folded into bit 7 of each pixel so the result
/// has the same shape as [`decode_gb7`] output.
pub fn decode_gb7_with_mask_plane(bytes: &[u8]) -> Result<GrayBuffer> {
    let header = read_gb7_header(bytes)?;
    let count = header.pixel_count();
    let plane_len = if header.has_mask {
        header.mask_plane_len()
    } else {
        0
    };
    require_len(bytes, GB7_HEADER_LEN + count + plane_len)?;

    let width = header.width as usize;
    let gray = &bytes[GB7_HEADER_LEN..GB7_HEADER_LEN + count];
    let mask = &bytes[GB7_HEADER_LEN + count..GB7_HEADER_LEN + count + plane_len];
    let row_bytes = mask_row_bytes(width);

    let (depth, pixels) = if header.has_mask {
        let pixels = gray
            .iter()
            .enumerate()
            .map(|(p, &g)| {
                let (x, y) = (p % width, p / width);
                let bit = (mask[y * row_bytes + (x >> 3)] >> (7 - (x & 7))) & 1;
                (g & GRAY_BITS) | (bit << 7)
            })
            .collect();
        (GrayDepth::Eight, pixels)
    } else {
        (
            GrayDepth::Seven,
            gray.iter().map(|&g| g & GRAY_BITS).collect(),
        )
    };

    GrayBuffer::from_raw(header.width as u32, header.height as u32, depth, pixels)
}

// ============================================================================
// Encode
// ============================================================================

/// Encode an RGBA buffer as GB7
///
/// Gray is Rec. 709 luminance scaled to 7 bits. A mask is written when any
/// pixel has alpha below 255 or when `force_alpha_mask` is set; a pixel is
/// opaque in the mask when its alpha is at least `alpha_opaque_threshold`.
///
/// # Errors
/// Returns `DimensionsTooLarge` if either side exceeds 65535.
pub fn encode_gb7(buffer: &PixelBuffer, opts: &Gb7EncodeOptions) -> Result<Vec<u8>> {
    let (width, height) = buffer.dimensions();
    let (Ok(w16), Ok(h16)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(RastraError::DimensionsTooLarge { width, height });
    };

    let has_mask = opts.force_alpha_mask || buffer.has_transparency();
    let header = Gb7Header {
        version: GB7_VERSION,
        has_mask,
        width: w16,
        height: h16,
    };
    let plane_len = match (has_mask, opts.mask_layout) {
        (true, MaskLayout::Plane) => header.mask_plane_len(),
        _ => 0,
    };

    let mut out = Vec::with_capacity(GB7_HEADER_LEN + header.pixel_count() + plane_len);
    out.extend_from_slice(&header.to_bytes());

    let opaque = |a: u8| a >= opts.alpha_opaque_threshold;
    let inline = has_mask && opts.mask_layout == MaskLayout::Inline;
    out.extend(buffer.data().chunks_exact(RGBA_CHANNELS).map(|px| {
        let gray = level_to_gb7(luminance(px[0], px[1], px[2]));
        if inline && opaque(px[3]) {
            gray | OPACITY_BIT
        } else {
            gray
        }
    }));

    if plane_len > 0 {
        let width = width as usize;
        let row_bytes = mask_row_bytes(width);
        let mut plane = vec![0u8; plane_len];
        for (p, px) in buffer.data().chunks_exact(RGBA_CHANNELS).enumerate() {
            if opaque(px[3]) {
                let (x, y) = (p % width, p / width);
                plane[y * row_bytes + (x >> 3)] |= 1 << (7 - (x & 7));
            }
        }
        out.extend_from_slice(&plane);
    }

    debug!(
        width,
        height,
        has_mask,
        layout = ?opts.mask_layout,
        bytes = out.len(),
        "encoded GB7"
    );
    Ok(out)
}
