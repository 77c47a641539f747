//! Pixel Buffer Management
//!
//! Provides the two buffer types every engine works on:
//! - [`PixelBuffer`]: dense RGBA8, row-major, 4 bytes per pixel
//! - [`GrayBuffer`]: one byte per pixel, low 7 bits gray, optional inline
//!   opacity flag in bit 7
//!
//! Buffers are value objects. Transforms read their input and return a
//! freshly allocated output; nothing is mutated in place.

use serde::{Deserialize, Serialize};

use crate::color::{gb7_to_level, level_to_gb7, luminance};
use crate::error::{RastraError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Bytes per RGBA8 pixel
pub const RGBA_CHANNELS: usize = 4;

/// Largest 7-bit gray sample
pub const GRAY_MAX: u8 = 127;

/// Mask selecting the gray sample from a GB7 pixel byte
pub const GRAY_BITS: u8 = 0b0111_1111;

/// Inline opacity flag of a GB7 pixel byte (1 = opaque)
pub const OPACITY_BIT: u8 = 0b1000_0000;

// ============================================================================
// Row driver
// ============================================================================

/// Run `f(row_index, row)` over every `row_len`-sized row of `data`.
///
/// With the `parallel` feature rows are distributed over the rayon pool;
/// rows are disjoint so the result is identical either way.
pub(crate) fn for_each_row<F>(data: &mut [u8], row_len: usize, f: F)
where
    F: Fn(usize, &mut [u8]) + Send + Sync,
{
    if row_len == 0 {
        return;
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        data.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| f(y, row));
    }

    #[cfg(not(feature = "parallel"))]
    {
        data.chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| f(y, row));
    }
}

/// Round and clamp a float channel value into `0..=max`
#[inline]
pub(crate) fn clamp_channel(value: f32, max: u8) -> u8 {
    value.round().clamp(0.0, max as f32) as u8
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// Dense RGBA8 image buffer
///
/// Invariant: `data.len() == width * height * 4`.
///
/// # Example
/// ```
/// use rastra::PixelBuffer;
///
/// let red = PixelBuffer::filled(2, 2, [255, 0, 0, 255]);
/// assert_eq!(red.pixel(1, 1), [255, 0, 0, 255]);
/// assert_eq!(red.data().len(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a fully transparent black buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; Self::byte_len(width, height)],
        }
    }

    /// Create a buffer where every pixel has the same RGBA value
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(Self::byte_len(width, height))
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap raw RGBA bytes
    ///
    /// # Errors
    /// Returns `BufferSizeMismatch` if `data.len() != width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = Self::byte_len(width, height);
        if data.len() != expected {
            return Err(RastraError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer row by row; `f` receives the row index and the
    /// zero-initialised destination row (`width * 4` bytes).
    pub(crate) fn from_rows<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(usize, &mut [u8]) + Send + Sync,
    {
        let mut data = vec![0; Self::byte_len(width, height)];
        for_each_row(&mut data, width as usize * RGBA_CHANNELS, f);
        Self {
            width,
            height,
            data,
        }
    }

    fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * RGBA_CHANNELS
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True for a zero-area buffer
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw RGBA bytes, row-major
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its bytes
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Bytes of row `y`
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * RGBA_CHANNELS;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// RGBA value at `(x, y)`
    ///
    /// # Panics
    /// Panics if the coordinate is outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * RGBA_CHANNELS;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// True if any pixel is not fully opaque
    pub fn has_transparency(&self) -> bool {
        self.data
            .chunks_exact(RGBA_CHANNELS)
            .any(|px| px[3] < u8::MAX)
    }
}

// ============================================================================
// GrayBuffer
// ============================================================================

/// Bit depth of a [`GrayBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrayDepth {
    /// 7-bit gray, bit 7 unused
    Seven,
    /// 7-bit gray plus an inline opacity flag in bit 7
    Eight,
}

impl GrayDepth {
    /// Number of meaningful bits per pixel
    pub fn bits(self) -> u8 {
        match self {
            GrayDepth::Seven => 7,
            GrayDepth::Eight => 8,
        }
    }
}

/// 7-bit grayscale buffer as stored by the GB7 format
///
/// Each byte's low 7 bits hold a gray sample `0..=127`. When the depth is
/// [`GrayDepth::Eight`] bit 7 is the pixel's opacity flag (1 = opaque).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayBuffer {
    width: u32,
    height: u32,
    depth: GrayDepth,
    pixels: Vec<u8>,
}

impl GrayBuffer {
    /// Create a black buffer; with a mask every pixel starts transparent
    pub fn new(width: u32, height: u32, depth: GrayDepth) -> Self {
        Self {
            width,
            height,
            depth,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Wrap raw GB7 pixel bytes
    ///
    /// # Errors
    /// Returns `BufferSizeMismatch` if `pixels.len() != width * height`.
    pub fn from_raw(width: u32, height: u32, depth: GrayDepth, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(RastraError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            depth,
            pixels,
        })
    }

    /// Quantise an RGBA buffer to GB7 gray
    ///
    /// Gray is Rec. 709 luminance scaled to 7 bits. With `with_mask` a pixel
    /// is opaque when its alpha is at least `alpha_opaque_threshold`;
    /// without it alpha is dropped.
    pub fn from_rgba(buffer: &PixelBuffer, alpha_opaque_threshold: u8, with_mask: bool) -> Self {
        let depth = if with_mask {
            GrayDepth::Eight
        } else {
            GrayDepth::Seven
        };
        Self::from_rows(buffer.width(), buffer.height(), depth, |y, row| {
            let src = buffer.row(y as u32);
            for (out, px) in row.iter_mut().zip(src.chunks_exact(RGBA_CHANNELS)) {
                let gray = level_to_gb7(luminance(px[0], px[1], px[2]));
                *out = if with_mask && px[3] >= alpha_opaque_threshold {
                    gray | OPACITY_BIT
                } else {
                    gray
                };
            }
        })
    }

    pub(crate) fn from_rows<F>(width: u32, height: u32, depth: GrayDepth, f: F) -> Self
    where
        F: Fn(usize, &mut [u8]) + Send + Sync,
    {
        let mut pixels = vec![0; width as usize * height as usize];
        for_each_row(&mut pixels, width as usize, f);
        Self {
            width,
            height,
            depth,
            pixels,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bit depth
    pub fn depth(&self) -> GrayDepth {
        self.depth
    }

    /// True if bit 7 of each pixel carries opacity
    pub fn has_mask(&self) -> bool {
        self.depth == GrayDepth::Eight
    }

    /// Raw pixel bytes (gray plus inline mask bit)
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the buffer and return its bytes
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Gray sample `0..=127` at `(x, y)`
    pub fn gray_at(&self, x: u32, y: u32) -> u8 {
        self.pixels[self.index(x, y)] & GRAY_BITS
    }

    /// Opacity at `(x, y)`; always true without a mask
    pub fn is_opaque_at(&self, x: u32, y: u32) -> bool {
        !self.has_mask() || self.pixels[self.index(x, y)] & OPACITY_BIT != 0
    }

    /// Render to RGBA: gray expanded to 8 bits, mask bit mapped to alpha 0/255
    pub fn to_rgba(&self) -> PixelBuffer {
        self.render(self.has_mask())
    }

    /// Render to RGBA ignoring the mask (every pixel opaque)
    ///
    /// This is the raw preview shown while a layer's alpha is hidden.
    pub fn to_rgba_opaque(&self) -> PixelBuffer {
        self.render(false)
    }

    fn render(&self, honor_mask: bool) -> PixelBuffer {
        let width = self.width as usize;
        PixelBuffer::from_rows(self.width, self.height, |y, row| {
            let src = &self.pixels[y * width..(y + 1) * width];
            for (px, &byte) in row.chunks_exact_mut(RGBA_CHANNELS).zip(src) {
                let level = gb7_to_level(byte & GRAY_BITS);
                let alpha = if !honor_mask || byte & OPACITY_BIT != 0 {
                    u8::MAX
                } else {
                    0
                };
                px.copy_from_slice(&[level, level, level, alpha]);
            }
        })
    }
}

// ============================================================================
// ImageKind
// ============================================================================

/// Where a document's pixels came from
///
/// Fixed at decode time and carried through the document so GB7-specific
/// behaviour (gray curves, gray eyedropper, GB7 export) never has to be
/// re-derived from buffer contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageKind {
    /// Generic RGBA raster
    Rgb,
    /// GB7 source, with the original gray samples
    Gb7(GrayBuffer),
}

impl ImageKind {
    /// True for a GB7 source
    pub fn is_gb7(&self) -> bool {
        matches!(self, ImageKind::Gb7(_))
    }

    /// The original gray samples, if any
    pub fn gray_source(&self) -> Option<&GrayBuffer> {
        match self {
            ImageKind::Gb7(gray) => Some(gray),
            ImageKind::Rgb => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_is_transparent_black() {
        let buf = PixelBuffer::new(3, 2);
        assert_eq!(buf.data().len(), 24);
        assert!(buf.data().iter().all(|&b| b == 0));
        assert_eq!(buf.dimensions(), (3, 2));
    }

    #[test]
    fn test_filled() {
        let buf = PixelBuffer::filled(2, 1, [1, 2, 3, 4]);
        assert_eq!(buf.data(), &[1, 2, 3, 4, 1, 2, 3, 4]);
        assert!(buf.has_transparency());
    }

    #[test]
    fn test_from_raw_validates_length() {
        let err = PixelBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(err.error_code(), "BUFFER_SIZE_MISMATCH");
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_pixel_and_row_access() {
        let data: Vec<u8> = (0..16).collect();
        let buf = PixelBuffer::from_raw(2, 2, data).unwrap();
        assert_eq!(buf.pixel(1, 0), [4, 5, 6, 7]);
        assert_eq!(buf.pixel(0, 1), [8, 9, 10, 11]);
        assert_eq!(buf.row(1), &[8, 9, 10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn test_from_rows_visits_every_row() {
        let buf = PixelBuffer::from_rows(2, 3, |y, row| row.fill(y as u8));
        assert_eq!(buf.pixel(1, 2), [2, 2, 2, 2]);
        assert_eq!(buf.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_gray_accessors() {
        let gray = GrayBuffer::from_raw(2, 1, GrayDepth::Eight, vec![0x85, 0x05]).unwrap();
        assert!(gray.has_mask());
        assert_eq!(gray.gray_at(0, 0), 5);
        assert_eq!(gray.gray_at(1, 0), 5);
        assert!(gray.is_opaque_at(0, 0));
        assert!(!gray.is_opaque_at(1, 0));
    }

    #[test]
    fn test_gray_without_mask_is_opaque() {
        let gray = GrayBuffer::from_raw(1, 1, GrayDepth::Seven, vec![0x80]).unwrap();
        assert!(gray.is_opaque_at(0, 0));
        assert_eq!(gray.gray_at(0, 0), 0);
    }

    #[test]
    fn test_gray_render() {
        let gray = GrayBuffer::from_raw(3, 1, GrayDepth::Eight, vec![0xFF, 0x00, 0xC0]).unwrap();
        let rgba = gray.to_rgba();
        assert_eq!(rgba.pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(rgba.pixel(1, 0), [0, 0, 0, 0]);
        // 64 * 255 / 127 = 128.5..
        assert_eq!(rgba.pixel(2, 0), [129, 129, 129, 255]);

        let raw = gray.to_rgba_opaque();
        assert_eq!(raw.pixel(1, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_gray_from_rgba() {
        let src = PixelBuffer::from_raw(3, 1, vec![
            255, 255, 255, 255,
            0, 0, 0, 127,
            90, 90, 90, 128,
        ])
        .unwrap();
        let masked = GrayBuffer::from_rgba(&src, 128, true);
        assert_eq!(masked.pixels(), &[0xFF, 0x00, 45 | OPACITY_BIT]);

        let flat = GrayBuffer::from_rgba(&src, 128, false);
        assert_eq!(flat.depth(), GrayDepth::Seven);
        assert_eq!(flat.pixels(), &[0x7F, 0x00, 45]);
    }

    #[test]
    fn test_image_kind() {
        let gray = GrayBuffer::new(1, 1, GrayDepth::Seven);
        let kind = ImageKind::Gb7(gray.clone());
        assert!(kind.is_gb7());
        assert_eq!(kind.gray_source(), Some(&gray));
        assert!(ImageKind::Rgb.gray_source().is_none());
    }
}
