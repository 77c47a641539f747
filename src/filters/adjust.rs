//! Alpha utilities

use crate::engine::{PixelBuffer, RGBA_CHANNELS};

/// Composite every pixel over opaque white
pub fn burn_alpha_to_white(buffer: &PixelBuffer) -> PixelBuffer {
    PixelBuffer::from_rows(buffer.width(), buffer.height(), |y, row| {
        let src = buffer.row(y as u32);
        for (d, s) in row
            .chunks_exact_mut(RGBA_CHANNELS)
            .zip(src.chunks_exact(RGBA_CHANNELS))
        {
            let a = s[3] as f32 / 255.0;
            for c in 0..3 {
                d[c] = (s[c] as f32 * a + 255.0 * (1.0 - a)).round() as u8;
            }
            d[3] = u8::MAX;
        }
    })
}

/// Force alpha to 255 without changing colour
pub fn strip_alpha(buffer: &PixelBuffer) -> PixelBuffer {
    PixelBuffer::from_rows(buffer.width(), buffer.height(), |y, row| {
        row.copy_from_slice(buffer.row(y as u32));
        for px in row.chunks_exact_mut(RGBA_CHANNELS) {
            px[3] = u8::MAX;
        }
    })
}

/// True if every pixel has alpha 0
pub fn is_fully_transparent(buffer: &PixelBuffer) -> bool {
    buffer
        .data()
        .chunks_exact(RGBA_CHANNELS)
        .all(|px| px[3] == 0)
}
