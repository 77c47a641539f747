//! Fitting an image into a canvas while preserving aspect ratio

use super::{resample_rgba, ResampleMethod};
use crate::engine::{PixelBuffer, RGBA_CHANNELS};

/// Destination rectangle of a fitted image inside a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest uniform scale that fits `width` x `height` inside the box
///
/// Returns 1.0 when any dimension is zero.
pub fn fit_scale(width: u32, height: u32, box_width: u32, box_height: u32) -> f64 {
    if width == 0 || height == 0 || box_width == 0 || box_height == 0 {
        return 1.0;
    }
    (box_width as f64 / width as f64).min(box_height as f64 / height as f64)
}

/// Scaled size and centred offset of an image fitted into a canvas
pub fn fit_placement(width: u32, height: u32, canvas_width: u32, canvas_height: u32) -> Placement {
    let k = fit_scale(width, height, canvas_width, canvas_height);
    let w = ((width as f64 * k).round() as u32).clamp(1, canvas_width.max(1));
    let h = ((height as f64 * k).round() as u32).clamp(1, canvas_height.max(1));
    Placement {
        x: canvas_width.saturating_sub(w) / 2,
        y: canvas_height.saturating_sub(h) / 2,
        width: w,
        height: h,
    }
}

/// Scale `src` to fit the canvas and centre it on a transparent background
pub fn fit_within(
    src: &PixelBuffer,
    canvas_width: u32,
    canvas_height: u32,
    method: ResampleMethod,
) -> PixelBuffer {
    let place = fit_placement(src.width(), src.height(), canvas_width, canvas_height);
    let scaled = resample_rgba(src, place.width, place.height, method);

    let start = place.x as usize * RGBA_CHANNELS;
    let len = place.width as usize * RGBA_CHANNELS;
    PixelBuffer::from_rows(canvas_width, canvas_height, |y, row| {
        let y = y as u32;
        if y >= place.y && y < place.y + place.height {
            row[start..start + len].copy_from_slice(scaled.row(y - place.y));
        }
    })
}
