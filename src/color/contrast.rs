//! Contrast metrics between two sRGB colours

use super::convert::Rgb;

/// WCAG 2.x relative luminance
fn relative_luminance(rgb: Rgb) -> f64 {
    let channel = |c: u8| {
        let s = c as f64 / 255.0;
        if s <= 0.03928 {
            s / 12.92
        } else {
            ((s + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * channel(rgb.r) + 0.7152 * channel(rgb.g) + 0.0722 * channel(rgb.b)
}

/// WCAG 2.x contrast ratio, `1.0..=21.0`, symmetric in its arguments
pub fn wcag_contrast(a: Rgb, b: Rgb) -> f64 {
    let (la, lb) = (relative_luminance(a), relative_luminance(b));
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// Simplified APCA-style lightness contrast
///
/// Signed: positive when `text` is lighter than `background`. A rough
/// estimate on gamma-encoded luma, not a conformant APCA implementation.
pub fn apca_contrast(text: Rgb, background: Rgb) -> f64 {
    let y = |c: Rgb| {
        0.2126 * (c.r as f64 / 255.0) + 0.7152 * (c.g as f64 / 255.0) + 0.0722 * (c.b as f64 / 255.0)
    };
    1.14 * (y(text) - y(background))
}
