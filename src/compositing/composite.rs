//! Layer stack flattening

use tracing::{debug, warn};

use super::blend::blend_pixel;
use crate::engine::{PixelBuffer, RGBA_CHANNELS};
use crate::layers::{Layer, LayerKind};

/// Source pixels of a layer that passed the composite filter
enum Source<'a> {
    Image(&'a PixelBuffer),
    Flat([u8; 4]),
}

/// Flatten `layers` (index 0 = bottom) into one `width` x `height` buffer
///
/// The destination starts fully transparent black. Hidden layers and layers
/// with zero opacity are ignored. Image layers whose size differs from the
/// target are skipped with a warning rather than failing the composite.
/// Colour layers cover the whole target.
///
/// # Example
/// ```
/// use rastra::{composite, Layer, PixelBuffer};
///
/// let base = PixelBuffer::filled(2, 2, [10, 20, 30, 255]);
/// let out = composite(&[Layer::image("base", base.clone())], 2, 2);
/// assert_eq!(out, base);
/// ```
pub fn composite(layers: &[Layer], width: u32, height: u32) -> PixelBuffer {
    let stack: Vec<(&Layer, Source<'_>)> = layers
        .iter()
        .filter(|layer| layer.is_composited())
        .filter_map(|layer| match &layer.kind {
            LayerKind::Image { buffer } if buffer.dimensions() == (width, height) => {
                Some((layer, Source::Image(buffer)))
            }
            LayerKind::Image { buffer } => {
                warn!(
                    layer = %layer.id,
                    layer_size = ?buffer.dimensions(),
                    target_size = ?(width, height),
                    "skipping layer with mismatched dimensions"
                );
                None
            }
            LayerKind::Color { rgb, a } => Some((layer, Source::Flat([rgb.r, rgb.g, rgb.b, *a]))),
        })
        .collect();

    debug!(
        layers = layers.len(),
        composited = stack.len(),
        width,
        height,
        "compositing layer stack"
    );

    PixelBuffer::from_rows(width, height, |y, row| {
        for (layer, source) in &stack {
            let opacity = layer.opacity.clamp(0.0, 1.0);
            let apply = |dst: &mut [u8], src: [u8; 4]| {
                let current = [dst[0], dst[1], dst[2], dst[3]];
                let out = blend_pixel(layer.blend_mode, src, current, opacity, layer.alpha_hidden);
                dst.copy_from_slice(&out);
            };
            match source {
                Source::Flat(px) => {
                    for dst in row.chunks_exact_mut(RGBA_CHANNELS) {
                        apply(dst, *px);
                    }
                }
                Source::Image(buffer) => {
                    let src_row = buffer.row(y as u32).chunks_exact(RGBA_CHANNELS);
                    for (dst, src) in row.chunks_exact_mut(RGBA_CHANNELS).zip(src_row) {
                        apply(dst, [src[0], src[1], src[2], src[3]]);
                    }
                }
            }
        }
    })
}
