//! Document
//!
//! The caller-owned editing state: source kind, canvas size, the layer stack
//! and the active layer. Every engine call goes through an explicit
//! `Document` value; there is no global "current image".
//!
//! Edits follow a preview/commit split. `preview_*` methods are pure and
//! return a new buffer; [`Document::commit`] stores a buffer on a layer.
//!
//! A GB7 document keeps its gray samples in [`ImageKind::Gb7`]. The layer
//! opened from them (the source layer) always holds their rendering: edits
//! committed to it are quantised back to gray, and resizing resamples the
//! gray samples and re-renders the layer from them.

use tracing::{debug, info};

use super::layer::{Layer, LayerKind, LayerSummary};
use crate::codec::Gb7EncodeOptions;
use crate::color::Rgb;
use crate::compositing::composite;
use crate::curves::{apply_lut, ChannelCurves, CurveSemantic, LutSet, LutTarget};
use crate::engine::{GrayBuffer, ImageKind, PixelBuffer};
use crate::error::{RastraError, Result};
use crate::filters::{burn_alpha_to_white, convolve3x3_with, ConvolveOptions, Kernel3x3};
use crate::resample::{fit_within, resample_gray, resample_rgba, ResampleMethod};

/// An open image with its layer stack
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    kind: ImageKind,
    width: u32,
    height: u32,
    /// Index 0 is the bottom of the stack
    layers: Vec<Layer>,
    active: Option<String>,
    /// Layer rendered from the GB7 gray source
    source_layer: Option<String>,
}

impl Document {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Open a generic RGBA raster as a single "Background" layer
    pub fn from_rgba(buffer: PixelBuffer) -> Self {
        let (width, height) = buffer.dimensions();
        Self::with_base(ImageKind::Rgb, width, height, buffer)
    }

    /// Open a decoded GB7 image
    ///
    /// The gray samples are kept in the document kind; the base layer holds
    /// their RGBA rendering with the mask mapped to alpha.
    pub fn from_gb7(gray: GrayBuffer) -> Self {
        let (width, height) = gray.dimensions();
        let rendered = gray.to_rgba();
        Self::with_base(ImageKind::Gb7(gray), width, height, rendered)
    }

    fn with_base(kind: ImageKind, width: u32, height: u32, buffer: PixelBuffer) -> Self {
        let base = Layer::image("Background", buffer);
        info!(width, height, gb7 = kind.is_gb7(), "opened document");
        Self {
            source_layer: kind.is_gb7().then(|| base.id.clone()),
            kind,
            width,
            height,
            active: Some(base.id.clone()),
            layers: vec![base],
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn kind(&self) -> &ImageKind {
        &self.kind
    }

    pub fn is_gb7(&self) -> bool {
        self.kind.is_gb7()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Layers, bottom first
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Serializable view of the stack, bottom first
    pub fn layer_summaries(&self) -> Vec<LayerSummary> {
        self.layers.iter().map(Layer::summary).collect()
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.layers
            .iter()
            .position(|layer| layer.id == id)
            .ok_or_else(|| RastraError::LayerNotFound { id: id.to_string() })
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    // ========================================================================
    // Stack editing
    // ========================================================================

    /// Push an image layer on top and make it active
    ///
    /// # Errors
    /// `DimensionMismatch` if the buffer is not the document size. Use
    /// [`Document::add_fitted_image_layer`] for arbitrary sizes.
    pub fn add_image_layer(&mut self, name: &str, buffer: PixelBuffer) -> Result<String> {
        self.check_size(&buffer)?;
        Ok(self.push(Layer::image(name, buffer)))
    }

    /// Push a flat colour layer on top and make it active
    pub fn add_color_layer(&mut self, name: &str, rgb: Rgb, a: u8) -> String {
        self.push(Layer::color(name, rgb, a))
    }

    /// Scale an image of any size to fit the canvas, centre it on a
    /// transparent background and push it on top
    pub fn add_fitted_image_layer(
        &mut self,
        name: &str,
        buffer: &PixelBuffer,
        method: ResampleMethod,
    ) -> String {
        let fitted = fit_within(buffer, self.width, self.height, method);
        self.push(Layer::image(name, fitted))
    }

    fn push(&mut self, layer: Layer) -> String {
        let id = layer.id.clone();
        debug!(layer = %id, name = %layer.name, "adding layer");
        self.layers.push(layer);
        self.active = Some(id.clone());
        id
    }

    /// Remove a layer and return it
    ///
    /// If it was active, the new top layer becomes active. Removing the
    /// source layer of a GB7 document turns it into a plain RGBA document.
    pub fn remove_layer(&mut self, id: &str) -> Result<Layer> {
        let index = self.index_of(id)?;
        let removed = self.layers.remove(index);
        if self.active.as_deref() == Some(id) {
            self.active = self.layers.last().map(|layer| layer.id.clone());
        }
        if self.source_layer.as_deref() == Some(id) {
            debug!(layer = %id, "source layer removed, dropping GB7 source");
            self.source_layer = None;
            self.kind = ImageKind::Rgb;
        }
        Ok(removed)
    }

    /// Move a layer to `index` (clamped to the stack)
    pub fn move_layer(&mut self, id: &str, index: usize) -> Result<()> {
        let from = self.index_of(id)?;
        let layer = self.layers.remove(from);
        let to = index.min(self.layers.len());
        self.layers.insert(to, layer);
        Ok(())
    }

    pub fn set_active(&mut self, id: &str) -> Result<()> {
        self.index_of(id)?;
        self.active = Some(id.to_string());
        Ok(())
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.active.as_deref().and_then(|id| self.layer(id))
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Flatten the visible stack
    pub fn composite(&self) -> PixelBuffer {
        composite(&self.layers, self.width, self.height)
    }

    /// Pixels of a layer at document size; colour layers are materialised
    fn layer_pixels(&self, layer: &Layer) -> PixelBuffer {
        match &layer.kind {
            LayerKind::Image { buffer } => buffer.clone(),
            LayerKind::Color { rgb, a } => {
                PixelBuffer::filled(self.width, self.height, [rgb.r, rgb.g, rgb.b, *a])
            }
        }
    }

    fn active_pixels(&self) -> Result<PixelBuffer> {
        let layer = self.active_layer().ok_or(RastraError::NoActiveLayer)?;
        Ok(self.layer_pixels(layer))
    }

    /// Active layer with the curves applied, without storing it
    ///
    /// GB7 documents drive R, G and B from the gray curve. The alpha curve is
    /// applied after the colour curves.
    pub fn preview_curves(
        &self,
        curves: &ChannelCurves,
        semantic: CurveSemantic,
    ) -> Result<PixelBuffer> {
        let source = self.active_pixels()?;
        let luts = curves.build_luts(self.is_gb7(), semantic);
        let colour = apply_lut(&source, &luts, LutTarget::Rgb);
        Ok(match luts.a {
            Some(a) => apply_lut(&colour, &LutSet::alpha(a), LutTarget::Alpha),
            None => colour,
        })
    }

    /// Active layer convolved with `kernel`, without storing it
    pub fn preview_kernel(&self, kernel: &Kernel3x3, opts: &ConvolveOptions) -> Result<PixelBuffer> {
        let source = self.active_pixels()?;
        Ok(convolve3x3_with(&source, kernel, opts))
    }

    // ========================================================================
    // Committing
    // ========================================================================

    fn check_size(&self, buffer: &PixelBuffer) -> Result<()> {
        if buffer.dimensions() != self.dimensions() {
            return Err(RastraError::DimensionMismatch {
                expected: self.dimensions(),
                actual: buffer.dimensions(),
            });
        }
        Ok(())
    }

    /// Re-derive the gray source from the source layer at `index`
    ///
    /// The layer is replaced by the rendering of the new gray samples. Does
    /// nothing for other layers or RGBA documents.
    fn sync_gray_source(&mut self, index: usize) {
        let ImageKind::Gb7(old) = &self.kind else {
            return;
        };
        let layer = &self.layers[index];
        if self.source_layer.as_deref() != Some(layer.id.as_str()) {
            return;
        }
        let Some(buffer) = layer.buffer() else {
            return;
        };

        let with_mask = old.has_mask() || buffer.has_transparency();
        let threshold = Gb7EncodeOptions::default().alpha_opaque_threshold;
        let gray = GrayBuffer::from_rgba(buffer, threshold, with_mask);
        let rendered = gray.to_rgba();

        let layer = &mut self.layers[index];
        layer.has_alpha = rendered.has_transparency();
        layer.kind = LayerKind::Image { buffer: rendered };
        self.kind = ImageKind::Gb7(gray);
    }

    /// Store `buffer` as the pixels of layer `id`
    ///
    /// A colour layer becomes an image layer. On the source layer of a GB7
    /// document the buffer is quantised to gray and the gray source updated.
    pub fn commit(&mut self, id: &str, buffer: PixelBuffer) -> Result<()> {
        self.check_size(&buffer)?;
        let index = self.index_of(id)?;
        let layer = &mut self.layers[index];
        layer.has_alpha = buffer.has_transparency();
        layer.kind = LayerKind::Image { buffer };
        self.sync_gray_source(index);
        debug!(layer = %id, "committed layer pixels");
        Ok(())
    }

    /// Flatten layer `id` over white and drop its transparency
    pub fn remove_alpha_to_white(&mut self, id: &str) -> Result<()> {
        let index = self.index_of(id)?;
        let burned = burn_alpha_to_white(&self.layer_pixels(&self.layers[index]));
        let layer = &mut self.layers[index];
        layer.kind = LayerKind::Image { buffer: burned };
        layer.has_alpha = false;
        layer.alpha_hidden = false;
        self.sync_gray_source(index);
        Ok(())
    }

    /// Resize the canvas, resampling every image layer
    ///
    /// The GB7 gray source is resampled with the gray path and the source
    /// layer re-rendered from it, so both stay in step.
    ///
    /// # Arguments
    /// * `width`, `height` - New canvas size
    /// * `method` - Interpolation used for every layer
    pub fn resize(&mut self, width: u32, height: u32, method: ResampleMethod) {
        info!(
            from = ?self.dimensions(),
            to = ?(width, height),
            ?method,
            "resizing document"
        );
        let gray = match &self.kind {
            ImageKind::Gb7(gray) => Some(resample_gray(gray, width, height, method)),
            ImageKind::Rgb => None,
        };
        for layer in &mut self.layers {
            let is_source = self.source_layer.as_deref() == Some(layer.id.as_str());
            let scaled = match (&layer.kind, &gray) {
                (LayerKind::Image { .. }, Some(gray)) if is_source => gray.to_rgba(),
                (LayerKind::Image { buffer }, _) => resample_rgba(buffer, width, height, method),
                (LayerKind::Color { .. }, _) => continue,
            };
            layer.kind = LayerKind::Image { buffer: scaled };
        }
        if let Some(gray) = gray {
            self.kind = ImageKind::Gb7(gray);
        }
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{pick, PickSource};
    use crate::curves::{CurveChannel, CurvePair, CurvePoint};
    use crate::engine::GrayDepth;
    use crate::filters::KernelPreset;
    use pretty_assertions::assert_eq;

    fn opaque(width: u32, height: u32, rgba: [u8; 4]) -> Document {
        Document::from_rgba(PixelBuffer::filled(width, height, rgba))
    }

    #[test]
    fn test_from_rgba_has_active_background() {
        let doc = opaque(3, 2, [1, 2, 3, 255]);
        assert_eq!(doc.dimensions(), (3, 2));
        assert_eq!(doc.layers().len(), 1);
        assert_eq!(doc.active_layer().map(|l| l.name.as_str()), Some("Background"));
        assert!(!doc.is_gb7());
    }

    #[test]
    fn test_from_gb7_keeps_gray_source() {
        let gray = GrayBuffer::from_raw(2, 1, GrayDepth::Eight, vec![0x80, 0x7F]).unwrap();
        let doc = Document::from_gb7(gray.clone());
        assert_eq!(doc.kind().gray_source(), Some(&gray));
        let out = doc.composite();
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
        // nothing covers the masked pixel
        assert_eq!(out.pixel(1, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_add_image_layer_checks_size() {
        let mut doc = opaque(2, 2, [0, 0, 0, 255]);
        let err = doc
            .add_image_layer("wrong", PixelBuffer::new(3, 2))
            .unwrap_err();
        assert!(matches!(err, RastraError::DimensionMismatch { .. }));

        let id = doc.add_image_layer("ok", PixelBuffer::new(2, 2)).unwrap();
        assert_eq!(doc.active_id(), Some(id.as_str()));
        assert_eq!(doc.layers().len(), 2);
    }

    #[test]
    fn test_add_fitted_image_layer_centres() {
        let mut doc = opaque(4, 4, [0, 0, 0, 255]);
        let id = doc.add_fitted_image_layer(
            "wide",
            &PixelBuffer::filled(4, 2, [9, 9, 9, 255]),
            ResampleMethod::Nearest,
        );
        let buffer = doc.layer(&id).and_then(Layer::buffer).unwrap();
        assert_eq!(buffer.dimensions(), (4, 4));
        assert_eq!(buffer.pixel(0, 0)[3], 0);
        assert_eq!(buffer.pixel(0, 1), [9, 9, 9, 255]);
        assert_eq!(buffer.pixel(3, 2), [9, 9, 9, 255]);
        assert_eq!(buffer.pixel(0, 3)[3], 0);
    }

    #[test]
    fn test_remove_active_layer_falls_back_to_top() {
        let mut doc = opaque(1, 1, [0, 0, 0, 255]);
        let base = doc.active_id().unwrap().to_string();
        let top = doc.add_color_layer("tint", Rgb::new(255, 0, 0), 255);
        let removed = doc.remove_layer(&top).unwrap();
        assert_eq!(removed.name, "tint");
        assert_eq!(doc.active_id(), Some(base.as_str()));

        let missing = doc.remove_layer("nope").unwrap_err();
        assert!(matches!(missing, RastraError::LayerNotFound { .. }));
    }

    #[test]
    fn test_move_layer_reorders_stack() {
        let mut doc = opaque(1, 1, [0, 0, 0, 255]);
        let red = doc.add_color_layer("red", Rgb::new(255, 0, 0), 255);
        doc.add_color_layer("blue", Rgb::new(0, 0, 255), 255);
        assert_eq!(doc.composite().pixel(0, 0), [0, 0, 255, 255]);

        doc.move_layer(&red, 99).unwrap();
        assert_eq!(doc.layers().last().map(|l| l.id.as_str()), Some(red.as_str()));
        assert_eq!(doc.composite().pixel(0, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_set_active_unknown_layer() {
        let mut doc = opaque(1, 1, [0, 0, 0, 255]);
        assert!(doc.set_active("layer_missing").is_err());
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let doc = opaque(2, 2, [100, 100, 100, 255]);
        let mut curves = ChannelCurves::default();
        curves.set(
            CurveChannel::R,
            CurvePair {
                p1: CurvePoint::new(0, 255),
                p2: CurvePoint::new(255, 255),
            },
        );
        let preview = doc.preview_curves(&curves, CurveSemantic::Ramped).unwrap();
        assert_eq!(preview.pixel(0, 0), [255, 100, 100, 255]);
        assert_eq!(doc.composite().pixel(0, 0), [100, 100, 100, 255]);
    }

    #[test]
    fn test_gb7_curves_use_gray_channel() {
        let gray = GrayBuffer::from_raw(1, 1, GrayDepth::Seven, vec![64]).unwrap();
        let doc = Document::from_gb7(gray);
        let mut curves = ChannelCurves::default();
        // Red curve is ignored for GB7 documents
        curves.set(
            CurveChannel::R,
            CurvePair {
                p1: CurvePoint::new(0, 0),
                p2: CurvePoint::new(1, 0),
            },
        );
        let preview = doc.preview_curves(&curves, CurveSemantic::Ramped).unwrap();
        assert_eq!(preview.pixel(0, 0), [129, 129, 129, 255]);
    }

    #[test]
    fn test_preview_kernel_then_commit() {
        let mut doc = opaque(3, 3, [50, 60, 70, 255]);
        let id = doc.active_id().unwrap().to_string();
        let preview = doc
            .preview_kernel(&KernelPreset::BoxBlur3x3.kernel(), &ConvolveOptions::default())
            .unwrap();
        assert_eq!(preview.pixel(1, 1), [50, 60, 70, 255]);

        let replacement = PixelBuffer::filled(3, 3, [1, 1, 1, 0]);
        doc.commit(&id, replacement.clone()).unwrap();
        assert_eq!(doc.layer(&id).and_then(Layer::buffer), Some(&replacement));
        assert!(doc.layer(&id).unwrap().has_alpha);
    }

    #[test]
    fn test_commit_rejects_wrong_size() {
        let mut doc = opaque(2, 2, [0, 0, 0, 255]);
        let id = doc.active_id().unwrap().to_string();
        let err = doc.commit(&id, PixelBuffer::new(1, 1)).unwrap_err();
        assert!(matches!(
            err,
            RastraError::DimensionMismatch {
                expected: (2, 2),
                actual: (1, 1)
            }
        ));
    }

    #[test]
    fn test_preview_without_active_layer() {
        let mut doc = opaque(1, 1, [0, 0, 0, 255]);
        let id = doc.active_id().unwrap().to_string();
        doc.remove_layer(&id).unwrap();
        let err = doc
            .preview_curves(&ChannelCurves::default(), CurveSemantic::Ramped)
            .unwrap_err();
        assert!(matches!(err, RastraError::NoActiveLayer));
    }

    #[test]
    fn test_remove_alpha_to_white() {
        let mut doc = Document::from_rgba(PixelBuffer::new(2, 1));
        let id = doc.active_id().unwrap().to_string();
        doc.layer_mut(&id).unwrap().alpha_hidden = true;
        doc.remove_alpha_to_white(&id).unwrap();
        let layer = doc.layer(&id).unwrap();
        assert!(!layer.has_alpha);
        assert!(!layer.alpha_hidden);
        assert_eq!(layer.buffer().unwrap().pixel(1, 0), [255, 255, 255, 255]);
    }

    fn pick_gray(doc: &Document, x: i64) -> Rgb {
        let gray = doc.kind().gray_source().unwrap();
        pick(PickSource::Gray(gray), x, 0).rgb
    }

    #[test]
    fn test_commit_updates_gray_source() {
        let gray = GrayBuffer::from_raw(1, 1, GrayDepth::Seven, vec![0x00]).unwrap();
        let mut doc = Document::from_gb7(gray);
        let id = doc.active_id().unwrap().to_string();

        doc.commit(&id, PixelBuffer::filled(1, 1, [255, 255, 255, 255])).unwrap();
        assert_eq!(doc.kind().gray_source().unwrap().pixels(), &[0x7F]);
        assert_eq!(pick_gray(&doc, 0), Rgb::new(255, 255, 255));
        assert_eq!(doc.composite().pixel(0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_commit_quantises_source_layer() {
        let gray = GrayBuffer::from_raw(1, 1, GrayDepth::Seven, vec![0x00]).unwrap();
        let mut doc = Document::from_gb7(gray);
        let id = doc.active_id().unwrap().to_string();

        doc.commit(&id, PixelBuffer::filled(1, 1, [255, 0, 0, 255])).unwrap();
        // luminance 54.2 -> gray 27 -> level 54
        let px = doc.layer(&id).and_then(Layer::buffer).unwrap().pixel(0, 0);
        assert_eq!(px, [54, 54, 54, 255]);
        assert_eq!(pick_gray(&doc, 0), Rgb::new(54, 54, 54));
    }

    #[test]
    fn test_remove_alpha_updates_gray_source() {
        let gray = GrayBuffer::from_raw(2, 1, GrayDepth::Eight, vec![0x00, 0x80]).unwrap();
        let mut doc = Document::from_gb7(gray);
        let id = doc.active_id().unwrap().to_string();

        doc.remove_alpha_to_white(&id).unwrap();
        let source = doc.kind().gray_source().unwrap();
        assert!(source.is_opaque_at(0, 0));
        assert_eq!(source.gray_at(0, 0), 127);
        assert_eq!(pick_gray(&doc, 1), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_resize_keeps_gray_source_in_step() {
        let gray = GrayBuffer::from_raw(2, 1, GrayDepth::Seven, vec![0, 127]).unwrap();
        let mut doc = Document::from_gb7(gray);
        doc.resize(3, 1, ResampleMethod::Bilinear);

        let layer = doc.layers()[0].buffer().unwrap().clone();
        for x in 0..3 {
            let [r, g, b, _] = layer.pixel(x, 0);
            assert_eq!(pick_gray(&doc, x as i64), Rgb::new(r, g, b));
        }
        assert_eq!(layer.pixel(1, 0), [129, 129, 129, 255]);
    }

    #[test]
    fn test_removing_source_layer_drops_gray_source() {
        let gray = GrayBuffer::from_raw(1, 1, GrayDepth::Seven, vec![10]).unwrap();
        let mut doc = Document::from_gb7(gray);
        let base = doc.active_id().unwrap().to_string();
        doc.add_color_layer("tint", Rgb::gray(0), 255);

        doc.remove_layer(&base).unwrap();
        assert!(!doc.is_gb7());
        assert!(doc.kind().gray_source().is_none());
    }

    #[test]
    fn test_resize_scales_layers_and_gray_source() {
        let gray = GrayBuffer::from_raw(2, 2, GrayDepth::Seven, vec![10, 20, 30, 40]).unwrap();
        let mut doc = Document::from_gb7(gray);
        doc.add_color_layer("tint", Rgb::gray(0), 0);
        doc.resize(4, 4, ResampleMethod::Nearest);

        assert_eq!(doc.dimensions(), (4, 4));
        assert_eq!(doc.layers()[0].buffer().map(PixelBuffer::dimensions), Some((4, 4)));
        assert_eq!(doc.kind().gray_source().map(GrayBuffer::dimensions), Some((4, 4)));
        assert_eq!(doc.composite().dimensions(), (4, 4));
    }
}
