use crate::mask::binarize::binarize;
use crate::mask::buffer::PixelBuffer;
use crate::mask::codec;
use crate::mask::composite;
use crate::mask::error::{EditError, EditResult};
use crate::mask::fill::{fill_would_change, flood_fill};
use crate::mask::history::HistoryStack;
use crate::mask::model::{BrushMode, BrushState, FillRequest, Region, Rgba};
use crate::mask::predict::{MaskPredictor, PredictOutcome, PredictSource};
use crate::mask::stroke::StrokeRasterizer;
use crate::settings::EditorSettings;

/// One editing session: a reference image, the binary mask painted over it,
/// the magic pen scratch layer and the undo history for the mask.
///
/// Every call that changes the mask records exactly one snapshot first. Calls
/// that fail validation return before recording, so errors never leave a
/// stray history entry or a half-written mask behind.
#[derive(Debug, Clone)]
pub struct MaskEditor {
    settings: EditorSettings,
    image: PixelBuffer,
    mask: PixelBuffer,
    overlay: PixelBuffer,
    stroke: StrokeRasterizer,
    history: HistoryStack,
    mode: BrushMode,
    draw_color: Rgba,
}

impl MaskEditor {
    pub fn new(mut settings: EditorSettings) -> EditResult<Self> {
        settings.sanitize();
        let brush = BrushState::new(
            settings.foreground_color,
            settings.draw_size,
            settings.brush_spacing,
        )?;
        Ok(Self {
            history: HistoryStack::new(settings.history_limit),
            draw_color: settings.foreground_color,
            settings,
            image: PixelBuffer::default(),
            mask: PixelBuffer::default(),
            overlay: PixelBuffer::default(),
            stroke: StrokeRasterizer::new(brush),
            mode: BrushMode::Draw,
        })
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    pub fn mask(&self) -> &PixelBuffer {
        &self.mask
    }

    /// Magic pen scratch layer, same size as the mask.
    pub fn overlay(&self) -> &PixelBuffer {
        &self.overlay
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn mode(&self) -> BrushMode {
        self.mode
    }

    pub fn brush(&self) -> &BrushState {
        self.stroke.brush()
    }

    /// Color used by draw strokes.
    pub fn draw_color(&self) -> Rgba {
        self.draw_color
    }

    /// Color the paint bucket uses: the draw color, or the foreground color
    /// while the magic pen is active.
    pub fn fill_color(&self) -> Rgba {
        match self.mode {
            BrushMode::Draw => self.draw_color,
            BrushMode::MagicPen => self.settings.foreground_color,
        }
    }

    /// Path length of the stroke in progress.
    pub fn stroke_length(&self) -> f64 {
        self.stroke.line_len()
    }

    /// Installs a new reference image. The mask and overlay are reallocated at
    /// the image's size and cleared, and both history stacks are dropped.
    pub fn load_image(&mut self, image: PixelBuffer) {
        let (width, height) = (image.width(), image.height());
        self.image = image;
        self.mask.reset(width, height, Rgba::TRANSPARENT);
        self.overlay.reset(width, height, Rgba::TRANSPARENT);
        self.stroke.end_stroke();
        self.history.clear();
        tracing::info!(width, height, "loaded reference image");
    }

    /// Raw RGBA rows; fails with `DimensionMismatch` when the length is off.
    pub fn load_image_pixels(
        &mut self,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> EditResult<()> {
        let image = PixelBuffer::from_pixels(width, height, pixels)?;
        self.load_image(image);
        Ok(())
    }

    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> EditResult<()> {
        let image = codec::decode_image(bytes)?;
        self.load_image(image);
        Ok(())
    }

    /// Accepts `data:image/...;base64,` payloads as sent by browsers.
    pub fn load_image_data_url(&mut self, data: &str) -> EditResult<()> {
        let image = codec::decode_image_data_url(data)?;
        self.load_image(image);
        Ok(())
    }

    /// Paints `mask` (scaled to the image size) into the mask buffer, or fills
    /// it solid black when there is no stored mask. History is dropped.
    pub fn load_mask(&mut self, mask: Option<&PixelBuffer>) -> EditResult<()> {
        match mask {
            Some(source) if !source.is_empty() && !self.mask.is_empty() => {
                let scaled =
                    composite::scale_nearest(source, self.mask.width(), self.mask.height())?;
                self.mask.copy_from(&scaled);
                tracing::info!(
                    source_width = source.width(),
                    source_height = source.height(),
                    "loaded stored mask"
                );
            }
            _ => {
                self.mask.fill(Rgba::BLACK);
                tracing::info!("no stored mask, starting blank");
            }
        }
        self.history.clear();
        Ok(())
    }

    pub fn load_mask_bytes(&mut self, bytes: Option<&[u8]>) -> EditResult<()> {
        match bytes {
            Some(bytes) => {
                let decoded = codec::decode_image(bytes)?;
                self.load_mask(Some(&decoded))
            }
            None => self.load_mask(None),
        }
    }

    /// Clears the mask to solid black, undoable.
    pub fn reset_mask(&mut self) {
        self.history.record(&self.mask);
        self.mask.fill(Rgba::BLACK);
        tracing::info!("mask reset");
    }

    /// Starts a stroke in the current mode. Non-finite positions are ignored.
    pub fn begin_stroke(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            tracing::debug!(x, y, "ignoring stroke start at non-finite position");
            return;
        }
        match self.mode {
            BrushMode::Draw => {
                self.history.record(&self.mask);
                self.stroke.begin_stroke(&mut self.mask, x, y);
            }
            BrushMode::MagicPen => {
                self.stroke.begin_stroke(&mut self.overlay, x, y);
            }
        }
        tracing::debug!(x, y, mode = ?self.mode, "stroke started");
    }

    /// Extends the active stroke to (x, y). Ignored when no stroke is active.
    pub fn continue_stroke(&mut self, x: f64, y: f64) -> usize {
        if !self.stroke.is_active() {
            return 0;
        }
        match self.mode {
            BrushMode::Draw => self.stroke.continue_stroke(&mut self.mask, x, y),
            BrushMode::MagicPen => self.stroke.continue_stroke(&mut self.overlay, x, y),
        }
    }

    /// Finishes the active stroke: draw strokes are binarized into the mask,
    /// magic pen strokes are wiped from the overlay. Returns false when no
    /// stroke was active.
    pub fn end_stroke(&mut self) -> bool {
        if !self.stroke.is_active() {
            return false;
        }
        let length = self.stroke.line_len();
        self.stroke.end_stroke();
        match self.mode {
            BrushMode::Draw => {
                binarize(&mut self.mask, self.settings.binarize_threshold);
            }
            BrushMode::MagicPen => {
                self.overlay.fill(Rgba::TRANSPARENT);
            }
        }
        tracing::debug!(length, mode = ?self.mode, "stroke finished");
        true
    }

    /// Paint-bucket fill at a buffer position with the configured tolerance.
    /// Returns the number of pixels changed. A non-finite position fills
    /// nothing.
    pub fn fill_at(&mut self, x: f64, y: f64) -> EditResult<usize> {
        if !x.is_finite() || !y.is_finite() {
            tracing::debug!(x, y, "ignoring fill at non-finite position");
            return Ok(0);
        }
        let seed = (x.floor() as i32, y.floor() as i32);
        let request = FillRequest::new(seed, self.fill_color())
            .with_tolerance(self.settings.fill_tolerance);
        if !fill_would_change(&self.mask, request)? {
            return Ok(0);
        }
        self.history.record(&self.mask);
        let filled = flood_fill(&mut self.mask, request)?;
        tracing::debug!(?seed, filled, "flood fill");
        Ok(filled)
    }

    /// Pastes `source` over `region` of the mask (see [`composite::replace`]).
    /// A region that misses the mask entirely changes nothing and records no
    /// history.
    pub fn replace_region(
        &mut self,
        region: Region,
        source: &PixelBuffer,
    ) -> EditResult<Option<Region>> {
        if composite::clip_region(&self.mask, region).is_none() {
            return Ok(None);
        }
        if source.is_empty() {
            return Err(EditError::Decode("source image has no pixels".into()));
        }
        self.history.record(&self.mask);
        composite::replace(
            &mut self.mask,
            region,
            source,
            self.settings.binarize_threshold,
        )
    }

    /// Cuts the rectangle spanned by two corners out of the reference image.
    pub fn crop_image(&self, a: (i32, i32), b: (i32, i32)) -> EditResult<PixelBuffer> {
        composite::extract(&self.image, Region::from_corners(a, b))
    }

    pub fn crop_image_png(&self, a: (i32, i32), b: (i32, i32)) -> EditResult<Vec<u8>> {
        codec::encode_png(&self.crop_image(a, b)?)
    }

    /// Sends the crop under `region` to `predictor` and pastes its answer back
    /// into the mask. When prediction or decoding fails the raw crop is pasted
    /// instead.
    pub fn predict_region<P: MaskPredictor + ?Sized>(
        &mut self,
        region: Region,
        predictor: &mut P,
    ) -> EditResult<PredictOutcome> {
        let crop = composite::extract(&self.image, region)?;
        let crop_png = codec::encode_png(&crop)?;
        let (source, pasted) = match predictor
            .predict(&crop_png)
            .and_then(|bytes| codec::decode_image(&bytes).map_err(|e| e.to_string()))
        {
            Ok(predicted) => (PredictSource::Predicted, predicted),
            Err(reason) => {
                tracing::warn!(%reason, "prediction failed, pasting the raw crop");
                (PredictSource::Fallback { reason }, crop)
            }
        };
        let written = self.replace_region(region, &pasted)?;
        Ok(PredictOutcome { source, written })
    }

    pub fn mask_png(&self) -> EditResult<Vec<u8>> {
        codec::encode_png(&self.mask)
    }

    pub fn mask_data_url(&self) -> EditResult<String> {
        codec::encode_png_data_url(&self.mask)
    }

    /// Restores the previous mask. A stroke in progress is finished first so
    /// it becomes part of the history being walked.
    pub fn undo(&mut self) -> bool {
        if self.stroke.is_active() {
            self.end_stroke();
        }
        self.history.undo(&mut self.mask)
    }

    pub fn redo(&mut self) -> bool {
        if self.stroke.is_active() {
            self.end_stroke();
        }
        self.history.redo(&mut self.mask)
    }

    /// Toggles the draw color between foreground and background. The magic
    /// pen keeps its own color.
    pub fn switch_color(&mut self) {
        if self.mode == BrushMode::Draw {
            self.draw_color = if self.draw_color == self.settings.foreground_color {
                self.settings.background_color
            } else {
                self.settings.foreground_color
            };
            self.stroke.brush_mut().color = self.draw_color;
        }
    }

    /// Flips between drawing and the magic pen. Each mode keeps its own brush
    /// size; returning to drawing starts with the foreground color.
    pub fn switch_brush_mode(&mut self) {
        if self.stroke.is_active() {
            self.end_stroke();
        }
        let radius = self.stroke.brush().radius();
        let (mode, color, next_radius) = match self.mode {
            BrushMode::Draw => {
                self.settings.draw_size = radius;
                (
                    BrushMode::MagicPen,
                    self.settings.magic_pen_color,
                    self.settings.magic_pen_size,
                )
            }
            BrushMode::MagicPen => {
                self.settings.magic_pen_size = radius;
                self.draw_color = self.settings.foreground_color;
                (
                    BrushMode::Draw,
                    self.settings.foreground_color,
                    self.settings.draw_size,
                )
            }
        };
        let brush = self.stroke.brush_mut();
        brush.color = color;
        brush.set_radius_clamped(next_radius);
        self.mode = mode;
        tracing::debug!(?mode, radius = next_radius, "brush mode switched");
    }

    /// Grows or shrinks the active brush. Refuses to go below 1.
    pub fn change_brush_size(&mut self, delta: f64) -> bool {
        self.stroke.brush_mut().resize(delta)
    }

    pub fn set_spacing(&mut self, spacing: f64) -> EditResult<()> {
        self.stroke.brush_mut().set_spacing(spacing)?;
        self.settings.brush_spacing = spacing;
        Ok(())
    }

    pub fn set_history_limit(&mut self, limit: usize) {
        self.settings.history_limit = limit;
        self.history.set_limit(limit);
    }
}
