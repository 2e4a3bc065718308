use crate::mask::binarize::DEFAULT_THRESHOLD;
use crate::mask::history::DEFAULT_HISTORY_LIMIT;
use crate::mask::model::{FillRequest, Rgba};
use serde::{Deserialize, Serialize};

const MIN_BRUSH_SIZE: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorSettings {
    /// Radius of the draw brush in buffer pixels.
    #[serde(default = "default_draw_size")]
    pub draw_size: f64,
    #[serde(default = "default_magic_pen_size")]
    pub magic_pen_size: f64,
    /// Arc length between consecutive stamps along a stroke.
    #[serde(default = "default_brush_spacing")]
    pub brush_spacing: f64,
    /// Maximum number of undo snapshots kept.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_fill_tolerance")]
    pub fill_tolerance: u8,
    #[serde(default = "default_threshold")]
    pub binarize_threshold: u8,
    #[serde(default = "default_foreground_color")]
    pub foreground_color: Rgba,
    #[serde(default = "default_background_color")]
    pub background_color: Rgba,
    #[serde(default = "default_magic_pen_color")]
    pub magic_pen_color: Rgba,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_draw_size() -> f64 {
    5.0
}

fn default_magic_pen_size() -> f64 {
    200.0
}

fn default_brush_spacing() -> f64 {
    1.0
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_fill_tolerance() -> u8 {
    FillRequest::DEFAULT_TOLERANCE
}

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

fn default_foreground_color() -> Rgba {
    Rgba::WHITE
}

fn default_background_color() -> Rgba {
    Rgba::BLACK
}

fn default_magic_pen_color() -> Rgba {
    Rgba::MAGIC_PEN
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            draw_size: default_draw_size(),
            magic_pen_size: default_magic_pen_size(),
            brush_spacing: default_brush_spacing(),
            history_limit: default_history_limit(),
            fill_tolerance: default_fill_tolerance(),
            binarize_threshold: default_threshold(),
            foreground_color: default_foreground_color(),
            background_color: default_background_color(),
            magic_pen_color: default_magic_pen_color(),
            debug_logging: false,
        }
    }
}

impl EditorSettings {
    /// Replaces values the engine cannot work with by their defaults.
    pub fn sanitize(&mut self) {
        if !self.draw_size.is_finite() || self.draw_size < MIN_BRUSH_SIZE {
            self.draw_size = default_draw_size();
        }
        if !self.magic_pen_size.is_finite() || self.magic_pen_size < MIN_BRUSH_SIZE {
            self.magic_pen_size = default_magic_pen_size();
        }
        if !self.brush_spacing.is_finite() || self.brush_spacing <= 0.0 {
            self.brush_spacing = default_brush_spacing();
        }
        if self.history_limit == 0 {
            self.history_limit = default_history_limit();
        }
    }
}
