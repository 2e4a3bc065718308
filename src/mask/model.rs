use crate::mask::error::{EditError, EditResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Translucent magenta used by the magic pen overlay (alpha ~0.01).
    pub const MAGIC_PEN: Self = Self::rgba(255, 0, 255, 3);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_slice(px: &[u8]) -> Self {
        Self::rgba(px[0], px[1], px[2], px[3])
    }

    /// Every channel of `self` lies within `tolerance` of `other`.
    pub fn within_tolerance(self, other: Rgba, tolerance: u8) -> bool {
        self.r.abs_diff(other.r) <= tolerance
            && self.g.abs_diff(other.g) <= tolerance
            && self.b.abs_diff(other.b) <= tolerance
            && self.a.abs_diff(other.a) <= tolerance
    }
}

/// Distance between two ordered coordinates, saturated to `i32::MAX`.
fn extent(min: i32, max: i32) -> i32 {
    (max as i64 - min as i64).min(i32::MAX as i64) as i32
}

/// Integer rectangle in buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a normalized region from two opposite corners given in any order.
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        let min_x = a.0.min(b.0);
        let min_y = a.1.min(b.1);
        Self {
            x: min_x,
            y: min_y,
            width: extent(min_x, a.0.max(b.0)),
            height: extent(min_y, a.1.max(b.1)),
        }
    }

    /// Moves (x, y) to the min corner when width or height is negative.
    pub fn normalized(self) -> Self {
        Self::from_corners(
            (self.x, self.y),
            (self.x.saturating_add(self.width), self.y.saturating_add(self.height)),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn clamp(self, width: u32, height: u32) -> Option<Region> {
        let region = self.normalized();
        let max_w = width.min(i32::MAX as u32) as i32;
        let max_h = height.min(i32::MAX as u32) as i32;
        let x0 = region.x.clamp(0, max_w);
        let y0 = region.y.clamp(0, max_h);
        let x1 = region.x.saturating_add(region.width).clamp(0, max_w);
        let y1 = region.y.saturating_add(region.height).clamp(0, max_h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Region {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushState {
    pub color: Rgba,
    radius: f64,
    spacing: f64,
}

impl BrushState {
    pub fn new(color: Rgba, radius: f64, spacing: f64) -> EditResult<Self> {
        validate_radius(radius)?;
        validate_spacing(spacing)?;
        Ok(Self {
            color,
            radius,
            spacing,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn set_radius(&mut self, radius: f64) -> EditResult<()> {
        validate_radius(radius)?;
        self.radius = radius;
        Ok(())
    }

    pub fn set_spacing(&mut self, spacing: f64) -> EditResult<()> {
        validate_spacing(spacing)?;
        self.spacing = spacing;
        Ok(())
    }

    /// Sets the radius, raising anything below 1 (or not finite) to 1.
    pub(crate) fn set_radius_clamped(&mut self, radius: f64) {
        self.radius = if radius.is_finite() { radius.max(1.0) } else { 1.0 };
    }

    /// Grows or shrinks the radius by `delta`. Refuses (returns false) when the
    /// result would drop below 1.
    pub fn resize(&mut self, delta: f64) -> bool {
        let next = self.radius + delta;
        if !next.is_finite() || next < 1.0 {
            return false;
        }
        self.radius = next;
        true
    }
}

fn validate_radius(radius: f64) -> EditResult<()> {
    if !radius.is_finite() || radius < 1.0 {
        return Err(EditError::Configuration {
            field: "radius",
            value: radius,
        });
    }
    Ok(())
}

fn validate_spacing(spacing: f64) -> EditResult<()> {
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(EditError::Configuration {
            field: "spacing",
            value: spacing,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillRequest {
    pub seed: (i32, i32),
    pub fill_color: Rgba,
    pub tolerance: u8,
}

impl FillRequest {
    pub const DEFAULT_TOLERANCE: u8 = 254;

    pub fn new(seed: (i32, i32), fill_color: Rgba) -> Self {
        Self {
            seed,
            fill_color,
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrushMode {
    Draw,
    MagicPen,
}
