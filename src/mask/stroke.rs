use crate::mask::buffer::PixelBuffer;
use crate::mask::model::{BrushState, Rgba};

/// Incremental point-to-point stroke rasterizer. Only the previous sample is
/// kept between calls; the full path is never materialized.
#[derive(Debug, Clone)]
pub struct StrokeRasterizer {
    brush: BrushState,
    last_pos: Option<(f64, f64)>,
    line_len: f64,
}

impl StrokeRasterizer {
    pub fn new(brush: BrushState) -> Self {
        Self {
            brush,
            last_pos: None,
            line_len: 0.0,
        }
    }

    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut BrushState {
        &mut self.brush
    }

    pub fn last_pos(&self) -> Option<(f64, f64)> {
        self.last_pos
    }

    pub fn is_active(&self) -> bool {
        self.last_pos.is_some()
    }

    /// Interpolated path length covered since the last `begin_stroke`.
    pub fn line_len(&self) -> f64 {
        self.line_len
    }

    /// Starts a new stroke at (x, y). Non-finite coordinates are ignored and
    /// leave the rasterizer as it was.
    pub fn begin_stroke(&mut self, buffer: &mut PixelBuffer, x: f64, y: f64) -> usize {
        if !is_finite_point(x, y) {
            return 0;
        }
        self.line_len = 0.0;
        self.last_pos = None;
        self.continue_stroke(buffer, x, y)
    }

    /// Stamps from the previous sample to (x, y) and returns the number of
    /// stamps written. Stamps that could not reach the buffer are skipped.
    pub fn continue_stroke(&mut self, buffer: &mut PixelBuffer, x: f64, y: f64) -> usize {
        if !is_finite_point(x, y) {
            return 0;
        }
        let BrushState { color, .. } = self.brush;
        let radius = self.brush.radius();
        let mut stamps = 0;
        match self.last_pos {
            Some(from) if distance(from, (x, y)) > self.brush.spacing() => {
                self.line_len += distance(from, (x, y));
                let margin = radius + 1.0;
                let min = (-margin, -margin);
                let max = (
                    buffer.width() as f64 + margin,
                    buffer.height() as f64 + margin,
                );
                for center in stamp_centers_within(from, (x, y), self.brush.spacing(), min, max) {
                    stamp_disk(buffer, center, radius, color);
                    stamps += 1;
                }
            }
            _ => {
                stamp_disk(buffer, (x, y), radius, color);
                stamps += 1;
            }
        }
        self.last_pos = Some((x, y));
        stamps
    }

    pub fn end_stroke(&mut self) {
        self.last_pos = None;
    }
}

pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

fn is_finite_point(x: f64, y: f64) -> bool {
    x.is_finite() && y.is_finite()
}

/// Points along `from -> to` at ratios `spacing/d, 2*spacing/d, ...` up to and
/// including 1. `from` itself is never produced.
pub fn stamp_centers(
    from: (f64, f64),
    to: (f64, f64),
    spacing: f64,
) -> impl Iterator<Item = (f64, f64)> {
    let d = distance(from, to);
    let steps = step_count(d, spacing);
    centers_in_steps(from, to, spacing, d, 1, steps)
}

/// The subset of [`stamp_centers`] lying inside the box `min..=max`. Only the
/// clipped stretch of the segment is walked, so the cost is bounded by the box
/// and not by the length of the jump.
pub fn stamp_centers_within(
    from: (f64, f64),
    to: (f64, f64),
    spacing: f64,
    min: (f64, f64),
    max: (f64, f64),
) -> impl Iterator<Item = (f64, f64)> {
    let d = distance(from, to);
    let steps = step_count(d, spacing);
    let (first, last) = match clip_segment(from, to, min, max) {
        Some((t0, t1)) if steps > 0 => (
            ((t0 * d / spacing).ceil() as u64).max(1),
            ((t1 * d / spacing).floor() as u64).min(steps),
        ),
        _ => (1, 0),
    };
    centers_in_steps(from, to, spacing, d, first, last)
}

fn step_count(d: f64, spacing: f64) -> u64 {
    if d.is_finite() && d > 0.0 && spacing > 0.0 {
        (d / spacing).floor() as u64
    } else {
        0
    }
}

fn centers_in_steps(
    from: (f64, f64),
    to: (f64, f64),
    spacing: f64,
    d: f64,
    first: u64,
    last: u64,
) -> impl Iterator<Item = (f64, f64)> {
    (first..=last).map(move |k| {
        let t = (k as f64 * spacing / d).min(1.0);
        (from.0 + t * (to.0 - from.0), from.1 + t * (to.1 - from.1))
    })
}

/// Liang-Barsky: the parameter range `t0..=t1` of `from -> to` inside the box.
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<(f64, f64)> {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [
        (-dx, from.0 - min.0),
        (dx, max.0 - from.0),
        (-dy, from.1 - min.1),
        (dy, max.1 - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((t0, t1))
}

/// Hard-edged filled disk. Pixel (px, py) is covered when its integer
/// position lies within `radius` of `center`; covered pixels are replaced
/// outright, no blending.
pub fn stamp_disk(buffer: &mut PixelBuffer, center: (f64, f64), radius: f64, color: Rgba) -> u64 {
    if buffer.is_empty() || radius.is_nan() || radius < 0.0 {
        return 0;
    }
    if !is_finite_point(center.0, center.1) {
        return 0;
    }
    let (cx, cy) = center;
    let max_x = buffer.width() as i64 - 1;
    let max_y = buffer.height() as i64 - 1;
    let y0 = ((cy - radius).ceil() as i64).max(0);
    let y1 = ((cy + radius).floor() as i64).min(max_y);
    let color = color.to_array();
    let radius_sq = radius * radius;
    let mut writes: u64 = 0;

    for y in y0..=y1 {
        let dy = y as f64 - cy;
        let half = (radius_sq - dy * dy).max(0.0).sqrt();
        let x0 = ((cx - half).ceil() as i64).max(0);
        let x1 = ((cx + half).floor() as i64).min(max_x);
        if x0 > x1 {
            continue;
        }
        let row_start = buffer.index(x0 as u32, y as u32);
        let row_end = buffer.index(x1 as u32, y as u32) + 4;
        for px in buffer.pixels_mut()[row_start..row_end].chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
        writes = writes.saturating_add((x1 - x0 + 1) as u64);
    }
    writes
}
