//! Scanline flood fill.
//!
//! Each popped seed is widened to the full matching run on its row, the run is
//! painted left to right, and the rows directly above and below are scanned in
//! the same pass. A new seed is pushed at the first pixel of every matching
//! span found there; the `span_above`/`span_below` flags stop the same span
//! from being pushed twice.

use crate::mask::buffer::PixelBuffer;
use crate::mask::error::{EditError, EditResult};
use crate::mask::model::{FillRequest, Rgba};

struct Filler<'a> {
    buffer: &'a mut PixelBuffer,
    start: Rgba,
    fill: [u8; 4],
    tolerance: u8,
    width: u32,
    height: u32,
    // Filled pixels never match again, even when the fill color sits within
    // tolerance of the start color.
    visited: Vec<bool>,
    stack: Vec<(u32, u32)>,
}

impl Filler<'_> {
    #[inline]
    fn matches(&self, x: u32, y: u32) -> bool {
        let i = y as usize * self.width as usize + x as usize;
        !self.visited[i] && self.buffer.pixel(x, y).within_tolerance(self.start, self.tolerance)
    }

    #[inline]
    fn paint(&mut self, x: u32, y: u32) {
        let i = y as usize * self.width as usize + x as usize;
        self.visited[i] = true;
        let idx = i * 4;
        self.buffer.pixels_mut()[idx..idx + 4].copy_from_slice(&self.fill);
    }

    fn scan_neighbour(&mut self, x: u32, y: u32, span_open: &mut bool) {
        if self.matches(x, y) {
            if !*span_open {
                self.stack.push((x, y));
                *span_open = true;
            }
        } else {
            *span_open = false;
        }
    }

    fn run(&mut self) -> usize {
        let mut filled = 0;
        while let Some((seed_x, y)) = self.stack.pop() {
            if !self.matches(seed_x, y) {
                continue;
            }
            let mut x = seed_x;
            while x > 0 && self.matches(x - 1, y) {
                x -= 1;
            }

            let mut span_above = false;
            let mut span_below = false;
            while x < self.width && self.matches(x, y) {
                self.paint(x, y);
                filled += 1;
                if y > 0 {
                    self.scan_neighbour(x, y - 1, &mut span_above);
                }
                if y + 1 < self.height {
                    self.scan_neighbour(x, y + 1, &mut span_below);
                }
                x += 1;
            }
        }
        filled
    }
}

/// Fills the 4-connected region around `request.seed` whose pixels are within
/// `request.tolerance` (per channel) of the seed's original color. Returns the
/// number of pixels written; zero when the seed already has the fill color.
pub fn flood_fill(buffer: &mut PixelBuffer, request: FillRequest) -> EditResult<usize> {
    let (sx, sy) = request.seed;
    let start = buffer
        .get(sx as i64, sy as i64)
        .ok_or(EditError::OutOfBounds {
            x: sx as i64,
            y: sy as i64,
            width: buffer.width(),
            height: buffer.height(),
        })?;
    if start == request.fill_color {
        return Ok(0);
    }

    let width = buffer.width();
    let height = buffer.height();
    let mut filler = Filler {
        buffer,
        start,
        fill: request.fill_color.to_array(),
        tolerance: request.tolerance,
        width,
        height,
        visited: vec![false; width as usize * height as usize],
        stack: Vec::with_capacity(256),
    };
    filler.stack.push((sx as u32, sy as u32));
    Ok(filler.run())
}

/// Validates the seed and reports whether `flood_fill` would change anything.
pub fn fill_would_change(buffer: &PixelBuffer, request: FillRequest) -> EditResult<bool> {
    let (sx, sy) = request.seed;
    match buffer.get(sx as i64, sy as i64) {
        Some(start) => Ok(start != request.fill_color),
        None => Err(EditError::OutOfBounds {
            x: sx as i64,
            y: sy as i64,
            width: buffer.width(),
            height: buffer.height(),
        }),
    }
}
