use crate::mask::error::{EditError, EditResult};
use crate::mask::model::{Region, Rgba};

/// Largest region `crop` will allocate (1 GiB of RGBA).
pub const MAX_CROP_PIXELS: u64 = 1 << 28;

/// Row-major RGBA raster. `pixels.len() == width * height * 4` at all times.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        let mut buffer = Self {
            width,
            height,
            pixels: vec![0u8; byte_len(width, height)],
        };
        buffer.fill(fill);
        buffer
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> EditResult<Self> {
        let expected = byte_len(width, height);
        if pixels.len() != expected {
            return Err(EditError::DimensionMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = self.index(x, y);
        Rgba::from_slice(&self.pixels[idx..idx + 4])
    }

    pub fn get(&self, x: i64, y: i64) -> Option<Rgba> {
        self.contains(x, y).then(|| self.pixel(x as u32, y as u32))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        let idx = self.index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Writes `color` at (x, y) when inside the buffer; silently ignores the rest.
    pub fn put(&mut self, x: i64, y: i64, color: Rgba) {
        if self.contains(x, y) {
            self.set_pixel(x as u32, y as u32, color);
        }
    }

    pub fn fill(&mut self, color: Rgba) {
        let color = color.to_array();
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    /// Reallocates for new dimensions and clears to `fill`.
    pub fn reset(&mut self, width: u32, height: u32, fill: Rgba) {
        *self = Self::new(width, height, fill);
    }

    /// Replaces the whole buffer (dimensions and bytes) with `other`'s.
    pub fn copy_from(&mut self, other: &PixelBuffer) {
        if self.width == other.width && self.height == other.height {
            self.pixels.copy_from_slice(&other.pixels);
        } else {
            *self = other.clone();
        }
    }

    /// Overwrites the rectangle at (x, y) with the rows of `src`. `src` must fit
    /// entirely inside the buffer.
    pub fn blit(&mut self, src: &PixelBuffer, x: u32, y: u32) {
        debug_assert!(x + src.width <= self.width && y + src.height <= self.height);
        let row_bytes = src.width as usize * 4;
        for row in 0..src.height {
            let src_start = src.index(0, row);
            let dst_start = self.index(x, y + row);
            self.pixels[dst_start..dst_start + row_bytes]
                .copy_from_slice(&src.pixels[src_start..src_start + row_bytes]);
        }
    }

    /// Copies the pixels covered by `region` into a new buffer of the region's
    /// size. Parts of the region outside this buffer stay transparent. Regions
    /// larger than [`MAX_CROP_PIXELS`] are refused.
    pub fn crop(&self, region: Region) -> EditResult<PixelBuffer> {
        let region = region.normalized();
        let (width, height) = (region.width.max(0) as u32, region.height.max(0) as u32);
        if width as u64 * height as u64 > MAX_CROP_PIXELS {
            return Err(EditError::OutOfBounds {
                x: region.x as i64,
                y: region.y as i64,
                width: self.width,
                height: self.height,
            });
        }
        let mut out = PixelBuffer::new(width, height, Rgba::TRANSPARENT);
        let Some(visible) = region.clamp(self.width, self.height) else {
            return Ok(out);
        };
        let row_bytes = visible.width as usize * 4;
        let dx = (visible.x - region.x) as u32;
        let dy = (visible.y - region.y) as u32;
        for row in 0..visible.height as u32 {
            let src_start = self.index(visible.x as u32, visible.y as u32 + row);
            let dst_start = out.index(dx, dy + row);
            out.pixels[dst_start..dst_start + row_bytes]
                .copy_from_slice(&self.pixels[src_start..src_start + row_bytes]);
        }
        Ok(out)
    }

    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_filled_with_requested_color() {
        let buffer = PixelBuffer::new(3, 2, Rgba::BLACK);
        assert_eq!(buffer.pixels().len(), 3 * 2 * 4);
        assert!(buffer
            .pixels()
            .chunks_exact(4)
            .all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn from_pixels_rejects_wrong_length() {
        let err = PixelBuffer::from_pixels(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            EditError::DimensionMismatch {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn reset_reallocates_and_clears() {
        let mut buffer = PixelBuffer::new(2, 2, Rgba::WHITE);
        buffer.reset(5, 1, Rgba::BLACK);
        assert_eq!((buffer.width(), buffer.height()), (5, 1));
        assert_eq!(buffer.byte_len(), 20);
        assert_eq!(buffer.pixel(4, 0), Rgba::BLACK);
    }

    #[test]
    fn put_ignores_out_of_bounds_writes() {
        let mut buffer = PixelBuffer::new(2, 2, Rgba::BLACK);
        let before = buffer.clone();
        buffer.put(-1, 0, Rgba::WHITE);
        buffer.put(0, 2, Rgba::WHITE);
        assert_eq!(buffer, before);
        buffer.put(1, 1, Rgba::WHITE);
        assert_eq!(buffer.pixel(1, 1), Rgba::WHITE);
    }

    #[test]
    fn crop_pads_outside_pixels_with_transparent() {
        let mut buffer = PixelBuffer::new(4, 4, Rgba::BLACK);
        buffer.set_pixel(3, 3, Rgba::WHITE);
        let out = buffer.crop(Region::new(2, 2, 4, 4)).expect("crop");
        assert_eq!((out.width(), out.height()), (4, 4));
        assert_eq!(out.pixel(0, 0), Rgba::BLACK);
        assert_eq!(out.pixel(1, 1), Rgba::WHITE);
        assert_eq!(out.pixel(2, 2), Rgba::TRANSPARENT);
        assert_eq!(out.pixel(3, 0), Rgba::TRANSPARENT);
    }

    #[test]
    fn oversized_crop_is_refused_before_allocating() {
        let buffer = PixelBuffer::new(10, 10, Rgba::BLACK);
        let err = buffer.crop(Region::new(0, 0, 100_000, 100_000)).unwrap_err();
        assert!(matches!(err, EditError::OutOfBounds { x: 0, y: 0, .. }));
    }

    #[test]
    fn blit_overwrites_only_target_rect() {
        let mut dst = PixelBuffer::new(4, 4, Rgba::BLACK);
        let src = PixelBuffer::new(2, 2, Rgba::WHITE);
        dst.blit(&src, 1, 2);
        assert_eq!(dst.pixel(1, 2), Rgba::WHITE);
        assert_eq!(dst.pixel(2, 3), Rgba::WHITE);
        assert_eq!(dst.pixel(0, 2), Rgba::BLACK);
        assert_eq!(dst.pixel(1, 1), Rgba::BLACK);
        assert_eq!(dst.pixel(3, 3), Rgba::BLACK);
    }
}
