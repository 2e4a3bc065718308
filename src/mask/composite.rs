use crate::mask::binarize::binarize;
use crate::mask::buffer::PixelBuffer;
use crate::mask::codec::{from_rgba_image, to_rgba_image};
use crate::mask::error::{EditError, EditResult};
use crate::mask::model::Region;
use image::imageops::{self, FilterType};

/// Copies `region` out of `buffer` without scaling. Pixels of the region that
/// fall outside the buffer come back transparent.
pub fn extract(buffer: &PixelBuffer, region: Region) -> EditResult<PixelBuffer> {
    let region = region.normalized();
    if region.clamp(buffer.width(), buffer.height()).is_none() {
        return Err(EditError::OutOfBounds {
            x: region.x as i64,
            y: region.y as i64,
            width: buffer.width(),
            height: buffer.height(),
        });
    }
    buffer.crop(region)
}

/// Nearest-neighbour resize, no smoothing.
pub fn scale_nearest(src: &PixelBuffer, width: u32, height: u32) -> EditResult<PixelBuffer> {
    if src.width() == width && src.height() == height {
        return Ok(src.clone());
    }
    let image = to_rgba_image(src)?;
    from_rgba_image(imageops::resize(&image, width, height, FilterType::Nearest))
}

/// The part of `region` that lies inside `mask`, or `None` when nothing does.
pub fn clip_region(mask: &PixelBuffer, region: Region) -> Option<Region> {
    region.clamp(mask.width(), mask.height())
}

/// Scales `source` to the clipped region, overwrites that rectangle of `mask`
/// and re-binarizes the whole mask. Returns the rectangle written, or `None`
/// when the clipped region is empty (nothing is touched in that case).
pub fn replace(
    mask: &mut PixelBuffer,
    region: Region,
    source: &PixelBuffer,
    threshold: u8,
) -> EditResult<Option<Region>> {
    let Some(clip) = clip_region(mask, region) else {
        return Ok(None);
    };
    if source.is_empty() {
        return Err(EditError::Decode("source image has no pixels".into()));
    }
    let scaled = scale_nearest(source, clip.width as u32, clip.height as u32)?;
    mask.blit(&scaled, clip.x as u32, clip.y as u32);
    binarize(mask, threshold);
    Ok(Some(clip))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::binarize::DEFAULT_THRESHOLD;
    use crate::mask::model::Rgba;

    #[test]
    fn extract_copies_exact_rectangle() {
        let mut buffer = PixelBuffer::new(6, 6, Rgba::BLACK);
        buffer.set_pixel(2, 3, Rgba::WHITE);
        let out = extract(&buffer, Region::from_corners((4, 5), (1, 2))).expect("extract");
        assert_eq!((out.width(), out.height()), (3, 3));
        assert_eq!(out.pixel(1, 1), Rgba::WHITE);
        assert_eq!(out.pixel(0, 0), Rgba::BLACK);
    }

    #[test]
    fn extract_outside_or_empty_is_out_of_bounds() {
        let buffer = PixelBuffer::new(6, 6, Rgba::BLACK);
        assert!(matches!(
            extract(&buffer, Region::new(10, 10, 3, 3)),
            Err(EditError::OutOfBounds { .. })
        ));
        assert!(extract(&buffer, Region::new(1, 1, 0, 3)).is_err());
    }

    #[test]
    fn scale_nearest_duplicates_pixels() {
        let src = PixelBuffer::from_pixels(2, 1, vec![255, 255, 255, 255, 0, 0, 0, 255])
            .expect("src");
        let out = scale_nearest(&src, 4, 2).expect("scale");
        for y in 0..2 {
            assert_eq!(out.pixel(0, y), Rgba::WHITE);
            assert_eq!(out.pixel(1, y), Rgba::WHITE);
            assert_eq!(out.pixel(2, y), Rgba::BLACK);
            assert_eq!(out.pixel(3, y), Rgba::BLACK);
        }
    }

    #[test]
    fn replace_clips_to_buffer_bounds() {
        let mut mask = PixelBuffer::new(100, 100, Rgba::BLACK);
        let source = PixelBuffer::new(7, 3, Rgba::WHITE);
        let written = replace(&mut mask, Region::new(90, 90, 20, 20), &source, DEFAULT_THRESHOLD)
            .expect("replace");
        assert_eq!(written, Some(Region::new(90, 90, 10, 10)));
        for y in 0..100 {
            for x in 0..100 {
                let inside = x >= 90 && y >= 90;
                let expected = if inside { Rgba::WHITE } else { Rgba::BLACK };
                assert_eq!(mask.pixel(x, y), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn replace_with_empty_clip_is_a_no_op() {
        let mut mask = PixelBuffer::new(10, 10, Rgba::rgba(90, 90, 90, 255));
        let before = mask.clone();
        let source = PixelBuffer::new(2, 2, Rgba::WHITE);
        for region in [
            Region::new(10, 0, 5, 5),
            Region::new(-8, -8, 5, 5),
            Region::new(3, 3, 0, 4),
        ] {
            let written = replace(&mut mask, region, &source, DEFAULT_THRESHOLD).expect("replace");
            assert_eq!(written, None);
        }
        assert_eq!(mask, before);
    }

    #[test]
    fn replace_rebinarizes_the_whole_mask() {
        let mut mask = PixelBuffer::new(4, 4, Rgba::rgba(200, 200, 200, 128));
        let source = PixelBuffer::new(1, 1, Rgba::rgba(10, 10, 10, 255));
        replace(&mut mask, Region::new(0, 0, 1, 1), &source, DEFAULT_THRESHOLD).expect("replace");
        assert_eq!(mask.pixel(0, 0), Rgba::BLACK);
        assert_eq!(mask.pixel(3, 3), Rgba::WHITE);
    }

    #[test]
    fn negative_origin_is_clipped_to_the_intersection() {
        let mut mask = PixelBuffer::new(10, 10, Rgba::BLACK);
        let source = PixelBuffer::new(1, 1, Rgba::WHITE);
        let written = replace(&mut mask, Region::new(-5, -5, 8, 8), &source, DEFAULT_THRESHOLD)
            .expect("replace");
        assert_eq!(written, Some(Region::new(0, 0, 3, 3)));
        assert_eq!(mask.pixel(2, 2), Rgba::WHITE);
        assert_eq!(mask.pixel(3, 3), Rgba::BLACK);
    }
}
