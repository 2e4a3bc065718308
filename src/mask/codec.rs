use crate::mask::buffer::PixelBuffer;
use crate::mask::error::{EditError, EditResult};
use base64::{engine::general_purpose, Engine as _};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

/// Sniffs the leading magic bytes. Only PNG and JPEG payloads are accepted.
pub fn sniff_kind(bytes: &[u8]) -> Option<ImageKind> {
    if bytes.starts_with(PNG_MAGIC) {
        Some(ImageKind::Png)
    } else if bytes.starts_with(JPEG_MAGIC) {
        Some(ImageKind::Jpeg)
    } else {
        None
    }
}

/// Decodes PNG or JPEG bytes into an RGBA buffer at the image's native size.
pub fn decode_image(bytes: &[u8]) -> EditResult<PixelBuffer> {
    if sniff_kind(bytes).is_none() {
        return Err(EditError::Decode("not a PNG or JPEG payload".into()));
    }
    let image = image::load_from_memory(bytes)
        .map_err(|e| EditError::Decode(e.to_string()))?
        .to_rgba8();
    from_rgba_image(image)
}

/// Lossless PNG encoding of the whole buffer.
pub fn encode_png(buffer: &PixelBuffer) -> EditResult<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            buffer.pixels(),
            buffer.width(),
            buffer.height(),
            ColorType::Rgba8,
        )
        .map_err(|e| EditError::Encode(e.to_string()))?;
    Ok(out)
}

pub fn encode_png_data_url(buffer: &PixelBuffer) -> EditResult<String> {
    let png = encode_png(buffer)?;
    Ok(format!(
        "{}{}",
        PNG_DATA_URL_PREFIX,
        general_purpose::STANDARD.encode(png)
    ))
}

/// Accepts a `data:<mime>;base64,<payload>` URL or bare base64 and returns the
/// decoded bytes.
pub fn decode_data_url(data: &str) -> EditResult<Vec<u8>> {
    let payload = match data.split_once(',') {
        Some((_, payload)) => payload,
        None => data,
    };
    general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| EditError::Decode(format!("invalid base64: {e}")))
}

pub fn decode_image_data_url(data: &str) -> EditResult<PixelBuffer> {
    decode_image(&decode_data_url(data)?)
}

pub fn to_rgba_image(buffer: &PixelBuffer) -> EditResult<RgbaImage> {
    RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.pixels().to_vec()).ok_or(
        EditError::DimensionMismatch {
            expected: buffer.width() as usize * buffer.height() as usize * 4,
            actual: buffer.byte_len(),
        },
    )
}

pub fn from_rgba_image(image: RgbaImage) -> EditResult<PixelBuffer> {
    let (width, height) = image.dimensions();
    PixelBuffer::from_pixels(width, height, image.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::model::Rgba;

    #[test]
    fn png_roundtrip_preserves_binary_mask() {
        let mut mask = PixelBuffer::new(5, 3, Rgba::BLACK);
        mask.set_pixel(2, 1, Rgba::WHITE);
        mask.set_pixel(4, 2, Rgba::WHITE);

        let png = encode_png(&mask).expect("encode");
        assert_eq!(sniff_kind(&png), Some(ImageKind::Png));
        assert_eq!(decode_image(&png).expect("decode"), mask);
    }

    #[test]
    fn data_url_roundtrip_and_bare_base64() {
        let mask = PixelBuffer::new(2, 2, Rgba::WHITE);
        let url = encode_png_data_url(&mask).expect("encode");
        assert!(url.starts_with(PNG_DATA_URL_PREFIX));
        assert_eq!(decode_image_data_url(&url).expect("decode"), mask);

        let bare = url.trim_start_matches(PNG_DATA_URL_PREFIX);
        assert_eq!(decode_image_data_url(bare).expect("decode bare"), mask);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(EditError::Decode(_))
        ));
        assert!(matches!(
            decode_image(b"\x89PNG\r\n\x1a\ntruncated"),
            Err(EditError::Decode(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(EditError::Decode(_))
        ));
    }
}
