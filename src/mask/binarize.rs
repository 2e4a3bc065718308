use crate::mask::buffer::PixelBuffer;

pub const DEFAULT_THRESHOLD: u8 = 127;

/// Snaps every pixel to opaque white when `(r + g + b) / 3 > threshold`,
/// otherwise to opaque black. Returns the number of white pixels.
pub fn binarize(buffer: &mut PixelBuffer, threshold: u8) -> usize {
    // avg > t  <=>  sum > 3t, keeps the comparison exact in integers
    let cutoff = threshold as u16 * 3;
    let mut white = 0;
    for px in buffer.pixels_mut().chunks_exact_mut(4) {
        let sum = px[0] as u16 + px[1] as u16 + px[2] as u16;
        let v = if sum > cutoff {
            white += 1;
            255
        } else {
            0
        };
        px[0] = v;
        px[1] = v;
        px[2] = v;
        px[3] = 255;
    }
    white
}

/// True when every pixel is already pure opaque black or white.
pub fn is_binary(buffer: &PixelBuffer) -> bool {
    buffer
        .pixels()
        .chunks_exact(4)
        .all(|px| px == [0, 0, 0, 255] || px == [255, 255, 255, 255])
}
