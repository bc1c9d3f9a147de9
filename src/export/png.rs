//! PNG encoding of captured cards.

use super::ExportError;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use log::debug;

/// Encode a bitmap as a lossless RGBA PNG.
pub fn encode_png(bitmap: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Default, FilterType::Adaptive);
    encoder.write_image(
        bitmap.as_raw(),
        bitmap.width(),
        bitmap.height(),
        ExtendedColorType::Rgba8,
    )?;
    debug!(
        "Encoded {}x{} PNG ({} bytes)",
        bitmap.width(),
        bitmap.height(),
        buf.len()
    );
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_is_lossless() {
        let mut bitmap = RgbaImage::from_pixel(6, 4, Rgba([10, 20, 30, 0]));
        bitmap.put_pixel(2, 1, Rgba([250, 128, 3, 77]));

        let bytes = encode_png(&bitmap).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, bitmap);
    }
}
