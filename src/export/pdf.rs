//! PDF composition of captured cards.
//!
//! Produces a single A4 portrait page with the card bitmap drawn at a fixed,
//! centered 85 x 140 mm footprint. The bitmap is stored as a DeviceRGB image
//! with its alpha channel in a separate soft mask, so the rounded corners
//! stay transparent on the page.

use super::options::{mm_to_pt, Placement, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use super::ExportError;
use image::RgbaImage;
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, text_string, Document, Object, Stream};

/// Resource name of the card image on the page.
const IMAGE_NAME: &str = "Im0";

/// Compose a one-page PDF showing `bitmap`.
pub fn compose_pdf(bitmap: &RgbaImage, title: &str) -> Result<Vec<u8>, ExportError> {
    let (width, height) = bitmap.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::CaptureOrEncoding(
            "Cannot place an empty bitmap on a page".to_string(),
        ));
    }

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in bitmap.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let smask_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        alpha,
    ));
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "SMask" => smask_id,
        },
        rgb,
    ));

    let placement = Placement::centered_card();
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    mm_to_pt(placement.width).into(),
                    0.into(),
                    0.into(),
                    mm_to_pt(placement.height).into(),
                    mm_to_pt(placement.x).into(),
                    mm_to_pt(placement.bottom()).into(),
                ],
            ),
            Operation::new("Do", vec![IMAGE_NAME.into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        mm_to_pt(PAGE_WIDTH_MM).into(),
        mm_to_pt(PAGE_HEIGHT_MM).into(),
    ];
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => media_box,
        "Resources" => dictionary! {
            "XObject" => dictionary! { IMAGE_NAME => image_id },
        },
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(title),
        "Producer" => Object::string_literal("Cardforge"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| ExportError::CaptureOrEncoding(format!("Failed to write PDF: {}", e)))?;
    debug!(
        "Composed PDF with {}x{} card image ({} bytes)",
        width,
        height,
        buf.len()
    );
    Ok(buf)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample_pdf() -> Document {
        let bitmap = RgbaImage::from_pixel(64, 100, Rgba([37, 99, 235, 255]));
        let bytes = compose_pdf(&bitmap, "Alex Johnson-ID-Card").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        Document::load_mem(&bytes).unwrap()
    }

    fn image_streams(doc: &Document) -> Vec<&Stream> {
        doc.objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .filter(|s| {
                s.dict
                    .get(b"Subtype")
                    .and_then(|v| v.as_name())
                    .map(|n| n == b"Image")
                    .unwrap_or(false)
            })
            .collect()
    }

    #[test]
    fn test_single_a4_page() {
        let doc = sample_pdf();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.values().next().unwrap();
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let media_box: Vec<f32> = page
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_float().unwrap())
            .collect();
        assert_eq!(media_box.len(), 4);
        assert!((media_box[2] - 595.28).abs() < 0.05);
        assert!((media_box[3] - 841.89).abs() < 0.05);
    }

    #[test]
    fn test_image_embedded_with_soft_mask() {
        let doc = sample_pdf();
        let images = image_streams(&doc);
        assert_eq!(images.len(), 2);

        let rgb = images
            .iter()
            .find(|s| s.dict.get(b"SMask").is_ok())
            .expect("color image with soft mask");
        assert_eq!(rgb.dict.get(b"Width").unwrap().as_i64().unwrap(), 64);
        assert_eq!(rgb.dict.get(b"Height").unwrap().as_i64().unwrap(), 100);
        assert_eq!(
            rgb.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceRGB"
        );
    }

    #[test]
    fn test_card_drawn_at_centered_footprint() {
        let doc = sample_pdf();
        let page_id = *doc.get_pages().values().next().unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

        let cm = content
            .operations
            .iter()
            .find(|op| op.operator == "cm")
            .expect("transform present");
        let values: Vec<f32> = cm.operands.iter().map(|v| v.as_float().unwrap()).collect();
        assert!((values[0] - mm_to_pt(85.0)).abs() < 0.01);
        assert!((values[3] - mm_to_pt(140.0)).abs() < 0.01);
        assert!((values[4] - mm_to_pt(62.5)).abs() < 0.01);
        assert!((values[5] - mm_to_pt(78.5)).abs() < 0.01);
        assert!(content.operations.iter().any(|op| op.operator == "Do"));
    }

    fn info_title(bytes: &[u8]) -> String {
        let doc = Document::load_mem(bytes).unwrap();
        let info = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let title = doc.get_dictionary(info).unwrap().get(b"Title").unwrap();
        lopdf::decode_text_string(title).unwrap()
    }

    #[test]
    fn test_title_keeps_non_ascii_names() {
        let bitmap = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));

        let bytes = compose_pdf(&bitmap, "Zoë Ångström-ID-Card").unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let info = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let raw = doc.get_dictionary(info).unwrap().get(b"Title").unwrap();
        assert!(raw.as_str().unwrap().starts_with(b"\xFE\xFF"));
        assert_eq!(info_title(&bytes), "Zoë Ångström-ID-Card");

        let bytes = compose_pdf(&bitmap, "Alex (Jr)-ID-Card").unwrap();
        assert_eq!(info_title(&bytes), "Alex (Jr)-ID-Card");
    }

    #[test]
    fn test_empty_bitmap_rejected() {
        let bitmap = RgbaImage::new(0, 0);
        assert!(matches!(
            compose_pdf(&bitmap, "x"),
            Err(ExportError::CaptureOrEncoding(_))
        ));
    }
}
