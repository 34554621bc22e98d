use image::{Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Stream, dictionary};
use signet::Raster;
use std::path::{Path, PathBuf};

/// Writes a Letter-sized document to `dir/name`.
///
/// Every page carries a mid-gray box at (300, 300)-(400, 350) in PDF space,
/// which lands on image rows 442..492 at 72 dpi. Page `i` also has a small
/// black marker `10 * i` points from the left edge so pages are told apart.
pub fn write_pdf(dir: &Path, name: &str, num_pages: usize) -> PathBuf {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for i in 0..num_pages {
        let marker_x = 10 * i as i64;
        let content = Content {
            operations: vec![
                Operation::new("rg", vec![0.5.into(), 0.5.into(), 0.5.into()]),
                Operation::new("re", vec![300.into(), 300.into(), 100.into(), 50.into()]),
                Operation::new("f", vec![]),
                Operation::new("g", vec![0.into()]),
                Operation::new("re", vec![marker_x.into(), 0.into(), 5.into(), 5.into()]),
                Operation::new("f", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }
    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => num_pages as i64,
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

/// A fully opaque square of one color.
pub fn solid_raster(size: u32, rgba: [u8; 4]) -> Raster {
    Raster::from_rgba(&RgbaImage::from_pixel(size, size, Rgba(rgba))).unwrap()
}

/// Pen events drawing one horizontal stroke across a 600x200 pad.
pub const STROKE_EVENTS: &str = r#"[
    {"type": "set_pen_width", "width": 8},
    {"type": "pen_down", "x": 20, "y": 100},
    {"type": "pen_move", "x": 580, "y": 100},
    {"type": "pen_up"}
]"#;
