//! Signature stamping and preview benchmarks
//!
//! Measures embedding one signature into documents of growing size and
//! rendering a signed page.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Stream, dictionary};
use signet::pdf_composer::{embed_image, page_ids, stamp_image};
use signet::render::render_page;
use signet::{Raster, Rect};
use std::hint::black_box;

fn document(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content = Content {
            operations: vec![
                Operation::new("rg", vec![0.5.into(), 0.5.into(), 0.5.into()]),
                Operation::new("re", vec![300.into(), 300.into(), 100.into(), 50.into()]),
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
        dictionary! { "Type" => "Pages", "Kids" => kids, "Count" => num_pages as i64 }.into(),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// A 600x200 pad with a diagonal band, close to a real capture.
fn signature() -> Raster {
    let pixels = RgbaImage::from_fn(600, 200, |x, y| {
        if (x / 3).abs_diff(y) < 4 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 0])
        }
    });
    Raster::from_rgba(&pixels).unwrap()
}

fn benchmark_stamp_all_pages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stamp_all_pages");
    let raster = signature();
    let rect = Rect::new(400.0, 680.0, 150.0, 50.0);

    for num_pages in [1, 10, 100] {
        let base = document(num_pages);
        group.bench_with_input(
            BenchmarkId::from_parameter(num_pages),
            &num_pages,
            |b, _| {
                b.iter(|| {
                    let mut doc = base.clone();
                    let image = embed_image(&mut doc, &raster).unwrap();
                    for page_id in page_ids(&doc) {
                        stamp_image(&mut doc, page_id, &image, rect).unwrap();
                    }
                    let mut bytes = Vec::new();
                    doc.save_to(&mut bytes).unwrap();
                    black_box(bytes)
                });
            },
        );
    }
    group.finish();
}

fn benchmark_render_signed_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_signed_page");
    let mut doc = document(1);
    let page_id = page_ids(&doc)[0];
    let image = embed_image(&mut doc, &signature()).unwrap();
    stamp_image(&mut doc, page_id, &image, Rect::new(400.0, 680.0, 150.0, 50.0)).unwrap();

    for dpi in [72.0f32, 150.0] {
        group.bench_with_input(BenchmarkId::from_parameter(dpi), &dpi, |b, &dpi| {
            b.iter(|| black_box(render_page(&doc, page_id, dpi).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_stamp_all_pages,
    benchmark_render_signed_page
);
criterion_main!(benches);
