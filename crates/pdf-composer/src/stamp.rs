//! Stamping raster images onto pages.

use crate::error::ComposerError;
use crate::overlay::{isolate_content, overlay_content};
use crate::page::{effective_resources, page_box, resolve};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use signet_types::{Raster, Rect};
use std::io::Write;

const XOBJECT_PREFIX: &str = "Sig";

/// An image XObject that has been added to a document and can be drawn on
/// any of its pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub id: ObjectId,
    pub width: u32,
    pub height: u32,
    pub has_alpha: bool,
}

/// Decodes a raster and adds it to the document as an image XObject.
///
/// The color channels become a DeviceRGB image. Transparency is kept as a
/// DeviceGray soft mask, added only when at least one pixel is not opaque.
/// Both streams are Flate-compressed.
pub fn embed_image(doc: &mut Document, raster: &Raster) -> Result<EmbeddedImage, ComposerError> {
    let pixels = raster.to_rgba8()?;
    let (width, height) = pixels.dimensions();
    if width == 0 || height == 0 {
        return Err(ComposerError::InvalidRaster(signet_types::RasterError::ZeroSize));
    }

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in pixels.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }
    let has_alpha = alpha.iter().any(|a| *a != u8::MAX);

    let mut image_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };
    if has_alpha {
        let smask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            deflate(&alpha)?,
        ));
        image_dict.set("SMask", smask_id);
    }
    let id = doc.add_object(Stream::new(image_dict, deflate(&rgb)?));

    log::debug!(
        "Embedded {}x{} signature image as {:?} (alpha: {})",
        width,
        height,
        id,
        has_alpha
    );
    Ok(EmbeddedImage {
        id,
        width,
        height,
        has_alpha,
    })
}

/// Draws an embedded image into `rect` on one page.
///
/// `rect` is in top-left page coordinates and the image is stretched to fill
/// it. The page's existing content is isolated first so it stays beneath the
/// image and cannot alter its placement. Drawing is clipped to the page's
/// MediaBox; a rectangle that extends past the page is accepted and only its
/// visible part shows.
pub fn stamp_image(
    doc: &mut Document,
    page_id: ObjectId,
    image: &EmbeddedImage,
    rect: Rect,
) -> Result<(), ComposerError> {
    if !rect.has_area() {
        return Err(ComposerError::InvalidPlacement(rect));
    }

    let page = page_box(doc, page_id)?;
    if !page.bounds().contains(&rect) {
        log::warn!(
            "Placement {} exceeds page {:?} ({}x{}); the overlay will be clipped",
            rect,
            page_id,
            page.width,
            page.height
        );
    }

    let name = register_xobject(doc, page_id, image.id)?;
    isolate_content(doc, page_id)?;

    let (x, y) = page.to_pdf_origin(&rect);
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "re",
                vec![page.llx.into(), page.lly.into(), page.width.into(), page.height.into()],
            ),
            Operation::new("W", vec![]),
            Operation::new("n", vec![]),
            Operation::new(
                "cm",
                vec![rect.width.into(), 0.into(), 0.into(), rect.height.into(), x.into(), y.into()],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ],
    };
    overlay_content(doc, page_id, content.encode()?)?;

    log::debug!("Stamped {:?} at {} on page {:?}", image.id, rect, page_id);
    Ok(())
}

/// Embeds a raster and stamps it on one page.
pub fn stamp_raster(
    doc: &mut Document,
    page_id: ObjectId,
    raster: &Raster,
    rect: Rect,
) -> Result<EmbeddedImage, ComposerError> {
    if !rect.has_area() {
        return Err(ComposerError::InvalidPlacement(rect));
    }
    let image = embed_image(doc, raster)?;
    stamp_image(doc, page_id, &image, rect)?;
    Ok(image)
}

/// Adds the image to the page's XObject resources under a fresh name.
///
/// Resources are copied into a page-local dictionary first, so siblings that
/// share or inherit the same resources are left untouched.
fn register_xobject(
    doc: &mut Document,
    page_id: ObjectId,
    image_id: ObjectId,
) -> Result<String, ComposerError> {
    let mut resources = effective_resources(doc, page_id)?;
    let mut xobjects = match resources.get(b"XObject") {
        Ok(obj) => resolve(doc, obj)?.as_dict()?.clone(),
        Err(_) => Dictionary::new(),
    };

    let name = (1..)
        .map(|n| format!("{}{}", XOBJECT_PREFIX, n))
        .find(|candidate| !xobjects.has(candidate.as_bytes()))
        .unwrap_or_else(|| XOBJECT_PREFIX.to_string());
    xobjects.set(name.as_str(), Object::Reference(image_id));
    resources.set("XObject", Object::Dictionary(xobjects));

    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page_dict.set("Resources", Object::Dictionary(resources));
    Ok(name)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, ComposerError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
