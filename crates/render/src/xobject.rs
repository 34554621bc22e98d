//! Image XObject decoding.

use crate::error::RenderError;
use crate::state::cmyk_to_rgb;
use crate::stream::{Decoded, decode};
use image::RgbaImage;
use lopdf::{Dictionary, Document, Object, Stream};
use signet_pdf_composer::{number, resolve};
use tiny_skia::{IntSize, Pixmap};

/// Decodes an image XObject, including its soft mask, into a premultiplied
/// pixmap of the image's own size.
pub(crate) fn image_pixmap(doc: &Document, stream: &Stream) -> Result<Pixmap, RenderError> {
    let dict = &stream.dict;
    if flag(doc, dict, b"ImageMask") {
        return Err(RenderError::UnsupportedImage("stencil masks".to_string()));
    }
    let (width, height) = dimensions(doc, dict)?;
    let mut rgba = samples(doc, stream, width, height)?;

    if let Ok(smask) = dict.get(b"SMask") {
        let smask = resolve(doc, smask)?.as_stream()?;
        let (mw, mh) = dimensions(doc, &smask.dict)?;
        if (mw, mh) != (width, height) {
            return Err(RenderError::UnsupportedImage(format!(
                "soft mask {}x{} does not match image {}x{}",
                mw, mh, width, height
            )));
        }
        let alpha = samples(doc, smask, mw, mh)?;
        for (dst, src) in rgba.pixels_mut().zip(alpha.pixels()) {
            // Soft masks are grayscale; any channel holds the coverage.
            dst.0[3] = src.0[0];
        }
    }

    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| RenderError::UnsupportedImage(format!("size {}x{}", width, height)))?;
    let mut data = rgba.into_raw();
    premultiply(&mut data);
    Pixmap::from_vec(data, size)
        .ok_or_else(|| RenderError::UnsupportedImage("pixel buffer size mismatch".to_string()))
}

/// Decodes image samples to straight-alpha RGBA, fully opaque.
fn samples(
    doc: &Document,
    stream: &Stream,
    width: u32,
    height: u32,
) -> Result<RgbaImage, RenderError> {
    let raw = match decode(doc, stream)? {
        Decoded::Jpeg(bytes) => {
            let img = image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg)?;
            return Ok(img.to_rgba8());
        }
        Decoded::Raw(raw) => raw,
    };

    let bits = dict_number(doc, &stream.dict, b"BitsPerComponent").unwrap_or(8.0);
    if bits != 8.0 {
        return Err(RenderError::UnsupportedImage(format!("{} bits per component", bits)));
    }
    let components = components(doc, &stream.dict)?;
    let pixels = width as usize * height as usize;
    if raw.len() < pixels * components {
        return Err(RenderError::UnsupportedImage(format!(
            "{} sample bytes for a {}x{} image with {} components",
            raw.len(),
            width,
            height,
            components
        )));
    }

    let mut out = Vec::with_capacity(pixels * 4);
    for px in raw.chunks_exact(components).take(pixels) {
        match *px {
            [g] => out.extend_from_slice(&[g, g, g, 255]),
            [r, g, b] => out.extend_from_slice(&[r, g, b, 255]),
            [c, m, y, k] => {
                let (r, g, b) = cmyk_to_rgb(
                    f32::from(c) / 255.0,
                    f32::from(m) / 255.0,
                    f32::from(y) / 255.0,
                    f32::from(k) / 255.0,
                );
                out.extend_from_slice(&[to_byte(r), to_byte(g), to_byte(b), 255]);
            }
            _ => out.extend_from_slice(&[0, 0, 0, 255]),
        }
    }
    RgbaImage::from_raw(width, height, out)
        .ok_or_else(|| RenderError::UnsupportedImage("sample buffer size mismatch".to_string()))
}

/// Number of color components per sample for the image's color space.
fn components(doc: &Document, dict: &Dictionary) -> Result<usize, RenderError> {
    let Ok(space) = dict.get(b"ColorSpace") else {
        // Soft masks may omit it.
        return Ok(1);
    };
    match resolve(doc, space)? {
        Object::Name(name) => named_components(name),
        Object::Array(items) => {
            let family = items
                .first()
                .and_then(|f| resolve(doc, f).ok())
                .and_then(|f| f.as_name().ok())
                .unwrap_or_default();
            match family {
                b"ICCBased" => {
                    let profile = items
                        .get(1)
                        .and_then(|p| resolve(doc, p).ok())
                        .and_then(|p| p.as_stream().ok());
                    match profile.and_then(|p| dict_number(doc, &p.dict, b"N")) {
                        Some(n) if n == 1.0 || n == 3.0 || n == 4.0 => Ok(n as usize),
                        _ => Err(RenderError::UnsupportedImage(
                            "ICC profile without a usable /N".to_string(),
                        )),
                    }
                }
                b"CalGray" => Ok(1),
                b"CalRGB" | b"Lab" => Ok(3),
                other => Err(RenderError::UnsupportedImage(format!(
                    "color space {}",
                    String::from_utf8_lossy(other)
                ))),
            }
        }
        _ => Err(RenderError::UnsupportedImage("malformed color space".to_string())),
    }
}

fn named_components(name: &[u8]) -> Result<usize, RenderError> {
    match name {
        b"DeviceGray" | b"G" => Ok(1),
        b"DeviceRGB" | b"RGB" => Ok(3),
        b"DeviceCMYK" | b"CMYK" => Ok(4),
        other => Err(RenderError::UnsupportedImage(format!(
            "color space {}",
            String::from_utf8_lossy(other)
        ))),
    }
}

fn dimensions(doc: &Document, dict: &Dictionary) -> Result<(u32, u32), RenderError> {
    let width = dict_number(doc, dict, b"Width").unwrap_or(0.0);
    let height = dict_number(doc, dict, b"Height").unwrap_or(0.0);
    if width < 1.0 || height < 1.0 {
        return Err(RenderError::UnsupportedImage(format!(
            "invalid dimensions {}x{}",
            width, height
        )));
    }
    Ok((width as u32, height as u32))
}

fn dict_number(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<f32> {
    dict.get(key).ok().and_then(|v| number(doc, v))
}

fn flag(doc: &Document, dict: &Dictionary, key: &[u8]) -> bool {
    dict.get(key)
        .ok()
        .and_then(|v| resolve(doc, v).ok())
        .and_then(|v| v.as_bool().ok())
        .unwrap_or(false)
}

fn to_byte(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn premultiply(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}
