//! Page renderer - converts PDF pages to raster images.

use crate::error::RenderError;
use crate::state::{GraphicsState, cmyk, gray, rgb};
use crate::stream::{decode_raw, page_content};
use crate::xobject::image_pixmap;
use image::{Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use signet_pdf_composer::{effective_resources, page_box, resolve};
use signet_types::{Color, Raster};
use std::rc::Rc;
use tiny_skia::{
    FillRule, FilterQuality, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

/// Largest page raster, in pixels, that will be allocated.
const MAX_PIXELS: u64 = 64 * 1024 * 1024;
/// Nesting limit for form XObjects drawing other forms.
const MAX_FORM_DEPTH: usize = 12;

/// Options for page rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Dots per inch. At 72 one pixel is one point.
    pub dpi: f32,
    /// Background color, `None` for transparent.
    pub background: Option<Color>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: 72.0,
            background: Some(Color::WHITE),
        }
    }
}

impl RenderOptions {
    pub fn with_dpi(dpi: f32) -> Self {
        Self {
            dpi,
            ..Default::default()
        }
    }

    pub fn with_transparent_background(mut self) -> Self {
        self.background = None;
        self
    }
}

/// Rasterizes pages of a document.
#[derive(Debug, Clone, Default)]
pub struct PageRenderer {
    options: RenderOptions,
}

impl PageRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders a page to straight-alpha RGBA pixels.
    ///
    /// Pixel (0, 0) is the top-left corner of the page's MediaBox.
    pub fn render(&self, doc: &Document, page_id: ObjectId) -> Result<RgbaImage, RenderError> {
        let dpi = self.options.dpi;
        if !dpi.is_finite() || dpi <= 0.0 {
            return Err(RenderError::InvalidDpi(dpi));
        }
        let page = page_box(doc, page_id)?;
        let scale = dpi / 72.0;
        let width = (page.width * scale).ceil().max(1.0) as u32;
        let height = (page.height * scale).ceil().max(1.0) as u32;
        if u64::from(width) * u64::from(height) > MAX_PIXELS {
            return Err(RenderError::TooLarge { width, height });
        }
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::TooLarge { width, height })?;

        if let Some(background) = self.options.background {
            let [r, g, b, a] = background.to_rgba8();
            pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        }

        // PDF user space has its origin at the bottom-left; flip Y.
        let base = Transform::from_row(
            scale,
            0.0,
            0.0,
            -scale,
            -page.llx * scale,
            (page.lly + page.height) * scale,
        );

        let content = Content::decode(&page_content(doc, page_id)?)?;
        let resources = effective_resources(doc, page_id)?;

        let mut canvas = Canvas {
            doc,
            pixmap,
            skipped_text: 0,
        };
        canvas.run(&content.operations, &resources, GraphicsState::new(base), 0)?;

        if canvas.skipped_text > 0 {
            log::debug!(
                "Page {:?}: skipped {} text object(s) in preview",
                page_id,
                canvas.skipped_text
            );
        }
        Ok(to_rgba(&canvas.pixmap))
    }

    /// Renders a page and encodes it as a PNG raster.
    pub fn render_raster(&self, doc: &Document, page_id: ObjectId) -> Result<Raster, RenderError> {
        let pixels = self.render(doc, page_id)?;
        Ok(Raster::from_rgba(&pixels)?)
    }
}

/// Renders one page at the given resolution on a white background.
pub fn render_page(doc: &Document, page_id: ObjectId, dpi: f32) -> Result<Raster, RenderError> {
    PageRenderer::new(RenderOptions::with_dpi(dpi)).render_raster(doc, page_id)
}

struct Canvas<'a> {
    doc: &'a Document,
    pixmap: Pixmap,
    skipped_text: usize,
}

impl Canvas<'_> {
    /// Executes content stream operators and paints them onto the pixmap.
    fn run(
        &mut self,
        operations: &[Operation],
        resources: &Dictionary,
        initial: GraphicsState,
        depth: usize,
    ) -> Result<(), RenderError> {
        let mut gs = initial;
        let mut stack: Vec<GraphicsState> = Vec::new();
        let mut path = PathBuilder::new();
        let mut pending_clip: Option<FillRule> = None;
        let mut in_text = false;

        for op in operations {
            if in_text {
                if op.operator == "ET" {
                    in_text = false;
                }
                continue;
            }
            if let Some((fill, stroke, close)) = painting(&op.operator) {
                self.paint(&mut gs, &mut path, &mut pending_clip, fill, stroke, close)?;
                continue;
            }
            let args = numbers(&op.operands);

            match op.operator.as_str() {
                "q" => stack.push(gs.clone()),
                "Q" => {
                    // Unbalanced restores are ignored.
                    if let Some(saved) = stack.pop() {
                        gs = saved;
                    }
                }
                "cm" => {
                    if let [a, b, c, d, e, f] = args[..] {
                        gs.ctm = gs.ctm.pre_concat(Transform::from_row(a, b, c, d, e, f));
                    }
                }
                "w" => {
                    if let [width] = args[..] {
                        gs.line_width = width;
                    }
                }

                "g" => {
                    if let [g] = args[..] {
                        gs.fill = gray(g);
                    }
                }
                "G" => {
                    if let [g] = args[..] {
                        gs.stroke = gray(g);
                    }
                }
                "rg" => {
                    if let [r, g, b] = args[..] {
                        gs.fill = rgb(r, g, b);
                    }
                }
                "RG" => {
                    if let [r, g, b] = args[..] {
                        gs.stroke = rgb(r, g, b);
                    }
                }
                "k" => {
                    if let [c, m, y, k] = args[..] {
                        gs.fill = cmyk(c, m, y, k);
                    }
                }
                "K" => {
                    if let [c, m, y, k] = args[..] {
                        gs.stroke = cmyk(c, m, y, k);
                    }
                }
                "sc" | "scn" => {
                    if let Some(color) = color_from_components(&args) {
                        gs.fill = color;
                    }
                }
                "SC" | "SCN" => {
                    if let Some(color) = color_from_components(&args) {
                        gs.stroke = color;
                    }
                }

                "m" => {
                    if let [x, y] = args[..] {
                        path.move_to(x, y);
                    }
                }
                "l" => {
                    if let [x, y] = args[..] {
                        path.line_to(x, y);
                    }
                }
                "c" => {
                    if let [x1, y1, x2, y2, x3, y3] = args[..] {
                        path.cubic_to(x1, y1, x2, y2, x3, y3);
                    }
                }
                "v" => {
                    if let ([x2, y2, x3, y3], Some(last)) = (&args[..], path.last_point()) {
                        path.cubic_to(last.x, last.y, *x2, *y2, *x3, *y3);
                    }
                }
                "y" => {
                    if let [x1, y1, x3, y3] = args[..] {
                        path.cubic_to(x1, y1, x3, y3, x3, y3);
                    }
                }
                "h" => path.close(),
                "re" => {
                    if let [x, y, w, h] = args[..] {
                        // Negative sizes are legal and flip the rectangle.
                        path.move_to(x, y);
                        path.line_to(x + w, y);
                        path.line_to(x + w, y + h);
                        path.line_to(x, y + h);
                        path.close();
                    }
                }

                "W" => pending_clip = Some(FillRule::Winding),
                "W*" => pending_clip = Some(FillRule::EvenOdd),

                "BT" => {
                    in_text = true;
                    self.skipped_text += 1;
                }

                "Do" => {
                    let Some(name) = op.operands.first().and_then(|n| n.as_name().ok()) else {
                        continue;
                    };
                    self.draw_xobject(name, resources, &gs, depth)?;
                }

                _ => {}
            }
        }
        Ok(())
    }

    /// Ends the current path: fills and/or strokes it, then applies a
    /// pending clip.
    fn paint(
        &mut self,
        gs: &mut GraphicsState,
        path: &mut PathBuilder,
        pending_clip: &mut Option<FillRule>,
        fill: Option<FillRule>,
        stroke: bool,
        close: bool,
    ) -> Result<(), RenderError> {
        if close {
            path.close();
        }
        let finished = std::mem::replace(path, PathBuilder::new()).finish();

        if let Some(shape) = &finished {
            if let Some(rule) = fill {
                let paint = solid(gs.fill);
                self.pixmap
                    .fill_path(shape, &paint, rule, gs.ctm, gs.clip_mask());
            }
            if stroke {
                let paint = solid(gs.stroke);
                let style = Stroke {
                    width: gs.line_width.max(0.0),
                    ..Stroke::default()
                };
                self.pixmap
                    .stroke_path(shape, &paint, &style, gs.ctm, gs.clip_mask());
            }
        }

        if let Some(rule) = pending_clip.take() {
            let (width, height) = (self.pixmap.width(), self.pixmap.height());
            let mut mask = match &gs.clip {
                Some(current) => (**current).clone(),
                None => {
                    let mut all = Mask::new(width, height)
                        .ok_or(RenderError::TooLarge { width, height })?;
                    all.data_mut().fill(255);
                    all
                }
            };
            match &finished {
                Some(shape) => mask.intersect_path(shape, rule, false, gs.ctm),
                // Clipping to an empty path hides everything after it.
                None => mask.data_mut().fill(0),
            }
            gs.clip = Some(Rc::new(mask));
        }
        Ok(())
    }

    fn draw_xobject(
        &mut self,
        name: &[u8],
        resources: &Dictionary,
        gs: &GraphicsState,
        depth: usize,
    ) -> Result<(), RenderError> {
        let doc = self.doc;
        let Some(stream) = lookup_xobject(doc, resources, name) else {
            log::warn!(
                "XObject /{} is not in the page resources",
                String::from_utf8_lossy(name)
            );
            return Ok(());
        };

        match stream.dict.get(b"Subtype").and_then(Object::as_name) {
            Ok(b"Image") => match image_pixmap(doc, stream) {
                Ok(image) => {
                    // Images occupy the unit square, first row at the top.
                    let unit = Transform::from_row(
                        1.0 / image.width() as f32,
                        0.0,
                        0.0,
                        -1.0 / image.height() as f32,
                        0.0,
                        1.0,
                    );
                    let paint = PixmapPaint {
                        quality: FilterQuality::Nearest,
                        ..PixmapPaint::default()
                    };
                    self.pixmap.draw_pixmap(
                        0,
                        0,
                        image.as_ref(),
                        &paint,
                        gs.ctm.pre_concat(unit),
                        gs.clip_mask(),
                    );
                }
                Err(e) => log::warn!(
                    "Skipping image /{} in preview: {}",
                    String::from_utf8_lossy(name),
                    e
                ),
            },
            Ok(b"Form") => {
                if depth >= MAX_FORM_DEPTH {
                    log::warn!(
                        "Skipping form /{}: nested deeper than {}",
                        String::from_utf8_lossy(name),
                        MAX_FORM_DEPTH
                    );
                    return Ok(());
                }
                self.draw_form(stream, resources, gs, depth)?;
            }
            _ => log::warn!(
                "Skipping XObject /{} of unsupported type",
                String::from_utf8_lossy(name)
            ),
        }
        Ok(())
    }

    fn draw_form(
        &mut self,
        stream: &Stream,
        parent_resources: &Dictionary,
        gs: &GraphicsState,
        depth: usize,
    ) -> Result<(), RenderError> {
        let doc = self.doc;
        let content = Content::decode(&decode_raw(doc, stream)?)?;

        let matrix = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|m| resolve(doc, m).ok())
            .and_then(|m| m.as_array().ok())
            .map(|items| numbers(items));
        let mut form_gs = gs.clone();
        if let Some([a, b, c, d, e, f]) = matrix.as_deref() {
            form_gs.ctm = form_gs.ctm.pre_concat(Transform::from_row(*a, *b, *c, *d, *e, *f));
        }

        let own_resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|r| resolve(doc, r).ok())
            .and_then(|r| r.as_dict().ok());
        let resources = own_resources.unwrap_or(parent_resources);

        self.run(&content.operations, resources, form_gs, depth + 1)
    }
}

fn lookup_xobject<'a>(doc: &'a Document, resources: &'a Dictionary, name: &[u8]) -> Option<&'a Stream> {
    let xobjects = resolve(doc, resources.get(b"XObject").ok()?).ok()?.as_dict().ok()?;
    resolve(doc, xobjects.get(name).ok()?).ok()?.as_stream().ok()
}

/// Fill rule, stroke and close flags of a path-painting operator.
fn painting(operator: &str) -> Option<(Option<FillRule>, bool, bool)> {
    let winding = Some(FillRule::Winding);
    let even_odd = Some(FillRule::EvenOdd);
    Some(match operator {
        "f" | "F" => (winding, false, false),
        "f*" => (even_odd, false, false),
        "S" => (None, true, false),
        "s" => (None, true, true),
        "B" => (winding, true, false),
        "B*" => (even_odd, true, false),
        "b" => (winding, true, true),
        "b*" => (even_odd, true, true),
        "n" => (None, false, false),
        _ => return None,
    })
}

fn numbers(operands: &[Object]) -> Vec<f32> {
    operands
        .iter()
        .filter_map(|o| match o {
            Object::Integer(i) => Some(*i as f32),
            Object::Real(r) => Some(*r),
            _ => None,
        })
        .collect()
}

fn color_from_components(args: &[f32]) -> Option<tiny_skia::Color> {
    match *args {
        [g] => Some(gray(g)),
        [r, g, b] => Some(rgb(r, g, b)),
        [c, m, y, k] => Some(cmyk(c, m, y, k)),
        _ => None,
    }
}

fn solid(color: tiny_skia::Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = false;
    paint
}

fn to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}
