use std::rc::Rc;
use tiny_skia::{Color, Mask, Transform};

/// The subset of the PDF graphics state the preview honors.
#[derive(Clone)]
pub(crate) struct GraphicsState {
    /// User space to device pixels.
    pub ctm: Transform,
    pub fill: Color,
    pub stroke: Color,
    pub line_width: f32,
    /// Shared between saved states until a clip operator replaces it.
    pub clip: Option<Rc<Mask>>,
}

impl GraphicsState {
    pub fn new(ctm: Transform) -> Self {
        Self {
            ctm,
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
            clip: None,
        }
    }

    pub fn clip_mask(&self) -> Option<&Mask> {
        self.clip.as_deref()
    }
}

pub(crate) fn gray(g: f32) -> Color {
    rgb(g, g, g)
}

pub(crate) fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::from_rgba(unit(r), unit(g), unit(b), 1.0).unwrap_or(Color::BLACK)
}

pub(crate) fn cmyk(c: f32, m: f32, y: f32, k: f32) -> Color {
    let (r, g, b) = cmyk_to_rgb(c, m, y, k);
    rgb(r, g, b)
}

pub(crate) fn cmyk_to_rgb(c: f32, m: f32, y: f32, k: f32) -> (f32, f32, f32) {
    let k = unit(k);
    (
        (1.0 - unit(c)) * (1.0 - k),
        (1.0 - unit(m)) * (1.0 - k),
        (1.0 - unit(y)) * (1.0 - k),
    )
}

fn unit(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}
