//! The drawing surface a signature is captured on.
//!
//! UI toolkits deliver pointer input through callbacks. Here the same input
//! is an explicit sequence of [`InputEvent`]s, so a surface can be driven by
//! a browser, a desktop shell or a test without any live widget.

use crate::error::CaptureError;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use signet_types::Color;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Pen settings applied to strokes started after they change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub color: Color,
    pub width: f32,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 2.0,
        }
    }
}

/// One input action on the surface. Coordinates are surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PenDown { x: f32, y: f32 },
    PenMove { x: f32, y: f32 },
    PenUp,
    Clear,
    SetPenColor { color: Color },
    SetPenWidth { width: f32 },
    SetBackground { color: Color },
}

#[derive(Debug, Clone)]
struct StrokePath {
    pen: Pen,
    points: Vec<(f32, f32)>,
}

/// A fixed-size canvas that accumulates strokes.
#[derive(Debug, Clone)]
pub struct DrawingSurface {
    width: u32,
    height: u32,
    background: Color,
    pen: Pen,
    strokes: Vec<StrokePath>,
    drawing: bool,
}

impl DrawingSurface {
    /// Size of the signature pad in the desktop shell.
    pub const DEFAULT_WIDTH: u32 = 600;
    pub const DEFAULT_HEIGHT: u32 = 200;

    pub fn new(width: u32, height: u32) -> Result<Self, CaptureError> {
        if width == 0 || height == 0 {
            return Err(CaptureError::EmptySurface { width, height });
        }
        Ok(Self {
            width,
            height,
            background: Color::WHITE,
            pen: Pen::default(),
            strokes: Vec::new(),
            drawing: false,
        })
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_pen(mut self, pen: Pen) -> Self {
        self.pen = pen;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// True while no stroke has been drawn since creation or the last clear.
    pub fn is_blank(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::PenDown { x, y } => {
                self.strokes.push(StrokePath {
                    pen: self.pen,
                    points: vec![(x, y)],
                });
                self.drawing = true;
            }
            InputEvent::PenMove { x, y } => {
                // Motion without a pressed button draws nothing.
                if !self.drawing {
                    return;
                }
                if let Some(stroke) = self.strokes.last_mut() {
                    stroke.points.push((x, y));
                }
            }
            InputEvent::PenUp => self.drawing = false,
            InputEvent::Clear => {
                self.strokes.clear();
                self.drawing = false;
            }
            InputEvent::SetPenColor { color } => self.pen.color = color,
            InputEvent::SetPenWidth { width } => {
                if width.is_finite() && width > 0.0 {
                    self.pen.width = width;
                } else {
                    log::warn!("Ignoring invalid pen width {}", width);
                }
            }
            InputEvent::SetBackground { color } => self.background = color,
        }
    }

    pub fn apply_all<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = InputEvent>,
    {
        for event in events {
            self.apply(event);
        }
    }

    /// Rasterizes the background and every stroke into straight-alpha RGBA.
    pub fn snapshot(&self) -> RgbaImage {
        let Some(mut pixmap) = Pixmap::new(self.width, self.height) else {
            // Unreachable: `new` rejects zero-sized surfaces.
            return RgbaImage::new(self.width, self.height);
        };
        let [r, g, b, a] = self.background.to_rgba8();
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));

        for stroke in &self.strokes {
            draw_stroke(&mut pixmap, stroke);
        }

        pixmap_to_rgba(&pixmap)
    }
}

fn draw_stroke(pixmap: &mut Pixmap, stroke: &StrokePath) {
    let mut paint = Paint::default();
    let [r, g, b, a] = stroke.pen.color.to_rgba8();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    // A click without motion leaves a round dot the size of the pen.
    if let [(x, y)] = stroke.points.as_slice() {
        if let Some(dot) = PathBuilder::from_circle(*x, *y, stroke.pen.width / 2.0) {
            pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
        }
        return;
    }

    let mut builder = PathBuilder::new();
    for (i, (x, y)) in stroke.points.iter().enumerate() {
        if i == 0 {
            builder.move_to(*x, *y);
        } else {
            builder.line_to(*x, *y);
        }
    }
    let Some(path) = builder.finish() else {
        return;
    };
    let style = Stroke {
        width: stroke.pen.width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &style, Transform::identity(), None);
}

fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}
