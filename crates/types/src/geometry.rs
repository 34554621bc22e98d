use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An axis-aligned rectangle in page space.
///
/// The origin is the top-left corner of the page, `y` grows downward and the
/// unit is the PDF point (1/72 inch). At 72 dpi a page preview has the same
/// pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// The placement used when the caller does not pick one: `(50, 50)` to `(250, 150)`.
    pub const DEFAULT_SIGNATURE: Rect = Rect {
        x: 50.0,
        y: 50.0,
        width: 200.0,
        height: 100.0,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when every component is finite and both extents are positive.
    pub fn has_area(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right > x && bottom > y).then(|| Rect::new(x, y, right - x, bottom - y))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseRectError {
    #[error("expected four comma-separated numbers `x,y,width,height`, got {0} parts")]
    WrongArity(usize),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

impl FromStr for Rect {
    type Err = ParseRectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ParseRectError::WrongArity(parts.len()));
        }
        let mut values = [0.0f32; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| ParseRectError::InvalidNumber(part.to_string()))?;
        }
        let [x, y, width, height] = values;
        Ok(Rect::new(x, y, width, height))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    /// US Letter in points.
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_rect() {
        let rect: Rect = "50, 50,100,100".parse().unwrap();
        assert_eq!(rect, Rect::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(rect.to_string().parse::<Rect>().unwrap(), rect);
    }

    #[test]
    fn rejects_malformed_rect() {
        assert_eq!("1,2,3".parse::<Rect>(), Err(ParseRectError::WrongArity(3)));
        assert_eq!(
            "1,2,x,4".parse::<Rect>(),
            Err(ParseRectError::InvalidNumber("x".into()))
        );
    }

    #[test]
    fn area_requires_positive_finite_extent() {
        assert!(Rect::DEFAULT_SIGNATURE.has_area());
        assert!(!Rect::new(0.0, 0.0, 0.0, 10.0).has_area());
        assert!(!Rect::new(0.0, 0.0, 10.0, -1.0).has_area());
        assert!(!Rect::new(f32::NAN, 0.0, 10.0, 10.0).has_area());
    }

    #[test]
    fn intersection_clips_to_overlap() {
        let page = Rect::from_size(Size::letter());
        let overhang = Rect::new(500.0, 700.0, 200.0, 200.0);
        assert!(!page.contains(&overhang));
        assert_eq!(
            page.intersection(&overhang),
            Some(Rect::new(500.0, 700.0, 112.0, 92.0))
        );
        assert_eq!(page.intersection(&Rect::new(700.0, 0.0, 10.0, 10.0)), None);
        assert!(page.contains(&Rect::DEFAULT_SIGNATURE));
    }
}
