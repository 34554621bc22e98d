use crate::error::ComposerError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use signet_types::{Rect, Size};

/// A page's MediaBox in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    /// Lower-left x.
    pub llx: f32,
    /// Lower-left y.
    pub lly: f32,
    pub width: f32,
    pub height: f32,
}

impl PageBox {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The page area in top-left page coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }

    /// Maps a top-left page rectangle to its PDF lower-left corner.
    pub fn to_pdf_origin(&self, rect: &Rect) -> (f32, f32) {
        (
            self.llx + rect.x,
            self.lly + self.height - rect.y - rect.height,
        )
    }
}

/// Page object ids in document order.
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    // `get_pages` is keyed by 1-based page number, so iteration is ordered.
    doc.get_pages().into_values().collect()
}

/// Resolves the page's MediaBox, following the page tree for inherited values.
///
/// Pages without any MediaBox fall back to US Letter.
pub fn page_box(doc: &Document, page_id: ObjectId) -> Result<PageBox, ComposerError> {
    let media_box = inherited(doc, page_id, b"MediaBox")?;
    if let Some(page_box) = media_box.and_then(|obj| parse_box(doc, obj)) {
        return Ok(page_box);
    }
    log::warn!("Page {:?} has no usable MediaBox, assuming US Letter", page_id);
    let letter = Size::letter();
    Ok(PageBox {
        llx: 0.0,
        lly: 0.0,
        width: letter.width,
        height: letter.height,
    })
}

/// A copy of the resources visible to a page, whether they are set directly,
/// shared by reference or inherited from an ancestor `Pages` node.
pub fn effective_resources(
    doc: &Document,
    page_id: ObjectId,
) -> Result<Dictionary, ComposerError> {
    match inherited(doc, page_id, b"Resources")? {
        Some(obj) => Ok(resolve(doc, obj)?.as_dict()?.clone()),
        None => Ok(Dictionary::new()),
    }
}

pub fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, lopdf::Error> {
    match obj {
        Object::Reference(id) => doc.get_object(*id),
        other => Ok(other),
    }
}

/// Looks up an inheritable page attribute on the page or its ancestors.
fn inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, ComposerError> {
    let mut current = Some(page_id);
    // Guards against a cyclic Parent chain in damaged files.
    let mut depth = 0;
    while let Some(id) = current {
        let dict = doc.get_object(id)?.as_dict()?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        depth += 1;
        if depth > 64 {
            return Err(ComposerError::Other(format!(
                "Page tree above {:?} is too deep or cyclic",
                page_id
            )));
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    Ok(None)
}

fn parse_box(doc: &Document, obj: &Object) -> Option<PageBox> {
    let arr = resolve(doc, obj).ok()?.as_array().ok()?;
    let [a, b, c, d] = arr.as_slice() else {
        return None;
    };
    let (x0, y0, x1, y1) = (number(doc, a)?, number(doc, b)?, number(doc, c)?, number(doc, d)?);
    let page_box = PageBox {
        llx: x0.min(x1),
        lly: y0.min(y1),
        width: (x1 - x0).abs(),
        height: (y1 - y0).abs(),
    };
    (page_box.width > 0.0 && page_box.height > 0.0).then_some(page_box)
}

/// Reads an integer or real, following a reference.
pub fn number(doc: &Document, obj: &Object) -> Option<f32> {
    match resolve(doc, obj).ok()? {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(f) => Some(*f),
        _ => None,
    }
}
