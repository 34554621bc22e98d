use crate::error::ComposerError;
use crate::page::resolve;
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

/// Adds a new content stream to an existing page, overlaying it on top.
///
/// The page's content becomes an array of content streams with the new one
/// last, so it is painted after everything already on the page. Pages
/// without a `/Contents` entry get the overlay as their only stream.
///
/// # Arguments
/// * `doc` - The document containing the page to modify.
/// * `page_id` - The `ObjectId` of the page to add the overlay to.
/// * `content_stream` - The raw bytes of the new content stream.
pub fn overlay_content(
    doc: &mut Document,
    page_id: ObjectId,
    content_stream: Vec<u8>,
) -> Result<(), ComposerError> {
    let stream = Stream::new(dictionary! {}, content_stream);
    let new_content_id = doc.add_object(Object::Stream(stream));

    let mut contents = existing_contents(doc, page_id)?;
    contents.push(Object::Reference(new_content_id));

    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page_dict.set("Contents", Object::Array(contents));
    Ok(())
}

/// Brackets the page's current content in a `q` ... `Q` pair.
///
/// Content that leaves the graphics state altered (an unbalanced `cm`, a
/// clip, a color) would otherwise leak into anything appended later.
/// Returns `false` for pages with no content and for pages whose original
/// streams are already bracketed, which need no further isolation.
pub fn isolate_content(doc: &mut Document, page_id: ObjectId) -> Result<bool, ComposerError> {
    let existing = existing_contents(doc, page_id)?;
    if existing.is_empty() || is_isolated(doc, &existing) {
        return Ok(false);
    }

    let save_id = doc.add_object(Stream::new(dictionary! {}, SAVE.to_vec()));
    let restore_id = doc.add_object(Stream::new(dictionary! {}, RESTORE.to_vec()));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(save_id));
    contents.extend(existing);
    contents.push(Object::Reference(restore_id));

    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page_dict.set("Contents", Object::Array(contents));
    Ok(true)
}

const SAVE: &[u8] = b"q\n";
const RESTORE: &[u8] = b"\nQ\n";

/// Whether the streams open with the save bracket and close it later on.
fn is_isolated(doc: &Document, contents: &[Object]) -> bool {
    let content_is = |obj: &Object, bytes: &[u8]| {
        resolve(doc, obj)
            .and_then(Object::as_stream)
            .is_ok_and(|stream| stream.content == bytes)
    };
    match contents.split_first() {
        Some((first, rest)) => {
            content_is(first, SAVE) && rest.iter().any(|obj| content_is(obj, RESTORE))
        }
        None => false,
    }
}

/// The page's content stream references, flattening an indirect array.
fn existing_contents(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>, ComposerError> {
    let page_dict = doc.get_object(page_id)?.as_dict()?;
    let Ok(contents_obj) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match contents_obj {
        Object::Array(arr) => Ok(arr.clone()),
        Object::Reference(id) => match resolve(doc, contents_obj)? {
            Object::Array(arr) => Ok(arr.clone()),
            Object::Stream(_) => Ok(vec![Object::Reference(*id)]),
            other => Err(ComposerError::Other(format!(
                "Page {:?} /Contents points to a {} instead of a stream",
                page_id,
                object_kind(other)
            ))),
        },
        other => Err(ComposerError::Other(format!(
            "Page {:?} has an invalid /Contents entry ({})",
            page_id,
            object_kind(other)
        ))),
    }
}

fn object_kind(obj: &Object) -> &'static str {
    match obj {
        Object::Null => "null",
        Object::Boolean(_) => "boolean",
        Object::Integer(_) | Object::Real(_) => "number",
        Object::Name(_) => "name",
        Object::String(..) => "string",
        Object::Array(_) => "array",
        Object::Dictionary(_) => "dictionary",
        Object::Stream(_) => "stream",
        Object::Reference(_) => "reference",
        #[allow(unreachable_patterns)]
        _ => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::page_ids;
    use crate::test_utils::letter_document;
    use lopdf::StringFormat;
    use lopdf::content::{Content, Operation};

    fn text_overlay(text: &str) -> Vec<u8> {
        Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![100.into(), 100.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(text.as_bytes().to_vec(), StringFormat::Literal)],
                ),
                Operation::new("ET", vec![]),
            ],
        }
        .encode()
        .unwrap()
    }

    #[test]
    fn overlay_is_painted_after_original() {
        let mut doc = letter_document(1, "Original Content");
        let page_id = page_ids(&doc)[0];

        overlay_content(&mut doc, page_id, text_overlay("Overlay Content")).unwrap();

        // Check that the page now has two content streams
        let page_dict = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let contents_array = page_dict.get(b"Contents").unwrap().as_array().unwrap();
        assert_eq!(contents_array.len(), 2);

        // Check that the full page content contains both strings, in paint order
        let full_content = doc.get_page_content(page_id).unwrap();
        let content_str = String::from_utf8_lossy(&full_content);
        let original = content_str.find("Original Content").unwrap();
        let overlay = content_str.find("Overlay Content").unwrap();
        assert!(original < overlay);
    }

    #[test]
    fn overlay_on_page_without_contents() {
        let mut doc = letter_document(1, "Page");
        let page_id = page_ids(&doc)[0];
        doc.get_object_mut(page_id).unwrap().as_dict_mut().unwrap().remove(b"Contents");

        assert!(!isolate_content(&mut doc, page_id).unwrap());
        overlay_content(&mut doc, page_id, text_overlay("Only")).unwrap();

        let page_dict = doc.get_object(page_id).unwrap().as_dict().unwrap();
        assert_eq!(page_dict.get(b"Contents").unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn isolation_wraps_original_streams() {
        let mut doc = letter_document(1, "Original");
        let page_id = page_ids(&doc)[0];

        assert!(isolate_content(&mut doc, page_id).unwrap());

        let page_dict = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let contents = page_dict.get(b"Contents").unwrap().as_array().unwrap();
        assert_eq!(contents.len(), 3);

        let first = doc.get_object(contents[0].as_reference().unwrap()).unwrap();
        let last = doc.get_object(contents[2].as_reference().unwrap()).unwrap();
        assert_eq!(first.as_stream().unwrap().content, b"q\n");
        assert_eq!(last.as_stream().unwrap().content, b"\nQ\n");
    }

    #[test]
    fn repeated_isolation_does_not_nest() {
        let mut doc = letter_document(1, "Original");
        let page_id = page_ids(&doc)[0];

        assert!(isolate_content(&mut doc, page_id).unwrap());
        overlay_content(&mut doc, page_id, text_overlay("First")).unwrap();
        assert!(!isolate_content(&mut doc, page_id).unwrap());
        overlay_content(&mut doc, page_id, text_overlay("Second")).unwrap();

        let page_dict = doc.get_object(page_id).unwrap().as_dict().unwrap();
        assert_eq!(page_dict.get(b"Contents").unwrap().as_array().unwrap().len(), 5);

        let content = doc.get_page_content(page_id).unwrap();
        let saves = Content::decode(&content)
            .unwrap()
            .operations
            .iter()
            .filter(|op| op.operator == "q")
            .count();
        assert_eq!(saves, 1);
    }

    #[test]
    fn indirect_contents_array_is_flattened() {
        let mut doc = letter_document(1, "Original");
        let page_id = page_ids(&doc)[0];
        let stream_ref = doc
            .get_object(page_id)
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"Contents")
            .unwrap()
            .clone();
        let array_id = doc.add_object(Object::Array(vec![stream_ref]));
        doc.get_object_mut(page_id)
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .set("Contents", Object::Reference(array_id));

        overlay_content(&mut doc, page_id, text_overlay("Top")).unwrap();

        let page_dict = doc.get_object(page_id).unwrap().as_dict().unwrap();
        assert_eq!(page_dict.get(b"Contents").unwrap().as_array().unwrap().len(), 2);
    }
}
