//! Stream filter decoding.

use crate::error::RenderError;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use signet_pdf_composer::resolve;

/// Filters lopdf can undo, with their abbreviated inline-image names.
const GENERIC_FILTERS: [(&str, &str); 3] = [
    ("FlateDecode", "Fl"),
    ("LZWDecode", "LZW"),
    ("ASCII85Decode", "A85"),
];

/// Stream data after every generic filter has been undone.
pub(crate) enum Decoded {
    /// Raw samples or content bytes.
    Raw(Vec<u8>),
    /// A baseline or progressive JPEG left for an image decoder.
    Jpeg(Vec<u8>),
}

/// Undoes the filters of a stream.
///
/// Generic filters (predictors included) are handed to lopdf. `DCTDecode`
/// may appear last in the chain, in which case the JPEG bytes are returned
/// still encoded.
pub(crate) fn decode(doc: &Document, stream: &Stream) -> Result<Decoded, RenderError> {
    let mut filters = filter_names(doc, stream)?;
    let jpeg = filters
        .last()
        .is_some_and(|last| last == "DCTDecode" || last == "DCT");
    if jpeg {
        filters.pop();
    }

    let data = undo_filters(doc, stream, &filters)?;
    Ok(if jpeg {
        Decoded::Jpeg(data)
    } else {
        Decoded::Raw(data)
    })
}

/// Decodes a stream that must not hold an encoded image.
pub(crate) fn decode_raw(doc: &Document, stream: &Stream) -> Result<Vec<u8>, RenderError> {
    match decode(doc, stream)? {
        Decoded::Raw(data) => Ok(data),
        Decoded::Jpeg(_) => Err(RenderError::UnsupportedFilter("DCTDecode".to_string())),
    }
}

/// The page's content streams, decoded and joined in paint order.
pub(crate) fn page_content(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>, RenderError> {
    let mut content = Vec::new();
    for id in doc.get_page_contents(page_id) {
        let stream = doc.get_object(id)?.as_stream()?;
        content.extend(decode_raw(doc, stream)?);
        // Streams may split anywhere between tokens.
        content.push(b'\n');
    }
    Ok(content)
}

fn undo_filters(doc: &Document, stream: &Stream, filters: &[String]) -> Result<Vec<u8>, RenderError> {
    if filters.is_empty() {
        return Ok(stream.content.clone());
    }
    if let Some(other) = filters.iter().find(|f| !is_generic(f)) {
        return Err(RenderError::UnsupportedFilter(other.clone()));
    }

    // lopdf wants direct filter names and a single parameter dictionary.
    let mut dict = stream.dict.clone();
    dict.set(
        "Filter",
        filters
            .iter()
            .map(|f| Object::Name(f.clone().into_bytes()))
            .collect::<Vec<Object>>(),
    );
    match decode_parms(doc, stream) {
        Some(parms) => dict.set("DecodeParms", parms),
        None => {
            dict.remove(b"DecodeParms");
        }
    }
    Ok(Stream::new(dict, stream.content.clone()).decompressed_content()?)
}

fn is_generic(filter: &str) -> bool {
    GENERIC_FILTERS.iter().any(|(name, _)| *name == filter)
}

/// Filter names in decoding order, abbreviations expanded.
fn filter_names(doc: &Document, stream: &Stream) -> Result<Vec<String>, RenderError> {
    let Ok(filter) = stream.dict.get(b"Filter") else {
        return Ok(Vec::new());
    };
    let name = |obj: &Object| -> Result<String, RenderError> {
        let name = String::from_utf8_lossy(resolve(doc, obj)?.as_name()?).into_owned();
        Ok(GENERIC_FILTERS
            .iter()
            .find(|(_, short)| *short == name)
            .map_or(name, |(full, _)| full.to_string()))
    };
    match resolve(doc, filter)? {
        Object::Array(items) => items.iter().map(name).collect(),
        other => Ok(vec![name(other)?]),
    }
}

/// The first parameter dictionary of the chain, resolved.
fn decode_parms(doc: &Document, stream: &Stream) -> Option<Dictionary> {
    let parms = stream.dict.get(b"DecodeParms").ok()?;
    match resolve(doc, parms).ok()? {
        Object::Dictionary(dict) => Some(dict.clone()),
        Object::Array(items) => items
            .iter()
            .filter_map(|p| resolve(doc, p).ok())
            .find_map(|p| p.as_dict().ok().cloned()),
        _ => None,
    }
}
