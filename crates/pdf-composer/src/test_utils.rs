use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

const LETTER: [i64; 4] = [0, 0, 612, 792];

/// Content of one fixture page: a mid-gray box at (300, 300)-(400, 350) in
/// PDF space and the line "`label` `number`" set in F1.
fn page_content(label: &str, number: usize) -> Vec<u8> {
    let text = format!("{} {}", label, number).into_bytes();
    Content {
        operations: vec![
            Operation::new("rg", vec![0.5.into(), 0.5.into(), 0.5.into()]),
            Operation::new("re", vec![300.into(), 300.into(), 100.into(), 50.into()]),
            Operation::new("f", vec![]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![100.into(), 700.into()]),
            Operation::new("Tj", vec![Object::String(text, StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ],
    }
    .encode()
    .unwrap()
}

/// A Letter-sized document of `num_pages` labelled pages.
///
/// Every page points at the same indirect resources dictionary, so a stamp
/// that wrote into shared resources would show up on all pages.
pub fn letter_document(num_pages: usize, label: &str) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! { "Font" => dictionary! { "F1" => font_id } });

    let kids: Vec<Object> = (1..=num_pages)
        .map(|number| {
            let contents = doc.add_object(Stream::new(dictionary! {}, page_content(label, number)));
            let page: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => LETTER.iter().map(|&v| v.into()).collect::<Vec<Object>>(),
                "Contents" => contents,
                "Resources" => resources_id,
            });
            page.into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! { "Type" => "Pages", "Kids" => kids, "Count" => num_pages as i64 }.into(),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);
    doc
}
