//! Synthetic PDFs shared by the unit and integration tests

use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, Stream};

fn page_content(label: u32) -> Vec<u8> {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
            ),
            Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    format!("Page {}", label).into_bytes(),
                    lopdf::StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ],
    };
    content.encode().unwrap()
}

/// Create a simple PDF with N pages, page k showing the text "Page k"
pub(crate) fn create_test_pdf(num_pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();

    for i in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), page_content(i + 1)));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Create a 4-page PDF whose pages sit under two intermediate `Pages` nodes.
///
/// MediaBox and Resources live on the root node, Rotate on the second
/// intermediate node, so pages 3 and 4 are landscape through inheritance.
pub(crate) fn create_nested_test_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let root_id = doc.new_object_id();
    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));

    let mut branches = Vec::new();
    for branch in 0..2u32 {
        let branch_id = doc.new_object_id();
        let mut kids = Vec::new();
        for i in 0..2u32 {
            let label = branch * 2 + i + 1;
            let content_id = doc.add_object(Stream::new(Dictionary::new(), page_content(label)));
            let page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(branch_id)),
                ("Contents", Object::Reference(content_id)),
            ]);
            kids.push(Object::Reference(doc.add_object(page)));
        }

        let mut node = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Parent", Object::Reference(root_id)),
            ("Count", Object::Integer(2)),
            ("Kids", Object::Array(kids)),
        ]);
        if branch == 1 {
            node.set("Rotate", Object::Integer(90));
        }
        doc.objects.insert(branch_id, Object::Dictionary(node));
        branches.push(Object::Reference(branch_id));
    }

    let resources = Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![(
            "F1",
            Object::Reference(font_id),
        )])),
    )]);
    let root = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(4)),
        ("Kids", Object::Array(branches)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
    ]);
    doc.objects.insert(root_id, Object::Dictionary(root));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(root_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// A 5-page PDF with references to page 5 from outside the page tree: an
/// outline entry in the catalog and a link annotation on page 1
pub(crate) fn create_outlined_test_pdf() -> Vec<u8> {
    let mut doc = Document::load_mem(&create_test_pdf(5)).unwrap();
    let pages = doc.get_pages();
    let (first, last) = (pages[&1], pages[&5]);
    let dest = Object::Array(vec![Object::Reference(last), Object::Name(b"Fit".to_vec())]);

    let outlines_id = doc.new_object_id();
    let item_id = doc.add_object(Dictionary::from_iter(vec![
        ("Title", Object::string_literal("Last page")),
        ("Parent", Object::Reference(outlines_id)),
        ("Dest", dest.clone()),
    ]));
    let outlines = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Outlines".to_vec())),
        ("First", Object::Reference(item_id)),
        ("Last", Object::Reference(item_id)),
        ("Count", Object::Integer(1)),
    ]);
    doc.objects.insert(outlines_id, Object::Dictionary(outlines));

    let link_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Annot".to_vec())),
        ("Subtype", Object::Name(b"Link".to_vec())),
        (
            "Rect",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(50),
                Object::Integer(50),
            ]),
        ),
        ("Dest", dest),
    ]));
    doc.get_object_mut(first)
        .and_then(Object::as_dict_mut)
        .unwrap()
        .set("Annots", Object::Array(vec![Object::Reference(link_id)]));

    let root_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .unwrap();
    doc.get_object_mut(root_id)
        .and_then(Object::as_dict_mut)
        .unwrap()
        .set("Outlines", Object::Reference(outlines_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Copy of `bytes` where page `page` (1-based) names itself as its parent
pub(crate) fn with_parent_cycle(bytes: &[u8], page: u32) -> Vec<u8> {
    let mut doc = Document::load_mem(bytes).unwrap();
    let page_id = doc.get_pages()[&page];
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .unwrap()
        .set("Parent", Object::Reference(page_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Read back the "Page k" label of every page, in page order
pub(crate) fn page_labels(bytes: &[u8]) -> Vec<u32> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc.get_page_content(page_id).unwrap();
            let text = String::from_utf8_lossy(&content);
            let start = text.find("(Page ").expect("page label") + "(Page ".len();
            let end = start + text[start..].find(')').expect("closing paren");
            text[start..end].parse().unwrap()
        })
        .collect()
}
