//! Multi-file merge
//!
//! Combines several PDFs into a single document, pages in input order.

use crate::assemble::flattened_page;
use crate::error::PageSplitError;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Merge multiple PDFs into one
///
/// The algorithm:
/// 1. If empty, return error
/// 2. If single document, return it as-is
/// 3. Use the first document as the destination
/// 4. For each further document:
///    a. Offset its object ids past the destination's highest id
///    b. Import all objects with remapped references
///    c. Append its pages to the destination page list
/// 5. Hang every page directly under the destination root `Pages` node,
///    prune the old page trees, compress and serialize
pub fn merge_documents(documents: Vec<Vec<u8>>) -> Result<Vec<u8>, PageSplitError> {
    if documents.is_empty() {
        return Err(PageSplitError::invalid_plan("No documents to merge."));
    }

    if documents.len() == 1 {
        return Ok(documents.into_iter().next().unwrap_or_default());
    }

    let mut loaded_docs = Vec::with_capacity(documents.len());
    for (i, doc_bytes) in documents.iter().enumerate() {
        let doc = Document::load_mem(doc_bytes).map_err(|e| {
            PageSplitError::Load(format!("document {}: {}", i + 1, e))
        })?;
        loaded_docs.push(doc);
    }

    let mut dest = loaded_docs.remove(0);
    let mut dest_max_id = dest.max_id;

    // Pages are flattened while each source still has its own page tree
    let mut dest_pages = flattened_pages(&dest)?;

    for source in loaded_docs {
        let id_offset = dest_max_id;
        let source_pages = flattened_pages(&source)?;

        for (old_id, object) in source.objects.into_iter() {
            let new_id = (old_id.0 + id_offset, old_id.1);
            dest.objects.insert(new_id, remap_object_refs(object, id_offset));
        }

        for (old_id, page) in source_pages {
            dest_pages.push(((old_id.0 + id_offset, old_id.1), remap_dict(page, id_offset)));
        }

        dest_max_id = (source.max_id + id_offset).max(dest_max_id);
    }

    dest.max_id = dest_max_id;
    let page_count = dest_pages.len();
    update_page_tree(&mut dest, dest_pages)?;

    dest.prune_objects();
    dest.compress();

    let mut buffer = Vec::new();
    dest.save_to(&mut buffer).map_err(|e| PageSplitError::Assembly {
        group: "merged".to_string(),
        reason: format!("Failed to save merged PDF: {}", e),
    })?;

    tracing::info!(
        documents = documents.len(),
        pages = page_count,
        bytes = buffer.len(),
        "merged documents"
    );

    Ok(buffer)
}

/// Every page of a document, in order, with inherited attributes filled in
fn flattened_pages(doc: &Document) -> Result<Vec<(ObjectId, Dictionary)>, PageSplitError> {
    doc.get_pages()
        .into_values()
        .enumerate()
        .map(|(index, page_id)| Ok((page_id, flattened_page(doc, page_id, index)?)))
        .collect()
}

/// Recursively remap object references in an object
fn remap_object_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect(),
        ),
        Object::Dictionary(dict) => Object::Dictionary(remap_dict(dict, offset)),
        Object::Stream(mut stream) => {
            stream.dict = remap_dict(stream.dict, offset);
            Object::Stream(stream)
        }
        other => other,
    }
}

fn remap_dict(mut dict: Dictionary, offset: u32) -> Dictionary {
    for (_, value) in dict.iter_mut() {
        *value = remap_object_refs(std::mem::replace(value, Object::Null), offset);
    }
    dict
}

/// Point the destination root `Pages` node at the merged page list
fn update_page_tree(
    doc: &mut Document,
    pages: Vec<(ObjectId, Dictionary)>,
) -> Result<(), PageSplitError> {
    let merge_error = |reason: &str| PageSplitError::Assembly {
        group: "merged".to_string(),
        reason: reason.to_string(),
    };

    let pages_id = doc
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|_| merge_error("No Pages in catalog"))?;

    let mut kids = Vec::with_capacity(pages.len());
    for (page_id, mut page) in pages {
        page.set("Parent", Object::Reference(pages_id));
        doc.objects.insert(page_id, Object::Dictionary(page));
        kids.push(Object::Reference(page_id));
    }

    match doc.objects.get_mut(&pages_id) {
        Some(Object::Dictionary(pages_dict)) => {
            pages_dict.set("Count", Object::Integer(kids.len() as i64));
            pages_dict.set("Kids", Object::Array(kids));
            Ok(())
        }
        _ => Err(merge_error("Invalid pages dictionary")),
    }
}
