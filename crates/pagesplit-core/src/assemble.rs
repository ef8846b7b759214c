//! Document assembly
//!
//! The single primitive every output goes through: copy pages out of a
//! source, strictly in the order given, into a new flat page tree.
//!
//! Algorithm:
//! 1. Start from an empty document with its own catalog and root `Pages`
//! 2. For each requested index, copy the page dictionary with its inherited
//!    attributes pulled down from the old page tree
//! 3. A page requested more than once gets a new object per extra copy,
//!    sharing content streams and resources with the first
//! 4. Copy in whatever the selected pages reference. References to pages or
//!    page tree nodes that were not selected become `null`
//!
//! Document-level data of the source (outlines, named destinations, forms,
//! structure tree) is not carried over.

use crate::error::PageSplitError;
use crate::source::SourceDocument;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Deepest page tree we follow before assuming a Parent cycle
const MAX_TREE_DEPTH: usize = 64;

/// Build a new document from `indices` (0-based) of `source`.
///
/// Duplicate indices produce duplicate physical pages. No partial output is
/// ever returned: any failure discards the document.
pub fn create_document(
    source: &SourceDocument,
    indices: &[usize],
) -> Result<Vec<u8>, PageSplitError> {
    if indices.is_empty() {
        return Err(assembly_error("No pages to copy"));
    }

    let src = source.document();
    let mut selected = HashSet::with_capacity(indices.len());
    for &index in indices {
        let page_id = source.page_id(index).ok_or_else(|| {
            assembly_error(format!(
                "Page {} does not exist (document has {} pages)",
                index + 1,
                source.page_count()
            ))
        })?;
        selected.insert(page_id);
    }
    let tree = page_tree_nodes(src, source.page_ids());

    let mut doc = Document::with_version(src.version.clone());
    // Copied objects keep their source ids, new ones are numbered after them
    doc.max_id = src.max_id;
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(indices.len());
    let mut pending = Vec::new();

    for &index in indices {
        let page_id = source.page_ids()[index];
        let mut page = flattened_page(src, page_id, index)?;
        page.remove(b"Parent");

        let mut page = detach_dict(page, &selected, &tree, &mut pending);
        page.set("Parent", Object::Reference(pages_id));

        let id = if doc.objects.contains_key(&page_id) {
            doc.add_object(page)
        } else {
            doc.objects.insert(page_id, Object::Dictionary(page));
            page_id
        };
        kids.push(Object::Reference(id));
    }

    while let Some(id) = pending.pop() {
        if doc.objects.contains_key(&id) {
            continue;
        }
        let Ok(object) = src.get_object(id) else {
            tracing::debug!(object = ?id, "skipping missing object");
            continue;
        };
        let object = detach(object.clone(), &selected, &tree, &mut pending);
        doc.objects.insert(id, object);
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ])),
    );

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| assembly_error(format!("Save failed: {}", e)))?;

    Ok(buffer)
}

/// Rebuild a document structurally: same pages, same order, fresh page tree
/// and compressed objects. Only the serialized size may change.
pub fn rebuild_document(source: &SourceDocument) -> Result<Vec<u8>, PageSplitError> {
    let identity: Vec<usize> = (0..source.page_count()).collect();
    create_document(source, &identity)
}

fn assembly_error(reason: impl Into<String>) -> PageSplitError {
    PageSplitError::Assembly {
        group: "document".to_string(),
        reason: reason.into(),
    }
}

/// Every page and every `Pages` node above them
fn page_tree_nodes(doc: &Document, page_ids: &[ObjectId]) -> HashSet<ObjectId> {
    let mut nodes: HashSet<ObjectId> = page_ids.iter().copied().collect();
    for &page_id in page_ids {
        let mut current = page_id;
        for _ in 0..MAX_TREE_DEPTH {
            let Ok(parent) = doc
                .get_dictionary(current)
                .and_then(|dict| dict.get(b"Parent"))
                .and_then(Object::as_reference)
            else {
                break;
            };
            // Already seen: its ancestors are covered, or it is a cycle
            if !nodes.insert(parent) {
                break;
            }
            current = parent;
        }
    }
    nodes
}

/// Null out references into the old page tree that are not selected pages,
/// queueing every other reference for copying.
fn detach(
    object: Object,
    selected: &HashSet<ObjectId>,
    tree: &HashSet<ObjectId>,
    pending: &mut Vec<ObjectId>,
) -> Object {
    match object {
        Object::Reference(id) if tree.contains(&id) && !selected.contains(&id) => Object::Null,
        Object::Reference(id) => {
            if !selected.contains(&id) {
                pending.push(id);
            }
            Object::Reference(id)
        }
        Object::Array(items) => Object::Array(
            items
                .into_iter()
                .map(|item| detach(item, selected, tree, pending))
                .collect(),
        ),
        Object::Dictionary(dict) => Object::Dictionary(detach_dict(dict, selected, tree, pending)),
        Object::Stream(mut stream) => {
            stream.dict = detach_dict(stream.dict, selected, tree, pending);
            Object::Stream(stream)
        }
        other => other,
    }
}

fn detach_dict(
    mut dict: Dictionary,
    selected: &HashSet<ObjectId>,
    tree: &HashSet<ObjectId>,
    pending: &mut Vec<ObjectId>,
) -> Dictionary {
    for (_, value) in dict.iter_mut() {
        *value = detach(std::mem::replace(value, Object::Null), selected, tree, pending);
    }
    dict
}

/// Copy a page dictionary, filling in attributes it inherits from its
/// ancestors so it renders the same directly under the root node.
pub(crate) fn flattened_page(
    doc: &Document,
    page_id: ObjectId,
    index: usize,
) -> Result<Dictionary, PageSplitError> {
    let mut page = doc
        .get_dictionary(page_id)
        .map_err(|_| assembly_error(format!("Page {} is not a dictionary", index + 1)))?
        .clone();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            return Err(assembly_error(format!("Page {} has a cyclic page tree", index + 1)));
        }

        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };

        for key in INHERITABLE_KEYS {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key, value.clone());
                }
            }
        }

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    Ok(page)
}
