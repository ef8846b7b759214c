//! Page-level information extraction
//!
//! Reads the geometry of individual pages of a source document.

use crate::error::PageSplitError;
use crate::source::SourceDocument;
use lopdf::{Dictionary, Document, Object};
use serde::Serialize;

/// US Letter, used when no MediaBox is found anywhere up the tree
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Information about a single PDF page
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    /// Page number (1-indexed)
    pub page_num: usize,
    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: i32,
    /// Whether the page has a content stream (not blank)
    pub has_content: bool,
    pub orientation: PageOrientation,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub enum PageOrientation {
    Portrait,
    Landscape,
    Square,
}

impl PageInfo {
    /// Extract page info for a 0-based page index
    pub fn from_source(source: &SourceDocument, index: usize) -> Result<Self, PageSplitError> {
        let page_id = source
            .page_id(index)
            .ok_or(PageSplitError::PageNotFound(index + 1))?;

        let doc = source.document();
        let page_dict = doc.get_dictionary(page_id).map_err(|_| {
            PageSplitError::Load(format!("Page {} is not a dictionary", index + 1))
        })?;

        let media_box = match inherited(doc, page_dict, b"MediaBox") {
            Some(obj) => parse_box(obj).map_err(|e| {
                PageSplitError::Load(format!("Page {}: {}", index + 1, e))
            })?,
            None => DEFAULT_MEDIA_BOX,
        };
        let (width, height) = (media_box[2] - media_box[0], media_box[3] - media_box[1]);

        let rotation = inherited(doc, page_dict, b"Rotate")
            .and_then(|obj| obj.as_i64().ok())
            .map(|angle| normalize_rotation(angle as i32))
            .unwrap_or(0);

        let has_content = page_dict.get(b"Contents").is_ok();

        // Orientation as displayed, so a quarter turn swaps the sides
        let (shown_width, shown_height) = if rotation == 90 || rotation == 270 {
            (height, width)
        } else {
            (width, height)
        };

        let orientation = if (shown_width - shown_height).abs() < 1.0 {
            PageOrientation::Square
        } else if shown_width > shown_height {
            PageOrientation::Landscape
        } else {
            PageOrientation::Portrait
        };

        Ok(Self {
            page_num: index + 1,
            width: width as f32,
            height: height as f32,
            rotation,
            has_content,
            orientation,
        })
    }

    /// Page info for every page, in order
    pub fn all_from_source(source: &SourceDocument) -> Vec<Result<Self, PageSplitError>> {
        (0..source.page_count())
            .map(|index| Self::from_source(source, index))
            .collect()
    }
}

/// Look up `key` on the page, then on each ancestor in the page tree
fn inherited<'a>(doc: &'a Document, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut node = page;
    // Bounded walk so a Parent cycle cannot loop forever
    for _ in 0..64 {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
    }
    None
}

/// Parse a box array [x1, y1, x2, y2]
fn parse_box(obj: &Object) -> Result<[f64; 4], String> {
    let array = obj.as_array().map_err(|_| "MediaBox is not an array".to_string())?;
    if array.len() != 4 {
        return Err("MediaBox must have 4 elements".to_string());
    }

    let mut result = [0.0; 4];
    for (i, obj) in array.iter().enumerate() {
        result[i] = match obj {
            Object::Integer(n) => *n as f64,
            Object::Real(n) => *n as f64,
            _ => return Err(format!("MediaBox element {} is not a number", i)),
        };
    }

    Ok(result)
}

/// Normalize rotation to 0, 90, 180, or 270
fn normalize_rotation(angle: i32) -> i32 {
    angle.rem_euclid(360)
}
