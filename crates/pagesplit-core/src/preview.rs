//! Page previews
//!
//! Rendering page content is left to an external [`ThumbnailRenderer`].
//! Previews are display-only: a page whose preview fails gets a
//! placeholder and never holds up planning or assembly.

use crate::page_info::PageInfo;
use crate::source::SourceDocument;
use serde::Serialize;

/// Longest side of a generated placeholder, in pixels
const PLACEHOLDER_EDGE: u32 = 128;

/// Produces a raster preview (PNG bytes) for one page
pub trait ThumbnailRenderer {
    fn render_page(&self, source: &SourceDocument, index: usize) -> Result<Vec<u8>, String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PagePreview {
    Ready { index: usize, png: Vec<u8> },
    /// Shown as "preview unavailable"
    Unavailable { index: usize, reason: String },
}

impl PagePreview {
    pub fn index(&self) -> usize {
        match self {
            PagePreview::Ready { index, .. } | PagePreview::Unavailable { index, .. } => *index,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, PagePreview::Ready { .. })
    }
}

/// One preview per source page, in page order
pub fn collect_previews(
    renderer: &dyn ThumbnailRenderer,
    source: &SourceDocument,
) -> Vec<PagePreview> {
    (0..source.page_count())
        .map(|index| match renderer.render_page(source, index) {
            Ok(png) => PagePreview::Ready { index, png },
            Err(reason) => {
                tracing::warn!(page = index + 1, %reason, "preview unavailable");
                PagePreview::Unavailable { index, reason }
            }
        })
        .collect()
}

/// Renders a blank white page with the page's displayed proportions.
///
/// Stands in for a real rasterizer where only layout matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlankPageRenderer;

impl ThumbnailRenderer for BlankPageRenderer {
    fn render_page(&self, source: &SourceDocument, index: usize) -> Result<Vec<u8>, String> {
        let info = PageInfo::from_source(source, index).map_err(|e| e.to_string())?;
        let (width, height) = if info.rotation == 90 || info.rotation == 270 {
            (info.height, info.width)
        } else {
            (info.width, info.height)
        };
        if width <= 0.0 || height <= 0.0 {
            return Err(format!("page {} has an empty MediaBox", index + 1));
        }

        let scale = PLACEHOLDER_EDGE as f32 / width.max(height);
        let px_width = ((width * scale).round() as u32).max(1);
        let px_height = ((height * scale).round() as u32).max(1);
        encode_blank_png(px_width, px_height)
    }
}

fn encode_blank_png(width: u32, height: u32) -> Result<Vec<u8>, String> {
    let pixels = vec![0xFFu8; (width * height) as usize];
    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, width, height);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(|e| e.to_string())?;
        writer.write_image_data(&pixels).map_err(|e| e.to_string())?;
    }
    Ok(buffer)
}
