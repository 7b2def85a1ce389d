//! Sender banner overlay for PDF labels
//!
//! The UPS label template does not reliably print the physical sender, so a
//! black band with the sender's name is stamped across the top of the first
//! page. The banner is rendered as its own single-page document with the
//! base page's geometry and then merged onto the base page.

use bytes::Bytes;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;
use tracing::debug;

use crate::domain::LabelFormat;

/// 4x6 inch thermal label, used when the page declares no MediaBox
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 288.0, 432.0];

const BAND_HEIGHT: f32 = 20.0;
const FONT_SIZE: f32 = 11.0;
const PADDING: f32 = 6.0;
/// Average Helvetica-Bold advance width, in ems, for mostly upper-case text
const AVG_GLYPH_WIDTH: f32 = 0.62;
const FONT_RESOURCE: &str = "PrlBanner";
/// Depth limit when walking up the page tree for inherited attributes
const MAX_TREE_DEPTH: usize = 32;

/// Overlay rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Label PDF has no pages")]
    EmptyDocument,
    #[error("Failed to serialize label PDF: {0}")]
    Save(String),
    #[error("Label rendering task failed: {0}")]
    Task(String),
}

/// Geometry of a PDF page as needed for placing the banner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Visible area `[llx, lly, urx, ury]` in user space: the CropBox
    /// clipped to the MediaBox, or the MediaBox alone
    pub view_box: [f32; 4],
    /// Clockwise display rotation: 0, 90, 180 or 270
    pub rotation: i64,
}

impl PageGeometry {
    fn width(&self) -> f32 {
        self.view_box[2] - self.view_box[0]
    }

    fn height(&self) -> f32 {
        self.view_box[3] - self.view_box[1]
    }

    /// Width and height of the page as a viewer shows it
    pub fn display_size(&self) -> (f32, f32) {
        match self.rotation {
            90 | 270 => (self.height(), self.width()),
            _ => (self.width(), self.height()),
        }
    }

    /// `cm` matrix taking display coordinates (origin bottom-left of the page
    /// as shown) to user space
    pub fn display_to_user(&self) -> [f32; 6] {
        let [llx, lly, _, _] = self.view_box;
        let (w, h) = (self.width(), self.height());
        match self.rotation {
            90 => [0.0, 1.0, -1.0, 0.0, llx + w, lly],
            180 => [-1.0, 0.0, 0.0, -1.0, llx + w, lly + h],
            270 => [0.0, -1.0, 1.0, 0.0, llx, lly + h],
            _ => [1.0, 0.0, 0.0, 1.0, llx, lly],
        }
    }
}

/// Stamp `banner` onto the first page of a PDF label
///
/// GIF labels are returned untouched. For PDFs only the annotated first page
/// is kept. Every failure is reported; the unannotated label is never
/// returned in its place.
pub fn annotate(label: Bytes, format: LabelFormat, banner: &str) -> Result<Bytes, RenderError> {
    if format != LabelFormat::Pdf {
        return Ok(label);
    }

    let mut base = Document::load_mem(&label)?;
    let pages = base.get_pages();
    let (&first_number, &first_page) = pages.iter().next().ok_or(RenderError::EmptyDocument)?;

    let geometry = page_geometry(&base, first_page)?;
    let overlay = render_overlay(&geometry, banner)?;
    merge_onto_page(&mut base, first_page, &overlay)?;

    let extra: Vec<u32> = pages.keys().copied().filter(|n| *n != first_number).collect();
    if !extra.is_empty() {
        base.delete_pages(&extra);
    }
    base.prune_objects();

    let mut out = Vec::with_capacity(label.len() + 1024);
    base.save_to(&mut out)
        .map_err(|e| RenderError::Save(e.to_string()))?;

    debug!(
        rotation = geometry.rotation,
        dropped_pages = extra.len(),
        bytes = out.len(),
        "Stamped sender banner onto label"
    );

    Ok(Bytes::from(out))
}

/// Read the visible box and Rotate of a page, following page-tree inheritance
pub fn page_geometry(doc: &Document, page_id: ObjectId) -> Result<PageGeometry, RenderError> {
    let media_box = inherited_rect(doc, page_id, b"MediaBox")?.unwrap_or(DEFAULT_MEDIA_BOX);
    let view_box = match inherited_rect(doc, page_id, b"CropBox")? {
        Some(crop) => intersect(crop, media_box).unwrap_or(media_box),
        None => media_box,
    };

    let rotation = match inherited(doc, page_id, b"Rotate") {
        Some(obj) => resolve(doc, obj)?.as_i64().map(normalize_rotation).unwrap_or(0),
        None => 0,
    };

    Ok(PageGeometry { view_box, rotation })
}

fn inherited_rect(doc: &Document, page_id: ObjectId, key: &[u8]) -> Result<Option<[f32; 4]>, RenderError> {
    match inherited(doc, page_id, key) {
        Some(obj) => Ok(parse_rect(&resolve(doc, obj)?)),
        None => Ok(None),
    }
}

fn intersect(a: [f32; 4], b: [f32; 4]) -> Option<[f32; 4]> {
    let rect = [a[0].max(b[0]), a[1].max(b[1]), a[2].min(b[2]), a[3].min(b[3])];
    (rect[2] > rect[0] && rect[3] > rect[1]).then_some(rect)
}

/// Render the banner as a standalone one-page document
pub fn render_overlay(geometry: &PageGeometry, banner: &str) -> Result<Document, RenderError> {
    let (display_w, display_h) = geometry.display_size();
    let text = fit_text(banner, display_w);
    let band_y = display_h - BAND_HEIGHT;

    let operations = vec![
        Operation::new("q", vec![]),
        Operation::new("cm", geometry.display_to_user().iter().map(|v| real(*v)).collect()),
        Operation::new("rg", vec![real(0.0), real(0.0), real(0.0)]),
        Operation::new("re", vec![real(0.0), real(band_y), real(display_w), real(BAND_HEIGHT)]),
        Operation::new("f", vec![]),
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(FONT_RESOURCE.as_bytes().to_vec()), real(FONT_SIZE)]),
        Operation::new("rg", vec![real(1.0), real(1.0), real(1.0)]),
        Operation::new("Td", vec![real(PADDING), real(band_y + (BAND_HEIGHT - FONT_SIZE) / 2.0 + 1.0)]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
        Operation::new("Q", vec![]),
    ];
    let content = Content { operations }.encode()?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! {
                FONT_RESOURCE => dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica-Bold",
                    "Encoding" => "WinAnsiEncoding",
                },
            },
        },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1_i64,
            "MediaBox" => geometry.view_box.iter().map(|v| real(*v)).collect::<Vec<_>>(),
            "Rotate" => geometry.rotation,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// Append the overlay page's drawing and fonts to a base page
///
/// The base content is bracketed with `q`/`Q` so its graphics state does not
/// carry into the overlay.
pub fn merge_onto_page(base: &mut Document, page_id: ObjectId, overlay: &Document) -> Result<(), RenderError> {
    let overlay_page = overlay
        .get_pages()
        .values()
        .next()
        .copied()
        .ok_or(RenderError::EmptyDocument)?;
    let overlay_content = overlay.get_page_content(overlay_page)?;
    let overlay_fonts = overlay
        .get_dictionary(overlay_page)?
        .get(b"Resources")?
        .as_dict()?
        .get(b"Font")?
        .as_dict()?
        .clone();

    let mut resources = match inherited(base, page_id, b"Resources") {
        Some(obj) => resolve_dict(base, obj)?,
        None => Dictionary::new(),
    };
    let mut fonts = match resources.get(b"Font") {
        Ok(obj) => resolve_dict(base, obj.clone())?,
        Err(_) => Dictionary::new(),
    };
    for (name, font) in overlay_fonts.iter() {
        fonts.set(name.clone(), font.clone());
    }
    resources.set("Font", fonts);

    let mut contents = vec![Object::Reference(base.add_object(Stream::new(dictionary! {}, b"q\n".to_vec())))];
    let existing = base.get_dictionary(page_id)?.get(b"Contents").ok().cloned();
    match existing {
        Some(Object::Reference(id)) => match base.get_object(id)? {
            Object::Array(items) => contents.extend(items.iter().cloned()),
            _ => contents.push(Object::Reference(id)),
        },
        Some(Object::Array(items)) => contents.extend(items),
        _ => {}
    }
    let mut closing = b"\nQ\n".to_vec();
    closing.extend_from_slice(&overlay_content);
    contents.push(Object::Reference(base.add_object(Stream::new(dictionary! {}, closing))));

    let page = base.get_dictionary_mut(page_id)?;
    page.set("Contents", Object::Array(contents));
    page.set("Resources", Object::Dictionary(resources));
    Ok(())
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

/// Printable ASCII only, trimmed to what fits in the band
fn fit_text(text: &str, display_width: f32) -> String {
    let max_chars = ((display_width - 2.0 * PADDING) / (FONT_SIZE * AVG_GLYPH_WIDTH))
        .floor()
        .max(0.0) as usize;
    text.trim()
        .chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .take(max_chars)
        .collect()
}

fn normalize_rotation(degrees: i64) -> i64 {
    match degrees.rem_euclid(360) {
        r @ (90 | 180 | 270) => r,
        _ => 0,
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn parse_rect(obj: &Object) -> Option<[f32; 4]> {
    let items = obj.as_array().ok()?;
    if items.len() != 4 {
        return None;
    }
    let v: Vec<f32> = items.iter().filter_map(number).collect();
    if v.len() != 4 {
        return None;
    }
    let rect = [v[0].min(v[2]), v[1].min(v[3]), v[0].max(v[2]), v[1].max(v[3])];
    (rect[2] > rect[0] && rect[3] > rect[1]).then_some(rect)
}

/// Look a key up on a page node, then on its ancestors
fn inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn resolve(doc: &Document, obj: Object) -> Result<Object, RenderError> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(id)?.clone()),
        other => Ok(other),
    }
}

fn resolve_dict(doc: &Document, obj: Object) -> Result<Dictionary, RenderError> {
    Ok(resolve(doc, obj)?.as_dict()?.clone())
}
