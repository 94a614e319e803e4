//! Single-record admeasurement certificate rendered as an A4 PDF.
//!
//! The layout is computed first as plain positioned lines (top-left origin,
//! millimetres) so it can be checked without parsing PDF output, then drawn
//! with printpdf's built-in Helvetica.

use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, Mm, PdfDocument, PdfLayerReference};

use crate::error::{Error, Result};
use crate::models::{BoatField, BoatRecord, Section};

use super::write_export;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

const TITLE: &str = "Boat Admeasurement Certificate";
const TITLE_SIZE: f32 = 20.0;
const BODY_SIZE: f32 = 12.0;
const TITLE_Y: f32 = 30.0;
const FIRST_SECTION_Y: f32 = 50.0;
const HEADING_X: f32 = 20.0;
const LINE_X: f32 = 30.0;
const HEADING_GAP: f32 = 10.0;
const LINE_SPACING: f32 = 8.0;
const SECTION_GAP: f32 = 20.0;
/// New lines restart here on a fresh page.
const TOP_MARGIN: f32 = 20.0;
/// Lines whose baseline would fall below this move to the next page.
const BOTTOM_LIMIT: f32 = PAGE_HEIGHT_MM - 10.0;

/// One line of text at a fixed spot. `y_mm` is measured from the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateLine {
    pub page: usize,
    pub text: String,
    pub font_size: f32,
    pub x_mm: f32,
    pub y_mm: f32,
}

/// Vertical cursor that rolls onto a new page when it runs past the limit.
struct Pen {
    page: usize,
    y: f32,
    limit: f32,
    lines: Vec<CertificateLine>,
}

impl Pen {
    fn new(y: f32, limit: f32) -> Self {
        Self {
            page: 0,
            y,
            limit,
            lines: Vec::new(),
        }
    }

    fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    fn write(&mut self, text: String, font_size: f32, x_mm: f32) {
        if self.y > self.limit {
            self.page += 1;
            self.y = TOP_MARGIN;
        }
        self.lines.push(CertificateLine {
            page: self.page,
            text,
            font_size,
            x_mm,
            y_mm: self.y,
        });
    }
}

/// Title, then the owner block, then the measurements block.
pub fn certificate_layout(record: &BoatRecord) -> Vec<CertificateLine> {
    let mut pen = Pen::new(TITLE_Y, BOTTOM_LIMIT);
    pen.write(TITLE.to_string(), TITLE_SIZE, HEADING_X);
    pen.y = FIRST_SECTION_Y;

    for (idx, section) in [Section::OwnerDetails, Section::BoatMeasurements]
        .into_iter()
        .enumerate()
    {
        if idx > 0 {
            pen.advance(SECTION_GAP);
        }
        pen.write(format!("{}:", section.title()), BODY_SIZE, HEADING_X);
        pen.advance(HEADING_GAP);

        let fields = BoatField::ALL.into_iter().filter(|f| f.section() == section);
        for (line_idx, field) in fields.enumerate() {
            if line_idx > 0 {
                pen.advance(LINE_SPACING);
            }
            let text = format!(
                "{}: {}",
                field.certificate_label(),
                record.details.get(field)
            );
            pen.write(text, BODY_SIZE, LINE_X);
        }
    }

    pen.lines
}

/// `boat_certificate_<owner>.pdf`, with each whitespace run in the owner name
/// collapsed to one underscore and path separators neutralised.
pub fn certificate_file_name(owner_name: &str) -> String {
    let mut stem = String::with_capacity(owner_name.len());
    let mut in_space = false;
    for ch in owner_name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        match ch {
            '/' | '\\' => stem.push('-'),
            other => stem.push(other),
        }
    }
    format!("boat_certificate_{stem}.pdf")
}

/// Draw the certificate and return the PDF bytes.
pub fn render_certificate(record: &BoatRecord) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| Error::Pdf(format!("{err:?}")))?;

    let mut layers: Vec<PdfLayerReference> = vec![doc.get_page(page).get_layer(layer)];
    for line in certificate_layout(record) {
        while layers.len() <= line.page {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layers.push(doc.get_page(page).get_layer(layer));
        }
        // printpdf measures from the bottom edge.
        layers[line.page].use_text(
            line.text,
            line.font_size,
            Mm(line.x_mm),
            Mm(PAGE_HEIGHT_MM - line.y_mm),
            &font,
        );
    }

    doc.save_to_bytes().map_err(|err| Error::Pdf(format!("{err:?}")))
}

/// Write the certificate for `record` into `dir`.
pub fn export_certificate(record: &BoatRecord, dir: &Path) -> Result<PathBuf> {
    let bytes = render_certificate(record)?;
    write_export(dir, &certificate_file_name(&record.details.owner_name), &bytes)
}
