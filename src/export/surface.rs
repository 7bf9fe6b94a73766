//! Drawing-surface abstraction and the built-in PDF backend
//!
//! The composer and layout code only talk to [`DrawingSurface`], a small
//! capability set over a page-oriented canvas. [`PdfSurface`] implements it
//! with a hand-assembled PDF 1.4 document held entirely in memory until
//! `save` is called, which keeps the exporter usable from both native and
//! WASM hosts.
//!
//! Coordinates handed to the surface are top-down millimetres (origin at the
//! top-left corner of the page); the PDF backend flips them into bottom-up
//! point coordinates when emitting content streams.

use crate::export::ExportError;

const MM_TO_PT: f64 = 2.83465;
const PT_TO_MM: f64 = 0.352_778;

/// Average glyph advance as a fraction of the font size. Helvetica averages
/// just under half an em; the flat factor keeps wrapping conservative.
const AVG_GLYPH_EM: f64 = 0.5;

/// A4 paper, millimetres.
const A4_WIDTH_MM: f64 = 210.0;
const A4_HEIGHT_MM: f64 = 297.0;

/// Check-mark glyph understood by the PDF backend (rendered from
/// ZapfDingbats, which carries the glyph that WinAnsi lacks).
pub const CHECK_MARK: &str = "\u{2713}";

/// Font weight selectable via [`DrawingSurface::set_font`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Horizontal alignment for a single text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// Finished artifact handed back by [`DrawingSurface::save`].
#[derive(Debug, Clone)]
pub struct SavedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl SavedDocument {
    /// Write the artifact into `dir` under its generated filename and
    /// return the full path.
    pub fn write_to(&self, dir: &std::path::Path) -> Result<std::path::PathBuf, ExportError> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Capability set required from a rendering backend.
///
/// One instance backs exactly one export call; implementations are not
/// shared between calls.
pub trait DrawingSurface {
    /// Page width in mm, fixed for the session.
    fn page_width(&self) -> f64;
    /// Page height in mm, fixed for the session.
    fn page_height(&self) -> f64;
    /// Set the font used by subsequent `draw_text` and `wrap_text` calls.
    fn set_font(&mut self, size_pt: f64, weight: FontWeight);
    /// Draw a single text run on the current page.
    fn draw_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign)
    -> Result<(), ExportError>;
    /// Split `text` into lines no wider than `max_width` mm at the current
    /// font.
    fn wrap_text(&self, text: &str, max_width: f64) -> Vec<String>;
    /// Draw a straight line segment on the current page.
    fn draw_line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width_pt: f64,
    ) -> Result<(), ExportError>;
    /// Append a fresh page and make it current.
    fn add_page(&mut self);
    /// Make an already-produced page current (0-based).
    fn select_page(&mut self, index: usize) -> Result<(), ExportError>;
    /// Number of pages produced so far.
    fn page_count(&self) -> usize;
    /// Assemble the finished multi-page artifact.
    fn save(&mut self, filename: &str) -> Result<SavedDocument, ExportError>;
}

/// In-memory PDF 1.4 backend.
///
/// Pages are accumulated as content streams; `save` wires them into a
/// complete document (catalog, page tree, fonts, info dictionary, xref,
/// trailer). Base-14 fonts only: Helvetica `/F1`, Helvetica-Bold `/F2` and
/// ZapfDingbats `/F3` for the check-mark glyph.
pub struct PdfSurface {
    width_mm: f64,
    height_mm: f64,
    pages: Vec<String>,
    current: usize,
    font_size: f64,
    font_weight: FontWeight,
}

impl PdfSurface {
    /// Fresh A4 surface containing a single empty page.
    pub fn a4() -> Self {
        Self {
            width_mm: A4_WIDTH_MM,
            height_mm: A4_HEIGHT_MM,
            pages: vec![String::new()],
            current: 0,
            font_size: 11.0,
            font_weight: FontWeight::Regular,
        }
    }

    /// Approximate rendered width of `text` at the current font, in mm.
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size * AVG_GLYPH_EM * PT_TO_MM
    }

    fn font_operator(&self) -> &'static str {
        match self.font_weight {
            FontWeight::Regular => "/F1",
            FontWeight::Bold => "/F2",
        }
    }

    /// Escape special characters for PDF string literals (WinAnsi, with
    /// octal fallbacks for the few non-ASCII characters quiz text tends to
    /// contain).
    fn escape_pdf_string(s: &str) -> String {
        let mut result = String::new();
        for c in s.chars() {
            match c {
                '\\' => result.push_str("\\\\"),
                '(' => result.push_str("\\("),
                ')' => result.push_str("\\)"),
                '\n' => result.push_str("\\n"),
                '\r' => result.push_str("\\r"),
                '\t' => result.push_str("\\t"),
                '\u{2022}' => result.push_str("\\267"), // bullet
                '\u{2013}' => result.push_str("\\226"), // en dash
                '\u{2014}' => result.push_str("\\227"), // em dash
                '\u{2018}' | '\u{2019}' => result.push('\''),
                '\u{201C}' | '\u{201D}' => result.push('"'),
                _ if c.is_ascii() => result.push(c),
                _ => result.push('?'),
            }
        }
        result
    }
}

impl DrawingSurface for PdfSurface {
    fn page_width(&self) -> f64 {
        self.width_mm
    }

    fn page_height(&self) -> f64 {
        self.height_mm
    }

    fn set_font(&mut self, size_pt: f64, weight: FontWeight) {
        self.font_size = size_pt;
        self.font_weight = weight;
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        align: TextAlign,
    ) -> Result<(), ExportError> {
        let x_mm = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - self.text_width(text) / 2.0,
        };
        let x_pt = x_mm * MM_TO_PT;
        let y_pt = (self.height_mm - y) * MM_TO_PT;
        let size = self.font_size;
        let (font, body) = if text == CHECK_MARK {
            // ZapfDingbats code 0x33 is the check-mark glyph
            ("/F3", "3".to_string())
        } else {
            (self.font_operator(), Self::escape_pdf_string(text))
        };
        let stream = &mut self.pages[self.current];
        stream.push_str("BT\n");
        stream.push_str(&format!("{} {:.1} Tf\n", font, size));
        stream.push_str(&format!("1 0 0 1 {:.2} {:.2} Tm\n", x_pt, y_pt));
        stream.push_str(&format!("({}) Tj\n", body));
        stream.push_str("ET\n");
        Ok(())
    }

    fn wrap_text(&self, text: &str, max_width: f64) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current_line = String::new();

        for word in text.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
            } else {
                let candidate = format!("{current_line} {word}");
                if self.text_width(&candidate) <= max_width {
                    current_line = candidate;
                } else {
                    lines.push(current_line);
                    current_line = word.to_string();
                }
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }

    fn draw_line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width_pt: f64,
    ) -> Result<(), ExportError> {
        let h = self.height_mm;
        let stream = &mut self.pages[self.current];
        stream.push_str(&format!(
            "q\n0.6 G\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
            width_pt,
            x1 * MM_TO_PT,
            (h - y1) * MM_TO_PT,
            x2 * MM_TO_PT,
            (h - y2) * MM_TO_PT,
        ));
        Ok(())
    }

    fn add_page(&mut self) {
        self.pages.push(String::new());
        self.current = self.pages.len() - 1;
    }

    fn select_page(&mut self, index: usize) -> Result<(), ExportError> {
        if index >= self.pages.len() {
            return Err(ExportError::PageOutOfBounds {
                index,
                count: self.pages.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn save(&mut self, filename: &str) -> Result<SavedDocument, ExportError> {
        let width_pt = self.width_mm * MM_TO_PT;
        let height_pt = self.height_mm * MM_TO_PT;
        let page_count = self.pages.len();

        let mut pdf: Vec<u8> = Vec::new();
        pdf.extend_from_slice(b"%PDF-1.4\n");
        pdf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let mut xref_positions: Vec<usize> = Vec::new();

        // Object 1: catalog
        xref_positions.push(pdf.len());
        pdf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

        // Object 2: page tree, written after the page objects exist
        let pages_slot = xref_positions.len();
        xref_positions.push(0);

        // Pages occupy objects 3.. as (page, content) pairs; fonts follow.
        let font_obj_start = 3 + page_count * 2;
        let mut page_obj_ids: Vec<usize> = Vec::new();

        for (page_idx, content_stream) in self.pages.iter().enumerate() {
            let page_obj_id = 3 + page_idx * 2;
            let content_obj_id = page_obj_id + 1;
            page_obj_ids.push(page_obj_id);

            xref_positions.push(pdf.len());
            let page_obj = format!(
                "{} 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Contents {} 0 R /Resources << /Font << /F1 {} 0 R /F2 {} 0 R /F3 {} 0 R >> >> >>\nendobj\n",
                page_obj_id,
                width_pt,
                height_pt,
                content_obj_id,
                font_obj_start,
                font_obj_start + 1,
                font_obj_start + 2,
            );
            pdf.extend_from_slice(page_obj.as_bytes());

            xref_positions.push(pdf.len());
            let content_obj = format!(
                "{} 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n",
                content_obj_id,
                content_stream.len(),
                content_stream
            );
            pdf.extend_from_slice(content_obj.as_bytes());
        }

        // Page tree with the final kids list
        let pages_position = pdf.len();
        let kids_list: Vec<String> = page_obj_ids.iter().map(|id| format!("{} 0 R", id)).collect();
        let pages_obj = format!(
            "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
            kids_list.join(" "),
            page_count
        );
        pdf.extend_from_slice(pages_obj.as_bytes());
        xref_positions[pages_slot] = pages_position;

        // Font objects
        xref_positions.push(pdf.len());
        pdf.extend_from_slice(
            format!(
                "{} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>\nendobj\n",
                font_obj_start
            )
            .as_bytes(),
        );
        xref_positions.push(pdf.len());
        pdf.extend_from_slice(
            format!(
                "{} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>\nendobj\n",
                font_obj_start + 1
            )
            .as_bytes(),
        );
        // ZapfDingbats keeps its built-in encoding
        xref_positions.push(pdf.len());
        pdf.extend_from_slice(
            format!(
                "{} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /ZapfDingbats >>\nendobj\n",
                font_obj_start + 2
            )
            .as_bytes(),
        );

        // Info dictionary
        let info_obj_id = font_obj_start + 3;
        xref_positions.push(pdf.len());
        let timestamp = chrono::Utc::now().format("D:%Y%m%d%H%M%S").to_string();
        let info_obj = format!(
            "{} 0 obj\n<< /Producer (quiz-export-sdk) /CreationDate ({}) >>\nendobj\n",
            info_obj_id, timestamp
        );
        pdf.extend_from_slice(info_obj.as_bytes());

        // Cross-reference table
        let xref_start = pdf.len();
        pdf.extend_from_slice(b"xref\n");
        pdf.extend_from_slice(format!("0 {}\n", xref_positions.len() + 1).as_bytes());
        pdf.extend_from_slice(b"0000000000 65535 f \n");
        for pos in &xref_positions {
            pdf.extend_from_slice(format!("{:010} 00000 n \n", pos).as_bytes());
        }

        // Trailer
        pdf.extend_from_slice(b"trailer\n");
        pdf.extend_from_slice(
            format!(
                "<< /Size {} /Root 1 0 R /Info {} 0 R >>\n",
                xref_positions.len() + 1,
                info_obj_id
            )
            .as_bytes(),
        );
        pdf.extend_from_slice(b"startxref\n");
        pdf.extend_from_slice(format!("{}\n", xref_start).as_bytes());
        pdf.extend_from_slice(b"%%EOF\n");

        Ok(SavedDocument {
            filename: filename.to_string(),
            bytes: pdf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_dimensions() {
        let surface = PdfSurface::a4();
        assert_eq!(surface.page_width(), 210.0);
        assert_eq!(surface.page_height(), 297.0);
        assert_eq!(surface.page_count(), 1);
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(
            PdfSurface::escape_pdf_string("a(b)c\\d"),
            "a\\(b\\)c\\\\d"
        );
        assert_eq!(PdfSurface::escape_pdf_string("naïve"), "na?ve");
        assert_eq!(PdfSurface::escape_pdf_string("3 \u{2013} 4"), "3 \\226 4");
    }

    #[test]
    fn test_wrap_text_bounds() {
        let mut surface = PdfSurface::a4();
        surface.set_font(11.0, FontWeight::Regular);
        let text = "one two three four five six seven eight nine ten \
                    eleven twelve thirteen fourteen fifteen sixteen";
        let lines = surface.wrap_text(text, 40.0);
        assert!(lines.len() > 1);
        // no line but possibly a single long word exceeds the bound
        for line in &lines {
            if line.split_whitespace().count() > 1 {
                assert!(surface.text_width(line) <= 40.0, "line too wide: {line}");
            }
        }
        // wrapping preserves every word in order
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_wrap_text_empty_input_yields_one_line() {
        let surface = PdfSurface::a4();
        assert_eq!(surface.wrap_text("", 100.0), vec![String::new()]);
    }

    #[test]
    fn test_select_page_out_of_bounds() {
        let mut surface = PdfSurface::a4();
        let err = surface.select_page(3).unwrap_err();
        assert!(matches!(
            err,
            ExportError::PageOutOfBounds { index: 3, count: 1 }
        ));
    }

    #[test]
    fn test_draw_targets_selected_page() {
        let mut surface = PdfSurface::a4();
        surface.add_page();
        surface.select_page(0).unwrap();
        surface
            .draw_text("first page", 20.0, 20.0, TextAlign::Left)
            .unwrap();
        assert!(surface.pages[0].contains("(first page) Tj"));
        assert!(!surface.pages[1].contains("first page"));
    }

    #[test]
    fn test_check_mark_uses_dingbats_font() {
        let mut surface = PdfSurface::a4();
        surface
            .draw_text(CHECK_MARK, 20.0, 20.0, TextAlign::Left)
            .unwrap();
        assert!(surface.pages[0].contains("/F3"));
        assert!(surface.pages[0].contains("(3) Tj"));
    }

    #[test]
    fn test_save_assembles_valid_document_skeleton() {
        let mut surface = PdfSurface::a4();
        surface
            .draw_text("hello", 20.0, 20.0, TextAlign::Left)
            .unwrap();
        surface.add_page();
        let saved = surface.save("test.pdf").unwrap();
        let body = String::from_utf8_lossy(&saved.bytes);
        assert!(body.starts_with("%PDF-1.4"));
        assert!(body.contains("/Count 2"));
        assert!(body.contains("/BaseFont /Helvetica"));
        assert!(body.trim_end().ends_with("%%EOF"));
        assert_eq!(saved.filename, "test.pdf");
    }
}
