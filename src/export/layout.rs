//! Page geometry, pagination cursor and wrapped-text layout
//!
//! The cursor tracks the vertical write position and current page index for
//! one export call. [`PageCursor::ensure_space`] is the single authority for
//! page-break decisions; nothing writes to the surface without reserving
//! space through it first.

use crate::export::ExportError;
use crate::export::surface::{DrawingSurface, FontWeight, TextAlign};

/// Page margin on all four sides, mm.
pub const PAGE_MARGIN: f64 = 20.0;

/// Heuristic line height: half the point size, taken as mm. Not true font
/// leading, but it matches the layout the rest of the pipeline was tuned
/// against and must not change independently.
pub const LINE_HEIGHT_FACTOR: f64 = 0.5;

/// Extra headroom reserved when placing a wrapped block, mm.
pub const WRAP_SAFETY: f64 = 2.0;

/// Vertical space consumed by one line at `font_size` points.
pub fn line_height(font_size: f64) -> f64 {
    font_size * LINE_HEIGHT_FACTOR
}

/// Mutable write position for one export call.
///
/// Constructed fresh per call and owned by the composer; never shared
/// between exports.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCursor {
    /// Vertical offset from the top of the current page, mm.
    pub y: f64,
    /// 0-based index of the current page.
    pub page: usize,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCursor {
    /// Cursor at the top margin of the first page.
    pub fn new() -> Self {
        Self {
            y: PAGE_MARGIN,
            page: 0,
        }
    }

    /// Guarantee `required` mm of vertical space before the bottom margin.
    ///
    /// If the current page cannot fit it, allocates a new page on the
    /// surface, advances the page index and resets the cursor to the top
    /// margin. Returns whether a page break occurred.
    pub fn ensure_space<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        required: f64,
    ) -> bool {
        if self.y + required > surface.page_height() - PAGE_MARGIN {
            surface.add_page();
            self.page += 1;
            self.y = PAGE_MARGIN;
            true
        } else {
            false
        }
    }
}

/// Wrap `text` at the surface's metrics and compute the vertical space the
/// lines will consume. Leaves the surface font set to `font_size` regular.
pub fn wrap_and_measure<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    text: &str,
    max_width: f64,
    font_size: f64,
) -> (Vec<String>, f64) {
    surface.set_font(font_size, FontWeight::Regular);
    let lines = surface.wrap_text(text, max_width);
    let height = lines.len() as f64 * line_height(font_size);
    (lines, height)
}

/// Draw `text` word-wrapped at `x`, breaking to a new page first if the
/// whole block does not fit. Advances the cursor by the consumed height and
/// returns it.
///
/// This is the only write path the composer uses for wrapped text.
pub fn add_wrapped_text<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    cursor: &mut PageCursor,
    text: &str,
    x: f64,
    font_size: f64,
    max_width: f64,
    bold: bool,
) -> Result<f64, ExportError> {
    let (lines, height) = wrap_and_measure(surface, text, max_width, font_size);
    cursor.ensure_space(surface, height + WRAP_SAFETY);

    let weight = if bold {
        FontWeight::Bold
    } else {
        FontWeight::Regular
    };
    surface.set_font(font_size, weight);
    let lh = line_height(font_size);
    for (i, line) in lines.iter().enumerate() {
        surface.draw_text(line, x, cursor.y + i as f64 * lh, TextAlign::Left)?;
    }
    cursor.y += height;
    Ok(height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::surface::PdfSurface;

    #[test]
    fn test_line_height_heuristic() {
        assert_eq!(line_height(11.0), 5.5);
        assert_eq!(line_height(18.0), 9.0);
    }

    #[test]
    fn test_ensure_space_without_break() {
        let mut surface = PdfSurface::a4();
        let mut cursor = PageCursor::new();
        cursor.y = 100.0;
        assert!(!cursor.ensure_space(&mut surface, 50.0));
        assert_eq!(cursor.y, 100.0);
        assert_eq!(cursor.page, 0);
        assert_eq!(surface.page_count(), 1);
    }

    #[test]
    fn test_ensure_space_triggers_break() {
        let mut surface = PdfSurface::a4();
        let mut cursor = PageCursor::new();
        cursor.y = 270.0;
        // 270 + 10 > 297 - 20
        assert!(cursor.ensure_space(&mut surface, 10.0));
        assert_eq!(cursor.y, PAGE_MARGIN);
        assert_eq!(cursor.page, 1);
        assert_eq!(surface.page_count(), 2);
    }

    #[test]
    fn test_ensure_space_exact_fit_does_not_break() {
        let mut surface = PdfSurface::a4();
        let mut cursor = PageCursor::new();
        cursor.y = 257.0;
        // 257 + 20 == 277 exactly: still fits
        assert!(!cursor.ensure_space(&mut surface, 20.0));
        assert_eq!(cursor.page, 0);
    }

    #[test]
    fn test_add_wrapped_text_advances_cursor() {
        let mut surface = PdfSurface::a4();
        let mut cursor = PageCursor::new();
        let consumed = add_wrapped_text(
            &mut surface,
            &mut cursor,
            "short line",
            PAGE_MARGIN,
            11.0,
            170.0,
            false,
        )
        .unwrap();
        assert_eq!(consumed, 5.5);
        assert_eq!(cursor.y, PAGE_MARGIN + 5.5);
    }

    #[test]
    fn test_add_wrapped_text_breaks_page_for_whole_block() {
        let mut surface = PdfSurface::a4();
        let mut cursor = PageCursor::new();
        cursor.y = 275.0;
        let long = "alpha beta gamma delta epsilon zeta eta theta iota kappa ".repeat(4);
        add_wrapped_text(&mut surface, &mut cursor, &long, PAGE_MARGIN, 11.0, 60.0, false)
            .unwrap();
        assert_eq!(cursor.page, 1);
        assert_eq!(surface.page_count(), 2);
        // block was drawn from the top margin of the new page
        assert!(cursor.y > PAGE_MARGIN);
        assert!(cursor.y <= surface.page_height() - PAGE_MARGIN);
    }
}
