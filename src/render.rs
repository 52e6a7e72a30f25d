//! Plain-text layout for terminal output.
//!
//! The terminal host measures content in lines: the viewport is a fixed
//! number of lines and the content height is the number of wrapped lines.

use crate::library::book::BookRecord;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Column width of the title field in the book list.
pub const TITLE_WIDTH: usize = 40;

/// Where to scroll when a book is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTurn {
    /// The saved page.
    Saved,
    /// A 1-based page number.
    Page(u32),
    /// One page after the saved one.
    Next,
    /// One page before the saved one.
    Prev,
}

/// Wrap text into lines of at most `width` terminal columns.
///
/// Breaks at whitespace where possible and hard-splits longer words. Blank
/// source lines are kept.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for source in text.lines() {
        let first = lines.len();
        let mut line = String::new();
        let mut line_width = 0usize;

        for word in source.split_whitespace() {
            let mut rest = word;
            let mut word_width = rest.width();

            if line_width > 0 && line_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            // line is empty here: an overlong word always forces a break first
            while word_width > width {
                let (head, tail) = split_at_width(rest, width);
                lines.push(head.to_string());
                rest = tail;
                word_width = rest.width();
            }
            if rest.is_empty() {
                continue;
            }

            if line_width > 0 {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(rest);
            line_width += word_width;
        }

        if !line.is_empty() || lines.len() == first {
            lines.push(line);
        }
    }

    lines
}

/// Split off the longest prefix that fits in `width` columns.
///
/// Always takes at least one character so a glyph wider than `width` still
/// makes progress.
fn split_at_width(word: &str, width: usize) -> (&str, &str) {
    let mut used = 0usize;
    for (i, c) in word.char_indices() {
        let w = c.width().unwrap_or(0);
        if i > 0 && used + w > width {
            return word.split_at(i);
        }
        used += w;
    }
    (word, "")
}

/// Pad `text` with spaces to `width` terminal columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}

/// Scroll offset (in lines) for a page turn, kept inside the content.
pub fn scroll_target(
    saved_offset: f64,
    turn: PageTurn,
    viewport_lines: f64,
    content_lines: f64,
) -> f64 {
    let offset = match turn {
        PageTurn::Saved => saved_offset,
        PageTurn::Page(p) => f64::from(p.max(1) - 1) * viewport_lines,
        PageTurn::Next => saved_offset + viewport_lines,
        PageTurn::Prev => saved_offset - viewport_lines,
    };
    let max_offset = (content_lines - viewport_lines).max(0.0);
    offset.clamp(0.0, max_offset)
}

/// Lines visible at a scroll offset (in lines).
pub fn visible_lines(lines: &[String], scroll_offset: f64, viewport_lines: usize) -> &[String] {
    let start = if scroll_offset.is_finite() && scroll_offset > 0.0 {
        (scroll_offset.round() as usize).min(lines.len())
    } else {
        0
    };
    let end = start.saturating_add(viewport_lines).min(lines.len());
    &lines[start..end]
}

/// One row of the book list: title, page counter and a progress bar.
pub fn book_row(book: &BookRecord, bar_width: usize) -> String {
    let filled = (book.progress_fraction() * bar_width as f64).round() as usize;
    format!(
        "{} Page {} of {:<6} [{}{}]",
        pad_to_width(book.display_title(), TITLE_WIDTH),
        book.current_page,
        book.total_pages,
        "#".repeat(filled),
        "-".repeat(bar_width.saturating_sub(filled)),
    )
}
