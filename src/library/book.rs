//! Book record model.

use crate::codec::Encoding;
use serde::{Deserialize, Serialize};

/// A book in the reading list, as persisted in the store.
///
/// Field names follow the stored JSON layout. Missing fields take defaults
/// and unknown fields are ignored, so older or newer blobs still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// File name; unique within the store and used as the title.
    #[serde(default)]
    pub name: String,

    /// Last reading position, 1-based.
    #[serde(default = "first_page")]
    pub current_page: u32,

    /// Page count at the last seen viewport size.
    #[serde(default = "first_page")]
    pub total_pages: u32,

    /// Location of the file on the device.
    #[serde(default)]
    pub file_path: String,

    /// Encoding detected at import.
    #[serde(default)]
    pub encoding: Encoding,

    /// Reserved; stored but never interpreted.
    #[serde(default)]
    pub text_position: i64,

    /// Legacy numeric id, kept only if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

fn first_page() -> u32 {
    1
}

impl BookRecord {
    /// Create a record for a freshly imported file.
    pub fn new(name: impl Into<String>, file_path: impl Into<String>, encoding: Encoding) -> Self {
        Self {
            name: name.into(),
            current_page: 1,
            total_pages: 1,
            file_path: file_path.into(),
            encoding,
            text_position: 0,
            id: None,
        }
    }

    /// Title shown in the book list (name without `.txt`).
    pub fn display_title(&self) -> &str {
        self.name.strip_suffix(".txt").unwrap_or(&self.name)
    }

    /// Fraction of the book read, in `[0, 1]`.
    pub fn progress_fraction(&self) -> f64 {
        let total = self.total_pages.max(1);
        (f64::from(self.current_page) / f64::from(total)).clamp(0.0, 1.0)
    }

    /// Force `1 <= current_page <= total_pages`.
    pub fn clamp_pages(&mut self) {
        self.total_pages = self.total_pages.max(1);
        self.current_page = self.current_page.clamp(1, self.total_pages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_layout() {
        let book = BookRecord::new("war.txt", "/books/war.txt", Encoding::Windows1251);
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "war.txt",
                "currentPage": 1,
                "totalPages": 1,
                "filePath": "/books/war.txt",
                "encoding": "Windows-1251",
                "textPosition": 0
            })
        );
    }

    #[test]
    fn test_legacy_and_partial_records() {
        let book: BookRecord = serde_json::from_str(
            r#"{"id": 7, "name": "a.txt", "filePath": "/a.txt", "extra": true}"#,
        )
        .unwrap();
        assert_eq!(book.id, Some(7));
        assert_eq!(book.current_page, 1);
        assert_eq!(book.total_pages, 1);
        assert_eq!(book.encoding, Encoding::Utf8);
        assert_eq!(book.text_position, 0);
    }

    #[test]
    fn test_display_title() {
        assert_eq!(BookRecord::new("Dune.txt", "", Encoding::Utf8).display_title(), "Dune");
        assert_eq!(BookRecord::new("notes", "", Encoding::Utf8).display_title(), "notes");
    }

    #[test]
    fn test_clamp_pages() {
        let mut book = BookRecord::new("a", "", Encoding::Utf8);
        book.current_page = 12;
        book.total_pages = 10;
        book.clamp_pages();
        assert_eq!((book.current_page, book.total_pages), (10, 10));

        book.current_page = 0;
        book.total_pages = 0;
        book.clamp_pages();
        assert_eq!((book.current_page, book.total_pages), (1, 1));
    }

    #[test]
    fn test_progress_fraction() {
        let mut book = BookRecord::new("a", "", Encoding::Utf8);
        book.current_page = 3;
        book.total_pages = 4;
        assert_eq!(book.progress_fraction(), 0.75);
    }
}
