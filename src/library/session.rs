//! An open book.

use super::book::BookRecord;
use crate::progress::ProgressTracker;
use crate::theme::Theme;
use std::time::Duration;

/// State of the reader while a book is open.
#[derive(Debug)]
pub struct ReaderSession {
    book: BookRecord,
    content: String,
    tracker: ProgressTracker,
    theme: Theme,
    restore_pending: bool,
}

impl ReaderSession {
    pub(super) fn new(
        book: BookRecord,
        content: String,
        tracker: ProgressTracker,
        theme: Theme,
    ) -> Self {
        Self {
            book,
            content,
            tracker,
            theme,
            restore_pending: true,
        }
    }

    /// Record the book was opened from.
    pub fn book(&self) -> &BookRecord {
        &self.book
    }

    /// Decoded text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Live page position.
    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub(super) fn tracker_mut(&mut self) -> &mut ProgressTracker {
        &mut self.tracker
    }

    /// Active theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch to the next theme and return it.
    pub fn cycle_theme(&mut self) -> Theme {
        self.theme = self.theme.next();
        self.theme
    }

    /// Signal that the content has been laid out.
    ///
    /// Returns the scroll offset to jump to (without animation) the first
    /// time it is called after opening, and `None` afterwards.
    pub fn layout_complete(&mut self, viewport_height: f64) -> Option<f64> {
        if !std::mem::take(&mut self.restore_pending) {
            return None;
        }

        let offset = self.tracker.restore_offset(viewport_height);
        tracing::debug!(
            name = %self.book.name,
            page = self.tracker.current_page(),
            offset,
            "Restoring scroll position"
        );
        Some(offset)
    }

    /// Fallback for hosts without a layout signal: wait, then restore.
    pub async fn restore_after_delay(
        &mut self,
        delay: Duration,
        viewport_height: f64,
    ) -> Option<f64> {
        if !self.restore_pending {
            return None;
        }
        tokio::time::sleep(delay).await;
        self.layout_complete(viewport_height)
    }
}
