//! Page tracking derived from continuous scroll offsets.
//!
//! A "page" is one viewport height of scroll distance. The tracker turns
//! scroll and content-size events into page numbers and reports when the
//! stored progress needs to change.

/// Distance from the bottom (in content units) at which the last page is forced.
pub const DEFAULT_END_SNAP_TOLERANCE: f64 = 20.0;

/// Page position within a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageUpdate {
    /// Current 1-based page.
    pub page: u32,
    /// Total page count.
    pub total_pages: u32,
}

/// Total page count for a content height.
pub fn total_pages(viewport_height: f64, content_height: f64) -> u32 {
    if !valid_viewport(viewport_height) || !content_height.is_finite() {
        return 1;
    }
    let pages = (content_height / viewport_height).ceil();
    clamp_pages(pages)
}

/// Compute `(page, total_pages)` for a scroll position.
pub fn compute_page(
    scroll_offset: f64,
    viewport_height: f64,
    content_height: f64,
    end_snap_tolerance: f64,
) -> PageUpdate {
    let total = total_pages(viewport_height, content_height);
    if !valid_viewport(viewport_height) || !scroll_offset.is_finite() {
        return PageUpdate {
            page: 1,
            total_pages: total,
        };
    }

    let raw_page = clamp_pages((scroll_offset / viewport_height).round() + 1.0);
    let at_end = scroll_offset + viewport_height >= content_height - end_snap_tolerance;
    let page = if at_end { total } else { raw_page.min(total) };

    PageUpdate {
        page,
        total_pages: total,
    }
}

fn valid_viewport(viewport_height: f64) -> bool {
    viewport_height.is_finite() && viewport_height > 0.0
}

fn clamp_pages(pages: f64) -> u32 {
    if pages.is_nan() || pages < 1.0 {
        1
    } else if pages >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        pages as u32
    }
}

/// Live reading position for an open book.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    current_page: u32,
    total_pages: u32,
    scroll_offset: f64,
    end_snap_tolerance: f64,
}

impl ProgressTracker {
    /// Start from stored progress.
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        Self {
            current_page: current_page.max(1),
            total_pages: total_pages.max(1),
            scroll_offset: 0.0,
            end_snap_tolerance: DEFAULT_END_SNAP_TOLERANCE,
        }
    }

    /// Override the end-of-content snap distance.
    pub fn with_end_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.end_snap_tolerance = tolerance;
        self
    }

    /// Current 1-based page.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Last known total page count.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Last scroll offset seen.
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Handle a scroll event.
    ///
    /// Returns the new position only when the page or total changed, so
    /// callers write once per page-boundary crossing instead of once per frame.
    pub fn on_scroll(
        &mut self,
        scroll_offset: f64,
        viewport_height: f64,
        content_height: f64,
    ) -> Option<PageUpdate> {
        self.scroll_offset = scroll_offset;
        let update = compute_page(
            scroll_offset,
            viewport_height,
            content_height,
            self.end_snap_tolerance,
        );

        if update == self.position() {
            return None;
        }

        self.current_page = update.page;
        self.total_pages = update.total_pages;
        Some(update)
    }

    /// Handle a content size change. Returns the new total if it changed.
    pub fn on_content_size_change(
        &mut self,
        content_height: f64,
        viewport_height: f64,
    ) -> Option<u32> {
        let total = total_pages(viewport_height, content_height);
        if total == self.total_pages {
            return None;
        }

        self.total_pages = total;
        Some(total)
    }

    /// Scroll offset that shows the current page.
    pub fn restore_offset(&self, viewport_height: f64) -> f64 {
        if !valid_viewport(viewport_height) {
            return 0.0;
        }
        f64::from(self.current_page - 1) * viewport_height
    }

    /// Snapshot for persisting.
    pub fn position(&self) -> PageUpdate {
        PageUpdate {
            page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(offset: f64, viewport: f64, content: f64) -> (u32, u32) {
        let u = compute_page(offset, viewport, content, DEFAULT_END_SNAP_TOLERANCE);
        (u.page, u.total_pages)
    }

    #[test]
    fn test_compute_page_top() {
        assert_eq!(page(0.0, 500.0, 2000.0), (1, 4));
    }

    #[test]
    fn test_compute_page_end_snap() {
        // 1490 + 500 = 1990 >= 1980
        assert_eq!(page(1490.0, 500.0, 2000.0), (4, 4));
    }

    #[test]
    fn test_compute_page_rounding() {
        assert_eq!(page(240.0, 500.0, 2000.0), (1, 4));
        assert_eq!(page(260.0, 500.0, 2000.0), (2, 4));
        assert_eq!(page(1000.0, 500.0, 2000.0), (3, 4));
    }

    #[test]
    fn test_compute_page_fractional_total() {
        assert_eq!(page(0.0, 500.0, 2100.0), (1, 5));
        assert_eq!(page(0.0, 500.0, 0.0), (1, 1));
    }

    #[test]
    fn test_compute_page_short_content_snaps() {
        // Content shorter than the viewport: already at the end.
        assert_eq!(page(0.0, 500.0, 300.0), (1, 1));
    }

    #[test]
    fn test_compute_page_overscroll_clamped() {
        assert_eq!(page(-300.0, 500.0, 2000.0), (1, 4));
        assert_eq!(page(9000.0, 500.0, 2000.0), (4, 4));
    }

    #[test]
    fn test_compute_page_bad_viewport() {
        assert_eq!(page(100.0, 0.0, 2000.0), (1, 1));
        assert_eq!(page(100.0, f64::NAN, 2000.0), (1, 1));
    }

    #[test]
    fn test_tracker_reports_only_changes() {
        let mut tracker = ProgressTracker::new(1, 1);
        assert_eq!(
            tracker.on_scroll(600.0, 500.0, 2000.0),
            Some(PageUpdate {
                page: 2,
                total_pages: 4
            })
        );
        assert_eq!(tracker.on_scroll(620.0, 500.0, 2000.0), None);
        assert_eq!(tracker.scroll_offset(), 620.0);
        assert_eq!(
            tracker.on_scroll(1490.0, 500.0, 2000.0).map(|u| u.page),
            Some(4)
        );
    }

    #[test]
    fn test_tracker_content_size_change() {
        let mut tracker = ProgressTracker::new(1, 1);
        assert_eq!(tracker.on_content_size_change(2000.0, 500.0), Some(4));
        assert_eq!(tracker.on_content_size_change(1900.0, 500.0), None);
        assert_eq!(tracker.total_pages(), 4);
        assert_eq!(tracker.current_page(), 1);
    }

    #[test]
    fn test_restore_offset() {
        let tracker = ProgressTracker::new(3, 10);
        assert_eq!(tracker.restore_offset(500.0), 1000.0);
        assert_eq!(ProgressTracker::new(0, 0).restore_offset(500.0), 0.0);
    }

    #[test]
    fn test_custom_tolerance() {
        let mut tracker = ProgressTracker::new(1, 4).with_end_snap_tolerance(0.0);
        assert_eq!(tracker.on_scroll(1490.0, 500.0, 2000.0).map(|u| u.page), Some(4));
        let mut tracker = ProgressTracker::new(1, 4).with_end_snap_tolerance(0.0);
        assert_eq!(tracker.on_scroll(1200.0, 500.0, 2000.0).map(|u| u.page), Some(3));
    }
}
