//! The reading list and the open-book workflow.
//!
//! [`Library`] ties the store, the file source, the codec and the progress
//! tracker together. It keeps a copy of the stored records for display and
//! refreshes that copy after every mutation it makes.

pub mod book;
pub mod files;
pub mod session;

use crate::codec;
use crate::error::{AppError, Result};
use crate::progress::{DEFAULT_END_SNAP_TOLERANCE, PageUpdate, ProgressTracker};
use crate::store::BookStore;
use crate::theme::Theme;
use book::BookRecord;
use files::FileSource;
use session::ReaderSession;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Reader behaviour settings.
#[derive(Debug, Clone, Copy)]
pub struct LibraryOptions {
    /// Distance from the bottom at which the last page is forced.
    pub end_snap_tolerance: f64,
    /// Theme for newly opened books.
    pub theme: Theme,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        Self {
            end_snap_tolerance: DEFAULT_END_SNAP_TOLERANCE,
            theme: Theme::default(),
        }
    }
}

/// Reading list service.
pub struct Library {
    store: BookStore,
    files: Arc<dyn FileSource>,
    options: LibraryOptions,
    books: Vec<BookRecord>,
}

impl Library {
    /// Create a library. Call [`Library::start`] before use.
    pub fn new(store: BookStore, files: Arc<dyn FileSource>, options: LibraryOptions) -> Self {
        Self {
            store,
            files,
            options,
            books: Vec::new(),
        }
    }

    /// Initialize storage, drop books whose files are gone, load the list.
    ///
    /// Returns the records dropped because their files were missing.
    pub async fn start(&mut self) -> Result<Vec<BookRecord>> {
        self.store.init().await?;
        let removed = self.prune_missing().await?;
        self.refresh().await?;
        tracing::info!(books = self.books.len(), "Library loaded");
        Ok(removed)
    }

    /// Cached copy of the stored records.
    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    /// Underlying store.
    pub fn store(&self) -> &BookStore {
        &self.store
    }

    /// Reload the cached records from the store.
    pub async fn refresh(&mut self) -> Result<()> {
        self.books = self.store.get_all().await?;
        Ok(())
    }

    /// Remove records whose files no longer exist. Returns the removed records.
    pub async fn prune_missing(&mut self) -> Result<Vec<BookRecord>> {
        let mut missing = HashSet::new();
        for book in self.store.get_all().await? {
            if !self.files.exists(&book.file_path).await? {
                missing.insert(book.name);
            }
        }

        if missing.is_empty() {
            return Ok(Vec::new());
        }

        let removed = self.store.retain(|b| !missing.contains(&b.name)).await?;
        for book in &removed {
            tracing::warn!(name = %book.name, path = %book.file_path, "Book file missing, removed from list");
        }
        self.refresh().await?;
        Ok(removed)
    }

    /// Import a file into the reading list.
    ///
    /// The record name is the file name. Fails with
    /// [`AppError::DuplicateImport`] if a book with that name exists.
    pub async fn import(&mut self, file_path: &str) -> Result<BookRecord> {
        let name = Path::new(file_path)
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("Not a file path: {}", file_path),
                ))
            })?
            .to_string();

        self.import_as(name, file_path).await
    }

    /// Import a file under an explicit name.
    pub async fn import_as(&mut self, name: String, file_path: &str) -> Result<BookRecord> {
        if self.store.get_by_name(&name).await?.is_some() {
            tracing::info!(name = %name, "Book already in library");
            return Err(AppError::DuplicateImport(name));
        }

        let raw = self.files.read_bytes(file_path).await?;
        let encoding = codec::detect_encoding(&raw);
        let record = BookRecord::new(name, file_path, encoding);

        self.store.add(record.clone()).await?;
        self.refresh().await?;

        tracing::info!(name = %record.name, encoding = %encoding, bytes = raw.len(), "Imported book");
        Ok(record)
    }

    /// Open a book for reading.
    ///
    /// If the file has disappeared the record is removed and
    /// [`AppError::FileMissing`] is returned.
    pub async fn open(&mut self, name: &str) -> Result<ReaderSession> {
        let book = self
            .store
            .get_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(name.to_string()))?;

        if !self.files.exists(&book.file_path).await? {
            self.store.remove(&book.name).await?;
            self.refresh().await?;
            tracing::warn!(name = %book.name, path = %book.file_path, "Book file missing, removed from list");
            return Err(AppError::FileMissing(book.name));
        }

        let raw = self.files.read_bytes(&book.file_path).await?;
        let content = codec::decode(&raw, book.encoding);
        let tracker = ProgressTracker::new(book.current_page, book.total_pages)
            .with_end_snap_tolerance(self.options.end_snap_tolerance);

        tracing::info!(
            name = %book.name,
            encoding = %book.encoding,
            page = book.current_page,
            total = book.total_pages,
            "Opened book"
        );
        Ok(ReaderSession::new(book, content, tracker, self.options.theme))
    }

    /// Handle a scroll event, persisting progress when the page changes.
    pub async fn on_scroll(
        &mut self,
        session: &mut ReaderSession,
        scroll_offset: f64,
        viewport_height: f64,
        content_height: f64,
    ) -> Result<Option<PageUpdate>> {
        let Some(update) =
            session
                .tracker_mut()
                .on_scroll(scroll_offset, viewport_height, content_height)
        else {
            return Ok(None);
        };

        let name = session.book().name.clone();
        self.persist(&name, |b| {
            b.current_page = update.page;
            b.total_pages = update.total_pages;
        })
        .await?;
        Ok(Some(update))
    }

    /// Handle a content size change, persisting the total when it changes.
    pub async fn on_content_size_change(
        &mut self,
        session: &mut ReaderSession,
        content_height: f64,
        viewport_height: f64,
    ) -> Result<Option<u32>> {
        let Some(total) = session
            .tracker_mut()
            .on_content_size_change(content_height, viewport_height)
        else {
            return Ok(None);
        };

        let name = session.book().name.clone();
        self.persist(&name, |b| b.total_pages = total).await?;
        Ok(Some(total))
    }

    /// Close a book, saving its final position.
    pub async fn close(&mut self, session: ReaderSession) -> Result<()> {
        let position = session.tracker().position();
        self.persist(&session.book().name, |b| {
            b.current_page = position.page.max(1);
            b.total_pages = position.total_pages;
        })
        .await?;
        tracing::debug!(name = %session.book().name, page = position.page, "Closed book");
        Ok(())
    }

    /// Remove a book from the list. Returns whether it was present.
    pub async fn remove(&mut self, name: &str) -> Result<bool> {
        let existed = self.store.get_by_name(name).await?.is_some();
        self.store.remove(name).await?;
        self.refresh().await?;
        if existed {
            tracing::info!(name = %name, "Removed book");
        }
        Ok(existed)
    }

    async fn persist<F>(&mut self, name: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut BookRecord) + Send,
    {
        let Some(stored) = self.store.update_with(name, f).await? else {
            return Ok(());
        };

        if let Some(cached) = self.books.iter_mut().find(|b| b.name == name) {
            *cached = stored;
        }
        Ok(())
    }
}
