//! Persisted book records.
//!
//! All records live in one JSON array under [`BOOKS_KEY`] in a key-value
//! storage. Every operation reads the whole array and every mutation rewrites
//! it. Operations on one [`BookStore`] are serialized so concurrent callers
//! never lose each other's writes.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use crate::error::{AppError, Result};
use crate::library::book::BookRecord;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Storage key holding the book list.
pub const BOOKS_KEY: &str = "books_storage";

/// String key-value storage capability.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read a value. `Ok(None)` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// CRUD over the persisted book list.
pub struct BookStore {
    storage: Arc<dyn KeyValueStorage>,
    lock: Mutex<()>,
}

impl BookStore {
    /// Create a store over the given storage.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            lock: Mutex::new(()),
        }
    }

    /// Make sure the book list exists, writing an empty one if needed.
    pub async fn init(&self) -> Result<()> {
        let _guard = self.lock.lock().await;

        if self.storage.get(BOOKS_KEY).await?.is_none() {
            self.storage.set(BOOKS_KEY, "[]").await?;
            tracing::debug!(key = BOOKS_KEY, "Initialized empty book list");
        }
        Ok(())
    }

    /// Append a record. Fails if a record with the same name exists.
    pub async fn add(&self, record: BookRecord) -> Result<()> {
        let _guard = self.lock.lock().await;

        let mut books = self.read_all().await?;
        if books.iter().any(|b| b.name == record.name) {
            return Err(AppError::DuplicateImport(record.name));
        }

        tracing::debug!(name = %record.name, encoding = %record.encoding, "Adding book");
        books.push(record);
        self.write_all(&books).await
    }

    /// All records in insertion order.
    pub async fn get_all(&self) -> Result<Vec<BookRecord>> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    /// First record with this name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<BookRecord>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.into_iter().find(|b| b.name == name))
    }

    /// Replace the record with the same name. Does nothing if there is none.
    ///
    /// Page numbers are clamped so that `1 <= current_page <= total_pages`.
    /// Returns whether a record was replaced.
    pub async fn update(&self, mut record: BookRecord) -> Result<bool> {
        let _guard = self.lock.lock().await;

        let mut books = self.read_all().await?;
        let Some(slot) = books.iter_mut().find(|b| b.name == record.name) else {
            tracing::debug!(name = %record.name, "Update for unknown book ignored");
            return Ok(false);
        };

        record.clamp_pages();
        tracing::debug!(
            name = %record.name,
            page = record.current_page,
            total = record.total_pages,
            "Updating book"
        );
        *slot = record;
        self.write_all(&books).await?;
        Ok(true)
    }

    /// Modify the record with this name in place, under one lock.
    ///
    /// Returns the stored record, or `None` if there is no such book.
    pub async fn update_with<F>(&self, name: &str, f: F) -> Result<Option<BookRecord>>
    where
        F: FnOnce(&mut BookRecord) + Send,
    {
        let _guard = self.lock.lock().await;

        let mut books = self.read_all().await?;
        let Some(slot) = books.iter_mut().find(|b| b.name == name) else {
            return Ok(None);
        };

        f(slot);
        slot.name = name.to_string();
        slot.clamp_pages();
        let updated = slot.clone();
        self.write_all(&books).await?;
        Ok(Some(updated))
    }

    /// Remove every record with this name.
    pub async fn remove(&self, name: &str) -> Result<()> {
        let _guard = self.lock.lock().await;

        let mut books = self.read_all().await?;
        books.retain(|b| b.name != name);
        tracing::debug!(name = %name, "Removing book");
        self.write_all(&books).await
    }

    /// Keep only records matching `keep`. Returns the dropped records.
    ///
    /// Nothing is written when every record is kept.
    pub async fn retain<F>(&self, mut keep: F) -> Result<Vec<BookRecord>>
    where
        F: FnMut(&BookRecord) -> bool + Send,
    {
        let _guard = self.lock.lock().await;

        let (kept, dropped): (Vec<_>, Vec<_>) =
            self.read_all().await?.into_iter().partition(|b| keep(b));
        if !dropped.is_empty() {
            self.write_all(&kept).await?;
        }
        Ok(dropped)
    }

    /// Pretty-printed JSON of the stored list, for inspection.
    pub async fn dump(&self) -> Result<String> {
        let _guard = self.lock.lock().await;

        let raw = self.storage.get(BOOKS_KEY).await?;
        let value: serde_json::Value =
            serde_json::from_str(raw.as_deref().unwrap_or("[]"))?;
        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Delete the stored list entirely.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().await;

        tracing::warn!(key = BOOKS_KEY, "Clearing stored book list");
        self.storage.remove(BOOKS_KEY).await
    }

    async fn read_all(&self) -> Result<Vec<BookRecord>> {
        match self.storage.get(BOOKS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_all(&self, books: &[BookRecord]) -> Result<()> {
        let raw = serde_json::to_string(books)?;
        self.storage.set(BOOKS_KEY, &raw).await
    }
}
