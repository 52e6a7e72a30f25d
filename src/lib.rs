//! txtreader: a plain-text book reader with reading progress.
//!
//! Imports text files, detects whether they are UTF-8 or Windows-1251,
//! splits them into viewport-sized pages by scroll distance and remembers
//! the current page of every book.
//!
//! # Features
//!
//! - UTF-8 / Windows-1251 detection and decoding
//! - Page tracking from scroll offsets with end-of-content snapping
//! - Reading list persisted as one JSON blob in a key-value store
//! - Pluggable storage (SQLite on disk, in-memory for tests)
//! - Light, dark and sepia themes

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Encoding detection and decoding.
pub mod codec;
/// Configuration and CLI.
pub mod config;
/// Error types.
pub mod error;
/// Reading list service.
pub mod library;
/// Page tracking.
pub mod progress;
/// Terminal text layout.
pub mod render;
/// Persisted book records.
pub mod store;
/// Color themes.
pub mod theme;


pub use codec::Encoding;
pub use config::{Cli, Command, Config};
pub use error::{AppError, Result};
pub use library::Library;
pub use library::book::BookRecord;
pub use store::{BookStore, KeyValueStorage};
