//! Durable key/value storage for the bilingual site content store.
//!
//! A storage namespace maps stable string keys to text values, the same
//! contract a browser's `localStorage` offers. The content tree is written
//! under one key as a single serialized blob; the cookie-consent flag lives
//! under another.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKvStore`] -- `HashMap`-based store with an optional byte quota
//! - [`FileKvStore`] -- one file per key under a directory, replaced atomically
//!
//! # Design Rules
//!
//! 1. A `set` either fully replaces the stored value or fails; readers never
//!    see a partially written value.
//! 2. Keys are restricted to `[A-Za-z0-9._-]` so that every backend can map
//!    them to a file name.
//! 3. The store never interprets values.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileKvStore;
pub use memory::InMemoryKvStore;
pub use traits::{validate_key, KvStore};
