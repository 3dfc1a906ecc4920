//! Scripture lookup for Stagecast
//!
//! Parses verse references, caches chapters per translation, and steps
//! verse by verse across chapter and book boundaries. Text comes from a
//! [`ScriptureProvider`]: [`HelloAoProvider`] over HTTP, or
//! [`MemoryProvider`] for tests and offline use.

pub mod books;
mod cache;
mod error;
mod helloao;
mod navigator;
mod provider;
mod reference;
mod retry;

pub use books::{book_by_id, find_book, Book, ChapterRef, BOOKS};
pub use cache::{ChapterCache, ChapterKey, ChapterText};
pub use error::{ScriptureError, ScriptureResult};
pub use helloao::HelloAoProvider;
pub use navigator::{Direction, NavOutcome, ScriptureNavigator};
pub use provider::{ChapterInfo, MemoryProvider, ScriptureProvider};
pub use reference::Reference;
pub use retry::{with_retry, RetryPolicy};
