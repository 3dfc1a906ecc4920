// FILE: src/provider.rs
// ============================================================================

use crate::cache::ChapterText;
use crate::error::{ScriptureError, ScriptureResult};
use crate::reference::Reference;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Source of scripture text
///
/// Implementations convert every transport failure into a typed
/// [`ScriptureError`]; nothing panics across this boundary.
pub trait ScriptureProvider: Send + Sync {
    /// Short provider name used in logs and error messages
    fn name(&self) -> &str;

    /// Fetches every verse of one chapter
    fn fetch_chapter(&self, translation: &str, book_id: &str, chapter: u32) -> ScriptureResult<ChapterText>;

    /// Fetches a single verse
    fn fetch_verse(&self, translation: &str, reference: &Reference) -> ScriptureResult<String> {
        let chapter = self.fetch_chapter(translation, reference.book.id, reference.chapter)?;
        chapter
            .verse(reference.verse)
            .map(str::to_string)
            .ok_or_else(|| ScriptureError::NotFound {
                reference: reference.to_string(),
                translation: translation.to_string(),
            })
    }

    /// Fetches the shape of a chapter without keeping its text
    fn fetch_chapter_info(&self, translation: &str, book_id: &str, chapter: u32) -> ScriptureResult<ChapterInfo> {
        let text = self.fetch_chapter(translation, book_id, chapter)?;
        Ok(ChapterInfo {
            book_id: book_id.to_string(),
            chapter,
            verse_count: text.verse_count(),
        })
    }

    /// Display label of a translation id, e.g. "eng_kjv" -> "KJV"
    fn translation_label(&self, translation: &str) -> String {
        translation
            .rsplit('_')
            .next()
            .unwrap_or(translation)
            .to_uppercase()
    }
}

/// Chapter metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterInfo {
    pub book_id: String,
    pub chapter: u32,
    pub verse_count: u32,
}

/// In-memory provider for tests and offline use
#[derive(Debug, Default)]
pub struct MemoryProvider {
    chapters: HashMap<(String, String, u32), ChapterText>,
    fetches: AtomicUsize,
    offline: AtomicBool,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a chapter (builder style)
    pub fn with_chapter(mut self, translation: &str, book_id: &str, chapter: u32, verses: &[(u32, &str)]) -> Self {
        self.insert_chapter(translation, book_id, chapter, verses.iter().copied().collect());
        self
    }

    pub fn insert_chapter(&mut self, translation: &str, book_id: &str, chapter: u32, text: ChapterText) {
        self.chapters
            .insert((translation.to_string(), book_id.to_string(), chapter), text);
    }

    /// Number of chapter fetches served or attempted
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Makes every subsequent fetch fail with a network error
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

impl ScriptureProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_chapter(&self, translation: &str, book_id: &str, chapter: u32) -> ScriptureResult<ChapterText> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ScriptureError::Network("provider offline".to_string()));
        }
        self.chapters
            .get(&(translation.to_string(), book_id.to_string(), chapter))
            .cloned()
            .ok_or_else(|| ScriptureError::NotFound {
                reference: format!("{} {}", book_id, chapter),
                translation: translation.to_string(),
            })
    }
}
