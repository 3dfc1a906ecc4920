//! Per-translation chapter cache
//!
//! Keyed by `(translation, book, chapter)`. A chapter that is cached is never
//! fetched again; lookups never fetch.

use crate::error::ScriptureResult;
use crate::provider::ScriptureProvider;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// Cache key of one chapter in one translation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChapterKey {
    pub translation: String,
    pub book_id: String,
    pub chapter: u32,
}

impl ChapterKey {
    pub fn new(translation: &str, book_id: &str, chapter: u32) -> Self {
        Self {
            translation: translation.to_string(),
            book_id: book_id.to_string(),
            chapter,
        }
    }
}

/// Verse texts of one chapter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterText {
    verses: BTreeMap<u32, String>,
}

impl ChapterText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, verse: u32, text: impl Into<String>) {
        self.verses.insert(verse, text.into());
    }

    pub fn verse(&self, verse: u32) -> Option<&str> {
        self.verses.get(&verse).map(String::as_str)
    }

    /// Number of the chapter's last verse
    pub fn verse_count(&self) -> u32 {
        self.last_verse().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn first_verse(&self) -> Option<u32> {
        self.verses.keys().next().copied()
    }

    pub fn last_verse(&self) -> Option<u32> {
        self.verses.keys().next_back().copied()
    }

    /// First verse number after `verse`, skipping gaps in the numbering
    pub fn verse_after(&self, verse: u32) -> Option<u32> {
        self.verses.range(verse + 1..).next().map(|(n, _)| *n)
    }

    /// Last verse number before `verse`
    pub fn verse_before(&self, verse: u32) -> Option<u32> {
        self.verses.range(..verse).next_back().map(|(n, _)| *n)
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for ChapterText {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        Self {
            verses: iter.into_iter().map(|(n, t)| (n, t.into())).collect(),
        }
    }
}

/// Memoized chapter store
#[derive(Debug, Default)]
pub struct ChapterCache {
    chapters: HashMap<ChapterKey, ChapterText>,
}

impl ChapterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached verse text, `None` on miss
    pub fn lookup_verse(&self, translation: &str, book_id: &str, chapter: u32, verse: u32) -> Option<&str> {
        self.chapter(translation, book_id, chapter)?.verse(verse)
    }

    pub fn chapter(&self, translation: &str, book_id: &str, chapter: u32) -> Option<&ChapterText> {
        self.chapters.get(&ChapterKey::new(translation, book_id, chapter))
    }

    pub fn contains(&self, translation: &str, book_id: &str, chapter: u32) -> bool {
        self.chapter(translation, book_id, chapter).is_some()
    }

    /// Returns the cached chapter, fetching and storing it first on a miss
    pub fn fetch_and_cache_chapter<P: ScriptureProvider + ?Sized>(
        &mut self,
        provider: &P,
        translation: &str,
        book_id: &str,
        chapter: u32,
    ) -> ScriptureResult<&ChapterText> {
        match self.chapters.entry(ChapterKey::new(translation, book_id, chapter)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                log::debug!("Fetching {} {} {} from {}", translation, book_id, chapter, provider.name());
                let text = provider.fetch_chapter(translation, book_id, chapter)?;
                Ok(entry.insert(text))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn clear(&mut self) {
        self.chapters.clear();
    }
}
