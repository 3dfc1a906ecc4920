//! Verse lookup and verse-by-verse navigation over the chapter cache
//!
//! Navigation crosses chapter and book boundaries in canonical order. After
//! every successful lookup the neighbouring chapter is prefetched when the
//! verse sits near a chapter edge, so the next step rarely has to wait on
//! the provider.

use crate::books::ChapterRef;
use crate::cache::{ChapterCache, ChapterKey};
use crate::error::{ScriptureError, ScriptureResult};
use crate::provider::ScriptureProvider;
use crate::reference::Reference;
use stagecast_core::{ScripturePassage, ScriptureStyle};

/// Verses at or below this number prefetch the previous chapter
const PREFETCH_HEAD: u32 = 3;
/// Verses this close to the chapter end prefetch the next chapter
const PREFETCH_TAIL: u32 = 2;

/// Direction of a navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    /// Signed step published with the passage so renderers animate the right way
    pub fn offset(self) -> i8 {
        match self {
            Direction::Backward => -1,
            Direction::Forward => 1,
        }
    }
}

/// Result of a navigation step
#[derive(Debug, Clone, PartialEq)]
pub enum NavOutcome {
    Moved(ScripturePassage),
    /// Already at Genesis 1:1
    Beginning,
    /// Already at the last verse of Revelation
    End,
}

/// Resolves references to passages and steps between verses
pub struct ScriptureNavigator<P: ScriptureProvider> {
    provider: P,
    cache: ChapterCache,
}

impl<P: ScriptureProvider> ScriptureNavigator<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: ChapterCache::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> &ChapterCache {
        &self.cache
    }

    /// Resolves `reference` in `translation` (and `compare`, if given)
    ///
    /// A comparison translation that lacks the verse, or the whole chapter,
    /// yields a passage without compare text rather than an error.
    pub fn lookup(
        &mut self,
        reference: &Reference,
        translation: &str,
        compare: Option<&str>,
        style: &ScriptureStyle,
    ) -> ScriptureResult<ScripturePassage> {
        let book_id = reference.book.id;
        let text = self
            .cache
            .fetch_and_cache_chapter(&self.provider, translation, book_id, reference.chapter)?
            .verse(reference.verse)
            .map(str::to_string)
            .ok_or_else(|| ScriptureError::NotFound {
                reference: reference.to_string(),
                translation: translation.to_string(),
            })?;

        let compare_text = match compare {
            Some(compare_id) => self.compare_verse(reference, compare_id)?,
            None => None,
        };

        let passage = ScripturePassage {
            reference: reference.to_string(),
            text,
            version: self.provider.translation_label(translation),
            bible_id: translation.to_string(),
            book_id: book_id.to_string(),
            chapter: reference.chapter,
            verse: reference.verse,
            compare_version: compare_text
                .as_ref()
                .and(compare)
                .map(|id| self.provider.translation_label(id)),
            bible_id2: compare.map(str::to_string),
            compare_text,
            style: style.clone(),
        };

        let mut translations = vec![translation];
        translations.extend(compare);
        self.prefetch_adjacent(reference, &translations);

        Ok(passage)
    }

    fn compare_verse(&mut self, reference: &Reference, compare_id: &str) -> ScriptureResult<Option<String>> {
        let verse = match self.cache.fetch_and_cache_chapter(
            &self.provider,
            compare_id,
            reference.book.id,
            reference.chapter,
        ) {
            Ok(chapter) => chapter.verse(reference.verse).map(str::to_string),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };
        if verse.is_none() {
            log::warn!("{} has no {}", compare_id, reference);
        }
        Ok(verse)
    }

    /// Steps one verse from `passage`, keeping its translations and style
    pub fn navigate(&mut self, passage: &ScripturePassage, direction: Direction) -> ScriptureResult<NavOutcome> {
        let current = Reference::from_ids(&passage.book_id, passage.chapter, passage.verse)?;
        let translation = passage.bible_id.as_str();

        let target = match direction {
            Direction::Backward => self.verse_before(&current, translation)?,
            Direction::Forward => self.verse_after(&current, translation)?,
        };

        let Some(target) = target else {
            log::debug!("Navigation stopped at {} ({:?})", current, direction);
            return Ok(match direction {
                Direction::Backward => NavOutcome::Beginning,
                Direction::Forward => NavOutcome::End,
            });
        };

        let moved = self.lookup(&target, translation, passage.bible_id2.as_deref(), &passage.style)?;
        Ok(NavOutcome::Moved(moved))
    }

    /// Prefetches the neighbouring chapter of a verse near a chapter edge
    ///
    /// Returns the chapters that were fetched. Failures are logged and
    /// otherwise ignored.
    pub fn prefetch_adjacent(&mut self, reference: &Reference, translations: &[&str]) -> Vec<ChapterKey> {
        let Some(primary) = translations.first() else {
            return Vec::new();
        };
        let verse_count = self
            .cache
            .chapter(primary, reference.book.id, reference.chapter)
            .map(|c| c.verse_count())
            .unwrap_or(0);

        let here = reference.chapter_ref();
        let mut neighbours = Vec::new();
        if reference.verse <= PREFETCH_HEAD {
            neighbours.extend(here.previous());
        }
        if verse_count > 0 && reference.verse + PREFETCH_TAIL > verse_count {
            neighbours.extend(here.next());
        }

        let mut fetched = Vec::new();
        for neighbour in neighbours {
            for translation in translations {
                if self.cache.contains(translation, neighbour.book.id, neighbour.chapter) {
                    continue;
                }
                match self.cache.fetch_and_cache_chapter(
                    &self.provider,
                    translation,
                    neighbour.book.id,
                    neighbour.chapter,
                ) {
                    Ok(_) => fetched.push(ChapterKey::new(translation, neighbour.book.id, neighbour.chapter)),
                    Err(e) => log::warn!(
                        "Prefetch of {} {} ({}) failed: {}",
                        neighbour.book.id,
                        neighbour.chapter,
                        translation,
                        e
                    ),
                }
            }
        }
        fetched
    }

    fn verse_before(&mut self, current: &Reference, translation: &str) -> ScriptureResult<Option<Reference>> {
        let chapter = self
            .cache
            .fetch_and_cache_chapter(&self.provider, translation, current.book.id, current.chapter)?;
        if let Some(verse) = chapter.verse_before(current.verse) {
            return Ok(Some(Reference { verse, ..*current }));
        }

        let Some(previous) = current.chapter_ref().previous() else {
            return Ok(None);
        };
        let last = self.edge_verse(previous, translation, false)?;
        Ok(Some(Reference {
            book: previous.book,
            chapter: previous.chapter,
            verse: last,
        }))
    }

    fn verse_after(&mut self, current: &Reference, translation: &str) -> ScriptureResult<Option<Reference>> {
        // A chapter the provider does not know counts as already exhausted
        match self
            .cache
            .fetch_and_cache_chapter(&self.provider, translation, current.book.id, current.chapter)
        {
            Ok(chapter) => {
                if let Some(verse) = chapter.verse_after(current.verse) {
                    return Ok(Some(Reference { verse, ..*current }));
                }
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let Some(next) = current.chapter_ref().next() else {
            return Ok(None);
        };
        let first = self.edge_verse(next, translation, true)?;
        Ok(Some(Reference {
            book: next.book,
            chapter: next.chapter,
            verse: first,
        }))
    }

    /// First (or last) verse number of a chapter
    fn edge_verse(&mut self, at: ChapterRef, translation: &str, first: bool) -> ScriptureResult<u32> {
        let chapter = self
            .cache
            .fetch_and_cache_chapter(&self.provider, translation, at.book.id, at.chapter)?;
        let edge = if first { chapter.first_verse() } else { chapter.last_verse() };
        edge.ok_or_else(|| ScriptureError::NotFound {
            reference: format!("{} {}", at.book.name, at.chapter),
            translation: translation.to_string(),
        })
    }
}
