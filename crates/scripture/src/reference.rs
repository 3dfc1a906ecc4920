//! Verse references like "John 3:16"

use crate::books::{book_by_id, find_book, Book, ChapterRef};
use crate::error::{ScriptureError, ScriptureResult};
use std::fmt;
use std::str::FromStr;

/// A single verse position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub book: &'static Book,
    pub chapter: u32,
    pub verse: u32,
}

impl Reference {
    /// Builds a reference from a USFM book id
    pub fn from_ids(book_id: &str, chapter: u32, verse: u32) -> ScriptureResult<Self> {
        let book = book_by_id(book_id).ok_or_else(|| {
            ScriptureError::invalid_reference(book_id, "unknown book id")
        })?;
        Self::checked(book, chapter, verse, book_id)
    }

    /// Parses `"<book> <chapter>[:<verse>]"`; a missing verse means verse 1
    pub fn parse(input: &str) -> ScriptureResult<Self> {
        let trimmed = input.trim();
        let (book_part, position) = trimmed
            .rsplit_once(char::is_whitespace)
            .ok_or_else(|| ScriptureError::invalid_reference(input, "expected '<book> <chapter>[:<verse>]'"))?;

        let book = find_book(book_part)
            .ok_or_else(|| ScriptureError::invalid_reference(input, format!("unknown book '{}'", book_part.trim())))?;

        let (chapter_text, verse_text) = match position.split_once(':') {
            Some((c, v)) => (c, Some(v)),
            None => (position, None),
        };

        let chapter: u32 = chapter_text
            .parse()
            .map_err(|_| ScriptureError::invalid_reference(input, "chapter must be a number"))?;
        let verse: u32 = match verse_text {
            Some(v) => v
                .parse()
                .map_err(|_| ScriptureError::invalid_reference(input, "verse must be a number"))?,
            None => 1,
        };

        Self::checked(book, chapter, verse, input)
    }

    fn checked(book: &'static Book, chapter: u32, verse: u32, input: &str) -> ScriptureResult<Self> {
        if !book.has_chapter(chapter) {
            return Err(ScriptureError::invalid_reference(
                input,
                format!("{} has {} chapters", book.name, book.chapters),
            ));
        }
        if verse == 0 {
            return Err(ScriptureError::invalid_reference(input, "verses start at 1"));
        }
        Ok(Self {
            book,
            chapter,
            verse,
        })
    }

    pub fn chapter_ref(&self) -> ChapterRef {
        ChapterRef::new(self.book, self.chapter)
    }

    /// Dotted verse id used by verse-level provider calls, e.g. "JHN.3.16"
    pub fn verse_id(&self) -> String {
        format!("{}.{}.{}", self.book.id, self.chapter, self.verse)
    }
}

impl FromStr for Reference {
    type Err = ScriptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book.name, self.chapter, self.verse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_reference() {
        let r = Reference::parse("John 3:16").expect("valid reference");
        assert_eq!(r.book.id, "JHN");
        assert_eq!((r.chapter, r.verse), (3, 16));
        assert_eq!(r.to_string(), "John 3:16");
        assert_eq!(r.verse_id(), "JHN.3.16");
    }

    #[test]
    fn test_missing_verse_defaults_to_one() {
        let r: Reference = "ps 23".parse().expect("valid reference");
        assert_eq!(r.to_string(), "Psalms 23:1");
    }

    #[test]
    fn test_numbered_and_multi_word_books() {
        let r = Reference::parse("1 Cor 13:4").expect("valid reference");
        assert_eq!(r.book.id, "1CO");
        let r = Reference::parse("Song of Solomon 2:1").expect("valid reference");
        assert_eq!(r.book.id, "SNG");
    }

    #[test]
    fn test_parse_failures() {
        for input in ["", "John", "Hezekiah 1:1", "John three", "John 3:x", "John 22:1", "John 3:0"] {
            let err = Reference::parse(input).expect_err(input);
            assert!(matches!(err, ScriptureError::InvalidReference { .. }), "{}", input);
        }
    }

    #[test]
    fn test_from_ids() {
        let r = Reference::from_ids("rev", 22, 21).expect("valid ids");
        assert_eq!(r.to_string(), "Revelation 22:21");
        assert!(Reference::from_ids("XYZ", 1, 1).is_err());
    }
}
