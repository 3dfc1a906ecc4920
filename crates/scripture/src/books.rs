// FILE: crates/scripture/src/books.rs
//! Canonical book ordering and chapter-level navigation

/// A book of the 66-book Protestant canon
#[derive(Debug, PartialEq, Eq)]
pub struct Book {
    /// USFM id, e.g. "JHN"
    pub id: &'static str,
    pub name: &'static str,
    /// Number of chapters
    pub chapters: u32,
    /// Accepted short forms, besides the id and the full name
    pub abbreviations: &'static [&'static str],
}

macro_rules! book {
    ($id:literal, $name:literal, $chapters:literal, [$($abbr:literal),*]) => {
        Book {
            id: $id,
            name: $name,
            chapters: $chapters,
            abbreviations: &[$($abbr),*],
        }
    };
}

/// All books in canonical order
pub static BOOKS: [Book; 66] = [
    book!("GEN", "Genesis", 50, ["Gen", "Ge", "Gn"]),
    book!("EXO", "Exodus", 40, ["Exod", "Ex"]),
    book!("LEV", "Leviticus", 27, ["Lev", "Lv"]),
    book!("NUM", "Numbers", 36, ["Num", "Nm"]),
    book!("DEU", "Deuteronomy", 34, ["Deut", "Dt"]),
    book!("JOS", "Joshua", 24, ["Josh"]),
    book!("JDG", "Judges", 21, ["Judg", "Jdgs"]),
    book!("RUT", "Ruth", 4, ["Rth", "Ru"]),
    book!("1SA", "1 Samuel", 31, ["1 Sam", "1 Sm"]),
    book!("2SA", "2 Samuel", 24, ["2 Sam", "2 Sm"]),
    book!("1KI", "1 Kings", 22, ["1 Kgs", "1 Kin"]),
    book!("2KI", "2 Kings", 25, ["2 Kgs", "2 Kin"]),
    book!("1CH", "1 Chronicles", 29, ["1 Chr", "1 Chron"]),
    book!("2CH", "2 Chronicles", 36, ["2 Chr", "2 Chron"]),
    book!("EZR", "Ezra", 10, ["Ezr"]),
    book!("NEH", "Nehemiah", 13, ["Neh"]),
    book!("EST", "Esther", 10, ["Esth"]),
    book!("JOB", "Job", 42, ["Jb"]),
    book!("PSA", "Psalms", 150, ["Ps", "Psalm", "Psa", "Pss"]),
    book!("PRO", "Proverbs", 31, ["Prov", "Prv", "Pr"]),
    book!("ECC", "Ecclesiastes", 12, ["Eccl", "Eccles", "Qoh"]),
    book!("SNG", "Song of Solomon", 8, ["Song", "Song of Songs", "SOS", "Cant"]),
    book!("ISA", "Isaiah", 66, ["Isa", "Is"]),
    book!("JER", "Jeremiah", 52, ["Jer", "Jr"]),
    book!("LAM", "Lamentations", 5, ["Lam"]),
    book!("EZK", "Ezekiel", 48, ["Ezek", "Eze"]),
    book!("DAN", "Daniel", 12, ["Dan", "Dn"]),
    book!("HOS", "Hosea", 14, ["Hos"]),
    book!("JOL", "Joel", 3, ["Jl"]),
    book!("AMO", "Amos", 9, ["Am"]),
    book!("OBA", "Obadiah", 1, ["Obad", "Ob"]),
    book!("JON", "Jonah", 4, ["Jnh"]),
    book!("MIC", "Micah", 7, ["Mic"]),
    book!("NAM", "Nahum", 3, ["Nah"]),
    book!("HAB", "Habakkuk", 3, ["Hab"]),
    book!("ZEP", "Zephaniah", 3, ["Zeph"]),
    book!("HAG", "Haggai", 2, ["Hag"]),
    book!("ZEC", "Zechariah", 14, ["Zech"]),
    book!("MAL", "Malachi", 4, ["Mal"]),
    book!("MAT", "Matthew", 28, ["Matt", "Mt"]),
    book!("MRK", "Mark", 16, ["Mk", "Mar"]),
    book!("LUK", "Luke", 24, ["Lk", "Luk"]),
    book!("JHN", "John", 21, ["Jn", "Joh"]),
    book!("ACT", "Acts", 28, ["Ac"]),
    book!("ROM", "Romans", 16, ["Rom", "Rm"]),
    book!("1CO", "1 Corinthians", 16, ["1 Cor"]),
    book!("2CO", "2 Corinthians", 13, ["2 Cor"]),
    book!("GAL", "Galatians", 6, ["Gal"]),
    book!("EPH", "Ephesians", 6, ["Eph"]),
    book!("PHP", "Philippians", 4, ["Phil", "Php"]),
    book!("COL", "Colossians", 4, ["Col"]),
    book!("1TH", "1 Thessalonians", 5, ["1 Thess", "1 Th"]),
    book!("2TH", "2 Thessalonians", 3, ["2 Thess", "2 Th"]),
    book!("1TI", "1 Timothy", 6, ["1 Tim"]),
    book!("2TI", "2 Timothy", 4, ["2 Tim"]),
    book!("TIT", "Titus", 3, ["Tit"]),
    book!("PHM", "Philemon", 1, ["Philem", "Phm"]),
    book!("HEB", "Hebrews", 13, ["Heb"]),
    book!("JAS", "James", 5, ["Jas", "Jm"]),
    book!("1PE", "1 Peter", 5, ["1 Pet", "1 Pt"]),
    book!("2PE", "2 Peter", 3, ["2 Pet", "2 Pt"]),
    book!("1JN", "1 John", 5, ["1 Jn", "1 Jhn"]),
    book!("2JN", "2 John", 1, ["2 Jn", "2 Jhn"]),
    book!("3JN", "3 John", 1, ["3 Jn", "3 Jhn"]),
    book!("JUD", "Jude", 1, ["Jud", "Jd"]),
    book!("REV", "Revelation", 22, ["Rev", "Rv", "Apocalypse"]),
];

impl Book {
    /// Position in canonical order (0-based)
    pub fn index(&self) -> usize {
        BOOKS.iter().position(|b| b.id == self.id).unwrap_or(0)
    }

    /// The book that follows this one, if any
    pub fn next(&self) -> Option<&'static Book> {
        BOOKS.get(self.index() + 1)
    }

    /// The book that precedes this one, if any
    pub fn previous(&self) -> Option<&'static Book> {
        self.index().checked_sub(1).and_then(|idx| BOOKS.get(idx))
    }

    pub fn has_chapter(&self, chapter: u32) -> bool {
        (1..=self.chapters).contains(&chapter)
    }

    fn matches(&self, normalized: &str) -> bool {
        normalize(self.id) == normalized
            || normalize(self.name) == normalized
            || self.abbreviations.iter().any(|a| normalize(a) == normalized)
    }
}

/// Looks up a book by USFM id (case-insensitive)
pub fn book_by_id(id: &str) -> Option<&'static Book> {
    BOOKS.iter().find(|b| b.id.eq_ignore_ascii_case(id))
}

/// Looks up a book by id, full name or abbreviation
///
/// Case, whitespace and periods are ignored, so "1 Cor.", "1cor" and
/// "1CO" all resolve to 1 Corinthians.
pub fn find_book(query: &str) -> Option<&'static Book> {
    let normalized = normalize(query);
    if normalized.is_empty() {
        return None;
    }
    BOOKS.iter().find(|b| b.matches(&normalized))
}

pub fn first_book() -> &'static Book {
    &BOOKS[0]
}

pub fn last_book() -> &'static Book {
    &BOOKS[BOOKS.len() - 1]
}

/// A chapter position within the canon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterRef {
    pub book: &'static Book,
    pub chapter: u32,
}

impl ChapterRef {
    pub fn new(book: &'static Book, chapter: u32) -> Self {
        Self { book, chapter }
    }

    /// Next chapter, crossing into the next book's chapter 1
    pub fn next(&self) -> Option<ChapterRef> {
        if self.chapter < self.book.chapters {
            return Some(Self::new(self.book, self.chapter + 1));
        }
        self.book.next().map(|b| Self::new(b, 1))
    }

    /// Previous chapter, crossing into the previous book's last chapter
    pub fn previous(&self) -> Option<ChapterRef> {
        if self.chapter > 1 {
            return Some(Self::new(self.book, self.chapter - 1));
        }
        self.book.previous().map(|b| Self::new(b, b.chapters))
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .flat_map(char::to_lowercase)
        .collect()
}
