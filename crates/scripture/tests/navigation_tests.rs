// Integration tests for verse navigation across chapter and book boundaries

use stagecast_scripture::*;
use stagecast_core::ScriptureStyle;

fn provider() -> MemoryProvider {
    MemoryProvider::new()
        .with_chapter("eng_kjv", "GEN", 1, &[(1, "In the beginning"), (2, "And the earth"), (31, "And God saw")])
        .with_chapter("eng_kjv", "GEN", 2, &[(1, "Thus the heavens"), (25, "And they were both naked")])
        .with_chapter("eng_kjv", "MAL", 4, &[(1, "For, behold"), (6, "And he shall turn")])
        .with_chapter("eng_kjv", "MAT", 1, &[(1, "The book of the generation"), (25, "And knew her not")])
        .with_chapter("eng_kjv", "REV", 21, &[(1, "And I saw"), (27, "And there shall in no wise")])
        .with_chapter("eng_kjv", "REV", 22, &[(1, "And he shewed me"), (20, "He which testifieth"), (21, "The grace of our Lord")])
        .with_chapter("eng_bsb", "REV", 22, &[(1, "Then the angel"), (21, "The grace of the Lord Jesus")])
}

fn lookup(nav: &mut ScriptureNavigator<MemoryProvider>, reference: &str) -> stagecast_core::ScripturePassage {
    let reference = Reference::parse(reference).expect("valid reference");
    nav.lookup(&reference, "eng_kjv", None, &ScriptureStyle::default())
        .expect("passage")
}

#[test]
fn test_backward_from_genesis_1_1_reports_beginning() {
    let mut nav = ScriptureNavigator::new(provider());
    let first = lookup(&mut nav, "Genesis 1:1");

    let outcome = nav.navigate(&first, Direction::Backward).expect("navigation");
    assert_eq!(outcome, NavOutcome::Beginning);
}

#[test]
fn test_forward_from_last_verse_of_revelation_reports_end() {
    let mut nav = ScriptureNavigator::new(provider());
    let last = lookup(&mut nav, "Revelation 22:21");

    let outcome = nav.navigate(&last, Direction::Forward).expect("navigation");
    assert_eq!(outcome, NavOutcome::End);
}

#[test]
fn test_forward_crosses_into_next_book() {
    let mut nav = ScriptureNavigator::new(provider());
    let end_of_ot = lookup(&mut nav, "Malachi 4:6");

    match nav.navigate(&end_of_ot, Direction::Forward).expect("navigation") {
        NavOutcome::Moved(p) => {
            assert_eq!(p.reference, "Matthew 1:1");
            assert_eq!(p.text, "The book of the generation");
        }
        other => panic!("expected move, got {:?}", other),
    }
}

#[test]
fn test_backward_crosses_into_previous_book() {
    let mut nav = ScriptureNavigator::new(provider());
    let start_of_nt = lookup(&mut nav, "Matthew 1:1");

    match nav.navigate(&start_of_nt, Direction::Backward).expect("navigation") {
        NavOutcome::Moved(p) => assert_eq!(p.reference, "Malachi 4:6"),
        other => panic!("expected move, got {:?}", other),
    }
}

#[test]
fn test_navigation_skips_gaps_in_verse_numbers() {
    let mut nav = ScriptureNavigator::new(provider());
    let two = lookup(&mut nav, "Genesis 1:2");

    match nav.navigate(&two, Direction::Forward).expect("navigation") {
        NavOutcome::Moved(p) => assert_eq!(p.reference, "Genesis 1:31"),
        other => panic!("expected move, got {:?}", other),
    }
}

#[test]
fn test_navigation_keeps_compare_translation_and_style() {
    let mut nav = ScriptureNavigator::new(provider());
    let style = ScriptureStyle {
        font_size: 72,
        ..ScriptureStyle::default()
    };
    let reference = Reference::parse("Rev 22:20").expect("valid reference");
    let passage = nav
        .lookup(&reference, "eng_kjv", Some("eng_bsb"), &style)
        .expect("passage");
    assert_eq!(passage.compare_text, None);
    assert_eq!(passage.bible_id2.as_deref(), Some("eng_bsb"));

    match nav.navigate(&passage, Direction::Forward).expect("navigation") {
        NavOutcome::Moved(p) => {
            assert_eq!(p.compare_text.as_deref(), Some("The grace of the Lord Jesus"));
            assert_eq!(p.compare_version.as_deref(), Some("BSB"));
            assert_eq!(p.style.font_size, 72);
        }
        other => panic!("expected move, got {:?}", other),
    }
}

#[test]
fn test_compare_translation_missing_a_book_does_not_block_navigation() {
    let mut nav = ScriptureNavigator::new(provider());
    let reference = Reference::parse("Malachi 4:6").expect("valid reference");
    let passage = nav
        .lookup(&reference, "eng_kjv", Some("eng_bsb"), &ScriptureStyle::default())
        .expect("primary text is available");
    assert_eq!(passage.text, "And he shall turn");
    assert_eq!(passage.compare_text, None);
    assert_eq!(passage.compare_version, None);

    match nav.navigate(&passage, Direction::Forward).expect("navigation") {
        NavOutcome::Moved(p) => {
            assert_eq!(p.reference, "Matthew 1:1");
            assert_eq!(p.compare_text, None);
            assert_eq!(p.bible_id2.as_deref(), Some("eng_bsb"));
        }
        other => panic!("expected move, got {:?}", other),
    }
}

#[test]
fn test_compare_translation_network_failure_is_reported() {
    let mut nav = ScriptureNavigator::new(provider());
    lookup(&mut nav, "Genesis 1:1");

    nav.provider().set_offline(true);
    let err = nav
        .lookup(&Reference::parse("Genesis 1:1").expect("valid"), "eng_kjv", Some("eng_bsb"), &ScriptureStyle::default())
        .expect_err("compare chapter cannot be fetched");
    assert!(err.is_retryable());
}

#[test]
fn test_prefetch_covers_both_translations() {
    let mut nav = ScriptureNavigator::new(provider());
    let reference = Reference::parse("Rev 22:1").expect("valid reference");
    nav.lookup(&reference, "eng_kjv", Some("eng_bsb"), &ScriptureStyle::default())
        .expect("passage");

    assert!(nav.cache().contains("eng_kjv", "REV", 21));
    // eng_bsb has no chapter 21 in this provider; the failed prefetch is not cached
    assert!(!nav.cache().contains("eng_bsb", "REV", 21));
}

#[test]
fn test_prefetch_never_refetches_cached_chapters() {
    let mut nav = ScriptureNavigator::new(provider());
    lookup(&mut nav, "Genesis 2:1");
    let fetches = nav.provider().fetch_count();

    lookup(&mut nav, "Genesis 2:1");
    assert_eq!(nav.provider().fetch_count(), fetches);
}

#[test]
fn test_lookup_failure_leaves_cache_usable() {
    let mut nav = ScriptureNavigator::new(provider());
    lookup(&mut nav, "Genesis 1:31");

    nav.provider().set_offline(true);
    let err = nav
        .lookup(&Reference::parse("John 3:16").expect("valid"), "eng_kjv", None, &ScriptureStyle::default())
        .expect_err("offline");
    assert!(err.is_retryable());

    // Cached chapters keep working offline
    let again = lookup(&mut nav, "Genesis 1:31");
    assert_eq!(again.text, "And God saw");
}
