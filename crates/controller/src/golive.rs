//! Go-live decision
//!
//! Whether publishing the staged item would change anything the audience
//! sees. Evaluated before every publish and used to gate the action.

use stagecast_core::ContentItem;

/// Decides whether the staged item may be published over `live`
pub fn can_go_live(staged: Option<&ContentItem>, live: &ContentItem, is_synced: bool) -> bool {
    let staged = match staged {
        None | Some(ContentItem::Standby) => return !live.is_standby(),
        Some(item) => item,
    };

    if live.is_standby() || staged.kind() != live.kind() {
        return true;
    }

    match (staged, live) {
        (ContentItem::SingleImage(s), ContentItem::SingleImage(l)) => s.path != l.path,
        (ContentItem::SingleVideo(s), ContentItem::SingleVideo(l))
        | (ContentItem::SingleAudio(s), ContentItem::SingleAudio(l)) => {
            s.path != l.path || !is_synced
        }
        (ContentItem::Slideshow(_), ContentItem::Slideshow(_)) => !is_synced,
        (ContentItem::Scripture(s), ContentItem::Scripture(l)) => !s.presents_same_as(l),
        (ContentItem::QuickSlide(s), ContentItem::QuickSlide(l)) => s.id != l.id,
        _ => true,
    }
}

/// Whether published content needs ongoing sync with its staged copy
///
/// Everything except a still image is continuous.
pub fn is_continuous(item: &ContentItem) -> bool {
    !matches!(item, ContentItem::SingleImage(_) | ContentItem::Standby)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagecast_core::{
        QueueEntry, QuickSlide, ScripturePassage, ScriptureStyle, Slideshow, SlideshowId,
        SlideshowSettings,
    };

    fn passage(reference: &str) -> ContentItem {
        ContentItem::Scripture(ScripturePassage {
            reference: reference.to_string(),
            text: "text".to_string(),
            version: "KJV".to_string(),
            bible_id: "eng_kjv".to_string(),
            book_id: "JHN".to_string(),
            chapter: 3,
            verse: 16,
            compare_text: None,
            compare_version: None,
            bible_id2: None,
            style: ScriptureStyle::default(),
        })
    }

    fn show() -> ContentItem {
        ContentItem::Slideshow(Slideshow::new(
            SlideshowId::from("s"),
            vec![QueueEntry::image("/m/a.jpg")],
            SlideshowSettings::default(),
        ))
    }

    #[test]
    fn test_nothing_staged_returns_to_standby() {
        let standby = ContentItem::Standby;
        let image = ContentItem::image("/m/a.jpg");
        assert!(!can_go_live(None, &standby, false));
        assert!(can_go_live(None, &image, false));
        assert!(can_go_live(Some(&ContentItem::Standby), &image, false));
        assert!(!can_go_live(Some(&ContentItem::Standby), &standby, false));
    }

    #[test]
    fn test_anything_goes_over_standby_or_other_kind() {
        let image = ContentItem::image("/m/a.jpg");
        assert!(can_go_live(Some(&image), &ContentItem::Standby, true));
        assert!(can_go_live(Some(&image), &ContentItem::video("/m/a.jpg"), true));
    }

    #[test]
    fn test_images_compare_paths() {
        let a = ContentItem::image("/m/a.jpg");
        assert!(!can_go_live(Some(&a), &a.clone(), false));
        assert!(can_go_live(Some(&a), &ContentItem::image("/m/b.jpg"), false));
    }

    #[test]
    fn test_media_needs_path_change_or_lost_sync() {
        let v = ContentItem::video("/m/b.mp4");
        assert!(!can_go_live(Some(&v), &v.clone(), true));
        assert!(can_go_live(Some(&v), &v.clone(), false));
        assert!(can_go_live(Some(&v), &ContentItem::video("/m/c.mp4"), true));

        let a = ContentItem::audio("/m/c.mp3");
        assert!(!can_go_live(Some(&a), &a.clone(), true));
    }

    #[test]
    fn test_slideshow_follows_sync() {
        assert!(!can_go_live(Some(&show()), &show(), true));
        assert!(can_go_live(Some(&show()), &show(), false));
    }

    #[test]
    fn test_scripture_compares_presentation() {
        let live = passage("John 3:16");
        assert!(!can_go_live(Some(&passage("John 3:16")), &live, false));
        assert!(can_go_live(Some(&passage("John 3:17")), &live, true));

        let mut restyled = passage("John 3:16");
        if let ContentItem::Scripture(p) = &mut restyled {
            p.style.font_color = "#FFFF00".to_string();
        }
        assert!(can_go_live(Some(&restyled), &live, true));
    }

    #[test]
    fn test_quick_slides_compare_ids() {
        let a = ContentItem::QuickSlide(QuickSlide::announcement("qs-1", "Welcome", ""));
        let edited = ContentItem::QuickSlide(QuickSlide::announcement("qs-1", "Welcome!", ""));
        let b = ContentItem::QuickSlide(QuickSlide::announcement("qs-2", "Welcome", ""));
        assert!(!can_go_live(Some(&edited), &a, false));
        assert!(can_go_live(Some(&b), &a, true));
    }

    #[test]
    fn test_continuity() {
        assert!(!is_continuous(&ContentItem::image("/m/a.jpg")));
        assert!(is_continuous(&ContentItem::video("/m/b.mp4")));
        assert!(is_continuous(&show()));
        assert!(is_continuous(&passage("John 3:16")));
    }
}
