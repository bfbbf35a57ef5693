use super::*;
use crate::page::HeadlessPage;

fn modal() -> VideoModal {
    VideoModal::new(DEFAULT_EMBED_TEMPLATE)
}

#[test]
fn open_embeds_and_locks_overflow() {
    let mut page = HeadlessPage::new();
    let mut m = modal();
    assert!(m.open(&mut page, "dQw4w9WgXcQ"));
    assert_eq!(
        page.modal_embed(),
        Some("https://www.youtube.com/embed/dQw4w9WgXcQ?rel=0&modestbranding=1&autoplay=1")
    );
    assert!(page.has_class(Element::VideoModal, "active"));
    assert!(page.body_overflow_locked());
    assert_eq!(m.open_video(), Some("dQw4w9WgXcQ"));
}

#[test]
fn close_clears_embed_and_overflow() {
    let mut page = HeadlessPage::new();
    let mut m = modal();
    m.open(&mut page, "abc");
    m.close(&mut page);
    assert_eq!(page.modal_embed(), None);
    assert!(!page.has_class(Element::VideoModal, "active"));
    assert!(!page.body_overflow_locked());
    assert_eq!(m.open_video(), None);
}

#[test]
fn escape_only_closes_when_open() {
    let mut page = HeadlessPage::new();
    let mut m = modal();
    assert!(!m.on_keydown(&mut page, "Escape"));
    assert!(page.journal().is_empty());
    m.open(&mut page, "abc");
    assert!(!m.on_keydown(&mut page, "Enter"));
    assert!(m.on_keydown(&mut page, "Escape"));
    assert_eq!(m.open_video(), None);
}

#[test]
fn clicks_inside_the_card_keep_it_open() {
    let mut page = HeadlessPage::new();
    let mut m = modal();
    m.open(&mut page, "abc");
    assert!(!m.on_click(&mut page, false));
    assert!(m.open_video().is_some());
    assert!(m.on_click(&mut page, true));
    assert!(m.open_video().is_none());
}

#[test]
fn malformed_ids_are_rejected() {
    let mut page = HeadlessPage::new();
    let mut m = modal();
    assert!(!m.open(&mut page, "abc\"><script>"));
    assert!(!m.open(&mut page, ""));
    assert!(page.journal().is_empty());
}

#[test]
fn missing_modal_is_a_no_op() {
    let mut page = HeadlessPage::new().without(Element::VideoModal);
    let mut m = modal();
    assert!(!m.open(&mut page, "abc"));
    m.close(&mut page);
    assert!(page.journal().is_empty());
}
