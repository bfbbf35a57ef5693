use super::*;
use crate::page::HeadlessPage;

#[test]
fn absent_consent_asks_for_banner() {
    let page = HeadlessPage::new();
    let mut b = ConsentBanner::new(ConsentConfig::default());
    assert!(b.boot(&page));
    assert_eq!(b.consent(), None);
}

#[test]
fn stored_choice_suppresses_banner() {
    let page = HeadlessPage::new().with_stored("cookieConsent", "rejected");
    let mut b = ConsentBanner::new(ConsentConfig::default());
    assert!(!b.boot(&page));
    assert_eq!(b.consent(), Some(Consent::Rejected));
}

#[test]
fn unrecognized_value_still_suppresses_banner() {
    let page = HeadlessPage::new().with_stored("cookieConsent", "yes-please");
    let mut b = ConsentBanner::new(ConsentConfig::default());
    assert!(!b.boot(&page));
    assert_eq!(b.consent(), None);
}

#[test]
fn unavailable_storage_reads_as_absent_and_write_still_hides() {
    let mut page = HeadlessPage::new().with_storage_unavailable();
    let mut b = ConsentBanner::new(ConsentConfig::default());
    assert!(b.boot(&page));
    b.show(&mut page);
    assert!(page.has_class(Element::CookieBanner, "visible"));
    b.choose(&mut page, Consent::Accepted);
    assert!(!page.has_class(Element::CookieBanner, "visible"));
    assert_eq!(b.consent(), Some(Consent::Accepted));
}

#[test]
fn choice_is_persisted() {
    let mut page = HeadlessPage::new();
    let mut b = ConsentBanner::new(ConsentConfig::default());
    b.boot(&page);
    b.choose(&mut page, Consent::Accepted);
    assert_eq!(page.stored("cookieConsent"), Some("accepted"));
}

#[test]
fn banner_is_not_shown_after_early_choice() {
    let mut page = HeadlessPage::new();
    let mut b = ConsentBanner::new(ConsentConfig::default());
    b.boot(&page);
    b.choose(&mut page, Consent::Rejected);
    b.show(&mut page);
    assert!(!page.has_class(Element::CookieBanner, "visible"));
}

#[test]
fn missing_banner_never_schedules() {
    let page = HeadlessPage::new().without(Element::CookieBanner);
    let mut b = ConsentBanner::new(ConsentConfig::default());
    assert!(!b.boot(&page));
}
