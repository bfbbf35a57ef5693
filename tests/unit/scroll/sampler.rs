use super::*;
use crate::foundation::core::Millis;
use crate::page::{HeadlessPage, PageOp};
use crate::runtime::event_loop::Due;

type Clock = EventLoop<(), FrameTask>;

fn run_frames(sampler: &mut ScrollSampler, clock: &mut Clock, page: &mut HeadlessPage, until: u64) -> Vec<Crossing> {
    let mut out = Vec::new();
    while let Some(due) = clock.pop_due(Millis(until)) {
        if let Due::Frame(cbs) = due {
            for (_, task) in cbs {
                assert_eq!(task, FrameTask::SampleScroll);
                out.push(sampler.sample(page));
            }
        }
    }
    out
}

#[test]
fn burst_of_scroll_events_samples_once_per_frame() {
    let mut clock = Clock::new(16).unwrap();
    let mut page = HeadlessPage::new();
    let mut sampler = ScrollSampler::new(ScrollConfig::default());

    assert!(sampler.on_scroll(&mut clock));
    for _ in 0..20 {
        assert!(!sampler.on_scroll(&mut clock));
    }
    run_frames(&mut sampler, &mut clock, &mut page, 100);
    assert_eq!(sampler.samples(), 1);

    assert!(sampler.on_scroll(&mut clock));
    run_frames(&mut sampler, &mut clock, &mut page, 200);
    assert_eq!(sampler.samples(), 2);
}

#[test]
fn no_signals_exist_before_first_sample() {
    let sampler = ScrollSampler::new(ScrollConfig::default());
    assert!(sampler.last().is_none());
}

#[test]
fn crossings_are_reported_once_per_edge() {
    let mut page = HeadlessPage::new();
    let mut sampler = ScrollSampler::new(ScrollConfig::default());
    assert_eq!(sampler.sample(&mut page), Crossing::None);

    page.set_scroll_offset(900.0);
    assert_eq!(sampler.sample(&mut page), Crossing::BecameVisible);
    page.set_scroll_offset(1000.0);
    assert_eq!(sampler.sample(&mut page), Crossing::None);

    page.set_scroll_offset(10.0);
    assert_eq!(sampler.sample(&mut page), Crossing::BecameHidden);
    page.set_scroll_offset(0.0);
    assert_eq!(sampler.sample(&mut page), Crossing::None);
}

#[test]
fn unchanged_values_are_not_rewritten() {
    let mut page = HeadlessPage::new();
    let mut sampler = ScrollSampler::new(ScrollConfig::default());
    sampler.sample(&mut page);
    let first = page.journal().len();
    sampler.sample(&mut page);
    assert_eq!(page.journal().len(), first);
}

#[test]
fn indicator_is_only_driven_while_visible() {
    let mut page = HeadlessPage::new();
    let mut sampler = ScrollSampler::new(ScrollConfig::default());
    page.set_scroll_offset(125.0);
    sampler.sample(&mut page);
    assert_eq!(page.opacity(Element::ScrollIndicator), None);

    page.set_class(Element::ScrollIndicator, "visible", true);
    page.set_scroll_offset(126.0);
    sampler.sample(&mut page);
    let v = page.opacity(Element::ScrollIndicator).unwrap();
    assert!((v - (1.0 - 76.0 / 150.0)).abs() < 1e-12);

    page.set_scroll_offset(0.0);
    sampler.sample(&mut page);
    assert_eq!(page.opacity(Element::ScrollIndicator), None);
}

#[test]
fn menu_is_pinned_once() {
    let mut page = HeadlessPage::new();
    let mut sampler = ScrollSampler::new(ScrollConfig::default());
    page.set_scroll_offset(300.0);
    sampler.sample(&mut page);
    page.set_scroll_offset(400.0);
    sampler.sample(&mut page);
    let pins = page.count_ops(|op| {
        matches!(op, PageOp::Class { el: Element::MainMenu, class, on: true } if class == "visible")
    });
    assert_eq!(pins, 1);
}

#[test]
fn all_signals_commit_from_one_snapshot() {
    let mut page = HeadlessPage::new();
    let mut sampler = ScrollSampler::new(ScrollConfig::default());
    page.set_scroll_offset(700.0);
    sampler.sample(&mut page);
    let s = *sampler.last().unwrap();
    assert_eq!(s.snapshot.offset, 700.0);
    assert_eq!(page.opacity(Element::EffectContainer), Some(s.effect_opacity));
    assert_eq!(page.opacity(Element::LogoLayer), Some(s.hero_fade));
}
