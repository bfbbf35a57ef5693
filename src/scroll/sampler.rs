use crate::page::{Element, Page};
use crate::runtime::FrameTask;
use crate::runtime::event_loop::EventLoop;
use crate::scroll::signal::{FrameSignals, ScrollConfig};

/// Change in effect visibility observed by one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Crossing {
    None,
    BecameVisible,
    BecameHidden,
}

/// Inline values last written, so unchanged properties are not rewritten every frame.
#[derive(Debug, Default)]
struct Applied {
    effect: Option<Option<f64>>,
    hero: Option<Option<f64>>,
    indicator: Option<Option<f64>>,
}

/// Frame-coalesced scroll sampler.
///
/// Any number of scroll events within a frame cause exactly one sample. A sample reads the
/// snapshot once, derives every signal, and only then commits them to the page.
#[derive(Debug)]
pub(crate) struct ScrollSampler {
    cfg: ScrollConfig,
    ticking: bool,
    last: Option<FrameSignals>,
    applied: Applied,
    samples: u64,
}

/// Falling signals at full value hand control back to the stylesheet.
fn inline_or_clear(v: f64) -> Option<f64> {
    if v >= 1.0 { None } else { Some(v) }
}

impl ScrollSampler {
    pub(crate) fn new(cfg: ScrollConfig) -> Self {
        Self {
            cfg,
            ticking: false,
            last: None,
            applied: Applied::default(),
            samples: 0,
        }
    }

    /// Signals of the most recent sample; `None` before the first one.
    pub(crate) fn last(&self) -> Option<&FrameSignals> {
        self.last.as_ref()
    }

    pub(crate) fn samples(&self) -> u64 {
        self.samples
    }

    /// Scroll event entry point. Returns `true` when a sample frame was requested.
    pub(crate) fn on_scroll<T>(&mut self, clock: &mut EventLoop<T, FrameTask>) -> bool {
        if self.ticking {
            return false;
        }
        clock.request_frame(FrameTask::SampleScroll);
        self.ticking = true;
        true
    }

    /// Frame callback body: snapshot, derive, commit, and report the visibility crossing.
    pub(crate) fn sample<P: Page>(&mut self, page: &mut P) -> Crossing {
        self.ticking = false;
        let signals = self.cfg.evaluate(page.scroll_snapshot());
        self.commit(page, &signals);

        let was_visible = self.last.is_some_and(|s| s.effect_visible);
        let crossing = match (was_visible, signals.effect_visible) {
            (false, true) => Crossing::BecameVisible,
            (true, false) => Crossing::BecameHidden,
            _ => Crossing::None,
        };
        self.last = Some(signals);
        self.samples += 1;
        crossing
    }

    fn commit<P: Page>(&mut self, page: &mut P, s: &FrameSignals) {
        let effect = Some(s.effect_opacity);
        if self.applied.effect != Some(effect) {
            page.set_opacity(Element::EffectContainer, effect);
            self.applied.effect = Some(effect);
        }

        let hero = inline_or_clear(s.hero_fade);
        if self.applied.hero != Some(hero) {
            page.set_opacity(Element::LogoLayer, hero);
            self.applied.hero = Some(hero);
        }

        if page.has_class(Element::ScrollIndicator, "visible") {
            let indicator = inline_or_clear(s.indicator_fade);
            if self.applied.indicator != Some(indicator) {
                page.set_opacity(Element::ScrollIndicator, indicator);
                self.applied.indicator = Some(indicator);
            }
        } else {
            self.applied.indicator = None;
        }

        if s.menu_pinned && !page.has_class(Element::MainMenu, "visible") {
            page.set_class(Element::MainMenu, "visible", true);
        }
    }

    /// Forget what was written to the indicator, e.g. after another writer cleared it.
    pub(crate) fn invalidate_indicator(&mut self) {
        self.applied.indicator = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/sampler.rs"]
mod tests;
