use crate::foundation::core::Millis;
use crate::foundation::error::{StageError, StageResult};
use crate::page::{Element, Page};
use crate::runtime::TimerTask;
use crate::runtime::event_loop::EventLoop;

/// Discrete stage of page startup. Only ever moves forward.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BootPhase {
    /// Preloader on screen, content hidden.
    #[default]
    Preloading,
    /// Content displayed, hero sequence in progress, scroll still locked.
    Revealing,
    /// Scroll unlocked. Terminal.
    Interactive,
}

/// One timed boot step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootAction {
    /// Lock scroll, hide hero logo parts, write the copyright year.
    Prepare,
    /// Fade the preloader out and make it click-through.
    FadePreloader,
    /// Remove the preloader from layout.
    HidePreloader,
    /// Display the content, then fade it in, then start the hero video.
    RevealContent,
    /// Re-trigger the hero logo part animations.
    RevealHeroLogo,
    /// Bring the background grid up to its revealed opacity.
    RevealGrid,
    /// Show the menu.
    RevealMenu,
    /// Show the scroll indicator and unlock scrolling.
    Unlock,
}

impl BootAction {
    /// Steps that only exist to dismiss a preloader.
    pub fn is_dismissal(self) -> bool {
        matches!(self, Self::FadePreloader | Self::HidePreloader)
    }
}

/// Durations driving the boot plan. All in milliseconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BootTimings {
    /// Time the preloader stays fully visible.
    pub preloader_hold_ms: u64,
    /// Preloader fade-out duration before it leaves layout.
    pub preloader_fade_ms: u64,
    /// Delay between content reveal and the hero sequence.
    pub hero_delay_ms: u64,
    /// Grid reveal, relative to the hero sequence start.
    pub grid_after_hero_ms: u64,
    /// Menu reveal, relative to the hero sequence start.
    pub menu_after_hero_ms: u64,
    /// Unlock, relative to the hero sequence start.
    pub unlock_after_hero_ms: u64,
    /// Grid opacity once revealed.
    pub grid_opacity: f64,
}

impl Default for BootTimings {
    fn default() -> Self {
        Self {
            preloader_hold_ms: 3500,
            preloader_fade_ms: 800,
            hero_delay_ms: 5000,
            grid_after_hero_ms: 500,
            menu_after_hero_ms: 1000,
            unlock_after_hero_ms: 3000,
            grid_opacity: 0.8,
        }
    }
}

impl BootTimings {
    pub(crate) fn validate(&self) -> StageResult<()> {
        if !(0.0..=1.0).contains(&self.grid_opacity) {
            return Err(StageError::config("boot.grid_opacity must be in [0, 1]"));
        }
        let hero = [
            self.grid_after_hero_ms,
            self.menu_after_hero_ms,
            self.unlock_after_hero_ms,
        ];
        if hero.iter().any(|&ms| ms > self.unlock_after_hero_ms) {
            return Err(StageError::config(
                "boot.unlock_after_hero_ms must be the last hero step",
            ));
        }
        Ok(())
    }
}

/// A boot step at an absolute offset from page load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BootStep {
    pub at: Millis,
    pub action: BootAction,
}

/// Ordered boot steps, all measured from load time.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BootPlan {
    steps: Vec<BootStep>,
}

impl BootPlan {
    /// Build the plan for a page with or without a preloader.
    ///
    /// Without a preloader the dismissal steps are left out and content is revealed at load.
    pub fn build(t: &BootTimings, has_preloader: bool) -> Self {
        let mut steps = vec![BootStep {
            at: Millis::ZERO,
            action: BootAction::Prepare,
        }];

        let reveal_at = if has_preloader {
            let fade_at = Millis::ZERO.after(t.preloader_hold_ms);
            let hide_at = fade_at.after(t.preloader_fade_ms);
            steps.push(BootStep {
                at: fade_at,
                action: BootAction::FadePreloader,
            });
            steps.push(BootStep {
                at: hide_at,
                action: BootAction::HidePreloader,
            });
            hide_at
        } else {
            Millis::ZERO
        };

        let hero_at = reveal_at.after(t.hero_delay_ms);
        steps.extend([
            BootStep {
                at: reveal_at,
                action: BootAction::RevealContent,
            },
            BootStep {
                at: hero_at,
                action: BootAction::RevealHeroLogo,
            },
            BootStep {
                at: hero_at.after(t.grid_after_hero_ms),
                action: BootAction::RevealGrid,
            },
            BootStep {
                at: hero_at.after(t.menu_after_hero_ms),
                action: BootAction::RevealMenu,
            },
            BootStep {
                at: hero_at.after(t.unlock_after_hero_ms),
                action: BootAction::Unlock,
            },
        ]);
        // Stable: equal offsets keep plan order.
        steps.sort_by_key(|s| s.at);
        Self { steps }
    }

    pub fn steps(&self) -> &[BootStep] {
        &self.steps
    }

    /// When the plan reaches [`BootPhase::Interactive`].
    pub fn interactive_at(&self) -> Millis {
        self.steps
            .iter()
            .find(|s| s.action == BootAction::Unlock)
            .map_or(Millis::ZERO, |s| s.at)
    }
}

/// Runs the boot plan exactly once per page load.
#[derive(Debug)]
pub struct TimerSequencer {
    timings: BootTimings,
    phase: BootPhase,
    plan: Option<BootPlan>,
    executed: Vec<BootAction>,
}

impl TimerSequencer {
    pub(crate) fn new(timings: BootTimings) -> Self {
        Self {
            timings,
            phase: BootPhase::Preloading,
            plan: None,
            executed: Vec::new(),
        }
    }

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    /// The scheduled plan, once started.
    pub fn plan(&self) -> Option<&BootPlan> {
        self.plan.as_ref()
    }

    /// Actions run so far, in execution order.
    pub fn executed(&self) -> &[BootAction] {
        &self.executed
    }

    /// Schedule every step relative to load time. A second call is rejected.
    pub(crate) fn start<P: Page, F>(
        &mut self,
        page: &P,
        clock: &mut EventLoop<TimerTask, F>,
    ) -> StageResult<&BootPlan> {
        if self.plan.is_some() {
            return Err(StageError::validation("boot sequence already started"));
        }
        let has_preloader = page.has_element(Element::Preloader);
        let plan = BootPlan::build(&self.timings, has_preloader);
        for step in plan.steps() {
            clock.schedule_at(step.at, TimerTask::Boot(step.action));
        }
        tracing::debug!(
            has_preloader,
            interactive_at = %plan.interactive_at(),
            "boot sequence scheduled"
        );
        Ok(self.plan.insert(plan))
    }

    /// Run one step. Returns the new phase when the step advanced it.
    pub(crate) fn run<P: Page>(&mut self, action: BootAction, page: &mut P) -> Option<BootPhase> {
        self.executed.push(action);
        match action {
            BootAction::Prepare => {
                if present(page, Element::Body, action) {
                    page.set_class(Element::Body, "no-scroll", true);
                }
                if present(page, Element::HeroLogo, action) {
                    page.hide_animated_parts(Element::HeroLogo);
                }
                if present(page, Element::CopyrightYear, action)
                    && let Some(year) = page.current_year()
                {
                    page.set_text(Element::CopyrightYear, &year.to_string());
                }
                None
            }
            BootAction::FadePreloader => {
                if present(page, Element::Preloader, action) {
                    page.set_opacity(Element::Preloader, Some(0.0));
                    page.set_pointer_events(Element::Preloader, false);
                }
                None
            }
            BootAction::HidePreloader => {
                if present(page, Element::Preloader, action) {
                    page.set_displayed(Element::Preloader, false);
                }
                None
            }
            BootAction::RevealContent => {
                if present(page, Element::MainContent, action) {
                    // Displayed first so the opacity change can transition.
                    page.set_displayed(Element::MainContent, true);
                    page.set_opacity(Element::MainContent, Some(1.0));
                }
                if present(page, Element::HeroVideo, action)
                    && let Err(err) = page.play_media(Element::HeroVideo)
                {
                    tracing::warn!(error = %err, "hero video autoplay rejected");
                }
                self.advance(BootPhase::Revealing)
            }
            BootAction::RevealHeroLogo => {
                if present(page, Element::HeroLogo, action) {
                    page.restart_animations(Element::HeroLogo);
                }
                None
            }
            BootAction::RevealGrid => {
                if present(page, Element::GridLayer, action) {
                    page.set_opacity(Element::GridLayer, Some(self.timings.grid_opacity));
                }
                None
            }
            BootAction::RevealMenu => {
                if present(page, Element::MainMenu, action) {
                    page.set_class(Element::MainMenu, "visible", true);
                }
                None
            }
            BootAction::Unlock => {
                if present(page, Element::ScrollIndicator, action) {
                    page.set_class(Element::ScrollIndicator, "visible", true);
                    page.set_opacity(Element::ScrollIndicator, None);
                }
                if present(page, Element::Body, action) {
                    page.set_class(Element::Body, "no-scroll", false);
                }
                self.advance(BootPhase::Interactive)
            }
        }
    }

    fn advance(&mut self, to: BootPhase) -> Option<BootPhase> {
        if to <= self.phase {
            return None;
        }
        tracing::debug!(from = ?self.phase, to = ?to, "boot phase advanced");
        self.phase = to;
        Some(to)
    }
}

fn present<P: Page>(page: &P, el: Element, action: BootAction) -> bool {
    let ok = page.has_element(el);
    if !ok {
        tracing::debug!(?el, ?action, "boot target missing, skipped");
    }
    ok
}

#[cfg(test)]
#[path = "../../tests/unit/boot/sequencer.rs"]
mod tests;
