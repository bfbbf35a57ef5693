use crate::boot::{BootAction, BootPhase, TimerSequencer};
use crate::config::StageConfig;
use crate::foundation::core::Millis;
use crate::foundation::error::StageResult;
use crate::overlay::consent::{Consent, ConsentBanner};
use crate::overlay::menu::MobileMenu;
use crate::overlay::modal::VideoModal;
use crate::page::{Element, Page, ScrollBehavior};
use crate::render::gate::{GateState, RenderGate};
use crate::render::grid::layout_grid;
use crate::render::resize::ResizeDebounce;
use crate::router::deep_link::{DeepLink, DeepLinkState, DeepLinkTrigger};
use crate::router::routes::normalize_path;
use crate::router::scroll_router::{NavOutcome, NavigationEvent, ScrollRouter};
use crate::runtime::event_loop::{Due, EventLoop, FrameHandle};
use crate::runtime::{FrameTask, TimerTask};
use crate::scroll::sampler::{Crossing, ScrollSampler};
use crate::scroll::signal::FrameSignals;

/// Presentation orchestrator for one page load.
///
/// Owns the host page and a deterministic clock. Host events (`on_*`) only record intent or
/// request frames; timed work happens while the clock is advanced with [`Stage::advance_to`].
#[derive(Debug)]
pub struct Stage<P: Page> {
    page: P,
    cfg: StageConfig,
    clock: EventLoop<TimerTask, FrameTask>,
    boot: TimerSequencer,
    sampler: ScrollSampler,
    gate: RenderGate,
    resize: ResizeDebounce,
    router: ScrollRouter,
    deep_link: DeepLink,
    modal: VideoModal,
    menu: MobileMenu,
    consent: ConsentBanner,
}

/// Point-in-time summary of a stage, for logs and the CLI.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StageReport {
    pub now: Millis,
    pub phase: BootPhase,
    pub executed: Vec<BootAction>,
    pub gate: GateState,
    pub loops_started: u64,
    pub frames_drawn: u64,
    pub samples: u64,
    pub signals: Option<FrameSignals>,
    pub deep_link: DeepLinkState,
    pub navigations: u64,
    /// Timers still scheduled.
    pub pending_timers: usize,
    pub location: String,
    pub consent: Option<Consent>,
    pub video: Option<String>,
    pub menu_open: bool,
}

impl<P: Page> Stage<P> {
    /// Validate `config`, schedule the boot sequence, and wire every component to `page`.
    ///
    /// Only configuration errors are returned. Host failures degrade their own feature.
    #[tracing::instrument(skip_all, fields(path = %page.location_path()))]
    pub fn load(page: P, config: StageConfig) -> StageResult<Self> {
        config.validate()?;
        let mut clock = EventLoop::new(config.frame_interval_ms)?;
        let mut boot = TimerSequencer::new(config.boot.clone());
        boot.start(&page, &mut clock)?;

        let mut stage = Self {
            sampler: ScrollSampler::new(config.scroll.clone()),
            gate: RenderGate::new(),
            resize: ResizeDebounce::new(config.resize_debounce_ms),
            router: ScrollRouter::new(config.routes.clone(), config.header_offset),
            deep_link: DeepLink::inactive(),
            modal: VideoModal::new(config.modal_embed_template.clone()),
            menu: MobileMenu::default(),
            consent: ConsentBanner::new(config.consent.clone()),
            page,
            cfg: config,
            clock,
            boot,
        };

        if stage.consent.boot(&stage.page) {
            let delay = stage.consent.config().banner_delay_ms;
            stage.clock.schedule_in(delay, TimerTask::ShowConsentBanner);
        }
        stage.init_render();
        stage.arm_deep_link();
        // Baseline sample so signals exist before the first scroll event.
        stage.sampler.on_scroll(&mut stage.clock);
        Ok(stage)
    }

    fn init_render(&mut self) {
        match self.page.acquire_render_context() {
            Ok(()) => {
                let vp = self.page.viewport();
                self.page.resize_canvas(vp);
            }
            Err(err) => {
                tracing::error!(error = %err, "background effect disabled");
                self.gate = RenderGate::unavailable();
            }
        }
        self.render_grid();
    }

    fn render_grid(&mut self) {
        if !self.page.has_element(Element::GridLayer) {
            return;
        }
        let cells = layout_grid(self.page.viewport(), &self.cfg.grid);
        self.page.render_grid(&cells);
    }

    fn arm_deep_link(&mut self) {
        let location = self.page.location_path();
        let path = normalize_path(&location);
        let mapped = self.router.table().resolve(path).is_some_and(|r| !r.is_root());
        if !mapped {
            return;
        }
        tracing::debug!(path, "deep link waiting for ready");
        self.deep_link = DeepLink::waiting(path);
        self.clock.schedule_at(
            Millis::ZERO.after(self.cfg.deep_link.deadline_ms),
            TimerTask::DeepLinkDeadline,
        );
    }

    /// Run every timer and frame due up to `until`. Returns the number of units dispatched.
    pub fn advance_to(&mut self, until: Millis) -> usize {
        let mut dispatched = 0;
        while let Some(due) = self.clock.pop_due(until) {
            match due {
                Due::Timer(task) => self.on_timer(task),
                Due::Frame(callbacks) => self.on_frame(callbacks),
            }
            dispatched += 1;
        }
        dispatched
    }

    pub fn advance_by(&mut self, delay_ms: u64) -> usize {
        let until = self.clock.now().after(delay_ms);
        self.advance_to(until)
    }

    /// Host-paced step: run the timers due by `now`, then at most one frame.
    ///
    /// Browser hosts call this from their own animation frames, so a throttled tab resumes with
    /// one frame rather than replaying every missed one.
    pub fn tick(&mut self, now: Millis) -> usize {
        let mut dispatched = self.catch_up(now);
        if let Some(callbacks) = self.clock.take_frame(now) {
            self.on_frame(callbacks);
            dispatched += 1;
        }
        dispatched
    }

    /// Run the timers due by `now` and move the clock there, leaving frames pending.
    ///
    /// Hosts call this before forwarding an event so delays scheduled by the event start from
    /// the real event time.
    pub fn catch_up(&mut self, now: Millis) -> usize {
        let mut dispatched = 0;
        while let Some(task) = self.clock.pop_timer(now) {
            self.on_timer(task);
            dispatched += 1;
        }
        self.clock.rest_at(now);
        dispatched
    }

    /// Whether an animation frame has been requested.
    pub fn wants_frame(&self) -> bool {
        self.clock.pending_frames() > 0
    }

    fn on_frame(&mut self, callbacks: Vec<(FrameHandle, FrameTask)>) {
        for (handle, task) in callbacks {
            match task {
                FrameTask::SampleScroll => self.on_sample(),
                FrameTask::DrawEffect => {
                    self.gate.on_frame(handle, &mut self.clock, &mut self.page);
                }
            }
        }
    }

    fn on_timer(&mut self, task: TimerTask) {
        match task {
            TimerTask::Boot(action) => {
                let advanced = self.boot.run(action, &mut self.page);
                if advanced == Some(BootPhase::Interactive) {
                    // Unlock rewrote the indicator; resync it with the current offset.
                    self.sampler.invalidate_indicator();
                    self.sampler.on_scroll(&mut self.clock);
                    if self.deep_link.on_ready() {
                        self.clock
                            .schedule_in(self.cfg.deep_link.settle_ms, TimerTask::DeepLinkSettle);
                    }
                }
            }
            TimerTask::ShowConsentBanner => self.consent.show(&mut self.page),
            TimerTask::DeepLinkSettle => self.resolve_deep_link(DeepLinkTrigger::Ready),
            TimerTask::DeepLinkDeadline => self.resolve_deep_link(DeepLinkTrigger::Deadline),
            TimerTask::ResizeSettled(generation) => {
                if self.resize.is_current(generation) {
                    self.on_resize_settled();
                }
            }
        }
    }

    fn resolve_deep_link(&mut self, trigger: DeepLinkTrigger) {
        let Some(path) = self.deep_link.resolve(trigger) else {
            return;
        };
        if trigger == DeepLinkTrigger::Deadline {
            tracing::warn!(%path, phase = ?self.boot.phase(), "deep link forced by deadline");
        }
        self.navigate(&path, false);
    }

    fn on_sample(&mut self) {
        match self.sampler.sample(&mut self.page) {
            Crossing::BecameVisible => {
                self.gate.resume(&mut self.clock);
            }
            Crossing::BecameHidden => self.gate.pause(),
            Crossing::None => {}
        }
    }

    fn on_resize_settled(&mut self) {
        let vp = self.page.viewport();
        tracing::debug!(width = vp.width, height = vp.height, "resize settled");
        if self.gate.state() != GateState::Unavailable {
            self.page.resize_canvas(vp);
        }
        self.render_grid();
    }

    /// Host scroll event. Any number of calls within one frame produce a single sample.
    pub fn on_scroll(&mut self) {
        self.sampler.on_scroll(&mut self.clock);
    }

    /// Host resize event. The canvas and grid follow once resizes stop for the quiet period.
    pub fn on_resize(&mut self) {
        let (generation, delay) = self.resize.on_resize();
        self.clock
            .schedule_in(delay, TimerTask::ResizeSettled(generation));
        // Viewport-relative signals depend on the new height.
        self.sampler.on_scroll(&mut self.clock);
    }

    /// Back/forward: replay the current location without a new history entry.
    pub fn on_popstate(&mut self) -> NavOutcome {
        let location = self.page.location_path();
        self.navigate(&location, false)
    }

    /// Nav link click. The mobile menu closes for every link; returns `true` when the default
    /// navigation must be prevented.
    pub fn on_link_click(&mut self, href: &str) -> bool {
        self.menu.close(&mut self.page);
        if !self.router.intercepts(href) {
            return false;
        }
        self.navigate(href, true);
        true
    }

    /// Host keydown. Returns `true` when the key was consumed.
    pub fn on_keydown(&mut self, key: &str) -> bool {
        self.modal.on_keydown(&mut self.page, key)
    }

    /// Click inside the modal; `target_is_backdrop` when the modal element itself was hit.
    pub fn on_modal_click(&mut self, target_is_backdrop: bool) -> bool {
        self.modal.on_click(&mut self.page, target_is_backdrop)
    }

    pub fn open_video(&mut self, id: &str) -> bool {
        self.modal.open(&mut self.page, id)
    }

    pub fn close_video(&mut self) {
        self.modal.close(&mut self.page);
    }

    pub fn toggle_mobile_menu(&mut self) {
        self.menu.toggle(&mut self.page);
    }

    pub fn choose_consent(&mut self, consent: Consent) {
        self.consent.choose(&mut self.page, consent);
    }

    /// Scroll the document directly, as a user would.
    pub fn scroll_to_offset(&mut self, offset: f64) {
        self.page.scroll_to(offset, ScrollBehavior::Instant);
        self.on_scroll();
    }

    pub fn navigate(&mut self, path: &str, push_history: bool) -> NavOutcome {
        let event = NavigationEvent::new(path, push_history);
        let outcome = self.router.navigate(&mut self.page, &event);
        if matches!(outcome, NavOutcome::Scrolled { .. }) {
            self.on_scroll();
        }
        outcome
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn into_page(self) -> P {
        self.page
    }

    pub fn config(&self) -> &StageConfig {
        &self.cfg
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    /// When the stage next has work, if any is pending.
    pub fn next_wakeup(&self) -> Option<Millis> {
        self.clock.next_wakeup()
    }

    pub fn phase(&self) -> BootPhase {
        self.boot.phase()
    }

    pub fn boot(&self) -> &TimerSequencer {
        &self.boot
    }

    /// Signals of the latest sample.
    pub fn signals(&self) -> Option<&FrameSignals> {
        self.sampler.last()
    }

    pub fn samples(&self) -> u64 {
        self.sampler.samples()
    }

    pub fn gate(&self) -> &RenderGate {
        &self.gate
    }

    pub fn deep_link(&self) -> &DeepLinkState {
        self.deep_link.state()
    }

    pub fn router(&self) -> &ScrollRouter {
        &self.router
    }

    pub fn modal(&self) -> &VideoModal {
        &self.modal
    }

    pub fn menu(&self) -> &MobileMenu {
        &self.menu
    }

    pub fn consent(&self) -> &ConsentBanner {
        &self.consent
    }

    pub fn report(&self) -> StageReport {
        StageReport {
            now: self.clock.now(),
            phase: self.boot.phase(),
            executed: self.boot.executed().to_vec(),
            gate: self.gate.state(),
            loops_started: self.gate.loops_started(),
            frames_drawn: self.gate.frames_drawn(),
            samples: self.sampler.samples(),
            signals: self.sampler.last().copied(),
            deep_link: self.deep_link.state().clone(),
            navigations: self.router.navigations(),
            pending_timers: self.clock.pending_timers(),
            location: self.page.location_path(),
            consent: self.consent.consent(),
            video: self.modal.open_video().map(str::to_owned),
            menu_open: self.menu.is_open(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/stage.rs"]
mod tests;
