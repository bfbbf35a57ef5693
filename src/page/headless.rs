use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::core::{ScrollSnapshot, Viewport};
use crate::foundation::error::{StageError, StageResult};
use crate::page::{Element, Page, ScrollBehavior};
use crate::render::grid::GridCell;

/// One recorded host mutation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PageOp {
    Opacity { el: Element, value: Option<f64> },
    Display { el: Element, shown: bool },
    PointerEvents { el: Element, enabled: bool },
    Class { el: Element, class: String, on: bool },
    Text { el: Element, text: String },
    HideAnimatedParts { el: Element },
    RestartAnimations { el: Element },
    PlayMedia { el: Element, ok: bool },
    BodyOverflow { locked: bool },
    ScrollTo { top: f64, smooth: bool },
    PushHistory { path: String },
    StorageSet { key: String, value: String, ok: bool },
    ResizeCanvas { width: f64, height: f64 },
    DrawEffect,
    RenderGrid { cells: usize },
    ModalEmbed { src: Option<String> },
}

#[derive(Clone, Debug, Default)]
struct ElementState {
    opacity: Option<f64>,
    displayed: Option<bool>,
    pointer_events: Option<bool>,
    classes: BTreeSet<String>,
    text: Option<String>,
}

/// In-memory [`Page`] host that records every mutation.
///
/// Smooth scrolls settle instantly. Storage, autoplay, and the render context can be made to
/// fail so degraded paths can be exercised.
#[derive(Clone, Debug)]
pub struct HeadlessPage {
    present: BTreeSet<Element>,
    elements: BTreeMap<Element, ElementState>,
    sections: BTreeMap<String, f64>,
    scroll_offset: f64,
    viewport: Viewport,
    history: Vec<String>,
    history_index: usize,
    storage: Option<BTreeMap<String, String>>,
    autoplay_allowed: bool,
    render_context_available: bool,
    year: Option<i32>,
    body_overflow_locked: bool,
    modal_embed: Option<String>,
    grid: Vec<GridCell>,
    canvas_size: Option<Viewport>,
    draws: u64,
    journal: Vec<PageOp>,
}

impl Default for HeadlessPage {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPage {
    /// A complete page loaded at `/` with the stock section layout.
    pub fn new() -> Self {
        let sections = [
            ("hero-layers", 0.0),
            ("about-layer", 1200.0),
            ("music-layer", 2400.0),
            ("video-content-layer", 3600.0),
            ("contact-layer", 4800.0),
        ]
        .into_iter()
        .map(|(id, top)| (id.to_owned(), top))
        .collect();

        Self {
            present: Element::ALL.into_iter().collect(),
            elements: BTreeMap::new(),
            sections,
            scroll_offset: 0.0,
            viewport: Viewport::default(),
            history: vec!["/".to_owned()],
            history_index: 0,
            storage: Some(BTreeMap::new()),
            autoplay_allowed: true,
            render_context_available: true,
            year: None,
            body_overflow_locked: false,
            modal_embed: None,
            grid: Vec::new(),
            canvas_size: None,
            draws: 0,
            journal: Vec::new(),
        }
    }

    /// Load the page at `path` instead of `/`.
    pub fn at_path(mut self, path: impl Into<String>) -> Self {
        self.history = vec![path.into()];
        self.history_index = 0;
        self
    }

    /// Remove an element from the document.
    pub fn without(mut self, el: Element) -> Self {
        self.present.remove(&el);
        self
    }

    /// Add or move a section.
    pub fn with_section(mut self, id: impl Into<String>, top: f64) -> Self {
        self.sections.insert(id.into(), top);
        self
    }

    /// Remove a section.
    pub fn without_section(mut self, id: &str) -> Self {
        self.sections.remove(id);
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Make every storage access fail.
    pub fn with_storage_unavailable(mut self) -> Self {
        self.storage = None;
        self
    }

    /// Pre-populate storage.
    pub fn with_stored(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Some(storage) = self.storage.as_mut() {
            storage.insert(key.into(), value.into());
        }
        self
    }

    /// Refuse media autoplay.
    pub fn with_autoplay_refused(mut self) -> Self {
        self.autoplay_allowed = false;
        self
    }

    /// Fail render context acquisition.
    pub fn with_render_context_unavailable(mut self) -> Self {
        self.render_context_available = false;
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Simulate a user scroll. Not journaled.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = offset.max(0.0);
    }

    /// Simulate a window resize. Not journaled.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Step back in history; returns the new location, or `None` at the first entry.
    pub fn back(&mut self) -> Option<&str> {
        if self.history_index == 0 {
            return None;
        }
        self.history_index -= 1;
        Some(self.history[self.history_index].as_str())
    }

    /// Step forward in history; returns the new location, or `None` at the last entry.
    pub fn forward(&mut self) -> Option<&str> {
        if self.history_index + 1 >= self.history.len() {
            return None;
        }
        self.history_index += 1;
        Some(self.history[self.history_index].as_str())
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// History entries, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn journal(&self) -> &[PageOp] {
        &self.journal
    }

    /// Number of recorded ops matching `pred`.
    pub fn count_ops(&self, pred: impl Fn(&PageOp) -> bool) -> usize {
        self.journal.iter().filter(|op| pred(op)).count()
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    /// Inline opacity, `None` when unset or cleared.
    pub fn opacity(&self, el: Element) -> Option<f64> {
        self.elements.get(&el).and_then(|s| s.opacity)
    }

    /// Explicit display state, `None` when never set.
    pub fn displayed(&self, el: Element) -> Option<bool> {
        self.elements.get(&el).and_then(|s| s.displayed)
    }

    pub fn pointer_events(&self, el: Element) -> Option<bool> {
        self.elements.get(&el).and_then(|s| s.pointer_events)
    }

    pub fn text(&self, el: Element) -> Option<&str> {
        self.elements.get(&el).and_then(|s| s.text.as_deref())
    }

    pub fn body_overflow_locked(&self) -> bool {
        self.body_overflow_locked
    }

    pub fn modal_embed(&self) -> Option<&str> {
        self.modal_embed.as_deref()
    }

    pub fn grid(&self) -> &[GridCell] {
        &self.grid
    }

    pub fn canvas_size(&self) -> Option<Viewport> {
        self.canvas_size
    }

    /// Persisted value, `None` when absent or storage is unavailable.
    pub fn stored(&self, key: &str) -> Option<&str> {
        self.storage.as_ref()?.get(key).map(String::as_str)
    }

    fn state_mut(&mut self, el: Element) -> Option<&mut ElementState> {
        if !self.present.contains(&el) {
            return None;
        }
        Some(self.elements.entry(el).or_default())
    }
}

impl Page for HeadlessPage {
    fn has_element(&self, el: Element) -> bool {
        self.present.contains(&el)
    }

    fn set_opacity(&mut self, el: Element, opacity: Option<f64>) {
        let Some(state) = self.state_mut(el) else {
            return;
        };
        state.opacity = opacity;
        self.journal.push(PageOp::Opacity { el, value: opacity });
    }

    fn set_displayed(&mut self, el: Element, displayed: bool) {
        let Some(state) = self.state_mut(el) else {
            return;
        };
        state.displayed = Some(displayed);
        self.journal.push(PageOp::Display {
            el,
            shown: displayed,
        });
    }

    fn set_pointer_events(&mut self, el: Element, enabled: bool) {
        let Some(state) = self.state_mut(el) else {
            return;
        };
        state.pointer_events = Some(enabled);
        self.journal.push(PageOp::PointerEvents { el, enabled });
    }

    fn set_class(&mut self, el: Element, class: &str, on: bool) {
        let Some(state) = self.state_mut(el) else {
            return;
        };
        if on {
            state.classes.insert(class.to_owned());
        } else {
            state.classes.remove(class);
        }
        self.journal.push(PageOp::Class {
            el,
            class: class.to_owned(),
            on,
        });
    }

    fn has_class(&self, el: Element, class: &str) -> bool {
        self.elements
            .get(&el)
            .is_some_and(|s| s.classes.contains(class))
    }

    fn set_text(&mut self, el: Element, text: &str) {
        let Some(state) = self.state_mut(el) else {
            return;
        };
        state.text = Some(text.to_owned());
        self.journal.push(PageOp::Text {
            el,
            text: text.to_owned(),
        });
    }

    fn hide_animated_parts(&mut self, el: Element) {
        if self.present.contains(&el) {
            self.journal.push(PageOp::HideAnimatedParts { el });
        }
    }

    fn restart_animations(&mut self, el: Element) {
        if self.present.contains(&el) {
            self.journal.push(PageOp::RestartAnimations { el });
        }
    }

    fn play_media(&mut self, el: Element) -> StageResult<()> {
        if !self.present.contains(&el) {
            return Ok(());
        }
        let ok = self.autoplay_allowed;
        self.journal.push(PageOp::PlayMedia { el, ok });
        if ok {
            Ok(())
        } else {
            Err(StageError::media("autoplay refused by user agent"))
        }
    }

    fn set_body_overflow_locked(&mut self, locked: bool) {
        self.body_overflow_locked = locked;
        self.journal.push(PageOp::BodyOverflow { locked });
    }

    fn scroll_snapshot(&self) -> ScrollSnapshot {
        ScrollSnapshot {
            offset: self.scroll_offset,
            viewport_height: self.viewport.height,
        }
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn section_top(&self, section: &str) -> Option<f64> {
        self.sections.get(section).copied()
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scroll_offset = top.max(0.0);
        self.journal.push(PageOp::ScrollTo {
            top,
            smooth: behavior == ScrollBehavior::Smooth,
        });
    }

    fn push_history(&mut self, path: &str) {
        self.history.truncate(self.history_index + 1);
        self.history.push(path.to_owned());
        self.history_index = self.history.len() - 1;
        self.journal.push(PageOp::PushHistory {
            path: path.to_owned(),
        });
    }

    fn location_path(&self) -> String {
        self.history[self.history_index].clone()
    }

    fn storage_get(&self, key: &str) -> StageResult<Option<String>> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| StageError::storage("storage access denied"))?;
        Ok(storage.get(key).cloned())
    }

    fn storage_set(&mut self, key: &str, value: &str) -> StageResult<()> {
        let ok = self.storage.is_some();
        self.journal.push(PageOp::StorageSet {
            key: key.to_owned(),
            value: value.to_owned(),
            ok,
        });
        let storage = self
            .storage
            .as_mut()
            .ok_or_else(|| StageError::storage("storage access denied"))?;
        storage.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn acquire_render_context(&mut self) -> StageResult<()> {
        if !self.present.contains(&Element::EffectCanvas) {
            return Err(StageError::render_context("effect canvas is missing"));
        }
        if !self.render_context_available {
            return Err(StageError::render_context("webgl context unavailable"));
        }
        Ok(())
    }

    fn resize_canvas(&mut self, viewport: Viewport) {
        self.canvas_size = Some(viewport);
        self.journal.push(PageOp::ResizeCanvas {
            width: viewport.width,
            height: viewport.height,
        });
    }

    fn draw_effect(&mut self) {
        self.draws += 1;
        self.journal.push(PageOp::DrawEffect);
    }

    fn render_grid(&mut self, cells: &[GridCell]) {
        self.grid = cells.to_vec();
        self.journal.push(PageOp::RenderGrid { cells: cells.len() });
    }

    fn set_modal_embed(&mut self, src: Option<&str>) {
        self.modal_embed = src.map(str::to_owned);
        self.journal.push(PageOp::ModalEmbed {
            src: src.map(str::to_owned),
        });
    }

    fn current_year(&self) -> Option<i32> {
        self.year
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/headless.rs"]
mod tests;
