//! Host seam between the orchestrator and a document.
//!
//! The orchestrator never touches a DOM directly: every read and mutation goes through [`Page`].
//! [`HeadlessPage`] is an in-memory host used by tests and the CLI; the `web` feature provides a
//! browser-backed host.

mod headless;

pub use headless::{HeadlessPage, PageOp};

use crate::foundation::core::{ScrollSnapshot, Viewport};
use crate::foundation::error::StageResult;
use crate::render::grid::GridCell;

/// Document elements the orchestrator addresses.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Element {
    /// Document body (scroll lock class).
    Body,
    /// Full-screen preloader overlay.
    Preloader,
    /// Main content wrapper revealed after the preloader.
    MainContent,
    /// Hero background video.
    HeroVideo,
    /// Hero logo graphic whose parts animate in.
    HeroLogo,
    /// Layer holding the hero logo.
    LogoLayer,
    /// Decorative background grid.
    GridLayer,
    /// Top navigation menu.
    MainMenu,
    /// "Scroll down" indicator.
    ScrollIndicator,
    /// Container of the background effect canvas.
    EffectContainer,
    /// Canvas the background effect draws into.
    EffectCanvas,
    /// Video modal backdrop.
    VideoModal,
    /// Video modal embed container.
    ModalContent,
    /// Cookie consent banner.
    CookieBanner,
    /// Footer copyright year.
    CopyrightYear,
    /// Mobile menu toggle button.
    MenuToggle,
    /// Navigation link list.
    NavLinks,
}

impl Element {
    /// Every addressable element, in declaration order.
    pub const ALL: [Element; 17] = [
        Element::Body,
        Element::Preloader,
        Element::MainContent,
        Element::HeroVideo,
        Element::HeroLogo,
        Element::LogoLayer,
        Element::GridLayer,
        Element::MainMenu,
        Element::ScrollIndicator,
        Element::EffectContainer,
        Element::EffectCanvas,
        Element::VideoModal,
        Element::ModalContent,
        Element::CookieBanner,
        Element::CopyrightYear,
        Element::MenuToggle,
        Element::NavLinks,
    ];

    /// CSS selector locating this element in the site markup.
    pub fn selector(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Preloader => "#preloader",
            Self::MainContent => "#main-content",
            Self::HeroVideo => "#hero-video",
            Self::HeroLogo => ".hero-logo-svg",
            Self::LogoLayer => "#logo-layer",
            Self::GridLayer => "#grid-layer",
            Self::MainMenu => "#main-menu",
            Self::ScrollIndicator => ".scroll-indicator",
            Self::EffectContainer => "#isf-container",
            Self::EffectCanvas => "#isf-canvas",
            Self::VideoModal => "#video-modal",
            Self::ModalContent => "#video-modal .modal-video-container",
            Self::CookieBanner => "#cookie-banner",
            Self::CopyrightYear => "#copyright-year",
            Self::MenuToggle => "#mobile-menu-toggle",
            Self::NavLinks => ".nav-links",
        }
    }
}

/// How a programmatic scroll moves the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    /// Animated scroll.
    Smooth,
    /// Jump.
    Instant,
}

/// Everything the orchestrator needs from its document host.
///
/// Mutators addressed at a missing element must be no-ops; callers check
/// [`Page::has_element`] first when a missing element changes what they do.
pub trait Page {
    /// Whether `el` exists in the document.
    fn has_element(&self, el: Element) -> bool;
    /// Set inline opacity; `None` clears it so the stylesheet decides.
    fn set_opacity(&mut self, el: Element, opacity: Option<f64>);
    /// Toggle `display` between its shown value and `none`.
    fn set_displayed(&mut self, el: Element, displayed: bool);
    /// Enable or disable pointer events.
    fn set_pointer_events(&mut self, el: Element, enabled: bool);
    /// Add (`on`) or remove a class.
    fn set_class(&mut self, el: Element, class: &str, on: bool);
    /// Whether `el` currently carries `class`.
    fn has_class(&self, el: Element, class: &str) -> bool;
    /// Replace the text content.
    fn set_text(&mut self, el: Element, text: &str);
    /// Hide the animated parts of `el` and suspend their stylesheet animations.
    fn hide_animated_parts(&mut self, el: Element);
    /// Re-trigger the stylesheet animations of the parts of `el`.
    fn restart_animations(&mut self, el: Element);
    /// Start media playback; refusals are reported as [`crate::StageError::Media`].
    fn play_media(&mut self, el: Element) -> StageResult<()>;
    /// Lock or unlock body overflow (modal and mobile menu).
    fn set_body_overflow_locked(&mut self, locked: bool);
    /// Read scroll offset and viewport height in one go.
    fn scroll_snapshot(&self) -> ScrollSnapshot;
    /// Current window dimensions.
    fn viewport(&self) -> Viewport;
    /// Document-relative top of a section, if the section exists.
    fn section_top(&self, section: &str) -> Option<f64>;
    /// Scroll the window to a document offset.
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
    /// Push a history entry without state payload.
    fn push_history(&mut self, path: &str);
    /// Current location path.
    fn location_path(&self) -> String;
    /// Read a persisted string.
    fn storage_get(&self, key: &str) -> StageResult<Option<String>>;
    /// Persist a string.
    fn storage_set(&mut self, key: &str, value: &str) -> StageResult<()>;
    /// Acquire the drawing context of the effect canvas.
    fn acquire_render_context(&mut self) -> StageResult<()>;
    /// Resize the effect canvas backing store.
    fn resize_canvas(&mut self, viewport: Viewport);
    /// Draw one frame of the background effect.
    fn draw_effect(&mut self);
    /// Replace the background grid cells.
    fn render_grid(&mut self, cells: &[GridCell]);
    /// Set (`Some`) or clear the modal embed source.
    fn set_modal_embed(&mut self, src: Option<&str>);
    /// Current calendar year, when the host knows it.
    fn current_year(&self) -> Option<i32>;
}
