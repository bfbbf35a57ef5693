//! Lysa Stage orchestrates the presentation of a single-page marketing site.
//!
//! A [`Stage`] drives four cooperating parts over a [`Page`] host:
//!
//! - a timed boot sequence that reveals content and unlocks scrolling
//! - a frame-coalesced scroll sampler deriving named signals from one snapshot per frame
//! - an on/off gate for the per-frame background-effect draw
//! - a path to section scroll router with history integration and a deferred deep link
//!
//! Time is virtual: hosts feed events in and advance the stage clock, so every ordering rule is
//! deterministic and testable with [`HeadlessPage`].
#![forbid(unsafe_code)]

mod foundation;

/// Boot sequence plan and sequencer.
pub mod boot;
mod config;
pub(crate) mod overlay;
/// Host seam and the headless host.
pub mod page;
pub(crate) mod render;
pub(crate) mod router;
pub(crate) mod runtime;
pub(crate) mod scroll;
mod session;
/// Browser host, available with the `web` feature.
#[cfg(feature = "web")]
pub mod web;

pub use crate::foundation::core::{Distance, Millis, ScrollSnapshot, Viewport};
pub use crate::foundation::error::{StageError, StageResult};

pub use crate::boot::{BootAction, BootPhase, BootPlan, BootStep, BootTimings, TimerSequencer};
pub use crate::config::{DeepLinkConfig, StageConfig};
pub use crate::overlay::consent::{Consent, ConsentBanner, ConsentConfig};
pub use crate::overlay::menu::MobileMenu;
pub use crate::overlay::modal::{
    DEFAULT_EMBED_TEMPLATE, VideoModal, VideoRecord, is_valid_video_id,
};
pub use crate::page::{Element, HeadlessPage, Page, PageOp, ScrollBehavior};
pub use crate::render::gate::{GateState, RenderGate};
pub use crate::render::grid::{CellContent, GridCell, GridConfig, layout_grid};
pub use crate::router::deep_link::{DeepLinkState, DeepLinkTrigger};
pub use crate::router::routes::{Route, RouteTable, normalize_path};
pub use crate::router::scroll_router::{NavOutcome, NavigationEvent, ScrollRouter};
pub use crate::runtime::event_loop::FrameHandle;
pub use crate::scroll::signal::{Direction, FrameSignals, ScrollConfig, SignalSet, SignalSpec};
pub use crate::session::{Stage, StageReport};
