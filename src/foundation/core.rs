use crate::foundation::error::{StageError, StageResult};

/// Milliseconds since page load on the stage clock.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// Page load instant.
    pub const ZERO: Self = Self(0);

    /// Add a delay using saturating arithmetic.
    pub fn after(self, delay_ms: u64) -> Self {
        Self(self.0.saturating_add(delay_ms))
    }

    /// Milliseconds elapsed since `earlier`, or zero when `earlier` is later.
    pub fn since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::fmt::Display for Millis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Window dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Inner width.
    pub width: f64,
    /// Inner height.
    pub height: f64,
}

impl Viewport {
    /// Create a validated viewport with finite, non-negative dimensions.
    pub fn new(width: f64, height: f64) -> StageResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(StageError::validation(
                "Viewport dimensions must be finite and >= 0",
            ));
        }
        Ok(Self { width, height })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// One consistent read of scroll state, taken once per sampled frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScrollSnapshot {
    /// Vertical document scroll offset.
    pub offset: f64,
    /// Viewport height at the time of the read.
    pub viewport_height: f64,
}

/// A scroll distance, either absolute or relative to the viewport height.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    /// Absolute CSS pixels.
    Px(f64),
    /// Fraction of the viewport height (`1.0` is one full viewport).
    Vh(f64),
}

impl Distance {
    /// Resolve to pixels for a given viewport height.
    pub fn resolve(self, viewport_height: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Vh(frac) => frac * viewport_height,
        }
    }

    pub(crate) fn is_finite(self) -> bool {
        match self {
            Self::Px(v) | Self::Vh(v) => v.is_finite(),
        }
    }
}
