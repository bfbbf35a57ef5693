use crate::foundation::core::{Distance, ScrollSnapshot};
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::math::linear_progress;

/// Which way a signal moves as the page scrolls down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// `0` before the range, `1` after it.
    Rising,
    /// `1` before the range, `0` after it.
    Falling,
}

/// Scroll-distance mapping of one signal.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalSpec {
    /// Offset at which the signal starts to move.
    pub start: Distance,
    /// Offset at which the signal reaches its end value.
    pub end: Distance,
    pub direction: Direction,
}

impl SignalSpec {
    pub fn rising(start: Distance, end: Distance) -> Self {
        Self {
            start,
            end,
            direction: Direction::Rising,
        }
    }

    pub fn falling(start: Distance, end: Distance) -> Self {
        Self {
            start,
            end,
            direction: Direction::Falling,
        }
    }

    /// Value in `[0, 1]` for one snapshot. Pure: no state is carried between calls.
    pub fn value(&self, snapshot: ScrollSnapshot) -> f64 {
        let h = snapshot.viewport_height;
        let p = linear_progress(snapshot.offset, self.start.resolve(h), self.end.resolve(h));
        match self.direction {
            Direction::Rising => p,
            Direction::Falling => 1.0 - p,
        }
    }

    /// Value before the range starts.
    pub fn rest_value(&self) -> f64 {
        match self.direction {
            Direction::Rising => 0.0,
            Direction::Falling => 1.0,
        }
    }

    fn validate(&self, name: &str) -> StageResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(StageError::config(format!(
                "signal '{name}' has a non-finite bound"
            )));
        }
        let ordered = match (self.start, self.end) {
            (Distance::Px(a), Distance::Px(b)) | (Distance::Vh(a), Distance::Vh(b)) => a < b,
            _ => true,
        };
        if !ordered {
            return Err(StageError::config(format!(
                "signal '{name}' must start before it ends"
            )));
        }
        Ok(())
    }
}

/// The named scroll signals driving visual properties.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SignalSet {
    /// Hero logo layer opacity.
    pub hero_fade: SignalSpec,
    /// Background effect container opacity; also decides effect visibility.
    pub effect_opacity: SignalSpec,
    /// Scroll indicator opacity.
    pub indicator_fade: SignalSpec,
}

impl Default for SignalSet {
    fn default() -> Self {
        Self {
            hero_fade: SignalSpec::falling(Distance::Vh(0.5), Distance::Vh(1.0)),
            effect_opacity: SignalSpec::rising(Distance::Vh(0.5), Distance::Vh(1.2)),
            indicator_fade: SignalSpec::falling(Distance::Px(50.0), Distance::Px(200.0)),
        }
    }
}

impl SignalSet {
    pub(crate) fn validate(&self) -> StageResult<()> {
        self.hero_fade.validate("hero_fade")?;
        self.effect_opacity.validate("effect_opacity")?;
        self.indicator_fade.validate("indicator_fade")
    }
}

/// Every derived value for one sampled frame, computed from a single snapshot.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameSignals {
    pub snapshot: ScrollSnapshot,
    pub hero_fade: f64,
    pub effect_opacity: f64,
    pub indicator_fade: f64,
    /// Whether the effect counts as visible (opacity above the visibility threshold).
    pub effect_visible: bool,
    /// Whether the menu should be pinned visible.
    pub menu_pinned: bool,
}

/// Scroll sampler configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub signals: SignalSet,
    /// Effect opacity above which the background effect must be drawing.
    pub effect_visible_threshold: f64,
    /// Scroll offset beyond which the menu is pinned visible.
    pub menu_pin_offset: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            signals: SignalSet::default(),
            effect_visible_threshold: 0.01,
            menu_pin_offset: 50.0,
        }
    }
}

impl ScrollConfig {
    pub(crate) fn validate(&self) -> StageResult<()> {
        self.signals.validate()?;
        if !(0.0..1.0).contains(&self.effect_visible_threshold) {
            return Err(StageError::config(
                "effect_visible_threshold must be in [0, 1)",
            ));
        }
        if !self.menu_pin_offset.is_finite() {
            return Err(StageError::config("menu_pin_offset must be finite"));
        }
        Ok(())
    }

    /// Derive every signal from one snapshot.
    pub fn evaluate(&self, snapshot: ScrollSnapshot) -> FrameSignals {
        let effect_opacity = self.signals.effect_opacity.value(snapshot);
        FrameSignals {
            snapshot,
            hero_fade: self.signals.hero_fade.value(snapshot),
            effect_opacity,
            indicator_fade: self.signals.indicator_fade.value(snapshot),
            effect_visible: effect_opacity > self.effect_visible_threshold,
            menu_pinned: snapshot.offset > self.menu_pin_offset,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/signal.rs"]
mod tests;
