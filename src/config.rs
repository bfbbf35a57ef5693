use std::{fs::File, io::BufReader, path::Path};

use crate::boot::BootTimings;
use crate::foundation::error::{StageError, StageResult};
use crate::overlay::consent::ConsentConfig;
use crate::overlay::modal::DEFAULT_EMBED_TEMPLATE;
use crate::render::grid::GridConfig;
use crate::router::routes::RouteTable;
use crate::scroll::signal::ScrollConfig;

/// Deep-link race timing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DeepLinkConfig {
    /// Delay after the ready event before navigating.
    pub settle_ms: u64,
    /// Hard deadline from load after which navigation is forced.
    pub deadline_ms: u64,
}

impl Default for DeepLinkConfig {
    fn default() -> Self {
        Self {
            settle_ms: 100,
            deadline_ms: 15_000,
        }
    }
}

/// Full stage configuration. Every field has a default, so `{}` is a valid document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub boot: BootTimings,
    pub scroll: ScrollConfig,
    pub routes: RouteTable,
    /// Height of the fixed header subtracted from section scroll targets.
    pub header_offset: f64,
    pub deep_link: DeepLinkConfig,
    /// Quiet period after the last resize before the canvas and grid are rebuilt.
    pub resize_debounce_ms: u64,
    pub consent: ConsentConfig,
    /// Animation frame cadence of the stage clock.
    pub frame_interval_ms: u64,
    pub grid: GridConfig,
    /// Video embed URL; `{id}` is replaced by the video id.
    pub modal_embed_template: String,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            boot: BootTimings::default(),
            scroll: ScrollConfig::default(),
            routes: RouteTable::site(),
            header_offset: 80.0,
            deep_link: DeepLinkConfig::default(),
            resize_debounce_ms: 200,
            consent: ConsentConfig::default(),
            frame_interval_ms: 16,
            grid: GridConfig::default(),
            modal_embed_template: DEFAULT_EMBED_TEMPLATE.to_owned(),
        }
    }
}

impl StageConfig {
    /// Parse a configuration from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> StageResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| StageError::serde(format!("parse stage config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StageResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StageError::config(format!("open stage config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> StageResult<()> {
        self.boot.validate()?;
        self.scroll.validate()?;
        self.routes.validate()?;
        if !self.header_offset.is_finite() || self.header_offset < 0.0 {
            return Err(StageError::config("header_offset must be finite and >= 0"));
        }
        if self.frame_interval_ms == 0 {
            return Err(StageError::config("frame_interval_ms must be > 0"));
        }
        if self.consent.storage_key.trim().is_empty() {
            return Err(StageError::config("consent.storage_key must not be empty"));
        }
        if !self.modal_embed_template.contains("{id}") {
            return Err(StageError::config(
                "modal_embed_template must contain an {id} placeholder",
            ));
        }
        if self.grid.keyword_every == 0 {
            return Err(StageError::config("grid.keyword_every must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
