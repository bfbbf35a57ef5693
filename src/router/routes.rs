use std::collections::BTreeSet;

use crate::foundation::error::{StageError, StageResult};

/// One path to section mapping.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Route {
    /// Canonical path: leading `/`, no trailing slash except the root.
    pub path: String,
    /// Id of the section element the path scrolls to.
    pub section: String,
}

impl Route {
    pub fn new(path: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            section: section.into(),
        }
    }

    /// The root route scrolls to the document top instead of its section.
    pub fn is_root(&self) -> bool {
        self.path == "/"
    }
}

/// Strip a single trailing slash, except from the root path.
pub fn normalize_path(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Immutable path to section table.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::site()
    }
}

impl RouteTable {
    /// Build a validated table.
    pub fn new(routes: Vec<Route>) -> StageResult<Self> {
        let table = Self { routes };
        table.validate()?;
        Ok(table)
    }

    /// The site's section layout.
    pub fn site() -> Self {
        Self {
            routes: vec![
                Route::new("/", "hero-layers"),
                Route::new("/about", "about-layer"),
                Route::new("/music", "music-layer"),
                Route::new("/video", "video-content-layer"),
                Route::new("/contact", "contact-layer"),
            ],
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Look up a path after normalization. Unmapped paths yield `None`.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        let clean = normalize_path(path);
        self.routes.iter().find(|r| r.path == clean)
    }

    pub fn validate(&self) -> StageResult<()> {
        let mut seen = BTreeSet::new();
        for r in &self.routes {
            if !r.path.starts_with('/') {
                return Err(StageError::config(format!(
                    "route '{}' must start with '/'",
                    r.path
                )));
            }
            if normalize_path(&r.path) != r.path {
                return Err(StageError::config(format!(
                    "route '{}' must not end with '/'",
                    r.path
                )));
            }
            if r.section.trim().is_empty() {
                return Err(StageError::config(format!(
                    "route '{}' has an empty section id",
                    r.path
                )));
            }
            if !seen.insert(r.path.as_str()) {
                return Err(StageError::config(format!(
                    "route '{}' is declared twice",
                    r.path
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/router/routes.rs"]
mod tests;
