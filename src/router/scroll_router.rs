use crate::page::{Page, ScrollBehavior};
use crate::router::routes::{RouteTable, normalize_path};

/// A navigation request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct NavigationEvent {
    pub path: String,
    /// `false` for back/forward and the initial deep link, whose history entry already exists.
    pub push_history: bool,
}

impl NavigationEvent {
    pub fn new(path: impl Into<String>, push_history: bool) -> Self {
        Self {
            path: path.into(),
            push_history,
        }
    }
}

/// Result of one navigation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NavOutcome {
    /// Path not in the table; left to the browser.
    Unmapped,
    /// Path mapped but its section is not in the document.
    MissingSection,
    /// History updated (when requested) and scroll issued.
    Scrolled { path: String, top: f64, pushed: bool },
}

/// Path to section scroll navigation with history integration.
#[derive(Debug)]
pub struct ScrollRouter {
    table: RouteTable,
    header_offset: f64,
    navigations: u64,
}

impl ScrollRouter {
    pub(crate) fn new(table: RouteTable, header_offset: f64) -> Self {
        Self {
            table,
            header_offset,
            navigations: 0,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Number of navigations that scrolled.
    pub fn navigations(&self) -> u64 {
        self.navigations
    }

    /// Whether a link with this `href` is handled in-page.
    pub fn intercepts(&self, href: &str) -> bool {
        href.starts_with('/') && self.table.resolve(href).is_some()
    }

    /// Scroll target for a path, without side effects.
    pub fn target_for<P: Page>(&self, page: &P, path: &str) -> Option<f64> {
        let route = self.table.resolve(path)?;
        let top = page.section_top(&route.section)?;
        if route.is_root() {
            Some(0.0)
        } else {
            Some((top - self.header_offset).max(0.0))
        }
    }

    #[tracing::instrument(skip(self, page))]
    pub(crate) fn navigate<P: Page>(&mut self, page: &mut P, event: &NavigationEvent) -> NavOutcome {
        let clean = normalize_path(&event.path);
        let Some(route) = self.table.resolve(clean) else {
            tracing::debug!("unmapped path");
            return NavOutcome::Unmapped;
        };
        let Some(section_top) = page.section_top(&route.section) else {
            tracing::debug!(section = %route.section, "section missing, skipped");
            return NavOutcome::MissingSection;
        };

        if event.push_history {
            page.push_history(clean);
        }
        let top = if route.is_root() {
            0.0
        } else {
            (section_top - self.header_offset).max(0.0)
        };
        page.scroll_to(top, ScrollBehavior::Smooth);
        self.navigations += 1;
        NavOutcome::Scrolled {
            path: clean.to_owned(),
            top,
            pushed: event.push_history,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/router/scroll_router.rs"]
mod tests;
