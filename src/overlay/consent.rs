use crate::page::{Element, Page};

/// A user's cookie choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consent {
    Accepted,
    Rejected,
}

impl Consent {
    /// Stored representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Consent storage key and banner timing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConsentConfig {
    pub storage_key: String,
    /// Delay from load before the banner is shown.
    pub banner_delay_ms: u64,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            storage_key: "cookieConsent".to_owned(),
            banner_delay_ms: 2000,
        }
    }
}

/// Cookie banner driven by a single persisted key.
///
/// Storage failures never block anything: an unreadable key counts as absent and a failed write
/// still dismisses the banner.
#[derive(Debug)]
pub struct ConsentBanner {
    cfg: ConsentConfig,
    stored: Option<String>,
    chosen: Option<Consent>,
}

impl ConsentBanner {
    pub(crate) fn new(cfg: ConsentConfig) -> Self {
        Self {
            cfg,
            stored: None,
            chosen: None,
        }
    }

    pub fn config(&self) -> &ConsentConfig {
        &self.cfg
    }

    /// Consent known for this session, from storage or from a choice.
    pub fn consent(&self) -> Option<Consent> {
        self.chosen
            .or_else(|| self.stored.as_deref().and_then(Consent::parse))
    }

    /// Read the stored choice. Returns `true` when the banner should be shown later.
    pub(crate) fn boot<P: Page>(&mut self, page: &P) -> bool {
        if !page.has_element(Element::CookieBanner) {
            return false;
        }
        self.stored = match page.storage_get(&self.cfg.storage_key) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(error = %err, "consent read failed, treating as absent");
                None
            }
        };
        self.stored.as_deref().is_none_or(str::is_empty)
    }

    /// Delayed banner step. Skipped when the user already chose.
    pub(crate) fn show<P: Page>(&mut self, page: &mut P) {
        if self.chosen.is_some() {
            return;
        }
        page.set_class(Element::CookieBanner, "visible", true);
    }

    pub(crate) fn choose<P: Page>(&mut self, page: &mut P, consent: Consent) {
        if let Err(err) = page.storage_set(&self.cfg.storage_key, consent.as_str()) {
            tracing::warn!(error = %err, "consent write failed");
        }
        self.chosen = Some(consent);
        page.set_class(Element::CookieBanner, "visible", false);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/consent.rs"]
mod tests;
