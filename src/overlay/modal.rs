use crate::page::{Element, Page};

/// A finished video record handed over by the feed renderer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
}

/// Embed URL template; `{id}` is replaced by the video id.
pub const DEFAULT_EMBED_TEMPLATE: &str =
    "https://www.youtube.com/embed/{id}?rel=0&modestbranding=1&autoplay=1";

/// Video ids are interpolated into a URL, so only URL-safe id characters are accepted.
pub fn is_valid_video_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Video modal: open with an embed, close on button, Escape, or backdrop click.
#[derive(Debug)]
pub struct VideoModal {
    embed_template: String,
    open: Option<String>,
}

impl VideoModal {
    pub(crate) fn new(embed_template: impl Into<String>) -> Self {
        Self {
            embed_template: embed_template.into(),
            open: None,
        }
    }

    /// Id of the video currently shown.
    pub fn open_video(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn embed_url(&self, id: &str) -> String {
        self.embed_template.replace("{id}", id)
    }

    /// Show `id` in the modal. Returns `false` when the modal is missing or the id is rejected.
    pub(crate) fn open<P: Page>(&mut self, page: &mut P, id: &str) -> bool {
        if !page.has_element(Element::VideoModal) || !page.has_element(Element::ModalContent) {
            tracing::debug!("video modal missing, open skipped");
            return false;
        }
        if !is_valid_video_id(id) {
            tracing::warn!(id, "rejected malformed video id");
            return false;
        }
        let src = self.embed_url(id);
        page.set_modal_embed(Some(&src));
        page.set_class(Element::VideoModal, "active", true);
        page.set_body_overflow_locked(true);
        self.open = Some(id.to_owned());
        true
    }

    /// Hide the modal and drop the embed so playback stops.
    pub(crate) fn close<P: Page>(&mut self, page: &mut P) {
        if !page.has_element(Element::VideoModal) {
            return;
        }
        page.set_class(Element::VideoModal, "active", false);
        page.set_modal_embed(None);
        page.set_body_overflow_locked(false);
        self.open = None;
    }

    /// Escape closes an open modal; other keys and a closed modal are ignored.
    pub(crate) fn on_keydown<P: Page>(&mut self, page: &mut P, key: &str) -> bool {
        if key != "Escape" || self.open.is_none() {
            return false;
        }
        self.close(page);
        true
    }

    /// Clicks close only when they land on the backdrop itself.
    pub(crate) fn on_click<P: Page>(&mut self, page: &mut P, target_is_backdrop: bool) -> bool {
        if !target_is_backdrop {
            return false;
        }
        self.close(page);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/modal.rs"]
mod tests;
