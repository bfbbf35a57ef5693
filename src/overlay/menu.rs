use crate::page::{Element, Page};

/// Hamburger menu for narrow layouts.
#[derive(Debug, Default)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn toggle<P: Page>(&mut self, page: &mut P) {
        if !page.has_element(Element::MenuToggle) || !page.has_element(Element::NavLinks) {
            return;
        }
        self.open = !self.open;
        page.set_class(Element::MenuToggle, "active", self.open);
        page.set_class(Element::NavLinks, "active", self.open);
        page.set_body_overflow_locked(self.open);
    }

    /// Close after a nav link was followed.
    pub(crate) fn close<P: Page>(&mut self, page: &mut P) {
        if !self.open {
            return;
        }
        self.open = false;
        page.set_class(Element::MenuToggle, "active", false);
        page.set_class(Element::NavLinks, "active", false);
        page.set_body_overflow_locked(false);
    }
}
