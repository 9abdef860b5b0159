use fitcore::nav::{MenuEvent, MenuState};
use tracing::debug;
use web_sys::Element;

use super::dom::{has_class, set_class};

/// The hamburger icon and the menu panel, always written as a pair.
///
/// The open state is the `active` class on the hamburger. Navigation (clicks)
/// and the main controller (Escape) both close the menu through it.
#[derive(Clone)]
pub(super) struct MenuView {
    hamburger: Element,
    panel: Element,
    class: String,
}

impl MenuView {
    pub(super) fn new(hamburger: Element, panel: Element, class: &str) -> Self {
        Self {
            hamburger,
            panel,
            class: class.to_string(),
        }
    }

    pub(super) fn hamburger(&self) -> &Element {
        &self.hamburger
    }

    pub(super) fn panel(&self) -> &Element {
        &self.panel
    }

    pub(super) fn state(&self) -> MenuState {
        MenuState::from_open(has_class(&self.hamburger, &self.class))
    }

    pub(super) fn apply(&self, event: MenuEvent) -> MenuState {
        let before = self.state();
        let after = before.apply(event);
        set_class(&self.hamburger, &self.class, after.is_open());
        set_class(&self.panel, &self.class, after.is_open());
        if before != after {
            debug!(?event, ?after, "menu");
        }
        after
    }
}
