//! Navigation bar behavior: mobile menu, scroll decoration, anchor scrolling and
//! active-section tracking.

/// The mobile menu. The hamburger icon and the menu panel both render this one
/// value, so they cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    HamburgerClick,
    NavLinkClick,
    OutsideClick,
    Escape,
}

impl MenuState {
    pub fn from_open(open: bool) -> Self {
        if open {
            MenuState::Open
        } else {
            MenuState::Closed
        }
    }

    pub fn is_open(self) -> bool {
        self == MenuState::Open
    }

    /// Only the hamburger toggles; every other event force-closes.
    pub fn apply(self, event: MenuEvent) -> Self {
        match (self, event) {
            (MenuState::Closed, MenuEvent::HamburgerClick) => MenuState::Open,
            (MenuState::Open, MenuEvent::HamburgerClick) => MenuState::Closed,
            (_, MenuEvent::NavLinkClick | MenuEvent::OutsideClick | MenuEvent::Escape) => {
                MenuState::Closed
            }
        }
    }
}

/// Whether the navbar wears its `scrolled` decoration. Strictly above the
/// threshold; at exactly the threshold it is still off.
pub fn is_scrolled(scroll_y: f64, threshold_px: f64) -> bool {
    scroll_y > threshold_px
}

/// The element id an in-page link points at: `"#about"` -> `Some("about")`.
/// Bare `"#"` and links to other pages yield `None`.
pub fn anchor_target(href: &str) -> Option<&str> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Where to smooth-scroll for a target at `target_top`, leaving room for the
/// fixed navbar. Never negative.
pub fn anchor_scroll_top(target_top: f64, offset_px: f64) -> f64 {
    (target_top - offset_px).max(0.0)
}

/// Pick the section the reader is in: scanning in document order, every section
/// whose top is at or above `scroll_y + lookahead_px` replaces the previous
/// pick, so the last qualifying section wins.
pub fn active_section<'a, I>(sections: I, scroll_y: f64, lookahead_px: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut current = None;
    for (id, top) in sections {
        if scroll_y >= top - lookahead_px {
            current = Some(id);
        }
    }
    current
}

/// Whether a nav link's `href` points at section `id`.
pub fn link_matches(href: &str, id: &str) -> bool {
    anchor_target(href) == Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(events: &[MenuEvent]) -> MenuState {
        events
            .iter()
            .fold(MenuState::Closed, |state, ev| state.apply(*ev))
    }

    #[test]
    fn hamburger_twice_returns_to_closed() {
        assert_eq!(run(&[MenuEvent::HamburgerClick]), MenuState::Open);
        assert_eq!(
            run(&[MenuEvent::HamburgerClick, MenuEvent::HamburgerClick]),
            MenuState::Closed
        );
    }

    #[test]
    fn link_outside_and_escape_force_close() {
        for closer in [
            MenuEvent::NavLinkClick,
            MenuEvent::OutsideClick,
            MenuEvent::Escape,
        ] {
            assert_eq!(run(&[MenuEvent::HamburgerClick, closer]), MenuState::Closed);
            // Idempotent when already closed.
            assert_eq!(run(&[closer]), MenuState::Closed);
            assert_eq!(run(&[closer, closer]), MenuState::Closed);
        }
    }

    #[test]
    fn scrolled_threshold_is_strict() {
        assert!(!is_scrolled(0.0, 100.0));
        assert!(!is_scrolled(100.0, 100.0));
        assert!(is_scrolled(100.5, 100.0));
    }

    #[test]
    fn anchors() {
        assert_eq!(anchor_target("#classes"), Some("classes"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("/pricing"), None);
        assert_eq!(anchor_target("https://example.com/#x"), None);

        assert_eq!(anchor_scroll_top(1200.0, 70.0), 1130.0);
        assert_eq!(anchor_scroll_top(30.0, 70.0), 0.0);
    }

    #[test]
    fn last_qualifying_section_wins() {
        let sections = [("home", 0.0), ("about", 500.0), ("classes", 1200.0)];
        assert_eq!(active_section(sections, 650.0, 200.0), Some("about"));
        assert_eq!(active_section(sections, 0.0, 200.0), Some("home"));
        assert_eq!(active_section(sections, 300.0, 200.0), Some("about"));
        assert_eq!(active_section(sections, 1000.0, 200.0), Some("classes"));
    }

    #[test]
    fn order_not_distance_decides() {
        // Out-of-order offsets: the later entry still wins when it qualifies.
        let sections = [("late", 900.0), ("early", 100.0)];
        assert_eq!(active_section(sections, 1000.0, 0.0), Some("early"));
    }

    #[test]
    fn no_section_qualifies() {
        let sections = [("pricing", 2000.0)];
        assert_eq!(active_section(sections, 0.0, 200.0), None);
        assert_eq!(active_section(Vec::new(), 0.0, 200.0), None);
    }

    #[test]
    fn link_matching() {
        assert!(link_matches("#about", "about"));
        assert!(!link_matches("#about", "abo"));
        assert!(!link_matches("about", "about"));
    }
}
