//! Scroll, resize, visibility and keyboard decisions for the main controller.

/// Reading progress in percent: `scroll_y / (document_height - viewport_height)`.
/// A page that does not scroll reports `0`; the result is clamped to `0..=100`
/// because overscroll on touch devices reports out-of-range positions.
pub fn scroll_progress_percent(scroll_y: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if !scrollable.is_finite() || scrollable <= 0.0 || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

/// Parallax speed from the element's attribute. Missing, empty, unparsable or
/// non-finite values fall back to `default_speed`.
pub fn parse_parallax_speed(raw: Option<&str>, default_speed: f64) -> f64 {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default_speed)
}

/// Vertical offset for a parallax layer: the layer moves up `speed` pixels per
/// pixel scrolled.
pub fn parallax_offset(scroll_y: f64, speed: f64) -> f64 {
    -(scroll_y * speed)
}

/// Below the breakpoint the stats panel leaves its sticky placement.
pub fn should_unstick_stats(viewport_width: f64, breakpoint_px: f64) -> bool {
    viewport_width < breakpoint_px
}

/// `animation-play-state` for the page body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Running,
    Paused,
}

impl PlayState {
    pub fn for_hidden(hidden: bool) -> Self {
        if hidden {
            PlayState::Paused
        } else {
            PlayState::Running
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            PlayState::Running => "running",
            PlayState::Paused => "paused",
        }
    }
}

/// Keyboard shortcuts handled at document level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    CloseMenu,
    EnterKeyboardNavigation,
}

impl KeyAction {
    /// Maps a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" | "Esc" => Some(KeyAction::CloseMenu),
            "Tab" => Some(KeyAction::EnterKeyboardNavigation),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_proportional_and_clamped() {
        assert_eq!(scroll_progress_percent(0.0, 3000.0, 1000.0), 0.0);
        assert_eq!(scroll_progress_percent(1000.0, 3000.0, 1000.0), 50.0);
        assert_eq!(scroll_progress_percent(2000.0, 3000.0, 1000.0), 100.0);
        assert_eq!(scroll_progress_percent(2400.0, 3000.0, 1000.0), 100.0);
        assert_eq!(scroll_progress_percent(-40.0, 3000.0, 1000.0), 0.0);
    }

    #[test]
    fn short_page_reports_zero_progress() {
        assert_eq!(scroll_progress_percent(0.0, 800.0, 1000.0), 0.0);
        assert_eq!(scroll_progress_percent(10.0, 1000.0, 1000.0), 0.0);
    }

    #[test]
    fn parallax_speed_fallbacks() {
        assert_eq!(parse_parallax_speed(Some("0.3"), 0.5), 0.3);
        assert_eq!(parse_parallax_speed(Some(" 1 "), 0.5), 1.0);
        assert_eq!(parse_parallax_speed(Some(""), 0.5), 0.5);
        assert_eq!(parse_parallax_speed(Some("fast"), 0.5), 0.5);
        assert_eq!(parse_parallax_speed(Some("NaN"), 0.5), 0.5);
        assert_eq!(parse_parallax_speed(Some("inf"), 0.5), 0.5);
        assert_eq!(parse_parallax_speed(None, 0.5), 0.5);
    }

    #[test]
    fn parallax_moves_against_scroll() {
        assert_eq!(parallax_offset(400.0, 0.5), -200.0);
        assert_eq!(parallax_offset(400.0, 0.0), -0.0);
        assert_eq!(parallax_offset(0.0, 0.5), -0.0);
    }

    #[test]
    fn stats_breakpoint_is_exclusive() {
        assert!(should_unstick_stats(767.0, 768.0));
        assert!(!should_unstick_stats(768.0, 768.0));
    }

    #[test]
    fn visibility_and_keys() {
        assert_eq!(PlayState::for_hidden(true).as_css(), "paused");
        assert_eq!(PlayState::for_hidden(false).as_css(), "running");

        assert_eq!(KeyAction::from_key("Escape"), Some(KeyAction::CloseMenu));
        assert_eq!(
            KeyAction::from_key("Tab"),
            Some(KeyAction::EnterKeyboardNavigation)
        );
        assert_eq!(KeyAction::from_key("Enter"), None);
    }
}
