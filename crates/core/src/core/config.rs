//! The page contract: selectors, attribute names, class names and tuning.
//!
//! Defaults match the stock markup. A page may override any subset through a
//! JSON island (`<script type="application/json" id="fitcore-config">`); missing
//! keys keep their defaults.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};
use crate::time::Duration;

/// Element id of the optional JSON override island.
pub const CONFIG_ISLAND_ID: &str = "fitcore-config";

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Selectors {
    pub navbar: String,
    pub hamburger: String,
    pub nav_menu: String,
    pub nav_link: String,
    pub section: String,
    pub hero: String,
    pub scroll_indicator: String,
    pub stats_panel: String,
    pub reveal: String,
    pub counter: String,
    pub parallax: String,
    pub lazy_image: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            navbar: "#navbar".to_string(),
            hamburger: "#hamburger".to_string(),
            nav_menu: "#nav-menu".to_string(),
            nav_link: ".nav-link".to_string(),
            section: "section[id]".to_string(),
            hero: ".hero".to_string(),
            scroll_indicator: ".scroll-indicator".to_string(),
            stats_panel: ".hero-stats".to_string(),
            reveal: "[data-aos]".to_string(),
            counter: ".stat-number".to_string(),
            parallax: "[data-parallax]".to_string(),
            lazy_image: "img".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Attributes {
    pub reveal_delay: String,
    pub counter_target: String,
    /// Set once a counter has fired; marked counters are not watched again.
    pub counter_done: String,
    pub parallax_speed: String,
    pub lazy_src: String,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            reveal_delay: "data-aos-delay".to_string(),
            counter_target: "data-target".to_string(),
            counter_done: "data-counted".to_string(),
            parallax_speed: "data-parallax".to_string(),
            lazy_src: "data-src".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Classes {
    pub revealed: String,
    pub active: String,
    pub scrolled: String,
    pub loaded: String,
    pub keyboard_navigation: String,
}

impl Default for Classes {
    fn default() -> Self {
        Self {
            revealed: "animate".to_string(),
            active: "active".to_string(),
            scrolled: "scrolled".to_string(),
            loaded: "loaded".to_string(),
            keyboard_navigation: "keyboard-navigation".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Timing {
    pub scrolled_threshold_px: f64,
    pub anchor_offset_px: f64,
    pub section_lookahead_px: f64,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub counter_threshold: f64,
    pub counter_steps: u32,
    pub counter_tick_ms: u32,
    pub hero_parallax_rate: f64,
    pub default_parallax_speed: f64,
    pub resize_debounce_ms: u32,
    pub stats_breakpoint_px: f64,
    pub lazy_threshold: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            scrolled_threshold_px: 100.0,
            anchor_offset_px: 70.0,
            section_lookahead_px: 200.0,
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
            counter_threshold: 0.5,
            counter_steps: 100,
            counter_tick_ms: 20,
            hero_parallax_rate: 0.5,
            default_parallax_speed: 0.5,
            resize_debounce_ms: 250,
            stats_breakpoint_px: 768.0,
            lazy_threshold: 0.0,
        }
    }
}

impl Timing {
    pub fn counter_tick(&self) -> Duration {
        Duration::from_millis(u64::from(self.counter_tick_ms))
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(u64::from(self.resize_debounce_ms))
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SiteConfig {
    pub selectors: Selectors,
    pub attributes: Attributes,
    pub classes: Classes,
    pub timing: Timing,
    /// Hero imagery worth fetching before the lazy loader gets to it.
    pub preload_images: Vec<String>,
    pub inject_reveal_styles: bool,
    /// Leave keyboard-navigation mode on the next pointer press.
    pub reset_keyboard_mode_on_pointer: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            attributes: Attributes::default(),
            classes: Classes::default(),
            timing: Timing::default(),
            preload_images: vec![
                "https://images.pexels.com/photos/1552242/pexels-photo-1552242.jpeg?auto=compress&cs=tinysrgb&w=1600".to_string(),
                "https://images.pexels.com/photos/1552252/pexels-photo-1552252.jpeg?auto=compress&cs=tinysrgb&w=800".to_string(),
            ],
            inject_reveal_styles: true,
            reset_keyboard_mode_on_pointer: true,
        }
    }
}

impl SiteConfig {
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: SiteConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.timing;

        for (name, v) in [
            ("reveal_threshold", t.reveal_threshold),
            ("counter_threshold", t.counter_threshold),
            ("lazy_threshold", t.lazy_threshold),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(SiteError::InvalidConfig(format!(
                    "{name} must be within 0..=1"
                )));
            }
        }

        for (name, v) in [
            ("scrolled_threshold_px", t.scrolled_threshold_px),
            ("anchor_offset_px", t.anchor_offset_px),
            ("section_lookahead_px", t.section_lookahead_px),
            ("hero_parallax_rate", t.hero_parallax_rate),
            ("default_parallax_speed", t.default_parallax_speed),
            ("stats_breakpoint_px", t.stats_breakpoint_px),
        ] {
            if !v.is_finite() {
                return Err(SiteError::InvalidConfig(format!("{name} must be finite")));
            }
        }

        if t.counter_steps == 0 {
            return Err(SiteError::InvalidConfig(
                "counter_steps must be at least 1".to_string(),
            ));
        }

        let selectors = &self.selectors;
        for (name, v) in [
            ("navbar", &selectors.navbar),
            ("hamburger", &selectors.hamburger),
            ("nav_menu", &selectors.nav_menu),
            ("nav_link", &selectors.nav_link),
            ("section", &selectors.section),
        ] {
            if v.trim().is_empty() {
                return Err(SiteError::InvalidConfig(format!(
                    "selector {name} must not be empty"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = SiteConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.timing.resize_debounce(), Duration::from_millis(250));
        assert_eq!(cfg.timing.counter_tick(), Duration::from_millis(20));
        assert_eq!(cfg.preload_images.len(), 2);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut cfg = SiteConfig::default();
        cfg.timing.counter_threshold = 1.5;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("counter_threshold"));
    }

    #[test]
    fn rejects_zero_counter_steps_and_empty_selectors() {
        let mut cfg = SiteConfig::default();
        cfg.timing.counter_steps = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = SiteConfig::default();
        cfg.selectors.hamburger = "  ".to_string();
        assert!(cfg.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_override_keeps_unspecified_defaults() {
        let cfg = SiteConfig::from_json_str(
            r#"{
                "timing": { "anchor_offset_px": 90 },
                "classes": { "scrolled": "is-scrolled" },
                "preload_images": []
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.timing.anchor_offset_px, 90.0);
        assert_eq!(cfg.timing.section_lookahead_px, 200.0);
        assert_eq!(cfg.classes.scrolled, "is-scrolled");
        assert_eq!(cfg.classes.active, "active");
        assert_eq!(cfg.attributes.counter_done, "data-counted");
        assert!(cfg.preload_images.is_empty());
        assert!(cfg.reset_keyboard_mode_on_pointer);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_errors_surface_as_site_errors() {
        assert!(matches!(
            SiteConfig::from_json_str("{ not json"),
            Err(SiteError::Config(_))
        ));
        assert!(matches!(
            SiteConfig::from_json_str(r#"{ "timing": { "reveal_threshold": 2.0 } }"#),
            Err(SiteError::InvalidConfig(_))
        ));
    }
}
