//! Site configuration.
//!
//! Every tuning constant the controllers use lives here with a default. A page
//! may override any subset by embedding a JSON block:
//!
//! ```html
//! <script type="application/json" id="site-config">
//!   { "carousel": { "ease": 0.15, "wheel_sensitivity": 0.25 },
//!     "disabled_icons": ["Medium"] }
//! </script>
//! ```
//!
//! Config blocks are sparse: omitted keys keep their defaults. Unknown keys
//! are rejected to catch typos early.

use serde::Deserialize;

use crate::error::{Result, SiteError};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// URL of the project list, relative to the page.
    pub data_url: String,
    /// `data-icon` values whose links must not navigate. Substack by default.
    pub disabled_icons: Vec<String>,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    pub carousel: CarouselConfig,
    pub router: RouterConfig,
    pub gallery: GalleryConfig,
    pub loading: LoadingConfig,
    pub hover: HoverConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            data_url: "projects.json".to_string(),
            disabled_icons: vec!["Substack".to_string()],
            log_level: "info".to_string(),
            carousel: CarouselConfig::default(),
            router: RouterConfig::default(),
            gallery: GalleryConfig::default(),
            loading: LoadingConfig::default(),
            hover: HoverConfig::default(),
        }
    }
}

/// Drag, wheel and easing constants for the main track.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Fraction of the remaining distance covered per frame.
    pub ease: f64,
    /// Distance (in percent) below which easing snaps to the target.
    pub epsilon: f64,
    /// Wheel delta multiplier.
    pub wheel_sensitivity: f64,
    /// Per-frame velocity decay during momentum.
    pub friction: f64,
    /// Velocity clamp, in percent per frame.
    pub max_velocity: f64,
    /// Momentum stops below this speed.
    pub min_velocity: f64,
    /// Quiet period after the last wheel event before momentum starts.
    pub momentum_delay_ms: u32,
    /// A click must land within this long after pointer-down.
    pub click_max_ms: f64,
    /// A click must move less than this on each axis.
    pub click_max_px: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            ease: 0.12,
            epsilon: 0.005,
            wheel_sensitivity: 0.45,
            friction: 0.92,
            max_velocity: 2.0,
            min_velocity: 0.1,
            momentum_delay_ms: 100,
            click_max_ms: 200.0,
            click_max_px: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Delay between fading out the old page and activating the new one.
    pub fade_in_delay_ms: u32,
    /// How long `page-transitioning` stays on after activation.
    pub transition_ms: u32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            fade_in_delay_ms: 50,
            transition_ms: 700,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    pub interval_ms: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self { interval_ms: 4000 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadingConfig {
    pub duration_ms: f64,
    pub reveal_delay_ms: u32,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000.0,
            reveal_delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HoverConfig {
    /// Half of the caption's CSS fade duration.
    pub swap_delay_ms: u32,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self { swap_delay_ms: 250 }
    }
}

impl SiteConfig {
    /// Parse a sparse JSON override and validate the result.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: SiteConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let c = &self.carousel;
        if !(c.ease > 0.0 && c.ease <= 1.0) {
            return Err(SiteError::Config(format!(
                "carousel.ease must be in (0, 1], got {}",
                c.ease
            )));
        }
        if !(c.friction > 0.0 && c.friction < 1.0) {
            return Err(SiteError::Config(format!(
                "carousel.friction must be in (0, 1), got {}",
                c.friction
            )));
        }
        if c.epsilon <= 0.0 {
            return Err(SiteError::Config("carousel.epsilon must be positive".into()));
        }
        if c.min_velocity <= 0.0 || c.max_velocity < c.min_velocity {
            return Err(SiteError::Config(format!(
                "carousel velocity bounds invalid: min {} max {}",
                c.min_velocity, c.max_velocity
            )));
        }
        if c.wheel_sensitivity <= 0.0 {
            return Err(SiteError::Config(
                "carousel.wheel_sensitivity must be positive".into(),
            ));
        }
        if self.gallery.interval_ms == 0 {
            return Err(SiteError::Config("gallery.interval_ms must be non-zero".into()));
        }
        if self.loading.duration_ms <= 0.0 {
            return Err(SiteError::Config("loading.duration_ms must be positive".into()));
        }
        if self.data_url.trim().is_empty() {
            return Err(SiteError::Config("data_url must not be empty".into()));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        self.log_level
            .parse::<log::LevelFilter>()
            .map_err(|_| SiteError::Config(format!("unknown log_level: {}", self.log_level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = SiteConfig::default();
        config.validate().unwrap();
        assert_eq!(config.carousel.ease, 0.12);
        assert_eq!(config.carousel.wheel_sensitivity, 0.45);
        assert_eq!(config.level_filter().unwrap(), log::LevelFilter::Info);
    }

    #[test]
    fn sparse_override_keeps_other_defaults() {
        let config = SiteConfig::from_json(r#"{"carousel": {"ease": 0.15}}"#).unwrap();
        assert_eq!(config.carousel.ease, 0.15);
        assert_eq!(config.carousel.friction, 0.92);
        assert_eq!(config.router, RouterConfig::default());
        assert_eq!(config.data_url, "projects.json");
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = SiteConfig::from_json(r#"{"carousel": {"eas": 0.15}}"#).unwrap_err();
        assert!(matches!(err, SiteError::Json(_)));
    }

    #[test]
    fn out_of_range_ease_rejected() {
        let err = SiteConfig::from_json(r#"{"carousel": {"ease": 1.5}}"#).unwrap_err();
        assert!(err.to_string().contains("carousel.ease"));
    }

    #[test]
    fn friction_of_one_rejected() {
        let err = SiteConfig::from_json(r#"{"carousel": {"friction": 1.0}}"#).unwrap_err();
        assert!(matches!(err, SiteError::Config(_)));
    }

    #[test]
    fn bad_log_level_rejected() {
        let err = SiteConfig::from_json(r#"{"log_level": "loud"}"#).unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn disabled_icons_parsed() {
        let config = SiteConfig::from_json(r#"{"disabled_icons": ["Medium"]}"#).unwrap();
        assert_eq!(config.disabled_icons, vec!["Medium".to_string()]);

        let config = SiteConfig::from_json(r#"{"disabled_icons": []}"#).unwrap();
        assert!(config.disabled_icons.is_empty());
    }

    #[test]
    fn substack_disabled_without_config() {
        let config = SiteConfig::from_json("{}").unwrap();
        assert_eq!(config.disabled_icons, vec!["Substack".to_string()]);
    }
}
