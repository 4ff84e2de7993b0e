#![forbid(unsafe_code)]

//! Tuning knobs for the interaction engine.
//!
//! Every field has a default matching the page's stylesheet assumptions, so
//! an empty JSON object (or no configuration at all) yields a working
//! engine. Hosts that embed configuration deserialize it with
//! [`InteractionConfig::from_json`], which also runs [`InteractionConfig::validate`].

use core::time::Duration;

use serde::Deserialize;

/// Configuration rejected by [`InteractionConfig::from_json`] or
/// [`InteractionConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must lie in [0, 1] (got {value})")]
    OutOfUnitRange { field: &'static str, value: f64 },
    #[error("unknown log level {0:?}")]
    UnknownLogLevel(String),
}

/// Engine configuration.
///
/// Lengths are CSS pixels, delays are milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Viewport width at and above which the layout is considered wide.
    pub breakpoint_px: f64,
    /// Distance above a section's top at which it already counts as current.
    pub spy_offset_px: f64,
    /// Distance from the document end that forces the last nav link active.
    pub bottom_threshold_px: f64,
    /// Quiet period after the last scroll signal before the spy re-evaluates.
    pub spy_debounce_ms: u64,
    /// Quiet period after the last resize signal before card overrides reset.
    pub resize_debounce_ms: u64,
    /// Fallback release of the scroll lock when no completion signal arrives.
    pub scroll_lock_ms: u64,
    /// Header clearance subtracted from scroll targets on narrow viewports.
    pub header_clearance_narrow_px: f64,
    /// Header clearance subtracted from scroll targets on wide viewports.
    pub header_clearance_wide_px: f64,
    /// Opacity applied to the siblings of a hovered card.
    pub dimmed_opacity: f32,
    /// Lifetime of one live-region announcement node.
    pub announcement_ttl_ms: u64,
    /// Delay between the page load signal and the reveal setup.
    pub reveal_delay_ms: u64,
    /// Visible fraction of a section that triggers its reveal.
    pub reveal_threshold: f64,
    /// Bottom margin shrinking the reveal trigger zone.
    pub reveal_bottom_margin_px: f64,
    /// Initial downward offset of a hidden section.
    pub reveal_offset_px: f64,
    /// Duration of the reveal transition.
    pub reveal_transition_ms: u64,
    /// Gap between clearing and restoring the special-text animation.
    pub animation_restart_ms: u64,
    /// Maximum log level (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: 1024.0,
            spy_offset_px: 200.0,
            bottom_threshold_px: 50.0,
            spy_debounce_ms: 10,
            resize_debounce_ms: 250,
            scroll_lock_ms: 1000,
            header_clearance_narrow_px: 100.0,
            header_clearance_wide_px: 50.0,
            dimmed_opacity: 0.5,
            announcement_ttl_ms: 1000,
            reveal_delay_ms: 100,
            reveal_threshold: 0.1,
            reveal_bottom_margin_px: 50.0,
            reveal_offset_px: 20.0,
            reveal_transition_ms: 600,
            animation_restart_ms: 10,
            log_level: "info".to_string(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl InteractionConfig {
    /// Parse and validate a JSON configuration object.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("breakpoint_px", self.breakpoint_px)?;
        non_negative("spy_offset_px", self.spy_offset_px)?;
        non_negative("bottom_threshold_px", self.bottom_threshold_px)?;
        non_negative("header_clearance_narrow_px", self.header_clearance_narrow_px)?;
        non_negative("header_clearance_wide_px", self.header_clearance_wide_px)?;
        non_negative("reveal_bottom_margin_px", self.reveal_bottom_margin_px)?;
        non_negative("reveal_offset_px", self.reveal_offset_px)?;
        unit("dimmed_opacity", f64::from(self.dimmed_opacity))?;
        unit("reveal_threshold", self.reveal_threshold)?;
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::UnknownLogLevel(self.log_level.clone()));
        }
        Ok(())
    }

    #[must_use]
    pub const fn spy_debounce(&self) -> Duration {
        Duration::from_millis(self.spy_debounce_ms)
    }

    #[must_use]
    pub const fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    #[must_use]
    pub const fn scroll_lock(&self) -> Duration {
        Duration::from_millis(self.scroll_lock_ms)
    }

    #[must_use]
    pub const fn announcement_ttl(&self) -> Duration {
        Duration::from_millis(self.announcement_ttl_ms)
    }

    #[must_use]
    pub const fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    #[must_use]
    pub const fn animation_restart(&self) -> Duration {
        Duration::from_millis(self.animation_restart_ms)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}
