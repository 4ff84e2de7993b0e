#![forbid(unsafe_code)]

//! Viewport sampling and the single breakpoint query.
//!
//! Hover emphasis, scroll-target clearance and the resize reset all depend
//! on whether the layout is narrow or wide. They ask [`ViewportClass::of`]
//! instead of comparing widths themselves, so the breakpoint lives in one
//! place ([`InteractionConfig::breakpoint_px`]).

use crate::config::InteractionConfig;

/// One sample of the browser viewport, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// `window.innerWidth`.
    pub width: f64,
    /// `window.innerHeight`.
    pub height: f64,
    /// `window.scrollY`.
    pub scroll_y: f64,
    /// `document.documentElement.scrollHeight`.
    pub document_height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64, scroll_y: f64, document_height: f64) -> Self {
        Self {
            width,
            height,
            scroll_y,
            document_height,
        }
    }

    #[must_use]
    pub fn class(&self, config: &InteractionConfig) -> ViewportClass {
        ViewportClass::of(self.width, config)
    }

    /// Whether the visible area reaches within `bottom_threshold_px` of the
    /// document end.
    #[must_use]
    pub fn is_near_bottom(&self, config: &InteractionConfig) -> bool {
        self.scroll_y + self.height >= self.document_height - config.bottom_threshold_px
    }
}

/// Layout class derived from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportClass {
    /// Below the breakpoint: stacked layout with a sticky header.
    Narrow,
    /// At or above the breakpoint: two-column layout.
    Wide,
}

impl ViewportClass {
    #[must_use]
    pub fn of(width: f64, config: &InteractionConfig) -> Self {
        if width < config.breakpoint_px {
            Self::Narrow
        } else {
            Self::Wide
        }
    }

    #[must_use]
    pub const fn is_wide(self) -> bool {
        matches!(self, Self::Wide)
    }

    /// Vertical space kept free above a scroll target.
    #[must_use]
    pub fn header_clearance(self, config: &InteractionConfig) -> f64 {
        match self {
            Self::Narrow => config.header_clearance_narrow_px,
            Self::Wide => config.header_clearance_wide_px,
        }
    }
}
