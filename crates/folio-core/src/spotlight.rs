#![forbid(unsafe_code)]

//! The decorative spotlight overlay.
//!
//! The gradient is anchored by the stylesheet at the top-left corner and is
//! not driven by pointer movement. Only its position query is exposed.

use serde::Serialize;

/// Position of the spotlight gradient, in percent of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpotlightPosition {
    pub x: f64,
    pub y: f64,
    pub position: &'static str,
}

impl SpotlightPosition {
    pub const TOP_LEFT: Self = Self {
        x: 0.0,
        y: 0.0,
        position: "top-left",
    };
}
