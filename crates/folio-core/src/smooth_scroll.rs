#![forbid(unsafe_code)]

//! Animated in-page navigation and the programmatic-scroll lock.
//!
//! While a smooth scroll triggered by the page itself is in flight, the
//! scroll spy must not react to the intermediate positions, otherwise the
//! highlight flickers through every section between origin and target.
//! [`ScrollLock`] is the one value shared between the two features: this
//! module takes it, the spy reads it.
//!
//! The lock is released by whichever comes first: the platform's
//! `scrollend` signal, or a fallback deadline for hosts (or no-op scrolls)
//! that never produce one.

use crate::config::InteractionConfig;
use crate::viewport::ViewportClass;

/// Document offset to scroll to so that a target at `offset_top` clears the
/// header. Never negative.
#[must_use]
pub fn scroll_target_top(offset_top: f64, class: ViewportClass, config: &InteractionConfig) -> f64 {
    (offset_top - class.header_clearance(config)).max(0.0)
}

/// "Programmatic scroll in progress" flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollLock {
    held: bool,
}

impl ScrollLock {
    #[must_use]
    pub const fn is_held(self) -> bool {
        self.held
    }

    pub fn acquire(&mut self) {
        self.held = true;
    }

    /// Release the lock. Returns whether it was held.
    pub fn release(&mut self) -> bool {
        core::mem::take(&mut self.held)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_and_narrow_offsets() {
        let cfg = InteractionConfig::default();
        let wide = ViewportClass::of(1200.0, &cfg);
        let narrow = ViewportClass::of(900.0, &cfg);
        assert_eq!(scroll_target_top(800.0, wide, &cfg), 750.0);
        assert_eq!(scroll_target_top(800.0, narrow, &cfg), 700.0);
    }

    #[test]
    fn target_near_top_clamps_to_zero() {
        let cfg = InteractionConfig::default();
        assert_eq!(scroll_target_top(30.0, ViewportClass::Narrow, &cfg), 0.0);
    }

    #[test]
    fn release_reports_previous_state() {
        let mut lock = ScrollLock::default();
        assert!(!lock.release());
        lock.acquire();
        assert!(lock.is_held());
        assert!(lock.release());
        assert!(!lock.is_held());
    }
}
