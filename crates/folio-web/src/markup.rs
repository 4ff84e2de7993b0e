#![forbid(unsafe_code)]

//! Contract with the page markup and stylesheet.
//!
//! Selectors, class names and the inline style values the host writes.
//! Nothing here touches a DOM, so the translation from engine commands to
//! concrete CSS is testable natively.

use folio_core::{CardGroup, InteractionConfig, ScrollBehavior};

pub const SECTION: &str = ".section";
pub const NAV_LINK: &str = ".nav-link";
pub const IN_PAGE_ANCHOR: &str = "a[href^=\"#\"]";
pub const EXPERIENCE_LIST: &str = ".experience-list";
pub const EXPERIENCE_CARD: &str = ".experience-card";
pub const PROJECTS_LIST: &str = ".projects-list";
pub const PROJECT_CARD: &str = ".project-card";
pub const SPOTLIGHT: &str = ".spotlight-overlay";
pub const SKIP_LINK: &str = ".skip-to-content";
pub const MAIN_CONTENT_ID: &str = "content";
pub const SPECIAL_TEXT: &str = ".special-text";
pub const LAZY_IMAGE: &str = "img[loading=\"lazy\"]";
pub const CONFIG_SCRIPT_ID: &str = "portfolio-config";

pub const ACTIVE_CLASS: &str = "active";
pub const KEYBOARD_NAV_CLASS: &str = "keyboard-nav";
pub const LAZY_CLASS: &str = "lazy";

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    /// Unrecognized values count as `Interactive`: the tree is usable but
    /// `load` has not been observed.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "loading" => Self::Loading,
            "complete" => Self::Complete,
            _ => Self::Interactive,
        }
    }
}

/// Inline styles of a live-region node: present for assistive technology,
/// off-screen for everyone else.
pub const ANNOUNCEMENT_STYLE: [(&str, &str); 5] = [
    ("position", "absolute"),
    ("left", "-10000px"),
    ("width", "1px"),
    ("height", "1px"),
    ("overflow", "hidden"),
];

/// Attributes of a live-region node.
pub const ANNOUNCEMENT_ATTRS: [(&str, &str); 2] = [("aria-live", "polite"), ("aria-atomic", "true")];

/// Selectors of the list container and the cards of `group`.
#[must_use]
pub const fn card_selectors(group: CardGroup) -> (&'static str, &'static str) {
    match group {
        CardGroup::Experience => (EXPERIENCE_LIST, EXPERIENCE_CARD),
        CardGroup::Projects => (PROJECTS_LIST, PROJECT_CARD),
    }
}

/// Target identifier of an in-page `href`, without the leading `#`.
///
/// Returns `None` for anything that is not a fragment link.
#[must_use]
pub fn in_page_target(href: &str) -> Option<&str> {
    href.strip_prefix('#')
}

/// `scroll-behavior` / `ScrollToOptions.behavior` keyword.
#[must_use]
pub const fn behavior_keyword(behavior: ScrollBehavior) -> &'static str {
    match behavior {
        ScrollBehavior::Smooth => "smooth",
        ScrollBehavior::Instant => "auto",
    }
}

/// Inline `opacity` value for a card override.
#[must_use]
pub fn opacity_value(opacity: f32) -> String {
    format!("{opacity}")
}

/// Inline styles of a section waiting to be revealed.
#[must_use]
pub fn reveal_hidden_style(offset_px: f64, transition_ms: u64) -> [(&'static str, String); 3] {
    let secs = transition_ms as f64 / 1000.0;
    [
        ("opacity", "0".to_string()),
        ("transform", format!("translateY({offset_px}px)")),
        (
            "transition",
            format!("opacity {secs}s ease, transform {secs}s ease"),
        ),
    ]
}

/// Inline styles of a revealed section.
pub const REVEAL_SHOWN_STYLE: [(&str, &str); 2] = [("opacity", "1"), ("transform", "translateY(0)")];

/// `rootMargin` of the reveal observer.
#[must_use]
pub fn reveal_root_margin(config: &InteractionConfig) -> String {
    format!("0px 0px -{}px 0px", config.reveal_bottom_margin_px)
}
