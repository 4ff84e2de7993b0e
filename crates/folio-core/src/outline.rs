#![forbid(unsafe_code)]

//! The page structure the engine works against, and the host's read seam.
//!
//! The markup is owned elsewhere. At startup the host walks the document
//! once and reports what it found as a [`PageOutline`]; every element is
//! afterwards referred to by its index in that outline. Geometry changes
//! with every scroll and resize, so it is never stored: the engine reads it
//! through [`LayoutProbe`] at the moment a rule is evaluated.

use crate::viewport::Viewport;

/// A content section (`.section`), in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionInfo {
    /// The element id, if it has one. Only identified sections take part in
    /// scroll spying; all sections take part in reveal animations.
    pub id: Option<String>,
}

impl SectionInfo {
    #[must_use]
    pub fn identified(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }
}

/// A navigation link (`.nav-link`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavLinkInfo {
    /// Target identifier of an in-page `href="#id"`; `None` for other links.
    pub target: Option<String>,
}

impl NavLinkInfo {
    #[must_use]
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
        }
    }
}

/// An in-page anchor (`a[href^="#"]`, skip link excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorInfo {
    /// Identifier after the `#`; may be empty for a bare `href="#"`.
    pub target: String,
    /// Index into [`PageOutline::nav_links`] when the anchor is also a nav link.
    pub nav_link: Option<usize>,
}

/// The two independent card lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardGroup {
    Experience,
    Projects,
}

impl CardGroup {
    pub const ALL: [Self; 2] = [Self::Experience, Self::Projects];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Experience => "experience",
            Self::Projects => "projects",
        }
    }
}

/// What the host found for one card group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardGroupInfo {
    /// Whether the list container element exists.
    pub container: bool,
    /// Number of card elements.
    pub cards: usize,
}

impl CardGroupInfo {
    #[must_use]
    pub const fn with_cards(cards: usize) -> Self {
        Self {
            container: true,
            cards,
        }
    }

    /// Hover emphasis needs the container and at least one card.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.container && self.cards > 0
    }
}

/// Everything the host discovered in the document at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageOutline {
    pub sections: Vec<SectionInfo>,
    pub nav_links: Vec<NavLinkInfo>,
    pub anchors: Vec<AnchorInfo>,
    pub experience: CardGroupInfo,
    pub projects: CardGroupInfo,
    pub lazy_images: usize,
    pub has_spotlight: bool,
    pub has_skip_link: bool,
    pub has_main_content: bool,
    pub has_special_text: bool,
}

impl PageOutline {
    #[must_use]
    pub const fn group(&self, group: CardGroup) -> &CardGroupInfo {
        match group {
            CardGroup::Experience => &self.experience,
            CardGroup::Projects => &self.projects,
        }
    }

    /// First nav link pointing at `id`.
    #[must_use]
    pub fn nav_link_for(&self, id: &str) -> Option<usize> {
        self.nav_links
            .iter()
            .position(|link| link.target.as_deref() == Some(id))
    }

    /// Whether at least one section carries an identifier.
    #[must_use]
    pub fn has_identified_sections(&self) -> bool {
        self.sections.iter().any(|section| section.id.is_some())
    }
}

/// Platform facts sampled once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Platform {
    /// `(prefers-reduced-motion: reduce)` matched.
    pub prefers_reduced_motion: bool,
    /// `IntersectionObserver` is available.
    pub intersection_observer: bool,
    /// `window.location.hostname`.
    pub hostname: String,
}

impl Platform {
    /// Local development hosts get extra console diagnostics.
    #[must_use]
    pub fn is_dev_host(&self) -> bool {
        matches!(self.hostname.as_str(), "localhost" | "127.0.0.1")
    }
}

/// Document-flow bounds of a section.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SectionBounds {
    /// Distance from the document top (`rect.top + scrollY`).
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    #[must_use]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// An element reachable by `#id`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnchorTarget {
    /// `offsetTop` of the element.
    pub offset_top: f64,
    /// Its `aria-label`, if any.
    pub label: Option<String>,
}

/// Live layout reads performed by the engine.
///
/// Implemented by the web host over the real DOM and by test fakes.
pub trait LayoutProbe {
    /// Current viewport and scroll sample.
    fn viewport(&self) -> Viewport;

    /// Bounds of the section at `index` in [`PageOutline::sections`].
    fn section_bounds(&self, index: usize) -> Option<SectionBounds>;

    /// Resolve `#id` anywhere in the document.
    fn target(&self, id: &str) -> Option<AnchorTarget>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline() -> PageOutline {
        PageOutline {
            sections: vec![
                SectionInfo::identified("about"),
                SectionInfo::default(),
                SectionInfo::identified("work"),
            ],
            nav_links: vec![
                NavLinkInfo::default(),
                NavLinkInfo::to("work"),
                NavLinkInfo::to("work"),
            ],
            ..PageOutline::default()
        }
    }

    #[test]
    fn nav_link_lookup_picks_first_match() {
        assert_eq!(outline().nav_link_for("work"), Some(1));
        assert_eq!(outline().nav_link_for("about"), None);
    }

    #[test]
    fn group_needs_container_and_cards() {
        assert!(CardGroupInfo::with_cards(3).is_enabled());
        assert!(!CardGroupInfo::with_cards(0).is_enabled());
        assert!(
            !CardGroupInfo {
                container: false,
                cards: 4
            }
            .is_enabled()
        );
    }

    #[test]
    fn dev_hosts() {
        let mut platform = Platform::default();
        platform.hostname = "localhost".into();
        assert!(platform.is_dev_host());
        platform.hostname = "127.0.0.1".into();
        assert!(platform.is_dev_host());
        platform.hostname = "example.com".into();
        assert!(!platform.is_dev_host());
    }
}
