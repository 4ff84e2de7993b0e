#![forbid(unsafe_code)]

//! Browser signals delivered to the engine.

use crate::outline::CardGroup;

/// Key identity for `keydown`; only Tab matters to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Other,
}

impl Key {
    /// Normalize a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        if key == "Tab" { Self::Tab } else { Self::Other }
    }
}

/// One signal from the host, with element references as outline indices.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// `scroll` on the window.
    Scroll,
    /// `scrollend` on the window: a scroll (smooth or not) has settled.
    ScrollEnd,
    /// `resize` on the window.
    Resize,
    /// Click on the in-page anchor at this index.
    AnchorClicked { anchor: usize },
    /// `mouseenter` on a card.
    CardEnter { group: CardGroup, card: usize },
    /// `mouseleave` on a card.
    CardLeave { group: CardGroup, card: usize },
    /// `keydown` anywhere in the document.
    KeyDown(Key),
    /// `mousedown` anywhere in the document.
    MouseDown,
    /// Click on the skip-to-content link.
    SkipLinkActivated,
    /// Click on the special-text element.
    SpecialTextClicked,
    /// The window `load` event.
    PageLoaded,
    /// The reduced-motion media query changed.
    ReducedMotionChanged(bool),
    /// Intersection report for a section being watched for reveal.
    SectionVisibility { section: usize, intersecting: bool },
    /// Intersection report for a deferred image.
    ImageVisibility { image: usize, intersecting: bool },
}
