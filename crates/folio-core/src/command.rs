#![forbid(unsafe_code)]

//! DOM mutations requested by the engine.
//!
//! The engine does not touch the document. It returns [`DomCommand`]s that
//! name elements by their index in the [`PageOutline`](crate::outline::PageOutline),
//! and the host applies them in order. This keeps every rule testable
//! without a browser and gives the host one place to translate intent into
//! classes, inline styles and observer calls.

use crate::a11y::AnnouncementId;
use crate::outline::CardGroup;

/// How a scroll request should move the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

impl ScrollBehavior {
    #[must_use]
    pub const fn for_motion(reduced_motion: bool) -> Self {
        if reduced_motion {
            Self::Instant
        } else {
            Self::Smooth
        }
    }
}

/// One mutation for the host to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum DomCommand {
    /// Add or remove the `active` marker on a nav link.
    SetNavActive { link: usize, active: bool },
    /// `window.scrollTo` to a document offset.
    ScrollTo { top: f64, behavior: ScrollBehavior },
    /// Inline opacity on a card; `None` removes the override.
    SetCardOpacity {
        group: CardGroup,
        card: usize,
        opacity: Option<f32>,
    },
    /// Toggle the body-level keyboard-navigation marker.
    SetKeyboardNav(bool),
    /// Focus the main-content landmark.
    FocusMainContent,
    /// Scroll the main-content landmark into view.
    ScrollMainIntoView(ScrollBehavior),
    /// Create, populate and attach a visually hidden live-region node.
    InsertAnnouncement { id: AnnouncementId, message: String },
    /// Detach a node created by [`DomCommand::InsertAnnouncement`].
    RemoveAnnouncement { id: AnnouncementId },
    /// Root `scroll-behavior`: `Some(Instant)` forces `auto`, `None`
    /// restores the stylesheet value.
    SetRootScrollBehavior(Option<ScrollBehavior>),
    /// Put a section in its hidden, offset starting state.
    PrepareReveal {
        section: usize,
        offset_px: f64,
        transition_ms: u64,
    },
    /// Start watching a section for visibility.
    ObserveSection { section: usize },
    /// Move a section to its visible, settled state.
    RevealSection { section: usize },
    /// Stop watching a section.
    UnobserveSection { section: usize },
    /// Start watching a deferred image for visibility.
    ObserveImage { image: usize },
    /// Trigger the image load and drop its `lazy` class.
    LoadImage { image: usize },
    /// Stop watching a deferred image.
    UnobserveImage { image: usize },
    /// `animation: none` on the special text.
    SuspendSpecialTextAnimation,
    /// Remove the inline animation override from the special text.
    RestoreSpecialTextAnimation,
}

/// Result of handling one host event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dispatch {
    /// The host should call `preventDefault()` on the originating event.
    pub prevent_default: bool,
    /// Mutations to apply, in order.
    pub commands: Vec<DomCommand>,
}

impl Dispatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.prevent_default && self.commands.is_empty()
    }
}
