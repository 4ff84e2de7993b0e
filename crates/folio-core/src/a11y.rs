#![forbid(unsafe_code)]

//! Accessibility affordances: keyboard-navigation mode and live-region
//! announcements.

use core::fmt;

use crate::command::DomCommand;
use crate::event::Key;

/// Handle of one announcement node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnouncementId(pub u64);

impl fmt::Display for AnnouncementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "announcement-{}", self.0)
    }
}

/// Message read out after navigating to a section.
///
/// Blank labels count as missing and fall back to the raw identifier.
#[must_use]
pub fn navigation_message(target_id: &str, label: Option<&str>) -> String {
    let name = label
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .unwrap_or(target_id);
    format!("Navigated to {name} section")
}

/// Focus-outline mode: on after Tab, off after any mouse press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardMode {
    enabled: bool,
}

impl KeyboardMode {
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        self.enabled
    }

    pub fn key_down(&mut self, key: Key) -> Option<DomCommand> {
        if key == Key::Tab && !self.enabled {
            self.enabled = true;
            return Some(DomCommand::SetKeyboardNav(true));
        }
        None
    }

    pub fn mouse_down(&mut self) -> Option<DomCommand> {
        if self.enabled {
            self.enabled = false;
            return Some(DomCommand::SetKeyboardNav(false));
        }
        None
    }
}

/// Allocates announcement nodes and tracks the ones still attached.
///
/// Each announcement owns its node from insertion to removal; nodes are
/// never reused for a second message.
#[derive(Debug, Clone, Default)]
pub struct Announcer {
    next_id: u64,
    live: Vec<AnnouncementId>,
}

impl Announcer {
    /// Create a node for `message`. The caller schedules its removal.
    pub fn announce(&mut self, message: String) -> (AnnouncementId, DomCommand) {
        let id = AnnouncementId(self.next_id);
        self.next_id += 1;
        self.live.push(id);
        (id, DomCommand::InsertAnnouncement { id, message })
    }

    /// Detach the node for `id` if it is still attached.
    pub fn expire(&mut self, id: AnnouncementId) -> Option<DomCommand> {
        let idx = self.live.iter().position(|&live| live == id)?;
        self.live.remove(idx);
        Some(DomCommand::RemoveAnnouncement { id })
    }

    #[must_use]
    pub fn live(&self) -> &[AnnouncementId] {
        &self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_prefers_label() {
        assert_eq!(
            navigation_message("about", Some("About me")),
            "Navigated to About me section"
        );
        assert_eq!(navigation_message("about", None), "Navigated to about section");
        assert_eq!(
            navigation_message("about", Some("   ")),
            "Navigated to about section"
        );
    }

    #[test]
    fn keyboard_mode_toggles_once_per_transition() {
        let mut mode = KeyboardMode::default();
        assert_eq!(mode.key_down(Key::Other), None);
        assert_eq!(mode.key_down(Key::Tab), Some(DomCommand::SetKeyboardNav(true)));
        assert_eq!(mode.key_down(Key::Tab), None);
        assert_eq!(mode.mouse_down(), Some(DomCommand::SetKeyboardNav(false)));
        assert_eq!(mode.mouse_down(), None);
        assert_eq!(mode.key_down(Key::Tab), Some(DomCommand::SetKeyboardNav(true)));
    }

    #[test]
    fn announcements_get_distinct_nodes() {
        let mut announcer = Announcer::default();
        let (a, _) = announcer.announce("one".into());
        let (b, _) = announcer.announce("two".into());
        assert_ne!(a, b);
        assert_eq!(announcer.live(), &[a, b]);
        assert_eq!(
            announcer.expire(a),
            Some(DomCommand::RemoveAnnouncement { id: a })
        );
        assert_eq!(announcer.expire(a), None);
        assert_eq!(announcer.live(), &[b]);
        assert_eq!(a.to_string(), "announcement-0");
    }
}
