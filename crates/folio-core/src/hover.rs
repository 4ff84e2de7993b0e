#![forbid(unsafe_code)]

//! Hover emphasis for the experience and project card lists.
//!
//! On wide viewports, pointing at a card dims its siblings so the hovered
//! entry stands out. The engine remembers which cards it dimmed, so every
//! reset touches exactly the overrides it created and nothing else: after a
//! leave or a narrow-viewport reset, each card is back to its stylesheet
//! opacity.

use crate::command::DomCommand;
use crate::outline::{CardGroup, PageOutline};
use crate::viewport::ViewportClass;

/// Emphasis state of one card group.
#[derive(Debug, Clone)]
pub struct GroupEmphasis {
    group: CardGroup,
    enabled: bool,
    dimmed: Vec<bool>,
}

impl GroupEmphasis {
    #[must_use]
    pub fn new(group: CardGroup, outline: &PageOutline) -> Self {
        let info = outline.group(group);
        Self {
            group,
            enabled: info.is_enabled(),
            dimmed: vec![false; info.cards],
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_dimmed(&self, card: usize) -> bool {
        self.dimmed.get(card).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn dimmed_count(&self) -> usize {
        self.dimmed.iter().filter(|&&d| d).count()
    }

    /// Pointer entered `card`.
    pub fn enter(&mut self, card: usize, class: ViewportClass, opacity: f32) -> Vec<DomCommand> {
        if !self.enabled || !class.is_wide() || card >= self.dimmed.len() {
            return Vec::new();
        }
        let group = self.group;
        let mut commands = Vec::new();
        for (idx, dimmed) in self.dimmed.iter_mut().enumerate() {
            let want = idx != card;
            if *dimmed != want {
                *dimmed = want;
                commands.push(DomCommand::SetCardOpacity {
                    group,
                    card: idx,
                    opacity: want.then_some(opacity),
                });
            }
        }
        commands
    }

    /// Pointer left a card. Restores the whole group whatever the viewport
    /// width, so a leave after a narrowing resize cannot strand overrides.
    pub fn leave(&mut self) -> Vec<DomCommand> {
        self.clear()
    }

    /// Remove every override this group holds.
    pub fn clear(&mut self) -> Vec<DomCommand> {
        let group = self.group;
        self.dimmed
            .iter_mut()
            .enumerate()
            .filter(|(_, dimmed)| **dimmed)
            .map(|(idx, dimmed)| {
                *dimmed = false;
                DomCommand::SetCardOpacity {
                    group,
                    card: idx,
                    opacity: None,
                }
            })
            .collect()
    }
}

/// Both card groups.
#[derive(Debug, Clone)]
pub struct HoverEffects {
    experience: GroupEmphasis,
    projects: GroupEmphasis,
}

impl HoverEffects {
    #[must_use]
    pub fn new(outline: &PageOutline) -> Self {
        Self {
            experience: GroupEmphasis::new(CardGroup::Experience, outline),
            projects: GroupEmphasis::new(CardGroup::Projects, outline),
        }
    }

    #[must_use]
    pub const fn group(&self, group: CardGroup) -> &GroupEmphasis {
        match group {
            CardGroup::Experience => &self.experience,
            CardGroup::Projects => &self.projects,
        }
    }

    pub fn group_mut(&mut self, group: CardGroup) -> &mut GroupEmphasis {
        match group {
            CardGroup::Experience => &mut self.experience,
            CardGroup::Projects => &mut self.projects,
        }
    }

    /// Clear overrides in every group.
    pub fn clear_all(&mut self) -> Vec<DomCommand> {
        let mut commands = self.experience.clear();
        commands.extend(self.projects.clear());
        commands
    }
}
