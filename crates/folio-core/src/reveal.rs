#![forbid(unsafe_code)]

//! Visibility-driven one-shot effects: section reveal and deferred images.
//!
//! Both trackers follow the same lifecycle per element:
//! `Untracked -> Observed -> Done`. The transition to `Done` happens on the
//! first intersecting report and also emits the matching unobserve
//! command, so later reports for the element cannot reach it, and if they
//! do anyway they are ignored.

use crate::command::DomCommand;
use crate::config::InteractionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Untracked,
    Observed,
    Done,
}

/// Fade-in-on-visibility for sections.
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    phases: Vec<Phase>,
}

impl RevealTracker {
    #[must_use]
    pub fn new(sections: usize) -> Self {
        Self {
            phases: vec![Phase::Untracked; sections],
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.phases.iter().any(|&p| p != Phase::Untracked)
    }

    /// Hide every section and start observing it. Runs once.
    pub fn start(&mut self, config: &InteractionConfig) -> Vec<DomCommand> {
        if self.is_started() {
            return Vec::new();
        }
        let mut commands = Vec::with_capacity(self.phases.len() * 2);
        for (section, phase) in self.phases.iter_mut().enumerate() {
            *phase = Phase::Observed;
            commands.push(DomCommand::PrepareReveal {
                section,
                offset_px: config.reveal_offset_px,
                transition_ms: config.reveal_transition_ms,
            });
            commands.push(DomCommand::ObserveSection { section });
        }
        commands
    }

    /// Intersection report for `section`.
    pub fn visibility(&mut self, section: usize, intersecting: bool) -> Vec<DomCommand> {
        match self.phases.get_mut(section) {
            Some(phase) if intersecting && *phase == Phase::Observed => {
                *phase = Phase::Done;
                vec![
                    DomCommand::RevealSection { section },
                    DomCommand::UnobserveSection { section },
                ]
            }
            _ => Vec::new(),
        }
    }

    /// Reveal every section still waiting for visibility.
    pub fn reveal_pending(&mut self) -> Vec<DomCommand> {
        let mut commands = Vec::new();
        for (section, phase) in self.phases.iter_mut().enumerate() {
            if *phase == Phase::Observed {
                *phase = Phase::Done;
                commands.push(DomCommand::RevealSection { section });
                commands.push(DomCommand::UnobserveSection { section });
            }
        }
        commands
    }
}

/// Deferred loading for `img[loading="lazy"]`.
#[derive(Debug, Clone, Default)]
pub struct LazyImages {
    phases: Vec<Phase>,
}

impl LazyImages {
    #[must_use]
    pub fn new(images: usize) -> Self {
        Self {
            phases: vec![Phase::Untracked; images],
        }
    }

    /// Observe every image not yet tracked.
    pub fn start(&mut self) -> Vec<DomCommand> {
        self.phases
            .iter_mut()
            .enumerate()
            .filter(|(_, phase)| **phase == Phase::Untracked)
            .map(|(image, phase)| {
                *phase = Phase::Observed;
                DomCommand::ObserveImage { image }
            })
            .collect()
    }

    /// Intersection report for `image`.
    pub fn visibility(&mut self, image: usize, intersecting: bool) -> Vec<DomCommand> {
        match self.phases.get_mut(image) {
            Some(phase) if intersecting && *phase == Phase::Observed => {
                *phase = Phase::Done;
                vec![
                    DomCommand::LoadImage { image },
                    DomCommand::UnobserveImage { image },
                ]
            }
            _ => Vec::new(),
        }
    }
}
