#![forbid(unsafe_code)]

//! Scroll spy: which section is current, and which nav link shows it.
//!
//! # Rule
//!
//! A section is current when the scroll offset lies in
//! `[top - spy_offset, top + height - spy_offset)`. When several sections
//! match, the last one in document order wins. When the visible area
//! reaches within `bottom_threshold_px` of the document end, the last nav
//! link is forced active regardless of geometry, because short trailing
//! sections can never scroll far enough to match on their own.
//!
//! # Invariants
//!
//! 1. At most one nav link carries the active marker after any update.
//! 2. The first update clears every link, so a marker preset in the markup
//!    never survives next to the computed one.
//! 3. An evaluation with no matching section leaves the marker unchanged.

use crate::command::DomCommand;
use crate::config::InteractionConfig;
use crate::outline::{LayoutProbe, PageOutline, SectionBounds};
use crate::viewport::Viewport;

/// Whether `scroll_y` falls inside the current-section window of `bounds`.
#[must_use]
pub fn section_is_current(scroll_y: f64, bounds: SectionBounds, spy_offset: f64) -> bool {
    scroll_y >= bounds.top - spy_offset && scroll_y < bounds.top + bounds.height - spy_offset
}

/// Indices of identified sections whose window contains the scroll offset,
/// in document order.
pub fn matching_sections<'a, P>(
    outline: &'a PageOutline,
    probe: &'a P,
    viewport: &Viewport,
    config: &InteractionConfig,
) -> impl Iterator<Item = usize> + 'a
where
    P: LayoutProbe + ?Sized,
{
    let scroll_y = viewport.scroll_y;
    let spy_offset = config.spy_offset_px;
    outline
        .sections
        .iter()
        .enumerate()
        .filter(|(_, section)| section.id.is_some())
        .filter_map(|(idx, _)| probe.section_bounds(idx).map(|bounds| (idx, bounds)))
        .filter(move |(_, bounds)| section_is_current(scroll_y, *bounds, spy_offset))
        .map(|(idx, _)| idx)
}

/// Section the spy highlights by geometry alone (no bottom override): the
/// last match wins, so a nested section takes precedence over its parent.
#[must_use]
pub fn current_section<P>(
    outline: &PageOutline,
    probe: &P,
    viewport: &Viewport,
    config: &InteractionConfig,
) -> Option<usize>
where
    P: LayoutProbe + ?Sized,
{
    matching_sections(outline, probe, viewport, config).last()
}

/// First matching section in document order, as reported by
/// `portfolioUtils.getCurrentSection()`.
#[must_use]
pub fn first_matching_section<P>(
    outline: &PageOutline,
    probe: &P,
    viewport: &Viewport,
    config: &InteractionConfig,
) -> Option<usize>
where
    P: LayoutProbe + ?Sized,
{
    matching_sections(outline, probe, viewport, config).next()
}

/// Nav link the spy wants active for this viewport, if any.
#[must_use]
pub fn target_link<P>(
    outline: &PageOutline,
    probe: &P,
    viewport: &Viewport,
    config: &InteractionConfig,
) -> Option<usize>
where
    P: LayoutProbe + ?Sized,
{
    if viewport.is_near_bottom(config) {
        return outline.nav_links.len().checked_sub(1);
    }
    let section = current_section(outline, probe, viewport, config)?;
    let id = outline.sections[section].id.as_deref()?;
    outline.nav_link_for(id)
}

/// Tracks the active marker across nav links.
#[derive(Debug, Clone, Default)]
pub struct NavHighlight {
    links: usize,
    active: Option<usize>,
    synced: bool,
}

impl NavHighlight {
    #[must_use]
    pub const fn new(links: usize) -> Self {
        Self {
            links,
            active: None,
            synced: false,
        }
    }

    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    /// Make `link` the only active nav link.
    pub fn activate(&mut self, link: usize) -> Vec<DomCommand> {
        if link >= self.links {
            return Vec::new();
        }
        let mut commands = Vec::new();
        if self.synced {
            if self.active == Some(link) {
                return commands;
            }
            if let Some(prev) = self.active {
                commands.push(DomCommand::SetNavActive {
                    link: prev,
                    active: false,
                });
            }
        } else {
            commands.extend(
                (0..self.links)
                    .filter(|&idx| idx != link)
                    .map(|idx| DomCommand::SetNavActive {
                        link: idx,
                        active: false,
                    }),
            );
            self.synced = true;
        }
        commands.push(DomCommand::SetNavActive { link, active: true });
        self.active = Some(link);
        commands
    }
}

/// Spy state for one page view.
#[derive(Debug, Clone, Default)]
pub struct ScrollSpy {
    enabled: bool,
    highlight: NavHighlight,
}

impl ScrollSpy {
    /// Enabled only when the page has identified sections and nav links.
    #[must_use]
    pub fn new(outline: &PageOutline) -> Self {
        Self {
            enabled: outline.has_identified_sections() && !outline.nav_links.is_empty(),
            highlight: NavHighlight::new(outline.nav_links.len()),
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub const fn active_link(&self) -> Option<usize> {
        self.highlight.active()
    }

    /// Run the rule against the current layout and update the marker.
    pub fn evaluate<P>(
        &mut self,
        outline: &PageOutline,
        probe: &P,
        config: &InteractionConfig,
    ) -> Vec<DomCommand>
    where
        P: LayoutProbe + ?Sized,
    {
        if !self.enabled {
            return Vec::new();
        }
        let viewport = probe.viewport();
        match target_link(outline, probe, &viewport, config) {
            Some(link) => {
                let commands = self.highlight.activate(link);
                if !commands.is_empty() {
                    tracing::trace!(link, scroll_y = viewport.scroll_y, "scroll spy moved highlight");
                }
                commands
            }
            None => Vec::new(),
        }
    }
}
