#![forbid(unsafe_code)]

//! One page view's worth of interaction state.
//!
//! [`Session`] owns the state of every feature group plus the timer queue
//! and the clock. The host drives it with three calls:
//!
//! - [`Session::start`] once the document structure is ready,
//! - [`Session::handle`] for each browser signal,
//! - [`Session::advance`] when the platform timer armed for
//!   [`Session::next_deadline`] fires.
//!
//! Each returns the DOM mutations to apply. Timers that are already due
//! fire at the beginning of `handle`, so a signal never overtakes a
//! continuation scheduled before it.
//!
//! # Invariants
//!
//! 1. At most one nav link is active (see [`crate::scroll_spy`]).
//! 2. While the scroll lock is held, debounced spy evaluations are skipped.
//! 3. Every inserted announcement is removed exactly once, after its TTL.
//! 4. The clock never moves backwards; stale timestamps are ignored.

use core::time::Duration;

use tracing::{debug, info, trace};

use crate::a11y::{Announcer, KeyboardMode, navigation_message};
use crate::command::{Dispatch, DomCommand, ScrollBehavior};
use crate::config::{ConfigError, InteractionConfig};
use crate::event::HostEvent;
use crate::hover::HoverEffects;
use crate::outline::{CardGroup, LayoutProbe, PageOutline, Platform};
use crate::reveal::{LazyImages, RevealTracker};
use crate::scroll_spy::{self, ScrollSpy};
use crate::smooth_scroll::{ScrollLock, scroll_target_top};
use crate::spotlight::SpotlightPosition;
use crate::timer::{TimerKey, TimerQueue};

/// Names of the functions published on `window.portfolioUtils`.
pub const UTILITY_NAMES: [&str; 3] = ["scrollToSection", "getCurrentSection", "getSpotlightPosition"];

/// Interaction engine for one page view.
#[derive(Debug)]
pub struct Session {
    config: InteractionConfig,
    outline: PageOutline,
    platform: Platform,
    now: Duration,
    started: bool,
    timers: TimerQueue,
    reduced_motion: bool,
    scroll_lock: ScrollLock,
    spy: ScrollSpy,
    hover: HoverEffects,
    keyboard: KeyboardMode,
    announcer: Announcer,
    reveal: RevealTracker,
    reveal_requested: bool,
    images: LazyImages,
}

impl Session {
    /// Build a session for the discovered page. Fails only on invalid
    /// configuration.
    pub fn new(
        config: InteractionConfig,
        outline: PageOutline,
        platform: Platform,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            spy: ScrollSpy::new(&outline),
            hover: HoverEffects::new(&outline),
            reveal: RevealTracker::new(outline.sections.len()),
            images: LazyImages::new(outline.lazy_images),
            reduced_motion: platform.prefers_reduced_motion,
            config,
            outline,
            platform,
            now: Duration::ZERO,
            started: false,
            timers: TimerQueue::new(),
            scroll_lock: ScrollLock::default(),
            keyboard: KeyboardMode::default(),
            announcer: Announcer::default(),
            reveal_requested: false,
        })
    }

    /// Initialize every feature group. Subsequent calls do nothing.
    pub fn start<P>(&mut self, now: Duration, probe: &P) -> Vec<DomCommand>
    where
        P: LayoutProbe + ?Sized,
    {
        let mut commands = self.advance(now, probe);
        if self.started {
            return commands;
        }
        self.started = true;

        if self.reduced_motion {
            commands.push(DomCommand::SetRootScrollBehavior(Some(ScrollBehavior::Instant)));
        }

        if self.spy.is_enabled() {
            commands.extend(self.spy.evaluate(&self.outline, probe, &self.config));
        } else {
            debug!("scroll spy disabled: no identified sections or nav links");
        }

        if self.outline.has_spotlight {
            debug!("static spotlight effect initialized at top-left position");
        }

        for group in CardGroup::ALL {
            if !self.hover.group(group).is_enabled() {
                debug!(group = group.label(), "hover emphasis disabled for group");
            }
        }

        if self.platform.intersection_observer {
            commands.extend(self.images.start());
        } else if self.outline.lazy_images > 0 {
            debug!("lazy loading skipped: no IntersectionObserver");
        }

        info!(
            sections = self.outline.sections.len(),
            nav_links = self.outline.nav_links.len(),
            anchors = self.outline.anchors.len(),
            reduced_motion = self.reduced_motion,
            "portfolio initialized"
        );
        if self.platform.is_dev_host() {
            info!(utils = ?UTILITY_NAMES, "portfolio development mode");
        }
        commands
    }

    /// React to one browser signal.
    pub fn handle<P>(&mut self, now: Duration, event: HostEvent, probe: &P) -> Dispatch
    where
        P: LayoutProbe + ?Sized,
    {
        let mut dispatch = Dispatch {
            prevent_default: false,
            commands: self.advance(now, probe),
        };
        if !self.started {
            trace!(?event, "event before start ignored");
            return dispatch;
        }
        trace!(?event, "host event");

        match event {
            HostEvent::Scroll => {
                if self.spy.is_enabled() {
                    self.schedule(TimerKey::SpyDebounce, self.config.spy_debounce());
                }
            }
            HostEvent::ScrollEnd => {
                if self.scroll_lock.is_held() {
                    self.timers.cancel(TimerKey::ScrollLockRelease);
                    self.release_scroll_lock(probe, &mut dispatch.commands);
                }
            }
            HostEvent::Resize => {
                self.schedule(TimerKey::ResizeDebounce, self.config.resize_debounce());
            }
            HostEvent::AnchorClicked { anchor } => {
                self.anchor_clicked(anchor, probe, &mut dispatch);
            }
            HostEvent::CardEnter { group, card } => {
                let class = probe.viewport().class(&self.config);
                let opacity = self.config.dimmed_opacity;
                dispatch
                    .commands
                    .extend(self.hover.group_mut(group).enter(card, class, opacity));
            }
            HostEvent::CardLeave { group, .. } => {
                dispatch.commands.extend(self.hover.group_mut(group).leave());
            }
            HostEvent::KeyDown(key) => {
                dispatch.commands.extend(self.keyboard.key_down(key));
            }
            HostEvent::MouseDown => {
                dispatch.commands.extend(self.keyboard.mouse_down());
            }
            HostEvent::SkipLinkActivated => {
                if self.outline.has_skip_link {
                    dispatch.prevent_default = true;
                    if self.outline.has_main_content {
                        dispatch.commands.push(DomCommand::FocusMainContent);
                        dispatch
                            .commands
                            .push(DomCommand::ScrollMainIntoView(self.scroll_behavior()));
                    }
                }
            }
            HostEvent::SpecialTextClicked => {
                if self.outline.has_special_text {
                    dispatch.commands.push(DomCommand::SuspendSpecialTextAnimation);
                    self.schedule(TimerKey::AnimationRestore, self.config.animation_restart());
                }
            }
            HostEvent::PageLoaded => {
                if !self.reveal_requested {
                    self.reveal_requested = true;
                    self.schedule(TimerKey::RevealStart, self.config.reveal_delay());
                }
            }
            HostEvent::ReducedMotionChanged(reduced) => {
                self.reduced_motion_changed(reduced, &mut dispatch.commands);
            }
            HostEvent::SectionVisibility {
                section,
                intersecting,
            } => {
                dispatch
                    .commands
                    .extend(self.reveal.visibility(section, intersecting));
            }
            HostEvent::ImageVisibility {
                image,
                intersecting,
            } => {
                dispatch
                    .commands
                    .extend(self.images.visibility(image, intersecting));
            }
        }
        dispatch
    }

    /// Move the clock to `now` and fire every timer due by then.
    pub fn advance<P>(&mut self, now: Duration, probe: &P) -> Vec<DomCommand>
    where
        P: LayoutProbe + ?Sized,
    {
        if now > self.now {
            self.now = now;
        }
        let mut commands = Vec::new();
        while let Some(key) = self.timers.pop_due(self.now) {
            self.fire(key, probe, &mut commands);
        }
        commands
    }

    /// Earliest instant at which [`Session::advance`] has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Programmatic scroll to `#id`, with the same clearance and lock as an
    /// anchor click. Unknown ids do nothing.
    pub fn scroll_to_section<P>(&mut self, now: Duration, id: &str, probe: &P) -> Vec<DomCommand>
    where
        P: LayoutProbe + ?Sized,
    {
        let mut commands = self.advance(now, probe);
        if id.is_empty() {
            return commands;
        }
        match probe.target(id) {
            Some(target) => commands.push(self.begin_programmatic_scroll(target.offset_top, probe)),
            None => debug!(id, "scrollToSection: no such element"),
        }
        commands
    }

    /// Identifier of the section that is current by geometry alone.
    #[must_use]
    pub fn current_section<P>(&self, probe: &P) -> Option<&str>
    where
        P: LayoutProbe + ?Sized,
    {
        let viewport = probe.viewport();
        let idx =
            scroll_spy::first_matching_section(&self.outline, probe, &viewport, &self.config)?;
        self.outline.sections[idx].id.as_deref()
    }

    #[must_use]
    pub const fn spotlight_position(&self) -> SpotlightPosition {
        SpotlightPosition::TOP_LEFT
    }

    #[must_use]
    pub const fn config(&self) -> &InteractionConfig {
        &self.config
    }

    #[must_use]
    pub const fn outline(&self) -> &PageOutline {
        &self.outline
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub const fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.is_held()
    }

    #[must_use]
    pub const fn active_nav_link(&self) -> Option<usize> {
        self.spy.active_link()
    }

    #[must_use]
    pub const fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    #[must_use]
    pub const fn keyboard_nav(&self) -> bool {
        self.keyboard.is_enabled()
    }

    #[must_use]
    pub const fn hover(&self) -> &HoverEffects {
        &self.hover
    }

    #[must_use]
    pub fn live_announcements(&self) -> usize {
        self.announcer.live().len()
    }

    fn schedule(&mut self, key: TimerKey, delay: Duration) {
        self.timers.schedule(key, self.now.saturating_add(delay));
    }

    fn scroll_behavior(&self) -> ScrollBehavior {
        ScrollBehavior::for_motion(self.reduced_motion)
    }

    fn fire<P>(&mut self, key: TimerKey, probe: &P, commands: &mut Vec<DomCommand>)
    where
        P: LayoutProbe + ?Sized,
    {
        trace!(?key, now_ms = self.now.as_millis() as u64, "timer fired");
        match key {
            TimerKey::SpyDebounce => {
                if self.scroll_lock.is_held() {
                    trace!("scroll spy update suppressed during programmatic scroll");
                } else {
                    commands.extend(self.spy.evaluate(&self.outline, probe, &self.config));
                }
            }
            TimerKey::ScrollLockRelease => self.release_scroll_lock(probe, commands),
            TimerKey::ResizeDebounce => {
                if !probe.viewport().class(&self.config).is_wide() {
                    let cleared = self.hover.clear_all();
                    if !cleared.is_empty() {
                        debug!(cards = cleared.len(), "cleared card emphasis after narrowing");
                    }
                    commands.extend(cleared);
                }
            }
            TimerKey::RevealStart => {
                if self.reduced_motion {
                    debug!("scroll animations skipped: reduced motion requested");
                } else if !self.platform.intersection_observer {
                    debug!("scroll animations skipped: no IntersectionObserver");
                } else {
                    commands.extend(self.reveal.start(&self.config));
                }
            }
            TimerKey::AnimationRestore => commands.push(DomCommand::RestoreSpecialTextAnimation),
            TimerKey::AnnouncementExpiry(id) => commands.extend(self.announcer.expire(id)),
        }
    }

    fn anchor_clicked<P>(&mut self, anchor: usize, probe: &P, dispatch: &mut Dispatch)
    where
        P: LayoutProbe + ?Sized,
    {
        let Some(info) = self.outline.anchors.get(anchor) else {
            return;
        };
        dispatch.prevent_default = true;
        if info.target.is_empty() {
            return;
        }
        let target_id = info.target.clone();
        let is_nav_link = info.nav_link.is_some();
        let Some(target) = probe.target(&target_id) else {
            debug!(target = %target_id, "anchor target missing");
            return;
        };

        dispatch
            .commands
            .push(self.begin_programmatic_scroll(target.offset_top, probe));

        if is_nav_link {
            let message = navigation_message(&target_id, target.label.as_deref());
            let (id, command) = self.announcer.announce(message);
            trace!(announcement = %id, "navigation announced");
            dispatch.commands.push(command);
            self.schedule(
                TimerKey::AnnouncementExpiry(id),
                self.config.announcement_ttl(),
            );
        }
    }

    fn begin_programmatic_scroll<P>(&mut self, offset_top: f64, probe: &P) -> DomCommand
    where
        P: LayoutProbe + ?Sized,
    {
        let class = probe.viewport().class(&self.config);
        let top = scroll_target_top(offset_top, class, &self.config);
        self.scroll_lock.acquire();
        self.schedule(TimerKey::ScrollLockRelease, self.config.scroll_lock());
        debug!(top, ?class, "programmatic scroll");
        DomCommand::ScrollTo {
            top,
            behavior: self.scroll_behavior(),
        }
    }

    fn release_scroll_lock<P>(&mut self, probe: &P, commands: &mut Vec<DomCommand>)
    where
        P: LayoutProbe + ?Sized,
    {
        if self.scroll_lock.release() {
            commands.extend(self.spy.evaluate(&self.outline, probe, &self.config));
        }
    }

    fn reduced_motion_changed(&mut self, reduced: bool, commands: &mut Vec<DomCommand>) {
        if reduced == self.reduced_motion {
            return;
        }
        self.reduced_motion = reduced;
        debug!(reduced, "reduced-motion preference changed");
        if reduced {
            commands.push(DomCommand::SetRootScrollBehavior(Some(ScrollBehavior::Instant)));
            commands.extend(self.reveal.reveal_pending());
        } else {
            commands.push(DomCommand::SetRootScrollBehavior(None));
        }
    }
}
