//! In-memory page used by the integration tests.
//!
//! `FakePage` plays the browser: it answers layout reads and applies the
//! engine's commands to a small model of the document, so tests can assert
//! on resulting page state instead of on command lists.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use folio_core::a11y::AnnouncementId;
use folio_core::{
    AnchorInfo, AnchorTarget, CardGroup, CardGroupInfo, Dispatch, DomCommand, HostEvent,
    InteractionConfig, LayoutProbe, NavLinkInfo, PageOutline, Platform, ScrollBehavior,
    SectionBounds, SectionInfo, Session, Viewport,
};

#[derive(Debug, Clone)]
pub struct FakeSection {
    pub id: Option<String>,
    pub top: f64,
    pub height: f64,
    pub label: Option<String>,
}

impl FakeSection {
    pub fn new(id: &str, top: f64, height: f64) -> Self {
        Self {
            id: Some(id.to_string()),
            top,
            height,
            label: None,
        }
    }

    pub fn labeled(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub viewport: Viewport,
    pub sections: Vec<FakeSection>,
    /// Targets of `.nav-link` elements, in order.
    pub nav_targets: Vec<String>,
    /// In-page anchors that are not nav links.
    pub plain_anchors: Vec<String>,
    pub experience_cards: usize,
    pub project_cards: usize,
    pub lazy_images: usize,
    pub has_skip_link: bool,
    pub has_main_content: bool,
    pub has_special_text: bool,

    pub nav_active: Vec<bool>,
    pub card_opacity: BTreeMap<(CardGroup, usize), f32>,
    pub keyboard_nav: bool,
    pub announcements: BTreeMap<AnnouncementId, String>,
    pub announced: Vec<String>,
    pub scrolls: Vec<(f64, ScrollBehavior)>,
    pub root_scroll_behavior: Option<ScrollBehavior>,
    pub main_focused: bool,
    pub main_scrolled: Vec<ScrollBehavior>,
    pub hidden_sections: BTreeSet<usize>,
    pub revealed_sections: BTreeSet<usize>,
    pub observed_sections: BTreeSet<usize>,
    pub observed_images: BTreeSet<usize>,
    pub loaded_images: Vec<usize>,
    pub special_text_suspended: bool,
}

impl FakePage {
    /// `#about` 0–800, `#work` 800–1600, `#contact` 1600–2200; document
    /// 2250 px; viewport 1200×800.
    pub fn portfolio() -> Self {
        let nav_targets: Vec<String> = ["about", "work", "contact"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self {
            viewport: Viewport::new(1200.0, 800.0, 0.0, 2250.0),
            sections: vec![
                FakeSection::new("about", 0.0, 800.0).labeled("About"),
                FakeSection::new("work", 800.0, 800.0),
                FakeSection::new("contact", 1600.0, 600.0).labeled("Get in touch"),
            ],
            nav_active: vec![false; nav_targets.len()],
            nav_targets,
            experience_cards: 3,
            project_cards: 4,
            has_skip_link: true,
            has_main_content: true,
            has_special_text: true,
            ..Self::default()
        }
    }

    /// A taller page where the bottom override does not interfere.
    pub fn tall() -> Self {
        let mut page = Self::portfolio();
        page.viewport = Viewport::new(1200.0, 400.0, 0.0, 6000.0);
        page
    }

    pub fn outline(&self) -> PageOutline {
        let mut anchors: Vec<AnchorInfo> = self
            .nav_targets
            .iter()
            .enumerate()
            .map(|(idx, target)| AnchorInfo {
                target: target.clone(),
                nav_link: Some(idx),
            })
            .collect();
        anchors.extend(self.plain_anchors.iter().map(|target| AnchorInfo {
            target: target.clone(),
            nav_link: None,
        }));
        PageOutline {
            sections: self
                .sections
                .iter()
                .map(|s| SectionInfo { id: s.id.clone() })
                .collect(),
            nav_links: self.nav_targets.iter().map(NavLinkInfo::to).collect(),
            anchors,
            experience: CardGroupInfo::with_cards(self.experience_cards),
            projects: CardGroupInfo::with_cards(self.project_cards),
            lazy_images: self.lazy_images,
            has_spotlight: true,
            has_skip_link: self.has_skip_link,
            has_main_content: self.has_main_content,
            has_special_text: self.has_special_text,
        }
    }

    /// Index of the anchor pointing at `target`.
    pub fn anchor(&self, target: &str) -> usize {
        self.nav_targets
            .iter()
            .chain(self.plain_anchors.iter())
            .position(|t| t == target)
            .unwrap_or_else(|| panic!("no anchor to #{target}"))
    }

    pub fn active_links(&self) -> Vec<usize> {
        self.nav_active
            .iter()
            .enumerate()
            .filter(|(_, active)| **active)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn dimmed(&self, group: CardGroup) -> Vec<usize> {
        self.card_opacity
            .keys()
            .filter(|(g, _)| *g == group)
            .map(|(_, card)| *card)
            .collect()
    }

    pub fn apply(&mut self, commands: &[DomCommand]) {
        for command in commands {
            match command {
                DomCommand::SetNavActive { link, active } => self.nav_active[*link] = *active,
                DomCommand::ScrollTo { top, behavior } => {
                    self.scrolls.push((*top, *behavior));
                    self.viewport.scroll_y = *top;
                }
                DomCommand::SetCardOpacity {
                    group,
                    card,
                    opacity,
                } => match opacity {
                    Some(value) => {
                        self.card_opacity.insert((*group, *card), *value);
                    }
                    None => {
                        self.card_opacity.remove(&(*group, *card));
                    }
                },
                DomCommand::SetKeyboardNav(on) => self.keyboard_nav = *on,
                DomCommand::FocusMainContent => self.main_focused = true,
                DomCommand::ScrollMainIntoView(behavior) => self.main_scrolled.push(*behavior),
                DomCommand::InsertAnnouncement { id, message } => {
                    assert!(
                        self.announcements.insert(*id, message.clone()).is_none(),
                        "announcement node {id} inserted twice"
                    );
                    self.announced.push(message.clone());
                }
                DomCommand::RemoveAnnouncement { id } => {
                    assert!(
                        self.announcements.remove(id).is_some(),
                        "announcement node {id} removed while detached"
                    );
                }
                DomCommand::SetRootScrollBehavior(behavior) => {
                    self.root_scroll_behavior = *behavior;
                }
                DomCommand::PrepareReveal { section, .. } => {
                    self.hidden_sections.insert(*section);
                }
                DomCommand::ObserveSection { section } => {
                    self.observed_sections.insert(*section);
                }
                DomCommand::RevealSection { section } => {
                    self.hidden_sections.remove(section);
                    self.revealed_sections.insert(*section);
                }
                DomCommand::UnobserveSection { section } => {
                    self.observed_sections.remove(section);
                }
                DomCommand::ObserveImage { image } => {
                    self.observed_images.insert(*image);
                }
                DomCommand::LoadImage { image } => self.loaded_images.push(*image),
                DomCommand::UnobserveImage { image } => {
                    self.observed_images.remove(image);
                }
                DomCommand::SuspendSpecialTextAnimation => self.special_text_suspended = true,
                DomCommand::RestoreSpecialTextAnimation => self.special_text_suspended = false,
            }
        }
    }
}

impl LayoutProbe for FakePage {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn section_bounds(&self, index: usize) -> Option<SectionBounds> {
        self.sections
            .get(index)
            .map(|s| SectionBounds::new(s.top, s.height))
    }

    fn target(&self, id: &str) -> Option<AnchorTarget> {
        if id == "content" && self.has_main_content {
            return Some(AnchorTarget {
                offset_top: 0.0,
                label: None,
            });
        }
        self.sections
            .iter()
            .find(|s| s.id.as_deref() == Some(id))
            .map(|s| AnchorTarget {
                offset_top: s.top,
                label: s.label.clone(),
            })
    }
}

/// A session wired to a fake page with a manual clock.
pub struct Harness {
    pub page: FakePage,
    pub session: Session,
    pub now: Duration,
}

impl Harness {
    pub fn new(page: FakePage) -> Self {
        Self::with_platform(page, Platform {
            intersection_observer: true,
            ..Platform::default()
        })
    }

    pub fn with_platform(page: FakePage, platform: Platform) -> Self {
        Self::with_config(page, platform, InteractionConfig::default())
    }

    pub fn with_config(page: FakePage, platform: Platform, config: InteractionConfig) -> Self {
        let session = Session::new(config, page.outline(), platform).expect("valid config");
        Self {
            page,
            session,
            now: Duration::ZERO,
        }
    }

    /// Construct and start.
    pub fn started(page: FakePage) -> Self {
        let mut harness = Self::new(page);
        harness.start();
        harness
    }

    pub fn start(&mut self) {
        let commands = self.session.start(self.now, &self.page);
        self.page.apply(&commands);
    }

    pub fn at_ms(&mut self, ms: u64) -> &mut Self {
        self.now = Duration::from_millis(ms);
        self
    }

    pub fn wait_ms(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
        let commands = self.session.advance(self.now, &self.page);
        self.page.apply(&commands);
    }

    pub fn send(&mut self, event: HostEvent) -> Dispatch {
        let dispatch = self.session.handle(self.now, event, &self.page);
        self.page.apply(&dispatch.commands);
        dispatch
    }

    /// Move the viewport and report a scroll signal.
    pub fn scroll_to(&mut self, y: f64) {
        self.page.viewport.scroll_y = y;
        self.send(HostEvent::Scroll);
    }

    /// Scroll, then let the debounce settle.
    pub fn scroll_and_settle(&mut self, y: f64) {
        self.scroll_to(y);
        self.wait_ms(self.session.config().spy_debounce_ms);
    }

    pub fn resize(&mut self, width: f64) {
        self.page.viewport.width = width;
        self.send(HostEvent::Resize);
    }

    pub fn click_anchor(&mut self, target: &str) -> Dispatch {
        let anchor = self.page.anchor(target);
        self.send(HostEvent::AnchorClicked { anchor })
    }
}
