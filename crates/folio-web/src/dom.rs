#![forbid(unsafe_code)]

//! Element handles and command application over the live document.

use std::collections::HashMap;

use folio_core::a11y::AnnouncementId;
use folio_core::{
    AnchorInfo, AnchorTarget, CardGroup, CardGroupInfo, DomCommand, LayoutProbe, NavLinkInfo,
    PageOutline, ScrollBehavior, SectionBounds, SectionInfo, Viewport,
};
use tracing::{debug, trace};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, IntersectionObserver, ScrollIntoViewOptions,
    ScrollToOptions, Window,
};

use crate::WebError;
use crate::markup;

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

fn query_all<T: JsCast>(document: &Document, selector: &'static str) -> Result<Vec<T>, WebError> {
    let list = document
        .query_selector_all(selector)
        .map_err(|err| WebError::dom(selector, js_message(&err)))?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect())
}

fn query_one<T: JsCast>(document: &Document, selector: &'static str) -> Result<Option<T>, WebError> {
    Ok(document
        .query_selector(selector)
        .map_err(|err| WebError::dom(selector, js_message(&err)))?
        .and_then(|el| el.dyn_into::<T>().ok()))
}

fn href_target(el: &Element) -> Option<String> {
    let href = el.get_attribute("href")?;
    markup::in_page_target(&href).map(str::to_owned)
}

fn web_behavior(behavior: ScrollBehavior) -> web_sys::ScrollBehavior {
    match behavior {
        ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
    }
}

/// Handles to every element the engine refers to by index.
pub struct PageDom {
    window: Window,
    document: Document,
    body: Option<HtmlElement>,
    root: Option<HtmlElement>,
    sections: Vec<HtmlElement>,
    nav_links: Vec<Element>,
    anchors: Vec<Element>,
    experience: Vec<HtmlElement>,
    projects: Vec<HtmlElement>,
    images: Vec<HtmlImageElement>,
    skip_link: Option<Element>,
    main_content: Option<HtmlElement>,
    special_text: Option<HtmlElement>,
    announcements: HashMap<AnnouncementId, Element>,
    reveal_observer: Option<IntersectionObserver>,
    image_observer: Option<IntersectionObserver>,
}

impl PageDom {
    /// Walk the document and describe what was found.
    pub fn discover(window: Window) -> Result<(Self, PageOutline), WebError> {
        let document = window.document().ok_or(WebError::NoDocument)?;

        let sections: Vec<HtmlElement> = query_all(&document, markup::SECTION)?;
        let nav_links: Vec<Element> = query_all(&document, markup::NAV_LINK)?;
        let skip_link: Option<Element> = query_one(&document, markup::SKIP_LINK)?;
        let anchors: Vec<Element> = query_all::<Element>(&document, markup::IN_PAGE_ANCHOR)?
            .into_iter()
            .filter(|el| skip_link.as_ref() != Some(el))
            .collect();

        let (experience_list, experience_card) = markup::card_selectors(CardGroup::Experience);
        let (projects_list, project_card) = markup::card_selectors(CardGroup::Projects);
        let experience_container = query_one::<Element>(&document, experience_list)?.is_some();
        let projects_container = query_one::<Element>(&document, projects_list)?.is_some();
        let experience: Vec<HtmlElement> = query_all(&document, experience_card)?;
        let projects: Vec<HtmlElement> = query_all(&document, project_card)?;

        let images: Vec<HtmlImageElement> = query_all(&document, markup::LAZY_IMAGE)?;
        let main_content = document
            .get_element_by_id(markup::MAIN_CONTENT_ID)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let special_text: Option<HtmlElement> = query_one(&document, markup::SPECIAL_TEXT)?;
        let has_spotlight = query_one::<Element>(&document, markup::SPOTLIGHT)?.is_some();

        let outline = PageOutline {
            sections: sections
                .iter()
                .map(|el| SectionInfo {
                    id: Some(el.id()).filter(|id| !id.is_empty()),
                })
                .collect(),
            nav_links: nav_links
                .iter()
                .map(|el| NavLinkInfo {
                    target: href_target(el),
                })
                .collect(),
            anchors: anchors
                .iter()
                .map(|el| AnchorInfo {
                    target: href_target(el).unwrap_or_default(),
                    nav_link: nav_links.iter().position(|link| link == el),
                })
                .collect(),
            experience: CardGroupInfo {
                container: experience_container,
                cards: experience.len(),
            },
            projects: CardGroupInfo {
                container: projects_container,
                cards: projects.len(),
            },
            lazy_images: images.len(),
            has_spotlight,
            has_skip_link: skip_link.is_some(),
            has_main_content: main_content.is_some(),
            has_special_text: special_text.is_some(),
        };
        debug!(
            sections = outline.sections.len(),
            nav_links = outline.nav_links.len(),
            anchors = outline.anchors.len(),
            images = outline.lazy_images,
            "document discovered"
        );

        let dom = Self {
            body: document.body(),
            root: document
                .document_element()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok()),
            window,
            document,
            sections,
            nav_links,
            anchors,
            experience,
            projects,
            images,
            skip_link,
            main_content,
            special_text,
            announcements: HashMap::new(),
            reveal_observer: None,
            image_observer: None,
        };
        Ok((dom, outline))
    }

    pub fn set_observers(
        &mut self,
        reveal: Option<IntersectionObserver>,
        images: Option<IntersectionObserver>,
    ) {
        self.reveal_observer = reveal;
        self.image_observer = images;
    }

    pub fn anchors(&self) -> &[Element] {
        &self.anchors
    }

    pub fn cards(&self, group: CardGroup) -> &[HtmlElement] {
        match group {
            CardGroup::Experience => &self.experience,
            CardGroup::Projects => &self.projects,
        }
    }

    pub fn skip_link(&self) -> Option<&Element> {
        self.skip_link.as_ref()
    }

    pub fn special_text(&self) -> Option<&HtmlElement> {
        self.special_text.as_ref()
    }

    pub fn section_index(&self, target: &Element) -> Option<usize> {
        self.sections
            .iter()
            .position(|el| AsRef::<Element>::as_ref(el) == target)
    }

    pub fn image_index(&self, target: &Element) -> Option<usize> {
        self.images
            .iter()
            .position(|el| AsRef::<Element>::as_ref(el) == target)
    }

    pub fn apply_all(&mut self, commands: &[DomCommand]) {
        for command in commands {
            if let Err(err) = self.apply(command) {
                debug!(?command, error = %js_message(&err), "dom command failed");
            }
        }
    }

    /// Apply one command. Commands naming an element that no longer exists
    /// are skipped.
    fn apply(&mut self, command: &DomCommand) -> Result<(), JsValue> {
        trace!(?command, "apply");
        match command {
            DomCommand::SetNavActive { link, active } => {
                if let Some(el) = self.nav_links.get(*link) {
                    let classes = el.class_list();
                    if *active {
                        classes.add_1(markup::ACTIVE_CLASS)?;
                    } else {
                        classes.remove_1(markup::ACTIVE_CLASS)?;
                    }
                }
            }
            DomCommand::ScrollTo { top, behavior } => {
                let options = ScrollToOptions::new();
                options.set_top(*top);
                options.set_behavior(web_behavior(*behavior));
                self.window.scroll_to_with_scroll_to_options(&options);
            }
            DomCommand::SetCardOpacity {
                group,
                card,
                opacity,
            } => {
                if let Some(el) = self.cards(*group).get(*card) {
                    let style = el.style();
                    match opacity {
                        Some(value) => {
                            style.set_property("opacity", &markup::opacity_value(*value))?;
                        }
                        None => {
                            style.remove_property("opacity")?;
                        }
                    }
                }
            }
            DomCommand::SetKeyboardNav(enabled) => {
                if let Some(body) = &self.body {
                    let classes = body.class_list();
                    if *enabled {
                        classes.add_1(markup::KEYBOARD_NAV_CLASS)?;
                    } else {
                        classes.remove_1(markup::KEYBOARD_NAV_CLASS)?;
                    }
                }
            }
            DomCommand::FocusMainContent => {
                if let Some(main) = &self.main_content {
                    main.focus()?;
                }
            }
            DomCommand::ScrollMainIntoView(behavior) => {
                if let Some(main) = &self.main_content {
                    let options = ScrollIntoViewOptions::new();
                    options.set_behavior(web_behavior(*behavior));
                    main.scroll_into_view_with_scroll_into_view_options(&options);
                }
            }
            DomCommand::InsertAnnouncement { id, message } => {
                let Some(body) = &self.body else {
                    return Ok(());
                };
                let node = self.document.create_element("div")?;
                for (name, value) in markup::ANNOUNCEMENT_ATTRS {
                    node.set_attribute(name, value)?;
                }
                if let Some(html) = node.dyn_ref::<HtmlElement>() {
                    let style = html.style();
                    for (name, value) in markup::ANNOUNCEMENT_STYLE {
                        style.set_property(name, value)?;
                    }
                }
                // Live regions only announce changes made while attached.
                body.append_child(&node)?;
                node.set_text_content(Some(message));
                self.announcements.insert(*id, node);
            }
            DomCommand::RemoveAnnouncement { id } => {
                if let Some(node) = self.announcements.remove(id) {
                    node.remove();
                }
            }
            DomCommand::SetRootScrollBehavior(behavior) => {
                if let Some(root) = &self.root {
                    let style = root.style();
                    match behavior {
                        Some(behavior) => {
                            style.set_property(
                                "scroll-behavior",
                                markup::behavior_keyword(*behavior),
                            )?;
                        }
                        None => {
                            style.remove_property("scroll-behavior")?;
                        }
                    }
                }
            }
            DomCommand::PrepareReveal {
                section,
                offset_px,
                transition_ms,
            } => {
                if let Some(el) = self.sections.get(*section) {
                    let style = el.style();
                    for (name, value) in markup::reveal_hidden_style(*offset_px, *transition_ms) {
                        style.set_property(name, &value)?;
                    }
                }
            }
            DomCommand::ObserveSection { section } => {
                if let (Some(observer), Some(el)) = (&self.reveal_observer, self.sections.get(*section)) {
                    observer.observe(el);
                }
            }
            DomCommand::RevealSection { section } => {
                if let Some(el) = self.sections.get(*section) {
                    let style = el.style();
                    for (name, value) in markup::REVEAL_SHOWN_STYLE {
                        style.set_property(name, value)?;
                    }
                }
            }
            DomCommand::UnobserveSection { section } => {
                if let (Some(observer), Some(el)) = (&self.reveal_observer, self.sections.get(*section)) {
                    observer.unobserve(el);
                }
            }
            DomCommand::ObserveImage { image } => {
                if let (Some(observer), Some(img)) = (&self.image_observer, self.images.get(*image)) {
                    observer.observe(img);
                }
            }
            DomCommand::LoadImage { image } => {
                if let Some(img) = self.images.get(*image) {
                    img.set_src(&img.src());
                    img.class_list().remove_1(markup::LAZY_CLASS)?;
                }
            }
            DomCommand::UnobserveImage { image } => {
                if let (Some(observer), Some(img)) = (&self.image_observer, self.images.get(*image)) {
                    observer.unobserve(img);
                }
            }
            DomCommand::SuspendSpecialTextAnimation => {
                if let Some(el) = &self.special_text {
                    el.style().set_property("animation", "none")?;
                }
            }
            DomCommand::RestoreSpecialTextAnimation => {
                if let Some(el) = &self.special_text {
                    el.style().remove_property("animation")?;
                }
            }
        }
        Ok(())
    }

    /// Drop observers and any announcement still in the document.
    pub fn teardown(&mut self) {
        for observer in [self.reveal_observer.take(), self.image_observer.take()]
            .into_iter()
            .flatten()
        {
            observer.disconnect();
        }
        for (_, node) in self.announcements.drain() {
            node.remove();
        }
    }
}

impl LayoutProbe for PageDom {
    fn viewport(&self) -> Viewport {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let document_height = self
            .document
            .document_element()
            .map_or(0.0, |el| f64::from(el.scroll_height()));
        Viewport::new(width, height, scroll_y, document_height)
    }

    fn section_bounds(&self, index: usize) -> Option<SectionBounds> {
        let el = self.sections.get(index)?;
        let rect = el.get_bounding_client_rect();
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        Some(SectionBounds::new(rect.top() + scroll_y, rect.height()))
    }

    fn target(&self, id: &str) -> Option<AnchorTarget> {
        if id.is_empty() {
            return None;
        }
        let el = self.document.get_element_by_id(id)?;
        let offset_top = match el.dyn_ref::<HtmlElement>() {
            Some(html) => f64::from(html.offset_top()),
            None => el.get_bounding_client_rect().top() + self.window.scroll_y().unwrap_or(0.0),
        };
        Some(AnchorTarget {
            offset_top,
            label: el.get_attribute("aria-label"),
        })
    }
}
