#![forbid(unsafe_code)]

//! `wasm-bindgen` entry points and event wiring.
//!
//! One [`Host`] per page lives in a thread-local. Every listener closure
//! holds a `Weak` handle to the shared [`Runtime`]; a signal arriving while
//! the runtime is already borrowed is dropped rather than re-entered.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use folio_core::timer::millis_to_duration;
use folio_core::{CardGroup, HostEvent, InteractionConfig, Key, Platform, Session};
use js_sys::{Array, Function, Object, Reflect};
use tracing::{debug, error, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Event, EventTarget,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent,
    MediaQueryList, MediaQueryListEvent, Window,
};

use crate::dom::PageDom;
use crate::markup::ReadyState;
use crate::{WebError, logging, markup};

const UTILS_GLOBAL: &str = "portfolioUtils";

fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

fn set_js(obj: &Object, key: &str, value: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), value);
}

/// Read the embedded JSON config; a missing script means defaults.
fn read_config(document: &Document) -> Result<InteractionConfig, WebError> {
    let Some(script) = document.get_element_by_id(markup::CONFIG_SCRIPT_ID) else {
        return Ok(InteractionConfig::default());
    };
    let text = script.text_content().unwrap_or_default();
    if text.trim().is_empty() {
        return Ok(InteractionConfig::default());
    }
    Ok(InteractionConfig::from_json(&text)?)
}

fn sample_platform(window: &Window) -> (Platform, Option<MediaQueryList>) {
    let query = window
        .match_media(markup::REDUCED_MOTION_QUERY)
        .ok()
        .flatten();
    let intersection_observer =
        Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false);
    let platform = Platform {
        prefers_reduced_motion: query.as_ref().is_some_and(MediaQueryList::matches),
        intersection_observer,
        hostname: window.location().hostname().unwrap_or_default(),
    };
    (platform, query)
}

/// Engine plus the DOM it drives.
struct Runtime {
    session: Session,
    dom: PageDom,
    window: Window,
    timer: Option<i32>,
    timer_callback: Option<Closure<dyn FnMut()>>,
}

impl Runtime {
    fn now(&self) -> Duration {
        self.window
            .performance()
            .and_then(|perf| millis_to_duration(perf.now()))
            .unwrap_or_else(|| self.session.now())
    }

    fn run(&mut self, event: HostEvent, dom_event: Option<&Event>) {
        let now = self.now();
        let dispatch = self.session.handle(now, event, &self.dom);
        if dispatch.prevent_default {
            if let Some(dom_event) = dom_event {
                dom_event.prevent_default();
            }
        }
        self.dom.apply_all(&dispatch.commands);
        self.rearm(now);
    }

    fn fire_timers(&mut self) {
        self.timer = None;
        let now = self.now();
        let commands = self.session.advance(now, &self.dom);
        self.dom.apply_all(&commands);
        self.rearm(now);
    }

    /// Keep exactly one platform timer armed for the next deadline.
    fn rearm(&mut self, now: Duration) {
        if let Some(handle) = self.timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        let Some(deadline) = self.session.next_deadline() else {
            return;
        };
        let Some(callback) = &self.timer_callback else {
            return;
        };
        let delay_ms = deadline.saturating_sub(now).as_micros().div_ceil(1000);
        let delay_ms = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay_ms,
            ) {
            Ok(handle) => self.timer = Some(handle),
            Err(_) => warn!(delay_ms, "setTimeout failed; pending timers stall until next event"),
        }
    }
}

type Shared = Rc<RefCell<Runtime>>;

fn with_runtime(weak: &Weak<RefCell<Runtime>>, f: impl FnOnce(&mut Runtime)) {
    let Some(runtime) = weak.upgrade() else {
        return;
    };
    let Ok(mut runtime) = runtime.try_borrow_mut() else {
        trace!("re-entrant signal dropped");
        return;
    };
    f(&mut runtime);
}

/// An attached DOM listener, detached again on drop.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, WebError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|_| WebError::dom(kind, "addEventListener failed"))?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }

    /// Listener translating every occurrence into one engine event.
    fn signal(
        target: &EventTarget,
        kind: &'static str,
        passive: bool,
        weak: &Weak<RefCell<Runtime>>,
        event: HostEvent,
    ) -> Result<Self, WebError> {
        let weak = weak.clone();
        Self::attach(target, kind, passive, move |dom_event: Event| {
            let event = event.clone();
            with_runtime(&weak, |rt| rt.run(event, Some(&dom_event)));
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

fn observer(
    weak: &Weak<RefCell<Runtime>>,
    threshold: f64,
    root_margin: Option<&str>,
    to_event: fn(&PageDom, &IntersectionObserverEntry) -> Option<HostEvent>,
) -> Result<(IntersectionObserver, ObserverCallback), WebError> {
    let weak = weak.clone();
    let callback = ObserverCallback::new(move |entries: Array, _observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            with_runtime(&weak, |rt| {
                if let Some(event) = to_event(&rt.dom, &entry) {
                    rt.run(event, None);
                }
            });
        }
    });
    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(threshold));
    if let Some(margin) = root_margin {
        init.set_root_margin(margin);
    }
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(|_| WebError::dom("IntersectionObserver", "constructor failed"))?;
    Ok((observer, callback))
}

fn section_visibility(dom: &PageDom, entry: &IntersectionObserverEntry) -> Option<HostEvent> {
    Some(HostEvent::SectionVisibility {
        section: dom.section_index(&entry.target())?,
        intersecting: entry.is_intersecting(),
    })
}

fn image_visibility(dom: &PageDom, entry: &IntersectionObserverEntry) -> Option<HostEvent> {
    Some(HostEvent::ImageVisibility {
        image: dom.image_index(&entry.target())?,
        intersecting: entry.is_intersecting(),
    })
}

/// Everything that must stay alive for the page's lifetime.
struct Host {
    window: Window,
    runtime: Shared,
    listeners: Vec<Listener>,
    observer_callbacks: Vec<ObserverCallback>,
    utils: Vec<Closure<dyn FnMut(JsValue) -> JsValue>>,
}

impl Host {
    fn boot(window: Window, config: InteractionConfig) -> Result<Self, WebError> {
        let document = window.document().ok_or(WebError::NoDocument)?;
        let (dom, outline) = PageDom::discover(window.clone())?;
        let (platform, reduced_motion_query) = sample_platform(&window);
        let observers_supported = platform.intersection_observer;
        let session = Session::new(config, outline, platform)?;

        let runtime: Shared = Rc::new(RefCell::new(Runtime {
            session,
            dom,
            window: window.clone(),
            timer: None,
            timer_callback: None,
        }));
        let weak = Rc::downgrade(&runtime);

        {
            let weak = weak.clone();
            runtime.borrow_mut().timer_callback = Some(Closure::<dyn FnMut()>::new(move || {
                with_runtime(&weak, Runtime::fire_timers);
            }));
        }

        let mut host = Self {
            window: window.clone(),
            runtime: Rc::clone(&runtime),
            listeners: Vec::new(),
            observer_callbacks: Vec::new(),
            utils: Vec::new(),
        };

        if observers_supported {
            let config = runtime.borrow().session.config().clone();
            let (reveal, reveal_cb) = observer(
                &weak,
                config.reveal_threshold,
                Some(markup::reveal_root_margin(&config).as_str()),
                section_visibility,
            )?;
            let (images, images_cb) = observer(&weak, 0.0, None, image_visibility)?;
            runtime
                .borrow_mut()
                .dom
                .set_observers(Some(reveal), Some(images));
            host.observer_callbacks.extend([reveal_cb, images_cb]);
        }

        host.wire(&weak, &document, reduced_motion_query)?;

        {
            let mut guard = runtime.borrow_mut();
            let rt = &mut *guard;
            let now = rt.now();
            let commands = rt.session.start(now, &rt.dom);
            rt.dom.apply_all(&commands);
            rt.rearm(now);
        }
        if ReadyState::parse(&document.ready_state()) == ReadyState::Complete {
            with_runtime(&weak, |rt| rt.run(HostEvent::PageLoaded, None));
        }

        host.publish_utils(&weak);
        Ok(host)
    }

    fn wire(
        &mut self,
        weak: &Weak<RefCell<Runtime>>,
        document: &Document,
        reduced_motion_query: Option<MediaQueryList>,
    ) -> Result<(), WebError> {
        let window: &EventTarget = self.window.as_ref();
        let document_target: &EventTarget = document.as_ref();
        let mut listeners = vec![
            Listener::signal(window, "scroll", true, weak, HostEvent::Scroll)?,
            Listener::signal(window, "scrollend", true, weak, HostEvent::ScrollEnd)?,
            Listener::signal(window, "resize", true, weak, HostEvent::Resize)?,
            Listener::signal(window, "load", true, weak, HostEvent::PageLoaded)?,
            Listener::signal(document_target, "mousedown", true, weak, HostEvent::MouseDown)?,
        ];

        {
            let weak = weak.clone();
            listeners.push(Listener::attach(document_target, "keydown", true, move |event: Event| {
                let key = event
                    .dyn_ref::<KeyboardEvent>()
                    .map_or(Key::Other, |ev| Key::from_dom(&ev.key()));
                with_runtime(&weak, |rt| rt.run(HostEvent::KeyDown(key), Some(&event)));
            })?);
        }

        let rt = self.runtime.borrow();
        for (anchor, el) in rt.dom.anchors().iter().enumerate() {
            listeners.push(Listener::signal(
                el,
                "click",
                false,
                weak,
                HostEvent::AnchorClicked { anchor },
            )?);
        }
        for group in CardGroup::ALL {
            if !rt.session.outline().group(group).is_enabled() {
                continue;
            }
            for (card, el) in rt.dom.cards(group).iter().enumerate() {
                listeners.push(Listener::signal(
                    el,
                    "mouseenter",
                    true,
                    weak,
                    HostEvent::CardEnter { group, card },
                )?);
                listeners.push(Listener::signal(
                    el,
                    "mouseleave",
                    true,
                    weak,
                    HostEvent::CardLeave { group, card },
                )?);
            }
        }
        if let Some(skip) = rt.dom.skip_link() {
            listeners.push(Listener::signal(
                skip,
                "click",
                false,
                weak,
                HostEvent::SkipLinkActivated,
            )?);
        }
        if let Some(text) = rt.dom.special_text() {
            listeners.push(Listener::signal(
                text,
                "click",
                true,
                weak,
                HostEvent::SpecialTextClicked,
            )?);
        }
        drop(rt);

        if let Some(query) = reduced_motion_query {
            let weak = weak.clone();
            let target: EventTarget = query.clone().into();
            listeners.push(Listener::attach(&target, "change", true, move |event: Event| {
                let reduce = event
                    .dyn_ref::<MediaQueryListEvent>()
                    .map_or_else(|| query.matches(), MediaQueryListEvent::matches);
                with_runtime(&weak, |rt| rt.run(HostEvent::ReducedMotionChanged(reduce), None));
            })?);
        }

        debug!(listeners = listeners.len(), "event listeners attached");
        self.listeners = listeners;
        Ok(())
    }

    /// Publish `window.portfolioUtils`.
    fn publish_utils(&mut self, weak: &Weak<RefCell<Runtime>>) {
        let utils = Object::new();

        let scroll_weak = weak.clone();
        let scroll_to_section = Closure::<dyn FnMut(JsValue) -> JsValue>::new(move |id: JsValue| {
            let Some(id) = id.as_string() else {
                return JsValue::UNDEFINED;
            };
            with_runtime(&scroll_weak, |rt| {
                let now = rt.now();
                let commands = rt.session.scroll_to_section(now, &id, &rt.dom);
                rt.dom.apply_all(&commands);
                rt.rearm(now);
            });
            JsValue::UNDEFINED
        });

        let current_weak = weak.clone();
        let current_section = Closure::<dyn FnMut(JsValue) -> JsValue>::new(move |_: JsValue| {
            let Some(runtime) = current_weak.upgrade() else {
                return JsValue::NULL;
            };
            let Ok(rt) = runtime.try_borrow() else {
                return JsValue::NULL;
            };
            rt.session
                .current_section(&rt.dom)
                .map_or(JsValue::NULL, JsValue::from_str)
        });

        let spotlight_weak = weak.clone();
        let spotlight = Closure::<dyn FnMut(JsValue) -> JsValue>::new(move |_: JsValue| {
            let Some(runtime) = spotlight_weak.upgrade() else {
                return JsValue::NULL;
            };
            let Ok(rt) = runtime.try_borrow() else {
                return JsValue::NULL;
            };
            serde_wasm_bindgen::to_value(&rt.session.spotlight_position())
                .unwrap_or(JsValue::NULL)
        });

        let names = folio_core::session::UTILITY_NAMES;
        for (name, closure) in names
            .into_iter()
            .zip([scroll_to_section, current_section, spotlight])
        {
            let function: &Function = closure.as_ref().unchecked_ref();
            set_js(&utils, name, function);
            self.utils.push(closure);
        }
        set_js(self.window.as_ref(), UTILS_GLOBAL, &utils);
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        let _ = Reflect::delete_property(self.window.as_ref(), &JsValue::from_str(UTILS_GLOBAL));
        self.listeners.clear();
        if let Ok(mut rt) = self.runtime.try_borrow_mut() {
            if let Some(handle) = rt.timer.take() {
                rt.window.clear_timeout_with_handle(handle);
            }
            rt.timer_callback = None;
            rt.dom.teardown();
        }
        self.observer_callbacks.clear();
        self.utils.clear();
        debug!("portfolio host disposed");
    }
}

thread_local! {
    static HOST: RefCell<Option<Host>> = const { RefCell::new(None) };
}

fn boot(window: Window, config: InteractionConfig) {
    dispose();
    match Host::boot(window, config) {
        Ok(host) => HOST.with(|slot| {
            *slot.borrow_mut() = Some(host);
        }),
        Err(err) => error!(%err, "portfolio interactions unavailable"),
    }
}

/// Module entry point: install diagnostics, read configuration and boot once
/// the document structure is ready.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    install_panic_hook();
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::NoDocument)?;

    let (config, config_error) = match read_config(&document) {
        Ok(config) => (config, None),
        Err(err) => (InteractionConfig::default(), Some(err)),
    };
    logging::init(&config.log_level);
    if let Some(err) = config_error {
        warn!(%err, "invalid portfolio config; using defaults");
    }

    if ReadyState::parse(&document.ready_state()) == ReadyState::Loading {
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        let boot_window = window.clone();
        let on_ready = Closure::<dyn FnMut()>::once(move || boot(boot_window, config));
        document.add_event_listener_with_callback_and_add_event_listener_options(
            "DOMContentLoaded",
            on_ready.as_ref().unchecked_ref(),
            &options,
        )?;
        on_ready.forget();
    } else {
        boot(window, config);
    }
    Ok(())
}

/// Detach every listener, cancel the pending timer and remove
/// `window.portfolioUtils`.
#[wasm_bindgen]
pub fn dispose() {
    let host = HOST.with(|slot| slot.borrow_mut().take());
    drop(host);
}
