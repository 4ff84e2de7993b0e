#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{
    Document, Element, Event, EventInit, HtmlElement, MutationObserver, MutationObserverInit,
    MutationRecord, Node,
};

wasm_bindgen_test_configure!(run_in_browser);

const PAGE: &str = r##"
<script type="application/json" id="portfolio-config">@CONFIG@</script>
<nav>
  <a class="nav-link" href="#about">About</a>
  <a class="nav-link" href="#work">Work</a>
</nav>
<a class="skip-to-content" href="#content">Skip</a>
<main id="content">
  <section class="section" id="about" aria-label="About me" style="height: 900px">About</section>
  <section class="section" id="work" style="height: 900px">
    <div class="experience-list">
      <div class="experience-card">First</div>
      <div class="experience-card">Second</div>
      <div class="experience-card">Third</div>
    </div>
  </section>
</main>
"##;

fn document() -> Document {
    web_sys::window()
        .and_then(|w| w.document())
        .expect("document")
}

fn utils() -> JsValue {
    let window = web_sys::window().expect("window");
    Reflect::get(&window, &JsValue::from_str("portfolioUtils")).expect("reflect")
}

fn utility(name: &str) -> Function {
    Reflect::get(&utils(), &JsValue::from_str(name))
        .expect("utility exists")
        .dyn_into()
        .expect("utility is a function")
}

/// Replace the body with the test page and boot the host on it.
fn boot(config: &str) {
    let document = document();
    document
        .body()
        .expect("body")
        .set_inner_html(&PAGE.replace("@CONFIG@", config));
    web_sys::window().expect("window").scroll_to_with_x_and_y(0.0, 0.0);
    folio_web::start().expect("boots");
}

fn query(selector: &str) -> Option<HtmlElement> {
    document()
        .query_selector(selector)
        .expect("valid selector")
        .and_then(|el| el.dyn_into().ok())
}

fn query_all(selector: &str) -> Vec<HtmlElement> {
    let list = document().query_selector_all(selector).expect("valid selector");
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into().ok())
        .collect()
}

fn fire(target: &Element, kind: &str) -> bool {
    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = Event::new_with_event_init_dict(kind, &init).expect("event");
    target.dispatch_event(&event).expect("dispatch")
}

fn opacity(el: &HtmlElement) -> String {
    el.style().get_property_value("opacity").expect("style read")
}

async fn sleep_ms(ms: i32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .expect("window")
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .expect("setTimeout");
    });
    JsFuture::from(promise).await.expect("timer resolves");
}

#[wasm_bindgen_test]
fn utilities_are_published_and_withdrawn() {
    boot("");

    assert!(utils().is_object());
    let current = utility("getCurrentSection")
        .call0(&JsValue::NULL)
        .expect("call");
    assert_eq!(current.as_string().as_deref(), Some("about"));

    let spotlight = utility("getSpotlightPosition")
        .call0(&JsValue::NULL)
        .expect("call");
    let position = Reflect::get(&spotlight, &JsValue::from_str("position")).expect("field");
    assert_eq!(position.as_string().as_deref(), Some("top-left"));
    let x = Reflect::get(&spotlight, &JsValue::from_str("x")).expect("field");
    assert_eq!(x.as_f64(), Some(0.0));

    folio_web::dispose();
    assert!(utils().is_undefined());
}

#[wasm_bindgen_test]
fn unknown_section_is_ignored() {
    boot("");
    utility("scrollToSection")
        .call1(&JsValue::NULL, &JsValue::from_str("missing"))
        .expect("no throw");
    let scroll_y = web_sys::window().expect("window").scroll_y().expect("scrollY");
    assert_eq!(scroll_y, 0.0);
    folio_web::dispose();
}

#[wasm_bindgen_test]
async fn nav_click_is_cancelled_and_announced_then_removed() {
    boot(r#"{"announcement_ttl_ms": 30}"#);
    let body = document().body().expect("body");

    let noop = Closure::<dyn FnMut()>::new(|| {});
    let watcher = MutationObserver::new(noop.as_ref().unchecked_ref()).expect("observer");
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    watcher.observe_with_options(&body, &init).expect("observe");

    let link = query(".nav-link").expect("nav link");
    assert!(!fire(&link, "click"), "default navigation must be cancelled");

    let node = query("[aria-live]").expect("live region inserted");
    assert_eq!(node.get_attribute("aria-live").as_deref(), Some("polite"));
    assert_eq!(node.get_attribute("aria-atomic").as_deref(), Some("true"));
    assert_eq!(node.text_content().as_deref(), Some("Navigated to About me section"));
    assert_eq!(node.style().get_property_value("position").expect("style"), "absolute");
    assert_eq!(node.style().get_property_value("left").expect("style"), "-10000px");
    assert_eq!(
        node.parent_element().as_ref(),
        Some(AsRef::<Element>::as_ref(&body))
    );

    // The text must change while the node is attached for it to be read out.
    let node_ref: &Node = node.as_ref();
    let populated_in_place = watcher
        .take_records()
        .iter()
        .filter_map(|record| record.dyn_into::<MutationRecord>().ok())
        .any(|record| record.target().as_ref() == Some(node_ref));
    assert!(populated_in_place);
    watcher.disconnect();

    sleep_ms(120).await;
    assert!(query("[aria-live]").is_none());
    folio_web::dispose();
}

#[wasm_bindgen_test]
fn hovering_a_card_dims_its_siblings_until_leave() {
    boot(r#"{"breakpoint_px": 1}"#);
    let cards = query_all(".experience-card");
    assert_eq!(cards.len(), 3);

    fire(&cards[1], "mouseenter");
    assert_eq!(opacity(&cards[0]), "0.5");
    assert_eq!(opacity(&cards[1]), "");
    assert_eq!(opacity(&cards[2]), "0.5");

    fire(&cards[1], "mouseleave");
    for card in &cards {
        assert_eq!(opacity(card), "");
    }
    folio_web::dispose();
}

#[wasm_bindgen_test]
async fn invalid_config_falls_back_to_defaults() {
    boot(r#"{"announcement_ttl_ms": 30,"#);
    assert!(utils().is_object());

    let link = query(".nav-link").expect("nav link");
    fire(&link, "click");
    sleep_ms(120).await;
    // The default lifetime of one second still applies.
    assert!(query("[aria-live]").is_some());

    folio_web::dispose();
    assert!(query("[aria-live]").is_none());
}
