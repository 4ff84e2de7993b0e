//! One-shot visibility effects: section reveal and deferred images.

mod common;

use common::{FakePage, Harness};
use folio_core::{HostEvent, Platform};
use pretty_assertions::assert_eq;

fn loaded(h: &mut Harness) {
    h.send(HostEvent::PageLoaded);
    h.wait_ms(100);
}

fn section_seen(h: &mut Harness, section: usize, intersecting: bool) {
    h.send(HostEvent::SectionVisibility {
        section,
        intersecting,
    });
}

#[test]
fn sections_hide_after_load_delay() {
    let mut h = Harness::started(FakePage::portfolio());
    h.send(HostEvent::PageLoaded);
    h.wait_ms(99);
    assert!(h.page.hidden_sections.is_empty());
    h.wait_ms(1);
    assert_eq!(h.page.hidden_sections.len(), 3);
    assert_eq!(h.page.observed_sections.len(), 3);
}

#[test]
fn first_intersection_reveals_for_good() {
    let mut h = Harness::started(FakePage::portfolio());
    loaded(&mut h);

    section_seen(&mut h, 1, false);
    assert!(h.page.revealed_sections.is_empty());

    section_seen(&mut h, 1, true);
    assert!(h.page.revealed_sections.contains(&1));
    assert!(!h.page.hidden_sections.contains(&1));
    assert!(!h.page.observed_sections.contains(&1));

    // Leaving and re-entering never hides it again.
    section_seen(&mut h, 1, false);
    section_seen(&mut h, 1, true);
    assert!(!h.page.hidden_sections.contains(&1));
    assert_eq!(h.page.revealed_sections.len(), 1);
}

#[test]
fn reduced_motion_skips_reveal() {
    let mut h = Harness::with_platform(FakePage::portfolio(), Platform {
        prefers_reduced_motion: true,
        intersection_observer: true,
        ..Platform::default()
    });
    h.start();
    loaded(&mut h);
    assert!(h.page.hidden_sections.is_empty());
    assert!(h.page.observed_sections.is_empty());
}

#[test]
fn switching_to_reduced_motion_reveals_pending_sections() {
    let mut h = Harness::started(FakePage::portfolio());
    loaded(&mut h);
    section_seen(&mut h, 0, true);
    h.send(HostEvent::ReducedMotionChanged(true));
    assert!(h.page.hidden_sections.is_empty());
    assert_eq!(h.page.revealed_sections.len(), 3);
    assert!(h.page.observed_sections.is_empty());
}

#[test]
fn missing_observer_disables_visibility_effects() {
    let mut page = FakePage::portfolio();
    page.lazy_images = 2;
    let mut h = Harness::with_platform(page, Platform::default());
    h.start();
    loaded(&mut h);
    assert!(h.page.hidden_sections.is_empty());
    assert!(h.page.observed_images.is_empty());
}

#[test]
fn lazy_images_are_observed_at_start_and_load_once() {
    let mut page = FakePage::portfolio();
    page.lazy_images = 3;
    let mut h = Harness::started(page);
    assert_eq!(h.page.observed_images.len(), 3);

    h.send(HostEvent::ImageVisibility {
        image: 2,
        intersecting: true,
    });
    h.send(HostEvent::ImageVisibility {
        image: 2,
        intersecting: true,
    });
    h.send(HostEvent::ImageVisibility {
        image: 0,
        intersecting: false,
    });
    assert_eq!(h.page.loaded_images, vec![2]);
    assert_eq!(h.page.observed_images.len(), 2);
    assert!(!h.page.observed_images.contains(&2));
}
