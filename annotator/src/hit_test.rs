use super::*;
use crate::doc::{AnnotationUpdate, Rect};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn store_with(positions: &[(f64, f64)]) -> AnnotationStore {
    let mut store = AnnotationStore::new();
    for &(x, y) in positions {
        store.create(pt(x, y));
    }
    store
}

fn set_area(store: &mut AnnotationStore, index: usize, rect: Rect) {
    let id = store.iter().nth(index).map(|a| a.id).unwrap();
    assert!(store.update(&id, AnnotationUpdate::ClickArea(Some(rect))));
}

// =============================================================
// hit_annotation
// =============================================================

#[test]
fn marker_hit_within_radius() {
    let a = Annotation::new(1, pt(100.0, 100.0));
    assert_eq!(hit_annotation(&a, pt(100.0, 100.0)), Some(HitPart::Marker));
    assert_eq!(hit_annotation(&a, pt(119.0, 100.0)), Some(HitPart::Marker));
    assert_eq!(hit_annotation(&a, pt(110.0, 110.0)), Some(HitPart::Marker));
}

#[test]
fn marker_radius_boundary_is_exclusive() {
    let a = Annotation::new(1, pt(100.0, 100.0));
    assert_eq!(hit_annotation(&a, pt(120.0, 100.0)), None);
    assert_eq!(hit_annotation(&a, pt(115.0, 115.0)), None);
}

#[test]
fn click_area_hit_inclusive_edges() {
    let mut a = Annotation::new(1, pt(0.0, 0.0));
    a.click_area = Some(Rect::new(200.0, 200.0, 50.0, 20.0));
    assert_eq!(hit_annotation(&a, pt(200.0, 200.0)), Some(HitPart::ClickArea));
    assert_eq!(hit_annotation(&a, pt(250.0, 220.0)), Some(HitPart::ClickArea));
    assert_eq!(hit_annotation(&a, pt(251.0, 220.0)), None);
}

#[test]
fn marker_checked_before_area() {
    let mut a = Annotation::new(1, pt(10.0, 10.0));
    a.click_area = Some(Rect::new(0.0, 0.0, 40.0, 40.0));
    assert_eq!(hit_annotation(&a, pt(12.0, 12.0)), Some(HitPart::Marker));
    assert_eq!(hit_annotation(&a, pt(38.0, 38.0)), Some(HitPart::ClickArea));
}

// =============================================================
// locate
// =============================================================

#[test]
fn locate_empty_store_is_none() {
    let store = AnnotationStore::new();
    assert!(locate(&store, pt(0.0, 0.0)).is_none());
}

#[test]
fn locate_miss_returns_none() {
    let store = store_with(&[(100.0, 100.0)]);
    assert!(locate(&store, pt(300.0, 300.0)).is_none());
}

#[test]
fn locate_finds_marker() {
    let store = store_with(&[(100.0, 100.0), (300.0, 100.0)]);
    assert_eq!(locate(&store, pt(305.0, 95.0)).map(|a| a.number), Some(2));
}

#[test]
fn locate_finds_click_area_far_from_marker() {
    let mut store = store_with(&[(100.0, 100.0)]);
    set_area(&mut store, 0, Rect::new(400.0, 400.0, 30.0, 30.0));
    assert_eq!(locate(&store, pt(415.0, 415.0)).map(|a| a.number), Some(1));
}

#[test]
fn locate_first_in_store_order_wins_over_closer_marker() {
    // Annotation 1's area covers annotation 2's marker.
    let mut store = store_with(&[(10.0, 10.0), (100.0, 100.0)]);
    set_area(&mut store, 0, Rect::new(50.0, 50.0, 100.0, 100.0));
    assert_eq!(locate(&store, pt(100.0, 100.0)).map(|a| a.number), Some(1));
}

#[test]
fn locate_overlapping_markers_prefers_earliest() {
    let store = store_with(&[(100.0, 100.0), (105.0, 100.0)]);
    assert_eq!(locate(&store, pt(104.0, 100.0)).map(|a| a.number), Some(1));
}
