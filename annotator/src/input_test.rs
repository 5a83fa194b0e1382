use super::*;

// =============================================================
// Mode
// =============================================================

#[test]
fn mode_default_is_add() {
    assert_eq!(Mode::default(), Mode::Add);
}

#[test]
fn mode_serde_lowercase() {
    assert_eq!(serde_json::to_value(Mode::Edit).unwrap(), serde_json::json!("edit"));
    let mode: Mode = serde_json::from_value(serde_json::json!("view")).unwrap();
    assert_eq!(mode, Mode::View);
}

#[test]
fn cursor_per_mode() {
    assert_eq!(Mode::Add.cursor(false), "crosshair");
    assert_eq!(Mode::Edit.cursor(true), "crosshair");
    assert_eq!(Mode::Edit.cursor(false), "default");
    assert_eq!(Mode::View.cursor(true), "pointer");
}

#[test]
fn edit_hint_names_selected_number() {
    assert!(Mode::Edit.hint(Some(12)).contains("#12"));
    assert!(Mode::Edit.hint(None).contains("Select an annotation"));
}

#[test]
fn add_and_view_hints_ignore_selection() {
    assert_eq!(Mode::Add.hint(Some(1)), Mode::Add.hint(None));
    assert_eq!(Mode::View.hint(Some(1)), Mode::View.hint(None));
}

// =============================================================
// UiState
// =============================================================

#[test]
fn ui_state_default() {
    let ui = UiState::default();
    assert_eq!(ui.mode, Mode::Add);
    assert!(ui.selected_id.is_none());
    assert!(ui.export.include_numbers);
    assert!(ui.export.include_click_layer);
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    let state = InputState::default();
    assert_eq!(state, InputState::Idle);
    assert!(!state.is_drawing());
    assert!(state.draft().is_none());
}

#[test]
fn drawing_draft_is_normalized() {
    let state = InputState::DrawingArea { anchor: Point::new(50.0, 50.0), current: Point::new(10.0, 10.0) };
    assert!(state.is_drawing());
    assert_eq!(state.draft(), Some(Rect::new(10.0, 10.0, 40.0, 40.0)));
}

#[test]
fn drawing_draft_zero_size_at_start() {
    let p = Point::new(3.0, 4.0);
    let state = InputState::DrawingArea { anchor: p, current: p };
    assert_eq!(state.draft(), Some(Rect::new(3.0, 4.0, 0.0, 0.0)));
}

#[test]
fn wheel_delta_dx_defaults() {
    let delta: WheelDelta = serde_json::from_value(serde_json::json!({ "dy": -3.0 })).unwrap();
    assert_eq!(delta, WheelDelta { dx: 0.0, dy: -3.0 });
}
