//! Annotation session engine for SBC board diagrams.
//!
//! This crate is compiled both natively (for the `boardmark` CLI) and to
//! WebAssembly (for the browser editor). It owns the annotation session:
//! placing numbered markers on an SVG diagram, defining rectangular click
//! areas by dragging, hit-testing, zoom state, and turning the result into the
//! artifacts consumed by the interface viewer. The host layer only forwards
//! pointer coordinates (already in SVG user space) and draws whatever the
//! returned [`engine::Action`]s describe.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::SessionCore`]: mode controller and session state |
//! | [`command`] | Serializable user commands and the dispatch table |
//! | [`doc`] | Annotation records and the numbering store |
//! | [`input`] | Interaction modes and the drag gesture state machine |
//! | [`hit`] | Hit-testing against markers and click areas |
//! | [`camera`] | Zoom/pan presentation transform |
//! | [`export`] | SVG and JSON exports, annotations import |
//! | [`svg`] | Minimal SVG text handling for layer injection |
//! | [`interfaces`] | Structured-data schema shared with the viewer |
//! | [`viewer`] | Viewer state: boards, sides, languages, legend |
//! | [`bindings`] | `wasm_bindgen` facade for the browser host |
//! | [`consts`] | Shared numeric constants (radii, thresholds, zoom limits) |

pub mod bindings;
pub mod camera;
pub mod command;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod export;
pub mod hit;
pub mod input;
pub mod interfaces;
pub mod svg;
pub mod viewer;
