//! UI modules for the Quake Atlas application.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title, status, and reload
//! - Right panel: Layer control (base layers and overlays)
//! - Central canvas: Map, depth legend, and marker popups

mod canvas;
mod colors;
mod layer_control;
mod legend;
mod popup;
mod top_bar;

pub use canvas::render_canvas;
pub use layer_control::render_layer_control;
pub use top_bar::render_top_bar;
