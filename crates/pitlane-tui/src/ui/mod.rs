//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, title/nav/status bars and overlays
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling
//! - `views`: per-view content (seasons, races, race details, popups)

pub mod input;
pub mod render;
pub mod styles;
pub mod views;
