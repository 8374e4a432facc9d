//! sigview-ui - immediate-mode GUI declaration
//!
//! The per-frame widget code for the signal table, plus font-atlas
//! setup. Declares widgets against an `egui::Context`; the windowing
//! and GPU sides live elsewhere.

mod fonts;
mod panel;

pub use fonts::{install_fonts, DEFAULT_FONT_FILE};
pub use panel::signal_panel;
