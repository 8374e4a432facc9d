//! Font atlas setup
//!
//! Loads an optional TTF from disk for extended glyph coverage
//! (Cyrillic labels and the like). The file is an optional asset: if
//! it is absent or unreadable the built-in fonts stay in place and
//! the app keeps running. A font that loads but lacks some glyphs is
//! accepted as-is; egui falls through to the remaining fonts in the
//! family per glyph.

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Default location of the optional UI font, relative to the
/// working directory.
pub const DEFAULT_FONT_FILE: &str = "fonts/DejaVuSans.ttf";

/// Install fonts into the GUI context, preferring the file at `path`.
///
/// Returns true if the custom font was installed, false if the
/// built-in defaults are in effect.
pub fn install_fonts(ctx: &egui::Context, path: &Path) -> bool {
    let mut fonts = egui::FontDefinitions::default();

    let loaded = match std::fs::read(path) {
        Ok(bytes) => {
            info!("Loaded UI font from {}", path.display());
            fonts.font_data.insert(
                "sigview-custom".to_owned(),
                Arc::new(egui::FontData::from_owned(bytes)),
            );
            // Front of the family: custom glyphs win, built-ins are
            // the per-glyph fallback
            fonts
                .families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .insert(0, "sigview-custom".to_owned());
            fonts
                .families
                .entry(egui::FontFamily::Monospace)
                .or_default()
                .push("sigview-custom".to_owned());
            true
        }
        Err(err) => {
            warn!(
                "UI font {} not available ({}), using built-in fonts",
                path.display(),
                err
            );
            false
        }
    };

    ctx.set_fonts(fonts);
    loaded
}
