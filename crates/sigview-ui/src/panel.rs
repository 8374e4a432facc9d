//! Signal table window
//!
//! Re-declared every frame. Edits land in the table immediately and
//! in place; bounds are enforced by the model, not the widgets.

use sigview_model::{SignalTable, MAX_NAME_LEN, MAX_SIGNAL_VALUE};

/// Declare the signal configuration window for this frame.
///
/// `open` backs the window's close control; closing hides the panel
/// without ending the application.
pub fn signal_panel(ctx: &egui::Context, table: &mut SignalTable, open: &mut bool) {
    egui::Window::new("Signal Configuration")
        .open(open)
        .default_pos([50.0, 50.0])
        .default_size([450.0, 300.0])
        .resizable(true)
        .show(ctx, |ui| {
            // Header row
            ui.horizontal(|ui| {
                ui.allocate_ui([150.0, 20.0].into(), |ui| {
                    ui.strong("Name");
                });
                ui.strong("Value");
            });
            ui.separator();

            egui::Grid::new("signal-table")
                .num_columns(2)
                .min_col_width(120.0)
                .show(ui, |ui| {
                    for record in table.iter_mut() {
                        // Edit a copy so the model enforces the byte bound
                        let mut name = record.name.clone();
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut name)
                                .char_limit(MAX_NAME_LEN)
                                .desired_width(150.0),
                        );
                        if response.changed() {
                            record.set_name(&name);
                        }

                        let mut value = i64::from(record.value);
                        let response = ui.add(
                            egui::DragValue::new(&mut value)
                                .range(0..=MAX_SIGNAL_VALUE)
                                .speed(1),
                        );
                        if response.changed() {
                            record.set_value(value);
                        }

                        ui.end_row();
                    }
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_declares_without_input() {
        let ctx = egui::Context::default();
        let mut table = SignalTable::default();
        let mut open = true;

        let output = ctx.run(egui::RawInput::default(), |ctx| {
            signal_panel(ctx, &mut table, &mut open);
        });

        // The window produced paint data; first frame also bakes the
        // font atlas texture.
        assert!(!output.shapes.is_empty());
        assert!(!output.textures_delta.set.is_empty());
        assert!(open);
    }

    #[test]
    fn test_panel_without_edits_leaves_table_unchanged() {
        let ctx = egui::Context::default();
        let mut table = SignalTable::default();
        let mut open = true;
        let before = table.clone();

        for _ in 0..3 {
            ctx.run(egui::RawInput::default(), |ctx| {
                signal_panel(ctx, &mut table, &mut open);
            });
        }

        assert_eq!(table, before);
    }

    #[test]
    fn test_closed_panel_declares_nothing() {
        let ctx = egui::Context::default();
        let mut table = SignalTable::default();
        let mut open = false;
        let before = table.clone();

        let output = ctx.run(egui::RawInput::default(), |ctx| {
            signal_panel(ctx, &mut table, &mut open);
        });

        assert!(output.shapes.is_empty());
        assert_eq!(table, before);
    }

    #[test]
    fn test_texture_deltas_are_one_shot() {
        // The font atlas arrives in the first frame's texture deltas
        // and is never resent; a frame that produced deltas must also
        // get to apply them, so the loop acquires the render target
        // before declaring the GUI.
        let ctx = egui::Context::default();
        let mut table = SignalTable::default();
        let mut open = true;

        let first = ctx.run(egui::RawInput::default(), |ctx| {
            signal_panel(ctx, &mut table, &mut open);
        });
        assert!(!first.textures_delta.set.is_empty());

        let second = ctx.run(egui::RawInput::default(), |ctx| {
            signal_panel(ctx, &mut table, &mut open);
        });
        assert!(second.textures_delta.set.is_empty());
    }
}
