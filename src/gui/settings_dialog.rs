use eframe::egui;

use crate::core::SettingsEditor;

/// One settings row, addressed by name rather than widget position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingRow {
    pub key: char,
    pub duration: u32,
}

/// How the user closed the settings window, if they did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    Save,
    Cancel,
}

/// Renders the settings window over the staged map.
///
/// Every edit goes through the editor; the live key map stays untouched
/// until the app handles `Save`.
pub fn settings_window(ctx: &egui::Context, editor: &mut SettingsEditor) -> Option<SettingsAction> {
    let mut action = None;

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(true)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            let rows: Vec<SettingRow> = editor
                .staged()
                .iter()
                .map(|(key, duration)| SettingRow { key, duration })
                .collect();
            let free_letters = editor.staged().free_letters();

            egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                let mut rename_request = None;
                for row in &rows {
                    ui.horizontal(|ui| {
                        egui::ComboBox::from_id_source(("grab_key", row.key))
                            .selected_text(row.key.to_string())
                            .width(48.0)
                            .show_ui(ui, |ui| {
                                for &letter in &free_letters {
                                    if ui.selectable_label(false, letter.to_string()).clicked() {
                                        rename_request = Some((row.key, letter));
                                    }
                                }
                            });

                        if ui.button("-").clicked() {
                            editor.decrease(row.key);
                        }
                        ui.label(format!("{} s", row.duration));
                        if ui.button("+").clicked() {
                            editor.increase(row.key);
                        }

                        if ui.button("Delete").clicked() {
                            editor.delete(row.key);
                        }
                    });
                }

                if let Some((old, new)) = rename_request {
                    // The dropdown only offers free letters, so a conflict
                    // here means the staged map changed under us; keep it.
                    if let Err(e) = editor.rename(old, new) {
                        log::warn!("Rename '{}' -> '{}' rejected: {}", old, new, e);
                    }
                }

                let can_add = editor.staged().next_free_letter().is_some();
                if ui
                    .add_enabled(can_add, egui::Button::new("+ Add shortcut"))
                    .clicked()
                {
                    editor.add_next();
                }
            });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    action = Some(SettingsAction::Cancel);
                }
                if ui.button("Save").clicked() {
                    action = Some(SettingsAction::Save);
                }
            });
        });

    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::KeyMap;

    #[test]
    fn test_rows_mirror_the_staged_map_in_key_order() {
        let editor = SettingsEditor::open(&KeyMap::default());
        let rows: Vec<SettingRow> = editor
            .staged()
            .iter()
            .map(|(key, duration)| SettingRow { key, duration })
            .collect();

        assert_eq!(
            rows,
            vec![
                SettingRow { key: 'l', duration: 24 },
                SettingRow { key: 'm', duration: 16 },
                SettingRow { key: 's', duration: 8 },
            ]
        );
    }
}
