use eframe::egui;
use serde::{
    Deserialize,
    Serialize,
};

use crate::gemini;

/// Persisted configuration. An empty API key falls back to the
/// `GEMINI_API_KEY` environment variable; an empty model falls back to the
/// default model.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SettingsData {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
}

pub struct SettingsModal {
    open: bool,
    draft: SettingsData,
}

impl SettingsModal {
    pub fn new() -> Self {
        Self { open: false, draft: SettingsData::default() }
    }

    pub fn open_settings(&mut self, current: SettingsData) {
        self.draft = current;
        self.open = true;
    }

    /// Returns the new settings when the user confirms.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<SettingsData> {
        if !self.open {
            return None;
        }

        let mut confirmed = None;

        let modal = egui::Modal::new(egui::Id::new("settings_modal")).show(ctx, |ui| {
            ui.set_width(360.0);
            ui.heading("Settings");
            ui.add_space(8.0);

            ui.label("API key");
            ui.add(
                egui::TextEdit::singleline(&mut self.draft.api_key)
                    .password(true)
                    .hint_text(format!("falls back to ${}", gemini::API_KEY_ENV))
                    .desired_width(f32::INFINITY),
            );

            ui.add_space(6.0);
            ui.label("Model");
            ui.add(
                egui::TextEdit::singleline(&mut self.draft.model)
                    .hint_text(gemini::DEFAULT_MODEL)
                    .desired_width(f32::INFINITY),
            );

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    confirmed = Some(self.draft.clone());
                    ui.close();
                }
                if ui.button("Cancel").clicked() {
                    ui.close();
                }
            });
        });

        if modal.should_close() {
            self.open = false;
        }

        confirmed
    }
}

impl Default for SettingsModal {
    fn default() -> Self {
        Self::new()
    }
}
