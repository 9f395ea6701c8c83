use std::{
    mem,
    time::{
        Duration,
        Instant,
    },
};

use eframe::egui;

use super::{
    actions::{
        ActionQueue,
        AppAction,
    },
    camera_modal::{
        CameraEvent,
        CameraModal,
    },
    error_modal::ErrorModal,
    history_panel,
    results_panel,
    settings_modal::{
        SettingsData,
        SettingsModal,
    },
    suggestion_panel,
};
use crate::{
    capture::{
        self,
        CapturedImage,
    },
    core::{
        tasks::{
            TaskManager,
            TaskResult,
        },
        MealHistory,
        Session,
    },
    gemini::GeminiConfig,
    persistence::{
        load_json_or_default,
        save_json,
    },
};

const SETTINGS_FILE: &str = "settings.json";
const CLEAR_CONFIRM_WINDOW: Duration = Duration::from_secs(3);

#[derive(Default)]
pub struct Modals {
    pub camera: CameraModal,
    pub error: ErrorModal,
    pub settings: SettingsModal,
}

pub struct NutrilensApp {
    session: Session,
    history: MealHistory,
    settings: SettingsData,

    // UI state
    correction_text: String,
    actions: ActionQueue,
    preview_texture: Option<egui::TextureHandle>,
    preview_failed: bool,
    clear_armed_at: Option<Instant>,
    modals: Modals,

    task_manager: TaskManager,
}

impl NutrilensApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            session: Session::new(),
            history: MealHistory::new(),
            settings: load_json_or_default::<SettingsData>(SETTINGS_FILE),
            correction_text: String::new(),
            actions: ActionQueue::new(),
            preview_texture: None,
            preview_failed: false,
            clear_armed_at: None,
            modals: Modals::default(),
            task_manager: TaskManager::new(),
        }
    }
}

impl eframe::App for NutrilensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for result in self.task_manager.poll_results() {
            self.handle_task_result(result);
        }

        self.handle_paste(ctx);
        self.handle_file_drops(ctx);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Nutrilens");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙").on_hover_text("Settings").clicked() {
                        self.modals.settings.open_settings(self.settings.clone());
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
                ui.label(
                    "Photograph your meal for a detailed nutrition analysis \
                     with BE and FPE units.",
                );
                ui.add_space(8.0);

                self.draw_image_area(ctx, ui);
                ui.add_space(6.0);
                self.draw_capture_buttons(ui);
                ui.add_space(8.0);
                self.draw_analyze_button(ui);

                if let Some(error) = self.session.error() {
                    ui.add_space(6.0);
                    ui.colored_label(egui::Color32::from_rgb(200, 60, 60), error);
                }

                results_panel::show(
                    ui,
                    &self.session,
                    &mut self.correction_text,
                    &mut self.actions,
                );

                if self.session.is_suggesting() {
                    ui.separator();
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new());
                        ui.label("Preparing a suggestion...");
                    });
                } else if let Some(suggestion) = self.session.suggestion() {
                    suggestion_panel::show(ui, suggestion);
                }

                history_panel::show(ui, &self.history, self.clear_armed(), &mut self.actions);
            });
        });

        if let Some(event) = self.modals.camera.show(ctx) {
            match event {
                CameraEvent::PictureTaken(image) => self.apply_image(image),
                CameraEvent::Failed(message) => {
                    self.modals.error.show_error(
                        "Camera unavailable",
                        "The camera could not be used.",
                        Some(&message),
                    );
                }
            }
        }

        if let Some(settings) = self.modals.settings.show(ctx) {
            self.settings = settings;
            self.save_settings();
        }

        self.modals.error.show(ctx);

        // Let an armed clear button fall back to normal without input.
        if self.clear_armed_at.is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        let queued: Vec<AppAction> = self.actions.drain().collect();
        for action in queued {
            self.process_action(action);
        }
    }
}

impl NutrilensApp {
    fn draw_image_area(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        if self.session.image().is_some() {
            self.ensure_preview(ctx);
            if let Some(texture) = &self.preview_texture {
                ui.add(
                    egui::Image::new(texture)
                        .fit_to_exact_size(egui::vec2(ui.available_width(), 220.0)),
                );
            }
        } else {
            let size = egui::vec2(ui.available_width(), 160.0);
            let placeholder = egui::Button::new("📷\nTake, load or paste a photo of your meal")
                .fill(egui::Color32::TRANSPARENT);
            if ui.add_sized(size, placeholder).clicked() {
                self.actions.push(AppAction::PickFile);
            }
        }
    }

    fn draw_capture_buttons(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let camera_open = self.modals.camera.is_open();
            if ui.add_enabled(!camera_open, egui::Button::new("📷 Camera")).clicked() {
                self.actions.push(AppAction::OpenCamera);
            }
            if ui.button("📁 Load photo").clicked() {
                self.actions.push(AppAction::PickFile);
            }
            if ui.button("📋 Paste").clicked() {
                self.actions.push(AppAction::PasteClipboard);
            }
        });
    }

    fn draw_analyze_button(&mut self, ui: &mut egui::Ui) {
        if self.session.is_analyzing() {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.label("Analyzing meal...");
            });
            return;
        }

        let button = egui::Button::new(egui::RichText::new("Analyze").strong());
        let size = egui::vec2(ui.available_width(), 32.0);
        let response =
            ui.add_enabled_ui(self.session.can_analyze(), |ui| ui.add_sized(size, button));
        if response.inner.clicked() {
            self.actions.push(AppAction::Analyze { correction: None });
        }
    }

    fn handle_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::AnalysisDone { generation, result } => {
                if !self.session.finish_analysis(generation, result) {
                    println!("Dropped stale analysis reply (generation {})", generation);
                }
            }
            TaskResult::SuggestionDone { generation, kind, result } => {
                if !self.session.finish_suggestion(generation, kind, result) {
                    println!("Dropped stale suggestion reply (generation {})", generation);
                }
            }
        }
    }

    fn process_action(&mut self, action: AppAction) {
        match action {
            AppAction::PickFile => {
                let picked = rfd::FileDialog::new()
                    .add_filter("Images", &capture::IMAGE_EXTENSIONS)
                    .pick_file();
                if let Some(path) = picked {
                    match CapturedImage::from_path(&path) {
                        Ok(image) => self.apply_image(image),
                        Err(e) => self.modals.error.show_error(
                            "Image error",
                            "Unable to load the selected file.",
                            Some(&e.to_string()),
                        ),
                    }
                }
            }

            AppAction::PasteClipboard => match CapturedImage::from_clipboard() {
                Ok(Some(image)) => self.apply_image(image),
                // No image on the clipboard: leave everything untouched.
                Ok(None) => {}
                Err(e) => self.modals.error.show_error(
                    "Image error",
                    "Unable to read an image from the clipboard.",
                    Some(&e.to_string()),
                ),
            },

            AppAction::OpenCamera => self.modals.camera.open(),

            AppAction::Analyze { correction } => {
                if !self.session.can_analyze() {
                    return;
                }
                let Some(image) = self.session.image().cloned() else {
                    return;
                };
                let generation = self.session.begin_analysis();
                let config = GeminiConfig::resolve(&self.settings.api_key, &self.settings.model);
                self.task_manager.analyze_meal(config, image, correction, generation);
            }

            AppAction::RequestSuggestion(kind) => {
                if !self.session.can_request_suggestion() {
                    return;
                }
                let Some(analysis) = self.session.analysis().cloned() else {
                    return;
                };
                let generation = self.session.begin_suggestion();
                let config = GeminiConfig::resolve(&self.settings.api_key, &self.settings.model);
                self.task_manager.fetch_suggestion(config, analysis, kind, generation);
            }

            AppAction::SaveMeal => {
                if !self.session.can_save() {
                    return;
                }
                let (Some(analysis), Some(image)) =
                    (self.session.analysis().cloned(), self.session.image().cloned())
                else {
                    return;
                };
                let meal = self.history.save(analysis, image);
                println!("Saved meal {} ({})", meal.id, meal.format_saved_at());
                self.session.mark_saved();
            }

            AppAction::ClearHistory => {
                if self.clear_armed() {
                    self.history.clear();
                    self.clear_armed_at = None;
                } else {
                    self.clear_armed_at = Some(Instant::now());
                }
            }
        }
    }

    fn apply_image(&mut self, image: CapturedImage) {
        self.session.set_image(image);
        self.preview_texture = None;
        self.preview_failed = false;
        self.correction_text.clear();
    }

    fn ensure_preview(&mut self, ctx: &egui::Context) {
        if self.preview_texture.is_some() || self.preview_failed {
            return;
        }
        let Some(image) = self.session.image() else {
            return;
        };

        match image::load_from_memory(image.bytes()) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                self.preview_texture = Some(ctx.load_texture(
                    "meal_preview",
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));
            }
            Err(e) => {
                eprintln!("Failed to decode preview: {}", e);
                self.preview_failed = true;
            }
        }
    }

    fn handle_paste(&mut self, ctx: &egui::Context) {
        // A paste that lands in a focused text field belongs to that field.
        let text_focused = ctx.memory(|m| m.focused().is_some());
        if text_focused {
            return;
        }

        let pasted = ctx.input(|i| {
            i.events.iter().any(|e| matches!(e, egui::Event::Paste(_)))
                || (i.modifiers.command && i.key_pressed(egui::Key::V))
        });
        if pasted {
            self.actions.push(AppAction::PasteClipboard);
        }
    }

    fn handle_file_drops(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input_mut(|i| mem::take(&mut i.raw.dropped_files));
        if dropped.is_empty() {
            return;
        }

        if let Some(path) =
            dropped.iter().filter_map(|f| f.path.as_deref()).find(|p| capture::is_image_path(p))
        {
            match CapturedImage::from_path(path) {
                Ok(image) => self.apply_image(image),
                Err(e) => self.modals.error.show_error(
                    "Image error",
                    "Unable to load the dropped file.",
                    Some(&e.to_string()),
                ),
            }
        }
    }

    fn clear_armed(&self) -> bool {
        self.clear_armed_at
            .map(|armed_at| armed_at.elapsed() < CLEAR_CONFIRM_WINDOW)
            .unwrap_or(false)
    }

    fn save_settings(&self) {
        if let Err(e) = save_json(&self.settings, SETTINGS_FILE) {
            eprintln!("Failed to save settings: {}", e);
        }
    }
}
