use eframe::egui;

use super::actions::{
    ActionQueue,
    AppAction,
};
use crate::{
    core::{
        state::Session,
        units,
    },
    gemini::SuggestionKind,
};

const BE_COLOR: egui::Color32 = egui::Color32::from_rgb(234, 124, 24);
const FPE_COLOR: egui::Color32 = egui::Color32::from_rgb(160, 90, 220);

pub fn show(
    ui: &mut egui::Ui,
    session: &Session,
    correction_text: &mut String,
    queue: &mut ActionQueue,
) {
    let Some(analysis) = session.analysis() else {
        return;
    };

    ui.separator();

    if analysis.needs_clarification() {
        if let Some(question) = analysis.clarification_question.as_deref() {
            callout(ui, "Follow-up question", question, egui::Color32::from_rgb(70, 130, 220));
        }
    }

    ui.heading("Analysis results");
    ui.add_space(4.0);

    for item in &analysis.food_items {
        let be = units::item_bread_equivalent(item);
        let fpe = units::item_fat_protein_equivalent(item);

        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.strong(format!("{} (~{:.0}g)", item.name, item.weight_grams));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new(format!("🍞 {:.1} BE", be))
                                .color(BE_COLOR)
                                .strong(),
                        );
                        ui.label(
                            egui::RichText::new(format!("🥩 {:.1} FPE", fpe))
                                .color(FPE_COLOR)
                                .strong(),
                        );
                    });
                });
            });

            nutrient_row(ui, "🔥 Calories:", format!("{:.0} kcal", item.nutrients.calories));
            nutrient_row(ui, "💪 Protein:", format!("{:.1} g", item.nutrients.protein_grams));
            nutrient_row(ui, "🥑 Fat:", format!("{:.1} g", item.nutrients.fat_grams));
            nutrient_row(
                ui,
                "Carbohydrates:",
                format!("{:.1} g", item.nutrients.carbohydrates_grams),
            );
        });
    }

    ui.add_space(6.0);
    let totals = units::totals(&analysis.food_items);
    ui.group(|ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new("Meal totals").strong());
        nutrient_row(ui, "Total bread units:", format!("{:.1} BE", totals.be));
        nutrient_row(ui, "Total fat-protein units:", format!("{:.1} FPE", totals.fpe));
    });

    if !analysis.diabetic_note.is_empty() {
        ui.add_space(6.0);
        callout(
            ui,
            "Note for diabetics",
            &analysis.diabetic_note,
            egui::Color32::from_rgb(200, 160, 30),
        );
    }

    ui.add_space(8.0);
    let can_suggest = session.can_request_suggestion();
    ui.horizontal(|ui| {
        if ui
            .add_enabled(can_suggest, egui::Button::new("✨ Suggest an alternative"))
            .clicked()
        {
            queue.push(AppAction::RequestSuggestion(SuggestionKind::Alternative));
        }
        if ui.add_enabled(can_suggest, egui::Button::new("✨ Plan my day")).clicked() {
            queue.push(AppAction::RequestSuggestion(SuggestionKind::DayPlan));
        }
    });

    ui.add_space(4.0);
    let save_label = if session.meal_saved() { "Saved!" } else { "💾 Save meal" };
    if ui.add_enabled(session.can_save(), egui::Button::new(save_label)).clicked() {
        queue.push(AppAction::SaveMeal);
    }

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Corrections?").strong());
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(correction_text)
                .hint_text("e.g. that is whole-grain rice...")
                .desired_width(ui.available_width() - 70.0),
        );
        let correction = correction_text.trim().to_string();
        if ui
            .add_enabled(!correction.is_empty() && session.can_analyze(), egui::Button::new("Send"))
            .clicked()
        {
            queue.push(AppAction::Analyze { correction: Some(correction) });
        }
    });
}

fn nutrient_row(ui: &mut egui::Ui, label: &str, value: String) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(value);
        });
    });
}

fn callout(ui: &mut egui::Ui, title: &str, body: &str, accent: egui::Color32) {
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.5, accent))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(title).color(accent).strong());
            ui.label(body);
        });
}
