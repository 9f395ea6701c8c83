use eframe::egui;
use egui_extras::{
    Column,
    TableBuilder,
};

use super::actions::{
    ActionQueue,
    AppAction,
};
use crate::core::{
    units,
    MealHistory,
};

pub fn show(ui: &mut egui::Ui, history: &MealHistory, clear_armed: bool, queue: &mut ActionQueue) {
    ui.separator();
    ui.horizontal(|ui| {
        ui.heading("Meal history");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if !history.is_empty() {
                let label = if clear_armed { "Really clear?" } else { "Clear history" };
                let text = if clear_armed {
                    egui::RichText::new(label).color(egui::Color32::WHITE).strong()
                } else {
                    egui::RichText::new(label).color(egui::Color32::from_rgb(200, 60, 60))
                };
                let mut button = egui::Button::new(text);
                if clear_armed {
                    button = button.fill(egui::Color32::from_rgb(180, 40, 40));
                }
                if ui.add(button).clicked() {
                    queue.push(AppAction::ClearHistory);
                }
            }
        });
    });

    if history.is_empty() {
        ui.label("Your history is empty.");
        return;
    }

    let text_height = egui::TextStyle::Body.resolve(ui.style()).size.max(18.0);

    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::remainder().clip(true))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(50.0))
        .column(Column::auto().at_least(50.0))
        .column(Column::auto().at_least(60.0))
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.strong("Meal");
            });
            header.col(|ui| {
                ui.strong("Saved");
            });
            header.col(|ui| {
                ui.strong("BE");
            });
            header.col(|ui| {
                ui.strong("FPE");
            });
            header.col(|ui| {
                ui.strong("kcal");
            });
        })
        .body(|body| {
            let meals = history.meals();
            body.rows(text_height, meals.len(), |mut row| {
                let meal = &meals[row.index()];
                let totals = units::totals(&meal.analysis.food_items);
                let names = meal.food_names();

                row.col(|ui| {
                    ui.label(&names).on_hover_text(&names);
                });
                row.col(|ui| {
                    ui.label(meal.format_saved_at());
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", totals.be));
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", totals.fpe));
                });
                row.col(|ui| {
                    ui.label(format!("{:.0}", totals.calories));
                });
            });
        });
}
