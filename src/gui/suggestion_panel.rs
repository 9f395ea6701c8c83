use eframe::egui;

use crate::core::{
    markup::{
        parse_lines,
        SpanStyle,
    },
    state::Suggestion,
};

/// Renders the coaching text: bold/italic spans per line, blank lines as
/// vertical space. The parsing lives in `core::markup`; this only maps
/// spans onto RichText.
pub fn show(ui: &mut egui::Ui, suggestion: &Suggestion) {
    ui.separator();

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new(suggestion.kind.title()).heading());
        ui.add_space(4.0);

        for line in parse_lines(&suggestion.text) {
            if line.is_empty() {
                ui.add_space(6.0);
                continue;
            }

            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing.x = 0.0;
                for span in &line {
                    let text = egui::RichText::new(&span.text);
                    let text = match span.style {
                        SpanStyle::Plain => text,
                        SpanStyle::Bold => text.strong(),
                        SpanStyle::Italic => text.italics(),
                    };
                    ui.label(text);
                }
            });
        }
    });
}
