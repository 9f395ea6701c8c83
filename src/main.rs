use nutrilens::gui::NutrilensApp;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([460.0, 780.0])
            .with_min_inner_size([380.0, 520.0])
            .with_title("Nutrilens"),
        ..Default::default()
    };

    eframe::run_native(
        "Nutrilens",
        options,
        Box::new(|cc| Ok(Box::new(NutrilensApp::new(cc)))),
    )
}
