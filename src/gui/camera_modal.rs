use eframe::egui;

use crate::capture::{
    camera::CameraSession,
    CapturedImage,
};

pub enum CameraEvent {
    PictureTaken(CapturedImage),
    Failed(String),
}

/// Live-capture surface. The camera handle lives exactly as long as the
/// modal is open: opening acquires it, and snap, cancel, failure and
/// teardown all drop it.
#[derive(Default)]
pub struct CameraModal {
    session: Option<CameraSession>,
    texture: Option<egui::TextureHandle>,
}

impl CameraModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.texture = None;
        self.session = Some(CameraSession::open());
    }

    pub fn close(&mut self) {
        // Dropping the session stops the grab thread and releases the device.
        self.session = None;
        self.texture = None;
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<CameraEvent> {
        let session = self.session.as_ref()?;

        // Device or permission failure closes the surface on its own.
        if let Some(failure) = session.failure() {
            self.close();
            return Some(CameraEvent::Failed(failure));
        }

        if let Some(frame) = session.latest_frame() {
            let size = [frame.width as usize, frame.height as usize];
            let color_image = egui::ColorImage::from_rgb(size, &frame.rgb);
            match &mut self.texture {
                Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
                None => {
                    self.texture =
                        Some(ctx.load_texture("camera_preview", color_image, egui::TextureOptions::LINEAR))
                }
            }
        }

        let mut event = None;

        let modal = egui::Modal::new(egui::Id::new("camera_modal")).show(ctx, |ui| {
            ui.set_width(440.0);
            ui.heading("Take a picture");
            ui.add_space(8.0);

            match &self.texture {
                Some(texture) => {
                    ui.add(
                        egui::Image::new(texture)
                            .fit_to_exact_size(egui::vec2(420.0, 315.0)),
                    );
                }
                None => {
                    ui.allocate_ui(egui::vec2(420.0, 315.0), |ui| {
                        ui.centered_and_justified(|ui| {
                            ui.add(egui::Spinner::new());
                        });
                    });
                }
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let snap =
                    ui.add_enabled(self.texture.is_some(), egui::Button::new("📷 Snap"));
                if snap.clicked() {
                    event = Some(match self.session.as_ref().unwrap().snap() {
                        Ok(image) => CameraEvent::PictureTaken(image),
                        Err(e) => CameraEvent::Failed(e.to_string()),
                    });
                }
                if ui.button("Cancel").clicked() {
                    ui.close();
                }
            });
        });

        if event.is_some() || modal.should_close() {
            self.close();
        }

        // Keep the preview moving while the surface is up.
        if self.session.is_some() {
            ctx.request_repaint();
        }

        event
    }
}
