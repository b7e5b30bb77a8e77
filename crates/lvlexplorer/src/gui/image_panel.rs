//! Texture preview for the image display mode.
use eframe::egui;

use crate::explorer::display::DisplayPane;

/// Holds the uploaded texture for the pane's current image.
#[derive(Default)]
pub struct ImagePanel {
    texture: Option<egui::TextureHandle>,
    generation: u64,
}

impl ImagePanel {
    pub fn clear(&mut self) {
        self.texture = None;
        self.generation = 0;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, display: &DisplayPane) {
        let Some(image) = display.image() else {
            return;
        };

        if self.texture.is_none() || self.generation != display.image_generation() {
            let color = egui::ColorImage::from_rgb([image.width(), image.height()], image.rgb());
            self.texture = Some(ui.ctx().load_texture(
                "chunk-image",
                color,
                egui::TextureOptions::NEAREST,
            ));
            self.generation = display.image_generation();
            ui.ctx().request_repaint();
        }

        ui.label(format!("{} x {}", image.width(), image.height()));
        let Some(texture) = &self.texture else {
            return;
        };
        let size = fit_size(image.width(), image.height(), ui.available_size());
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        ui.painter().image(texture.id(), rect, uv, egui::Color32::WHITE);
    }
}

/// Largest size with the image's aspect ratio that fits in `available`.
pub fn fit_size(width: usize, height: usize, available: egui::Vec2) -> egui::Vec2 {
    if width == 0 || height == 0 || available.x <= 0.0 || available.y <= 0.0 {
        return egui::Vec2::ZERO;
    }
    let (w, h) = (width as f32, height as f32);
    let scale = (available.x / w).min(available.y / h);
    egui::vec2(w * scale, h * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_keeps_aspect_ratio() {
        assert_eq!(fit_size(256, 128, egui::vec2(512.0, 512.0)), egui::vec2(512.0, 256.0));
        assert_eq!(fit_size(64, 256, egui::vec2(400.0, 128.0)), egui::vec2(32.0, 128.0));
    }

    #[test]
    fn fit_of_empty_image_is_zero() {
        assert_eq!(fit_size(0, 4, egui::vec2(100.0, 100.0)), egui::Vec2::ZERO);
    }
}
