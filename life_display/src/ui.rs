// ui.rs - Per-frame step, pixel upload and drawing

use egui::{Color32, ColorImage, Rect, TextureOptions, pos2};
use tracing::info;

use crate::LifeApp;

impl eframe::App for LifeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.sim.step() {
            let cycling = self.sim.is_cycling();
            if cycling && !self.reported_cycle {
                info!(
                    generation = self.sim.generation(),
                    population = self.sim.population(),
                    "grid settled into a cycle"
                );
            }
            self.reported_cycle = cycling;
        }

        // Upload the current generation
        let screen = ctx.screen_rect();
        let (width, height) = self
            .sim
            .layout(screen.width() as usize, screen.height() as usize);
        self.sim.render_into(&mut self.pixels);
        let image = ColorImage::from_rgba_unmultiplied([width, height], &self.pixels);
        match self.texture.as_mut() {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("life", image, TextureOptions::NEAREST));
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::hover());

                // Background cells are transparent, so they show this through
                painter.rect_filled(response.rect, 0.0, Color32::BLACK);

                if let Some(texture) = &self.texture {
                    painter.image(
                        texture.id(),
                        response.rect,
                        Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }
            });

        ctx.request_repaint();
    }
}
