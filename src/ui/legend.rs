//! Depth legend anchored to the bottom-right corner of the map.

use crate::geo::parse_color;
use crate::quake::DepthScale;
use eframe::egui::{self, Align2, Rect, RichText, Vec2};

const SWATCH_SIZE: f32 = 12.0;
const MARGIN: f32 = 10.0;

pub fn render_legend(ctx: &egui::Context, map_rect: Rect, depth_scale: &DepthScale) {
    egui::Area::new(egui::Id::new("depth_legend"))
        .pivot(Align2::RIGHT_BOTTOM)
        .fixed_pos(map_rect.right_bottom() - Vec2::splat(MARGIN))
        .constrain_to(map_rect)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(RichText::new("Depth Legend").strong());
                for row in depth_scale.legend_rows() {
                    ui.horizontal(|ui| {
                        let (swatch, _) =
                            ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), egui::Sense::hover());
                        ui.painter()
                            .rect_filled(swatch, 2.0, parse_color(&row.color));
                        ui.label(RichText::new(row.label).size(12.0));
                    });
                }
            });
        });
}
