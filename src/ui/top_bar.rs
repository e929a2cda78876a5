//! Top bar UI: app title, status, and reload.

use super::colors;
use crate::state::AppState;
use eframe::egui::{self, Color32, RichText};
use egui_phosphor::regular as icons;

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState, loading: bool) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                // App title
                ui.label(
                    RichText::new(format!("{} Quake Atlas", icons::GLOBE_HEMISPHERE_WEST))
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                let reload = ui
                    .add_enabled(
                        !loading,
                        egui::Button::new(format!("{} Reload data", icons::ARROW_CLOCKWISE)),
                    )
                    .on_hover_text("Fetch the earthquake feed and boundary layers again");
                if reload.clicked() {
                    state.reload_requested = true;
                }

                if loading {
                    ui.spinner();
                }

                // Status text
                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(Color32::GRAY),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(format!(
                            "{:.4}, {:.4}  z{:.1}",
                            state.view.center_lat(),
                            state.view.center_lon(),
                            state.view.zoom()
                        ))
                        .monospace()
                        .size(12.0)
                        .color(colors::ui::VALUE),
                    );
                });
            });
        });
}
