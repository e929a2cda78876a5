//! Layer control: base layer selection and overlay toggles.

use super::colors;
use crate::state::{failure_for, AppState};
use eframe::egui::{self, RichText, ScrollArea};
use egui_phosphor::regular as icons;

pub fn render_layer_control(ctx: &egui::Context, state: &mut AppState, loading: bool) {
    egui::SidePanel::right("layer_control")
        .resizable(true)
        .default_width(220.0)
        .min_width(180.0)
        .max_width(350.0)
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading(format!("{} Layers", icons::STACK));
                ui.separator();

                render_base_section(ui, state);
                ui.add_space(5.0);

                render_overlay_section(ui, state, loading);
            });
        });
}

fn render_base_section(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Base Layers").strong())
        .default_open(true)
        .show(ui, |ui| {
            for (index, source) in state.config.base_layers.iter().enumerate() {
                ui.radio_value(&mut state.active_base, index, source.name.as_str());
            }
        });
}

fn render_overlay_section(ui: &mut egui::Ui, state: &mut AppState, loading: bool) {
    egui::CollapsingHeader::new(RichText::new("Overlays").strong())
        .default_open(true)
        .show(ui, |ui| {
            let failures = &state.load_failures;
            for (name, entry) in state.overlays.iter_mut() {
                ui.horizontal(|ui| {
                    ui.checkbox(&mut entry.visible, name);
                    ui.label(
                        RichText::new(entry.layer.feature_count().to_string())
                            .small()
                            .color(colors::ui::LABEL),
                    );
                    if let Some(failure) = failure_for(failures, name) {
                        ui.label(
                            RichText::new(format!("{} stale", icons::WARNING))
                                .small()
                                .color(colors::ui::UNAVAILABLE),
                        )
                        .on_hover_text(format!(
                            "Reload failed, showing previous data: {}",
                            failure.error
                        ));
                    }
                });
            }

            for (name, failure) in state.unavailable_layers() {
                ui.label(
                    RichText::new(format!("{} {} (unavailable)", icons::WARNING, name))
                        .color(colors::ui::UNAVAILABLE),
                )
                .on_hover_text(failure.error.to_string());
            }

            if loading && state.overlays.is_empty() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Loading overlays...").small());
                });
            }
        });
}
