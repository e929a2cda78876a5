//! Popup window for the selected earthquake.

use crate::state::AppState;
use eframe::egui::{self, RichText, Vec2};

/// Shows the popup next to the selected marker. Closing it clears the selection.
pub fn render_popup(ctx: &egui::Context, state: &mut AppState) {
    let Some(selected) = &state.selected else {
        return;
    };

    let anchor = state.view.projection.geo_to_screen(selected.position);
    if !state.view.projection.screen_rect.contains(anchor) {
        return;
    }

    let title = if selected.popup.title.is_empty() {
        "Earthquake"
    } else {
        selected.popup.title.as_str()
    };

    let mut open = true;
    egui::Window::new(RichText::new(title).strong())
        .id(egui::Id::new("quake_popup"))
        .fixed_pos(anchor + Vec2::new(12.0, -12.0))
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            for line in selected.popup.lines() {
                ui.label(line);
            }
        });

    if !open {
        state.selected = None;
    }
}
