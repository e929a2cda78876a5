//! Central canvas UI: base tiles, overlays, and map interaction.

use super::{colors, legend, popup};
use crate::fetch::HttpFetcher;
use crate::geo::{hit_test_marker, render_geo_layer, render_quake_layer};
use crate::state::{AppState, SelectedQuake, ViewState};
use crate::tiles::{TileCache, TileKey, TileSource};
use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, Vec2};
use std::collections::HashSet;

/// Scroll distance (points) that doubles the map scale.
const SCROLL_PER_ZOOM_LEVEL: f32 = 200.0;

/// Render the map with the active base layer and every visible overlay.
pub fn render_canvas(
    ctx: &egui::Context,
    state: &mut AppState,
    tiles: &mut TileCache,
    fetcher: &HttpFetcher,
) {
    egui::CentralPanel::default()
        .frame(egui::Frame::new().fill(colors::canvas::BACKGROUND))
        .show(ctx, |ui| {
            let available_size = ui.available_size();
            let (response, painter) =
                ui.allocate_painter(available_size, Sense::click_and_drag());
            let rect = response.rect;

            state.view.set_screen_rect(rect);
            handle_canvas_interaction(&response, state);

            // Base layer first, then vector overlays, then markers on top
            if let Some(source) = state.config.base_layers.get(state.active_base) {
                render_tiles(
                    ctx,
                    &painter,
                    tiles,
                    fetcher,
                    source,
                    state.active_base,
                    &state.view,
                );
            }

            let projection = &state.view.projection;
            for layer in state.overlays.visible_vector_layers() {
                render_geo_layer(&painter, layer, projection);
            }
            for layer in state.overlays.visible_quake_layers() {
                render_quake_layer(&painter, layer, projection);
            }

            if let Some(selected) = &state.selected {
                let center = projection.geo_to_screen(selected.position);
                painter.circle_stroke(center, 3.0, Stroke::new(2.0, colors::canvas::SELECTION));
            }

            if let Some(source) = state.active_base_layer() {
                draw_attribution(&painter, rect, &source.attribution);
            }

            legend::render_legend(ctx, rect, &state.config.depth_scale);
        });

    popup::render_popup(ctx, state);
}

/// Requests and draws the tiles covering the view, then evicts the rest.
fn render_tiles(
    ctx: &egui::Context,
    painter: &Painter,
    tiles: &mut TileCache,
    fetcher: &HttpFetcher,
    source: &TileSource,
    source_index: usize,
    view: &ViewState,
) {
    tiles.poll(ctx);

    let tile_zoom = view.tile_zoom(source.max_zoom);
    let placements = view.projection.visible_tiles(tile_zoom);
    let mut keep = HashSet::with_capacity(placements.len());
    let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));

    for placement in placements {
        let key = TileKey {
            source: source_index,
            tile: placement.tile,
        };
        keep.insert(key);
        tiles.request(ctx, fetcher, source, key);

        match tiles.texture(&key) {
            Some(texture) => {
                painter.image(texture.id(), placement.screen_rect, uv, Color32::WHITE);
            }
            None => {
                painter.rect_filled(
                    placement.screen_rect.shrink(0.5),
                    0.0,
                    colors::canvas::TILE_PLACEHOLDER,
                );
            }
        }
    }

    tiles.evict(&keep);
}

fn draw_attribution(painter: &Painter, rect: Rect, text: &str) {
    if text.is_empty() {
        return;
    }
    let galley = painter.layout_no_wrap(
        text.to_string(),
        FontId::proportional(11.0),
        colors::canvas::attribution_text(),
    );
    let text_rect =
        Align2::LEFT_BOTTOM.anchor_size(rect.left_bottom() + Vec2::new(4.0, -4.0), galley.size());
    painter.rect_filled(
        text_rect.expand(3.0),
        2.0,
        colors::canvas::attribution_background(),
    );
    painter.galley(text_rect.min, galley, Color32::WHITE);
}

fn handle_canvas_interaction(response: &egui::Response, state: &mut AppState) {
    // Handle dragging for panning
    if response.dragged() {
        state.view.pan(response.drag_delta());
    }

    // Handle scroll and pinch for zooming relative to cursor position
    if response.hovered() {
        let (scroll, pinch) = response
            .ctx
            .input(|i| (i.smooth_scroll_delta.y, i.zoom_delta()));
        let factor = (scroll / SCROLL_PER_ZOOM_LEVEL).exp2() * pinch;
        if (factor - 1.0).abs() > f32::EPSILON {
            let anchor = response
                .hover_pos()
                .unwrap_or_else(|| state.view.projection.screen_rect.center());
            state.view.zoom_by(anchor, factor as f64);
        }
    }

    // Reset view on double-click
    if response.double_clicked() {
        state.view.reset();
        return;
    }

    // Select the marker under the pointer, or clear the selection
    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            state.selected = select_marker(state, pos);
        }
    }
}

fn select_marker(state: &AppState, pos: Pos2) -> Option<SelectedQuake> {
    let layers: Vec<_> = state.overlays.visible_quake_layers().collect();
    layers
        .into_iter()
        .rev()
        .find_map(|layer| hit_test_marker(layer, &state.view.projection, pos))
        .map(SelectedQuake::from)
}
