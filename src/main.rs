#![warn(clippy::all)]

//! Quake Atlas - A web-based earthquake and tectonic plate map.
//!
//! Plots the past week of earthquakes from the USGS feed as depth-colored
//! circle markers over a tiled base map, together with toggleable plate
//! boundary layers and a depth legend.

mod config;
mod fetch;
mod geo;
mod map;
mod quake;
mod state;
mod task;
mod tiles;
mod ui;

use config::AtlasConfig;
use eframe::egui;
use fetch::HttpFetcher;
use map::LoadChannel;
use state::AppState;
use tiles::TileCache;

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Quake Atlas",
        native_options,
        Box::new(|cc| Ok(Box::new(AtlasApp::new(cc)?))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to mount the map in");
            return;
        };

        let canvas = match document
            .get_element_by_id("map")
            .map(|element| element.dyn_into::<web_sys::HtmlCanvasElement>())
        {
            Some(Ok(canvas)) => canvas,
            Some(Err(_)) => {
                report_startup_failure(&document, "The #map element is not a canvas.");
                return;
            }
            None => {
                report_startup_failure(&document, "No #map canvas found in the page.");
                return;
            }
        };

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(AtlasApp::new(cc)?))),
            )
            .await;

        match start_result {
            Ok(_) => {
                // Remove the loading text once the app has loaded:
                if let Some(loading_text) = document.get_element_by_id("loading_text") {
                    loading_text.remove();
                }
            }
            Err(e) => {
                log::error!("Failed to start eframe: {e:?}");
                report_startup_failure(
                    &document,
                    "The map failed to start. See the developer console for details.",
                );
            }
        }
    });
}

/// Logs a startup failure and shows it in place of the loading text.
#[cfg(target_arch = "wasm32")]
fn report_startup_failure(document: &web_sys::Document, message: &str) {
    log::error!("{}", message);
    let target = document
        .get_element_by_id("loading_text")
        .or_else(|| document.body().map(Into::into));
    if let Some(element) = target {
        element.set_inner_html(&format!("<p>{}</p>", message));
    }
}

/// Main application state and logic.
pub struct AtlasApp {
    /// Application state containing all sub-states
    state: AppState,

    /// Channel for the background overlay loads
    loader: LoadChannel,

    /// Texture cache for base layer tiles
    tiles: TileCache,

    /// Fetcher shared by the overlay loads and tile requests
    fetcher: HttpFetcher,

    /// Monotonic instant of last URL push (for throttling to ~1/sec).
    last_url_push: web_time::Instant,
}

impl AtlasApp {
    /// Creates a new AtlasApp and starts loading the overlays.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, fetch::FetchError> {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let config = AtlasConfig::load();
        let fetcher = HttpFetcher::new(&config.asset_root, config.request_timeout())?;
        let tiles = TileCache::new(config.tile_cache_capacity);
        let mut state = AppState::new(config);

        // Apply URL parameters (lat/lon/zoom)
        let url_params = state::url_state::parse_from_url();
        if url_params != Default::default() {
            state.view.set_view(
                url_params.lat.unwrap_or(state.view.center_lat()),
                url_params.lon.unwrap_or(state.view.center_lon()),
                url_params.zoom.unwrap_or(state.view.zoom()),
            );
        }

        let mut app = Self {
            state,
            loader: LoadChannel::new(),
            tiles,
            fetcher,
            last_url_push: web_time::Instant::now(),
        };
        app.start_load(&cc.egui_ctx);
        Ok(app)
    }

    fn start_load(&mut self, ctx: &egui::Context) {
        self.state.status_message = "Loading earthquakes and plate boundaries...".to_string();
        self.loader.start(
            ctx.clone(),
            self.fetcher.clone(),
            self.state.config.clone(),
        );
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for a completed load
        if let Some(report) = self.loader.try_recv() {
            self.state.handle_load_report(report);
        }

        // Reload requested from the top bar
        if self.state.reload_requested {
            self.state.reload_requested = false;
            if !self.loader.is_loading() {
                log::info!("Reloading overlays");
                self.state.selected = None;
                self.tiles.clear();
                self.start_load(ctx);
            }
        }

        // Push current view to URL (throttled to once per second)
        {
            let now = web_time::Instant::now();
            if now.duration_since(self.last_url_push).as_secs_f64() >= 1.0 {
                self.last_url_push = now;
                state::url_state::push_to_url(
                    self.state.view.center_lat(),
                    self.state.view.center_lon(),
                    self.state.view.zoom(),
                );
            }
        }

        // Render UI panels in the correct order for egui layout
        // Side and top/bottom panels must be rendered before CentralPanel
        let loading = self.loader.is_loading();
        ui::render_top_bar(ctx, &mut self.state, loading);
        ui::render_layer_control(ctx, &mut self.state, loading);
        ui::render_canvas(ctx, &mut self.state, &mut self.tiles, &self.fetcher);
    }
}
