//! Background load pipeline for the overlays.
//!
//! Uses channel-based communication to bridge the async loads with egui's
//! synchronous update loop.

use super::load::{load_all, LoadReport};
use crate::config::AtlasConfig;
use crate::fetch::HttpFetcher;
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Channel-based loader for the earthquake feed and boundary documents.
///
/// Loads are async but egui's update() is synchronous. This struct passes
/// the joined result from the background task back to the UI thread.
pub struct LoadChannel {
    sender: Sender<LoadReport>,
    receiver: Receiver<LoadReport>,
    /// Loads started but not yet received
    in_flight: usize,
}

impl Default for LoadChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Returns true while a load has been started and not yet received.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Spawns both loads; the joined report arrives through [`try_recv`].
    ///
    /// [`try_recv`]: LoadChannel::try_recv
    pub fn start(&mut self, ctx: egui::Context, fetcher: HttpFetcher, config: AtlasConfig) {
        let sender = self.sender.clone();
        self.in_flight += 1;

        log::info!(
            "Loading earthquake feed and {} boundary document(s)",
            config.boundaries.len()
        );

        crate::task::spawn(async move {
            let report = load_all(&fetcher, &config).await;
            let _ = sender.send(report);
            ctx.request_repaint();
        });
    }

    /// Non-blocking check for a completed load.
    ///
    /// Returns Some(report) once both loads have settled, None otherwise.
    pub fn try_recv(&mut self) -> Option<LoadReport> {
        let report = self.receiver.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(report)
    }
}
