//! Texture cache for base layer tiles.
//!
//! Tiles are downloaded in the background and decoded off the UI thread;
//! the UI uploads finished images as egui textures when it polls.

use super::TileSource;
use crate::fetch::{Fetch, FetchError, HttpFetcher};
use crate::geo::TileCoord;
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Errors that can occur while loading a tile.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TileError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Failed to decode tile: {0}")]
    Decode(String),
}

/// Identifies a tile of a specific base layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    /// Index of the base layer in the configuration
    pub source: usize,
    pub tile: TileCoord,
}

enum TileSlot {
    Pending,
    Ready(TextureHandle),
    Failed,
}

type TileResult = (TileKey, Result<ColorImage, TileError>);

/// Decodes PNG/JPEG tile bytes into an egui image.
pub fn decode_tile(bytes: &[u8]) -> Result<ColorImage, TileError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| TileError::Decode(e.to_string()))?
        .to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

/// Cache of tile textures keyed by base layer and tile address.
pub struct TileCache {
    slots: HashMap<TileKey, TileSlot>,
    sender: Sender<TileResult>,
    receiver: Receiver<TileResult>,
    capacity: usize,
}

impl TileCache {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = channel();
        Self {
            slots: HashMap::new(),
            sender,
            receiver,
            capacity: capacity.max(1),
        }
    }

    /// Texture for a tile if it has finished loading.
    pub fn texture(&self, key: &TileKey) -> Option<&TextureHandle> {
        match self.slots.get(key) {
            Some(TileSlot::Ready(texture)) => Some(texture),
            _ => None,
        }
    }

    /// Starts downloading a tile unless it is already known.
    ///
    /// Failed tiles are remembered and not retried until [`TileCache::clear`].
    pub fn request(
        &mut self,
        ctx: &egui::Context,
        fetcher: &HttpFetcher,
        source: &TileSource,
        key: TileKey,
    ) {
        if self.slots.contains_key(&key) {
            return;
        }
        self.slots.insert(key, TileSlot::Pending);

        let url = source.tile_url(key.tile);
        let sender = self.sender.clone();
        let fetcher = fetcher.clone();
        let ctx = ctx.clone();

        crate::task::spawn(async move {
            let result = match fetcher.fetch_bytes(&url).await {
                Ok(bytes) => decode_tile(&bytes),
                Err(e) => Err(TileError::from(e)),
            };
            let _ = sender.send((key, result));
            ctx.request_repaint();
        });
    }

    /// Uploads finished tiles as textures. Returns how many arrived.
    pub fn poll(&mut self, ctx: &egui::Context) -> usize {
        let mut arrived = 0;
        while let Ok((key, result)) = self.receiver.try_recv() {
            arrived += 1;
            let slot = match result {
                Ok(image) => {
                    let name = format!(
                        "tile-{}-{}-{}-{}",
                        key.source, key.tile.z, key.tile.x, key.tile.y
                    );
                    TileSlot::Ready(ctx.load_texture(name, image, TextureOptions::LINEAR))
                }
                Err(e) => {
                    log::debug!("Tile {:?} unavailable: {}", key, e);
                    TileSlot::Failed
                }
            };
            self.slots.insert(key, slot);
        }
        arrived
    }

    /// Drops settled tiles outside `keep` once the cache is over capacity.
    pub fn evict(&mut self, keep: &HashSet<TileKey>) {
        if self.slots.len() <= self.capacity {
            return;
        }
        let before = self.slots.len();
        self.slots
            .retain(|key, slot| matches!(slot, TileSlot::Pending) || keep.contains(key));
        log::debug!("Evicted {} tile(s)", before - self.slots.len());
    }

    /// Forgets every tile, including failures.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
impl TileCache {
    /// Number of tiles tracked (pending, ready or failed).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
