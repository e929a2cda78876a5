//! Background task spawning.
//!
//! egui's update() is synchronous, so async work is spawned and reports back
//! through channels. On WASM tasks run on the browser's event loop; on
//! native each task gets a thread driven by pollster.

use std::future::Future;

#[cfg(not(target_arch = "wasm32"))]
pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    std::thread::spawn(move || pollster::block_on(future));
}

#[cfg(target_arch = "wasm32")]
pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}
