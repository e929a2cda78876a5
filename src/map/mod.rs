//! Overlay loading: the earthquake feed and the boundary documents.

mod channel;
mod load;

pub use channel::LoadChannel;
pub use load::{LoadFailure, LoadReport};
#[cfg(test)]
pub use load::{LoadError, LoadedBoundary};
