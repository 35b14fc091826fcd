//! AlgoScope State Store
//!
//! Per-visualizer presentation state and the rules that change it.
//!
//! # Architecture
//!
//! - **Visualizers**: [`SortVisualizerState`], [`SearchVisualizerState`] and
//!   [`ArrayVisualizerState`] are built by factory functions from a
//!   [`StoreConfig`]; there is no shared mutable state between instances.
//!   Each implements [`Visualizer`], the interface a session runtime drives.
//! - **Catalog**: [`VisualizerKind`] maps menu labels to a static
//!   [`CATALOG`] of entries with titles, storage keys and factories.
//! - **Alerts**: [`AlertBoard`] keeps the latest operation message for a
//!   fixed time or until dismissed.
//! - **Persistence**: whitelisted snapshots go through [`save`] / [`load`]
//!   into any [`KeyValueStore`] ([`MemoryStore`], [`FileStore`]). Hydrating
//!   regenerates traces and clamps stale cursors.

mod alert;
mod array;
mod catalog;
mod config;
mod error;
mod persist;
mod search;
mod sort;
mod visualizer;

pub use alert::{Alert, AlertBoard, AlertConfig};
pub use array::{ArrayCommand, ArrayTimer, ArrayView, ArrayVisualizerState};
pub use catalog::{AnyVisualizer, CatalogEntry, Model, VisualizerKind, CATALOG};
pub use config::{SizeRange, StoreConfig, TraceConfig};
pub use error::{Error, Result};
pub use persist::{load, save, FileStore, KeyValueStore, MemoryStore};
pub use search::{SearchPersisted, SearchView, SearchVisualizerState};
pub use sort::{SortPersisted, SortView, SortVisualizerState};
pub use visualizer::{TraceCommand, Visualizer};

/// Persist `visualizer` under its storage key.
pub fn persist<V: Visualizer>(store: &dyn KeyValueStore, visualizer: &V) -> Result<()> {
    save(store, visualizer.storage_key(), &visualizer.snapshot())
}

/// Hydrate `visualizer` from its storage key. Returns whether anything was
/// found.
pub fn restore<V: Visualizer>(store: &dyn KeyValueStore, visualizer: &mut V) -> Result<bool> {
    match load::<V::Persisted>(store, visualizer.storage_key())? {
        Some(persisted) => {
            visualizer.hydrate(persisted);
            Ok(true)
        }
        None => Ok(false),
    }
}
