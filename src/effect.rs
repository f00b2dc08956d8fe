//! Effects - side effects declared by the reducer

use crate::state::CatalogEntry;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch the restricted-range list window.
    LoadCatalog,
    /// Resolve a batch of entries concurrently; holds the loading
    /// indicator for the minimum visible duration.
    LoadChunk {
        generation: u64,
        entries: Vec<CatalogEntry>,
    },
    /// Fetch a resolved search key (cache miss path).
    SearchLookup { generation: u64, key: String },
    /// Fetch the canonical record for the open overlay (cache miss path).
    LoadDetail { key: String },
    /// (Re)arm the debounced search timer.
    SearchDebounce,
    /// Drop any pending debounced search.
    SearchCancelPending,
}
