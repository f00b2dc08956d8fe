//! Application state - single source of truth

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

/// Fixed catalog window: the Sinnoh dex, national ids 387..=493.
pub const START_ID: u16 = 387;
pub const END_ID: u16 = 493;
pub const DEX_SIZE: usize = (END_ID - START_ID + 1) as usize;
pub const BASE_OFFSET: u16 = START_ID - 1;

/// Detail records fetched per batch.
pub const PAGE_SIZE: usize = 24;

pub const SEARCH_MIN_CHARS: usize = 3;
pub const SEARCH_DEBOUNCE_MS: u64 = 400;

/// The loading indicator stays up at least this long per batch,
/// and the artificial hold never extends past the cap.
pub const LOADER_MIN_VISIBLE_MS: u64 = 1200;
pub const LOADER_MAX_WAIT_MS: u64 = 5000;

pub const TICK_MS: u64 = 120;
/// Toast lifetime in ticks (~2s).
pub const TOAST_TICKS: u32 = 16;

/// How long to keep the loading indicator up after a batch took
/// `elapsed_ms`. Smooths flicker on fast responses without stretching the
/// total wait past `LOADER_MAX_WAIT_MS`.
pub fn loader_hold_ms(elapsed_ms: u64) -> u64 {
    LOADER_MIN_VISIBLE_MS
        .saturating_sub(elapsed_ms)
        .min(LOADER_MAX_WAIT_MS.saturating_sub(elapsed_ms))
}

/// Normalized cache key: case-insensitive string form of an id or name.
pub fn cache_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// An unresolved reference into the catalog window, from the list fetch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntry {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonStat {
    pub name: String,
    pub value: u16,
}

/// Full creature record. Types and stats keep API order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonDetail {
    pub id: u16,
    pub name: String,
    pub types: Vec<String>,
    pub stats: Vec<PokemonStat>,
    pub sprite_front_default: Option<String>,
}

impl PokemonDetail {
    pub fn stat(&self, name: &str) -> u16 {
        self.stats
            .iter()
            .find(|stat| stat.name == name)
            .map(|stat| stat.value)
            .unwrap_or(0)
    }
}

/// Mutation gate: at most one of load-more / search / reset / init in
/// flight at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
}

impl LoadPhase {
    pub fn is_loading(self) -> bool {
        matches!(self, LoadPhase::Loading)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

/// Detail overlay state. `record` is `None` while the canonical record is
/// still being fetched through the cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModalState {
    pub index: usize,
    pub key: String,
    pub record: Option<PokemonDetail>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// The restricted-range list window. Replaced wholesale on reset.
    pub catalog: DataResource<Vec<CatalogEntry>>,
    /// Detail records loaded so far, in load order.
    pub loaded: Vec<PokemonDetail>,
    /// Catalog entries consumed; start position of the next batch.
    pub offset: usize,

    pub phase: LoadPhase,
    /// Epoch tag for in-flight batch/search results; stale completions are
    /// dropped on arrival.
    pub generation: u64,

    /// Session memo of detail fetches, keyed by normalized key. Never
    /// evicts; the key universe is the fixed 107-entry window.
    pub cache: HashMap<String, PokemonDetail>,

    pub modal: Option<ModalState>,
    pub search: SearchState,

    /// Highlighted row in the card list.
    pub list_selected: usize,

    pub message: Option<String>,
    pub message_ticks: u32,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            catalog: DataResource::Empty,
            loaded: Vec::new(),
            offset: 0,
            phase: LoadPhase::Idle,
            generation: 0,
            cache: HashMap::new(),
            modal: None,
            search: SearchState::default(),
            list_selected: 0,
            message: None,
            message_ticks: 0,
            tick: 0,
        }
    }
}

impl AppState {
    pub fn catalog_entries(&self) -> &[CatalogEntry] {
        self.catalog.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// The next batch slice, clamped at the end of the window.
    pub fn next_chunk(&self) -> Vec<CatalogEntry> {
        let entries = self.catalog_entries();
        let start = self.offset.min(entries.len());
        let end = (start + PAGE_SIZE).min(entries.len());
        entries[start..end].to_vec()
    }

    pub fn has_more(&self) -> bool {
        self.offset < self.catalog_entries().len()
    }

    pub fn fully_loaded(&self) -> bool {
        let total = self.catalog_entries().len();
        total > 0 && self.offset >= total
    }

    pub fn selected_record(&self) -> Option<&PokemonDetail> {
        self.loaded.get(self.list_selected)
    }

    pub fn set_list_selected(&mut self, index: usize) -> bool {
        if self.loaded.is_empty() {
            self.list_selected = 0;
            return false;
        }
        let bounded = index.min(self.loaded.len() - 1);
        if bounded != self.list_selected {
            self.list_selected = bounded;
            return true;
        }
        false
    }

    /// Replace the loaded set with a single search hit.
    pub fn show_single(&mut self, record: PokemonDetail) {
        self.loaded = vec![record];
        self.offset = 1;
        self.list_selected = 0;
        self.modal = None;
    }

    pub fn can_navigate(&self, delta: i16) -> bool {
        let Some(modal) = &self.modal else {
            return false;
        };
        match modal.index.checked_add_signed(delta as isize) {
            Some(next) => next < self.loaded.len(),
            None => false,
        }
    }

    pub fn toast(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.message_ticks = TOAST_TICKS;
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Dex")
                .entry("catalog", ron_string(&self.catalog_entries().len()))
                .entry("loaded", ron_string(&self.loaded.len()))
                .entry("offset", ron_string(&self.offset))
                .entry("selected", ron_string(&self.list_selected)),
            DebugSection::new("Modal")
                .entry("index", ron_string(&self.modal.as_ref().map(|m| m.index)))
                .entry(
                    "key",
                    ron_string(&self.modal.as_ref().map(|m| m.key.clone())),
                ),
            DebugSection::new("Status")
                .entry("phase", ron_string(&self.phase))
                .entry("generation", ron_string(&self.generation))
                .entry("cache", ron_string(&self.cache.len()))
                .entry("query", ron_string(&self.search.query))
                .entry("search_active", ron_string(&self.search.active))
                .entry("message", ron_string(&self.message)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_hold_floor_and_cap() {
        // Fast response: pad up to the minimum visible duration.
        assert_eq!(loader_hold_ms(0), 1200);
        assert_eq!(loader_hold_ms(300), 900);
        // Past the minimum: no extra hold.
        assert_eq!(loader_hold_ms(1200), 0);
        assert_eq!(loader_hold_ms(3000), 0);
        // Past the cap: never extend the wait.
        assert_eq!(loader_hold_ms(6000), 0);
    }

    #[test]
    fn test_cache_key_normalizes() {
        assert_eq!(cache_key("  Lucario "), "lucario");
        assert_eq!(cache_key("448"), "448");
    }

    #[test]
    fn test_next_chunk_clamps_at_window_end() {
        let mut state = AppState::default();
        let entries: Vec<CatalogEntry> = (0..DEX_SIZE)
            .map(|i| CatalogEntry {
                name: format!("mon-{}", START_ID + i as u16),
                url: String::new(),
            })
            .collect();
        state.catalog = DataResource::Loaded(entries);

        state.offset = 96;
        assert_eq!(state.next_chunk().len(), 11);

        state.offset = DEX_SIZE;
        assert!(state.next_chunk().is_empty());
        assert!(state.fully_loaded());
    }
}
