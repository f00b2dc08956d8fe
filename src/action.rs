//! Actions - user intents and async completions

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{CatalogEntry, PokemonDetail};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Startup: fetch the catalog window, then the first batch.
    Init,

    CatalogDidLoad(Vec<CatalogEntry>),
    CatalogDidError(String),

    /// Request the next batch of detail records.
    LoadMore,
    ChunkDidLoad {
        generation: u64,
        records: Vec<PokemonDetail>,
    },
    ChunkDidError {
        generation: u64,
        error: String,
    },

    /// Highlight a row in the card list.
    ListSelect(usize),
    /// Move the highlight by a delta (mouse wheel).
    ListMove(i16),

    /// Focus the search input.
    SearchStart,
    /// Leave the search input (query is kept).
    SearchCancel,
    SearchQueryChange(String),
    /// Resolve the current query; fired by Enter and by the debounce timer.
    SearchSubmit,
    SearchDidLoad {
        generation: u64,
        key: String,
        record: PokemonDetail,
    },
    SearchDidError {
        generation: u64,
        error: String,
    },

    /// Open the detail overlay on a loaded record.
    ModalOpen(u16),
    ModalClose,
    /// Step the overlay to a neighbouring loaded record.
    ModalNav(i16),
    DetailDidLoad {
        key: String,
        record: PokemonDetail,
    },
    DetailDidError {
        key: String,
        error: String,
    },

    /// Restore the paginated view from the top.
    HomeReset,

    /// Force a re-render (cursor movement, etc.)
    Render,
    Tick,
    Quit,
}
