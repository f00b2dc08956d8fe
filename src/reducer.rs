//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::search;
use crate::state::{AppState, LoadPhase, ModalState, SEARCH_MIN_CHARS};

const NO_MATCH_TOAST: &str = "No results in the Sinnoh dex";

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.phase = LoadPhase::Loading;
            state.catalog = DataResource::Loading;
            state.message = None;
            state.message_ticks = 0;
            DispatchResult::changed_with(Effect::LoadCatalog)
        }

        Action::CatalogDidLoad(entries) => {
            state.catalog = DataResource::Loaded(entries);
            state.loaded.clear();
            state.offset = 0;
            state.list_selected = 0;
            state.modal = None;
            let chunk = state.next_chunk();
            if chunk.is_empty() {
                state.phase = LoadPhase::Idle;
                return DispatchResult::changed();
            }
            DispatchResult::changed_with(Effect::LoadChunk {
                generation: state.generation,
                entries: chunk,
            })
        }

        Action::CatalogDidError(error) => {
            state.catalog = DataResource::Failed(error);
            state.phase = LoadPhase::Idle;
            state.toast("Could not reach the dex service");
            DispatchResult::changed()
        }

        Action::LoadMore => {
            if state.phase.is_loading() {
                return DispatchResult::unchanged();
            }
            let chunk = state.next_chunk();
            if chunk.is_empty() {
                // Window exhausted (or no catalog yet): nothing to request.
                return DispatchResult::unchanged();
            }
            state.phase = LoadPhase::Loading;
            DispatchResult::changed_with(Effect::LoadChunk {
                generation: state.generation,
                entries: chunk,
            })
        }

        Action::ChunkDidLoad {
            generation,
            records,
        } => {
            if generation != state.generation {
                return DispatchResult::unchanged();
            }
            state.phase = LoadPhase::Idle;
            state.offset += records.len();
            state.loaded.extend(records);
            if state.fully_loaded() {
                state.toast("All 107 Sinnoh Pokemon loaded");
            }
            DispatchResult::changed()
        }

        Action::ChunkDidError { generation, .. } => {
            if generation != state.generation {
                return DispatchResult::unchanged();
            }
            // The batch only commits on full success, so loaded/offset are
            // exactly as before the failed call.
            state.phase = LoadPhase::Idle;
            state.toast("Error loading more Pokemon");
            DispatchResult::changed()
        }

        Action::ListSelect(index) => {
            if state.set_list_selected(index) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::ListMove(delta) => {
            let current = state.list_selected;
            let next = current.saturating_add_signed(delta as isize);
            if state.set_list_selected(next) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::SearchStart => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            state.search.active = false;
            DispatchResult::changed_with(Effect::SearchCancelPending)
        }

        Action::SearchQueryChange(query) => {
            state.search.query = query;
            if state.search.query.trim().chars().count() >= SEARCH_MIN_CHARS {
                DispatchResult::changed_with(Effect::SearchDebounce)
            } else {
                DispatchResult::changed_with(Effect::SearchCancelPending)
            }
        }

        Action::SearchSubmit => do_search(state),

        Action::SearchDidLoad {
            generation,
            key,
            record,
        } => {
            if generation != state.generation {
                return DispatchResult::unchanged();
            }
            state.phase = LoadPhase::Idle;
            state.cache.insert(key, record.clone());
            state.show_single(record);
            DispatchResult::changed()
        }

        Action::SearchDidError { generation, .. } => {
            if generation != state.generation {
                return DispatchResult::unchanged();
            }
            state.phase = LoadPhase::Idle;
            state.toast(NO_MATCH_TOAST);
            DispatchResult::changed()
        }

        Action::ModalOpen(id) => open_modal(state, id),

        Action::ModalClose => {
            if state.modal.take().is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::ModalNav(delta) => {
            if !state.can_navigate(delta) {
                return DispatchResult::unchanged();
            }
            let index = state
                .modal
                .as_ref()
                .map(|modal| modal.index)
                .unwrap_or_default();
            let Some(next) = index.checked_add_signed(delta as isize) else {
                return DispatchResult::unchanged();
            };
            let id = state.loaded[next].id;
            open_modal(state, id)
        }

        Action::DetailDidLoad { key, record } => {
            state.cache.insert(key.clone(), record.clone());
            match state.modal.as_mut() {
                Some(modal) if modal.key == key => {
                    modal.record = Some(record);
                    DispatchResult::changed()
                }
                _ => DispatchResult::unchanged(),
            }
        }

        Action::DetailDidError { key, .. } => match state.modal.as_ref() {
            Some(modal) if modal.key == key => {
                state.modal = None;
                state.toast("Could not load that Pokemon");
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        Action::HomeReset => {
            if state.phase.is_loading() {
                return DispatchResult::unchanged();
            }
            state.generation = state.generation.wrapping_add(1);
            state.search.query.clear();
            state.search.active = false;
            state.loaded.clear();
            state.offset = 0;
            state.list_selected = 0;
            state.modal = None;
            state.phase = LoadPhase::Loading;
            if state.catalog.is_loaded() {
                let chunk = state.next_chunk();
                DispatchResult::changed_with_many(vec![
                    Effect::SearchCancelPending,
                    Effect::LoadChunk {
                        generation: state.generation,
                        entries: chunk,
                    },
                ])
            } else {
                state.catalog = DataResource::Loading;
                DispatchResult::changed_with_many(vec![
                    Effect::SearchCancelPending,
                    Effect::LoadCatalog,
                ])
            }
        }

        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            let mut changed = state.phase.is_loading();
            if state.message_ticks > 0 {
                state.message_ticks -= 1;
                if state.message_ticks == 0 {
                    state.message = None;
                }
                changed = true;
            }
            if changed {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Shared open path: the overlay always goes through the cache accessor,
/// never through the partially-trusted list record.
fn open_modal(state: &mut AppState, id: u16) -> DispatchResult<Effect> {
    if state.phase.is_loading() {
        return DispatchResult::unchanged();
    }
    let Some(index) = state.loaded.iter().position(|record| record.id == id) else {
        return DispatchResult::unchanged();
    };
    let key = id.to_string();
    let record = state.cache.get(&key).cloned();
    let missing = record.is_none();
    state.modal = Some(ModalState {
        index,
        key: key.clone(),
        record,
    });
    if missing {
        DispatchResult::changed_with(Effect::LoadDetail { key })
    } else {
        DispatchResult::changed()
    }
}

fn do_search(state: &mut AppState) -> DispatchResult<Effect> {
    if state.phase.is_loading() {
        return DispatchResult::unchanged();
    }
    let query = state.search.query.trim().to_lowercase();
    if query.chars().count() < SEARCH_MIN_CHARS {
        return DispatchResult::unchanged();
    }
    let Some(key) = search::resolve(state.catalog_entries(), &query) else {
        state.toast(NO_MATCH_TOAST);
        return DispatchResult::changed_with(Effect::SearchCancelPending);
    };
    let cache_key = key.cache_key();
    if let Some(record) = state.cache.get(&cache_key).cloned() {
        state.show_single(record);
        return DispatchResult::changed_with(Effect::SearchCancelPending);
    }
    state.generation = state.generation.wrapping_add(1);
    state.phase = LoadPhase::Loading;
    DispatchResult::changed_with(Effect::SearchLookup {
        generation: state.generation,
        key: cache_key,
    })
}
