use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, ScrollbarStyle, SelectList, SelectListBehavior, SelectListProps,
    SelectListStyle, SelectionStyle,
};

use super::{format_name, type_color, Component, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::{AppState, PokemonDetail};

/// The card list over the loaded set.
pub struct DexList {
    list: SelectList,
}

pub struct DexListProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Default for DexList {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
        }
    }
}

impl DexList {
    pub fn new() -> Self {
        Self::default()
    }

    fn card_lines(state: &AppState) -> Vec<Line<'static>> {
        state.loaded.iter().map(card_line).collect()
    }
}

fn card_line(record: &PokemonDetail) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("#{:03} ", record.id),
            Style::default().fg(TEXT_DIM),
        ),
        Span::styled(
            format!("{:<12}", format_name(&record.name)),
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];
    for type_name in &record.types {
        spans.push(Span::styled(
            format!(" {} ", type_name),
            Style::default().fg(type_color(type_name)),
        ));
    }
    Line::from(spans)
}

fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: None,
        },
        selection: SelectionStyle::default(),
        scrollbar: ScrollbarStyle::default(),
    }
}

/// True when the highlight sits on the last loaded row.
fn at_end(state: &AppState) -> bool {
    !state.loaded.is_empty() && state.list_selected + 1 >= state.loaded.len()
}

impl Component<Action> for DexList {
    type Props<'a> = DexListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let state = props.state;
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('/') => vec![Action::SearchStart],
                KeyCode::Char('h') => vec![Action::HomeReset],
                KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
                KeyCode::Enter => state
                    .selected_record()
                    .map(|record| Action::ModalOpen(record.id))
                    .into_iter()
                    .collect(),
                // Scrolling past the end of the loaded set requests the
                // next batch, the web page's infinite-scroll equivalent.
                KeyCode::Down | KeyCode::PageDown if at_end(state) && state.has_more() => {
                    vec![Action::LoadMore]
                }
                _ => {
                    let items = Self::card_lines(state);
                    let list_props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: state.list_selected.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::ListSelect,
                        render_item: &|item| item.clone(),
                    };
                    self.list
                        .handle_event(event, list_props)
                        .into_iter()
                        .collect()
                }
            },
            EventKind::Scroll { delta, .. } => vec![Action::ListMove((*delta * 3) as i16)],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;

        if state.loaded.is_empty() {
            let text = if let Some(error) = state.catalog.error() {
                format!("Dex unavailable: {error}")
            } else if state.phase.is_loading() {
                "Loading the Sinnoh dex...".to_string()
            } else {
                "Nothing loaded yet.".to_string()
            };
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(TEXT_DIM)),
                area,
            );
            return;
        }

        let items = Self::card_lines(state);
        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: state.list_selected.min(items.len().saturating_sub(1)),
            is_focused: props.is_focused,
            style: list_style(),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::ListSelect,
            render_item: &|item| item.clone(),
        };
        self.list.render(frame, area, list_props);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;
    use crate::state::{CatalogEntry, PokemonStat, DEX_SIZE, START_ID};

    fn state_with(count: usize) -> AppState {
        let mut state = AppState::default();
        state.catalog = tui_dispatch::DataResource::Loaded(
            (0..DEX_SIZE)
                .map(|i| CatalogEntry {
                    name: format!("mon-{}", START_ID + i as u16),
                    url: String::new(),
                })
                .collect(),
        );
        state.loaded = (0..count)
            .map(|i| PokemonDetail {
                id: START_ID + i as u16,
                name: format!("mon-{}", START_ID + i as u16),
                types: vec!["grass".to_string()],
                stats: vec![PokemonStat {
                    name: "hp".to_string(),
                    value: 55,
                }],
                sprite_front_default: None,
            })
            .collect();
        state.offset = count;
        state
    }

    #[test]
    fn test_slash_opens_search() {
        let mut component = DexList::new();
        let state = state_with(3);
        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE)),
                DexListProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchStart);
    }

    #[test]
    fn test_enter_opens_selected_card() {
        let mut component = DexList::new();
        let mut state = state_with(3);
        state.list_selected = 1;
        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
                DexListProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::ModalOpen(START_ID + 1));
    }

    #[test]
    fn test_down_at_end_requests_more() {
        let mut component = DexList::new();
        let mut state = state_with(24);
        state.list_selected = 23;
        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)),
                DexListProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::LoadMore);
    }

    #[test]
    fn test_down_at_end_of_full_window_is_quiet() {
        let mut component = DexList::new();
        let mut state = state_with(DEX_SIZE);
        state.list_selected = DEX_SIZE - 1;
        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)),
                DexListProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        assert!(!actions.contains(&Action::LoadMore));
    }

    #[test]
    fn test_unfocused_ignores_events() {
        let mut component = DexList::new();
        let state = state_with(3);
        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
                DexListProps {
                    state: &state,
                    is_focused: false,
                },
            )
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_shows_loaded_cards() {
        let mut render = RenderHarness::new(60, 20);
        let mut component = DexList::new();
        let state = state_with(3);

        let output = render.render_to_string_plain(|frame| {
            component.render(
                frame,
                frame.area(),
                DexListProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("#387"));
        assert!(output.contains("Mon 388"));
    }
}
