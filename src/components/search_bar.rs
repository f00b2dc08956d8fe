use crossterm::event::KeyCode;
use ratatui::{layout::Rect, Frame};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::{Component, BG_PANEL};
use crate::action::Action;

/// The always-visible query input above the card list.
pub struct SearchBar {
    input: TextInput,
}

pub struct SearchBarProps<'a> {
    pub query: &'a str,
    pub is_focused: bool,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
        }
    }
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        if let EventKind::Key(key) = event {
            if key.code == KeyCode::Esc {
                return vec![Action::SearchCancel];
            }
        }

        let input_props = TextInputProps {
            value: props.query,
            placeholder: "Search name or #id (3+ chars)...",
            is_focused: true,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::all(1),
                    bg: Some(BG_PANEL),
                    fg: None,
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: Action::SearchQueryChange,
            on_submit: |_| Action::SearchSubmit,
            on_cursor_move: Some(|_| Action::Render),
        };

        self.input
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.height == 0 {
            return;
        }
        let input_props = TextInputProps {
            value: props.query,
            placeholder: "Search name or #id (3+ chars)...",
            is_focused: props.is_focused,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::all(1),
                    bg: Some(BG_PANEL),
                    fg: None,
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: Action::SearchQueryChange,
            on_submit: |_| Action::SearchSubmit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, area, input_props);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    #[test]
    fn test_escape_leaves_search() {
        let mut component = SearchBar::new();
        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
                SearchBarProps {
                    query: "luc",
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchCancel);
    }

    #[test]
    fn test_unfocused_ignores_typing() {
        let mut component = SearchBar::new();
        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
                SearchBarProps {
                    query: "",
                    is_focused: false,
                },
            )
            .into_iter()
            .collect();
        actions.assert_empty();
    }
}
