use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::{format_name, type_color, Component, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::{ModalState, PokemonDetail};

/// Display order for the stat panel.
const STAT_ORDER: [&str; 6] = [
    "hp",
    "attack",
    "defense",
    "special-attack",
    "special-defense",
    "speed",
];
const STAT_BAR_MAX: u16 = 160;

/// Detail overlay over the card list, with prev/next stepping.
pub struct DetailOverlay {
    modal: Modal,
}

pub struct DetailOverlayProps<'a> {
    pub modal: &'a ModalState,
    pub can_prev: bool,
    pub can_next: bool,
    pub is_focused: bool,
}

impl Default for DetailOverlay {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for DetailOverlay {
    type Props<'a> = DetailOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => vec![Action::ModalClose],
            KeyCode::Left => vec![Action::ModalNav(-1)],
            KeyCode::Right => vec![Action::ModalNav(1)],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 30 || area.height < 14 {
            return;
        }

        let modal_area = centered_rect(46, 16, area);
        let record = props.modal.record.as_ref();
        let can_prev = props.can_prev;
        let can_next = props.can_next;

        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(2), // Title + types
                Constraint::Min(6),    // Stats
                Constraint::Length(1), // Nav hints
            ])
            .split(content_area);

            match record {
                Some(detail) => {
                    render_title(frame, chunks[0], detail);
                    render_stats(frame, chunks[1], detail);
                }
                None => {
                    frame.render_widget(
                        Paragraph::new("Loading...").style(Style::default().fg(TEXT_DIM)),
                        chunks[0],
                    );
                }
            }

            let hint_style = |enabled: bool| {
                if enabled {
                    Style::default().fg(TEXT_MAIN)
                } else {
                    Style::default().fg(TEXT_DIM)
                }
            };
            let hints = Line::from(vec![
                Span::styled("← prev", hint_style(can_prev)),
                Span::styled("  ·  ", Style::default().fg(TEXT_DIM)),
                Span::styled("next →", hint_style(can_next)),
                Span::styled("  ·  Esc close", Style::default().fg(TEXT_DIM)),
            ]);
            frame.render_widget(Paragraph::new(hints), chunks[2]);
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(BG_PANEL),
                        padding: Padding::all(1),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::ModalClose,
                render_content: &mut render_content,
            },
        );
    }
}

fn render_title(frame: &mut Frame, area: Rect, detail: &PokemonDetail) {
    let mut title = vec![
        Span::styled(
            format_name(&detail.name),
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  #{:03}", detail.id), Style::default().fg(TEXT_DIM)),
        Span::raw("   "),
    ];
    for type_name in &detail.types {
        title.push(Span::styled(
            format!(" {} ", type_name),
            Style::default().fg(type_color(type_name)),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), area);
}

fn render_stats(frame: &mut Frame, area: Rect, detail: &PokemonDetail) {
    let bar_width = (area.width.saturating_sub(22)).max(8);
    let lines: Vec<Line<'static>> = STAT_ORDER
        .iter()
        .map(|name| stat_line(detail, name, bar_width))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn stat_line(detail: &PokemonDetail, name: &str, bar_width: u16) -> Line<'static> {
    let value = detail.stat(name);
    let filled = (u32::from(value.min(STAT_BAR_MAX)) * u32::from(bar_width)
        / u32::from(STAT_BAR_MAX)) as usize;
    let label = name.replace("special-", "sp.");
    Line::from(vec![
        Span::styled(format!("{:<11}", label), Style::default().fg(TEXT_DIM)),
        Span::styled(
            "▰".repeat(filled),
            Style::default().fg(type_color(detail.types.first().map(String::as_str).unwrap_or(""))),
        ),
        Span::styled(format!(" {:>3}", value), Style::default().fg(TEXT_MAIN)),
    ])
}
