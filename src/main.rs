//! Sinnoh dex TUI - entry point and dispatch wiring

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Modifier, Style},
    text::Span,
    widgets::Borders,
    Frame, Terminal,
};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use sinnohdex::action::Action;
use sinnohdex::api;
use sinnohdex::components::{
    Component, DetailOverlay, DetailOverlayProps, DexList, DexListProps, SearchBar, SearchBarProps,
    ACCENT, BG_BASE, TEXT_DIM, TEXT_MAIN,
};
use sinnohdex::effect::Effect;
use sinnohdex::reducer::reducer;
use sinnohdex::state::{loader_hold_ms, AppState, SEARCH_DEBOUNCE_MS, TICK_MS};

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Parser, Debug)]
#[command(name = "sinnohdex")]
#[command(about = "Sinnoh Pokedex TUI (PokeAPI ids 387-493)")]
struct Args {
    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum DexComponentId {
    List,
    Search,
    Overlay,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum DexContext {
    List,
    Search,
    Overlay,
}

impl EventRoutingState<DexComponentId, DexContext> for AppState {
    fn focused(&self) -> Option<DexComponentId> {
        if self.modal.is_some() {
            Some(DexComponentId::Overlay)
        } else if self.search.active {
            Some(DexComponentId::Search)
        } else {
            Some(DexComponentId::List)
        }
    }

    fn modal(&self) -> Option<DexComponentId> {
        if self.modal.is_some() {
            Some(DexComponentId::Overlay)
        } else if self.search.active {
            Some(DexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: DexComponentId) -> DexContext {
        match id {
            DexComponentId::List => DexContext::List,
            DexComponentId::Search => DexContext::Search,
            DexComponentId::Overlay => DexContext::Overlay,
        }
    }

    fn default_context(&self) -> DexContext {
        DexContext::List
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args { debug: debug_args } = Args::parse();

    let debug = DebugSession::new(debug_args);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct DexUi {
    list: DexList,
    search: SearchBar,
    overlay: DetailOverlay,
    status_bar: StatusBar,
}

impl DexUi {
    fn new() -> Self {
        Self {
            list: DexList::new(),
            search: SearchBar::new(),
            overlay: DetailOverlay::new(),
            status_bar: StatusBar::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: ratatui::layout::Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<DexComponentId>,
    ) {
        let base = ratatui::widgets::Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);

        let chunks = Layout::vertical([
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Card list
            Constraint::Length(3), // Status bar
        ])
        .split(area);

        event_ctx.set_component_area(DexComponentId::Search, chunks[0]);
        event_ctx.set_component_area(DexComponentId::List, chunks[1]);

        self.search.render(
            frame,
            chunks[0],
            SearchBarProps {
                query: &state.search.query,
                is_focused: state.search.active && render_ctx.is_focused(),
            },
        );

        self.list.render(
            frame,
            chunks[1],
            DexListProps {
                state,
                is_focused: state.modal.is_none() && !state.search.active,
            },
        );

        self.render_status(frame, chunks[2], state);

        if let Some(modal) = &state.modal {
            let modal_area = tui_dispatch_components::centered_rect(46, 16, area);
            event_ctx.set_component_area(DexComponentId::Overlay, modal_area);
            self.overlay.render(
                frame,
                area,
                DetailOverlayProps {
                    modal,
                    can_prev: state.can_navigate(-1),
                    can_next: state.can_navigate(1),
                    is_focused: true,
                },
            );
        } else {
            event_ctx.component_areas.remove(&DexComponentId::Overlay);
        }
    }

    fn render_status(&mut self, frame: &mut Frame, area: ratatui::layout::Rect, state: &AppState) {
        let status = state.message.clone().unwrap_or_else(|| {
            if state.phase.is_loading() {
                let frame_index = (state.tick as usize) % SPINNER_FRAMES.len();
                format!("{} Loading Pokemon...", SPINNER_FRAMES[frame_index])
            } else if state.fully_loaded() {
                "Dex complete".to_string()
            } else {
                format!("{} of {} loaded", state.offset, state.catalog_entries().len())
            }
        });
        let status_span = Span::styled(status, Style::default().fg(ACCENT));
        let status_items = [StatusBarItem::span(status_span)];

        let hints = status_hints(state);
        let style = StatusBarStyle {
            base: BaseStyle {
                border: Some(BorderStyle {
                    borders: Borders::ALL,
                    style: Style::default().fg(TEXT_DIM),
                    focused_style: None,
                }),
                padding: Padding::xy(1, 0),
                bg: None,
                fg: Some(TEXT_MAIN),
            },
            text: Style::default().fg(TEXT_DIM),
            hint_key: Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
            hint_label: Style::default().fg(TEXT_DIM),
            separator: Style::default().fg(TEXT_DIM),
        };

        let props = StatusBarProps {
            left: StatusBarSection::hints(&hints).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::items(&status_items).with_separator("  "),
            style,
            is_focused: false,
        };
        Component::<Action>::render(&mut self.status_bar, frame, area, props);
    }

    fn handle_list_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let actions: Vec<_> = self
            .list
            .handle_event(
                event,
                DexListProps {
                    state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        handler_response(actions)
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions: Vec<_> = self
            .search
            .handle_event(
                event,
                SearchBarProps {
                    query: &state.search.query,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    fn handle_overlay_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(modal) = &state.modal else {
            return HandlerResponse::ignored();
        };
        let actions: Vec<_> = self
            .overlay
            .handle_event(
                event,
                DetailOverlayProps {
                    modal,
                    can_prev: state.can_navigate(-1),
                    can_next: state.can_navigate(1),
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.modal.is_some() {
        vec![
            StatusBarHint::new("←/→", "prev/next"),
            StatusBarHint::new("Esc", "close"),
        ]
    } else if state.search.active {
        vec![
            StatusBarHint::new("Enter", "search"),
            StatusBarHint::new("Esc", "back"),
        ]
    } else {
        vec![
            StatusBarHint::new("↑/↓", "browse"),
            StatusBarHint::new("Enter", "open"),
            StatusBarHint::new("/", "search"),
            StatusBarHint::new("h", "home"),
            StatusBarHint::new("q", "quit"),
        ]
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(DexUi::new()));
    let mut bus: EventBus<AppState, Action, DexComponentId, DexContext> = EventBus::new();
    let keybindings: Keybindings<DexContext> = Keybindings::new();

    let ui_list = Rc::clone(&ui);
    bus.register(DexComponentId::List, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(DexComponentId::Search, move |event, state| {
        ui_search.borrow_mut().handle_search_event(&event.kind, state)
    });

    let ui_overlay = Rc::clone(&ui);
    bus.register(DexComponentId::Overlay, move |event, state| {
        ui_overlay
            .borrow_mut()
            .handle_overlay_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadCatalog => {
            ctx.tasks().spawn(TaskKey::new("catalog"), async {
                match api::fetch_catalog().await {
                    Ok(entries) => Action::CatalogDidLoad(entries),
                    Err(err) => Action::CatalogDidError(err.to_string()),
                }
            });
        }
        Effect::LoadChunk {
            generation,
            entries,
        } => {
            ctx.tasks().spawn(TaskKey::new("chunk"), async move {
                let started = Instant::now();
                let result = api::fetch_chunk(&entries).await;
                // Keep the loading indicator up for the minimum visible
                // duration without stretching past the cap.
                let hold = loader_hold_ms(started.elapsed().as_millis() as u64);
                if hold > 0 {
                    tokio::time::sleep(Duration::from_millis(hold)).await;
                }
                match result {
                    Ok(records) => Action::ChunkDidLoad {
                        generation,
                        records,
                    },
                    Err(err) => Action::ChunkDidError {
                        generation,
                        error: err.to_string(),
                    },
                }
            });
        }
        Effect::SearchLookup { generation, key } => {
            // An immediate submit invalidates any pending debounce.
            ctx.tasks().cancel(&TaskKey::new("search_debounce"));
            ctx.tasks().spawn(TaskKey::new("search"), async move {
                match api::fetch_detail(&key).await {
                    Ok(record) => Action::SearchDidLoad {
                        generation,
                        key,
                        record,
                    },
                    Err(err) => Action::SearchDidError {
                        generation,
                        error: err.to_string(),
                    },
                }
            });
        }
        Effect::LoadDetail { key } => {
            let task_key = format!("detail_{key}");
            ctx.tasks().spawn(TaskKey::new(task_key), async move {
                match api::fetch_detail(&key).await {
                    Ok(record) => Action::DetailDidLoad { key, record },
                    Err(err) => Action::DetailDidError {
                        key,
                        error: err.to_string(),
                    },
                }
            });
        }
        Effect::SearchDebounce => {
            ctx.tasks().debounce(
                "search_debounce",
                Duration::from_millis(SEARCH_DEBOUNCE_MS),
                async { Action::SearchSubmit },
            );
        }
        Effect::SearchCancelPending => {
            ctx.tasks().cancel(&TaskKey::new("search_debounce"));
        }
    }
}
