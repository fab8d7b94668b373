//! ARCADE - Snake, Hunter Snake and Chaos Drop in the terminal
//!
//! Every game runs on the same fixed-tick grid engine; finished runs can be
//! posted to a shared leaderboard or kept locally.

mod chaos;
mod collision;
mod grid;
mod input;
mod leaderboard;
mod menu;
mod mode;
mod piece;
mod randomizer;
mod run;
mod score;
mod session;
mod settings;
mod snake;
mod tetromino;
mod ui;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, ModifierKeyCode, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use leaderboard::LeaderboardService;
use menu::{Menu, MenuAction, MenuItemType, MenuScreen};
use mode::ArcadeMode;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use run::{Action, RunStatus};
use session::{LeaderboardView, Session};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Application state
enum AppState {
    Menu(Menu),
    Playing(Session),
    Leaderboard(LeaderboardView),
}

/// What a key press asks the frame loop to do next
enum Transition {
    Stay,
    Menu(MenuScreen),
    Play(ArcadeMode),
    Leaderboard(ArcadeMode),
    Exit,
}

/// Leaderboard client plus the URL it was built from
struct Scores {
    service: LeaderboardService,
    api_url: String,
}

impl Scores {
    fn new(settings: &Settings) -> Self {
        let api_url = settings.leaderboard.api_url.clone();
        Self {
            service: LeaderboardService::from_api_url(&api_url),
            api_url,
        }
    }

    /// Rebuild the client if the URL was edited in the settings
    fn refresh(&mut self, settings: &Settings) -> &LeaderboardService {
        if self.api_url != settings.leaderboard.api_url {
            *self = Self::new(settings);
            tracing::info!(source = %self.service.describe(), "leaderboard source changed");
        }
        &self.service
    }
}

/// Get the arcade temp directory, creating it if needed
fn arcade_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("arcade");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();

    let log_dir = arcade_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "arcade=debug".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "ARCADE starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let mut settings = Settings::load();

    // Leaderboard requests run here
    let runtime = tokio::runtime::Runtime::new()?;
    let mut scores = Scores::new(&settings);

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut settings, &mut scores, runtime.handle());

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = settings.save() {
        eprintln!("Warning: Could not save settings: {}", e);
    }

    if result.is_ok() {
        println!("\nThanks for playing ARCADE!");
    }
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &mut Settings,
    scores: &mut Scores,
    rt: &tokio::runtime::Handle,
) -> io::Result<()> {
    let mut state = AppState::Menu(Menu::new());
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| match &state {
            AppState::Menu(menu) => ui::render_menu(frame, menu),
            AppState::Playing(session) => ui::render_session(frame, session, settings),
            AppState::Leaderboard(view) => ui::render_leaderboard(frame, view),
        })?;

        let mut transition = Transition::Stay;
        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Release => {
                    if let AppState::Playing(session) = &mut state {
                        for action in session.input.key_up(key) {
                            session.apply(action);
                        }
                    }
                }
                Event::Key(key) => {
                    transition = match &mut state {
                        AppState::Menu(menu) => handle_menu_key(menu, key, settings),
                        AppState::Playing(session) => {
                            handle_game_key(session, key, rt, scores.refresh(settings))
                        }
                        AppState::Leaderboard(view) => match key.code {
                            KeyCode::Char('r') | KeyCode::Char('R') => Transition::Leaderboard(view.mode),
                            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace | KeyCode::Enter => {
                                Transition::Menu(MenuScreen::Leaderboards)
                            }
                            _ => Transition::Stay,
                        },
                    };
                }
                Event::Mouse(mouse) => {
                    if let AppState::Menu(menu) = &mut state {
                        if menu.rebinding.is_none() {
                            let size = terminal.size()?;
                            let area = Rect::new(0, 0, size.width, size.height);
                            if let Some(action) = handle_menu_mouse(menu, mouse, area, settings) {
                                transition = menu_action(menu, action, settings);
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        match transition {
            Transition::Stay => {}
            Transition::Exit => return Ok(()),
            Transition::Menu(screen) => {
                let mut menu = Menu::new();
                menu.go_to(screen, settings);
                state = AppState::Menu(menu);
            }
            Transition::Play(mode) => {
                tracing::info!(mode = mode.name(), "starting game");
                state = AppState::Playing(Session::new(mode, settings));
            }
            Transition::Leaderboard(mode) => {
                let service = scores.refresh(settings);
                state = AppState::Leaderboard(LeaderboardView::open(
                    mode,
                    rt,
                    service,
                    settings.leaderboard.fetch_limit,
                ));
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame);
        last_frame = now;

        match &mut state {
            AppState::Playing(session) => {
                session.update(dt);
                if session.poll(settings) {
                    if let Err(e) = settings.save() {
                        tracing::warn!("could not save settings: {}", e);
                    }
                }
            }
            AppState::Leaderboard(view) => view.poll(),
            AppState::Menu(_) => {}
        }
    }
}

/// Keys on a menu screen
fn handle_menu_key(menu: &mut Menu, key: KeyEvent, settings: &mut Settings) -> Transition {
    if menu.rebinding.is_some() {
        match key.code {
            KeyCode::Esc => menu.cancel_rebind(),
            KeyCode::Enter => menu.finish_rebind(),
            // Modifiers on their own are not bindable
            KeyCode::Modifier(_) => {}
            code => {
                let key_str = key_to_string(code);
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    menu.add_key(key_str, settings);
                } else {
                    menu.set_key(key_str, settings);
                }
            }
        }
        return Transition::Stay;
    }

    if menu.on_text_input() {
        match key.code {
            KeyCode::Char(c) => {
                menu.text_input_char(c, settings);
                return Transition::Stay;
            }
            KeyCode::Backspace => {
                menu.text_input_backspace(settings);
                return Transition::Stay;
            }
            KeyCode::Up | KeyCode::Down | KeyCode::Enter | KeyCode::Esc => {}
            _ => return Transition::Stay,
        }
    }

    match key.code {
        KeyCode::Up => menu.move_up(),
        KeyCode::Down => menu.move_down(),
        KeyCode::Left => menu.adjust_left(settings),
        KeyCode::Right => menu.adjust_right(settings),
        KeyCode::Enter => {
            let on_key_bind = menu
                .items
                .get(menu.selected)
                .is_some_and(|item| matches!(item.item_type, MenuItemType::KeyBind { .. }));
            if on_key_bind {
                menu.start_rebind();
            } else if let Some(action) = menu.select().cloned() {
                return menu_action(menu, action, settings);
            }
        }
        KeyCode::Delete => menu.clear_keys(settings),
        KeyCode::Char('q') | KeyCode::Esc => {
            if menu.screen == MenuScreen::Main {
                return Transition::Exit;
            }
            menu.go_back(settings);
        }
        _ => {}
    }
    Transition::Stay
}

/// Carry out a menu button
fn menu_action(menu: &mut Menu, action: MenuAction, settings: &mut Settings) -> Transition {
    match action {
        MenuAction::StartGame(mode) => return Transition::Play(mode),
        MenuAction::ShowLeaderboard(mode) => return Transition::Leaderboard(mode),
        MenuAction::GoToScreen(screen) => menu.go_to(screen, settings),
        MenuAction::Back => menu.go_back(settings),
        MenuAction::Quit => return Transition::Exit,
        MenuAction::SaveSettings => match settings.save() {
            Ok(()) => tracing::info!("settings saved"),
            Err(e) => tracing::warn!("could not save settings: {}", e),
        },
    }
    Transition::Stay
}

/// Keys while a game screen is up
fn handle_game_key(
    session: &mut Session,
    key: KeyEvent,
    rt: &tokio::runtime::Handle,
    service: &LeaderboardService,
) -> Transition {
    let over = session.game.as_game().status() == RunStatus::Over;
    if over && session.dialog.is_some() {
        match key.code {
            KeyCode::Esc => return Transition::Menu(MenuScreen::Main),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Transition::Menu(MenuScreen::Main);
            }
            KeyCode::Tab => session.restart(),
            KeyCode::Enter => session.submit(rt, service),
            KeyCode::Backspace => {
                if let Some(dialog) = session.dialog.as_mut() {
                    dialog.backspace();
                }
            }
            KeyCode::Char(c) => {
                if let Some(dialog) = session.dialog.as_mut() {
                    dialog.push_char(c);
                }
            }
            _ => {}
        }
        return Transition::Stay;
    }

    for action in session.input.key_down(key) {
        if action == Action::Quit {
            return Transition::Menu(MenuScreen::Main);
        }
        session.apply(action);
    }
    Transition::Stay
}

/// Handle mouse events in the menu
fn handle_menu_mouse(
    menu: &mut Menu,
    mouse: MouseEvent,
    area: Rect,
    settings: &mut Settings,
) -> Option<MenuAction> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            menu.selected = ui::menu_item_at(menu, area, mouse.column, mouse.row)?;
            match &menu.items[menu.selected].item_type {
                MenuItemType::Button(action) => return Some(action.clone()),
                MenuItemType::Toggle { .. } | MenuItemType::Cycle { .. } | MenuItemType::Number { .. } => {
                    menu.adjust_right(settings)
                }
                MenuItemType::KeyBind { .. } => menu.start_rebind(),
                MenuItemType::TextInput { .. } => {}
            }
            None
        }
        MouseEventKind::Moved => {
            if let Some(index) = ui::menu_item_at(menu, area, mouse.column, mouse.row) {
                menu.selected = index;
            }
            None
        }
        MouseEventKind::ScrollUp => {
            menu.move_up();
            None
        }
        MouseEventKind::ScrollDown => {
            menu.move_down();
            None
        }
        _ => None,
    }
}

/// Convert a KeyCode to a string for settings storage
fn key_to_string(code: KeyCode) -> String {
    match code {
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => "Shift".to_string(),
        _ => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_parse_back() {
        // Every name written into settings must be readable by the input layer
        let mut settings = Settings::default();
        settings.keys.left = vec![key_to_string(KeyCode::Char(' ')), key_to_string(KeyCode::Left)];
        let mut handler = input::InputHandler::from_settings(&settings);
        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        let left = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(handler.key_down(space), vec![Action::Left]);
        assert_eq!(handler.key_down(left), vec![Action::Left]);
    }

    #[test]
    fn test_quit_key_leaves_the_game() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let service = LeaderboardService::local(leaderboard::LocalLeaderboard::in_memory());
        let mut session = Session::new(mode::ArcadeMode::ChaosDrop, &Settings::default());
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        let transition = handle_game_key(&mut session, esc, runtime.handle(), &service);
        assert!(matches!(transition, Transition::Menu(MenuScreen::Main)));
    }

    #[test]
    fn test_menu_escape_on_main_exits() {
        let mut settings = Settings::default();
        let mut menu = Menu::new();
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(handle_menu_key(&mut menu, esc, &mut settings), Transition::Exit));
    }
}
