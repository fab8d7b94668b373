//! Terminal UI rendering with ratatui

use crate::chaos::ChaosGame;
use crate::grid::{Cell, Grid};
use crate::leaderboard::LeaderboardEntry;
use crate::menu::{Menu, MenuItem, MenuItemType, MenuScreen};
use crate::run::{ArcadeGame, RunExtras, RunStatus, format_time};
use crate::session::{ActiveGame, BoardState, GameOverDialog, LeaderboardView, Session, SubmitState};
use crate::settings::Settings;
use crate::snake::{Direction as Heading, SnakeGame, SnakeTile, SnakeVariant};
use crate::tetromino::PieceKind;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell as TableCell, Clear, Paragraph, Row, Table},
};

const EMPTY: &str = "  ";

/// Sidebar next to the board
const SIDEBAR_WIDTH: u16 = 20;
/// Rows below the board for the controls line
const FOOTER_HEIGHT: u16 = 1;

/// Render the main menu
pub fn render_menu(frame: &mut Frame, menu: &Menu) {
    let (menu_width, menu_height) = menu_size(menu.screen);
    let menu_area = center_rect(frame.area(), menu_width, menu_height);

    let show_big_title = menu.screen == MenuScreen::Main;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(title_height(menu.screen)), Constraint::Min(8)])
        .split(menu_area);

    if show_big_title {
        let title_lines = vec![
            Line::styled(" █████╗ ██████╗  ██████╗ █████╗ ██████╗ ███████╗", Style::default().fg(Color::Green)),
            Line::styled("██╔══██╗██╔══██╗██╔════╝██╔══██╗██╔══██╗██╔════╝", Style::default().fg(Color::Green)),
            Line::styled("███████║██████╔╝██║     ███████║██║  ██║█████╗  ", Style::default().fg(Color::Green)),
            Line::styled("██╔══██║██╔══██╗██║     ██╔══██║██║  ██║██╔══╝  ", Style::default().fg(Color::Green)),
            Line::styled("██║  ██║██║  ██║╚██████╗██║  ██║██████╔╝███████╗", Style::default().fg(Color::Green)),
            Line::styled("╚═╝  ╚═╝╚═╝  ╚═╝ ╚═════╝╚═╝  ╚═╝╚═════╝ ╚══════╝", Style::default().fg(Color::Green)),
        ];
        frame.render_widget(Paragraph::new(title_lines).alignment(Alignment::Center), layout[0]);
    } else {
        let screen_title = match menu.screen {
            MenuScreen::ModeSelect => "CHOOSE A GAME",
            MenuScreen::Leaderboards => "LEADERBOARDS",
            MenuScreen::Settings => "SETTINGS",
            MenuScreen::SettingsKeys => "KEY BINDINGS",
            MenuScreen::SettingsVisual => "VISUAL SETTINGS",
            MenuScreen::SettingsGameplay => "GAMEPLAY SETTINGS",
            MenuScreen::SettingsLeaderboard => "LEADERBOARD SETTINGS",
            MenuScreen::Main => "ARCADE",
        };
        let title_lines = vec![
            Line::raw(""),
            Line::styled(screen_title, Style::default().fg(Color::Green).bold()),
        ];
        frame.render_widget(Paragraph::new(title_lines).alignment(Alignment::Center), layout[0]);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);

    let mut lines = vec![Line::raw("")];
    for (i, item) in menu.items.iter().enumerate() {
        lines.push(render_menu_item(item, i == menu.selected, menu.rebinding == Some(i)));
        for _ in 1..row_stride(menu.screen) {
            lines.push(Line::raw(""));
        }
    }

    // Mode blurb under the game list
    if let Some(MenuItemType::Button(crate::menu::MenuAction::StartGame(mode))) =
        menu.items.get(menu.selected).map(|item| &item.item_type)
    {
        lines.push(Line::styled(mode.description(), Style::default().fg(Color::Cyan)));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(controls_hint(menu), Style::default().fg(Color::DarkGray)));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn menu_size(screen: MenuScreen) -> (u16, u16) {
    match screen {
        MenuScreen::Main => (52, 20),
        MenuScreen::ModeSelect => (52, 18),
        MenuScreen::Leaderboards | MenuScreen::SettingsVisual => (48, 16),
        MenuScreen::Settings => (48, 21),
        MenuScreen::SettingsKeys => (54, 18),
        MenuScreen::SettingsGameplay => (54, 22),
        MenuScreen::SettingsLeaderboard => (64, 16),
    }
}

fn title_height(screen: MenuScreen) -> u16 {
    if screen == MenuScreen::Main { 6 } else { 3 }
}

/// Rows each item takes, the key list is packed tight
fn row_stride(screen: MenuScreen) -> u16 {
    if screen == MenuScreen::SettingsKeys { 1 } else { 2 }
}

/// Index of the menu item drawn at a terminal cell, for mouse input
pub fn menu_item_at(menu: &Menu, area: Rect, column: u16, row: u16) -> Option<usize> {
    let (menu_width, menu_height) = menu_size(menu.screen);
    let menu_area = center_rect(area, menu_width, menu_height);
    // Border plus the blank line above the first item
    let first_row = menu_area.y + title_height(menu.screen) + 2;
    let left = menu_area.x + 1;
    let right = menu_area.x + menu_area.width.saturating_sub(1);

    if column < left || column >= right || row < first_row {
        return None;
    }
    let offset = row - first_row;
    let stride = row_stride(menu.screen);
    if offset % stride != 0 {
        return None;
    }
    let index = (offset / stride) as usize;
    (index < menu.items.len()).then_some(index)
}

/// Render a single menu item based on its type
fn render_menu_item(item: &MenuItem, is_selected: bool, is_rebinding: bool) -> Line<'static> {
    let prefix = if is_selected { "▶ " } else { "  " };
    let base_style = if is_selected {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::White)
    };
    let label = Span::styled(format!("{}{}: ", prefix, item.label), base_style);

    match &item.item_type {
        MenuItemType::Button(_) => Line::styled(format!("{}{}", prefix, item.label), base_style),
        MenuItemType::Toggle { value, .. } => {
            let (text, color) = if *value { ("ON", Color::Green) } else { ("OFF", Color::Red) };
            Line::from(vec![
                label,
                Span::styled(format!("< {} >", text), Style::default().fg(color).bold()),
            ])
        }
        MenuItemType::Cycle { options, current, .. } => {
            let text = options.get(*current).cloned().unwrap_or_default();
            Line::from(vec![
                label,
                Span::styled(format!("< {} >", text), Style::default().fg(Color::Cyan)),
            ])
        }
        MenuItemType::Number { value, .. } => Line::from(vec![
            label,
            Span::styled(format!("< {} >", value), Style::default().fg(Color::Cyan)),
        ]),
        MenuItemType::KeyBind { keys, .. } => {
            if is_rebinding {
                Line::from(vec![
                    label,
                    Span::styled("Press a key...", Style::default().fg(Color::Yellow).bold()),
                ])
            } else {
                let keys_str = if keys.is_empty() { "None".to_string() } else { keys.join(", ") };
                Line::from(vec![
                    label,
                    Span::styled(format!("[{}]", keys_str), Style::default().fg(Color::Magenta)),
                ])
            }
        }
        MenuItemType::TextInput { value, placeholder, .. } => {
            let shown = if value.is_empty() {
                Span::styled(placeholder.clone(), Style::default().fg(Color::DarkGray))
            } else {
                Span::styled(value.clone(), Style::default().fg(Color::Green))
            };
            let cursor = if is_selected { "_" } else { "" };
            Line::from(vec![label, shown, Span::styled(cursor, Style::default().fg(Color::Yellow))])
        }
    }
}

/// Controls hint for the selected item
fn controls_hint(menu: &Menu) -> &'static str {
    if menu.rebinding.is_some() {
        return "Key=Set | Shift+Key=Add more | Enter=Done | Esc=Cancel";
    }
    match menu.items.get(menu.selected).map(|item| &item.item_type) {
        Some(MenuItemType::Toggle { .. } | MenuItemType::Cycle { .. } | MenuItemType::Number { .. }) => {
            "↑↓ Select  ←→ Adjust  Esc Back"
        }
        Some(MenuItemType::KeyBind { .. }) => "↑↓ Select  Enter Rebind  Del Clear  Esc Back",
        Some(MenuItemType::TextInput { .. }) => "Type to enter  Backspace to delete  Esc Back",
        _ => "↑↓ Select  Enter Confirm  Esc Back",
    }
}

/// Render a game screen: board, sidebar, overlays
pub fn render_session(frame: &mut Frame, session: &Session, settings: &Settings) {
    let area = frame.area();

    let (board_width, board_height) = match &session.game {
        ActiveGame::Snake(game) => (game.config().width, game.config().height),
        ActiveGame::Chaos(game) => (game.config().width, game.config().height),
    };
    let board_cols = board_width as u16 * 2 + 2;
    let board_rows = board_height as u16 + 2;

    let game_area = center_rect(area, board_cols + SIDEBAR_WIDTH, board_rows + FOOTER_HEIGHT);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(board_rows), Constraint::Length(FOOTER_HEIGHT)])
        .split(game_area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_cols), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vertical[0]);

    let title = format!(" {} ", session.mode.name());
    match &session.game {
        ActiveGame::Snake(game) => {
            render_snake_board(frame, columns[0], &title, game, settings);
            render_snake_stats(frame, columns[1], game);
        }
        ActiveGame::Chaos(game) => {
            render_chaos_board(frame, columns[0], &title, game, settings);
            render_chaos_sidebar(frame, columns[1], game, settings);
        }
    }

    let controls = Paragraph::new(Line::styled(session.mode.controls(), Style::default().fg(Color::DarkGray)))
        .alignment(Alignment::Center);
    frame.render_widget(controls, vertical[1]);

    let game = session.game.as_game();
    match game.status() {
        RunStatus::Idle => render_overlay(frame, area, "READY", "Press any key"),
        RunStatus::Running => {}
        RunStatus::Over => {
            if let Some(dialog) = &session.dialog {
                render_game_over(frame, area, dialog);
            }
        }
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn board_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
}

fn render_snake_board(frame: &mut Frame, area: Rect, title: &str, game: &SnakeGame, settings: &Settings) {
    let (block_char, _) = settings.visual.block_chars();
    let block = board_block(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let food_color = match game.variant() {
        SnakeVariant::Classic => Color::Red,
        SnakeVariant::Hunter => Color::Magenta,
    };

    let lines: Vec<Line> = game
        .tiles()
        .rows()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => Span::raw(EMPTY),
                    Cell::Filled(SnakeTile::Head) => Span::styled(block_char, Style::default().fg(Color::LightGreen).bold()),
                    Cell::Filled(SnakeTile::Body) => Span::styled(block_char, Style::default().fg(Color::Green)),
                    Cell::Filled(SnakeTile::Food) => Span::styled("<>", Style::default().fg(food_color).bold()),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn heading_arrow(heading: Heading) -> &'static str {
    match heading {
        Heading::Up => "^",
        Heading::Down => "v",
        Heading::Left => "<",
        Heading::Right => ">",
    }
}

/// Steps between the food and the snake's head
fn hunter_distance(game: &SnakeGame) -> Option<i32> {
    let food = game.food()?;
    let head = game.segments().front()?;
    Some((food.x - head.x).abs() + (food.y - head.y).abs())
}

/// Label followed by its value, with a blank line after
fn stat(lines: &mut Vec<Line<'static>>, label: &'static str, value: String, color: Color) {
    lines.push(Line::styled(label, Style::default().fg(Color::Gray)));
    lines.push(Line::styled(value, Style::default().fg(color).bold()));
    lines.push(Line::raw(""));
}

fn render_snake_stats(frame: &mut Frame, area: Rect, game: &SnakeGame) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    stat(&mut lines, "LENGTH", game.len().to_string(), Color::Yellow);
    stat(&mut lines, "BEST", game.best_length().to_string(), Color::Cyan);
    stat(&mut lines, "TIME", format_time(game.elapsed_secs()), Color::White);
    match game.variant() {
        SnakeVariant::Classic => {
            stat(&mut lines, "EATEN", game.foods_eaten().to_string(), Color::Green);
        }
        SnakeVariant::Hunter => {
            stat(&mut lines, "CATCHES", game.catches().to_string(), Color::Red);
            stat(
                &mut lines,
                "HUNTER",
                format!("{} ms", game.food_delay().as_millis()),
                Color::Magenta,
            );
            if let Some(distance) = hunter_distance(game) {
                stat(&mut lines, "DISTANCE", distance.to_string(), Color::LightMagenta);
            }
        }
    }
    stat(&mut lines, "HEADING", heading_arrow(game.heading()).to_string(), Color::LightGreen);

    frame.render_widget(Paragraph::new(lines), inner);
}

/// What sits on top of the settled board in a chaos cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlay {
    Ghost(PieceKind),
    Falling(PieceKind),
}

/// Ghost and falling piece laid over an empty grid the size of the board
fn chaos_overlay(game: &ChaosGame, show_ghost: bool) -> Grid<Overlay> {
    let board = game.board();
    let mut overlay = Grid::new(board.width(), board.height());
    if show_ghost {
        if let Some(ghost) = game.ghost() {
            overlay = overlay.merged(ghost.block_positions(), Overlay::Ghost(ghost.kind));
        }
    }
    if let Some(piece) = game.current() {
        overlay = overlay.merged(piece.block_positions(), Overlay::Falling(piece.kind));
    }
    overlay
}

fn render_chaos_board(frame: &mut Frame, area: Rect, title: &str, game: &ChaosGame, settings: &Settings) {
    let (block_char, ghost_char) = settings.visual.block_chars();
    let block = board_block(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let overlay = chaos_overlay(game, settings.visual.show_ghost);
    let lines: Vec<Line> = game
        .board()
        .rows()
        .zip(overlay.rows())
        .map(|(row, over)| {
            let spans: Vec<Span> = row
                .iter()
                .zip(over)
                .map(|(cell, over)| match (cell, over) {
                    (Cell::Filled(kind), _) | (Cell::Empty, Cell::Filled(Overlay::Falling(kind))) => {
                        Span::styled(block_char, Style::default().fg(kind.color()))
                    }
                    (Cell::Empty, Cell::Filled(Overlay::Ghost(kind))) => {
                        Span::styled(ghost_char, Style::default().fg(kind.color()).dim())
                    }
                    (Cell::Empty, Cell::Empty) => Span::raw(EMPTY),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_chaos_sidebar(frame: &mut Frame, area: Rect, game: &ChaosGame, settings: &Settings) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(6)])
        .split(area);

    let (block_char, _) = settings.visual.block_chars();
    let next_block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let next_inner = next_block.inner(layout[0]);
    frame.render_widget(next_block, layout[0]);
    render_mini_piece(frame, next_inner, game.next_piece().kind, block_char);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);

    let score = game.chaos_score();
    let mut lines = Vec::new();
    stat(&mut lines, "SCORE", game.score().to_string(), Color::Yellow);
    stat(&mut lines, "TIME", format_time(game.elapsed_secs()), Color::White);
    stat(&mut lines, "PLACED", score.placements.to_string(), Color::Cyan);
    stat(&mut lines, "HOLES", game.analysis().holes.to_string(), Color::Magenta);
    stat(&mut lines, "CLEARS", score.lines_cleared.to_string(), Color::Red);

    // Chaos meter for the last lock
    if let Some(outcome) = game.last_lock() {
        let color = if outcome.delta < 0 { Color::Red } else { Color::Green };
        lines.push(Line::styled(
            format!("CHAOS {} ({:+})", outcome.chaos_score, outcome.delta),
            Style::default().fg(color).bold(),
        ));
        if outcome.cleared_rows > 0 {
            lines.push(Line::styled(
                format!("{} CLEARED!", outcome.cleared_rows),
                Style::default().fg(Color::Red),
            ));
        }
    }
    if game.is_soft_dropping() {
        lines.push(Line::styled("SOFT DROP", Style::default().fg(Color::DarkGray)));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render a small piece preview
fn render_mini_piece(frame: &mut Frame, area: Rect, kind: PieceKind, block_char: &str) {
    if area.height < 1 || area.width < 4 {
        return;
    }

    let shape = kind.shape(0);
    let lines: Vec<Line> = (0..2)
        .map(|y| {
            let spans: Vec<Span> = (0..4)
                .map(|x| {
                    if shape.iter().any(|b| b.x == x && b.y == y) {
                        Span::styled(block_char.to_string(), Style::default().fg(kind.color()))
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// Render an overlay (for the idle screen)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_area = center_rect(area, 24, 5);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle.to_string(), Style::default().fg(Color::Gray)),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

/// Final stats and the score submission form
fn render_game_over(frame: &mut Frame, area: Rect, dialog: &GameOverDialog) {
    let popup_area = center_rect(area, 44, 15);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" GAME OVER ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let snapshot = &dialog.snapshot;
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Score ", Style::default().fg(Color::Gray)),
            Span::styled(snapshot.score.to_string(), Style::default().fg(Color::Yellow).bold()),
            Span::styled("   Time ", Style::default().fg(Color::Gray)),
            Span::styled(format_time(snapshot.elapsed_secs), Style::default().fg(Color::White)),
        ]),
    ];
    let extras = match &snapshot.extras {
        RunExtras::Snake {
            best_length,
            foods_eaten,
            catches,
        } => format!("Best {}  Eaten {}  Caught {}", best_length, foods_eaten, catches),
        RunExtras::Chaos {
            placements,
            holes,
            lines_cleared,
        } => format!("Placed {}  Holes {}  Clears {}", placements, holes, lines_cleared),
    };
    lines.push(Line::styled(extras, Style::default().fg(Color::Cyan)));
    lines.push(Line::raw(""));

    let cursor = if dialog.accepts_text() { "_" } else { "" };
    lines.push(Line::from(vec![
        Span::styled("Name: ", Style::default().fg(Color::Gray)),
        Span::styled(dialog.alias.clone(), Style::default().fg(Color::Green)),
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ]));
    lines.push(Line::raw(""));

    let (status, hint) = match &dialog.state {
        SubmitState::Editing => (
            Line::styled("Submit to the leaderboard?", Style::default().fg(Color::White)),
            "Enter submit  Tab play again  Esc menu",
        ),
        SubmitState::Pending(_) => (
            Line::styled("Submitting...", Style::default().fg(Color::Yellow)),
            "Tab play again  Esc menu",
        ),
        SubmitState::Done(response) => (
            Line::styled(response.message.clone(), Style::default().fg(Color::Green).bold()),
            "Tab play again  Esc menu",
        ),
        SubmitState::Failed(message) => (
            Line::styled(message.clone(), Style::default().fg(Color::Red).bold()),
            "Enter retry  Tab play again  Esc menu",
        ),
    };
    lines.push(status);
    lines.push(Line::raw(""));
    lines.push(Line::styled(hint, Style::default().fg(Color::DarkGray)));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Render the leaderboard screen for one game
pub fn render_leaderboard(frame: &mut Frame, view: &LeaderboardView) {
    let area = center_rect(frame.area(), 64, 34);

    let block = Block::default()
        .title(format!(" {} LEADERBOARD ", view.mode.slug().to_uppercase()))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let source = Paragraph::new(Line::styled(
        format!("Source: {}", view.source),
        Style::default().fg(Color::DarkGray),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(source, layout[0]);

    match &view.state {
        BoardState::Loading(_) => {
            frame.render_widget(
                Paragraph::new(Line::styled("Loading...", Style::default().fg(Color::Yellow)))
                    .alignment(Alignment::Center),
                layout[1],
            );
        }
        BoardState::Failed(message) => {
            frame.render_widget(
                Paragraph::new(Line::styled(message.clone(), Style::default().fg(Color::Red)))
                    .alignment(Alignment::Center),
                layout[1],
            );
        }
        BoardState::Ready(rows) if rows.is_empty() => {
            frame.render_widget(
                Paragraph::new(Line::styled("No scores yet", Style::default().fg(Color::Gray)))
                    .alignment(Alignment::Center),
                layout[1],
            );
        }
        BoardState::Ready(rows) => frame.render_widget(entries_table(rows), layout[1]),
    }

    let hint = Paragraph::new(Line::styled("R refresh  Esc back", Style::default().fg(Color::DarkGray)))
        .alignment(Alignment::Center);
    frame.render_widget(hint, layout[2]);
}

fn entries_table(rows: &[LeaderboardEntry]) -> Table<'static> {
    let header = Row::new(["#", "Player", "Score", "Time", "Date"])
        .style(Style::default().fg(Color::Gray).bold());

    let body: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let rank = entry.rank.map(|r| r as usize).unwrap_or(i + 1);
            let time = entry
                .completion_time_seconds
                .map(format_time)
                .unwrap_or_else(|| "--:--".to_string());
            let date = entry
                .created_at
                .map(|ts| ts.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            let color = match rank {
                1 => Color::Yellow,
                2 => Color::White,
                3 => Color::LightRed,
                _ => Color::Gray,
            };
            Row::new(vec![
                TableCell::from(rank.to_string()),
                TableCell::from(entry.username.clone()),
                TableCell::from(entry.score.to_string()),
                TableCell::from(time),
                TableCell::from(date),
            ])
            .style(Style::default().fg(color))
        })
        .collect();

    Table::new(
        body,
        [
            Constraint::Length(4),
            Constraint::Min(16),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(11),
        ],
    )
    .header(header)
}
