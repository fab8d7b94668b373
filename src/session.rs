//! A game screen: the running game, its input and the end-of-run dialog
//!
//! Also holds the leaderboard screen, which loads rows in the background.

use crate::chaos::ChaosGame;
use crate::input::InputHandler;
use crate::leaderboard::{
    LeaderboardEntry, LeaderboardError, LeaderboardService, ScoreSubmission, SubmitResponse,
    spawn_fetch, spawn_submit,
};
use crate::mode::ArcadeMode;
use crate::run::{Action, ArcadeGame, RunStatus, Snapshot};
use crate::settings::Settings;
use crate::snake::SnakeGame;
use std::sync::mpsc;
use std::time::Duration;

/// Longest alias the dialog accepts while typing
const ALIAS_INPUT_LIMIT: usize = 24;

/// The game behind a session
#[derive(Debug)]
pub enum ActiveGame {
    Snake(SnakeGame),
    Chaos(ChaosGame),
}

impl ActiveGame {
    pub fn new(mode: ArcadeMode, settings: &Settings) -> Self {
        match mode.snake_variant() {
            Some(variant) => ActiveGame::Snake(SnakeGame::new(settings.gameplay.snake_config(variant))),
            None => ActiveGame::Chaos(ChaosGame::new(settings.gameplay.chaos_config())),
        }
    }

    pub fn as_game(&self) -> &dyn ArcadeGame {
        match self {
            ActiveGame::Snake(game) => game,
            ActiveGame::Chaos(game) => game,
        }
    }

    pub fn as_game_mut(&mut self) -> &mut dyn ArcadeGame {
        match self {
            ActiveGame::Snake(game) => game,
            ActiveGame::Chaos(game) => game,
        }
    }
}

/// Progress of a score submission
#[derive(Debug)]
pub enum SubmitState {
    /// Typing an alias
    Editing,
    Pending(mpsc::Receiver<Result<SubmitResponse, LeaderboardError>>),
    Done(SubmitResponse),
    /// Can be retried, the snapshot is kept
    Failed(String),
}

/// Shown once the run is over
#[derive(Debug)]
pub struct GameOverDialog {
    pub snapshot: Snapshot,
    pub alias: String,
    pub state: SubmitState,
}

impl GameOverDialog {
    /// Whether typed characters should go into the alias
    pub fn accepts_text(&self) -> bool {
        matches!(self.state, SubmitState::Editing | SubmitState::Failed(_))
    }

    pub fn push_char(&mut self, c: char) {
        if self.accepts_text() && !c.is_control() && self.alias.chars().count() < ALIAS_INPUT_LIMIT {
            self.alias.push(c);
            self.state = SubmitState::Editing;
        }
    }

    pub fn backspace(&mut self) {
        if self.accepts_text() {
            self.alias.pop();
            self.state = SubmitState::Editing;
        }
    }
}

/// A game being played
#[derive(Debug)]
pub struct Session {
    pub mode: ArcadeMode,
    pub game: ActiveGame,
    pub input: InputHandler,
    pub dialog: Option<GameOverDialog>,
    default_alias: String,
}

impl Session {
    pub fn new(mode: ArcadeMode, settings: &Settings) -> Self {
        Self {
            mode,
            game: ActiveGame::new(mode, settings),
            input: InputHandler::from_settings(settings),
            dialog: None,
            default_alias: settings.leaderboard.player_name.clone(),
        }
    }

    pub fn apply(&mut self, action: Action) {
        if action == Action::Restart {
            self.restart();
            return;
        }
        self.game.as_game_mut().apply(action);
    }

    /// Start over, dropping any finished run
    pub fn restart(&mut self) {
        self.dialog = None;
        self.input.clear();
        self.game.as_game_mut().start();
    }

    /// Advance the game and open the dialog when the run ends
    pub fn update(&mut self, dt: Duration) {
        for action in self.input.update() {
            self.game.as_game_mut().apply(action);
        }
        let game = self.game.as_game_mut();
        game.update(dt);
        if self.dialog.is_none() && game.status() == RunStatus::Over {
            if let Some(snapshot) = game.snapshot() {
                self.dialog = Some(GameOverDialog {
                    snapshot: snapshot.clone(),
                    alias: self.default_alias.clone(),
                    state: SubmitState::Editing,
                });
            }
        }
    }

    /// Send the snapshot under the typed alias
    pub fn submit(&mut self, handle: &tokio::runtime::Handle, service: &LeaderboardService) {
        let slug = self.mode.slug();
        let Some(dialog) = &mut self.dialog else {
            return;
        };
        if !dialog.accepts_text() {
            return;
        }
        match ScoreSubmission::from_snapshot(&dialog.alias, &dialog.snapshot) {
            Ok(submission) => {
                tracing::debug!(slug, score = submission.score, "submitting score");
                dialog.state =
                    SubmitState::Pending(spawn_submit(handle, service.clone(), slug, submission));
            }
            Err(e) => dialog.state = SubmitState::Failed(e.to_string()),
        }
    }

    /// Pick up a finished submission, remembering the alias on success
    ///
    /// Returns true if the settings changed and should be saved.
    pub fn poll(&mut self, settings: &mut Settings) -> bool {
        let Some(dialog) = &mut self.dialog else {
            return false;
        };
        let SubmitState::Pending(rx) = &dialog.state else {
            return false;
        };
        let mut changed = false;
        let next = match rx.try_recv() {
            Ok(Ok(response)) => {
                changed = settings.remember_player(&response.entry.username);
                self.default_alias = response.entry.username.clone();
                SubmitState::Done(response)
            }
            Ok(Err(e)) => SubmitState::Failed(e.to_string()),
            Err(mpsc::TryRecvError::Empty) => return false,
            Err(mpsc::TryRecvError::Disconnected) => {
                SubmitState::Failed("Submission was interrupted".to_string())
            }
        };
        dialog.state = next;
        changed
    }
}

/// Loading state of the leaderboard screen
#[derive(Debug)]
pub enum BoardState {
    Loading(mpsc::Receiver<Result<Vec<LeaderboardEntry>, LeaderboardError>>),
    Ready(Vec<LeaderboardEntry>),
    Failed(String),
}

/// Leaderboard screen for one game
#[derive(Debug)]
pub struct LeaderboardView {
    pub mode: ArcadeMode,
    pub source: String,
    pub state: BoardState,
}

impl LeaderboardView {
    pub fn open(
        mode: ArcadeMode,
        handle: &tokio::runtime::Handle,
        service: &LeaderboardService,
        limit: usize,
    ) -> Self {
        Self {
            mode,
            source: service.describe(),
            state: BoardState::Loading(spawn_fetch(handle, service.clone(), mode.slug(), limit)),
        }
    }

    pub fn poll(&mut self) {
        let BoardState::Loading(rx) = &self.state else {
            return;
        };
        self.state = match rx.try_recv() {
            Ok(Ok(rows)) => BoardState::Ready(rows),
            Ok(Err(e)) => BoardState::Failed(e.to_string()),
            Err(mpsc::TryRecvError::Empty) => return,
            Err(mpsc::TryRecvError::Disconnected) => BoardState::Failed("Request was interrupted".to_string()),
        };
    }
}
