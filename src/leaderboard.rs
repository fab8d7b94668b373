//! Score submission and leaderboard reads
//!
//! Finished runs are posted to a leaderboard service, either a remote arcade
//! API over HTTP or a JSON file in the local data directory when no API is
//! configured. Both speak the same wire types and apply the same ordering.
//! Requests run on the tokio runtime and report back over plain channels so
//! the frame loop can poll them between frames.

use crate::run::Snapshot;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, mpsc};

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 25;
pub const MAX_USERNAME_CHARS: usize = 100;

/// Body of a score submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub username: String,
    pub score: u64,
    #[serde(default)]
    pub completion_time_seconds: Option<u64>,
}

impl ScoreSubmission {
    /// Build a submission from a finished run
    pub fn from_snapshot(username: &str, snapshot: &Snapshot) -> Result<Self, LeaderboardError> {
        Ok(Self {
            username: sanitize_username(username)?,
            score: snapshot.score,
            completion_time_seconds: Some(snapshot.elapsed_secs),
        })
    }
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u64,
    #[serde(default)]
    pub completion_time_seconds: Option<u64>,
    /// Position in a ranked read, absent on freshly stored entries
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub message: String,
    pub entry: LeaderboardEntry,
}

#[derive(Debug, Deserialize)]
struct EntriesResponse {
    entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    /// The submission was refused before it left the client
    Validation(String),
    /// The service answered with an error status
    Rejected { status: u16, message: String },
    /// The service could not be reached or answered garbage
    Transport(String),
    /// Reading or writing the local store failed
    Storage(String),
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaderboardError::Validation(message) => write!(f, "{message}"),
            LeaderboardError::Rejected { status, message } => {
                write!(f, "Server refused the score ({status}): {message}")
            }
            LeaderboardError::Transport(message) => write!(f, "Could not reach server: {message}"),
            LeaderboardError::Storage(message) => write!(f, "Local leaderboard error: {message}"),
        }
    }
}

impl std::error::Error for LeaderboardError {}

/// Trim and cap a player alias, rejecting empty ones
pub fn sanitize_username(raw: &str) -> Result<String, LeaderboardError> {
    let username: String = raw.trim().chars().take(MAX_USERNAME_CHARS).collect();
    if username.is_empty() {
        return Err(LeaderboardError::Validation(
            "A username is required.".to_string(),
        ));
    }
    Ok(username)
}

/// Requested row count, defaulted and clamped to what the service allows
pub fn clamp_limit(requested: Option<usize>) -> usize {
    requested.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Confirmation message for a stored score, e.g. "Snake score recorded."
pub fn recorded_message(slug: &str) -> String {
    let mut chars = slug.chars();
    let title: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{title} score recorded.")
}

/// Leaderboard order: score high to low, faster first, newest first
///
/// Entries without a completion time sort after those with one.
pub fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| match (a.completion_time_seconds, b.completion_time_seconds) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Sort, truncate to `limit` and number the rows from 1
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>, limit: usize) -> Vec<LeaderboardEntry> {
    entries.sort_by(compare_entries);
    entries.truncate(limit);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = Some(index as u32 + 1);
    }
    entries
}

/// Current time at whole-second precision, the stamp stored on new entries
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Scores kept in a JSON file, one list per game slug
#[derive(Debug, Default)]
pub struct LocalLeaderboard {
    path: Option<PathBuf>,
    boards: BTreeMap<String, Vec<LeaderboardEntry>>,
}

impl LocalLeaderboard {
    /// A store that never touches disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Default location in the platform data directory
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "arcade", "arcade")
            .map(|dirs| dirs.data_dir().join("leaderboard.json"))
    }

    /// Load the store at `path`, starting empty if the file does not exist yet
    pub fn open(path: &Path) -> Result<Self, LeaderboardError> {
        let boards = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| LeaderboardError::Storage(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(LeaderboardError::Storage(format!(
                    "{}: {e}",
                    path.display()
                )));
            }
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            boards,
        })
    }

    /// Store a score and persist the file
    pub fn submit(
        &mut self,
        slug: &str,
        submission: &ScoreSubmission,
        created_at: DateTime<Utc>,
    ) -> Result<SubmitResponse, LeaderboardError> {
        let entry = LeaderboardEntry {
            username: sanitize_username(&submission.username)?,
            score: submission.score,
            completion_time_seconds: submission.completion_time_seconds,
            rank: None,
            created_at: Some(created_at),
        };
        self.boards
            .entry(slug.to_string())
            .or_default()
            .push(entry.clone());
        self.save()?;
        Ok(SubmitResponse {
            message: recorded_message(slug),
            entry,
        })
    }

    /// Ranked top rows for a game
    pub fn top(&self, slug: &str, limit: usize) -> Vec<LeaderboardEntry> {
        let entries = self.boards.get(slug).cloned().unwrap_or_default();
        rank_entries(entries, clamp_limit(Some(limit)))
    }

    fn save(&self) -> Result<(), LeaderboardError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| LeaderboardError::Storage(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(&self.boards)
            .map_err(|e| LeaderboardError::Storage(e.to_string()))?;
        fs::write(path, content).map_err(|e| LeaderboardError::Storage(e.to_string()))
    }
}

/// Client for the arcade HTTP API
#[derive(Debug, Clone)]
pub struct RemoteLeaderboard {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteLeaderboard {
    pub fn new(base_url: &str) -> Result<Self, LeaderboardError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("arcade/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| LeaderboardError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn submit(
        &self,
        slug: &str,
        submission: &ScoreSubmission,
    ) -> Result<SubmitResponse, LeaderboardError> {
        let url = format!("{}/games/{slug}/score", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(submission)
            .send()
            .await
            .map_err(|e| LeaderboardError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| LeaderboardError::Transport(e.to_string()))
    }

    pub async fn fetch(
        &self,
        slug: &str,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let url = format!("{}/games/{slug}/leaderboard", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("limit", clamp_limit(Some(limit)))])
            .send()
            .await
            .map_err(|e| LeaderboardError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        let body: EntriesResponse = resp
            .json()
            .await
            .map_err(|e| LeaderboardError::Transport(e.to_string()))?;
        Ok(body.entries)
    }
}

/// Turn an error response into a readable rejection
async fn rejection(resp: reqwest::Response) -> LeaderboardError {
    let status = resp.status();
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string(),
    };
    LeaderboardError::Rejected {
        status: status.as_u16(),
        message,
    }
}

/// Where scores go: a remote API or the local file
#[derive(Debug, Clone)]
pub enum LeaderboardService {
    Local(Arc<Mutex<LocalLeaderboard>>),
    Remote(RemoteLeaderboard),
}

impl LeaderboardService {
    /// Pick the backend from an API URL, empty meaning the local store
    pub fn from_api_url(api_url: &str) -> Self {
        let api_url = api_url.trim();
        if !api_url.is_empty() {
            match RemoteLeaderboard::new(api_url) {
                Ok(remote) => {
                    tracing::info!(url = api_url, "using remote leaderboard");
                    return LeaderboardService::Remote(remote);
                }
                Err(e) => tracing::warn!(error = %e, "remote leaderboard unavailable, using local"),
            }
        }

        let local = match LocalLeaderboard::default_path() {
            Some(path) => LocalLeaderboard::open(&path).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "could not open local leaderboard, scores will not persist");
                LocalLeaderboard::in_memory()
            }),
            None => LocalLeaderboard::in_memory(),
        };
        LeaderboardService::local(local)
    }

    pub fn local(store: LocalLeaderboard) -> Self {
        LeaderboardService::Local(Arc::new(Mutex::new(store)))
    }

    /// Short label for the UI
    pub fn describe(&self) -> String {
        match self {
            LeaderboardService::Local(_) => "local".to_string(),
            LeaderboardService::Remote(remote) => remote.base_url().to_string(),
        }
    }

    pub async fn submit(
        &self,
        slug: &str,
        submission: &ScoreSubmission,
    ) -> Result<SubmitResponse, LeaderboardError> {
        match self {
            LeaderboardService::Local(store) => {
                let mut store = store
                    .lock()
                    .map_err(|_| LeaderboardError::Storage("store lock poisoned".to_string()))?;
                store.submit(slug, submission, timestamp_now())
            }
            LeaderboardService::Remote(remote) => remote.submit(slug, submission).await,
        }
    }

    pub async fn fetch(
        &self,
        slug: &str,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        match self {
            LeaderboardService::Local(store) => {
                let store = store
                    .lock()
                    .map_err(|_| LeaderboardError::Storage("store lock poisoned".to_string()))?;
                Ok(store.top(slug, limit))
            }
            LeaderboardService::Remote(remote) => remote.fetch(slug, limit).await,
        }
    }
}

/// Submit a score on the runtime, the result arrives on the returned channel
pub fn spawn_submit(
    handle: &tokio::runtime::Handle,
    service: LeaderboardService,
    slug: &'static str,
    submission: ScoreSubmission,
) -> mpsc::Receiver<Result<SubmitResponse, LeaderboardError>> {
    let (tx, rx) = mpsc::channel();
    handle.spawn(async move {
        let result = service.submit(slug, &submission).await;
        match &result {
            Ok(response) => tracing::info!(
                slug,
                username = %response.entry.username,
                score = response.entry.score,
                "score submitted"
            ),
            Err(e) => tracing::warn!(slug, error = %e, "score submission failed"),
        }
        let _ = tx.send(result);
    });
    rx
}

/// Fetch a leaderboard on the runtime, the rows arrive on the returned channel
pub fn spawn_fetch(
    handle: &tokio::runtime::Handle,
    service: LeaderboardService,
    slug: &'static str,
    limit: usize,
) -> mpsc::Receiver<Result<Vec<LeaderboardEntry>, LeaderboardError>> {
    let (tx, rx) = mpsc::channel();
    handle.spawn(async move {
        let result = service.fetch(slug, limit).await;
        if let Err(e) = &result {
            tracing::warn!(slug, error = %e, "leaderboard fetch failed");
        }
        let _ = tx.send(result);
    });
    rx
}
