//! JSON-backed session store
//!
//! Holds every [`ChatSession`] plus the id of the current one, and acts as
//! the [`BoardHost`] for the current session's board. Mutations only mark
//! the store dirty; the frontend calls [`SessionStore::save_if_dirty`] once
//! per frame and failures are logged, never propagated.
//!
//! Saves are rate limited by a save interval and, once
//! [`SessionStore::with_background_writer`] is used, handed to a writer
//! thread as snapshots. A session file that cannot be read is moved aside
//! before the store binds to its path, so it is never overwritten.

use super::types::{ChatSession, SessionId, DEFAULT_SESSION_TITLE};
use super::writer::SessionWriter;
use crate::board::Board;
use crate::canvas::{BoardHost, BoardUpdater};
use crate::config;
use crate::error::{BoardError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Save interval used by [`SessionStore::open_default`]
pub const DEFAULT_SAVE_INTERVAL: Duration = Duration::from_millis(500);

/// On-disk layout of `sessions.json`
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    current: Option<SessionId>,
    #[serde(default)]
    sessions: Vec<ChatSession>,
}

/// Everything needed to write the session file, detached from the store
pub(crate) struct SessionSnapshot {
    path: PathBuf,
    file: SessionFile,
}

impl SessionSnapshot {
    /// Write through a temporary file so a failed write never truncates the
    /// previous save.
    pub(crate) fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create session directory {:?}", parent))?;
        }

        let json =
            serde_json::to_string_pretty(&self.file).context("Failed to serialize sessions")?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("Failed to write sessions to {:?}", tmp))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {:?}", self.path))?;

        tracing::debug!(
            sessions = self.file.sessions.len(),
            "Saved sessions to {:?}",
            self.path
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    current: Option<SessionId>,
    /// Backing file; `None` keeps the store in memory only
    path: Option<PathBuf>,
    dirty: bool,
    writer: Option<SessionWriter>,
    save_interval: Duration,
    last_save: Option<Instant>,
}

impl SessionStore {
    /// A store with no backing file
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing file yields an empty store bound to it.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut store = Self {
            path: Some(path.to_path_buf()),
            ..Default::default()
        };
        if !path.exists() {
            tracing::info!("No session file at {:?}, starting empty", path);
            return Ok(store);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sessions from {:?}", path))?;
        let file: SessionFile = serde_json::from_str(&content)
            .map_err(|e| BoardError::Session(format!("Malformed session file {:?}: {}", path, e)))?;

        store.current = file
            .current
            .filter(|id| file.sessions.iter().any(|s| s.id == *id));
        store.sessions = file.sessions;
        tracing::info!(
            sessions = store.sessions.len(),
            "Loaded sessions from {:?}",
            path
        );
        Ok(store)
    }

    /// Load from `path`, falling back to an empty store.
    ///
    /// An unreadable file is renamed to a `.corrupt-<timestamp>` sibling
    /// first. If that fails the store stays in memory only.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from(path) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("Failed to load sessions, starting empty: {}", e);
                Self {
                    path: set_aside(path).then(|| path.to_path_buf()),
                    ..Default::default()
                }
            }
        }
    }

    /// Load from the platform data directory, or stay in memory if there is
    /// none
    pub fn open_default() -> Self {
        match config::sessions_path() {
            Some(path) => Self::load_or_default(path)
                .with_save_interval(DEFAULT_SAVE_INTERVAL)
                .with_background_writer(),
            None => {
                tracing::warn!("No data directory available, sessions will not persist");
                Self::in_memory()
            }
        }
    }

    /// Hand saves to a writer thread. Does nothing without a backing file.
    pub fn with_background_writer(mut self) -> Self {
        if self.path.is_none() || self.writer.is_some() {
            return self;
        }
        match SessionWriter::spawn() {
            Ok(writer) => self.writer = Some(writer),
            Err(e) => tracing::warn!("Failed to start session writer, saving inline: {}", e),
        }
        self
    }

    /// Minimum time between two saves from [`SessionStore::save_if_dirty`]
    pub fn with_save_interval(mut self, interval: Duration) -> Self {
        self.save_interval = interval;
        self
    }

    pub fn save_interval(&self) -> Duration {
        self.save_interval
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ==================== Sessions ====================

    /// All sessions, newest first
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn current_id(&self) -> Option<SessionId> {
        self.current
    }

    pub fn current(&self) -> Option<&ChatSession> {
        let id = self.current?;
        self.sessions.iter().find(|s| s.id == id)
    }

    fn current_mut(&mut self) -> Option<&mut ChatSession> {
        let id = self.current?;
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    /// Start a new session with an empty board and make it current
    pub fn new_session(&mut self, title: Option<&str>) -> SessionId {
        let mut session = ChatSession::new(title.unwrap_or(DEFAULT_SESSION_TITLE));
        session.board = Some(Board::default());
        let id = session.id;
        self.sessions.insert(0, session);
        self.current = Some(id);
        self.dirty = true;
        tracing::info!(session = %id, "Created session");
        id
    }

    /// Make `id` current. Returns false for unknown ids.
    pub fn select(&mut self, id: SessionId) -> bool {
        if !self.sessions.iter().any(|s| s.id == id) {
            return false;
        }
        if self.current != Some(id) {
            self.current = Some(id);
            self.dirty = true;
        }
        true
    }

    /// Current session, creating one first if there is none
    pub fn ensure_current(&mut self) -> SessionId {
        match self.current {
            Some(id) => id,
            None => self.new_session(None),
        }
    }

    /// Rename a session. Blank titles are ignored.
    pub fn rename(&mut self, id: SessionId, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        match self.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.title = title.to_string();
                session.touch();
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Remove a session. Deleting the current one leaves no session current.
    pub fn delete(&mut self, id: SessionId) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            return false;
        }
        if self.current == Some(id) {
            self.current = None;
        }
        self.dirty = true;
        tracing::info!(session = %id, "Deleted session");
        true
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
        self.current = None;
        self.dirty = true;
        tracing::info!("Cleared all sessions");
    }

    // ==================== Persistence ====================

    fn snapshot(&self) -> Option<SessionSnapshot> {
        let path = self.path.clone()?;
        Some(SessionSnapshot {
            path,
            file: SessionFile {
                current: self.current,
                sessions: self.sessions.clone(),
            },
        })
    }

    /// Write every session to the backing file and wait for it.
    ///
    /// A background writer is drained and stopped first, so nothing it still
    /// holds can land after this write. Later saves run inline.
    pub fn save(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.shutdown();
            for outcome in writer.finished() {
                if let Err(e) = outcome {
                    tracing::warn!("Background session save failed: {}", e);
                }
            }
        }

        let Some(snapshot) = self.snapshot() else {
            self.dirty = false;
            return Ok(());
        };
        snapshot.write()?;
        self.dirty = false;
        self.last_save = Some(Instant::now());
        Ok(())
    }

    /// Save if anything changed and the save interval has passed. Failures
    /// are logged and the store stays dirty so a later call retries.
    pub fn save_if_dirty(&mut self) {
        self.collect_write_results();
        if !self.dirty {
            return;
        }
        if self
            .last_save
            .is_some_and(|at| at.elapsed() < self.save_interval)
        {
            return;
        }
        self.last_save = Some(Instant::now());

        let Some(snapshot) = self.snapshot() else {
            self.dirty = false;
            return;
        };
        let snapshot = match &self.writer {
            Some(writer) => match writer.submit(snapshot) {
                Ok(()) => {
                    self.dirty = false;
                    return;
                }
                Err(snapshot) => {
                    tracing::warn!("Session writer is gone, saving inline");
                    self.writer = None;
                    snapshot
                }
            },
            None => snapshot,
        };

        match snapshot.write() {
            Ok(()) => self.dirty = false,
            Err(e) => tracing::warn!("Failed to save sessions: {}", e),
        }
    }

    /// Re-mark the store dirty for every background write that failed.
    fn collect_write_results(&mut self) {
        let Some(writer) = &self.writer else {
            return;
        };
        for outcome in writer.finished() {
            if let Err(e) = outcome {
                tracing::warn!("Failed to save sessions: {}", e);
                self.dirty = true;
            }
        }
    }
}

/// Move an unreadable session file out of the way. Returns whether the
/// store may write to `path`.
fn set_aside(path: &Path) -> bool {
    if !path.is_file() {
        tracing::warn!("{:?} is not a regular file, sessions will not be saved", path);
        return false;
    }
    let backup = corrupt_backup_path(path);
    match std::fs::rename(path, &backup) {
        Ok(()) => {
            tracing::warn!("Moved unreadable session file to {:?}", backup);
            true
        }
        Err(e) => {
            tracing::warn!(
                "Failed to move {:?} aside, sessions will not be saved: {}",
                path,
                e
            );
            false
        }
    }
}

fn corrupt_backup_path(path: &Path) -> PathBuf {
    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3f");
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".corrupt-{}", stamp));
    PathBuf::from(name)
}

/// Board shown when there is no current session or it has none yet.
static EMPTY_BOARD: Board = Board::EMPTY;

impl BoardHost for SessionStore {
    fn current_board(&self) -> &Board {
        self.current()
            .and_then(|s| s.board.as_ref())
            .unwrap_or(&EMPTY_BOARD)
    }

    fn update_board(&mut self, updater: BoardUpdater<'_>) {
        let Some(session) = self.current_mut() else {
            tracing::debug!("Board update dropped: no current session");
            return;
        };
        let current = session.board.take().unwrap_or_default();
        session.board = Some(updater(current));
        session.touch();
        self.dirty = true;
    }
}
