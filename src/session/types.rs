//! Session record types

use crate::board::Board;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Title given to sessions created without one
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// Unique identifier for a session
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A conversation record carrying an optional brainstorm board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: SessionId,
    pub title: String,
    /// Absent until the board is first touched
    #[serde(default, deserialize_with = "deserialize_board_lenient")]
    pub board: Option<Board>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ChatSession {
    pub fn new(title: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: SessionId::new(),
            title: title.into(),
            board: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Board snapshot, or the default board when the session has none yet
    pub fn board_or_default(&self) -> Board {
        self.board.clone().unwrap_or_default()
    }

    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TITLE)
    }
}

/// A present-but-broken board decodes to the default board instead of
/// failing the whole session file.
fn deserialize_board_lenient<'de, D>(deserializer: D) -> Result<Option<Board>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(Board::from_value_lenient))
}
