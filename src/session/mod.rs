//! Session store module
//!
//! The reference host for the canvas engine. Each chat session may carry a
//! brainstorm board; the store keeps every session in one JSON file and
//! exposes the current session's board through [`BoardHost`].
//!
//! # Features
//!
//! - Create, select, rename and delete sessions
//! - Board updates land on the current session only
//! - Corrupt boards decode to the default board instead of failing the load
//! - Fire-and-forget saves driven by a dirty flag, written by a background
//!   thread at a bounded rate
//! - Unreadable session files are moved aside, never overwritten
//!
//! [`BoardHost`]: crate::canvas::BoardHost

pub mod store;
pub mod types;
mod writer;

pub use store::{SessionStore, DEFAULT_SAVE_INTERVAL};
pub use types::{ChatSession, SessionId, DEFAULT_SESSION_TITLE};
