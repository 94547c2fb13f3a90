//! # Brainstorm Board: an infinite sticky-note canvas
//!
//! A pannable, zoomable canvas of notes connected by undirected edges. Input
//! from mouse, wheel and touch is folded into exactly one active gesture at
//! a time, and every change to the board goes through a host-provided
//! `Board -> Board` updater so the host stays the single owner of the data.
//!
//! ## Architecture
//!
//! - **Board**: the persisted data model (nodes, edges, viewport)
//! - **Canvas**: UI-independent engine: viewport math, graph CRUD, the
//!   gesture state machine, and the controller that ties them together
//! - **Session**: a JSON-backed reference host holding one board per session
//! - **Frontend**: an eframe/egui app that paints boards and feeds raw
//!   pointer, touch and wheel events into the engine
//!
//! ## Configuration
//!
//! Canvas settings and sessions live in the platform data directory under
//! `dev.brainstorm-board`:
//!
//! - **Linux**: `~/.local/share/dev.brainstorm-board/`
//! - **macOS**: `~/Library/Application Support/dev.brainstorm-board/`
//! - **Windows**: `%APPDATA%\dev.brainstorm-board\`
//!
//! ## Example
//!
//! ```
//! use brainstorm_board::board::{Board, Point};
//! use brainstorm_board::canvas::BoardController;
//! use brainstorm_board::config::CanvasSettings;
//!
//! // A bare Board is its own in-memory host.
//! let mut board = Board::default();
//! let mut controller = BoardController::seeded(CanvasSettings::default(), 42);
//!
//! let id = controller.send_to_board(&mut board, Point::new(800.0, 600.0), "First idea");
//! assert!(controller.is_open());
//! assert_eq!(board.node(id).map(|n| n.content.as_str()), Some("First idea"));
//! ```

pub mod board;
pub mod canvas;
pub mod config;
pub mod error;
pub mod frontend;
pub mod session;

// Re-export commonly used types
pub use board::{Board, Edge, EdgeId, Node, NodeColor, NodeId, Point, Viewport};
pub use canvas::{BoardController, BoardHost, GestureState, InputEvent};
pub use config::CanvasSettings;
pub use error::{BoardError, Result};
pub use frontend::BoardApp;
pub use session::SessionStore;
