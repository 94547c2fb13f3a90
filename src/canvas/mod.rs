//! The canvas engine
//!
//! Everything here is independent of any UI toolkit and operates on plain
//! [`Board`](crate::board::Board) values:
//!
//! - [`viewport`] - screen/world transforms and pointer-anchored zoom
//! - [`graph`] - node and edge CRUD with cascade delete and edge dedup
//! - [`gesture`] - the single-active-gesture state machine
//! - [`controller`] - routes input and actions to a [`BoardHost`]

pub mod controller;
pub mod gesture;
pub mod graph;
pub mod viewport;

pub use controller::{BoardController, BoardHost, BoardUpdater};
pub use gesture::{
    GestureController, GestureIntent, GestureKind, GestureState, HitTarget, InputEvent,
    Modifiers, PointerButton,
};
pub use graph::GraphStore;
pub use viewport::{to_screen, to_world, ViewportModel};
