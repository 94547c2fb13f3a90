//! Core data types for the brainstorm board
//!
//! This module contains the persisted unit of the canvas, the [`Board`], and
//! everything it is made of.
//!
//! # Main Types
//!
//! - [`Point`] - A 2D coordinate or delta, in either world or screen space
//! - [`Node`] - A note on the canvas (content, world position, color tag)
//! - [`Edge`] - An undirected connection between two nodes
//! - [`Viewport`] - Pan offset and zoom factor mapping world to screen space
//! - [`Board`] - Nodes, edges and viewport for one canvas instance
//!
//! # Persistence
//!
//! Boards are stored by the host as JSON. Decoding through
//! [`Board::from_json_lenient`] never fails: anything malformed, partial, or
//! carrying an unusable zoom is replaced by [`Board::default`]. Well-formed
//! data is restored verbatim with no normalization.

pub mod id;

pub use id::{EdgeId, NodeId};

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

// ==================== Point ====================

/// A 2D point or vector.
///
/// The same type is used for world positions, screen positions and deltas;
/// which space a value lives in is carried by the API that produces it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when treated as a vector.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self - other).length()
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;
    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

// ==================== Node Color ====================

/// Color tag of a node.
///
/// Stored as a free-form tag so boards written by other clients round-trip
/// unchanged. Tags outside [`NodeColor::PALETTE`] render with the default
/// fill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeColor(pub String);

impl NodeColor {
    pub const YELLOW: &'static str = "bg-yellow-200";
    pub const BLUE: &'static str = "bg-blue-200";
    pub const GREEN: &'static str = "bg-green-200";
    pub const PINK: &'static str = "bg-pink-200";
    pub const PURPLE: &'static str = "bg-purple-200";

    /// Tags offered by the color picker, in display order.
    pub const PALETTE: [&'static str; 5] =
        [Self::YELLOW, Self::BLUE, Self::GREEN, Self::PINK, Self::PURPLE];

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_palette(&self) -> bool {
        Self::PALETTE.contains(&self.0.as_str())
    }

    /// Fill color used when painting a node with this tag.
    pub fn fill_rgb(&self) -> [u8; 3] {
        match self.0.as_str() {
            Self::BLUE => [191, 219, 254],
            Self::GREEN => [187, 247, 208],
            Self::PINK => [251, 207, 232],
            Self::PURPLE => [233, 213, 255],
            _ => [254, 240, 138],
        }
    }

    /// Every palette entry as a `NodeColor`.
    pub fn palette() -> impl Iterator<Item = NodeColor> {
        Self::PALETTE.iter().map(|tag| NodeColor::new(*tag))
    }
}

impl Default for NodeColor {
    fn default() -> Self {
        Self::new(Self::YELLOW)
    }
}

// ==================== Node / Edge ====================

/// A note on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub content: String,
    /// World-space position of the node center.
    pub position: Point,
    pub color: NodeColor,
}

/// An undirected connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    /// Whether this edge connects `a` and `b` in either direction.
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    /// Whether `id` is one of this edge's endpoints.
    pub fn touches(&self, id: NodeId) -> bool {
        self.from == id || self.to == id
    }
}

// ==================== Viewport ====================

/// Pan offset (screen space) and zoom factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan: Point,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Viewport {
    /// No pan, zoom 1.
    pub const IDENTITY: Viewport = Viewport {
        pan: Point::ZERO,
        zoom: 1.0,
    };

    /// Whether the viewport can be used for transforms at all.
    pub fn is_usable(&self) -> bool {
        self.pan.is_finite() && self.zoom.is_finite() && self.zoom > 0.0
    }
}

// ==================== Board ====================

/// The full persisted unit for one canvas instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Board {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub viewport: Viewport,
}

impl Board {
    pub const EMPTY: Board = Board {
        nodes: Vec::new(),
        edges: Vec::new(),
        viewport: Viewport::IDENTITY,
    };

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Decode a persisted board, falling back to the default on any problem.
    pub fn from_value_lenient(value: serde_json::Value) -> Self {
        match serde_json::from_value::<Board>(value) {
            Ok(board) if board.viewport.is_usable() => board,
            Ok(board) => {
                tracing::warn!(
                    "Persisted board has unusable viewport (zoom={}), using default board",
                    board.viewport.zoom
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to decode persisted board, using default: {}", e);
                Self::default()
            }
        }
    }

    /// Decode a persisted board from JSON text, falling back to the default.
    pub fn from_json_lenient(json: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(json) {
            Ok(value) => Self::from_value_lenient(value),
            Err(e) => {
                tracing::warn!("Persisted board is not valid JSON, using default: {}", e);
                Self::default()
            }
        }
    }
}
