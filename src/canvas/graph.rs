//! Node/edge graph operations.
//!
//! [`GraphStore`] is a set of pure functions over [`Board`] values: each one
//! consumes a board and returns the next one. No authoritative copy lives
//! here, which lets hosts persist plain snapshots.
//!
//! Invalid requests are no-ops rather than errors:
//! - editing, moving, recoloring or deleting a missing node
//! - self-edges, edges to missing nodes, duplicate unordered pairs

use crate::board::{Board, Edge, EdgeId, Node, NodeColor, NodeId, Point};

/// Pure CRUD over the nodes and edges of a board.
pub struct GraphStore;

impl GraphStore {
    /// Add a node with a freshly generated id.
    pub fn add_node(
        mut board: Board,
        content: impl Into<String>,
        position: Point,
        color: Option<NodeColor>,
    ) -> (Board, NodeId) {
        let mut id = NodeId::new();
        while board.contains_node(id) {
            id = NodeId::new();
        }

        let node = Node {
            id,
            content: content.into(),
            position,
            color: color.unwrap_or_default(),
        };
        tracing::debug!(node = %id, x = position.x, y = position.y, "Added node");
        board.nodes.push(node);
        (board, id)
    }

    /// Insert a fully built node. No-op if its id is already taken.
    pub fn insert_node(mut board: Board, node: Node) -> Board {
        if board.contains_node(node.id) {
            tracing::warn!(node = %node.id, "Insert skipped: id already present");
            return board;
        }
        tracing::debug!(
            node = %node.id,
            x = node.position.x,
            y = node.position.y,
            "Inserted node"
        );
        board.nodes.push(node);
        board
    }

    /// Replace a node's content. No length limit.
    pub fn update_node_content(board: Board, id: NodeId, text: impl Into<String>) -> Board {
        let text = text.into();
        Self::modify_node(board, id, "update content", move |node| node.content = text)
    }

    /// Replace a node's world position. Last write wins.
    pub fn move_node(board: Board, id: NodeId, position: Point) -> Board {
        Self::modify_node(board, id, "move", move |node| node.position = position)
    }

    pub fn change_node_color(board: Board, id: NodeId, color: NodeColor) -> Board {
        Self::modify_node(board, id, "recolor", move |node| node.color = color)
    }

    /// Remove a node and every edge touching it.
    pub fn delete_node(mut board: Board, id: NodeId) -> Board {
        let before = board.nodes.len();
        board.nodes.retain(|n| n.id != id);
        if board.nodes.len() == before {
            tracing::trace!(node = %id, "Delete skipped: node not found");
            return board;
        }

        let edges_before = board.edges.len();
        board.edges.retain(|e| !e.touches(id));
        tracing::debug!(
            node = %id,
            removed_edges = edges_before - board.edges.len(),
            "Deleted node"
        );
        board
    }

    /// Connect two nodes.
    ///
    /// No-op for self-edges, missing endpoints, and pairs that are already
    /// connected in either direction.
    pub fn add_edge(mut board: Board, from: NodeId, to: NodeId) -> Board {
        if from == to {
            tracing::trace!(node = %from, "Edge skipped: self-edge");
            return board;
        }
        if !board.contains_node(from) || !board.contains_node(to) {
            tracing::trace!(%from, %to, "Edge skipped: endpoint no longer exists");
            return board;
        }
        if Self::has_edge(&board, from, to) {
            tracing::trace!(%from, %to, "Edge skipped: pair already connected");
            return board;
        }

        let id = EdgeId::new();
        tracing::debug!(edge = %id, %from, %to, "Added edge");
        board.edges.push(Edge { id, from, to });
        board
    }

    pub fn node(board: &Board, id: NodeId) -> Option<&Node> {
        board.node(id)
    }

    /// Edges incident to `id`.
    pub fn edges_of(board: &Board, id: NodeId) -> impl Iterator<Item = &Edge> {
        board.edges.iter().filter(move |e| e.touches(id))
    }

    /// Whether the unordered pair `{a, b}` is connected.
    pub fn has_edge(board: &Board, a: NodeId, b: NodeId) -> bool {
        board.edges.iter().any(|e| e.connects(a, b))
    }

    fn modify_node(
        mut board: Board,
        id: NodeId,
        what: &str,
        apply: impl FnOnce(&mut Node),
    ) -> Board {
        match board.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => apply(node),
            None => tracing::trace!(node = %id, "{} skipped: node not found", what),
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_two() -> (Board, NodeId, NodeId) {
        let (board, a) = GraphStore::add_node(Board::default(), "a", Point::ZERO, None);
        let (board, b) = GraphStore::add_node(board, "b", Point::new(100.0, 0.0), None);
        (board, a, b)
    }

    #[test]
    fn test_add_node_defaults_color() {
        let (board, id) = GraphStore::add_node(Board::default(), "idea", Point::new(1.0, 2.0), None);
        let node = board.node(id).unwrap();
        assert_eq!(node.content, "idea");
        assert_eq!(node.position, Point::new(1.0, 2.0));
        assert_eq!(node.color, NodeColor::default());
    }

    #[test]
    fn test_add_node_with_color() {
        let (board, id) = GraphStore::add_node(
            Board::default(),
            "x",
            Point::ZERO,
            Some(NodeColor::new(NodeColor::PINK)),
        );
        assert_eq!(board.node(id).unwrap().color.as_str(), NodeColor::PINK);
    }

    #[test]
    fn test_add_edge_dedups_unordered_pair() {
        let (board, a, b) = board_with_two();
        let board = GraphStore::add_edge(board, a, b);
        let board = GraphStore::add_edge(board, b, a);
        let board = GraphStore::add_edge(board, a, b);
        assert_eq!(board.edges.len(), 1);
        assert!(GraphStore::has_edge(&board, b, a));
    }

    #[test]
    fn test_self_edge_is_noop() {
        let (board, a, _) = board_with_two();
        let board = GraphStore::add_edge(board, a, a);
        assert!(board.edges.is_empty());
    }

    #[test]
    fn test_edge_to_missing_node_is_noop() {
        let (board, a, b) = board_with_two();
        let board = GraphStore::delete_node(board, b);
        let board = GraphStore::add_edge(board, a, b);
        assert!(board.edges.is_empty());
    }

    #[test]
    fn test_delete_node_cascades_only_incident_edges() {
        let (board, a, b) = board_with_two();
        let (board, c) = GraphStore::add_node(board, "c", Point::ZERO, None);
        let board = GraphStore::add_edge(board, a, b);
        let board = GraphStore::add_edge(board, b, c);
        let board = GraphStore::add_edge(board, c, a);

        let board = GraphStore::delete_node(board, a);
        assert_eq!(board.nodes.len(), 2);
        assert_eq!(board.edges.len(), 1);
        assert!(GraphStore::has_edge(&board, b, c));
        assert_eq!(GraphStore::edges_of(&board, a).count(), 0);
    }

    #[test]
    fn test_updates_on_missing_node_are_noops() {
        let (board, _, _) = board_with_two();
        let ghost = NodeId::new();
        let after = GraphStore::move_node(board.clone(), ghost, Point::new(9.0, 9.0));
        let after = GraphStore::update_node_content(after, ghost, "boo");
        let after = GraphStore::change_node_color(after, ghost, NodeColor::new(NodeColor::BLUE));
        let after = GraphStore::delete_node(after, ghost);
        assert_eq!(after, board);
    }

    #[test]
    fn test_insert_node_rejects_duplicate_id() {
        let (board, a, _) = board_with_two();
        let dup = Node {
            id: a,
            content: "dup".to_string(),
            position: Point::ZERO,
            color: NodeColor::default(),
        };
        let after = GraphStore::insert_node(board.clone(), dup);
        assert_eq!(after, board);
    }

    #[test]
    fn test_update_move_recolor() {
        let (board, a, _) = board_with_two();
        let board = GraphStore::update_node_content(board, a, "x".repeat(10_000));
        let board = GraphStore::move_node(board, a, Point::new(-5.0, 7.0));
        let board = GraphStore::change_node_color(board, a, NodeColor::new(NodeColor::GREEN));

        let node = GraphStore::node(&board, a).unwrap();
        assert_eq!(node.content.len(), 10_000);
        assert_eq!(node.position, Point::new(-5.0, 7.0));
        assert_eq!(node.color.as_str(), NodeColor::GREEN);
    }
}
