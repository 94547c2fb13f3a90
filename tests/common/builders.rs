//! Test data builders for creating test boards

use brainstorm_board::board::{Board, NodeColor, NodeId, Point, Viewport};
use brainstorm_board::canvas::GraphStore;

/// Builder for creating test Boards
///
/// Node ids are returned in insertion order from [`BoardBuilder::build`].
pub struct BoardBuilder {
    nodes: Vec<(String, Point, Option<NodeColor>)>,
    edges: Vec<(usize, usize)>,
    viewport: Viewport,
}

impl BoardBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            viewport: Viewport::default(),
        }
    }

    pub fn node(mut self, content: &str, x: f64, y: f64) -> Self {
        self.nodes.push((content.to_string(), Point::new(x, y), None));
        self
    }

    pub fn colored_node(mut self, content: &str, x: f64, y: f64, color: &str) -> Self {
        self.nodes
            .push((content.to_string(), Point::new(x, y), Some(NodeColor::new(color))));
        self
    }

    /// Connect the `from`-th and `to`-th nodes added so far
    pub fn edge(mut self, from: usize, to: usize) -> Self {
        self.edges.push((from, to));
        self
    }

    pub fn pan(mut self, x: f64, y: f64) -> Self {
        self.viewport.pan = Point::new(x, y);
        self
    }

    pub fn zoom(mut self, zoom: f64) -> Self {
        self.viewport.zoom = zoom;
        self
    }

    pub fn build(self) -> (Board, Vec<NodeId>) {
        let mut board = Board {
            viewport: self.viewport,
            ..Default::default()
        };
        let mut ids = Vec::with_capacity(self.nodes.len());
        for (content, position, color) in self.nodes {
            let (next, id) = GraphStore::add_node(board, content, position, color);
            board = next;
            ids.push(id);
        }
        for (from, to) in self.edges {
            board = GraphStore::add_edge(board, ids[from], ids[to]);
        }
        (board, ids)
    }
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_builder() {
        let (board, ids) = BoardBuilder::new()
            .node("a", 0.0, 0.0)
            .colored_node("b", 10.0, 0.0, NodeColor::PINK)
            .edge(0, 1)
            .zoom(2.0)
            .build();

        assert_eq!(ids.len(), 2);
        assert_eq!(board.edges.len(), 1);
        assert_eq!(board.viewport.zoom, 2.0);
        assert_eq!(board.node(ids[1]).unwrap().color.as_str(), NodeColor::PINK);
    }
}
