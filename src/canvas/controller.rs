//! Top-level board façade.
//!
//! [`BoardController`] routes input to the gesture reducer and turns the
//! resulting intents into board updates. It never owns a [`Board`]: the
//! authoritative copy lives with a [`BoardHost`], and every mutation is
//! handed over as an updater closure that receives the host's live board.

use crate::board::{Board, Node, NodeColor, NodeId, Point};
use crate::canvas::gesture::{GestureController, GestureIntent, GestureState, InputEvent};
use crate::canvas::graph::GraphStore;
use crate::canvas::viewport::{to_screen, ViewportModel};
use crate::config::CanvasSettings;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A `Board -> Board` transformation applied by the host to its live board.
pub type BoardUpdater<'a> = Box<dyn FnOnce(Board) -> Board + 'a>;

/// Owner of the authoritative board.
///
/// `update_board` must apply the updater synchronously. The controller reads
/// back the result in the same call.
pub trait BoardHost {
    /// Borrow the current board, or an empty board when none exists yet.
    fn current_board(&self) -> &Board;

    /// Owned snapshot of [`BoardHost::current_board`].
    fn board(&self) -> Board {
        self.current_board().clone()
    }

    /// Replace the board with `updater(current)`.
    fn update_board(&mut self, updater: BoardUpdater<'_>);
}

/// A bare board is its own in-memory host.
impl BoardHost for Board {
    fn current_board(&self) -> &Board {
        self
    }

    fn update_board(&mut self, updater: BoardUpdater<'_>) {
        let current = std::mem::take(self);
        *self = updater(current);
    }
}

pub struct BoardController {
    gestures: GestureController,
    settings: CanvasSettings,
    viewport_model: ViewportModel,
    open: bool,
    rng: StdRng,
}

impl BoardController {
    pub fn new(settings: CanvasSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Controller with a fixed jitter seed.
    pub fn seeded(settings: CanvasSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(settings: CanvasSettings, rng: StdRng) -> Self {
        Self {
            gestures: GestureController::new(),
            viewport_model: ViewportModel::from_settings(&settings),
            settings,
            open: false,
            rng,
        }
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn viewport_model(&self) -> &ViewportModel {
        &self.viewport_model
    }

    pub fn gesture(&self) -> &GestureState {
        self.gestures.state()
    }

    // ==================== Visibility ====================

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        if !self.open {
            tracing::info!("Board opened");
        }
        self.open = true;
    }

    /// Hide the board. Any in-flight gesture is dropped uncommitted.
    pub fn close(&mut self) {
        if self.open {
            tracing::info!("Board closed");
        }
        self.open = false;
        self.gestures.reset();
    }

    // ==================== Input ====================

    /// Feed one input event through the gesture state machine and apply the
    /// resulting intent to the host's board.
    pub fn handle_event(&mut self, host: &mut dyn BoardHost, event: &InputEvent) {
        let intent = self.gestures.handle(event, host.current_board());
        if let Some(intent) = intent {
            self.apply_intent(host, intent);
        }
    }

    fn apply_intent(&self, host: &mut dyn BoardHost, intent: GestureIntent) {
        let model = self.viewport_model;
        tracing::trace!(?intent, "Applying gesture intent");
        match intent {
            GestureIntent::Pan { delta } => host.update_board(Box::new(move |mut board: Board| {
                board.viewport = model.pan(board.viewport, delta);
                board
            })),
            GestureIntent::ZoomAt { anchor, zoom } => {
                host.update_board(Box::new(move |mut board: Board| {
                    board.viewport = model.zoom_at(board.viewport, anchor, zoom);
                    board
                }))
            }
            GestureIntent::WheelZoom { anchor, delta_y } => {
                host.update_board(Box::new(move |mut board: Board| {
                    board.viewport = model.wheel_zoom(board.viewport, anchor, delta_y);
                    board
                }))
            }
            GestureIntent::MoveNode { id, position } => host.update_board(Box::new(
                move |board| GraphStore::move_node(board, id, position),
            )),
            GestureIntent::ConnectNodes { from, to } => host.update_board(Box::new(
                move |board| GraphStore::add_edge(board, from, to),
            )),
        }
    }

    // ==================== Node Actions ====================

    /// Add a node near the center of the visible canvas.
    ///
    /// The node lands at the world point under the canvas center plus a
    /// uniform random offset of up to half the configured jitter per axis.
    pub fn add_node_at_center(
        &mut self,
        host: &mut dyn BoardHost,
        canvas_size: Point,
        content: impl Into<String>,
    ) -> NodeId {
        let half = self.settings.add_jitter / 2.0;
        let jitter = Point::new(
            self.rng.gen_range(-half..=half),
            self.rng.gen_range(-half..=half),
        );

        let id = NodeId::new();
        let content = content.into();
        let color = self.settings.default_color.clone();
        let model = self.viewport_model;

        host.update_board(Box::new(move |board: Board| {
            let center = model.visible_world_center(&board.viewport, canvas_size);
            let node = Node {
                id,
                content,
                position: center + jitter,
                color,
            };
            GraphStore::insert_node(board, node)
        }));
        id
    }

    /// The canvas "+" control.
    pub fn add_new_idea(&mut self, host: &mut dyn BoardHost, canvas_size: Point) -> NodeId {
        let content = self.settings.new_node_content.clone();
        self.add_node_at_center(host, canvas_size, content)
    }

    /// Put external content on the board and show it.
    pub fn send_to_board(
        &mut self,
        host: &mut dyn BoardHost,
        canvas_size: Point,
        text: impl Into<String>,
    ) -> NodeId {
        let id = self.add_node_at_center(host, canvas_size, text);
        tracing::info!(node = %id, "Content sent to board");
        self.open();
        id
    }

    pub fn update_node_content(&self, host: &mut dyn BoardHost, id: NodeId, text: String) {
        host.update_board(Box::new(move |board: Board| {
            GraphStore::update_node_content(board, id, text)
        }));
    }

    pub fn delete_node(&mut self, host: &mut dyn BoardHost, id: NodeId) {
        if self.gestures.state().dragged_node() == Some(id)
            || self.gestures.state().pending_edge().map(|(from, _)| from) == Some(id)
        {
            self.gestures.reset();
        }
        host.update_board(Box::new(move |board| GraphStore::delete_node(board, id)));
    }

    pub fn change_node_color(&self, host: &mut dyn BoardHost, id: NodeId, color: NodeColor) {
        host.update_board(Box::new(move |board: Board| {
            GraphStore::change_node_color(board, id, color)
        }));
    }

    /// Back to pan (0, 0) and zoom 1.
    pub fn reset_view(&self, host: &mut dyn BoardHost) {
        let viewport = self.viewport_model.reset();
        tracing::debug!("Resetting view");
        host.update_board(Box::new(move |mut board: Board| {
            board.viewport = viewport;
            board
        }));
    }

    // ==================== Rendering Helpers ====================

    /// Screen position of the source connection handle and the current
    /// pointer while an edge is being drawn.
    pub fn pending_edge(&self, board: &Board) -> Option<(Point, Point)> {
        let (from, pointer) = self.gestures.state().pending_edge()?;
        let node = board.node(from)?;
        let handle = node.position + Point::new(self.settings.node_width / 2.0, 0.0);
        Some((to_screen(&board.viewport, handle), pointer))
    }
}
