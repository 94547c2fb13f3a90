//! Gesture disambiguation.
//!
//! Raw pointer, touch and wheel input is folded into exactly one active
//! gesture at a time. The gesture type is decided once, when it starts, from
//! what is under the pointer and how many touches are down. The one
//! exception is a second finger landing during a pan: touch platforms
//! report fingers one at a time, so a one-finger pan becomes a pinch as
//! soon as a second touch arrives.
//!
//! ```text
//!            PointerDown(canvas + pan modifier) / 1 touch on canvas
//!   Idle ───────────────────────────────────────────────────────► Panning
//!    │  PointerDown(node body) / 1 touch on node    ──────────────► DraggingNode
//!    │  PointerDown(handle)    / 1 touch on handle  ──────────────► ConnectingEdge
//!    │  2 touches                                   ──────────────► PinchZooming
//!    │  (Panning + 2nd touch                        ──────────────► PinchZooming)
//!    ◄──────────────── release / cancel from any active state ─────┘
//! ```
//!
//! Wheel input is a separate channel: it always produces a zoom intent and
//! never touches the gesture state.
//!
//! The reducer is pure. [`reduce`] looks up a handler in the
//! [`dispatch`] table keyed by (state kind, event kind) and returns the next
//! state plus at most one [`GestureIntent`] describing the board mutation.
//! Pairs missing from the table leave the state unchanged.

use crate::board::{Board, NodeId, Point};
use crate::canvas::viewport::{to_screen, to_world};

/// Distances at or below this are treated as a degenerate pinch.
const MIN_PINCH_DISTANCE: f64 = 1e-6;

// ==================== Input ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub alt: bool,
    pub shift: bool,
    pub ctrl: bool,
}

/// What lies under a pointer or touch, as resolved by node hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Empty canvas.
    Canvas,
    /// The draggable body of a node.
    NodeBody(NodeId),
    /// The connection handle on a node's edge.
    ConnectionHandle(NodeId),
    /// A widget inside a node (editor, color, delete). Gestures never start
    /// here.
    NodeControl(NodeId),
}

impl HitTarget {
    pub fn node(&self) -> Option<NodeId> {
        match *self {
            HitTarget::Canvas => None,
            HitTarget::NodeBody(id)
            | HitTarget::ConnectionHandle(id)
            | HitTarget::NodeControl(id) => Some(id),
        }
    }
}

/// Input events in canvas-local screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
        target: HitTarget,
    },
    PointerMove {
        pos: Point,
    },
    PointerUp {
        pos: Point,
        target: HitTarget,
    },
    /// Pointer cancelled or left the canvas.
    PointerCancel,
    /// `touches` holds every active touch after the new one(s) landed.
    TouchStart {
        touches: Vec<Point>,
        target: HitTarget,
    },
    TouchMove {
        touches: Vec<Point>,
    },
    /// `touches` holds the touches still down; `target` is under the lifted
    /// one.
    TouchEnd {
        touches: Vec<Point>,
        target: HitTarget,
    },
    Wheel {
        pos: Point,
        delta_y: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    TouchStart,
    TouchMove,
    TouchEnd,
    Wheel,
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::PointerDown { .. } => EventKind::PointerDown,
            InputEvent::PointerMove { .. } => EventKind::PointerMove,
            InputEvent::PointerUp { .. } => EventKind::PointerUp,
            InputEvent::PointerCancel => EventKind::PointerCancel,
            InputEvent::TouchStart { .. } => EventKind::TouchStart,
            InputEvent::TouchMove { .. } => EventKind::TouchMove,
            InputEvent::TouchEnd { .. } => EventKind::TouchEnd,
            InputEvent::Wheel { .. } => EventKind::Wheel,
        }
    }

    /// Primary position carried by a move event: the pointer, or the first
    /// touch.
    fn move_position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerMove { pos } => Some(*pos),
            InputEvent::TouchMove { touches } => touches.first().copied(),
            _ => None,
        }
    }

    fn release_target(&self) -> HitTarget {
        match self {
            InputEvent::PointerUp { target, .. } | InputEvent::TouchEnd { target, .. } => *target,
            _ => HitTarget::Canvas,
        }
    }
}

// ==================== State ====================

/// The single active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Panning {
        /// Screen position where the pan started.
        start: Point,
        /// Viewport pan at that moment.
        start_pan: Point,
    },
    PinchZooming {
        /// Inter-touch distance at the previous sample.
        distance: f64,
        midpoint: Point,
    },
    DraggingNode {
        node_id: NodeId,
        /// `pointer - node_screen_position` at grab time.
        offset: Point,
    },
    ConnectingEdge {
        from: NodeId,
        /// Current pointer, the loose end of the pending edge line.
        pointer: Point,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Idle,
    Panning,
    PinchZooming,
    DraggingNode,
    ConnectingEdge,
}

impl GestureState {
    pub fn kind(&self) -> GestureKind {
        match self {
            GestureState::Idle => GestureKind::Idle,
            GestureState::Panning { .. } => GestureKind::Panning,
            GestureState::PinchZooming { .. } => GestureKind::PinchZooming,
            GestureState::DraggingNode { .. } => GestureKind::DraggingNode,
            GestureState::ConnectingEdge { .. } => GestureKind::ConnectingEdge,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// Source node and loose end of the edge being drawn, if any.
    pub fn pending_edge(&self) -> Option<(NodeId, Point)> {
        match *self {
            GestureState::ConnectingEdge { from, pointer } => Some((from, pointer)),
            _ => None,
        }
    }

    /// Node currently being dragged, if any.
    pub fn dragged_node(&self) -> Option<NodeId> {
        match *self {
            GestureState::DraggingNode { node_id, .. } => Some(node_id),
            _ => None,
        }
    }
}

// ==================== Output ====================

/// A board mutation requested by a gesture step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureIntent {
    /// Shift the viewport pan by a screen delta.
    Pan { delta: Point },
    /// Zoom to `zoom`, anchored at a screen point.
    ZoomAt { anchor: Point, zoom: f64 },
    /// One wheel step anchored at the cursor.
    WheelZoom { anchor: Point, delta_y: f64 },
    /// Place a node at a world position.
    MoveNode { id: NodeId, position: Point },
    /// Connect two nodes (deduplicated downstream).
    ConnectNodes { from: NodeId, to: NodeId },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: GestureState,
    pub intent: Option<GestureIntent>,
}

impl Transition {
    fn to(state: GestureState) -> Self {
        Self {
            state,
            intent: None,
        }
    }

    fn with(state: GestureState, intent: GestureIntent) -> Self {
        Self {
            state,
            intent: Some(intent),
        }
    }
}

// ==================== Dispatch ====================

/// Transition handler: current state, event, and a read-only board snapshot.
pub type Handler = fn(&GestureState, &InputEvent, &Board) -> Transition;

/// Handler for a (state kind, event kind) pair, or `None` if the event is
/// ignored in that state.
pub fn dispatch(state: GestureKind, event: EventKind) -> Option<Handler> {
    use EventKind as E;
    use GestureKind as G;

    let handler: Handler = match (state, event) {
        (_, E::Wheel) => on_wheel,

        (G::Idle, E::PointerDown) => idle_pointer_down,
        (G::Idle, E::TouchStart) => idle_touch_start,
        (G::Panning, E::TouchStart) => panning_touch_start,

        (G::Panning, E::PointerMove | E::TouchMove) => panning_move,
        (G::DraggingNode, E::PointerMove | E::TouchMove) => dragging_move,
        (G::PinchZooming, E::TouchMove) => pinch_move,
        (G::ConnectingEdge, E::PointerMove | E::TouchMove) => connecting_move,

        (G::ConnectingEdge, E::PointerUp | E::TouchEnd) => connecting_release,
        (G::Panning | G::PinchZooming | G::DraggingNode, E::PointerUp | E::TouchEnd) => finish,
        (G::Panning | G::PinchZooming | G::DraggingNode | G::ConnectingEdge, E::PointerCancel) => {
            finish
        }

        _ => return None,
    };
    Some(handler)
}

/// Advance the gesture state machine by one event.
pub fn reduce(state: &GestureState, event: &InputEvent, board: &Board) -> Transition {
    match dispatch(state.kind(), event.kind()) {
        Some(handler) => handler(state, event, board),
        None => Transition::to(*state),
    }
}

fn on_wheel(state: &GestureState, event: &InputEvent, _board: &Board) -> Transition {
    match *event {
        InputEvent::Wheel { pos, delta_y } => Transition::with(
            *state,
            GestureIntent::WheelZoom {
                anchor: pos,
                delta_y,
            },
        ),
        _ => Transition::to(*state),
    }
}

fn is_pan_press(button: PointerButton, modifiers: Modifiers) -> bool {
    match button {
        PointerButton::Middle | PointerButton::Secondary => true,
        PointerButton::Primary => modifiers.alt,
    }
}

fn start_pan(pos: Point, board: &Board) -> GestureState {
    GestureState::Panning {
        start: pos,
        start_pan: board.viewport.pan,
    }
}

fn start_drag(id: NodeId, pos: Point, board: &Board) -> GestureState {
    match board.node(id) {
        Some(node) => GestureState::DraggingNode {
            node_id: id,
            offset: pos - to_screen(&board.viewport, node.position),
        },
        None => GestureState::Idle,
    }
}

fn start_connect(id: NodeId, pos: Point, board: &Board) -> GestureState {
    if board.contains_node(id) {
        GestureState::ConnectingEdge {
            from: id,
            pointer: pos,
        }
    } else {
        GestureState::Idle
    }
}

fn idle_pointer_down(_state: &GestureState, event: &InputEvent, board: &Board) -> Transition {
    let InputEvent::PointerDown {
        pos,
        button,
        modifiers,
        target,
    } = *event
    else {
        return Transition::to(GestureState::Idle);
    };

    let next = match target {
        HitTarget::NodeControl(_) => GestureState::Idle,
        HitTarget::Canvas if is_pan_press(button, modifiers) => start_pan(pos, board),
        HitTarget::Canvas => GestureState::Idle,
        HitTarget::NodeBody(_) | HitTarget::ConnectionHandle(_)
            if button != PointerButton::Primary =>
        {
            start_pan(pos, board)
        }
        HitTarget::NodeBody(id) => start_drag(id, pos, board),
        HitTarget::ConnectionHandle(id) => start_connect(id, pos, board),
    };
    Transition::to(next)
}

fn idle_touch_start(_state: &GestureState, event: &InputEvent, board: &Board) -> Transition {
    let InputEvent::TouchStart { touches, target } = event else {
        return Transition::to(GestureState::Idle);
    };

    let next = match touches.as_slice() {
        [pos] => match *target {
            HitTarget::Canvas => start_pan(*pos, board),
            HitTarget::NodeBody(id) => start_drag(id, *pos, board),
            HitTarget::ConnectionHandle(id) => start_connect(id, *pos, board),
            HitTarget::NodeControl(_) => GestureState::Idle,
        },
        [a, b] => start_pinch(*a, *b),
        _ => GestureState::Idle,
    };
    Transition::to(next)
}

fn start_pinch(a: Point, b: Point) -> GestureState {
    GestureState::PinchZooming {
        distance: a.distance(b),
        midpoint: a.midpoint(b),
    }
}

/// A second finger during a pan upgrades it to a pinch.
fn panning_touch_start(state: &GestureState, event: &InputEvent, _board: &Board) -> Transition {
    match event {
        InputEvent::TouchStart { touches, .. } => match touches.as_slice() {
            [a, b] => Transition::to(start_pinch(*a, *b)),
            _ => Transition::to(*state),
        },
        _ => Transition::to(*state),
    }
}

fn panning_move(state: &GestureState, event: &InputEvent, board: &Board) -> Transition {
    let (GestureState::Panning { start, start_pan }, Some(pos)) = (*state, event.move_position())
    else {
        return Transition::to(*state);
    };

    let target_pan = start_pan + (pos - start);
    let delta = target_pan - board.viewport.pan;
    if delta == Point::ZERO {
        return Transition::to(*state);
    }
    Transition::with(*state, GestureIntent::Pan { delta })
}

fn dragging_move(state: &GestureState, event: &InputEvent, board: &Board) -> Transition {
    let (GestureState::DraggingNode { node_id, offset }, Some(pos)) =
        (*state, event.move_position())
    else {
        return Transition::to(*state);
    };

    let position = to_world(&board.viewport, pos - offset);
    Transition::with(
        *state,
        GestureIntent::MoveNode {
            id: node_id,
            position,
        },
    )
}

fn pinch_move(state: &GestureState, event: &InputEvent, board: &Board) -> Transition {
    let (GestureState::PinchZooming { distance, .. }, InputEvent::TouchMove { touches }) =
        (*state, event)
    else {
        return Transition::to(*state);
    };
    let [a, b] = touches.as_slice() else {
        return Transition::to(*state);
    };

    let new_distance = a.distance(*b);
    let midpoint = a.midpoint(*b);
    let next = GestureState::PinchZooming {
        distance: new_distance,
        midpoint,
    };

    if distance <= MIN_PINCH_DISTANCE || new_distance <= MIN_PINCH_DISTANCE {
        return Transition::to(next);
    }

    let scale = new_distance / distance;
    Transition::with(
        next,
        GestureIntent::ZoomAt {
            anchor: midpoint,
            zoom: board.viewport.zoom * scale,
        },
    )
}

fn connecting_move(state: &GestureState, event: &InputEvent, _board: &Board) -> Transition {
    let (GestureState::ConnectingEdge { from, .. }, Some(pos)) = (*state, event.move_position())
    else {
        return Transition::to(*state);
    };
    Transition::to(GestureState::ConnectingEdge { from, pointer: pos })
}

fn connecting_release(state: &GestureState, event: &InputEvent, _board: &Board) -> Transition {
    let GestureState::ConnectingEdge { from, .. } = *state else {
        return Transition::to(GestureState::Idle);
    };

    match event.release_target().node() {
        Some(to) if to != from => {
            Transition::with(GestureState::Idle, GestureIntent::ConnectNodes { from, to })
        }
        _ => Transition::to(GestureState::Idle),
    }
}

fn finish(_state: &GestureState, _event: &InputEvent, _board: &Board) -> Transition {
    Transition::to(GestureState::Idle)
}

// ==================== Controller ====================

/// Owns the active gesture and feeds events through [`reduce`].
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    state: GestureState,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Process one event against the current board, returning the mutation
    /// to apply, if any.
    pub fn handle(&mut self, event: &InputEvent, board: &Board) -> Option<GestureIntent> {
        let transition = reduce(&self.state, event, board);
        if transition.state.kind() != self.state.kind() {
            tracing::debug!(
                from = ?self.state.kind(),
                to = ?transition.state.kind(),
                event = ?event.kind(),
                "Gesture transition"
            );
        }
        self.state = transition.state;
        transition.intent
    }

    /// Drop any active gesture without committing anything.
    pub fn reset(&mut self) {
        if !self.state.is_idle() {
            tracing::debug!(from = ?self.state.kind(), "Gesture reset");
        }
        self.state = GestureState::Idle;
    }
}
