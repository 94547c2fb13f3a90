//! Node view: per-node layout, hit testing and rendering.
//!
//! A node is a sticky note centered on its world position. Its screen
//! layout has four interactive parts:
//! - the body, which starts a drag
//! - the inline text editor
//! - the palette and delete buttons floating over the top-right corner
//!   (plus the color swatches while the picker is open)
//! - the connection handle on the middle of the right edge
//!
//! Hit testing is pure so the board pane can classify a press before egui
//! widgets see it. Nodes are tested in reverse draw order; within a node the
//! handle wins over the controls and the controls win over the body.

use egui::{Color32, Pos2, Rect, Stroke, Ui, Vec2};

use crate::board::{Board, Node, NodeColor, NodeId, Viewport};
use crate::canvas::{to_screen, HitTarget};

/// Inner padding, world units.
const PADDING: f32 = 12.0;
/// Editor line height, world units.
const LINE_HEIGHT: f32 = 19.0;
/// Average glyph advance used to estimate wrapping, world units.
const CHAR_WIDTH: f32 = 7.5;
const FONT_SIZE: f32 = 14.0;
const CORNER_RADIUS: f32 = 8.0;
const CONTROL_RADIUS: f32 = 12.0;
const CONTROL_GAP: f32 = 4.0;
const SWATCH_RADIUS: f32 = 10.0;
const HANDLE_RADIUS: f32 = 8.0;

// ==================== Layout ====================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Pos2,
    pub radius: f32,
}

impl Circle {
    pub fn contains(&self, pos: Pos2) -> bool {
        (pos - self.center).length() <= self.radius
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::from_center_size(self.center, Vec2::splat(self.radius * 2.0))
    }
}

/// Screen-space geometry of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub id: NodeId,
    pub rect: Rect,
    pub editor: Rect,
    pub palette_button: Circle,
    pub delete_button: Circle,
    /// Empty unless the color picker is open on this node.
    pub swatches: Vec<(NodeColor, Circle)>,
    pub handle: Circle,
    pub zoom: f32,
}

impl NodeLayout {
    /// Lay out `node` for the given viewport. `origin` is the screen position
    /// of the canvas' top-left corner.
    pub fn compute(
        node: &Node,
        viewport: &Viewport,
        origin: Pos2,
        node_width: f32,
        picker_open: bool,
    ) -> Self {
        let zoom = viewport.zoom as f32;
        let center_local = to_screen(viewport, node.position);
        let center = origin + Vec2::new(center_local.x as f32, center_local.y as f32);

        let text_height = estimate_lines(&node.content, node_width) as f32 * LINE_HEIGHT;
        let size = Vec2::new(node_width, text_height + PADDING * 2.0) * zoom;
        let rect = Rect::from_center_size(center, size);
        let editor = rect.shrink(PADDING * zoom);

        let control_radius = CONTROL_RADIUS * zoom;
        let delete_button = Circle {
            center: rect.right_top(),
            radius: control_radius,
        };
        let palette_button = Circle {
            center: rect.right_top()
                - Vec2::new(control_radius * 2.0 + CONTROL_GAP * zoom, 0.0),
            radius: control_radius,
        };

        let swatches = if picker_open {
            let radius = SWATCH_RADIUS * zoom;
            let step = radius * 2.0 + CONTROL_GAP * zoom;
            let row_y = palette_button.center.y + control_radius + CONTROL_GAP * zoom + radius;
            let count = NodeColor::PALETTE.len() as f32;
            let first_x = palette_button.center.x + control_radius - step * (count - 1.0) - radius;
            NodeColor::palette()
                .enumerate()
                .map(|(i, color)| {
                    let circle = Circle {
                        center: Pos2::new(first_x + step * i as f32, row_y),
                        radius,
                    };
                    (color, circle)
                })
                .collect()
        } else {
            Vec::new()
        };

        let handle = Circle {
            center: Pos2::new(rect.right(), rect.center().y),
            radius: HANDLE_RADIUS * zoom,
        };

        Self {
            id: node.id,
            rect,
            editor,
            palette_button,
            delete_button,
            swatches,
            handle,
            zoom,
        }
    }

    /// Area where a hovering pointer reveals the palette and delete buttons.
    /// Both buttons lie inside it.
    pub fn reveal_zone(&self) -> Rect {
        self.rect.expand(CONTROL_RADIUS * self.zoom)
    }

    /// Whether the palette and delete buttons are drawn for a pointer at
    /// `pointer`.
    pub fn controls_visible(&self, pointer: Option<Pos2>) -> bool {
        !self.swatches.is_empty() || pointer.is_some_and(|p| self.reveal_zone().contains(p))
    }

    /// What part of this node, if any, lies under `pos`.
    pub fn hit(&self, pos: Pos2) -> Option<HitTarget> {
        if self.handle.contains(pos) {
            return Some(HitTarget::ConnectionHandle(self.id));
        }
        let on_button = self.controls_visible(Some(pos))
            && (self.palette_button.contains(pos) || self.delete_button.contains(pos));
        let on_control = on_button
            || self.swatches.iter().any(|(_, c)| c.contains(pos))
            || self.editor.contains(pos);
        if on_control {
            return Some(HitTarget::NodeControl(self.id));
        }
        if self.rect.contains(pos) {
            return Some(HitTarget::NodeBody(self.id));
        }
        None
    }
}

/// Rough wrapped line count for the editor.
fn estimate_lines(content: &str, node_width: f32) -> usize {
    let per_line = (((node_width - PADDING * 2.0) / CHAR_WIDTH).floor() as usize).max(1);
    content
        .split('\n')
        .map(|line| line.chars().count().div_ceil(per_line).max(1))
        .sum::<usize>()
        .max(1)
}

/// Lay out every node of `board` in draw order.
pub fn layout_board(
    board: &Board,
    origin: Pos2,
    node_width: f32,
    picker_open: Option<NodeId>,
) -> Vec<NodeLayout> {
    board
        .nodes
        .iter()
        .map(|node| {
            NodeLayout::compute(
                node,
                &board.viewport,
                origin,
                node_width,
                picker_open == Some(node.id),
            )
        })
        .collect()
}

/// Classify a screen position against laid-out nodes, topmost first.
pub fn hit_test(layouts: &[NodeLayout], pos: Pos2) -> HitTarget {
    layouts
        .iter()
        .rev()
        .find_map(|layout| layout.hit(pos))
        .unwrap_or(HitTarget::Canvas)
}

// ==================== Rendering ====================

/// User action on a node's own controls.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeAction {
    Edit(String),
    TogglePicker,
    PickColor(NodeColor),
    Delete,
}

fn fill_color(color: &NodeColor) -> Color32 {
    let [r, g, b] = color.fill_rgb();
    Color32::from_rgb(r, g, b)
}

/// Paint one node and run its widgets. Returns the action triggered this
/// frame, if any.
pub fn show(ui: &mut Ui, layout: &NodeLayout, node: &Node) -> Option<NodeAction> {
    let zoom = layout.zoom;
    let painter = ui.painter().clone();
    let mut action = None;

    let shadow = layout.rect.translate(Vec2::new(0.0, 3.0 * zoom));
    painter.rect_filled(shadow, CORNER_RADIUS * zoom, Color32::from_black_alpha(50));
    painter.rect_filled(layout.rect, CORNER_RADIUS * zoom, fill_color(&node.color));

    let mut text = node.content.clone();
    let editor = egui::TextEdit::multiline(&mut text)
        .id(egui::Id::new(("board-node-editor", node.id)))
        .frame(false)
        .desired_width(layout.editor.width())
        .desired_rows(1)
        .font(egui::FontId::proportional(FONT_SIZE * zoom))
        .text_color(Color32::from_gray(40));
    if ui.put(layout.editor, editor).changed() {
        action = Some(NodeAction::Edit(text));
    }

    if layout.controls_visible(ui.ctx().pointer_hover_pos()) {
        if control_button(ui, &painter, layout.palette_button, ("palette", node.id), "🎨") {
            action = Some(NodeAction::TogglePicker);
        }
        if control_button(ui, &painter, layout.delete_button, ("delete", node.id), "🗑") {
            action = Some(NodeAction::Delete);
        }
    }

    for (color, circle) in &layout.swatches {
        let response = ui.interact(
            circle.bounding_rect(),
            egui::Id::new(("swatch", node.id, color.as_str())),
            egui::Sense::click(),
        );
        painter.circle_filled(circle.center, circle.radius, fill_color(color));
        let ring = if *color == node.color {
            Color32::from_rgb(59, 130, 246)
        } else {
            Color32::from_gray(120)
        };
        painter.circle_stroke(circle.center, circle.radius, Stroke::new(2.0, ring));
        if response.clicked() {
            action = Some(NodeAction::PickColor(color.clone()));
        }
    }

    let handle_hovered = ui
        .ctx()
        .pointer_hover_pos()
        .is_some_and(|p| layout.handle.contains(p));
    let handle_radius = if handle_hovered {
        layout.handle.radius * 1.25
    } else {
        layout.handle.radius
    };
    painter.circle_filled(layout.handle.center, handle_radius, Color32::from_gray(110));
    painter.circle_stroke(
        layout.handle.center,
        handle_radius,
        Stroke::new(2.0, Color32::WHITE),
    );

    action
}

fn control_button(
    ui: &mut Ui,
    painter: &egui::Painter,
    circle: Circle,
    id: (&str, NodeId),
    icon: &str,
) -> bool {
    let response = ui.interact(circle.bounding_rect(), egui::Id::new(id), egui::Sense::click());
    let fill = if response.hovered() {
        Color32::from_gray(235)
    } else {
        Color32::from_gray(250)
    };
    painter.circle_filled(circle.center, circle.radius, fill);
    painter.text(
        circle.center,
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(circle.radius),
        Color32::from_gray(60),
    );
    response.on_hover_text(if id.0 == "delete" { "Delete note" } else { "Change color" })
        .clicked()
}
