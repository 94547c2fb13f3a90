//! Board pane: the full-screen brainstorm canvas.
//!
//! Owns the [`BoardController`] plus the UI-local bits it does not care
//! about (active touches, which node's color picker is open, where the
//! floating controls sit). Each frame it:
//! 1. translates raw egui events into canvas-local [`InputEvent`]s
//! 2. feeds them through the controller
//! 3. paints grid, edges, the pending edge and the nodes
//! 4. applies node control actions

use egui::{Color32, Pos2, Rect, Stroke, Ui, Vec2};

use crate::board::{Board, NodeId, Point};
use crate::canvas::{BoardController, BoardHost, InputEvent, Modifiers, PointerButton};
use crate::config::CanvasSettings;
use crate::frontend::node_view::{self, NodeAction, NodeLayout};

/// Below this on-screen spacing the grid is skipped.
const MIN_GRID_SCREEN_SPACING: f32 = 6.0;

const HELP_TEXT: &str =
    "Middle-drag or Alt+drag to pan · Scroll or pinch to zoom · Drag the dot on a note to connect";

pub struct BoardPane {
    controller: BoardController,
    touches: Vec<(egui::TouchId, Point)>,
    picker_open: Option<NodeId>,
    /// Floating control areas from the previous frame; presses there never
    /// reach the canvas.
    overlay_rects: Vec<Rect>,
    canvas_rect: Rect,
}

impl BoardPane {
    pub fn new(settings: CanvasSettings) -> Self {
        Self::with_controller(BoardController::new(settings))
    }

    pub fn with_controller(controller: BoardController) -> Self {
        Self {
            controller,
            touches: Vec::new(),
            picker_open: None,
            overlay_rects: Vec::new(),
            canvas_rect: Rect::NOTHING,
        }
    }

    pub fn controller(&self) -> &BoardController {
        &self.controller
    }

    pub fn is_open(&self) -> bool {
        self.controller.is_open()
    }

    pub fn open(&mut self) {
        self.controller.open();
    }

    pub fn close(&mut self) {
        self.controller.close();
        self.touches.clear();
        self.picker_open = None;
    }

    /// Last known canvas size, falling back to `fallback` before the first
    /// frame has laid the canvas out.
    pub fn canvas_size_or(&self, fallback: Vec2) -> Point {
        let size = if self.canvas_rect.is_positive() {
            self.canvas_rect.size()
        } else {
            fallback
        };
        Point::new(size.x as f64, size.y as f64)
    }

    /// Add external content as a note and open the board.
    pub fn send_to_board(&mut self, host: &mut dyn BoardHost, screen: Vec2, text: &str) -> NodeId {
        let size = self.canvas_size_or(screen);
        self.controller.send_to_board(host, size, text)
    }

    pub fn show(&mut self, ctx: &egui::Context, host: &mut dyn BoardHost) {
        if !self.is_open() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.close();
            return;
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(Color32::from_rgb(245, 245, 240)))
            .show(ctx, |ui| self.canvas_ui(ui, host));

        if self.is_open() {
            self.controls_ui(ctx, host);
        }
        if !self.controller.gesture().is_idle() {
            ctx.request_repaint();
        }
    }

    fn canvas_ui(&mut self, ui: &mut Ui, host: &mut dyn BoardHost) {
        let (canvas_rect, _) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
        self.canvas_rect = canvas_rect;
        let node_width = self.controller.settings().node_width as f32;

        let layouts = node_view::layout_board(
            host.current_board(),
            canvas_rect.min,
            node_width,
            self.picker_open,
        );
        let inputs = self.collect_input(ui, &layouts);
        for input in &inputs {
            self.controller.handle_event(host, input);
        }

        let board = host.current_board();
        let layouts = if inputs.is_empty() {
            layouts
        } else {
            node_view::layout_board(board, canvas_rect.min, node_width, self.picker_open)
        };

        let painter = ui.painter_at(canvas_rect);
        self.paint_grid(&painter, board);
        paint_edges(&painter, board, &layouts);
        if let Some((from, pointer)) = self.controller.pending_edge(board) {
            let from = self.to_pos2(from);
            let to = self.to_pos2(pointer);
            painter.extend(egui::Shape::dashed_line(
                &[from, to],
                Stroke::new(2.0, Color32::from_gray(110)),
                8.0,
                6.0,
            ));
        }

        let mut actions = Vec::new();
        for (node, layout) in board.nodes.iter().zip(&layouts) {
            if let Some(action) = node_view::show(ui, layout, node) {
                actions.push((node.id, action));
            }
        }
        for (id, action) in actions {
            self.apply_node_action(host, id, action);
        }

        painter.text(
            canvas_rect.center_bottom() - Vec2::new(0.0, 16.0),
            egui::Align2::CENTER_BOTTOM,
            HELP_TEXT,
            egui::FontId::proportional(12.0),
            Color32::from_gray(120),
        );
    }

    fn controls_ui(&mut self, ctx: &egui::Context, host: &mut dyn BoardHost) {
        self.overlay_rects.clear();
        let canvas_rect = self.canvas_rect;

        let tools = egui::Area::new(egui::Id::new("board-tools"))
            .order(egui::Order::Foreground)
            .fixed_pos(canvas_rect.left_top() + Vec2::new(16.0, 16.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("➕").on_hover_text("Add New Note").clicked() {
                            let size = self.canvas_size_or(canvas_rect.size());
                            self.controller.add_new_idea(host, size);
                        }
                        if ui.button("⟲").on_hover_text("Reset View").clicked() {
                            self.controller.reset_view(host);
                        }
                        let zoom = host.current_board().viewport.zoom;
                        ui.label(format!("{:.0}%", zoom * 100.0));
                    });
                });
            });
        self.overlay_rects.push(tools.response.rect);

        let close = egui::Area::new(egui::Id::new("board-close"))
            .order(egui::Order::Foreground)
            .fixed_pos(canvas_rect.right_top() + Vec2::new(-56.0, 16.0))
            .show(ctx, |ui| {
                ui.button("✖")
                    .on_hover_text("Close Board (Esc)")
                    .clicked()
            });
        self.overlay_rects.push(close.response.rect);
        if close.inner {
            self.close();
        }
    }

    // ==================== Input ====================

    fn to_local(&self, pos: Pos2) -> Point {
        let local = pos - self.canvas_rect.min;
        Point::new(local.x as f64, local.y as f64)
    }

    fn to_pos2(&self, local: Point) -> Pos2 {
        self.canvas_rect.min + Vec2::new(local.x as f32, local.y as f32)
    }

    fn is_on_overlay(&self, pos: Pos2) -> bool {
        self.overlay_rects.iter().any(|r| r.contains(pos))
    }

    fn touch_points(&self) -> Vec<Point> {
        self.touches.iter().map(|(_, p)| *p).collect()
    }

    fn collect_input(&mut self, ui: &Ui, layouts: &[NodeLayout]) -> Vec<InputEvent> {
        let (events, hover) = ui.input(|i| (i.events.clone(), i.pointer.latest_pos()));
        let mut inputs = Vec::new();

        for event in events {
            match event {
                egui::Event::Touch { id, phase, pos, .. } => {
                    if let Some(input) = self.translate_touch(id, phase, pos, layouts) {
                        inputs.push(input);
                    }
                }
                // egui mirrors the primary touch as pointer events.
                _ if !self.touches.is_empty() => {}
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed: true,
                    modifiers,
                    ..
                } => {
                    if !self.canvas_rect.contains(pos) || self.is_on_overlay(pos) {
                        continue;
                    }
                    let Some(button) = map_button(button) else {
                        continue;
                    };
                    inputs.push(InputEvent::PointerDown {
                        pos: self.to_local(pos),
                        button,
                        modifiers: Modifiers {
                            alt: modifiers.alt,
                            shift: modifiers.shift,
                            ctrl: modifiers.ctrl || modifiers.command,
                        },
                        target: node_view::hit_test(layouts, pos),
                    });
                }
                egui::Event::PointerButton {
                    pos,
                    pressed: false,
                    ..
                } => inputs.push(InputEvent::PointerUp {
                    pos: self.to_local(pos),
                    target: node_view::hit_test(layouts, pos),
                }),
                egui::Event::PointerMoved(pos) => inputs.push(InputEvent::PointerMove {
                    pos: self.to_local(pos),
                }),
                egui::Event::PointerGone => inputs.push(InputEvent::PointerCancel),
                egui::Event::MouseWheel { delta, .. } => {
                    let Some(pos) = hover else { continue };
                    if self.canvas_rect.contains(pos) && !self.is_on_overlay(pos) && delta.y != 0.0 {
                        // egui reports wheel-up as positive y.
                        inputs.push(InputEvent::Wheel {
                            pos: self.to_local(pos),
                            delta_y: -delta.y as f64,
                        });
                    }
                }
                _ => {}
            }
        }
        inputs
    }

    fn translate_touch(
        &mut self,
        id: egui::TouchId,
        phase: egui::TouchPhase,
        pos: Pos2,
        layouts: &[NodeLayout],
    ) -> Option<InputEvent> {
        let local = self.to_local(pos);
        match phase {
            egui::TouchPhase::Start => {
                if !self.canvas_rect.contains(pos) || self.is_on_overlay(pos) {
                    return None;
                }
                self.touches.push((id, local));
                Some(InputEvent::TouchStart {
                    touches: self.touch_points(),
                    target: node_view::hit_test(layouts, pos),
                })
            }
            egui::TouchPhase::Move => {
                let touch = self.touches.iter_mut().find(|(t, _)| *t == id)?;
                touch.1 = local;
                Some(InputEvent::TouchMove {
                    touches: self.touch_points(),
                })
            }
            egui::TouchPhase::End => {
                let index = self.touches.iter().position(|(t, _)| *t == id)?;
                self.touches.remove(index);
                Some(InputEvent::TouchEnd {
                    touches: self.touch_points(),
                    target: node_view::hit_test(layouts, pos),
                })
            }
            egui::TouchPhase::Cancel => {
                self.touches.retain(|(t, _)| *t != id);
                Some(InputEvent::PointerCancel)
            }
        }
    }

    // ==================== Actions ====================

    fn apply_node_action(&mut self, host: &mut dyn BoardHost, id: NodeId, action: NodeAction) {
        match action {
            NodeAction::Edit(text) => self.controller.update_node_content(host, id, text),
            NodeAction::TogglePicker => {
                self.picker_open = if self.picker_open == Some(id) {
                    None
                } else {
                    Some(id)
                };
            }
            NodeAction::PickColor(color) => {
                self.controller.change_node_color(host, id, color);
                self.picker_open = None;
            }
            NodeAction::Delete => {
                self.controller.delete_node(host, id);
                if self.picker_open == Some(id) {
                    self.picker_open = None;
                }
            }
        }
    }

    // ==================== Painting ====================

    fn paint_grid(&self, painter: &egui::Painter, board: &Board) {
        let viewport = &board.viewport;
        let spacing = (self.controller.settings().grid_spacing * viewport.zoom) as f32;
        if spacing < MIN_GRID_SCREEN_SPACING {
            return;
        }

        let rect = self.canvas_rect;
        let offset = Vec2::new(
            (viewport.pan.x as f32).rem_euclid(spacing),
            (viewport.pan.y as f32).rem_euclid(spacing),
        );
        let dot = Color32::from_gray(200);
        let mut y = rect.top() + offset.y;
        while y < rect.bottom() {
            let mut x = rect.left() + offset.x;
            while x < rect.right() {
                painter.circle_filled(Pos2::new(x, y), 1.0, dot);
                x += spacing;
            }
            y += spacing;
        }
    }
}

fn paint_edges(painter: &egui::Painter, board: &Board, layouts: &[NodeLayout]) {
    let stroke = Stroke::new(2.0, Color32::from_gray(140));
    for edge in &board.edges {
        let from = layouts.iter().find(|l| l.id == edge.from);
        let to = layouts.iter().find(|l| l.id == edge.to);
        if let (Some(from), Some(to)) = (from, to) {
            painter.line_segment([from.rect.center(), to.rect.center()], stroke);
        }
    }
}

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}
