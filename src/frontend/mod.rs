//! Frontend module for egui UI
//!
//! A reference eframe host for the canvas engine. The left panel lists chat
//! sessions and has a small composer whose text can be sent to the current
//! session's board; the board itself opens full screen over the central
//! area.
//!
//! # Main Types
//!
//! - [`BoardApp`] - Main application state implementing [`eframe::App`]
//! - [`BoardPane`] - Canvas rendering and raw input translation
//!
//! # Submodules
//!
//! - [`board_pane`] - The canvas: grid, edges, nodes, floating controls
//! - [`node_view`] - Node layout, hit testing and node widgets

pub mod board_pane;
pub mod node_view;

pub use board_pane::BoardPane;

use crate::config::CanvasSettings;
use crate::session::{SessionId, SessionStore};

/// Actions raised by the side panel, applied after it has been drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    NewSession,
    SelectSession(SessionId),
    DeleteSession(SessionId),
    RenameSession(SessionId, String),
    SendToBoard(String),
    OpenBoard,
    ClearHistory,
}

pub struct BoardApp {
    store: SessionStore,
    pane: BoardPane,
    /// Composer text
    draft: String,
    /// Session being renamed and its edit buffer
    renaming: Option<(SessionId, String)>,
}

impl BoardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        settings: CanvasSettings,
        store: SessionStore,
    ) -> Self {
        Self::with_parts(BoardPane::new(settings), store)
    }

    pub fn with_parts(pane: BoardPane, mut store: SessionStore) -> Self {
        store.ensure_current();
        Self {
            store,
            pane,
            draft: String::new(),
            renaming: None,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn pane(&self) -> &BoardPane {
        &self.pane
    }

    /// Apply one side panel action. `screen` is the window size, used as the
    /// canvas size before the board has been shown once.
    pub fn handle_action(&mut self, action: AppAction, screen: egui::Vec2) {
        tracing::debug!(?action, "Handling app action");
        match action {
            AppAction::NewSession => {
                self.store.new_session(None);
                self.pane.close();
            }
            AppAction::SelectSession(id) => {
                if self.store.current_id() != Some(id) && self.store.select(id) {
                    self.pane.close();
                }
            }
            AppAction::DeleteSession(id) => {
                let was_current = self.store.current_id() == Some(id);
                self.store.delete(id);
                if was_current {
                    self.pane.close();
                }
            }
            AppAction::RenameSession(id, title) => {
                self.store.rename(id, &title);
            }
            AppAction::SendToBoard(text) => {
                if text.trim().is_empty() {
                    return;
                }
                self.store.ensure_current();
                self.pane.send_to_board(&mut self.store, screen, &text);
            }
            AppAction::OpenBoard => {
                self.store.ensure_current();
                self.pane.open();
            }
            AppAction::ClearHistory => {
                self.store.clear();
                self.pane.close();
            }
        }
    }

    fn sessions_panel(&mut self, ui: &mut egui::Ui) -> Vec<AppAction> {
        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            ui.heading("Sessions");
            if ui.button("➕ New").clicked() {
                actions.push(AppAction::NewSession);
            }
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .max_height(ui.available_height() * 0.6)
            .show(ui, |ui| {
                let current = self.store.current_id();
                for session in self.store.sessions() {
                    ui.horizontal(|ui| {
                        let editing = self
                            .renaming
                            .as_mut()
                            .filter(|(id, _)| *id == session.id);
                        if let Some((id, buffer)) = editing {
                            let response = ui.text_edit_singleline(buffer);
                            if response.lost_focus() {
                                actions.push(AppAction::RenameSession(*id, buffer.clone()));
                            }
                            return;
                        }

                        let nodes = session.board.as_ref().map_or(0, |b| b.nodes.len());
                        let label = format!("{} ({})", session.title, nodes);
                        let response = ui.selectable_label(current == Some(session.id), label);
                        if response.clicked() {
                            actions.push(AppAction::SelectSession(session.id));
                        }
                        if response.double_clicked() {
                            self.renaming = Some((session.id, session.title.clone()));
                        }
                        if ui.small_button("🗑").on_hover_text("Delete session").clicked() {
                            actions.push(AppAction::DeleteSession(session.id));
                        }
                    });
                }
            });

        ui.separator();
        ui.label("Add to board");
        ui.add(
            egui::TextEdit::multiline(&mut self.draft)
                .desired_rows(4)
                .hint_text("Type an idea..."),
        );
        ui.horizontal(|ui| {
            let can_send = !self.draft.trim().is_empty();
            if ui
                .add_enabled(can_send, egui::Button::new("Send to board"))
                .clicked()
            {
                actions.push(AppAction::SendToBoard(std::mem::take(&mut self.draft)));
            }
            if ui.button("Open board").clicked() {
                actions.push(AppAction::OpenBoard);
            }
        });

        ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
            if ui.button("Clear history").clicked() {
                actions.push(AppAction::ClearHistory);
            }
        });

        actions
    }
}

impl eframe::App for BoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let screen = ctx.available_rect().size();

        let actions = egui::SidePanel::left("sessions")
            .default_width(240.0)
            .show(ctx, |ui| self.sessions_panel(ui))
            .inner;
        if actions
            .iter()
            .any(|a| matches!(a, AppAction::RenameSession(..)))
        {
            self.renaming = None;
        }
        for action in actions {
            self.handle_action(action, screen);
        }

        if self.pane.is_open() {
            self.pane.show(ctx, &mut self.store);
        } else {
            let open_clicked = egui::CentralPanel::default()
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() * 0.4);
                        let title = self
                            .store
                            .current()
                            .map_or("No session", |s| s.title.as_str());
                        ui.heading(title);
                        ui.button("Open brainstorm board").clicked()
                    })
                    .inner
                })
                .inner;
            if open_clicked {
                self.handle_action(AppAction::OpenBoard, screen);
            }
        }

        self.store.save_if_dirty();
        if self.store.is_dirty() {
            // A deferred save still needs a frame once the interval passes.
            ctx.request_repaint_after(self.store.save_interval());
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.store.save() {
            tracing::warn!("Failed to save sessions on exit: {}", e);
        }
    }
}
