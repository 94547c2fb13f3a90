//! Brainstorm Board - Main Entry Point
//!
//! Opens the reference desktop host: a session list with a composer on the
//! left and the brainstorm canvas over the central area.

use brainstorm_board::{config::CanvasSettings, frontend::BoardApp, session::SessionStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,brainstorm_board=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Brainstorm Board");

    let settings = CanvasSettings::load_or_default();
    let store = SessionStore::open_default();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Brainstorm Board"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Brainstorm Board",
        native_options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(BoardApp::new(cc, settings, store)))
        }),
    );

    tracing::info!("Shutting down...");
    result
}
