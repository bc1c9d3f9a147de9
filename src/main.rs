// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Cardforge - Main Entry Point
//!
//! A student ID card designer with a live preview and PNG/PDF downloads.
//! Built with Rust and egui.

mod app;
mod card;
mod config;
mod error;
mod export;
mod files;
mod fonts;
mod render;
mod state;
mod theme;
mod ui;

use app::CardforgeApp;
use config::load_config;
use log::info;

/// Application name constant.
const APP_NAME: &str = "Cardforge";

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    // Load settings to get window configuration
    let settings = load_config();
    let window_size = &settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let mut viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([760.0, 560.0])
        .with_drag_and_drop(true);

    // Apply position if saved
    if let (Some(x), Some(y)) = (window_size.x, window_size.y) {
        viewport = viewport.with_position([x, y]);
    }

    if window_size.maximized {
        viewport = viewport.with_maximized(true);
    }

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(|cc| Ok(Box::new(CardforgeApp::new(cc)))),
    )
}
