// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! mdview - Main Entry Point
//!
//! A markdown viewer and editor with live highlighting and synchronized
//! split-view scrolling. Built with Rust and egui.

mod app;
mod commands;
mod config;
mod editor;
mod error;
mod files;
mod markdown;
mod mode;
mod preview;
mod state;
mod string_utils;
mod theme;

use std::path::PathBuf;

use app::{MdViewApp, APP_NAME};
use config::load_config;
use log::info;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    // Optional document to open at startup
    let initial_path = std::env::args_os().nth(1).map(PathBuf::from);
    if let Some(path) = &initial_path {
        info!("Opening {} from the command line", path.display());
    }

    let settings = load_config();
    let window_size = settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let mut viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([400.0, 300.0])
        .with_drag_and_drop(true);

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
        Box::new(move |cc| Ok(Box::new(MdViewApp::new(cc, settings, initial_path)))),
    )
}
