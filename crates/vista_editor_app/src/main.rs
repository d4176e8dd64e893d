// SPDX-License-Identifier: MIT OR Apache-2.0
//! Vista Editor - keyframe animation editor
//!
//! Features:
//! - Timeline with per-track and per-keyframe editing
//! - Playback mixer posing a scene graph
//! - Undo/redo of every clip edit
//! - RON clip files and editor settings
//!
//! ## Usage
//!
//! `vista_editor [settings.ron]`. Without an argument the settings are read
//! from `vista_editor.ron` in the working directory.

mod animation_editor;
mod app;
mod history;
mod settings;
mod theme;

use app::EditorApp;
use settings::EditorSettings;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["vista_editor_app=debug", "wgpu=warn", "naga=warn"] {
        match directive.parse() {
            Ok(directive) => env_filter = env_filter.add_directive(directive),
            Err(err) => eprintln!("Invalid log directive {directive}: {err}"),
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Vista Editor v{}", env!("CARGO_PKG_VERSION"));

    let settings_path = EditorSettings::path_from_args(std::env::args());
    let settings = match EditorSettings::load_or_default(&settings_path) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("Ignoring settings at {}: {err}", settings_path.display());
            EditorSettings::default()
        }
    };

    if let Err(e) = EditorApp::run(settings, settings_path) {
        tracing::error!("Editor crashed: {e}");
        std::process::exit(1);
    }
}
