use eframe::egui;
use std::path::PathBuf;

use smash_waldo::app::EditorApp;
use smash_waldo::config::EditorConfig;

const TITLE: &str = "Smash Waldo editor";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EditorConfig::load_from_file().unwrap_or_else(|e| {
        log::warn!("{e}; using default configuration");
        EditorConfig::default()
    });

    let image_path = std::env::args().nth(1).map(PathBuf::from);
    if let Some(path) = &image_path {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1600.0, 900.0])
            .with_title(TITLE),
        ..Default::default()
    };

    eframe::run_native(
        TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(EditorApp::new(config, image_path)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run editor: {e}"))
}
