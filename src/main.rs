mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use app::LifeSureApp;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    log::info!("Loading dataset from {}", config.dataset_path.display());

    let dataset = match data::loader::load_file(&config.dataset_path) {
        Ok(ds) => ds,
        Err(e) => {
            log::error!("Failed to load dataset: {e:?}");
            return Err(e);
        }
    };
    log::info!(
        "Loaded {} records, regions {:?}, ages {:?}",
        dataset.len(),
        dataset.regions(),
        dataset.age_bounds()
    );

    let state = AppState::new(Arc::new(dataset), &config.default_region);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 1000.0])
            .with_min_inner_size([900.0, 700.0]),
        ..Default::default()
    };

    eframe::run_native(
        "LifeSure Insurance Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(LifeSureApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the dashboard window")
}
