mod app;
use flashcards_app::*;

use app::MyApp;
use config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Using default configuration: {:#}", e);
        AppConfig::default()
    });

    let store = FlashcardStore::new(config.data_file());
    tracing::info!("Using flashcard document {}", store.path().display());

    match store.list_groups() {
        Ok(groups) => {
            tracing::info!("Loaded {} groups", groups.len());
            for group in &groups {
                tracing::info!("  - {} ({} cards)", group.name, group.flashcards.len());
            }
        }
        Err(e) => tracing::error!("{}", e),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(config.window_size),
        ..Default::default()
    };
    eframe::run_native(
        "Flashcards",
        options,
        Box::new(|_cc| Ok(Box::new(MyApp::new(store)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
