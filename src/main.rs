mod app;

use app::{FlashcardsApp, install_cjk_font};
use std::sync::Arc;
use tarjetas_app::api::{ApiClient, StatReporter};
use tarjetas_app::config::Config;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("{}; using default configuration", e);
        Config::default()
    });
    log::info!("using flashcard server at {}", config.server_url);

    let client = Arc::new(
        ApiClient::from_config(&config).expect("Failed to create HTTP client"),
    );

    let stats_client = Arc::clone(&client);
    let reporter = StatReporter::spawn(move |delta| stats_client.post_stat(delta));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([640.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Flashcards de Japonés",
        options,
        Box::new(|cc| {
            install_cjk_font(&cc.egui_ctx, &config);
            Ok(Box::new(FlashcardsApp::new(config, client, reporter)))
        }),
    )
}
