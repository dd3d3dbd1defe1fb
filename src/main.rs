mod app;
mod config;
mod error;
mod upload;
mod utils;

use app::PromptUploader;
use config::ConnectionSettings;
use eframe::CreationContext;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let connection = ConnectionSettings::from_env()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([720.0, 760.0])
            .with_min_inner_size([480.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Prompt File Uploader",
        options,
        Box::new(move |cc: &CreationContext| {
            Box::new(PromptUploader::new(cc, runtime, connection))
        }),
    )?;

    Ok(())
}
