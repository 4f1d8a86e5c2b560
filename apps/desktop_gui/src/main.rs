//! Desktop client for the character image gallery.

mod backend_bridge;
mod controller;
mod settings;
mod ui;

use anyhow::Context as _;
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::commands::BackendCommand;
use client_core::GalleryClient;
use controller::events::UiEvent;
use shared::catalog::CatalogDocument;
use ui::GalleryApp;

#[derive(Debug, Parser)]
#[command(name = "gallery-desktop", about = "Desktop client for the character image gallery")]
struct Cli {
    /// Settings file to read before applying environment overrides.
    #[arg(long, default_value = settings::DEFAULT_CONFIG_PATH)]
    config: String,
    /// Catalog document, overriding the settings file.
    #[arg(long)]
    catalog: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();
    let mut settings = settings::load_settings(&cli.config);
    if let Some(catalog) = cli.catalog {
        settings.catalog_path = catalog;
    }

    let catalog = match load_catalog(&settings.catalog_path) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::error!("cannot start without a catalog document: {err:#}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        characters = catalog.characters.len(),
        hero_slides = catalog.hero_slides.len(),
        wired = settings.context.is_some(),
        "catalog loaded"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);

    match settings.context.clone() {
        Some(context) => backend_bridge::runtime::launch(GalleryClient::new(context), cmd_rx, ui_tx),
        None => tracing::warn!("no page context configured; generation and gallery stay disabled"),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Galería de Personajes")
            .with_inner_size([1180.0, 780.0])
            .with_min_inner_size([480.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Galería de Personajes",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(GalleryApp::new(
                cmd_tx,
                ui_rx,
                catalog,
                settings.context,
            )))
        }),
    )
}

fn load_catalog(path: &str) -> anyhow::Result<CatalogDocument> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog document '{path}'"))?;
    Ok(CatalogDocument::from_json(&raw)?)
}
