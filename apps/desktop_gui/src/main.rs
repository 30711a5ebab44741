mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::CustomerListApp;

#[derive(Parser, Debug)]
struct Args {
    /// Base url of the customer service, overrides customers.toml and env.
    #[arg(long)]
    server_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();
    let settings = load_settings().with_base_url(args.server_url);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Customers")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([980.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Customers",
        options,
        Box::new(|_cc| Ok(Box::new(CustomerListApp::new(cmd_tx, ui_rx)))),
    )
}
