mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::ContactDeskApp;

#[derive(Debug, Parser)]
#[command(name = "contact-desk", about = "Desktop contact manager")]
struct Args {
    /// Base URL of the contact backend.
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(args.server_url, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Contact Desk")
            .with_inner_size([560.0, 640.0])
            .with_min_inner_size([420.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Contact Desk",
        options,
        Box::new(|_cc| Ok(Box::new(ContactDeskApp::bootstrap(cmd_tx, ui_rx)))),
    )
}
