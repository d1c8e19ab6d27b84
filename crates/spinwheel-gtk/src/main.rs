use clap::Parser;
use relm4::prelude::*;
use spinwheel_gtk::config;
use spinwheel_gtk::gui::app::{AppInit, AppModel};
use spinwheel_gtk::sys::runtime;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "A spinning prize wheel")]
struct Args {
    /// Config file to use instead of the per-user one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible sequence of spins
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config_path = config::resolve_config_path(args.config)?;
    let wheel = config::load_or_setup(&config_path);
    log::info!(
        "Loaded {} outcomes from {}",
        wheel.outcomes.len(),
        config_path.display()
    );

    let (tx, rx) = async_channel::bounded(32);
    let (fetch_tx, fetch_rx) = async_channel::unbounded();

    // Start Background Services
    runtime::start_background_services(tx.clone(), config_path.clone(), fetch_rx);

    // GTK must not see our own flags
    let app = RelmApp::new("org.spinwheel.app").with_args(Vec::new());

    app.run::<AppModel>(AppInit {
        config: wheel,
        config_path,
        seed: args.seed,
        rx,
        fetch_tx,
    });
    Ok(())
}
