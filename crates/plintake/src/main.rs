//! plintake entry point

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use log::{error, info, warn};

use plintake::logging::{init_logging, LogFormat};
use plintake::{config, Database, IntakeSettings, Poller, PollerOptions};

/// Watch a channel's folders for new playlist files and process them.
#[derive(Parser, Debug)]
#[command(name = "plintake")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Customer name (configuration file name without the .ini extension)
    #[arg(short, long, value_name = "NAME")]
    customer: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The customer file configures the log files.
    let settings = match config::load(&cli.customer) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(LogFormat::from_env(), &settings.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting plintake v{} for customer {}", env!("CARGO_PKG_VERSION"), cli.customer.trim());

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &IntakeSettings) -> plintake::Result<()> {
    let connection = settings.connection();

    let db = Database::open(&connection.database_path)?;
    let poller = Poller::bootstrap(
        db,
        connection.channel_id.as_deref(),
        PollerOptions::from_settings(settings),
    )?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Interrupt received, finishing current pass");
        flag.store(true, Ordering::Relaxed);
    }) {
        warn!("Failed to install interrupt handler: {}", e);
    }

    let summary = poller.run(&shutdown)?;
    info!(
        "Stopped after {} pass(es): {} accepted, {} rejected, {} move failure(s)",
        summary.passes, summary.totals.accepted, summary.totals.rejected, summary.totals.move_failed
    );
    Ok(())
}
