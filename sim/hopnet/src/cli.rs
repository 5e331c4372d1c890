//! Parses the command line arguments.
//!
//! Basic usage for running a topology file with logging on:
//!
//! `cargo run -- --config topology.txt --log`
//!
//! Without `--config` the four router reference topology is used and the
//! networks of each router are asked for at the console.

use crate::{
    console::{Console, ConsoleError},
    ndl::load_controller,
};
use clap::Parser;
use hopnet_core::{route_cache::DEFAULT_CAPACITY, Controller, Topology};
use std::{
    fs::{create_dir_all, OpenOptions},
    io,
    path::Path,
    sync::Arc,
};
use tracing_subscriber::FmtSubscriber;

/// Stores the different command line arguments.
#[derive(Parser)]
struct Args {
    ///Logging flag. Used to turn logging on or off.
    #[arg(short, long)]
    log: bool,
    ///File path to the topology file to route on
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Could not open the log file: {0}")]
    Io(#[from] io::Error),
    #[error("A logger is already installed: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Parses command line arguments and runs the console session they describe.
pub async fn initialize_from_arguments() {
    let args = Args::parse();
    // Capture log flag for turning logging on or off
    if args.log {
        if let Err(e) = initialize_logging() {
            eprintln!("{e}");
        }
    }

    let mut console = Console::stdio();
    let controller = match args.config {
        Some(path) => match Path::new(&path).try_exists() {
            Ok(true) => load_controller(&path),
            Ok(false) => Err(format!("Provided file: '{path}' not found")),
            Err(e) => Err(e.to_string()),
        },
        None => console
            .read_networks(Topology::reference())
            .await
            .map(|topology| Controller::new(topology, DEFAULT_CAPACITY))
            .map_err(|e| e.to_string()),
    };

    let mut controller = match controller {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    match console.run(&mut controller).await {
        Ok(()) => {}
        Err(ConsoleError::Closed) => tracing::info!("Console input closed"),
        Err(e) => eprintln!("{e}"),
    }
}

/// Initializes the event protocol. Only should be called once when the program starts.
/// Allows for event! to be called and writes to a log file in ./logs.
fn initialize_logging() -> Result<(), LoggingError> {
    let main_path = "./logs";
    create_dir_all(main_path)?;
    let file_path = format!(
        "{}/debug-{}.log",
        main_path,
        chrono::offset::Local::now().format("%y-%m-%d_%H-%M-%S")
    );
    let file = OpenOptions::new()
        .write(true)
        .append(true)
        .create(true)
        .open(file_path)?;
    let subscriber = FmtSubscriber::builder()
        .with_writer(Arc::new(file))
        .json()
        .finish();
    // set the global default so all events/logs go to the same subscriber and
    // subsequently the same file
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
