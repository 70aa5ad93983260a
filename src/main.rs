//! battilde-client binary: connect, run one session, report how it ended.

use battilde_client::producer::CrosstermKeys;
use battilde_client::{
    channel, logging, transport, Address, Client, ClientConfig, ClientError, InputReader, Keybindings, Listener,
    MessageLog, ResizeNotifier, TerminalDisplay,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Terminal client for the battilde multiplayer roguelike.
#[derive(Debug, Parser)]
#[command(name = "battilde-client", version, about)]
struct Args {
    /// Player name (defaults to $USER).
    #[arg(short, long)]
    name: Option<String>,

    /// Server address: inet:HOST:PORT, unix:PATH, abstract:NAME or HOST:PORT.
    #[arg(short, long, default_value = battilde_client::config::DEFAULT_ADDRESS)]
    address: Address,

    /// JSON key bindings file.
    #[arg(short, long)]
    keybindings: Option<PathBuf>,

    /// Append the message log to this file.
    #[arg(short, long)]
    log_file: Option<PathBuf>,

    /// Write diagnostics to this file.
    #[arg(long)]
    trace_file: Option<PathBuf>,

    /// Draw on the main screen instead of the alternate screen.
    #[arg(long)]
    no_alternate_screen: bool,
}

impl From<Args> for ClientConfig {
    fn from(args: Args) -> Self {
        let defaults = Self::default();
        Self {
            name: args.name.unwrap_or(defaults.name),
            address: args.address,
            keybindings: args.keybindings,
            log_file: args.log_file,
            trace_file: args.trace_file.unwrap_or(defaults.trace_file),
            alternate_screen: !args.no_alternate_screen,
        }
    }
}

fn main() -> ExitCode {
    let config = ClientConfig::from(Args::parse());

    match run(&config) {
        Ok(close_message) => {
            if let Some(message) = close_message {
                println!("{message}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "session failed");
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(config: &ClientConfig) -> Result<Option<String>, ClientError> {
    logging::init_tracing(&config.trace_file)?;
    info!(address = %config.address, name = %config.name, "starting");

    let bindings = match &config.keybindings {
        Some(path) => Keybindings::from_path(path)?,
        None => Keybindings::default(),
    };
    let (source, sink) = transport::connect(&config.address)?;

    let display = TerminalDisplay::new(config.alternate_screen)?;
    let (events, receiver) = channel();

    // Producers are detached; the session ends when the loop stops reading.
    Listener::spawn(source, events.clone())?;
    InputReader::spawn(CrosstermKeys, events.clone())?;
    ResizeNotifier::spawn(events)?;

    let message_log = MessageLog::new(config.log_file.clone());
    if let Some(path) = message_log.path() {
        info!(path = %path.display(), "appending messages to log file");
    }

    let mut client = Client::new(display, sink, bindings, message_log);
    client.join(&config.name)?;
    let result = client.run(&receiver);

    // Restore the terminal before anything is printed.
    drop(client);
    result
}
