mod chat_cmd;
mod terminal_output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use triage_config::ClientConfig;
use triage_controller::{ConversationController, ResetOutcome};
use triage_core::{ConfirmationGate, StaticAnswer, Transport};
use triage_session::{FileStore, SessionIdentity};
use triage_transport::HttpTransport;

use chat_cmd::StdinGate;
use terminal_output::{note_error, note_info, note_success, note_warn, TerminalView};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Terminal client for the symptom triage chat service")]
#[command(version)]
struct Cli {
    /// Config file (defaults to TRIAGE_CONFIG, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive conversation
    Chat,
    /// Forget the current conversation and start a new session
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the current session token
    Session,
    /// Probe the chat service
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(triage_config::config_file_path);
    let config = triage_config::load_and_prepare(&config_path).await?;

    triage_logging::init_logger(config.log_dir.as_deref(), &config.log_level);
    info!(base_url = %config.base_url, locale = %config.locale, "Starting triage client");

    let transport = Arc::new(HttpTransport::new(config.base_url.clone()));

    match cli.command {
        Commands::Chat => {
            let controller = build_controller(&config, transport.clone())?;
            chat_cmd::run(controller, transport).await?;
        }
        Commands::Reset { yes } => {
            let mut controller = build_controller(&config, transport)?;
            let gate: Box<dyn ConfirmationGate> = if yes {
                Box::new(StaticAnswer(true))
            } else {
                Box::new(StdinGate)
            };
            match controller.reset_session(&*gate).await {
                ResetOutcome::Cancelled => note_info("Reset cancelled"),
                ResetOutcome::Completed {
                    server_acknowledged,
                } => {
                    if !server_acknowledged {
                        note_warn("Service unreachable; local session reset anyway");
                    }
                    TerminalView::new(controller.strings()).draw(&controller.drain_updates());
                    note_success(&format!("New session {}", controller.session_token()));
                }
            }
        }
        Commands::Session => {
            let store = open_store(&config)?;
            let identity = SessionIdentity::get_or_create(store);
            println!("{}", identity.token());
        }
        Commands::Status => match transport.status().await {
            Ok(body) => {
                note_success(&format!("{} is up", transport.base_url()));
                println!("{}", serde_json::to_string_pretty(&body)?);
            }
            Err(e) => {
                note_error(&format!("{} is not reachable: {e}", transport.base_url()));
            }
        },
    }

    Ok(())
}

fn open_store(config: &ClientConfig) -> Result<Arc<FileStore>> {
    let store = FileStore::open(config.storage_path.clone()).with_context(|| {
        format!("Failed to open session storage at {}", config.storage_path.display())
    })?;
    Ok(Arc::new(store))
}

fn build_controller(
    config: &ClientConfig,
    transport: Arc<dyn Transport>,
) -> Result<ConversationController> {
    let identity = SessionIdentity::get_or_create(open_store(config)?);
    Ok(ConversationController::new(identity, transport, config.locale))
}
