//! # DCP: dynamic context pruning
//!
//! Shrinks the token footprint of a growing agent transcript before each
//! model call. Older, non-essential tool output is rewritten in place to short
//! placeholders; messages are never added, removed or reordered.
//!
//! ## Strategies
//!
//! - **Deduplicate**: older results of an identical tool call collapse to a note
//! - **Purge errors**: old error payloads shrink to their first line
//! - **Supersede writes**: write/edit bodies go once the file was read again
//! - **Output body replace**: large aged outputs become a "re-run the tool" note
//!
//! ## Example
//!
//! ```rust,no_run
//! use dcp_prune::{DcpConfig, SessionState, run_pass, transcript::load_transcript};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut messages = load_transcript(Path::new("session.jsonl"))?;
//! let mut state = SessionState::new();
//! run_pass(&mut messages, &DcpConfig::default(), &mut state);
//! println!("~{} tokens saved", state.tokens_saved());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod session;
pub mod state;
pub mod transcript;

// Re-export commonly used types and functions
pub use commands::{CommandOutput, NotifyLevel, handle_command};
pub use config::{DcpConfig, load_config};
pub use engine::run_pass;
pub use error::{PrunerError, Result};
pub use session::PruningSession;
pub use state::{PruneDetail, SessionState, SessionStats, StrategyKind};
pub use transcript::Message;
use cli::Commands;
use std::path::Path;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run_command(
    command: Commands,
    config: DcpConfig,
    project: &Path,
    explicit_config: Option<&Path>,
) -> Result<()> {
    match command {
        Commands::Prune { transcript, output, json } => {
            handlers::handle_prune(transcript, output, json, config)
        }
        Commands::Status { transcript } => handlers::handle_status(transcript, config),
        Commands::Details { transcript } => handlers::handle_details(transcript, config),
        Commands::Config => handlers::handle_config(&config, project, explicit_config),
    }
}
