use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Prune stale tool output from agent transcripts")]
#[command(long_about = "Dynamic context pruning for coding-agent transcripts. Collapses duplicate tool calls, stale errors, superseded writes and large aged outputs into short placeholders, without ever adding, removing or reordering messages.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to an extra configuration file, applied after the global and project layers
    #[arg(short, long, global = true, value_name = "FILE", env = "DCP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Project directory whose .pi/dcp.json layer is loaded (defaults to the current directory)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a pruning pass over a transcript
    Prune {
        /// Transcript file (.jsonl, or a JSON array of messages)
        #[arg(value_name = "TRANSCRIPT")]
        transcript: PathBuf,

        /// Write the pruned transcript here (defaults to stdout)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,

        /// Print the pass statistics as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Show what a pruning pass would save, without writing anything
    Status {
        /// Transcript file
        #[arg(value_name = "TRANSCRIPT")]
        transcript: PathBuf,
    },

    /// List every item a pruning pass would replace, grouped by strategy
    Details {
        /// Transcript file
        #[arg(value_name = "TRANSCRIPT")]
        transcript: PathBuf,
    },

    /// Print the effective configuration after all layers are merged
    Config,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
