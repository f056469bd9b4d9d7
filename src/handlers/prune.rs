use crate::{
    commands::{CommandOutput, NotifyLevel},
    config::DcpConfig,
    session::PruningSession,
    state::{SessionState, StrategyKind},
    transcript::{self, Message},
};
use colored::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// JSON report printed by `dcp prune --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PruneReport<'a> {
    transcript: &'a Path,
    message_count: usize,
    #[serde(flatten)]
    state: &'a SessionState,
}

pub fn handle_prune(
    path: PathBuf,
    output: Option<PathBuf>,
    json: bool,
    config: DcpConfig,
) -> crate::Result<()> {
    let messages = transcript::load_transcript(&path)?;
    let message_count = messages.len();

    let mut session = PruningSession::new(config);
    let pruned = session.on_context(messages);

    match &output {
        Some(out) => {
            transcript::save_transcript(out, &pruned)?;
            log::info!("Wrote pruned transcript to {}", out.display());
        }
        None if !json => print!("{}", transcript::to_jsonl(&pruned)?),
        None => {}
    }

    if json {
        let report = PruneReport {
            transcript: &path,
            message_count,
            state: session.state(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        eprintln!("{}", summary_line(session.config(), session.state(), message_count));
        if let Some(out) = output {
            eprintln!("Pruned transcript saved to: {}", out.display());
        }
    }

    Ok(())
}

/// Dry run, then the `/dcp status` report.
pub fn handle_status(path: PathBuf, config: DcpConfig) -> crate::Result<()> {
    let mut session = dry_run(&path, config)?;
    println!("📄 {}\n", path.display().to_string().bold());
    print_command_output(&session.handle_command("status"));
    Ok(())
}

/// Dry run, then the `/dcp details` report.
pub fn handle_details(path: PathBuf, config: DcpConfig) -> crate::Result<()> {
    let mut session = dry_run(&path, config)?;
    print_command_output(&session.handle_command("details"));
    Ok(())
}

pub fn print_command_output(output: &CommandOutput) {
    match output {
        CommandOutput::Notify { level, text } => {
            let text = text.trim_end();
            match level {
                NotifyLevel::Info => println!("{}", text),
                NotifyLevel::Success => println!("{}", text.green()),
                NotifyLevel::Warning => println!("{}", text.yellow()),
                NotifyLevel::Error => eprintln!("{}", text.red()),
            }
        }
        CommandOutput::Editor { title, body } => {
            println!("{}", title.bold().underline());
            println!();
            print!("{}", body);
        }
    }
}

fn dry_run(path: &Path, config: DcpConfig) -> crate::Result<PruningSession> {
    let messages: Vec<Message> = transcript::load_transcript(path)?;
    let mut session = PruningSession::default();
    session.on_session_start(&messages, Some(config));
    Ok(session)
}

fn summary_line(config: &DcpConfig, state: &SessionState, message_count: usize) -> String {
    if !config.enabled {
        return format!(
            "{} {} message(s) passed through unchanged",
            "⏸  Pruning disabled:".yellow(),
            message_count
        );
    }

    let counts = StrategyKind::ALL
        .iter()
        .map(|kind| format!("{} {}", kind, state.pruned(*kind)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} {} message(s), {} item(s) pruned, ~{} tokens saved ({})",
        "✂️  Pruned".green().bold(),
        message_count,
        state.stats.pruned_items_count.total(),
        state.tokens_saved().to_string().cyan(),
        counts
    )
}
