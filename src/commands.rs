//! The `/dcp` command: status, details and manual on/off.

use crate::config::DcpConfig;
use crate::state::{PruneDetail, SessionState, StrategyKind};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// What the host should show in response to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Short notification.
    Notify { level: NotifyLevel, text: String },
    /// Longer markdown shown in an editor pane.
    Editor { title: String, body: String },
}

impl CommandOutput {
    fn notify(level: NotifyLevel, text: impl Into<String>) -> Self {
        CommandOutput::Notify {
            level,
            text: text.into(),
        }
    }
}

pub const USAGE: &str = "Usage: /dcp <status|stats|details|manual on|off>";
pub const MANUAL_USAGE: &str = "Usage: /dcp manual <on|off>";
const DISABLED: &str = "DCP is currently disabled.";

/// Run `/dcp <args>`. An empty argument string means `status`.
pub fn handle_command(args: &str, config: &mut DcpConfig, state: &SessionState) -> CommandOutput {
    let mut parts = args.split_whitespace();
    let subcommand = parts
        .next()
        .map(str::to_lowercase)
        .unwrap_or_else(|| "status".to_string());

    match subcommand.as_str() {
        "status" | "stats" => {
            if !config.enabled {
                return CommandOutput::notify(NotifyLevel::Warning, DISABLED);
            }
            CommandOutput::notify(NotifyLevel::Info, render_status(config, state))
        }
        "detail" | "details" => {
            if !config.enabled {
                return CommandOutput::notify(NotifyLevel::Warning, DISABLED);
            }
            if state.details.is_empty() {
                return CommandOutput::notify(NotifyLevel::Info, "No items have been pruned yet.");
            }
            CommandOutput::Editor {
                title: "DCP Details".to_string(),
                body: render_details(state),
            }
        }
        "manual" => match parts.next().map(str::to_lowercase).as_deref() {
            Some("on") => {
                config.enabled = true;
                log::info!("Pruning enabled manually");
                CommandOutput::notify(NotifyLevel::Success, "DCP enabled manually.")
            }
            Some("off") => {
                config.enabled = false;
                log::info!("Pruning disabled manually");
                CommandOutput::notify(NotifyLevel::Warning, "DCP disabled manually.")
            }
            _ => CommandOutput::notify(NotifyLevel::Error, MANUAL_USAGE),
        },
        _ => CommandOutput::notify(NotifyLevel::Error, USAGE),
    }
}

/// Markdown status summary.
pub fn render_status(config: &DcpConfig, state: &SessionState) -> String {
    let stats = &state.stats;
    let mut out = String::new();

    let _ = writeln!(out, "**DCP Status**: Enabled ({} mode)", config.mode.as_str());
    let _ = writeln!(out, "- Tokens Saved: ~{}", stats.tokens_saved_estimate);
    let _ = writeln!(out, "- Items Pruned: {}", stats.pruned_items_count.total());
    for kind in StrategyKind::ALL {
        let _ = writeln!(out, "  - {}: {}", kind, stats.pruned_items_count.get(kind));
    }
    let _ = writeln!(out, "- Protected Skips: {}", stats.protected_skip_count);
    if config.turn_protection.enabled {
        let _ = writeln!(out, "- Turn Protection: {} turns", config.turn_protection.turns);
    } else {
        let _ = writeln!(out, "- Turn Protection: disabled");
    }

    let advanced = &config.advanced;
    let flags: Vec<&str> = [
        (advanced.distill_tool.enabled, "distillTool"),
        (advanced.compress_tool.enabled, "compressTool"),
        (advanced.llm_autonomy, "llmAutonomy"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    if !flags.is_empty() {
        let _ = writeln!(out, "- Advanced: {}", flags.join(", "));
    }

    out
}

/// Markdown report of every pruned item, grouped by strategy in the order
/// each strategy first appears.
pub fn render_details(state: &SessionState) -> String {
    let mut groups: Vec<(StrategyKind, Vec<&PruneDetail>)> = Vec::new();
    for detail in &state.details {
        match groups.iter_mut().find(|(kind, _)| *kind == detail.strategy) {
            Some((_, items)) => items.push(detail),
            None => groups.push((detail.strategy, vec![detail])),
        }
    }

    let mut out = format!(
        "# DCP Pruned Items (~{} tokens saved)\n\n",
        state.stats.tokens_saved_estimate
    );
    for (kind, items) in groups {
        let _ = writeln!(out, "## {} ({})", kind, items.len());
        for item in items {
            let turn = match item.turn_age {
                Some(age) => format!("Turn {}", age),
                None => "Assistant Action".to_string(),
            };
            let _ = writeln!(
                out,
                "- **{}** [{}] (~{} tokens): `{}`",
                item.tool_name, turn, item.tokens_saved, item.args_summary
            );
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> SessionState {
        let mut state = SessionState::new();
        state.record_prune(StrategyKind::PurgeErrors, 12);
        state.push_detail(StrategyKind::PurgeErrors, "bash", Some(4), 12, "Error: boom");
        state.record_prune(StrategyKind::SupersedeWrites, 30);
        state.push_detail(StrategyKind::SupersedeWrites, "write", None, 30, "Path: a.txt");
        state.record_prune(StrategyKind::PurgeErrors, 3);
        state.push_detail(StrategyKind::PurgeErrors, "read", Some(5), 3, "ENOENT");
        state.record_protected_skip();
        state
    }

    #[test]
    fn test_status_is_default() {
        let mut config = DcpConfig::default();
        let state = sample_state();
        let output = handle_command("  ", &mut config, &state);

        let CommandOutput::Notify { level, text } = output else {
            panic!("expected a notification");
        };
        assert_eq!(level, NotifyLevel::Info);
        assert!(text.starts_with("**DCP Status**: Enabled (safe mode)"));
        assert!(text.contains("- Tokens Saved: ~45"));
        assert!(text.contains("  - purgeErrors: 2"));
        assert!(text.contains("- Protected Skips: 1"));
        assert!(text.contains("- Turn Protection: 8 turns"));
    }

    #[test]
    fn test_disabled_warns() {
        let mut config = DcpConfig::default();
        config.enabled = false;
        let state = sample_state();

        for args in ["status", "STATS", "details"] {
            assert_eq!(
                handle_command(args, &mut config, &state),
                CommandOutput::notify(NotifyLevel::Warning, DISABLED)
            );
        }
    }

    #[test]
    fn test_details_grouped_in_first_seen_order() {
        let mut config = DcpConfig::default();
        let output = handle_command("details", &mut config, &sample_state());

        let CommandOutput::Editor { title, body } = output else {
            panic!("expected editor output");
        };
        assert_eq!(title, "DCP Details");
        assert_eq!(
            body,
            "# DCP Pruned Items (~45 tokens saved)\n\n\
             ## purgeErrors (2)\n\
             - **bash** [Turn 4] (~12 tokens): `Error: boom`\n\
             - **read** [Turn 5] (~3 tokens): `ENOENT`\n\n\
             ## supersedeWrites (1)\n\
             - **write** [Assistant Action] (~30 tokens): `Path: a.txt`\n\n"
        );
    }

    #[test]
    fn test_details_when_nothing_pruned() {
        let mut config = DcpConfig::default();
        assert_eq!(
            handle_command("detail", &mut config, &SessionState::new()),
            CommandOutput::notify(NotifyLevel::Info, "No items have been pruned yet.")
        );
    }

    #[test]
    fn test_manual_toggle() {
        let mut config = DcpConfig::default();
        let state = SessionState::new();

        let off = handle_command("manual off", &mut config, &state);
        assert!(!config.enabled);
        assert!(matches!(off, CommandOutput::Notify { level: NotifyLevel::Warning, .. }));

        let on = handle_command("manual ON", &mut config, &state);
        assert!(config.enabled);
        assert!(matches!(on, CommandOutput::Notify { level: NotifyLevel::Success, .. }));

        assert_eq!(
            handle_command("manual maybe", &mut config, &state),
            CommandOutput::notify(NotifyLevel::Error, MANUAL_USAGE)
        );
        assert!(config.enabled);
    }

    #[test]
    fn test_unknown_subcommand() {
        let mut config = DcpConfig::default();
        assert_eq!(
            handle_command("frobnicate", &mut config, &SessionState::new()),
            CommandOutput::notify(NotifyLevel::Error, USAGE)
        );
    }
}
