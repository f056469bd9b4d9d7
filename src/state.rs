//! Session statistics
//!
//! Created once per session, reset at the start of every pruning pass and read
//! by reporting (the `/dcp` command, the CLI) between passes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four pruning strategies, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyKind {
    Deduplicate,
    PurgeErrors,
    SupersedeWrites,
    OutputBodyReplace,
}

impl StrategyKind {
    /// Fixed execution order for a pass.
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Deduplicate,
        StrategyKind::PurgeErrors,
        StrategyKind::SupersedeWrites,
        StrategyKind::OutputBodyReplace,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            StrategyKind::Deduplicate => "deduplicate",
            StrategyKind::PurgeErrors => "purgeErrors",
            StrategyKind::SupersedeWrites => "supersedeWrites",
            StrategyKind::OutputBodyReplace => "outputBodyReplace",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Number of items each strategy pruned in the last pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrunedCounts {
    pub deduplicate: usize,
    pub purge_errors: usize,
    pub output_body_replace: usize,
    pub supersede_writes: usize,
}

impl PrunedCounts {
    pub fn get(&self, kind: StrategyKind) -> usize {
        match kind {
            StrategyKind::Deduplicate => self.deduplicate,
            StrategyKind::PurgeErrors => self.purge_errors,
            StrategyKind::SupersedeWrites => self.supersede_writes,
            StrategyKind::OutputBodyReplace => self.output_body_replace,
        }
    }

    fn slot(&mut self, kind: StrategyKind) -> &mut usize {
        match kind {
            StrategyKind::Deduplicate => &mut self.deduplicate,
            StrategyKind::PurgeErrors => &mut self.purge_errors,
            StrategyKind::SupersedeWrites => &mut self.supersede_writes,
            StrategyKind::OutputBodyReplace => &mut self.output_body_replace,
        }
    }

    pub fn total(&self) -> usize {
        StrategyKind::ALL.iter().map(|k| self.get(*k)).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub tokens_saved_estimate: usize,
    pub pruned_items_count: PrunedCounts,
    pub protected_skip_count: usize,
}

/// One pruned item, kept for the details report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PruneDetail {
    pub strategy: StrategyKind,
    pub tool_name: String,
    /// `None` for argument-level rewrites on assistant turns.
    pub turn_age: Option<usize>,
    pub tokens_saved: usize,
    pub args_summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub stats: SessionStats,
    pub details: Vec<PruneDetail>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything accumulated by the previous pass.
    pub fn reset(&mut self) {
        self.stats = SessionStats::default();
        self.details.clear();
    }

    /// Count one pruned item and its estimated savings.
    pub fn record_prune(&mut self, kind: StrategyKind, tokens_saved: usize) {
        *self.stats.pruned_items_count.slot(kind) += 1;
        self.stats.tokens_saved_estimate += tokens_saved;
    }

    pub fn record_protected_skip(&mut self) {
        self.stats.protected_skip_count += 1;
    }

    pub fn push_detail(
        &mut self,
        strategy: StrategyKind,
        tool_name: impl Into<String>,
        turn_age: Option<usize>,
        tokens_saved: usize,
        args_summary: impl Into<String>,
    ) {
        self.details.push(PruneDetail {
            strategy,
            tool_name: tool_name.into(),
            turn_age,
            tokens_saved,
            args_summary: args_summary.into(),
        });
    }

    pub fn tokens_saved(&self) -> usize {
        self.stats.tokens_saved_estimate
    }

    pub fn pruned(&self, kind: StrategyKind) -> usize {
        self.stats.pruned_items_count.get(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_reset() {
        let mut state = SessionState::new();
        state.record_prune(StrategyKind::Deduplicate, 40);
        state.record_prune(StrategyKind::OutputBodyReplace, 300);
        state.record_protected_skip();
        state.push_detail(StrategyKind::Deduplicate, "read", Some(3), 40, "{\"path\":\"a.txt\"}");

        assert_eq!(state.tokens_saved(), 340);
        assert_eq!(state.pruned(StrategyKind::Deduplicate), 1);
        assert_eq!(state.stats.pruned_items_count.total(), 2);
        assert_eq!(state.stats.protected_skip_count, 1);
        assert_eq!(state.details.len(), 1);

        state.reset();
        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn test_counts_serialize_with_strategy_keys() {
        let counts = PrunedCounts {
            purge_errors: 2,
            ..Default::default()
        };
        let value = serde_json::to_value(counts).unwrap();
        assert_eq!(value["purgeErrors"], 2);
        assert_eq!(value["outputBodyReplace"], 0);

        for kind in StrategyKind::ALL {
            assert!(value.get(kind.key()).is_some(), "missing key {}", kind);
        }
    }
}
