//! Pruning engine
//!
//! One pass over a transcript, run before every model call:
//! 1. Turn ages - how many user turns ago each message happened
//! 2. Tool-call index - arguments for every tool call id
//! 3. Strategies, in fixed order: deduplicate, purge errors, supersede writes,
//!    output body replace
//!
//! The pass rewrites content in place. It never adds, removes or reorders
//! messages, and it never fails: anything it cannot decide safely is left
//! untouched.

pub mod index;
pub mod placeholder;
pub mod protection;
pub mod signature;
pub mod strategies;
pub mod tokens;
pub mod turns;

pub use index::ToolCallIndex;
pub use protection::ProtectedPaths;
pub use signature::SignatureCache;
pub use turns::compute_turn_ages;

use crate::config::DcpConfig;
use crate::state::{SessionState, StrategyKind};
use crate::transcript::Message;
use serde_json::Value;

/// Everything strategies share during one pass.
#[derive(Debug)]
pub struct PassContext<'a> {
    pub policy: &'a DcpConfig,
    pub turn_ages: Vec<usize>,
    pub index: ToolCallIndex,
    pub signatures: SignatureCache,
    pub protected_paths: ProtectedPaths,
}

impl<'a> PassContext<'a> {
    pub fn new(messages: &[Message], policy: &'a DcpConfig) -> Self {
        Self {
            policy,
            turn_ages: compute_turn_ages(messages),
            index: ToolCallIndex::build(messages),
            signatures: SignatureCache::new(),
            protected_paths: ProtectedPaths::new(&policy.protected_file_patterns),
        }
    }

    pub fn turn_age(&self, message_index: usize) -> usize {
        self.turn_ages.get(message_index).copied().unwrap_or(0)
    }

    pub fn is_within_protection(&self, turn_age: usize) -> bool {
        self.policy.is_within_protection(turn_age)
    }

    /// Protected by tool name, or by a `path`/`file` argument matching a
    /// protected file pattern.
    pub fn is_protected(&self, tool_name: &str, args: Option<&Value>) -> bool {
        if self.policy.is_protected_tool(tool_name) {
            return true;
        }
        args.and_then(index::target_path_arg)
            .is_some_and(|path| self.protected_paths.matches(path))
    }
}

/// Apply every enabled strategy to `messages`, in place.
///
/// `state` is reset first, so afterwards it describes this pass only.
pub fn run_pass(messages: &mut [Message], policy: &DcpConfig, state: &mut SessionState) {
    state.reset();
    let mut ctx = PassContext::new(messages, policy);

    for kind in StrategyKind::ALL {
        if !policy.strategy_enabled(kind) {
            log::trace!("Strategy {} disabled", kind);
            continue;
        }
        let pruned = strategies::apply(kind, messages, &mut ctx, state);
        log::debug!("Strategy {} pruned {} item(s)", kind, pruned);
    }

    log::info!(
        "Pruning pass over {} message(s): {} item(s) pruned, ~{} tokens saved, {} protected skip(s)",
        messages.len(),
        state.stats.pruned_items_count.total(),
        state.stats.tokens_saved_estimate,
        state.stats.protected_skip_count
    );
}
