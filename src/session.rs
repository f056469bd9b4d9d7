//! Session hooks
//!
//! A [`PruningSession`] is what an agent host holds for one conversation: the
//! policy, the statistics of the latest pass and the footer status line. The
//! host calls [`PruningSession::on_session_start`] once and
//! [`PruningSession::on_context`] before every model call.

use crate::commands::{self, CommandOutput};
use crate::config::DcpConfig;
use crate::engine;
use crate::state::SessionState;
use crate::transcript::Message;

#[derive(Debug, Clone, Default)]
pub struct PruningSession {
    config: DcpConfig,
    state: SessionState,
    status: Option<String>,
}

impl PruningSession {
    pub fn new(config: DcpConfig) -> Self {
        Self {
            config,
            state: SessionState::new(),
            status: None,
        }
    }

    pub fn config(&self) -> &DcpConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// `DCP: Saved ~N tokens`, set after each pass while `debug` is on.
    pub fn status_line(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Dry run over the existing transcript so statistics are populated
    /// before the first model call. The caller's messages are not touched.
    ///
    /// Hosts reload the config layers on every session start; a `reloaded`
    /// policy replaces the current one, manual toggles included, before the
    /// dry run.
    pub fn on_session_start(&mut self, messages: &[Message], reloaded: Option<DcpConfig>) {
        if let Some(config) = reloaded {
            log::debug!("Applying reloaded config at session start");
            self.config = config;
        }
        if !messages.is_empty() {
            let mut scratch = messages.to_vec();
            self.prune(&mut scratch);
        }
        if self.config.debug {
            log::info!("DCP session started with {} message(s)", messages.len());
        }
    }

    /// Prune the per-request copy of the transcript. When pruning is disabled
    /// the messages come back untouched and statistics keep their last value.
    pub fn on_context(&mut self, mut messages: Vec<Message>) -> Vec<Message> {
        self.prune(&mut messages);
        messages
    }

    /// `/dcp <args>` against this session.
    pub fn handle_command(&mut self, args: &str) -> CommandOutput {
        commands::handle_command(args, &mut self.config, &self.state)
    }

    fn prune(&mut self, messages: &mut [Message]) {
        if !self.config.enabled {
            log::debug!("Pruning disabled, leaving {} message(s) as-is", messages.len());
            return;
        }

        engine::run_pass(messages, &self.config, &mut self.state);

        if self.config.debug {
            self.status = Some(format!("DCP: Saved ~{} tokens", self.state.tokens_saved()));
        }
    }
}
