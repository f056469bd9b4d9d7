use crate::error::ConfigError;
use crate::state::StrategyKind;
use serde::{Deserialize, Serialize};

/// Default values for the pruning policy
pub mod defaults {
    /// Turns counted from the newest one that are never pruned
    pub const PROTECTED_TURNS: usize = 8;

    /// Errors younger than this many turns keep their full payload
    pub const PURGE_ERRORS_MIN_TURN_AGE: usize = 3;

    /// Tool outputs at least this many characters long are replaceable
    pub const OUTPUT_MIN_CHARS: usize = 1200;

    pub const NUDGE: f64 = 0.7;
    pub const AUTO_PRUNE: f64 = 0.8;
    pub const FORCE_COMPACT: f64 = 0.9;

    pub const PROTECTED_TOOLS: &[&str] = &[
        "todo",
        "subagent",
        "send_to_session",
        "plan_enter",
        "plan_exit",
    ];

    pub const PROTECTED_FILE_PATTERNS: &[&str] =
        &["**/CHANGELOG.md", "**/*.plan.md", "**/progress.md"];
}

/// Pruning policy, immutable for the duration of a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DcpConfig {
    pub enabled: bool,
    pub mode: PruneMode,
    pub debug: bool,
    pub turn_protection: TurnProtection,
    pub thresholds: Thresholds,
    pub protected_tools: Vec<String>,
    pub protected_file_patterns: Vec<String>,
    pub strategies: StrategiesConfig,
    pub advanced: AdvancedConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PruneMode {
    #[default]
    Safe,
    Advanced,
}

impl PruneMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PruneMode::Safe => "safe",
            PruneMode::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnProtection {
    pub enabled: bool,
    pub turns: usize,
}

impl Default for TurnProtection {
    fn default() -> Self {
        Self {
            enabled: true,
            turns: defaults::PROTECTED_TURNS,
        }
    }
}

/// Context-usage ratios consumed by the host; the engine only carries them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thresholds {
    pub nudge: f64,
    pub auto_prune: f64,
    pub force_compact: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            nudge: defaults::NUDGE,
            auto_prune: defaults::AUTO_PRUNE,
            force_compact: defaults::FORCE_COMPACT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggle {
    pub enabled: bool,
}

impl Toggle {
    pub const fn on() -> Self {
        Self { enabled: true }
    }

    pub const fn off() -> Self {
        Self { enabled: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PurgeErrorsConfig {
    pub enabled: bool,
    pub min_turn_age: usize,
}

impl Default for PurgeErrorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_turn_age: defaults::PURGE_ERRORS_MIN_TURN_AGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputBodyReplaceConfig {
    pub enabled: bool,
    pub min_chars: usize,
}

impl Default for OutputBodyReplaceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_chars: defaults::OUTPUT_MIN_CHARS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrategiesConfig {
    pub deduplicate: Toggle,
    pub purge_errors: PurgeErrorsConfig,
    pub output_body_replace: OutputBodyReplaceConfig,
    pub supersede_writes: Toggle,
}

impl Default for StrategiesConfig {
    fn default() -> Self {
        Self {
            deduplicate: Toggle::on(),
            purge_errors: PurgeErrorsConfig::default(),
            output_body_replace: OutputBodyReplaceConfig::default(),
            supersede_writes: Toggle::off(),
        }
    }
}

/// Features reserved for `advanced` mode. Reported, not acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdvancedConfig {
    pub distill_tool: Toggle,
    pub compress_tool: Toggle,
    pub llm_autonomy: bool,
}

impl Default for DcpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: PruneMode::Safe,
            debug: false,
            turn_protection: TurnProtection::default(),
            thresholds: Thresholds::default(),
            protected_tools: defaults::PROTECTED_TOOLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            protected_file_patterns: defaults::PROTECTED_FILE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            strategies: StrategiesConfig::default(),
            advanced: AdvancedConfig::default(),
        }
    }
}

impl DcpConfig {
    /// Whether a strategy runs in a pass.
    pub fn strategy_enabled(&self, kind: StrategyKind) -> bool {
        match kind {
            StrategyKind::Deduplicate => self.strategies.deduplicate.enabled,
            StrategyKind::PurgeErrors => self.strategies.purge_errors.enabled,
            StrategyKind::SupersedeWrites => self.strategies.supersede_writes.enabled,
            StrategyKind::OutputBodyReplace => self.strategies.output_body_replace.enabled,
        }
    }

    pub fn is_protected_tool(&self, tool_name: &str) -> bool {
        self.protected_tools.iter().any(|t| t == tool_name)
    }

    /// Number of newest turns that are never pruned (0 when protection is off).
    pub fn protection_window(&self) -> usize {
        if self.turn_protection.enabled {
            self.turn_protection.turns
        } else {
            0
        }
    }

    pub fn is_within_protection(&self, turn_age: usize) -> bool {
        turn_age < self.protection_window()
    }

    /// Reject values that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratios = [
            ("thresholds.nudge", self.thresholds.nudge),
            ("thresholds.autoPrune", self.thresholds.auto_prune),
            ("thresholds.forceCompact", self.thresholds.force_compact),
        ];
        for (field, value) in ratios {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("expected a ratio between 0 and 1, got {}", value),
                });
            }
        }

        if self.protected_tools.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "protectedTools".to_string(),
                reason: "tool names must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
