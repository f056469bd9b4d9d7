use glob::{MatchOptions, Pattern};

/// Compiled `protectedFilePatterns`.
///
/// Invalid patterns are dropped with a warning: a pattern that cannot be
/// compiled protects nothing, it never fails the pass.
#[derive(Debug, Clone, Default)]
pub struct ProtectedPaths {
    patterns: Vec<Pattern>,
}

impl ProtectedPaths {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|raw| match Pattern::new(raw.as_ref()) {
                Ok(p) => Some(p),
                Err(e) => {
                    log::warn!("Ignoring protected file pattern '{}': {}", raw.as_ref(), e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn matches(&self, path: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let normalized = path.replace('\\', "/");
        let normalized = normalized.strip_prefix("./").unwrap_or(&normalized);
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        self.patterns
            .iter()
            .any(|p| p.matches_with(normalized, options))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
