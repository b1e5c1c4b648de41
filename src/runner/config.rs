//! Engine configuration.

pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;

/// Settings shared by every script run in one [`EvalContext`](crate::runner::plugin::types::EvalContext).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Plain calls bind `undefined` instead of the global object.
    pub strict_mode: bool,
    /// Print console lines as they are produced, in addition to capturing them.
    pub echo_console: bool,
    pub max_call_depth: usize,
}

impl EngineConfig {
    pub fn new() -> Self {
        EngineConfig {
            strict_mode: false,
            echo_console: false,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    pub fn with_strict_mode(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    pub fn with_echo_console(mut self, echo_console: bool) -> Self {
        self.echo_console = echo_console;
        self
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sloppy_and_quiet() {
        let config = EngineConfig::default();
        assert!(!config.strict_mode);
        assert!(!config.echo_console);
        assert_eq!(config.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
    }

    #[test]
    fn builder_overrides() {
        let config = EngineConfig::new()
            .with_strict_mode(true)
            .with_echo_console(true)
            .with_max_call_depth(4);
        assert!(config.strict_mode);
        assert!(config.echo_console);
        assert_eq!(config.max_call_depth, 4);
    }
}
