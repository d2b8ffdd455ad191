//! Interpreter settings.

use tracing::warn;

/// Knobs for a run. `Config::from_env` reads `MINIC_ENTRY` and
/// `MINIC_MAX_CALL_DEPTH` on top of the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Name of the function whose result is the program's result
    pub entry: String,
    /// Deepest allowed nesting of calls before `CallDepthExceeded`
    pub max_call_depth: usize,
}

pub const DEFAULT_ENTRY: &str = "main";
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Host stack reserved on the evaluation thread for each level of
/// `max_call_depth`. One minic call runs through several Rust frames, more
/// when its body nests blocks and expressions.
pub const STACK_PER_CALL: usize = 64 * 1024;

/// Stack for the entry frame and anything outside the call chain.
const STACK_BASE: usize = 1024 * 1024;

impl Default for Config {
    fn default() -> Self {
        Self {
            entry: DEFAULT_ENTRY.to_string(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup, so callers and tests need
    /// not touch the process environment.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(entry) = lookup("MINIC_ENTRY") {
            let entry = entry.trim();
            if !entry.is_empty() {
                config.entry = entry.to_string();
            }
        }
        if let Some(raw) = lookup("MINIC_MAX_CALL_DEPTH") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.max_call_depth = n,
                _ => warn!(value = %raw, "ignoring invalid MINIC_MAX_CALL_DEPTH"),
            }
        }
        config
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = entry.into();
        self
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Stack size of the thread evaluation runs on, large enough that
    /// `max_call_depth` is reached before the host stack runs out.
    pub fn eval_stack_size(&self) -> usize {
        self.max_call_depth
            .saturating_mul(STACK_PER_CALL)
            .saturating_add(STACK_BASE)
    }
}
