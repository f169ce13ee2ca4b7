pub(crate) const MAX_CALL_DEPTH: usize = 256;
pub(crate) const MAX_NESTING: usize = 128;

/// Runtime limits of a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of user function calls that can be live at the same time.
    pub max_call_depth: usize,

    /// Maximum number of forms, groupings and unary operators nested in one another.
    pub max_nesting: usize,
}

impl Config {
    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_call_depth: MAX_CALL_DEPTH,
            max_nesting: MAX_NESTING,
        }
    }
}
