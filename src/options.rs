use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Options {
    /// Strip a Markdown fenced code block like ```json ... ``` around the JSON.
    pub fenced_code_blocks: bool,
    /// Skip prose in front of the first `[` or `{` instead of failing. When the
    /// prose itself contains a brace, item parsing retries from the next `[`.
    pub skip_leading_prose: bool,
    /// Treat `#` as a line comment (in addition to // and /* */) outside strings.
    pub tolerate_hash_comments: bool,
    /// Accept and normalize Python-style keywords True/False/None.
    pub allow_python_keywords: bool,
    /// Complete literals cut off by the end of input: `tr` -> `true`, `nu` -> `null`.
    pub complete_partial_literals: bool,
    /// Enable repair logging. Use `repair_to_string_with_log` to retrieve logs.
    pub logging: bool,
    /// Context window size used when building log context snippets.
    pub log_context_window: usize,
    /// When enabled, attach a JSON path to log entries.
    pub log_json_path: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fenced_code_blocks: true,
            skip_leading_prose: true,
            tolerate_hash_comments: true,
            allow_python_keywords: true,
            complete_partial_literals: true,
            logging: false,
            log_context_window: 10,
            log_json_path: false,
        }
    }
}

/// Default coalescing window for item emissions.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Per-session settings: parser options plus the emission policy.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub parse: Options,
    /// Changes arriving within this window after the first pending change are
    /// delivered as a single emission. Zero disables coalescing.
    pub debounce: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            parse: Options::default(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}
