use serde::Deserialize;

/// Terminal value of a single wait.
///
/// `TimedOut` is an ordinary outcome, not an error: callers are expected to
/// branch on it. `Cancelled` can only be produced when a cancellation token
/// was attached to the wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<V> {
    Matched(V),
    TimedOut,
    Cancelled,
}

impl<V> WaitOutcome<V> {
    pub fn is_match(&self) -> bool {
        matches!(self, WaitOutcome::Matched(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitOutcome::TimedOut)
    }

    /// The matched result value, if any.
    pub fn matched(&self) -> Option<&V> {
        match self {
            WaitOutcome::Matched(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_matched(self) -> Option<V> {
        match self {
            WaitOutcome::Matched(v) => Some(v),
            _ => None,
        }
    }
}

/// How a pattern's text is interpreted when matching a line.
///
/// - `Literal`: plain substring search (default).
/// - `Regex`: unanchored regular expression search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    #[default]
    Literal,
    Regex,
}
