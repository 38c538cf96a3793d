// src/watch/matcher.rs

use std::fmt;

use regex::Regex;
use tracing::trace;

use crate::errors::{LogwaitError, Result};
use crate::logging::LINES_TARGET;
use crate::types::PatternKind;

enum Matcher {
    Literal(String),
    Regex(Regex),
}

impl Matcher {
    fn is_match(&self, line: &str) -> bool {
        match self {
            Matcher::Literal(text) => line.contains(text.as_str()),
            Matcher::Regex(re) => re.is_match(line),
        }
    }
}

struct PatternEntry<V> {
    text: String,
    kind: PatternKind,
    matcher: Matcher,
    result: V,
}

/// Ordered mapping from pattern to result value.
///
/// Patterns are tried in the order they were added and the first one that
/// matches a line wins. Pattern texts must be unique.
pub struct PatternTable<V> {
    entries: Vec<PatternEntry<V>>,
}

impl<V> fmt::Debug for PatternTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (&e.text, e.kind)))
            .finish()
    }
}

impl<V> Default for PatternTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PatternTable<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a pattern. Fails on a duplicate text or an invalid regex.
    pub fn push(&mut self, kind: PatternKind, text: impl Into<String>, result: V) -> Result<()> {
        let text = text.into();
        if self.entries.iter().any(|e| e.text == text) {
            return Err(LogwaitError::ConfigError(format!(
                "duplicate pattern {text:?}"
            )));
        }

        let matcher = match kind {
            PatternKind::Literal => Matcher::Literal(text.clone()),
            PatternKind::Regex => {
                let re = Regex::new(&text).map_err(|source| LogwaitError::InvalidPattern {
                    pattern: text.clone(),
                    source,
                })?;
                Matcher::Regex(re)
            }
        };

        self.entries.push(PatternEntry {
            text,
            kind,
            matcher,
            result,
        });
        Ok(())
    }

    /// Builder-style [`push`](Self::push) for a substring pattern.
    pub fn literal(mut self, text: impl Into<String>, result: V) -> Result<Self> {
        self.push(PatternKind::Literal, text, result)?;
        Ok(self)
    }

    /// Builder-style [`push`](Self::push) for a regex pattern.
    pub fn regex(mut self, text: impl Into<String>, result: V) -> Result<Self> {
        self.push(PatternKind::Regex, text, result)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pattern texts in evaluation order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.text.as_str())
    }

    /// Result of the first pattern matching `line`, if any.
    pub fn match_line(&self, line: &str) -> Option<&V> {
        trace!(target: LINES_TARGET, "{}", line);
        self.entries
            .iter()
            .find(|e| e.matcher.is_match(line))
            .map(|e| &e.result)
    }

    /// Feed `lines` through [`match_line`](Self::match_line), stopping at the
    /// first hit.
    pub fn scan<I>(&self, lines: I) -> Option<&V>
    where
        I: IntoIterator<Item = String>,
    {
        lines.into_iter().find_map(|line| self.match_line(&line))
    }
}
