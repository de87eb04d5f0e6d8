//! Glob Pattern Module
//!
//! Key selection for `keys` and `delete_pattern`.
//!
//! Only `*` is special: it matches zero or more characters. Everything else,
//! including `?` and brackets, matches itself. A pattern is compiled to an
//! anchored regex, so it must match the whole key.

use regex::Regex;

use crate::error::{CacheError, Result};

// == Glob Pattern ==
/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    regex: Regex,
}

impl GlobPattern {
    // == Constructor ==
    /// Compiles `pattern` into an anchored matcher.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&glob_to_regex(pattern))
            .map_err(|e| CacheError::InvalidPattern(format!("{}: {}", pattern, e)))?;

        Ok(Self { regex })
    }

    // == Matches ==
    /// Returns true if the whole key matches the pattern.
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

/// Translates a glob into regex source: literal runs are escaped, `*`
/// becomes `.*`, and the result is anchored on both ends.
pub fn glob_to_regex(pattern: &str) -> String {
    let literals: Vec<String> = pattern.split('*').map(regex::escape).collect();
    format!("^{}$", literals.join(".*"))
}
