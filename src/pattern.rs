//! Wildcard specification compiler.
//!
//! A group member spec such as `AB*` or `Stage-*` is turned into an anchored,
//! upper-cased regular expression. `*` stands for one or more characters that
//! are not a hyphen, so a wildcard never spans the base/sub separator.
//! Candidates are upper-cased before matching.

use regex::{Regex, RegexBuilder};

use crate::types::{CompileOptions, MemberType, PatternCompileError};

/// Characters that are always taken literally.
const RESERVED: &str = "<([{\\^-=$!|]})?+.>";

/// What `*` expands to.
const WILDCARD: &str = "[^-]+";

/// A compiled member specification.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    spec: String,
    regex: Regex,
}

impl WildcardPattern {
    /// The raw specification this pattern was compiled from.
    #[must_use]
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// The generated pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Test an already upper-cased value. The whole value must match.
    #[must_use]
    pub fn is_match_upper(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Test a value, upper-casing it first.
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(&value.to_uppercase())
    }
}

/// Translate a raw member spec into pattern text.
#[must_use]
pub fn make_pattern_string(spec: &str) -> String {
    let mut out = String::with_capacity(spec.len() + 8);
    out.push('^');
    for c in spec.chars() {
        if c == '*' {
            out.push_str(WILDCARD);
        } else if RESERVED.contains(c) {
            // `regex::escape` knows which of these the engine treats as
            // metacharacters; `<` and `>` must stay bare or they become
            // word-boundary assertions.
            out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
        } else if c.is_lowercase() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out.push('$');
    out
}

/// Compile one raw spec.
///
/// # Errors
///
/// Returns [`PatternCompileError`] if the generated pattern is rejected by the
/// regex engine, typically because it exceeds the configured size limits.
pub fn compile(
    member: MemberType,
    spec: &str,
    options: &CompileOptions,
) -> Result<WildcardPattern, PatternCompileError> {
    let pattern = make_pattern_string(spec);
    RegexBuilder::new(&pattern)
        .size_limit(options.size_limit)
        .dfa_size_limit(options.dfa_size_limit)
        .build()
        .map(|regex| WildcardPattern {
            spec: spec.to_owned(),
            regex,
        })
        .map_err(|source| PatternCompileError {
            member,
            spec: spec.to_owned(),
            pattern,
            source,
        })
}
