use std::fmt;
use std::time::Duration;

use super::dimension::Dimension;

/// Which check let a dimension pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchPath {
    /// Literal site key or datatype code, or a literal param type, interval or duration.
    Literal,
    Full,
    Base,
    Sub,
}

impl fmt::Display for MatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchPath::Literal => "literal",
            MatchPath::Full => "full",
            MatchPath::Base => "base",
            MatchPath::Sub => "sub",
        };
        f.write_str(s)
    }
}

/// Why a candidate is not a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The group has no configured dimension.
    EmptyGroup,
    /// A configured dimension did not match.
    NoMatch(Dimension),
    /// The candidate lacks a part the group needs.
    MalformedCandidate(Dimension),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::EmptyGroup => f.write_str("empty group"),
            Rejection::NoMatch(dim) => write!(f, "no match on {dim}"),
            Rejection::MalformedCandidate(dim) => write!(f, "candidate has no {dim} part"),
        }
    }
}

/// Diagnostics returned by
/// [`CompiledRuleSet::matches_detailed()`](super::ruleset::CompiledRuleSet::matches_detailed).
///
/// Lists the dimensions that passed, in evaluation order, with the check that
/// passed each one. Evaluation stops at the first failing dimension.
#[derive(Debug, Clone)]
#[must_use]
pub struct MatchReport {
    passed: Vec<(Dimension, MatchPath)>,
    rejection: Option<Rejection>,
    duration: Duration,
}

impl MatchReport {
    pub(crate) fn new(
        passed: Vec<(Dimension, MatchPath)>,
        rejection: Option<Rejection>,
        duration: Duration,
    ) -> Self {
        Self {
            passed,
            rejection,
            duration,
        }
    }

    /// Same answer as [`CompiledRuleSet::matches()`](super::ruleset::CompiledRuleSet::matches).
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.rejection.is_none()
    }

    #[must_use]
    pub fn passed(&self) -> &[(Dimension, MatchPath)] {
        &self.passed
    }

    /// The check that passed `dim`, if it was evaluated and passed.
    #[must_use]
    pub fn path(&self, dim: Dimension) -> Option<MatchPath> {
        self.passed
            .iter()
            .find(|(d, _)| *d == dim)
            .map(|(_, path)| *path)
    }

    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        self.rejection
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rejection {
            None => f.write_str("match")?,
            Some(r) => write!(f, "no match ({r})")?,
        }
        let passed: Vec<String> = self
            .passed
            .iter()
            .map(|(dim, path)| format!("{dim}:{path}"))
            .collect();
        write!(f, ", passed: [{}]", passed.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)
    }
}
