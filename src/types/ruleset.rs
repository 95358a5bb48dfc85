use std::fmt;

use crate::pattern::WildcardPattern;

use super::dimension::{Dimension, Granularity, MemberType};
use super::error::PatternCompileError;
use super::group::{GroupDefinition, SiteKey};
use super::match_report::MatchReport;
use super::tsid::TsIdentifier;

/// Limits handed to the regex engine when compiling member specs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Approximate size limit, in bytes, of one compiled pattern.
    pub size_limit: usize,
    /// Size limit, in bytes, of the lazy DFA cache of one pattern.
    pub dfa_size_limit: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            size_limit: 10 * (1 << 20),
            dfa_size_limit: 2 * (1 << 20),
        }
    }
}

/// Full, base and sub pattern lists for one dimension.
#[derive(Debug, Clone, Default)]
pub(crate) struct PatternTiers {
    pub(crate) full: Vec<WildcardPattern>,
    pub(crate) base: Vec<WildcardPattern>,
    pub(crate) sub: Vec<WildcardPattern>,
}

impl PatternTiers {
    pub(crate) fn is_empty(&self) -> bool {
        self.full.is_empty() && self.base.is_empty() && self.sub.is_empty()
    }

    pub(crate) fn tier(&self, granularity: Granularity) -> &[WildcardPattern] {
        match granularity {
            Granularity::Full => &self.full,
            Granularity::Base => &self.base,
            Granularity::Sub => &self.sub,
        }
    }

    pub(crate) fn tier_mut(&mut self, granularity: Granularity) -> &mut Vec<WildcardPattern> {
        match granularity {
            Granularity::Full => &mut self.full,
            Granularity::Base => &mut self.base,
            Granularity::Sub => &mut self.sub,
        }
    }

    fn len(&self) -> usize {
        self.full.len() + self.base.len() + self.sub.len()
    }
}

/// The compiled, immutable membership rules of one group.
///
/// Built once per group definition; evaluated any number of times, from any
/// number of threads. Literal values are stored upper-cased.
#[derive(Debug, Clone, Default)]
pub struct CompiledRuleSet {
    pub(crate) name: String,
    pub(crate) site_ids: Vec<SiteKey>,
    pub(crate) data_type_codes: Vec<String>,
    pub(crate) location: PatternTiers,
    pub(crate) param: PatternTiers,
    pub(crate) version: PatternTiers,
    pub(crate) param_types: Vec<String>,
    pub(crate) intervals: Vec<String>,
    pub(crate) durations: Vec<String>,
    pub(crate) errors: Vec<PatternCompileError>,
}

impl CompiledRuleSet {
    /// Compile a group definition with default options.
    ///
    /// Specs that fail to compile are logged, dropped, and kept in
    /// [`errors()`](Self::errors).
    #[must_use]
    pub fn build(definition: &GroupDefinition) -> Self {
        Self::build_with(definition, &CompileOptions::default())
    }

    #[must_use]
    pub fn build_with(definition: &GroupDefinition, options: &CompileOptions) -> Self {
        crate::compile::build(definition, options)
    }

    /// Whether the candidate is a member of this group.
    ///
    /// A group with no configured dimension matches nothing.
    #[must_use]
    pub fn matches<T: TsIdentifier + ?Sized>(&self, candidate: &T) -> bool {
        crate::evaluate::matches(self, candidate)
    }

    /// Evaluate with per-dimension diagnostics.
    pub fn matches_detailed<T: TsIdentifier + ?Sized>(&self, candidate: &T) -> MatchReport {
        crate::evaluate::matches_detailed(self, candidate)
    }

    /// Name of the group these rules were compiled from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Specs that were dropped because they could not be compiled.
    #[must_use]
    pub fn errors(&self) -> &[PatternCompileError] {
        &self.errors
    }

    /// The compiled patterns for one wildcard member type, in definition order.
    /// Literal member types have no patterns.
    #[must_use]
    pub fn patterns(&self, member_type: MemberType) -> &[WildcardPattern] {
        match member_type.dimension() {
            Dimension::Location => self.location.tier(member_type.granularity()),
            Dimension::Param => self.param.tier(member_type.granularity()),
            Dimension::Version => self.version.tier(member_type.granularity()),
            Dimension::ParamType | Dimension::Interval | Dimension::Duration => &[],
        }
    }

    /// Whether a dimension imposes any constraint.
    #[must_use]
    pub fn is_configured(&self, dim: Dimension) -> bool {
        match dim {
            Dimension::Location => !self.site_ids.is_empty() || !self.location.is_empty(),
            Dimension::Param => !self.data_type_codes.is_empty() || !self.param.is_empty(),
            Dimension::ParamType => !self.param_types.is_empty(),
            Dimension::Interval => !self.intervals.is_empty(),
            Dimension::Duration => !self.durations.is_empty(),
            Dimension::Version => !self.version.is_empty(),
        }
    }

    /// Dimensions that impose a constraint, in evaluation order.
    #[must_use]
    pub fn configured_dimensions(&self) -> Vec<Dimension> {
        Dimension::ALL
            .into_iter()
            .filter(|&d| self.is_configured(d))
            .collect()
    }

    /// True when no dimension is configured. Such a group matches nothing.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        !Dimension::ALL.into_iter().any(|d| self.is_configured(d))
    }

    fn pattern_count(&self) -> usize {
        self.location.len() + self.param.len() + self.version.len()
    }

    fn literal_count(&self) -> usize {
        self.site_ids.len()
            + self.data_type_codes.len()
            + self.param_types.len()
            + self.intervals.len()
            + self.durations.len()
    }
}

impl fmt::Display for CompiledRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CompiledRuleSet('{}': {} patterns, {} literals, {} errors)",
            self.name,
            self.pattern_count(),
            self.literal_count(),
            self.errors.len(),
        )
    }
}
