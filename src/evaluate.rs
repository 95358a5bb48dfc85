use std::time::Instant;

use tracing::{trace, warn};

use crate::pattern::WildcardPattern;
use crate::types::{
    CompiledGroup, CompiledRuleSet, Dimension, Granularity, MatchPath, MatchReport, PatternTiers,
    Rejection, TsIdentifier,
};

/// Location and Param fall back full, base, sub.
const FULL_BASE_SUB: [Granularity; 3] = [Granularity::Full, Granularity::Base, Granularity::Sub];

/// Version falls back full, sub, base.
const FULL_SUB_BASE: [Granularity; 3] = [Granularity::Full, Granularity::Sub, Granularity::Base];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Unconfigured,
    Passed(MatchPath),
    Failed,
    Malformed,
}

pub(crate) fn matches<T: TsIdentifier + ?Sized>(rules: &CompiledRuleSet, candidate: &T) -> bool {
    let mut match_count = 0;
    for dim in Dimension::ALL {
        match check_dimension(rules, dim, candidate) {
            Outcome::Unconfigured => {}
            Outcome::Passed(_) => match_count += 1,
            Outcome::Failed | Outcome::Malformed => return false,
        }
    }
    match_count > 0
}

pub(crate) fn matches_detailed<T: TsIdentifier + ?Sized>(
    rules: &CompiledRuleSet,
    candidate: &T,
) -> MatchReport {
    let start = Instant::now();
    let mut passed = Vec::new();
    let mut rejection = None;

    for dim in Dimension::ALL {
        match check_dimension(rules, dim, candidate) {
            Outcome::Unconfigured => {}
            Outcome::Passed(path) => {
                trace!(group = %rules.name, %dim, %path, "dimension passed");
                passed.push((dim, path));
            }
            Outcome::Failed => {
                trace!(group = %rules.name, %dim, "dimension failed");
                rejection = Some(Rejection::NoMatch(dim));
                break;
            }
            Outcome::Malformed => {
                rejection = Some(Rejection::MalformedCandidate(dim));
                break;
            }
        }
    }

    if rejection.is_none() && passed.is_empty() {
        rejection = Some(Rejection::EmptyGroup);
    }
    MatchReport::new(passed, rejection, start.elapsed())
}

fn check_dimension<T: TsIdentifier + ?Sized>(
    rules: &CompiledRuleSet,
    dim: Dimension,
    candidate: &T,
) -> Outcome {
    if !rules.is_configured(dim) {
        return Outcome::Unconfigured;
    }
    match dim {
        Dimension::Location => check_location(rules, candidate),
        Dimension::Param => check_param(rules, candidate),
        Dimension::ParamType => check_literal(&rules.param_types, dim, candidate),
        Dimension::Interval => check_literal(&rules.intervals, dim, candidate),
        Dimension::Duration => check_literal(&rules.durations, dim, candidate),
        Dimension::Version => check_tiers(&rules.version, &FULL_SUB_BASE, dim, candidate),
    }
}

fn check_location<T: TsIdentifier + ?Sized>(rules: &CompiledRuleSet, candidate: &T) -> Outcome {
    if let Some(key) = candidate.site_key() {
        if rules.site_ids.contains(&key) {
            return Outcome::Passed(MatchPath::Literal);
        }
    }
    if rules.location.is_empty() {
        return Outcome::Failed;
    }
    check_tiers(&rules.location, &FULL_BASE_SUB, Dimension::Location, candidate)
}

fn check_param<T: TsIdentifier + ?Sized>(rules: &CompiledRuleSet, candidate: &T) -> Outcome {
    let Some(param) = present_part(candidate, Dimension::Param) else {
        return malformed(candidate, Dimension::Param);
    };
    let upper = param.to_uppercase();
    if rules.data_type_codes.iter().any(|code| *code == upper) {
        return Outcome::Passed(MatchPath::Literal);
    }
    if rules.param.is_empty() {
        return Outcome::Failed;
    }
    check_tiers(&rules.param, &FULL_BASE_SUB, Dimension::Param, candidate)
}

fn check_literal<T: TsIdentifier + ?Sized>(
    values: &[String],
    dim: Dimension,
    candidate: &T,
) -> Outcome {
    let Some(value) = present_part(candidate, dim) else {
        return malformed(candidate, dim);
    };
    let upper = value.to_uppercase();
    if values.iter().any(|v| *v == upper) {
        Outcome::Passed(MatchPath::Literal)
    } else {
        Outcome::Failed
    }
}

fn check_tiers<T: TsIdentifier + ?Sized>(
    tiers: &PatternTiers,
    order: &[Granularity; 3],
    dim: Dimension,
    candidate: &T,
) -> Outcome {
    let Some(part) = present_part(candidate, dim) else {
        return malformed(candidate, dim);
    };
    let full = part.to_uppercase();
    let base = candidate.base_part(dim).map(str::to_uppercase);
    let sub = candidate.sub_part(dim).map(str::to_uppercase);
    for &granularity in order {
        let value = match granularity {
            Granularity::Full => Some(full.as_str()),
            Granularity::Base => base.as_deref(),
            Granularity::Sub => sub.as_deref(),
        };
        if any_match(tiers.tier(granularity), value) {
            return Outcome::Passed(path_of(granularity));
        }
    }
    Outcome::Failed
}

/// `value` is already upper-cased.
fn any_match(patterns: &[WildcardPattern], value: Option<&str>) -> bool {
    value.is_some_and(|v| patterns.iter().any(|p| p.is_match_upper(v)))
}

fn path_of(granularity: Granularity) -> MatchPath {
    match granularity {
        Granularity::Full => MatchPath::Full,
        Granularity::Base => MatchPath::Base,
        Granularity::Sub => MatchPath::Sub,
    }
}

fn present_part<T: TsIdentifier + ?Sized>(candidate: &T, dim: Dimension) -> Option<&str> {
    candidate.part(dim).filter(|v| !v.trim().is_empty())
}

fn malformed<T: TsIdentifier + ?Sized>(candidate: &T, dim: Dimension) -> Outcome {
    warn!(
        candidate = %candidate.unique_string(),
        "time series identifier has no {} part",
        dim.as_str().to_lowercase()
    );
    Outcome::Malformed
}

/// Evaluate `target` and everything it depends on, in plan order.
///
/// `results` is scratch space indexed like `groups`; only plan entries are written.
pub(crate) fn group_contains<T: TsIdentifier + ?Sized>(
    groups: &[CompiledGroup],
    target: usize,
    candidate: &T,
    results: &mut [bool],
) -> bool {
    let plan = &groups[target].plan;
    let unique = groups[target]
        .needs_unique_string
        .then(|| candidate.unique_string().to_uppercase());

    for &idx in plan {
        results[idx] = is_member(&groups[idx], candidate, unique.as_deref(), results);
    }
    results[target]
}

/// Evaluate every group once, in catalog order. Entry `i` is membership in group `i`.
pub(crate) fn all_groups_containing<T: TsIdentifier + ?Sized>(
    groups: &[CompiledGroup],
    candidate: &T,
) -> Vec<bool> {
    let unique = groups
        .iter()
        .any(|g| g.needs_unique_string)
        .then(|| candidate.unique_string().to_uppercase());
    let mut results = vec![false; groups.len()];
    for (idx, group) in groups.iter().enumerate() {
        results[idx] = is_member(group, candidate, unique.as_deref(), &results);
    }
    results
}

fn is_member<T: TsIdentifier + ?Sized>(
    group: &CompiledGroup,
    candidate: &T,
    unique: Option<&str>,
    results: &[bool],
) -> bool {
    let explicit = unique.is_some_and(|u| group.explicit.iter().any(|e| e == u));
    let included = explicit
        || group.includes.iter().any(|&i| results[i])
        || group.rules.matches(candidate);

    included
        && !group.excludes.iter().any(|&i| results[i])
        && group.intersects.iter().all(|&i| results[i])
}
