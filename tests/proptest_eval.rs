
use proptest::prelude::*;
use strategies::{arb_group, arb_tsid, glob_matches};
use tsgroup::{
    split_base_sub, Dimension, GroupDefinition, Granularity, MemberType, Rejection, TsId,
    TsIdentifier,
};

/// Straight-line restatement of the membership rules.
fn reference_matches(def: &GroupDefinition, id: &TsId) -> bool {
    let mut configured = 0;
    for dim in Dimension::ALL {
        let members: Vec<(MemberType, &str)> = def
            .members()
            .iter()
            .filter(|m| m.member_type.dimension() == dim)
            .map(|m| (m.member_type, m.value.as_str()))
            .collect();
        let site_literals = dim == Dimension::Location && !def.site_ids().is_empty();
        let code_literals = dim == Dimension::Param && !def.data_types().is_empty();
        if members.is_empty() && !site_literals && !code_literals {
            continue;
        }
        configured += 1;

        if site_literals && id.site_key().is_some_and(|k| def.site_ids().contains(&k)) {
            continue;
        }
        let value = id.part(dim).unwrap_or_default();
        if value.trim().is_empty() {
            return false;
        }
        if code_literals && def.data_types().iter().any(|dt| dt.code.eq_ignore_ascii_case(value)) {
            continue;
        }
        if members.is_empty() {
            return false;
        }

        let passed = if members[0].0.is_pattern() {
            let (base, sub) = split_base_sub(value);
            let order = if dim == Dimension::Version {
                [Granularity::Full, Granularity::Sub, Granularity::Base]
            } else {
                [Granularity::Full, Granularity::Base, Granularity::Sub]
            };
            order.iter().any(|&g| {
                let candidate = match g {
                    Granularity::Full => Some(value),
                    Granularity::Base => Some(base),
                    Granularity::Sub => sub,
                };
                candidate.is_some_and(|c| {
                    members
                        .iter()
                        .filter(|(mt, _)| mt.granularity() == g)
                        .any(|(_, spec)| glob_matches(spec, c))
                })
            })
        } else {
            members.iter().any(|(_, v)| v.eq_ignore_ascii_case(value))
        };
        if !passed {
            return false;
        }
    }
    configured > 0
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Compiled evaluation agrees with the reference model.
    #[test]
    fn eval_agrees_with_reference(def in arb_group(), id in arb_tsid()) {
        let rules = def.compile();
        prop_assert!(rules.errors().is_empty());
        prop_assert_eq!(rules.matches(&id), reference_matches(&def, &id), "group {:?} id {}", def, id);
    }

    /// The detailed report gives the same answer as the plain predicate.
    #[test]
    fn report_agrees_with_matches(def in arb_group(), id in arb_tsid()) {
        let rules = def.compile();
        let report = rules.matches_detailed(&id);
        prop_assert_eq!(report.is_match(), rules.matches(&id));
        if report.is_match() {
            prop_assert_eq!(report.passed().len(), rules.configured_dimensions().len());
        }
        if rules.is_unconstrained() {
            prop_assert_eq!(report.rejection(), Some(Rejection::EmptyGroup));
        }
    }

    /// Evaluation never panics, even for identifiers with missing parts.
    #[test]
    fn eval_never_panics_on_partial_ids(def in arb_group(), path in "[ABab.-]{0,12}") {
        let rules = def.compile();
        let id = TsId::from_path(&path);
        let _ = rules.matches(&id);
        let _ = rules.matches_detailed(&id);
    }
}
