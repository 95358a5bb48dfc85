use tsgroup::{
    CompileOptions, DataTypeKey, Dimension, GroupDefinition, MatchPath, MemberType, Rejection,
    TsId,
};

fn id(path: &str) -> TsId {
    TsId::from_path(path)
}

// ---------------------------------------------------------------------------
// Base location wildcards
// ---------------------------------------------------------------------------

#[test]
fn base_location_wildcard_matches_unhyphenated_location() {
    let rules = GroupDefinition::new("AB sites")
        .with_member(MemberType::BaseLocation, "AB*")
        .compile();
    assert!(rules.matches(&id("ABCDE.Stage.Inst.1Hour.0.raw")));
}

#[test]
fn base_location_wildcard_rejects_other_base() {
    let rules = GroupDefinition::new("AB sites")
        .with_member(MemberType::BaseLocation, "AB*")
        .compile();
    assert!(!rules.matches(&id("XYZ-ABC.Stage.Inst.1Hour.0.raw")));
    // "ABC" is "AB" plus one non-hyphen character.
    assert!(rules.matches(&id("ABC-XYZ.Stage.Inst.1Hour.0.raw")));
}

#[test]
fn full_location_wildcard_stops_at_hyphen() {
    let rules = GroupDefinition::new("g")
        .with_member(MemberType::Location, "AB*")
        .compile();
    assert!(rules.matches(&id("ABCD.Stage.Inst.1Hour.0.raw")));
    assert!(!rules.matches(&id("ABC-DEF.Stage.Inst.1Hour.0.raw")));
}

// ---------------------------------------------------------------------------
// Literal dimensions
// ---------------------------------------------------------------------------

#[test]
fn param_type_is_literal_and_case_insensitive() {
    let rules = GroupDefinition::new("instantaneous")
        .with_member(MemberType::ParamType, "Inst")
        .compile();
    assert!(rules.matches(&id("ABC.Stage.INST.1Hour.0.raw")));
    assert!(!rules.matches(&id("ABC.Stage.Ave.1Hour.0.raw")));
}

#[test]
fn literal_datatype_codes_differing_in_case() {
    let rules = GroupDefinition::new("stage")
        .with_data_type(DataTypeKey(10), "Stage")
        .with_data_type(DataTypeKey(11), "STAGE")
        .compile();
    let report = rules.matches_detailed(&id("ABC.stage.Inst.1Hour.0.raw"));
    assert!(report.is_match());
    assert_eq!(report.path(Dimension::Param), Some(MatchPath::Literal));
}

// ---------------------------------------------------------------------------
// Version fallback
// ---------------------------------------------------------------------------

#[test]
fn full_version_matches_regardless_of_sub_list() {
    let rules = GroupDefinition::new("raw")
        .with_member(MemberType::Version, "RAW")
        .with_member(MemberType::SubVersion, "REV*")
        .compile();
    let report = rules.matches_detailed(&id("ABC.Stage.Inst.1Hour.0.raw"));
    assert!(report.is_match());
    assert_eq!(report.path(Dimension::Version), Some(MatchPath::Full));
}

#[test]
fn version_tries_sub_before_base() {
    let rules = GroupDefinition::new("g")
        .with_member(MemberType::Version, "NOPE")
        .with_member(MemberType::BaseVersion, "RAW")
        .with_member(MemberType::SubVersion, "REV*")
        .compile();
    let report = rules.matches_detailed(&id("ABC.Stage.Inst.1Hour.0.raw-rev1"));
    assert_eq!(report.path(Dimension::Version), Some(MatchPath::Sub));
}

#[test]
fn location_tries_base_before_sub() {
    let rules = GroupDefinition::new("g")
        .with_member(MemberType::Location, "NOPE")
        .with_member(MemberType::BaseLocation, "ABC")
        .with_member(MemberType::SubLocation, "POOL")
        .compile();
    let report = rules.matches_detailed(&id("ABC-Pool.Stage.Inst.1Hour.0.raw"));
    assert_eq!(report.path(Dimension::Location), Some(MatchPath::Base));
}

// ---------------------------------------------------------------------------
// Dimension combination
// ---------------------------------------------------------------------------

#[test]
fn dimensions_are_anded() {
    let rules = GroupDefinition::new("g")
        .with_member(MemberType::Location, "ABC")
        .with_member(MemberType::ParamType, "Inst")
        .compile();
    assert!(rules.matches(&id("ABC.Stage.Inst.1Hour.0.raw")));
    assert!(!rules.matches(&id("ABC.Stage.Ave.1Hour.0.raw")));
    assert!(!rules.matches(&id("XYZ.Stage.Inst.1Hour.0.raw")));
}

#[test]
fn unconstrained_group_matches_nothing() {
    let rules = GroupDefinition::new("empty")
        .with_description("nothing configured")
        .compile();
    assert!(rules.is_unconstrained());
    for path in ["ABC.Stage.Inst.1Hour.0.raw", "", "A.B"] {
        assert!(!rules.matches(&id(path)));
    }
}

#[test]
fn malformed_candidate_is_a_non_match() {
    let rules = GroupDefinition::new("g")
        .with_member(MemberType::Param, "Stage")
        .compile();
    let candidates = [id("ABC"), id("ABC.Stage.Inst.1Hour.0.raw"), id("XYZ")];
    let matched: Vec<bool> = candidates.iter().map(|c| rules.matches(c)).collect();
    assert_eq!(matched, vec![false, true, false]);
    assert_eq!(
        rules.matches_detailed(&candidates[0]).rejection(),
        Some(Rejection::MalformedCandidate(Dimension::Param))
    );
}

// ---------------------------------------------------------------------------
// Compile failures
// ---------------------------------------------------------------------------

#[test]
fn failed_spec_is_dropped_and_others_still_apply() {
    let options = CompileOptions {
        size_limit: 64 * 1024,
        ..CompileOptions::default()
    };
    let rules = GroupDefinition::new("g")
        .with_member(MemberType::BaseLocation, "*".repeat(1000))
        .with_member(MemberType::BaseLocation, "AB*")
        .compile_with(&options);

    assert_eq!(rules.errors().len(), 1);
    let err = &rules.errors()[0];
    assert_eq!(err.member, MemberType::BaseLocation);
    assert!(err.to_string().starts_with("cannot compile BaseLocation '***"));

    assert!(rules.matches(&id("ABCD.Stage.Inst.1Hour.0.raw")));
    assert!(!rules.matches(&id("XYZ.Stage.Inst.1Hour.0.raw")));
}

#[test]
fn group_whose_only_spec_failed_is_unconstrained() {
    let options = CompileOptions {
        size_limit: 64 * 1024,
        ..CompileOptions::default()
    };
    let rules = GroupDefinition::new("g")
        .with_member(MemberType::SubParam, "*".repeat(1000))
        .compile_with(&options);
    assert!(rules.is_unconstrained());
    assert!(!rules.matches(&id("ABC.Stage-Pool.Inst.1Hour.0.raw")));
}

// ---------------------------------------------------------------------------
// Rebuilds
// ---------------------------------------------------------------------------

#[test]
fn rebuild_reflects_edited_definition() {
    let mut def = GroupDefinition::new("g").with_member(MemberType::BaseParam, "Stage");
    let before = def.compile();
    def.clear();
    def.add_member(MemberType::BaseParam, "Flow");
    let after = def.compile();

    let stage = id("ABC.Stage.Inst.1Hour.0.raw");
    let flow = id("ABC.Flow.Inst.1Hour.0.raw");
    assert!(before.matches(&stage) && !before.matches(&flow));
    assert!(!after.matches(&stage) && after.matches(&flow));
}
