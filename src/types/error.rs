use thiserror::Error;

use super::dimension::MemberType;

/// A raw wildcard specification could not be turned into a matcher.
///
/// These are collected on the compiled rule set rather than returned: the
/// offending specification is dropped and the rest of the group still compiles.
#[derive(Debug, Clone, Error)]
#[error("cannot compile {} '{spec}', pattern='{pattern}': {source}", .member.label())]
pub struct PatternCompileError {
    pub member: MemberType,
    pub spec: String,
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown group member type '{name}'")]
pub struct UnknownMemberType {
    pub name: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate group name '{name}'")]
    DuplicateGroup { name: String },

    #[error("undefined subgroup '{reference}' in group '{group}'")]
    UndefinedSubgroup { group: String, reference: String },

    #[error("cyclic subgroup reference: {}", path.join(" -> "))]
    CyclicSubgroups { path: Vec<String> },
}

/// Structural defects in a time-series identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TsIdError {
    #[error("no location specified")]
    NoLocation,

    #[error("empty base location")]
    EmptyBaseLocation,

    #[error("no param specified")]
    NoParam,

    #[error("base parameter empty while using sub parameter")]
    EmptyBaseParam,

    #[error("no param type specified")]
    NoParamType,

    #[error("no interval specified")]
    NoInterval,

    #[error("no duration specified")]
    NoDuration,

    #[error("no version specified")]
    NoVersion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_compile_error_message() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = PatternCompileError {
            member: MemberType::SubLocation,
            spec: "AB*".into(),
            pattern: "^AB[^-]+$".into(),
            source,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("cannot compile SubLocation 'AB*', pattern='^AB[^-]+$': "));
    }

    #[test]
    fn pattern_compile_error_uses_full_label() {
        let err = PatternCompileError {
            member: MemberType::Version,
            spec: "x".into(),
            pattern: "^X$".into(),
            source: regex::Regex::new("[").unwrap_err(),
        };
        assert!(err.to_string().starts_with("cannot compile FullVersion 'x'"));
    }

    #[test]
    fn unknown_member_type_message() {
        let err = UnknownMemberType {
            name: "Office".into(),
        };
        assert_eq!(err.to_string(), "unknown group member type 'Office'");
    }

    #[test]
    fn duplicate_group_message() {
        let err = CatalogError::DuplicateGroup {
            name: "Stage".into(),
        };
        assert_eq!(err.to_string(), "duplicate group name 'Stage'");
    }

    #[test]
    fn undefined_subgroup_message() {
        let err = CatalogError::UndefinedSubgroup {
            group: "All Stage".into(),
            reference: "Missing".into(),
        };
        assert_eq!(
            err.to_string(),
            "undefined subgroup 'Missing' in group 'All Stage'"
        );
    }

    #[test]
    fn cyclic_subgroups_message() {
        let err = CatalogError::CyclicSubgroups {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "cyclic subgroup reference: a -> b -> a");
    }

    #[test]
    fn tsid_error_messages() {
        assert_eq!(TsIdError::NoLocation.to_string(), "no location specified");
        assert_eq!(
            TsIdError::EmptyBaseParam.to_string(),
            "base parameter empty while using sub parameter"
        );
    }
}
