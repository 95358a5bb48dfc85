use std::fmt;

use super::dimension::MemberType;
use super::ruleset::{CompileOptions, CompiledRuleSet};

/// Surrogate key of a location (site) record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteKey(pub i64);

/// Surrogate key of a datatype (param) record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataTypeKey(pub i64);

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DataTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A literal datatype member with its code already resolved.
///
/// Membership compares the code as text, not the key: two datatype records that
/// differ only in letter case are the same parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTypeRef {
    pub key: DataTypeKey,
    pub code: String,
}

/// One `(type, value)` entry of a group's member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub member_type: MemberType,
    pub value: String,
}

/// How a subgroup's members combine with the parent group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combine {
    Include,
    Exclude,
    Intersect,
}

impl Combine {
    /// Decode a persisted one-letter combine code: `S` or `F` exclude, `I`
    /// intersects, anything else includes.
    #[must_use]
    pub fn from_code(code: char) -> Self {
        match code.to_ascii_uppercase() {
            'S' | 'F' => Combine::Exclude,
            'I' => Combine::Intersect,
            _ => Combine::Include,
        }
    }

    #[must_use]
    pub fn code(self) -> char {
        match self {
            Combine::Include => 'A',
            Combine::Exclude => 'S',
            Combine::Intersect => 'I',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubgroupRef {
    pub name: String,
    pub combine: Combine,
}

/// A declarative time-series group.
///
/// A definition is plain data. Compile it with
/// [`compile()`](Self::compile) before testing candidates; after editing,
/// compile again.
///
/// # Example
///
/// ```
/// use tsgroup::{GroupDefinition, MemberType, TsId};
///
/// let rules = GroupDefinition::new("Upstream")
///     .with_member(MemberType::BaseLocation, "AB*")
///     .with_member(MemberType::ParamType, "Inst")
///     .compile();
///
/// assert!(rules.matches(&TsId::from_path("ABCDE.Stage.Inst.1Hour.0.raw")));
/// assert!(!rules.matches(&TsId::from_path("ABCDE.Stage.Ave.1Hour.1Hour.raw")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDefinition {
    name: String,
    description: String,
    site_ids: Vec<SiteKey>,
    data_types: Vec<DataTypeRef>,
    members: Vec<GroupMember>,
    ts_members: Vec<String>,
    subgroups: Vec<SubgroupRef>,
}

impl GroupDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_site(mut self, key: SiteKey) -> Self {
        self.add_site_id(key);
        self
    }

    #[must_use]
    pub fn with_data_type(mut self, key: DataTypeKey, code: impl Into<String>) -> Self {
        self.add_data_type(key, code);
        self
    }

    #[must_use]
    pub fn with_member(mut self, member_type: MemberType, value: impl Into<String>) -> Self {
        self.add_member(member_type, value);
        self
    }

    #[must_use]
    pub fn with_ts_member(mut self, unique_string: impl Into<String>) -> Self {
        self.add_ts_member(unique_string);
        self
    }

    #[must_use]
    pub fn with_subgroup(mut self, name: impl Into<String>, combine: Combine) -> Self {
        self.add_subgroup(name, combine);
        self
    }

    #[must_use]
    pub fn include(self, name: impl Into<String>) -> Self {
        self.with_subgroup(name, Combine::Include)
    }

    #[must_use]
    pub fn exclude(self, name: impl Into<String>) -> Self {
        self.with_subgroup(name, Combine::Exclude)
    }

    #[must_use]
    pub fn intersect(self, name: impl Into<String>) -> Self {
        self.with_subgroup(name, Combine::Intersect)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    #[must_use]
    pub fn site_ids(&self) -> &[SiteKey] {
        &self.site_ids
    }

    pub fn add_site_id(&mut self, key: SiteKey) {
        self.site_ids.push(key);
    }

    #[must_use]
    pub fn data_types(&self) -> &[DataTypeRef] {
        &self.data_types
    }

    pub fn add_data_type(&mut self, key: DataTypeKey, code: impl Into<String>) {
        self.data_types.push(DataTypeRef {
            key,
            code: code.into(),
        });
    }

    /// All member entries, in insertion order.
    #[must_use]
    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    /// Values listed under one member type, in insertion order.
    pub fn members_of(&self, member_type: MemberType) -> impl Iterator<Item = &str> + '_ {
        self.members
            .iter()
            .filter(move |m| m.member_type == member_type)
            .map(|m| m.value.as_str())
    }

    /// Add a member entry. An existing entry with the same type and the same
    /// value (ignoring case) is replaced.
    pub fn add_member(&mut self, member_type: MemberType, value: impl Into<String>) {
        let value = value.into();
        self.remove_member(member_type, &value);
        self.members.push(GroupMember { member_type, value });
    }

    /// Remove the entry with this type and value (ignoring case).
    /// Returns whether an entry was removed.
    pub fn remove_member(&mut self, member_type: MemberType, value: &str) -> bool {
        let found = self.members.iter().position(|m| {
            m.member_type == member_type && m.value.to_uppercase() == value.to_uppercase()
        });
        match found {
            Some(idx) => {
                self.members.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Explicitly listed time-series identifiers (dotted paths).
    #[must_use]
    pub fn ts_members(&self) -> &[String] {
        &self.ts_members
    }

    pub fn add_ts_member(&mut self, unique_string: impl Into<String>) {
        self.ts_members.push(unique_string.into());
    }

    #[must_use]
    pub fn subgroups(&self) -> &[SubgroupRef] {
        &self.subgroups
    }

    pub fn add_subgroup(&mut self, name: impl Into<String>, combine: Combine) {
        self.subgroups.push(SubgroupRef {
            name: name.into(),
            combine,
        });
    }

    /// Remove every member, literal ID, explicit identifier and subgroup.
    /// Name and description are kept.
    pub fn clear(&mut self) {
        self.site_ids.clear();
        self.data_types.clear();
        self.members.clear();
        self.ts_members.clear();
        self.subgroups.clear();
    }

    /// Compile this group's own rules with default options. Subgroups are
    /// resolved only by [`GroupCatalog`](super::catalog::GroupCatalog).
    #[must_use]
    pub fn compile(&self) -> CompiledRuleSet {
        CompiledRuleSet::build(self)
    }

    #[must_use]
    pub fn compile_with(&self, options: &CompileOptions) -> CompiledRuleSet {
        CompiledRuleSet::build_with(self, options)
    }
}
