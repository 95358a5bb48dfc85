use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::error::{CatalogError, PatternCompileError};
use super::group::GroupDefinition;
use super::ruleset::{CompileOptions, CompiledRuleSet};
use super::tsid::TsIdentifier;

/// A set of named group definitions that may reference each other.
///
/// # Example
///
/// ```
/// use tsgroup::{GroupCatalog, GroupDefinition, MemberType, TsId};
///
/// let catalog = GroupCatalog::new()
///     .group(GroupDefinition::new("Stage").with_member(MemberType::BaseParam, "Stage"))
///     .group(GroupDefinition::new("Retired").with_member(MemberType::Location, "OLD*"))
///     .group(GroupDefinition::new("Active Stage").include("Stage").exclude("Retired"))
///     .compile()
///     .unwrap();
///
/// let ids = [
///     TsId::from_path("ABC.Stage.Inst.1Hour.0.raw"),
///     TsId::from_path("OLDX.Stage.Inst.1Hour.0.raw"),
///     TsId::from_path("ABC.Flow.Inst.1Hour.0.raw"),
/// ];
/// let members = catalog.expand("Active Stage", &ids).unwrap();
/// assert_eq!(members.len(), 1);
/// assert_eq!(members[0].to_string(), "ABC.Stage.Inst.1Hour.0.raw");
/// ```
#[derive(Debug, Clone, Default)]
pub struct GroupCatalog {
    groups: Vec<GroupDefinition>,
}

impl GroupCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group definition.
    #[must_use]
    pub fn group(mut self, definition: GroupDefinition) -> Self {
        self.groups.push(definition);
        self
    }

    pub fn insert(&mut self, definition: GroupDefinition) {
        self.groups.push(definition);
    }

    #[must_use]
    pub fn groups(&self) -> &[GroupDefinition] {
        &self.groups
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GroupDefinition> {
        self.groups.iter().find(|g| g.name() == name)
    }

    /// Edit a definition in place. Compile the catalog again afterwards.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut GroupDefinition> {
        self.groups.iter_mut().find(|g| g.name() == name)
    }

    /// Remove a definition, returning it.
    pub fn remove(&mut self, name: &str) -> Option<GroupDefinition> {
        let idx = self.groups.iter().position(|g| g.name() == name)?;
        Some(self.groups.remove(idx))
    }

    /// Validate subgroup references and compile every group with default options.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on duplicate names, undefined subgroups, or
    /// cyclic subgroup references.
    pub fn compile(&self) -> Result<CompiledCatalog, CatalogError> {
        self.compile_with(&CompileOptions::default())
    }

    /// # Errors
    ///
    /// See [`compile()`](Self::compile).
    pub fn compile_with(&self, options: &CompileOptions) -> Result<CompiledCatalog, CatalogError> {
        crate::compile::compile_catalog(&self.groups, options)
    }

    /// Parse a catalog from DSL text.
    ///
    /// # Errors
    ///
    /// Returns [`TsGroupError`](crate::TsGroupError) on parse failure.
    pub fn from_dsl(input: &str) -> Result<Self, crate::TsGroupError> {
        let parsed = crate::parse::parse(input)?;
        Ok(Self {
            groups: parsed.groups,
        })
    }

    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`TsGroupError`](crate::TsGroupError) on I/O or parse failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::TsGroupError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_dsl(&input)
    }
}

/// A group with its rules compiled and its subgroups resolved to indices.
#[derive(Debug, Clone)]
pub(crate) struct CompiledGroup {
    pub(crate) definition: GroupDefinition,
    pub(crate) rules: CompiledRuleSet,
    /// Explicit member paths, upper-cased.
    pub(crate) explicit: Vec<String>,
    pub(crate) includes: Vec<usize>,
    pub(crate) excludes: Vec<usize>,
    pub(crate) intersects: Vec<usize>,
    /// Groups to evaluate, ascending, ending with this one.
    pub(crate) plan: Vec<usize>,
    pub(crate) needs_unique_string: bool,
}

/// A compiled, immutable catalog. Thread-safe and designed to live behind `Arc`.
///
/// Groups are stored in evaluation order: every subgroup precedes the groups
/// that reference it.
#[derive(Debug, Clone)]
pub struct CompiledCatalog {
    pub(crate) groups: Vec<CompiledGroup>,
    pub(crate) group_indices: HashMap<String, usize>,
    pub(crate) options: CompileOptions,
}

impl CompiledCatalog {
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The options the catalog was compiled with.
    #[must_use]
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// The compiled rules of one group, ignoring its subgroups.
    #[must_use]
    pub fn rule_set(&self, name: &str) -> Option<&CompiledRuleSet> {
        self.find(name).map(|g| &g.rules)
    }

    #[must_use]
    pub fn definition(&self, name: &str) -> Option<&GroupDefinition> {
        self.find(name).map(|g| &g.definition)
    }

    /// Whether the candidate is a member of the named group, subgroups included.
    ///
    /// Returns `None` if no group has that name.
    #[must_use]
    pub fn contains<T: TsIdentifier + ?Sized>(&self, name: &str, candidate: &T) -> Option<bool> {
        let target = *self.group_indices.get(name)?;
        let mut scratch = vec![false; self.groups.len()];
        Some(crate::evaluate::group_contains(
            &self.groups,
            target,
            candidate,
            &mut scratch,
        ))
    }

    /// The candidates that are members of the named group, in input order.
    ///
    /// Returns `None` if no group has that name.
    #[must_use]
    pub fn expand<'a, T: TsIdentifier>(&self, name: &str, candidates: &'a [T]) -> Option<Vec<&'a T>> {
        let target = *self.group_indices.get(name)?;
        let mut scratch = vec![false; self.groups.len()];
        let members: Vec<&'a T> = candidates
            .iter()
            .filter(|c| crate::evaluate::group_contains(&self.groups, target, *c, &mut scratch))
            .collect();
        debug!(
            group = name,
            "expanded group: {} of {} identifiers matched",
            members.len(),
            candidates.len()
        );
        Some(members)
    }

    /// Names of every group the candidate belongs to, in evaluation order.
    ///
    /// All groups are decided in a single pass, so each subgroup is evaluated once.
    #[must_use]
    pub fn groups_containing<T: TsIdentifier + ?Sized>(&self, candidate: &T) -> Vec<&str> {
        let results = crate::evaluate::all_groups_containing(&self.groups, candidate);
        self.groups
            .iter()
            .zip(results)
            .filter_map(|(g, member)| member.then(|| g.definition.name()))
            .collect()
    }

    /// Group names in evaluation order.
    #[must_use]
    pub fn evaluation_order(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.definition.name()).collect()
    }

    /// Names of the subgroups a group references directly.
    ///
    /// Returns `None` if no group has that name.
    #[must_use]
    pub fn dependencies_of(&self, name: &str) -> Option<Vec<&str>> {
        self.find(name).map(|g| {
            g.definition
                .subgroups()
                .iter()
                .map(|s| s.name.as_str())
                .collect()
        })
    }

    /// Names of every group that references the named group, directly or
    /// through other subgroups, in evaluation order. These are the groups whose
    /// membership can change when the named group changes.
    ///
    /// Returns `None` if no group has that name.
    #[must_use]
    pub fn dependents_of(&self, name: &str) -> Option<Vec<&str>> {
        let target = *self.group_indices.get(name)?;
        Some(
            self.groups
                .iter()
                .skip(target + 1)
                .filter(|g| g.plan.binary_search(&target).is_ok())
                .map(|g| g.definition.name())
                .collect(),
        )
    }

    /// Every dropped spec across the catalog, with the name of its group.
    #[must_use]
    pub fn compile_errors(&self) -> Vec<(&str, &PatternCompileError)> {
        self.groups
            .iter()
            .flat_map(|g| g.rules.errors().iter().map(move |e| (g.definition.name(), e)))
            .collect()
    }

    fn find(&self, name: &str) -> Option<&CompiledGroup> {
        self.group_indices.get(name).map(|&idx| &self.groups[idx])
    }
}

#[cfg(feature = "binary-cache")]
impl CompiledCatalog {
    /// Serialize this catalog to a byte vector.
    ///
    /// The optional `source_text` is hashed (BLAKE3) and embedded in the
    /// payload; [`serial::is_stale`](crate::serial::is_stale) compares against it.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) if encoding fails.
    pub fn to_bytes(
        &self,
        source_text: Option<&str>,
    ) -> Result<Vec<u8>, crate::serial::SerializeError> {
        crate::serial::encode(self, source_text)
    }

    /// Load a catalog from bytes produced by [`to_bytes`](Self::to_bytes).
    /// Patterns are recompiled with the stored options.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// format, integrity, or validation failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::serial::DeserializeError> {
        crate::serial::decode(bytes)
    }

    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) on
    /// encoding or I/O failure.
    pub fn to_binary_file(
        &self,
        path: impl AsRef<std::path::Path>,
        source_text: Option<&str>,
    ) -> Result<(), crate::serial::SerializeError> {
        let bytes = self.to_bytes(source_text)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// I/O, format, integrity, or validation failure.
    pub fn from_binary_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, crate::serial::DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for CompiledCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors: usize = self.groups.iter().map(|g| g.rules.errors().len()).sum();
        write!(
            f,
            "CompiledCatalog({} groups, {} dropped specs)",
            self.groups.len(),
            errors
        )
    }
}
