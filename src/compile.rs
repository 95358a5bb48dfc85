use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::pattern;
use crate::types::{
    CatalogError, Combine, CompileOptions, CompiledCatalog, CompiledGroup, CompiledRuleSet,
    Dimension, GroupDefinition, MemberType, PatternTiers,
};

pub(crate) fn build(definition: &GroupDefinition, options: &CompileOptions) -> CompiledRuleSet {
    let mut rules = CompiledRuleSet {
        name: definition.name().to_owned(),
        site_ids: definition.site_ids().to_vec(),
        data_type_codes: definition
            .data_types()
            .iter()
            .map(|dt| dt.code.to_uppercase())
            .collect(),
        ..CompiledRuleSet::default()
    };

    for member in definition.members() {
        let member_type = member.member_type;
        if !member_type.is_pattern() {
            literals_mut(&mut rules, member_type).push(member.value.to_uppercase());
            continue;
        }
        match pattern::compile(member_type, &member.value, options) {
            Ok(compiled) => tiers_mut(&mut rules, member_type.dimension())
                .tier_mut(member_type.granularity())
                .push(compiled),
            Err(err) => {
                warn!(group = %definition.name(), "{err}");
                rules.errors.push(err);
            }
        }
    }

    debug!(
        group = %definition.name(),
        sub_params = rules.param.sub.len(),
        failed = rules.errors.len(),
        "compiled group rules: {rules}"
    );
    rules
}

fn literals_mut(rules: &mut CompiledRuleSet, member_type: MemberType) -> &mut Vec<String> {
    match member_type {
        MemberType::ParamType => &mut rules.param_types,
        MemberType::Interval => &mut rules.intervals,
        _ => &mut rules.durations,
    }
}

fn tiers_mut(rules: &mut CompiledRuleSet, dim: Dimension) -> &mut PatternTiers {
    match dim {
        Dimension::Location => &mut rules.location,
        Dimension::Param => &mut rules.param,
        _ => &mut rules.version,
    }
}

pub(crate) fn compile_catalog(
    groups: &[GroupDefinition],
    options: &CompileOptions,
) -> Result<CompiledCatalog, CatalogError> {
    check_duplicates(groups)?;

    let group_map: HashMap<&str, &GroupDefinition> =
        groups.iter().map(|g| (g.name(), g)).collect();

    check_references(groups, &group_map)?;

    let sorted_names = topological_sort(groups)?;

    let group_indices: HashMap<String, usize> = sorted_names
        .iter()
        .enumerate()
        .map(|(i, name)| ((*name).to_owned(), i))
        .collect();

    let mut compiled: Vec<CompiledGroup> = Vec::with_capacity(sorted_names.len());
    for name in &sorted_names {
        let definition = group_map[name];
        let mut group = CompiledGroup {
            definition: definition.clone(),
            rules: build(definition, options),
            explicit: definition
                .ts_members()
                .iter()
                .map(|s| s.to_uppercase())
                .collect(),
            includes: Vec::new(),
            excludes: Vec::new(),
            intersects: Vec::new(),
            plan: Vec::new(),
            needs_unique_string: false,
        };
        for subgroup in definition.subgroups() {
            let idx = group_indices[subgroup.name.as_str()];
            match subgroup.combine {
                Combine::Include => group.includes.push(idx),
                Combine::Exclude => group.excludes.push(idx),
                Combine::Intersect => group.intersects.push(idx),
            }
        }
        plan_evaluation(&mut group, &compiled, compiled.len());
        compiled.push(group);
    }

    debug!(
        groups = compiled.len(),
        "compiled group catalog, evaluation order: {}",
        sorted_names.join(", ")
    );

    Ok(CompiledCatalog {
        groups: compiled,
        group_indices,
        options: *options,
    })
}

/// Fill in the ordered list of groups that must be evaluated, subgroups first,
/// to decide membership of the group at `index`. Every subgroup has a lower
/// index, so `earlier` already holds their plans.
pub(crate) fn plan_evaluation(group: &mut CompiledGroup, earlier: &[CompiledGroup], index: usize) {
    let mut plan: Vec<usize> = group
        .includes
        .iter()
        .chain(&group.excludes)
        .chain(&group.intersects)
        .flat_map(|&sub| earlier[sub].plan.iter().copied())
        .collect();
    plan.push(index);
    plan.sort_unstable();
    plan.dedup();

    group.needs_unique_string = !group.explicit.is_empty()
        || plan
            .iter()
            .filter(|&&i| i != index)
            .any(|&i| !earlier[i].explicit.is_empty());
    group.plan = plan;
}

fn check_duplicates(groups: &[GroupDefinition]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for group in groups {
        if !seen.insert(group.name()) {
            return Err(CatalogError::DuplicateGroup {
                name: group.name().to_owned(),
            });
        }
    }
    Ok(())
}

fn check_references(
    groups: &[GroupDefinition],
    group_map: &HashMap<&str, &GroupDefinition>,
) -> Result<(), CatalogError> {
    for group in groups {
        for subgroup in group.subgroups() {
            if !group_map.contains_key(subgroup.name.as_str()) {
                return Err(CatalogError::UndefinedSubgroup {
                    group: group.name().to_owned(),
                    reference: subgroup.name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Kahn's algorithm: subgroups are ordered before the groups that use them.
/// Ties keep definition order.
fn topological_sort(groups: &[GroupDefinition]) -> Result<Vec<&str>, CatalogError> {
    // dependents[X] = groups that reference X
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = HashMap::new();

    for group in groups {
        in_degree.entry(group.name()).or_insert(0);
        dependents.entry(group.name()).or_default();
    }

    for group in groups {
        for subgroup in group.subgroups() {
            dependents
                .entry(subgroup.name.as_str())
                .or_default()
                .push(group.name());
            *in_degree.entry(group.name()).or_insert(0) += 1;
        }
    }

    let mut queue: VecDeque<&str> = groups
        .iter()
        .map(GroupDefinition::name)
        .filter(|name| in_degree.get(name) == Some(&0))
        .collect();

    let mut sorted = Vec::with_capacity(groups.len());

    while let Some(name) = queue.pop_front() {
        if let Some(deps) = dependents.get(name) {
            for &dependent in deps {
                if let Some(deg) = in_degree.get_mut(dependent) {
                    *deg -= 1;
                    if *deg == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }
        sorted.push(name);
    }

    if sorted.len() != groups.len() {
        return Err(CatalogError::CyclicSubgroups {
            path: find_cycle(groups),
        });
    }

    Ok(sorted)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DfsState {
    Unvisited,
    InStack,
    Done,
}

/// DFS-based cycle finder for error reporting.
fn find_cycle(groups: &[GroupDefinition]) -> Vec<String> {
    let adj: HashMap<&str, Vec<&str>> = groups
        .iter()
        .map(|g| {
            let subs = g.subgroups().iter().map(|s| s.name.as_str()).collect();
            (g.name(), subs)
        })
        .collect();

    let mut state: HashMap<&str, DfsState> = groups
        .iter()
        .map(|g| (g.name(), DfsState::Unvisited))
        .collect();
    let mut stack: Vec<&str> = Vec::new();

    for group in groups {
        let name = group.name();
        if state.get(name) == Some(&DfsState::Unvisited) {
            if let Some(cycle) = dfs(name, &adj, &mut state, &mut stack) {
                return cycle;
            }
        }
    }

    vec![]
}

fn dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    state: &mut HashMap<&'a str, DfsState>,
    stack: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    state.insert(node, DfsState::InStack);
    stack.push(node);

    if let Some(neighbors) = adj.get(node) {
        for &neighbor in neighbors {
            match state.get(neighbor) {
                Some(DfsState::InStack) => {
                    let pos = stack.iter().position(|&n| n == neighbor)?;
                    let mut cycle: Vec<String> =
                        stack[pos..].iter().map(|&s| s.to_owned()).collect();
                    cycle.push(neighbor.to_owned());
                    return Some(cycle);
                }
                Some(DfsState::Unvisited) | None => {
                    if let Some(cycle) = dfs(neighbor, adj, state, stack) {
                        return Some(cycle);
                    }
                }
                Some(DfsState::Done) => {}
            }
        }
    }

    stack.pop();
    state.insert(node, DfsState::Done);
    None
}
