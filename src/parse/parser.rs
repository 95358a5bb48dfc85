use crate::GroupDefinition;

/// The result of parsing group DSL text, in definition order.
#[derive(Debug, Default)]
pub struct ParsedCatalog {
    pub groups: Vec<GroupDefinition>,
}
