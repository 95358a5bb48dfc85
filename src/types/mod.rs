mod catalog;
mod dimension;
mod error;
mod group;
mod match_report;
mod ruleset;
mod tsid;

pub use catalog::{CompiledCatalog, GroupCatalog};
pub(crate) use catalog::CompiledGroup;
pub use dimension::{Dimension, Granularity, MemberType};
pub use error::{CatalogError, PatternCompileError, TsIdError, UnknownMemberType};
pub use group::{
    Combine, DataTypeKey, DataTypeRef, GroupDefinition, GroupMember, SiteKey, SubgroupRef,
};
pub use match_report::{MatchPath, MatchReport, Rejection};
pub use ruleset::{CompileOptions, CompiledRuleSet};
pub(crate) use ruleset::PatternTiers;
pub use tsid::{split_base_sub, TsId, TsIdentifier};
