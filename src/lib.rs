mod compile;
mod error;
mod evaluate;
pub mod parse;
pub mod pattern;
#[cfg(feature = "binary-cache")]
pub mod serial;
mod types;

pub use error::TsGroupError;
pub use pattern::WildcardPattern;
pub use types::{
    split_base_sub, CatalogError, Combine, CompileOptions, CompiledCatalog, CompiledRuleSet,
    DataTypeKey, DataTypeRef, Dimension, Granularity, GroupCatalog, GroupDefinition, GroupMember,
    MatchPath, MatchReport, MemberType, PatternCompileError, Rejection, SiteKey, SubgroupRef,
    TsId, TsIdError, TsIdentifier, UnknownMemberType,
};

#[cfg(feature = "binary-cache")]
pub use serial::{DeserializeError, SerializeError};
