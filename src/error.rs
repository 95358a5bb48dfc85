use thiserror::Error;

use crate::parse::ParseError;
use crate::CatalogError;

/// Unified error type covering parsing, catalog validation, and I/O.
///
/// Returned by convenience methods like
/// [`GroupCatalog::from_dsl()`](crate::GroupCatalog::from_dsl) and
/// [`GroupCatalog::from_file()`](crate::GroupCatalog::from_file).
#[derive(Debug, Error)]
pub enum TsGroupError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}
