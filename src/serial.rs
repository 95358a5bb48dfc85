//! Binary snapshots of compiled group catalogs.
//!
//! A snapshot stores the group definitions of a
//! [`CompiledCatalog`](crate::CompiledCatalog) in evaluation order, with
//! subgroup references resolved to indices. Patterns are recompiled on load,
//! so a snapshot never depends on the regex engine's internal layout.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"TSGC"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! ## Versioning
//!
//! The format version in the header must match exactly. If it does not,
//! decoding fails immediately with [`DeserializeError::IncompatibleVersion`].
//! The engine version is informational only.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::{
    Combine, CompileOptions, CompiledCatalog, DataTypeKey, GroupDefinition, MemberType, SiteKey,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAGIC: &[u8; 4] = b"TSGC";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when writing a catalog snapshot.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode catalog: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when reading a catalog snapshot.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a group catalog snapshot: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("I/O error during deserialization: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Serialized type hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SerializedCatalog {
    metadata: CatalogMetadata,
    options: SerializedOptions,
    groups: Vec<SerializedGroup>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogMetadata {
    group_count: usize,
    member_count: usize,
    source_digest: Option<[u8; 32]>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SerializedOptions {
    size_limit: usize,
    dfa_size_limit: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedGroup {
    name: String,
    description: String,
    site_ids: Vec<i64>,
    data_types: Vec<(i64, String)>,
    /// Member type as its position in [`MemberType::ALL`].
    members: Vec<(u8, String)>,
    ts_members: Vec<String>,
    /// Earlier group index and combine code.
    subgroups: Vec<(usize, char)>,
}

// ---------------------------------------------------------------------------
// Member type codes
// ---------------------------------------------------------------------------

#[allow(clippy::cast_possible_truncation)] // MemberType::ALL has 12 entries
fn member_code(member_type: MemberType) -> u8 {
    MemberType::ALL
        .iter()
        .position(|&m| m == member_type)
        .unwrap_or_default() as u8
}

fn member_from_code(code: u8) -> Option<MemberType> {
    MemberType::ALL.get(usize::from(code)).copied()
}

// ---------------------------------------------------------------------------
// CompiledCatalog -> SerializedCatalog
// ---------------------------------------------------------------------------

fn catalog_to_serialized(catalog: &CompiledCatalog, source_text: Option<&str>) -> SerializedCatalog {
    let source_digest = source_text.map(|s| *blake3::hash(s.as_bytes()).as_bytes());

    let groups: Vec<SerializedGroup> = catalog
        .groups
        .iter()
        .map(|group| {
            let def = &group.definition;
            let subgroups = def
                .subgroups()
                .iter()
                .filter_map(|s| {
                    catalog
                        .group_indices
                        .get(&s.name)
                        .map(|&idx| (idx, s.combine.code()))
                })
                .collect();
            SerializedGroup {
                name: def.name().to_owned(),
                description: def.description().to_owned(),
                site_ids: def.site_ids().iter().map(|k| k.0).collect(),
                data_types: def
                    .data_types()
                    .iter()
                    .map(|dt| (dt.key.0, dt.code.clone()))
                    .collect(),
                members: def
                    .members()
                    .iter()
                    .map(|m| (member_code(m.member_type), m.value.clone()))
                    .collect(),
                ts_members: def.ts_members().to_vec(),
                subgroups,
            }
        })
        .collect();

    SerializedCatalog {
        metadata: CatalogMetadata {
            group_count: groups.len(),
            member_count: groups.iter().map(|g| g.members.len()).sum(),
            source_digest,
        },
        options: SerializedOptions {
            size_limit: catalog.options.size_limit,
            dfa_size_limit: catalog.options.dfa_size_limit,
        },
        groups,
    }
}

// ---------------------------------------------------------------------------
// SerializedCatalog -> CompiledCatalog
// ---------------------------------------------------------------------------

fn serialized_to_catalog(ser: SerializedCatalog) -> Result<CompiledCatalog, DeserializeError> {
    validate(&ser)?;

    let names: Vec<String> = ser.groups.iter().map(|g| g.name.clone()).collect();
    let mut definitions = Vec::with_capacity(ser.groups.len());
    for group in ser.groups {
        let mut def = GroupDefinition::new(group.name);
        def.set_description(group.description);
        for key in group.site_ids {
            def.add_site_id(SiteKey(key));
        }
        for (key, code) in group.data_types {
            def.add_data_type(DataTypeKey(key), code);
        }
        for (code, value) in group.members {
            if let Some(member_type) = member_from_code(code) {
                def.add_member(member_type, value);
            }
        }
        for path in group.ts_members {
            def.add_ts_member(path);
        }
        for (idx, code) in group.subgroups {
            def.add_subgroup(names[idx].clone(), Combine::from_code(code));
        }
        definitions.push(def);
    }

    let options = CompileOptions {
        size_limit: ser.options.size_limit,
        dfa_size_limit: ser.options.dfa_size_limit,
    };
    let catalog = crate::compile::compile_catalog(&definitions, &options)
        .map_err(|e| DeserializeError::Validation(e.to_string()))?;
    debug!(groups = catalog.len(), "loaded catalog snapshot");
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(ser: &SerializedCatalog) -> Result<(), DeserializeError> {
    let group_count = ser.groups.len();

    if ser.metadata.group_count != group_count {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} groups but payload has {}",
            ser.metadata.group_count, group_count
        )));
    }
    let member_count: usize = ser.groups.iter().map(|g| g.members.len()).sum();
    if ser.metadata.member_count != member_count {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} members but payload has {}",
            ser.metadata.member_count, member_count
        )));
    }

    for (index, group) in ser.groups.iter().enumerate() {
        validate_group(group, index)?;
    }
    Ok(())
}

fn validate_group(group: &SerializedGroup, index: usize) -> Result<(), DeserializeError> {
    for &(code, _) in &group.members {
        if member_from_code(code).is_none() {
            return Err(DeserializeError::Validation(format!(
                "group '{}' has unknown member type code {code}",
                group.name
            )));
        }
    }
    for &(idx, combine) in &group.subgroups {
        if idx >= index {
            return Err(DeserializeError::Validation(format!(
                "subgroup ref {idx} violates topological order (current group index {index})"
            )));
        }
        if !matches!(combine, 'A' | 'S' | 'I') {
            return Err(DeserializeError::Validation(format!(
                "group '{}' has unknown combine code '{combine}'",
                group.name
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Header I/O
// ---------------------------------------------------------------------------

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) {
    let hash = blake3::hash(payload);
    let hash_bytes = hash.as_bytes();

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags (reserved)
    #[allow(clippy::cast_possible_truncation)] // payload will never exceed 4 GiB
    let payload_len = payload.len() as u32;
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash_bytes[..16]);
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32, always fits in u32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

fn read_payload(bytes: &[u8]) -> Result<SerializedCatalog, DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_end = HEADER_SIZE + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[HEADER_SIZE..payload_end];

    let computed_hash = blake3::hash(payload);
    if computed_hash.as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (serialized, _): (SerializedCatalog, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    Ok(serialized)
}

// ---------------------------------------------------------------------------
// Public encode/decode
// ---------------------------------------------------------------------------

pub(crate) fn encode(
    catalog: &CompiledCatalog,
    source_text: Option<&str>,
) -> Result<Vec<u8>, SerializeError> {
    let serialized = catalog_to_serialized(catalog, source_text);
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<CompiledCatalog, DeserializeError> {
    serialized_to_catalog(read_payload(bytes)?)
}

/// Whether a snapshot was built from different source text.
///
/// A snapshot written without source text is always stale.
///
/// # Errors
///
/// Returns [`DeserializeError`] if the snapshot header or payload is invalid.
pub fn is_stale(bytes: &[u8], source_text: &str) -> Result<bool, DeserializeError> {
    let serialized = read_payload(bytes)?;
    let digest = *blake3::hash(source_text.as_bytes()).as_bytes();
    Ok(serialized.metadata.source_digest != Some(digest))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
