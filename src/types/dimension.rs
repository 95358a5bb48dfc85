use std::fmt;
use std::str::FromStr;

use super::error::UnknownMemberType;

/// One of the six parts of a time-series identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Location,
    Param,
    ParamType,
    Interval,
    Duration,
    Version,
}

impl Dimension {
    /// All dimensions in identifier order.
    pub const ALL: [Dimension; 6] = [
        Dimension::Location,
        Dimension::Param,
        Dimension::ParamType,
        Dimension::Interval,
        Dimension::Duration,
        Dimension::Version,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Location => "Location",
            Dimension::Param => "Param",
            Dimension::ParamType => "ParamType",
            Dimension::Interval => "Interval",
            Dimension::Duration => "Duration",
            Dimension::Version => "Version",
        }
    }

    /// Position of this dimension in a dotted identifier path.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Resolve a generic part name, case-insensitively.
    ///
    /// Accepts the legacy aliases `site`, `datatype` and `statcode`.
    #[must_use]
    pub fn from_part_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "location" | "site" => Some(Dimension::Location),
            "param" | "datatype" => Some(Dimension::Param),
            "paramtype" | "statcode" => Some(Dimension::ParamType),
            "interval" => Some(Dimension::Interval),
            "duration" => Some(Dimension::Duration),
            "version" => Some(Dimension::Version),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which portion of a hyphenated part a specification applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Full,
    Base,
    Sub,
}

/// The member-list keys a group definition may carry.
///
/// `ParamType`, `Interval` and `Duration` are literal lists; the other nine are
/// wildcard specifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberType {
    Location,
    BaseLocation,
    SubLocation,
    Param,
    BaseParam,
    SubParam,
    ParamType,
    Interval,
    Duration,
    Version,
    BaseVersion,
    SubVersion,
}

impl MemberType {
    pub const ALL: [MemberType; 12] = [
        MemberType::Location,
        MemberType::BaseLocation,
        MemberType::SubLocation,
        MemberType::Param,
        MemberType::BaseParam,
        MemberType::SubParam,
        MemberType::ParamType,
        MemberType::Interval,
        MemberType::Duration,
        MemberType::Version,
        MemberType::BaseVersion,
        MemberType::SubVersion,
    ];

    /// The persisted key for this member type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MemberType::Location => "Location",
            MemberType::BaseLocation => "BaseLocation",
            MemberType::SubLocation => "SubLocation",
            MemberType::Param => "Param",
            MemberType::BaseParam => "BaseParam",
            MemberType::SubParam => "SubParam",
            MemberType::ParamType => "ParamType",
            MemberType::Interval => "Interval",
            MemberType::Duration => "Duration",
            MemberType::Version => "Version",
            MemberType::BaseVersion => "BaseVersion",
            MemberType::SubVersion => "SubVersion",
        }
    }

    /// Label used in diagnostics. Full-granularity specs are reported as
    /// `FullLocation`, `FullParam` and `FullVersion`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MemberType::Location => "FullLocation",
            MemberType::Param => "FullParam",
            MemberType::Version => "FullVersion",
            other => other.as_str(),
        }
    }

    #[must_use]
    pub fn dimension(self) -> Dimension {
        match self {
            MemberType::Location | MemberType::BaseLocation | MemberType::SubLocation => {
                Dimension::Location
            }
            MemberType::Param | MemberType::BaseParam | MemberType::SubParam => Dimension::Param,
            MemberType::ParamType => Dimension::ParamType,
            MemberType::Interval => Dimension::Interval,
            MemberType::Duration => Dimension::Duration,
            MemberType::Version | MemberType::BaseVersion | MemberType::SubVersion => {
                Dimension::Version
            }
        }
    }

    #[must_use]
    pub fn granularity(self) -> Granularity {
        match self {
            MemberType::BaseLocation | MemberType::BaseParam | MemberType::BaseVersion => {
                Granularity::Base
            }
            MemberType::SubLocation | MemberType::SubParam | MemberType::SubVersion => {
                Granularity::Sub
            }
            _ => Granularity::Full,
        }
    }

    /// Whether values of this type are wildcard specifications that need compiling.
    #[must_use]
    pub fn is_pattern(self) -> bool {
        !matches!(
            self,
            MemberType::ParamType | MemberType::Interval | MemberType::Duration
        )
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberType {
    type Err = UnknownMemberType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemberType::ALL
            .into_iter()
            .find(|mt| mt.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMemberType {
                name: s.to_owned(),
            })
    }
}
