use std::fmt;
use std::str::FromStr;

use super::dimension::Dimension;
use super::error::TsIdError;
use super::group::SiteKey;

/// Split a part value into its base and sub components at the first hyphen.
///
/// A value with no hyphen, or whose only hyphen is the first character, has no
/// sub component. A trailing hyphen also yields no sub component.
///
/// ```
/// use tsgroup::split_base_sub;
///
/// assert_eq!(split_base_sub("Stage-Pool"), ("Stage", Some("Pool")));
/// assert_eq!(split_base_sub("Stage"), ("Stage", None));
/// assert_eq!(split_base_sub("Stage-"), ("Stage", None));
/// ```
#[must_use]
pub fn split_base_sub(value: &str) -> (&str, Option<&str>) {
    match value.find('-') {
        None | Some(0) => (value, None),
        Some(idx) => {
            let sub = &value[idx + 1..];
            (&value[..idx], (!sub.is_empty()).then_some(sub))
        }
    }
}

/// Read access to the parts of a time-series identifier.
///
/// Only [`part`](Self::part) is required; base and sub components are derived
/// from it by [`split_base_sub`] for every dimension.
pub trait TsIdentifier {
    /// The full value of one dimension, if present.
    fn part(&self, dim: Dimension) -> Option<&str>;

    /// The part up to its first hyphen, or the whole part if it has none.
    fn base_part(&self, dim: Dimension) -> Option<&str> {
        self.part(dim).map(|v| split_base_sub(v).0)
    }

    /// The part after its first hyphen, if that is non-empty.
    fn sub_part(&self, dim: Dimension) -> Option<&str> {
        self.part(dim).and_then(|v| split_base_sub(v).1)
    }

    /// Surrogate key of the identifier's location, used by literal site membership.
    fn site_key(&self) -> Option<SiteKey> {
        None
    }

    /// The dotted path naming this identifier. Absent parts render as empty.
    fn unique_string(&self) -> String {
        Dimension::ALL
            .iter()
            .map(|&d| self.part(d).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl<T: TsIdentifier + ?Sized> TsIdentifier for &T {
    fn part(&self, dim: Dimension) -> Option<&str> {
        (**self).part(dim)
    }

    fn base_part(&self, dim: Dimension) -> Option<&str> {
        (**self).base_part(dim)
    }

    fn sub_part(&self, dim: Dimension) -> Option<&str> {
        (**self).sub_part(dim)
    }

    fn site_key(&self) -> Option<SiteKey> {
        (**self).site_key()
    }

    fn unique_string(&self) -> String {
        (**self).unique_string()
    }
}

/// A six-part time-series identifier: `Location.Param.ParamType.Interval.Duration.Version`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsId {
    parts: [Option<String>; 6],
    site_key: Option<SiteKey>,
}

impl TsId {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an identifier from a dotted path. Missing trailing parts stay absent;
    /// anything past the sixth part is ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let mut id = Self::new();
        for (dim, value) in Dimension::ALL.into_iter().zip(path.split('.')) {
            id.parts[dim.index()] = Some(value.to_owned());
        }
        id
    }

    /// Set one part.
    #[must_use]
    pub fn with_part(mut self, dim: Dimension, value: impl Into<String>) -> Self {
        self.set_part(dim, value);
        self
    }

    #[must_use]
    pub fn with_site_key(mut self, key: SiteKey) -> Self {
        self.site_key = Some(key);
        self
    }

    pub fn set_part(&mut self, dim: Dimension, value: impl Into<String>) {
        self.parts[dim.index()] = Some(value.into());
    }

    /// Set a part by its generic name (`location`, `site`, `param`, `datatype`, ...).
    ///
    /// Returns `false` if the name is not a recognized part.
    pub fn set_named_part(&mut self, name: &str, value: impl Into<String>) -> bool {
        match Dimension::from_part_name(name) {
            Some(dim) => {
                self.set_part(dim, value);
                true
            }
            None => false,
        }
    }

    /// Look up a part by its generic name.
    #[must_use]
    pub fn named_part(&self, name: &str) -> Option<&str> {
        Dimension::from_part_name(name).and_then(|dim| self.part(dim))
    }

    /// Check that every part is present and that hyphenated location and param
    /// values have a non-empty base.
    ///
    /// # Errors
    ///
    /// Returns the first [`TsIdError`] found, in path order.
    pub fn validate(&self) -> Result<(), TsIdError> {
        let location = self.non_empty(Dimension::Location).ok_or(TsIdError::NoLocation)?;
        if location.starts_with('-') {
            return Err(TsIdError::EmptyBaseLocation);
        }
        let param = self.non_empty(Dimension::Param).ok_or(TsIdError::NoParam)?;
        if param.starts_with('-') {
            return Err(TsIdError::EmptyBaseParam);
        }
        self.non_empty(Dimension::ParamType)
            .ok_or(TsIdError::NoParamType)?;
        self.non_empty(Dimension::Interval)
            .ok_or(TsIdError::NoInterval)?;
        self.non_empty(Dimension::Duration)
            .ok_or(TsIdError::NoDuration)?;
        self.non_empty(Dimension::Version).ok_or(TsIdError::NoVersion)?;
        Ok(())
    }

    fn non_empty(&self, dim: Dimension) -> Option<&str> {
        self.part(dim).filter(|v| !v.is_empty())
    }
}

impl TsIdentifier for TsId {
    fn part(&self, dim: Dimension) -> Option<&str> {
        self.parts[dim.index()].as_deref()
    }

    fn site_key(&self) -> Option<SiteKey> {
        self.site_key
    }
}

impl FromStr for TsId {
    type Err = TsIdError;

    /// Parse and validate a dotted path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = Self::from_path(s);
        id.validate()?;
        Ok(id)
    }
}

impl fmt::Display for TsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unique_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_without_hyphen() {
        assert_eq!(split_base_sub("ABCDE"), ("ABCDE", None));
    }

    #[test]
    fn split_at_first_hyphen() {
        assert_eq!(split_base_sub("XYZ-ABC-DEF"), ("XYZ", Some("ABC-DEF")));
    }

    #[test]
    fn split_leading_hyphen_is_not_a_split() {
        assert_eq!(split_base_sub("-ABC"), ("-ABC", None));
    }

    #[test]
    fn split_trailing_hyphen_has_no_sub() {
        assert_eq!(split_base_sub("ABC-"), ("ABC", None));
    }

    #[test]
    fn from_path_all_parts() {
        let id = TsId::from_path("ABC-Pool.Stage-Rev.Inst.1Hour.0.raw-GOES");
        assert_eq!(id.part(Dimension::Location), Some("ABC-Pool"));
        assert_eq!(id.base_part(Dimension::Location), Some("ABC"));
        assert_eq!(id.sub_part(Dimension::Location), Some("Pool"));
        assert_eq!(id.base_part(Dimension::Param), Some("Stage"));
        assert_eq!(id.sub_part(Dimension::Param), Some("Rev"));
        assert_eq!(id.part(Dimension::ParamType), Some("Inst"));
        assert_eq!(id.sub_part(Dimension::Interval), None);
        assert_eq!(id.base_part(Dimension::Version), Some("raw"));
        assert_eq!(id.sub_part(Dimension::Version), Some("GOES"));
    }

    #[test]
    fn from_path_short_leaves_parts_absent() {
        let id = TsId::from_path("ABC.Stage");
        assert_eq!(id.part(Dimension::Param), Some("Stage"));
        assert_eq!(id.part(Dimension::ParamType), None);
        assert_eq!(id.base_part(Dimension::Version), None);
    }

    #[test]
    fn unique_string_round_trips_path() {
        let path = "ABC.Stage.Inst.1Hour.0.raw";
        assert_eq!(TsId::from_path(path).unique_string(), path);
        assert_eq!(TsId::from_path(path).to_string(), path);
    }

    #[test]
    fn named_parts() {
        let mut id = TsId::new();
        assert!(id.set_named_part("site", "ABC"));
        assert!(id.set_named_part("DataType", "Flow"));
        assert!(!id.set_named_part("office", "SWT"));
        assert_eq!(id.named_part("location"), Some("ABC"));
        assert_eq!(id.named_part("param"), Some("Flow"));
        assert_eq!(id.named_part("office"), None);
    }

    #[test]
    fn validate_complete_id() {
        assert!(TsId::from_path("ABC.Stage.Inst.1Hour.0.raw").validate().is_ok());
    }

    #[test]
    fn validate_reports_first_defect() {
        assert_eq!(TsId::new().validate(), Err(TsIdError::NoLocation));
        assert_eq!(
            TsId::from_path("-X.Stage.Inst.1Hour.0.raw").validate(),
            Err(TsIdError::EmptyBaseLocation)
        );
        assert_eq!(
            TsId::from_path("ABC..Inst.1Hour.0.raw").validate(),
            Err(TsIdError::NoParam)
        );
        assert_eq!(
            TsId::from_path("ABC.-Pool.Inst.1Hour.0.raw").validate(),
            Err(TsIdError::EmptyBaseParam)
        );
        assert_eq!(
            TsId::from_path("ABC.Stage.Inst.1Hour.0").validate(),
            Err(TsIdError::NoVersion)
        );
    }

    #[test]
    fn from_str_validates() {
        assert!("ABC.Stage.Inst.1Hour.0.raw".parse::<TsId>().is_ok());
        assert_eq!("ABC.Stage".parse::<TsId>(), Err(TsIdError::NoParamType));
    }

    #[test]
    fn site_key_is_carried() {
        let id = TsId::from_path("ABC.Stage").with_site_key(SiteKey(7));
        assert_eq!(id.site_key(), Some(SiteKey(7)));
        assert_eq!(TsId::from_path("ABC.Stage").site_key(), None);
    }
}
