//! Validated value types for domain primitives.
//!
//! # Example
//!
//! ```ignore
//! use timetable_models::value_types::GroupNumber;
//!
//! let group: GroupNumber = " 232м ".parse().unwrap();
//! assert_eq!(group.as_str(), "232М");
//! ```

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

const MAX_GROUP_NUMBER_LEN: usize = 32;

/// Error type for value type parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueTypeError {
    /// The group number is empty or contains unsupported characters.
    InvalidGroupNumber(String),
}

impl std::error::Error for ValueTypeError {}

impl fmt::Display for ValueTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGroupNumber(msg) => write!(f, "invalid group number: {}", msg),
        }
    }
}

// ============================================================================
// GroupNumber
// ============================================================================

/// A student group number such as `344` or `232М`.
///
/// Input is trimmed and upper-cased on construction, so `"232м"` and `"232М"`
/// select the same group.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[schema(value_type = String, example = "344")]
pub struct GroupNumber(String);

impl GroupNumber {
    pub fn new(number: impl AsRef<str>) -> Result<Self, ValueTypeError> {
        let normalized = number.as_ref().trim().to_uppercase();
        Self::validate(&normalized)?;
        Ok(Self(normalized))
    }

    /// Wraps a value read back from the database without re-validating it.
    #[inline]
    pub fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// `true` for master's groups, which carry a trailing `М`.
    pub fn is_masters(&self) -> bool {
        self.0.ends_with('М')
    }

    /// The leading digits of the number, used for ordering group lists.
    pub fn numeric_part(&self) -> Option<u32> {
        let digits: String = self.0.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    }

    fn validate(number: &str) -> Result<(), ValueTypeError> {
        if number.is_empty() {
            return Err(ValueTypeError::InvalidGroupNumber(
                "group number cannot be empty".into(),
            ));
        }

        if number.chars().count() > MAX_GROUP_NUMBER_LEN {
            return Err(ValueTypeError::InvalidGroupNumber(format!(
                "'{}' is longer than {} characters",
                number, MAX_GROUP_NUMBER_LEN
            )));
        }

        if !number
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '/' | '.' | '_'))
        {
            return Err(ValueTypeError::InvalidGroupNumber(format!(
                "'{}' contains unsupported characters",
                number
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for GroupNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupNumber({})", self.0)
    }
}

impl fmt::Display for GroupNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GroupNumber {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for GroupNumber {
    type Error = ValueTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for GroupNumber {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<GroupNumber> for String {
    fn from(number: GroupNumber) -> String {
        number.0
    }
}

impl PartialEq<str> for GroupNumber {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl Type<sqlx::Postgres> for GroupNumber {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for GroupNumber {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for GroupNumber {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        <String as Decode<'r, sqlx::Postgres>>::decode(value).map(Self::new_unchecked)
    }
}

impl PgHasArrayType for GroupNumber {
    fn array_type_info() -> PgTypeInfo {
        <String as PgHasArrayType>::array_type_info()
    }
}

impl<'de> Deserialize<'de> for GroupNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

/// Orders group numbers the way the groups page lists them: regular groups
/// before master's groups, then by numeric part, then lexically.
pub fn compare_group_numbers(a: &GroupNumber, b: &GroupNumber) -> std::cmp::Ordering {
    a.is_masters()
        .cmp(&b.is_masters())
        .then_with(|| {
            a.numeric_part()
                .unwrap_or(u32::MAX)
                .cmp(&b.numeric_part().unwrap_or(u32::MAX))
        })
        .then_with(|| a.0.cmp(&b.0))
}
