//! Query-string helpers that treat empty values as absent.
//!
//! Clients send `?date=` or `?faculty_id=` with nothing after the equals sign.
//! These deserializers map such values to `None` instead of rejecting the request.

use serde::{Deserialize, Deserializer};

pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }))
}

/// Parses an optional integer id. Empty strings and `0` both mean "no filter".
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => {
            let id: i32 = s.parse().map_err(serde::de::Error::custom)?;
            Ok((id != 0).then_some(id))
        }
    }
}

/// Parses `true`/`false`/`1`/`0`, treating an empty or missing value as `false`.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some("1") => Ok(true),
        Some("0") => Ok(false),
        Some(s) => s.to_ascii_lowercase().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        date: Option<String>,
        #[serde(default, deserialize_with = "deserialize_optional_id")]
        faculty_id: Option<i32>,
        #[serde(default, deserialize_with = "deserialize_flag")]
        add_empty_lessons: bool,
    }

    fn parse(query: &str) -> Result<Params, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(query)
    }

    #[test]
    fn empty_values_are_absent() {
        let params = parse("date=&faculty_id=&add_empty_lessons=").unwrap();
        assert!(params.date.is_none());
        assert!(params.faculty_id.is_none());
        assert!(!params.add_empty_lessons);
    }

    #[test]
    fn missing_values_use_defaults() {
        let params = parse("").unwrap();
        assert!(params.date.is_none());
        assert!(params.faculty_id.is_none());
        assert!(!params.add_empty_lessons);
    }

    #[test]
    fn zero_id_means_no_filter() {
        assert!(parse("faculty_id=0").unwrap().faculty_id.is_none());
        assert_eq!(parse("faculty_id=7").unwrap().faculty_id, Some(7));
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse("add_empty_lessons=true").unwrap().add_empty_lessons);
        assert!(parse("add_empty_lessons=1").unwrap().add_empty_lessons);
        assert!(parse("add_empty_lessons=TRUE").unwrap().add_empty_lessons);
        assert!(!parse("add_empty_lessons=false").unwrap().add_empty_lessons);
        assert!(parse("add_empty_lessons=maybe").is_err());
    }

    #[test]
    fn garbage_id_is_rejected() {
        assert!(parse("faculty_id=abc").is_err());
    }

    #[test]
    fn dates_are_trimmed() {
        assert_eq!(
            parse("date=%202025-03-12%20").unwrap().date.as_deref(),
            Some("2025-03-12")
        );
    }
}
