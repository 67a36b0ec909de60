//! Query-string shapes shared by the list, filter and search endpoints.
//!
//! Empty parameter values (`?minPrice=`) are treated as absent.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_with::{NoneAsEmptyString, serde_as};
use std::fmt;
use std::str::FromStr;
use utoipa::{
    IntoParams,
    openapi::path::{Parameter, ParameterIn},
};

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

/// `?pageNumber=&pageSize=` for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-based page number
    #[serde(default = "default_page_number")]
    #[param(default = 1)]
    pub page_number: i64,
    /// Records per page
    #[serde(default = "default_page_size")]
    #[param(default = 10)]
    pub page_size: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page_number: default_page_number(),
            page_size: default_page_size(),
        }
    }
}

/// `?keyword=` for search endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct KeywordParams {
    /// Substring matched against the resource's text fields
    #[serde(default)]
    pub keyword: Option<String>,
}

/// Creation-date window used by the Category and Customer filters.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DateRangeParams {
    /// Created at or after
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[param(value_type = Option<String>, format = DateTime)]
    pub start_date: Option<QueryDateTime>,
    /// Created at or before
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[param(value_type = Option<String>, format = DateTime)]
    pub end_date: Option<QueryDateTime>,
}

/// Resources with no filter endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct NoFilter {}

impl IntoParams for NoFilter {
    fn into_params(_parameter_in_provider: impl Fn() -> Option<ParameterIn>) -> Vec<Parameter> {
        Vec::new()
    }
}

/// Timestamp query value.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` (read as UTC) and `YYYY-MM-DD`
/// (midnight UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryDateTime(pub DateTime<Utc>);

impl QueryDateTime {
    #[must_use]
    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }
}

impl FromStr for QueryDateTime {
    type Err = chrono::ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self(naive.and_utc()));
        }
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")?;
        Ok(Self(date.and_time(chrono::NaiveTime::MIN).and_utc()))
    }
}

impl fmt::Display for QueryDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Optional boolean flag where an empty value means "no constraint".
pub(crate) fn flag_or_empty<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.to_ascii_lowercase()
        .parse::<bool>()
        .map(Some)
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_page_params_defaults() {
        let params: PageParams = serde_urlencoded_from("");
        assert_eq!(params.page_number, 1);
        assert_eq!(params.page_size, 10);
    }

    #[test]
    fn test_page_params_camel_case() {
        let params: PageParams = serde_urlencoded_from("pageNumber=3&pageSize=25");
        assert_eq!(params.page_number, 3);
        assert_eq!(params.page_size, 25);
    }

    #[test]
    fn test_date_range_accepts_date_only_and_empty() {
        let params: DateRangeParams = serde_urlencoded_from("startDate=2024-01-15&endDate=");
        assert_eq!(
            params.start_date.map(QueryDateTime::into_inner),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
        );
        assert!(params.end_date.is_none());
    }

    #[test]
    fn test_query_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!("2024-03-01T12:30:00Z".parse::<QueryDateTime>().unwrap().0, expected);
        assert_eq!("2024-03-01T14:30:00+02:00".parse::<QueryDateTime>().unwrap().0, expected);
        assert_eq!("2024-03-01T12:30:00".parse::<QueryDateTime>().unwrap().0, expected);
        assert!("yesterday".parse::<QueryDateTime>().is_err());
    }

    fn serde_urlencoded_from<T: serde::de::DeserializeOwned>(query: &str) -> T {
        axum::extract::Query::<T>::try_from_uri(
            &format!("http://localhost/?{query}").parse().unwrap(),
        )
        .unwrap()
        .0
    }
}
