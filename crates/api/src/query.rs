//! Shared query parameter types for API handlers.
//!
//! Values arrive as raw strings so that an empty value (`?pick=`) means
//! "not given" and a malformed one becomes a `VALIDATION_ERROR` body instead
//! of a plain-text extractor rejection.

use std::str::FromStr;

use avatar_core::error::CoreError;
use avatar_core::filter::FilterType;
use serde::Deserialize;

/// Listing parameters (`?pick=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub pick: Option<String>,
    pub offset: Option<String>,
}

impl ListParams {
    pub fn pick(&self) -> Result<Option<i64>, CoreError> {
        parse_optional("pick", self.pick.as_deref())
    }

    pub fn offset(&self) -> Result<Option<i64>, CoreError> {
        parse_optional("offset", self.offset.as_deref())
    }
}

/// Image fetch parameters (`?filter=&size=`).
#[derive(Debug, Default, Deserialize)]
pub struct FetchParams {
    /// Filter name, matched case-insensitively.
    pub filter: Option<String>,
    /// Target edge length in pixels.
    pub size: Option<String>,
}

impl FetchParams {
    pub fn filter(&self) -> Result<Option<FilterType>, CoreError> {
        non_empty(self.filter.as_deref())
            .map(FilterType::from_name)
            .transpose()
    }

    pub fn size(&self) -> Result<Option<u32>, CoreError> {
        parse_optional("size", self.size.as_deref())
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_optional<T: FromStr>(field: &str, raw: Option<&str>) -> Result<Option<T>, CoreError> {
    non_empty(raw)
        .map(|value| {
            value.parse().map_err(|_| {
                CoreError::Validation(format!(
                    "Query parameter '{field}' must be an integer (got '{value}')"
                ))
            })
        })
        .transpose()
}
