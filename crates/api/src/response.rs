//! Shared response envelope types for API handlers.
//!
//! Collection responses use a `{ "data": ... }` envelope. Use
//! [`DataResponse`] or [`PageResponse`] instead of ad-hoc
//! `serde_json::json!` bodies.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// One page of a listing plus the paging parameters actually applied.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    /// Total number of items across all pages.
    pub total: i64,
    /// Effective page size after clamping.
    pub pick: i64,
    /// Effective offset after clamping.
    pub offset: i64,
}
