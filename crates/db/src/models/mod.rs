//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize` entity struct handed to the API layer
//! - A `FromRow` row struct matching the portable column types
//! - A create DTO for inserts

pub mod avatar;
