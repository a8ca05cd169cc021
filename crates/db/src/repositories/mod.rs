//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&DbPool` as the first argument. SQL sticks to the subset
//! both SQLite and PostgreSQL accept, with `$n` placeholders.

pub mod avatar_repo;

pub use avatar_repo::AvatarRepo;
