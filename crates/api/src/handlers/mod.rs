//! Request handlers.
//!
//! Handlers validate input, delegate to `avatar_core` for CPU work and to
//! `avatar_db` for persistence, and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod avatar;
pub mod palette;
