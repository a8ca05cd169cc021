//! Domain logic for the avatar service.
//!
//! Everything in this crate is pure: colour palettes, the avatar
//! generators, filter dispatch and the decode/transform/encode pipeline.
//! Persistence lives in `avatar-db`, HTTP in `avatar-api`.

pub mod error;
pub mod filter;
pub mod generator;
pub mod imaging;
pub mod pagination;
pub mod palette;
pub mod types;
