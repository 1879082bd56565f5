//! Domain rules for the yamdb review platform.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and
//! `api` crates call into these modules to validate input and decide access.

pub mod confirmation;
pub mod error;
pub mod pagination;
pub mod permissions;
pub mod roles;
pub mod types;
pub mod validation;
