//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- The authenticated user, loaded from a JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- Same, but anonymous requests are allowed.
//! - [`rbac::Authorized`] -- Runs an [`AccessPolicy`] against the request method.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.
//!
//! [`AccessPolicy`]: yamdb_core::permissions::AccessPolicy

pub mod auth;
pub mod rbac;
