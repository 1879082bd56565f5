//! Access-control policies.
//!
//! A policy answers two questions: may this requester use the endpoint at
//! all ([`AccessPolicy::has_permission`]), and may they act on this specific
//! record ([`AccessPolicy::has_object_permission`]). Both are pure functions of
//! the HTTP method, the requester, and (for the second) the record's author.

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Methods that never modify state.
pub const SAFE_METHODS: &[&str] = &["GET", "HEAD", "OPTIONS"];

pub fn is_safe_method(method: &str) -> bool {
    SAFE_METHODS.contains(&method)
}

/// The authenticated caller, as far as policies are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub user_id: DbId,
    pub role: Role,
}

pub trait AccessPolicy {
    fn has_permission(&self, method: &str, requester: Option<&Requester>) -> bool;

    fn has_object_permission(
        &self,
        _method: &str,
        _requester: Option<&Requester>,
        _author_id: DbId,
    ) -> bool {
        true
    }
}

/// Anyone may read; only admins may write.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminOrReadOnly;

impl AccessPolicy for AdminOrReadOnly {
    fn has_permission(&self, method: &str, requester: Option<&Requester>) -> bool {
        is_safe_method(method) || requester.is_some_and(|r| r.role.is_admin())
    }
}

/// Anyone may read; authenticated users may create; only the author, a
/// moderator, or an admin may change an existing record.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorOrStaffOrReadOnly;

impl AccessPolicy for AuthorOrStaffOrReadOnly {
    fn has_permission(&self, method: &str, requester: Option<&Requester>) -> bool {
        is_safe_method(method) || requester.is_some()
    }

    fn has_object_permission(
        &self,
        method: &str,
        requester: Option<&Requester>,
        author_id: DbId,
    ) -> bool {
        if is_safe_method(method) {
            return true;
        }
        requester.is_some_and(|r| r.user_id == author_id || r.role.is_staff())
    }
}

/// Every method requires an authenticated admin.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminOnly;

impl AccessPolicy for AdminOnly {
    fn has_permission(&self, _method: &str, requester: Option<&Requester>) -> bool {
        requester.is_some_and(|r| r.role.is_admin())
    }
}

/// Every method requires authentication, any role.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

impl AccessPolicy for Authenticated {
    fn has_permission(&self, _method: &str, requester: Option<&Requester>) -> bool {
        requester.is_some()
    }
}

/// Run the endpoint-level check, mapping a denial to 401 for anonymous
/// callers and 403 for authenticated ones.
pub fn authorize<P: AccessPolicy>(
    policy: &P,
    method: &str,
    requester: Option<&Requester>,
) -> Result<(), CoreError> {
    if policy.has_permission(method, requester) {
        Ok(())
    } else {
        Err(denial(requester))
    }
}

/// Run both checks against a record authored by `author_id`.
pub fn authorize_object<P: AccessPolicy>(
    policy: &P,
    method: &str,
    requester: Option<&Requester>,
    author_id: DbId,
) -> Result<(), CoreError> {
    authorize(policy, method, requester)?;
    if policy.has_object_permission(method, requester, author_id) {
        Ok(())
    } else {
        Err(denial(requester))
    }
}

fn denial(requester: Option<&Requester>) -> CoreError {
    match requester {
        None => CoreError::Unauthorized("Authentication credentials were not provided".into()),
        Some(_) => {
            CoreError::Forbidden("You do not have permission to perform this action".into())
        }
    }
}
