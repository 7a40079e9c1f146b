//! Role gates with type-safe authorization extractors
//!
//! Usage in handlers:
//! ```ignore
//! use crate::middleware::{Guarded, roles::*};
//!
//! async fn mark_attendance(
//!     Guarded(user): Guarded<AttendanceMark>,
//!     State(state): State<AppState>,
//! ) -> Result<Json<MarkResponse>> {
//!     // Role already verified - just use user
//! }
//! ```

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::models::user::{self, Role};

/// Trait for role-gate marker types
pub trait RoleGate: Send + Sync + 'static {
    /// Roles allowed through this gate.
    const ALLOWED: &'static [Role];
}

/// Macro to define role-gate types
///
/// Creates zero-sized marker types that implement `RoleGate`.
macro_rules! define_gates {
    ($($(#[$meta:meta])* $name:ident => [$($role:ident),+ $(,)?]),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl RoleGate for $name {
                const ALLOWED: &'static [Role] = &[$(Role::$role),+];
            }
        )*
    };
}

// Every protected operation names one of these gates.
define_gates! {
    /// Create, update and list schools; platform-wide administration
    PlatformManage => [Superadmin],
    /// Manage users of the acting school
    UsersManage => [Superadmin, Schooladmin],
    /// Manage academic sessions, classes and sections
    AcademicsManage => [Superadmin, Schooladmin],
    /// Create and update students; change enrollment status
    StudentsManage => [Superadmin, Schooladmin],
    /// View students of the acting school
    StudentsView => [Superadmin, Schooladmin, Teacher, Accountant, Staff],
    /// Mark attendance and view class registers
    AttendanceMark => [Schooladmin, Teacher],
    /// View attendance reports
    AttendanceView => [Superadmin, Schooladmin, Teacher],
    /// Create, update, delete and publish homework
    HomeworkManage => [Schooladmin, Teacher],
    /// Record marks and manage grade scales
    MarksManage => [Schooladmin, Teacher],
    /// View report cards
    MarksView => [Superadmin, Schooladmin, Teacher, Parent],
    /// Define fee structures and assign fees
    FeesManage => [Schooladmin, Accountant],
    /// Collect fee payments
    FeesCollect => [Schooladmin, Accountant],
    /// Create notices and toggle publication
    NoticesManage => [Schooladmin],
    /// View the school's audit trail
    AuditView => [Superadmin, Schooladmin],
}

/// Extractor that requires one of a gate's roles
///
/// Verifies the authenticated user's role before the handler runs and
/// rejects with 403 Forbidden otherwise.
#[derive(Debug, Clone)]
pub struct Guarded<G: RoleGate>(pub user::Model, PhantomData<G>);

impl<G: RoleGate> Guarded<G> {
    /// Get the authenticated user
    pub fn user(&self) -> &user::Model {
        &self.0
    }

    /// The school the user acts in. 403 for superadmins, who are not bound
    /// to one; school-scoped operations must not be reachable from a
    /// schoolless account.
    pub fn school_id(&self) -> Result<i64, AppError> {
        self.0
            .school_id
            .ok_or_else(|| AppError::Forbidden("No school scope for this account".to_string()))
    }
}

impl<S, G> FromRequestParts<S> for Guarded<G>
where
    S: Send + Sync,
    G: RoleGate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        if !G::ALLOWED.contains(&auth_user.0.role) {
            return Err(AppError::Forbidden(
                "Insufficient role for this operation".to_string(),
            ));
        }

        Ok(Guarded(auth_user.0.clone(), PhantomData))
    }
}

/// Extractor for any authenticated user (no role requirement)
#[derive(Debug, Clone)]
pub struct Authenticated(pub user::Model);

impl Authenticated {
    pub fn user(&self) -> &user::Model {
        &self.0
    }

    /// Same scoping rule as [`Guarded::school_id`].
    pub fn school_id(&self) -> Result<i64, AppError> {
        self.0
            .school_id
            .ok_or_else(|| AppError::Forbidden("No school scope for this account".to_string()))
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        Ok(Authenticated(auth_user.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_allow_lists() {
        assert!(PlatformManage::ALLOWED.contains(&Role::Superadmin));
        assert!(!PlatformManage::ALLOWED.contains(&Role::Schooladmin));
        assert!(AttendanceMark::ALLOWED.contains(&Role::Teacher));
        assert!(!AttendanceMark::ALLOWED.contains(&Role::Parent));
        assert!(FeesCollect::ALLOWED.contains(&Role::Accountant));
        assert!(!FeesCollect::ALLOWED.contains(&Role::Teacher));
    }
}
