//! Request extractors for authentication, authorization and validated bodies.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer
//!   token. Usable as `Option<AuthUser>` on routes where auth is optional.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireGuardian`] -- Requires `parent`, `teacher` or `admin`.
//! - [`validated_json::ValidatedJson`] -- JSON body checked with `validator`.

pub mod auth;
pub mod rbac;
pub mod validated_json;
