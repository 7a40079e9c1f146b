pub mod auth;
pub mod roles;
pub mod security_headers;

pub use auth::require_auth;
pub use auth::AuthenticatedUser;
pub use roles::*;
pub use security_headers::security_headers;
