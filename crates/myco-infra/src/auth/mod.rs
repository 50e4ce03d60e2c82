//! Identity implementations.

mod admin;
#[cfg(feature = "auth")]
mod jwt;

pub use admin::{DEFAULT_ADMIN_EMAIL, EmailAdminPolicy};
#[cfg(feature = "auth")]
pub use jwt::{JwtConfig, JwtConfigError, JwtTokenService};
