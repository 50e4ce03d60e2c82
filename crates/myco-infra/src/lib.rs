//! # Myco Infrastructure
//!
//! Concrete implementations of the ports defined in `myco-core`.
//! Document stores, identity, and rate limiting live here.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL blog store via SeaORM
//! - `auth` - JWT bearer token validation
//! - `rate-limit` - Rate limiting via governor

pub mod auth;
pub mod database;
pub mod document;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use auth::EmailAdminPolicy;
pub use document::InMemoryDocumentStore;

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtConfigError, JwtTokenService};

#[cfg(feature = "postgres")]
pub use database::{DatabaseConnections, PostgresBlogStore};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
