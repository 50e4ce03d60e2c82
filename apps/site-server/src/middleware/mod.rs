//! Middleware and request extractors.

pub mod error;
pub mod viewer;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;
