//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod admin;
mod auth;
mod document_store;
mod rate_limit;

pub use admin::AdminPolicy;
pub use auth::{AuthError, TokenClaims, TokenService};
pub use document_store::{
    DocumentQuery, DocumentStore, FieldFilter, FieldValue, OrderBy, SortDirection,
    StoredDocument,
};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
