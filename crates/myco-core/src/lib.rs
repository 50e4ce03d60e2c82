//! # Myco Core
//!
//! The domain layer of the MushRoomService site backend.
//! Recipe moderation, blog listing, and the ports infrastructure must implement.
//! No infrastructure dependencies live here.

pub mod blog;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod feed;
pub mod ports;

pub use error::DomainError;
