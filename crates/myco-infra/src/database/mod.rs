//! Database-backed document store.

mod connections;

#[cfg(feature = "postgres")]
mod blog_store;
#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use blog_store::PostgresBlogStore;
#[cfg(feature = "postgres")]
pub use connections::DatabaseConnections;

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
