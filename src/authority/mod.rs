//! Inventory authority lookup
//!
//! Queries the external system of record for the set of content that should
//! currently be seeded.

pub mod client;
pub mod error;

pub use client::AuthorityClient;
pub use error::{AuthorityError, AuthorityResult};
