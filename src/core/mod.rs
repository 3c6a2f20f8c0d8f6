//! Shared infrastructure: configuration and synchronisation helpers.

pub mod config;
pub mod sync;
