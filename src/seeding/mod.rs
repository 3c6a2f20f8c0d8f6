//! Engine-facing work: seed submission and retirement
//!
//! The coordinator hands newly eligible content to the engine; the collector
//! retires content the authority no longer wants.

pub mod collector;
pub mod coordinator;

pub use collector::GarbageCollector;
pub use coordinator::SeedingCoordinator;
