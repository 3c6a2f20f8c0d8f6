pub mod authority;
pub mod core;
pub mod daemon;
pub mod engine;
pub mod registry;
pub mod scanner;
pub mod seeding;
