//! Portfolio stores the sync service publishes to

pub mod composite;
pub mod console;

// Re-export for convenience
pub use composite::CompositeStore;
pub use console::ConsoleStore;
