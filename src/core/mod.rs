/*!
 * Core Module
 * Shared types, limits and configuration
 */

pub mod config;
pub mod limits;
pub mod types;

// Re-export for convenience
pub use config::HeapConfig;
pub use types::*;
