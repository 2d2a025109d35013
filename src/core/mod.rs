// Public modules
pub mod defaults;
pub mod error;
pub mod paths;
pub mod rewrite;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
