//! Generic utility primitives with zero domain knowledge.
//!
//! - `io` - File I/O with consistent error handling and atomic writes
//! - `validation` - Input validation helpers

pub mod io;
pub mod validation;
