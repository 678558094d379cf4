//! Pure data types for cubby — directory entries and the error taxonomy.
//!
//! This crate is a leaf dependency with no async runtime and no I/O. It
//! exists so that consumers (the HTTP layer, external clients) can share
//! cubby's data contract without pulling in the kernel's transitive deps.

pub mod dir_entry;
pub mod error;
pub mod name;

// Flat re-exports for convenience
pub use dir_entry::*;
pub use error::*;
pub use name::*;
