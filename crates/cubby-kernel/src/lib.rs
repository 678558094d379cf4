//! The cubby kernel — session-scoped, containment-enforcing filesystem
//! operations over a shared storage root.
//!
//! Every identity owns a private subtree (`base / identity`) and a
//! current-directory cursor that persists across stateless requests.
//! Operations follow one sequence: validate the name grammar, resolve
//! the step against the cursor, re-check root containment, then touch
//! storage. No operation can land outside the owning identity's root.
//!
//! Module map:
//! - [`resolve`] — pure path-step resolution and the containment check
//! - [`sessions`] — the concurrent identity → cursor table
//! - [`vault`] — the operation set and the navigator

pub mod resolve;
pub mod sessions;
pub mod vault;

pub use sessions::SessionTable;
pub use vault::Vault;
