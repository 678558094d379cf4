//! Credential storage and session tokens for cubby.
//!
//! The rest of the system consumes this crate through the [`Authority`]
//! trait and only ever sees resolved identities; raw passwords and token
//! internals stay in here. Tokens are opaque random values looked up
//! server-side — there is nothing for a client to parse or forge offline.

pub mod error;
pub mod service;
pub mod store;
pub mod tokens;

pub use error::{AuthError, AuthResult};
pub use service::{AuthService, Authority};
pub use store::UserStore;
pub use tokens::TokenTable;
