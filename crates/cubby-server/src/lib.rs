//! HTTP surface for cubby.
//!
//! Everything here is transport: routing, bearer-token extraction, the
//! error → status mapping, and the voice-helper supervisor. Filesystem
//! semantics live in cubby-kernel, credentials in cubby-auth.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod voice;

pub use config::CubbyConfig;
pub use error::ApiError;
pub use routes::{router, AppState};
pub use voice::VoiceControl;
