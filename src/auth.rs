//! Credential and token models: validated identifiers, redacted secrets, access tokens.

pub mod id;
pub mod secret;
pub mod token;

pub use id::*;
pub use secret::*;
pub use token::*;
