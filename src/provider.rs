//! Identity provider descriptors (data) and strategies (behavior).
//!
//! `descriptor` exposes validated metadata ([`ProviderDescriptor`]) covering the token
//! endpoint, requested scopes, and the client authentication method. `strategy` defines
//! [`ProviderStrategy`], an HTTP-client-agnostic hook used by the token provider to
//! augment outgoing token requests and map failures into the relay's auth error taxonomy.

pub mod descriptor;
pub mod strategy;

pub use descriptor::*;
pub use strategy::*;
