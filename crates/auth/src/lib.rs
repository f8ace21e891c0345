//! `vendora-auth` — actor identity and role boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: token
//! issuance/verification happens upstream, this layer only maps an opaque
//! credential to a known user and exposes the role gate.

pub mod account;
pub mod resolver;
pub mod role;

pub use account::User;
pub use resolver::{ActorToken, IdentityResolver, StaticTokenResolver};
pub use role::Role;
