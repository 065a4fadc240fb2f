//! Randomized browser identities (user-agent strings).
//!
//! A session draws one identity per batch from its `IdentityTemplate`
//! unless a fixed identity is configured.

pub mod template;

pub use template::{Component, IdentityError, IdentityField, IdentityTemplate};
