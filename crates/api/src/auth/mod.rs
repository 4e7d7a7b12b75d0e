//! Authentication primitives.
//!
//! - [`oidc`] -- OIDC access-token verification and claim extraction.

pub mod oidc;
