//! # stockhold-auth
//!
//! Inbound request authentication for Stockhold. The storefront reaches
//! this service through an app proxy that signs every request with a
//! shared secret; this crate verifies those signatures.

pub mod signature;

pub use signature::ProxySignatureVerifier;
