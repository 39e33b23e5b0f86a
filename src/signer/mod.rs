//! Signing capability.
//!
//! Key custody lives outside this crate; anything that can turn message
//! bytes into signature bytes is a [`Signer`]. The `ed25519` feature adds
//! [`ed25519::Ed25519Signer`], a local reference key for tests and tooling.

#[cfg(feature = "ed25519")]
pub mod ed25519;

use crate::error::SigningError;

/// Produces a raw signature over `message`.
pub trait Signer: Send + Sync {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SigningError>;
}

/// Closures and fns plug in directly, e.g. a wallet or HSM call.
impl<F> Signer for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, SigningError> + Send + Sync,
{
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SigningError> {
        self(message)
    }
}
