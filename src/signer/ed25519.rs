//! Reference Ed25519 signer with Indy seed handling and DID derivation.
//!
//! Only available with the `ed25519` feature.

use base64::Engine;
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier, VerifyingKey};

use crate::error::SigningError;
use crate::shared::Did;
use crate::signer::Signer;

const SEED_BYTES: usize = 32;

/// Decodes a seed given as 32 raw characters, base64 (ending in `=`), or
/// 64 hex characters.
pub fn parse_seed(seed: &str) -> Result<[u8; SEED_BYTES], SigningError> {
    let bytes = if seed.len() == SEED_BYTES {
        seed.as_bytes().to_vec()
    } else if seed.ends_with('=') {
        base64::engine::general_purpose::STANDARD
            .decode(seed)
            .map_err(|e| SigningError::InvalidSeed(format!("invalid base64: {}", e)))?
    } else if seed.len() == SEED_BYTES * 2 {
        hex::decode(seed).map_err(|e| SigningError::InvalidSeed(format!("invalid hex: {}", e)))?
    } else {
        return Err(SigningError::InvalidSeed(format!(
            "expected a {} byte string, base64, or {} hex characters",
            SEED_BYTES,
            SEED_BYTES * 2
        )));
    };

    bytes.try_into().map_err(|b: Vec<u8>| {
        SigningError::InvalidSeed(format!("decoded to {} bytes, need {}", b.len(), SEED_BYTES))
    })
}

/// An Ed25519 key pair whose DID is derived from its verkey.
pub struct Ed25519Signer {
    signing_key: SigningKey,
    did: Did,
}

impl Ed25519Signer {
    pub fn from_seed(seed: &str) -> Result<Self, SigningError> {
        Ok(Self::from_secret_bytes(&parse_seed(seed)?))
    }

    pub fn from_secret_bytes(secret: &[u8; SEED_BYTES]) -> Self {
        let signing_key = SigningKey::from_bytes(secret);
        let did = did_from_verkey(signing_key.verifying_key().as_bytes());
        Self { signing_key, did }
    }

    /// Fresh random key. Storage is the caller's problem.
    pub fn generate() -> Self {
        let mut secret = [0u8; SEED_BYTES];
        rand::Rng::fill(&mut rand::thread_rng(), &mut secret);
        Self::from_secret_bytes(&secret)
    }

    /// Base58 of the first 16 verkey bytes.
    pub fn did(&self) -> &Did {
        &self.did
    }

    /// Full verkey, base58.
    pub fn verkey(&self) -> String {
        bs58::encode(self.signing_key.verifying_key().as_bytes()).into_string()
    }

    /// `~` plus base58 of the last 16 verkey bytes; valid alongside the
    /// derived DID.
    pub fn abbreviated_verkey(&self) -> String {
        let verkey = self.signing_key.verifying_key();
        format!("~{}", bs58::encode(&verkey.as_bytes()[16..]).into_string())
    }
}

impl std::fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Signer").field("did", &self.did).finish_non_exhaustive()
    }
}

impl Signer for Ed25519Signer {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SigningError> {
        Ok(self.signing_key.sign(message).to_bytes().to_vec())
    }
}

fn did_from_verkey(verkey: &[u8; 32]) -> Did {
    Did::new(bs58::encode(&verkey[..16]).into_string())
}

/// Checks a base58 signature against a base58 verkey. Abbreviated verkeys
/// need the DID to expand them.
pub fn verify_signature(
    verkey: &str,
    did: Option<&Did>,
    message: &[u8],
    signature: &str,
) -> Result<bool, SigningError> {
    let key_bytes = expand_verkey(verkey, did)?;
    let key_bytes: [u8; 32] = key_bytes
        .try_into()
        .map_err(|_| SigningError::InvalidVerkey("verkey must be 32 bytes".to_string()))?;
    let key = VerifyingKey::from_bytes(&key_bytes)
        .map_err(|e| SigningError::InvalidVerkey(e.to_string()))?;

    let sig_bytes = bs58::decode(signature)
        .into_vec()
        .map_err(|e| SigningError::InvalidSignature(e.to_string()))?;
    let sig_bytes: [u8; 64] = sig_bytes
        .try_into()
        .map_err(|_| SigningError::InvalidSignature("signature must be 64 bytes".to_string()))?;
    let signature = Signature::from_bytes(&sig_bytes);

    Ok(key.verify(message, &signature).is_ok())
}

fn expand_verkey(verkey: &str, did: Option<&Did>) -> Result<Vec<u8>, SigningError> {
    match verkey.strip_prefix('~') {
        None => bs58::decode(verkey)
            .into_vec()
            .map_err(|e| SigningError::InvalidVerkey(e.to_string())),
        Some(tail) => {
            let did = did.ok_or_else(|| {
                SigningError::InvalidVerkey("abbreviated verkey needs its DID".to_string())
            })?;
            let mut bytes = bs58::decode(did.unqualified())
                .into_vec()
                .map_err(|e| SigningError::InvalidVerkey(e.to_string()))?;
            bytes.extend(
                bs58::decode(tail)
                    .into_vec()
                    .map_err(|e| SigningError::InvalidVerkey(e.to_string()))?,
            );
            Ok(bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "000000000000000000000000Trustee1";

    #[test]
    fn test_trustee_seed_derives_known_did() {
        let signer = Ed25519Signer::from_seed(SEED).unwrap();
        assert_eq!(signer.did().as_str(), "V4SGRU86Z58d6TV7PBUe6f");
        assert_eq!(signer.verkey(), "GJ1SzoWzavQYfNL9XkaJdrQejfztN4XqdsiV4ct3LXKL");
        assert_eq!(signer.abbreviated_verkey(), "~CoRER63DVYnWZtK8uAzNbx");
    }

    #[test]
    fn test_seed_encodings_agree() {
        let raw = parse_seed(SEED).unwrap();
        let hex_seed = hex::encode(raw);
        let b64_seed = base64::engine::general_purpose::STANDARD.encode(raw);
        assert!(b64_seed.ends_with('='));
        assert_eq!(parse_seed(&hex_seed).unwrap(), raw);
        assert_eq!(parse_seed(&b64_seed).unwrap(), raw);
    }

    #[test]
    fn test_bad_seeds_rejected() {
        assert!(matches!(parse_seed("short"), Err(SigningError::InvalidSeed(_))));
        assert!(matches!(parse_seed(&"zz".repeat(32)), Err(SigningError::InvalidSeed(_))));
        assert!(matches!(parse_seed("YWJj"), Err(SigningError::InvalidSeed(_))));
        assert!(matches!(parse_seed("YWJjZA=="), Err(SigningError::InvalidSeed(_))));
    }

    #[test]
    fn test_sign_and_verify_with_full_and_abbreviated_verkey() {
        let signer = Ed25519Signer::from_seed(SEED).unwrap();
        let signature = bs58::encode(signer.sign(b"message").unwrap()).into_string();
        assert!(verify_signature(&signer.verkey(), None, b"message", &signature).unwrap());
        assert!(verify_signature(
            &signer.abbreviated_verkey(),
            Some(signer.did()),
            b"message",
            &signature
        )
        .unwrap());
        assert!(!verify_signature(&signer.verkey(), None, b"other", &signature).unwrap());
    }

    #[test]
    fn test_generated_keys_differ() {
        let a = Ed25519Signer::generate();
        let b = Ed25519Signer::generate();
        assert_ne!(a.did(), b.did());
    }
}
