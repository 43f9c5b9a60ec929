//! secp256k1 ECDSA key pairs with PEM (SubjectPublicKeyInfo) identity,
//! matching the reference node's `cryptography`-library key handling:
//! public keys are exchanged as PEM text and double as the on-chain
//! address; signatures are DER-encoded over a pre-hashed SHA-256 digest.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rand_core::OsRng;
use zeroize::Zeroize;

use crate::error::NodeError;

/// A secp256k1 key pair. The signing key is wrapped so it zeroizes on
/// drop; the verifying key (our public identity) is cheap to clone and
/// is what gets embedded in transactions and compared against peers.
pub struct KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Generates a fresh key pair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = *signing_key.verifying_key();
        KeyPair { signing_key, verifying_key }
    }

    /// Public key as PEM (SubjectPublicKeyInfo), the node's durable identity.
    pub fn public_key_pem(&self) -> String {
        self.verifying_key
            .to_public_key_pem(LineEnding::LF)
            .expect("verifying key always encodes")
    }

    /// Private key as PEM (PKCS#8), for the demonstration keystore.
    pub fn private_key_pem(&self) -> NodeResultString {
        self.signing_key
            .to_pkcs8_pem(LineEnding::LF)
            .map(|pem| pem.to_string())
            .map_err(|e| NodeError::CryptoFailure(format!("private key encode failed: {e}")))
    }

    /// Reconstructs a key pair from a PKCS#8 PEM private key.
    pub fn from_private_pem(pem: &str) -> Result<Self, NodeError> {
        let signing_key = SigningKey::from_pkcs8_pem(pem)
            .map_err(|e| NodeError::CryptoFailure(format!("invalid private key: {e}")))?;
        let verifying_key = *signing_key.verifying_key();
        Ok(KeyPair { signing_key, verifying_key })
    }

    /// Signs a pre-hashed SHA-256 digest, returning the DER signature as
    /// lowercase hex.
    pub fn sign_prehash(&self, digest: &[u8; 32]) -> Result<String, NodeError> {
        let signature: Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| NodeError::CryptoFailure(format!("signing failed: {e}")))?;
        Ok(hex::encode(signature.to_der().as_bytes()))
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        // SigningKey itself zeroizes its scalar on drop (k256 derives
        // Zeroize for it); this is a visible reminder of that invariant.
        let _ = &self.signing_key;
    }
}

/// Verifies a hex-encoded DER signature over a pre-hashed SHA-256 digest,
/// given the signer's PEM public key.
pub fn verify_prehash(public_key_pem: &str, digest: &[u8; 32], signature_hex: &str) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_public_key_pem(public_key_pem) else {
        return false;
    };
    let Ok(sig_bytes) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(signature) = Signature::from_der(&sig_bytes) else {
        return false;
    };
    verifying_key.verify_prehash(digest, &signature).is_ok()
}

/// Zeroizes a heap-allocated PEM string once it is no longer needed, used
/// by the keystore after writing it out to disk.
pub fn forget_pem(mut pem: String) {
    pem.zeroize();
}

type NodeResultString = Result<String, NodeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::canonical::canonical_digest;
    use serde_json::json;

    #[test]
    fn sign_then_verify_round_trips() {
        let keys = KeyPair::generate();
        let digest = canonical_digest(&[("recipient", json!("bob")), ("amount", json!(1.0))]);
        let sig = keys.sign_prehash(&digest).unwrap();
        assert!(verify_prehash(&keys.public_key_pem(), &digest, &sig));
    }

    #[test]
    fn tampered_digest_fails_verification() {
        let keys = KeyPair::generate();
        let digest = canonical_digest(&[("recipient", json!("bob")), ("amount", json!(1.0))]);
        let sig = keys.sign_prehash(&digest).unwrap();
        let other_digest = canonical_digest(&[("recipient", json!("bob")), ("amount", json!(2.0))]);
        assert!(!verify_prehash(&keys.public_key_pem(), &other_digest, &sig));
    }

    #[test]
    fn private_key_round_trips_through_pem() {
        let keys = KeyPair::generate();
        let pem = keys.private_key_pem().unwrap();
        let restored = KeyPair::from_private_pem(&pem).unwrap();
        assert_eq!(keys.public_key_pem(), restored.public_key_pem());
    }
}
