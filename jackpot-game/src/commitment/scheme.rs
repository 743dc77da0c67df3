use jackpot_core::Bytes32;
use sha2::{Digest, Sha256};

/// Trait for commitment schemes binding a value under a 32-byte blinding
/// factor (a player nonce or the operator salt).
pub trait CommitmentScheme {
    fn digest(value: &[u8], blinding: &Bytes32) -> Bytes32;

    fn verify(commitment: &Bytes32, value: &[u8], blinding: &Bytes32) -> bool {
        Self::digest(value, blinding) == *commitment
    }
}

/// `SHA-256(value || blinding)`. The blinding is fixed-width, so the
/// concatenation is unambiguous.
pub struct Sha256Scheme;

impl CommitmentScheme for Sha256Scheme {
    fn digest(value: &[u8], blinding: &Bytes32) -> Bytes32 {
        let mut hasher = Sha256::new();
        hasher.update(value);
        hasher.update(blinding.as_bytes());
        Bytes32::new(hasher.finalize().into())
    }
}
