pub mod scheme;

pub use scheme::{CommitmentScheme, Sha256Scheme};

use jackpot_core::Bytes32;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Commitment a player publishes before revealing `guess`.
pub fn guess_commitment(guess: &str, nonce: &Bytes32) -> Bytes32 {
    Sha256Scheme::digest(guess.as_bytes(), nonce)
}

/// Rnd 32-byte blinding value for nonces and salts
pub fn generate_nonce() -> Bytes32 {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    Bytes32::new(bytes)
}

/// The operator's hidden word: its salted hash plus the salt needed to test
/// guesses against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretCommitment {
    pub hash: Bytes32,
    pub salt: Bytes32,
}

impl SecretCommitment {
    pub fn new(hash: Bytes32, salt: Bytes32) -> Self {
        Self { hash, salt }
    }

    /// Commits to `word` under a fresh random salt.
    pub fn from_word(word: &str) -> Self {
        let salt = generate_nonce();
        Self {
            hash: Sha256Scheme::digest(word.as_bytes(), &salt),
            salt,
        }
    }

    pub fn matches(&self, guess: &str) -> bool {
        Sha256Scheme::verify(&self.hash, guess.as_bytes(), &self.salt)
    }
}
