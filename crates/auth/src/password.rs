//! One-way salted password hashing.

use crate::{AuthError, AuthResult};

/// Password hashing seam.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> AuthResult<String>;

    /// A malformed stored hash is a mismatch, not an error.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// bcrypt-backed hasher.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> AuthResult<String> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        match bcrypt::verify(plaintext, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "stored credential hash could not be parsed");
                false
            }
        }
    }
}
