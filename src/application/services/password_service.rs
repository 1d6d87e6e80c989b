//! Password Hashing
//!
//! Argon2id hashing with a per-call random salt and a work factor fixed at
//! construction.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::PasswordSettings;

/// Minimum Argon2id cost profiles as `(iterations, memory KiB)`. More passes
/// allow less memory; five or more passes share the last row.
pub const MIN_COST_PROFILES: [(u32, u32); 5] = [
    (1, 47_104),
    (2, 19_456),
    (3, 12_288),
    (4, 9_216),
    (5, 7_168),
];

/// Smallest memory cost (KiB) accepted for `iterations` passes.
pub fn min_memory_kib(iterations: u32) -> Option<u32> {
    if iterations == 0 {
        return None;
    }
    MIN_COST_PROFILES
        .iter()
        .find(|(t, _)| *t == iterations)
        .or(MIN_COST_PROFILES.last())
        .map(|(_, m)| *m)
}

/// Password hashing errors
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing parameters too weak: {0}")]
    WeakParameters(String),

    #[error("Invalid Argon2 parameters: {0}")]
    InvalidParameters(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// One-way password hasher.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Build a hasher, refusing parameters below the configured floor.
    pub fn new(settings: &PasswordSettings) -> Result<Self, PasswordError> {
        let floor = min_memory_kib(settings.iterations).ok_or_else(|| {
            PasswordError::WeakParameters("iterations must be at least 1".into())
        })?;
        if settings.memory_kib < floor {
            return Err(PasswordError::WeakParameters(format!(
                "memory cost {} KiB is below {} KiB for {} iteration(s)",
                settings.memory_kib, floor, settings.iterations
            )));
        }

        Self::with_params(settings)
    }

    /// Cheap hasher for unit tests, bypassing the cost floor.
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::with_params(&PasswordSettings {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
        .expect("valid test parameters")
    }

    fn with_params(settings: &PasswordSettings) -> Result<Self, PasswordError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh salt. Returns a PHC string.
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    /// Verify a password against a stored PHC string.
    ///
    /// Malformed stored hashes never match; the anomaly is logged.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is malformed");
                return false;
            }
        };

        self.argon2()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
