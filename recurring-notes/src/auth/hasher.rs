use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HasherError {
    #[error("failed to hash password: {0}")]
    Hash(password_hash::Error),
}

/// Argon2id password hashing.
#[derive(Clone, Debug)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn generate_hash(&self, password: &str) -> Result<String, HasherError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(HasherError::Hash)
    }

    pub fn check_hash(&self, hash: &str, password: &str) -> Result<bool, HasherError> {
        let hash = PasswordHash::new(hash).map_err(HasherError::Hash)?;
        match self.argon2().verify_password(password.as_bytes(), &hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HasherError::Hash(e)),
        }
    }
}

impl Default for PasswordHasher {
    #[cfg(not(test))]
    fn default() -> Self {
        Self::new(Params::default())
    }

    #[cfg(test)]
    fn default() -> Self {
        // keep tests fast
        Self::new(Params::new(Params::MIN_M_COST, 1, 1, None).unwrap_or_default())
    }
}
