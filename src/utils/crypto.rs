//! Password hashing using Argon2

use crate::utils::error::{GatewayError, Result};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, Version};

/// Argon2id hasher applied to new accounts before they reach the store
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("params", self.argon2.params())
            .finish()
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialHasher {
    /// Hasher with explicit cost parameters (memory in KiB, iterations, lanes)
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| GatewayError::Crypto(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password with a fresh salt
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| GatewayError::Crypto(format!("Failed to hash password: {}", e)))?;

        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{PasswordHash, PasswordVerifier};

    fn cheap() -> CredentialHasher {
        CredentialHasher::with_params(8, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_produces_argon2id_phc_string() {
        let hash = cheap().hash("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2id"));
        assert!(hash.contains("m=8,t=1,p=1"));
    }

    #[test]
    fn test_hash_unique_each_time() {
        let hasher = cheap();
        let hash1 = hasher.hash("same-password").unwrap();
        let hash2 = hasher.hash("same-password").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_hash_verifies_against_original() {
        let hash = cheap().hash("original-password").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default().verify_password(b"original-password", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"wrong-password", &parsed).is_err());
    }

    #[test]
    fn test_with_params_rejects_tiny_memory() {
        assert!(CredentialHasher::with_params(1, 1, 1).is_err());
    }
}
