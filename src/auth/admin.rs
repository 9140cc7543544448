//! Admin capability checks.
//!
//! The dashboard only asks an [`AdminAuthenticator`] whether a presented
//! credential grants access; which scheme backs it is chosen at startup.

use sha2::{Digest, Sha256};

use crate::config::{AdminAuthMode, Config};

pub trait AdminAuthenticator: Send + Sync {
    fn check_admin(&self, credential: &str) -> bool;

    fn scheme(&self) -> &'static str;
}

/// Plain comparison against a configured passcode.
pub struct SharedSecret {
    passcode: String,
}

impl SharedSecret {
    pub fn new(passcode: impl Into<String>) -> Self {
        Self {
            passcode: passcode.into(),
        }
    }
}

impl AdminAuthenticator for SharedSecret {
    fn check_admin(&self, credential: &str) -> bool {
        !self.passcode.is_empty() && credential == self.passcode
    }

    fn scheme(&self) -> &'static str {
        "shared_secret"
    }
}

/// Lowercase hex SHA-256 of an admin token; the form `ADMIN_TOKEN_SHA256` holds.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Compares the SHA-256 digest of the presented token with a stored digest,
/// so the plaintext token never has to live in configuration.
pub struct HashedToken {
    digest_hex: String,
}

impl HashedToken {
    pub fn from_hex(hex_digest: &str) -> anyhow::Result<Self> {
        let digest = hex::decode(hex_digest.trim())?;
        if digest.len() != 32 {
            anyhow::bail!("admin token digest must be 32 bytes, got {}", digest.len());
        }
        Ok(Self {
            digest_hex: hex::encode(digest),
        })
    }
}

impl AdminAuthenticator for HashedToken {
    fn check_admin(&self, credential: &str) -> bool {
        let presented = hash_token(credential);
        // fold over every byte so timing does not depend on the mismatch position
        presented.len() == self.digest_hex.len()
            && presented
                .bytes()
                .zip(self.digest_hex.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }

    fn scheme(&self) -> &'static str {
        "hashed_token"
    }
}

pub fn from_config(config: &Config) -> anyhow::Result<Box<dyn AdminAuthenticator>> {
    match config.admin_auth_mode {
        AdminAuthMode::SharedSecret => {
            let passcode = config
                .admin_passcode
                .clone()
                .ok_or_else(|| anyhow::anyhow!("ADMIN_PASSCODE is not set"))?;
            Ok(Box::new(SharedSecret::new(passcode)))
        }
        AdminAuthMode::HashedToken => {
            let digest = config
                .admin_token_sha256
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("ADMIN_TOKEN_SHA256 is not set"))?;
            Ok(Box::new(HashedToken::from_hex(digest)?))
        }
    }
}
