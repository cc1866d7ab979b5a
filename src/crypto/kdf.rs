use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use zeroize::Zeroizing;

use super::rng::{RandomSource, random_bytes};
use super::{IV_LEN, KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN};
use crate::error::Result;

/// Key material derived from a secret, plus the salt and IV it travels with.
pub struct DerivedKey {
    key: Zeroizing<[u8; KEY_LEN]>,
    salt: Vec<u8>,
    iv: Vec<u8>,
}

impl DerivedKey {
    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// The IV is not derived. It is only carried alongside the key.
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"<redacted>")
            .field("salt_len", &self.salt.len())
            .field("iv_len", &self.iv.len())
            .finish()
    }
}

/// Derive a 32-byte key with PBKDF2-HMAC-SHA512.
///
/// A missing `salt` is replaced by [`SALT_LEN`] random bytes and a missing
/// `iv` by [`IV_LEN`] random bytes. With the salt supplied the key is
/// deterministic.
pub fn derive_key<R: RandomSource + ?Sized>(
    secret: &str,
    salt: Option<&[u8]>,
    iv: Option<&[u8]>,
    rng: &R,
) -> Result<DerivedKey> {
    let salt = match salt {
        Some(salt) => salt.to_vec(),
        None => random_bytes(rng, SALT_LEN)?,
    };
    let iv = match iv {
        Some(iv) => iv.to_vec(),
        None => random_bytes(rng, IV_LEN)?,
    };

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha512>(secret.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut key[..]);

    Ok(DerivedKey { key, salt, iv })
}
