use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::kdf::derive_key;
use super::rng::RandomSource;
use crate::error::{Result, SealError};
use crate::format::base64url;

type HmacSha512 = Hmac<Sha512>;

/// A base64url HMAC digest together with the salt its key was derived from.
#[derive(Debug, Clone)]
pub struct MacDigest {
    pub digest: String,
    pub salt: Vec<u8>,
}

/// HMAC-SHA512 over `base_string`, keyed by PBKDF2 of `secret`.
///
/// Without a `salt` a fresh random one is generated; the salt actually used
/// is returned so it can be written into the token.
pub fn hmac_with_password<R: RandomSource + ?Sized>(
    secret: &str,
    base_string: &str,
    salt: Option<&[u8]>,
    rng: &R,
) -> Result<MacDigest> {
    let key = derive_key(secret, salt, None, rng)?;

    let mut mac = <HmacSha512 as Mac>::new_from_slice(key.key())
        .map_err(|_| SealError::Encryption("invalid hmac key length".to_string()))?;
    mac.update(base_string.as_bytes());
    let digest = base64url::encode(mac.finalize().into_bytes());

    Ok(MacDigest {
        digest,
        salt: key.salt().to_vec(),
    })
}

/// Compare two byte strings without exiting early on the first difference.
///
/// Inputs of different length return `false` straight away, so the length
/// itself is not hidden.
pub fn timing_safe_equal(a: impl AsRef<[u8]>, b: impl AsRef<[u8]>) -> bool {
    a.as_ref().ct_eq(b.as_ref()).into()
}
