//! Sealed tokens in the Fe26.2 format.
//!
//! A sealed token carries a value encrypted with AES-256-CBC and signed with
//! HMAC-SHA512, both keyed from a 32-character secret through PBKDF2. It can
//! be stored anywhere outside the server (a cookie, typically) and handed back
//! later; [`unseal`] verifies it and returns the original value.
//!
//! ```no_run
//! let secret = "some_not_random_password_that_is";
//! let token = ironseal::seal("hello", secret, Some(60_000))?;
//! assert_eq!(ironseal::unseal(&token, secret)?, "hello");
//! # Ok::<(), ironseal::SealError>(())
//! ```

mod clock;
pub mod crypto;
mod error;
pub mod format;
pub mod ttl;

pub use crate::clock::{Clock, SystemClock};
pub use crate::crypto::{OsRandom, RandomSource};
pub use crate::error::{Result, SealError};
pub use crate::format::{Expiration, PREFIX, SealedToken, is_sealed};
pub use crate::ttl::parse_ttl;

use crate::crypto::{derive_key, hmac_with_password, timing_safe_equal};
use crate::format::{BaseFields, base64url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, trace};

/// Required secret length, in characters.
pub const SECRET_LEN: usize = 32;

/// Seals and unseals tokens using an injected random source and clock.
///
/// [`Sealer::new`] uses the OS CSPRNG and the system clock, which is what the
/// free functions [`seal`] and [`unseal`] do.
#[derive(Debug, Clone, Default)]
pub struct Sealer<R = OsRandom, C = SystemClock> {
    rng: R,
    clock: C,
}

impl Sealer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: RandomSource, C: Clock> Sealer<R, C> {
    pub fn with_parts(rng: R, clock: C) -> Self {
        Self { rng, clock }
    }

    /// Encrypt and sign `value`.
    ///
    /// `ttl` is in milliseconds; `None` or zero produce a token that never
    /// expires.
    pub fn seal(&self, value: &str, secret: &str, ttl: Option<u64>) -> Result<String> {
        check_secret(secret)?;

        let key = derive_key(secret, None, None, &self.rng)?;
        let cipher_text = crypto::encrypt(key.key(), key.iv(), value.as_bytes())?;

        let expiration = match ttl {
            Some(ttl) if ttl > 0 => {
                let ttl = i64::try_from(ttl).unwrap_or(i64::MAX);
                Expiration::At(self.clock.now_millis().saturating_add(ttl))
            }
            _ => Expiration::Never,
        };

        let base = BaseFields::new(key.salt(), key.iv(), &cipher_text, expiration);
        let mac = hmac_with_password(secret, &base.base_string(), None, &self.rng)?;
        let token = base.sign(&mac.salt, mac.digest);

        trace!(%expiration, "sealed value");
        Ok(token.to_string())
    }

    /// Verify `token` and return the value it carries.
    pub fn unseal(&self, token: &str, secret: &str) -> Result<String> {
        let result = self.open(token, secret);
        match &result {
            Ok(_) => trace!("unsealed value"),
            Err(err) => debug!(error = %err, "rejected sealed token"),
        }
        result
    }

    /// Seal any serializable value as JSON.
    pub fn seal_json<T: Serialize + ?Sized>(
        &self,
        value: &T,
        secret: &str,
        ttl: Option<u64>,
    ) -> Result<String> {
        let json = serde_json::to_string(value)?;
        self.seal(&json, secret, ttl)
    }

    /// Unseal a token and deserialize its JSON value.
    pub fn unseal_json<T: DeserializeOwned>(&self, token: &str, secret: &str) -> Result<T> {
        let json = self.unseal(token, secret)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn open(&self, token: &str, secret: &str) -> Result<String> {
        let token = SealedToken::parse(token)?;
        let base = token.base();

        if base.expiration()?.is_expired(self.clock.now_millis()) {
            return Err(SealError::ExpiredSeal);
        }

        let hmac_salt = decode_field(token.hmac_salt())?;
        let mac = hmac_with_password(
            secret,
            &base.base_string(),
            Some(hmac_salt.as_slice()),
            &self.rng,
        )
        .map_err(|_| SealError::IncorrectHmac)?;
        if !timing_safe_equal(&mac.digest, token.hmac_digest()) {
            return Err(SealError::IncorrectHmac);
        }

        let cipher_text = decode_field(base.cipher_text())?;
        let iv = decode_field(base.iv())?;
        let salt = decode_field(base.salt())?;

        let key = derive_key(secret, Some(salt.as_slice()), Some(iv.as_slice()), &self.rng)?;
        let plaintext = crypto::decrypt(key.key(), key.iv(), &cipher_text)?;

        String::from_utf8(plaintext.to_vec()).map_err(|_| SealError::IncorrectHmac)
    }
}

/// Seal `value` with the OS random source and system clock.
pub fn seal(value: &str, secret: &str, ttl: Option<u64>) -> Result<String> {
    Sealer::new().seal(value, secret, ttl)
}

/// Unseal `token` against the system clock.
pub fn unseal(token: &str, secret: &str) -> Result<String> {
    Sealer::new().unseal(token, secret)
}

pub fn seal_json<T: Serialize + ?Sized>(
    value: &T,
    secret: &str,
    ttl: Option<u64>,
) -> Result<String> {
    Sealer::new().seal_json(value, secret, ttl)
}

pub fn unseal_json<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T> {
    Sealer::new().unseal_json(token, secret)
}

// Counted in UTF-16 code units so non-ASCII secrets are accepted or rejected
// exactly as other Fe26.2 implementations do.
fn check_secret(secret: &str) -> Result<()> {
    if secret.encode_utf16().count() != SECRET_LEN {
        return Err(SealError::SecretLength {
            expected: SECRET_LEN,
        });
    }
    Ok(())
}

fn decode_field(field: &str) -> Result<Vec<u8>> {
    base64url::decode(field).map_err(|_| SealError::IncorrectHmac)
}
