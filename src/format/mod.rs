//! Fe26.2 wire format.
//!
//! A sealed token is eight `*`-separated fields:
//! ```text
//! PREFIX * PASSWORD_ID * SALT * IV * CIPHERTEXT * EXPIRATION * HMAC_SALT * HMAC_DIGEST
//! ```
//! The first six form the base string covered by the HMAC. Binary fields are
//! base64url without padding, the password id is always empty and the
//! expiration is decimal Unix milliseconds or empty.

use std::fmt;

use crate::error::{Result, SealError};

pub mod base64url;

/// Format version literal at the start of every token.
pub const PREFIX: &str = "Fe26.2";
/// Field separator.
pub const SEPARATOR: &str = "*";
/// Number of fields in a sealed token.
pub const FIELD_COUNT: usize = 8;

/// When a sealed token stops being accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    Never,
    /// Absolute Unix time in milliseconds.
    At(i64),
}

impl Expiration {
    /// Parses the expiration field. An empty field means [`Expiration::Never`].
    pub fn parse(field: &str) -> Result<Self> {
        if field.is_empty() {
            return Ok(Self::Never);
        }
        field
            .parse::<i64>()
            .map(Self::At)
            .map_err(|_| SealError::InvalidExpiration)
    }

    /// A token is expired from its expiration instant onwards.
    pub fn is_expired(&self, now_millis: i64) -> bool {
        match self {
            Self::Never => false,
            Self::At(at) => *at <= now_millis,
        }
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => Ok(()),
            Self::At(at) => write!(f, "{at}"),
        }
    }
}

/// The six fields covered by the HMAC, already encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseFields {
    prefix: String,
    password_id: String,
    salt: String,
    iv: String,
    cipher_text: String,
    expiration: String,
}

impl BaseFields {
    /// Builds the base fields for a new token from raw salt, iv and ciphertext.
    pub fn new(salt: &[u8], iv: &[u8], cipher_text: &[u8], expiration: Expiration) -> Self {
        Self {
            prefix: PREFIX.to_string(),
            password_id: String::new(),
            salt: base64url::encode(salt),
            iv: base64url::encode(iv),
            cipher_text: base64url::encode(cipher_text),
            expiration: expiration.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn password_id(&self) -> &str {
        &self.password_id
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn iv(&self) -> &str {
        &self.iv
    }

    pub fn cipher_text(&self) -> &str {
        &self.cipher_text
    }

    /// The expiration field exactly as written in the token.
    pub fn raw_expiration(&self) -> &str {
        &self.expiration
    }

    pub fn expiration(&self) -> Result<Expiration> {
        Expiration::parse(&self.expiration)
    }

    /// The string the HMAC is computed over.
    pub fn base_string(&self) -> String {
        [
            self.prefix.as_str(),
            self.password_id.as_str(),
            self.salt.as_str(),
            self.iv.as_str(),
            self.cipher_text.as_str(),
            self.expiration.as_str(),
        ]
        .join(SEPARATOR)
    }

    /// Attaches the signature fields, producing a complete token.
    pub fn sign(self, hmac_salt: &[u8], hmac_digest: String) -> SealedToken {
        SealedToken {
            base: self,
            hmac_salt: base64url::encode(hmac_salt),
            hmac_digest,
        }
    }
}

/// A structurally valid Fe26.2 token. Nothing here has been authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedToken {
    base: BaseFields,
    hmac_salt: String,
    hmac_digest: String,
}

impl SealedToken {
    /// Splits a token into its fields.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The token does not have exactly eight fields
    /// - The prefix is not [`PREFIX`]
    pub fn parse(token: &str) -> Result<Self> {
        let fields: Vec<&str> = token.split(SEPARATOR).collect();
        let [
            prefix,
            password_id,
            salt,
            iv,
            cipher_text,
            expiration,
            hmac_salt,
            hmac_digest,
        ] = fields[..]
        else {
            return Err(SealError::IncorrectFormat);
        };

        if prefix != PREFIX {
            return Err(SealError::UnsupportedVersion);
        }

        Ok(Self {
            base: BaseFields {
                prefix: prefix.to_string(),
                password_id: password_id.to_string(),
                salt: salt.to_string(),
                iv: iv.to_string(),
                cipher_text: cipher_text.to_string(),
                expiration: expiration.to_string(),
            },
            hmac_salt: hmac_salt.to_string(),
            hmac_digest: hmac_digest.to_string(),
        })
    }

    pub fn base(&self) -> &BaseFields {
        &self.base
    }

    pub fn hmac_salt(&self) -> &str {
        &self.hmac_salt
    }

    pub fn hmac_digest(&self) -> &str {
        &self.hmac_digest
    }
}

impl fmt::Display for SealedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.base.base_string(),
            self.hmac_salt,
            self.hmac_digest
        )
    }
}

/// Quick structural check: right prefix and right number of fields.
///
/// Says nothing about integrity; use it to decide whether a value should be
/// passed to unseal at all.
pub fn is_sealed(value: &str) -> bool {
    value.starts_with(PREFIX) && value.split(SEPARATOR).count() == FIELD_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "Fe26.2**SqhOkY8av81FPay7I60ktrpeOq7SgRNCcNN0rHWAMSg*3xsUfKKg2KiUWhsOmm1Nnw*_MeWO7OhJooR1Jc0cXQ5pp-wrtooQBeZsvNCSF9Yl5mm5xpCr8_SwxPJJkzwxN43**r3lxz-MMOws6YE-lDcXy6rmZc0mHHMVbXsndXmePgnA*JRDpLG7MxvgdoJqTeaTnUEQ-c0E6eyA66hVSr3f4BLmdfzZYU7fWIYGImEpEZgwzp_0jlF44R0Vr8BDQBlJiNw";

    #[test]
    fn parse_then_display_is_identity() {
        let token = SealedToken::parse(TOKEN).unwrap();
        assert_eq!(token.to_string(), TOKEN);
    }

    #[test]
    fn parse_exposes_fields() {
        let token = SealedToken::parse(TOKEN).unwrap();
        assert_eq!(token.base().prefix(), PREFIX);
        assert_eq!(token.base().password_id(), "");
        assert_eq!(token.base().iv(), "3xsUfKKg2KiUWhsOmm1Nnw");
        assert_eq!(token.base().expiration().unwrap(), Expiration::Never);
        assert_eq!(token.hmac_salt(), "r3lxz-MMOws6YE-lDcXy6rmZc0mHHMVbXsndXmePgnA");
    }

    #[test]
    fn base_string_is_first_six_fields() {
        let token = SealedToken::parse(TOKEN).unwrap();
        let expected: Vec<&str> = TOKEN.split('*').take(6).collect();
        assert_eq!(token.base().base_string(), expected.join("*"));
    }

    #[test]
    fn extra_field_is_incorrect_format() {
        match SealedToken::parse(&format!("x*{TOKEN}")) {
            Err(SealError::IncorrectFormat) => {}
            other => panic!("expected IncorrectFormat, got: {other:?}"),
        }
    }

    #[test]
    fn missing_field_is_incorrect_format() {
        assert!(matches!(
            SealedToken::parse("Fe26.2**a*b*c**d"),
            Err(SealError::IncorrectFormat)
        ));
        assert!(matches!(SealedToken::parse(""), Err(SealError::IncorrectFormat)));
    }

    #[test]
    fn wrong_prefix_is_unsupported_version() {
        let token = TOKEN.replacen("Fe26.2", "Fe27.2", 1);
        match SealedToken::parse(&token) {
            Err(SealError::UnsupportedVersion) => {}
            other => panic!("expected UnsupportedVersion, got: {other:?}"),
        }
    }

    #[test]
    fn new_base_fields_round_trip_through_parse() {
        let base = BaseFields::new(&[1u8; 32], &[2u8; 16], &[3u8; 16], Expiration::At(1234));
        let token = base.clone().sign(&[4u8; 32], "digest".to_string());

        let parsed = SealedToken::parse(&token.to_string()).unwrap();
        assert_eq!(parsed.base(), &base);
        assert_eq!(parsed.base().expiration().unwrap(), Expiration::At(1234));
        assert_eq!(parsed.hmac_digest(), "digest");
    }

    #[test]
    fn expiration_parsing() {
        assert_eq!(Expiration::parse("").unwrap(), Expiration::Never);
        assert_eq!(Expiration::parse("1623946580929").unwrap(), Expiration::At(1623946580929));
        assert!(matches!(
            Expiration::parse("1623946786465dupa"),
            Err(SealError::InvalidExpiration)
        ));
        assert!(matches!(Expiration::parse("1.5"), Err(SealError::InvalidExpiration)));
    }

    #[test]
    fn expiration_boundary_counts_as_expired() {
        let exp = Expiration::At(1000);
        assert!(!exp.is_expired(999));
        assert!(exp.is_expired(1000));
        assert!(exp.is_expired(1001));
        assert!(!Expiration::Never.is_expired(i64::MAX));
    }

    #[test]
    fn expiration_display() {
        assert_eq!(Expiration::Never.to_string(), "");
        assert_eq!(Expiration::At(42).to_string(), "42");
    }

    #[test]
    fn is_sealed_checks_prefix_and_field_count() {
        assert!(is_sealed(TOKEN));
        assert!(!is_sealed("plain cookie value"));
        assert!(!is_sealed(&format!("x*{TOKEN}")));
        assert!(!is_sealed("Fe26.2*only*three"));
    }
}
