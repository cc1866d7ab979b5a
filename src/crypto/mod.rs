//! Cryptographic primitives for sealed tokens.
//!
//! Provides randomness, key derivation, AES-256-CBC and the salted HMAC.

pub mod cipher;
pub mod kdf;
pub mod mac;
pub mod rng;

pub use cipher::{decrypt, encrypt};
pub use kdf::{DerivedKey, derive_key};
pub use mac::{MacDigest, hmac_with_password, timing_safe_equal};
pub use rng::{OsRandom, RandomSource};

/// Length of the derived key (32 bytes / AES-256).
pub const KEY_LEN: usize = 32;
/// Length of a freshly generated salt (32 bytes).
pub const SALT_LEN: usize = 32;
/// Length of a freshly generated IV (16 bytes / one AES block).
pub const IV_LEN: usize = 16;
/// PBKDF2 rounds. Part of the wire format; other implementations use the same count.
pub const PBKDF2_ITERATIONS: u32 = 10;
