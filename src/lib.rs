//! Order-preserving encryption (OPE) for integers and byte strings.
//!
//! The scheme maps plaintexts from a configured input domain into a larger
//! output domain such that ciphertext ordering matches plaintext ordering,
//! which lets an encrypted store answer range queries without decrypting
//! every candidate. All randomness is drawn from a keyed, deterministic
//! bit tape, so a fixed key always produces the same ciphertexts.
//!
//! ```rust,no_run
//! use ope_rs::{Ope, OpeEncrypt};
//!
//! let key = Ope::generate_key(32).unwrap();
//! let ope = Ope::init(key.as_bytes()).unwrap();
//!
//! let ct_a = 100i64.encrypt(&ope).unwrap();
//! let ct_b = 500i64.encrypt(&ope).unwrap();
//! assert!(ct_a < ct_b);
//! ```

pub mod cipher;
pub mod encrypt;
pub mod primitives;
pub mod range;
pub mod sample;

pub use cipher::{Ope, DEFAULT_IN_RANGE_END, DEFAULT_OUT_RANGE_END, MIN_KEY_SIZE};
pub use encrypt::{decrypt_number, decrypt_string, OpeEncrypt};
pub use range::ValueRange;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OpeError {
    #[error("invalid range: start {0} exceeds end {1}")]
    InvalidRange(i64, i64),

    #[error("key size {0} is below the 24-byte minimum")]
    InvalidKeySize(usize),

    #[error("input domain is larger than the output domain")]
    DomainTooSmall,

    #[error("value {0} is outside the configured domain")]
    OutOfDomain(i64),

    #[error("ciphertext was not produced by this key and domain")]
    InvalidCiphertext,

    #[error("coin tape exhausted mid-draw")]
    InsufficientCoins,

    #[error("coin value is not a bit")]
    InvalidCoin,

    #[error("malformed ciphertext encoding")]
    Parse,
}
