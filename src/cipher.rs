use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::primitives::CoinTape;
use crate::range::ValueRange;
use crate::sample::{sample_hgd, sample_uniform};
use crate::OpeError;

pub const DEFAULT_IN_RANGE_END: i64 = (1 << 15) - 1;
pub const DEFAULT_OUT_RANGE_END: i64 = (1 << 31) - 1;
pub const MIN_KEY_SIZE: usize = 24;

#[derive(Zeroize, ZeroizeOnDrop)]
struct OpeKey(Vec<u8>);

/// Last point of the upper-rounded lower half of an output range:
/// `start - 1 + ceil(size / 2)`, computed wide so domains touching the i64
/// extremes cannot overflow.
fn midpoint(out_range: ValueRange, out_size: u64) -> i64 {
    let half = out_size / 2 + out_size % 2;
    (out_range.start() as i128 + half as i128 - 1) as i64
}

/// An order-preserving cipher bound to one key and one domain pair.
///
/// The instance is immutable after construction. Every call builds its own
/// ranges and coin tapes, so `encrypt` and `decrypt` are safe to invoke
/// concurrently from multiple threads.
pub struct Ope {
    key: OpeKey,
    in_range: ValueRange,
    out_range: ValueRange,
}

impl Ope {
    /// Creates a cipher over the default domains: plaintexts in
    /// `[0, 2^15 - 1]`, ciphertexts in `[0, 2^31 - 1]`.
    pub fn init(key: &[u8]) -> Result<Self, OpeError> {
        Self::init_with_ranges(
            key,
            ValueRange::new(0, DEFAULT_IN_RANGE_END)?,
            ValueRange::new(0, DEFAULT_OUT_RANGE_END)?,
        )
    }

    pub fn init_with_ranges(
        key: &[u8],
        in_range: ValueRange,
        out_range: ValueRange,
    ) -> Result<Self, OpeError> {
        if key.len() < MIN_KEY_SIZE {
            return Err(OpeError::InvalidKeySize(key.len()));
        }
        if in_range.size() > out_range.size() {
            return Err(OpeError::DomainTooSmall);
        }
        Ok(Self {
            key: OpeKey(key.to_vec()),
            in_range,
            out_range,
        })
    }

    /// Generates `block_size` random bytes and returns them base64-encoded.
    /// The encoded string is used directly as key material.
    pub fn generate_key(block_size: usize) -> Result<String, OpeError> {
        if block_size < MIN_KEY_SIZE {
            return Err(OpeError::InvalidKeySize(block_size));
        }
        let mut bytes = vec![0u8; block_size];
        OsRng.fill_bytes(&mut bytes);
        let encoded = BASE64.encode(&bytes);
        bytes.zeroize();
        Ok(encoded)
    }

    pub fn in_range(&self) -> ValueRange {
        self.in_range
    }

    pub fn out_range(&self) -> ValueRange {
        self.out_range
    }

    /// Encrypts one plaintext from the input domain.
    ///
    /// Walks the shrinking `(in_range, out_range)` pair, splitting the
    /// output domain at its midpoint and the input domain at a
    /// hypergeometric draw, until the input range collapses to the
    /// plaintext itself; the ciphertext is then drawn uniformly from the
    /// remaining output range on a tape seeded by the plaintext.
    pub fn encrypt(&self, plaintext: i64) -> Result<i64, OpeError> {
        if !self.in_range.contains(plaintext) {
            return Err(OpeError::OutOfDomain(plaintext));
        }

        let mut in_range = self.in_range;
        let mut out_range = self.out_range;

        loop {
            let in_size = in_range.size();
            let out_size = out_range.size();
            let mid = midpoint(out_range, out_size);
            debug_assert!(in_size <= out_size);

            if in_size == 1 {
                let mut coins = self.tape_gen(plaintext);
                return sample_uniform(out_range, &mut coins);
            }

            let mut coins = self.tape_gen(mid);
            let x = sample_hgd(in_range, out_range, mid, &mut coins)?;

            if plaintext <= x {
                in_range = ValueRange::new(in_range.start(), x)?;
                out_range = ValueRange::new(out_range.start(), mid)?;
            } else {
                in_range = ValueRange::new(x + 1, in_range.end())?;
                out_range = ValueRange::new(mid + 1, out_range.end())?;
            }
        }
    }

    /// Decrypts one ciphertext from the output domain.
    ///
    /// Follows the same split path as `encrypt`, branching on which half of
    /// the output domain the ciphertext lies in. At the base case the
    /// candidate plaintext's ciphertext is recomputed; a mismatch means the
    /// value was never produced under this key and domain.
    pub fn decrypt(&self, ciphertext: i64) -> Result<i64, OpeError> {
        if !self.out_range.contains(ciphertext) {
            return Err(OpeError::OutOfDomain(ciphertext));
        }

        let mut in_range = self.in_range;
        let mut out_range = self.out_range;

        loop {
            let in_size = in_range.size();
            let out_size = out_range.size();
            let mid = midpoint(out_range, out_size);
            debug_assert!(in_size <= out_size);

            if in_size == 1 {
                let plaintext = in_range.start();
                let mut coins = self.tape_gen(plaintext);
                let expected = sample_uniform(out_range, &mut coins)?;
                if expected == ciphertext {
                    return Ok(plaintext);
                }
                return Err(OpeError::InvalidCiphertext);
            }

            let mut coins = self.tape_gen(mid);
            let x = sample_hgd(in_range, out_range, mid, &mut coins)?;

            if ciphertext <= mid {
                in_range = ValueRange::new(in_range.start(), x)?;
                out_range = ValueRange::new(out_range.start(), mid)?;
            } else {
                // The split can place every input point at or below mid; a
                // ciphertext above mid then has no preimage at all.
                in_range = ValueRange::new(x + 1, in_range.end())
                    .map_err(|_| OpeError::InvalidCiphertext)?;
                out_range = ValueRange::new(mid + 1, out_range.end())?;
            }
        }
    }

    /// A fresh coin tape for one recursion seed. Tapes are never shared or
    /// reused across calls.
    fn tape_gen(&self, seed: i64) -> CoinTape {
        CoinTape::new(&self.key.0, seed)
    }
}
