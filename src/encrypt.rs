//! Plaintext-type facade over the cipher.
//!
//! Numbers encrypt to a single output-domain integer. Strings encrypt
//! byte-wise: each UTF-8 byte is passed through the cipher independently
//! and emitted as a big-endian 4-byte word, so the concatenated ciphertext
//! bytes compare lexicographically exactly like the original strings.

use byteorder::{BigEndian, ByteOrder};
use std::convert::TryFrom;

use crate::cipher::Ope;
use crate::OpeError;

/// Width of one encrypted byte in the string encoding.
const WORD_SIZE: usize = 4;

pub trait OpeEncrypt {
    type Output;

    fn encrypt(&self, cipher: &Ope) -> Result<Self::Output, OpeError>;
}

impl OpeEncrypt for i64 {
    type Output = i64;

    fn encrypt(&self, cipher: &Ope) -> Result<i64, OpeError> {
        cipher.encrypt(*self)
    }
}

impl OpeEncrypt for str {
    type Output = Vec<u8>;

    /// Requires an input domain covering `[0, 255]` and an output domain
    /// that fits in a `u32` word.
    fn encrypt(&self, cipher: &Ope) -> Result<Vec<u8>, OpeError> {
        check_string_domains(cipher)?;

        let mut out = vec![0u8; self.len() * WORD_SIZE];
        for (i, byte) in self.bytes().enumerate() {
            let ct = cipher.encrypt(i64::from(byte))?;
            BigEndian::write_u32(&mut out[i * WORD_SIZE..(i + 1) * WORD_SIZE], ct as u32);
        }
        Ok(out)
    }
}

pub fn decrypt_number(cipher: &Ope, ciphertext: i64) -> Result<i64, OpeError> {
    cipher.decrypt(ciphertext)
}

/// Inverse of the byte-wise string encryption: each big-endian 4-byte word
/// is decrypted back to one byte and the bytes are decoded as UTF-8.
pub fn decrypt_string(cipher: &Ope, data: &[u8]) -> Result<String, OpeError> {
    check_string_domains(cipher)?;
    if data.len() % WORD_SIZE != 0 {
        return Err(OpeError::Parse);
    }

    let mut bytes = Vec::with_capacity(data.len() / WORD_SIZE);
    for word in data.chunks_exact(WORD_SIZE) {
        let plaintext = cipher.decrypt(i64::from(BigEndian::read_u32(word)))?;
        let byte = u8::try_from(plaintext).map_err(|_| OpeError::InvalidCiphertext)?;
        bytes.push(byte);
    }
    String::from_utf8(bytes).map_err(|_| OpeError::Parse)
}

fn check_string_domains(cipher: &Ope) -> Result<(), OpeError> {
    if !cipher.in_range().contains(0) || !cipher.in_range().contains(255) {
        return Err(OpeError::OutOfDomain(255));
    }
    if cipher.out_range().start() < 0 || cipher.out_range().end() > i64::from(u32::MAX) {
        return Err(OpeError::Parse);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::ValueRange;
    use hex_literal::hex;

    const KEY: [u8; 32] = hex!(
        "101112131415161718191a1b1c1d1e1f"
        "202122232425262728292a2b2c2d2e2f"
    );

    fn init_ope() -> Ope {
        Ope::init(&KEY).unwrap()
    }

    #[test]
    fn number_round_trip() {
        let ope = init_ope();
        let ct = 4711i64.encrypt(&ope).unwrap();
        assert_eq!(decrypt_number(&ope, ct).unwrap(), 4711);
    }

    #[test]
    fn string_round_trip() {
        let ope = init_ope();
        let ct = "hello, world".encrypt(&ope).unwrap();
        assert_eq!(ct.len(), 12 * 4);
        assert_eq!(decrypt_string(&ope, &ct).unwrap(), "hello, world");
    }

    #[test]
    fn multibyte_utf8_round_trip() {
        let ope = init_ope();
        let ct = "smörgåsbord".encrypt(&ope).unwrap();
        assert_eq!(decrypt_string(&ope, &ct).unwrap(), "smörgåsbord");
    }

    #[test]
    fn empty_string_round_trip() {
        let ope = init_ope();
        let ct = "".encrypt(&ope).unwrap();
        assert!(ct.is_empty());
        assert_eq!(decrypt_string(&ope, &ct).unwrap(), "");
    }

    #[test]
    fn string_order_is_preserved() {
        let ope = init_ope();
        let ant = "ant".encrypt(&ope).unwrap();
        let bee = "bee".encrypt(&ope).unwrap();
        assert!(ant < bee);

        // Prefix relation also survives the fixed-width encoding
        let a = "app".encrypt(&ope).unwrap();
        let b = "apple".encrypt(&ope).unwrap();
        assert!(a < b);
    }

    #[test]
    fn truncated_ciphertext_is_rejected() {
        let ope = init_ope();
        let mut ct = "abc".encrypt(&ope).unwrap();
        ct.pop();
        assert_eq!(decrypt_string(&ope, &ct).unwrap_err(), OpeError::Parse);
    }

    #[test]
    fn narrow_input_domain_is_rejected_for_strings() {
        let in_range = ValueRange::new(0, 100).unwrap();
        let out_range = ValueRange::new(0, 65535).unwrap();
        let ope = Ope::init_with_ranges(&KEY, in_range, out_range).unwrap();
        assert!("abc".encrypt(&ope).is_err());
    }
}
