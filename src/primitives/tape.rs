use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes256, Block};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

use super::TAPE_BLOCK_SIZE;

/// Deterministic keyed bit tape.
///
/// Seeding derives a 256-bit sub-key by HMAC-SHA256 over the decimal string
/// encoding of the seed value, then expands it with AES-256 in counter mode
/// (128-bit big-endian counter starting at zero) into an effectively
/// infinite keystream, exposed one bit at a time, most significant first.
///
/// The tape is a stateful cursor: reading a bit cannot be undone and the
/// stream cannot be restarted. The cipher creates a fresh tape per recursion
/// seed, so no tape is ever shared between calls.
pub struct CoinTape {
    cipher: Aes256,
    counter: u128,
    block: [u8; TAPE_BLOCK_SIZE],
    used_bits: usize,
}

impl CoinTape {
    pub fn new(key: &[u8], seed: i64) -> Self {
        // KeyInit is also in scope for the block cipher, so name the trait
        let mut mac =
            <Hmac<Sha256> as Mac>::new_from_slice(key).expect("HMAC accepts keys of any length");
        mac.update(seed.to_string().as_bytes());
        let mut sub_key = [0u8; 32];
        sub_key.copy_from_slice(&mac.finalize().into_bytes());

        let cipher = Aes256::new(GenericArray::from_slice(&sub_key));
        sub_key.zeroize();

        Self {
            cipher,
            counter: 0,
            block: [0u8; TAPE_BLOCK_SIZE],
            used_bits: TAPE_BLOCK_SIZE * 8,
        }
    }

    fn refill(&mut self) {
        self.block = self.counter.to_be_bytes();
        self.cipher
            .encrypt_block(Block::from_mut_slice(&mut self.block));
        self.counter += 1;
        self.used_bits = 0;
    }
}

impl Iterator for CoinTape {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.used_bits == TAPE_BLOCK_SIZE * 8 {
            self.refill();
        }
        let byte = self.block[self.used_bits / 8];
        let bit = (byte >> (7 - (self.used_bits % 8))) & 1;
        self.used_bits += 1;
        Some(bit)
    }
}
