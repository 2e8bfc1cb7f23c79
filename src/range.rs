use crate::OpeError;

/// An inclusive integer interval.
///
/// Used both for the plaintext domain and the ciphertext domain of the
/// cipher, and for the shrinking interval pairs walked during encryption.
/// Construction enforces `start <= end`, so a range is never empty. The one
/// interval spanning every `i64` is rejected too: its size does not fit the
/// size type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    start: i64,
    end: i64,
}

impl ValueRange {
    pub fn new(start: i64, end: i64) -> Result<Self, OpeError> {
        if start > end {
            return Err(OpeError::InvalidRange(start, end));
        }
        if start == i64::MIN && end == i64::MAX {
            return Err(OpeError::InvalidRange(start, end));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn size(&self) -> u64 {
        // The two's-complement difference is the unsigned distance for any
        // ordered pair short of the rejected full i64 span
        self.end.wrapping_sub(self.start) as u64 + 1
    }

    pub fn contains(&self, value: i64) -> bool {
        self.start <= value && value <= self.end
    }

    /// Number of bits needed to index any point in the range,
    /// i.e. `ceil(log2(size))`.
    pub fn bit_size(&self) -> u32 {
        u64::BITS - (self.size() - 1).leading_zeros()
    }
}
