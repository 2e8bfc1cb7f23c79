use crate::OpeError;

/// Uniform draws in `[0, 1]` backed by a bit tape.
///
/// Each draw consumes exactly 32 coins, most significant bit first, and
/// normalizes the accumulated word by `2^32 - 1`. The tape behind a real
/// cipher invocation is infinite, so exhaustion here signals a broken coin
/// source rather than an expected runtime condition.
pub struct Prng<'c, I: Iterator<Item = u8>> {
    coins: &'c mut I,
}

impl<'c, I: Iterator<Item = u8>> Prng<'c, I> {
    pub fn new(coins: &'c mut I) -> Self {
        Self { coins }
    }

    pub fn draw(&mut self) -> Result<f64, OpeError> {
        let mut acc: u32 = 0;
        for _ in 0..32 {
            let bit = self.coins.next().ok_or(OpeError::InsufficientCoins)?;
            debug_assert!(bit <= 1);
            acc = (acc << 1) | u32::from(bit);
        }
        Ok(acc as f64 / u32::MAX as f64)
    }
}
