//! Maps tape randomness into range points: the hypergeometric split used at
//! every recursion level of the cipher, and the uniform bisection used at
//! the base case.

use crate::primitives::hgd;
use crate::range::ValueRange;
use crate::OpeError;

/// Picks the split point of `in_range` induced by the output-domain point
/// `nsample`, by drawing how many input points fall at or below it from the
/// hypergeometric distribution.
pub fn sample_hgd<I: Iterator<Item = u8>>(
    in_range: ValueRange,
    out_range: ValueRange,
    nsample: i64,
    coins: &mut I,
) -> Result<i64, OpeError> {
    let in_size = in_range.size();
    let out_size = out_range.size();
    assert!(in_size <= out_size);
    assert!(out_range.contains(nsample));

    // 1-based index of nsample within the output domain; wrapping_sub reads
    // the offset as an unsigned distance, valid for any ordered i64 pair
    let nsample_index = nsample.wrapping_sub(out_range.start()) as u64 + 1;

    if in_size == out_size {
        // Domains are the same size so the mapping is direct
        return Ok((in_range.start() as i128 + nsample_index as i128 - 1) as i64);
    }

    let in_sample_num = hgd::rhyper(nsample_index, in_size, out_size - in_size, coins)?;

    if in_sample_num == 0 {
        Ok(in_range.start())
    } else {
        let in_sample = (in_range.start() as i128 + in_sample_num as i128 - 1) as i64;
        assert!(in_range.contains(in_sample));
        Ok(in_sample)
    }
}

/// Picks one point of `range` uniformly, consuming one coin per bisection
/// step. A size-1 range resolves immediately without touching the tape.
pub fn sample_uniform<I: Iterator<Item = u8>>(
    range: ValueRange,
    coins: &mut I,
) -> Result<i64, OpeError> {
    let mut cur = range;
    while cur.size() > 1 {
        // Floor division, so negative midpoints still leave the lower half
        // non-empty; widening avoids overflow near the i64 extremes
        let mid = ((cur.start() as i128 + cur.end() as i128).div_euclid(2)) as i64;
        cur = match coins.next() {
            Some(0) => ValueRange::new(cur.start(), mid)?,
            Some(1) => ValueRange::new(mid + 1, cur.end())?,
            Some(_) => return Err(OpeError::InvalidCoin),
            None => return Err(OpeError::InsufficientCoins),
        };
    }
    Ok(cur.start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::CoinTape;
    use hex_literal::hex;

    const KEY: [u8; 32] = hex!(
        "000102030405060708090a0b0c0d0e0f"
        "101112131415161718191a1b1c1d1e1f"
    );

    fn range(start: i64, end: i64) -> ValueRange {
        ValueRange::new(start, end).unwrap()
    }

    #[test]
    fn uniform_follows_coin_path() {
        // Bit 0 narrows to the lower half, bit 1 to the upper half
        let mut coins = vec![0u8, 0].into_iter();
        assert_eq!(sample_uniform(range(0, 3), &mut coins).unwrap(), 0);

        let mut coins = vec![1u8, 1].into_iter();
        assert_eq!(sample_uniform(range(0, 3), &mut coins).unwrap(), 3);

        let mut coins = vec![1u8, 0].into_iter();
        assert_eq!(sample_uniform(range(0, 3), &mut coins).unwrap(), 2);
    }

    #[test]
    fn uniform_bisects_negative_midpoints() {
        // floor((-3 + -2) / 2) = -3, so bit 0 resolves to -3 and bit 1 to -2
        let mut coins = vec![0u8].into_iter();
        assert_eq!(sample_uniform(range(-3, -2), &mut coins).unwrap(), -3);

        let mut coins = vec![1u8].into_iter();
        assert_eq!(sample_uniform(range(-3, -2), &mut coins).unwrap(), -2);

        let mut coins = vec![1u8, 0].into_iter();
        assert_eq!(sample_uniform(range(-7, -4), &mut coins).unwrap(), -5);
    }

    #[test]
    fn uniform_single_point_consumes_no_coins() {
        let mut coins = std::iter::empty();
        assert_eq!(sample_uniform(range(5, 5), &mut coins).unwrap(), 5);
    }

    #[test]
    fn uniform_exhausted_coins() {
        let mut coins = vec![0u8].into_iter();
        assert_eq!(
            sample_uniform(range(0, 7), &mut coins).unwrap_err(),
            OpeError::InsufficientCoins
        );
    }

    #[test]
    fn uniform_rejects_non_bit_coin() {
        let mut coins = vec![2u8].into_iter();
        assert_eq!(
            sample_uniform(range(0, 7), &mut coins).unwrap_err(),
            OpeError::InvalidCoin
        );
    }

    #[test]
    fn uniform_stays_in_range() {
        for seed in 0..20 {
            let mut coins = CoinTape::new(&KEY, seed);
            let point = sample_uniform(range(-50, 200), &mut coins).unwrap();
            assert!((-50..=200).contains(&point));
        }
    }

    #[test]
    fn hgd_equal_sizes_is_direct() {
        // No randomness needed, so an empty coin source must suffice
        let mut coins = std::iter::empty();
        let x = sample_hgd(range(10, 19), range(100, 109), 103, &mut coins).unwrap();
        assert_eq!(x, 13);
    }

    #[test]
    fn hgd_split_lands_in_input_range() {
        for seed in 0..20 {
            let mut coins = CoinTape::new(&KEY, seed);
            let x = sample_hgd(range(0, 15), range(0, 1023), 511, &mut coins).unwrap();
            assert!((0..=15).contains(&x));
        }
    }

    #[test]
    fn hgd_is_deterministic() {
        let mut a = CoinTape::new(&KEY, 17);
        let mut b = CoinTape::new(&KEY, 17);
        assert_eq!(
            sample_hgd(range(0, 32767), range(0, (1 << 31) - 1), 1 << 30, &mut a).unwrap(),
            sample_hgd(range(0, 32767), range(0, (1 << 31) - 1), 1 << 30, &mut b).unwrap()
        );
    }
}
