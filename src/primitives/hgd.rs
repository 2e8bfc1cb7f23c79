//! Hypergeometric sampling driven by a deterministic coin tape.
//!
//! Draws the number of "good" items obtained when sampling without
//! replacement, using the classic pair of algorithms from the legacy
//! NumPy generator (itself derived from Ivan Frohne's rv.py): direct
//! simulation for small sample counts and HRUA* ratio-of-uniforms
//! rejection sampling for larger ones. The formulas are kept term-for-term
//! identical to the reference so a fixed tape yields the same variate on
//! every platform.

use super::prng::Prng;
use crate::OpeError;

const D1: f64 = 1.7155277699214135;
const D2: f64 = 0.8989161620588988;

/// Sample counts above this use rejection sampling.
const HRUA_THRESHOLD: u64 = 10;

/// Stirling series coefficients for the log-gamma approximation.
const STIRLING: [f64; 10] = [
    8.333333333333333e-02,
    -2.777777777777778e-03,
    7.936507936507937e-04,
    -5.952380952380952e-04,
    8.417508417508418e-04,
    -1.917526917526918e-03,
    6.410256410256410e-03,
    -2.955065359477124e-02,
    1.796443723688307e-01,
    -1.39243221690590e+00,
];

/// Draws a hypergeometric variate: the number of good items obtained when
/// `sample` items are drawn without replacement from a population of
/// `good` good and `bad` bad items.
pub fn rhyper<I: Iterator<Item = u8>>(
    sample: u64,
    good: u64,
    bad: u64,
    coins: &mut I,
) -> Result<u64, OpeError> {
    let mut prng = Prng::new(coins);
    if sample > HRUA_THRESHOLD {
        hrua(&mut prng, sample, good, bad)
    } else {
        hyp(&mut prng, sample, good, bad)
    }
}

/// Direct simulation, suitable for small sample counts.
fn hyp<I: Iterator<Item = u8>>(
    prng: &mut Prng<I>,
    sample: u64,
    good: u64,
    bad: u64,
) -> Result<u64, OpeError> {
    let d1 = (bad + good - sample) as f64;
    let d2 = bad.min(good) as f64;

    let mut y = d2;
    let mut k = sample as f64;

    while y > 0.0 {
        let u = prng.draw()?;
        y -= (u + y / (d1 + k)).floor();
        k -= 1.0;
        if k == 0.0 {
            break;
        }
    }

    let mut z = (d2 - y) as i64;
    if good > bad {
        z = sample as i64 - z;
    }
    Ok(z as u64)
}

/// HRUA* rejection sampling around the distribution mode.
fn hrua<I: Iterator<Item = u8>>(
    prng: &mut Prng<I>,
    sample: u64,
    good: u64,
    bad: u64,
) -> Result<u64, OpeError> {
    let popsize = good + bad;
    let mingoodbad = good.min(bad) as f64;
    let maxgoodbad = good.max(bad) as f64;
    let m = sample.min(popsize - sample);
    let mf = m as f64;
    let popsizef = popsize as f64;

    let d4 = mingoodbad / popsizef;
    let d5 = 1.0 - d4;
    let d6 = mf * d4 + 0.5;
    let d7 = ((popsizef - mf) * sample as f64 * d4 * d5 / (popsizef - 1.0) + 0.5).sqrt();
    let d8 = D1 * d7 + D2;

    // Mode of the distribution and the log-probability anchor there
    let d9 = ((mf + 1.0) * (mingoodbad + 1.0) / (popsizef + 2.0)).floor();
    let d10 = loggam(d9 + 1.0)
        + loggam(mingoodbad - d9 + 1.0)
        + loggam(mf - d9 + 1.0)
        + loggam(maxgoodbad - mf + d9 + 1.0);
    let d11 = (mf.min(mingoodbad) + 1.0).min((d6 + 16.0 * d7).floor());

    // Terminates almost surely with O(1) expected iterations; the reference
    // places no cap on it and neither do we.
    let accepted = loop {
        let x = prng.draw()?;
        let y = prng.draw()?;
        let w = d6 + d8 * (y - 0.5) / x;

        if w < 0.0 || w >= d11 {
            continue;
        }

        let z = w.floor();
        let t = d10
            - (loggam(z + 1.0)
                + loggam(mingoodbad - z + 1.0)
                + loggam(mf - z + 1.0)
                + loggam(maxgoodbad - mf + z + 1.0));

        // Fast accept
        if x * (4.0 - x) - 3.0 <= t {
            break z;
        }
        // Fast reject
        if x * (x - t) >= 1.0 {
            continue;
        }
        // Exact accept
        if 2.0 * x.ln() <= t {
            break z;
        }
    };

    let mut z = accepted as i64;
    if good > bad {
        z = m as i64 - z;
    }
    // Correction when the sample exceeds half the population
    if m < sample {
        z = good as i64 - z;
    }
    Ok(z as u64)
}

/// Log-gamma via a 10-term Stirling series in `1/x^2`, exact at 1 and 2,
/// shifting the argument above 7 before applying the series.
fn loggam(x: f64) -> f64 {
    if x == 1.0 || x == 2.0 {
        return 0.0;
    }

    let shifts = if x <= 7.0 { (7.0 - x) as u64 } else { 0 };
    let mut x0 = x + shifts as f64;

    let x2 = 1.0 / (x0 * x0);
    let xp = 2.0 * std::f64::consts::PI;
    let mut gl0 = STIRLING[9];
    for k in (0..9).rev() {
        gl0 = gl0 * x2 + STIRLING[k];
    }
    let mut gl = gl0 / x0 + 0.5 * xp.ln() + (x0 - 0.5) * x0.ln() - x0;

    for _ in 0..shifts {
        gl -= (x0 - 1.0).ln();
        x0 -= 1.0;
    }
    gl
}
