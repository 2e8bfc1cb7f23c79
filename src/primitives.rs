pub mod hgd;
pub mod prng;
pub mod tape;

pub use tape::CoinTape;

/// Block size of the tape keystream cipher in bytes.
pub const TAPE_BLOCK_SIZE: usize = 16;
