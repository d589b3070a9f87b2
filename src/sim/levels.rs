//! Built-in level catalog

use super::level::{CoinPattern, LevelError, LevelParams, SEGMENT_WIDTH};

pub const LEVEL_COUNT: u32 = 8;

const PATTERNS: [CoinPattern; 3] = [CoinPattern::Arc, CoinPattern::Diagonal, CoinPattern::AlternatingRows];

/// Parameters of level `n` (1-based)
pub fn level_params(n: u32) -> Result<LevelParams, LevelError> {
    if !(1..=LEVEL_COUNT).contains(&n) {
        return Err(LevelError::UnknownLevel(n));
    }
    // Each level adds one background segment and a few more enemies
    let end_x = SEGMENT_WIDTH * (4 + n) as f32;
    Ok(LevelParams {
        number: n,
        start_x: 600.0,
        end_x,
        chickens: 3 + n,
        small_chickens: 1 + n,
        bottles: 6 + n,
        coins: 5 * (2 + n / 2),
        coin_pattern: PATTERNS[((n - 1) % 3) as usize],
        wobble_coins: n % 2 == 1,
        hearts: 1 + n / 3,
        clouds: 3 + n,
        boss_x: end_x - 400.0,
    })
}
