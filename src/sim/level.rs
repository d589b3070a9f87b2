//! Level composition
//!
//! A level is a pure function of its parameters: entities are laid out by
//! linear interpolation across the playable width, and the only
//! randomness is per-enemy walk speed jitter drawn from the caller's RNG.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use thiserror::Error;

use super::body::{Body, Ground, Rect};
use super::collectible::{Collectible, CollectibleKind};
use super::enemy::{Boss, Combatant, Enemy, PatrolEnemy, PatrolKind, boss_max_hits};
use crate::consts::CANVAS_HEIGHT;

/// Width of one background tile
pub const SEGMENT_WIDTH: f32 = 719.0;
/// Coins are laid out in small formations of this many
pub const COINS_PER_CLUSTER: u32 = 5;
const COIN_SPACING: f32 = 60.0;
const CLOUD_SPEED: f32 = 0.15;

#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    #[error("level {0} does not exist")]
    UnknownLevel(u32),
    #[error("level width must be positive (start {start}, end {end})")]
    InvalidWidth { start: f32, end: f32 },
    #[error("boss position {boss_x} lies outside the level ({start}..={end})")]
    BossOutOfBounds { boss_x: f32, start: f32, end: f32 },
}

/// Coin formation shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinPattern {
    /// Hump over the cluster
    Arc,
    /// Rising staircase
    Diagonal,
    /// Zig-zag between a high and a low row
    AlternatingRows,
}

/// Inputs to level generation
#[derive(Debug, Clone, PartialEq)]
pub struct LevelParams {
    pub number: u32,
    /// First x where enemies and pickups may appear
    pub start_x: f32,
    /// Right edge of the level; the character cannot walk past it
    pub end_x: f32,
    pub chickens: u32,
    pub small_chickens: u32,
    pub bottles: u32,
    pub coins: u32,
    pub coin_pattern: CoinPattern,
    pub wobble_coins: bool,
    pub hearts: u32,
    pub clouds: u32,
    pub boss_x: f32,
}

impl LevelParams {
    pub fn validate(&self) -> Result<(), LevelError> {
        let (start, end) = (self.start_x, self.end_x);
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(LevelError::InvalidWidth { start, end });
        }
        if !self.boss_x.is_finite() || self.boss_x <= start || self.boss_x > end {
            return Err(LevelError::BossOutOfBounds {
                boss_x: self.boss_x,
                start,
                end,
            });
        }
        Ok(())
    }
}

/// Monotonic entity id source shared by the level and the world
#[derive(Debug, Clone, Default)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        self.next += 1;
        self.next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Air,
    Third,
    Second,
    First,
}

impl LayerKind {
    pub const ALL: [LayerKind; 4] = [LayerKind::Air, LayerKind::Third, LayerKind::Second, LayerKind::First];

    pub fn sheet(self) -> &'static str {
        match self {
            LayerKind::Air => "background/air",
            LayerKind::Third => "background/third",
            LayerKind::Second => "background/second",
            LayerKind::First => "background/first",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundLayer {
    pub kind: LayerKind,
    pub x: f32,
    /// Alternates between the two tile variants so seams don't repeat
    pub variant: u32,
}

#[derive(Debug, Clone)]
pub struct Cloud {
    pub body: Body,
}

impl Cloud {
    /// Slow leftward drift, wrapping back to the right end
    pub fn step_motion(&mut self, start_x: f32, end_x: f32) {
        self.body.pos.x -= CLOUD_SPEED;
        if self.body.pos.x + self.body.size.x < start_x - SEGMENT_WIDTH {
            self.body.pos.x = end_x;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Level {
    pub number: u32,
    pub start_x: f32,
    pub end_x: f32,
    /// Patrol enemies first, the boss last
    pub enemies: Vec<Enemy>,
    pub clouds: Vec<Cloud>,
    pub background: Vec<BackgroundLayer>,
    pub bottles: Vec<Collectible>,
    pub coins: Vec<Collectible>,
    pub hearts: Vec<Collectible>,
    boss_defeated: bool,
}

impl Level {
    pub fn boss(&self) -> Option<&Boss> {
        self.enemies.iter().find_map(Enemy::as_boss)
    }

    pub fn boss_mut(&mut self) -> Option<&mut Boss> {
        self.enemies.iter_mut().find_map(Enemy::as_boss_mut)
    }

    /// True from the moment the boss dies, including after its removal
    pub fn boss_defeated(&self) -> bool {
        self.boss_defeated || self.boss().is_some_and(|b| b.is_dead())
    }

    /// Drop enemies whose removal delay ran out
    pub fn remove_expired_enemies(&mut self, expired: &[u32]) {
        if expired.is_empty() {
            return;
        }
        if self
            .enemies
            .iter()
            .any(|e| expired.contains(&e.id()) && e.as_boss().is_some())
        {
            self.boss_defeated = true;
        }
        self.enemies.retain(|e| !expired.contains(&e.id()));
    }

    /// Region projectiles may occupy before they are discarded
    pub fn play_area(&self) -> Rect {
        Rect {
            min: Vec2::new(-SEGMENT_WIDTH, f32::MIN),
            max: Vec2::new(self.end_x + SEGMENT_WIDTH, CANVAS_HEIGHT),
        }
    }
}

/// `n` points strictly inside `start..end`, evenly spaced
fn spread(start: f32, end: f32, n: u32) -> impl Iterator<Item = f32> {
    let step = (end - start) / (n + 1) as f32;
    (1..=n).map(move |i| start + step * i as f32)
}

/// Build a level from its parameters
pub fn generate_level(
    params: &LevelParams,
    rng: &mut impl Rng,
    ids: &mut EntityIds,
) -> Result<Level, LevelError> {
    params.validate()?;
    let (start, end) = (params.start_x, params.end_x);

    // Enemies: patrols spread up to the boss, small chickens interleaved evenly
    let patrols = params.chickens + params.small_chickens;
    let mut enemies = Vec::with_capacity(patrols as usize + 1);
    for (i, x) in spread(start, params.boss_x, patrols).enumerate() {
        let i = i as u32;
        let small = (i + 1) * params.small_chickens / patrols != i * params.small_chickens / patrols;
        let kind = if small {
            PatrolKind::SmallChicken
        } else {
            PatrolKind::Chicken
        };
        enemies.push(Enemy::Patrol(PatrolEnemy::new(ids.next_id(), kind, x, rng)));
    }
    enemies.push(Enemy::Boss(Boss::new(
        ids.next_id(),
        params.boss_x,
        boss_max_hits(params.number),
    )));

    let bottles = spread(start, end, params.bottles)
        .map(|x| Collectible::new(ids.next_id(), CollectibleKind::Bottle, Vec2::new(x, 360.0)))
        .collect();

    let hearts = spread(start, end, params.hearts)
        .enumerate()
        .map(|(i, x)| {
            Collectible::new(ids.next_id(), CollectibleKind::Heart, Vec2::new(x, 220.0))
                .with_wobble(i as f32 * 1.3)
        })
        .collect();

    let coins = place_coins(params, ids);

    let clouds = spread(start - SEGMENT_WIDTH, end, params.clouds)
        .map(|x| Cloud {
            body: Body::new(Vec2::new(x, 20.0), Vec2::new(500.0, 250.0)).with_ground(Ground::At(20.0)),
        })
        .collect();

    let segments = (end / SEGMENT_WIDTH).ceil() as i32;
    let background = (-1..=segments)
        .flat_map(|seg| {
            LayerKind::ALL.into_iter().map(move |kind| BackgroundLayer {
                kind,
                x: seg as f32 * SEGMENT_WIDTH,
                variant: seg.rem_euclid(2) as u32,
            })
        })
        .collect();

    log::info!(
        "Level {} generated: {} enemies, {} bottles, {} coins, {} hearts",
        params.number,
        enemies.len(),
        params.bottles,
        params.coins,
        params.hearts
    );

    Ok(Level {
        number: params.number,
        start_x: start,
        end_x: end,
        enemies,
        clouds,
        background,
        bottles,
        coins,
        hearts,
        boss_defeated: false,
    })
}

/// Coin y for slot `j` of a `len`-coin formation
fn coin_y(pattern: CoinPattern, j: u32, len: u32) -> f32 {
    let t = if len > 1 {
        j as f32 / (len - 1) as f32
    } else {
        0.5
    };
    match pattern {
        CoinPattern::Arc => 250.0 - 100.0 * (PI * t).sin(),
        CoinPattern::Diagonal => 320.0 - 150.0 * t,
        CoinPattern::AlternatingRows => {
            if j % 2 == 0 {
                190.0
            } else {
                290.0
            }
        }
    }
}

fn place_coins(params: &LevelParams, ids: &mut EntityIds) -> Vec<Collectible> {
    let clusters = params.coins.div_ceil(COINS_PER_CLUSTER);
    let mut coins = Vec::with_capacity(params.coins as usize);
    let mut remaining = params.coins;
    for (c, anchor) in spread(params.start_x, params.end_x, clusters).enumerate() {
        let len = remaining.min(COINS_PER_CLUSTER);
        remaining -= len;
        // Center the formation on its anchor
        let left = anchor - COIN_SPACING * (len - 1) as f32 / 2.0;
        for j in 0..len {
            let pos = Vec2::new(left + COIN_SPACING * j as f32, coin_y(params.coin_pattern, j, len));
            let coin = Collectible::new(ids.next_id(), CollectibleKind::Coin, pos);
            let coin = if params.wobble_coins {
                coin.with_wobble((c as u32 * COINS_PER_CLUSTER + j) as f32 * 0.6)
            } else {
                coin
            };
            coins.push(coin);
        }
    }
    coins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::levels::level_params;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn params() -> LevelParams {
        LevelParams {
            number: 1,
            start_x: 500.0,
            end_x: 3000.0,
            chickens: 4,
            small_chickens: 2,
            bottles: 5,
            coins: 12,
            coin_pattern: CoinPattern::Arc,
            wobble_coins: false,
            hearts: 2,
            clouds: 3,
            boss_x: 2600.0,
        }
    }

    fn generate(p: &LevelParams, seed: u64) -> Level {
        generate_level(p, &mut Pcg32::seed_from_u64(seed), &mut EntityIds::default()).unwrap()
    }

    #[test]
    fn test_counts_and_boss_last() {
        let level = generate(&params(), 1);
        assert_eq!(level.enemies.len(), 7);
        let boss = level.enemies.last().and_then(Enemy::as_boss).expect("boss last");
        assert_eq!(boss.body.pos.x, 2600.0);
        assert_eq!(boss.max_hits(), 5);
        assert_eq!(level.bottles.len(), 5);
        assert_eq!(level.coins.len(), 12);
        assert_eq!(level.hearts.len(), 2);
        assert_eq!(level.clouds.len(), 3);

        let small = level
            .enemies
            .iter()
            .filter(|e| matches!(e, Enemy::Patrol(p) if p.kind == PatrolKind::SmallChicken))
            .count();
        assert_eq!(small, 2);
    }

    #[test]
    fn test_enemies_evenly_spaced() {
        let level = generate(&params(), 1);
        let xs: Vec<f32> = level.enemies[..6].iter().map(|e| e.body().pos.x).collect();
        let gap = xs[1] - xs[0];
        assert!(gap > 0.0);
        for w in xs.windows(2) {
            assert!(((w[1] - w[0]) - gap).abs() < 1e-3);
        }
        assert!(xs[0] > 500.0 && xs[5] < 2600.0);
    }

    #[test]
    fn test_invalid_params_fail_fast() {
        let mut p = params();
        p.end_x = p.start_x;
        assert!(matches!(
            generate_level(&p, &mut Pcg32::seed_from_u64(0), &mut EntityIds::default()),
            Err(LevelError::InvalidWidth { .. })
        ));

        let mut p = params();
        p.boss_x = 5000.0;
        assert!(matches!(
            generate_level(&p, &mut Pcg32::seed_from_u64(0), &mut EntityIds::default()),
            Err(LevelError::BossOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_coin_patterns() {
        let mut p = params();
        p.coins = 5;
        p.coin_pattern = CoinPattern::Diagonal;
        let ys: Vec<f32> = generate(&p, 0).coins.iter().map(|c| c.body.pos.y).collect();
        assert!(ys.windows(2).all(|w| w[1] < w[0]), "diagonal rises: {ys:?}");

        p.coin_pattern = CoinPattern::Arc;
        let ys: Vec<f32> = generate(&p, 0).coins.iter().map(|c| c.body.pos.y).collect();
        assert!(ys[2] < ys[0] && ys[2] < ys[4], "arc peaks in the middle: {ys:?}");

        p.coin_pattern = CoinPattern::AlternatingRows;
        let ys: Vec<f32> = generate(&p, 0).coins.iter().map(|c| c.body.pos.y).collect();
        assert_eq!(ys, vec![190.0, 290.0, 190.0, 290.0, 190.0]);
    }

    #[test]
    fn test_wobble_coins_get_distinct_phases() {
        let mut p = params();
        p.wobble_coins = true;
        let level = generate(&p, 0);
        let phases: Vec<f32> = level.coins.iter().filter_map(|c| c.wobble.map(|w| w.phase)).collect();
        assert_eq!(phases.len(), level.coins.len());
        assert!(phases.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn test_background_covers_level() {
        let level = generate(&params(), 0);
        let first = level.background.iter().filter(|b| b.kind == LayerKind::First);
        let max_x = first.map(|b| b.x).fold(f32::MIN, f32::max);
        assert!(max_x + SEGMENT_WIDTH >= level.end_x);
    }

    #[test]
    fn test_catalog_levels_generate() {
        for n in 1..=8 {
            let p = level_params(n).unwrap();
            let level = generate(&p, n as u64);
            assert_eq!(level.boss().unwrap().max_hits(), boss_max_hits(n));
        }
    }

    proptest! {
        #[test]
        fn prop_generation_is_deterministic(seed in any::<u64>(), n in 1u32..=8) {
            let p = level_params(n).unwrap();
            let a = generate(&p, seed);
            let b = generate(&p, seed);
            prop_assert_eq!(a.enemies.len(), b.enemies.len());
            prop_assert_eq!(a.coins.len(), b.coins.len());
            prop_assert_eq!(a.bottles.len(), b.bottles.len());
            prop_assert_eq!(a.hearts.len(), b.hearts.len());
            for (x, y) in a.enemies.iter().zip(&b.enemies) {
                prop_assert_eq!(x.body().pos, y.body().pos);
                if let (Enemy::Patrol(x), Enemy::Patrol(y)) = (x, y) {
                    prop_assert_eq!(x.walk_speed(), y.walk_speed());
                }
            }
            let boss = a.enemies.last().and_then(Enemy::as_boss);
            prop_assert!(boss.is_some_and(|b| b.body.pos.x == p.boss_x));
        }
    }
}
