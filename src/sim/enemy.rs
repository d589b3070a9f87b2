//! Enemies: patrolling chickens and the end boss

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::animation::{AnimationState, Clip};
use super::body::{Body, Facing, Ground, Insets};
use crate::consts::*;
use crate::ms_to_ticks;

/// Result of a bottle (or any damaging) hit on an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitEffect {
    /// Took damage and survived
    Hurt,
    /// This hit killed it
    Killed,
    /// Already dead, nothing happened
    Ignored,
}

/// Something the player can collide with and damage
pub trait Combatant {
    fn body(&self) -> &Body;
    fn is_dead(&self) -> bool;
    /// Apply one bottle hit
    fn take_hit(&mut self) -> HitEffect;
}

// ---------------------------------------------------------------------------
// Patrol enemies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolKind {
    Chicken,
    SmallChicken,
}

impl PatrolKind {
    fn size(self) -> Vec2 {
        match self {
            PatrolKind::Chicken => Vec2::new(80.0, 80.0),
            PatrolKind::SmallChicken => Vec2::new(50.0, 50.0),
        }
    }

    fn ground_y(self) -> f32 {
        // Feet on the same floor line as the character
        430.0 - self.size().y
    }

    fn walk_speed(self, rng: &mut impl Rng) -> f32 {
        match self {
            PatrolKind::Chicken => 0.15 + rng.random::<f32>() * 0.5,
            PatrolKind::SmallChicken => 0.3 + rng.random::<f32>() * 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolClip {
    ChickenWalk,
    ChickenDead,
    SmallWalk,
    SmallDead,
}

impl Clip for PatrolClip {
    fn frames(self) -> u32 {
        match self {
            PatrolClip::ChickenWalk | PatrolClip::SmallWalk => 3,
            PatrolClip::ChickenDead | PatrolClip::SmallDead => 1,
        }
    }

    fn sheet(self) -> &'static str {
        match self {
            PatrolClip::ChickenWalk => "chicken/walk",
            PatrolClip::ChickenDead => "chicken/dead",
            PatrolClip::SmallWalk => "small_chicken/walk",
            PatrolClip::SmallDead => "small_chicken/dead",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatrolEnemy {
    pub id: u32,
    pub kind: PatrolKind,
    pub body: Body,
    pub anim: AnimationState<PatrolClip>,
    walk_speed: f32,
    /// Ticks until removal once dead
    removal_ticks: Option<u32>,
}

impl PatrolEnemy {
    pub fn new(id: u32, kind: PatrolKind, x: f32, rng: &mut impl Rng) -> Self {
        let ground = kind.ground_y();
        let clip = match kind {
            PatrolKind::Chicken => PatrolClip::ChickenWalk,
            PatrolKind::SmallChicken => PatrolClip::SmallWalk,
        };
        Self {
            id,
            kind,
            body: Body::new(Vec2::new(x, ground), kind.size())
                .with_ground(Ground::At(ground))
                .with_hitbox(Insets::new(5.0, 5.0, 5.0, 5.0))
                .facing(Facing::Left),
            anim: AnimationState::new(clip),
            walk_speed: kind.walk_speed(rng),
            removal_ticks: None,
        }
    }

    pub fn walk_speed(&self) -> f32 {
        self.walk_speed
    }

    /// Kill the enemy: freeze, show the death sprite, start the removal delay
    pub fn die(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.removal_ticks = Some(ms_to_ticks(PATROL_REMOVAL_MS));
        self.anim.play(match self.kind {
            PatrolKind::Chicken => PatrolClip::ChickenDead,
            PatrolKind::SmallChicken => PatrolClip::SmallDead,
        });
        true
    }

    /// Constant leftward drift (movement tick)
    pub fn step_motion(&mut self) {
        if !self.is_dead() {
            self.body.pos.x -= self.walk_speed;
        }
    }

    /// Returns true once the death delay has run out
    pub fn tick_timers(&mut self) -> bool {
        match self.removal_ticks.as_mut() {
            Some(ticks) => {
                *ticks = ticks.saturating_sub(1);
                *ticks == 0
            }
            None => false,
        }
    }
}

impl Combatant for PatrolEnemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn is_dead(&self) -> bool {
        self.removal_ticks.is_some()
    }

    fn take_hit(&mut self) -> HitEffect {
        if self.die() {
            HitEffect::Killed
        } else {
            HitEffect::Ignored
        }
    }
}

// ---------------------------------------------------------------------------
// Boss
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossState {
    Walking,
    Flying,
    Attacking,
    Hurt,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossClip {
    Walk,
    Fly,
    Attack,
    Hurt,
    Dead,
}

impl Clip for BossClip {
    fn frames(self) -> u32 {
        match self {
            BossClip::Walk | BossClip::Fly => 4,
            BossClip::Attack => 8,
            BossClip::Hurt | BossClip::Dead => 3,
        }
    }

    fn looping(self) -> bool {
        self != BossClip::Dead
    }

    fn sheet(self) -> &'static str {
        match self {
            BossClip::Walk => "boss/walk",
            BossClip::Fly => "boss/fly",
            BossClip::Attack => "boss/attack",
            BossClip::Hurt => "boss/hurt",
            BossClip::Dead => "boss/dead",
        }
    }
}

impl BossState {
    fn clip(self) -> BossClip {
        match self {
            BossState::Walking => BossClip::Walk,
            BossState::Flying => BossClip::Fly,
            BossState::Attacking => BossClip::Attack,
            BossState::Hurt => BossClip::Hurt,
            BossState::Dead => BossClip::Dead,
        }
    }
}

/// Hits needed to kill the boss on a given level
pub fn boss_max_hits(level: u32) -> u32 {
    match level {
        0..=5 => 5,
        6 => 6,
        7 => 7,
        _ => 8,
    }
}

pub const BOSS_SIZE: Vec2 = Vec2::new(250.0, 300.0);
pub const BOSS_GROUND_Y: f32 = 135.0;

#[derive(Debug, Clone)]
pub struct Boss {
    pub id: u32,
    pub body: Body,
    pub anim: AnimationState<BossClip>,
    state: BossState,
    hit_count: u32,
    max_hits: u32,
    /// Holds position until the character first comes close
    awake: bool,
    target_x: f32,
    hurt_ticks: u32,
    fly_elapsed: u32,
    removal_ticks: Option<u32>,
}

impl Boss {
    pub fn new(id: u32, x: f32, max_hits: u32) -> Self {
        Self {
            id,
            body: Body::new(Vec2::new(x, BOSS_GROUND_Y), BOSS_SIZE)
                .with_ground(Ground::At(BOSS_GROUND_Y))
                .with_hitbox(Insets::new(60.0, 30.0, 30.0, 20.0))
                .facing(Facing::Left),
            anim: AnimationState::new(BossClip::Walk),
            state: BossState::Walking,
            hit_count: 0,
            max_hits: max_hits.max(1),
            awake: false,
            target_x: x,
            hurt_ticks: 0,
            fly_elapsed: 0,
            removal_ticks: None,
        }
    }

    pub fn state(&self) -> BossState {
        self.state
    }

    pub fn hit_count(&self) -> u32 {
        self.hit_count
    }

    pub fn max_hits(&self) -> u32 {
        self.max_hits
    }

    pub fn is_awake(&self) -> bool {
        self.awake
    }

    /// Remaining health as a 0..=100 percentage (for the boss bar)
    pub fn health_percent(&self) -> u8 {
        let left = self.max_hits.saturating_sub(self.hit_count);
        (left * 100 / self.max_hits) as u8
    }

    fn set_state(&mut self, state: BossState) {
        self.state = state;
        self.anim.play(state.clip());
    }

    /// Register one hit. Reaching `max_hits` is terminal.
    pub fn hit(&mut self) -> HitEffect {
        if self.state == BossState::Dead {
            return HitEffect::Ignored;
        }
        self.hit_count += 1;
        self.awake = true;
        self.body.pos.y = BOSS_GROUND_Y;
        if self.hit_count >= self.max_hits {
            self.removal_ticks = Some(ms_to_ticks(BOSS_REMOVAL_MS));
            self.set_state(BossState::Dead);
            log::debug!("boss {} defeated after {} hits", self.id, self.hit_count);
            HitEffect::Killed
        } else {
            self.hurt_ticks = ms_to_ticks(BOSS_HURT_MS);
            self.set_state(BossState::Hurt);
            HitEffect::Hurt
        }
    }

    /// AI tick: pick walking/attacking from distance, maybe take off
    pub fn think(&mut self, character_x: f32, rng: &mut impl Rng) {
        if matches!(self.state, BossState::Dead) {
            return;
        }
        let dx = character_x - self.body.center_x();
        self.body.facing = if dx < 0.0 { Facing::Left } else { Facing::Right };

        if !self.awake {
            if dx.abs() > BOSS_WAKE_DISTANCE {
                return;
            }
            self.awake = true;
            log::debug!("boss {} woke up", self.id);
        }
        if matches!(self.state, BossState::Hurt | BossState::Flying) {
            return;
        }
        self.target_x = character_x;

        if rng.random::<f32>() < BOSS_FLY_CHANCE {
            self.fly_elapsed = 0;
            self.set_state(BossState::Flying);
            return;
        }
        if dx.abs() <= BOSS_ATTACK_DISTANCE {
            self.set_state(BossState::Attacking);
        } else {
            self.set_state(BossState::Walking);
        }
    }

    /// Movement tick
    pub fn step_motion(&mut self) {
        match self.state {
            BossState::Walking if self.awake => {
                let dx = self.target_x - self.body.center_x();
                let step = dx.abs().min(BOSS_SPEED);
                self.body.pos.x += step * dx.signum();
            }
            BossState::Flying => {
                let duration = ms_to_ticks(BOSS_FLY_MS);
                self.fly_elapsed += 1;
                if self.fly_elapsed >= duration {
                    self.body.pos.y = BOSS_GROUND_Y;
                    self.set_state(BossState::Walking);
                } else {
                    // Two full bobs, starting and ending on the ground
                    let progress = self.fly_elapsed as f32 / duration as f32;
                    let lift = 0.5 * (1.0 - (TAU * 2.0 * progress).cos());
                    self.body.pos.y = BOSS_GROUND_Y - BOSS_FLY_HEIGHT * lift;
                }
            }
            _ => {}
        }
    }

    /// Hurt recovery and post-death removal delay. Returns true when the
    /// boss should be removed.
    pub fn tick_timers(&mut self) -> bool {
        if self.state == BossState::Hurt {
            self.hurt_ticks = self.hurt_ticks.saturating_sub(1);
            if self.hurt_ticks == 0 {
                self.set_state(BossState::Walking);
            }
        }
        match self.removal_ticks.as_mut() {
            Some(ticks) => {
                *ticks = ticks.saturating_sub(1);
                *ticks == 0
            }
            None => false,
        }
    }
}

impl Combatant for Boss {
    fn body(&self) -> &Body {
        &self.body
    }

    fn is_dead(&self) -> bool {
        self.state == BossState::Dead
    }

    fn take_hit(&mut self) -> HitEffect {
        self.hit()
    }
}

// ---------------------------------------------------------------------------
// Level enemy collection entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Enemy {
    Patrol(PatrolEnemy),
    Boss(Boss),
}

impl Enemy {
    pub fn id(&self) -> u32 {
        match self {
            Enemy::Patrol(e) => e.id,
            Enemy::Boss(b) => b.id,
        }
    }

    pub fn as_boss(&self) -> Option<&Boss> {
        match self {
            Enemy::Boss(b) => Some(b),
            Enemy::Patrol(_) => None,
        }
    }

    pub fn as_boss_mut(&mut self) -> Option<&mut Boss> {
        match self {
            Enemy::Boss(b) => Some(b),
            Enemy::Patrol(_) => None,
        }
    }

    pub fn step_motion(&mut self) {
        match self {
            Enemy::Patrol(e) => e.step_motion(),
            Enemy::Boss(b) => b.step_motion(),
        }
    }

    pub fn advance_animation(&mut self) {
        match self {
            Enemy::Patrol(e) => e.anim.advance(),
            Enemy::Boss(b) => b.anim.advance(),
        }
    }

    /// Returns true when the enemy should leave the level
    pub fn tick_timers(&mut self) -> bool {
        match self {
            Enemy::Patrol(e) => e.tick_timers(),
            Enemy::Boss(b) => b.tick_timers(),
        }
    }
}

impl Combatant for Enemy {
    fn body(&self) -> &Body {
        match self {
            Enemy::Patrol(e) => &e.body,
            Enemy::Boss(b) => &b.body,
        }
    }

    fn is_dead(&self) -> bool {
        match self {
            Enemy::Patrol(e) => e.is_dead(),
            Enemy::Boss(b) => b.is_dead(),
        }
    }

    fn take_hit(&mut self) -> HitEffect {
        match self {
            Enemy::Patrol(e) => e.take_hit(),
            Enemy::Boss(b) => b.take_hit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_boss_dies_on_exactly_max_hits() {
        for level in 1..=8 {
            let max = boss_max_hits(level);
            let mut boss = Boss::new(1, 2000.0, max);
            for _ in 0..max - 1 {
                assert_eq!(boss.hit(), HitEffect::Hurt);
                assert_ne!(boss.state(), BossState::Dead);
            }
            assert_eq!(boss.hit(), HitEffect::Killed);
            assert_eq!(boss.state(), BossState::Dead);
            assert_eq!(boss.hit(), HitEffect::Ignored, "dead is terminal");
            assert_eq!(boss.hit_count(), max);
        }
    }

    #[test]
    fn test_boss_max_hits_by_level() {
        assert_eq!(boss_max_hits(1), 5);
        assert_eq!(boss_max_hits(5), 5);
        assert_eq!(boss_max_hits(6), 6);
        assert_eq!(boss_max_hits(7), 7);
        assert_eq!(boss_max_hits(8), 8);
    }

    #[test]
    fn test_boss_sleeps_until_character_is_near() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut boss = Boss::new(1, 3000.0, 5);
        boss.think(0.0, &mut rng);
        boss.step_motion();
        assert!(!boss.is_awake());
        assert_eq!(boss.body.pos.x, 3000.0);

        boss.think(boss.body.center_x() - BOSS_WAKE_DISTANCE + 1.0, &mut rng);
        assert!(boss.is_awake());
    }

    #[test]
    fn test_boss_attacks_in_range_and_walks_otherwise() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut boss = Boss::new(1, 1000.0, 5);
        let center = boss.body.center_x();

        // Retry a few AI ticks in case a flight roll comes up
        let settle = |boss: &mut Boss, x: f32, rng: &mut Pcg32| {
            for _ in 0..50 {
                boss.think(x, rng);
                if boss.state() != BossState::Flying {
                    return;
                }
                while boss.state() == BossState::Flying {
                    boss.step_motion();
                }
            }
        };

        settle(&mut boss, center - 100.0, &mut rng);
        assert_eq!(boss.state(), BossState::Attacking);
        let x = boss.body.pos.x;
        boss.step_motion();
        assert_eq!(boss.body.pos.x, x, "attacks in place");

        settle(&mut boss, center - 600.0, &mut rng);
        assert_eq!(boss.state(), BossState::Walking);
        boss.step_motion();
        assert_eq!(boss.body.pos.x, x - BOSS_SPEED);
        assert_eq!(boss.body.facing, Facing::Left);
    }

    #[test]
    fn test_boss_flight_returns_to_ground() {
        let mut boss = Boss::new(1, 1000.0, 5);
        boss.awake = true;
        boss.set_state(BossState::Flying);
        let mut peak = BOSS_GROUND_Y;
        for _ in 0..ms_to_ticks(BOSS_FLY_MS) {
            boss.step_motion();
            peak = peak.min(boss.body.pos.y);
        }
        assert_eq!(boss.state(), BossState::Walking);
        assert_eq!(boss.body.pos.y, BOSS_GROUND_Y);
        assert!(peak < BOSS_GROUND_Y - BOSS_FLY_HEIGHT * 0.9);
    }

    #[test]
    fn test_boss_hurt_recovers() {
        let mut boss = Boss::new(1, 1000.0, 5);
        boss.hit();
        assert_eq!(boss.state(), BossState::Hurt);
        for _ in 0..ms_to_ticks(BOSS_HURT_MS) {
            assert!(!boss.tick_timers());
        }
        assert_eq!(boss.state(), BossState::Walking);
    }

    #[test]
    fn test_boss_removed_after_death_delay() {
        let mut boss = Boss::new(1, 1000.0, 1);
        boss.hit();
        for _ in 0..ms_to_ticks(BOSS_REMOVAL_MS) - 1 {
            assert!(!boss.tick_timers());
        }
        assert!(boss.tick_timers());
    }

    #[test]
    fn test_patrol_death_freezes_then_expires() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut chicken = PatrolEnemy::new(1, PatrolKind::Chicken, 500.0, &mut rng);
        chicken.step_motion();
        assert!(chicken.body.pos.x < 500.0);

        assert_eq!(chicken.take_hit(), HitEffect::Killed);
        assert_eq!(chicken.take_hit(), HitEffect::Ignored);
        let x = chicken.body.pos.x;
        chicken.step_motion();
        assert_eq!(chicken.body.pos.x, x);
        assert_eq!(chicken.anim.clip(), PatrolClip::ChickenDead);

        for _ in 0..ms_to_ticks(PATROL_REMOVAL_MS) - 1 {
            assert!(!chicken.tick_timers());
        }
        assert!(chicken.tick_timers());
    }

    #[test]
    fn test_walk_speed_jitter_in_range() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            let c = PatrolEnemy::new(1, PatrolKind::Chicken, 0.0, &mut rng);
            assert!((0.15..0.65).contains(&c.walk_speed()));
            let s = PatrolEnemy::new(2, PatrolKind::SmallChicken, 0.0, &mut rng);
            assert!((0.3..0.9).contains(&s.walk_speed()));
        }
    }
}
