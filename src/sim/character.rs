//! The player character
//!
//! Input intents drive movement once per movement tick; combat state
//! (energy, immunity, stun, hurt) is tracked in tick counts so the whole
//! state machine stays deterministic.

use glam::Vec2;

use super::animation::{AnimationState, Clip};
use super::body::{Body, Facing, Insets};
use super::tick::TickInput;
use crate::consts::*;
use crate::ms_to_ticks;

/// Character behaviour state, in priority order (highest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterState {
    Dead,
    Hurt,
    Throwing,
    Jumping,
    Walking,
    LongIdle,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterClip {
    Idle,
    LongIdle,
    Walk,
    Jump,
    Throw,
    Hurt,
    Dead,
}

impl Clip for CharacterClip {
    fn frames(self) -> u32 {
        match self {
            CharacterClip::Idle | CharacterClip::LongIdle => 10,
            CharacterClip::Walk => 6,
            CharacterClip::Jump => 9,
            CharacterClip::Throw => 4,
            CharacterClip::Hurt => 3,
            CharacterClip::Dead => 7,
        }
    }

    fn looping(self) -> bool {
        !matches!(
            self,
            CharacterClip::Jump | CharacterClip::Throw | CharacterClip::Dead
        )
    }

    fn sheet(self) -> &'static str {
        match self {
            CharacterClip::Idle => "pepe/idle",
            CharacterClip::LongIdle => "pepe/long_idle",
            CharacterClip::Walk => "pepe/walk",
            CharacterClip::Jump => "pepe/jump",
            CharacterClip::Throw => "pepe/throw",
            CharacterClip::Hurt => "pepe/hurt",
            CharacterClip::Dead => "pepe/dead",
        }
    }
}

impl CharacterState {
    fn clip(self) -> CharacterClip {
        match self {
            CharacterState::Dead => CharacterClip::Dead,
            CharacterState::Hurt => CharacterClip::Hurt,
            CharacterState::Throwing => CharacterClip::Throw,
            CharacterState::Jumping => CharacterClip::Jump,
            CharacterState::Walking => CharacterClip::Walk,
            CharacterState::LongIdle => CharacterClip::LongIdle,
            CharacterState::Idle => CharacterClip::Idle,
        }
    }
}

/// What the character did on a movement tick (for sound events)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Movement {
    pub moved: bool,
    pub jumped: bool,
}

pub const CHARACTER_SIZE: Vec2 = Vec2::new(100.0, 250.0);
const CHARACTER_HITBOX: Insets = Insets::new(100.0, 20.0, 25.0, 10.0);

#[derive(Debug, Clone)]
pub struct Character {
    pub body: Body,
    pub anim: AnimationState<CharacterClip>,
    state: CharacterState,
    energy: u8,
    last_hit_tick: Option<u64>,
    hurt_ticks: u32,
    stun_ticks: u32,
    throw_ticks: u32,
    idle_ticks: u32,
    moved: bool,
}

impl Character {
    pub fn new(x: f32) -> Self {
        Self {
            body: Body::new(Vec2::new(x, GROUND_Y), CHARACTER_SIZE).with_hitbox(CHARACTER_HITBOX),
            anim: AnimationState::new(CharacterClip::Idle),
            state: CharacterState::Idle,
            energy: MAX_ENERGY,
            last_hit_tick: None,
            hurt_ticks: 0,
            stun_ticks: 0,
            throw_ticks: 0,
            idle_ticks: 0,
            moved: false,
        }
    }

    pub fn state(&self) -> CharacterState {
        self.state
    }

    pub fn energy(&self) -> u8 {
        self.energy
    }

    /// Set energy directly (clamped to the valid range)
    pub fn set_energy(&mut self, energy: u8) {
        self.energy = energy.min(MAX_ENERGY);
        self.update_state();
    }

    /// Restore energy, capped at the maximum. Dead characters stay dead.
    pub fn heal(&mut self, amount: u8) {
        if self.is_dead() {
            return;
        }
        self.energy = self.energy.saturating_add(amount).min(MAX_ENERGY);
    }

    pub fn is_dead(&self) -> bool {
        self.energy == 0
    }

    /// False while dead or inside the knockback stun window
    pub fn can_move(&self) -> bool {
        !self.is_dead() && !self.is_stunned()
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_ticks > 0
    }

    pub fn is_throwing(&self) -> bool {
        self.throw_ticks > 0
    }

    pub fn is_immune(&self, now: u64) -> bool {
        self.last_hit_tick
            .is_some_and(|last| now.saturating_sub(last) < ms_to_ticks(IMMUNITY_MS) as u64)
    }

    /// Take a hit at simulation tick `now`. Knockback stays inside
    /// `0..=max_x`. Returns false if it was ignored (already dead or still
    /// inside the immunity window).
    pub fn hit(&mut self, now: u64, max_x: f32) -> bool {
        if self.is_dead() || self.is_immune(now) {
            return false;
        }
        self.energy = self.energy.saturating_sub(HIT_DAMAGE);
        self.last_hit_tick = Some(now);
        self.idle_ticks = 0;
        if !self.is_dead() {
            self.hurt_ticks = ms_to_ticks(HURT_MS);
            self.stun_ticks = ms_to_ticks(STUN_MS);
            self.body.pos.x =
                (self.body.pos.x - self.body.facing.sign() * KNOCKBACK_DISTANCE).clamp(0.0, max_x);
        }
        self.update_state();
        true
    }

    /// Apply one movement tick of input. `max_x` is the level's right edge.
    pub fn apply_input(&mut self, input: &TickInput, max_x: f32) -> Movement {
        let mut movement = Movement::default();
        if input.left || input.right || input.jump || input.throw || self.body.is_airborne() {
            self.idle_ticks = 0;
        } else {
            self.idle_ticks = self.idle_ticks.saturating_add(1);
        }

        if self.can_move() {
            if input.right && self.body.pos.x < max_x {
                self.body.pos.x = (self.body.pos.x + CHARACTER_SPEED).min(max_x);
                self.body.facing = Facing::Right;
                movement.moved = true;
            }
            if input.left && self.body.pos.x > 0.0 {
                self.body.pos.x = (self.body.pos.x - CHARACTER_SPEED).max(0.0);
                self.body.facing = Facing::Left;
                movement.moved = true;
            }
            if input.jump {
                movement.jumped = self.body.jump();
            }
        }
        self.moved = movement.moved;
        movement
    }

    /// Begin a throw if the character is free to act
    pub fn try_throw(&mut self) -> bool {
        if !self.can_move() || self.is_throwing() {
            return false;
        }
        self.throw_ticks = ms_to_ticks(THROW_MS);
        self.idle_ticks = 0;
        true
    }

    /// Where a thrown bottle leaves the hand
    pub fn throw_origin(&self) -> Vec2 {
        let x = match self.body.facing {
            Facing::Right => self.body.pos.x + self.body.size.x - 30.0,
            Facing::Left => self.body.pos.x - 20.0,
        };
        Vec2::new(x, self.body.pos.y + 100.0)
    }

    /// Count down hurt/stun/throw windows (every tick)
    pub fn tick_timers(&mut self) {
        self.hurt_ticks = self.hurt_ticks.saturating_sub(1);
        self.stun_ticks = self.stun_ticks.saturating_sub(1);
        self.throw_ticks = self.throw_ticks.saturating_sub(1);
    }

    /// Re-select the behaviour state by priority. Returns the new state if
    /// it changed.
    pub fn update_state(&mut self) -> Option<CharacterState> {
        let next = if self.is_dead() {
            CharacterState::Dead
        } else if self.hurt_ticks > 0 {
            CharacterState::Hurt
        } else if self.throw_ticks > 0 {
            CharacterState::Throwing
        } else if self.body.is_airborne() {
            CharacterState::Jumping
        } else if self.moved {
            CharacterState::Walking
        } else if self.idle_ticks >= ms_to_ticks(LONG_IDLE_MS) {
            CharacterState::LongIdle
        } else {
            CharacterState::Idle
        };
        self.anim.play(next.clip());
        if next != self.state {
            self.state = next;
            Some(next)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Right edge far enough away to never matter
    const EDGE: f32 = 10_000.0;

    fn right() -> TickInput {
        TickInput {
            right: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_hit_twice_inside_immunity_counts_once() {
        let mut c = Character::new(100.0);
        assert!(c.hit(100, EDGE));
        assert!(!c.hit(100 + ms_to_ticks(IMMUNITY_MS) as u64 - 1, EDGE));
        assert_eq!(c.energy(), MAX_ENERGY - HIT_DAMAGE);

        assert!(c.hit(100 + ms_to_ticks(IMMUNITY_MS) as u64, EDGE));
        assert_eq!(c.energy(), MAX_ENERGY - 2 * HIT_DAMAGE);
    }

    #[test]
    fn test_hit_knocks_back_and_stuns() {
        let mut c = Character::new(300.0);
        c.hit(1, EDGE);
        assert_eq!(c.body.pos.x, 300.0 - KNOCKBACK_DISTANCE);
        assert_eq!(c.state(), CharacterState::Hurt);
        assert!(c.is_stunned());
        assert!(!c.can_move());

        let before = c.body.pos.x;
        c.apply_input(&right(), 10_000.0);
        assert_eq!(c.body.pos.x, before, "stunned character must not move");

        for _ in 0..ms_to_ticks(STUN_MS) {
            c.tick_timers();
        }
        assert!(c.can_move());
        c.apply_input(&right(), 10_000.0);
        assert_eq!(c.body.pos.x, before + CHARACTER_SPEED);
    }

    #[test]
    fn test_knockback_stays_inside_level() {
        let mut c = Character::new(990.0);
        c.body.facing = Facing::Left;
        assert!(c.hit(1, 1000.0));
        assert_eq!(c.body.pos.x, 1000.0);

        let mut c = Character::new(10.0);
        assert!(c.hit(1, 1000.0));
        assert_eq!(c.body.pos.x, 0.0);
    }

    #[test]
    fn test_fatal_hit_is_terminal() {
        let mut c = Character::new(100.0);
        c.set_energy(HIT_DAMAGE);
        assert!(c.hit(5, EDGE));
        assert_eq!(c.energy(), 0);
        assert_eq!(c.state(), CharacterState::Dead);
        assert!(!c.hit(500, EDGE), "dead characters ignore hits");
        c.heal(HEART_ENERGY);
        assert_eq!(c.energy(), 0);
        assert!(!c.try_throw());
    }

    #[test]
    fn test_long_idle_after_five_seconds() {
        let mut c = Character::new(100.0);
        let idle = TickInput::default();
        for _ in 0..ms_to_ticks(LONG_IDLE_MS) - 1 {
            c.apply_input(&idle, 1000.0);
            c.update_state();
        }
        assert_eq!(c.state(), CharacterState::Idle);
        c.apply_input(&idle, 1000.0);
        assert_eq!(c.update_state(), Some(CharacterState::LongIdle));

        // Any intent resets the idle timer
        c.apply_input(&right(), 1000.0);
        c.update_state();
        assert_eq!(c.state(), CharacterState::Walking);
        c.apply_input(&idle, 1000.0);
        c.update_state();
        assert_eq!(c.state(), CharacterState::Idle);
    }

    #[test]
    fn test_state_priority() {
        let mut c = Character::new(100.0);
        c.apply_input(
            &TickInput {
                jump: true,
                right: true,
                ..Default::default()
            },
            1000.0,
        );
        c.update_state();
        assert_eq!(c.state(), CharacterState::Jumping, "jumping beats walking");

        assert!(c.try_throw());
        c.update_state();
        assert_eq!(c.state(), CharacterState::Throwing, "throwing beats jumping");

        c.hit(1, EDGE);
        assert_eq!(c.state(), CharacterState::Hurt, "hurt beats throwing");
    }

    #[test]
    fn test_movement_clamped_to_level() {
        let mut c = Character::new(0.0);
        c.apply_input(
            &TickInput {
                left: true,
                ..Default::default()
            },
            500.0,
        );
        assert_eq!(c.body.pos.x, 0.0);
        assert_eq!(c.body.facing, Facing::Right);

        let mut c = Character::new(495.0);
        c.apply_input(&right(), 500.0);
        assert_eq!(c.body.pos.x, 500.0);
    }

    proptest! {
        #[test]
        fn prop_energy_stays_in_range(ops in proptest::collection::vec(0u8..3, 0..60)) {
            let mut c = Character::new(100.0);
            let mut now = 0u64;
            for op in ops {
                match op {
                    0 => { c.hit(now, EDGE); }
                    1 => c.heal(HEART_ENERGY),
                    _ => {}
                }
                now += ms_to_ticks(IMMUNITY_MS) as u64 / 2;
                prop_assert!(c.energy() <= MAX_ENERGY);
                prop_assert_eq!(c.energy() == 0, c.state() == CharacterState::Dead);
            }
        }
    }
}
