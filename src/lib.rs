//! Pollo Loco - a side-scrolling desert platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, entity state machines, collisions, levels)
//! - `renderer`: Canvas-style render pass and the WebGPU pipeline behind it
//! - `session`: Lifecycle surface the UI shell drives (start, pause, resume, frame update)
//! - `audio`: World events to sound effects, with a persisted mute flag
//! - `persistence`: Key-value storage behind `settings` and `records`
//! - `platform`: Input adapter (keys/touch to intents)

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod records;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use records::LevelRecords;
pub use session::{LifecycleHooks, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate; every other stream is derived from it
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Update stream rates (Hz). Movement runs on every tick.
    pub const GRAVITY_HZ: u32 = 25;
    pub const ANIMATION_HZ: u32 = 10;
    pub const AI_HZ: u32 = 10;

    /// Viewport
    pub const CANVAS_WIDTH: f32 = 720.0;
    pub const CANVAS_HEIGHT: f32 = 480.0;
    /// Camera keeps the character this far from the left edge
    pub const CAMERA_OFFSET: f32 = 100.0;

    /// Physics
    pub const GROUND_Y: f32 = 180.0;
    pub const GRAVITY_ACCEL: f32 = 2.5;
    pub const JUMP_IMPULSE: f32 = 30.0;

    /// Character
    pub const CHARACTER_SPEED: f32 = 10.0;
    pub const MAX_ENERGY: u8 = 100;
    pub const HIT_DAMAGE: u8 = 20;
    pub const HEART_ENERGY: u8 = 20;
    pub const KNOCKBACK_DISTANCE: f32 = 40.0;
    pub const IMMUNITY_MS: u32 = 1000;
    pub const STUN_MS: u32 = 300;
    pub const HURT_MS: u32 = 1500;
    pub const LONG_IDLE_MS: u32 = 5000;
    pub const THROW_MS: u32 = 400;

    /// Bottle bar (percent) gained per pickup and spent per throw
    pub const BOTTLE_STEP: u8 = 20;
    pub const BAR_MAX: u8 = 100;

    /// Removal and sequencing delays
    pub const PATROL_REMOVAL_MS: u32 = 1000;
    pub const BOSS_REMOVAL_MS: u32 = 2000;
    pub const SPLASH_MS: u32 = 500;
    pub const END_DELAY_MS: u32 = 1500;

    /// Boss behaviour
    pub const BOSS_ATTACK_DISTANCE: f32 = 300.0;
    pub const BOSS_WAKE_DISTANCE: f32 = 700.0;
    pub const BOSS_SPEED: f32 = 3.0;
    pub const BOSS_FLY_CHANCE: f32 = 0.005;
    pub const BOSS_FLY_MS: u32 = 2000;
    pub const BOSS_FLY_HEIGHT: f32 = 120.0;
    pub const BOSS_HURT_MS: u32 = 600;
    /// Boss health bar is only drawn while the boss is this close
    pub const BOSS_BAR_RANGE: f32 = 500.0;

    /// Thrown bottle
    pub const BOTTLE_THROW_VY: f32 = 30.0;
    pub const BOTTLE_THROW_VX: f32 = 10.0;
    pub const SPLASH_FLOOR_Y: f32 = 380.0;
}

/// Convert a millisecond duration to whole simulation ticks (rounded)
#[inline]
pub const fn ms_to_ticks(ms: u32) -> u32 {
    (ms * consts::SIM_HZ + 500) / 1000
}

/// Whether a stream running at `hz` fires on simulation tick `tick`.
///
/// Ticks are 1-based: the first call to `sim::tick` advances to tick 1.
/// A stream fires when `tick * hz / SIM_HZ` crosses an integer, which
/// spreads non-divisor rates (25 Hz on a 60 Hz clock) evenly.
#[inline]
pub fn fires_on_tick(tick: u64, hz: u32) -> bool {
    if tick == 0 {
        return false;
    }
    let hz = hz as u64;
    let base = consts::SIM_HZ as u64;
    (tick * hz) / base != ((tick - 1) * hz) / base
}
