//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entity collections keep spawn order)
//! - No rendering or platform dependencies

pub mod animation;
pub mod body;
pub mod character;
pub mod collectible;
pub mod collision;
pub mod enemy;
pub mod level;
pub mod levels;
pub mod projectile;
pub mod tick;
pub mod world;

pub use animation::{AnimationState, Clip};
pub use body::{Body, Facing, Ground, Insets, Rect, aabb_overlap, center_inside};
pub use character::{Character, CharacterClip, CharacterState};
pub use collectible::{Collectible, CollectibleKind, PickupClip, Wobble};
pub use collision::{check_end_conditions, resolve_collisions};
pub use enemy::{Boss, BossClip, BossState, Combatant, Enemy, HitEffect, PatrolClip, PatrolEnemy, PatrolKind};
pub use level::{
    BackgroundLayer, Cloud, CoinPattern, EntityIds, LayerKind, Level, LevelError, LevelParams, SEGMENT_WIDTH,
    generate_level,
};
pub use levels::{LEVEL_COUNT, level_params};
pub use projectile::{Projectile, ProjectileClip, ProjectileState};
pub use tick::{TickInput, tick};
pub use world::{EndSequence, GameEvent, GamePhase, Hud, Outcome, World};
