//! Fixed timestep simulation tick
//!
//! One call advances the world by `SIM_DT`. The slower streams (gravity,
//! animation, AI/collision) fire on their own sub-rates inside the same
//! step, always in the same order.

use super::character::CharacterState;
use super::collision::{check_end_conditions, projectiles_vs_enemies, resolve_collisions};
use super::world::{GamePhase, World};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::fires_on_tick;

/// Input intents for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub throw: bool,
    /// Pause toggle
    pub pause: bool,
    pub resume: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput) {
    // Handle pause toggle
    match world.phase {
        GamePhase::Running if input.pause => {
            world.phase = GamePhase::Paused;
            log::info!("Paused at tick {}", world.time_ticks);
            return;
        }
        GamePhase::Paused if input.pause || input.resume => {
            world.phase = GamePhase::Running;
            log::info!("Resumed at tick {}", world.time_ticks);
        }
        _ => {}
    }

    // Paused and finished worlds are frozen
    if !world.is_running() {
        return;
    }

    world.time_ticks += 1;
    let t = world.time_ticks;
    // Nothing moves once the character is dead
    let alive = !world.character.is_dead();

    if alive {
        step_movement(world, input);
    }
    if alive && fires_on_tick(t, GRAVITY_HZ) {
        step_gravity(world);
    }
    if fires_on_tick(t, ANIMATION_HZ) {
        step_animation(world);
    }
    if alive && fires_on_tick(t, AI_HZ) {
        step_ai(world);
        resolve_collisions(world);
    }
    step_timers(world);
}

fn step_movement(world: &mut World, input: &TickInput) {
    let end_x = world.level.end_x;
    let movement = world.character.apply_input(input, end_x);
    if movement.jumped {
        world.sound(SoundEffect::Jump);
    }

    if input.throw && world.hud.bottles >= BOTTLE_STEP && world.character.try_throw() {
        world.hud.bottles -= BOTTLE_STEP;
        world.spawn_projectile();
        world.sound(SoundEffect::Throw);
    }

    let level = &mut world.level;
    for enemy in &mut level.enemies {
        enemy.step_motion();
    }
    for item in level
        .coins
        .iter_mut()
        .chain(level.hearts.iter_mut())
        .chain(level.bottles.iter_mut())
    {
        item.step_motion();
    }
    let (start, end) = (level.start_x, level.end_x);
    for cloud in &mut level.clouds {
        cloud.step_motion(start, end);
    }

    world.update_camera();
}

fn step_gravity(world: &mut World) {
    world.character.body.apply_gravity();

    for projectile in &mut world.projectiles {
        projectile.step_ballistic();
    }
    projectiles_vs_enemies(world);

    let splashes = world
        .projectiles
        .iter_mut()
        .map(|p| p.shatter_on_floor())
        .filter(|&splashed| splashed)
        .count();
    for _ in 0..splashes {
        world.sound(SoundEffect::Splash);
    }
}

fn step_animation(world: &mut World) {
    if world.character.update_state() == Some(CharacterState::LongIdle) {
        world.sound(SoundEffect::Snore);
    }
    world.character.anim.advance();

    let level = &mut world.level;
    for enemy in &mut level.enemies {
        enemy.advance_animation();
    }
    for item in level
        .coins
        .iter_mut()
        .chain(level.hearts.iter_mut())
        .chain(level.bottles.iter_mut())
    {
        item.anim.advance();
    }
    for projectile in &mut world.projectiles {
        projectile.anim.advance();
    }
}

fn step_ai(world: &mut World) {
    let World {
        character,
        level,
        rng,
        ..
    } = world;
    if let Some(boss) = level.boss_mut() {
        boss.think(character.body.center_x(), rng);
    }
}

fn step_timers(world: &mut World) {
    world.character.tick_timers();

    let expired: Vec<u32> = world
        .level
        .enemies
        .iter_mut()
        .filter_map(|e| e.tick_timers().then(|| e.id()))
        .collect();
    for id in &expired {
        log::debug!("Enemy {} removed", id);
    }
    world.level.remove_expired_enemies(&expired);

    let area = world.level.play_area();
    world
        .projectiles
        .retain_mut(|p| !p.tick_timers() && !p.out_of_bounds(&area));

    world.advance_end_sequence();
    check_end_conditions(world);
}
