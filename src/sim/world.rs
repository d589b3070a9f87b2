//! World state and core simulation types
//!
//! The `World` is the single owner of everything a level attempt touches.
//! Subsystems receive it by reference; nothing here is global.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::Facing;
use super::character::Character;
use super::enemy::{Boss, Combatant};
use super::level::{EntityIds, Level, LevelError, LevelParams, generate_level};
use super::levels::level_params;
use super::projectile::Projectile;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::ms_to_ticks;

/// Current phase of a level attempt. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    Paused,
    /// Character died; final frame is frozen
    GameOver,
    /// Boss defeated
    Won,
}

/// Something the shell should react to (audio, overlays, records)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Sound(SoundEffect),
    GameOver { level: u32 },
    LevelWon { level: u32, coins: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    GameOver,
    Won,
}

/// Pending end screen: counts down before the phase flips and the
/// lifecycle event is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndSequence {
    pub outcome: Outcome,
    pub ticks_left: u32,
    pub fired: bool,
}

/// Status bars shown in screen space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    /// Character energy, 0..=100
    pub health: u8,
    /// Bottle bar, 0..=100 in steps of `BOTTLE_STEP`
    pub bottles: u8,
    pub coins: u32,
    pub total_coins: u32,
}

impl Hud {
    pub fn coin_percent(&self) -> u8 {
        if self.total_coins == 0 {
            return 0;
        }
        (self.coins.min(self.total_coins) * 100 / self.total_coins) as u8
    }
}

#[derive(Debug, Clone)]
pub struct World {
    pub level_number: u32,
    pub character: Character,
    pub level: Level,
    /// Thrown bottles in flight or splashing (sorted by id)
    pub projectiles: Vec<Projectile>,
    pub hud: Hud,
    pub phase: GamePhase,
    pub camera_x: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Number of enemy contacts that actually hurt the character
    pub hits_taken: u32,
    pub end: Option<EndSequence>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
    ids: EntityIds,
}

impl World {
    /// Start catalog level `level`
    pub fn new(level: u32, seed: u64) -> Result<Self, LevelError> {
        Self::with_params(&level_params(level)?, seed)
    }

    /// Start a level from explicit parameters
    pub fn with_params(params: &LevelParams, seed: u64) -> Result<Self, LevelError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = EntityIds::default();
        let level = generate_level(params, &mut rng, &mut ids)?;
        let character = Character::new(CAMERA_OFFSET);
        let hud = Hud {
            health: character.energy(),
            bottles: 0,
            coins: 0,
            total_coins: level.coins.len() as u32,
        };
        let mut world = Self {
            level_number: params.number,
            character,
            level,
            projectiles: Vec::new(),
            hud,
            phase: GamePhase::Running,
            camera_x: 0.0,
            time_ticks: 0,
            hits_taken: 0,
            end: None,
            events: Vec::new(),
            rng,
            ids,
        };
        world.update_camera();
        Ok(world)
    }

    pub fn next_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    pub fn sound(&mut self, effect: SoundEffect) {
        self.events.push(GameEvent::Sound(effect));
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn update_camera(&mut self) {
        self.camera_x = -self.character.body.pos.x + CAMERA_OFFSET;
    }

    /// Spawn a bottle from the character's hand
    pub fn spawn_projectile(&mut self) {
        let id = self.next_id();
        let origin = self.character.throw_origin();
        let facing: Facing = self.character.body.facing;
        self.projectiles.push(Projectile::throw(id, origin, facing));
    }

    /// The boss, if alive and close enough for its health bar to show
    pub fn boss_in_bar_range(&self) -> Option<&Boss> {
        let x = self.character.body.center_x();
        self.level
            .boss()
            .filter(|b| !b.is_dead() && (b.body.center_x() - x).abs() <= BOSS_BAR_RANGE)
    }

    /// Arm the end screen. Only the first call per attempt has any effect.
    pub fn schedule_end(&mut self, outcome: Outcome) {
        if self.end.is_some() {
            return;
        }
        log::info!("Level {} ending: {:?}", self.level_number, outcome);
        self.end = Some(EndSequence {
            outcome,
            ticks_left: ms_to_ticks(END_DELAY_MS),
            fired: false,
        });
    }

    /// Count the end screen down; flips the phase and emits the lifecycle
    /// event exactly once
    pub fn advance_end_sequence(&mut self) {
        let Some(end) = self.end.as_mut() else {
            return;
        };
        if end.fired {
            return;
        }
        end.ticks_left = end.ticks_left.saturating_sub(1);
        if end.ticks_left > 0 {
            return;
        }
        end.fired = true;
        let event = match end.outcome {
            Outcome::GameOver => {
                self.phase = GamePhase::GameOver;
                GameEvent::GameOver {
                    level: self.level_number,
                }
            }
            Outcome::Won => {
                self.phase = GamePhase::Won;
                GameEvent::LevelWon {
                    level: self.level_number,
                    coins: self.hud.coins,
                }
            }
        };
        log::info!("Level {} finished: {:?}", self.level_number, event);
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_starts_running_at_origin() {
        let world = World::new(1, 42).unwrap();
        assert_eq!(world.phase, GamePhase::Running);
        assert_eq!(world.camera_x, 0.0);
        assert_eq!(world.hud.health, MAX_ENERGY);
        assert_eq!(world.hud.bottles, 0);
        assert_eq!(world.hud.total_coins, world.level.coins.len() as u32);
    }

    #[test]
    fn test_unknown_level() {
        assert!(matches!(World::new(99, 0), Err(LevelError::UnknownLevel(99))));
    }

    #[test]
    fn test_camera_follows_character() {
        let mut world = World::new(1, 0).unwrap();
        world.character.body.pos.x = 900.0;
        world.update_camera();
        assert_eq!(world.camera_x, -800.0);
    }

    #[test]
    fn test_end_sequence_is_armed_once() {
        let mut world = World::new(1, 0).unwrap();
        world.schedule_end(Outcome::Won);
        world.schedule_end(Outcome::GameOver);
        assert_eq!(world.end.map(|e| e.outcome), Some(Outcome::Won));

        for _ in 0..ms_to_ticks(END_DELAY_MS) * 3 {
            world.advance_end_sequence();
        }
        let ends: Vec<_> = world
            .drain_events()
            .into_iter()
            .filter(|e| !matches!(e, GameEvent::Sound(_)))
            .collect();
        assert_eq!(ends, vec![GameEvent::LevelWon { level: 1, coins: 0 }]);
        assert_eq!(world.phase, GamePhase::Won);
    }

    #[test]
    fn test_coin_percent() {
        let hud = Hud {
            health: 100,
            bottles: 0,
            coins: 3,
            total_coins: 12,
        };
        assert_eq!(hud.coin_percent(), 25);
    }
}
