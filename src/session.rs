//! Game session
//!
//! The surface the UI shell drives: start a level, pause/resume, feed frame
//! time, draw. Owns the world for the current attempt and everything that
//! outlives it (settings, records, audio).

use crate::audio::{AudioSink, SoundManager};
use crate::consts::*;
use crate::persistence::KeyValueStore;
use crate::platform::InputAdapter;
use crate::records::LevelRecords;
use crate::renderer::{Canvas2d, SpriteAtlas, draw_world, vertex::colors};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, LevelError, World, tick};

/// Callbacks fired at most once per level attempt
pub trait LifecycleHooks {
    fn on_game_over(&mut self, _level: u32) {}
    fn on_level_won(&mut self, _level: u32, _coins: u32, _new_best: bool) {}
}

pub struct Session<S: AudioSink, H: LifecycleHooks> {
    world: Option<World>,
    input: InputAdapter,
    audio: SoundManager<S>,
    hooks: H,
    store: Box<dyn KeyValueStore>,
    settings: Settings,
    records: LevelRecords,
    atlas: SpriteAtlas,
    accumulator: f32,
    seed: u64,
    attempts: u64,
}

impl<S: AudioSink, H: LifecycleHooks> Session<S, H> {
    pub fn new(store: Box<dyn KeyValueStore>, sink: S, hooks: H, seed: u64) -> Self {
        let settings = Settings::load(store.as_ref());
        let records = LevelRecords::load(store.as_ref());
        Self {
            world: None,
            input: InputAdapter::new(),
            audio: SoundManager::new(sink, &settings),
            hooks,
            store,
            settings,
            records,
            atlas: SpriteAtlas::builtin(),
            accumulator: 0.0,
            seed,
            attempts: 0,
        }
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn phase(&self) -> Option<GamePhase> {
        self.world.as_ref().map(|w| w.phase)
    }

    pub fn input_mut(&mut self) -> &mut InputAdapter {
        &mut self.input
    }

    pub fn audio(&self) -> &SoundManager<S> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut SoundManager<S> {
        &mut self.audio
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn records(&self) -> &LevelRecords {
        &self.records
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Begin (or restart) level `n`, discarding any previous attempt
    pub fn start_level(&mut self, n: u32) -> Result<(), LevelError> {
        let seed = self.seed.wrapping_add(self.attempts);
        let world = World::new(n, seed)?;
        self.attempts += 1;
        self.world = Some(world);
        self.input.release_all();
        self.accumulator = 0.0;
        log::info!("Level {n} started (seed {seed})");
        Ok(())
    }

    pub fn pause(&mut self) {
        if let Some(world) = self.world.as_mut().filter(|w| w.phase == GamePhase::Running) {
            world.phase = GamePhase::Paused;
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if let Some(world) = self.world.as_mut().filter(|w| w.phase == GamePhase::Paused) {
            world.phase = GamePhase::Running;
            // Don't replay the time spent paused
            self.accumulator = 0.0;
            log::info!("Resumed");
        }
    }

    /// Tear down the current attempt. Pending end screens die with it.
    pub fn quit_to_menu(&mut self) {
        if self.world.take().is_some() {
            log::info!("Returned to menu");
        }
        self.input.release_all();
        self.accumulator = 0.0;
    }

    /// Window lost focus: pause, drop held keys and, if the player asked
    /// for it, silence audio until focus returns
    pub fn focus_lost(&mut self) {
        self.pause();
        self.input.release_all();
        if self.settings.mute_on_blur {
            self.audio.set_muted(true);
        }
    }

    /// Window regained focus. Stays paused; restores the saved mute flag.
    pub fn focus_gained(&mut self) {
        self.audio.set_muted(self.settings.muted);
    }

    /// Flip and persist the global mute flag
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.settings.toggle_mute();
        self.audio.set_muted(muted);
        if let Err(e) = self.settings.save(self.store.as_mut()) {
            log::warn!("Failed to save settings: {e}");
        }
        muted
    }

    /// Feed real frame time; runs as many fixed steps as it covers.
    /// Returns the number of steps taken.
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        let Some(world) = self.world.as_mut() else {
            return 0;
        };
        // Clamp long frames (tab switches) so we don't fast-forward
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        let mut events = Vec::new();
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(world, &self.input.snapshot());
            self.input.clear_edges();
            events.append(&mut world.events);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in &events {
            self.dispatch(event);
        }
        substeps
    }

    fn dispatch(&mut self, event: &GameEvent) {
        self.audio.handle(event);
        match *event {
            GameEvent::Sound(_) => {}
            GameEvent::GameOver { level } => self.hooks.on_game_over(level),
            GameEvent::LevelWon { level, coins } => {
                let new_best = self.records.submit(level, coins);
                if new_best {
                    log::info!("New best on level {level}: {coins} coins");
                    if let Err(e) = self.records.save(self.store.as_mut()) {
                        log::warn!("Failed to save records: {e}");
                    }
                }
                self.hooks.on_level_won(level, coins, new_best);
            }
        }
    }

    /// Paint the latest committed state
    pub fn draw(&self, canvas: &mut dyn Canvas2d) {
        match &self.world {
            Some(world) => draw_world(canvas, world, &self.atlas),
            None => canvas.clear(colors::BACKGROUND),
        }
    }
}
