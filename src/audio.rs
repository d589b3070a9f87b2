//! Audio system
//!
//! The simulation only names sounds; a `SoundManager` maps world events to
//! them and forwards to an `AudioSink`. In the browser the sink synthesizes
//! every effect with Web Audio oscillators, so no sound files are needed.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Jump,
    Throw,
    /// Bottle shatters (enemy or floor)
    Splash,
    /// Character takes damage
    Hurt,
    ChickenDeath,
    BossHurt,
    BossDeath,
    CoinPickup,
    BottlePickup,
    HeartPickup,
    /// Character fell into long idle
    Snore,
    GameOver,
    LevelWon,
}

/// Something that can actually make noise
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);

    /// Called after a user gesture (browsers start audio suspended)
    fn resume(&mut self) {}
}

/// Sink for headless runs and tests
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Records what was played (tests, replays)
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub played: Vec<SoundEffect>,
}

impl AudioSink for RecordingSink {
    fn play(&mut self, effect: SoundEffect, _volume: f32) {
        self.played.push(effect);
    }
}

/// Routes game events to a sink, honouring mute and volumes
pub struct SoundManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> SoundManager<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        Self {
            sink,
            master_volume: settings.master_volume,
            sfx_volume: settings.sfx_volume,
            muted: settings.muted,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Pick up volume and mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
    }

    pub fn resume(&mut self) {
        self.sink.resume();
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// React to one world event
    pub fn handle(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Sound(effect) => self.play(effect),
            GameEvent::GameOver { .. } => self.play(SoundEffect::GameOver),
            GameEvent::LevelWon { .. } => self.play(SoundEffect::LevelWon),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};

    /// Oscillator synth on top of a browser `AudioContext`
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudioSink {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioSink {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Single oscillator sweeping `from` → `to` Hz over `len` seconds
        fn sweep(ctx: &AudioContext, kind: OscillatorType, from: f32, to: f32, len: f64, vol: f32, delay: f64) {
            let Some((osc, gain)) = Self::create_osc(ctx, from, kind) else {
                return;
            };
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(0.0, ctx.current_time()).ok();
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + len).ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(to, t + len).ok();
            osc.start().ok();
            osc.stop_with_when(t + len + 0.02).ok();
        }

        /// Short rising arpeggio
        fn arpeggio(ctx: &AudioContext, notes: &[f32], step: f64, vol: f32) {
            for (i, &freq) in notes.iter().enumerate() {
                Self::sweep(ctx, OscillatorType::Square, freq, freq, step * 1.5, vol, step * i as f64);
            }
        }
    }

    impl AudioSink for WebAudioSink {
        fn resume(&mut self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn play(&mut self, effect: SoundEffect, vol: f32) {
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            use OscillatorType::{Sawtooth, Sine, Square, Triangle};
            match effect {
                SoundEffect::Jump => Self::sweep(ctx, Square, 220.0, 660.0, 0.15, vol * 0.25, 0.0),
                SoundEffect::Throw => Self::sweep(ctx, Triangle, 500.0, 180.0, 0.12, vol * 0.3, 0.0),
                SoundEffect::Splash => {
                    // Glassy crack plus a wet thud
                    Self::sweep(ctx, Sawtooth, 3000.0, 200.0, 0.15, vol * 0.25, 0.0);
                    Self::sweep(ctx, Sine, 120.0, 50.0, 0.2, vol * 0.35, 0.0);
                }
                SoundEffect::Hurt => Self::sweep(ctx, Sawtooth, 300.0, 90.0, 0.25, vol * 0.4, 0.0),
                SoundEffect::ChickenDeath => {
                    Self::sweep(ctx, Square, 900.0, 1400.0, 0.06, vol * 0.2, 0.0);
                    Self::sweep(ctx, Square, 1200.0, 300.0, 0.2, vol * 0.2, 0.06);
                }
                SoundEffect::BossHurt => Self::sweep(ctx, Sawtooth, 160.0, 60.0, 0.35, vol * 0.5, 0.0),
                SoundEffect::BossDeath => {
                    Self::sweep(ctx, Sawtooth, 200.0, 30.0, 0.9, vol * 0.5, 0.0);
                    Self::sweep(ctx, Square, 1500.0, 100.0, 0.4, vol * 0.15, 0.05);
                }
                SoundEffect::CoinPickup => Self::arpeggio(ctx, &[988.0, 1319.0], 0.06, vol * 0.2),
                SoundEffect::BottlePickup => Self::sweep(ctx, Triangle, 400.0, 800.0, 0.1, vol * 0.3, 0.0),
                SoundEffect::HeartPickup => Self::arpeggio(ctx, &[523.0, 659.0, 784.0], 0.07, vol * 0.2),
                SoundEffect::Snore => Self::sweep(ctx, Sine, 90.0, 60.0, 1.0, vol * 0.2, 0.0),
                SoundEffect::GameOver => Self::arpeggio(ctx, &[392.0, 330.0, 262.0, 196.0], 0.2, vol * 0.25),
                SoundEffect::LevelWon => {
                    Self::arpeggio(ctx, &[523.0, 659.0, 784.0, 1047.0], 0.12, vol * 0.25)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(muted: bool) -> SoundManager<RecordingSink> {
        let settings = Settings {
            muted,
            ..Settings::default()
        };
        SoundManager::new(RecordingSink::default(), &settings)
    }

    #[test]
    fn test_events_map_to_sounds() {
        let mut audio = manager(false);
        audio.handle(&GameEvent::Sound(SoundEffect::Jump));
        audio.handle(&GameEvent::GameOver { level: 2 });
        audio.handle(&GameEvent::LevelWon { level: 2, coins: 4 });
        assert_eq!(
            audio.sink().played,
            vec![SoundEffect::Jump, SoundEffect::GameOver, SoundEffect::LevelWon]
        );
    }

    #[test]
    fn test_mute_silences_everything() {
        let mut audio = manager(true);
        audio.handle(&GameEvent::Sound(SoundEffect::CoinPickup));
        assert!(audio.sink().played.is_empty());

        audio.set_muted(false);
        audio.play(SoundEffect::CoinPickup);
        assert_eq!(audio.sink().played.len(), 1);
    }

    #[test]
    fn test_zero_volume_is_silent() {
        let mut audio = manager(false);
        audio.apply_settings(&Settings {
            master_volume: 0.0,
            ..Settings::default()
        });
        audio.play(SoundEffect::Throw);
        assert!(audio.sink().played.is_empty());
    }
}
