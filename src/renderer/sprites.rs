//! Sprite lookup
//!
//! Sprites are addressed by sheet name (the animation clip's `sheet()`)
//! and frame index. The built-in atlas paints every sheet with flat
//! colors; a missing sheet or frame simply isn't drawn.

use std::collections::HashMap;

use super::canvas::Color;
use super::vertex::colors;

/// One drawable frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub body: Color,
    /// Marks the sprite's front edge, so flips are visible
    pub accent: Color,
    /// Vertical position of the accent band (0 = top, 1 = bottom)
    pub accent_at: f32,
}

#[derive(Debug, Clone, Default)]
pub struct SpriteAtlas {
    sheets: HashMap<String, Vec<Sprite>>,
}

impl SpriteAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sheet: &str, frames: Vec<Sprite>) {
        self.sheets.insert(sheet.to_owned(), frames);
    }

    /// Frame `index` of `sheet`, wrapping around short sheets
    pub fn frame(&self, sheet: &str, index: u32) -> Option<&Sprite> {
        let frames = self.sheets.get(sheet)?;
        if frames.is_empty() {
            return None;
        }
        frames.get(index as usize % frames.len())
    }

    /// Flat-color sheet: the accent band walks down the sprite frame by frame
    fn animated(body: Color, accent: Color, frames: u32) -> Vec<Sprite> {
        (0..frames)
            .map(|i| Sprite {
                body,
                accent,
                accent_at: i as f32 / frames.max(1) as f32,
            })
            .collect()
    }

    /// Atlas covering every sheet the game names
    pub fn builtin() -> Self {
        use colors::*;
        let mut atlas = Self::new();
        let sheets: &[(&str, Color, Color, u32)] = &[
            ("pepe/idle", PEPE, PEPE_HAT, 10),
            ("pepe/long_idle", PEPE, PEPE_HAT, 10),
            ("pepe/walk", PEPE, PEPE_HAT, 6),
            ("pepe/jump", PEPE, PEPE_HAT, 9),
            ("pepe/throw", PEPE, SALSA, 4),
            ("pepe/hurt", PEPE_HURT, PEPE_HAT, 3),
            ("pepe/dead", PEPE_DEAD, PEPE_HAT, 7),
            ("chicken/walk", CHICKEN, BEAK, 3),
            ("chicken/dead", CHICKEN_DEAD, BEAK, 1),
            ("small_chicken/walk", SMALL_CHICKEN, BEAK, 3),
            ("small_chicken/dead", CHICKEN_DEAD, BEAK, 1),
            ("boss/walk", BOSS, BEAK, 4),
            ("boss/fly", BOSS, BEAK, 4),
            ("boss/attack", BOSS_ANGRY, BEAK, 8),
            ("boss/hurt", BOSS_HURT, BEAK, 3),
            ("boss/dead", CHICKEN_DEAD, BEAK, 3),
            ("pickup/coin", COIN, COIN_SHINE, 2),
            ("pickup/heart", HEART, HEART, 1),
            ("pickup/bottle", BOTTLE, SALSA, 2),
            ("bottle/spin", BOTTLE, SALSA, 4),
            ("bottle/splash", SALSA, SALSA, 6),
            ("background/air", SKY, SKY, 1),
            ("background/third", DUNES_FAR, DUNES_FAR, 1),
            ("background/second", DUNES_MID, DUNES_MID, 1),
            ("background/first", DUNES_NEAR, SAND, 1),
            ("cloud", CLOUD, CLOUD, 1),
        ];
        for &(name, body, accent, frames) in sheets {
            atlas.insert(name, Self::animated(body, accent, frames));
        }
        atlas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BossClip, CharacterClip, Clip, PatrolClip, PickupClip, ProjectileClip};

    #[test]
    fn test_builtin_covers_every_clip() {
        let atlas = SpriteAtlas::builtin();
        let sheets = [
            CharacterClip::Idle.sheet(),
            CharacterClip::LongIdle.sheet(),
            CharacterClip::Walk.sheet(),
            CharacterClip::Jump.sheet(),
            CharacterClip::Throw.sheet(),
            CharacterClip::Hurt.sheet(),
            CharacterClip::Dead.sheet(),
            PatrolClip::ChickenWalk.sheet(),
            PatrolClip::SmallDead.sheet(),
            BossClip::Attack.sheet(),
            BossClip::Dead.sheet(),
            PickupClip::Coin.sheet(),
            PickupClip::Heart.sheet(),
            ProjectileClip::Splash.sheet(),
        ];
        for sheet in sheets {
            assert!(atlas.frame(sheet, 0).is_some(), "{sheet}");
        }
    }

    #[test]
    fn test_missing_sheet_is_none() {
        let mut atlas = SpriteAtlas::new();
        assert!(atlas.frame("nope", 0).is_none());
        atlas.insert("empty", Vec::new());
        assert!(atlas.frame("empty", 3).is_none());
    }

    #[test]
    fn test_frame_index_wraps() {
        let atlas = SpriteAtlas::builtin();
        assert_eq!(atlas.frame("pickup/coin", 0), atlas.frame("pickup/coin", 2));
    }
}
