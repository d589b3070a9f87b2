//! Coins, hearts and bottle pickups

use std::f32::consts::TAU;

use glam::Vec2;

use super::animation::{AnimationState, Clip};
use super::body::{Body, Ground};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectibleKind {
    Coin,
    Heart,
    Bottle,
}

impl CollectibleKind {
    pub fn size(self) -> Vec2 {
        match self {
            CollectibleKind::Coin => Vec2::new(80.0, 80.0),
            CollectibleKind::Heart => Vec2::new(50.0, 50.0),
            CollectibleKind::Bottle => Vec2::new(70.0, 70.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupClip {
    Coin,
    Heart,
    Bottle,
}

impl Clip for PickupClip {
    fn frames(self) -> u32 {
        match self {
            PickupClip::Coin => 2,
            PickupClip::Heart => 1,
            PickupClip::Bottle => 2,
        }
    }

    fn sheet(self) -> &'static str {
        match self {
            PickupClip::Coin => "pickup/coin",
            PickupClip::Heart => "pickup/heart",
            PickupClip::Bottle => "pickup/bottle",
        }
    }
}

/// Vertical oscillation around a resting line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wobble {
    pub base_y: f32,
    pub amplitude: f32,
    /// Current phase (radians)
    pub phase: f32,
    /// Phase advance per movement tick (radians)
    pub speed: f32,
}

impl Wobble {
    pub fn new(base_y: f32, phase: f32) -> Self {
        Self {
            base_y,
            amplitude: 6.0,
            phase,
            speed: 0.08,
        }
    }

    pub fn offset(&self) -> f32 {
        self.amplitude * self.phase.sin()
    }
}

#[derive(Debug, Clone)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub body: Body,
    pub anim: AnimationState<PickupClip>,
    pub wobble: Option<Wobble>,
}

impl Collectible {
    pub fn new(id: u32, kind: CollectibleKind, pos: Vec2) -> Self {
        let clip = match kind {
            CollectibleKind::Coin => PickupClip::Coin,
            CollectibleKind::Heart => PickupClip::Heart,
            CollectibleKind::Bottle => PickupClip::Bottle,
        };
        Self {
            id,
            kind,
            body: Body::new(pos, kind.size()).with_ground(Ground::At(pos.y)),
            anim: AnimationState::new(clip),
            wobble: None,
        }
    }

    /// Make the item bob around its current y, starting at `phase`
    pub fn with_wobble(mut self, phase: f32) -> Self {
        self.wobble = Some(Wobble::new(self.body.pos.y, phase));
        self.body.pos.y += self.wobble.map_or(0.0, |w| w.offset());
        self
    }

    /// Movement tick: advance the wobble, if any
    pub fn step_motion(&mut self) {
        if let Some(w) = self.wobble.as_mut() {
            w.phase = (w.phase + w.speed) % TAU;
            self.body.pos.y = w.base_y + w.offset();
        }
    }
}
