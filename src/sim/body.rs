//! Physics body component and overlap predicates
//!
//! Coordinates are canvas-style: x grows to the right, y grows downward,
//! and `pos` is the top-left corner of the drawn sprite.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{GRAVITY_ACCEL, GROUND_Y, JUMP_IMPULSE};

/// Horizontal facing; sprites facing left are drawn mirrored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// +1 for right, -1 for left
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Full AABB overlap. Used for combat (character/enemy, projectile/enemy).
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

/// Looser pickup test: the item's center lies inside the holder's rect.
#[inline]
pub fn center_inside(holder: &Rect, item: &Rect) -> bool {
    holder.contains(item.center())
}

/// Hitbox shrink from each edge of the drawn sprite
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Insets {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Insets {
    pub const NONE: Insets = Insets {
        top: 0.0,
        left: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub const fn new(top: f32, left: f32, right: f32, bottom: f32) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
        }
    }
}

/// Whether gravity treats the body as grounded below a threshold or as a
/// free ballistic object that is always airborne
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Ground {
    /// Rests when `pos.y` reaches this line
    At(f32),
    /// Never rests (thrown bottles)
    Ballistic,
}

/// Position, extent and vertical motion of anything in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub hitbox: Insets,
    /// Upward speed; positive while rising
    pub velocity_y: f32,
    pub facing: Facing,
    pub ground: Ground,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        debug_assert!(size.x > 0.0 && size.y > 0.0, "body size must be positive");
        Self {
            pos,
            size,
            hitbox: Insets::NONE,
            velocity_y: 0.0,
            facing: Facing::Right,
            ground: Ground::At(GROUND_Y),
        }
    }

    pub fn with_hitbox(mut self, hitbox: Insets) -> Self {
        self.hitbox = hitbox;
        self
    }

    pub fn with_ground(mut self, ground: Ground) -> Self {
        self.ground = ground;
        self
    }

    pub fn facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    /// Y coordinate this body rests at, if it can rest at all
    pub fn ground_y(&self) -> Option<f32> {
        match self.ground {
            Ground::At(y) => Some(y),
            Ground::Ballistic => None,
        }
    }

    /// Collidable rectangle (sprite rect shrunk by the hitbox insets)
    pub fn bounds(&self) -> Rect {
        let min = self.pos + Vec2::new(self.hitbox.left, self.hitbox.top);
        let max = self.pos + self.size - Vec2::new(self.hitbox.right, self.hitbox.bottom);
        Rect { min, max }
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x * 0.5
    }

    pub fn is_above_ground(&self) -> bool {
        match self.ground_y() {
            Some(ground) => self.pos.y < ground,
            None => true,
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.is_above_ground() || self.velocity_y > 0.0
    }

    /// One gravity tick: move by the current velocity, then decelerate.
    /// Grounded bodies snap to their ground line on landing.
    pub fn apply_gravity(&mut self) {
        if !self.is_airborne() {
            return;
        }
        self.pos.y -= self.velocity_y;
        self.velocity_y -= GRAVITY_ACCEL;
        if let Some(ground) = self.ground_y() {
            if self.pos.y >= ground {
                self.pos.y = ground;
                self.velocity_y = 0.0;
            }
        }
    }

    /// Start a jump; ignored while already airborne
    pub fn jump(&mut self) -> bool {
        if self.is_airborne() {
            return false;
        }
        self.velocity_y = JUMP_IMPULSE;
        true
    }
}
