//! Thrown salsa bottles

use glam::Vec2;

use super::animation::{AnimationState, Clip};
use super::body::{Body, Facing, Ground, Rect};
use crate::consts::*;
use crate::ms_to_ticks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileClip {
    Spin,
    Splash,
}

impl Clip for ProjectileClip {
    fn frames(self) -> u32 {
        match self {
            ProjectileClip::Spin => 4,
            ProjectileClip::Splash => 6,
        }
    }

    fn looping(self) -> bool {
        self == ProjectileClip::Spin
    }

    fn sheet(self) -> &'static str {
        match self {
            ProjectileClip::Spin => "bottle/spin",
            ProjectileClip::Splash => "bottle/splash",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileState {
    Flying,
    /// Shattered; removed when the countdown ends
    Splash { ticks_left: u32 },
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub body: Body,
    pub anim: AnimationState<ProjectileClip>,
    pub state: ProjectileState,
    /// Horizontal travel per gravity tick (signed)
    velocity_x: f32,
    has_hit: bool,
}

impl Projectile {
    pub fn throw(id: u32, origin: Vec2, facing: Facing) -> Self {
        let mut body = Body::new(origin, Vec2::new(60.0, 60.0))
            .with_ground(Ground::Ballistic)
            .facing(facing);
        body.velocity_y = BOTTLE_THROW_VY;
        Self {
            id,
            body,
            anim: AnimationState::new(ProjectileClip::Spin),
            state: ProjectileState::Flying,
            velocity_x: BOTTLE_THROW_VX * facing.sign(),
            has_hit: false,
        }
    }

    pub fn has_hit(&self) -> bool {
        self.has_hit
    }

    pub fn is_flying(&self) -> bool {
        self.state == ProjectileState::Flying
    }

    /// Mark the bottle as having hit an enemy. Only the first call counts.
    pub fn mark_hit(&mut self) -> bool {
        if self.has_hit {
            return false;
        }
        self.has_hit = true;
        self.splash();
        true
    }

    fn splash(&mut self) {
        self.state = ProjectileState::Splash {
            ticks_left: ms_to_ticks(SPLASH_MS),
        };
        self.velocity_x = 0.0;
        self.body.velocity_y = 0.0;
        self.anim.play(ProjectileClip::Splash);
    }

    /// Gravity tick: ballistic arc, stopping on the splash floor. The bottle
    /// keeps flying until `shatter_on_floor`, so an enemy standing where it
    /// lands still gets hit first.
    pub fn step_ballistic(&mut self) {
        if !self.is_flying() {
            return;
        }
        self.body.pos.x += self.velocity_x;
        self.body.apply_gravity();
        self.body.pos.y = self.body.pos.y.min(SPLASH_FLOOR_Y);
    }

    /// Still flying but resting on the splash floor
    pub fn on_floor(&self) -> bool {
        self.is_flying() && self.body.pos.y >= SPLASH_FLOOR_Y
    }

    /// Shatter a bottle that reached the floor without hitting anything.
    /// Returns true if it splashed.
    pub fn shatter_on_floor(&mut self) -> bool {
        if !self.on_floor() {
            return false;
        }
        self.splash();
        true
    }

    /// Countdown of the splash sub-state. Returns true once it should be removed.
    pub fn tick_timers(&mut self) -> bool {
        match &mut self.state {
            ProjectileState::Splash { ticks_left } => {
                *ticks_left = ticks_left.saturating_sub(1);
                *ticks_left == 0
            }
            ProjectileState::Flying => false,
        }
    }

    /// Outside the playable area
    pub fn out_of_bounds(&self, area: &Rect) -> bool {
        let b = self.body.bounds();
        b.max.x < area.min.x || b.min.x > area.max.x || b.min.y > area.max.y
    }
}
