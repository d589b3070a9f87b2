//! Render pass
//!
//! Paints one frame of a `World` into any `Canvas2d`: the scene is drawn in
//! world space shifted by the camera, the HUD in screen space on top.
//! Read-only over the world; it may be sampled at any time.

use glam::Vec2;

use super::canvas::Canvas2d;
use super::sprites::{Sprite, SpriteAtlas};
use super::vertex::colors;
use crate::consts::CANVAS_HEIGHT;
use crate::sim::{AnimationState, Body, Clip, Enemy, Facing, GamePhase, LayerKind, SEGMENT_WIDTH, World};

const BAR_WIDTH: f32 = 200.0;
const BAR_HEIGHT: f32 = 22.0;
const BAR_MARGIN: f32 = 12.0;

/// Top edge of each background band
fn layer_top(kind: LayerKind) -> f32 {
    match kind {
        LayerKind::Air => 0.0,
        LayerKind::Third => 220.0,
        LayerKind::Second => 290.0,
        LayerKind::First => 370.0,
    }
}

/// Horizontal span currently on screen, in world coordinates
struct View {
    left: f32,
    right: f32,
}

impl View {
    fn shows(&self, pos: Vec2, size: Vec2) -> bool {
        pos.x + size.x >= self.left && pos.x <= self.right
    }
}

/// Draw a sprite facing right, or mirrored around its own width
fn draw_facing(canvas: &mut dyn Canvas2d, sprite: &Sprite, pos: Vec2, size: Vec2, facing: Facing) {
    match facing {
        Facing::Right => canvas.draw_sprite(sprite, pos.x, pos.y, size.x, size.y),
        Facing::Left => {
            canvas.save();
            canvas.translate(pos.x + size.x, pos.y);
            canvas.scale(-1.0, 1.0);
            canvas.draw_sprite(sprite, 0.0, 0.0, size.x, size.y);
            canvas.restore();
        }
    }
}

fn draw_animated<C: Clip>(
    canvas: &mut dyn Canvas2d,
    atlas: &SpriteAtlas,
    view: &View,
    anim: &AnimationState<C>,
    body: &Body,
) {
    if !view.shows(body.pos, body.size) {
        return;
    }
    // Missing art degrades to not drawing
    let Some(sprite) = atlas.frame(anim.clip().sheet(), anim.frame()) else {
        return;
    };
    draw_facing(canvas, sprite, body.pos, body.size, body.facing);
}

fn draw_bar(canvas: &mut dyn Canvas2d, x: f32, y: f32, percent: u8, color: [f32; 4]) {
    canvas.fill_rect(x, y, BAR_WIDTH, BAR_HEIGHT, colors::BAR_BACK);
    let fill = BAR_WIDTH * f32::from(percent.min(100)) / 100.0;
    canvas.fill_rect(x, y, fill, BAR_HEIGHT, color);
}

/// Paint one frame
pub fn draw_world(canvas: &mut dyn Canvas2d, world: &World, atlas: &SpriteAtlas) {
    let (width, _) = canvas.size();
    canvas.clear(colors::BACKGROUND);

    let view = View {
        left: -world.camera_x,
        right: -world.camera_x + width,
    };

    canvas.save();
    canvas.translate(world.camera_x, 0.0);

    for layer in &world.level.background {
        let top = layer_top(layer.kind);
        let pos = Vec2::new(layer.x, top);
        // One pixel of overlap hides seams between tiles
        let size = Vec2::new(SEGMENT_WIDTH + 1.0, CANVAS_HEIGHT - top);
        if !view.shows(pos, size) {
            continue;
        }
        if let Some(sprite) = atlas.frame(layer.kind.sheet(), layer.variant) {
            canvas.draw_sprite(sprite, pos.x, pos.y, size.x, size.y);
        }
    }

    if let Some(sprite) = atlas.frame("cloud", 0) {
        for cloud in &world.level.clouds {
            if view.shows(cloud.body.pos, cloud.body.size) {
                let (pos, size) = (cloud.body.pos, cloud.body.size);
                canvas.draw_sprite(sprite, pos.x, pos.y, size.x, size.y);
            }
        }
    }

    let level = &world.level;
    for item in level.coins.iter().chain(&level.hearts).chain(&level.bottles) {
        draw_animated(canvas, atlas, &view, &item.anim, &item.body);
    }

    for enemy in &level.enemies {
        match enemy {
            Enemy::Patrol(e) => draw_animated(canvas, atlas, &view, &e.anim, &e.body),
            Enemy::Boss(b) => draw_animated(canvas, atlas, &view, &b.anim, &b.body),
        }
    }

    for projectile in &world.projectiles {
        draw_animated(canvas, atlas, &view, &projectile.anim, &projectile.body);
    }

    draw_animated(canvas, atlas, &view, &world.character.anim, &world.character.body);

    canvas.restore();

    // HUD (screen space)
    let hud = &world.hud;
    draw_bar(canvas, BAR_MARGIN, BAR_MARGIN, hud.health, colors::HEALTH_BAR);
    draw_bar(
        canvas,
        BAR_MARGIN,
        BAR_MARGIN * 2.0 + BAR_HEIGHT,
        hud.bottles,
        colors::BOTTLE_BAR,
    );
    draw_bar(
        canvas,
        BAR_MARGIN,
        BAR_MARGIN * 3.0 + BAR_HEIGHT * 2.0,
        hud.coin_percent(),
        colors::COIN_BAR,
    );
    if let Some(boss) = world.boss_in_bar_range() {
        draw_bar(
            canvas,
            width - BAR_WIDTH - BAR_MARGIN,
            BAR_MARGIN,
            boss.health_percent(),
            colors::BOSS_BAR,
        );
    }

    if world.phase == GamePhase::Paused {
        let (w, h) = canvas.size();
        canvas.fill_rect(0.0, 0.0, w, h, colors::PAUSE_OVERLAY);
    }
}
