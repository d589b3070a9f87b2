//! 2D drawing context
//!
//! The render pass only talks to this trait, so it can paint into a GPU
//! vertex batch in the browser or a recording canvas in tests.

use super::sprites::Sprite;

pub type Color = [f32; 4];

pub trait Canvas2d {
    /// Canvas size in pixels
    fn size(&self) -> (f32, f32);

    fn clear(&mut self, color: Color);

    /// Push the current transform
    fn save(&mut self);
    /// Pop back to the last saved transform
    fn restore(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);
    fn scale(&mut self, sx: f32, sy: f32);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);

    /// Draw a sprite stretched over the given rectangle
    fn draw_sprite(&mut self, sprite: &Sprite, x: f32, y: f32, w: f32, h: f32);
}
