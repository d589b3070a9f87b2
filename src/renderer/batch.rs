//! Canvas backend that tessellates into GPU vertices
//!
//! Every rectangle becomes two triangles in canvas pixel space; the
//! pipeline maps pixels to clip space at upload time.

use glam::{Affine2, Vec2};

use super::canvas::{Canvas2d, Color};
use super::sprites::Sprite;
use super::vertex::Vertex;

/// Height of a sprite's accent band, relative to the sprite
const ACCENT_HEIGHT: f32 = 0.15;
/// Width of the accent band, measured from the sprite's front edge
const ACCENT_WIDTH: f32 = 0.3;

pub struct VertexCanvas {
    size: (f32, f32),
    transform: Affine2,
    stack: Vec<Affine2>,
    vertices: Vec<Vertex>,
    clear_color: Color,
}

impl VertexCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: (width, height),
            transform: Affine2::IDENTITY,
            stack: Vec::new(),
            vertices: Vec::with_capacity(4096),
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    fn quad(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        if w <= 0.0 || h <= 0.0 || color[3] <= 0.0 {
            return;
        }
        let [a, b, c, d] = [
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ]
        .map(|p| {
            let p = self.transform.transform_point2(p);
            Vertex::new(p.x, p.y, color)
        });
        self.vertices.extend_from_slice(&[a, b, c, a, c, d]);
    }
}

impl Canvas2d for VertexCanvas {
    fn size(&self) -> (f32, f32) {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.vertices.clear();
        self.stack.clear();
        self.transform = Affine2::IDENTITY;
        self.clear_color = color;
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        self.transform = self.stack.pop().unwrap_or(Affine2::IDENTITY);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform * Affine2::from_translation(Vec2::new(dx, dy));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.transform = self.transform * Affine2::from_scale(Vec2::new(sx, sy));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.quad(x, y, w, h, color);
    }

    fn draw_sprite(&mut self, sprite: &Sprite, x: f32, y: f32, w: f32, h: f32) {
        self.quad(x, y, w, h, sprite.body);
        let band_h = h * ACCENT_HEIGHT;
        let band_y = y + (h - band_h) * sprite.accent_at.clamp(0.0, 1.0);
        let band_w = w * ACCENT_WIDTH;
        self.quad(x + w - band_w, band_y, band_w, band_h, sprite.accent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = [1.0, 0.0, 0.0, 1.0];

    fn x_range(vertices: &[Vertex]) -> (f32, f32) {
        vertices.iter().fold((f32::MAX, f32::MIN), |(lo, hi), v| {
            (lo.min(v.position[0]), hi.max(v.position[0]))
        })
    }

    #[test]
    fn test_rect_is_two_triangles() {
        let mut canvas = VertexCanvas::new(720.0, 480.0);
        canvas.fill_rect(10.0, 20.0, 30.0, 40.0, RED);
        assert_eq!(canvas.vertices().len(), 6);
        assert_eq!(x_range(canvas.vertices()), (10.0, 40.0));
    }

    #[test]
    fn test_flip_mirrors_in_place() {
        let mut canvas = VertexCanvas::new(720.0, 480.0);
        canvas.save();
        canvas.translate(100.0 + 50.0, 0.0);
        canvas.scale(-1.0, 1.0);
        canvas.fill_rect(0.0, 0.0, 50.0, 10.0, RED);
        canvas.restore();
        assert_eq!(x_range(canvas.vertices()), (100.0, 150.0));

        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, RED);
        assert_eq!(canvas.vertices()[6].position, [0.0, 0.0], "restore resets the transform");
    }

    #[test]
    fn test_accent_sits_on_front_edge() {
        let sprite = Sprite {
            body: RED,
            accent: [0.0, 1.0, 0.0, 1.0],
            accent_at: 0.0,
        };
        let mut canvas = VertexCanvas::new(720.0, 480.0);
        canvas.draw_sprite(&sprite, 0.0, 0.0, 100.0, 100.0);
        assert_eq!(x_range(&canvas.vertices()[6..]), (70.0, 100.0));

        canvas.clear(RED);
        canvas.translate(100.0, 0.0);
        canvas.scale(-1.0, 1.0);
        canvas.draw_sprite(&sprite, 0.0, 0.0, 100.0, 100.0);
        assert_eq!(x_range(&canvas.vertices()[6..]), (0.0, 30.0), "flipped front faces left");
    }

    #[test]
    fn test_clear_drops_geometry() {
        let mut canvas = VertexCanvas::new(720.0, 480.0);
        canvas.translate(5.0, 5.0);
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, RED);
        canvas.clear([0.0; 4]);
        assert!(canvas.vertices().is_empty());
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, RED);
        assert_eq!(canvas.vertices()[0].position, [0.0, 0.0]);
    }
}
