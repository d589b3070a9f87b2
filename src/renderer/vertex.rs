//! Vertex format shared by the batcher and the GPU pipeline

use bytemuck::{Pod, Zeroable};

use super::canvas::Color;

/// Flat-shaded 2D vertex. Canvas pixels in the batcher, clip space on the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Color,
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.98, 0.87, 0.62, 1.0];

    pub const SKY: [f32; 4] = [0.99, 0.85, 0.55, 1.0];
    pub const DUNES_FAR: [f32; 4] = [0.93, 0.72, 0.45, 1.0];
    pub const DUNES_MID: [f32; 4] = [0.86, 0.6, 0.36, 1.0];
    pub const DUNES_NEAR: [f32; 4] = [0.76, 0.5, 0.3, 1.0];
    pub const SAND: [f32; 4] = [0.9, 0.78, 0.5, 1.0];
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 0.7];

    pub const PEPE: [f32; 4] = [0.85, 0.3, 0.2, 1.0];
    pub const PEPE_HAT: [f32; 4] = [0.95, 0.8, 0.2, 1.0];
    pub const PEPE_HURT: [f32; 4] = [1.0, 0.55, 0.55, 1.0];
    pub const PEPE_DEAD: [f32; 4] = [0.45, 0.4, 0.4, 1.0];

    pub const CHICKEN: [f32; 4] = [0.55, 0.35, 0.2, 1.0];
    pub const SMALL_CHICKEN: [f32; 4] = [0.95, 0.9, 0.75, 1.0];
    pub const CHICKEN_DEAD: [f32; 4] = [0.5, 0.5, 0.5, 0.8];
    pub const BEAK: [f32; 4] = [1.0, 0.65, 0.0, 1.0];
    pub const BOSS: [f32; 4] = [0.45, 0.25, 0.12, 1.0];
    pub const BOSS_ANGRY: [f32; 4] = [0.7, 0.15, 0.1, 1.0];
    pub const BOSS_HURT: [f32; 4] = [1.0, 0.7, 0.7, 1.0];

    pub const COIN: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const COIN_SHINE: [f32; 4] = [1.0, 1.0, 0.8, 1.0];
    pub const HEART: [f32; 4] = [0.9, 0.1, 0.25, 1.0];
    pub const BOTTLE: [f32; 4] = [0.2, 0.55, 0.3, 1.0];
    pub const SALSA: [f32; 4] = [0.85, 0.1, 0.05, 1.0];

    pub const BAR_BACK: [f32; 4] = [0.0, 0.0, 0.0, 0.45];
    pub const HEALTH_BAR: [f32; 4] = [0.3, 0.8, 0.3, 1.0];
    pub const BOTTLE_BAR: [f32; 4] = [0.3, 0.6, 0.9, 1.0];
    pub const COIN_BAR: [f32; 4] = COIN;
    pub const BOSS_BAR: [f32; 4] = [0.9, 0.3, 0.1, 1.0];
    pub const PAUSE_OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.4];
}
