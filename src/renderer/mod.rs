//! Rendering module
//!
//! The render pass (`scene`) paints into a `Canvas2d`. In the browser that
//! canvas is a `VertexCanvas` whose triangles go through the WebGPU pipeline.

pub mod batch;
pub mod canvas;
pub mod pipeline;
pub mod scene;
pub mod sprites;
pub mod vertex;

pub use batch::VertexCanvas;
pub use canvas::{Canvas2d, Color};
pub use pipeline::{RenderInitError, RenderState};
pub use scene::draw_world;
pub use sprites::{Sprite, SpriteAtlas};
pub use vertex::Vertex;
