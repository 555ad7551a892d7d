//! WebGPU rendering module
//!
//! Bodies are tessellated into flat-colored triangles in canvas pixels and
//! drawn by a single pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::{Vertex, ViewUniform};
