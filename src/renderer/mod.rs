//! Rendering
//!
//! Frames are composed in software at the logical 800x400 resolution, then
//! presented through a single textured quad on the GPU.

pub mod canvas;
pub mod pipeline;
pub mod scene;
pub mod text;
pub mod vertex;

pub use canvas::Canvas;
pub use pipeline::RenderState;
pub use scene::compose;
