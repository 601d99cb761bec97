// trigl
// copyright zipxing@hotmail.com 2022~2024

//! OpenGL layer.
//!
//! error: GL error categories, the drain checker and the render error type.
//! shader: stage compile / validate / link and the program wrapper.
//! buffer: vertex + index upload through a vertex array object.
//! renderer: the phase machine tying the pieces into one draw loop.
//!
//! Everything takes `gl: &glow::Context` per call; the context stays owned
//! by the host that created it.

pub mod buffer;
pub mod color;
pub mod error;
pub mod renderer;
pub mod shader;
pub mod shader_source;

pub use renderer::GlRenderer;
