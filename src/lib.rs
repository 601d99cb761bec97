// trigl
// copyright zipxing@hotmail.com 2022~2024

//! Trigl brings up a minimal OpenGL 3.3 pipeline with a validated resource
//! lifecycle: shader stages are compiled and status-checked, the program is
//! linked and status-checked, vertex (and optional index) data is uploaded
//! through a vertex array object, and every GL call is followed by a drain
//! of the GL error queue.
//!
//! The crate is windowing-agnostic. The host owns the context (see
//! demos/triangle for a winit + glutin host) and passes a `glow::Context`
//! to each renderer call, the same way every operation runs on the thread
//! owning that context. Nothing here is safe to call from another thread.

/// leveled diagnostics sink, injected into the renderer at init
pub mod diagnostics;

/// GL layer: error drain, shader lifecycle, buffer upload, renderer
pub mod gl;

/// log
pub mod log;

pub use gl::renderer::GlRenderer;
