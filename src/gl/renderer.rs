// trigl
// copyright zipxing@hotmail.com 2022~2024

//! The renderer phase machine.
//!
//! Unconfigured → Initialized → Ready → Cleaned. `init` stores the injected
//! diagnostics sink, `setup` runs compile → validate → link → validate →
//! upload, `clear_screen` only records the clear color, `render` issues the
//! per-frame clear + draw with an error drain after each sub-step, and
//! `cleanup` deletes whatever handles were actually created.
//!
//! A failed `setup` leaves the renderer out of Ready and `render` refuses
//! to draw; an unlinked program never reaches a draw call.

use crate::diagnostics::{DiagLevel, DiagnosticsSink};
use crate::gl::buffer::GlGeometry;
use crate::gl::color::GlColor;
use crate::gl::error::RenderError;
use crate::gl::shader::GlShader;
use crate::gl::shader_source::{GLSL_VER, TRIANGLE_FRAGMENT_SRC, TRIANGLE_VERTEX_SRC};
use crate::gl_check;
use glow::HasContext;
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Unconfigured,
    Initialized,
    Ready,
    Cleaned,
}

pub struct GlRenderer {
    phase: RenderPhase,
    sink: Option<Box<dyn DiagnosticsSink>>,
    shader: Option<GlShader>,
    geometry: GlGeometry,
    clear_color: GlColor,
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GlRenderer {
    pub fn new() -> Self {
        Self {
            phase: RenderPhase::Unconfigured,
            sink: None,
            shader: None,
            geometry: GlGeometry::default(),
            clear_color: GlColor::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    pub fn clear_color(&self) -> GlColor {
        self.clear_color
    }

    /// Stores the diagnostics sink. Must run exactly once, before `setup`.
    pub fn init(&mut self, sink: Box<dyn DiagnosticsSink>) -> Result<(), RenderError> {
        if self.phase != RenderPhase::Unconfigured {
            return Err(RenderError::Initialization(format!(
                "init called in {:?} phase",
                self.phase
            )));
        }
        sink.log_out(DiagLevel::Info, "renderer initialized");
        self.sink = Some(sink);
        self.phase = RenderPhase::Initialized;
        Ok(())
    }

    /// Compiles and links the triangle program, then uploads the geometry.
    /// Any compile/link failure comes back as the error and the renderer
    /// stays out of Ready; the host must not call `render` after that.
    pub fn setup(
        &mut self,
        gl: &glow::Context,
        vertices: &[f32],
        indices: Option<&[u32]>,
    ) -> Result<(), RenderError> {
        if self.phase != RenderPhase::Initialized {
            return Err(RenderError::Initialization(format!(
                "setup called in {:?} phase",
                self.phase
            )));
        }
        let sink = match self.sink.as_deref() {
            Some(s) => s,
            None => {
                return Err(RenderError::Initialization(
                    "setup called before init".to_string(),
                ))
            }
        };

        let shader = match GlShader::build(
            gl,
            sink,
            GLSL_VER,
            TRIANGLE_VERTEX_SRC,
            TRIANGLE_FRAGMENT_SRC,
        ) {
            Ok(s) => s,
            Err(e) => {
                sink.log_out(DiagLevel::Error, &format!("pipeline setup failed: {}", e));
                return Err(e);
            }
        };
        self.shader = Some(shader);

        self.geometry.upload_vertices(gl, vertices)?;
        if let Some(indices) = indices {
            self.geometry.upload_indices(gl, indices)?;
        }

        self.phase = RenderPhase::Ready;
        sink.log_out(DiagLevel::Info, "render pipeline ready");
        Ok(())
    }

    /// Records the clear color. No GPU submission happens until `render`.
    pub fn clear_screen(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.clear_color = GlColor::new(r, g, b, a);
    }

    /// Clears with the recorded color, binds program and vertex array and
    /// issues one draw: indexed when an element buffer exists, otherwise a
    /// plain triangle-list draw. Outside Ready this is a logged no-op.
    pub fn render(&mut self, gl: &glow::Context) {
        if self.phase != RenderPhase::Ready {
            warn!("render called in {:?} phase, skipping draw", self.phase);
            return;
        }
        let shader = match &self.shader {
            Some(s) => s,
            None => return,
        };

        unsafe {
            let c = self.clear_color;
            gl.clear_color(c.r, c.g, c.b, c.a);
            gl_check!(gl);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            gl_check!(gl);

            shader.bind(gl);
            gl_check!(gl);

            gl.bind_vertex_array(self.geometry.vao);
            gl_check!(gl);

            if self.geometry.ebo.is_some() {
                gl.draw_elements(
                    glow::TRIANGLES,
                    self.geometry.index_count,
                    glow::UNSIGNED_INT,
                    0,
                );
            } else {
                gl.draw_arrays(glow::TRIANGLES, 0, self.geometry.vertex_count);
            }
            gl_check!(gl);

            gl.bind_vertex_array(None);
            gl_check!(gl);
        }
    }

    /// Deletes every handle that was actually created. Safe right after
    /// `init`, or after a `setup` that failed partway.
    pub fn cleanup(&mut self, gl: &glow::Context) {
        self.geometry.cleanup(gl);
        if let Some(shader) = self.shader.take() {
            unsafe {
                gl.delete_program(shader.program);
            }
            gl_check!(gl);
        }
        self.phase = RenderPhase::Cleaned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CaptureSink;
    use std::rc::Rc;

    #[test]
    fn starts_unconfigured_with_black_clear() {
        let renderer = GlRenderer::new();
        assert_eq!(renderer.phase(), RenderPhase::Unconfigured);
        assert_eq!(renderer.clear_color(), GlColor::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn init_transitions_and_reports() {
        let sink = Rc::new(CaptureSink::new());
        let mut renderer = GlRenderer::new();

        renderer.init(Box::new(sink.clone())).unwrap();
        assert_eq!(renderer.phase(), RenderPhase::Initialized);
        assert_eq!(sink.lines.borrow().len(), 1);
        assert_eq!(sink.lines.borrow()[0].0, DiagLevel::Info);
    }

    #[test]
    fn double_init_is_rejected() {
        let mut renderer = GlRenderer::new();
        renderer.init(Box::new(Rc::new(CaptureSink::new()))).unwrap();

        let err = renderer.init(Box::new(Rc::new(CaptureSink::new())));
        assert!(matches!(err, Err(RenderError::Initialization(_))));
        assert_eq!(renderer.phase(), RenderPhase::Initialized);
    }

    #[test]
    fn clear_screen_only_records_the_color() {
        let mut renderer = GlRenderer::new();
        renderer.clear_screen(0.5, 0.5, 0.5, 1.0);
        assert_eq!(renderer.clear_color(), GlColor::new(0.5, 0.5, 0.5, 1.0));

        // No phase change: recording a color is not a GPU submission.
        assert_eq!(renderer.phase(), RenderPhase::Unconfigured);
    }
}
