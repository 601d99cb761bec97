// trigl
// copyright zipxing@hotmail.com 2022~2024

//! Shader stage and program lifecycle.
//!
//! Compilation and linking are split into the separate steps the renderer
//! sequences: compile a stage, validate it, link the program, validate it.
//! Stage status uses the shader-level compile query and program status the
//! program-level link query. Validation reports to the diagnostics sink and
//! returns a flag; [`GlShader::build`] aggregates the flags into one result.

use crate::diagnostics::{DiagLevel, DiagnosticsSink};
use crate::gl::error::RenderError;
use crate::gl_check;
use glow::HasContext;
use std::fmt;

// Matches the classic fixed 512-byte info log buffer, minus the terminator.
const INFO_LOG_LIMIT: usize = 511;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStageKind {
    Vertex,
    Fragment,
}

impl ShaderStageKind {
    pub fn gl_kind(self) -> u32 {
        match self {
            ShaderStageKind::Vertex => glow::VERTEX_SHADER,
            ShaderStageKind::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStageKind::Vertex => write!(f, "vertex"),
            ShaderStageKind::Fragment => write!(f, "fragment"),
        }
    }
}

fn truncate_log(mut log: String) -> String {
    if log.len() > INFO_LOG_LIMIT {
        log.truncate(INFO_LOG_LIMIT);
    }
    log
}

/// Creates a stage object, submits `source` prefixed by the `ver` line and
/// triggers compilation. Compile status is observed by [`validate_stage`].
/// The returned handle must eventually be deleted; [`link_program`] does so.
pub fn compile_stage(
    gl: &glow::Context,
    kind: ShaderStageKind,
    ver: &str,
    source: &str,
) -> Result<glow::Shader, RenderError> {
    unsafe {
        let stage = gl
            .create_shader(kind.gl_kind())
            .map_err(RenderError::Initialization)?;
        gl.shader_source(stage, &format!("{}\n{}", ver, source));
        gl_check!(gl);
        gl.compile_shader(stage);
        gl_check!(gl);
        Ok(stage)
    }
}

/// Queries the stage's compile status. On failure the info log (capped at
/// 511 chars) goes to the sink at Error level.
pub fn validate_stage(
    gl: &glow::Context,
    sink: &dyn DiagnosticsSink,
    stage: glow::Shader,
    kind: ShaderStageKind,
) -> bool {
    let ok = unsafe { gl.get_shader_compile_status(stage) };
    gl_check!(gl);
    if !ok {
        let log = truncate_log(unsafe { gl.get_shader_info_log(stage) });
        gl_check!(gl);
        sink.log_out(
            DiagLevel::Error,
            &format!("{} shader compilation failed: {}", kind, log),
        );
    }
    ok
}

/// Creates a program, attaches both stages and links. The stages are
/// detached and deleted unconditionally afterwards, link failure included,
/// so a retry has to recompile from source.
pub fn link_program(
    gl: &glow::Context,
    vert: glow::Shader,
    frag: glow::Shader,
) -> Result<glow::Program, RenderError> {
    unsafe {
        let program = gl.create_program().map_err(RenderError::Initialization)?;
        gl.attach_shader(program, vert);
        gl_check!(gl);
        gl.attach_shader(program, frag);
        gl_check!(gl);
        gl.link_program(program);
        gl_check!(gl);
        gl.detach_shader(program, vert);
        gl.detach_shader(program, frag);
        gl.delete_shader(vert);
        gl.delete_shader(frag);
        gl_check!(gl);
        Ok(program)
    }
}

/// Queries the program's link status. On failure the link log (capped at
/// 511 chars) goes to the sink at Error level.
pub fn validate_program(
    gl: &glow::Context,
    sink: &dyn DiagnosticsSink,
    program: glow::Program,
) -> bool {
    let ok = unsafe { gl.get_program_link_status(program) };
    gl_check!(gl);
    if !ok {
        let log = truncate_log(unsafe { gl.get_program_info_log(program) });
        gl_check!(gl);
        sink.log_out(
            DiagLevel::Error,
            &format!("shader program linking failed: {}", log),
        );
    }
    ok
}

pub struct GlShader {
    pub program: glow::Program,
}

impl GlShader {
    /// Compiles both stages, links and validates every step. The first
    /// failure comes back as the error; each one is also reported to the
    /// sink. No partially built program survives a failure.
    pub fn build(
        gl: &glow::Context,
        sink: &dyn DiagnosticsSink,
        ver: &str,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, RenderError> {
        let vert = compile_stage(gl, ShaderStageKind::Vertex, ver, vertex_source)?;
        let frag = compile_stage(gl, ShaderStageKind::Fragment, ver, fragment_source)?;

        let mut failure = None;
        for (stage, kind) in [
            (vert, ShaderStageKind::Vertex),
            (frag, ShaderStageKind::Fragment),
        ] {
            if !validate_stage(gl, sink, stage, kind) && failure.is_none() {
                let log = truncate_log(unsafe { gl.get_shader_info_log(stage) });
                failure = Some(RenderError::Compile { stage: kind, log });
            }
        }

        // Linking consumes the stage objects either way.
        let program = link_program(gl, vert, frag)?;

        if !validate_program(gl, sink, program) && failure.is_none() {
            let log = truncate_log(unsafe { gl.get_program_info_log(program) });
            failure = Some(RenderError::Link { log });
        }

        if let Some(err) = failure {
            unsafe {
                gl.delete_program(program);
            }
            gl_check!(gl);
            return Err(err);
        }

        Ok(Self { program })
    }

    pub fn bind(&self, gl: &glow::Context) {
        unsafe {
            gl.use_program(Some(self.program));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_kind_maps_to_gl_enums() {
        assert_eq!(ShaderStageKind::Vertex.gl_kind(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStageKind::Fragment.gl_kind(), glow::FRAGMENT_SHADER);
    }

    #[test]
    fn stage_kind_display() {
        assert_eq!(ShaderStageKind::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStageKind::Fragment.to_string(), "fragment");
    }

    #[test]
    fn info_logs_are_capped_at_511_chars() {
        let short = "0:3: 'vec4' : syntax error".to_string();
        assert_eq!(truncate_log(short.clone()), short);

        let long = "x".repeat(600);
        let capped = truncate_log(long);
        assert_eq!(capped.len(), 511);
    }
}
