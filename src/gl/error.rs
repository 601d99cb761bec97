// trigl
// copyright zipxing@hotmail.com 2022~2024

//! GL error draining and the render error taxonomy.
//!
//! The GL error queue is sticky: codes pile up until polled. After every GL
//! call the pipeline drains the whole queue through [`check_gl_errors`],
//! logging one line per popped code with the call site. Draining never
//! changes control flow; hard failures travel through [`RenderError`]
//! instead.

use crate::gl::shader::ShaderStageKind;
use glow::HasContext;
use log::warn;
use std::fmt;
use thiserror::Error;

/// Categories behind `gl.get_error` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlErrorKind {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    StackOverflow,
    StackUnderflow,
    OutOfMemory,
    InvalidFramebufferOperation,
    Unknown(u32),
}

impl GlErrorKind {
    pub fn from_code(code: u32) -> Self {
        match code {
            glow::INVALID_ENUM => GlErrorKind::InvalidEnum,
            glow::INVALID_VALUE => GlErrorKind::InvalidValue,
            glow::INVALID_OPERATION => GlErrorKind::InvalidOperation,
            glow::STACK_OVERFLOW => GlErrorKind::StackOverflow,
            glow::STACK_UNDERFLOW => GlErrorKind::StackUnderflow,
            glow::OUT_OF_MEMORY => GlErrorKind::OutOfMemory,
            glow::INVALID_FRAMEBUFFER_OPERATION => GlErrorKind::InvalidFramebufferOperation,
            other => GlErrorKind::Unknown(other),
        }
    }
}

impl fmt::Display for GlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlErrorKind::InvalidEnum => write!(f, "INVALID_ENUM"),
            GlErrorKind::InvalidValue => write!(f, "INVALID_VALUE"),
            GlErrorKind::InvalidOperation => write!(f, "INVALID_OPERATION"),
            GlErrorKind::StackOverflow => write!(f, "STACK_OVERFLOW"),
            GlErrorKind::StackUnderflow => write!(f, "STACK_UNDERFLOW"),
            GlErrorKind::OutOfMemory => write!(f, "OUT_OF_MEMORY"),
            GlErrorKind::InvalidFramebufferOperation => {
                write!(f, "INVALID_FRAMEBUFFER_OPERATION")
            }
            GlErrorKind::Unknown(code) => write!(f, "UNKNOWN(0x{:x})", code),
        }
    }
}

/// Pops the GL error queue until empty, logging one warn line per code.
/// Returns the last kind seen, or None when the queue was already empty.
pub fn check_gl_errors(gl: &glow::Context, site: &str) -> Option<GlErrorKind> {
    let mut last = None;
    loop {
        let code = unsafe { gl.get_error() };
        if code == glow::NO_ERROR {
            break;
        }
        let kind = GlErrorKind::from_code(code);
        warn!("OpenGL error {} | {}", kind, site);
        last = Some(kind);
    }
    last
}

/// Drains the GL error queue, tagging each logged line with the call site.
#[macro_export]
macro_rules! gl_check {
    ($gl:expr) => {
        $crate::gl::error::check_gl_errors($gl, concat!(file!(), ":", line!()))
    };
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("{stage} shader compilation failed: {log}")]
    Compile { stage: ShaderStageKind, log: String },

    #[error("shader program linking failed: {log}")]
    Link { log: String },

    #[error("OpenGL call failed: {0}")]
    Api(GlErrorKind),

    #[error("renderer initialization failed: {0}")]
    Initialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_all_known_codes() {
        assert_eq!(
            GlErrorKind::from_code(glow::INVALID_ENUM),
            GlErrorKind::InvalidEnum
        );
        assert_eq!(
            GlErrorKind::from_code(glow::INVALID_VALUE),
            GlErrorKind::InvalidValue
        );
        assert_eq!(
            GlErrorKind::from_code(glow::INVALID_OPERATION),
            GlErrorKind::InvalidOperation
        );
        assert_eq!(
            GlErrorKind::from_code(glow::STACK_OVERFLOW),
            GlErrorKind::StackOverflow
        );
        assert_eq!(
            GlErrorKind::from_code(glow::STACK_UNDERFLOW),
            GlErrorKind::StackUnderflow
        );
        assert_eq!(
            GlErrorKind::from_code(glow::OUT_OF_MEMORY),
            GlErrorKind::OutOfMemory
        );
        assert_eq!(
            GlErrorKind::from_code(glow::INVALID_FRAMEBUFFER_OPERATION),
            GlErrorKind::InvalidFramebufferOperation
        );
    }

    #[test]
    fn unmapped_code_is_unknown() {
        assert_eq!(GlErrorKind::from_code(0xdead), GlErrorKind::Unknown(0xdead));
        assert_eq!(format!("{}", GlErrorKind::Unknown(0xdead)), "UNKNOWN(0xdead)");
    }

    #[test]
    fn display_matches_gl_names() {
        assert_eq!(format!("{}", GlErrorKind::InvalidEnum), "INVALID_ENUM");
        assert_eq!(
            format!("{}", GlErrorKind::InvalidFramebufferOperation),
            "INVALID_FRAMEBUFFER_OPERATION"
        );
    }

    #[test]
    fn render_error_display() {
        let err = RenderError::Compile {
            stage: ShaderStageKind::Vertex,
            log: "0:1: syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "vertex shader compilation failed: 0:1: syntax error"
        );

        let err = RenderError::Api(GlErrorKind::OutOfMemory);
        assert_eq!(err.to_string(), "OpenGL call failed: OUT_OF_MEMORY");
    }
}
