// trigl
// copyright zipxing@hotmail.com 2022~2024

//! Vertex and index upload.
//!
//! Upload byte lengths always come from the fat slice, so the count the GPU
//! sees is the logical element count times the element size. All handles
//! start as None and stay None when creation fails, which keeps cleanup a
//! safe no-op after a partial setup.

use crate::gl::error::RenderError;
use crate::gl_check;
use glow::HasContext;
use std::mem::size_of;

/// Floats per position in attribute slot 0.
pub const FLOATS_PER_VERTEX: usize = 3;

fn position_count(floats: usize) -> i32 {
    (floats / FLOATS_PER_VERTEX) as i32
}

#[derive(Default)]
pub struct GlGeometry {
    pub vao: Option<glow::VertexArray>,
    pub vbo: Option<glow::Buffer>,
    pub ebo: Option<glow::Buffer>,
    pub vertex_count: i32,
    pub index_count: i32,
}

impl GlGeometry {
    /// Uploads tightly packed 3-float positions and wires attribute slot 0
    /// through a fresh vertex array object.
    pub fn upload_vertices(
        &mut self,
        gl: &glow::Context,
        vertices: &[f32],
    ) -> Result<(), RenderError> {
        unsafe {
            let vbo = gl.create_buffer().map_err(RenderError::Initialization)?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl_check!(gl);
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                vertices.align_to::<u8>().1,
                glow::STATIC_DRAW,
            );
            gl_check!(gl);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl_check!(gl);

            let vao = gl
                .create_vertex_array()
                .map_err(RenderError::Initialization)?;
            gl.bind_vertex_array(Some(vao));
            gl_check!(gl);
            gl.enable_vertex_attrib_array(0);
            gl_check!(gl);
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl_check!(gl);
            gl.vertex_attrib_pointer_f32(
                0,
                FLOATS_PER_VERTEX as i32,
                glow::FLOAT,
                false,
                (FLOATS_PER_VERTEX * size_of::<f32>()) as i32,
                0,
            );
            gl_check!(gl);
            gl.bind_vertex_array(None);
            gl_check!(gl);

            self.vbo = Some(vbo);
            self.vao = Some(vao);
            self.vertex_count = position_count(vertices.len());
        }
        Ok(())
    }

    /// Uploads indices onto the element-array target. Runs with the owning
    /// vertex array object bound so the element buffer stays associated
    /// with it.
    pub fn upload_indices(
        &mut self,
        gl: &glow::Context,
        indices: &[u32],
    ) -> Result<(), RenderError> {
        unsafe {
            gl.bind_vertex_array(self.vao);
            gl_check!(gl);
            let ebo = gl.create_buffer().map_err(RenderError::Initialization)?;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl_check!(gl);
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                indices.align_to::<u8>().1,
                glow::STATIC_DRAW,
            );
            gl_check!(gl);
            gl.bind_vertex_array(None);
            gl_check!(gl);

            self.ebo = Some(ebo);
            self.index_count = indices.len() as i32;
        }
        Ok(())
    }

    /// Deletes whichever handles exist. Idempotent.
    pub fn cleanup(&mut self, gl: &glow::Context) {
        unsafe {
            if let Some(vao) = self.vao.take() {
                gl.delete_vertex_array(vao);
                gl_check!(gl);
            }
            if let Some(vbo) = self.vbo.take() {
                gl.delete_buffer(vbo);
                gl_check!(gl);
            }
            if let Some(ebo) = self.ebo.take() {
                gl.delete_buffer(ebo);
                gl_check!(gl);
            }
        }
        self.vertex_count = 0;
        self.index_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_no_handles() {
        let geo = GlGeometry::default();
        assert!(geo.vao.is_none());
        assert!(geo.vbo.is_none());
        assert!(geo.ebo.is_none());
        assert_eq!(geo.vertex_count, 0);
        assert_eq!(geo.index_count, 0);
    }

    #[test]
    fn counts_positions_not_floats() {
        // The spec triangle: 9 floats are 3 positions.
        assert_eq!(position_count(9), 3);
        assert_eq!(position_count(0), 0);
        assert_eq!(position_count(12), 4);
    }
}
