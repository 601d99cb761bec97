// trigl
// copyright zipxing@hotmail.com 2022~2024

/// Version line prefixed onto every stage source at compile time.
pub const GLSL_VER: &str = "#version 330 core";

/// Pass-through position stage: attribute slot 0 carries a 3-float position.
pub const TRIANGLE_VERTEX_SRC: &str = r#"
            layout (location = 0) in vec3 aPos;
            void main() {
                gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
            }
        "#;

/// Constant-color stage.
pub const TRIANGLE_FRAGMENT_SRC: &str = r#"
            out vec4 FragColor;
            void main() {
                FragColor = vec4(1.0, 0.5, 0.2, 1.0);
            }
        "#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_stage_reads_slot_zero() {
        assert!(TRIANGLE_VERTEX_SRC.contains("layout (location = 0) in vec3"));
        assert!(TRIANGLE_VERTEX_SRC.contains("gl_Position"));
    }

    #[test]
    fn sources_leave_the_version_line_to_the_prefix() {
        assert!(GLSL_VER.starts_with("#version"));
        assert!(!TRIANGLE_VERTEX_SRC.contains("#version"));
        assert!(!TRIANGLE_FRAGMENT_SRC.contains("#version"));
    }
}
