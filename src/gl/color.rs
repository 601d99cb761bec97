// trigl
// copyright zipxing@hotmail.com 2022~2024

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl GlColor {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}
