use cgmath::{Vector2, Vector3};

/// Plain-old-data vertex, laid out the way a backend uploads it
pub trait Vertex: Copy {}

#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct VertexPositionTexture {
    pub position: Vector3<f32>,
    pub uv: Vector2<f32>,
}

impl Vertex for VertexPositionTexture {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_texture_layout() {
        assert_eq!(std::mem::offset_of!(VertexPositionTexture, position), 0);
        assert_eq!(std::mem::offset_of!(VertexPositionTexture, uv), 12);
        assert_eq!(std::mem::size_of::<VertexPositionTexture>(), 20);
    }
}
