use super::Vertex;

/// CPU-side indexed triangle buffer, handed to a renderer for upload
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData<T: Vertex> {
    vertices: Vec<T>,
    indices: Vec<u32>,
}

impl<T: Vertex> MeshData<T> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Replace the buffer contents, reusing the existing allocations
    pub fn set(&mut self, vertices: &[T], indices: &[u32]) {
        debug_assert!(indices.iter().all(|i| (*i as usize) < vertices.len()));
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
        self.indices.clear();
        self.indices.extend_from_slice(indices);
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[T] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}
