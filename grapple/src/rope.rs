use cgmath::{InnerSpace, Vector3, vec2};
use engine::scene::{MeshData, VertexPositionTexture};

use crate::pose::Pose;

pub const ROPE_VERTEX_COUNT: usize = 8;

/// Vertices 0..4 ring the hand end, 4..8 ring the hook end, both ordered
/// +up, +right, -up, -right. Four side quads close the ribbon, then one cap
/// per end.
pub const ROPE_INDICES: [u32; 36] = [
    0, 4, 1, 4, 5, 1, //
    1, 5, 2, 5, 6, 2, //
    2, 6, 3, 6, 7, 3, //
    3, 7, 0, 7, 4, 0, //
    0, 1, 3, 1, 2, 3, //
    4, 7, 5, 5, 7, 6, //
];

/// Ribbon between a hand and its hook, rebuilt from both endpoints every
/// frame the grapple is held.
#[derive(Clone, Debug, PartialEq)]
pub struct RopeMesh {
    mesh: MeshData<VertexPositionTexture>,
}

impl RopeMesh {
    pub fn new() -> Self {
        RopeMesh {
            mesh: MeshData::new(),
        }
    }

    pub fn build_frame(&mut self, hand: &Pose, hook: &Pose, thickness: f32) {
        let hand_ring = cross_section(hand, thickness);
        let hook_ring = cross_section(hook, thickness);

        // UVs tile along the rope: stretching it repeats the texture
        let tile = (hook.position - hand.position).magnitude() / 2.0;

        let mut vertices = [VertexPositionTexture {
            position: hand.position,
            uv: vec2(0.0, 0.0),
        }; ROPE_VERTEX_COUNT];

        for i in 0..4 {
            vertices[i] = VertexPositionTexture {
                position: hand_ring[i],
                uv: vec2(0.0, 0.0),
            };
            vertices[i + 4] = VertexPositionTexture {
                position: hook_ring[i],
                uv: vec2(tile, 0.0),
            };
        }

        self.mesh.set(&vertices, &ROPE_INDICES);
    }

    pub fn clear(&mut self) {
        self.mesh.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }

    pub fn vertices(&self) -> &[VertexPositionTexture] {
        self.mesh.vertices()
    }

    pub fn indices(&self) -> &[u32] {
        self.mesh.indices()
    }

    pub fn mesh(&self) -> &MeshData<VertexPositionTexture> {
        &self.mesh
    }
}

impl Default for RopeMesh {
    fn default() -> Self {
        RopeMesh::new()
    }
}

fn cross_section(pose: &Pose, thickness: f32) -> [Vector3<f32>; 4] {
    let up = pose.up() * thickness;
    let right = pose.right() * thickness;
    [
        pose.position + up,
        pose.position + right,
        pose.position - up,
        pose.position - right,
    ]
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, Quaternion, Rotation3, vec3};

    use super::*;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-4
    }

    #[test]
    fn test_build_frame_rings_both_ends() {
        let mut rope = RopeMesh::new();
        let hand = Pose::from_position(vec3(0.0, 1.0, 0.0));
        let hook = Pose::from_position(vec3(0.0, 1.0, -6.0));

        rope.build_frame(&hand, &hook, 0.1);

        let v = rope.vertices();
        assert_eq!(v.len(), ROPE_VERTEX_COUNT);
        assert!(close(v[0].position, vec3(0.0, 1.1, 0.0)));
        assert!(close(v[1].position, vec3(0.1, 1.0, 0.0)));
        assert!(close(v[2].position, vec3(0.0, 0.9, 0.0)));
        assert!(close(v[3].position, vec3(-0.1, 1.0, 0.0)));
        assert!(close(v[4].position, vec3(0.0, 1.1, -6.0)));
        assert!(close(v[7].position, vec3(-0.1, 1.0, -6.0)));
        assert_eq!(rope.indices().len(), 36);
    }

    #[test]
    fn test_uvs_tile_with_length() {
        let mut rope = RopeMesh::new();
        let hand = Pose::from_position(vec3(0.0, 0.0, 0.0));
        let hook = Pose::from_position(vec3(3.0, 4.0, 0.0));

        rope.build_frame(&hand, &hook, 0.05);

        for vertex in &rope.vertices()[0..4] {
            assert_eq!(vertex.uv, vec2(0.0, 0.0));
        }
        for vertex in &rope.vertices()[4..8] {
            assert!((vertex.uv.x - 2.5).abs() < 1e-5);
            assert_eq!(vertex.uv.y, 0.0);
        }
    }

    #[test]
    fn test_ring_follows_endpoint_orientation() {
        let mut rope = RopeMesh::new();
        let hand = Pose::from_position(vec3(0.0, 0.0, 0.0));
        // Rolled 90 degrees about forward: local up now points along world -X
        let hook = Pose::new(vec3(0.0, 0.0, -2.0), Quaternion::from_angle_z(Deg(90.0)));

        rope.build_frame(&hand, &hook, 1.0);

        assert!(close(rope.vertices()[4].position, vec3(-1.0, 0.0, -2.0)));
        assert!(close(rope.vertices()[5].position, vec3(0.0, 1.0, -2.0)));
    }

    #[test]
    fn test_clear_leaves_no_vertices() {
        let mut rope = RopeMesh::new();
        let hand = Pose::from_position(vec3(0.0, 0.0, 0.0));
        rope.build_frame(&hand, &Pose::from_position(vec3(0.0, 0.0, -1.0)), 0.1);
        rope.clear();

        assert!(rope.is_empty());
        assert!(rope.indices().is_empty());
    }

    #[test]
    fn test_every_index_is_in_range() {
        assert!(ROPE_INDICES.iter().all(|i| (*i as usize) < ROPE_VERTEX_COUNT));
    }
}
