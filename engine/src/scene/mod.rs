pub mod vertex;
pub use vertex::*;

pub mod mesh_data;
pub use mesh_data::MeshData;
