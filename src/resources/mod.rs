//! Asset-side data read by the scene and the projector:
//! - Geometry: vertices, faces and cached bounding volumes
//! - Material: color, transparency and face side
//! - Mesh / Line / Sprite: node payloads referencing the above by handle

pub mod bounds;
pub mod geometry;
pub mod material;
pub mod mesh;
pub mod primitives;

pub use bounds::{BoundingBox, BoundingSphere};
pub use geometry::{Face, Geometry};
pub use material::{Material, MaterialKind, Side, VertexColors};
pub use mesh::{Line, LineMode, MaterialSlot, Mesh, Sprite};
