//! Scene graph
//!
//! - [`Node`]: hierarchy links, transform, flags and a typed payload
//! - [`Transform`]: position / rotation / scale with cached matrices
//! - [`Scene`]: node arena plus root list, active camera and per-kind buckets
//! - [`Camera`], [`Light`]: node payloads
//! - [`Frustum`]: six-plane visibility volume
//! - [`transform_system`]: world matrix propagation, decoupled from `Scene`

pub mod camera;
pub mod frustum;
pub mod light;
pub mod node;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use camera::{Camera, ProjectionType};
pub use frustum::{Frustum, Plane};
pub use light::{Light, LightKind, PointLight, SpotLight};
pub use node::{Node, NodeKind, ObjectMask, ObjectType};
pub use scene::{NodeBuilder, Scene};
pub use transform::Transform;
pub use transform_system::{LevelOrderBatches, SceneLists};

use slotmap::new_key_type;

new_key_type! {
    /// Stable handle of a node inside a [`Scene`].
    pub struct NodeHandle;
}
