//! Lumen
//!
//! Scene graph core for 3D engines: a transform hierarchy with cached world
//! matrices, view-frustum culling against bounding volumes, and a projector
//! that turns a scene and a camera into painter-sorted render lists for a
//! backend rasterizer to consume.
//!
//! ```rust,ignore
//! use lumen::{AssetServer, Camera, Geometry, Material, Mesh, Projector, Scene};
//! use lumen::settings::ProjectorSettings;
//!
//! let mut assets = AssetServer::new();
//! let geometry = assets.add_geometry(Geometry::new_box(1.0, 1.0, 1.0));
//! let material = assets.add_material(Material::new_basic(glam::Vec4::ONE));
//!
//! let mut scene = Scene::new();
//! scene.add_mesh(Mesh::new(geometry, material));
//! let camera = scene.add_camera(Camera::new_perspective(45.0, 16.0 / 9.0, 0.1, 100.0));
//! scene.get_node_mut(camera).unwrap().transform.position.z = 5.0;
//!
//! scene.update_matrix_world();
//! let mut projector = Projector::new(ProjectorSettings::default())?;
//! let data = projector.project_active(&scene, &assets)?;
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod app;
pub mod assets;
pub mod errors;
pub mod math;
pub mod projector;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod utils;

pub use app::{Clock, FrameContext, FrameLoop, FrameSink, ManualClock, SystemClock};
pub use assets::{AssetServer, GeometryHandle, MaterialHandle};
pub use errors::{LumenError, ProjectorError, Result, SceneError};
pub use projector::{Projector, RenderData, RenderableElement};
pub use resources::{BoundingBox, BoundingSphere, Face, Geometry, Line, LineMode, Material, Mesh, Side, Sprite};
pub use scene::{Camera, Frustum, Light, Node, NodeHandle, NodeKind, Scene, Transform};
pub use settings::{FrameLoopSettings, ProjectorSettings, Viewport};
