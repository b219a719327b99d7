use std::borrow::Cow;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::{Affine3A, Vec3};
use slotmap::SlotMap;

use crate::assets::AssetServer;
use crate::errors::SceneError;
use crate::resources::bounds::BoundingBox;
use crate::resources::mesh::{Line, Mesh, Sprite};
use crate::scene::NodeHandle;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::node::{Node, NodeKind};
use crate::scene::transform::Transform;
use crate::scene::transform_system::{self, SceneLists};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Scene graph container.
///
/// Owns the node arena, the ordered root list and the per-frame traversal
/// lists. Hierarchy edits go through the methods here so parent and child
/// links always agree and the graph stays a tree.
///
/// A `Scene` is plain data with no interior locking; sharing one between
/// threads needs an external lock.
#[derive(Debug)]
pub struct Scene {
    pub id: u32,
    pub name: Cow<'static, str>,

    pub(crate) nodes: SlotMap<NodeHandle, Node>,
    pub(crate) root_nodes: Vec<NodeHandle>,

    pub active_camera: Option<NodeHandle>,

    // Filled by `update_matrix_world`
    lists: SceneLists,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            name: Cow::Borrowed("Scene"),
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            active_camera: None,
            lists: SceneLists::new(),
        }
    }

    /// Starts building a node.
    pub fn build_node(&mut self, name: impl Into<Cow<'static, str>>) -> NodeBuilder<'_> {
        NodeBuilder::new(self, name)
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Adds a node as a new root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Adds an empty root node.
    pub fn create_node(&mut self) -> NodeHandle {
        self.add_node(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: impl Into<Cow<'static, str>>) -> NodeHandle {
        self.add_node(Node::new().with_name(name))
    }

    /// Adds a node as the last child of `parent`.
    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> Result<NodeHandle, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }

        child.parent = Some(parent);
        let handle = self.nodes.insert(child);
        self.nodes[parent].children.push(handle);
        Ok(handle)
    }

    /// Moves `child` under `parent`, detaching it from its previous parent.
    ///
    /// Rejects attaching a node to itself or to one of its own descendants.
    /// The child keeps its local transform; its world matrix is refreshed by
    /// the next update.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) -> Result<(), SceneError> {
        if child == parent {
            log::warn!("Cannot attach node {child:?} to itself");
            return Err(SceneError::AttachToSelf(child));
        }
        if !self.nodes.contains_key(child) {
            return Err(SceneError::NodeNotFound(child));
        }
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Attaching {child:?} under its descendant {parent:?} would create a cycle");
            return Err(SceneError::CyclicAttach { child, parent });
        }

        self.unlink(child);

        self.nodes[parent].children.push(child);
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.transform.mark_world_dirty();
        Ok(())
    }

    /// Detaches `handle` from its parent and makes it a root.
    pub fn detach(&mut self, handle: NodeHandle) -> Result<(), SceneError> {
        let Some(node) = self.nodes.get(handle) else {
            return Err(SceneError::NodeNotFound(handle));
        };
        if node.parent.is_none() {
            return Ok(());
        }

        self.unlink(handle);
        self.root_nodes.push(handle);
        let node = &mut self.nodes[handle];
        node.parent = None;
        node.transform.mark_world_dirty();
        Ok(())
    }

    /// Removes `handle` from its parent's child list, or from the root list.
    fn unlink(&mut self, handle: NodeHandle) {
        let old_parent = self.nodes.get(handle).and_then(|n| n.parent);

        if let Some(parent) = old_parent {
            if let Some(p) = self.nodes.get_mut(parent)
                && let Some(i) = p.children.iter().position(|&x| x == handle)
            {
                p.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == handle) {
            self.root_nodes.remove(i);
        }
    }

    /// Removes a node together with its whole subtree.
    pub fn remove_node(&mut self, handle: NodeHandle) -> Result<(), SceneError> {
        if !self.nodes.contains_key(handle) {
            return Err(SceneError::NodeNotFound(handle));
        }

        self.unlink(handle);

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend_from_slice(&node.children);
            }
            if self.active_camera == Some(current) {
                self.active_camera = None;
            }
        }
        Ok(())
    }

    /// Whether `ancestor` is `node` itself or lies on its parent chain.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(|n| n.parent);
        }
        false
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &SlotMap<NodeHandle, Node> {
        &self.nodes
    }

    #[inline]
    #[must_use]
    pub fn root_nodes(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ========================================================================
    // Payload helpers
    // ========================================================================

    pub fn add_mesh(&mut self, mesh: Mesh) -> NodeHandle {
        self.add_node(Node::with_kind(mesh).with_name("Mesh"))
    }

    pub fn add_mesh_to_parent(&mut self, mesh: Mesh, parent: NodeHandle) -> Result<NodeHandle, SceneError> {
        self.add_to_parent(Node::with_kind(mesh).with_name("Mesh"), parent)
    }

    pub fn add_line(&mut self, line: Line) -> NodeHandle {
        self.add_node(Node::with_kind(line).with_name("Line"))
    }

    pub fn add_line_to_parent(&mut self, line: Line, parent: NodeHandle) -> Result<NodeHandle, SceneError> {
        self.add_to_parent(Node::with_kind(line).with_name("Line"), parent)
    }

    pub fn add_sprite(&mut self, sprite: Sprite) -> NodeHandle {
        self.add_node(Node::with_kind(sprite).with_name("Sprite"))
    }

    pub fn add_sprite_to_parent(&mut self, sprite: Sprite, parent: NodeHandle) -> Result<NodeHandle, SceneError> {
        self.add_to_parent(Node::with_kind(sprite).with_name("Sprite"), parent)
    }

    /// Adds a camera node. The first camera added becomes the active one.
    pub fn add_camera(&mut self, camera: Camera) -> NodeHandle {
        let handle = self.add_node(Node::with_kind(camera).with_name("Camera"));
        if self.active_camera.is_none() {
            self.active_camera = Some(handle);
        }
        handle
    }

    pub fn add_camera_to_parent(&mut self, camera: Camera, parent: NodeHandle) -> Result<NodeHandle, SceneError> {
        let handle = self.add_to_parent(Node::with_kind(camera).with_name("Camera"), parent)?;
        if self.active_camera.is_none() {
            self.active_camera = Some(handle);
        }
        Ok(handle)
    }

    pub fn add_light(&mut self, light: Light) -> NodeHandle {
        self.add_node(Node::with_kind(light).with_name("Light"))
    }

    pub fn add_light_to_parent(&mut self, light: Light, parent: NodeHandle) -> Result<NodeHandle, SceneError> {
        self.add_to_parent(Node::with_kind(light).with_name("Light"), parent)
    }

    // ========================================================================
    // Camera queries
    // ========================================================================

    pub fn set_active_camera(&mut self, handle: NodeHandle) -> Result<(), SceneError> {
        let node = self.nodes.get(handle).ok_or(SceneError::NodeNotFound(handle))?;
        if node.camera().is_none() {
            return Err(SceneError::NotACamera(handle));
        }
        self.active_camera = Some(handle);
        Ok(())
    }

    #[must_use]
    pub fn active_camera(&self) -> Option<&Camera> {
        self.nodes.get(self.active_camera?)?.camera()
    }

    /// `(Transform, Camera)` of a camera node, for editing both at once.
    pub fn camera_bundle_mut(&mut self, handle: NodeHandle) -> Option<(&mut Transform, &mut Camera)> {
        let node = self.nodes.get_mut(handle)?;
        match &mut node.kind {
            NodeKind::Camera(camera) => Some((&mut node.transform, camera)),
            _ => None,
        }
    }

    pub fn active_camera_bundle_mut(&mut self) -> Option<(&mut Transform, &mut Camera)> {
        let handle = self.active_camera?;
        self.camera_bundle_mut(handle)
    }

    // ========================================================================
    // Matrix update pipeline
    // ========================================================================

    /// Refreshes world matrices and the traversal lists. Call once per frame
    /// before projecting.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &self.root_nodes, &mut self.lists);
    }

    /// Forces a world matrix refresh of one subtree. Traversal lists are left
    /// untouched.
    pub fn update_subtree(&mut self, root: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, root);
    }

    /// Traversal lists from the last [`update_matrix_world`](Self::update_matrix_world).
    #[inline]
    #[must_use]
    pub fn lists(&self) -> &SceneLists {
        &self.lists
    }

    /// Lights found by the last update, with their world matrices.
    pub fn iter_lights(&self) -> impl Iterator<Item = (NodeHandle, &Light, &Affine3A)> + '_ {
        self.lists.lights.iter().filter_map(|&handle| {
            let node = self.nodes.get(handle)?;
            Some((handle, node.light()?, &node.transform.world_matrix))
        })
    }

    // ========================================================================
    // Bounds
    // ========================================================================

    /// World-space bounding box of the mesh and line geometry in a subtree.
    ///
    /// Uses cached geometry bounds when present, otherwise measures the
    /// vertices. Reads world matrices as left by the last update.
    #[must_use]
    pub fn world_bounding_box(&self, root: NodeHandle, assets: &AssetServer) -> Option<BoundingBox> {
        let mut combined: Option<BoundingBox> = None;
        let mut stack = vec![root];

        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            stack.extend_from_slice(&node.children);

            let geometry_handle = match &node.kind {
                NodeKind::Mesh(mesh) => mesh.geometry,
                NodeKind::Line(line) => line.geometry,
                _ => continue,
            };
            let Some(geometry) = assets.get_geometry(geometry_handle) else {
                continue;
            };
            let local = match geometry.bounding_box() {
                Some(bbox) => *bbox,
                None => BoundingBox::from_points(geometry.vertices()),
            };
            if local.is_empty() {
                continue;
            }

            let world = local.transform(&node.transform.world_matrix);
            combined = Some(match combined {
                Some(existing) => existing.union(&world),
                None => world,
            });
        }

        combined
    }
}

/// Chained node construction: `scene.build_node("name").with_position(..).build()`.
pub struct NodeBuilder<'a> {
    scene: &'a mut Scene,
    node: Node,
    parent: Option<NodeHandle>,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(scene: &'a mut Scene, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            scene,
            node: Node::new().with_name(name),
            parent: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.node.transform.position = Vec3::new(x, y, z);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, s: f32) -> Self {
        self.node.transform.scale = Vec3::splat(s);
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: NodeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<NodeKind>) -> Self {
        self.node.kind = kind.into();
        self
    }

    /// Inserts the node, under the requested parent or as a root.
    pub fn build(self) -> Result<NodeHandle, SceneError> {
        match self.parent {
            Some(parent) => self.scene.add_to_parent(self.node, parent),
            None => Ok(self.scene.add_node(self.node)),
        }
    }
}
