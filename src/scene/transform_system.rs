//! Transform System
//!
//! World matrix propagation for the scene graph, kept separate from
//! [`Scene`](crate::scene::Scene) so it only borrows the node arena and the
//! root list.
//!
//! Every variant follows the same rule per node:
//!
//! 1. `local_changed = transform.update_local_matrix()`
//! 2. if `local_changed || force`: `world = parent_world * local`, the node is
//!    flagged `world_changed` and its children are visited with `force = true`
//! 3. otherwise the cached world matrix is kept, `world_changed` is cleared and
//!    children inherit `force`
//!
//! Camera payloads are re-synced whenever their world matrix is recomputed.
//!
//! # Level-order batches
//!
//! [`build_level_order_batches`] groups nodes by depth (BFS order). Nodes in
//! the same batch never depend on each other, so a batch can be processed in
//! any order once the previous batch is done.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::{Node, NodeKind, ObjectType};

/// Flat traversal output of a hierarchy update, pooled across frames.
///
/// `nodes` holds every reachable node in pre-order; the per-kind buckets keep
/// the same relative order.
#[derive(Debug, Default, Clone)]
pub struct SceneLists {
    pub nodes: Vec<NodeHandle>,
    pub meshes: Vec<NodeHandle>,
    pub lines: Vec<NodeHandle>,
    pub sprites: Vec<NodeHandle>,
    pub lights: Vec<NodeHandle>,
    pub cameras: Vec<NodeHandle>,
}

impl SceneLists {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties every list, keeping allocations.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.meshes.clear();
        self.lines.clear();
        self.sprites.clear();
        self.lights.clear();
        self.cameras.clear();
    }

    pub fn record(&mut self, handle: NodeHandle, object_type: ObjectType) {
        self.nodes.push(handle);
        match object_type {
            ObjectType::Empty => {}
            ObjectType::Mesh => self.meshes.push(handle),
            ObjectType::Line => self.lines.push(handle),
            ObjectType::Sprite => self.sprites.push(handle),
            ObjectType::Light => self.lights.push(handle),
            ObjectType::Camera => self.cameras.push(handle),
        }
    }
}

/// Nodes grouped by depth; `batches[0]` holds the roots.
#[derive(Debug, Default)]
pub struct LevelOrderBatches {
    pub batches: Vec<Vec<NodeHandle>>,
}

impl LevelOrderBatches {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties every batch, keeping allocations.
    pub fn clear(&mut self) {
        for batch in &mut self.batches {
            batch.clear();
        }
    }

    #[must_use]
    pub fn total_nodes(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.batches.len()
    }
}

/// Updates one node against its parent's world matrix.
///
/// Returns `true` if the world matrix was recomputed.
fn update_node(node: &mut Node, parent_world: &Affine3A, force: bool) -> bool {
    let local_changed = node.transform.update_local_matrix();

    if local_changed || force {
        let new_world = *parent_world * node.transform.local_matrix;
        node.transform.set_world_matrix(new_world);

        if let NodeKind::Camera(camera) = &mut node.kind {
            camera.update_view_projection(&new_world);
        }
        true
    } else {
        node.transform.world_changed = false;
        false
    }
}

fn parent_world_of(nodes: &SlotMap<NodeHandle, Node>, node: &Node) -> Affine3A {
    node.parent
        .and_then(|parent| nodes.get(parent))
        .map_or(Affine3A::IDENTITY, |parent| parent.transform.world_matrix)
}

/// Updates world matrices of the whole hierarchy with an explicit stack.
///
/// Pre-order, children in insertion order; refills `lists`.
pub fn update_hierarchy_iterative(
    nodes: &mut SlotMap<NodeHandle, Node>,
    roots: &[NodeHandle],
    lists: &mut SceneLists,
) {
    lists.clear();

    // (node, parent world, force)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);
    for &root in roots.iter().rev() {
        stack.push((root, Affine3A::IDENTITY, false));
    }

    while let Some((handle, parent_world, force)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            log::warn!("Skipping dangling node handle {handle:?} during hierarchy update");
            continue;
        };

        let world_updated = update_node(node, &parent_world, force);
        lists.record(handle, node.object_type());

        let world = node.transform.world_matrix;
        for &child in node.children.iter().rev() {
            stack.push((child, world, world_updated));
        }
    }
}

/// Recursive variant of [`update_hierarchy_iterative`]; same results.
pub fn update_hierarchy(
    nodes: &mut SlotMap<NodeHandle, Node>,
    roots: &[NodeHandle],
    lists: &mut SceneLists,
) {
    lists.clear();
    for &root in roots {
        update_recursive(nodes, root, &Affine3A::IDENTITY, false, Some(&mut *lists));
    }
}

fn update_recursive(
    nodes: &mut SlotMap<NodeHandle, Node>,
    handle: NodeHandle,
    parent_world: &Affine3A,
    force: bool,
    mut lists: Option<&mut SceneLists>,
) {
    let (world, world_updated, child_count) = {
        let Some(node) = nodes.get_mut(handle) else {
            return;
        };
        let world_updated = update_node(node, parent_world, force);
        if let Some(lists) = lists.as_deref_mut() {
            lists.record(handle, node.object_type());
        }
        (node.transform.world_matrix, world_updated, node.children.len())
    };

    for i in 0..child_count {
        let Some(child) = nodes.get(handle).and_then(|n| n.children.get(i).copied()) else {
            break;
        };
        update_recursive(nodes, child, &world, world_updated, lists.as_deref_mut());
    }
}

/// Forces a world matrix refresh of `root` and everything below it, using the
/// parent's current world matrix.
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, root: NodeHandle) {
    let Some(node) = nodes.get(root) else {
        return;
    };
    let parent_world = parent_world_of(nodes, node);
    update_recursive(nodes, root, &parent_world, true, None);
}

/// Builds level-order (BFS) batches for `roots`, reusing `output`'s memory.
pub fn build_level_order_batches(
    nodes: &SlotMap<NodeHandle, Node>,
    roots: &[NodeHandle],
    output: &mut LevelOrderBatches,
) {
    output.clear();

    if roots.is_empty() {
        output.batches.truncate(0);
        return;
    }

    if output.batches.is_empty() {
        output.batches.push(Vec::new());
    }
    output.batches[0].extend_from_slice(roots);

    let mut depth = 0;
    loop {
        let mut next = output
            .batches
            .get_mut(depth + 1)
            .map(std::mem::take)
            .unwrap_or_default();

        for &handle in &output.batches[depth] {
            if let Some(node) = nodes.get(handle) {
                next.extend_from_slice(&node.children);
            }
        }

        if next.is_empty() {
            break;
        }

        depth += 1;
        if depth < output.batches.len() {
            output.batches[depth] = next;
        } else {
            output.batches.push(next);
        }
    }

    output.batches.truncate(depth + 1);
}

/// Updates world matrices batch by batch.
///
/// Produces the same matrices as [`update_hierarchy_iterative`]; a node is
/// forced when its parent's world matrix changed in this pass.
pub fn update_hierarchy_batched(nodes: &mut SlotMap<NodeHandle, Node>, batches: &LevelOrderBatches) {
    for batch in &batches.batches {
        for &handle in batch {
            let Some(node) = nodes.get(handle) else {
                continue;
            };

            let (parent_world, force) = match node.parent.and_then(|p| nodes.get(p)) {
                Some(parent) => (parent.transform.world_matrix, parent.transform.world_changed),
                None => (Affine3A::IDENTITY, false),
            };

            if let Some(node) = nodes.get_mut(handle) {
                update_node(node, &parent_world, force);
            }
        }
    }
}
