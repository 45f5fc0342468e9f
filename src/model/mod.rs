pub mod node_index;

pub use node_index::NodeIndex;

use crate::error::ModelError;
use crate::math::{Aabb, Matrix4, Point3};
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Unique identifier for a node in a loaded model.
    pub struct NodeId;
}

/// Data associated with one node of the model's scene tree.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Name as authored in the asset. Empty for unnamed nodes.
    pub name: String,
    /// Parent node, or `None` for a root.
    pub parent: Option<NodeId>,
    /// Transform relative to the parent.
    pub local: Matrix4,
}

/// Node tree of a loaded body model, as handed over by the render host.
///
/// Nodes reference their parent via typed IDs (generational indices), so
/// world transforms are computed by walking up the arena.
/// Iteration follows insertion order.
#[derive(Debug, Default)]
pub struct Model {
    nodes: SlotMap<NodeId, NodeData>,
}

impl Model {
    /// Creates a new, empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a root node and returns its ID.
    pub fn add_root(&mut self, name: impl Into<String>, local: Matrix4) -> NodeId {
        self.nodes.insert(NodeData {
            name: name.into(),
            parent: None,
            local,
        })
    }

    /// Inserts a child of `parent` and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` is not in the model.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        local: Matrix4,
    ) -> Result<NodeId, ModelError> {
        self.node(parent)?;
        Ok(self.nodes.insert(NodeData {
            name: name.into(),
            parent: Some(parent),
            local,
        }))
    }

    /// Returns a reference to the node data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not in the model.
    pub fn node(&self, id: NodeId) -> Result<&NodeData, ModelError> {
        self.nodes
            .get(id)
            .ok_or_else(|| ModelError::NodeNotFound(format!("{id:?}")))
    }

    /// Iterates all nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.nodes.iter()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Composes local transforms from the root down to `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` or one of its ancestors is missing.
    pub fn world_transform(&self, id: NodeId) -> Result<Matrix4, ModelError> {
        let mut node = self.node(id)?;
        let mut world = node.local;
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            world = node.local * world;
        }
        Ok(world)
    }

    /// World-space position of the node's origin.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` or one of its ancestors is missing.
    pub fn world_position(&self, id: NodeId) -> Result<Point3, ModelError> {
        Ok(self.world_transform(id)?.transform_point(&Point3::origin()))
    }
}

/// A model that finished loading: its node tree, the name index over it
/// and its bounding box. Immutable for the rest of the model's life.
#[derive(Debug)]
pub struct LoadedModel {
    model: Model,
    index: NodeIndex,
    bounds: Aabb,
}

impl LoadedModel {
    /// Indexes `model` and pairs it with the bounds computed by the host.
    #[must_use]
    pub fn new(model: Model, bounds: Aabb) -> Self {
        let index = NodeIndex::build(&model);
        Self {
            model,
            index,
            bounds,
        }
    }

    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    #[must_use]
    pub fn index(&self) -> &NodeIndex {
        &self.index
    }

    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Vector3, TOLERANCE};

    fn translation(x: f64, y: f64, z: f64) -> Matrix4 {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    #[test]
    fn world_position_composes_parents() {
        let mut model = Model::new();
        let root = model.add_root("Armature", translation(0.0, 1.0, 0.0));
        let arm = model.add_child(root, "Arm", translation(0.5, 0.0, 0.0)).unwrap();
        let point = model.add_child(arm, "PT_LI4", translation(0.0, 0.0, 0.1)).unwrap();

        let p = model.world_position(point).unwrap();
        assert!((p - Point3::new(0.5, 1.0, 0.1)).norm() < TOLERANCE);
    }

    #[test]
    fn world_position_applies_parent_scale() {
        let mut model = Model::new();
        let root = model.add_root("Scene", Matrix4::new_scaling(2.0));
        let point = model.add_child(root, "PT_ST36", translation(0.0, 0.25, 0.0)).unwrap();

        let p = model.world_position(point).unwrap();
        assert!((p - Point3::new(0.0, 0.5, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn add_child_rejects_unknown_parent() {
        let mut other = Model::new();
        let stray = other.add_root("a", Matrix4::identity());
        let mut model = Model::new();
        // Same slot index but the arena is empty, so the key is unknown.
        assert!(model.add_child(stray, "b", Matrix4::identity()).is_err());
    }

    #[test]
    fn loaded_model_indexes_nodes() {
        let mut model = Model::new();
        let root = model.add_root("Body", Matrix4::identity());
        let node = model.add_child(root, "PT_GB20", translation(0.0, 1.6, -0.05)).unwrap();
        let bounds = Aabb::new(Point3::new(-0.3, 0.0, -0.2), Point3::new(0.3, 1.8, 0.2));

        let loaded = LoadedModel::new(model, bounds);
        assert_eq!(loaded.index().lookup("PT_GB20"), Some(node));
        assert_eq!(loaded.bounds(), &bounds);
    }

    #[test]
    fn iteration_follows_insertion() {
        let mut model = Model::new();
        let root = model.add_root("root", Matrix4::identity());
        model.add_child(root, "first", Matrix4::identity()).unwrap();
        model.add_child(root, "second", Matrix4::identity()).unwrap();
        let names: Vec<_> = model.iter().map(|(_, n)| n.name.as_str()).collect();
        assert_eq!(names, ["root", "first", "second"]);
        assert_eq!(model.len(), 3);
    }
}
