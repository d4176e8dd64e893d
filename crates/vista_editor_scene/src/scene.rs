// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene root and lifecycle driver.

use crate::node::{Group, LifecycleState, NodeId, SceneNode};

/// A scene: a named root group and its descendants
#[derive(Debug)]
pub struct Scene {
    /// Scene name
    pub name: String,
    root: Group,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            root: Group::new(name.clone()),
            name,
        }
    }

    /// Attach a node to the root
    pub fn add(&mut self, node: impl SceneNode + 'static) -> NodeId {
        self.root.object_mut().add(Box::new(node))
    }

    /// Detach a top-level node
    pub fn remove(&mut self, id: NodeId) -> Option<Box<dyn SceneNode>> {
        self.root.object_mut().remove(id)
    }

    /// Root group
    pub fn root(&self) -> &Group {
        &self.root
    }

    /// Number of nodes below the root
    pub fn node_count(&self) -> usize {
        self.root.object().descendant_count()
    }

    /// Find a node by name
    pub fn find(&self, name: &str) -> Option<&dyn SceneNode> {
        self.root.object().find(name)
    }

    /// Find a node by name, mutable
    pub fn find_mut(&mut self, name: &str) -> Option<&mut dyn SceneNode> {
        self.root.object_mut().find_mut(name)
    }

    /// Read a property of a named node
    pub fn read_property(&self, node: &str, property: &str) -> Option<Vec<f32>> {
        self.find(node)?.read_property(property)
    }

    /// Write a property of a named node. False when either does not resolve.
    pub fn write_property(&mut self, node: &str, property: &str, value: &[f32]) -> bool {
        self.find_mut(node)
            .is_some_and(|found| found.write_property(property, value))
    }

    /// Lifecycle state of the scene
    pub fn state(&self) -> LifecycleState {
        self.root.object().state()
    }

    /// Initialize every node
    pub fn initialize(&mut self) {
        self.root.initialize();
        tracing::info!("Initialized scene '{}' ({} nodes)", self.name, self.node_count());
    }

    /// Advance every node
    pub fn update(&mut self, delta: f32) {
        if self.state() == LifecycleState::Initialized {
            self.root.update(delta);
        }
    }

    /// Dispose every node and its resources
    pub fn dispose(&mut self) {
        self.root.dispose();
        tracing::info!("Disposed scene '{}'", self.name);
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("scene")
    }
}
