// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene node trait and the shared object data every node carries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Local transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position (x, y, z)
    pub position: [f32; 3],
    /// Rotation quaternion (x, y, z, w)
    pub quaternion: [f32; 4],
    /// Scale
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            quaternion: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

/// Kind of node, for display and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Empty container
    Group,
    /// Geometry with a material
    Mesh,
    /// Camera-facing quad
    Sprite,
}

impl NodeKind {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Group => "Group",
            Self::Mesh => "Mesh",
            Self::Sprite => "Sprite",
        }
    }
}

/// Where a node is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// Constructed, not yet initialized
    #[default]
    Created,
    /// Initialized and updating
    Initialized,
    /// Resources released
    Disposed,
}

/// Data shared by every scene node
#[derive(Debug)]
pub struct Object3D {
    /// Unique node ID
    pub id: NodeId,
    /// Node name, used to resolve animation tracks
    pub name: String,
    /// Local transform
    pub transform: Transform,
    /// Whether the node is drawn
    pub visible: bool,
    /// Casts shadows
    pub cast_shadow: bool,
    /// Receives shadows
    pub receive_shadow: bool,
    /// Seconds accumulated through `update`
    pub elapsed: f32,
    state: LifecycleState,
    children: Vec<Box<dyn SceneNode>>,
}

impl Object3D {
    /// Create object data with an identity transform
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            transform: Transform::default(),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            elapsed: 0.0,
            state: LifecycleState::Created,
            children: Vec::new(),
        }
    }

    /// Lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Mark the lifecycle state
    pub fn set_state(&mut self, state: LifecycleState) {
        self.state = state;
    }

    /// Attach a child
    pub fn add(&mut self, child: Box<dyn SceneNode>) -> NodeId {
        let id = child.object().id;
        self.children.push(child);
        id
    }

    /// Detach a direct child
    pub fn remove(&mut self, id: NodeId) -> Option<Box<dyn SceneNode>> {
        let index = self.children.iter().position(|c| c.object().id == id)?;
        Some(self.children.remove(index))
    }

    /// Direct children
    pub fn children(&self) -> &[Box<dyn SceneNode>] {
        &self.children
    }

    /// Direct children, mutable
    pub fn children_mut(&mut self) -> &mut [Box<dyn SceneNode>] {
        &mut self.children
    }

    /// Number of descendants
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.object().descendant_count())
            .sum()
    }

    /// Depth-first search for a descendant by name
    pub fn find(&self, name: &str) -> Option<&dyn SceneNode> {
        for child in &self.children {
            if child.object().name == name {
                return Some(child.as_ref());
            }
            if let Some(found) = child.object().find(name) {
                return Some(found);
            }
        }
        None
    }

    /// Depth-first search for a descendant by name, mutable
    pub fn find_mut(&mut self, name: &str) -> Option<&mut dyn SceneNode> {
        for child in &mut self.children {
            if child.object().name == name {
                return Some(child.as_mut());
            }
            if let Some(found) = child.object_mut().find_mut(name) {
                return Some(found);
            }
        }
        None
    }

    /// Dispose every child, then mark this object disposed
    pub fn dispose_children(&mut self) {
        for child in &mut self.children {
            child.dispose();
        }
        self.state = LifecycleState::Disposed;
    }

    /// Read a transform or visibility property
    pub fn read_property(&self, property: &str) -> Option<Vec<f32>> {
        match property {
            "position" => Some(self.transform.position.to_vec()),
            "quaternion" => Some(self.transform.quaternion.to_vec()),
            "scale" => Some(self.transform.scale.to_vec()),
            "visible" => Some(vec![if self.visible { 1.0 } else { 0.0 }]),
            _ => None,
        }
    }

    /// Write a transform or visibility property.
    ///
    /// Returns false for unknown properties or a value of the wrong width.
    pub fn write_property(&mut self, property: &str, value: &[f32]) -> bool {
        match (property, value) {
            ("position", [x, y, z]) => self.transform.position = [*x, *y, *z],
            ("quaternion", [x, y, z, w]) => self.transform.quaternion = [*x, *y, *z, *w],
            ("scale", [x, y, z]) => self.transform.scale = [*x, *y, *z],
            ("visible", [v]) => self.visible = *v >= 0.5,
            _ => return false,
        }
        true
    }
}

/// A node in the scene graph.
///
/// Implementors expose their [`Object3D`]; lifecycle methods default to
/// recursing into children so a whole tree can be driven from its root.
pub trait SceneNode: std::fmt::Debug {
    /// Shared object data
    fn object(&self) -> &Object3D;

    /// Shared object data, mutable
    fn object_mut(&mut self) -> &mut Object3D;

    /// Node kind
    fn kind(&self) -> NodeKind;

    /// Node name
    fn name(&self) -> &str {
        &self.object().name
    }

    /// Prepare the node and its children
    fn initialize(&mut self) {
        let object = self.object_mut();
        for child in &mut object.children {
            child.initialize();
        }
        object.state = LifecycleState::Initialized;
    }

    /// Advance the node and its children
    fn update(&mut self, delta: f32) {
        let object = self.object_mut();
        object.elapsed += delta;
        for child in &mut object.children {
            child.update(delta);
        }
    }

    /// Release resources held by the node and its children
    fn dispose(&mut self) {
        self.object_mut().dispose_children();
    }

    /// Read an animatable property
    fn read_property(&self, property: &str) -> Option<Vec<f32>> {
        self.object().read_property(property)
    }

    /// Write an animatable property
    fn write_property(&mut self, property: &str, value: &[f32]) -> bool {
        self.object_mut().write_property(property, value)
    }
}

/// Empty container node
#[derive(Debug)]
pub struct Group {
    object: Object3D,
}

impl Group {
    /// Create a group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            object: Object3D::new(name),
        }
    }

    /// Builder: attach a child
    pub fn with_child(mut self, child: impl SceneNode + 'static) -> Self {
        self.object.add(Box::new(child));
        self
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new("group")
    }
}

impl SceneNode for Group {
    fn object(&self) -> &Object3D {
        &self.object
    }

    fn object_mut(&mut self) -> &mut Object3D {
        &mut self.object
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Group
    }
}
