// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene graph for Vista Editor.
//!
//! Nodes share a common [`Object3D`] (name, transform, children) and add
//! behaviour through the [`SceneNode`] trait. Renderer resources are owned
//! by the nodes that use them and released on dispose.

pub mod mesh;
pub mod node;
pub mod resource;
pub mod scene;
pub mod sprite;

pub use mesh::Mesh;
pub use node::{Group, LifecycleState, NodeId, NodeKind, Object3D, SceneNode, Transform};
pub use resource::{Geometry, Material};
pub use scene::Scene;
pub use sprite::Sprite;
