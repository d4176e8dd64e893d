// SPDX-License-Identifier: MIT OR Apache-2.0
//! Mesh node: geometry shaded by a material.

use crate::node::{NodeKind, Object3D, SceneNode};
use crate::resource::{Geometry, Material};

/// Geometry and material forming a renderable object
#[derive(Debug)]
pub struct Mesh {
    object: Object3D,
    /// Vertex data
    pub geometry: Geometry,
    /// Surface shading
    pub material: Material,
}

impl Mesh {
    /// Create a mesh named `model` that casts and receives shadows
    pub fn new(geometry: Geometry, material: Material) -> Self {
        let mut object = Object3D::new("model");
        object.cast_shadow = true;
        object.receive_shadow = true;
        Self {
            object,
            geometry,
            material,
        }
    }

    /// Builder: rename
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.object.name = name.into();
        self
    }
}

impl SceneNode for Mesh {
    fn object(&self) -> &Object3D {
        &self.object
    }

    fn object_mut(&mut self) -> &mut Object3D {
        &mut self.object
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Mesh
    }

    fn dispose(&mut self) {
        self.material.dispose();
        self.geometry.dispose();
        self.object.dispose_children();
    }

    fn read_property(&self, property: &str) -> Option<Vec<f32>> {
        match property.strip_prefix("material.") {
            Some(rest) => self.material.read_property(rest),
            None => self.object.read_property(property),
        }
    }

    fn write_property(&mut self, property: &str, value: &[f32]) -> bool {
        match property.strip_prefix("material.") {
            Some(rest) => self.material.write_property(rest, value),
            None => self.object.write_property(property, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Group, LifecycleState};

    #[test]
    fn test_defaults() {
        let mesh = Mesh::new(Geometry::cube(), Material::default());
        assert_eq!(mesh.name(), "model");
        assert!(mesh.object().cast_shadow);
        assert!(mesh.object().receive_shadow);
        assert_eq!(mesh.kind(), NodeKind::Mesh);
    }

    #[test]
    fn test_dispose_releases_resources() {
        let mut mesh = Mesh::new(Geometry::cube(), Material::default());
        mesh.object_mut().add(Box::new(Group::new("socket")));
        mesh.dispose();

        assert!(mesh.material.is_disposed());
        assert!(mesh.geometry.is_disposed());
        assert_eq!(mesh.object().state(), LifecycleState::Disposed);
        assert_eq!(
            mesh.object().find("socket").unwrap().object().state(),
            LifecycleState::Disposed
        );
    }

    #[test]
    fn test_material_properties() {
        let mut mesh = Mesh::new(Geometry::cube(), Material::default()).named("Cube");
        assert!(mesh.write_property("material.opacity", &[0.5]));
        assert_eq!(mesh.read_property("material.opacity"), Some(vec![0.5]));
        assert!(mesh.write_property("scale", &[2.0, 2.0, 2.0]));
        assert!(!mesh.write_property("material.metalness", &[1.0]));
    }
}
