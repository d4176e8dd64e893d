// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sprite node: a camera-facing quad.

use crate::node::{NodeKind, Object3D, SceneNode};
use crate::resource::Material;

/// Camera-facing textured quad
#[derive(Debug)]
pub struct Sprite {
    object: Object3D,
    /// Sprite material
    pub material: Material,
}

impl Sprite {
    /// Create a sprite named `sprite`
    pub fn new(material: Material) -> Self {
        Self {
            object: Object3D::new("sprite"),
            material,
        }
    }

    /// Builder: rename
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.object.name = name.into();
        self
    }
}

impl SceneNode for Sprite {
    fn object(&self) -> &Object3D {
        &self.object
    }

    fn object_mut(&mut self) -> &mut Object3D {
        &mut self.object
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Sprite
    }

    fn dispose(&mut self) {
        self.material.dispose();
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
