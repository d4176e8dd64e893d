// SPDX-License-Identifier: MIT OR Apache-2.0
//! Renderer resources owned by scene nodes.

use serde::{Deserialize, Serialize};

/// Vertex data for a mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Geometry name
    pub name: String,
    /// Number of vertices
    pub vertex_count: usize,
    #[serde(skip)]
    disposed: bool,
}

impl Geometry {
    /// Create a geometry
    pub fn new(name: impl Into<String>, vertex_count: usize) -> Self {
        Self {
            name: name.into(),
            vertex_count,
            disposed: false,
        }
    }

    /// Unit cube
    pub fn cube() -> Self {
        Self::new("Box", 24)
    }

    /// Unit quad
    pub fn quad() -> Self {
        Self::new("Plane", 4)
    }

    /// Release GPU buffers
    pub fn dispose(&mut self) {
        if !self.disposed {
            tracing::debug!("Disposed geometry '{}'", self.name);
        }
        self.disposed = true;
    }

    /// Whether [`Geometry::dispose`] was called
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Surface shading parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name
    pub name: String,
    /// Base color (linear RGB)
    pub color: [f32; 3],
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Whether opacity is honoured when drawing
    pub transparent: bool,
    #[serde(skip)]
    disposed: bool,
}

impl Material {
    /// Create an opaque white material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            transparent: false,
            disposed: false,
        }
    }

    /// Builder: set color
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    /// Builder: set opacity, enabling transparency below 1
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.set_opacity(opacity);
        self
    }

    /// Set opacity, clamped to `[0, 1]`
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = self.opacity < 1.0;
    }

    /// Animatable material property
    pub fn read_property(&self, property: &str) -> Option<Vec<f32>> {
        match property {
            "opacity" => Some(vec![self.opacity]),
            "color" => Some(self.color.to_vec()),
            _ => None,
        }
    }

    /// Write an animatable material property
    pub fn write_property(&mut self, property: &str, value: &[f32]) -> bool {
        match (property, value) {
            ("opacity", [opacity]) => {
                self.set_opacity(*opacity);
                true
            }
            ("color", [r, g, b]) => {
                self.color = [*r, *g, *b];
                true
            }
            _ => false,
        }
    }

    /// Release shader and texture bindings
    pub fn dispose(&mut self) {
        if !self.disposed {
            tracing::debug!("Disposed material '{}'", self.name);
        }
        self.disposed = true;
    }

    /// Whether [`Material::dispose`] was called
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("Default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_properties() {
        let mut material = Material::new("Red").with_color([1.0, 0.0, 0.0]);
        assert_eq!(material.read_property("color"), Some(vec![1.0, 0.0, 0.0]));

        assert!(material.write_property("opacity", &[1.5]));
        assert_eq!(material.opacity, 1.0);
        assert!(!material.transparent);

        assert!(material.write_property("opacity", &[0.25]));
        assert!(material.transparent);

        assert!(!material.write_property("color", &[1.0]));
        assert!(!material.write_property("roughness", &[0.5]));
    }

    #[test]
    fn test_dispose() {
        let mut geometry = Geometry::cube();
        assert!(!geometry.is_disposed());
        geometry.dispose();
        geometry.dispose();
        assert!(geometry.is_disposed());
    }
}
