// SPDX-License-Identifier: MIT OR Apache-2.0
//! Binding of tracks to scene node properties.

use serde::{Deserialize, Serialize};

/// Node property a track animates, written `node.property` in track names
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackBinding {
    /// Target node name
    pub node: String,
    /// Property path within the node (may itself contain dots)
    pub property: String,
}

impl TrackBinding {
    /// Create a binding to a node property
    pub fn new(node: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            property: property.into(),
        }
    }

    /// Parse a track name, splitting at the first dot.
    ///
    /// `"Cube.material.opacity"` binds node `Cube` to `material.opacity`.
    pub fn parse(track_name: &str) -> Option<Self> {
        let (node, property) = track_name.split_once('.')?;
        if node.is_empty() || property.is_empty() {
            return None;
        }
        Some(Self::new(node, property))
    }

    /// Track name for this binding
    pub fn track_name(&self) -> String {
        format!("{}.{}", self.node, self.property)
    }
}

/// Something the mixer can write sampled values into and editors can read from
pub trait AnimationTarget {
    /// Current value of a bound property, if the target has it
    fn read_property(&self, binding: &TrackBinding) -> Option<Vec<f32>>;

    /// Write a sampled value. Returns false when the binding does not resolve.
    fn write_property(&mut self, binding: &TrackBinding, value: &[f32]) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let binding = TrackBinding::parse("Cube.position").unwrap();
        assert_eq!(binding.node, "Cube");
        assert_eq!(binding.property, "position");

        let nested = TrackBinding::parse("Cube.material.opacity").unwrap();
        assert_eq!(nested.property, "material.opacity");
        assert_eq!(nested.track_name(), "Cube.material.opacity");
    }

    #[test]
    fn test_parse_rejects_unbound_names() {
        assert!(TrackBinding::parse("position").is_none());
        assert!(TrackBinding::parse(".position").is_none());
        assert!(TrackBinding::parse("Cube.").is_none());
    }
}
