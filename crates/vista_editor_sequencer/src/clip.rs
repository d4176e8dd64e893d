// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation clip containing multiple tracks.

use crate::error::EditError;
use crate::track::{KeyframeTrack, TrackId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Clip persistence errors
#[derive(Debug, Error)]
pub enum ClipError {
    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Parsing failed
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// A loaded track breaks an invariant
    #[error("Invalid track '{name}': {source}")]
    InvalidTrack {
        /// Track name
        name: String,
        /// What is wrong with it
        #[source]
        source: EditError,
    },

    /// A track is stored under an id other than its own
    #[error("Track '{name}' is stored under a different id")]
    TrackIdMismatch {
        /// Track name
        name: String,
    },
}

/// Unique identifier for a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipId(pub Uuid);

impl ClipId {
    /// Create a new random clip ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

/// A named set of tracks played together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Unique clip ID
    pub id: ClipId,
    /// Clip name
    pub name: String,
    tracks: IndexMap<TrackId, KeyframeTrack>,
    /// Clip duration (can be longer than tracks)
    pub duration: f32,
    /// Frame rate
    pub frame_rate: f32,
}

impl AnimationClip {
    /// Create a new clip
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ClipId::new(),
            name: name.into(),
            tracks: IndexMap::new(),
            duration: 0.0,
            frame_rate: 30.0,
        }
    }

    /// Add a track, extending the duration to cover it
    pub fn add_track(&mut self, track: KeyframeTrack) -> TrackId {
        let id = track.id;
        self.duration = self.duration.max(track.duration());
        self.tracks.insert(id, track);
        id
    }

    /// Remove a track, keeping the order of the others
    pub fn remove_track(&mut self, track_id: TrackId) -> Option<KeyframeTrack> {
        self.tracks.shift_remove(&track_id)
    }

    /// Get a track
    pub fn track(&self, track_id: TrackId) -> Option<&KeyframeTrack> {
        self.tracks.get(&track_id)
    }

    /// Get a mutable track
    pub fn track_mut(&mut self, track_id: TrackId) -> Option<&mut KeyframeTrack> {
        self.tracks.get_mut(&track_id)
    }

    /// Get a track, or the error editors report for a missing one
    pub fn require_track_mut(&mut self, track_id: TrackId) -> Result<&mut KeyframeTrack, EditError> {
        self.tracks
            .get_mut(&track_id)
            .ok_or_else(|| EditError::operation("track no longer exists"))
    }

    /// Find a track by name
    pub fn track_by_name(&self, name: &str) -> Option<&KeyframeTrack> {
        self.tracks.values().find(|t| t.name == name)
    }

    /// Get all tracks
    pub fn tracks(&self) -> impl Iterator<Item = &KeyframeTrack> {
        self.tracks.values()
    }

    /// Get track count
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Get the duration based on track content
    pub fn content_duration(&self) -> f32 {
        self.tracks.values().map(KeyframeTrack::duration).fold(0.0, f32::max)
    }

    /// Set the duration to the end of the last keyframe
    pub fn reset_duration(&mut self) {
        self.duration = self.content_duration();
    }

    /// Convert time to frame number
    pub fn time_to_frame(&self, time: f32) -> u32 {
        (time.max(0.0) * self.frame_rate) as u32
    }

    /// Convert frame number to time
    pub fn frame_to_time(&self, frame: u32) -> f32 {
        frame as f32 / self.frame_rate
    }

    /// Check every track and its key
    pub fn validate(&self) -> Result<(), ClipError> {
        for (id, track) in &self.tracks {
            if *id != track.id {
                return Err(ClipError::TrackIdMismatch {
                    name: track.name.clone(),
                });
            }
            track.validate().map_err(|source| ClipError::InvalidTrack {
                name: track.name.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String, ClipError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Deserialize from RON, rejecting tracks that break invariants
    pub fn from_ron(source: &str) -> Result<Self, ClipError> {
        let clip: Self = ron::from_str(source)?;
        clip.validate()?;
        Ok(clip)
    }
}

impl Default for AnimationClip {
    fn default() -> Self {
        Self::new("Untitled Clip")
    }
}
