// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback mixer derived from an animation clip.
//!
//! The mixer samples its own copy of the clip's tracks. Editors must call
//! [`AnimationMixer::rebuild`] after every structural track edit.

use crate::binding::{AnimationTarget, TrackBinding};
use crate::clip::AnimationClip;
use crate::track::{KeyframeTrack, TrackId};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Stopped
    #[default]
    Stopped,
    /// Playing forward
    Playing,
    /// Paused
    Paused,
}

/// One track prepared for playback
#[derive(Debug, Clone)]
struct MixerChannel {
    track: KeyframeTrack,
    binding: Option<TrackBinding>,
}

/// Samples a clip over time and drives bound properties
#[derive(Debug, Clone)]
pub struct AnimationMixer {
    /// Current playback time
    time: f32,
    /// Playback state
    state: PlaybackState,
    /// Playback speed multiplier
    pub speed: f32,
    /// Whether playback wraps at the end
    pub looping: bool,
    duration: f32,
    channels: Vec<MixerChannel>,
    revision: u64,
}

impl AnimationMixer {
    /// Create a mixer for a clip
    pub fn new(clip: &AnimationClip) -> Self {
        let mut mixer = Self {
            time: 0.0,
            state: PlaybackState::Stopped,
            speed: 1.0,
            looping: true,
            duration: 0.0,
            channels: Vec::new(),
            revision: 0,
        };
        mixer.load(clip);
        mixer
    }

    /// Re-derive playback data from the clip, keeping time and state
    pub fn rebuild(&mut self, clip: &AnimationClip) {
        self.load(clip);
        self.revision += 1;
        tracing::debug!(
            "Mixer rebuilt for '{}' ({} channels, revision {})",
            clip.name,
            self.channels.len(),
            self.revision
        );
    }

    fn load(&mut self, clip: &AnimationClip) {
        self.channels = clip
            .tracks()
            .map(|track| MixerChannel {
                binding: track.binding(),
                track: track.clone(),
            })
            .collect();
        self.duration = clip.duration.max(clip.content_duration());
    }

    /// How many times the mixer has been rebuilt
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current playback time
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Playback length
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Number of tracks being played
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Advance playback with delta time
    pub fn update(&mut self, delta_time: f32) {
        if self.state != PlaybackState::Playing {
            return;
        }

        self.time += delta_time * self.speed;

        if self.time >= self.duration {
            if self.looping && self.duration > 0.0 {
                self.time %= self.duration;
            } else {
                self.time = self.duration;
                self.state = PlaybackState::Stopped;
            }
        }
    }

    /// Play from current position
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop and reset to beginning
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.time = 0.0;
    }

    /// Toggle play/pause
    pub fn toggle_playback(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused | PlaybackState::Stopped => self.play(),
        }
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Seek to specific time
    pub fn seek(&mut self, time: f32) {
        self.time = if time.is_finite() { time.max(0.0) } else { 0.0 };
    }

    /// Evaluate all tracks at the current time
    pub fn sample(&self) -> Vec<(TrackId, Vec<f32>)> {
        self.channels
            .iter()
            .map(|channel| (channel.track.id, channel.track.evaluate(self.time)))
            .collect()
    }

    /// Write every bound track into the target. Returns how many were applied.
    pub fn apply(&self, target: &mut dyn AnimationTarget) -> usize {
        let mut applied = 0;
        for channel in &self.channels {
            let Some(binding) = &channel.binding else {
                continue;
            };
            let value = channel.track.evaluate(self.time);
            if target.write_property(binding, &value) {
                applied += 1;
            }
        }
        applied
    }
}
