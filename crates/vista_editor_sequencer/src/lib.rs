// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe animation editing for Vista Editor.
//!
//! This crate provides:
//! - Keyframe tracks with parallel time/value buffers
//! - Track editing (sort, delete, move, shift, scale, trim, optimize)
//! - Animation clips with RON persistence
//! - A playback mixer that drives bound scene properties
//! - Per-keyframe and per-track editing controls
//! - An egui timeline panel
//!
//! ## Architecture
//!
//! The clip owns the tracks. The mixer and the timeline panel each hold data
//! derived from the clip and are refreshed through [`TimelineHost`] after
//! every structural edit made by a control.

pub mod binding;
pub mod clip;
pub mod controls;
pub mod error;
pub mod keyframe;
pub mod mixer;
pub mod track;
pub mod ui;

pub use binding::{AnimationTarget, TrackBinding};
pub use clip::{AnimationClip, ClipError, ClipId};
pub use controls::{
    DialogService, EditOutcome, KeyframeEditor, PresetDialogs, TimelineHost, TrackController,
    INVALID_TIME_MESSAGE,
};
pub use error::{parse_time, EditError, Result};
pub use keyframe::{Interpolation, InterpolationMode, Keyframe, KeyframeRef};
pub use mixer::{AnimationMixer, PlaybackState};
pub use track::{KeyframeTrack, TrackId, TrackValueType, KEYFRAME_TIME_THRESHOLD, OPTIMIZE_TOLERANCE};
pub use ui::{TimelineCommand, TimelinePanel, TimelineStyle};
