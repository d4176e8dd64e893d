// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe and track controls.
//!
//! Controls hold a [`TrackId`] (and keyframe index) rather than the track
//! itself. Each action asks the user through a [`DialogService`], edits the
//! clip, then tells the [`TimelineHost`] to rebuild the timeline and mixer.
//! A cancelled or rejected action changes nothing and triggers no rebuild.

use crate::clip::AnimationClip;
use crate::error::{parse_time, EditError, Result};
use crate::keyframe::InterpolationMode;
use crate::track::{KeyframeTrack, TrackId};
use std::collections::VecDeque;

/// Message shown when a typed number cannot be used
pub const INVALID_TIME_MESSAGE: &str = "Invalid time value!";

/// Blocking user dialogs
pub trait DialogService {
    /// Ask a yes/no question
    fn confirm(&mut self, message: &str) -> bool;

    /// Ask for text; `None` when the user dismisses the dialog
    fn prompt(&mut self, message: &str) -> Option<String>;

    /// Show a message
    fn alert(&mut self, message: &str);
}

/// The editor surrounding the timeline
pub trait TimelineHost {
    /// Redraw keyframe rows from the clip
    fn rebuild_timeline(&mut self, clip: &AnimationClip);

    /// Re-derive playback state from the clip
    fn rebuild_mixer(&mut self, clip: &AnimationClip);

    /// Move the playhead
    fn seek(&mut self, time: f32);

    /// Current playhead time
    fn current_time(&self) -> f32;

    /// Current value of the property a track animates
    fn current_value(&self, track: &KeyframeTrack) -> Option<Vec<f32>>;
}

/// Result of a control action that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The clip was changed
    Applied,
    /// The user backed out; nothing changed
    Cancelled,
}

/// Dialog service answering from a prepared script.
///
/// Used by the timeline panel, which collects answers inline, and by tests.
#[derive(Debug, Clone, Default)]
pub struct PresetDialogs {
    confirm: bool,
    answers: VecDeque<String>,
    alerts: Vec<String>,
    questions: Vec<String>,
}

impl PresetDialogs {
    /// Confirm every question and answer prompts in order
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            confirm: true,
            answers: answers.into_iter().map(Into::into).collect(),
            alerts: Vec::new(),
            questions: Vec::new(),
        }
    }

    /// Decline every confirmation
    pub fn declining() -> Self {
        Self::default()
    }

    /// Messages shown through `alert`
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Questions asked through `confirm` and `prompt`
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Take the collected alerts
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }
}

impl DialogService for PresetDialogs {
    fn confirm(&mut self, message: &str) -> bool {
        self.questions.push(message.to_string());
        self.confirm
    }

    fn prompt(&mut self, message: &str) -> Option<String> {
        self.questions.push(message.to_string());
        self.answers.pop_front()
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

/// Report a rejected edit to the user and pass it on
fn reject<T>(dialogs: &mut dyn DialogService, error: EditError) -> Result<T> {
    tracing::warn!("Edit rejected: {error}");
    let (EditError::InvalidInput(reason) | EditError::InvalidOperation(reason)) = &error;
    dialogs.alert(reason);
    Err(error)
}

/// Prompt for a number. `Ok(None)` when dismissed.
fn prompt_number(dialogs: &mut dyn DialogService, message: &str) -> Result<Option<f32>> {
    let Some(text) = dialogs.prompt(message) else {
        return Ok(None);
    };
    match parse_time(&text) {
        Ok(value) => Ok(Some(value)),
        Err(error) => {
            tracing::warn!("Edit rejected: {error}");
            dialogs.alert(INVALID_TIME_MESSAGE);
            Err(error)
        }
    }
}

fn resync(clip: &AnimationClip, host: &mut dyn TimelineHost) {
    host.rebuild_timeline(clip);
    host.rebuild_mixer(clip);
}

/// Edit the track, report failure, resync on success
fn commit<T>(
    clip: &mut AnimationClip,
    track_id: TrackId,
    host: &mut dyn TimelineHost,
    dialogs: &mut dyn DialogService,
    edit: impl FnOnce(&mut KeyframeTrack) -> Result<T>,
) -> Result<T> {
    let result = clip.require_track_mut(track_id).and_then(edit);
    match result {
        Ok(value) => {
            resync(clip, host);
            Ok(value)
        }
        Err(error) => reject(dialogs, error),
    }
}

/// Control bound to one keyframe of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyframeEditor {
    /// Track holding the keyframe
    pub track: TrackId,
    /// Keyframe index; invalid after any structural edit
    pub index: usize,
}

impl KeyframeEditor {
    /// Bind to a keyframe
    pub fn new(track: TrackId, index: usize) -> Self {
        Self { track, index }
    }

    /// Move the playhead onto this keyframe (double click)
    pub fn seek(&self, clip: &AnimationClip, host: &mut dyn TimelineHost) -> Result<f32> {
        let time = clip
            .track(self.track)
            .and_then(|track| track.keyframe(self.index))
            .map(|keyframe| keyframe.time)
            .ok_or_else(|| EditError::operation("keyframe no longer exists"))?;
        host.seek(time);
        Ok(time)
    }

    /// Delete this keyframe after confirmation
    pub fn delete(
        &self,
        clip: &mut AnimationClip,
        host: &mut dyn TimelineHost,
        dialogs: &mut dyn DialogService,
    ) -> Result<EditOutcome> {
        if !dialogs.confirm("Delete keyframe?") {
            return Ok(EditOutcome::Cancelled);
        }

        let index = self.index;
        let removed = commit(clip, self.track, host, dialogs, |track| track.delete_keyframe(index))?;
        tracing::debug!("Deleted keyframe {} at {}s", index, removed.time);
        Ok(EditOutcome::Applied)
    }

    /// Move this keyframe to a typed time
    pub fn move_to(
        &self,
        clip: &mut AnimationClip,
        host: &mut dyn TimelineHost,
        dialogs: &mut dyn DialogService,
    ) -> Result<EditOutcome> {
        let Some(time) = prompt_number(dialogs, "Keyframe time")? else {
            return Ok(EditOutcome::Cancelled);
        };

        let index = self.index;
        let new_index = commit(clip, self.track, host, dialogs, |track| track.move_keyframe(index, time))?;
        tracing::debug!("Moved keyframe {} to {}s (now index {})", index, time, new_index);
        Ok(EditOutcome::Applied)
    }
}

/// Control bound to a whole track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackController {
    /// Controlled track
    pub track: TrackId,
}

impl TrackController {
    /// Bind to a track
    pub fn new(track: TrackId) -> Self {
        Self { track }
    }

    /// Key the bound property's current value at the playhead
    pub fn add_keyframe(
        &self,
        clip: &mut AnimationClip,
        host: &mut dyn TimelineHost,
        dialogs: &mut dyn DialogService,
    ) -> Result<EditOutcome> {
        let time = host.current_time();
        let value = match clip.track(self.track) {
            Some(track) => host.current_value(track),
            None => return reject(dialogs, EditError::operation("track no longer exists")),
        };
        let Some(value) = value else {
            return reject(dialogs, EditError::operation("animated object has no value for this track"));
        };

        let index = commit(clip, self.track, host, dialogs, |track| track.insert_keyframe(time, &value))?;
        tracing::debug!("Keyed index {} at {}s", index, time);
        Ok(EditOutcome::Applied)
    }

    /// Remove the track from the clip after confirmation
    pub fn delete_track(
        &self,
        clip: &mut AnimationClip,
        host: &mut dyn TimelineHost,
        dialogs: &mut dyn DialogService,
    ) -> Result<EditOutcome> {
        if !dialogs.confirm("Delete track?") {
            return Ok(EditOutcome::Cancelled);
        }

        match clip.remove_track(self.track) {
            Some(track) => {
                tracing::debug!("Deleted track '{}'", track.name);
                resync(clip, host);
                Ok(EditOutcome::Applied)
            }
            None => reject(dialogs, EditError::operation("Unable to delete track")),
        }
    }

    /// Drop keyframes that do not change the curve
    pub fn optimize(
        &self,
        clip: &mut AnimationClip,
        host: &mut dyn TimelineHost,
        dialogs: &mut dyn DialogService,
    ) -> Result<usize> {
        let removed = commit(clip, self.track, host, dialogs, |track| Ok(track.optimize()))?;
        tracing::debug!("Optimized track, removed {} keyframes", removed);
        Ok(removed)
    }

    /// Offset every keyframe by a typed amount
    pub fn shift(
        &self,
        clip: &mut AnimationClip,
        host: &mut dyn TimelineHost,
        dialogs: &mut dyn DialogService,
    ) -> Result<EditOutcome> {
        let Some(delta) = prompt_number(dialogs, "Time to shift track")? else {
            return Ok(EditOutcome::Cancelled);
        };

        commit(clip, self.track, host, dialogs, |track| track.shift(delta))?;
        Ok(EditOutcome::Applied)
    }

    /// Scale keyframe times by a typed factor
    pub fn scale(
        &self,
        clip: &mut AnimationClip,
        host: &mut dyn TimelineHost,
        dialogs: &mut dyn DialogService,
    ) -> Result<EditOutcome> {
        let Some(factor) = prompt_number(dialogs, "Time scale factor")? else {
            return Ok(EditOutcome::Cancelled);
        };

        commit(clip, self.track, host, dialogs, |track| track.scale(factor))?;
        Ok(EditOutcome::Applied)
    }

    /// Keep only keyframes between two typed times
    pub fn trim(
        &self,
        clip: &mut AnimationClip,
        host: &mut dyn TimelineHost,
        dialogs: &mut dyn DialogService,
    ) -> Result<EditOutcome> {
        let Some(start) = prompt_number(dialogs, "Start time")? else {
            return Ok(EditOutcome::Cancelled);
        };
        let Some(end) = prompt_number(dialogs, "End time")? else {
            return Ok(EditOutcome::Cancelled);
        };

        let removed = commit(clip, self.track, host, dialogs, |track| track.trim(start, end))?;
        tracing::debug!("Trimmed track to [{}, {}], removed {} keyframes", start, end, removed);
        Ok(EditOutcome::Applied)
    }

    /// Change the track's interpolation
    pub fn set_interpolation(
        &self,
        clip: &mut AnimationClip,
        host: &mut dyn TimelineHost,
        dialogs: &mut dyn DialogService,
        mode: InterpolationMode,
    ) -> Result<EditOutcome> {
        commit(clip, self.track, host, dialogs, |track| track.set_interpolation(mode))?;
        Ok(EditOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackValueType;

    #[derive(Default)]
    struct RecordingHost {
        timeline_rebuilds: usize,
        mixer_rebuilds: usize,
        time: f32,
        value: Option<Vec<f32>>,
    }

    impl TimelineHost for RecordingHost {
        fn rebuild_timeline(&mut self, _clip: &AnimationClip) {
            self.timeline_rebuilds += 1;
        }

        fn rebuild_mixer(&mut self, _clip: &AnimationClip) {
            self.mixer_rebuilds += 1;
        }

        fn seek(&mut self, time: f32) {
            self.time = time;
        }

        fn current_time(&self) -> f32 {
            self.time
        }

        fn current_value(&self, _track: &KeyframeTrack) -> Option<Vec<f32>> {
            self.value.clone()
        }
    }

    impl RecordingHost {
        fn rebuilds(&self) -> (usize, usize) {
            (self.timeline_rebuilds, self.mixer_rebuilds)
        }
    }

    fn setup(times: &[f32]) -> (AnimationClip, TrackId) {
        let values: Vec<f32> = times.iter().map(|t| t * 10.0).collect();
        let mut clip = AnimationClip::new("Test");
        let id = clip.add_track(
            KeyframeTrack::new("Cube.opacity", TrackValueType::Number, times.to_vec(), values).unwrap(),
        );
        (clip, id)
    }

    #[test]
    fn test_delete_keyframe_resyncs_once() {
        let (mut clip, id) = setup(&[0.0, 1.0, 2.0]);
        let mut host = RecordingHost::default();
        let mut dialogs = PresetDialogs::new(Vec::<String>::new());

        let outcome = KeyframeEditor::new(id, 1).delete(&mut clip, &mut host, &mut dialogs).unwrap();
        assert_eq!(outcome, EditOutcome::Applied);
        assert_eq!(clip.track(id).unwrap().times(), &[0.0, 2.0]);
        assert_eq!(host.rebuilds(), (1, 1));
        assert_eq!(dialogs.questions(), &["Delete keyframe?".to_string()]);
    }

    #[test]
    fn test_delete_declined() {
        let (mut clip, id) = setup(&[0.0, 1.0]);
        let mut host = RecordingHost::default();
        let mut dialogs = PresetDialogs::declining();

        let outcome = KeyframeEditor::new(id, 0).delete(&mut clip, &mut host, &mut dialogs).unwrap();
        assert_eq!(outcome, EditOutcome::Cancelled);
        assert_eq!(clip.track(id).unwrap().len(), 2);
        assert_eq!(host.rebuilds(), (0, 0));
    }

    #[test]
    fn test_delete_last_keyframe_alerts() {
        let (mut clip, id) = setup(&[0.0]);
        let mut host = RecordingHost::default();
        let mut dialogs = PresetDialogs::new(Vec::<String>::new());

        let result = KeyframeEditor::new(id, 0).delete(&mut clip, &mut host, &mut dialogs);
        assert!(matches!(result, Err(EditError::InvalidOperation(_))));
        assert_eq!(clip.track(id).unwrap().len(), 1);
        assert_eq!(host.rebuilds(), (0, 0));
        assert_eq!(dialogs.alerts(), &["track needs at least one keyframe".to_string()]);
    }

    #[test]
    fn test_move_keyframe() {
        let (mut clip, id) = setup(&[0.0, 1.0, 2.0]);
        let mut host = RecordingHost::default();
        let mut dialogs = PresetDialogs::new(["5"]);

        KeyframeEditor::new(id, 0).move_to(&mut clip, &mut host, &mut dialogs).unwrap();
        let track = clip.track(id).unwrap();
        assert_eq!(track.times(), &[1.0, 2.0, 5.0]);
        assert_eq!(track.values(), &[10.0, 20.0, 0.0]);
        assert_eq!(host.rebuilds(), (1, 1));
    }

    #[test]
    fn test_move_rejects_bad_number() {
        let (mut clip, id) = setup(&[0.0, 1.0]);
        let mut host = RecordingHost::default();
        let mut dialogs = PresetDialogs::new(["soon"]);

        let result = KeyframeEditor::new(id, 0).move_to(&mut clip, &mut host, &mut dialogs);
        assert!(matches!(result, Err(EditError::InvalidInput(_))));
        assert_eq!(clip.track(id).unwrap().times(), &[0.0, 1.0]);
        assert_eq!(dialogs.alerts(), &[INVALID_TIME_MESSAGE.to_string()]);
        assert_eq!(host.rebuilds(), (0, 0));
    }

    #[test]
    fn test_move_dismissed_prompt() {
        let (mut clip, id) = setup(&[0.0, 1.0]);
        let mut host = RecordingHost::default();
        let mut dialogs = PresetDialogs::new(Vec::<String>::new());

        let outcome = KeyframeEditor::new(id, 0).move_to(&mut clip, &mut host, &mut dialogs).unwrap();
        assert_eq!(outcome, EditOutcome::Cancelled);
        assert_eq!(host.rebuilds(), (0, 0));
    }

    #[test]
    fn test_stale_keyframe_editor() {
        let (mut clip, id) = setup(&[0.0, 1.0, 2.0]);
        let mut host = RecordingHost::default();
        let mut dialogs = PresetDialogs::new(["0.5"]);

        let last = KeyframeEditor::new(id, 2);
        KeyframeEditor::new(id, 0).delete(&mut clip, &mut host, &mut dialogs).unwrap();

        assert!(last.move_to(&mut clip, &mut host, &mut dialogs).is_err());
        assert!(last.seek(&clip, &mut host).is_err());
        assert_eq!(host.rebuilds(), (1, 1));
    }

    #[test]
    fn test_seek() {
        let (clip, id) = setup(&[0.0, 1.5]);
        let mut host = RecordingHost::default();
        assert_eq!(KeyframeEditor::new(id, 1).seek(&clip, &mut host).unwrap(), 1.5);
        assert_eq!(host.time, 1.5);
    }

    #[test]
    fn test_add_keyframe_at_playhead() {
        let (mut clip, id) = setup(&[0.0, 2.0]);
        let mut host = RecordingHost {
            time: 1.0,
            value: Some(vec![42.0]),
            ..Default::default()
        };
        let mut dialogs = PresetDialogs::default();

        TrackController::new(id).add_keyframe(&mut clip, &mut host, &mut dialogs).unwrap();
        let track = clip.track(id).unwrap();
        assert_eq!(track.times(), &[0.0, 1.0, 2.0]);
        assert_eq!(track.values(), &[0.0, 42.0, 20.0]);
        assert_eq!(host.rebuilds(), (1, 1));
    }

    #[test]
    fn test_add_keyframe_without_value() {
        let (mut clip, id) = setup(&[0.0]);
        let mut host = RecordingHost::default();
        let mut dialogs = PresetDialogs::default();

        let result = TrackController::new(id).add_keyframe(&mut clip, &mut host, &mut dialogs);
        assert!(result.is_err());
        assert_eq!(dialogs.alerts().len(), 1);
        assert_eq!(host.rebuilds(), (0, 0));
    }

    #[test]
    fn test_delete_track() {
        let (mut clip, id) = setup(&[0.0]);
        let mut host = RecordingHost::default();
        let mut dialogs = PresetDialogs::new(Vec::<String>::new());
        let controller = TrackController::new(id);

        controller.delete_track(&mut clip, &mut host, &mut dialogs).unwrap();
        assert_eq!(clip.track_count(), 0);

        let again = controller.delete_track(&mut clip, &mut host, &mut dialogs);
        assert!(again.is_err());
        assert_eq!(dialogs.alerts(), &["Unable to delete track".to_string()]);
        assert_eq!(host.rebuilds(), (1, 1));
    }

    #[test]
    fn test_shift_and_trim() {
        let (mut clip, id) = setup(&[0.0, 1.0, 2.0, 3.0]);
        let mut host = RecordingHost::default();
        let mut dialogs = PresetDialogs::new(["10", "11", "12"]);
        let controller = TrackController::new(id);

        controller.shift(&mut clip, &mut host, &mut dialogs).unwrap();
        assert_eq!(clip.track(id).unwrap().times(), &[10.0, 11.0, 12.0, 13.0]);

        controller.trim(&mut clip, &mut host, &mut dialogs).unwrap();
        assert_eq!(clip.track(id).unwrap().times(), &[11.0, 12.0]);
        assert_eq!(
            dialogs.questions(),
            &["Time to shift track".to_string(), "Start time".to_string(), "End time".to_string()]
        );
        assert_eq!(host.rebuilds(), (2, 2));
    }

    #[test]
    fn test_trim_validates_both_bounds() {
        let (mut clip, id) = setup(&[0.0, 1.0]);
        let mut host = RecordingHost::default();
        let mut dialogs = PresetDialogs::new(["0", "later"]);

        let result = TrackController::new(id).trim(&mut clip, &mut host, &mut dialogs);
        assert!(matches!(result, Err(EditError::InvalidInput(_))));
        assert_eq!(clip.track(id).unwrap().len(), 2);
        assert_eq!(host.rebuilds(), (0, 0));
    }

    #[test]
    fn test_trim_that_empties_track() {
        let (mut clip, id) = setup(&[0.0, 1.0]);
        let mut host = RecordingHost::default();
        let mut dialogs = PresetDialogs::new(["4", "5"]);

        let result = TrackController::new(id).trim(&mut clip, &mut host, &mut dialogs);
        assert!(matches!(result, Err(EditError::InvalidOperation(_))));
        assert_eq!(clip.track(id).unwrap().len(), 2);
    }

    #[test]
    fn test_optimize_and_interpolation() {
        let (mut clip, id) = setup(&[0.0, 1.0, 2.0]);
        let mut host = RecordingHost::default();
        let mut dialogs = PresetDialogs::default();
        let controller = TrackController::new(id);

        assert_eq!(controller.optimize(&mut clip, &mut host, &mut dialogs).unwrap(), 1);
        controller
            .set_interpolation(&mut clip, &mut host, &mut dialogs, InterpolationMode::Smooth)
            .unwrap();
        assert_eq!(clip.track(id).unwrap().interpolation(), InterpolationMode::Smooth);
        assert_eq!(host.rebuilds(), (2, 2));
    }

    #[test]
    fn test_scale() {
        let (mut clip, id) = setup(&[0.0, 1.0]);
        let mut host = RecordingHost::default();
        let mut dialogs = PresetDialogs::new(["2", "-1"]);
        let controller = TrackController::new(id);

        controller.scale(&mut clip, &mut host, &mut dialogs).unwrap();
        assert_eq!(clip.track(id).unwrap().times(), &[0.0, 2.0]);
        assert!(controller.scale(&mut clip, &mut host, &mut dialogs).is_err());
        assert_eq!(clip.track(id).unwrap().times(), &[0.0, 2.0]);
    }
}
