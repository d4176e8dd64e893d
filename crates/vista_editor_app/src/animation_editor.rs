// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation editing session: clip, scene, mixer and timeline together.
//!
//! The editor owns the clip. Everything derived from it (the mixer's
//! playback copy and the timeline rows) lives in [`EditorSession`], which is
//! the host the sequencer controls call back into after each edit.

use crate::app::Result;
use crate::history::{History, Snapshot};
use std::path::{Path, PathBuf};
use vista_editor_scene::{Geometry, Group, Material, Mesh, Scene, Sprite};
use vista_editor_sequencer::{
    AnimationClip, AnimationMixer, AnimationTarget, EditError, EditOutcome, InterpolationMode,
    KeyframeTrack, TimelineCommand, TimelineHost, TimelinePanel, TimelineStyle, TrackBinding,
    TrackValueType,
};

/// Scene adapter the mixer writes into
struct SceneTarget<'a>(&'a mut Scene);

impl AnimationTarget for SceneTarget<'_> {
    fn read_property(&self, binding: &TrackBinding) -> Option<Vec<f32>> {
        self.0.read_property(&binding.node, &binding.property)
    }

    fn write_property(&mut self, binding: &TrackBinding, value: &[f32]) -> bool {
        self.0.write_property(&binding.node, &binding.property, value)
    }
}

/// State derived from the clip, refreshed after every edit
pub struct EditorSession {
    /// Playback
    pub mixer: AnimationMixer,
    /// Animated scene
    pub scene: Scene,
    /// Timeline view
    pub timeline: TimelinePanel,
}

impl EditorSession {
    /// Write the mixer's current sample into the scene
    fn pose_scene(&mut self) -> usize {
        self.mixer.apply(&mut SceneTarget(&mut self.scene))
    }
}

impl TimelineHost for EditorSession {
    fn rebuild_timeline(&mut self, clip: &AnimationClip) {
        self.timeline.rebuild(clip);
    }

    fn rebuild_mixer(&mut self, clip: &AnimationClip) {
        self.mixer.rebuild(clip);
        self.pose_scene();
    }

    fn seek(&mut self, time: f32) {
        self.mixer.seek(time);
        self.pose_scene();
    }

    fn current_time(&self) -> f32 {
        self.mixer.time()
    }

    fn current_value(&self, track: &KeyframeTrack) -> Option<Vec<f32>> {
        let binding = track.binding()?;
        self.scene.read_property(&binding.node, &binding.property)
    }
}

/// The animation editor
pub struct AnimationEditor {
    clip: AnimationClip,
    session: EditorSession,
    history: History,
    clip_path: Option<PathBuf>,
    dirty: bool,
}

impl AnimationEditor {
    /// Open a clip against a scene
    pub fn new(clip: AnimationClip, mut scene: Scene, style: TimelineStyle, history_depth: usize) -> Self {
        scene.initialize();
        let mut session = EditorSession {
            mixer: AnimationMixer::new(&clip),
            scene,
            timeline: TimelinePanel::new(style),
        };
        session.timeline.rebuild(&clip);
        session.pose_scene();

        Self {
            clip,
            session,
            history: History::with_max_depth(history_depth),
            clip_path: None,
            dirty: false,
        }
    }

    /// Editor with the demo scene and clip
    pub fn demo(style: TimelineStyle, history_depth: usize, frame_rate: f32) -> Result<Self> {
        let mut clip = demo_clip()?;
        clip.frame_rate = frame_rate;
        Ok(Self::new(clip, demo_scene(), style, history_depth))
    }

    /// The clip being edited
    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    /// Derived session state
    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    /// Derived session state, mutable
    pub fn session_mut(&mut self) -> &mut EditorSession {
        &mut self.session
    }

    /// Undo history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Path the clip was loaded from or saved to
    pub fn clip_path(&self) -> Option<&Path> {
        self.clip_path.as_deref()
    }

    /// Unsaved edits exist
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Apply one timeline command, recording it for undo when it edits
    pub fn apply_command(&mut self, command: &TimelineCommand) -> std::result::Result<EditOutcome, EditError> {
        let before = if command.is_edit() {
            match Snapshot::from_value(&self.clip) {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    tracing::warn!("Could not snapshot clip for undo: {err}");
                    None
                }
            }
        } else {
            None
        };

        let mut dialogs = command.dialogs();
        let result = command.apply(&mut self.clip, &mut self.session, &mut dialogs);

        match dialogs.take_alerts().pop() {
            Some(alert) => self.session.timeline.set_status(alert),
            None if result.is_ok() => self.session.timeline.clear_status(),
            None => {}
        }

        if let (Ok(EditOutcome::Applied), Some(before)) = (&result, before) {
            self.dirty = true;
            match Snapshot::from_value(&self.clip) {
                Ok(after) => {
                    self.history.record(command.description(), before, after);
                }
                Err(err) => tracing::warn!("Could not snapshot clip for undo: {err}"),
            }
        }

        result
    }

    /// Apply every command the timeline queued this frame
    pub fn process_commands(&mut self) {
        for command in self.session.timeline.drain_commands() {
            if let Err(err) = self.apply_command(&command) {
                tracing::debug!("{} rejected: {err}", command.description());
            }
        }
    }

    /// Restore the clip from a snapshot and resync everything derived from it
    fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.clip = snapshot.to_value()?;
        self.session.rebuild_timeline(&self.clip);
        self.session.rebuild_mixer(&self.clip);
        self.dirty = true;
        Ok(())
    }

    /// Undo the last edit
    pub fn undo(&mut self) -> Result<()> {
        let operation = self.history.undo()?;
        self.restore(&operation.before)?;
        tracing::debug!("Undid '{}'", operation.description);
        Ok(())
    }

    /// Redo the last undone edit
    pub fn redo(&mut self) -> Result<()> {
        let operation = self.history.redo()?;
        self.restore(&operation.after)?;
        tracing::debug!("Redid '{}'", operation.description);
        Ok(())
    }

    /// Advance playback and pose the scene
    pub fn update(&mut self, delta_time: f32) {
        let was_playing = self.session.mixer.is_playing();
        self.session.mixer.update(delta_time);
        if was_playing {
            self.session.pose_scene();
        }
        self.session.scene.update(delta_time);
    }

    /// Save the clip as RON
    pub fn save(&mut self, path: &Path) -> Result<()> {
        std::fs::write(path, self.clip.to_ron()?)?;
        self.clip_path = Some(path.to_path_buf());
        self.dirty = false;
        tracing::info!("Saved clip '{}' to {}", self.clip.name, path.display());
        Ok(())
    }

    /// Replace the clip with one loaded from RON
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        self.clip = AnimationClip::from_ron(&content)?;
        self.history.clear();
        self.session.mixer.stop();
        self.session.rebuild_timeline(&self.clip);
        self.session.rebuild_mixer(&self.clip);
        self.clip_path = Some(path.to_path_buf());
        self.dirty = false;
        tracing::info!(
            "Loaded clip '{}' ({} tracks) from {}",
            self.clip.name,
            self.clip.track_count(),
            path.display()
        );
        Ok(())
    }

    /// Transport bar
    pub fn transport_ui(&mut self, ui: &mut egui::Ui) {
        let mixer = &mut self.session.mixer;
        let mut stopped = false;
        ui.horizontal(|ui| {
            if ui.button("\u{23EE}").on_hover_text("Stop").clicked() {
                mixer.stop();
                stopped = true;
            }
            let play_label = if mixer.is_playing() { "\u{23F8}" } else { "\u{25B6}" };
            if ui.button(play_label).on_hover_text("Play/Pause (Space)").clicked() {
                mixer.toggle_playback();
            }

            ui.separator();

            let frame = self.clip.time_to_frame(mixer.time());
            ui.label(format!("{:.3}s / {:.2}s", mixer.time(), mixer.duration()));
            ui.label(format!("Frame {frame}"));

            ui.separator();

            ui.checkbox(&mut mixer.looping, "Loop");
            ui.label("Speed:");
            ui.add(egui::DragValue::new(&mut mixer.speed).range(0.1..=4.0).speed(0.01).suffix("x"));
        });

        if stopped {
            self.session.pose_scene();
        }
    }

    /// Scene outline with the current value of every animated property
    pub fn scene_ui(&self, ui: &mut egui::Ui) {
        ui.heading(&self.session.scene.name);
        ui.separator();
        egui::Grid::new("animated_properties")
            .striped(true)
            .num_columns(2)
            .show(ui, |ui| {
                for track in self.clip.tracks() {
                    ui.label(&track.name);
                    let value = self.session.current_value(track);
                    match value {
                        Some(value) => {
                            let text: Vec<String> = value.iter().map(|v| format!("{v:.3}")).collect();
                            ui.monospace(text.join(", "));
                        }
                        None => {
                            ui.weak("unbound");
                        }
                    }
                    ui.end_row();
                }
            });
    }

    /// Timeline panel
    pub fn timeline_ui(&mut self, ui: &mut egui::Ui) {
        let time = self.session.mixer.time();
        self.session.timeline.ui(ui, time);
        self.process_commands();
    }
}

/// Demo scene: a cube and a sprite under a rig
pub fn demo_scene() -> Scene {
    let mut scene = Scene::new("Demo Scene");
    scene.add(Mesh::new(Geometry::cube(), Material::new("Cube Material")).named("Cube"));
    scene.add(
        Group::new("Rig").with_child(
            Sprite::new(Material::new("Flare Material").with_color([1.0, 0.8, 0.2])).named("Flare"),
        ),
    );
    scene
}

/// Demo clip animating the demo scene
pub fn demo_clip() -> std::result::Result<AnimationClip, EditError> {
    let mut clip = AnimationClip::new("Demo Clip");
    clip.add_track(KeyframeTrack::new(
        "Cube.position",
        TrackValueType::Vector3,
        vec![0.0, 1.0, 2.0],
        vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 0.0],
    )?);
    let half = std::f32::consts::FRAC_1_SQRT_2;
    clip.add_track(KeyframeTrack::new(
        "Cube.quaternion",
        TrackValueType::Quaternion,
        vec![0.0, 2.0],
        vec![0.0, 0.0, 0.0, 1.0, 0.0, half, 0.0, half],
    )?);
    clip.add_track(
        KeyframeTrack::new(
            "Cube.material.opacity",
            TrackValueType::Number,
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.3, 1.0],
        )?
        .with_interpolation(InterpolationMode::Smooth)?,
    );
    clip.add_track(KeyframeTrack::new(
        "Flare.visible",
        TrackValueType::Boolean,
        vec![0.0, 1.5],
        vec![1.0, 0.0],
    )?);
    clip.add_track(KeyframeTrack::new(
        "Flare.material.color",
        TrackValueType::Color,
        vec![0.0, 2.0],
        vec![1.0, 0.8, 0.2, 0.2, 0.4, 1.0],
    )?);
    Ok(clip)
}
