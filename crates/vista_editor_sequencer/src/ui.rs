// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline panel UI rendering.
//!
//! Features:
//! - Time ruler with a draggable playhead
//! - One row per track with an interpolation selector
//! - Keyframe diamonds with context menus (delete, move)
//! - Track context menu (add keyframe, delete, optimize, shift, scale, trim)
//! - Zoom/pan navigation
//!
//! The panel never edits the clip while drawing. User actions are queued as
//! [`TimelineCommand`]s for the owner to apply; the panel redraws from rows
//! cached by [`TimelinePanel::rebuild`].

use crate::clip::AnimationClip;
use crate::controls::{
    DialogService, EditOutcome, KeyframeEditor, PresetDialogs, TimelineHost, TrackController,
};
use crate::error::Result;
use crate::keyframe::InterpolationMode;
use crate::track::{TrackId, TrackValueType};
use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};

const TRACK_HEIGHT: f32 = 28.0;
const TRACK_HEADER_WIDTH: f32 = 260.0;
const TIMELINE_HEADER_HEIGHT: f32 = 28.0;
const KEYFRAME_SIZE: f32 = 10.0;
const PLAYHEAD_WIDTH: f32 = 2.0;
const MIN_ZOOM: f32 = 20.0;
const MAX_ZOOM: f32 = 500.0;
const DEFAULT_ZOOM: f32 = 100.0;
const MIN_SNAP_INTERVAL: f32 = 0.01;
const MAX_SNAP_INTERVAL: f32 = 1.0;
const DEFAULT_SNAP_INTERVAL: f32 = 0.1;

/// Colors used by the timeline, supplied by the editor theme
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineStyle {
    /// Panel background
    pub background: Color32,
    /// Ruler and track header background
    pub header_background: Color32,
    /// Even row background
    pub row_even: Color32,
    /// Odd row background
    pub row_odd: Color32,
    /// Primary text
    pub text: Color32,
    /// Secondary text and minor ticks
    pub text_dim: Color32,
    /// Playhead line
    pub playhead: Color32,
    /// Selected keyframe fill
    pub selection: Color32,
    /// Keyframe outline
    pub outline: Color32,
}

impl Default for TimelineStyle {
    fn default() -> Self {
        Self {
            background: Color32::from_gray(30),
            header_background: Color32::from_gray(40),
            row_even: Color32::from_gray(32),
            row_odd: Color32::from_gray(28),
            text: Color32::from_gray(200),
            text_dim: Color32::from_gray(120),
            playhead: Color32::from_rgb(255, 100, 100),
            selection: Color32::from_rgb(255, 200, 100),
            outline: Color32::from_gray(80),
        }
    }
}

/// A user action recorded by the panel
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineCommand {
    /// Move the playhead (ruler drag)
    Seek(f32),
    /// Move the playhead onto a keyframe (double click)
    SeekKeyframe {
        /// Track
        track: TrackId,
        /// Keyframe index
        index: usize,
    },
    /// Delete a keyframe
    DeleteKeyframe {
        /// Track
        track: TrackId,
        /// Keyframe index
        index: usize,
    },
    /// Move a keyframe to the typed time
    MoveKeyframe {
        /// Track
        track: TrackId,
        /// Keyframe index
        index: usize,
        /// Time as typed
        time: String,
    },
    /// Key the current value at the playhead
    AddKeyframe {
        /// Track
        track: TrackId,
    },
    /// Remove a track
    DeleteTrack {
        /// Track
        track: TrackId,
    },
    /// Remove redundant keyframes
    OptimizeTrack {
        /// Track
        track: TrackId,
    },
    /// Offset a track by the typed amount
    ShiftTrack {
        /// Track
        track: TrackId,
        /// Delta as typed
        delta: String,
    },
    /// Scale a track's times by the typed factor
    ScaleTrack {
        /// Track
        track: TrackId,
        /// Factor as typed
        factor: String,
    },
    /// Keep keyframes between two typed times
    TrimTrack {
        /// Track
        track: TrackId,
        /// Start as typed
        start: String,
        /// End as typed
        end: String,
    },
    /// Change interpolation
    SetInterpolation {
        /// Track
        track: TrackId,
        /// New mode
        mode: InterpolationMode,
    },
}

impl TimelineCommand {
    /// Whether applying this command may change the clip
    pub fn is_edit(&self) -> bool {
        !matches!(self, Self::Seek(_) | Self::SeekKeyframe { .. })
    }

    /// Short description for history and logs
    pub fn description(&self) -> &'static str {
        match self {
            Self::Seek(_) | Self::SeekKeyframe { .. } => "Seek",
            Self::DeleteKeyframe { .. } => "Delete Keyframe",
            Self::MoveKeyframe { .. } => "Move Keyframe",
            Self::AddKeyframe { .. } => "Add Keyframe",
            Self::DeleteTrack { .. } => "Delete Track",
            Self::OptimizeTrack { .. } => "Optimize Track",
            Self::ShiftTrack { .. } => "Shift Track",
            Self::ScaleTrack { .. } => "Scale Track",
            Self::TrimTrack { .. } => "Trim Track",
            Self::SetInterpolation { .. } => "Set Interpolation",
        }
    }

    /// Dialog answers the panel collected for this command.
    ///
    /// Confirmations were given in the panel's menus, so they are accepted.
    pub fn dialogs(&self) -> PresetDialogs {
        match self {
            Self::MoveKeyframe { time, .. } => PresetDialogs::new([time.clone()]),
            Self::ShiftTrack { delta, .. } => PresetDialogs::new([delta.clone()]),
            Self::ScaleTrack { factor, .. } => PresetDialogs::new([factor.clone()]),
            Self::TrimTrack { start, end, .. } => PresetDialogs::new([start.clone(), end.clone()]),
            _ => PresetDialogs::new(Vec::<String>::new()),
        }
    }

    /// Run the command against the clip
    pub fn apply(
        &self,
        clip: &mut AnimationClip,
        host: &mut dyn TimelineHost,
        dialogs: &mut dyn DialogService,
    ) -> Result<EditOutcome> {
        match self {
            Self::Seek(time) => {
                host.seek(*time);
                Ok(EditOutcome::Cancelled)
            }
            Self::SeekKeyframe { track, index } => {
                KeyframeEditor::new(*track, *index).seek(clip, host)?;
                Ok(EditOutcome::Cancelled)
            }
            Self::DeleteKeyframe { track, index } => {
                KeyframeEditor::new(*track, *index).delete(clip, host, dialogs)
            }
            Self::MoveKeyframe { track, index, .. } => {
                KeyframeEditor::new(*track, *index).move_to(clip, host, dialogs)
            }
            Self::AddKeyframe { track } => TrackController::new(*track).add_keyframe(clip, host, dialogs),
            Self::DeleteTrack { track } => TrackController::new(*track).delete_track(clip, host, dialogs),
            Self::OptimizeTrack { track } => {
                TrackController::new(*track).optimize(clip, host, dialogs)?;
                Ok(EditOutcome::Applied)
            }
            Self::ShiftTrack { track, .. } => TrackController::new(*track).shift(clip, host, dialogs),
            Self::ScaleTrack { track, .. } => TrackController::new(*track).scale(clip, host, dialogs),
            Self::TrimTrack { track, .. } => TrackController::new(*track).trim(clip, host, dialogs),
            Self::SetInterpolation { track, mode } => {
                TrackController::new(*track).set_interpolation(clip, host, dialogs, *mode)
            }
        }
    }
}

/// Cached drawing data for one track
#[derive(Debug, Clone)]
struct TrackRow {
    id: TrackId,
    name: String,
    color: [u8; 3],
    value_type: TrackValueType,
    interpolation: InterpolationMode,
    times: Vec<f32>,
}

/// Text typed into the panel's inline prompts
#[derive(Debug, Clone)]
struct PromptInputs {
    time: String,
    delta: String,
    factor: String,
    start: String,
    end: String,
}

impl Default for PromptInputs {
    fn default() -> Self {
        Self {
            time: "0".to_string(),
            delta: "0".to_string(),
            factor: "1".to_string(),
            start: "0".to_string(),
            end: "1".to_string(),
        }
    }
}

/// Dopesheet-style timeline for one animation clip
pub struct TimelinePanel {
    style: TimelineStyle,
    rows: Vec<TrackRow>,
    clip_name: String,
    duration: f32,
    /// Horizontal zoom level (pixels per second)
    pub zoom: f32,
    /// Scroll offset (in seconds)
    pub scroll_offset: f32,
    /// Snap to grid enabled
    pub snap_enabled: bool,
    /// Grid snap interval (in seconds)
    pub snap_interval: f32,
    selected: Option<(TrackId, usize)>,
    inputs: PromptInputs,
    commands: Vec<TimelineCommand>,
    status: Option<String>,
    rebuilds: u64,
}

impl TimelinePanel {
    /// Create a panel drawing with the given style
    pub fn new(style: TimelineStyle) -> Self {
        Self {
            style,
            rows: Vec::new(),
            clip_name: String::new(),
            duration: 0.0,
            zoom: DEFAULT_ZOOM,
            scroll_offset: 0.0,
            snap_enabled: false,
            snap_interval: DEFAULT_SNAP_INTERVAL,
            selected: None,
            inputs: PromptInputs::default(),
            commands: Vec::new(),
            status: None,
            rebuilds: 0,
        }
    }

    /// Replace the style
    pub fn set_style(&mut self, style: TimelineStyle) {
        self.style = style;
    }

    /// Refresh cached rows from the clip. Drops the keyframe selection.
    pub fn rebuild(&mut self, clip: &AnimationClip) {
        self.rows = clip
            .tracks()
            .map(|track| TrackRow {
                id: track.id,
                name: track.name.clone(),
                color: track.effective_color(),
                value_type: track.value_type(),
                interpolation: track.interpolation(),
                times: track.times().to_vec(),
            })
            .collect();
        self.clip_name = clip.name.clone();
        self.duration = clip.duration.max(clip.content_duration());
        self.selected = None;
        self.rebuilds += 1;
    }

    /// How many times the rows were rebuilt
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Number of track rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Keyframe times shown for a track
    pub fn row_times(&self, track: TrackId) -> Option<&[f32]> {
        self.rows.iter().find(|r| r.id == track).map(|r| r.times.as_slice())
    }

    /// Selected keyframe
    pub fn selected(&self) -> Option<(TrackId, usize)> {
        self.selected
    }

    /// Queue a command as if the user had triggered it
    pub fn push_command(&mut self, command: TimelineCommand) {
        self.commands.push(command);
    }

    /// Take queued commands
    pub fn drain_commands(&mut self) -> Vec<TimelineCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Message shown in the toolbar
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Show a message in the toolbar
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Clear the toolbar message
    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Set the zoom in pixels per second, clamped to the supported range
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            DEFAULT_ZOOM
        };
    }

    /// Set the snap grid in seconds, clamped to the supported range
    pub fn set_snap_interval(&mut self, interval: f32) {
        self.snap_interval = if interval.is_finite() {
            interval.clamp(MIN_SNAP_INTERVAL, MAX_SNAP_INTERVAL)
        } else {
            DEFAULT_SNAP_INTERVAL
        };
    }

    /// Pull view fields written directly back into range
    fn sanitize_view(&mut self) {
        self.set_zoom(self.zoom);
        self.set_snap_interval(self.snap_interval);
        if !self.scroll_offset.is_finite() {
            self.scroll_offset = 0.0;
        }
    }

    /// Convert time to x position relative to the lane origin
    fn time_to_x(&self, time: f32, origin: f32) -> f32 {
        origin + (time - self.scroll_offset) * self.zoom
    }

    /// Convert x position to time
    fn x_to_time(&self, x: f32, origin: f32) -> f32 {
        (x - origin) / self.zoom + self.scroll_offset
    }

    /// Snap time to grid if enabled
    fn snap_time(&self, time: f32) -> f32 {
        if self.snap_enabled && self.snap_interval > 0.0 {
            (time / self.snap_interval).round() * self.snap_interval
        } else {
            time
        }
    }

    /// Render the timeline
    pub fn ui(&mut self, ui: &mut egui::Ui, playhead: f32) {
        self.sanitize_view();
        self.render_toolbar(ui);
        ui.separator();

        self.render_ruler(ui, playhead);

        let rows = std::mem::take(&mut self.rows);
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.spacing_mut().item_spacing = Vec2::ZERO;
                for (index, row) in rows.iter().enumerate() {
                    self.render_track(ui, row, index, playhead);
                }
            });
        self.rows = rows;

        self.handle_input(ui);
    }

    /// Render toolbar with view controls and status
    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.strong(&self.clip_name);
            ui.separator();

            ui.checkbox(&mut self.snap_enabled, "Snap");
            if self.snap_enabled {
                ui.add(egui::DragValue::new(&mut self.snap_interval)
                    .range(MIN_SNAP_INTERVAL..=MAX_SNAP_INTERVAL)
                    .speed(0.01)
                    .suffix("s"));
            }

            ui.separator();

            ui.label("Zoom:");
            if ui.button("-").clicked() {
                self.zoom = (self.zoom * 0.8).max(MIN_ZOOM);
            }
            ui.add(egui::DragValue::new(&mut self.zoom)
                .range(MIN_ZOOM..=MAX_ZOOM)
                .speed(1.0));
            if ui.button("+").clicked() {
                self.zoom = (self.zoom * 1.25).min(MAX_ZOOM);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{} tracks | {:.2}s", self.rows.len(), self.duration));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.colored_label(self.style.selection, status);
                }
            });
        });
    }

    /// Render the time ruler; dragging it scrubs the playhead
    fn render_ruler(&mut self, ui: &mut egui::Ui, playhead: f32) {
        let width = ui.available_width();
        let (rect, response) = ui.allocate_exact_size(
            Vec2::new(width, TIMELINE_HEADER_HEIGHT),
            Sense::click_and_drag(),
        );
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, self.style.header_background);

        let origin = rect.min.x + TRACK_HEADER_WIDTH;
        let visible_end = self.x_to_time(rect.max.x, origin);

        let tick_interval = if self.zoom > 200.0 {
            0.1
        } else if self.zoom > 100.0 {
            0.5
        } else if self.zoom > 50.0 {
            1.0
        } else {
            5.0
        };
        let major_interval = tick_interval * 5.0;

        let mut time = (self.scroll_offset / tick_interval).floor() * tick_interval;
        while time <= visible_end {
            let x = self.time_to_x(time, origin);
            if x >= origin {
                let is_major = (time / major_interval).round() * major_interval - time;
                let is_major = is_major.abs() < 0.001;
                let (height, color) = if is_major {
                    (12.0, self.style.text)
                } else {
                    (6.0, self.style.text_dim)
                };
                painter.line_segment(
                    [Pos2::new(x, rect.max.y - height), Pos2::new(x, rect.max.y)],
                    Stroke::new(1.0, color),
                );
                if is_major {
                    painter.text(
                        Pos2::new(x + 2.0, rect.min.y + 3.0),
                        egui::Align2::LEFT_TOP,
                        format!("{:.1}s", time),
                        egui::FontId::monospace(10.0),
                        self.style.text,
                    );
                }
            }
            time += tick_interval;
        }

        let playhead_x = self.time_to_x(playhead, origin);
        if playhead_x >= origin && playhead_x <= rect.max.x {
            let triangle = vec![
                Pos2::new(playhead_x, rect.max.y - 8.0),
                Pos2::new(playhead_x - 6.0, rect.max.y),
                Pos2::new(playhead_x + 6.0, rect.max.y),
            ];
            painter.add(egui::Shape::convex_polygon(triangle, self.style.playhead, Stroke::NONE));
        }

        if response.clicked() || response.dragged() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let time = self.snap_time(self.x_to_time(pointer.x, origin).max(0.0));
                self.commands.push(TimelineCommand::Seek(time));
            }
        }
    }

    /// Render a single track row
    fn render_track(&mut self, ui: &mut egui::Ui, row: &TrackRow, index: usize, playhead: f32) {
        ui.horizontal(|ui| {
            ui.set_height(TRACK_HEIGHT);
            self.render_track_header(ui, row);

            let width = ui.available_width().max(0.0);
            let (lane, _) = ui.allocate_exact_size(Vec2::new(width, TRACK_HEIGHT), Sense::hover());
            let background = if index % 2 == 0 {
                self.style.row_even
            } else {
                self.style.row_odd
            };
            ui.painter().rect_filled(lane, 0.0, background);

            self.render_keyframes(ui, lane, row);

            let playhead_x = self.time_to_x(playhead, lane.min.x);
            if playhead_x >= lane.min.x && playhead_x <= lane.max.x {
                ui.painter().line_segment(
                    [Pos2::new(playhead_x, lane.min.y), Pos2::new(playhead_x, lane.max.y)],
                    Stroke::new(PLAYHEAD_WIDTH, self.style.playhead),
                );
            }
        });
    }

    /// Track name, interpolation selector and add-keyframe button
    fn render_track_header(&mut self, ui: &mut egui::Ui, row: &TrackRow) {
        let size = Vec2::new(TRACK_HEADER_WIDTH, TRACK_HEIGHT);
        ui.allocate_ui_with_layout(size, egui::Layout::left_to_right(egui::Align::Center), |ui| {
            ui.set_min_size(size);
            ui.painter().rect_filled(ui.max_rect(), 0.0, self.style.header_background);

            let [r, g, b] = row.color;
            let (marker, _) = ui.allocate_exact_size(Vec2::new(4.0, TRACK_HEIGHT), Sense::hover());
            ui.painter().rect_filled(marker, 0.0, Color32::from_rgb(r, g, b));
            ui.add_space(6.0);

            let name = ui.add(
                egui::Label::new(egui::RichText::new(&row.name).color(self.style.text))
                    .truncate()
                    .sense(Sense::click()),
            );
            name.on_hover_text(row.value_type.name())
                .context_menu(|ui| self.track_menu(ui, row.id));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(4.0);
                if ui.small_button("+").on_hover_text("Add keyframe").clicked() {
                    self.commands.push(TimelineCommand::AddKeyframe { track: row.id });
                }

                let mut mode = row.interpolation;
                egui::ComboBox::from_id_salt(("interpolation", row.id.0))
                    .selected_text(mode.name())
                    .width(80.0)
                    .show_ui(ui, |ui| {
                        for candidate in InterpolationMode::all() {
                            if row.value_type.supports(*candidate) {
                                ui.selectable_value(&mut mode, *candidate, candidate.name());
                            }
                        }
                    });
                if mode != row.interpolation {
                    self.commands.push(TimelineCommand::SetInterpolation { track: row.id, mode });
                }
            });
        });
    }

    /// Track context menu
    fn track_menu(&mut self, ui: &mut egui::Ui, track: TrackId) {
        if ui.button("Add Keyframe").clicked() {
            self.commands.push(TimelineCommand::AddKeyframe { track });
            ui.close_menu();
        }
        ui.menu_button("Delete", |ui| {
            if ui.button("Delete track?").clicked() {
                self.commands.push(TimelineCommand::DeleteTrack { track });
                ui.close_menu();
            }
        });
        if ui.button("Optimize").clicked() {
            self.commands.push(TimelineCommand::OptimizeTrack { track });
            ui.close_menu();
        }

        ui.separator();

        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut self.inputs.delta).desired_width(50.0));
            if ui.button("Shift").clicked() {
                let delta = self.inputs.delta.clone();
                self.commands.push(TimelineCommand::ShiftTrack { track, delta });
                ui.close_menu();
            }
        });
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut self.inputs.factor).desired_width(50.0));
            if ui.button("Scale").clicked() {
                let factor = self.inputs.factor.clone();
                self.commands.push(TimelineCommand::ScaleTrack { track, factor });
                ui.close_menu();
            }
        });
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut self.inputs.start).desired_width(40.0));
            ui.add(egui::TextEdit::singleline(&mut self.inputs.end).desired_width(40.0));
            if ui.button("Trim").clicked() {
                let (start, end) = (self.inputs.start.clone(), self.inputs.end.clone());
                self.commands.push(TimelineCommand::TrimTrack { track, start, end });
                ui.close_menu();
            }
        });
    }

    /// Render keyframes as diamonds with click, double click and context menu
    fn render_keyframes(&mut self, ui: &mut egui::Ui, lane: Rect, row: &TrackRow) {
        let center_y = lane.center().y;
        let half_size = KEYFRAME_SIZE / 2.0;
        let [r, g, b] = row.color;

        for (index, time) in row.times.iter().enumerate() {
            let x = self.time_to_x(*time, lane.min.x);
            if x < lane.min.x || x > lane.max.x {
                continue;
            }

            let is_selected = self.selected == Some((row.id, index));
            let diamond = vec![
                Pos2::new(x, center_y - half_size),
                Pos2::new(x + half_size, center_y),
                Pos2::new(x, center_y + half_size),
                Pos2::new(x - half_size, center_y),
            ];
            let (fill, stroke) = if is_selected {
                (self.style.selection, Stroke::new(2.0, Color32::WHITE))
            } else {
                (Color32::from_rgb(r, g, b), Stroke::new(1.0, self.style.outline))
            };
            ui.painter().add(egui::Shape::convex_polygon(diamond, fill, stroke));

            let hit = Rect::from_center_size(Pos2::new(x, center_y), Vec2::splat(KEYFRAME_SIZE + 2.0));
            let response = ui
                .interact(hit, ui.id().with(("keyframe", row.id.0, index)), Sense::click())
                .on_hover_text(format!("{:.3}s", time));

            if response.double_clicked() {
                self.commands.push(TimelineCommand::SeekKeyframe { track: row.id, index });
            } else if response.clicked() {
                self.selected = Some((row.id, index));
            }

            response.context_menu(|ui| {
                ui.label(format!("Keyframe {} at {:.3}s", index, time));
                ui.menu_button("Delete", |ui| {
                    if ui.button("Delete keyframe?").clicked() {
                        self.commands.push(TimelineCommand::DeleteKeyframe { track: row.id, index });
                        ui.close_menu();
                    }
                });
                ui.horizontal(|ui| {
                    ui.add(egui::TextEdit::singleline(&mut self.inputs.time).desired_width(50.0));
                    if ui.button("Move").clicked() {
                        let time = self.inputs.time.clone();
                        self.commands.push(TimelineCommand::MoveKeyframe { track: row.id, index, time });
                        ui.close_menu();
                    }
                });
            });
        }
    }

    /// Handle keyboard and scroll input
    fn handle_input(&mut self, ui: &mut egui::Ui) {
        if !ui.ui_contains_pointer() {
            return;
        }

        let (delete, scroll, ctrl, shift) = ui.input(|input| {
            (
                input.key_pressed(egui::Key::Delete),
                input.smooth_scroll_delta,
                input.modifiers.ctrl,
                input.modifiers.shift,
            )
        });

        if delete {
            if let Some((track, index)) = self.selected.take() {
                self.commands.push(TimelineCommand::DeleteKeyframe { track, index });
            }
        }

        if ctrl {
            let zoom_delta = scroll.y * 0.01;
            self.zoom = (self.zoom * (1.0 + zoom_delta)).clamp(MIN_ZOOM, MAX_ZOOM);
        } else if shift {
            self.scroll_offset = (self.scroll_offset - scroll.y / self.zoom).max(0.0);
        }
    }
}

impl Default for TimelinePanel {
    fn default() -> Self {
        Self::new(TimelineStyle::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::KeyframeTrack;

    struct PanelHost {
        panel: TimelinePanel,
        time: f32,
    }

    impl TimelineHost for PanelHost {
        fn rebuild_timeline(&mut self, clip: &AnimationClip) {
            self.panel.rebuild(clip);
        }

        fn rebuild_mixer(&mut self, _clip: &AnimationClip) {}

        fn seek(&mut self, time: f32) {
            self.time = time;
        }

        fn current_time(&self) -> f32 {
            self.time
        }

        fn current_value(&self, _track: &KeyframeTrack) -> Option<Vec<f32>> {
            Some(vec![0.5])
        }
    }

    fn clip() -> (AnimationClip, TrackId) {
        let mut clip = AnimationClip::new("Panel");
        let id = clip.add_track(
            KeyframeTrack::new("Cube.opacity", TrackValueType::Number, vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]).unwrap(),
        );
        (clip, id)
    }

    fn run(command: TimelineCommand, clip: &mut AnimationClip, host: &mut PanelHost) -> (Result<EditOutcome>, Vec<String>) {
        let mut dialogs = command.dialogs();
        let result = command.apply(clip, host, &mut dialogs);
        (result, dialogs.take_alerts())
    }

    #[test]
    fn test_time_conversion() {
        let mut panel = TimelinePanel::default();
        panel.zoom = 50.0;
        panel.scroll_offset = 2.0;
        assert_eq!(panel.time_to_x(3.0, 100.0), 150.0);
        assert_eq!(panel.x_to_time(150.0, 100.0), 3.0);
    }

    #[test]
    fn test_snap_time() {
        let mut panel = TimelinePanel::default();
        assert_eq!(panel.snap_time(0.33), 0.33);
        panel.snap_enabled = true;
        panel.snap_interval = 0.5;
        assert_eq!(panel.snap_time(0.8), 1.0);
    }

    #[test]
    fn test_rebuild_caches_rows() {
        let (clip, id) = clip();
        let mut panel = TimelinePanel::default();
        panel.rebuild(&clip);
        assert_eq!(panel.row_count(), 1);
        assert_eq!(panel.row_times(id), Some(&[0.0, 1.0, 2.0][..]));
        assert_eq!(panel.rebuild_count(), 1);
    }

    #[test]
    fn test_commands_resync_panel() {
        let (mut clip, id) = clip();
        let mut host = PanelHost { panel: TimelinePanel::default(), time: 0.0 };
        host.panel.rebuild(&clip);

        let (result, alerts) = run(
            TimelineCommand::MoveKeyframe { track: id, index: 0, time: "3".to_string() },
            &mut clip,
            &mut host,
        );
        assert_eq!(result, Ok(EditOutcome::Applied));
        assert!(alerts.is_empty());
        assert_eq!(host.panel.row_times(id), Some(&[1.0, 2.0, 3.0][..]));

        let (result, alerts) = run(
            TimelineCommand::ShiftTrack { track: id, delta: "x".to_string() },
            &mut clip,
            &mut host,
        );
        assert!(result.is_err());
        assert_eq!(alerts, vec!["Invalid time value!".to_string()]);
        assert_eq!(host.panel.rebuild_count(), 2);
    }

    #[test]
    fn test_seek_commands() {
        let (mut clip, id) = clip();
        let mut host = PanelHost { panel: TimelinePanel::default(), time: 0.0 };

        let (result, _) = run(TimelineCommand::SeekKeyframe { track: id, index: 2 }, &mut clip, &mut host);
        assert_eq!(result, Ok(EditOutcome::Cancelled));
        assert_eq!(host.time, 2.0);

        assert!(!TimelineCommand::Seek(1.0).is_edit());
        assert!(TimelineCommand::OptimizeTrack { track: id }.is_edit());
    }

    #[test]
    fn test_trim_command_carries_both_bounds() {
        let (mut clip, id) = clip();
        let mut host = PanelHost { panel: TimelinePanel::default(), time: 0.0 };

        let (result, _) = run(
            TimelineCommand::TrimTrack { track: id, start: "0.5".to_string(), end: "2".to_string() },
            &mut clip,
            &mut host,
        );
        assert_eq!(result, Ok(EditOutcome::Applied));
        assert_eq!(clip.track(id).unwrap().times(), &[1.0, 2.0]);
    }

    #[test]
    fn test_drain_commands() {
        let (_, id) = clip();
        let mut panel = TimelinePanel::default();
        panel.push_command(TimelineCommand::AddKeyframe { track: id });
        assert_eq!(panel.drain_commands().len(), 1);
        assert!(panel.drain_commands().is_empty());
    }

    #[test]
    fn test_renders_headless() {
        let (clip, _) = clip();
        let mut panel = TimelinePanel::default();
        panel.rebuild(&clip);

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| panel.ui(ui, 0.5));
        });
        assert!(panel.drain_commands().is_empty());
    }

    #[test]
    fn test_view_setters_clamp() {
        let mut panel = TimelinePanel::default();
        panel.set_zoom(0.0);
        assert_eq!(panel.zoom, MIN_ZOOM);
        panel.set_zoom(1.0e9);
        assert_eq!(panel.zoom, MAX_ZOOM);
        panel.set_zoom(f32::NAN);
        assert_eq!(panel.zoom, DEFAULT_ZOOM);

        panel.set_snap_interval(0.0);
        assert_eq!(panel.snap_interval, MIN_SNAP_INTERVAL);
        panel.set_snap_interval(f32::INFINITY);
        assert_eq!(panel.snap_interval, DEFAULT_SNAP_INTERVAL);
    }

    #[test]
    fn test_renders_headless_with_zero_zoom() {
        let (clip, _) = clip();
        let mut panel = TimelinePanel::default();
        panel.rebuild(&clip);
        panel.zoom = 0.0;
        panel.snap_enabled = true;
        panel.snap_interval = 0.0;
        panel.scroll_offset = f32::NAN;

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| panel.ui(ui, 0.5));
        });
        assert_eq!(panel.zoom, MIN_ZOOM);
        assert_eq!(panel.snap_interval, MIN_SNAP_INTERVAL);
        assert_eq!(panel.scroll_offset, 0.0);
    }
}
