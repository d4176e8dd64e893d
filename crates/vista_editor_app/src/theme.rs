// SPDX-License-Identifier: MIT OR Apache-2.0
//! Theme presets for the editor and the timeline panel.
//!
//! The theme is owned by the application and handed to the timeline as a
//! [`TimelineStyle`]; nothing reads it globally.

use egui::{Color32, Rounding, Stroke, Visuals};
use serde::{Deserialize, Serialize};
use vista_editor_sequencer::TimelineStyle;

/// Theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemePreset {
    /// Dark theme (default)
    #[default]
    Dark,
    /// Light theme
    Light,
    /// High contrast dark theme
    HighContrastDark,
}

impl ThemePreset {
    /// Get all presets for UI
    pub fn all() -> &'static [ThemePreset] {
        &[
            ThemePreset::Dark,
            ThemePreset::Light,
            ThemePreset::HighContrastDark,
        ]
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            ThemePreset::Dark => "Dark",
            ThemePreset::Light => "Light",
            ThemePreset::HighContrastDark => "High Contrast Dark",
        }
    }

    fn is_dark(&self) -> bool {
        !matches!(self, ThemePreset::Light)
    }
}

/// Theme colors for different UI elements
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    /// Primary background color
    pub bg_primary: Color32,
    /// Secondary background (panels, headers)
    pub bg_secondary: Color32,
    /// Tertiary background (nested elements)
    pub bg_tertiary: Color32,
    /// Primary text color
    pub text_primary: Color32,
    /// Secondary text (hints, labels)
    pub text_secondary: Color32,
    /// Accent color for highlights, selections
    pub accent: Color32,
    /// Warning color, also used for the playhead
    pub warning: Color32,
    /// Error color
    pub error: Color32,
    /// Border color
    pub border: Color32,
}

impl ThemeColors {
    /// Dark theme colors
    pub fn dark() -> Self {
        Self {
            bg_primary: Color32::from_rgb(30, 30, 30),
            bg_secondary: Color32::from_rgb(37, 37, 38),
            bg_tertiary: Color32::from_rgb(45, 45, 48),
            text_primary: Color32::from_rgb(220, 220, 220),
            text_secondary: Color32::from_rgb(150, 150, 150),
            accent: Color32::from_rgb(66, 133, 244),
            warning: Color32::from_rgb(255, 193, 7),
            error: Color32::from_rgb(244, 67, 54),
            border: Color32::from_rgb(60, 60, 60),
        }
    }

    /// Light theme colors
    pub fn light() -> Self {
        Self {
            bg_primary: Color32::from_rgb(250, 250, 250),
            bg_secondary: Color32::from_rgb(240, 240, 240),
            bg_tertiary: Color32::from_rgb(230, 230, 230),
            text_primary: Color32::from_rgb(30, 30, 30),
            text_secondary: Color32::from_rgb(100, 100, 100),
            accent: Color32::from_rgb(25, 118, 210),
            warning: Color32::from_rgb(245, 124, 0),
            error: Color32::from_rgb(211, 47, 47),
            border: Color32::from_rgb(200, 200, 200),
        }
    }

    /// High contrast dark theme colors
    pub fn high_contrast_dark() -> Self {
        Self {
            bg_primary: Color32::from_rgb(0, 0, 0),
            bg_secondary: Color32::from_rgb(20, 20, 20),
            bg_tertiary: Color32::from_rgb(35, 35, 35),
            text_primary: Color32::WHITE,
            text_secondary: Color32::from_rgb(200, 200, 200),
            accent: Color32::from_rgb(100, 180, 255),
            warning: Color32::from_rgb(255, 220, 0),
            error: Color32::from_rgb(255, 100, 100),
            border: Color32::from_rgb(100, 100, 100),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::dark()
    }
}

/// Editor theme configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EditorTheme {
    /// Theme preset being used
    pub preset: ThemePreset,
    /// Theme colors
    pub colors: ThemeColors,
    /// Widget rounding
    pub widget_rounding: f32,
}

impl Default for EditorTheme {
    fn default() -> Self {
        Self::new(ThemePreset::Dark)
    }
}

impl EditorTheme {
    /// Create a theme from a preset
    pub fn new(preset: ThemePreset) -> Self {
        Self {
            preset,
            colors: Self::preset_colors(preset),
            widget_rounding: 4.0,
        }
    }

    fn preset_colors(preset: ThemePreset) -> ThemeColors {
        match preset {
            ThemePreset::Dark => ThemeColors::dark(),
            ThemePreset::Light => ThemeColors::light(),
            ThemePreset::HighContrastDark => ThemeColors::high_contrast_dark(),
        }
    }

    /// Switch preset
    pub fn set_preset(&mut self, preset: ThemePreset) {
        self.preset = preset;
        self.colors = Self::preset_colors(preset);
    }

    /// Colors for the timeline panel
    pub fn timeline_style(&self) -> TimelineStyle {
        let colors = &self.colors;
        let row_odd = if self.preset.is_dark() {
            colors.bg_primary.gamma_multiply(0.85)
        } else {
            colors.bg_tertiary
        };
        TimelineStyle {
            background: colors.bg_primary,
            header_background: colors.bg_secondary,
            row_even: colors.bg_primary,
            row_odd,
            text: colors.text_primary,
            text_dim: colors.text_secondary,
            playhead: colors.error,
            selection: colors.warning,
            outline: colors.border,
        }
    }

    /// Convert to egui Visuals
    pub fn to_egui_visuals(&self) -> Visuals {
        let colors = &self.colors;
        let mut visuals = if self.preset.is_dark() {
            Visuals::dark()
        } else {
            Visuals::light()
        };

        visuals.window_fill = colors.bg_secondary;
        visuals.window_stroke = Stroke::new(1.0, colors.border);
        visuals.panel_fill = colors.bg_primary;

        let rounding = Rounding::same(self.widget_rounding);
        for widget in [
            &mut visuals.widgets.noninteractive,
            &mut visuals.widgets.inactive,
        ] {
            widget.bg_fill = colors.bg_tertiary;
            widget.bg_stroke = Stroke::new(1.0, colors.border);
            widget.fg_stroke = Stroke::new(1.0, colors.text_primary);
            widget.rounding = rounding;
        }
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, colors.accent);
        visuals.widgets.hovered.rounding = rounding;
        visuals.widgets.active.bg_fill = colors.accent;
        visuals.widgets.active.rounding = rounding;

        visuals.selection.bg_fill = colors.accent.gamma_multiply(0.4);
        visuals.selection.stroke = Stroke::new(1.0, colors.accent);
        visuals.override_text_color = Some(colors.text_primary);
        visuals.hyperlink_color = colors.accent;
        visuals.extreme_bg_color = colors.bg_primary;
        visuals.faint_bg_color = colors.bg_tertiary;

        visuals
    }

    /// Apply this theme to an egui context
    pub fn apply(&self, ctx: &egui::Context) {
        ctx.set_visuals(self.to_egui_visuals());
    }

    /// Preset picker. Returns true when the preset changed.
    pub fn settings_ui(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;
        for preset in ThemePreset::all() {
            if ui.selectable_label(self.preset == *preset, preset.name()).clicked() && self.preset != *preset {
                self.set_preset(*preset);
                changed = true;
            }
        }
        changed
    }
}
