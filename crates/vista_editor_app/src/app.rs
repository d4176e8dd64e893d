// SPDX-License-Identifier: MIT OR Apache-2.0
//! Main editor application setup and event loop.

use crate::animation_editor::AnimationEditor;
use crate::history::HistoryError;
use crate::settings::{EditorSettings, SettingsError};
use crate::theme::EditorTheme;
use egui_wgpu::wgpu;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use vista_editor_sequencer::{ClipError, EditError};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Editor application errors
#[derive(Debug, Error)]
pub enum EditorError {
    /// Window creation failed
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// Renderer initialization failed
    #[error("Failed to initialize renderer: {0}")]
    RendererInit(String),

    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Clip could not be saved or loaded
    #[error("Clip error: {0}")]
    Clip(#[from] ClipError),

    /// Clip data was rejected
    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    /// Undo/redo failed
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// Settings could not be read or written
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Graphics state for wgpu rendering
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| EditorError::RendererInit(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| EditorError::RendererInit("no suitable GPU adapter".to_string()))?;

        tracing::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Vista Editor Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .map_err(|e| EditorError::RendererInit(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| EditorError::RendererInit("surface has no formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Editor Encoder"),
        });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Editor Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: 0.1,
                                g: 0.1,
                                b: 0.1,
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }
}

/// Everything drawn inside the window
struct EditorShell {
    editor: AnimationEditor,
    theme: EditorTheme,
    settings: EditorSettings,
    settings_path: PathBuf,
    clip_path: String,
    request_exit: bool,
}

impl EditorShell {
    fn new(settings: EditorSettings, settings_path: PathBuf) -> Result<Self> {
        let theme = EditorTheme::new(settings.theme);
        let mut editor = AnimationEditor::demo(
            theme.timeline_style(),
            settings.history_depth,
            settings.frame_rate,
        )?;

        let session = editor.session_mut();
        session.timeline.set_zoom(settings.timeline.zoom);
        session.timeline.snap_enabled = settings.timeline.snap_enabled;
        session.timeline.set_snap_interval(settings.timeline.snap_interval);
        session.mixer.looping = settings.timeline.looping;

        if let Some(path) = &settings.last_clip {
            if let Err(err) = editor.load(path) {
                tracing::warn!("Could not reopen {}: {err}", path.display());
            }
        }

        let clip_path = settings
            .last_clip
            .as_ref()
            .map_or_else(|| "clip.ron".to_string(), |p| p.display().to_string());

        Ok(Self {
            editor,
            theme,
            settings,
            settings_path,
            clip_path,
            request_exit: false,
        })
    }

    fn update(&mut self, ctx: &egui::Context) {
        let delta_time = ctx.input(|i| i.stable_dt);
        self.editor.update(delta_time);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                self.file_menu(ui);
                self.edit_menu(ui);
                self.view_menu(ui, ctx);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let history = self.editor.history();
                    ui.weak(format!(
                        "{} edits | {} KB",
                        history.undo_depth(),
                        history.memory_used() / 1024
                    ));
                    let marker = if self.editor.is_dirty() { "*" } else { "" };
                    ui.label(format!("{}{}", self.editor.clip().name, marker));
                });
            });
        });

        egui::TopBottomPanel::top("transport").show(ctx, |ui| {
            self.editor.transport_ui(ui);
        });

        egui::TopBottomPanel::bottom("timeline")
            .resizable(true)
            .default_height(260.0)
            .show(ctx, |ui| {
                self.editor.timeline_ui(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.editor.scene_ui(ui);
        });

        self.handle_shortcuts(ctx);
    }

    fn file_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("File", |ui| {
            ui.horizontal(|ui| {
                ui.label("Path:");
                ui.text_edit_singleline(&mut self.clip_path);
            });
            if ui.button("Save Clip (Ctrl+S)").clicked() {
                self.save_clip();
                ui.close_menu();
            }
            if ui.button("Load Clip").clicked() {
                let path = PathBuf::from(&self.clip_path);
                match self.editor.load(&path) {
                    Ok(()) => self.settings.last_clip = Some(path),
                    Err(err) => tracing::error!("Failed to load clip: {err}"),
                }
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Exit").clicked() {
                self.request_exit = true;
                ui.close_menu();
            }
        });
    }

    fn edit_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("Edit", |ui| {
            let history = self.editor.history();
            let can_undo = history.can_undo();
            let can_redo = history.can_redo();

            let undo_text = match history.undo_description() {
                Some(desc) => format!("Undo: {} (Ctrl+Z)", desc),
                None => "Undo (Ctrl+Z)".to_string(),
            };
            let redo_text = match history.redo_description() {
                Some(desc) => format!("Redo: {} (Ctrl+Y)", desc),
                None => "Redo (Ctrl+Y)".to_string(),
            };

            if ui.add_enabled(can_undo, egui::Button::new(undo_text)).clicked() {
                if let Err(err) = self.editor.undo() {
                    tracing::warn!("Undo failed: {err}");
                }
                ui.close_menu();
            }
            if ui.add_enabled(can_redo, egui::Button::new(redo_text)).clicked() {
                if let Err(err) = self.editor.redo() {
                    tracing::warn!("Redo failed: {err}");
                }
                ui.close_menu();
            }
        });
    }

    fn view_menu(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.menu_button("View", |ui| {
            ui.label("Theme");
            if self.theme.settings_ui(ui) {
                self.theme.apply(ctx);
                self.editor
                    .session_mut()
                    .timeline
                    .set_style(self.theme.timeline_style());
                ui.close_menu();
            }
        });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let (space, undo, redo, save) = ctx.input(|input| {
            let command = input.modifiers.command;
            (
                input.key_pressed(egui::Key::Space),
                command && input.key_pressed(egui::Key::Z),
                command && input.key_pressed(egui::Key::Y),
                command && input.key_pressed(egui::Key::S),
            )
        });

        if space {
            self.editor.session_mut().mixer.toggle_playback();
        }
        if undo {
            if let Err(err) = self.editor.undo() {
                tracing::debug!("Undo: {err}");
            }
        }
        if redo {
            if let Err(err) = self.editor.redo() {
                tracing::debug!("Redo: {err}");
            }
        }
        if save {
            self.save_clip();
        }
    }

    fn save_clip(&mut self) {
        let path = PathBuf::from(&self.clip_path);
        match self.editor.save(&path) {
            Ok(()) => self.settings.last_clip = Some(path),
            Err(err) => tracing::error!("Failed to save clip: {err}"),
        }
    }

    /// Write view preferences back to the settings file
    fn store_settings(&mut self) {
        let session = self.editor.session();
        self.settings.theme = self.theme.preset;
        self.settings.timeline.zoom = session.timeline.zoom;
        self.settings.timeline.snap_enabled = session.timeline.snap_enabled;
        self.settings.timeline.snap_interval = session.timeline.snap_interval;
        self.settings.timeline.looping = session.mixer.looping;
        if let Some(path) = self.editor.clip_path() {
            self.settings.last_clip = Some(path.to_path_buf());
        }

        match self.settings.save(&self.settings_path) {
            Ok(()) => tracing::info!("Saved settings to {}", self.settings_path.display()),
            Err(err) => tracing::warn!("Failed to save settings: {err}"),
        }
    }
}

/// Running state of the editor
struct EditorRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    shell: EditorShell,
}

/// Main editor application
pub struct EditorApp {
    settings: EditorSettings,
    settings_path: PathBuf,
    running: Option<EditorRunning>,
    error: Option<EditorError>,
}

impl EditorApp {
    /// Create the application with loaded settings
    pub fn new(settings: EditorSettings, settings_path: PathBuf) -> Self {
        Self {
            settings,
            settings_path,
            running: None,
            error: None,
        }
    }

    /// Run the editor until the window closes
    pub fn run(settings: EditorSettings, settings_path: PathBuf) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = EditorApp::new(settings, settings_path);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<EditorRunning> {
        tracing::info!("Creating editor window...");

        let [width, height] = self.settings.window_size;
        let window_attrs = Window::default_attributes()
            .with_title("Vista Editor")
            .with_inner_size(winit::dpi::LogicalSize::new(width, height))
            .with_min_inner_size(winit::dpi::LogicalSize::new(640, 480));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| EditorError::WindowCreation(e.to_string()))?,
        );

        tracing::info!("Initializing graphics...");
        let graphics = GraphicsState::new(window.clone())?;

        let egui_ctx = egui::Context::default();
        let shell = EditorShell::new(self.settings.clone(), self.settings_path.clone())?;
        shell.theme.apply(&egui_ctx);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024),
        );

        tracing::info!("Editor initialized, window size {:?}", window.inner_size());

        Ok(EditorRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
            shell,
        })
    }
}

impl ApplicationHandler for EditorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(err) => {
                tracing::error!("Failed to start editor: {err}");
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                running.shell.store_settings();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let raw_input = running.egui_state.take_egui_input(&running.window);
                let full_output = running.egui_ctx.run(raw_input, |ctx| {
                    running.shell.update(ctx);
                });

                if running.shell.request_exit {
                    running.shell.store_settings();
                    event_loop.exit();
                    return;
                }

                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                match running.graphics.render(&running.egui_ctx, full_output, &running.window) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }

                running.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}
