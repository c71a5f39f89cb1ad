// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the editor state, routes UI actions
//! through the state reducer, keeps the preview texture up to date and
//! runs background loads and exports on worker threads.

use crate::config::EditorConfig;
use crate::drag::{DragController, DragEffect};
use crate::io::export::{
    DirectorySink, EncodedMeme, Exporter, FileSink, SaveDialog, SystemClipboard,
    UnsupportedShareSheet, DOWNLOAD_FAILURE, DOWNLOAD_SUCCESS, SHARE_FAILURE,
};
use crate::io::media::{self, MediaError, MediaLocator};
use crate::models::editor::{EditorAction, EditorState};
use crate::models::template::TemplateCatalog;
use crate::render::compositor::{BackgroundInput, Compositor, RenderTarget};
use crate::render::deferred::{Deferred, Poll};
use crate::render::text::FontBook;
use crate::ui::notifications::Notifications;
use crate::ui::toolbar::ExportKind;
use crate::ui::{canvas, properties, templates, toolbar};
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;

/// The decoded background for the preview and the load in flight, if any.
#[derive(Default)]
struct BackgroundSlot {
    /// Locator the slot currently tracks.
    locator: Option<MediaLocator>,
    image: Option<Arc<RgbaImage>>,
    loading: Option<Deferred<Result<RgbaImage, MediaError>>>,
}

/// An export waiting for its render to finish.
struct ExportJob {
    kind: ExportKind,
    render: Deferred<RgbaImage>,
}

/// Main application state.
pub struct MemeCreatorApp {
    config: EditorConfig,
    catalog: TemplateCatalog,

    /// Text elements, selection and background choice
    state: EditorState,

    /// Live drag session on the preview
    drag: DragController,

    /// Renders the preview (and hands its fonts to exports)
    compositor: Compositor,

    exporter: Exporter,
    notifications: Notifications,
    background: BackgroundSlot,

    /// Preview texture and the pixel size it was rendered at
    preview_texture: Option<egui::TextureHandle>,
    preview_size: u32,
    preview_dirty: bool,

    /// Exports are not serialised; each renders its own snapshot.
    exports: Vec<ExportJob>,
}

impl MemeCreatorApp {
    /// Create a new editor with the given configuration and templates.
    pub fn new(config: EditorConfig, catalog: TemplateCatalog) -> Self {
        let files: Box<dyn FileSink> = match &config.download_dir {
            Some(dir) => Box::new(DirectorySink::new(dir.clone())),
            None => Box::new(SaveDialog),
        };
        let exporter = Exporter::new(
            Box::new(UnsupportedShareSheet),
            Box::new(SystemClipboard),
            files,
            config.download_file_name.clone(),
            config.share_file_name.clone(),
        );
        let notifications = Notifications::new(config.notification_duration());

        Self {
            config,
            catalog,
            state: EditorState::new(),
            drag: DragController::new(),
            compositor: Compositor::new(FontBook::system()),
            exporter,
            notifications,
            background: BackgroundSlot::default(),
            preview_texture: None,
            preview_size: 0,
            preview_dirty: true,
            exports: Vec::new(),
        }
    }

    /// Apply an action to the editor state and refresh what depends on it.
    fn dispatch(&mut self, action: EditorAction) {
        if self.state.apply(action) {
            self.preview_dirty = true;
            self.sync_background();
        }
    }

    /// Start loading the active background if it changed.
    fn sync_background(&mut self) {
        let active = self.state.background().cloned();
        if active == self.background.locator {
            return;
        }

        self.background = BackgroundSlot::default();
        if let Some(locator) = active {
            let timeout = self.config.http_timeout();
            let target = locator.clone();
            self.background.loading = Some(Deferred::spawn(move || media::load_background(&target, timeout)));
            self.background.locator = Some(locator);
        }
    }

    /// Pick up a finished background load.
    fn poll_background(&mut self) {
        let Some(loading) = self.background.loading.as_mut() else {
            return;
        };

        let result = match loading.poll() {
            Poll::Pending => return,
            Poll::Ready(result) => result,
            Poll::Gone => Err(MediaError::Interrupted),
        };
        self.background.loading = None;
        self.preview_dirty = true;

        match result {
            Ok(image) => {
                log::info!("Background ready ({}x{})", image.width(), image.height());
                self.background.image = Some(Arc::new(image));
            }
            Err(e) => {
                let name = self
                    .background
                    .locator
                    .as_ref()
                    .map(|l| self.catalog.find_by_locator(l).map_or_else(|| l.to_string(), |t| t.name.clone()))
                    .unwrap_or_default();
                log::warn!("Failed to load background {}: {}", name, e);
                self.notifications.error(format!("Couldn't load {}, showing the default background", name));
            }
        }
    }

    fn handle_uploads(&mut self, paths: Vec<PathBuf>) {
        if let Some(upload) = media::first_upload(&paths) {
            self.dispatch(EditorAction::UploadMedia(upload));
        }
    }

    /// Render the preview again if anything it shows has changed.
    fn refresh_preview(&mut self, ctx: &egui::Context, pixel_size: u32) {
        if !self.preview_dirty && pixel_size == self.preview_size && self.preview_texture.is_some() {
            return;
        }

        // Scale the reference width with the preview so text keeps the
        // same proportions as in the export.
        let target = RenderTarget::square(pixel_size, self.config.reference_width);
        let rendered = self.compositor.render(
            self.background.image.as_deref(),
            self.state.elements(),
            target,
            Some(self.state.selected_id()),
        );

        let size = [rendered.width() as usize, rendered.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rendered.as_raw());
        match &mut self.preview_texture {
            Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.preview_texture = Some(ctx.load_texture("preview", color_image, egui::TextureOptions::LINEAR));
            }
        }

        self.preview_size = pixel_size;
        self.preview_dirty = false;
    }

    /// Start rendering the export at full size off the UI thread.
    fn start_export(&mut self, kind: ExportKind) {
        let background = match (&self.background.image, self.state.background()) {
            (Some(image), Some(_)) => Some(BackgroundInput::Loaded(Arc::clone(image))),
            (None, Some(locator)) => Some(BackgroundInput::Load(locator.clone())),
            (_, None) => None,
        };

        log::info!("Rendering {:?} export", kind);
        let render = Compositor::render_async(
            self.compositor.fonts().clone(),
            background,
            self.state.snapshot(),
            self.config.export_target(),
            self.config.http_timeout(),
        );
        self.exports.push(ExportJob { kind, render });
    }

    /// Deliver exports whose render has finished.
    fn poll_exports(&mut self) {
        let mut finished = Vec::new();
        self.exports.retain_mut(|job| match job.render.poll() {
            Poll::Pending => true,
            Poll::Ready(image) => {
                finished.push((job.kind, Some(image)));
                false
            }
            Poll::Gone => {
                finished.push((job.kind, None));
                false
            }
        });

        for (kind, image) in finished {
            self.deliver(kind, image);
        }
    }

    fn deliver(&mut self, kind: ExportKind, image: Option<RgbaImage>) {
        let encoded = match image.map(EncodedMeme::encode) {
            Some(Ok(encoded)) => Some(encoded),
            Some(Err(e)) => {
                log::error!("Failed to encode meme: {}", e);
                None
            }
            None => {
                log::error!("Export render stopped before finishing");
                None
            }
        };

        match kind {
            ExportKind::Download => match encoded.map(|meme| self.exporter.download(&meme)) {
                Some(Ok(_)) => self.notifications.success(DOWNLOAD_SUCCESS),
                Some(Err(e)) => {
                    log::error!("Failed to download meme: {}", e);
                    self.notifications.error(DOWNLOAD_FAILURE);
                }
                None => self.notifications.error(DOWNLOAD_FAILURE),
            },
            ExportKind::Share => match encoded.map(|meme| self.exporter.share(&meme)) {
                Some(Ok(outcome)) => self.notifications.success(outcome.message()),
                Some(Err(e)) => {
                    log::error!("Failed to share meme: {}", e);
                    self.notifications.error(SHARE_FAILURE);
                }
                None => self.notifications.error(SHARE_FAILURE),
            },
        }
    }
}

impl eframe::App for MemeCreatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_background();
        self.poll_exports();

        if self.background.loading.is_some() || !self.exports.is_empty() {
            ctx.request_repaint();
        }

        // Files dropped onto the window
        let (dropped, drop_hover) = ctx.input(|i| {
            let dropped: Vec<PathBuf> = i.raw.dropped_files.iter().filter_map(|f| f.path.clone()).collect();
            (dropped, !i.raw.hovered_files.is_empty())
        });
        if !dropped.is_empty() {
            self.handle_uploads(dropped);
        }

        // Delete key removes the selected text unless a text field has focus
        if !ctx.wants_keyboard_input() && ctx.input(|i| i.key_pressed(egui::Key::Delete)) {
            let id = self.state.selected_id().to_string();
            self.dispatch(EditorAction::DeleteText(id));
        }

        // Header
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(6.0);
                ui.heading(egui::RichText::new("✨ Meme Creator").size(28.0).strong());
                ui.label(
                    egui::RichText::new("Create amazing memes with custom fonts, colors, and media uploads").weak(),
                );
                ui.add_space(6.0);
            });
        });

        // Controls (left side)
        let (background_action, text_action) = egui::SidePanel::left("controls")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| {
                        let background = templates::show(ui, &self.catalog, &self.state, drop_hover);
                        ui.add_space(12.0);
                        ui.separator();
                        let text = properties::show(ui, &self.state);
                        (background, text)
                    })
                    .inner
            })
            .inner;

        match background_action {
            templates::BackgroundAction::SelectTemplate(locator) => {
                self.dispatch(EditorAction::SelectTemplate(locator));
            }
            templates::BackgroundAction::Upload(paths) => self.handle_uploads(paths),
            templates::BackgroundAction::ClearUpload => self.dispatch(EditorAction::ClearUpload),
            templates::BackgroundAction::None => {}
        }
        if let Some(action) = text_action {
            self.dispatch(action);
        }

        // Preview and export (center)
        let (canvas_response, export) = egui::CentralPanel::default()
            .show(ctx, |ui| {
                ui.heading("🎭 Live Preview");
                ui.add_space(8.0);
                let response = canvas::show(
                    ui,
                    self.preview_texture.as_ref(),
                    self.config.preview_max_size,
                    self.drag.is_dragging(),
                    self.background.loading.is_some(),
                );
                ui.add_space(12.0);
                ui.separator();
                ui.heading("Share Your Creation");
                let export = toolbar::show(ui, !self.exports.is_empty());
                (response, export)
            })
            .inner;

        if let Some(event) = canvas_response.event {
            match self.drag.handle(event, self.state.elements()) {
                DragEffect::Select(id) => self.dispatch(EditorAction::SelectText(id)),
                DragEffect::Move { id, x, y } => self.dispatch(EditorAction::MoveText { id, x, y }),
                DragEffect::None => {}
            }
        }

        if let Some(kind) = export {
            self.start_export(kind);
        }

        self.refresh_preview(ctx, canvas_response.pixel_size);
        self.notifications.show(ctx);
    }
}
