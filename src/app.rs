// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! Hosts the editor engine, loads images and study files on a background
//! thread, and wires the toolbar, ROI panel and canvas to the engine's
//! event and snapshot contracts.

use crate::engine::{EditorConfig, EditorEngine};
use crate::io;
use crate::models::{annotation::RoiId, study::StudyData};
use crate::ui::{canvas, panel, toolbar};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver};

/// Result of background study loading.
struct LoadedStudy {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    study: StudyData,
}

/// Main application state.
pub struct LesionmarkApp {
    engine: EditorEngine,

    /// Currently selected ROI in the panel/canvas.
    selected_roi: Option<RoiId>,

    /// Loaded image texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Image dimensions (width, height)
    image_size: Option<(u32, u32)>,

    /// Decoded RGBA pixels before display adjustment, kept so the
    /// brightness/contrast/invert LUT can be re-applied on change.
    base_pixels: Option<Vec<u8>>,

    /// Display parameters the current texture was built with.
    applied_display: (f32, f32, bool),

    /// Image reference and dimensions for export.
    study_meta: Option<StudyData>,

    /// Receiver for background study loading
    loader: Option<Receiver<Result<LoadedStudy, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Count of ROIs in the most recent confirm hand-off.
    last_confirmed: Rc<RefCell<Option<usize>>>,
}

impl Default for LesionmarkApp {
    fn default() -> Self {
        Self::new()
    }
}

impl LesionmarkApp {
    /// Create a new LESIONMARK application instance.
    pub fn new() -> Self {
        let mut engine = EditorEngine::new(EditorConfig::default());

        let last_confirmed = Rc::new(RefCell::new(None));
        let sink = last_confirmed.clone();
        engine.set_confirm_handler(Box::new(move |rois| {
            *sink.borrow_mut() = Some(rois.len());
        }));

        Self {
            engine,
            selected_roi: None,
            image_texture: None,
            image_size: None,
            base_pixels: None,
            applied_display: (0.0, 1.0, false),
            study_meta: None,
            loader: None,
            loading_message: None,
            last_confirmed,
        }
    }

    /// Load an image file on a background thread and start a fresh
    /// annotation session for it.
    pub fn load_image_file(&mut self, path: std::path::PathBuf) {
        let (sender, receiver) = channel();
        self.loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        let path_string = path.to_string_lossy().to_string();

        std::thread::spawn(move || {
            let result = (|| -> Result<LoadedStudy, String> {
                let img = io::media::load_image(&path)
                    .map_err(|e| format!("Failed to load image: {e}"))?;

                log::info!("Loaded image: {} ({}x{})", path.display(), img.width, img.height);

                Ok(LoadedStudy {
                    width: img.width,
                    height: img.height,
                    pixels: img.pixels,
                    study: StudyData::new(path_string, img.width, img.height),
                })
            })();

            let _ = sender.send(result);
        });
    }

    /// Import a study file (annotations, possibly machine proposals) and
    /// load its referenced image, asynchronously.
    fn import_study(&mut self, path: std::path::PathBuf) {
        let (sender, receiver) = channel();
        self.loader = Some(receiver);
        self.loading_message = Some("Loading study and image...".to_string());

        std::thread::spawn(move || {
            let result = (|| -> Result<LoadedStudy, String> {
                let extension = path.extension().and_then(|s| s.to_str());
                let study = match extension {
                    Some("yaml") | Some("yml") => io::serialization::import_yaml(&path)
                        .map_err(|e| format!("Failed to import YAML: {e}"))?,
                    Some("json") => io::serialization::import_json(&path)
                        .map_err(|e| format!("Failed to import JSON: {e}"))?,
                    _ => return Err(format!("Unsupported file extension: {extension:?}")),
                };

                log::info!("Imported {} ROI(s) from {}", study.rois.len(), path.display());

                let image_path = std::path::PathBuf::from(&study.image_file);
                if !image_path.exists() {
                    return Err(format!("Referenced image not found: {}", image_path.display()));
                }

                let img = io::media::load_image(&image_path)
                    .map_err(|e| format!("Failed to load image: {e}"))?;

                Ok(LoadedStudy {
                    width: img.width,
                    height: img.height,
                    pixels: img.pixels,
                    study,
                })
            })();

            let _ = sender.send(result);
        });
    }

    /// Export the current annotation set.
    fn export_study(&self, path: std::path::PathBuf) {
        let Some(meta) = &self.study_meta else {
            log::error!("Nothing to export: no study loaded");
            return;
        };
        let mut study = meta.clone();
        study.rois = self.engine.annotations().to_vec();

        let extension = path.extension().and_then(|s| s.to_str());
        let result = match extension {
            Some("yaml") | Some("yml") => io::serialization::export_yaml(&study, &path),
            Some("json") => io::serialization::export_json(&study, &path),
            _ => {
                log::error!("Unsupported file extension: {extension:?}");
                return;
            }
        };

        match result {
            Ok(_) => log::info!("Exported study to {}", path.display()),
            Err(e) => log::error!("Failed to export study: {e}"),
        }
    }

    /// Finish background loading: upload the texture and hand the ROI set
    /// to the engine as a fresh session.
    fn finish_loading(&mut self, ctx: &egui::Context, loaded: LoadedStudy) {
        let size = [loaded.width as usize, loaded.height as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
        let texture = ctx.load_texture("study_image", color_image, egui::TextureOptions::LINEAR);

        self.image_texture = Some(texture);
        self.image_size = Some((loaded.width, loaded.height));
        self.base_pixels = Some(loaded.pixels);
        self.applied_display = (0.0, 1.0, false);
        self.selected_roi = None;
        *self.last_confirmed.borrow_mut() = None;

        self.engine.begin_session(loaded.study.rois.clone());
        self.study_meta = Some(StudyData::new(
            loaded.study.image_file,
            loaded.width,
            loaded.height,
        ));

        log::info!("Study loaded successfully");
    }

    /// Re-apply the display LUT to the texture when brightness, contrast
    /// or invert changed. Geometry is untouched; this is pixels only.
    fn refresh_display(&mut self, ctx: &egui::Context) {
        let view = *self.engine.view().state();
        let wanted = (view.brightness, view.contrast, view.invert);
        if wanted == self.applied_display {
            return;
        }
        let (Some(base), Some((w, h))) = (&self.base_pixels, self.image_size) else {
            return;
        };

        let adjusted = io::media::apply_display_lut(base, &view);
        let size = [w as usize, h as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &adjusted);
        let texture = ctx.load_texture("study_image", color_image, egui::TextureOptions::LINEAR);
        self.image_texture = Some(texture);
        self.applied_display = wanted;
    }

    fn delete_roi(&mut self, id: RoiId) {
        self.engine.remove_roi(id);
        if self.selected_roi == Some(id) {
            self.selected_roi = None;
        }
    }
}

impl eframe::App for LesionmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed background loading
        if let Some(receiver) = &self.loader {
            if let Ok(result) = receiver.try_recv() {
                self.loader = None;
                self.loading_message = None;

                match result {
                    Ok(loaded) => self.finish_loading(ctx, loaded),
                    Err(e) => log::error!("Failed to load study: {e}"),
                }
            }
        }

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        self.refresh_display(ctx);

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "tiff", "tif"])
                            .pick_file()
                        {
                            self.load_image_file(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Load Study...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Studies", &["yaml", "yml", "json"])
                            .pick_file()
                        {
                            self.import_study(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.menu_button("Export Study", |ui| {
                        if ui.button("Export as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("study.yaml")
                                .save_file()
                            {
                                self.export_study(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Export as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("study.json")
                                .save_file()
                            {
                                self.export_study(path);
                            }
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let has_selection = self.selected_roi.is_some();
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Delete Selected"))
                        .clicked()
                    {
                        if let Some(id) = self.selected_roi {
                            self.delete_roi(id);
                            log::info!("Deleted ROI from menu");
                        }
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Zoom In").clicked() {
                        self.engine.zoom_by(0.5);
                        ui.close_menu();
                    }
                    if ui.button("Zoom Out").clicked() {
                        self.engine.zoom_by(-0.5);
                        ui.close_menu();
                    }
                    if ui.button("Reset View").clicked() {
                        self.engine.reset_view();
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let confirm_requested = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &mut self.engine))
            .inner;
        if confirm_requested {
            self.engine.confirm();
        }

        // ROI panel (right side)
        let panel_action = egui::SidePanel::right("roi_panel")
            .default_width(250.0)
            .show(ctx, |ui| {
                let snapshot = self.engine.snapshot();
                let action = panel::show(
                    ui,
                    &snapshot.annotations,
                    snapshot.total_burden,
                    self.selected_roi,
                );
                if let Some(count) = *self.last_confirmed.borrow() {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("Last confirmed: {count} region(s)")).weak(),
                    );
                }
                action
            })
            .inner;

        match panel_action {
            panel::PanelAction::SelectRoi(id) => {
                self.selected_roi = Some(id);
            }
            panel::PanelAction::DeleteRoi(id) => {
                self.delete_roi(id);
                log::info!("Deleted ROI from panel");
            }
            panel::PanelAction::None => {}
        }

        // Keyboard: deselect on Escape, delete on Delete/Backspace. There
        // is no mid-gesture cancel; an unwanted stroke is released and
        // deleted instead.
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.selected_roi = None;
        }
        if !ctx.wants_keyboard_input()
            && ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace))
        {
            if let Some(id) = self.selected_roi {
                self.delete_roi(id);
                log::info!("Deleted ROI with keyboard");
            }
        }

        // Main canvas (center)
        let committed = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(message) = &self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    None
                } else {
                    canvas::show(
                        ui,
                        &mut self.engine,
                        &self.image_texture,
                        self.image_size,
                        self.selected_roi,
                    )
                }
            })
            .inner;

        if let Some(id) = committed {
            self.selected_roi = Some(id);
        }
    }
}
