use eframe::egui;
use image::DynamicImage;
use std::path::PathBuf;

use crate::config::EditorConfig;
use crate::controller::{CanvasLayout, DrawingController, Surface};
use crate::geometry::Coordinates;
use crate::shapes::{Shape, Tool};
use crate::store::ShapeStore;
use crate::tools::ToolState;

// ── Toolbar ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonVariant {
    Primary,
    Secondary,
    Warning,
    Action,
}

impl ButtonVariant {
    fn fill(self) -> egui::Color32 {
        match self {
            ButtonVariant::Primary => egui::Color32::from_rgb(20, 184, 166),
            ButtonVariant::Secondary => egui::Color32::from_rgb(234, 179, 8),
            ButtonVariant::Warning => egui::Color32::from_rgb(244, 63, 94),
            ButtonVariant::Action => egui::Color32::from_rgb(132, 204, 22),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolbarAction {
    Save,
    OpenImage,
    Clear,
    SelectTool(Tool),
    Undo,
    Redo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolbarButton {
    pub label: &'static str,
    pub variant: ButtonVariant,
    pub active: bool,
    pub enabled: bool,
    pub action: ToolbarAction,
}

impl ToolbarButton {
    fn new(label: &'static str, variant: ButtonVariant, action: ToolbarAction) -> Self {
        Self {
            label,
            variant,
            active: false,
            enabled: true,
            action,
        }
    }

    fn tool(tool: Tool, variant: ButtonVariant, tools: &ToolState) -> Self {
        Self {
            active: tools.selected() == Some(tool),
            ..Self::new(tool.label(), variant, ToolbarAction::SelectTool(tool))
        }
    }
}

/// Toolbar contents, grouped as they are separated on screen.
pub fn toolbar_groups(tools: &ToolState, store: &ShapeStore) -> Vec<Vec<ToolbarButton>> {
    vec![
        vec![
            ToolbarButton::new("Save", ButtonVariant::Primary, ToolbarAction::Save),
            ToolbarButton::new("Open image", ButtonVariant::Primary, ToolbarAction::OpenImage),
            ToolbarButton::new("Clear", ButtonVariant::Warning, ToolbarAction::Clear),
        ],
        vec![
            ToolbarButton::tool(Tool::Square, ButtonVariant::Secondary, tools),
            ToolbarButton::tool(Tool::Rectangle, ButtonVariant::Secondary, tools),
            ToolbarButton::tool(Tool::Eraser, ButtonVariant::Action, tools),
        ],
        vec![
            ToolbarButton {
                enabled: store.can_undo(),
                ..ToolbarButton::new("Undo", ButtonVariant::Primary, ToolbarAction::Undo)
            },
            ToolbarButton {
                enabled: store.can_redo(),
                ..ToolbarButton::new("Redo", ButtonVariant::Primary, ToolbarAction::Redo)
            },
        ],
    ]
}

// ── Canvas painting ─────────────────────────────────────────────────────────

struct CanvasPainter<'a> {
    painter: &'a egui::Painter,
    rect: egui::Rect,
    scale: f32,
    stroke: egui::Stroke,
    background: Option<egui::TextureId>,
}

impl CanvasPainter<'_> {
    /// Convert canvas-space coords to screen-space
    fn to_screen(&self, x: f64, y: f64) -> egui::Pos2 {
        self.rect.min + egui::vec2(x as f32, y as f32) * self.scale
    }
}

impl Surface for CanvasPainter<'_> {
    fn clear(&mut self) {
        self.painter
            .rect_filled(self.rect, 0.0, egui::Color32::from_gray(40));
        if let Some(tex) = self.background {
            self.painter.image(
                tex,
                self.rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
    }

    fn stroke_rect(&mut self, shape: &Shape) {
        // in-progress shapes may still have negative extents
        let rect = egui::Rect::from_two_pos(
            self.to_screen(shape.x, shape.y),
            self.to_screen(shape.x + shape.width, shape.y + shape.height),
        );
        self.painter
            .rect_stroke(rect, 0.0, self.stroke, egui::StrokeKind::Middle);
    }
}

// ── App ─────────────────────────────────────────────────────────────────────

pub struct EditorApp {
    config: EditorConfig,
    store: ShapeStore,
    tools: ToolState,
    controller: DrawingController,

    image_path: Option<PathBuf>,
    raw_image: Option<DynamicImage>,
    texture: Option<egui::TextureHandle>,

    // label being typed, committed when the field loses focus
    label_draft: Option<(usize, String)>,
}

impl EditorApp {
    pub fn new(config: EditorConfig, image_path: Option<PathBuf>) -> Self {
        let store = ShapeStore::persistent(config.store_path(), config.history_limit);
        let controller = DrawingController::from_config(&config);
        let mut app = Self {
            config,
            store,
            tools: ToolState::default(),
            controller,
            image_path: None,
            raw_image: None,
            texture: None,
            label_draft: None,
        };
        if let Some(path) = image_path {
            app.load_image(path);
        }
        app
    }

    fn load_image(&mut self, path: PathBuf) {
        match image::open(&path) {
            Ok(img) => {
                log::info!("loaded {} ({}x{})", path.display(), img.width(), img.height());
                self.raw_image = Some(img);
                self.texture = None;
                self.image_path = Some(path);
            }
            Err(e) => log::error!("failed to open {}: {e}", path.display()),
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(ref img) = self.raw_image {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            let color_image =
                egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture = Some(ctx.load_texture(
                "background",
                color_image,
                egui::TextureOptions::LINEAR,
            ));
        }
    }

    fn ensure_hydrated(&mut self) {
        if self.store.has_hydrated() {
            return;
        }
        if let Err(e) = self.store.hydrate() {
            log::error!("starting with an empty canvas: {e}");
        }
    }

    fn run_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::Save => self.save_dialog(),
            ToolbarAction::OpenImage => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "webp"])
                    .pick_file()
                {
                    self.load_image(path);
                }
            }
            ToolbarAction::Clear => {
                self.label_draft = None;
                self.controller.clear(&mut self.store);
            }
            ToolbarAction::SelectTool(tool) => self.tools.toggle(tool),
            ToolbarAction::Undo => {
                self.label_draft = None;
                self.store.undo();
            }
            ToolbarAction::Redo => {
                self.label_draft = None;
                self.store.redo();
            }
        }
    }

    fn save_dialog(&self) {
        let file_name = self
            .image_path
            .as_ref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .map(|stem| format!("{stem}.shapes.json"))
            .unwrap_or_else(|| "shapes.json".to_string());

        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(file_name)
            .save_file()
        else {
            return;
        };
        match self.store.export_json(&path) {
            Ok(()) => log::info!("exported {} shapes to {}", self.store.len(), path.display()),
            Err(e) => log::error!("{e}"),
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        let mut clicked = None;
        ui.horizontal(|ui| {
            for (i, group) in toolbar_groups(&self.tools, &self.store).into_iter().enumerate() {
                if i > 0 {
                    ui.separator();
                }
                for button in group {
                    let widget = egui::Button::new(button.label)
                        .fill(button.variant.fill())
                        .selected(button.active);
                    if ui.add_enabled(button.enabled, widget).clicked() {
                        clicked = Some(button.action);
                    }
                }
            }
        });
        if let Some(action) = clicked {
            self.run_action(action);
        }
    }

    fn label_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Labels");
        ui.separator();
        if !self.store.has_hydrated() {
            return;
        }

        let labels: Vec<Option<String>> =
            self.store.shapes().iter().map(|s| s.label.clone()).collect();
        let draft = &mut self.label_draft;
        let mut commit = None;

        egui_extras::TableBuilder::new(ui)
            .striped(true)
            .column(egui_extras::Column::exact(28.0))
            .column(egui_extras::Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                header.col(|ui| {
                    ui.strong("Label");
                });
            })
            .body(|mut body| {
                for (index, label) in labels.iter().enumerate() {
                    body.row(24.0, |mut row| {
                        row.col(|ui| {
                            ui.label(index.to_string());
                        });
                        row.col(|ui| {
                            let mut text = match draft.as_ref() {
                                Some((i, text)) if *i == index => text.clone(),
                                _ => label.clone().unwrap_or_default(),
                            };
                            let response = ui.text_edit_singleline(&mut text);
                            if response.changed() {
                                *draft = Some((index, text.clone()));
                            }
                            if response.lost_focus() {
                                let trimmed = text.trim();
                                let next = (!trimmed.is_empty()).then(|| trimmed.to_string());
                                commit = Some((index, next));
                                *draft = None;
                            }
                        });
                    });
                }
            });

        if let Some((index, label)) = commit {
            if let Err(e) = self.store.set_label(index, label) {
                log::warn!("{e}");
            }
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let (logical_w, logical_h) = self.controller.canvas_size();
        let available = ui.available_size();
        let scale = (available.x / logical_w as f32)
            .min(available.y / logical_h as f32)
            .max(0.01);
        let size = egui::vec2(logical_w as f32, logical_h as f32) * scale;

        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        let canvas_rect = response.rect;
        self.controller.update_layout(Some(CanvasLayout {
            origin: to_coordinates(canvas_rect.min),
            displayed_width: canvas_rect.width() as f64,
            displayed_height: canvas_rect.height() as f64,
        }));

        if response.drag_started_by(egui::PointerButton::Primary) {
            let press = ctx
                .input(|i| i.pointer.press_origin())
                .or(response.interact_pointer_pos());
            if let Some(pos) = press {
                self.controller.press(to_coordinates(pos), &mut self.tools);
            }
        }

        if response.dragged_by(egui::PointerButton::Primary) && self.tools.is_drawing() {
            if let Some(pos) = ctx.input(|i| i.pointer.latest_pos()) {
                self.controller
                    .move_to(to_coordinates(pos), &self.tools, &mut self.store);
            }
        }

        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.controller.release(&mut self.tools, &mut self.store);
        }

        let [r, g, b] = self.config.stroke_color;
        let mut surface = CanvasPainter {
            painter: &painter,
            rect: canvas_rect,
            scale,
            stroke: egui::Stroke::new(
                self.config.border_size as f32 * scale,
                egui::Color32::from_rgb(r, g, b),
            ),
            background: self.texture.as_ref().map(|t| t.id()),
        };
        self.controller.redraw(&self.store, &mut surface);

        if self.store.has_hydrated() {
            for (index, shape) in self.store.shapes().iter().enumerate() {
                let label = match &shape.label {
                    Some(label) => format!("{index} {label}"),
                    None => index.to_string(),
                };
                painter.text(
                    surface.to_screen(shape.x, shape.y) - egui::vec2(0.0, 4.0),
                    egui::Align2::LEFT_BOTTOM,
                    label,
                    egui::FontId::proportional(14.0),
                    egui::Color32::WHITE,
                );
            }
        }

        let cursor = if self.tools.selected().is_some() {
            egui::CursorIcon::Crosshair
        } else {
            egui::CursorIcon::NotAllowed
        };
        response.on_hover_cursor(cursor);
    }
}

fn to_coordinates(pos: egui::Pos2) -> Coordinates {
    Coordinates::new(pos.x as f64, pos.y as f64)
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_hydrated();
        self.ensure_texture(ctx);

        // Keyboard shortcuts
        let (undo, redo) = ctx.input(|i| {
            let z = i.modifiers.ctrl && i.key_pressed(egui::Key::Z);
            (z && !i.modifiers.shift, z && i.modifiers.shift)
        });
        let typing = ctx.memory(|m| m.focused().is_some());
        if !typing {
            if undo {
                self.run_action(ToolbarAction::Undo);
            }
            if redo {
                self.run_action(ToolbarAction::Redo);
            }
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading("Smash Waldo editor");
            self.toolbar(ui);
            ui.add_space(4.0);
        });

        egui::SidePanel::left("labels")
            .default_width(220.0)
            .show(ctx, |ui| self.label_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui, ctx));
    }
}
