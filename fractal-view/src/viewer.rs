//! Interactive fractal tree viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`Scene`] drawing on a
//! [`StrokeCanvas`] and implements [`eframe::App`]. Each display frame fires
//! at most one scene tick, and every repaint draws all recorded strokes.

use eframe::App;
use fractal_core::{
    canvas::StrokeCanvas,
    config::{Config, MAX_DEPTH_LIMIT},
    error::ConfigError,
    scene::Scene,
    types::{Color, TreeId},
};
use glam::Vec2;
use log::warn;

/// Share of the predicted frame time that must pass before the next tick.
///
/// Below 1 so frame jitter does not skip a tick; repaints caused by input
/// arrive much sooner and are filtered out.
const FRAME_SLACK: f64 = 0.9;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The tree [`Scene`] and the [`StrokeCanvas`] it draws on.
/// - The [`Config`] being edited in the side panel.
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Match the surface to the central panel (attach, or resize and clear).
/// 2. Plant a tree on click or tap.
/// 3. If `running` is `true` and a new display frame has started, call
///    [`Viewer::step_once`].
/// 4. Paint the recorded strokes, and request another frame while trees grow.
///
/// ### Fields
/// - `scene` - Planted trees, their clock and the drawing surface.
/// - `cfg` - Configuration shown in the side panel; applied to new trees.
/// - `color_hex` - Text of the color field, parsed into `cfg.color`.
/// - `cfg_error` - Why the last edit was rejected, if it was.
///
/// - `rng` - Random number generator used for tree geometry.
///
/// - `running` - Whether a tick fires on every display frame.
/// - `last_tick_time` - egui input time of the last automatic tick.
/// - `surface_size` - Size of the surface currently attached to the scene.
pub struct Viewer {
    scene: Scene<StrokeCanvas>,
    cfg: Config,
    color_hex: String,
    cfg_error: Option<String>,

    rng: rand::rngs::ThreadRng,

    running: bool,
    last_tick_time: Option<f64>,
    surface_size: Option<egui::Vec2>,
}

impl Viewer {
    /// Creates a viewer with an empty scene and no surface yet.
    ///
    /// The surface is attached on the first frame, once the central panel
    /// has a size.
    pub fn new(cfg: Config) -> Result<Self, ConfigError> {
        Ok(Self {
            scene: Scene::new(cfg)?,
            cfg,
            color_hex: cfg.color.to_hex(),
            cfg_error: None,
            rng: rand::rng(),
            running: true,
            last_tick_time: None,
            surface_size: None,
        })
    }

    /// Keeps the scene's surface the same size as the drawing area.
    ///
    /// - The first usable size attaches a fresh surface and, if
    ///   `seed_on_start` is set, plants one tree in the middle.
    /// - A later size change resizes the surface and clears the scene.
    /// - An empty area leaves everything as is.
    fn sync_surface(&mut self, size: egui::Vec2) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }

        match self.surface_size {
            None => {
                self.scene.attach_surface(StrokeCanvas::new(size.x, size.y));
                self.surface_size = Some(size);
                if self.scene.config().seed_on_start {
                    self.scene.plant(size.x / 2.0, &mut self.rng);
                }
            }
            Some(prev) if prev != size => {
                self.scene.on_resize(size.x, size.y);
                self.surface_size = Some(size);
            }
            Some(_) => {}
        }
    }

    /// Advances every growing tree by one tick.
    fn step_once(&mut self) {
        self.scene.tick();
    }

    /// Decides whether the repaint at `now` starts a new display frame.
    ///
    /// Pointer and keyboard events repaint between frames; those must not
    /// tick, or trees would grow faster while the mouse moves.
    ///
    /// ### Parameters
    /// - `now` - egui input time of this repaint, in seconds.
    /// - `frame_interval` - Predicted time between display frames.
    ///
    /// ### Returns
    /// `true` if a tick is due; the time is then recorded as the last tick.
    fn tick_due(&mut self, now: f64, frame_interval: f32) -> bool {
        let min_gap = f64::from(frame_interval) * FRAME_SLACK;
        let due = self.last_tick_time.is_none_or(|last| now - last >= min_gap);
        if due {
            self.last_tick_time = Some(now);
        }
        due
    }

    /// Plants a tree below the clicked screen position.
    fn plant_at_screen(&mut self, pos: egui::Pos2, rect: egui::Rect) -> Option<TreeId> {
        let p = Self::screen_to_surface(pos, rect);
        self.scene.plant(p.x, &mut self.rng)
    }

    /// Pushes the edited configuration to the scene.
    ///
    /// On rejection the scene keeps its previous configuration and the
    /// reason is shown in the side panel.
    fn apply_config(&mut self) {
        let result = Color::from_hex(&self.color_hex).and_then(|color| {
            self.cfg.color = color;
            self.scene.set_config(self.cfg)
        });

        match result {
            Ok(()) => self.cfg_error = None,
            Err(e) => {
                warn!("config rejected: {e}");
                self.cfg_error = Some(e.to_string());
            }
        }
    }

    /// Converts a surface position to screen-space inside `rect`.
    fn surface_to_screen(p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        rect.min + egui::vec2(p.x, p.y)
    }

    /// Converts a screen-space position to surface coordinates.
    ///
    /// This is the inverse of [`Viewer::surface_to_screen`].
    fn screen_to_surface(p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let d = p - rect.min;
        Vec2::new(d.x, d.y)
    }

    fn to_color32(c: Color) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
    }

    /// Helper to draw a labeled numeric [`egui::DragValue`].
    fn labeled_drag<N: egui::emath::Numeric>(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut N,
        range: std::ops::RangeInclusive<N>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled inclusive `(min, max)` range.
    fn labeled_range(ui: &mut egui::Ui, label: &str, value: &mut (i32, i32), limit: i32) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(&mut value.0).range(0..=limit).prefix("min "));
            ui.add(egui::DragValue::new(&mut value.1).range(0..=limit).prefix("max "));
        });
    }

    /// Builds the top panel UI (run controls, stepping, clearing).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Clear").clicked() {
                    self.scene.clear();
                }

                ui.separator();
                ui.label("Click or tap to plant a tree");
            });
        });
    }

    /// Builds the bottom status bar (trees, strokes, frames).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("frame = {}", self.scene.clock().frame()));
                ui.separator();
                let strokes = self.scene.surface().map_or(0, |s| s.strokes().len());
                ui.label(format!("strokes = {strokes}"));
                ui.label(format!(
                    "growing = {}",
                    self.scene
                        .trees()
                        .iter()
                        .filter(|t| t.subscription().is_some())
                        .count()
                ));
                ui.label(format!("trees = {}", self.scene.len()));
            });
        });
    }

    /// Builds the right-hand configuration panel for new trees.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");
                let before = self.cfg;
                let mut color_changed = false;

                ui.separator();
                ui.label("Shape");
                Self::labeled_drag(ui, "max_depth:", &mut self.cfg.max_depth, 1..=MAX_DEPTH_LIMIT, 0.1);
                Self::labeled_range(ui, "trunk_len:", &mut self.cfg.trunk_len, 50);
                Self::labeled_range(ui, "limb_len:", &mut self.cfg.limb_len, 50);
                Self::labeled_range(ui, "spread:", &mut self.cfg.spread, 90);
                Self::labeled_drag(ui, "root_angle:", &mut self.cfg.root_angle, -180.0..=180.0, 1.0);

                ui.separator();
                ui.label("Reveal");
                Self::labeled_drag(ui, "ticks_total:", &mut self.cfg.ticks_total, 1..=120, 0.2);

                ui.separator();
                ui.label("Style");
                ui.horizontal(|ui| {
                    ui.label("color:");
                    color_changed = ui.text_edit_singleline(&mut self.color_hex).changed();
                });
                ui.checkbox(&mut self.cfg.seed_on_start, "seed a tree on start");

                if self.cfg != before || color_changed {
                    self.apply_config();
                }

                if let Some(err) = &self.cfg_error {
                    ui.colored_label(egui::Color32::RED, err.as_str());
                }

                ui.separator();
                ui.label("Changes apply to trees planted afterwards.");
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                    self.color_hex = self.cfg.color.to_hex();
                    self.apply_config();
                }
            });
    }

    /// Builds the central panel where trees are planted and drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::WHITE))
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::click());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                self.sync_surface(rect.size());

                // Touch taps arrive as primary clicks too.
                if response.clicked()
                    && let Some(pos) = response.interact_pointer_pos()
                {
                    self.plant_at_screen(pos, rect);
                }

                let (now, frame_interval) = ctx.input(|i| (i.time, i.predicted_dt));
                if self.running && self.tick_due(now, frame_interval) {
                    self.step_once();
                }

                if let Some(surface) = self.scene.surface() {
                    for s in surface.strokes() {
                        painter.line_segment(
                            [
                                Self::surface_to_screen(s.from, rect),
                                Self::surface_to_screen(s.to, rect),
                            ],
                            egui::Stroke::new(s.width, Self::to_color32(s.color)),
                        );
                    }
                }

                if self.running && self.scene.is_animating() {
                    ctx.request_repaint();
                }
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    ///
    /// This method:
    /// - Renders the top control bar and status bar.
    /// - Renders the config side panel.
    /// - Ticks and draws the central tree view and handles planting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fractal_core::canvas::Canvas;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(40.0, 30.0), egui::vec2(800.0, 600.0))
    }

    fn viewer() -> Viewer {
        Viewer::new(Config::default()).unwrap()
    }

    #[test]
    fn surface_to_screen_and_back_is_roundtrip() {
        let rect = test_rect();
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 599.0), Vec2::new(-3.5, 8.25)];

        for p in points {
            let screen = Viewer::surface_to_screen(p, rect);
            let back = Viewer::screen_to_surface(screen, rect);
            assert!(
                (back - p).length() < 1e-4,
                "roundtrip mismatch: p={:?}, back={:?}",
                p,
                back
            );
        }
        assert_eq!(
            Viewer::surface_to_screen(Vec2::ZERO, rect),
            egui::pos2(40.0, 30.0)
        );
    }

    #[test]
    fn first_sync_attaches_surface_and_seeds_a_tree() {
        let mut viewer = viewer();
        assert!(viewer.scene.surface().is_none());

        viewer.sync_surface(egui::vec2(800.0, 600.0));

        let surface = viewer.scene.surface().unwrap();
        assert_eq!(surface.size(), (800.0, 600.0));
        assert_eq!(viewer.scene.len(), 1);
        assert_eq!(viewer.scene.trees()[0].root, Vec2::new(400.0, 600.0));
    }

    #[test]
    fn first_sync_without_seed_leaves_scene_empty() {
        let cfg = Config {
            seed_on_start: false,
            ..Config::default()
        };
        let mut viewer = Viewer::new(cfg).unwrap();
        viewer.sync_surface(egui::vec2(800.0, 600.0));
        assert!(viewer.scene.surface().is_some());
        assert!(viewer.scene.is_empty());
    }

    #[test]
    fn empty_area_does_not_attach_a_surface() {
        let mut viewer = viewer();
        viewer.sync_surface(egui::vec2(0.0, 600.0));
        assert!(viewer.scene.surface().is_none());
        assert!(viewer.surface_size.is_none());
    }

    #[test]
    fn resize_clears_scene_and_surface() {
        let mut viewer = viewer();
        viewer.sync_surface(egui::vec2(800.0, 600.0));
        for _ in 0..20 {
            viewer.step_once();
        }
        assert!(!viewer.scene.surface().unwrap().strokes().is_empty());

        // Same size again changes nothing.
        viewer.sync_surface(egui::vec2(800.0, 600.0));
        assert_eq!(viewer.scene.len(), 1);

        viewer.sync_surface(egui::vec2(1024.0, 700.0));
        assert!(viewer.scene.is_empty());
        assert!(!viewer.scene.is_animating());
        let surface = viewer.scene.surface().unwrap();
        assert_eq!(surface.size(), (1024.0, 700.0));
        assert!(surface.strokes().is_empty());
    }

    #[test]
    fn click_plants_at_bottom_below_pointer() {
        let mut viewer = viewer();
        let rect = test_rect();
        viewer.sync_surface(rect.size());

        let id = viewer.plant_at_screen(egui::pos2(140.0, 200.0), rect).unwrap();
        assert_eq!(viewer.scene.trees()[id].root, Vec2::new(100.0, 600.0));
    }

    #[test]
    fn click_before_surface_exists_is_ignored() {
        let mut viewer = viewer();
        assert_eq!(viewer.plant_at_screen(egui::pos2(10.0, 10.0), test_rect()), None);
        assert!(viewer.scene.is_empty());
    }

    #[test]
    fn step_once_reveals_the_trunk_first() {
        let mut viewer = viewer();
        viewer.sync_surface(egui::vec2(800.0, 600.0));
        viewer.step_once();

        let tree = &viewer.scene.trees()[0];
        assert_eq!(tree.levels()[0][0].ticks_elapsed(), 1);
        assert_eq!(viewer.scene.surface().unwrap().strokes().len(), 1);
    }

    #[test]
    fn extra_repaints_within_a_frame_do_not_tick() {
        let mut viewer = viewer();
        let dt = 1.0 / 60.0;

        assert!(viewer.tick_due(1.0, dt));
        // Pointer moves repaint a few milliseconds later.
        assert!(!viewer.tick_due(1.0, dt));
        assert!(!viewer.tick_due(1.004, dt));
        assert!(!viewer.tick_due(1.012, dt));

        assert!(viewer.tick_due(1.0 + f64::from(dt), dt));
        assert!(!viewer.tick_due(1.0 + f64::from(dt) + 0.002, dt));
    }

    #[test]
    fn slightly_early_frame_still_ticks() {
        let mut viewer = viewer();
        let dt = 1.0 / 60.0;

        assert!(viewer.tick_due(0.0, dt));
        assert!(viewer.tick_due(0.95 * f64::from(dt), dt));
    }

    #[test]
    fn invalid_color_is_reported_and_not_applied() {
        let mut viewer = viewer();
        viewer.color_hex = "#12345".to_owned();
        viewer.apply_config();

        assert!(viewer.cfg_error.is_some());
        assert_eq!(viewer.scene.config().color, Color::BLACK);

        viewer.color_hex = "#ff0000".to_owned();
        viewer.apply_config();
        assert!(viewer.cfg_error.is_none());
        assert_eq!(viewer.scene.config().color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn invalid_ranges_keep_previous_config() {
        let mut viewer = viewer();
        viewer.cfg.limb_len = (9, 2);
        viewer.apply_config();

        assert!(viewer.cfg_error.is_some());
        assert_eq!(viewer.scene.config().limb_len, (0, 11));
    }
}
