//! Main application logic and persistent user settings.

use dirs_next as dirs;
use eframe::{App, Frame, NativeOptions, egui};
use egui_extras::{Column, TableBuilder};
use rfd::FileDialog;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use log::{info, warn};

mod attributes;
use attributes::{ALL_AXIS_MODES, ALL_INTENSITIES, ALL_LOADS, ALL_TISSUES, Intensity, Tissue};
mod catalog;
use catalog::{Catalog, ExerciseRecord};
mod export;
use export::{save_drills_csv, save_drills_json};
mod filter;
use filter::{TagDimension, TagValue, counts_by_direction};
mod report;
mod scene;
use scene::{SceneCamera, SceneOptions, draw_scene};
mod selection;
mod spatial;
use spatial::SceneStyle;
mod state;
use state::{Event, ExplorerState};

fn default_rotation_speed() -> f32 {
    0.25
}

fn default_marker_size() -> f32 {
    6.0
}

fn default_true() -> bool {
    true
}

/// Persistent display preferences.
///
/// Only how the scene looks is stored. The axis mode, the selected cell and
/// the tag filters belong to the session and start empty on every launch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Settings {
    #[serde(default)]
    scene_style: SceneStyle,
    #[serde(default = "default_true")]
    auto_rotate: bool,
    /// Radians per second while auto-rotating.
    #[serde(default = "default_rotation_speed")]
    rotation_speed: f32,
    #[serde(default)]
    show_labels: bool,
    #[serde(default = "default_marker_size")]
    marker_size: f32,
    /// Alternative catalog table, read once at startup.
    #[serde(default)]
    catalog_file: Option<String>,
}

impl Settings {
    const FILE: &'static str = "plyo_explorer_settings.json";

    fn path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    /// Load settings from the JSON configuration file, falling back to the
    /// defaults when it is missing or unreadable.
    fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&data) {
                    Ok(cfg) => return cfg,
                    Err(e) => warn!("Ignoring invalid settings in {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    fn save(&self) {
        if let Some(path) = Self::path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match serde_json::to_string_pretty(self) {
                Ok(data) => {
                    if let Err(e) = std::fs::write(&path, data) {
                        log::error!("Failed to save settings: {e}");
                    }
                }
                Err(e) => log::error!("Failed to serialize settings: {e}"),
            }
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scene_style: SceneStyle::Sphere,
            auto_rotate: true,
            rotation_speed: default_rotation_speed(),
            show_labels: false,
            marker_size: default_marker_size(),
            catalog_file: None,
        }
    }
}

/// Read the catalog named in the settings, or the built-in one.
fn load_catalog(settings: &Settings) -> Catalog {
    if let Some(path) = settings.catalog_file.as_deref() {
        match Catalog::load(path) {
            Ok(c) => return c,
            Err(e) => log::error!("Using built-in catalog: {e}"),
        }
    }
    catalog::builtin().clone()
}

const STATUS_DURATION: Duration = Duration::from_secs(4);

struct ExplorerApp {
    catalog: Catalog,
    state: ExplorerState,
    camera: SceneCamera,
    settings: Settings,
    settings_dirty: bool,
    show_settings: bool,
    status: Option<(String, Instant)>,
}

impl Default for ExplorerApp {
    fn default() -> Self {
        let settings = Settings::load();
        let catalog = load_catalog(&settings);
        info!(
            "Catalog ready: {} exercises, {} issues",
            catalog.len(),
            catalog.issues().len()
        );
        Self {
            catalog,
            state: ExplorerState::default(),
            camera: SceneCamera::default(),
            settings,
            settings_dirty: false,
            show_settings: false,
            status: None,
        }
    }
}

impl ExplorerApp {
    fn dispatch(&mut self, events: Vec<Event>) {
        for event in events {
            self.state = self.state.apply(event);
        }
    }

    fn results(&self) -> Vec<&ExerciseRecord> {
        self.state.results(&self.catalog)
    }

    fn set_status(&mut self, msg: String) {
        info!("{msg}");
        self.status = Some((msg, Instant::now()));
    }

    fn export_drills(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("JSON", &["json"])
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        let drills = self.results();
        let count = drills.len();
        let result = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
        {
            Some(ext) if ext == "csv" => save_drills_csv(&path, &drills).map_err(|e| e.to_string()),
            _ => save_drills_json(&path, &drills).map_err(|e| e.to_string()),
        };
        match result {
            Ok(()) => self.set_status(format!("Exported {count} drills to {}", path.display())),
            Err(e) => log::error!("Failed to export drills: {e}"),
        }
    }

    fn export_sheet(&mut self) {
        let Some(path) = FileDialog::new().add_filter("HTML", &["html"]).save_file() else {
            return;
        };
        let drills = self.results();
        let count = drills.len();
        let selection = self.state.selection_label();
        let filters = self.state.tags().summary();
        match report::export_html_sheet(&path, selection.as_deref(), &filters, &drills) {
            Ok(()) => self.set_status(format!("Wrote drill sheet ({count} drills)")),
            Err(e) => log::error!("Failed to write drill sheet: {e}"),
        }
    }

    fn tag_group<T: Copy>(
        &self,
        ui: &mut egui::Ui,
        dim: TagDimension,
        values: &[T],
        wrap: fn(T) -> TagValue,
        events: &mut Vec<Event>,
    ) {
        ui.vertical(|ui| {
            ui.label(egui::RichText::new(dim.label()).small().strong());
            ui.horizontal_wrapped(|ui| {
                for &v in values {
                    let tag = wrap(v);
                    let on = self.state.tags().contains(tag);
                    if ui.selectable_label(on, tag.label()).clicked() {
                        events.push(Event::ToggleTag(tag));
                    }
                }
            });
        });
    }

    fn scene_panel(&mut self, ui: &mut egui::Ui, events: &mut Vec<Event>) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.heading("Plyometric Performance Sphere");
                ui.label(
                    egui::RichText::new("Click a glowing pin to filter drills")
                        .color(scene::SUBTLE),
                );
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                for style in [SceneStyle::Grid, SceneStyle::Sphere] {
                    if ui
                        .selectable_label(self.settings.scene_style == style, style.label())
                        .clicked()
                        && self.settings.scene_style != style
                    {
                        self.settings.scene_style = style;
                        self.settings_dirty = true;
                    }
                }
                ui.separator();
                for mode in ALL_AXIS_MODES.iter().rev() {
                    if ui
                        .selectable_label(self.state.axis_mode() == *mode, mode.label())
                        .clicked()
                    {
                        events.push(Event::SelectAxisMode(*mode));
                    }
                }
                ui.label("Z-Axis:");
            });
        });
        ui.separator();

        let markers = self.state.markers(self.settings.scene_style);
        let opts = SceneOptions {
            style: self.settings.scene_style,
            show_labels: self.settings.show_labels,
            marker_size: self.settings.marker_size,
            height: ui.available_height(),
        };
        if let Some(key) = draw_scene(ui, &mut self.camera, &markers, &opts) {
            events.push(Event::SelectCell(Some(key)));
        }
    }

    fn explorer_panel(&self, ui: &mut egui::Ui, events: &mut Vec<Event>) {
        ui.horizontal(|ui| {
            ui.heading("Explorer Panel");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Clear").clicked() {
                    events.push(Event::ClearAll);
                }
            });
        });
        ui.add_space(6.0);

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("CURRENT SELECTION").small().color(scene::SUBTLE));
            match (self.state.selection_label(), self.state.selection_key()) {
                (Some(label), Some(key)) => {
                    ui.label(label).on_hover_text(key);
                }
                _ => {
                    ui.label("None (click a pin on the sphere)");
                }
            }
        });
        ui.add_space(6.0);

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("REFINE BY TAGS").small().color(scene::SUBTLE));
            ui.columns(3, |cols| {
                self.tag_group(
                    &mut cols[0],
                    TagDimension::Load,
                    &ALL_LOADS,
                    TagValue::Load,
                    events,
                );
                self.tag_group(
                    &mut cols[1],
                    TagDimension::Intensity,
                    &ALL_INTENSITIES,
                    TagValue::Intensity,
                    events,
                );
                self.tag_group(
                    &mut cols[2],
                    TagDimension::Tissue,
                    &ALL_TISSUES,
                    TagValue::Tissue,
                    events,
                );
            });
        });
        ui.add_space(6.0);

        let results = self.results();
        let counts = counts_by_direction(&results);
        ui.label(
            egui::RichText::new(format!("MATCHING EXERCISES ({})", results.len()))
                .small()
                .color(scene::SUBTLE),
        );
        ui.label(
            egui::RichText::new(format!(
                "{} vertical \u{2022} {} lateral \u{2022} {} horizontal",
                counts.vertical, counts.lateral, counts.horizontal
            ))
            .small(),
        );

        if !self.catalog.issues().is_empty() {
            ui.collapsing(
                format!("Catalog issues ({})", self.catalog.issues().len()),
                |ui| {
                    for issue in self.catalog.issues() {
                        let text = egui::RichText::new(issue.to_string()).small();
                        if issue.is_rejection() {
                            ui.label(text.color(ui.visuals().warn_fg_color));
                        } else {
                            ui.label(text);
                        }
                    }
                },
            );
        }

        if results.is_empty() {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                let msg = "No matches \u{2014} click a pin and/or loosen tag filters.";
                ui.label(egui::RichText::new(msg).color(scene::SUBTLE));
            });
            return;
        }

        TableBuilder::new(ui)
            .striped(true)
            .column(Column::initial(170.0).resizable(true))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Exercise");
                });
                header.col(|ui| {
                    ui.strong("Profile");
                });
            })
            .body(|mut body| {
                for e in &results {
                    body.row(58.0, |mut row| {
                        row.col(|ui| {
                            ui.vertical(|ui| {
                                ui.strong(&e.name);
                                ui.label(&e.notes);
                            });
                        });
                        row.col(|ui| {
                            ui.vertical(|ui| {
                                ui.label(
                                    egui::RichText::new(format!(
                                        "{} \u{2022} {} \u{2022} {} \u{2022} {}",
                                        e.contact.label(),
                                        e.direction.label(),
                                        e.structure.label(),
                                        e.load.label()
                                    ))
                                    .small()
                                    .color(scene::SUBTLE),
                                );
                                ui.label(
                                    egui::RichText::new(format!(
                                        "{} \u{2022} {}",
                                        e.intensity.map(Intensity::label).unwrap_or("-"),
                                        e.tissue.map(Tissue::label).unwrap_or("-")
                                    ))
                                    .small()
                                    .color(scene::SUBTLE),
                                );
                            });
                        });
                    });
                }
            });
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                let s = &mut self.settings;
                let mut changed = false;
                ui.horizontal(|ui| {
                    ui.label("Scene:");
                    for style in [SceneStyle::Sphere, SceneStyle::Grid] {
                        changed |= ui
                            .radio_value(&mut s.scene_style, style, style.label())
                            .changed();
                    }
                });
                changed |= ui.checkbox(&mut s.auto_rotate, "Auto-rotate").changed();
                changed |= ui
                    .add(egui::Slider::new(&mut s.rotation_speed, 0.0..=2.0).text("Rotation speed"))
                    .changed();
                changed |= ui.checkbox(&mut s.show_labels, "Show all labels").changed();
                changed |= ui
                    .add(egui::Slider::new(&mut s.marker_size, 2.0..=14.0).text("Marker size"))
                    .changed();
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("Catalog file:");
                    let mut text = s.catalog_file.clone().unwrap_or_default();
                    if ui.text_edit_singleline(&mut text).changed() {
                        s.catalog_file = if text.trim().is_empty() {
                            None
                        } else {
                            Some(text)
                        };
                        changed = true;
                    }
                });
                ui.label(
                    egui::RichText::new("Catalog changes apply on next launch")
                        .small()
                        .color(scene::SUBTLE),
                );
                if ui.button("Reset view").clicked() {
                    self.camera = SceneCamera::default();
                }
                if changed {
                    self.settings_dirty = true;
                }
            });
        self.show_settings = open;
    }
}

impl App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        if self.settings.auto_rotate {
            let dt = ctx.input(|i| i.stable_dt) as f64;
            self.camera
                .advance(dt * self.settings.rotation_speed as f64, 0.0);
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Settings").clicked() {
                        self.show_settings = true;
                        ui.close_menu();
                    }
                    if ui.button("Export Drills").clicked() {
                        self.export_drills();
                        ui.close_menu();
                    }
                    if ui.button("Export Drill Sheet").clicked() {
                        self.export_sheet();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        if let Some((msg, start)) = self.status.clone() {
            if start.elapsed() < STATUS_DURATION {
                egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                    ui.label(msg);
                });
                ctx.request_repaint_after(Duration::from_millis(250));
            } else {
                self.status = None;
            }
        }

        let mut events = Vec::new();

        egui::SidePanel::right("explorer_panel")
            .default_width(460.0)
            .resizable(true)
            .show(ctx, |ui| {
                self.explorer_panel(ui, &mut events);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.scene_panel(ui, &mut events);
        });

        if self.show_settings {
            self.settings_window(ctx);
        }

        self.dispatch(events);

        if self.settings_dirty {
            self.settings.save();
            self.settings_dirty = false;
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.save();
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Plyometric Explorer"),
        ..Default::default()
    };
    eframe::run_native(
        "Plyometric Explorer",
        options,
        Box::new(|_cc| Box::new(ExplorerApp::default())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AxisMode, ContactTime, Direction, Load, Structure, ZValue};
    use crate::selection::CellKey;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;

    static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn with_config_dir<F: FnOnce(&std::path::Path)>(f: F) {
        use std::env;

        let _guard = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let prev_config = env::var_os("XDG_CONFIG_HOME");
        unsafe {
            env::set_var("XDG_CONFIG_HOME", dir.path());
        }

        f(dir.path());

        if let Some(val) = prev_config {
            unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            }
        } else {
            unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }

    #[test]
    fn settings_roundtrip() {
        let s = Settings {
            scene_style: SceneStyle::Grid,
            auto_rotate: false,
            rotation_speed: 1.5,
            show_labels: true,
            marker_size: 9.0,
            catalog_file: Some("/tmp/drills.csv".into()),
        };
        let json = serde_json::to_string(&s).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(s, loaded);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let loaded: Settings = serde_json::from_str("{\"show_labels\": true}").unwrap();
        assert_eq!(
            loaded,
            Settings {
                show_labels: true,
                ..Settings::default()
            }
        );
    }

    #[test]
    fn settings_persist_in_config_dir() {
        with_config_dir(|_| {
            let mut s = Settings::default();
            s.scene_style = SceneStyle::Grid;
            s.save();
            assert_eq!(Settings::load().scene_style, SceneStyle::Grid);

            let path = Settings::path().unwrap();
            std::fs::write(&path, "not json").unwrap();
            assert_eq!(Settings::load(), Settings::default());
        });
    }

    #[test]
    fn bad_catalog_file_falls_back_to_builtin() {
        let s = Settings {
            catalog_file: Some("/definitely/not/here.csv".into()),
            ..Settings::default()
        };
        assert_eq!(load_catalog(&s).len(), catalog::builtin().len());
    }

    #[test]
    fn catalog_file_is_used_when_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mini.csv");
        std::fs::write(
            &path,
            "name,contact,direction,load,structure,intensity,tissue,notes\n\
Tuck Jumps,Spring (Short),Vertical,BW,Bilateral,Extensive,Tendon,Elastic\n",
        )
        .unwrap();
        let s = Settings {
            catalog_file: Some(path.display().to_string()),
            ..Settings::default()
        };
        assert_eq!(load_catalog(&s).len(), 1);
    }

    #[test]
    fn dispatch_applies_events_in_order() {
        with_config_dir(|_| {
            let mut app = ExplorerApp::default();
            let key = CellKey::new(
                ContactTime::Spring,
                Direction::Vertical,
                ZValue::Structure(Structure::Bilateral),
            );
            app.dispatch(vec![
                Event::SelectCell(Some(key)),
                Event::ToggleTag(TagValue::Load(Load::Bodyweight)),
            ]);
            assert!(app.results().iter().any(|r| r.name == "Pogo Jumps"));
            assert!(app.results().iter().all(|r| r.load == Load::Bodyweight));

            app.dispatch(vec![Event::SelectAxisMode(AxisMode::Load)]);
            assert_eq!(app.state.selection(), None);
            assert!(app.results().len() < app.catalog.len());

            app.dispatch(vec![Event::ClearAll]);
            assert_eq!(app.results().len(), app.catalog.len());
        });
    }
}
