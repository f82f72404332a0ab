//! Drawing the markers of the current state in an orbiting plot view.

use egui::Color32;
use egui_plot::{Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::attributes::Direction;
use crate::selection::CellKey;
use crate::spatial::{Point3, SceneStyle};
use crate::state::Marker;

pub const ACCENT: Color32 = Color32::from_rgb(0x22, 0xc5, 0x5e);
pub const SUBTLE: Color32 = Color32::from_rgb(0x94, 0xa3, 0xb8);

/// Markers further than this from the click (in plot units) are not picked.
const PICK_RADIUS: f64 = 0.15;

pub fn direction_color(direction: Direction) -> Color32 {
    match direction {
        Direction::Vertical => Color32::from_rgb(0x60, 0xa5, 0xfa),
        Direction::Lateral => Color32::from_rgb(0xf9, 0x73, 0x16),
        Direction::Horizontal => Color32::from_rgb(0xf5, 0x9e, 0x0b),
    }
}

/// Orbit camera looking at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneCamera {
    pub yaw: f64,
    pub pitch: f64,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.35,
        }
    }
}

impl SceneCamera {
    /// Orthographic projection. Returns the screen point and a depth where
    /// larger values are closer to the viewer.
    pub fn project(&self, p: Point3) -> ([f64; 2], f64) {
        let (sin_y, cos_y) = self.yaw.sin_cos();
        let (sin_x, cos_x) = self.pitch.sin_cos();

        let x1 = p[0] * cos_y - p[2] * sin_y;
        let z1 = p[0] * sin_y + p[2] * cos_y;

        let y2 = p[1] * cos_x - z1 * sin_x;
        let z2 = p[1] * sin_x + z1 * cos_x;
        ([x1, y2], z2)
    }

    pub fn advance(&mut self, yaw_delta: f64, pitch_delta: f64) {
        self.yaw = (self.yaw + yaw_delta) % std::f64::consts::TAU;
        self.pitch = (self.pitch + pitch_delta).clamp(-1.4, 1.4);
    }
}

/// Index of the point closest to `pointer`, if any lies within `max_dist`.
pub fn nearest_point(pointer: [f64; 2], points: &[[f64; 2]], max_dist: f64) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, (p[0] - pointer[0]).powi(2) + (p[1] - pointer[1]).powi(2)))
        .filter(|(_, d)| *d <= max_dist * max_dist)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
}

pub struct SceneOptions {
    pub style: SceneStyle,
    pub show_labels: bool,
    pub marker_size: f32,
    pub height: f32,
}

/// Draw the scene and report the marker the user clicked, if any.
pub fn draw_scene(
    ui: &mut egui::Ui,
    camera: &mut SceneCamera,
    markers: &[Marker],
    opts: &SceneOptions,
) -> Option<CellKey> {
    let mut projected: Vec<([f64; 2], f64, &Marker)> = markers
        .iter()
        .map(|m| {
            let (p, depth) = camera.project(m.position);
            (p, depth, m)
        })
        .collect();
    // Far markers first so near ones are drawn on top.
    projected.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let extent = match opts.style {
        SceneStyle::Sphere => 1.35,
        SceneStyle::Grid => 1.6,
    };
    let shape = match opts.style {
        SceneStyle::Sphere => MarkerShape::Circle,
        SceneStyle::Grid => MarkerShape::Square,
    };

    let mut pointer: Option<PlotPoint> = None;
    let resp = Plot::new("scene_plot")
        .height(opts.height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .include_x(-extent)
        .include_x(extent)
        .include_y(-extent)
        .include_y(extent)
        .show(ui, |plot_ui| {
            pointer = plot_ui.pointer_coordinate();
            if opts.style == SceneStyle::Sphere {
                plot_ui.line(
                    Line::new(PlotPoints::from_parametric_callback(
                        |t| (t.cos(), t.sin()),
                        0.0..=std::f64::consts::TAU,
                        128,
                    ))
                    .color(ACCENT.gamma_multiply(0.3)),
                );
            }
            for (p, depth, m) in &projected {
                let color = if m.active {
                    ACCENT
                } else {
                    direction_color(m.key.direction)
                };
                let size = if m.active {
                    opts.marker_size * 1.6
                } else {
                    opts.marker_size
                };
                // Dim the back half of the scene.
                let fade = if *depth < 0.0 { 0.45 } else { 1.0 };
                plot_ui.points(
                    Points::new(vec![*p])
                        .shape(shape)
                        .filled(true)
                        .radius(size)
                        .color(color.gamma_multiply(fade)),
                );
                if opts.show_labels || m.active {
                    plot_ui.text(
                        Text::new(PlotPoint::new(p[0], p[1] + 0.07), m.label.clone())
                            .color(if m.active { ACCENT } else { SUBTLE.gamma_multiply(fade) }),
                    );
                }
            }
        });

    if resp.response.dragged() {
        let delta = resp.response.drag_delta();
        camera.advance(delta.x as f64 * 0.01, delta.y as f64 * 0.01);
    }

    if !resp.response.clicked() {
        return None;
    }
    let ptr = pointer?;
    // Near markers win ties because they come last in `projected`.
    let points: Vec<[f64; 2]> = projected.iter().rev().map(|(p, _, _)| *p).collect();
    nearest_point([ptr.x, ptr.y], &points, PICK_RADIUS)
        .map(|i| projected[projected.len() - 1 - i].2.key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_camera_drops_depth_axis() {
        let cam = SceneCamera {
            yaw: 0.0,
            pitch: 0.0,
        };
        let (p, depth) = cam.project([0.3, -0.2, 0.9]);
        assert_eq!(p, [0.3, -0.2]);
        assert_eq!(depth, 0.9);
    }

    #[test]
    fn projection_preserves_length() {
        let cam = SceneCamera {
            yaw: 1.1,
            pitch: -0.4,
        };
        let v = [0.5, 0.25, -0.75];
        let (p, depth) = cam.project(v);
        let before = v.iter().map(|c| c * c).sum::<f64>();
        let after = p[0] * p[0] + p[1] * p[1] + depth * depth;
        assert!((before - after).abs() < 1e-12);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = SceneCamera::default();
        cam.advance(0.0, 10.0);
        assert_eq!(cam.pitch, 1.4);
        cam.advance(0.0, -10.0);
        assert_eq!(cam.pitch, -1.4);
    }

    #[test]
    fn nearest_point_respects_radius() {
        let pts = [[0.0, 0.0], [1.0, 1.0], [0.1, 0.0]];
        assert_eq!(nearest_point([0.09, 0.0], &pts, 0.2), Some(2));
        assert_eq!(nearest_point([0.5, 0.5], &pts, 0.2), None);
        assert_eq!(nearest_point([0.5, 0.5], &[], 1.0), None);
    }

    #[test]
    fn direction_colours_are_distinct() {
        let colors = [
            direction_color(Direction::Vertical),
            direction_color(Direction::Lateral),
            direction_color(Direction::Horizontal),
        ];
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }
}
