//! Placement of cells in 3D space.
//!
//! Both scene styles are pure functions of the cell: the sphere style puts
//! contact on longitude, direction on latitude and the third axis on a small
//! radius nudge; the grid style uses plain integer indices.

use serde::{Deserialize, Serialize};

use crate::attributes::{
    ALL_CONTACTS, ALL_DIRECTIONS, AxisMode, ContactTime, Direction, Structure, ZValue, z_values,
};
use crate::selection::CellKey;

pub type Point3 = [f64; 3];

/// How markers are laid out in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SceneStyle {
    /// Glowing pins on a unit sphere.
    #[default]
    Sphere,
    /// Cubes on an evenly spaced lattice.
    Grid,
}

impl SceneStyle {
    pub fn label(self) -> &'static str {
        match self {
            SceneStyle::Sphere => "Sphere",
            SceneStyle::Grid => "Grid",
        }
    }
}

pub const SPHERE_RADIUS: f64 = 1.0;
pub const GRID_SPACING: f64 = 0.6;

/// Longitude in degrees.
pub fn longitude(contact: ContactTime) -> f64 {
    match contact {
        ContactTime::Spring => -40.0,
        ContactTime::Shock => 40.0,
    }
}

/// Latitude in degrees; Vertical is highest.
pub fn latitude(direction: Direction) -> f64 {
    match direction {
        Direction::Vertical => 40.0,
        Direction::Lateral => 0.0,
        Direction::Horizontal => -40.0,
    }
}

/// Radius offset for the third axis, within ±0.1 of the sphere surface.
pub fn radial_nudge(z: ZValue) -> f64 {
    match z {
        ZValue::Structure(Structure::Bilateral) => -0.02,
        ZValue::Structure(Structure::Unilateral) => 0.08,
        ZValue::Load(load) => load.rank() as f64 * 0.035 - 0.03,
    }
}

/// Cartesian point on the (nudged) sphere for a cell.
pub fn sphere_position(contact: ContactTime, direction: Direction, z: ZValue) -> Point3 {
    let r = SPHERE_RADIUS + radial_nudge(z);
    let phi = (90.0 - latitude(direction)).to_radians();
    let theta = longitude(contact).to_radians();
    [
        r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    ]
}

/// Integer lattice coordinates of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub column: usize,
    pub row: usize,
    pub layer: usize,
}

pub fn grid_cell(contact: ContactTime, direction: Direction, z: ZValue) -> GridCell {
    GridCell {
        column: contact.index(),
        row: ALL_DIRECTIONS.len() - 1 - direction.index(),
        layer: z.index(),
    }
}

fn centered(index: usize, count: usize) -> f64 {
    (index as f64 - (count as f64 - 1.0) / 2.0) * GRID_SPACING
}

/// World position of a grid cell, centred on the origin.
pub fn grid_position(contact: ContactTime, direction: Direction, z: ZValue) -> Point3 {
    let cell = grid_cell(contact, direction, z);
    let layers = z_values(z.axis_mode()).len();
    [
        centered(cell.column, ALL_CONTACTS.len()),
        centered(cell.row, ALL_DIRECTIONS.len()),
        centered(cell.layer, layers),
    ]
}

pub fn position(
    style: SceneStyle,
    contact: ContactTime,
    direction: Direction,
    z: ZValue,
) -> Point3 {
    match style {
        SceneStyle::Sphere => sphere_position(contact, direction, z),
        SceneStyle::Grid => grid_position(contact, direction, z),
    }
}

pub fn key_position(style: SceneStyle, key: &CellKey) -> Point3 {
    position(style, key.contact, key.direction, key.z)
}

/// One marker to place in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerSlot {
    pub key: CellKey,
    pub position: Point3,
}

/// Every cell for `mode`, contact outermost and z innermost: 12 markers for
/// Structure, 24 for Load.
pub fn markers(style: SceneStyle, mode: AxisMode) -> Vec<MarkerSlot> {
    let zs = z_values(mode);
    let mut out = Vec::with_capacity(ALL_CONTACTS.len() * ALL_DIRECTIONS.len() * zs.len());
    for contact in ALL_CONTACTS {
        for direction in ALL_DIRECTIONS {
            for &z in &zs {
                let key = CellKey::new(contact, direction, z);
                out.push(MarkerSlot {
                    key,
                    position: key_position(style, &key),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{ALL_AXIS_MODES, ALL_LOADS, Load};

    fn distance(a: Point3, b: Point3) -> f64 {
        ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
    }

    fn norm(p: Point3) -> f64 {
        distance(p, [0.0, 0.0, 0.0])
    }

    #[test]
    fn marker_counts_per_mode() {
        assert_eq!(markers(SceneStyle::Sphere, AxisMode::Structure).len(), 12);
        assert_eq!(markers(SceneStyle::Sphere, AxisMode::Load).len(), 24);
        assert_eq!(markers(SceneStyle::Grid, AxisMode::Load).len(), 24);
    }

    #[test]
    fn positions_are_injective() {
        for style in [SceneStyle::Sphere, SceneStyle::Grid] {
            for mode in ALL_AXIS_MODES {
                let ms = markers(style, mode);
                for (i, a) in ms.iter().enumerate() {
                    for b in &ms[i + 1..] {
                        assert!(
                            distance(a.position, b.position) > 1e-6,
                            "{:?} and {:?} collide in {:?}",
                            a.key,
                            b.key,
                            style
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn grid_cells_are_distinct() {
        for mode in ALL_AXIS_MODES {
            let cells: std::collections::HashSet<GridCell> = markers(SceneStyle::Grid, mode)
                .iter()
                .map(|m| grid_cell(m.key.contact, m.key.direction, m.key.z))
                .collect();
            assert_eq!(cells.len(), 6 * z_values(mode).len());
        }
    }

    #[test]
    fn positions_are_deterministic() {
        let z = ZValue::Load(Load::Banded);
        let a = position(SceneStyle::Sphere, ContactTime::Shock, Direction::Lateral, z);
        let _ = markers(SceneStyle::Sphere, AxisMode::Structure);
        let b = position(SceneStyle::Sphere, ContactTime::Shock, Direction::Lateral, z);
        assert_eq!(a, b);
    }

    #[test]
    fn sphere_point_for_spring_vertical_bilateral() {
        let p = sphere_position(
            ContactTime::Spring,
            Direction::Vertical,
            ZValue::Structure(Structure::Bilateral),
        );
        let r = 0.98;
        let phi = 50f64.to_radians();
        let theta = (-40f64).to_radians();
        assert!((p[0] - r * phi.sin() * theta.cos()).abs() < 1e-12);
        assert!((p[1] - r * phi.cos()).abs() < 1e-12);
        assert!((p[2] - r * phi.sin() * theta.sin()).abs() < 1e-12);
        assert!((norm(p) - r).abs() < 1e-12);
    }

    #[test]
    fn direction_order_is_vertical_lateral_horizontal() {
        for style in [SceneStyle::Sphere, SceneStyle::Grid] {
            let z = ZValue::Structure(Structure::Unilateral);
            let y: Vec<f64> = ALL_DIRECTIONS
                .iter()
                .map(|&d| position(style, ContactTime::Spring, d, z)[1])
                .collect();
            assert!(y[0] > y[1] && y[1] > y[2], "{style:?}: {y:?}");
        }
    }

    #[test]
    fn contacts_are_symmetric() {
        let z = ZValue::Load(Load::Assisted);
        let spring = sphere_position(ContactTime::Spring, Direction::Lateral, z);
        let shock = sphere_position(ContactTime::Shock, Direction::Lateral, z);
        assert!((spring[0] - shock[0]).abs() < 1e-12);
        assert!((spring[2] + shock[2]).abs() < 1e-12);

        let spring = grid_position(ContactTime::Spring, Direction::Lateral, z);
        let shock = grid_position(ContactTime::Shock, Direction::Lateral, z);
        assert!((spring[0] + shock[0]).abs() < 1e-12);
    }

    #[test]
    fn load_nudge_increases_with_rank() {
        let radii: Vec<f64> = ALL_LOADS
            .iter()
            .map(|&l| {
                let z = ZValue::Load(l);
                norm(sphere_position(ContactTime::Shock, Direction::Horizontal, z))
            })
            .collect();
        assert!(radii.windows(2).all(|w| w[0] < w[1]), "{radii:?}");
        for r in radii {
            assert!((r - SPHERE_RADIUS).abs() <= 0.1);
        }
    }

    #[test]
    fn grid_layers_follow_rank() {
        let cell = grid_cell(ContactTime::Shock, Direction::Vertical, ZValue::Load(Load::Loaded));
        assert_eq!(
            cell,
            GridCell {
                column: 1,
                row: 2,
                layer: 3
            }
        );
        let p = grid_position(ContactTime::Shock, Direction::Vertical, ZValue::Load(Load::Loaded));
        assert_eq!(p, [0.5 * GRID_SPACING, GRID_SPACING, 1.5 * GRID_SPACING]);
    }
}
