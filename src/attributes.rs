use phf::phf_map;
use serde::{Deserialize, Serialize};

/// Ground contact duration of a drill. Placed on the X axis of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContactTime {
    #[serde(rename = "Spring (Short)")]
    Spring,
    #[serde(rename = "Shock (Long)")]
    Shock,
}

pub const ALL_CONTACTS: [ContactTime; 2] = [ContactTime::Spring, ContactTime::Shock];

static CONTACT_LABELS: phf::Map<&'static str, ContactTime> = phf_map! {
    "Spring (Short)" => ContactTime::Spring,
    "Shock (Long)" => ContactTime::Shock,
};

impl ContactTime {
    pub fn label(self) -> &'static str {
        match self {
            ContactTime::Spring => "Spring (Short)",
            ContactTime::Shock => "Shock (Long)",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        CONTACT_LABELS.get(label.trim()).copied()
    }

    pub fn index(self) -> usize {
        match self {
            ContactTime::Spring => 0,
            ContactTime::Shock => 1,
        }
    }
}

/// Main direction of force. Placed on the Y axis of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Vertical,
    Lateral,
    Horizontal,
}

pub const ALL_DIRECTIONS: [Direction; 3] = [
    Direction::Vertical,
    Direction::Lateral,
    Direction::Horizontal,
];

static DIRECTION_LABELS: phf::Map<&'static str, Direction> = phf_map! {
    "Vertical" => Direction::Vertical,
    "Lateral" => Direction::Lateral,
    "Horizontal" => Direction::Horizontal,
};

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Vertical => "Vertical",
            Direction::Lateral => "Lateral",
            Direction::Horizontal => "Horizontal",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        DIRECTION_LABELS.get(label.trim()).copied()
    }

    /// Position in display order, Vertical first.
    pub fn index(self) -> usize {
        match self {
            Direction::Vertical => 0,
            Direction::Lateral => 1,
            Direction::Horizontal => 2,
        }
    }
}

/// Leg structure of a drill. One of the two third-axis choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Structure {
    Bilateral,
    Unilateral,
}

pub const ALL_STRUCTURES: [Structure; 2] = [Structure::Bilateral, Structure::Unilateral];

static STRUCTURE_LABELS: phf::Map<&'static str, Structure> = phf_map! {
    "Bilateral" => Structure::Bilateral,
    "Unilateral" => Structure::Unilateral,
};

impl Structure {
    pub fn label(self) -> &'static str {
        match self {
            Structure::Bilateral => "Bilateral",
            Structure::Unilateral => "Unilateral",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        STRUCTURE_LABELS.get(label.trim()).copied()
    }

    pub fn index(self) -> usize {
        match self {
            Structure::Bilateral => 0,
            Structure::Unilateral => 1,
        }
    }
}

/// External load applied during a drill.
///
/// Used both as a tag filter and as the alternative third axis. Variants are
/// declared in rank order so the derived `Ord` matches [`Load::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Load {
    #[serde(rename = "BW")]
    Bodyweight,
    Assisted,
    Banded,
    Loaded,
}

pub const ALL_LOADS: [Load; 4] = [Load::Bodyweight, Load::Assisted, Load::Banded, Load::Loaded];

static LOAD_LABELS: phf::Map<&'static str, Load> = phf_map! {
    "BW" => Load::Bodyweight,
    "Assisted" => Load::Assisted,
    "Banded" => Load::Banded,
    "Loaded" => Load::Loaded,
};

impl Load {
    pub fn label(self) -> &'static str {
        match self {
            Load::Bodyweight => "BW",
            Load::Assisted => "Assisted",
            Load::Banded => "Banded",
            Load::Loaded => "Loaded",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        LOAD_LABELS.get(label.trim()).copied()
    }

    /// Fixed ordering `BW < Assisted < Banded < Loaded`.
    pub fn rank(self) -> usize {
        match self {
            Load::Bodyweight => 0,
            Load::Assisted => 1,
            Load::Banded => 2,
            Load::Loaded => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Extensive,
    Intensive,
}

pub const ALL_INTENSITIES: [Intensity; 2] = [Intensity::Extensive, Intensity::Intensive];

static INTENSITY_LABELS: phf::Map<&'static str, Intensity> = phf_map! {
    "Extensive" => Intensity::Extensive,
    "Intensive" => Intensity::Intensive,
};

impl Intensity {
    pub fn label(self) -> &'static str {
        match self {
            Intensity::Extensive => "Extensive",
            Intensity::Intensive => "Intensive",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        INTENSITY_LABELS.get(label.trim()).copied()
    }
}

/// Tissue a drill mainly targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tissue {
    Tendon,
    Muscle,
    Mixed,
}

pub const ALL_TISSUES: [Tissue; 3] = [Tissue::Tendon, Tissue::Muscle, Tissue::Mixed];

static TISSUE_LABELS: phf::Map<&'static str, Tissue> = phf_map! {
    "Tendon" => Tissue::Tendon,
    "Muscle" => Tissue::Muscle,
    "Mixed" => Tissue::Mixed,
};

impl Tissue {
    pub fn label(self) -> &'static str {
        match self {
            Tissue::Tendon => "Tendon",
            Tissue::Muscle => "Muscle",
            Tissue::Mixed => "Mixed",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        TISSUE_LABELS.get(label.trim()).copied()
    }
}

/// Which attribute occupies the third axis of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AxisMode {
    #[default]
    Structure,
    Load,
}

pub const ALL_AXIS_MODES: [AxisMode; 2] = [AxisMode::Structure, AxisMode::Load];

impl AxisMode {
    pub fn label(self) -> &'static str {
        match self {
            AxisMode::Structure => "Structure",
            AxisMode::Load => "Load",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Structure" => Some(AxisMode::Structure),
            "Load" => Some(AxisMode::Load),
            _ => None,
        }
    }
}

/// A third-axis value. The variant names the axis mode it belongs to, so a
/// value can never be read under the wrong mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZValue {
    Structure(Structure),
    Load(Load),
}

impl ZValue {
    pub fn axis_mode(self) -> AxisMode {
        match self {
            ZValue::Structure(_) => AxisMode::Structure,
            ZValue::Load(_) => AxisMode::Load,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ZValue::Structure(s) => s.label(),
            ZValue::Load(l) => l.label(),
        }
    }

    /// Position within the vocabulary of its axis mode.
    pub fn index(self) -> usize {
        match self {
            ZValue::Structure(s) => s.index(),
            ZValue::Load(l) => l.rank(),
        }
    }

    pub fn from_parts(mode: AxisMode, label: &str) -> Option<Self> {
        match mode {
            AxisMode::Structure => Structure::from_label(label).map(ZValue::Structure),
            AxisMode::Load => Load::from_label(label).map(ZValue::Load),
        }
    }
}

/// Every third-axis value available under `mode`: two for Structure, four
/// for Load.
pub fn z_values(mode: AxisMode) -> Vec<ZValue> {
    match mode {
        AxisMode::Structure => ALL_STRUCTURES.iter().copied().map(ZValue::Structure).collect(),
        AxisMode::Load => ALL_LOADS.iter().copied().map(ZValue::Load).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_value_counts_follow_axis_mode() {
        assert_eq!(z_values(AxisMode::Structure).len(), 2);
        assert_eq!(z_values(AxisMode::Load).len(), 4);
        assert!(
            z_values(AxisMode::Load)
                .iter()
                .all(|z| z.axis_mode() == AxisMode::Load)
        );
    }

    #[test]
    fn z_value_from_parts_checks_mode() {
        assert_eq!(
            ZValue::from_parts(AxisMode::Load, "Banded"),
            Some(ZValue::Load(Load::Banded))
        );
        assert_eq!(ZValue::from_parts(AxisMode::Structure, "Banded"), None);
        assert_eq!(ZValue::from_parts(AxisMode::Load, "Unilateral"), None);
    }

    #[test]
    fn labels_parse_back() {
        for c in ALL_CONTACTS {
            assert_eq!(ContactTime::from_label(c.label()), Some(c));
        }
        for d in ALL_DIRECTIONS {
            assert_eq!(Direction::from_label(d.label()), Some(d));
        }
        for s in ALL_STRUCTURES {
            assert_eq!(Structure::from_label(s.label()), Some(s));
        }
        for l in ALL_LOADS {
            assert_eq!(Load::from_label(l.label()), Some(l));
        }
        for i in ALL_INTENSITIES {
            assert_eq!(Intensity::from_label(i.label()), Some(i));
        }
        for t in ALL_TISSUES {
            assert_eq!(Tissue::from_label(t.label()), Some(t));
        }
        for m in ALL_AXIS_MODES {
            assert_eq!(AxisMode::from_label(m.label()), Some(m));
        }
    }

    #[test]
    fn unknown_labels_are_rejected() {
        assert_eq!(ContactTime::from_label("Spring"), None);
        assert_eq!(Load::from_label("bw"), None);
        assert_eq!(Intensity::from_label("Mixed"), None);
        assert_eq!(Tissue::from_label("Landing posture control"), None);
        assert_eq!(Direction::from_label(" Lateral "), Some(Direction::Lateral));
    }

    #[test]
    fn load_rank_follows_declaration_order() {
        let ranks: Vec<usize> = ALL_LOADS.iter().map(|l| l.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
        assert!(Load::Bodyweight < Load::Assisted);
        assert!(Load::Banded < Load::Loaded);
    }

    #[test]
    fn serde_uses_display_labels() {
        assert_eq!(
            serde_json::to_string(&ContactTime::Spring).unwrap(),
            "\"Spring (Short)\""
        );
        assert_eq!(serde_json::to_string(&Load::Bodyweight).unwrap(), "\"BW\"");
        let parsed: Load = serde_json::from_str("\"Banded\"").unwrap();
        assert_eq!(parsed, Load::Banded);
    }
}
