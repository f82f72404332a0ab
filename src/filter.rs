//! Matching exercises against the spatial selection and the tag filters.
//!
//! Dimensions combine with AND, values inside one dimension with OR. An
//! empty tag set does not constrain its dimension.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::attributes::{Direction, Intensity, Load, Tissue, ZValue};
use crate::catalog::ExerciseRecord;
use crate::selection::CellKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagDimension {
    Load,
    Intensity,
    Tissue,
}

impl TagDimension {
    pub fn label(self) -> &'static str {
        match self {
            TagDimension::Load => "Load",
            TagDimension::Intensity => "Intensity",
            TagDimension::Tissue => "Target Tissue",
        }
    }
}

/// One value of one tag dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagValue {
    Load(Load),
    Intensity(Intensity),
    Tissue(Tissue),
}

impl TagValue {
    pub fn dimension(self) -> TagDimension {
        match self {
            TagValue::Load(_) => TagDimension::Load,
            TagValue::Intensity(_) => TagDimension::Intensity,
            TagValue::Tissue(_) => TagDimension::Tissue,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TagValue::Load(v) => v.label(),
            TagValue::Intensity(v) => v.label(),
            TagValue::Tissue(v) => v.label(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilterState {
    pub load: BTreeSet<Load>,
    pub intensity: BTreeSet<Intensity>,
    pub tissue: BTreeSet<Tissue>,
}

impl TagFilterState {
    /// Add the value if absent, remove it if present.
    pub fn toggle(&mut self, value: TagValue) {
        fn flip<T: Ord>(set: &mut BTreeSet<T>, v: T) {
            if !set.remove(&v) {
                set.insert(v);
            }
        }
        match value {
            TagValue::Load(v) => flip(&mut self.load, v),
            TagValue::Intensity(v) => flip(&mut self.intensity, v),
            TagValue::Tissue(v) => flip(&mut self.tissue, v),
        }
    }

    pub fn contains(&self, value: TagValue) -> bool {
        match value {
            TagValue::Load(v) => self.load.contains(&v),
            TagValue::Intensity(v) => self.intensity.contains(&v),
            TagValue::Tissue(v) => self.tissue.contains(&v),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.load.is_empty() && self.intensity.is_empty() && self.tissue.is_empty()
    }

    pub fn clear(&mut self) {
        self.load.clear();
        self.intensity.clear();
        self.tissue.clear();
    }

    /// One `"Dimension: a / b"` line per constrained dimension.
    pub fn summary(&self) -> Vec<String> {
        fn line<T: Copy>(
            out: &mut Vec<String>,
            dim: TagDimension,
            set: &BTreeSet<T>,
            label: fn(T) -> &'static str,
        ) {
            if !set.is_empty() {
                let values: Vec<&str> = set.iter().map(|v| label(*v)).collect();
                out.push(format!("{}: {}", dim.label(), values.join(" / ")));
            }
        }
        let mut out = Vec::new();
        line(&mut out, TagDimension::Load, &self.load, Load::label);
        line(&mut out, TagDimension::Intensity, &self.intensity, Intensity::label);
        line(&mut out, TagDimension::Tissue, &self.tissue, Tissue::label);
        out
    }
}

fn allows<T: Ord>(set: &BTreeSet<T>, value: Option<&T>) -> bool {
    if set.is_empty() {
        return true;
    }
    value.map(|v| set.contains(v)).unwrap_or(false)
}

/// Whether a record lies in the selected cell.
pub fn in_cell(record: &ExerciseRecord, key: &CellKey) -> bool {
    if record.contact != key.contact || record.direction != key.direction {
        return false;
    }
    match key.z {
        ZValue::Structure(s) => record.structure == s,
        ZValue::Load(l) => record.load == l,
    }
}

/// Per-record predicate behind [`filter`].
pub fn matches(
    record: &ExerciseRecord,
    selection: Option<&CellKey>,
    tags: &TagFilterState,
) -> bool {
    if let Some(key) = selection {
        if !in_cell(record, key) {
            return false;
        }
    }
    allows(&tags.load, Some(&record.load))
        && allows(&tags.intensity, record.intensity.as_ref())
        && allows(&tags.tissue, record.tissue.as_ref())
}

/// Records passing [`matches`], in catalog order.
pub fn filter<'a>(
    records: &'a [ExerciseRecord],
    selection: Option<&CellKey>,
    tags: &TagFilterState,
) -> Vec<&'a ExerciseRecord> {
    records
        .iter()
        .filter(|r| matches(r, selection, tags))
        .collect()
}

/// How many of the given records point in each direction.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct DirectionCounts {
    pub vertical: usize,
    pub lateral: usize,
    pub horizontal: usize,
}

pub fn counts_by_direction(records: &[&ExerciseRecord]) -> DirectionCounts {
    let mut counts = DirectionCounts::default();
    for r in records {
        match r.direction {
            Direction::Vertical => counts.vertical += 1,
            Direction::Lateral => counts.lateral += 1,
            Direction::Horizontal => counts.horizontal += 1,
        }
    }
    counts
}
