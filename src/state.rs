//! Explorer session state as an immutable snapshot.
//!
//! The UI holds the only mutable slot with the current [`ExplorerState`] and
//! replaces it with the result of [`ExplorerState::apply`] for every input
//! event. Everything the scene and panel draw is derived from the snapshot.

use log::{debug, warn};

use crate::attributes::AxisMode;
use crate::catalog::{Catalog, ExerciseRecord};
use crate::filter::{TagFilterState, TagValue, filter};
use crate::selection::{self, CellKey};
use crate::spatial::{self, Point3, SceneStyle};

/// Input events coming from the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SelectAxisMode(AxisMode),
    SelectCell(Option<CellKey>),
    ToggleTag(TagValue),
    ClearAll,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplorerState {
    axis_mode: AxisMode,
    selection: Option<CellKey>,
    tags: TagFilterState,
}

/// A marker ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub key: CellKey,
    pub position: Point3,
    pub active: bool,
    pub label: String,
}

impl ExplorerState {
    pub fn axis_mode(&self) -> AxisMode {
        self.axis_mode
    }

    pub fn selection(&self) -> Option<&CellKey> {
        self.selection.as_ref()
    }

    pub fn tags(&self) -> &TagFilterState {
        &self.tags
    }

    /// Switching to another mode drops the selection, since its z value only
    /// means something under the mode it was made in.
    pub fn select_axis_mode(&self, mode: AxisMode) -> Self {
        if mode == self.axis_mode {
            return self.clone();
        }
        Self {
            axis_mode: mode,
            selection: None,
            tags: self.tags.clone(),
        }
    }

    /// A key from another axis mode is ignored.
    pub fn select_cell(&self, key: Option<CellKey>) -> Self {
        if let Some(k) = key {
            if k.axis_mode() != self.axis_mode {
                warn!(
                    "Ignoring cell {k} selected under {} while in {} mode",
                    k.axis_mode().label(),
                    self.axis_mode.label()
                );
                return self.clone();
            }
        }
        Self {
            selection: key,
            ..self.clone()
        }
    }

    /// Select a cell from its text form; unknown keys clear the selection.
    pub fn select_encoded(&self, text: &str) -> Self {
        self.select_cell(selection::decode(text))
    }

    pub fn toggle_tag(&self, value: TagValue) -> Self {
        let mut tags = self.tags.clone();
        tags.toggle(value);
        Self {
            tags,
            ..self.clone()
        }
    }

    /// Drop the selection and every tag; the axis mode stays.
    pub fn clear_all(&self) -> Self {
        let mut next = self.clone();
        next.selection = None;
        next.tags.clear();
        next
    }

    pub fn apply(&self, event: Event) -> Self {
        debug!("Applying {event:?}");
        match event {
            Event::SelectAxisMode(mode) => self.select_axis_mode(mode),
            Event::SelectCell(key) => self.select_cell(key),
            Event::ToggleTag(value) => self.toggle_tag(value),
            Event::ClearAll => self.clear_all(),
        }
    }

    pub fn results<'a>(&self, catalog: &'a Catalog) -> Vec<&'a ExerciseRecord> {
        filter(catalog.records(), self.selection.as_ref(), &self.tags)
    }

    pub fn selection_key(&self) -> Option<String> {
        self.selection.as_ref().map(selection::encode)
    }

    pub fn selection_label(&self) -> Option<String> {
        self.selection.as_ref().map(CellKey::display_label)
    }

    pub fn is_active(&self, key: &CellKey) -> bool {
        self.selection.as_ref() == Some(key)
    }

    pub fn markers(&self, style: SceneStyle) -> Vec<Marker> {
        spatial::markers(style, self.axis_mode)
            .into_iter()
            .map(|m| Marker {
                active: self.is_active(&m.key),
                label: m.key.display_label(),
                key: m.key,
                position: m.position,
            })
            .collect()
    }
}
