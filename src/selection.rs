//! Keys identifying one cell of the contact × direction × z cross product.
//!
//! The typed [`CellKey`] is what the rest of the program compares. The string
//! form `"{contact}|{direction}|{axis}:{z}"` only exists for labels and for
//! anything that needs to carry a key as text.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::attributes::{AxisMode, ContactTime, Direction, ZValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub contact: ContactTime,
    pub direction: Direction,
    pub z: ZValue,
}

impl CellKey {
    pub fn new(contact: ContactTime, direction: Direction, z: ZValue) -> Self {
        Self {
            contact,
            direction,
            z,
        }
    }

    pub fn axis_mode(&self) -> AxisMode {
        self.z.axis_mode()
    }

    /// Human readable form used in the explorer panel and marker labels.
    pub fn display_label(&self) -> String {
        format!(
            "{} \u{2022} {} \u{2022} {}:{}",
            self.contact.label(),
            self.direction.label(),
            self.axis_mode().label(),
            self.z.label()
        )
    }
}

impl std::fmt::Display for CellKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&encode(self))
    }
}

/// Canonical text form of a key.
pub fn encode(key: &CellKey) -> String {
    format!(
        "{}|{}|{}:{}",
        key.contact.label(),
        key.direction.label(),
        key.axis_mode().label(),
        key.z.label()
    )
}

/// Parse a key produced by [`encode`]. Anything else yields `None`, which
/// callers treat as "no selection".
pub fn decode(text: &str) -> Option<CellKey> {
    let key = parse(text);
    if key.is_none() {
        debug!("Ignoring unknown cell key {text:?}");
    }
    key
}

fn parse(text: &str) -> Option<CellKey> {
    let mut parts = text.split('|');
    let contact = ContactTime::from_label(parts.next()?)?;
    let direction = Direction::from_label(parts.next()?)?;
    let (axis, value) = parts.next()?.split_once(':')?;
    if parts.next().is_some() {
        return None;
    }
    let z = ZValue::from_parts(AxisMode::from_label(axis)?, value)?;
    Some(CellKey::new(contact, direction, z))
}
