//! The validated, read-only exercise catalog.
//!
//! Rows come from a CSV table with the columns
//! `name,contact,direction,load,structure,intensity,tissue,notes`. The
//! built-in table is embedded at compile time; an alternative file with the
//! same layout can be read once at startup.

use csv::StringRecord;
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use crate::attributes::{ContactTime, Direction, Intensity, Load, Structure, Tissue};

const BUILTIN_CSV: &str = include_str!("../data/plyometrics.csv");

static BUILTIN: Lazy<Catalog> =
    Lazy::new(|| match Catalog::from_reader(BUILTIN_CSV.as_bytes()) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("Built-in catalog could not be read: {e}");
            Catalog::default()
        }
    });

/// The catalog shipped with the application.
pub fn builtin() -> &'static Catalog {
    &BUILTIN
}

/// A single drill. Required attributes are always present; `intensity` and
/// `tissue` are `None` when the source row did not provide a legal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseRecord {
    pub name: String,
    pub contact: ContactTime,
    pub direction: Direction,
    pub load: Load,
    pub structure: Structure,
    pub intensity: Option<Intensity>,
    pub tissue: Option<Tissue>,
    pub notes: String,
}

/// Columns of the catalog table, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Contact,
    Direction,
    Load,
    Structure,
    Intensity,
    Tissue,
}

impl Field {
    pub fn column(self) -> usize {
        match self {
            Field::Name => 0,
            Field::Contact => 1,
            Field::Direction => 2,
            Field::Load => 3,
            Field::Structure => 4,
            Field::Intensity => 5,
            Field::Tissue => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Contact => "contact",
            Field::Direction => "direction",
            Field::Load => "load",
            Field::Structure => "structure",
            Field::Intensity => "intensity",
            Field::Tissue => "tissue",
        }
    }
}

const NOTES_COLUMN: usize = 7;

/// Problems found while validating catalog rows. `row` is the 1-based line
/// number in the source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    /// A required field is missing or not in its vocabulary; the row was dropped.
    MalformedRecord {
        row: u64,
        name: String,
        field: Field,
    },
    /// A second row reused an existing name; the later row was dropped.
    DuplicateName { row: u64, name: String },
    /// An optional field is missing or unknown; the row was kept without it.
    MissingOptional {
        row: u64,
        name: String,
        field: Field,
    },
}

impl CatalogIssue {
    /// Whether the offending row was left out of the catalog.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, CatalogIssue::MissingOptional { .. })
    }
}

impl std::fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogIssue::MalformedRecord { row, name, field } => {
                write!(f, "row {row} ({name}): invalid {}; row skipped", field.label())
            }
            CatalogIssue::DuplicateName { row, name } => {
                write!(f, "row {row}: duplicate name {name}; row skipped")
            }
            CatalogIssue::MissingOptional { row, name, field } => {
                write!(f, "row {row} ({name}): no valid {}", field.label())
            }
        }
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "cannot read catalog: {e}"),
            CatalogError::Csv(e) => write!(f, "cannot parse catalog: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(e) => Some(e),
            CatalogError::Csv(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io(e)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(e: csv::Error) -> Self {
        CatalogError::Csv(e)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ExerciseRecord>,
    issues: Vec<CatalogIssue>,
}

impl Catalog {
    /// Parse and validate a catalog table. Bad rows are reported through
    /// [`Catalog::issues`] rather than failing the whole table; only reader
    /// level failures are returned as errors.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, CatalogError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut catalog = Catalog::default();
        let mut names = HashSet::new();
        for result in rdr.records() {
            let record = result?;
            let row = record.position().map(|p| p.line()).unwrap_or(0);
            match parse_row(&record, row) {
                Ok((exercise, missing)) => {
                    if !names.insert(exercise.name.clone()) {
                        catalog.push_issue(CatalogIssue::DuplicateName {
                            row,
                            name: exercise.name,
                        });
                        continue;
                    }
                    for issue in missing {
                        catalog.push_issue(issue);
                    }
                    catalog.records.push(exercise);
                }
                Err(issue) => catalog.push_issue(issue),
            }
        }
        Ok(catalog)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path.as_ref())?;
        let catalog = Self::from_reader(file)?;
        info!(
            "Loaded {} exercises from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    fn push_issue(&mut self, issue: CatalogIssue) {
        warn!("Catalog {issue}");
        self.issues.push(issue);
    }

    pub fn records(&self) -> &[ExerciseRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExerciseRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ExerciseRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn issues(&self) -> &[CatalogIssue] {
        &self.issues
    }
}

fn parse_row(
    record: &StringRecord,
    row: u64,
) -> Result<(ExerciseRecord, Vec<CatalogIssue>), CatalogIssue> {
    let cell = |field: Field| record.get(field.column()).unwrap_or("");
    let name = cell(Field::Name).to_string();
    let malformed = |field: Field| CatalogIssue::MalformedRecord {
        row,
        name: name.clone(),
        field,
    };

    if name.is_empty() {
        return Err(malformed(Field::Name));
    }
    let contact =
        ContactTime::from_label(cell(Field::Contact)).ok_or_else(|| malformed(Field::Contact))?;
    let direction =
        Direction::from_label(cell(Field::Direction)).ok_or_else(|| malformed(Field::Direction))?;
    let load = Load::from_label(cell(Field::Load)).ok_or_else(|| malformed(Field::Load))?;
    let structure =
        Structure::from_label(cell(Field::Structure)).ok_or_else(|| malformed(Field::Structure))?;

    let mut missing = Vec::new();
    let intensity = Intensity::from_label(cell(Field::Intensity));
    if intensity.is_none() {
        missing.push(CatalogIssue::MissingOptional {
            row,
            name: name.clone(),
            field: Field::Intensity,
        });
    }
    let tissue = Tissue::from_label(cell(Field::Tissue));
    if tissue.is_none() {
        missing.push(CatalogIssue::MissingOptional {
            row,
            name: name.clone(),
            field: Field::Tissue,
        });
    }
    let notes = record.get(NOTES_COLUMN).unwrap_or("").to_string();

    Ok((
        ExerciseRecord {
            name,
            contact,
            direction,
            load,
            structure,
            intensity,
            tissue,
            notes,
        },
        missing,
    ))
}
