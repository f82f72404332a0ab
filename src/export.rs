use crate::catalog::ExerciseRecord;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    value: &T,
    path: P,
) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

pub fn write_csv<T: Serialize>(writer: impl Write, records: &[T]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(Into::into)
}

/// Write drills as CSV with the same columns as the catalog table.
pub fn save_drills_csv<P: AsRef<Path>>(path: P, drills: &[&ExerciseRecord]) -> csv::Result<()> {
    write_csv(std::fs::File::create(path)?, drills)
}

pub fn save_drills_json<P: AsRef<Path>>(
    path: P,
    drills: &[&ExerciseRecord],
) -> std::io::Result<()> {
    write_json(drills, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, builtin};

    fn sample() -> Vec<&'static ExerciseRecord> {
        ["Pogo Jumps", "Low Box Hop-Down → Stick"]
            .iter()
            .filter_map(|n| builtin().get(n))
            .collect()
    }

    #[test]
    fn csv_export_reads_back_as_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drills.csv");
        save_drills_csv(&path, &sample()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("name,contact,direction,load,structure,intensity,tissue,notes")
        );
        assert_eq!(
            lines.next(),
            Some(
                "Pogo Jumps,Spring (Short),Vertical,BW,Bilateral,Extensive,Tendon,Stiffness + ankle tendon behavior"
            )
        );
        assert_eq!(
            lines.next(),
            Some("Low Box Hop-Down → Stick,Shock (Long),Vertical,BW,Bilateral,,,")
        );

        let reread = Catalog::load(&path).unwrap();
        assert_eq!(reread.len(), 2);
        assert_eq!(reread.records()[0], *sample()[0]);
    }

    #[test]
    fn json_export_uses_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drills.json");
        save_drills_json(&path, &sample()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["contact"], "Spring (Short)");
        assert_eq!(arr[0]["load"], "BW");
        assert!(arr[1]["intensity"].is_null());
    }
}
