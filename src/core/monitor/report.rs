//! JSON report dumps of completed cycles.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

use super::snapshot::CycleSnapshot;

#[derive(Serialize)]
struct Report<'a> {
    generated_at: String,
    #[serde(flatten)]
    snapshot: &'a CycleSnapshot,
}

/// Write the snapshot as pretty JSON, replacing any previous report.
pub fn write_report(path: &Path, snapshot: &CycleSnapshot) -> Result<()> {
    let report = Report {
        generated_at: chrono::Utc::now().to_rfc3339(),
        snapshot,
    };
    let body = serde_json::to_string_pretty(&report)?;
    fs::write(path, body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_is_valid_json_with_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let snapshot = CycleSnapshot::default();
        write_report(&path, &snapshot).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("generated_at").is_some());
        assert!(value.get("system").is_some());
        assert!(value.get("alerts").is_some());
    }

    #[test]
    fn report_overwrites_previous_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let mut snapshot = CycleSnapshot::default();
        snapshot.system.cpu_percent = 10.0;
        write_report(&path, &snapshot).unwrap();

        snapshot.system.cpu_percent = 55.5;
        write_report(&path, &snapshot).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["system"]["cpu_percent"].as_f64(), Some(55.5));
    }
}
