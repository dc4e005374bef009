//! JSON output formatting

use crate::error::{DnssecToolkitError, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Output JSON to stdout
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| DnssecToolkitError::Parse(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

/// Output JSON to file
pub fn write_json_file<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| DnssecToolkitError::Parse(e.to_string()))?;

    let mut file =
        File::create(path).map_err(|e| DnssecToolkitError::File(e.to_string()))?;

    file.write_all(json.as_bytes())
        .map_err(|e| DnssecToolkitError::File(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let data = json!({"target": "example.com.", "dnssec": true});

        write_json_file(&data, &path).unwrap();

        let read_back: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read_back, data);
    }

    #[test]
    fn test_write_json_file_bad_path() {
        let data = json!({"target": "example.com."});
        let err = write_json_file(&data, Path::new("/nonexistent-dir/report.json"));
        assert!(err.is_err());
    }
}
