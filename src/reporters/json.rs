use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Outputs a report as pretty JSON. Writes to a file if given, otherwise stdout.
///
/// Non-finite scores (the `NaN` / `inf` sentinels) serialize as `null`.
pub fn report_json<T: Serialize>(report: &T, output_file: Option<&Path>) -> Result<(), String> {
    if let Some(path) = output_file {
        let file = File::create(path)
            .map_err(|e| format!("Failed to open {} for writing: {e}", path.display()))?;
        write_json(report, BufWriter::new(file))
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
        eprintln!("✓ JSON report written to {}", path.display());
    } else {
        let stdout = std::io::stdout();
        write_json(report, BufWriter::new(stdout.lock()))
            .map_err(|e| format!("Failed to write stdout: {e}"))?;
    }

    Ok(())
}

fn write_json<T: Serialize, W: Write>(report: &T, mut writer: W) -> Result<(), String> {
    serde_json::to_writer_pretty(&mut writer, report)
        .map_err(|e| format!("JSON serialization failed: {e}"))?;
    writer.write_all(b"\n").map_err(|e| e.to_string())?;
    writer.flush().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MemberScore;

    #[test]
    fn test_sentinels_serialize_as_null() {
        let rows = vec![MemberScore { name: "solo".to_string(), share: 1.0, blame: f64::NAN }];
        let mut buf = Vec::new();
        write_json(&rows, &mut buf).expect("should serialize");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("valid JSON");
        assert!(value[0]["blame"].is_null(), "NaN blame should be null: {value}");
        assert_eq!(value[0]["share"], 1.0);
    }
}
