use crate::domain::OutputRow;
use crate::error::Result;
use std::path::Path;
use tracing::info;

/// Write a `timestamp,value` series with no header. The parent directory is
/// created when missing and an existing file is truncated.
pub fn write_series(rows: &[OutputRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    for row in rows {
        writer.write_record([row.timestamp.as_str(), row.text.as_str()])?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "wrote series");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ts: &str, text: &str) -> OutputRow {
        OutputRow {
            timestamp: ts.into(),
            value: text.parse().unwrap(),
            text: text.into(),
        }
    }

    #[test]
    fn test_writes_lines_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preds.txt");
        write_series(&[row("2024-01-01", "0.123456"), row("2024-01-02", "-1.000000")], &path)
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "2024-01-01,0.123456\n2024-01-02,-1.000000\n");
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/close.txt");
        write_series(&[row("2024-01-01", "10")], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_truncates_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("close.txt");
        write_series(&[row("a", "1"), row("b", "2"), row("c", "3")], &path).unwrap();
        write_series(&[row("z", "9")], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "z,9\n");
    }

    #[test]
    fn test_empty_series_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        write_series(&[], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
