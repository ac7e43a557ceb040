use crate::domain::RawRecord;
use crate::error::{PipelineError, Result};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Columns every input table must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

/// Loaded records plus how many rows were dropped on the way
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub records: Vec<RawRecord>,
    pub discarded: usize,
}

/// Load an OHLCV CSV from disk
pub fn load_series(path: &Path) -> Result<LoadReport> {
    let file = std::fs::File::open(path)?;
    let report = read_series(file)?;
    info!(
        path = %path.display(),
        rows = report.records.len(),
        discarded = report.discarded,
        "loaded series"
    );
    Ok(report)
}

/// Read an OHLCV table. Fails only when the header lacks a required column;
/// rows with an unusable `timestamp` or `close` are skipped and counted.
pub fn read_series<R: Read>(source: R) -> Result<LoadReport> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::Schema { missing });
    }

    // Both exist: checked above
    let ts_idx = headers.iter().position(|h| h == "timestamp").unwrap_or(0);
    let close_idx = headers.iter().position(|h| h == "close").unwrap_or(0);

    let mut report = LoadReport::default();
    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!(row = line + 1, error = %e, "dropping unreadable row");
                report.discarded += 1;
                continue;
            }
        };

        let (Some(timestamp), Some(close_text)) = (record.get(ts_idx), record.get(close_idx))
        else {
            debug!(row = line + 1, "dropping short row");
            report.discarded += 1;
            continue;
        };

        let close_text = close_text.trim();
        match close_text.parse::<f64>() {
            Ok(close) if close.is_finite() => report.records.push(RawRecord {
                timestamp: timestamp.to_string(),
                close,
                close_text: close_text.to_string(),
            }),
            _ => {
                debug!(row = line + 1, close = close_text, "dropping row with bad close");
                report.discarded += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "timestamp,open,high,low,close,volume\n";

    #[test]
    fn test_reads_rows_in_source_order() {
        let data = format!(
            "{}2024-01-03,1,2,0.5,1.5,100\n2024-01-01,1,2,0.5,1.25,100\n",
            HEADER
        );
        let report = read_series(data.as_bytes()).unwrap();
        assert_eq!(report.discarded, 0);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].timestamp, "2024-01-03");
        assert_eq!(report.records[1].timestamp, "2024-01-01");
        assert!((report.records[1].close - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_missing_volume_is_schema_error() {
        let data = "timestamp,open,high,low,close\n2024-01-01,1,2,0.5,1.5\n";
        match read_series(data.as_bytes()) {
            Err(PipelineError::Schema { missing }) => assert_eq!(missing, vec!["volume"]),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_lists_every_missing_column() {
        let data = "timestamp,open,high\n";
        match read_series(data.as_bytes()) {
            Err(PipelineError::Schema { missing }) => {
                assert_eq!(missing, vec!["low", "close", "volume"])
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_columns_and_reordering_accepted() {
        let data = "volume,close,symbol,timestamp,low,high,open\n\
                    500,42.10,AAPL,2024-02-01,41,43,41.5\n";
        let report = read_series(data.as_bytes()).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].timestamp, "2024-02-01");
        assert_eq!(report.records[0].close_text, "42.10");
    }

    #[test]
    fn test_bad_close_rows_dropped_and_counted() {
        let data = format!(
            "{}2024-01-01,1,2,0.5,abc,100\n2024-01-02,1,2,0.5,,100\n2024-01-03,1,2,0.5,2.0,100\n2024-01-04,1,2,0.5,inf,100\n",
            HEADER
        );
        let report = read_series(data.as_bytes()).unwrap();
        assert_eq!(report.discarded, 3);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].timestamp, "2024-01-03");
    }

    #[test]
    fn test_short_row_dropped() {
        let data = format!("{}2024-01-01,1,2\n2024-01-02,1,2,0.5,3,10\n", HEADER);
        let report = read_series(data.as_bytes()).unwrap();
        assert_eq!(report.discarded, 1);
        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn test_close_text_preserved_verbatim() {
        let data = format!("{}2024-01-01,1,2,0.5,227.920000,100\n", HEADER);
        let report = read_series(data.as_bytes()).unwrap();
        assert_eq!(report.records[0].close_text, "227.920000");
    }

    #[test]
    fn test_duplicates_kept_at_load_time() {
        let data = format!(
            "{}2024-01-01,1,2,0.5,3,10\n2024-01-01,1,2,0.5,4,10\n",
            HEADER
        );
        let report = read_series(data.as_bytes()).unwrap();
        assert_eq!(report.records.len(), 2);
    }

    #[test]
    fn test_header_only_gives_empty_series() {
        let report = read_series(HEADER.as_bytes()).unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.discarded, 0);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_series(Path::new("/tmp/does_not_exist_zforecast.csv"));
        assert!(matches!(result, Err(PipelineError::Io(_))));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aapl.csv");
        std::fs::write(&path, format!("{}2024-01-01,1,2,0.5,3,10\n", HEADER)).unwrap();
        let report = load_series(&path).unwrap();
        assert_eq!(report.records.len(), 1);
    }
}
