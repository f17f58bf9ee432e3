use crate::error::{Result, TraderdError};
use chrono::{Local, TimeZone};
use serde::Serialize;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Chart payload: local HH:MM labels and the charted values, in file order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Read the most recent records from a line-delimited JSON history file.
///
/// Each line is expected to carry a numeric `ts` (epoch seconds) and a
/// numeric `value_field`. The window of the last `max_points` lines is
/// taken first, then parsed; malformed lines inside the window are
/// skipped, never fatal. A missing file yields an empty chart.
pub async fn read_recent(path: &Path, value_field: &str, max_points: usize) -> Result<ChartData> {
    if !path.exists() {
        return Ok(ChartData::default());
    }

    let file = File::open(path)
        .await
        .map_err(|e| TraderdError::Telemetry(format!("Failed to open history file: {}", e)))?;

    let reader = BufReader::new(file);
    let mut all_lines = Vec::new();

    let mut lines = reader.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| TraderdError::Telemetry(format!("Failed to read history line: {}", e)))?
    {
        all_lines.push(line);
    }

    let start_index = all_lines.len().saturating_sub(max_points);

    let mut data = ChartData::default();
    for line in &all_lines[start_index..] {
        let Ok(record) = serde_json::from_str::<serde_json::Value>(line) else {
            continue;
        };
        let Some(ts) = record.get("ts").and_then(|v| v.as_f64()) else {
            continue;
        };
        let Some(value) = record.get(value_field).and_then(|v| v.as_f64()) else {
            continue;
        };
        let Some(label) = format_label(ts as i64) else {
            continue;
        };

        data.labels.push(label);
        data.values.push(value);
    }

    Ok(data)
}

/// Format an epoch timestamp as a local HH:MM chart label.
///
/// Out-of-range timestamps yield None and the record is skipped.
fn format_label(ts: i64) -> Option<String> {
    Local
        .timestamp_opt(ts, 0)
        .earliest()
        .map(|dt| dt.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_history(dir: &TempDir, lines: &[String]) -> std::path::PathBuf {
        let path = dir.path().join("history.jsonl");
        std::fs::write(&path, lines.join("\n") + "\n").unwrap();
        path
    }

    #[tokio::test]
    async fn test_read_recent_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.jsonl");

        let data = read_recent(&path, "total_account_value", 200).await.unwrap();
        assert!(data.labels.is_empty());
        assert!(data.values.is_empty());
    }

    #[tokio::test]
    async fn test_read_recent_basic() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_history(
            &temp_dir,
            &[
                r#"{"ts": 1700000000, "total_account_value": 1000.5}"#.to_string(),
                r#"{"ts": 1700000600, "total_account_value": 1001.25}"#.to_string(),
            ],
        );

        let data = read_recent(&path, "total_account_value", 200).await.unwrap();
        assert_eq!(data.values, vec![1000.5, 1001.25]);
        assert_eq!(data.labels.len(), 2);
        // HH:MM shape
        assert_eq!(data.labels[0].len(), 5);
        assert_eq!(&data.labels[0][2..3], ":");
    }

    #[tokio::test]
    async fn test_read_recent_windows_last_points() {
        let temp_dir = TempDir::new().unwrap();
        let lines: Vec<String> = (0..10)
            .map(|i| format!(r#"{{"ts": {}, "total_account_value": {}}}"#, 1700000000 + i * 60, i))
            .collect();
        let path = write_history(&temp_dir, &lines);

        let data = read_recent(&path, "total_account_value", 3).await.unwrap();
        // Last 3 records, original file order
        assert_eq!(data.values, vec![7.0, 8.0, 9.0]);
    }

    #[tokio::test]
    async fn test_read_recent_skips_malformed_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_history(
            &temp_dir,
            &[
                r#"{"ts": 1700000000, "total_account_value": 1.0}"#.to_string(),
                "not json at all".to_string(),
                r#"{"ts": "bad", "total_account_value": 2.0}"#.to_string(),
                r#"{"ts": 1700000120}"#.to_string(),
                r#"{"ts": 1700000180, "total_account_value": 4.0}"#.to_string(),
            ],
        );

        let data = read_recent(&path, "total_account_value", 200).await.unwrap();
        assert_eq!(data.values, vec![1.0, 4.0]);
        assert_eq!(data.labels.len(), 2);
    }

    #[tokio::test]
    async fn test_read_recent_custom_value_field() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_history(
            &temp_dir,
            &[r#"{"ts": 1700000000, "equity": 55.5}"#.to_string()],
        );

        let data = read_recent(&path, "equity", 200).await.unwrap();
        assert_eq!(data.values, vec![55.5]);
    }
}
