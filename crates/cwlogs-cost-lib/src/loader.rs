use crate::data_structures::{StorageClass, UsageObservation};
use crate::error::{EstimatorError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads exported `IncomingBytes` data points, one JSON object per line.
pub struct UsageLoader;

impl UsageLoader {
    pub fn new() -> Self {
        Self
    }

    /// Loads every observation in `path`. Any bad line fails the whole file.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<UsageObservation>> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let file = File::open(path).map_err(|e| EstimatorError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let reader = BufReader::new(file);
        let mut observations = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| EstimatorError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let observation = self.parse_line(&line).map_err(|message| {
                EstimatorError::upstream(
                    &source_name,
                    format!("line {}: {}", line_num + 1, message),
                )
            })?;
            observations.push(observation);
        }

        tracing::debug!(
            path = %source_name,
            observations = observations.len(),
            "loaded usage file"
        );
        Ok(observations)
    }

    /// Loads every `*.jsonl` file below `dir_path`. A file that fails to load is
    /// logged and left out; the rest of the data is still returned.
    pub fn load_from_directory<P: AsRef<Path>>(
        &self,
        dir_path: P,
    ) -> Result<Vec<UsageObservation>> {
        let mut all_observations = Vec::new();
        self.load_from_directory_recursive(dir_path.as_ref(), &mut all_observations)?;
        all_observations.sort_by_key(|o| o.date());
        Ok(all_observations)
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Vec<UsageObservation>> {
        let path = path.as_ref();
        if path.is_dir() {
            self.load_from_directory(path)
        } else {
            self.load_from_file(path)
        }
    }

    fn load_from_directory_recursive(
        &self,
        dir_path: &Path,
        observations: &mut Vec<UsageObservation>,
    ) -> Result<()> {
        let dir = std::fs::read_dir(dir_path).map_err(|e| EstimatorError::Io {
            path: dir_path.to_path_buf(),
            source: e,
        })?;

        for entry in dir {
            let entry = entry.map_err(|e| EstimatorError::Io {
                path: dir_path.to_path_buf(),
                source: e,
            })?;
            let path = entry.path();

            if path.is_file() {
                if path.extension().is_some_and(|ext| ext == "jsonl") {
                    match self.load_from_file(&path) {
                        Ok(mut file_observations) => observations.append(&mut file_observations),
                        Err(e) => {
                            tracing::warn!(error = %e, "skipping usage file");
                        }
                    }
                }
            } else if path.is_dir() {
                if let Err(e) = self.load_from_directory_recursive(&path, observations) {
                    tracing::warn!(error = %e, "skipping usage directory");
                }
            }
        }

        Ok(())
    }

    fn parse_line(&self, line: &str) -> std::result::Result<UsageObservation, String> {
        let json: Value =
            serde_json::from_str(line).map_err(|e| format!("invalid JSON: {}", e))?;

        let date = self.parse_date(&json)?;
        let log_group = json
            .get("log_group")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let storage_class = json
            .get("storage_class")
            .and_then(|v| v.as_str())
            .map(StorageClass::from_log_group_class)
            .unwrap_or(StorageClass::Standard);

        let bytes = json
            .get("bytes")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| "missing or invalid 'bytes' field".to_string())?;
        if !bytes.is_finite() || bytes < 0.0 {
            return Err(format!("'bytes' must be a non-negative number, got {}", bytes));
        }

        Ok(UsageObservation::new(date, log_group, storage_class, bytes))
    }

    fn parse_date(&self, json: &Value) -> std::result::Result<NaiveDate, String> {
        if let Some(date) = json.get("date").and_then(|v| v.as_str()) {
            return NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| format!("invalid 'date' {:?}: {}", date, e));
        }

        let timestamp = json
            .get("timestamp")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "missing 'date' or 'timestamp' field".to_string())?;
        DateTime::parse_from_rfc3339(timestamp)
            .map(|dt| dt.with_timezone(&Utc).date_naive())
            .map_err(|e| format!("invalid 'timestamp' {:?}: {}", timestamp, e))
    }
}

impl Default for UsageLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    #[test]
    fn test_parse_valid_line() {
        let loader = UsageLoader::new();
        let line = r#"{"date": "2025-04-01", "log_group": "/aws/lambda/orders", "storage_class": "INFREQUENT_ACCESS", "bytes": 2147483648}"#;

        let observation = loader.parse_line(line).unwrap();
        assert_eq!(observation.date(), day(1));
        assert_eq!(observation.log_group(), Some("/aws/lambda/orders"));
        assert_eq!(observation.storage_class(), StorageClass::InfrequentAccess);
        assert_eq!(observation.gb(), 2.0);
    }

    #[test]
    fn test_parse_timestamp_and_default_class() {
        let loader = UsageLoader::new();
        let line = r#"{"timestamp": "2025-04-03T23:30:00-02:00", "bytes": 1024}"#;

        let observation = loader.parse_line(line).unwrap();
        assert_eq!(observation.date(), day(4));
        assert_eq!(observation.log_group(), None);
        assert_eq!(observation.storage_class(), StorageClass::Standard);
    }

    #[test]
    fn test_parse_rejects_negative_bytes() {
        let loader = UsageLoader::new();
        let line = r#"{"date": "2025-04-01", "bytes": -5}"#;
        assert!(loader.parse_line(line).is_err());
    }

    #[test]
    fn test_missing_required_fields() {
        let loader = UsageLoader::new();
        assert!(loader.parse_line(r#"{"date": "2025-04-01"}"#).is_err());
        assert!(loader.parse_line(r#"{"bytes": 10}"#).is_err());
        assert!(loader.parse_line(r#"{"invalid": "json"#).is_err());
    }

    #[test]
    fn test_load_from_file_with_empty_lines() {
        let loader = UsageLoader::new();
        let mut temp_file = NamedTempFile::new().unwrap();

        let content = r#"{"date": "2025-04-01", "log_group": "/aws/lambda/a", "bytes": 1073741824}

{"date": "2025-04-02", "log_group": "/aws/lambda/a", "storage_class": "STANDARD", "bytes": 536870912}"#;
        temp_file.write_all(content.as_bytes()).unwrap();

        let observations = loader.load_from_file(temp_file.path()).unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[1].gb(), 0.5);
    }

    #[test]
    fn test_bad_line_fails_file_with_line_number() {
        let loader = UsageLoader::new();
        let mut temp_file = NamedTempFile::new().unwrap();

        let content = "{\"date\": \"2025-04-01\", \"bytes\": 1}\n{\"date\": \"April\", \"bytes\": 1}\n";
        temp_file.write_all(content.as_bytes()).unwrap();

        let err = loader.load_from_file(temp_file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamData);
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_load_directory_skips_bad_files() {
        let loader = UsageLoader::new();
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("us-east-1");
        std::fs::create_dir(&nested).unwrap();

        std::fs::write(
            dir.path().join("b.jsonl"),
            r#"{"date": "2025-04-02", "bytes": 1073741824}"#,
        )
        .unwrap();
        std::fs::write(
            nested.join("a.jsonl"),
            r#"{"date": "2025-04-01", "bytes": 1073741824}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.jsonl"), "not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let observations = loader.load(dir.path()).unwrap();
        let dates: Vec<_> = observations.iter().map(|o| o.date()).collect();
        assert_eq!(dates, vec![day(1), day(2)]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let loader = UsageLoader::new();
        let err = loader.load("/nonexistent/usage.jsonl").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
