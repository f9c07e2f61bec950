//! Export writers for the raw transcript and captured series.
use crate::core::TextExporter;
#[cfg(feature = "storage_csv")]
use crate::data::series::SeriesSnapshot;
use crate::error::{AppResult, ScopeError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name used for the raw transcript export.
pub const RAW_EXPORT_FILENAME: &str = "data.txt";

/// MIME type used for the raw transcript export.
pub const RAW_EXPORT_MIME: &str = "text/plain";

/// Writes exported text into a directory, one file per download.
#[derive(Debug, Clone)]
pub struct FileExporter {
    dir: PathBuf,
}

impl FileExporter {
    /// Writes into `dir`, created on first export.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TextExporter for FileExporter {
    fn download_text(&self, content: &str, filename: &str, mime_type: &str) -> AppResult<()> {
        // Only a bare file name is accepted so an export never escapes the directory.
        let name = Path::new(filename);
        if name.file_name().map(Path::new) != Some(name) {
            return Err(ScopeError::Export(format!(
                "refusing to export to '{filename}': not a plain file name"
            )));
        }
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, content)?;
        info!(path = %path.display(), mime_type, bytes = content.len(), "exported text");
        Ok(())
    }
}

/// A writer for captured series as CSV rows `source,variable,timestamp_ms,value`.
#[cfg(feature = "storage_csv")]
#[derive(Debug, Clone)]
pub struct CsvSeriesExporter {
    path: PathBuf,
}

#[cfg(feature = "storage_csv")]
impl CsvSeriesExporter {
    /// Exporter writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default file name for a series export taken now.
    pub fn timestamped_name() -> String {
        format!("series_{}.csv", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    }

    /// Writes one row per point and returns the row count.
    pub fn write(&self, series: &[SeriesSnapshot]) -> AppResult<usize> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = csv::Writer::from_path(&self.path).map_err(csv_error)?;
        writer
            .write_record(["source", "variable", "timestamp_ms", "value"])
            .map_err(csv_error)?;

        let mut rows = 0;
        for snapshot in series {
            for point in &snapshot.points {
                let timestamp = point.timestamp_ms.to_string();
                let value = point.value.to_string();
                writer
                    .write_record([
                        snapshot.key.source_id.as_str(),
                        snapshot.key.variable.as_str(),
                        timestamp.as_str(),
                        value.as_str(),
                    ])
                    .map_err(csv_error)?;
                rows += 1;
            }
        }
        writer.flush()?;
        info!(path = %self.path.display(), rows, "exported series");
        Ok(rows)
    }
}

#[cfg(feature = "storage_csv")]
fn csv_error(err: csv::Error) -> ScopeError {
    ScopeError::Export(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_exporter_writes_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path().join("exports"));
        exporter
            .download_text("hum:55\nhello\n", RAW_EXPORT_FILENAME, RAW_EXPORT_MIME)
            .unwrap();
        let written = fs::read_to_string(dir.path().join("exports").join("data.txt")).unwrap();
        assert_eq!(written, "hum:55\nhello\n");
    }

    #[test]
    fn file_exporter_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path());
        let result = exporter.download_text("x", "../escape.txt", RAW_EXPORT_MIME);
        assert!(matches!(result, Err(ScopeError::Export(_))));
    }

    #[cfg(feature = "storage_csv")]
    #[test]
    fn csv_exporter_writes_one_row_per_point() {
        use crate::core::{ChartKey, Point};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");
        let snapshot = SeriesSnapshot {
            key: ChartKey::new("srcA", Some("hum")),
            index: 0,
            simulated: true,
            points: vec![
                Point {
                    timestamp_ms: 10,
                    value: 55,
                },
                Point {
                    timestamp_ms: 20,
                    value: 57,
                },
            ],
        };

        let rows = CsvSeriesExporter::new(&path).write(&[snapshot]).unwrap();
        assert_eq!(rows, 2);
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "source,variable,timestamp_ms,value\nsrcA,hum,10,55\nsrcA,hum,20,57\n"
        );
    }
}
