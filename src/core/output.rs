use crate::core::errors::{Result, SimError};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Where a diagnostic routes its rows. A closed set selected by
/// configuration; the kernel only requires "accept a numeric row and durably
/// record or display it".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    Stdout,
    Csv,
}

/// Append-only CSV sink: one fixed-width numeric row per call.
///
/// The column count is fixed at construction and enforced on every append;
/// there is no header. Rows are buffered, so unflushed rows are lost on a
/// fatal failure elsewhere in the run.
pub struct CsvOutput {
    writer: BufWriter<File>,
    columns: usize,
    rows_written: u64,
}

impl CsvOutput {
    /// Create (or truncate) the target file. Fails immediately if the path is
    /// unwritable.
    pub fn create(path: &Path, columns: usize) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            columns,
            rows_written: 0,
        })
    }

    pub fn append(&mut self, row: &[f64]) -> Result<()> {
        if row.len() != self.columns {
            return Err(SimError::Configuration(format!(
                "diagnostic row has {} columns, sink expects {}",
                row.len(),
                self.columns
            )));
        }
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(self.writer, "{line}")?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Configuration-selected output strategy for one diagnostic instance.
pub enum DiagnosticOutput {
    Stdout,
    Csv(CsvOutput),
}

impl DiagnosticOutput {
    pub fn write_row(&mut self, row: &[f64]) -> Result<()> {
        match self {
            DiagnosticOutput::Stdout => {
                let line = row
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{line}");
                Ok(())
            }
            DiagnosticOutput::Csv(csv) => csv.append(row),
        }
    }

    /// Flush and close durably. Stdout has nothing to flush beyond the line
    /// writes themselves.
    pub fn finalize(&mut self) -> Result<()> {
        match self {
            DiagnosticOutput::Stdout => Ok(()),
            DiagnosticOutput::Csv(csv) => csv.finalize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("gridstep_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_csv_appends_one_row_per_call() {
        let path = temp_path("rows.csv");
        let mut csv = CsvOutput::create(&path, 3).unwrap();
        csv.append(&[1.0, 2.5, -3.0]).unwrap();
        csv.append(&[0.0, 0.0, 0.0]).unwrap();
        csv.finalize().unwrap();
        assert_eq!(csv.rows_written(), 2);

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "1,2.5,-3");
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_csv_rejects_wrong_width() {
        let path = temp_path("width.csv");
        let mut csv = CsvOutput::create(&path, 3).unwrap();
        assert!(csv.append(&[1.0, 2.0]).is_err());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_csv_unwritable_path_fails_at_construction() {
        let path = std::path::Path::new("/nonexistent-dir/out.csv");
        assert!(matches!(CsvOutput::create(path, 3), Err(SimError::Sink(_))));
    }

    #[test]
    fn test_output_type_deserializes_lowercase() {
        let t: OutputType = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(t, OutputType::Csv);
        let t: OutputType = serde_json::from_str("\"stdout\"").unwrap();
        assert_eq!(t, OutputType::Stdout);
    }
}
