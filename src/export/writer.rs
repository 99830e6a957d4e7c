//! CSV output
//!
//! Semicolon-separated, UTF-8, one header row derived from the
//! configuration followed by one record per issue.

use std::path::Path;

use tracing::debug;

use crate::domain::ExporterError;

/// Write the export file at the given location.
pub fn write_csv(location: &Path, columns: &[String], records: &[Vec<String>]) -> Result<(), ExporterError> {
    debug!("Write CSV file.");

    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_path(location)?;

    writer.write_record(columns)?;
    for record in records {
        writer.write_record(record)?;
    }
    writer.flush()?;

    debug!("CSV file successfully written.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn writes_header_and_records_with_semicolons() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("export.csv");

        let columns = vec!["Key".to_string(), "Summary".to_string()];
        let records = vec![
            vec!["PKEY-1".to_string(), "First".to_string()],
            vec!["PKEY-2".to_string(), "Second; with separator".to_string()],
        ];

        write_csv(&location, &columns, &records).unwrap();

        let content = fs::read_to_string(&location).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Key;Summary"));
        assert_eq!(lines.next(), Some("PKEY-1;First"));
        // Cells containing the separator get quoted by the writer.
        assert_eq!(lines.next(), Some("PKEY-2;\"Second; with separator\""));
    }
}
