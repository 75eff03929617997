use crate::error::Result;
use crate::models::RawFireRow;
use crate::readers::csv_source::{cell, ColumnIndex, CsvSource};
use crate::utils::constants::*;
use std::path::Path;

/// Positions of the fire columns the correlation needs
struct FireColumns {
    row_id: usize,
    state: usize,
    county: usize,
    discovery_date: usize,
    cont_date: usize,
    fire_year: usize,
    start_date: usize,
    latitude: usize,
    longitude: usize,
}

impl FireColumns {
    fn resolve(index: &ColumnIndex) -> Result<Self> {
        Ok(Self {
            row_id: index.require(FIRE_ROW_ID)?,
            state: index.require(FIRE_STATE)?,
            county: index.require(FIRE_COUNTY)?,
            discovery_date: index.require(FIRE_DISCOVERY_DATE)?,
            cont_date: index.require(FIRE_CONT_DATE)?,
            fire_year: index.require(FIRE_YEAR)?,
            start_date: index.require(FIRE_START_DATE)?,
            latitude: index.require(FIRE_LATITUDE)?,
            longitude: index.require(FIRE_LONGITUDE)?,
        })
    }
}

pub struct FireReader {
    source: CsvSource,
}

impl FireReader {
    pub fn new() -> Self {
        Self {
            source: CsvSource::new(),
        }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self {
            source: CsvSource::with_mmap(use_mmap),
        }
    }

    /// Read fire rows; a missing required column fails before any row is read
    pub fn read_fires(&self, path: &Path) -> Result<Vec<RawFireRow>> {
        let text = self.source.load_text(path)?;
        self.parse_fires(&text)
    }

    pub fn parse_fires(&self, text: &str) -> Result<Vec<RawFireRow>> {
        let mut reader = self.source.reader(text);
        let index = ColumnIndex::from_headers("fire", reader.headers()?);
        let columns = FireColumns::resolve(&index)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(RawFireRow {
                row_id: cell(&record, columns.row_id).unwrap_or_default(),
                state: cell(&record, columns.state).unwrap_or_default(),
                county: cell(&record, columns.county),
                discovery_date: cell(&record, columns.discovery_date),
                cont_date: cell(&record, columns.cont_date),
                fire_year: cell(&record, columns.fire_year),
                start_date: cell(&record, columns.start_date),
                latitude: cell(&record, columns.latitude),
                longitude: cell(&record, columns.longitude),
            });
        }

        tracing::debug!(rows = rows.len(), "Fire rows read");
        Ok(rows)
    }
}

impl Default for FireReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "_c0,FIRE_NAME,STATE,COUNTY,DISCOVERY_DATE,CONT_DATE,FIRE_YEAR,start_date,LATITUDE,LONGITUDE";

    #[test]
    fn test_read_fire_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", HEADER)?;
        writeln!(
            temp_file,
            "0,POWERHOUSE,CA,Los Angeles,2014-05-10,2014-05-14,2014,2014-05-10,34.0,-118.0"
        )?;
        writeln!(temp_file, "1,,AZ,,,,2013,,33.5,")?;

        let rows = FireReader::new().read_fires(temp_file.path())?;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_id, "0");
        assert_eq!(rows[0].state, "CA");
        assert_eq!(rows[0].county.as_deref(), Some("Los Angeles"));
        assert_eq!(rows[0].start_date.as_deref(), Some("2014-05-10"));
        assert_eq!(rows[0].longitude.as_deref(), Some("-118.0"));
        assert_eq!(rows[1].state, "AZ");
        assert_eq!(rows[1].county, None);
        assert_eq!(rows[1].start_date, None);
        assert_eq!(rows[1].longitude, None);

        Ok(())
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let text = "_c0,STATE,COUNTY,DISCOVERY_DATE,CONT_DATE,FIRE_YEAR,LATITUDE,LONGITUDE\n\
                    0,CA,Kern,2014-05-10,2014-05-11,2014,35.0,-119.0\n";

        match FireReader::new().parse_fires(text) {
            Err(ProcessingError::MissingColumn { column, .. }) => assert_eq!(column, "start_date"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = FireReader::new().read_fires(Path::new("/nonexistent/fires.csv"));
        assert!(matches!(result, Err(ProcessingError::Io(_))));
    }
}
