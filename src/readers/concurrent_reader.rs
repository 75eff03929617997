use crate::error::Result;
use crate::models::{RawFireRow, RawPollutionRow};
use crate::readers::{FireReader, PollutionReader};
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;

/// Both input tables, as read
#[derive(Debug, Default)]
pub struct InputTables {
    pub fires: Vec<RawFireRow>,
    pub pollution: Vec<RawPollutionRow>,
}

/// Reads the fire and pollution sources concurrently on blocking tasks
pub struct ConcurrentReader {
    use_mmap: bool,
}

impl ConcurrentReader {
    pub fn new() -> Self {
        Self { use_mmap: true }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Either source failing fails the whole load
    pub async fn read_inputs(
        &self,
        fires_path: &Path,
        pollution_path: &Path,
    ) -> Result<InputTables> {
        let use_mmap = self.use_mmap;
        let fires_path: PathBuf = fires_path.to_path_buf();
        let pollution_path: PathBuf = pollution_path.to_path_buf();

        let fires_handle: JoinHandle<Result<Vec<RawFireRow>>> =
            tokio::task::spawn_blocking(move || {
                FireReader::with_mmap(use_mmap).read_fires(&fires_path)
            });

        let pollution_handle: JoinHandle<Result<Vec<RawPollutionRow>>> =
            tokio::task::spawn_blocking(move || {
                PollutionReader::with_mmap(use_mmap).read_pollution(&pollution_path)
            });

        let (fires, pollution) = tokio::try_join!(fires_handle, pollution_handle)?;

        let tables = InputTables {
            fires: fires?,
            pollution: pollution?,
        };

        tracing::info!(
            fires = tables.fires.len(),
            pollution = tables.pollution.len(),
            "Input tables loaded"
        );

        Ok(tables)
    }
}

impl Default for ConcurrentReader {
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

    fn fire_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "_c0,STATE,COUNTY,DISCOVERY_DATE,CONT_DATE,FIRE_YEAR,start_date,LATITUDE,LONGITUDE"
        )
        .unwrap();
        writeln!(file, "0,CA,Kern,2014-05-10,2014-05-11,2014,2014-05-10,35.0,-119.0").unwrap();
        file
    }

    #[tokio::test]
    async fn test_read_both_inputs() -> Result<()> {
        let fires = fire_file();
        let mut pollution = NamedTempFile::new()?;
        writeln!(pollution, "State,Date Local,Final_Latitude,Final_Longitude,SO2 AQI,CO AQI")?;
        writeln!(pollution, "California,5/12/14,35.01,-119.01,2,5")?;
        writeln!(pollution, "California,5/13/14,35.02,-119.02,3,6")?;

        let tables = ConcurrentReader::new()
            .read_inputs(fires.path(), pollution.path())
            .await?;

        assert_eq!(tables.fires.len(), 1);
        assert_eq!(tables.pollution.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_one_failing_source_fails_the_load() {
        let fires = fire_file();
        let result = ConcurrentReader::with_mmap(false)
            .read_inputs(fires.path(), Path::new("/nonexistent/pollution.csv"))
            .await;

        assert!(matches!(result, Err(ProcessingError::Io(_))));
    }
}
