use crate::error::{ProcessingError, Result};
use crate::models::{AqiReadings, FireRecord, JoinedRecord, PollutionRecord};
use crate::utils::constants::*;
use arrow::array::*;
use arrow::datatypes::{ArrowPrimitiveType, DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Output column names
pub mod columns {
    pub const FIRE_ID: &str = "Fire_ID";
    pub const FIRE_STATE: &str = "Fire_State";
    pub const FIRE_COUNTY: &str = "Fire_County";
    pub const DISCOVERY_DATE: &str = "DISCOVERY_DATE";
    pub const CONT_DATE: &str = "CONT_DATE";
    pub const FIRE_YEAR: &str = "FIRE_YEAR";
    pub const START_DATE: &str = "start_date";
    pub const LATITUDE: &str = "LATITUDE";
    pub const LONGITUDE: &str = "LONGITUDE";
    pub const STATE: &str = "State";
    pub const DATE_LOCAL: &str = "Date_Local";
    pub const FINAL_LATITUDE: &str = "Final_Latitude";
    pub const FINAL_LONGITUDE: &str = "Final_Longitude";
    pub const CO_AQI: &str = "CO AQI";
    pub const SO2_AQI: &str = "SO2 AQI";
    pub const NO2_AQI: &str = "NO2 AQI";
    pub const O3_AQI: &str = "O3 AQI";
    pub const DISTANCE_MILES: &str = "distance_miles";
    pub const DATE_DIFF: &str = "date_diff_fire_pollution";
    pub const FIRE_MONTH: &str = "FIRE_MONTH";
}

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
    batch_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            batch_size: DEFAULT_WRITE_BATCH_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Replace `path` with a Parquet file holding `records`.
    ///
    /// Rows go to a temporary file beside the destination, renamed over it
    /// only once the writer has closed cleanly; on any error the previous
    /// file is left as it was. An empty slice still yields a file with the
    /// full schema.
    pub fn write_records(&self, records: &[JoinedRecord], path: &Path) -> Result<()> {
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(directory)?;

        let mut staging = tempfile::Builder::new()
            .prefix(".fire-pollution-")
            .suffix(".parquet.partial")
            .tempfile_in(directory)?;

        let schema = self.create_schema();
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(staging.as_file_mut(), schema.clone(), Some(props))?;
        for chunk in records.chunks(self.batch_size) {
            let batch = self.records_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }
        writer.close()?;

        staging.as_file().sync_all()?;
        staging.persist(path)?;

        tracing::info!(rows = records.len(), path = %path.display(), "Parquet output written");
        Ok(())
    }

    /// Arrow schema of the joined dataset
    pub fn create_schema(&self) -> Arc<Schema> {
        let fields = vec![
            Field::new(columns::FIRE_ID, DataType::Utf8, false),
            Field::new(columns::FIRE_STATE, DataType::Utf8, false),
            Field::new(columns::FIRE_COUNTY, DataType::Utf8, true),
            Field::new(columns::DISCOVERY_DATE, DataType::Date32, true),
            Field::new(columns::CONT_DATE, DataType::Date32, true),
            Field::new(columns::FIRE_YEAR, DataType::Int32, true),
            Field::new(columns::START_DATE, DataType::Date32, true),
            Field::new(columns::LATITUDE, DataType::Float64, true),
            Field::new(columns::LONGITUDE, DataType::Float64, true),
            Field::new(columns::STATE, DataType::Utf8, false),
            Field::new(columns::DATE_LOCAL, DataType::Date32, true),
            Field::new(columns::FINAL_LATITUDE, DataType::Float64, false),
            Field::new(columns::FINAL_LONGITUDE, DataType::Float64, false),
            Field::new(columns::CO_AQI, DataType::Float64, true),
            Field::new(columns::SO2_AQI, DataType::Float64, true),
            Field::new(columns::NO2_AQI, DataType::Float64, true),
            Field::new(columns::O3_AQI, DataType::Float64, true),
            Field::new(columns::DISTANCE_MILES, DataType::Float64, true),
            Field::new(columns::DATE_DIFF, DataType::Int32, true),
            Field::new(columns::FIRE_MONTH, DataType::Int32, true),
        ];

        Arc::new(Schema::new(fields))
    }

    /// Convert records to Arrow RecordBatch
    fn records_to_batch(
        &self,
        records: &[JoinedRecord],
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let fire_ids: Vec<&str> = records.iter().map(|r| r.fire.fire_id.as_str()).collect();
        let fire_states: Vec<&str> = records.iter().map(|r| r.fire.fire_state.as_str()).collect();
        let fire_counties: Vec<Option<&str>> =
            records.iter().map(|r| r.fire.fire_county.as_deref()).collect();
        let discovery_dates: Vec<Option<i32>> =
            records.iter().map(|r| r.fire.discovery_date.map(to_epoch_days)).collect();
        let cont_dates: Vec<Option<i32>> =
            records.iter().map(|r| r.fire.cont_date.map(to_epoch_days)).collect();
        let fire_years: Vec<Option<i32>> = records.iter().map(|r| r.fire.fire_year).collect();
        let start_dates: Vec<Option<i32>> =
            records.iter().map(|r| r.fire.start_date.map(to_epoch_days)).collect();
        let fire_latitudes: Vec<Option<f64>> = records.iter().map(|r| r.fire.latitude).collect();
        let fire_longitudes: Vec<Option<f64>> = records.iter().map(|r| r.fire.longitude).collect();

        let states: Vec<&str> = records.iter().map(|r| r.pollution.state.as_str()).collect();
        let local_dates: Vec<Option<i32>> =
            records.iter().map(|r| r.pollution.date_local.map(to_epoch_days)).collect();
        let station_latitudes: Vec<f64> = records.iter().map(|r| r.pollution.latitude).collect();
        let station_longitudes: Vec<f64> = records.iter().map(|r| r.pollution.longitude).collect();
        let co: Vec<Option<f64>> = records.iter().map(|r| r.pollution.aqi.co).collect();
        let so2: Vec<Option<f64>> = records.iter().map(|r| r.pollution.aqi.so2).collect();
        let no2: Vec<Option<f64>> = records.iter().map(|r| r.pollution.aqi.no2).collect();
        let o3: Vec<Option<f64>> = records.iter().map(|r| r.pollution.aqi.o3).collect();

        let distances: Vec<Option<f64>> = records.iter().map(|r| r.distance_miles).collect();
        let date_diffs: Vec<Option<i32>> = records
            .iter()
            .map(|r| r.date_diff_fire_pollution.map(|d| d as i32))
            .collect();
        let months: Vec<Option<i32>> = records
            .iter()
            .map(|r| r.fire_month.map(|m| m as i32))
            .collect();

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(fire_ids)),
                Arc::new(StringArray::from(fire_states)),
                Arc::new(StringArray::from(fire_counties)),
                Arc::new(Date32Array::from(discovery_dates)),
                Arc::new(Date32Array::from(cont_dates)),
                Arc::new(Int32Array::from(fire_years)),
                Arc::new(Date32Array::from(start_dates)),
                Arc::new(Float64Array::from(fire_latitudes)),
                Arc::new(Float64Array::from(fire_longitudes)),
                Arc::new(StringArray::from(states)),
                Arc::new(Date32Array::from(local_dates)),
                Arc::new(Float64Array::from(station_latitudes)),
                Arc::new(Float64Array::from(station_longitudes)),
                Arc::new(Float64Array::from(co)),
                Arc::new(Float64Array::from(so2)),
                Arc::new(Float64Array::from(no2)),
                Arc::new(Float64Array::from(o3)),
                Arc::new(Float64Array::from(distances)),
                Arc::new(Int32Array::from(date_diffs)),
                Arc::new(Int32Array::from(months)),
            ],
        )?;

        Ok(batch)
    }

    /// Read rows back from an output file, up to `limit` when given
    pub fn read_records(&self, path: &Path, limit: Option<usize>) -> Result<Vec<JoinedRecord>> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(limit.unwrap_or(8192).clamp(1, 8192))
            .build()?;

        let mut records = Vec::new();
        for batch_result in reader {
            let batch = batch_result?;
            for row in 0..batch.num_rows() {
                if limit.is_some_and(|limit| records.len() >= limit) {
                    return Ok(records);
                }
                records.push(self.row_from_batch(&batch, row)?);
            }
        }

        Ok(records)
    }

    fn row_from_batch(&self, batch: &RecordBatch, row: usize) -> Result<JoinedRecord> {
        let fire = FireRecord {
            fire_id: string_value(column::<StringArray>(batch, columns::FIRE_ID)?, row)
                .unwrap_or_default(),
            fire_state: string_value(column::<StringArray>(batch, columns::FIRE_STATE)?, row)
                .unwrap_or_default(),
            fire_county: string_value(column::<StringArray>(batch, columns::FIRE_COUNTY)?, row),
            discovery_date: date_value(column::<Date32Array>(batch, columns::DISCOVERY_DATE)?, row),
            cont_date: date_value(column::<Date32Array>(batch, columns::CONT_DATE)?, row),
            fire_year: primitive_value(column::<Int32Array>(batch, columns::FIRE_YEAR)?, row),
            start_date: date_value(column::<Date32Array>(batch, columns::START_DATE)?, row),
            latitude: primitive_value(column::<Float64Array>(batch, columns::LATITUDE)?, row),
            longitude: primitive_value(column::<Float64Array>(batch, columns::LONGITUDE)?, row),
        };

        let pollution = PollutionRecord {
            state: string_value(column::<StringArray>(batch, columns::STATE)?, row)
                .unwrap_or_default(),
            date_local: date_value(column::<Date32Array>(batch, columns::DATE_LOCAL)?, row),
            latitude: column::<Float64Array>(batch, columns::FINAL_LATITUDE)?.value(row),
            longitude: column::<Float64Array>(batch, columns::FINAL_LONGITUDE)?.value(row),
            aqi: AqiReadings {
                co: primitive_value(column::<Float64Array>(batch, columns::CO_AQI)?, row),
                so2: primitive_value(column::<Float64Array>(batch, columns::SO2_AQI)?, row),
                no2: primitive_value(column::<Float64Array>(batch, columns::NO2_AQI)?, row),
                o3: primitive_value(column::<Float64Array>(batch, columns::O3_AQI)?, row),
            },
        };

        let date_diff = primitive_value(column::<Int32Array>(batch, columns::DATE_DIFF)?, row);
        let month = primitive_value(column::<Int32Array>(batch, columns::FIRE_MONTH)?, row);

        Ok(JoinedRecord::new(fire, pollution)
            .with_distance(primitive_value(
                column::<Float64Array>(batch, columns::DISTANCE_MILES)?,
                row,
            ))
            .with_date_fields(date_diff.map(i64::from), month.map(|m| m as u32)))
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();
        let column_names = file_metadata
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        let compression = if row_groups > 0 && metadata.row_group(0).num_columns() > 0 {
            metadata.row_group(0).column(0).compression()
        } else {
            self.compression
        };

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            column_names,
            file_size,
            compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_epoch() -> NaiveDate {
    // NaiveDate's default is 1970-01-01
    NaiveDate::default()
}

fn to_epoch_days(date: NaiveDate) -> i32 {
    (date - unix_epoch()).num_days() as i32
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .and_then(|array| array.as_any().downcast_ref::<T>())
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid {} column", name)))
}

fn primitive_value<T: ArrowPrimitiveType>(
    array: &PrimitiveArray<T>,
    row: usize,
) -> Option<T::Native> {
    (!array.is_null(row)).then(|| array.value(row))
}

fn string_value(array: &StringArray, row: usize) -> Option<String> {
    (!array.is_null(row)).then(|| array.value(row).to_string())
}

fn date_value(array: &Date32Array, row: usize) -> Option<NaiveDate> {
    primitive_value(array, row)
        .and_then(|days| unix_epoch().checked_add_signed(chrono::Duration::days(i64::from(days))))
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub column_names: Vec<String>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Columns: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.column_names.len(),
            self.row_groups,
            self.file_size as f64 / 1_048_576.0, // Convert to MB
            self.compression,
            avg_rows
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_record() -> JoinedRecord {
        let mut fire = FireRecord::new("7", "California")
            .with_start_date(NaiveDate::from_ymd_opt(2014, 5, 10).unwrap())
            .with_fire_year(2014)
            .with_location(34.0, -118.0);
        fire.fire_county = Some("Los Angeles".to_string());
        fire.discovery_date = NaiveDate::from_ymd_opt(2014, 5, 10);

        let local = NaiveDate::from_ymd_opt(2014, 5, 12);
        let reading = PollutionRecord::new("California", local, 34.05, -118.05)
            .with_aqi(Some(5.0), Some(2.0));

        JoinedRecord::new(fire, reading)
            .with_distance(Some(4.49))
            .with_date_fields(Some(2), Some(5))
    }

    #[test]
    fn test_epoch_days() {
        assert_eq!(to_epoch_days(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), 0);
        assert_eq!(to_epoch_days(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()), 1);
        assert_eq!(to_epoch_days(NaiveDate::from_ymd_opt(1969, 12, 31).unwrap()), -1);
    }

    #[test]
    fn test_write_empty_records_keeps_schema() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("empty.parquet");

        let writer = ParquetWriter::new();
        writer.write_records(&[], &path)?;

        let info = writer.get_file_info(&path)?;
        assert_eq!(info.total_rows, 0);
        assert_eq!(info.column_names.len(), 20);
        assert!(info.column_names.iter().any(|c| c == "date_diff_fire_pollution"));
        Ok(())
    }

    #[test]
    fn test_write_and_read_back() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nested").join("out.parquet");

        let writer = ParquetWriter::new();
        writer.write_records(&[sample_record()], &path)?;

        let records = writer.read_records(&path, None)?;
        assert_eq!(records, vec![sample_record()]);
        Ok(())
    }

    #[test]
    fn test_overwrite_replaces_previous_output() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("out.parquet");
        let writer = ParquetWriter::new().with_batch_size(2);

        writer.write_records(&vec![sample_record(); 5], &path)?;
        assert_eq!(writer.get_file_info(&path)?.total_rows, 5);

        writer.write_records(&[sample_record()], &path)?;
        assert_eq!(writer.get_file_info(&path)?.total_rows, 1);

        // No staging files left behind
        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".partial"))
            .collect();
        assert!(leftovers.is_empty());
        Ok(())
    }

    #[test]
    fn test_failed_write_leaves_destination_untouched() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("out.parquet");
        let writer = ParquetWriter::new();
        writer.write_records(&[sample_record()], &path)?;
        let before = std::fs::read(&path)?;

        // A directory in place of the parent makes staging impossible
        let blocked = temp_dir.path().join("out.parquet").join("child.parquet");
        assert!(writer.write_records(&[sample_record()], &blocked).is_err());

        assert_eq!(std::fs::read(&path)?, before);
        Ok(())
    }

    #[test]
    fn test_identical_input_gives_identical_bytes() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let first = temp_dir.path().join("first.parquet");
        let second = temp_dir.path().join("second.parquet");
        let records = vec![sample_record(); 3];

        let writer = ParquetWriter::new();
        writer.write_records(&records, &first)?;
        writer.write_records(&records, &second)?;

        assert_eq!(std::fs::read(&first)?, std::fs::read(&second)?);
        Ok(())
    }

    #[test]
    fn test_read_limit() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("out.parquet");
        let writer = ParquetWriter::new();
        writer.write_records(&vec![sample_record(); 10], &path)?;

        assert_eq!(writer.read_records(&path, Some(3))?.len(), 3);
        assert_eq!(writer.read_records(&path, None)?.len(), 10);
        Ok(())
    }

    #[test]
    fn test_different_compressions() -> Result<()> {
        let compressions = ["snappy", "gzip", "lz4", "zstd", "none"];
        let temp_dir = TempDir::new()?;

        for compression in &compressions {
            let writer = ParquetWriter::new().with_compression(compression)?;
            let path = temp_dir.path().join(format!("{}.parquet", compression));

            let result = writer.write_records(&[sample_record()], &path);
            assert!(result.is_ok(), "Failed with compression: {}", compression);
        }

        assert!(ParquetWriter::new().with_compression("brotli-ish").is_err());
        Ok(())
    }
}
