/// Fire input columns
pub const FIRE_ROW_ID: &str = "_c0";
pub const FIRE_STATE: &str = "STATE";
pub const FIRE_COUNTY: &str = "COUNTY";
pub const FIRE_DISCOVERY_DATE: &str = "DISCOVERY_DATE";
pub const FIRE_CONT_DATE: &str = "CONT_DATE";
pub const FIRE_YEAR: &str = "FIRE_YEAR";
pub const FIRE_START_DATE: &str = "start_date";
pub const FIRE_LATITUDE: &str = "LATITUDE";
pub const FIRE_LONGITUDE: &str = "LONGITUDE";

/// Pollution input columns
pub const POLLUTION_DATE_LOCAL: &str = "Date Local";
pub const POLLUTION_STATE: &str = "State";
pub const POLLUTION_LATITUDE: &str = "Final_Latitude";
pub const POLLUTION_LONGITUDE: &str = "Final_Longitude";
pub const POLLUTION_CO_AQI: &str = "CO AQI";
pub const POLLUTION_SO2_AQI: &str = "SO2 AQI";
pub const POLLUTION_NO2_AQI: &str = "NO2 AQI";
pub const POLLUTION_O3_AQI: &str = "O3 AQI";

/// Default file locations
pub const DEFAULT_FIRES_FILE: &str = "fire_data_v2.csv";
pub const DEFAULT_POLLUTION_FILE: &str = "pollution_data_v2.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "output/fire_pollution.parquet";

/// Correlation defaults
pub const DEFAULT_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_MAX_DISTANCE_MILES: f64 = 20.0;
pub const EARTH_RADIUS_MILES: f64 = 3958.8;
pub const DEFAULT_MIN_FIRE_YEAR: i32 = 2008;
pub const DEFAULT_MAX_FIRE_YEAR: i32 = 2014;
pub const DEFAULT_START_DATE_FROM: &str = "2014-05-02";
pub const DEFAULT_START_DATE_TO: &str = "2014-06-02";

/// State abbreviations rewritten on fire rows
pub const STATE_ABBREVIATIONS: [(&str, &str); 2] = [("CA", "California"), ("AZ", "Arizona")];

/// Pollution states kept for analysis
pub const ANALYSIS_STATES: [&str; 2] = ["Arizona", "California"];

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_WRITE_BATCH_SIZE: usize = 8192;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
