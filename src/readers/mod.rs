pub mod concurrent_reader;
pub mod csv_source;
pub mod fire_reader;
pub mod pollution_reader;

pub use concurrent_reader::{ConcurrentReader, InputTables};
pub use csv_source::{ColumnIndex, CsvSource};
pub use fire_reader::FireReader;
pub use pollution_reader::PollutionReader;
