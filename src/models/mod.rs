pub mod fire;
pub mod joined;
pub mod pollution;

pub use fire::{FireRecord, RawFireRow};
pub use joined::JoinedRecord;
pub use pollution::{AqiReadings, Measurement, PollutionRecord, RawPollutionRow};
