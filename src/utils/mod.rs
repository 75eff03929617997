pub mod constants;
pub mod coordinates;
pub mod dates;
pub mod progress;

pub use constants::*;
pub use coordinates::{distance_miles, spherical_cosine_distance};
pub use dates::{parse_iso_date, parse_short_us_date};
pub use progress::ProgressReporter;
