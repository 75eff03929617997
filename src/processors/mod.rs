pub mod correlator;
pub mod distance_filter;
pub mod normalizer;
pub mod pipeline;
pub mod quality_filter;
pub mod report;

pub use correlator::Correlator;
pub use distance_filter::DistanceFilter;
pub use normalizer::{NormalizedFires, NormalizedPollution, Normalizer, PollutionRejection};
pub use pipeline::{CorrelationPipeline, ExecutionContext};
pub use quality_filter::{QualityCounts, QualityFilter};
pub use report::PipelineReport;
