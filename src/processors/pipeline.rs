use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::JoinedRecord;
use crate::processors::{Correlator, DistanceFilter, Normalizer, PipelineReport, QualityFilter};
use crate::readers::InputTables;
use crate::utils::progress::ProgressReporter;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::cmp::Ordering;

/// Worker pool a run executes on; released when dropped, on success or failure alike
pub struct ExecutionContext {
    pool: ThreadPool,
    workers: usize,
}

impl ExecutionContext {
    pub fn new(max_workers: usize) -> Result<Self> {
        let workers = max_workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("correlate-{}", index))
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        tracing::debug!(workers, "Execution context acquired");
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `op` with every parallel stage scheduled on this context's pool
    pub fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        tracing::debug!(workers = self.workers, "Execution context released");
    }
}

/// Normalize, correlate, filter by distance, then by measurement quality and date scope
pub struct CorrelationPipeline {
    normalizer: Normalizer,
    correlator: Correlator,
    distance_filter: DistanceFilter,
    quality_filter: QualityFilter,
}

impl CorrelationPipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config),
            correlator: Correlator::new(config.window_days),
            distance_filter: DistanceFilter::new(
                config.max_distance_miles,
                config.earth_radius_miles,
            ),
            quality_filter: QualityFilter::new(
                config.required_measurements.clone(),
                config.fire_years(),
                config.start_dates(),
            ),
        }
    }

    /// Run every stage over the input tables.
    ///
    /// Each stage consumes the previous stage's rows and hands a new set on.
    /// The result is sorted so identical inputs give identical output.
    pub fn run(
        &self,
        inputs: InputTables,
        progress: Option<&ProgressReporter>,
    ) -> (Vec<JoinedRecord>, PipelineReport) {
        let mut report = PipelineReport {
            fires_read: inputs.fires.len(),
            pollution_read: inputs.pollution.len(),
            ..Default::default()
        };

        stage(progress, "Normalizing fire records...");
        let fires = self.normalizer.normalize_fires(inputs.fires);
        report.fire_start_dates_unparsed = fires.start_dates_unparsed;
        report.fire_dates_inconsistent = fires.dates_inconsistent;

        stage(progress, "Normalizing pollution records...");
        let pollution = self.normalizer.normalize_pollution_rows(inputs.pollution);
        report.pollution_dates_unparsed = pollution.dates_unparsed;
        report.pollution_missing_coordinates = pollution.missing_coordinates;
        report.pollution_outside_states = pollution.outside_states;
        report.pollution_retained = pollution.records.len();
        tracing::info!(
            fires = fires.records.len(),
            pollution = pollution.records.len(),
            "Inputs normalized"
        );

        stage(progress, "Correlating fires with pollution readings...");
        let joined = self.correlator.correlate(&fires.records, &pollution.records);
        report.joined_pairs = joined.len();
        tracing::info!(pairs = joined.len(), "Joined on state within date window");

        stage(progress, "Computing distances...");
        let nearby = self.distance_filter.apply(joined);
        report.within_distance = nearby.len();
        tracing::info!(rows = nearby.len(), "Distance filter applied");

        stage(progress, "Applying quality filters...");
        let (mut records, counts) = self.quality_filter.apply(nearby);
        report.with_measurements = counts.with_measurements;
        report.within_fire_years = counts.within_fire_years;
        report.within_start_dates = counts.within_start_dates;
        tracing::info!(rows = records.len(), "Quality filters applied");

        if report.has_observations() {
            tracing::warn!(
                fire_start_dates_unparsed = report.fire_start_dates_unparsed,
                fire_dates_inconsistent = report.fire_dates_inconsistent,
                pollution_dates_unparsed = report.pollution_dates_unparsed,
                "Data quality observations recorded"
            );
        }

        records.sort_by(compare_output_rows);

        (records, report)
    }
}

fn stage(progress: Option<&ProgressReporter>, name: &str) {
    if let Some(p) = progress {
        p.stage(name);
    }
}

/// Output order: fire, reading date, then station location
fn compare_output_rows(a: &JoinedRecord, b: &JoinedRecord) -> Ordering {
    a.fire
        .fire_id
        .cmp(&b.fire.fire_id)
        .then_with(|| a.pollution.date_local.cmp(&b.pollution.date_local))
        .then_with(|| a.pollution.latitude.total_cmp(&b.pollution.latitude))
        .then_with(|| a.pollution.longitude.total_cmp(&b.pollution.longitude))
}
