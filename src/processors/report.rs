use serde::{Deserialize, Serialize};

/// Row counts through each stage, plus data-quality observations that do not stop a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub fires_read: usize,
    pub fire_start_dates_unparsed: usize,
    pub fire_dates_inconsistent: usize,

    pub pollution_read: usize,
    pub pollution_dates_unparsed: usize,
    pub pollution_missing_coordinates: usize,
    pub pollution_outside_states: usize,
    pub pollution_retained: usize,

    pub joined_pairs: usize,
    pub within_distance: usize,
    pub with_measurements: usize,
    pub within_fire_years: usize,
    pub within_start_dates: usize,
}

impl PipelineReport {
    /// Rows that reach the exporter
    pub fn output_rows(&self) -> usize {
        self.within_start_dates
    }

    pub fn has_observations(&self) -> bool {
        self.fire_start_dates_unparsed > 0
            || self.fire_dates_inconsistent > 0
            || self.pollution_dates_unparsed > 0
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Correlation Report ===\n");
        summary.push_str(&format!("Fire rows read: {}\n", self.fires_read));
        summary.push_str(&format!("Pollution rows read: {}\n", self.pollution_read));
        summary.push_str(&format!(
            "  without coordinates: {}\n",
            self.pollution_missing_coordinates
        ));
        summary.push_str(&format!(
            "  outside analysis states: {}\n",
            self.pollution_outside_states
        ));
        summary.push_str(&format!("  retained: {}\n", self.pollution_retained));

        summary.push_str("\nStage results:\n");
        let stages = [
            ("Joined within date window", self.joined_pairs),
            ("Within distance threshold", self.within_distance),
            ("With required measurements", self.with_measurements),
            ("Within fire years", self.within_fire_years),
            ("Within start dates", self.within_start_dates),
        ];
        let mut previous = self.joined_pairs;
        for (name, count) in stages {
            summary.push_str(&format!(
                "  {:<28} {:>10} ({:.1}% kept)\n",
                name,
                count,
                percentage(count, previous)
            ));
            previous = count;
        }

        if self.has_observations() {
            summary.push_str("\nData quality observations:\n");
            summary.push_str(&format!(
                "  Fire start dates not parseable: {}\n",
                self.fire_start_dates_unparsed
            ));
            summary.push_str(&format!(
                "  Fires contained before discovery: {}\n",
                self.fire_dates_inconsistent
            ));
            summary.push_str(&format!(
                "  Pollution dates not parseable: {}\n",
                self.pollution_dates_unparsed
            ));
        }

        summary
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}
