use crate::data_structures::{AnalysisWindow, DailyUsageRecord, UsageObservation};
use std::collections::BTreeMap;

/// Rolls raw observations up into one [`DailyUsageRecord`] per calendar day.
pub struct DailyAggregator {
    log_group_prefix: Option<String>,
    window: Option<AnalysisWindow>,
}

impl DailyAggregator {
    pub fn new() -> Self {
        Self {
            log_group_prefix: None,
            window: None,
        }
    }

    /// Only count log groups whose name starts with `prefix`. Observations that
    /// carry no log group name are always counted.
    pub fn with_log_group_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_group_prefix = Some(prefix.into());
        self
    }

    pub fn with_window(mut self, window: AnalysisWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn aggregate(&self, observations: &[UsageObservation]) -> Vec<DailyUsageRecord> {
        let mut days: BTreeMap<_, DailyUsageRecord> = BTreeMap::new();
        let mut skipped = 0usize;

        for observation in observations {
            if !self.accepts(observation) {
                skipped += 1;
                continue;
            }

            days.entry(observation.date())
                .or_insert_with(|| DailyUsageRecord::empty(observation.date()))
                .add(observation.storage_class(), observation.gb());
        }

        tracing::debug!(
            observations = observations.len(),
            skipped,
            days = days.len(),
            "aggregated usage observations"
        );

        days.into_values().collect()
    }

    fn accepts(&self, observation: &UsageObservation) -> bool {
        if let Some(window) = &self.window {
            if !window.contains(observation.date()) {
                return false;
            }
        }

        match (&self.log_group_prefix, observation.log_group()) {
            (Some(prefix), Some(group)) => group.starts_with(prefix.as_str()),
            _ => true,
        }
    }
}

impl Default for DailyAggregator {
    fn default() -> Self {
        Self::new()
    }
}
