use crate::statistics::log_statistic;

/// Counters describing a finished (or in-progress) search. Observational
/// only; no engine behavior depends on them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStatistics {
    pub num_positive_decisions: u64,
    pub num_negative_decisions: u64,
    pub num_implied_decisions: u64,
    pub num_propagation_calls: u64,
    pub num_restarts: u64,
    pub peak_depth: u64,
}

impl SearchStatistics {
    /// Total decisions of all kinds; the quantity restart cutoffs are
    /// compared against.
    pub fn num_decisions(&self) -> u64 {
        self.num_positive_decisions + self.num_negative_decisions + self.num_implied_decisions
    }

    pub fn log(&self) {
        log_statistic("positiveDecisions", self.num_positive_decisions);
        log_statistic("negativeDecisions", self.num_negative_decisions);
        log_statistic("impliedDecisions", self.num_implied_decisions);
        log_statistic("propagationCalls", self.num_propagation_calls);
        log_statistic("restarts", self.num_restarts);
        log_statistic("peakDepth", self.peak_depth);
    }
}
