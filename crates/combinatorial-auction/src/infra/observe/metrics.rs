/// Metrics of the auction core.
#[derive(Debug, Clone, prometheus_metric_storage::MetricStorage)]
#[metric(subsystem = "combinatorial_auction")]
pub struct Metrics {
    /// Number of programs handed to the solver.
    pub solves: prometheus::IntCounter,

    /// Time spent in the solver per program in seconds.
    #[metric(buckets(0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0))]
    pub solve_time: prometheus::Histogram,

    /// Solver failures by reason.
    #[metric(labels("reason"))]
    pub solve_errors: prometheus::IntCounterVec,

    /// Completed payment rule runs by rule.
    #[metric(labels("rule"))]
    pub payment_runs: prometheus::IntCounterVec,
}

/// Setup the metrics registry.
pub fn init() {
    observe::metrics::setup_registry_reentrant(Some("auction".to_owned()), None);
}

/// Get the metrics instance.
pub fn get() -> &'static Metrics {
    Metrics::instance(observe::metrics::get_storage_registry())
        .expect("unexpected error getting metrics instance")
}
