//! Logging and metrics hooks of the auction core.

use {
    crate::{
        domain::{allocation::Allocation, mechanism::Payments, program::Program},
        infra::solver::Failure,
    },
    std::time::Duration,
};

pub mod metrics;

pub fn solving(program: &Program) {
    tracing::debug!(
        variables = program.variables().len(),
        constraints = program.constraints().len(),
        "solving winner determination"
    );
    metrics::get().solves.inc();
}

pub fn solved(allocation: &Allocation, elapsed: Duration) {
    tracing::debug!(
        winners = allocation.len(),
        welfare = %allocation.welfare(),
        ?elapsed,
        "solved winner determination"
    );
    metrics::get().solve_time.observe(elapsed.as_secs_f64());
}

pub fn solve_error(failure: &Failure) {
    match failure {
        Failure::Infeasible => {
            tracing::error!("solver reported an infeasible winner determination program")
        }
        _ => tracing::warn!(?failure, "solver failed"),
    }
    metrics::get()
        .solve_errors
        .with_label_values(&[failure.label()])
        .inc();
}

pub fn priced(rule: &str, allocation: &Allocation, payments: &Payments) {
    tracing::info!(
        rule,
        winners = allocation.len(),
        welfare = %allocation.welfare(),
        revenue = %payments.revenue(),
        "computed payments"
    );
    metrics::get().payment_runs.with_label_values(&[rule]).inc();
}
