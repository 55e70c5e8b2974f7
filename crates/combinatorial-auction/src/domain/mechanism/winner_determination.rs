use {
    super::Error,
    crate::{
        domain::{
            allocation::{Allocation, Tolerance},
            auction::Auction,
            program,
        },
        infra::{observe, solver::Solver},
    },
    std::{sync::Arc, time::Instant},
    tokio::sync::OnceCell,
};

/// Computes the efficient allocation of a single auction.
///
/// The allocation is resolved on first request and kept for the lifetime of
/// the engine. Concurrent requests on an unresolved engine wait for a single
/// solver invocation. Failed resolutions store nothing, so a later request
/// tries again.
pub struct WinnerDetermination {
    auction: Arc<Auction>,
    solver: Arc<dyn Solver>,
    tolerance: Tolerance,
    resolution: OnceCell<Resolution>,
}

/// A resolved allocation together with the objective value the solver
/// reported for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub allocation: Allocation,
    pub objective: f64,
}

impl WinnerDetermination {
    pub fn new(auction: Arc<Auction>, solver: Arc<dyn Solver>, tolerance: Tolerance) -> Self {
        Self {
            auction,
            solver,
            tolerance,
            resolution: OnceCell::new(),
        }
    }

    pub fn auction(&self) -> &Arc<Auction> {
        &self.auction
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.initialized()
    }

    /// The efficient allocation of the auction.
    pub async fn allocation(&self) -> Result<&Allocation, Error> {
        Ok(&self.resolve().await?.allocation)
    }

    pub async fn resolve(&self) -> Result<&Resolution, Error> {
        self.resolution.get_or_try_init(|| self.compute()).await
    }

    #[tracing::instrument(skip_all, fields(bids = self.auction.bid_count()))]
    async fn compute(&self) -> Result<Resolution, Error> {
        let auction = self.auction.clone();
        let solver = self.solver.clone();
        let tolerance = self.tolerance;
        // Solving is CPU heavy and blocking, keep it off the async workers.
        tokio::task::spawn_blocking(move || -> Result<Resolution, Error> {
            let formulation = program::formulate(&auction);
            observe::solving(&formulation.program);
            let start = Instant::now();
            let solution = solver
                .solve(&formulation.program)
                .inspect_err(observe::solve_error)?;
            let allocation = Allocation::extract(&auction, &formulation, &solution, tolerance);
            observe::solved(&allocation, start.elapsed());
            Ok(Resolution {
                allocation,
                objective: solution.objective,
            })
        })
        .await?
    }
}

impl std::fmt::Debug for WinnerDetermination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WinnerDetermination")
            .field("auction", &self.auction)
            .field("tolerance", &self.tolerance)
            .field("resolution", &self.resolution.get())
            .finish()
    }
}
