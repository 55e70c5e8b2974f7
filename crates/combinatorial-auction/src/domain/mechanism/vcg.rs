//! Vickrey-Clarke-Groves payments.
//!
//! Every winner pays the externality it imposes on the other bidders: the
//! welfare the others would reach if the winner had not bid at all, minus the
//! welfare the others get in the efficient allocation.

use {
    super::{Error, Outcome, PaymentRule, Payments, WinnerDetermination},
    crate::{
        domain::{
            allocation::Tolerance,
            auction::{Auction, BidderId, Value},
        },
        infra::{observe, solver::Solver},
    },
    futures::{StreamExt, TryStreamExt, stream},
    std::{collections::BTreeMap, num::NonZeroUsize, sync::Arc},
};

/// Default bound on concurrently solved counterfactual auctions.
pub const DEFAULT_PARALLELISM: NonZeroUsize = NonZeroUsize::new(4).unwrap();

/// The VCG payment rule on top of an efficient allocation.
#[derive(Clone)]
pub struct Vcg {
    solver: Arc<dyn Solver>,
    tolerance: Tolerance,
    parallelism: NonZeroUsize,
}

impl Vcg {
    pub fn new(solver: Arc<dyn Solver>) -> Self {
        Self {
            solver,
            tolerance: Tolerance::default(),
            parallelism: DEFAULT_PARALLELISM,
        }
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Limits how many counterfactual auctions are solved at the same time.
    pub fn with_parallelism(mut self, parallelism: NonZeroUsize) -> Self {
        self.parallelism = parallelism;
        self
    }

    fn engine(&self, auction: Arc<Auction>) -> WinnerDetermination {
        WinnerDetermination::new(auction, self.solver.clone(), self.tolerance)
    }

    /// Welfare of the efficient allocation of `auction` without `bidder`.
    async fn welfare_without(&self, auction: &Auction, bidder: BidderId) -> Result<Value, Error> {
        let engine = self.engine(Arc::new(auction.without(bidder)));
        Ok(engine.allocation().await?.welfare())
    }
}

#[async_trait::async_trait]
impl PaymentRule for Vcg {
    fn name(&self) -> &'static str {
        "vcg"
    }

    async fn run(&self, auction: Arc<Auction>) -> Result<Outcome, Error> {
        let allocation = self.engine(auction.clone()).allocation().await?.clone();
        let welfare = allocation.welfare();

        let winners: Vec<(BidderId, Value)> = allocation
            .winners()
            .map(|(bidder, award)| (bidder, award.value))
            .collect();
        // The counterfactual auctions are independent of each other. Results
        // arrive in completion order and are keyed by the excluded bidder.
        let auction = auction.as_ref();
        let payments: BTreeMap<BidderId, Value> = stream::iter(winners)
            .map(move |(bidder, value)| async move {
                let without = self.welfare_without(auction, bidder).await?;
                let others_with = welfare - value;
                // Clamp the solver's rounding noise, the externality is never negative.
                let payment = (without - others_with).max(Value::ZERO);
                Ok::<_, Error>((bidder, payment))
            })
            .buffer_unordered(self.parallelism.get())
            .try_collect()
            .await?;
        let payments = Payments::from(payments);

        observe::priced(self.name(), &allocation, &payments);
        Ok(Outcome {
            allocation,
            payments,
        })
    }
}

impl std::fmt::Debug for Vcg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vcg")
            .field("tolerance", &self.tolerance)
            .field("parallelism", &self.parallelism)
            .finish_non_exhaustive()
    }
}
