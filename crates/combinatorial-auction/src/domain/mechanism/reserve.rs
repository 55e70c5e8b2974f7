//! Per-good reserve prices on top of another payment rule.

use {
    super::{Error, Outcome, PaymentRule, Payments},
    crate::{
        domain::auction::{Auction, Bid, Bundle, Value},
        infra::observe,
    },
    std::sync::Arc,
};

/// Minimum price per good.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReservePrice(f64);

impl ReservePrice {
    pub fn new(price: f64) -> Result<Self, ConfigurationError> {
        if price.is_finite() && price >= 0.0 {
            Ok(Self(price))
        } else {
            Err(ConfigurationError::ReservePrice(price))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// The least amount a winner of `bundle` pays.
    pub fn floor(self, bundle: &Bundle) -> Value {
        Value(self.0 * bundle.len() as f64)
    }

    /// Whether `bid` clears the reserve of the goods it asks for.
    pub fn admits(self, bid: &Bid) -> bool {
        bid.value >= self.floor(&bid.bundle)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("reserve price must be finite and non-negative, got {0}")]
    ReservePrice(f64),
}

/// Runs the inner rule only on bids that clear the reserve and raises every
/// resulting payment to at least the reserve of the won goods.
#[derive(Debug, Clone)]
pub struct Reserve<R> {
    inner: R,
    price: ReservePrice,
}

impl<R> Reserve<R> {
    pub fn new(inner: R, price: ReservePrice) -> Self {
        Self { inner, price }
    }

    pub fn price(&self) -> ReservePrice {
        self.price
    }
}

#[async_trait::async_trait]
impl<R: PaymentRule> PaymentRule for Reserve<R> {
    fn name(&self) -> &'static str {
        "reserve"
    }

    async fn run(&self, auction: Arc<Auction>) -> Result<Outcome, Error> {
        let adapted = auction.retain_bids(|bid| self.price.admits(bid));
        tracing::debug!(
            price = self.price.0,
            dropped = auction.bid_count() - adapted.bid_count(),
            "filtered bids below reserve"
        );

        let Outcome {
            allocation,
            payments: base,
        } = self.inner.run(Arc::new(adapted)).await?;
        let payments: Payments = allocation
            .winners()
            .map(|(bidder, award)| {
                let base = base.get(bidder).unwrap_or_default();
                (bidder, base.max(self.price.floor(&award.bundle)))
            })
            .collect();

        observe::priced(self.name(), &allocation, &payments);
        Ok(Outcome {
            allocation,
            payments,
        })
    }
}
