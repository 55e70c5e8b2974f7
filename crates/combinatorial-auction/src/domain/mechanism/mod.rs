//! Mechanisms turning an auction into winners and payments.
//!
//! [`WinnerDetermination`] computes the efficient allocation of one auction.
//! Payment rules build on it: [`vcg::Vcg`] charges every winner the
//! externality it imposes on the others, [`reserve::Reserve`] wraps another
//! rule with a per-good price floor.

use {
    crate::{
        domain::{
            allocation::Allocation,
            auction::{Auction, BidderId, Value},
        },
        infra::solver::Failure,
    },
    serde::{Deserialize, Serialize},
    std::{collections::BTreeMap, sync::Arc},
};

pub mod reserve;
pub mod vcg;
mod winner_determination;

pub use winner_determination::{Resolution, WinnerDetermination};

/// Computes an allocation and the payments of its winners.
///
/// Rules compose: a rule may run another rule on a derived auction and
/// post-process its outcome.
#[async_trait::async_trait]
pub trait PaymentRule: Send + Sync {
    /// Name of the rule used in logs and metrics.
    fn name(&self) -> &'static str;

    async fn run(&self, auction: Arc<Auction>) -> Result<Outcome, Error>;

    async fn payments(&self, auction: Arc<Auction>) -> Result<Payments, Error> {
        Ok(self.run(auction).await?.payments)
    }
}

/// The allocation chosen by a payment rule and what every winner pays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub allocation: Allocation,
    pub payments: Payments,
}

impl Outcome {
    /// Declared value of the won bundle minus the payment. `None` for bidders
    /// that won nothing.
    pub fn utility(&self, bidder: BidderId) -> Option<Value> {
        let award = self.allocation.get(bidder)?;
        Some(award.value - self.payments.get(bidder).unwrap_or_default())
    }
}

/// Amount every winner pays. Bidders that won nothing have no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payments(BTreeMap<BidderId, Value>);

impl Payments {
    pub fn get(&self, bidder: BidderId) -> Option<Value> {
        self.0.get(&bidder).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BidderId, Value)> {
        self.0.iter().map(|(bidder, payment)| (*bidder, *payment))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total amount collected from all winners.
    pub fn revenue(&self) -> Value {
        self.0.values().copied().sum()
    }
}

impl FromIterator<(BidderId, Value)> for Payments {
    fn from_iter<T: IntoIterator<Item = (BidderId, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<BidderId, Value>> for Payments {
    fn from(payments: BTreeMap<BidderId, Value>) -> Self {
        Self(payments)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Solver(#[from] Failure),
    #[error("solver task aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::domain::{
            allocation::Award,
            auction::{Bundle, Good},
        },
        maplit::btreemap,
    };

    #[test]
    fn payments_serialize_as_a_map_by_bidder() {
        let payments = Payments::from(btreemap! {
            BidderId(3) => Value(1.25),
            BidderId(1) => Value(0.0),
        });

        assert_eq!(
            serde_json::to_value(&payments).unwrap(),
            serde_json::json!({ "1": 0.0, "3": 1.25 })
        );
        assert_eq!(payments.revenue(), Value(1.25));
    }

    #[test]
    fn utility_of_a_winner_without_payment_is_its_value() {
        let outcome = Outcome {
            allocation: serde_json::from_value(serde_json::json!({
                "awards": { "2": { "bundle": [0, 1], "value": 3.0 } }
            }))
            .unwrap(),
            payments: Payments::default(),
        };

        assert_eq!(
            outcome.allocation.get(BidderId(2)),
            Some(&Award {
                bundle: Bundle::from([Good(0), Good(1)]),
                value: Value(3.0),
            })
        );
        assert_eq!(outcome.utility(BidderId(2)), Some(Value(3.0)));
        assert_eq!(outcome.utility(BidderId(5)), None);
    }
}
