//! Allocations of goods to bidders and their extraction from solved programs.

use {
    crate::{
        domain::{
            auction::{Auction, BidderId, Bundle, Value},
            program::Formulation,
        },
        infra::solver::Solution,
    },
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

/// What a bidder won: the goods and the value it declared for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub bundle: Bundle,
    pub value: Value,
}

/// Assignment of bundles to winning bidders. Bidders that won nothing are not
/// part of the allocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    awards: BTreeMap<BidderId, Award>,
}

impl Allocation {
    /// Maps a solved assignment back to the bids of `auction`.
    ///
    /// A bid is won when its variable lies within `tolerance` of 1. Winning
    /// bids of the same bidder are merged, although the exclusivity
    /// constraint normally leaves at most one per bidder.
    pub fn extract(
        auction: &Auction,
        formulation: &Formulation,
        solution: &Solution,
        tolerance: Tolerance,
    ) -> Self {
        let mut awards = BTreeMap::new();
        for (bidder, bids) in auction.bids() {
            let mut won = bids.iter().enumerate().filter_map(|(index, bid)| {
                let value = solution.value(formulation.variable(bidder, index)?);
                if tolerance.is_selected(value) {
                    return Some(bid);
                }
                if !tolerance.is_unselected(value) {
                    tracing::warn!(%bidder, index, value, "fractional value for binary variable");
                }
                None
            });
            let Some(first) = won.next() else {
                continue;
            };
            let mut award = Award {
                bundle: first.bundle.clone(),
                value: first.value,
            };
            for bid in won {
                award.bundle.merge(&bid.bundle);
                award.value += bid.value;
            }
            awards.insert(bidder, award);
        }

        let allocation = Self { awards };
        let welfare = allocation.welfare();
        // Every variable may be off by the tolerance, weighted by its bid value.
        let slack = tolerance.0
            * formulation
                .program
                .objective()
                .iter()
                .map(|term| term.coefficient.abs())
                .sum::<f64>();
        if !welfare.approx_eq(Value(solution.objective), slack.max(f64::EPSILON)) {
            tracing::warn!(
                %welfare,
                objective = solution.objective,
                "allocation welfare deviates from solver objective"
            );
        }
        allocation
    }

    /// Sum of all awarded values.
    pub fn welfare(&self) -> Value {
        self.awards.values().map(|award| award.value).sum()
    }

    pub fn get(&self, bidder: BidderId) -> Option<&Award> {
        self.awards.get(&bidder)
    }

    pub fn contains(&self, bidder: BidderId) -> bool {
        self.awards.contains_key(&bidder)
    }

    /// All winning bidders with their awards in ascending bidder order.
    pub fn winners(&self) -> impl Iterator<Item = (BidderId, &Award)> {
        self.awards.iter().map(|(bidder, award)| (*bidder, award))
    }

    pub fn len(&self) -> usize {
        self.awards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.awards.is_empty()
    }
}

/// Distance from 0 and 1 within which solved values of binary variables are
/// treated as exact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tolerance(f64);

impl Tolerance {
    /// Creates a tolerance. Only values in `(0, 0.5)` keep "selected" and
    /// "not selected" apart.
    pub fn new(value: f64) -> Option<Self> {
        (value > 0.0 && value < 0.5).then_some(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn is_selected(self, value: f64) -> bool {
        (value - 1.0).abs() <= self.0
    }

    fn is_unselected(self, value: f64) -> bool {
        value.abs() <= self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(1e-3)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::domain::{
            auction::{Good, Value},
            program,
        },
    };

    fn auction() -> Auction {
        Auction::builder([Good(1), Good(2), Good(3)])
            .bidder(BidderId(1))
            .bidder(BidderId(2))
            .bidder(BidderId(3))
            .bid(BidderId(1), Bundle::from([Good(1)]), 2.0)
            .bid(BidderId(1), Bundle::from([Good(2)]), 1.0)
            .bid(BidderId(2), Bundle::from([Good(2), Good(3)]), 4.0)
            .bid(BidderId(3), Bundle::from([Good(3)]), 1.5)
            .build()
            .unwrap()
    }

    fn extract(values: Vec<f64>) -> Allocation {
        let auction = auction();
        let formulation = program::formulate(&auction);
        let objective = formulation.program.evaluate(&values);
        Allocation::extract(
            &auction,
            &formulation,
            &Solution { values, objective },
            Tolerance::default(),
        )
    }

    #[test]
    fn tolerates_solver_noise() {
        let allocation = extract(vec![0.9995, 0.0004, 1.0008, -0.0002]);

        assert_eq!(allocation.len(), 2);
        assert_eq!(
            allocation.get(BidderId(1)),
            Some(&Award {
                bundle: Bundle::from([Good(1)]),
                value: Value(2.0),
            })
        );
        assert_eq!(allocation.get(BidderId(2)).unwrap().value, Value(4.0));
        assert!(!allocation.contains(BidderId(3)));
        assert_eq!(allocation.welfare(), Value(6.0));
    }

    #[test]
    fn values_outside_tolerance_are_not_won() {
        let allocation = extract(vec![0.99, 0.0, 0.0, 1.0]);
        assert_eq!(
            allocation.winners().map(|(bidder, _)| bidder).collect::<Vec<_>>(),
            vec![BidderId(3)]
        );
    }

    #[test]
    fn merges_multiple_won_bids_of_one_bidder() {
        let allocation = extract(vec![1.0, 1.0, 0.0, 0.0]);
        let award = allocation.get(BidderId(1)).unwrap();
        assert_eq!(award.bundle, Bundle::from([Good(1), Good(2)]));
        assert_eq!(award.value, Value(3.0));
    }

    #[test]
    fn nothing_won_is_an_empty_allocation() {
        let allocation = extract(vec![0.0; 4]);
        assert!(allocation.is_empty());
        assert_eq!(allocation.welfare(), Value::ZERO);
    }

    #[test]
    fn tolerance_bounds() {
        assert!(Tolerance::new(0.0).is_none());
        assert!(Tolerance::new(0.5).is_none());
        assert_eq!(Tolerance::new(1e-4).map(Tolerance::get), Some(1e-4));
    }
}
