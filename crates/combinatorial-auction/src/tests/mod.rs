//! Scenario and property tests running the full pipeline against the
//! `microlp` solver.

use {
    crate::{
        domain::{
            allocation::Allocation,
            auction::{Auction, BidderId, Bundle, Good, Value},
            program::Program,
        },
        infra::solver::{Failure, Microlp, Solution, Solver},
    },
    rand::{Rng, SeedableRng, rngs::StdRng},
    std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

mod properties;

/// Tolerance used when comparing welfare and payments.
const EPSILON: f64 = 1e-4;

pub fn assert_approx(actual: Value, expected: f64) {
    assert!(
        (actual.0 - expected).abs() <= EPSILON,
        "expected {expected}, got {actual}"
    );
}

/// Solver wrapper counting how often programs are solved.
#[derive(Debug, Default)]
pub struct Counting {
    inner: Microlp,
    calls: AtomicUsize,
}

impl Counting {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Solver for Counting {
    fn solve(&self, program: &Program) -> Result<Solution, Failure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.solve(program)
    }
}

/// Goods `A`, `B`, `C` and `D`.
pub const A: Good = Good(0);
pub const B: Good = Good(1);
pub const C: Good = Good(2);
pub const D: Good = Good(3);

/// The four bidder reference auction:
///
/// | bidder | bundle    | value |
/// |--------|-----------|-------|
/// | 1      | {A}       | 2     |
/// | 2      | {A, B, D} | 3     |
/// | 3      | {B, C}    | 2     |
/// | 4      | {C, D}    | 1     |
pub fn reference_auction() -> Auction {
    Auction::builder([A, B, C, D])
        .supply(BidderId(1), Ok(vec![(Bundle::from([A]), Value(2.0))]))
        .unwrap()
        .supply(BidderId(2), Ok(vec![(Bundle::from([A, B, D]), Value(3.0))]))
        .unwrap()
        .supply(BidderId(3), Ok(vec![(Bundle::from([B, C]), Value(2.0))]))
        .unwrap()
        .supply(BidderId(4), Ok(vec![(Bundle::from([C, D]), Value(1.0))]))
        .unwrap()
        .build()
        .unwrap()
}

/// Generates a random XOR auction. Every bidder submits up to `max_bids`
/// bids on random non-empty bundles with integer values.
pub fn random_auction(rng: &mut StdRng, goods: u64, bidders: u64, max_bids: usize) -> Auction {
    let mut builder = Auction::builder((0..goods).map(Good));
    for bidder in 0..bidders {
        let bids = (0..rng.gen_range(0..=max_bids))
            .map(|_| {
                let bundle: Bundle = (0..goods)
                    .filter(|_| rng.gen_bool(0.35))
                    .map(Good)
                    .collect();
                let bundle = if bundle.is_empty() {
                    Bundle::from([Good(rng.gen_range(0..goods))])
                } else {
                    bundle
                };
                let value = f64::from(rng.gen_range(1..=20_u32)) * bundle.len() as f64 / 2.0;
                (bundle, Value(value))
            })
            .collect();
        builder = builder.supply(BidderId(bidder), Ok(bids)).unwrap();
    }
    builder.build().unwrap()
}

/// Seeded random number generator so failures are reproducible.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Checks the structural invariants every allocation of `auction` satisfies.
pub fn assert_feasible(auction: &Auction, allocation: &Allocation) {
    let winners: Vec<_> = allocation.winners().collect();
    for (i, (bidder, award)) in winners.iter().enumerate() {
        assert!(
            award.bundle.iter().all(|good| auction.goods().contains(good)),
            "bidder {bidder} was awarded goods outside the auction"
        );
        assert!(
            auction
                .bids_of(*bidder)
                .iter()
                .any(|bid| bid.bundle == award.bundle && bid.value == award.value),
            "bidder {bidder} was awarded {} which it did not bid on",
            award.bundle
        );
        for (other, other_award) in &winners[i + 1..] {
            assert!(
                award.bundle.is_disjoint(&other_award.bundle),
                "bidders {bidder} and {other} share goods"
            );
        }
    }
    for good in auction.goods() {
        let holders = winners
            .iter()
            .filter(|(_, award)| award.bundle.contains(good))
            .count();
        assert!(holders <= 1, "good {good} is awarded {holders} times");
    }
}

pub fn solver() -> Arc<dyn Solver> {
    Arc::new(Microlp)
}
