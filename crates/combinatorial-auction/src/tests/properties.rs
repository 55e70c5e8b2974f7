//! Invariants checked on randomly generated auctions.

use {
    super::{EPSILON, assert_feasible, random_auction, rng, solver},
    crate::domain::{
        allocation::Tolerance,
        mechanism::{PaymentRule, WinnerDetermination, vcg::Vcg},
    },
    std::sync::Arc,
};

#[tokio::test]
async fn allocations_are_feasible_and_consistent() {
    let mut rng = rng(42);
    for _ in 0..20 {
        let auction = Arc::new(random_auction(&mut rng, 6, 5, 3));
        let engine = WinnerDetermination::new(auction.clone(), solver(), Tolerance::default());

        let resolution = engine.resolve().await.unwrap();

        assert_feasible(&auction, &resolution.allocation);
        let summed: f64 = resolution
            .allocation
            .winners()
            .map(|(_, award)| award.value.0)
            .sum();
        assert!((resolution.allocation.welfare().0 - summed).abs() <= EPSILON);
        assert!((resolution.allocation.welfare().0 - resolution.objective).abs() <= EPSILON);
    }
}

#[tokio::test]
async fn vcg_payments_are_individually_rational() {
    let mut rng = rng(7);
    let vcg = Vcg::new(solver());
    for _ in 0..15 {
        let auction = Arc::new(random_auction(&mut rng, 5, 4, 3));

        let outcome = vcg.run(auction.clone()).await.unwrap();

        assert_feasible(&auction, &outcome.allocation);
        assert_eq!(outcome.payments.len(), outcome.allocation.len());
        for (bidder, payment) in outcome.payments.iter() {
            let award = outcome.allocation.get(bidder).unwrap();
            assert!(payment.0 >= 0.0, "negative payment {payment} of {bidder}");
            assert!(
                payment.0 <= award.value.0 + EPSILON,
                "bidder {bidder} pays {payment} for a bundle worth {}",
                award.value
            );
        }
    }
}

#[tokio::test]
async fn removing_a_loser_changes_nothing() {
    let mut rng = rng(1337);
    let vcg = Vcg::new(solver());
    for _ in 0..10 {
        let auction = random_auction(&mut rng, 5, 4, 2);
        let outcome = vcg.run(Arc::new(auction.clone())).await.unwrap();
        let Some(loser) = auction
            .bidders()
            .find(|bidder| !outcome.allocation.contains(*bidder))
        else {
            continue;
        };

        let without = vcg.run(Arc::new(auction.without(loser))).await.unwrap();

        assert!(
            (without.allocation.welfare().0 - outcome.allocation.welfare().0).abs() <= EPSILON
        );
    }
}
