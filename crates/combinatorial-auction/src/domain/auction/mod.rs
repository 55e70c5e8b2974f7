//! The bid model: goods, bundles, package bids and the auction tying them
//! together.
//!
//! An [`Auction`] is validated once on construction and read-only afterwards.
//! Mechanisms that need a different bid set (counterfactual auctions without
//! a winner, reserve filtering) derive a new auction instead of mutating one.

use std::collections::{BTreeMap, BTreeSet};

mod bid;
mod bundle;

pub use {
    bid::{Bid, BidderId, Supply, UnsupportedBiddingLanguage, Value},
    bundle::{Bundle, Good},
};

/// The goods for sale and, for every participating bidder, its package bids.
#[derive(Debug, Clone, Default)]
pub struct Auction {
    goods: BTreeSet<Good>,
    /// Contains every declared bidder, including bidders without any bids.
    bids: BTreeMap<BidderId, Vec<Bid>>,
}

impl Auction {
    /// Creates an auction, validating that every bid references a declared
    /// bidder, only goods of this auction and a valid value.
    pub fn new(
        goods: impl IntoIterator<Item = Good>,
        bidders: impl IntoIterator<Item = BidderId>,
        bids: impl IntoIterator<Item = Bid>,
    ) -> Result<Self, Error> {
        let goods: BTreeSet<Good> = goods.into_iter().collect();
        let mut by_bidder: BTreeMap<BidderId, Vec<Bid>> = bidders
            .into_iter()
            .map(|bidder| (bidder, Vec::new()))
            .collect();

        for bid in bids {
            if let Some(good) = bid.bundle.first_outside(&goods) {
                return Err(Error::UnknownGood {
                    bidder: bid.bidder,
                    good,
                });
            }
            if !bid.value.is_valid() {
                return Err(Error::InvalidValue {
                    bidder: bid.bidder,
                    value: bid.value,
                });
            }
            by_bidder
                .get_mut(&bid.bidder)
                .ok_or(Error::UnknownBidder(bid.bidder))?
                .push(bid);
        }

        Ok(Self {
            goods,
            bids: by_bidder,
        })
    }

    /// Starts building an auction over the specified goods.
    pub fn builder(goods: impl IntoIterator<Item = Good>) -> Builder {
        Builder {
            goods: goods.into_iter().collect(),
            bidders: Vec::new(),
            bids: Vec::new(),
        }
    }

    pub fn goods(&self) -> &BTreeSet<Good> {
        &self.goods
    }

    /// All declared bidders in ascending order.
    pub fn bidders(&self) -> impl Iterator<Item = BidderId> + '_ {
        self.bids.keys().copied()
    }

    /// Every bidder together with its bids, including bidders without bids.
    pub fn bids(&self) -> impl Iterator<Item = (BidderId, &[Bid])> {
        self.bids
            .iter()
            .map(|(bidder, bids)| (*bidder, bids.as_slice()))
    }

    /// The bids of a single bidder. Empty for unknown bidders.
    pub fn bids_of(&self, bidder: BidderId) -> &[Bid] {
        self.bids.get(&bidder).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of bids over all bidders.
    pub fn bid_count(&self) -> usize {
        self.bids.values().map(Vec::len).sum()
    }

    /// The counterfactual auction in which `bidder` submitted no bids at all.
    pub fn without(&self, bidder: BidderId) -> Self {
        let mut bids = self.bids.clone();
        if let Some(removed) = bids.get_mut(&bidder) {
            removed.clear();
        }
        Self {
            goods: self.goods.clone(),
            bids,
        }
    }

    /// Derives an auction that only contains the bids matching `keep`. All
    /// bidders stay declared.
    pub fn retain_bids(&self, keep: impl Fn(&Bid) -> bool) -> Self {
        let bids = self
            .bids
            .iter()
            .map(|(bidder, bids)| {
                let kept = bids.iter().filter(|bid| keep(bid)).cloned().collect();
                (*bidder, kept)
            })
            .collect();
        Self {
            goods: self.goods.clone(),
            bids,
        }
    }
}

/// Collects bidders and bids, typically straight from the bidding languages
/// of an auction generator, and validates them into an [`Auction`].
#[derive(Debug)]
pub struct Builder {
    goods: BTreeSet<Good>,
    bidders: Vec<BidderId>,
    bids: Vec<Bid>,
}

impl Builder {
    /// Declares a participant. Bidders without bids are valid participants.
    pub fn bidder(mut self, bidder: BidderId) -> Self {
        self.bidders.push(bidder);
        self
    }

    /// Adds a single bid. The bidder has to be declared separately.
    pub fn bid(mut self, bidder: BidderId, bundle: Bundle, value: impl Into<Value>) -> Self {
        self.bids.push(Bid {
            bidder,
            bundle,
            value: value.into(),
        });
        self
    }

    /// Declares `bidder` and adds all bids its bidding language produced.
    pub fn supply(mut self, bidder: BidderId, supply: Supply) -> Result<Self, Error> {
        let bids = supply.map_err(|err| Error::UnsupportedBiddingLanguage {
            bidder,
            language: err.language,
        })?;
        self.bidders.push(bidder);
        self.bids.extend(
            bids.into_iter()
                .map(|(bundle, value)| Bid { bidder, bundle, value }),
        );
        Ok(self)
    }

    pub fn build(self) -> Result<Auction, Error> {
        Auction::new(self.goods, self.bidders, self.bids)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("bid references undeclared bidder {0}")]
    UnknownBidder(BidderId),
    #[error("bid of bidder {bidder} references good {good} which is not for sale")]
    UnknownGood { bidder: BidderId, good: Good },
    #[error("bid of bidder {bidder} has invalid value {value}")]
    InvalidValue { bidder: BidderId, value: Value },
    #[error("bidder {bidder} can't bid in language {language:?}")]
    UnsupportedBiddingLanguage { bidder: BidderId, language: String },
}
