//! Winner determination and VCG pricing for combinatorial (package) auctions
//! over indivisible goods.
//!
//! Bids are collected into an immutable [`Auction`], formulated as an integer
//! program, handed to an external [`Solver`] and turned back into an
//! [`Allocation`]. Payment rules ([`Vcg`], [`Reserve`]) run the winner
//! determination several times to price the winners.

pub mod domain;
pub mod infra;
#[cfg(test)]
mod tests;

pub use {
    domain::{
        allocation::{Allocation, Award, Tolerance},
        auction::{self, Auction, Bid, BidderId, Bundle, Good, Value},
        mechanism::{
            self,
            Outcome,
            PaymentRule,
            Payments,
            WinnerDetermination,
            reserve::{ConfigurationError, Reserve, ReservePrice},
            vcg::Vcg,
        },
        program::{self, Program},
    },
    infra::{
        config::{self, Config},
        solver::{self, Microlp, Solver},
    },
};
