//! Auction model and the mechanisms evaluating it.

pub mod allocation;
pub mod auction;
pub mod mechanism;
pub mod program;
