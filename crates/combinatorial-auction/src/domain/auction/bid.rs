use {
    super::bundle::Bundle,
    serde::{Deserialize, Serialize},
};

/// Identifies a bidder participating in an auction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::From,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct BidderId(pub u64);

/// A monetary amount: the value of a bid, the welfare of an allocation or a
/// payment.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::Sub,
    derive_more::Sum,
    derive_more::Display,
    derive_more::From,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Value(pub f64);

impl Value {
    pub const ZERO: Self = Self(0.0);

    /// Whether this amount can be the value of a bid.
    pub fn is_valid(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    /// Whether both amounts are equal up to `epsilon`.
    pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        (self.0 - other.0).abs() <= epsilon
    }
}

impl From<Value> for f64 {
    fn from(value: Value) -> Self {
        value.0
    }
}

/// A bidder's declared willingness to pay `value` for exactly `bundle`. All
/// bids of one bidder are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub bidder: BidderId,
    pub bundle: Bundle,
    pub value: Value,
}

/// Raised by a bidding language that can't express a bidder's valuation in
/// the requested form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bidding language {language:?} is not supported")]
pub struct UnsupportedBiddingLanguage {
    pub language: String,
}

/// The bundles and values a bidding language enumerated for one bidder.
pub type Supply = Result<Vec<(Bundle, Value)>, UnsupportedBiddingLanguage>;
