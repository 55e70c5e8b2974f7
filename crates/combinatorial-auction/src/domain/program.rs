//! Integer program describing the winner determination problem of an auction.
//!
//! The program is a plain value: [`formulate`] builds it from an auction in a
//! single pass and nothing mutates it afterwards. Solvers only ever see a
//! shared reference.

use {
    crate::domain::auction::{Auction, BidderId, Good},
    std::collections::{BTreeMap, HashMap},
};

/// Index of a decision variable within its [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Binary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub kind: Kind,
    pub lower: f64,
    pub upper: f64,
}

impl Variable {
    fn binary(name: String) -> Self {
        Self {
            name,
            kind: Kind::Binary,
            lower: 0.0,
            upper: 1.0,
        }
    }
}

/// `coefficient * variable`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub variable: VariableId,
    pub coefficient: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    LessOrEqual,
    Equal,
    GreaterOrEqual,
}

/// `sum(terms) <comparator> rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub terms: Vec<Term>,
    pub comparator: Comparator,
    pub rhs: f64,
}

impl Constraint {
    fn at_most_one(name: String, variables: impl IntoIterator<Item = VariableId>) -> Self {
        Self {
            name,
            terms: variables
                .into_iter()
                .map(|variable| Term {
                    variable,
                    coefficient: 1.0,
                })
                .collect(),
            comparator: Comparator::LessOrEqual,
            rhs: 1.0,
        }
    }

    /// Whether `values` (indexed by variable) satisfy this constraint up to
    /// `epsilon`.
    pub fn is_satisfied(&self, values: &[f64], epsilon: f64) -> bool {
        let lhs: f64 = self
            .terms
            .iter()
            .map(|term| term.coefficient * values.get(term.variable.0).copied().unwrap_or(0.0))
            .sum();
        match self.comparator {
            Comparator::LessOrEqual => lhs <= self.rhs + epsilon,
            Comparator::Equal => (lhs - self.rhs).abs() <= epsilon,
            Comparator::GreaterOrEqual => lhs + epsilon >= self.rhs,
        }
    }
}

/// A maximisation problem over binary decision variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    variables: Vec<Variable>,
    objective: Vec<Term>,
    constraints: Vec<Constraint>,
}

impl Program {
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The terms of the maximised objective.
    pub fn objective(&self) -> &[Term] {
        &self.objective
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Evaluates the objective for an assignment indexed by variable.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|term| term.coefficient * values.get(term.variable.0).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Identifies a bid by its bidder and its position in the bidder's bid list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BidKey {
    pub bidder: BidderId,
    pub index: usize,
}

/// A program together with the table mapping every bid of the auction it was
/// formulated from onto its decision variable.
#[derive(Debug, Clone)]
pub struct Formulation {
    pub program: Program,
    pub variables: HashMap<BidKey, VariableId>,
}

impl Formulation {
    pub fn variable(&self, bidder: BidderId, index: usize) -> Option<VariableId> {
        self.variables.get(&BidKey { bidder, index }).copied()
    }
}

/// Formulates the winner determination problem of `auction`:
///
/// - one binary variable per bid
/// - maximise the sum of accepted bid values
/// - every bidder gets at most one of its bids accepted
/// - every good is part of at most one accepted bid
///
/// A bidder without bids gets no per-bidder constraint, as it would have no
/// terms. Goods nobody bids on don't produce constraints either. The program
/// therefore has one constraint per bidder with at least one bid plus one per
/// good appearing in a bid. Accepting no bid at all is always feasible.
#[tracing::instrument(skip_all, fields(bids = auction.bid_count()))]
pub fn formulate(auction: &Auction) -> Formulation {
    let mut variables = Vec::with_capacity(auction.bid_count());
    let mut lookup = HashMap::with_capacity(auction.bid_count());
    let mut objective = Vec::with_capacity(auction.bid_count());
    let mut exclusive = Vec::new();
    let mut by_good: BTreeMap<Good, Vec<VariableId>> = BTreeMap::new();

    for (bidder, bids) in auction.bids() {
        if bids.is_empty() {
            continue;
        }
        let mut own = Vec::with_capacity(bids.len());
        for (index, bid) in bids.iter().enumerate() {
            let id = VariableId(variables.len());
            variables.push(Variable::binary(format!("bid_{bidder}_{index}")));
            lookup.insert(BidKey { bidder, index }, id);
            objective.push(Term {
                variable: id,
                coefficient: bid.value.0,
            });
            own.push(id);
            for good in &bid.bundle {
                by_good.entry(*good).or_default().push(id);
            }
        }
        exclusive.push(Constraint::at_most_one(format!("bidder_{bidder}"), own));
    }

    let constraints: Vec<_> = exclusive
        .into_iter()
        .chain(
            by_good
                .into_iter()
                .map(|(good, bids)| Constraint::at_most_one(format!("good_{good}"), bids)),
        )
        .collect();

    tracing::debug!(
        variables = variables.len(),
        constraints = constraints.len(),
        "formulated winner determination"
    );

    Formulation {
        program: Program {
            variables,
            objective,
            constraints,
        },
        variables: lookup,
    }
}
