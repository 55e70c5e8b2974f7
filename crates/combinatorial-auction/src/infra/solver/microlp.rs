//! Adapter onto the pure Rust MILP backend of `good_lp`.

use {
    super::{Failure, Solution, Solver},
    crate::domain::program::{Comparator, Kind, Program, Term},
    good_lp::{
        Expression,
        ProblemVariables,
        ResolutionError,
        Solution as _,
        SolverModel,
        constraint,
        solvers::microlp::microlp,
        variable,
    },
};

/// Solves programs with `microlp` through `good_lp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Microlp;

impl Solver for Microlp {
    fn solve(&self, program: &Program) -> Result<Solution, Failure> {
        if program.variables().is_empty() {
            return Ok(Solution::default());
        }

        let mut problem = ProblemVariables::new();
        let variables: Vec<good_lp::Variable> = program
            .variables()
            .iter()
            .map(|definition| {
                let declared = match definition.kind {
                    Kind::Binary => variable().binary(),
                };
                problem.add(declared.name(definition.name.clone()))
            })
            .collect();
        let expression = |terms: &[Term]| {
            let mut expression = Expression::with_capacity(terms.len());
            for term in terms {
                expression.add_mul(term.coefficient, variables[term.variable.0]);
            }
            expression
        };

        let mut model = problem
            .maximise(expression(program.objective()))
            .using(microlp);
        for definition in program.constraints() {
            let lhs = expression(&definition.terms);
            model = model.with(match definition.comparator {
                Comparator::LessOrEqual => constraint::leq(lhs, definition.rhs),
                Comparator::Equal => constraint::eq(lhs, definition.rhs),
                Comparator::GreaterOrEqual => constraint::geq(lhs, definition.rhs),
            });
        }

        let solved = model.solve().map_err(|err| match err {
            ResolutionError::Infeasible => Failure::Infeasible,
            other => Failure::Numerical(other.to_string()),
        })?;
        let values: Vec<f64> = variables
            .iter()
            .map(|variable| solved.value(*variable))
            .collect();
        Ok(Solution {
            objective: program.evaluate(&values),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::domain::{
            auction::{Auction, BidderId, Bundle, Good},
            program,
        },
    };

    #[test]
    fn picks_the_best_compatible_bids() {
        let auction = Auction::builder([Good(1), Good(2)])
            .bidder(BidderId(1))
            .bidder(BidderId(2))
            .bid(BidderId(1), Bundle::from([Good(1), Good(2)]), 3.0)
            .bid(BidderId(1), Bundle::from([Good(1)]), 2.0)
            .bid(BidderId(2), Bundle::from([Good(2)]), 2.0)
            .build()
            .unwrap();
        let formulation = program::formulate(&auction);

        let solution = Microlp.solve(&formulation.program).unwrap();

        assert!((solution.objective - 4.0).abs() < 1e-6);
        let selected: Vec<bool> = solution.values.iter().map(|v| *v > 0.5).collect();
        assert_eq!(selected, vec![false, true, true]);
    }

    #[test]
    fn empty_program_has_zero_objective() {
        let solution = Microlp.solve(&Program::default()).unwrap();
        assert_eq!(solution, Solution::default());
    }
}
