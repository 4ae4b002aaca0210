pub mod conditional_sum;
pub mod count;
pub mod expression_range;
pub mod implication;
pub mod linear;
pub mod reified;
pub mod table;

use conditional_sum::ConditionalSumConstraint;
use count::CountConstraint;
use expression_range::ExpressionRangeConstraint;
use implication::ImplicationConstraint;
use linear::LinearConstraint;
use reified::ReifiedConstraint;
use table::TableConstraint;

use crate::{
    assignment::Assignment,
    domain::Domain,
    error::EngineError,
    expression::Expr,
    store::{DomainStore, PropagationResult},
    variable::VarIdx,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Eq,
    Le,
    Ge,
}

impl Relation {
    pub fn holds(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            Relation::Eq => lhs == rhs,
            Relation::Le => lhs <= rhs,
            Relation::Ge => lhs >= rhs,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Constraint {
    Linear(LinearConstraint),
    Reified(ReifiedConstraint),
    Table(TableConstraint),
    Count(CountConstraint),
    Implication(ImplicationConstraint),
    ConditionalSum(ConditionalSumConstraint),
    ExpressionRange(ExpressionRangeConstraint),
}

impl Constraint {
    pub fn constraint_name(&self) -> &'static str {
        match self {
            Constraint::Linear(_) => "linear",
            Constraint::Reified(_) => "reified",
            Constraint::Table(_) => "table",
            Constraint::Count(_) => "count",
            Constraint::Implication(_) => "implication",
            Constraint::ConditionalSum(_) => "conditional_sum",
            Constraint::ExpressionRange(_) => "expression_range",
        }
    }

    pub fn scope(&self) -> Vec<VarIdx> {
        match self {
            Constraint::Linear(c) => c.scope(),
            Constraint::Reified(c) => c.scope(),
            Constraint::Table(c) => c.scope(),
            Constraint::Count(c) => c.scope(),
            Constraint::Implication(c) => c.scope(),
            Constraint::ConditionalSum(c) => c.scope(),
            Constraint::ExpressionRange(c) => c.scope(),
        }
    }

    pub fn propagate(&self, store: &mut DomainStore) -> PropagationResult {
        match self {
            Constraint::Linear(c) => c.propagate(store),
            Constraint::Reified(c) => c.propagate(store),
            Constraint::Table(c) => c.propagate(store),
            Constraint::Count(c) => c.propagate(store),
            Constraint::Implication(c) => c.propagate(store),
            Constraint::ConditionalSum(c) => c.propagate(store),
            Constraint::ExpressionRange(c) => c.propagate(store),
        }
    }

    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        match self {
            Constraint::Linear(c) => c.is_satisfied(assignment),
            Constraint::Reified(c) => c.is_satisfied(assignment),
            Constraint::Table(c) => c.is_satisfied(assignment),
            Constraint::Count(c) => c.is_satisfied(assignment),
            Constraint::Implication(c) => c.is_satisfied(assignment),
            Constraint::ConditionalSum(c) => c.is_satisfied(assignment),
            Constraint::ExpressionRange(c) => c.is_satisfied(assignment),
        }
    }

    /// Rejects constraints that cannot be propagated against `domains`.
    pub fn validate(&self, domains: &[Domain]) -> Result<(), EngineError> {
        let name = self.constraint_name();
        for var in self.scope() {
            if var.get() >= domains.len() {
                return Err(EngineError::UnknownVariable {
                    constraint: name,
                    var,
                });
            }
        }

        match self {
            Constraint::Reified(c) => check_boolean(name, c.boolean, domains),
            Constraint::Table(c) => {
                for (row, tuple) in c.tuples.iter().enumerate() {
                    if tuple.len() != c.vars.len() {
                        return Err(EngineError::TableArity {
                            row,
                            expected: c.vars.len(),
                            found: tuple.len(),
                        });
                    }
                }
                Ok(())
            }
            Constraint::ExpressionRange(c) => {
                if c.min >= c.max_exclusive {
                    return Err(EngineError::Malformed {
                        constraint: name,
                        reason: format!("empty range [{}, {})", c.min, c.max_exclusive),
                    });
                }
                validate_expr(&c.expr, domains)
            }
            _ => Ok(()),
        }
    }
}

fn check_boolean(
    constraint: &'static str,
    var: VarIdx,
    domains: &[Domain],
) -> Result<(), EngineError> {
    if domains[var].iter().all(|value| value == 0 || value == 1) {
        Ok(())
    } else {
        Err(EngineError::NonBooleanVariable { constraint, var })
    }
}

/// Checks that every variable of `expr` exists and that no element lookup can
/// leave its table.
pub fn validate_expr(expr: &Expr, domains: &[Domain]) -> Result<(), EngineError> {
    for var in expr.variables() {
        if var.get() >= domains.len() {
            return Err(EngineError::UnknownVariable {
                constraint: "expression",
                var,
            });
        }
    }

    match expr {
        Expr::Const(_) | Expr::Var(_) | Expr::Indicator(_) => Ok(()),
        Expr::Sum(terms) => terms
            .iter()
            .try_for_each(|term| validate_expr(term, domains)),
        Expr::Scale(_, inner) | Expr::AtLeast(inner, _) => validate_expr(inner, domains),
        Expr::Product(lhs, rhs) => {
            validate_expr(lhs, domains)?;
            validate_expr(rhs, domains)
        }
        Expr::Element {
            table,
            width,
            row,
            col,
        } => {
            let (row_domain, col_domain) = (&domains[*row], &domains[*col]);
            let (Some(row_min), Some(row_max), Some(col_min), Some(col_max)) = (
                row_domain.min(),
                row_domain.max(),
                col_domain.min(),
                col_domain.max(),
            ) else {
                return Ok(());
            };

            let in_bounds = row_min >= 0
                && col_min >= 0
                && (col_max as usize) < *width
                && (row_max as usize) * width + (col_max as usize) < table.len();

            if in_bounds {
                Ok(())
            } else {
                Err(EngineError::ElementOutOfBounds {
                    row: *row,
                    col: *col,
                    len: table.len(),
                })
            }
        }
    }
}

impl From<LinearConstraint> for Constraint {
    fn from(constraint: LinearConstraint) -> Self {
        Constraint::Linear(constraint)
    }
}

impl From<ReifiedConstraint> for Constraint {
    fn from(constraint: ReifiedConstraint) -> Self {
        Constraint::Reified(constraint)
    }
}

impl From<TableConstraint> for Constraint {
    fn from(constraint: TableConstraint) -> Self {
        Constraint::Table(constraint)
    }
}

impl From<CountConstraint> for Constraint {
    fn from(constraint: CountConstraint) -> Self {
        Constraint::Count(constraint)
    }
}

impl From<ImplicationConstraint> for Constraint {
    fn from(constraint: ImplicationConstraint) -> Self {
        Constraint::Implication(constraint)
    }
}

impl From<ConditionalSumConstraint> for Constraint {
    fn from(constraint: ConditionalSumConstraint) -> Self {
        Constraint::ConditionalSum(constraint)
    }
}

impl From<ExpressionRangeConstraint> for Constraint {
    fn from(constraint: ExpressionRangeConstraint) -> Self {
        Constraint::ExpressionRange(constraint)
    }
}
