use std::{ops::Add, sync::Arc};

use crate::{
    assignment::Assignment,
    store::DomainStore,
    variable::{Literal, LiteralState, VarIdx},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    pub const ZERO: Interval = Interval { lo: 0.0, hi: 0.0 };
    pub const UNIT: Interval = Interval { lo: 0.0, hi: 1.0 };

    pub fn new(lo: f64, hi: f64) -> Self {
        Interval { lo, hi }
    }

    pub fn point(value: f64) -> Self {
        Interval {
            lo: value,
            hi: value,
        }
    }

    pub fn is_point(&self) -> bool {
        self.lo == self.hi
    }

    fn scale(self, factor: f64) -> Self {
        if factor >= 0.0 {
            Interval::new(self.lo * factor, self.hi * factor)
        } else {
            Interval::new(self.hi * factor, self.lo * factor)
        }
    }

    fn mul(self, other: Interval) -> Self {
        let products = [
            self.lo * other.lo,
            self.lo * other.hi,
            self.hi * other.lo,
            self.hi * other.hi,
        ];

        Interval::new(
            products.iter().copied().fold(f64::INFINITY, f64::min),
            products.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        )
    }

    fn hull(self, other: Interval) -> Self {
        Interval::new(self.lo.min(other.lo), self.hi.max(other.hi))
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, other: Interval) -> Interval {
        Interval::new(self.lo + other.lo, self.hi + other.hi)
    }
}

/// Real-valued expression over integer variables.
///
/// Expressions are never branched on; they are evaluated on complete
/// assignments and bounded with interval arithmetic during search.
#[derive(Debug, Clone)]
pub enum Expr {
    Const(f64),
    Var(VarIdx),
    Sum(Vec<Expr>),
    Scale(f64, Box<Expr>),
    Product(Box<Expr>, Box<Expr>),
    /// `table[row * width + col]` where `row` and `col` are variables.
    Element {
        table: Arc<Vec<f64>>,
        width: usize,
        row: VarIdx,
        col: VarIdx,
    },
    /// 1 if the literal holds, 0 otherwise.
    Indicator(Literal),
    /// 1 if the expression is at least the threshold, 0 otherwise.
    AtLeast(Box<Expr>, f64),
}

impl Expr {
    pub fn var(var: VarIdx) -> Self {
        Expr::Var(var)
    }

    pub fn sum<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = Expr>,
    {
        Expr::Sum(terms.into_iter().collect())
    }

    pub fn diff(lhs: VarIdx, rhs: VarIdx) -> Self {
        Expr::Sum(vec![Expr::Var(lhs), Expr::Scale(-1.0, Box::new(Expr::Var(rhs)))])
    }

    pub fn scale(self, factor: f64) -> Self {
        Expr::Scale(factor, Box::new(self))
    }

    pub fn times(self, other: Expr) -> Self {
        Expr::Product(Box::new(self), Box::new(other))
    }

    pub fn at_least(self, threshold: f64) -> Self {
        Expr::AtLeast(Box::new(self), threshold)
    }

    pub fn element(table: Arc<Vec<f64>>, width: usize, row: VarIdx, col: VarIdx) -> Self {
        Expr::Element {
            table,
            width,
            row,
            col,
        }
    }

    pub fn variables(&self) -> Vec<VarIdx> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, vars: &mut Vec<VarIdx>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(var) => vars.push(*var),
            Expr::Sum(terms) => terms.iter().for_each(|term| term.collect_variables(vars)),
            Expr::Scale(_, expr) | Expr::AtLeast(expr, _) => expr.collect_variables(vars),
            Expr::Product(lhs, rhs) => {
                lhs.collect_variables(vars);
                rhs.collect_variables(vars);
            }
            Expr::Element { row, col, .. } => {
                vars.push(*row);
                vars.push(*col);
            }
            Expr::Indicator(literal) => vars.push(literal.var),
        }
    }

    pub fn bounds(&self, store: &DomainStore) -> Interval {
        match self {
            Expr::Const(value) => Interval::point(*value),
            Expr::Var(var) => Interval::new(store.min(*var) as f64, store.max(*var) as f64),
            Expr::Sum(terms) => terms
                .iter()
                .fold(Interval::ZERO, |acc, term| acc + term.bounds(store)),
            Expr::Scale(factor, expr) => expr.bounds(store).scale(*factor),
            Expr::Product(lhs, rhs) => lhs.bounds(store).mul(rhs.bounds(store)),
            Expr::Element {
                table,
                width,
                row,
                col,
            } => {
                let mut bounds: Option<Interval> = None;
                for r in store.domain(*row).iter() {
                    for c in store.domain(*col).iter() {
                        let value = table[r as usize * width + c as usize];
                        let point = Interval::point(value);
                        bounds = Some(bounds.map_or(point, |b| b.hull(point)));
                    }
                }
                bounds.unwrap_or(Interval::ZERO)
            }
            Expr::Indicator(literal) => match literal.state(store) {
                LiteralState::True => Interval::point(1.0),
                LiteralState::False => Interval::ZERO,
                LiteralState::Undecided => Interval::UNIT,
            },
            Expr::AtLeast(expr, threshold) => {
                let inner = expr.bounds(store);
                if inner.lo >= *threshold {
                    Interval::point(1.0)
                } else if inner.hi < *threshold {
                    Interval::ZERO
                } else {
                    Interval::UNIT
                }
            }
        }
    }

    pub fn evaluate(&self, assignment: &Assignment) -> f64 {
        match self {
            Expr::Const(value) => *value,
            Expr::Var(var) => assignment.value(*var) as f64,
            Expr::Sum(terms) => terms.iter().map(|term| term.evaluate(assignment)).sum(),
            Expr::Scale(factor, expr) => factor * expr.evaluate(assignment),
            Expr::Product(lhs, rhs) => lhs.evaluate(assignment) * rhs.evaluate(assignment),
            Expr::Element {
                table,
                width,
                row,
                col,
            } => {
                let index = assignment.value(*row) as usize * width + assignment.value(*col) as usize;
                table[index]
            }
            Expr::Indicator(literal) => {
                if literal.holds(assignment.value(literal.var)) {
                    1.0
                } else {
                    0.0
                }
            }
            Expr::AtLeast(expr, threshold) => {
                if expr.evaluate(assignment) >= *threshold {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, other: Expr) -> Expr {
        match self {
            Expr::Sum(mut terms) => {
                terms.push(other);
                Expr::Sum(terms)
            }
            expr => Expr::Sum(vec![expr, other]),
        }
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Const(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::Domain;

    use super::*;

    #[test]
    fn test_bounds_of_element_lookup() {
        // 2x2 table: [[0, 4], [7, 1]]
        let table = Arc::new(vec![0.0, 4.0, 7.0, 1.0]);
        let mut store = DomainStore::new(vec![Domain::range(0, 1), Domain::range(0, 1)]);
        let expr = Expr::element(table, 2, VarIdx::new(0), VarIdx::new(1));

        assert_eq!(expr.bounds(&store), Interval::new(0.0, 7.0));

        store.fix(VarIdx::new(0), 1).unwrap();
        assert_eq!(expr.bounds(&store), Interval::new(1.0, 7.0));

        store.fix(VarIdx::new(1), 0).unwrap();
        assert_eq!(expr.bounds(&store), Interval::point(7.0));
    }

    #[test]
    fn test_bounds_of_step_times_difference() {
        let mut store = DomainStore::new(vec![
            Domain::range(0, 9),
            Domain::range(0, 9),
            Domain::range(300, 500),
        ]);
        let diff = Expr::diff(VarIdx::new(0), VarIdx::new(1));
        let late = Expr::var(VarIdx::new(2)).at_least(481.0).times(diff);

        assert_eq!(late.bounds(&store), Interval::new(-9.0, 9.0));

        store.remove_above(VarIdx::new(2), 480).unwrap();
        assert_eq!(late.bounds(&store), Interval::ZERO);
    }

    #[test]
    fn test_evaluate() {
        let assignment = Assignment::new(vec![3, 1]);
        let expr = Expr::Const(10.0)
            + Expr::diff(VarIdx::new(0), VarIdx::new(1)).scale(2.5)
            + Expr::Indicator(Literal::eq(VarIdx::new(1), 1));

        assert_eq!(expr.evaluate(&assignment), 16.0);
        assert_eq!(expr.variables(), vec![VarIdx::new(0), VarIdx::new(1)]);
    }
}
