use crate::{expression::Expr, variable::VarIdx};

/// A complete assignment of every model variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    values: Vec<i64>,
}

impl Assignment {
    pub fn new(values: Vec<i64>) -> Self {
        Assignment { values }
    }

    #[inline]
    pub fn value(&self, var: VarIdx) -> i64 {
        self.values[var.get()]
    }

    pub fn values_of(&self, vars: &[VarIdx]) -> Vec<i64> {
        vars.iter().map(|&var| self.value(var)).collect()
    }

    pub fn evaluate(&self, expr: &Expr) -> f64 {
        expr.evaluate(self)
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }
}
