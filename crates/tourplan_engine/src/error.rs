use thiserror::Error;

use crate::variable::VarIdx;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Constraint {constraint} references unknown variable {var}")]
    UnknownVariable {
        constraint: &'static str,
        var: VarIdx,
    },
    #[error("Table row {row} has {found} values, expected {expected}")]
    TableArity {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Variable {var} used as a boolean in {constraint} has a non 0/1 domain")]
    NonBooleanVariable {
        constraint: &'static str,
        var: VarIdx,
    },
    #[error("Element lookup on ({row}, {col}) can index outside a table of {len} values")]
    ElementOutOfBounds {
        row: VarIdx,
        col: VarIdx,
        len: usize,
    },
    #[error("Constraint {constraint} is malformed: {reason}")]
    Malformed {
        constraint: &'static str,
        reason: String,
    },
}
