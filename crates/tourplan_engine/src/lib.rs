pub mod assignment;
pub mod constraints;
pub mod domain;
pub mod error;
pub mod expression;
pub mod model;
pub mod search;
pub mod store;
pub mod utils;
pub mod variable;

pub use assignment::Assignment;
pub use constraints::{Constraint, Relation};
pub use domain::Domain;
pub use error::EngineError;
pub use expression::{Expr, Interval};
pub use model::Model;
pub use search::{
    outcome::SolveOutcome,
    search_params::{SearchParams, Termination, ValueSelection, VariableSelection},
    solutions::Solutions,
    solver::Solver,
    statistics::SearchStatistics,
};
pub use variable::{Literal, VarIdx};
