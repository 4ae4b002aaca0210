pub mod outcome;
pub mod search_params;
pub mod solutions;
pub mod solver;
pub mod statistics;
