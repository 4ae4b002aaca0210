pub mod error;
pub mod parsers;
pub mod problem;
pub mod report;
pub mod routing;
pub mod tours;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
