use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStatistics {
    pub nodes: usize,
    pub failures: usize,
    pub solutions: usize,
    pub propagations: usize,
}
