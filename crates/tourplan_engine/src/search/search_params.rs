use jiff::SignedDuration;

#[derive(Clone, Debug, PartialEq)]
pub enum Termination {
    Duration(SignedDuration),
    Nodes(usize),
    Solutions(usize),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VariableSelection {
    /// Branching order of the model, then creation order.
    #[default]
    InputOrder,
    /// Smallest domain first, ties broken by input order.
    FirstFail,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueSelection {
    #[default]
    Min,
    Max,
}

/// Search configuration. Without terminations the search runs until the tree
/// is exhausted.
#[derive(Clone, Debug, Default)]
pub struct SearchParams {
    pub terminations: Vec<Termination>,
    pub variable_selection: VariableSelection,
    pub value_selection: ValueSelection,
}

impl SearchParams {
    pub fn with_timeout(mut self, timeout: SignedDuration) -> Self {
        self.terminations.push(Termination::Duration(timeout));
        self
    }

    pub fn timeout(&self) -> Option<SignedDuration> {
        self.terminations.iter().find_map(|termination| match termination {
            Termination::Duration(duration) => Some(*duration),
            _ => None,
        })
    }
}
