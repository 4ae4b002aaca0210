use tourplan_engine::SearchParams;

use super::objective::ObjectiveMode;

#[derive(Clone, Debug, Default)]
pub struct RoutingParams {
    /// Orders vehicles by their first stop. Only prunes symmetric assignments.
    pub symmetry_breaking: bool,
    pub objective: ObjectiveMode,
    pub search: SearchParams,
}
