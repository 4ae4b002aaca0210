use crate::{
    constraints::{Constraint, validate_expr},
    domain::Domain,
    error::EngineError,
    expression::Expr,
    variable::VarIdx,
};

/// Variables, constraints and objective of a constraint satisfaction problem.
///
/// Every constraint is validated when it is added, so a `Model` handed to the
/// solver never references unknown variables or out of range tables.
#[derive(Debug, Clone, Default)]
pub struct Model {
    domains: Vec<Domain>,
    constraints: Vec<Constraint>,
    objective: Option<VarIdx>,
    branching: Vec<VarIdx>,
    hints: Vec<Option<i64>>,
}

impl Model {
    pub fn new() -> Self {
        Model::default()
    }

    pub fn new_var(&mut self, domain: Domain) -> VarIdx {
        let var = VarIdx::new(self.domains.len());
        self.domains.push(domain);
        var
    }

    /// Integer variable over `min..=max`. An empty range makes the model
    /// infeasible rather than invalid.
    pub fn new_int_var(&mut self, min: i64, max: i64) -> VarIdx {
        self.new_var(Domain::range(min, max))
    }

    pub fn new_bool_var(&mut self) -> VarIdx {
        self.new_var(Domain::boolean())
    }

    pub fn new_constant(&mut self, value: i64) -> VarIdx {
        self.new_var(Domain::singleton(value))
    }

    pub fn add(&mut self, constraint: impl Into<Constraint>) -> Result<(), EngineError> {
        let constraint = constraint.into();
        constraint.validate(&self.domains)?;
        self.constraints.push(constraint);
        Ok(())
    }

    /// Checks an expression that is evaluated on solutions but not constrained.
    pub fn check_expr(&self, expr: &Expr) -> Result<(), EngineError> {
        validate_expr(expr, &self.domains)
    }

    pub fn minimize(&mut self, var: VarIdx) -> Result<(), EngineError> {
        self.check_var("objective", var)?;
        self.objective = Some(var);
        Ok(())
    }

    /// Variables branched on first, in this order. Variables left out are
    /// branched on afterwards in creation order.
    pub fn set_branching_order(&mut self, vars: Vec<VarIdx>) -> Result<(), EngineError> {
        for &var in &vars {
            self.check_var("branching", var)?;
        }
        self.branching = vars;
        Ok(())
    }

    /// Value tried first when branching on `var`, as long as it is still in
    /// the variable's domain.
    pub fn set_hint(&mut self, var: VarIdx, value: i64) -> Result<(), EngineError> {
        self.check_var("hint", var)?;
        if self.hints.len() <= var.get() {
            self.hints.resize(var.get() + 1, None);
        }
        self.hints[var.get()] = Some(value);
        Ok(())
    }

    pub fn hint(&self, var: VarIdx) -> Option<i64> {
        self.hints.get(var.get()).copied().flatten()
    }

    fn check_var(&self, constraint: &'static str, var: VarIdx) -> Result<(), EngineError> {
        if var.get() < self.domains.len() {
            Ok(())
        } else {
            Err(EngineError::UnknownVariable { constraint, var })
        }
    }

    pub fn num_vars(&self) -> usize {
        self.domains.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn domain(&self, var: VarIdx) -> &Domain {
        &self.domains[var]
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<VarIdx> {
        self.objective
    }

    pub fn branching(&self) -> &[VarIdx] {
        &self.branching
    }
}
