//! Solver-independent linear program.
//!
//! Modules build variables, constraints and cost terms against [`LpModel`]
//! without touching a solver crate. The algorithm crate translates a finished
//! model into a `good_lp` problem; tests can instead evaluate a candidate point
//! with [`LpModel::violations`].

use crate::error::{GridplanError, GridplanResult};
use crate::ids::{Period, ProjectId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

/// Absolute tolerance used when checking a point against the model.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Handle to a variable in an [`LpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarId(usize);

impl VarId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDef {
    pub name: String,
    pub lower: f64,
    pub upper: Option<f64>,
}

/// Affine expression `Σ coef·var + constant`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: BTreeMap<VarId, f64>,
    constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self {
            terms: BTreeMap::new(),
            constant: value,
        }
    }

    pub fn term(var: VarId, coef: f64) -> Self {
        let mut expr = Self::new();
        expr.add_term(var, coef);
        expr
    }

    /// Sum of variables with unit coefficients.
    pub fn sum<'a>(vars: impl IntoIterator<Item = &'a VarId>) -> Self {
        let mut expr = Self::new();
        for var in vars {
            expr.add_term(*var, 1.0);
        }
        expr
    }

    pub fn add_term(&mut self, var: VarId, coef: f64) {
        let entry = self.terms.entry(var).or_insert(0.0);
        *entry += coef;
        if *entry == 0.0 {
            self.terms.remove(&var);
        }
    }

    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    /// `self += scale · other`
    pub fn add_scaled(&mut self, other: &LinearExpr, scale: f64) {
        for (var, coef) in &other.terms {
            self.add_term(*var, coef * scale);
        }
        self.constant += other.constant * scale;
    }

    pub fn scaled(&self, scale: f64) -> LinearExpr {
        let mut out = LinearExpr::new();
        out.add_scaled(self, scale);
        out
    }

    pub fn terms(&self) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.terms.iter().map(|(v, c)| (*v, *c))
    }

    pub fn constant_part(&self) -> f64 {
        self.constant
    }

    /// Value at `values`, indexed by [`VarId::index`]. Missing entries count as zero.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coef)| coef * values.get(var.0).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        LinearExpr::term(var, 1.0)
    }
}

impl From<f64> for LinearExpr {
    fn from(value: f64) -> Self {
        LinearExpr::constant(value)
    }
}

impl AddAssign<&LinearExpr> for LinearExpr {
    fn add_assign(&mut self, rhs: &LinearExpr) {
        self.add_scaled(rhs, 1.0);
    }
}

impl Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self.add_scaled(&rhs, 1.0);
        self
    }
}

impl Sub for LinearExpr {
    type Output = LinearExpr;

    fn sub(mut self, rhs: LinearExpr) -> LinearExpr {
        self.add_scaled(&rhs, -1.0);
        self
    }
}

impl Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(self, rhs: f64) -> LinearExpr {
        self.scaled(rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sense::Le => "<=",
            Sense::Ge => ">=",
            Sense::Eq => "==",
        })
    }
}

/// Named constraint stored as `expr <sense> 0` where `expr = lhs - rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDef {
    pub name: String,
    pub expr: LinearExpr,
    pub sense: Sense,
}

impl ConstraintDef {
    fn new(name: impl Into<String>, lhs: LinearExpr, rhs: LinearExpr, sense: Sense) -> Self {
        Self {
            name: name.into(),
            expr: lhs - rhs,
            sense,
        }
    }

    pub fn leq(name: impl Into<String>, lhs: LinearExpr, rhs: LinearExpr) -> Self {
        Self::new(name, lhs, rhs, Sense::Le)
    }

    pub fn geq(name: impl Into<String>, lhs: LinearExpr, rhs: LinearExpr) -> Self {
        Self::new(name, lhs, rhs, Sense::Ge)
    }

    pub fn eq(name: impl Into<String>, lhs: LinearExpr, rhs: LinearExpr) -> Self {
        Self::new(name, lhs, rhs, Sense::Eq)
    }

    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let residual = self.expr.evaluate(values);
        match self.sense {
            Sense::Le => residual <= tolerance,
            Sense::Ge => residual >= -tolerance,
            Sense::Eq => residual.abs() <= tolerance,
        }
    }
}

/// Linear program plus the named (project, period) sets modules define.
#[derive(Debug, Clone, Default)]
pub struct LpModel {
    variables: Vec<VariableDef>,
    constraints: Vec<ConstraintDef>,
    objective: LinearExpr,
    project_period_sets: BTreeMap<String, Vec<(ProjectId, Period)>>,
}

impl LpModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, name: impl Into<String>, lower: f64, upper: Option<f64>) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(VariableDef {
            name: name.into(),
            lower,
            upper,
        });
        id
    }

    pub fn variable(&self, var: VarId) -> Option<&VariableDef> {
        self.variables.get(var.0)
    }

    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn find_variable(&self, name: &str) -> Option<VarId> {
        self.variables
            .iter()
            .position(|v| v.name == name)
            .map(VarId)
    }

    pub fn add_constraint(&mut self, constraint: ConstraintDef) {
        self.constraints.push(constraint);
    }

    pub fn constraints(&self) -> &[ConstraintDef] {
        &self.constraints
    }

    pub fn constraint(&self, name: &str) -> Option<&ConstraintDef> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Constraints whose name starts with `family` followed by `[`.
    pub fn constraint_family<'a>(&'a self, family: &'a str) -> impl Iterator<Item = &'a ConstraintDef> + 'a {
        self.constraints.iter().filter(move |c| {
            c.name
                .strip_prefix(family)
                .is_some_and(|rest| rest.starts_with('['))
        })
    }

    pub fn add_to_objective(&mut self, expr: &LinearExpr) {
        self.objective += expr;
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Register a named set of (project, period) pairs.
    pub fn add_project_period_set(
        &mut self,
        name: impl Into<String>,
        members: Vec<(ProjectId, Period)>,
    ) -> GridplanResult<()> {
        let name = name.into();
        if self.project_period_sets.contains_key(&name) {
            return Err(GridplanError::Registry(format!(
                "project-period set '{}' is already defined",
                name
            )));
        }
        self.project_period_sets.insert(name, members);
        Ok(())
    }

    pub fn project_period_set(&self, name: &str) -> Option<&[(ProjectId, Period)]> {
        self.project_period_sets.get(name).map(Vec::as_slice)
    }

    /// Union of the named sets, in the order the names are given.
    ///
    /// Members repeated across sets appear once, at their first position.
    pub fn join_sets<S: AsRef<str>>(&self, names: &[S]) -> GridplanResult<Vec<(ProjectId, Period)>> {
        let mut seen = BTreeSet::new();
        let mut joined = Vec::new();
        for name in names {
            let name = name.as_ref();
            let members = self.project_period_set(name).ok_or_else(|| {
                GridplanError::Registry(format!("project-period set '{}' is not defined", name))
            })?;
            for member in members {
                if seen.insert(member.clone()) {
                    joined.push(member.clone());
                }
            }
        }
        Ok(joined)
    }

    /// Every bound or constraint that `values` breaks, as readable messages.
    ///
    /// An empty result means the point is feasible.
    pub fn violations(&self, values: &[f64]) -> Vec<String> {
        let mut out = Vec::new();
        if values.len() != self.variables.len() {
            out.push(format!(
                "expected {} variable values, got {}",
                self.variables.len(),
                values.len()
            ));
        }
        for (var, value) in self.variables.iter().zip(values) {
            if *value < var.lower - FEASIBILITY_TOLERANCE {
                out.push(format!("{} = {} is below lower bound {}", var.name, value, var.lower));
            }
            if let Some(upper) = var.upper {
                if *value > upper + FEASIBILITY_TOLERANCE {
                    out.push(format!("{} = {} is above upper bound {}", var.name, value, upper));
                }
            }
        }
        for constraint in &self.constraints {
            if !constraint.is_satisfied(values, FEASIBILITY_TOLERANCE) {
                out.push(format!(
                    "{}: residual {} violates '{} 0'",
                    constraint.name,
                    constraint.expr.evaluate(values),
                    constraint.sense
                ));
            }
        }
        out
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.evaluate(values)
    }
}

/// Values of every model variable after a solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpSolution {
    pub values: Vec<f64>,
    pub objective: f64,
}

impl LpSolution {
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.0).copied().unwrap_or(0.0)
    }

    pub fn eval(&self, expr: &LinearExpr) -> f64 {
        expr.evaluate(&self.values)
    }
}
