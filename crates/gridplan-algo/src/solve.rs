//! Bridge from the solver-independent [`LpModel`] to good_lp backends.

use gridplan_core::{GridplanError, GridplanResult, LinearExpr, LpModel, LpSolution, Sense};
use good_lp::solvers::clarabel::clarabel as clarabel_solver;
#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as highs_solver;
use good_lp::{
    constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable,
};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LpSolverKind {
    #[default]
    Clarabel,
    #[cfg(feature = "solver-highs")]
    Highs,
}

impl LpSolverKind {
    pub fn available() -> &'static [&'static str] {
        AVAILABLE_LP_SOLVERS
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LpSolverKind::Clarabel => "clarabel",
            #[cfg(feature = "solver-highs")]
            LpSolverKind::Highs => "highs",
        }
    }
}

const AVAILABLE_LP_SOLVERS: &[&str] = &[
    "clarabel",
    #[cfg(feature = "solver-highs")]
    "highs",
];

fn unknown_solver_error(label: &str) -> GridplanError {
    GridplanError::Config(format!(
        "unknown lp solver '{}'; supported values: {}",
        label,
        LpSolverKind::available().join(", ")
    ))
}

impl FromStr for LpSolverKind {
    type Err = GridplanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.to_ascii_lowercase();
        match normalized.as_str() {
            "clarabel" => Ok(LpSolverKind::Clarabel),
            "highs" => {
                #[cfg(feature = "solver-highs")]
                {
                    Ok(LpSolverKind::Highs)
                }
                #[cfg(not(feature = "solver-highs"))]
                {
                    Err(unknown_solver_error(&normalized))
                }
            }
            other => Err(unknown_solver_error(other)),
        }
    }
}

impl fmt::Display for LpSolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn to_expression(expr: &LinearExpr, vars: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant_part());
    for (var, coef) in expr.terms() {
        out += coef * vars[var.index()];
    }
    out
}

fn add_constraints<M>(mut problem: M, model: &LpModel, vars: &[Variable]) -> M
where
    M: SolverModel,
{
    for c in model.constraints() {
        let expr = to_expression(&c.expr, vars);
        problem = match c.sense {
            Sense::Le => problem.with(constraint!(expr <= 0.0)),
            Sense::Ge => problem.with(constraint!(expr >= 0.0)),
            Sense::Eq => problem.with(constraint!(expr == 0.0)),
        };
    }
    problem
}

fn solver_error(kind: LpSolverKind, err: ResolutionError) -> GridplanError {
    GridplanError::Solver(format!("{} failed: {:?}", kind, err))
}

/// Minimise the model's objective and read back every variable.
pub fn solve_model(model: &LpModel, kind: LpSolverKind) -> GridplanResult<LpSolution> {
    let mut problem_vars = variables!();
    let mut vars = Vec::with_capacity(model.num_variables());
    for def in model.variables() {
        let mut definition = variable().min(def.lower);
        if let Some(upper) = def.upper {
            definition = definition.max(upper);
        }
        vars.push(problem_vars.add(definition));
    }
    let objective = to_expression(model.objective(), &vars);
    debug!(
        solver = kind.as_str(),
        variables = vars.len(),
        constraints = model.constraints().len(),
        "handing model to solver"
    );

    let unsolved = problem_vars.minimise(objective);
    let solution: Box<dyn Solution> = match kind {
        LpSolverKind::Clarabel => {
            let problem = add_constraints(unsolved.using(clarabel_solver), model, &vars);
            Box::new(problem.solve().map_err(|e| solver_error(kind, e))?)
        }
        #[cfg(feature = "solver-highs")]
        LpSolverKind::Highs => {
            let problem = add_constraints(unsolved.using(highs_solver), model, &vars);
            Box::new(problem.solve().map_err(|e| solver_error(kind, e))?)
        }
    };

    let values: Vec<f64> = vars.iter().map(|v| solution.value(*v)).collect();
    let objective = model.objective_value(&values);
    info!(solver = kind.as_str(), objective, "model solved");
    Ok(LpSolution { values, objective })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridplan_core::ConstraintDef;

    #[test]
    fn parses_known_solvers_case_insensitively() {
        assert_eq!("Clarabel".parse::<LpSolverKind>().unwrap(), LpSolverKind::Clarabel);
        assert_eq!(LpSolverKind::default().as_str(), "clarabel");
    }

    #[test]
    fn unknown_solver_lists_supported_values() {
        let err = "gurobi".parse::<LpSolverKind>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown lp solver 'gurobi'"));
        assert!(msg.contains("clarabel"));
        assert!(err.is_configuration());
    }

    #[cfg(not(feature = "solver-highs"))]
    #[test]
    fn highs_is_rejected_when_not_compiled_in() {
        assert!("highs".parse::<LpSolverKind>().is_err());
    }

    #[test]
    fn clarabel_solves_small_dispatch() {
        // Two units meet 100 MW; the cheap one is capped at 60.
        let mut model = LpModel::new();
        let cheap = model.add_variable("cheap", 0.0, Some(60.0));
        let dear = model.add_variable("dear", 0.0, None);
        model.add_constraint(ConstraintDef::eq(
            "balance",
            LinearExpr::from(cheap) + LinearExpr::from(dear),
            LinearExpr::constant(100.0),
        ));
        model.add_to_objective(&(LinearExpr::term(cheap, 10.0) + LinearExpr::term(dear, 30.0)));

        let solution = solve_model(&model, LpSolverKind::Clarabel).unwrap();
        assert!((solution.value(cheap) - 60.0).abs() < 1e-4);
        assert!((solution.value(dear) - 40.0).abs() < 1e-4);
        assert!((solution.objective - 1800.0).abs() < 1e-2);
    }

    #[test]
    fn infeasible_model_is_a_solver_error() {
        let mut model = LpModel::new();
        let x = model.add_variable("x", 0.0, Some(1.0));
        model.add_constraint(ConstraintDef::geq(
            "too_much",
            LinearExpr::from(x),
            LinearExpr::constant(5.0),
        ));
        model.add_to_objective(&LinearExpr::from(x));
        let err = solve_model(&model, LpSolverKind::Clarabel).unwrap_err();
        assert!(matches!(err, GridplanError::Solver(_)));
    }
}
