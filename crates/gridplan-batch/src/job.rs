use gridplan_core::Period;
use gridplan_io::RunDirectory;
use gridplan_scenarios::Subproblem;
use std::fmt;
use std::path::Path;

/// One (subproblem, stage) unit of a scenario run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitJob {
    pub subproblem: u32,
    pub stage: u32,
    pub periods: Vec<Period>,
}

impl UnitJob {
    pub fn run_directory(&self, scenario_dir: &Path) -> RunDirectory {
        RunDirectory::new(scenario_dir, self.subproblem, self.stage)
    }
}

impl fmt::Display for UnitJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.subproblem, self.stage)
    }
}

/// Units in execution order: subproblems by id, stages in sequence.
pub fn jobs_from_subproblems(subproblems: &[Subproblem]) -> Vec<UnitJob> {
    subproblems
        .iter()
        .flat_map(|subproblem| {
            subproblem.stages.iter().map(move |stage| UnitJob {
                subproblem: subproblem.id,
                stage: stage.id,
                periods: stage.periods.clone(),
            })
        })
        .collect()
}
