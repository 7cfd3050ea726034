use std::ffi::OsStr;
use std::ffi::OsString;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use log::info;

use super::process::run_solver;
use super::process::ProcessOutcome;
use super::process::SolverFiles;
use super::smt_output::parse_smt_output;
use super::smt_output::SmtStatus;
use crate::oracles::OptimisationOutcome;
use crate::oracles::OracleError;
use crate::oracles::SatisfactionOutcome;
use crate::oracles::SmtOracle;
use crate::smt::write_smtlib;
use crate::smt::SmtModel;
use crate::smt::SmtProblem;
use crate::smt::SmtVariable;

/// Runs an SMT solver binary which reads an SMT-LIB 2 script, such as z3.
#[derive(Clone, Debug)]
pub struct ExternalSmtOracle {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExternalSmtOracle {
    pub fn new(program: impl Into<PathBuf>) -> ExternalSmtOracle {
        ExternalSmtOracle {
            program: program.into(),
            args: vec![],
        }
    }

    /// Run `z3 -smt2` from the search path.
    pub fn z3() -> ExternalSmtOracle {
        ExternalSmtOracle::new("z3").with_args(["-smt2"])
    }

    /// Pass `args` to the solver, before the script.
    pub fn with_args<Arg: AsRef<OsStr>>(mut self, args: impl IntoIterator<Item = Arg>) -> Self {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    /// Returns [`None`] if the solver timed out.
    fn run(
        &self,
        problem: &SmtProblem,
        objective: Option<SmtVariable>,
        timeout: Option<Duration>,
    ) -> Result<Option<(SmtStatus, SmtModel)>, OracleError> {
        let files = SolverFiles::new("smt2");
        let result = self.run_with_files(problem, objective, &files, timeout);
        files.cleanup();

        result
    }

    fn run_with_files(
        &self,
        problem: &SmtProblem,
        objective: Option<SmtVariable>,
        files: &SolverFiles,
        timeout: Option<Duration>,
    ) -> Result<Option<(SmtStatus, SmtModel)>, OracleError> {
        write_smtlib(problem, objective, File::create(&files.instance_file)?)?;

        info!(
            "Solving {} variables and {} constraints with {}",
            problem.variables().len(),
            problem.num_constraints(),
            self.program.display()
        );

        if run_solver(&self.program, &self.args, files, timeout)? == ProcessOutcome::TimedOut {
            return Ok(None);
        }

        let output = std::fs::read_to_string(&files.log_file)?;
        let (status, model) = parse_smt_output(&output)?;
        info!("{} reported {status:?}", self.program.display());

        Ok(Some((status, model)))
    }
}

impl SmtOracle for ExternalSmtOracle {
    fn check(
        &mut self,
        problem: &SmtProblem,
        timeout: Option<Duration>,
    ) -> Result<SatisfactionOutcome<SmtModel>, OracleError> {
        Ok(match self.run(problem, None, timeout)? {
            Some((SmtStatus::Sat, model)) => SatisfactionOutcome::Satisfiable(model),
            Some((SmtStatus::Unsat, _)) => SatisfactionOutcome::Unsatisfiable,
            Some((SmtStatus::Unknown, _)) | None => SatisfactionOutcome::Unknown,
        })
    }

    fn minimise(
        &mut self,
        problem: &SmtProblem,
        objective: SmtVariable,
        timeout: Option<Duration>,
    ) -> Result<OptimisationOutcome, OracleError> {
        Ok(match self.run(problem, Some(objective), timeout)? {
            Some((SmtStatus::Sat, model)) => {
                let value = model.value(objective).ok_or_else(|| {
                    OracleError::MalformedOutput(format!("no value for the objective {objective}"))
                })?;

                OptimisationOutcome::Optimal {
                    model,
                    objective: value,
                }
            }
            Some((SmtStatus::Unsat, _)) => OptimisationOutcome::Unsatisfiable,
            Some((SmtStatus::Unknown, _)) | None => OptimisationOutcome::Unknown,
        })
    }
}
