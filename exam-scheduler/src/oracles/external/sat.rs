use std::ffi::OsStr;
use std::ffi::OsString;
use std::fs::File;
use std::io::BufReader;
use std::num::NonZeroI32;
use std::path::PathBuf;
use std::time::Duration;

use dimacs_format::Cnf;
use dimacs_format::SolverOutput;
use dimacs_format::SolverStatus;
use log::info;

use super::process::run_solver;
use super::process::ProcessOutcome;
use super::process::SolverFiles;
use crate::oracles::OracleError;
use crate::oracles::SatOracle;
use crate::oracles::SatisfactionOutcome;

/// Runs a SAT solver binary which reads DIMACS CNF and reports in the SAT competition format.
///
/// # Example
/// ```no_run
/// # use exam_scheduler::oracles::ExternalSatOracle;
/// let oracle = ExternalSatOracle::new("kissat").with_args(["-q"]);
/// ```
#[derive(Clone, Debug)]
pub struct ExternalSatOracle {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExternalSatOracle {
    pub fn new(program: impl Into<PathBuf>) -> ExternalSatOracle {
        ExternalSatOracle {
            program: program.into(),
            args: vec![],
        }
    }

    /// Pass `args` to the solver, before the instance file.
    pub fn with_args<Arg: AsRef<OsStr>>(mut self, args: impl IntoIterator<Item = Arg>) -> Self {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    fn run(
        &self,
        formula: &Cnf,
        files: &SolverFiles,
        timeout: Option<Duration>,
    ) -> Result<SatisfactionOutcome<Vec<NonZeroI32>>, OracleError> {
        formula.write_dimacs(File::create(&files.instance_file)?)?;

        info!(
            "Solving {} variables and {} clauses with {}",
            formula.num_variables(),
            formula.num_clauses(),
            self.program.display()
        );

        if run_solver(&self.program, &self.args, files, timeout)? == ProcessOutcome::TimedOut {
            return Ok(SatisfactionOutcome::Unknown);
        }

        let output = SolverOutput::parse(BufReader::new(File::open(&files.log_file)?))?;
        info!("{} reported {:?}", self.program.display(), output.status);

        Ok(match output.status {
            SolverStatus::Satisfiable => SatisfactionOutcome::Satisfiable(output.model),
            SolverStatus::Unsatisfiable => SatisfactionOutcome::Unsatisfiable,
            SolverStatus::Unknown => SatisfactionOutcome::Unknown,
        })
    }
}

impl SatOracle for ExternalSatOracle {
    fn solve(
        &mut self,
        formula: &Cnf,
        timeout: Option<Duration>,
    ) -> Result<SatisfactionOutcome<Vec<NonZeroI32>>, OracleError> {
        let files = SolverFiles::new("cnf");
        let outcome = self.run(formula, &files, timeout);
        files.cleanup();

        outcome
    }
}
