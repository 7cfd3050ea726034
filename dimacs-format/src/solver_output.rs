use std::io::BufRead;
use std::num::NonZeroI32;

use thiserror::Error;

/// The answer a SAT solver gives on its status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverStatus {
    /// `s SATISFIABLE`
    Satisfiable,
    /// `s UNSATISFIABLE`
    Unsatisfiable,
    /// `s UNKNOWN`
    Unknown,
}

/// The parsed output of a SAT solver following the SAT competition output conventions.
///
/// Comment lines start with `c`, the status line with `s`, and the model is given on one or more
/// lines starting with `v`, terminated by a `0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverOutput {
    pub status: SolverStatus,
    /// The literals which are true in the reported model. Empty unless the status is
    /// [`SolverStatus::Satisfiable`].
    pub model: Vec<NonZeroI32>,
}

#[derive(Debug, Error)]
pub enum SolverOutputError {
    #[error("failed to read solver output")]
    Io(#[from] std::io::Error),

    #[error("the solver output contains no status line")]
    MissingStatus,

    #[error("multiple status lines found")]
    DuplicateStatus,

    #[error("'{0}' is not a known solver status")]
    UnknownStatus(String),

    #[error("'{0}' is an invalid value literal")]
    InvalidValue(String),
}

impl SolverOutput {
    /// Parse the output of a SAT solver.
    ///
    /// # Example
    /// ```
    /// # use dimacs_format::SolverOutput;
    /// # use dimacs_format::SolverStatus;
    /// let output = "c some solver\ns SATISFIABLE\nv 1 -2\nv 3 0\n";
    /// let parsed = SolverOutput::parse(output.as_bytes()).unwrap();
    ///
    /// assert_eq!(SolverStatus::Satisfiable, parsed.status);
    /// assert_eq!(
    ///     vec![1, -2, 3],
    ///     parsed.model.iter().map(|lit| lit.get()).collect::<Vec<_>>()
    /// );
    /// ```
    pub fn parse(source: impl BufRead) -> Result<SolverOutput, SolverOutputError> {
        let mut status = None;
        let mut model = vec![];

        for line in source.lines() {
            let line = line?;
            let line = line.trim();

            if let Some(status_text) = line.strip_prefix("s ") {
                if status.is_some() {
                    return Err(SolverOutputError::DuplicateStatus);
                }

                status = Some(match status_text.trim() {
                    "SATISFIABLE" => SolverStatus::Satisfiable,
                    "UNSATISFIABLE" => SolverStatus::Unsatisfiable,
                    "UNKNOWN" | "INDETERMINATE" => SolverStatus::Unknown,
                    other => return Err(SolverOutputError::UnknownStatus(other.to_owned())),
                });
            } else if let Some(values) = line.strip_prefix('v') {
                for value in values.split_whitespace() {
                    let code = value
                        .parse::<i32>()
                        .map_err(|_| SolverOutputError::InvalidValue(value.to_owned()))?;

                    // The terminating zero carries no information.
                    if let Some(literal) = NonZeroI32::new(code) {
                        model.push(literal);
                    }
                }
            }
        }

        let status = status.ok_or(SolverOutputError::MissingStatus)?;
        if status != SolverStatus::Satisfiable {
            model.clear();
        }

        Ok(SolverOutput { status, model })
    }
}
