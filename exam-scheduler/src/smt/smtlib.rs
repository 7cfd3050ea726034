use std::fmt::Display;
use std::io::BufWriter;
use std::io::Write;

use super::Atom;
use super::Constraint;
use super::SmtProblem;
use super::SmtVariable;
use super::Term;

struct SmtLib<T>(T);

impl Display for SmtLib<i64> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 < 0 {
            write!(f, "(- {})", self.0.unsigned_abs())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Display for SmtLib<Term> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Term::Variable(variable) => write!(f, "{variable}"),
            Term::Constant(constant) => write!(f, "{}", SmtLib(constant)),
        }
    }
}

impl Display for SmtLib<&Atom> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self.0 {
            Atom::Equal(..) => "=",
            Atom::NotEqual(..) => "distinct",
            Atom::GreaterEqual(..) => ">=",
        };
        let [lhs, rhs] = self.0.terms();

        write!(f, "({operator} {} {})", SmtLib(lhs), SmtLib(rhs))
    }
}

impl Display for SmtLib<&Constraint> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Constraint::InRange {
                variable,
                lower,
                upper,
            } => write!(
                f,
                "(and (<= {} {variable}) (<= {variable} {}))",
                SmtLib(*lower),
                SmtLib(*upper)
            ),
            Constraint::Implies {
                condition,
                consequence,
            } => write!(f, "(=> {} {})", SmtLib(condition), SmtLib(consequence)),
            Constraint::AnyOf(atoms) => match atoms.as_slice() {
                [] => write!(f, "false"),
                [atom] => write!(f, "{}", SmtLib(atom)),
                atoms => {
                    write!(f, "(or")?;
                    for atom in atoms {
                        write!(f, " {}", SmtLib(atom))?;
                    }
                    write!(f, ")")
                }
            },
            Constraint::Holds(atom) => write!(f, "{}", SmtLib(atom)),
            Constraint::Indicator {
                variable,
                condition,
            } => write!(f, "(= {variable} (ite {} 1 0))", SmtLib(condition)),
            Constraint::SumOf { variable, terms } => {
                write!(f, "(= {variable} ")?;
                match terms.as_slice() {
                    [] => write!(f, "0")?,
                    [term] => write!(f, "{term}")?,
                    terms => {
                        write!(f, "(+")?;
                        for term in terms {
                            write!(f, " {term}")?;
                        }
                        write!(f, ")")?;
                    }
                }
                write!(f, ")")
            }
        }
    }
}

/// Write the problem as an SMT-LIB 2 script over quantifier-free linear integer arithmetic.
///
/// The script declares every variable, asserts every constraint, optionally asks to minimise
/// `objective`, checks satisfiability and asks for the values of all declared variables.
///
/// # Example
/// ```
/// # use exam_scheduler::smt::*;
/// let mut problem = SmtProblem::new(SmtVariables::with_penalties(0, 0));
/// problem.add(Constraint::SumOf {
///     variable: SmtVariable::ConflictCost,
///     terms: vec![],
/// });
///
/// let mut script = Vec::new();
/// write_smtlib(&problem, Some(SmtVariable::ConflictCost), &mut script).unwrap();
///
/// let expected = "
/// (set-logic QF_LIA)
/// (declare-const conflict_cost Int)
/// (assert (= conflict_cost 0))
/// (minimize conflict_cost)
/// (check-sat)
/// (get-value (conflict_cost))
/// ";
/// assert_eq!(std::str::from_utf8(&script).unwrap(), expected.trim_start());
/// ```
pub fn write_smtlib(
    problem: &SmtProblem,
    objective: Option<SmtVariable>,
    sink: impl Write,
) -> std::io::Result<()> {
    let mut writer = BufWriter::new(sink);

    writeln!(writer, "(set-logic QF_LIA)")?;

    for variable in problem.variables().iter() {
        writeln!(writer, "(declare-const {variable} Int)")?;
    }

    for constraint in problem.constraints() {
        writeln!(writer, "(assert {})", SmtLib(constraint))?;
    }

    if let Some(objective) = objective {
        writeln!(writer, "(minimize {objective})")?;
    }

    writeln!(writer, "(check-sat)")?;

    if !problem.variables().is_empty() {
        write!(writer, "(get-value (")?;
        for (position, variable) in problem.variables().iter().enumerate() {
            if position > 0 {
                write!(writer, " ")?;
            }
            write!(writer, "{variable}")?;
        }
        writeln!(writer, "))")?;
    }

    writer.flush()
}
