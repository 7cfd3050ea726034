use std::io::BufWriter;
use std::io::Write;

use crate::Cnf;

/// Write the formula in the DIMACS CNF format.
///
/// The output starts with the problem line `p cnf <num variables> <num clauses>`, followed by one
/// line per clause with space-separated literals terminated by `0`.
///
/// # Example
/// ```
/// # use std::num::NonZeroI32;
/// # use dimacs_format::Cnf;
/// # use dimacs_format::write_cnf;
/// let lit = |code: i32| NonZeroI32::new(code).unwrap();
///
/// let mut cnf = Cnf::new(3);
/// cnf.add_clause([lit(1), lit(2), lit(3)]);
/// cnf.add_clause([lit(-1), lit(-2)]);
///
/// let mut output: Vec<u8> = Vec::new();
/// write_cnf(&cnf, &mut output).unwrap();
///
/// let expected = "
/// p cnf 3 2
/// 1 2 3 0
/// -1 -2 0
/// ";
/// assert_eq!(std::str::from_utf8(&output).unwrap(), expected.trim_start());
/// ```
pub fn write_cnf(formula: &Cnf, sink: impl Write) -> std::io::Result<()> {
    let mut writer = BufWriter::new(sink);

    writeln!(
        writer,
        "p cnf {} {}",
        formula.num_variables(),
        formula.num_clauses()
    )?;

    for clause in formula.clauses() {
        for literal in clause {
            write!(writer, "{literal} ")?;
        }
        writeln!(writer, "0")?;
    }

    writer.flush()
}

impl Cnf {
    /// Serialise this formula in the DIMACS CNF format. See [`write_cnf`].
    pub fn write_dimacs(&self, sink: impl Write) -> std::io::Result<()> {
        write_cnf(self, sink)
    }
}
