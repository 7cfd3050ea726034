//! A parser for the DIMACS CNF file format. Given that DIMACS files can be very large, the
//! implementation reads the source in chunks and re-uses its buffers rather than allocating for
//! every encountered clause.
//!
//! The parser hands every clause to a type implementing [`DimacsSink`], which serves as the
//! interface to the consumer of the parsed contents.
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::num::NonZeroI32;
use std::str::FromStr;

use thiserror::Error;

/// A dimacs sink stores a set of clauses over a fixed number of variables.
pub trait DimacsSink {
    /// The arguments to the dimacs sink.
    type ConstructorArgs;

    /// The underlying formula type.
    type Formula;

    /// Create an empty formula.
    fn empty(args: Self::ConstructorArgs, num_variables: usize) -> Self;

    /// Add a new clause to the formula.
    fn add_clause(&mut self, clause: &[NonZeroI32]);

    /// Take the collected clauses and turn it into the underlying formula type.
    fn into_formula(self) -> Self::Formula;
}

#[derive(Debug, Error)]
pub enum DimacsParseError {
    #[error("failed to read source")]
    Io(#[from] std::io::Error),

    #[error("missing dimacs header")]
    MissingHeader,

    #[error("'{0}' is an invalid header")]
    InvalidHeader(String),

    #[error("multiple dimacs headers found")]
    DuplicateHeader,

    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("'{0}' is an invalid DIMACS literal")]
    InvalidLiteral(String),

    #[error("literal {literal} refers to a variable beyond the declared {num_variables}")]
    LiteralOutOfRange {
        literal: NonZeroI32,
        num_variables: usize,
    },

    #[error("the last clause in the source is not terminated with a '0'")]
    UnterminatedClause,

    #[error("expected to parse {expected} clauses, but parsed {parsed}")]
    IncorrectClauseCount { expected: usize, parsed: usize },
}

/// Parse a DIMACS CNF source into the formula type of `Sink`.
pub fn parse_cnf<Sink: DimacsSink>(
    source: impl Read,
    sink_constructor_args: Sink::ConstructorArgs,
) -> Result<Sink::Formula, DimacsParseError> {
    let mut reader = BufReader::new(source);
    let mut parser = DimacsParser::<Sink>::new(sink_constructor_args);

    loop {
        let num_bytes = {
            let data = reader.fill_buf()?;

            if data.is_empty() {
                return parser.complete();
            }

            parser.parse_chunk(data)?;
            data.len()
        };

        reader.consume(num_bytes);
    }
}

struct DimacsParser<Sink: DimacsSink> {
    sink_constructor_args: Option<Sink::ConstructorArgs>,
    sink: Option<Sink>,
    header: Option<CnfHeader>,
    buffer: String,
    clause: Vec<NonZeroI32>,
    state: ParseState,
    parsed_clauses: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParseState {
    StartLine,
    Header,
    Comment,
    Literal,
    NegativeLiteral,
    Clause,
}

impl<Sink: DimacsSink> DimacsParser<Sink> {
    fn new(sink_constructor_args: Sink::ConstructorArgs) -> Self {
        DimacsParser {
            sink_constructor_args: Some(sink_constructor_args),
            sink: None,
            header: None,
            buffer: String::new(),
            clause: vec![],
            state: ParseState::StartLine,
            parsed_clauses: 0,
        }
    }

    /// Parse the next chunk of bytes. This may start in the middle of parsing a clause or file
    /// header, and may end in such a state as well.
    fn parse_chunk(&mut self, chunk: &[u8]) -> Result<(), DimacsParseError> {
        for byte in chunk {
            match self.state {
                ParseState::StartLine => match byte {
                    b if b.is_ascii_whitespace() => {}

                    b'p' => {
                        self.state = ParseState::Header;
                        self.buffer.clear();
                        self.buffer.push('p');
                    }

                    b'c' => {
                        self.state = ParseState::Comment;
                    }

                    b @ b'1'..=b'9' => self.start_literal(*b, true),

                    // An empty clause, or the terminator of a clause spanning multiple lines.
                    b'0' => self.finish_clause()?,

                    b'-' => self.start_literal(b'-', false),

                    b => return Err(DimacsParseError::UnexpectedCharacter(*b as char)),
                },

                ParseState::Header => match byte {
                    b'\n' => {
                        self.init_formula()?;
                        self.state = ParseState::StartLine;
                    }

                    b => self.buffer.push(*b as char),
                },

                ParseState::Comment => {
                    if *byte == b'\n' {
                        self.state = ParseState::StartLine;
                    }
                }

                ParseState::Literal => match byte {
                    b if b.is_ascii_whitespace() => {
                        self.finish_literal()?;
                        if *b == b'\n' {
                            self.state = ParseState::StartLine;
                        }
                    }

                    b @ b'0'..=b'9' => self.buffer.push(*b as char),

                    b => return Err(DimacsParseError::UnexpectedCharacter(*b as char)),
                },

                ParseState::NegativeLiteral => match byte {
                    b @ b'1'..=b'9' => {
                        self.buffer.push(*b as char);
                        self.state = ParseState::Literal;
                    }

                    b => return Err(DimacsParseError::UnexpectedCharacter(*b as char)),
                },

                ParseState::Clause => match byte {
                    b'0' => self.finish_clause()?,

                    // A new-line does not terminate the clause. The clause buffer is kept so
                    // parsing continues on the next line, after comments and whitespace.
                    b'\n' => self.state = ParseState::StartLine,
                    b if b.is_ascii_whitespace() => {}

                    b @ b'1'..=b'9' => self.start_literal(*b, true),
                    b'-' => self.start_literal(b'-', false),

                    b => return Err(DimacsParseError::UnexpectedCharacter(*b as char)),
                },
            }
        }

        Ok(())
    }

    fn start_literal(&mut self, b: u8, is_positive: bool) {
        self.state = if is_positive {
            ParseState::Literal
        } else {
            ParseState::NegativeLiteral
        };

        self.buffer.clear();
        self.buffer.push(b as char);
    }

    fn complete(mut self) -> Result<Sink::Formula, DimacsParseError> {
        match self.state {
            ParseState::Header => self.init_formula()?,
            ParseState::Literal | ParseState::NegativeLiteral => {
                return Err(DimacsParseError::UnterminatedClause)
            }
            _ => {}
        }

        let sink = self.sink.ok_or(DimacsParseError::MissingHeader)?;
        let expected = self
            .header
            .as_ref()
            .map(|header| header.num_clauses)
            .ok_or(DimacsParseError::MissingHeader)?;

        if !self.clause.is_empty() {
            Err(DimacsParseError::UnterminatedClause)
        } else if expected != self.parsed_clauses {
            Err(DimacsParseError::IncorrectClauseCount {
                expected,
                parsed: self.parsed_clauses,
            })
        } else {
            Ok(sink.into_formula())
        }
    }

    fn init_formula(&mut self) -> Result<(), DimacsParseError> {
        let header = self.buffer.trim().parse::<CnfHeader>()?;

        self.sink = Some(Sink::empty(
            self.sink_constructor_args
                .take()
                .ok_or(DimacsParseError::DuplicateHeader)?,
            header.num_variables,
        ));

        self.header = Some(header);

        Ok(())
    }

    fn finish_literal(&mut self) -> Result<(), DimacsParseError> {
        let literal = self
            .buffer
            .parse::<i32>()
            .ok()
            .and_then(NonZeroI32::new)
            .ok_or_else(|| DimacsParseError::InvalidLiteral(self.buffer.clone()))?;

        let num_variables = self
            .header
            .as_ref()
            .map(|header| header.num_variables)
            .ok_or(DimacsParseError::MissingHeader)?;

        if literal.unsigned_abs().get() as usize > num_variables {
            return Err(DimacsParseError::LiteralOutOfRange {
                literal,
                num_variables,
            });
        }

        self.clause.push(literal);
        self.state = ParseState::Clause;

        Ok(())
    }

    fn finish_clause(&mut self) -> Result<(), DimacsParseError> {
        let sink = self.sink.as_mut().ok_or(DimacsParseError::MissingHeader)?;

        self.parsed_clauses += 1;
        sink.add_clause(&self.clause);
        self.clause.clear();
        self.state = ParseState::Clause;

        Ok(())
    }
}

struct CnfHeader {
    num_variables: usize,
    num_clauses: usize,
}

impl FromStr for CnfHeader {
    type Err = DimacsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with("p cnf ") {
            return Err(DimacsParseError::InvalidHeader(s.to_owned()));
        }

        let mut components = s.split_whitespace().skip(2);

        let num_variables = next_header_component(&mut components, s)?;
        let num_clauses = next_header_component(&mut components, s)?;

        if components.next().is_some() {
            return Err(DimacsParseError::InvalidHeader(s.to_owned()));
        }

        Ok(CnfHeader {
            num_variables,
            num_clauses,
        })
    }
}

fn next_header_component<'a>(
    components: &mut impl Iterator<Item = &'a str>,
    header: &str,
) -> Result<usize, DimacsParseError> {
    components
        .next()
        .and_then(|component| component.parse::<usize>().ok())
        .ok_or_else(|| DimacsParseError::InvalidHeader(header.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cnf;

    fn lit(code: i32) -> NonZeroI32 {
        NonZeroI32::new(code).unwrap()
    }

    fn parse(source: &str) -> Result<Cnf, DimacsParseError> {
        parse_cnf::<Cnf>(source.as_bytes(), ())
    }

    #[test]
    fn clauses_are_read_in_order() {
        let cnf = parse("p cnf 3 2\n1 -2 0\n2 3 0\n").expect("valid dimacs");

        assert_eq!(3, cnf.num_variables());
        assert_eq!(
            vec![vec![lit(1), lit(-2)], vec![lit(2), lit(3)]],
            cnf.clauses().map(<[_]>::to_vec).collect::<Vec<_>>()
        );
    }

    #[test]
    fn comments_and_multi_line_clauses_are_accepted() {
        let source = "c generated\np cnf 4 2\n1 2\nc halfway\n3 0\n-4 0";
        let cnf = parse(source).expect("valid dimacs");

        assert_eq!(
            vec![vec![lit(1), lit(2), lit(3)], vec![lit(-4)]],
            cnf.clauses().map(<[_]>::to_vec).collect::<Vec<_>>()
        );
    }

    #[test]
    fn multi_digit_literals_containing_zero_are_not_terminators() {
        let cnf = parse("p cnf 20 1\n10 -20 0\n").expect("valid dimacs");

        assert_eq!(
            vec![vec![lit(10), lit(-20)]],
            cnf.clauses().map(<[_]>::to_vec).collect::<Vec<_>>()
        );
    }

    #[test]
    fn header_without_trailing_newline_declares_an_empty_formula() {
        let cnf = parse("p cnf 5 0").expect("valid dimacs");

        assert_eq!(5, cnf.num_variables());
        assert_eq!(0, cnf.num_clauses());
    }

    #[test]
    fn clause_count_mismatch_is_reported() {
        let error = parse("p cnf 2 2\n1 2 0\n").expect_err("too few clauses");

        assert!(matches!(
            error,
            DimacsParseError::IncorrectClauseCount {
                expected: 2,
                parsed: 1
            }
        ));
    }

    #[test]
    fn unterminated_clause_is_reported() {
        let error = parse("p cnf 2 1\n1 2").expect_err("missing terminator");

        assert!(matches!(error, DimacsParseError::UnterminatedClause));
    }

    #[test]
    fn clauses_before_header_are_rejected() {
        let error = parse("1 2 0\np cnf 2 1\n").expect_err("no header yet");

        assert!(matches!(error, DimacsParseError::MissingHeader));
    }

    #[test]
    fn literal_beyond_declared_variables_is_rejected() {
        let error = parse("p cnf 2 1\n1 3 0\n").expect_err("undeclared variable");

        assert!(matches!(
            error,
            DimacsParseError::LiteralOutOfRange {
                num_variables: 2,
                ..
            }
        ));
    }

    #[test]
    fn second_header_is_rejected() {
        let error = parse("p cnf 2 0\np cnf 2 0\n").expect_err("duplicate header");

        assert!(matches!(error, DimacsParseError::DuplicateHeader));
    }

    #[test]
    fn malformed_header_is_rejected() {
        let error = parse("p wcnf 2 1 10\n").expect_err("not a cnf header");

        assert!(matches!(error, DimacsParseError::InvalidHeader(_)));
    }
}
