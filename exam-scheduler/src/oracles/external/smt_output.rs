use std::iter::Peekable;

use log::debug;

use crate::oracles::OracleError;
use crate::smt::SmtModel;
use crate::smt::SmtVariable;

/// The answer to `(check-sat)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SmtStatus {
    Sat,
    Unsat,
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Expression {
    Symbol(String),
    List(Vec<Expression>),
}

/// Parse the response to a script written by [`write_smtlib`](crate::smt::write_smtlib): a
/// status line, followed by the `(get-value ...)` response if the status is `sat`.
pub(crate) fn parse_smt_output(output: &str) -> Result<(SmtStatus, SmtModel), OracleError> {
    let mut lines = output.lines();

    let status = loop {
        let Some(line) = lines.next() else {
            return Err(malformed("no check-sat response"));
        };

        match line.trim() {
            "sat" => break SmtStatus::Sat,
            "unsat" => break SmtStatus::Unsat,
            "unknown" => break SmtStatus::Unknown,
            "" => {}
            other if other.starts_with("(error") => return Err(malformed(other)),
            // Warnings and other diagnostics.
            other => debug!("Ignoring solver output '{other}'"),
        }
    };

    let mut model = SmtModel::default();
    if status != SmtStatus::Sat {
        return Ok((status, model));
    }

    let rest = lines.collect::<Vec<_>>().join("\n");
    let mut tokens = tokenize(&rest).into_iter().peekable();
    if tokens.peek().is_none() {
        return Ok((status, model));
    }

    let Expression::List(pairs) = parse_expression(&mut tokens)? else {
        return Err(malformed("expected a list of values"));
    };

    for pair in pairs {
        let Expression::List(pair) = pair else {
            return Err(malformed("expected a (name value) pair"));
        };
        let [Expression::Symbol(name), value] = pair.as_slice() else {
            return Err(malformed("expected a (name value) pair"));
        };

        let variable = name
            .parse::<SmtVariable>()
            .map_err(|_| malformed(&format!("unknown variable '{name}'")))?;
        model.assign(variable, parse_integer(value)?);
    }

    Ok((status, model))
}

fn malformed(message: &str) -> OracleError {
    OracleError::MalformedOutput(message.to_owned())
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = vec![];
    let mut current = String::new();

    for c in text.chars() {
        if c == '(' || c == ')' || c.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            if !c.is_whitespace() {
                tokens.push(c.to_string());
            }
        } else {
            current.push(c);
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn parse_expression<Tokens: Iterator<Item = String>>(
    tokens: &mut Peekable<Tokens>,
) -> Result<Expression, OracleError> {
    let token = tokens
        .next()
        .ok_or_else(|| malformed("unexpected end of output"))?;

    match token.as_str() {
        "(" => {
            let mut elements = vec![];
            while tokens.peek().map(String::as_str) != Some(")") {
                elements.push(parse_expression(tokens)?);
            }
            let _ = tokens.next();

            Ok(Expression::List(elements))
        }
        ")" => Err(malformed("unbalanced ')'")),
        _ => Ok(Expression::Symbol(token)),
    }
}

fn parse_integer(expression: &Expression) -> Result<i64, OracleError> {
    let invalid = || malformed(&format!("{expression:?} is not an integer"));

    match expression {
        Expression::Symbol(symbol) => symbol.parse::<i64>().map_err(|_| invalid()),
        Expression::List(elements) => match elements.as_slice() {
            [Expression::Symbol(minus), Expression::Symbol(magnitude)] if minus == "-" => {
                magnitude
                    .parse::<i64>()
                    .map(|magnitude| -magnitude)
                    .map_err(|_| invalid())
            }
            _ => Err(invalid()),
        },
    }
}
