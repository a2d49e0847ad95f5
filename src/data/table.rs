//! Parser for four column text tables (`x dx y dy`).
//!
//! Columns may be separated by spaces, tabs, commas or semicolons, which covers
//! both whitespace aligned files and CSV pasted from a spreadsheet. Blank lines
//! and lines starting with `#` are ignored.

use nom::{
    branch::alt,
    character::complete::{char, space0, space1},
    combinator::{eof, value},
    number::complete::double,
    sequence::delimited,
    IResult, Parser,
};

use super::DataSet;
use crate::error::{FitError, Result};

/// Parse a whole table into a [`DataSet`].
///
/// # Errors
///
/// * `FitError::ParseError` with the one-based line number of the first bad row
/// * `FitError::InvalidInput` if the table has no rows or a row fails validation
pub fn parse_table(text: &str) -> Result<DataSet> {
    let mut rows = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_row.parse(trimmed) {
            Ok((_, row)) => rows.push(row),
            Err(_) => {
                return Err(FitError::ParseError {
                    line: i + 1,
                    message: format!("expected 4 numeric columns, got '{}'", trimmed),
                });
            }
        }
    }

    if rows.is_empty() {
        return Err(FitError::InvalidInput("No data rows found".to_string()));
    }

    DataSet::from_rows(&rows)
}

/// Parse a column separator.
fn separator(input: &str) -> IResult<&str, ()> {
    alt((
        value((), delimited(space0, char(','), space0)),
        value((), delimited(space0, char(';'), space0)),
        value((), space1),
    ))
    .parse(input)
}

/// Parse one row of exactly four numbers.
fn parse_row(input: &str) -> IResult<&str, [f64; 4]> {
    let (input, x) = double(input)?;
    let (input, _) = separator(input)?;
    let (input, dx) = double(input)?;
    let (input, _) = separator(input)?;
    let (input, y) = double(input)?;
    let (input, _) = separator(input)?;
    let (input, dy) = double(input)?;
    let (input, _) = space0.parse(input)?;
    let (input, _) = eof.parse(input)?;

    Ok((input, [x, dx, y, dy]))
}
