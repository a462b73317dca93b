//! Save-file grammar: parsing and serialization.
//!
//! The format is a whitespace-insensitive stream of expressions:
//!
//! ```text
//! # comment until end of line
//! T 120            seconds played
//! R 3  C 5         set the current row / column (symbols 1-9)
//! 4 = 7            given 7 at current row, column 4
//! 2, 6 : 1, 5      candidates 1 and 5 at row 2, column 6
//! = 9              given 9 at the current row and column
//! ```
//!
//! `=` assigns a given single symbol, `:` a penciled candidate list. All
//! coordinates and symbols are the digits 1-9. Serialization writes one `R`
//! header per non-empty row followed by one assignment per non-empty cell,
//! so `parse(serialize(g)) == g` up to whitespace and comments.

use std::{iter::Peekable, str::Chars};

use gridsage_core::{CellRef, Grid, Symbol};

/// A successfully parsed save file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedGame {
    /// The restored grid (givens and penciled cells).
    pub grid: Grid,
    /// Seconds already played when the game was saved.
    pub seconds: u64,
}

/// Syntax errors of the save-file grammar.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseError {
    /// A character no expression can start with, or a malformed expression.
    #[display("unexpected character {_0:?}")]
    UnexpectedChar(#[error(not(source))] char),
    /// The input ended in the middle of an expression.
    #[display("unexpected end of file")]
    UnexpectedEnd,
    /// An assignment appeared before its row and column were known.
    #[display("assignment without a current row and column")]
    MissingPosition,
    /// A given assignment targets a cell that already holds a given.
    #[display("cell ({_0}, {_1}) assigned twice")]
    DuplicateCell(#[error(not(source))] u8, #[error(not(source))] u8),
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    current_row: Option<u8>,
    current_col: Option<u8>,
}

impl Parser<'_> {
    fn skip_space(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else if c == '#' {
                for c in self.chars.by_ref() {
                    if c == '\n' || c == '\r' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    /// Reads one symbol digit 1-9 (0-8 internally), after skipping space.
    fn symbol(&mut self) -> Result<u8, ParseError> {
        self.skip_space();
        match self.chars.next() {
            Some(c @ '1'..='9') => Ok(c as u8 - b'1'),
            Some(c) => Err(ParseError::UnexpectedChar(c)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    /// Reads a nonnegative decimal integer, after skipping space.
    fn integer(&mut self) -> Result<u64, ParseError> {
        self.skip_space();
        let mut value: u64 = 0;
        let mut any = false;
        while let Some(&c) = self.chars.peek() {
            let Some(digit) = c.to_digit(10) else { break };
            self.chars.next();
            value = value * 10 + u64::from(digit);
            any = true;
        }
        if any {
            Ok(value)
        } else {
            match self.chars.peek() {
                Some(&c) => Err(ParseError::UnexpectedChar(c)),
                None => Err(ParseError::UnexpectedEnd),
            }
        }
    }

    /// Parses one assignment. `leading` holds the 0-2 position symbols read
    /// before `=`/`:` was seen.
    fn assignment(&mut self, grid: &mut Grid, leading: &[u8]) -> Result<(), ParseError> {
        let (row, col) = match *leading {
            [] => (
                self.current_row.ok_or(ParseError::MissingPosition)?,
                self.current_col.ok_or(ParseError::MissingPosition)?,
            ),
            [col] => (self.current_row.ok_or(ParseError::MissingPosition)?, col),
            [row, col] => (row, col),
            _ => unreachable!("at most two position symbols"),
        };
        let cell_ref = CellRef::new(row, col);
        if grid.cell(cell_ref).is_given() {
            return Err(ParseError::DuplicateCell(row, col));
        }

        self.skip_space();
        match self.chars.next() {
            Some('=') => {
                let value = self.symbol()?;
                grid.set_symbol(cell_ref, Symbol::from_index(value), true);
            }
            Some(':') => loop {
                let value = self.symbol()?;
                grid.add_candidate(cell_ref, Symbol::from_index(value));
                self.skip_space();
                if self.chars.peek() == Some(&',') {
                    self.chars.next();
                } else {
                    break;
                }
            },
            Some(c) => return Err(ParseError::UnexpectedChar(c)),
            None => return Err(ParseError::UnexpectedEnd),
        }
        Ok(())
    }
}

/// Parses a save file.
///
/// # Errors
///
/// Returns a [`ParseError`] on malformed input; the grid built so far is
/// discarded, so a failed load leaves the caller's state untouched.
pub fn parse(text: &str) -> Result<SavedGame, ParseError> {
    let mut parser = Parser {
        chars: text.chars().peekable(),
        current_row: None,
        current_col: None,
    };
    let mut grid = Grid::new();
    let mut seconds = 0;

    loop {
        parser.skip_space();
        let Some(&c) = parser.chars.peek() else {
            break;
        };
        match c {
            'T' | 't' => {
                parser.chars.next();
                seconds = parser.integer()?;
            }
            'C' | 'c' => {
                parser.chars.next();
                parser.current_col = Some(parser.symbol()?);
            }
            'R' | 'r' => {
                parser.chars.next();
                parser.current_row = Some(parser.symbol()?);
            }
            '=' | ':' => parser.assignment(&mut grid, &[])?,
            '1'..='9' => {
                // One or two position symbols, then the assignment proper.
                let first = parser.symbol()?;
                parser.skip_space();
                if parser.chars.peek() == Some(&',') {
                    parser.chars.next();
                    let second = parser.symbol()?;
                    parser.assignment(&mut grid, &[first, second])?;
                } else {
                    parser.assignment(&mut grid, &[first])?;
                }
            }
            other => return Err(ParseError::UnexpectedChar(other)),
        }
    }
    Ok(SavedGame { grid, seconds })
}

/// Serializes a grid and the elapsed play time.
///
/// Non-given singles are written as one-element candidate lists so the
/// given/non-given distinction survives the round trip.
#[must_use]
pub fn serialize(grid: &Grid, seconds: u64) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(out, "T {seconds}");
    for row in 0..9u8 {
        let cells: Vec<CellRef> = (0..9u8)
            .map(|col| CellRef::new(row, col))
            .filter(|&cell_ref| !grid.cell(cell_ref).is_empty())
            .collect();
        if cells.is_empty() {
            continue;
        }
        let _ = write!(out, "R{}", row + 1);
        for cell_ref in cells {
            let cell = grid.cell(cell_ref);
            let col = cell_ref.col() + 1;
            if cell.is_given() {
                let symbol = cell.symbol().expect("givens are singles");
                let _ = write!(out, " {col}={symbol}");
            } else {
                let pencils: Vec<String> =
                    cell.candidates().iter().map(|s| s.to_string()).collect();
                let _ = write!(out, " {col}:{}", pencils.join(","));
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use gridsage_core::SymbolSet;

    use super::*;

    #[test]
    fn test_parse_full_assignments() {
        let saved = parse("1,1 = 5  1,9:2,3  9,9=8").expect("valid save");
        let grid = &saved.grid;

        let top_left = grid.cell(CellRef::new(0, 0));
        assert!(top_left.is_given());
        assert_eq!(top_left.symbol(), Some(Symbol::S5));

        let top_right = grid.cell(CellRef::new(0, 8));
        assert!(!top_right.is_given());
        let expected: SymbolSet = [Symbol::S2, Symbol::S3].into_iter().collect();
        assert_eq!(top_right.candidates(), expected);

        assert_eq!(grid.cell(CellRef::new(8, 8)).symbol(), Some(Symbol::S8));
    }

    #[test]
    fn test_parse_current_row_and_col_commands() {
        let saved = parse("R3 4=6 C2 =9").expect("valid save");
        // "4=6": column 4 of current row 3; "=9": current row 3, column 2.
        assert_eq!(
            saved.grid.cell(CellRef::new(2, 3)).symbol(),
            Some(Symbol::S6)
        );
        assert_eq!(
            saved.grid.cell(CellRef::new(2, 1)).symbol(),
            Some(Symbol::S9)
        );
    }

    #[test]
    fn test_parse_time_and_comments() {
        let saved = parse("# a saved game\nT 645 # close to eleven minutes\nR1 1=4").expect("valid");
        assert_eq!(saved.seconds, 645);
        assert_eq!(
            saved.grid.cell(CellRef::new(0, 0)).symbol(),
            Some(Symbol::S4)
        );
    }

    #[test]
    fn test_parse_is_whitespace_insensitive() {
        let compact = parse("R1 1=4 2:5,6").expect("valid");
        let spaced = parse("  r 1\n  1 = 4\n  2 : 5 , 6\n").expect("valid");
        assert_eq!(compact.grid, spaced.grid);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse("R1 x=4"),
            Err(ParseError::UnexpectedChar('x'))
        ));
        assert!(matches!(parse("R1 1="), Err(ParseError::UnexpectedEnd)));
        assert!(matches!(parse("1=4"), Err(ParseError::MissingPosition)));
        assert!(matches!(
            parse("1,1=4 1,1=5"),
            Err(ParseError::DuplicateCell(0, 0))
        ));
    }

    #[test]
    fn test_round_trip() {
        let mut grid = Grid::new();
        grid.set_symbol(CellRef::new(0, 0), Symbol::S5, true);
        grid.set_symbol(CellRef::new(4, 7), Symbol::S1, true);
        grid.add_candidate(CellRef::new(2, 3), Symbol::S2);
        grid.add_candidate(CellRef::new(2, 3), Symbol::S7);
        grid.set_symbol(CellRef::new(8, 8), Symbol::S9, false); // player move

        let text = serialize(&grid, 42);
        let reloaded = parse(&text).expect("own output parses");
        assert_eq!(reloaded.seconds, 42);
        assert_eq!(reloaded.grid, grid);
    }

    #[test]
    fn test_serialize_skips_empty_rows() {
        let mut grid = Grid::new();
        grid.set_symbol(CellRef::new(4, 4), Symbol::S5, true);
        let text = serialize(&grid, 0);
        assert_eq!(text, "T 0\nR5 5=5\n");
    }
}
