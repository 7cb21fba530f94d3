//! Discrete taxa-by-character matrices and their text format.
use std::io::{BufRead, BufReader, Read, Write};

use thiserror::Error;

/// Error while parsing a matrix file.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Error while parsing an input line.
    #[error("{line}: {message}")]
    ParseError {
        /// Line number where an error was encountered.
        line: usize,
        /// Description of the encountered error
        message: String,
    },
    /// IO error while reading the input file.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// A taxa-by-character matrix of discrete observation codes.
///
/// Rows are taxa, columns are characters. Each cell holds one of
/// [`Matrix::ABSENT`], [`Matrix::UNRESOLVED`] or [`Matrix::PRESENT`].
/// Dimensions are fixed at construction and all cell access is
/// bounds-checked.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Matrix {
    taxa: usize,
    characters: usize,
    cells: Vec<u8>,
}

impl Matrix {
    /// The character is absent from the taxon.
    pub const ABSENT: u8 = 0;
    /// The observation is unresolved and left to the solver.
    pub const UNRESOLVED: u8 = 1;
    /// The character is present in the taxon.
    pub const PRESENT: u8 = 2;

    /// Creates a matrix of the given dimensions with every cell absent.
    pub fn new(taxa: usize, characters: usize) -> Matrix {
        Matrix {
            taxa,
            characters,
            cells: vec![Matrix::ABSENT; taxa * characters],
        }
    }

    /// Creates a matrix from explicit row data.
    ///
    /// Panics when the rows are ragged or contain values other than the three
    /// observation codes.
    pub fn from_rows(rows: &[&[u8]]) -> Matrix {
        let characters = rows.first().map(|row| row.len()).unwrap_or_default();
        let mut matrix = Matrix::new(rows.len(), characters);
        for (taxon, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), characters, "ragged row {taxon}");
            for (character, &value) in row.iter().enumerate() {
                matrix.set(taxon, character, value);
            }
        }
        matrix
    }

    /// Number of taxa (rows).
    #[inline]
    pub fn taxa(&self) -> usize {
        self.taxa
    }

    /// Number of characters (columns).
    #[inline]
    pub fn characters(&self) -> usize {
        self.characters
    }

    /// Value of the given cell.
    #[inline]
    pub fn get(&self, taxon: usize, character: usize) -> u8 {
        assert!(taxon < self.taxa && character < self.characters);
        self.cells[taxon * self.characters + character]
    }

    /// Overwrites the given cell.
    #[inline]
    pub fn set(&mut self, taxon: usize, character: usize, value: u8) {
        assert!(taxon < self.taxa && character < self.characters);
        assert!(value <= Matrix::PRESENT, "invalid cell value {value}");
        self.cells[taxon * self.characters + character] = value;
    }

    /// Parses a matrix from its text representation.
    ///
    /// The format is whitespace separated integers with `#` starting a
    /// comment that runs to the end of the line: first the taxon count, then
    /// the character count, then the cell values in row-major order.
    pub fn parse(read: impl Read) -> Result<Matrix, ParseError> {
        let mut scanner = Scanner::new(read);

        let taxa = scanner.count("the taxon count")?;
        let characters = scanner.count("the character count")?;

        let mut matrix = Matrix::new(taxa, characters);
        for taxon in 0..taxa {
            for character in 0..characters {
                let value = scanner.next_int("a cell value")?;
                if !(0..=Matrix::PRESENT as i64).contains(&value) {
                    return Err(scanner.error(format!("invalid cell value {value}")));
                }
                matrix.set(taxon, character, value as u8);
            }
        }

        scanner.expect_end()?;
        Ok(matrix)
    }

    /// Writes the matrix in the same format accepted by [`Matrix::parse`].
    pub fn write(&self, mut write: impl Write) -> std::io::Result<()> {
        writeln!(write, "{} #taxa", self.taxa)?;
        writeln!(write, "{} #characters", self.characters)?;
        for taxon in 0..self.taxa {
            for character in 0..self.characters {
                if character > 0 {
                    write!(write, " ")?;
                }
                write!(write, "{}", self.get(taxon, character))?;
            }
            writeln!(write)?;
        }
        Ok(())
    }
}

/// Comment-stripping integer scanner that tracks line numbers for error
/// reporting.
struct Scanner<R> {
    read: BufReader<R>,
    line: usize,
    // Tokens of the current line in reverse order.
    pending: Vec<String>,
}

impl<R: Read> Scanner<R> {
    fn new(read: R) -> Scanner<R> {
        Scanner {
            read: BufReader::new(read),
            line: 0,
            pending: vec![],
        }
    }

    fn error(&self, message: String) -> ParseError {
        ParseError::ParseError {
            line: self.line,
            message,
        }
    }

    /// Reads the next line into the token buffer, returning `false` at end of
    /// input.
    fn advance_line(&mut self) -> Result<bool, ParseError> {
        let mut line = String::new();
        if self.read.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        self.line += 1;
        let text = line.split('#').next().unwrap_or("");
        self.pending = text.split_whitespace().rev().map(str::to_owned).collect();
        Ok(true)
    }

    fn next_int(&mut self, expected: &str) -> Result<i64, ParseError> {
        loop {
            if let Some(token) = self.pending.pop() {
                return token
                    .parse()
                    .map_err(|_| self.error(format!("expected {expected}, found {token:?}")));
            }
            if !self.advance_line()? {
                return Err(self.error(format!("unexpected end of input, expected {expected}")));
            }
        }
    }

    fn count(&mut self, expected: &str) -> Result<usize, ParseError> {
        let value = self.next_int(expected)?;
        usize::try_from(value).map_err(|_| self.error(format!("invalid {expected} {value}")))
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        loop {
            if let Some(token) = self.pending.pop() {
                return Err(self.error(format!("unexpected {token:?} after the last cell")));
            }
            if !self.advance_line()? {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_comments() {
        let input = "\
3 #taxa
2 #characters
# a full-line comment
0 1
2 2 # trailing comment
1 0
";
        let matrix = Matrix::parse(input.as_bytes()).unwrap();
        assert_eq!(matrix.taxa(), 3);
        assert_eq!(matrix.characters(), 2);
        assert_eq!(matrix.get(0, 1), Matrix::UNRESOLVED);
        assert_eq!(matrix.get(1, 0), Matrix::PRESENT);
        assert_eq!(matrix.get(2, 1), Matrix::ABSENT);
    }

    #[test]
    fn parse_ignores_line_breaks_between_cells() {
        let matrix = Matrix::parse("2 2 0 1 2\n0".as_bytes()).unwrap();
        assert_eq!(matrix.get(0, 0), 0);
        assert_eq!(matrix.get(1, 1), 0);
    }

    #[test]
    fn rejects_invalid_cell_value() {
        let err = Matrix::parse("1 1\n3\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("invalid cell value 3"));
    }

    #[test]
    fn rejects_truncated_input() {
        let err = Matrix::parse("2 2\n0 1 2\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("unexpected end of input"));
    }

    #[test]
    fn rejects_trailing_data() {
        let err = Matrix::parse("1 1\n0 0\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("after the last cell"));
    }

    #[test]
    fn rejects_non_integer_token() {
        let err = Matrix::parse("1 one\n0\n".as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("1:"));
    }

    #[test]
    fn write_then_parse_round_trip() {
        let matrix = Matrix::from_rows(&[&[2, 0, 1], &[0, 1, 2]]);
        let mut buffer = vec![];
        matrix.write(&mut buffer).unwrap();
        assert_eq!(Matrix::parse(&buffer[..]).unwrap(), matrix);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_access_panics() {
        Matrix::new(2, 2).get(2, 0);
    }
}
