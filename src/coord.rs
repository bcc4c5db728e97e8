use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::CoordParseError;

/// A source location attached to a tree node.
///
/// Its canonical text form is `<file>:<line>` or `<file>:<line>:<column>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coord {
    pub file: String,
    pub line: u32,
    pub column: Option<u32>,
}

impl Coord {
    pub fn new(file: impl Into<String>, line: u32, column: Option<u32>) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Builds the 1-based line and column of a byte `position` in `source`.
    ///
    /// Meant for front-ends that track byte offsets rather than lines.
    pub fn at_offset(file: impl Into<String>, source: &str, position: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for (i, c) in source.char_indices() {
            if i >= position {
                break;
            }
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self::new(file, line, Some(column))
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if let Some(column) = self.column {
            write!(f, ":{column}")?;
        }
        Ok(())
    }
}

impl FromStr for Coord {
    type Err = CoordParseError;

    /// Parses from the right so that file names containing `:` survive.
    ///
    /// The text form cannot tell a column apart from a file name ending in
    /// `:<digits>`: when two numbers follow the last non-numeric segment, the
    /// second is read as the column. `Coord::new("a:1", 2, None)` prints as
    /// `a:1:2` and parses back as file `a`, line 1, column 2.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoordParseError {
            value: s.to_string(),
        };

        let (rest, last) = s.rsplit_once(':').ok_or_else(invalid)?;
        let last: u32 = last.parse().map_err(|_| invalid())?;

        if let Some((file, line)) = rest.rsplit_once(':') {
            if let Ok(line) = line.parse::<u32>() {
                return Ok(Coord::new(file, line, Some(last)));
            }
        }
        Ok(Coord::new(rest, last, None))
    }
}
