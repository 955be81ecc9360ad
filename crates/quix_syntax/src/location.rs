//! Source locations and the file table they point into.
//!
//! A [`Location`] is a `(line, column, file)` triple. Lines and columns are 1-based; the all-zero value
//! [`Location::UNKNOWN`] marks synthesized tokens and nodes without a meaningful position.

use std::fmt;
use std::ops::Sub;

/// Index into a [`SourceMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl FileId {
    pub const UNKNOWN: FileId = FileId(u32::MAX);
}

/// A position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: i64,
    pub column: i64,
    pub file: FileId,
}

impl Location {
    pub const UNKNOWN: Location = Location {
        line: 0,
        column: 0,
        file: FileId::UNKNOWN,
    };

    pub fn new(line: i64, column: i64, file: FileId) -> Self {
        Self { line, column, file }
    }

    pub fn is_unknown(&self) -> bool {
        self.line == 0 && self.column == 0
    }

    /// Move `n` columns backwards.
    ///
    /// When `n` exceeds the current column the position wraps back onto earlier lines, consuming one
    /// column budget per line. The column saturates at zero and the line never goes below zero.
    ///
    /// ## Examples
    /// ```rust
    /// use quix_syntax::location::{FileId, Location};
    ///
    /// let end = Location::new(3, 10, FileId(0));
    /// assert_eq!(end.rewind(4), Location::new(3, 6, FileId(0)));
    /// assert_eq!(end.rewind(15), Location::new(2, 0, FileId(0)));
    /// ```
    pub fn rewind(self, n: i64) -> Self {
        if n <= self.column {
            return Location {
                column: self.column - n,
                ..self
            };
        }

        let budget = self.column.max(1);
        let mut loc = self;
        let mut remaining = n;
        while remaining > budget {
            remaining -= budget;
            loc.column = 1;
            if loc.line == 0 {
                break;
            }
            loc.line -= 1;
        }
        loc.column = (loc.column - remaining).max(0);
        loc
    }
}

impl Sub<i64> for Location {
    type Output = Location;

    fn sub(self, rhs: i64) -> Location {
        self.rewind(rhs)
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::UNKNOWN
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Names of every file a compilation job has opened, indexed by [`FileId`].
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    files: Vec<String>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file name and return its id. Registering the same name twice yields two ids.
    pub fn add(&mut self, name: impl Into<String>) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(name.into());
        id
    }

    pub fn name(&self, id: FileId) -> Option<&str> {
        self.files.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Render `loc` as `file:line:col`, or `<unknown>` for synthesized positions.
    pub fn describe(&self, loc: Location) -> String {
        if loc.is_unknown() {
            return "<unknown>".to_string();
        }
        match self.name(loc.file) {
            Some(name) => format!("{name}:{loc}"),
            None => loc.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewind_within_line() {
        let loc = Location::new(1, 5, FileId(0));
        assert_eq!(loc - 5, Location::new(1, 0, FileId(0)));
        assert_eq!(loc - 2, Location::new(1, 3, FileId(0)));
    }

    #[test]
    fn rewind_wraps_to_previous_lines() {
        let loc = Location::new(4, 3, FileId(0));
        // 7 columns back: one full budget of 3 moves to line 3, leaving 4; another moves to line 2, leaving 1.
        assert_eq!(loc.rewind(7), Location::new(2, 0, FileId(0)));
    }

    #[test]
    fn rewind_stops_at_line_zero() {
        let loc = Location::new(0, 2, FileId(0));
        let back = loc.rewind(50);
        assert_eq!(back.line, 0);
        assert_eq!(back.column, 0);
    }

    #[test]
    fn source_map_describes_locations() {
        let mut map = SourceMap::new();
        let id = map.add("main.q");
        assert_eq!(map.describe(Location::new(2, 7, id)), "main.q:2:7");
        assert_eq!(map.describe(Location::UNKNOWN), "<unknown>");
    }
}
