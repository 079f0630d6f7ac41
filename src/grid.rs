//! A diagram as a fixed 2-D grid of characters.

use std::fmt;

/// A cell address inside a [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The position `dr` rows and `dc` columns away, if it is not negative.
    pub fn offset(self, dr: isize, dc: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(dr)?,
            col: self.col.checked_add_signed(dc)?,
        })
    }
}

// Editors count from one, so error messages do too.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.col + 1)
    }
}

/// Rows of characters addressed by `(row, col)`.
///
/// Rows may have different lengths. Columns count characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<char>>,
}

impl Grid {
    pub fn new(text: &str) -> Self {
        let rows = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).chars().collect())
            .collect();
        Self { rows }
    }

    pub fn row(&self, row: usize) -> &[char] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The character at `pos`, or `None` when it lies outside the grid.
    pub fn get(&self, pos: Position) -> Option<char> {
        self.rows.get(pos.row)?.get(pos.col).copied()
    }

    /// Like [`Grid::get`], relative to `pos`.
    pub fn get_offset(&self, pos: Position, dr: isize, dc: isize) -> Option<char> {
        self.get(pos.offset(dr, dc)?)
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, char)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, chars)| {
            chars
                .iter()
                .enumerate()
                .map(move |(col, &ch)| (Position::new(row, col), ch))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_is_bounds_checked() {
        let grid = Grid::new("ab\nc");
        assert_eq!(grid.get(Position::new(0, 1)), Some('b'));
        assert_eq!(grid.get(Position::new(1, 1)), None);
        assert_eq!(grid.get(Position::new(2, 0)), None);
        assert_eq!(grid.get_offset(Position::new(0, 0), -1, 0), None);
        assert_eq!(grid.get_offset(Position::new(1, 0), -1, 1), Some('b'));
    }

    #[test]
    fn carriage_returns_are_dropped() {
        let grid = Grid::new("a-b\r\n c\r");
        assert_eq!(grid.row(0), &['a', '-', 'b']);
        assert_eq!(grid.row(1), &[' ', 'c']);
    }

    #[test]
    fn cells_are_row_major() {
        let grid = Grid::new("ab\nc");
        let cells: Vec<_> = grid.cells().map(|(_, ch)| ch).collect();
        assert_eq!(cells, vec!['a', 'b', 'c']);
    }

    #[test]
    fn positions_display_one_based() {
        assert_eq!(Position::new(0, 4).to_string(), "1:5");
    }
}
