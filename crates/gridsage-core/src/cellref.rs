//! Cell coordinates and box arithmetic.

use std::fmt::{self, Display};

/// A cell coordinate `(row, col)`, both in the range 0-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    row: u8,
    col: u8,
}

impl PartialOrd for CellRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Row-major order, matching grid scans.
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

impl CellRef {
    /// Creates a cell reference.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is 9 or more.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        assert!(row < 9 && col < 9);
        Self { row, col }
    }

    /// Creates the `slot`-th cell (row-major, 0-8) of the given box.
    ///
    /// # Panics
    ///
    /// Panics if `box_index` or `slot` is 9 or more.
    #[must_use]
    pub const fn from_box(box_index: u8, slot: u8) -> Self {
        assert!(box_index < 9 && slot < 9);
        Self::new(
            3 * (box_index / 3) + slot / 3,
            3 * (box_index % 3) + slot % 3,
        )
    }

    /// Returns the row (0-8).
    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Returns the column (0-8).
    #[must_use]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the index (0-8, row-major) of the 3x3 box containing this cell.
    #[must_use]
    pub const fn box_index(self) -> u8 {
        3 * (self.row / 3) + self.col / 3
    }

    /// Returns the slot (0-8, row-major) of this cell within its box.
    #[must_use]
    pub const fn box_slot(self) -> u8 {
        3 * (self.row % 3) + self.col % 3
    }

    /// Returns `true` if both cells lie in the same 3x3 box.
    #[must_use]
    pub const fn same_box(self, other: Self) -> bool {
        self.box_index() == other.box_index()
    }

    /// Returns `true` if the cells share a row, a column or a box.
    #[must_use]
    pub const fn sees(self, other: Self) -> bool {
        self.row == other.row || self.col == other.col || self.same_box(other)
    }

    /// Returns an iterator over all 81 cells in row-major order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..9).flat_map(|row| (0..9).map(move |col| Self::new(row, col)))
    }
}

impl Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
