//! Rows, columns and boxes as addressable cell sets.

use std::fmt::{self, Display};

use crate::cellref::CellRef;

/// One of the 27 houses of the grid: a row, a column or a 3x3 box.
///
/// A house addresses its nine cells by a slot index 0-8: ascending column
/// for rows, ascending row for columns, row-major for boxes. Every technique
/// that reasons "per unit" iterates houses through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum House {
    /// Row `n` (0-8).
    Row(u8),
    /// Column `n` (0-8).
    Col(u8),
    /// Box `n` (0-8, row-major).
    Box(u8),
}

impl House {
    /// Returns the `slot`-th cell of this house.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is 9 or more, or if the house index itself is out of
    /// range.
    #[must_use]
    pub fn cell(self, slot: u8) -> CellRef {
        assert!(slot < 9);
        match self {
            House::Row(row) => CellRef::new(row, slot),
            House::Col(col) => CellRef::new(slot, col),
            House::Box(box_index) => CellRef::from_box(box_index, slot),
        }
    }

    /// Returns the slot of `cell` within this house, or `None` if the cell
    /// is not part of it.
    #[must_use]
    pub fn slot_of(self, cell: CellRef) -> Option<u8> {
        match self {
            House::Row(row) => (cell.row() == row).then_some(cell.col()),
            House::Col(col) => (cell.col() == col).then_some(cell.row()),
            House::Box(box_index) => (cell.box_index() == box_index).then_some(cell.box_slot()),
        }
    }

    /// Returns `true` if the cell belongs to this house.
    #[must_use]
    pub fn contains(self, cell: CellRef) -> bool {
        self.slot_of(cell).is_some()
    }

    /// Returns an iterator over the nine cells of this house.
    pub fn cells(self) -> impl Iterator<Item = CellRef> {
        (0..9).map(move |slot| self.cell(slot))
    }

    /// Returns the three houses containing `cell`.
    #[must_use]
    pub fn of(cell: CellRef) -> [House; 3] {
        [
            House::Row(cell.row()),
            House::Col(cell.col()),
            House::Box(cell.box_index()),
        ]
    }

    /// Returns an iterator over all 27 houses: rows, then columns, then boxes.
    pub fn all() -> impl Iterator<Item = House> {
        (0..9)
            .map(House::Row)
            .chain((0..9).map(House::Col))
            .chain((0..9).map(House::Box))
    }
}

impl Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            House::Row(n) => write!(f, "row {n}"),
            House::Col(n) => write!(f, "col {n}"),
            House::Box(n) => write!(f, "box {n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_row_cells() {
        let cells: Vec<CellRef> = House::Row(3).cells().collect();
        assert_eq!(cells.len(), 9);
        for (col, cell) in (0..9).zip(&cells) {
            assert_eq!(*cell, CellRef::new(3, col));
        }
    }

    #[test]
    fn test_col_cells() {
        let cells: Vec<CellRef> = House::Col(7).cells().collect();
        for (row, cell) in (0..9).zip(&cells) {
            assert_eq!(*cell, CellRef::new(row, 7));
        }
    }

    #[test]
    fn test_box_cells_are_row_major() {
        let cells: Vec<CellRef> = House::Box(4).cells().collect();
        assert_eq!(cells[0], CellRef::new(3, 3));
        assert_eq!(cells[2], CellRef::new(3, 5));
        assert_eq!(cells[3], CellRef::new(4, 3));
        assert_eq!(cells[8], CellRef::new(5, 5));
    }

    #[test]
    fn test_slot_of_inverts_cell() {
        for house in House::all() {
            for slot in 0..9 {
                assert_eq!(house.slot_of(house.cell(slot)), Some(slot));
            }
        }
    }

    #[test]
    fn test_slot_of_foreign_cell_is_none() {
        assert_eq!(House::Row(0).slot_of(CellRef::new(1, 0)), None);
        assert_eq!(House::Box(0).slot_of(CellRef::new(5, 5)), None);
    }

    #[test]
    fn test_of_lists_the_three_houses() {
        let cell = CellRef::new(4, 7);
        let houses = House::of(cell);
        assert_eq!(houses[0], House::Row(4));
        assert_eq!(houses[1], House::Col(7));
        assert_eq!(houses[2], House::Box(5));
    }

    #[test]
    fn test_all_is_27_distinct_houses() {
        let houses: HashSet<House> = House::all().collect();
        assert_eq!(houses.len(), 27);
    }
}
