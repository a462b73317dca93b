//! The 9x9 grid and its operations.

use std::{
    fmt::{self, Display, Write as _},
    str::FromStr,
};

use crate::{
    bits::SymbolSet,
    cell::{Cell, CellFlags},
    cellref::CellRef,
    house::House,
    symbol::Symbol,
};

/// A full game grid: 81 cells plus the current selection.
///
/// The grid enforces the cell invariants (cached counts, given immutability)
/// and implements the constraint-propagation primitive
/// [`remove_conflicts`](Grid::remove_conflicts) shared by the solver and the
/// hint engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    cells: [[Cell; 9]; 9],
    selection: Option<CellRef>,
}

impl Grid {
    /// Creates an empty grid with no selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell at `cell_ref`.
    #[must_use]
    pub fn cell(&self, cell_ref: CellRef) -> &Cell {
        &self.cells[usize::from(cell_ref.row())][usize::from(cell_ref.col())]
    }

    /// Returns the cell at `cell_ref` mutably.
    pub fn cell_mut(&mut self, cell_ref: CellRef) -> &mut Cell {
        &mut self.cells[usize::from(cell_ref.row())][usize::from(cell_ref.col())]
    }

    /// Returns the current selection.
    #[must_use]
    pub const fn selection(&self) -> Option<CellRef> {
        self.selection
    }

    /// Makes the cell a single-symbol cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell is a given.
    pub fn set_symbol(&mut self, cell_ref: CellRef, symbol: Symbol, given: bool) {
        self.cell_mut(cell_ref).set_symbol(symbol, given);
    }

    /// Adds a candidate to the cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell is a given.
    pub fn add_candidate(&mut self, cell_ref: CellRef, symbol: Symbol) {
        self.cell_mut(cell_ref).add_candidate(symbol);
    }

    /// Toggles a candidate of the cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell is a given.
    pub fn toggle_candidate(&mut self, cell_ref: CellRef, symbol: Symbol) {
        self.cell_mut(cell_ref).toggle_candidate(symbol);
    }

    /// Removes every candidate in `mask` from the cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell is a given.
    pub fn remove_candidates(&mut self, cell_ref: CellRef, mask: SymbolSet) {
        self.cell_mut(cell_ref).remove_candidates(mask);
    }

    /// Replaces the cell's candidate set.
    ///
    /// # Panics
    ///
    /// Panics if the cell is a given.
    pub fn set_candidates(&mut self, cell_ref: CellRef, mask: SymbolSet) {
        self.cell_mut(cell_ref).set_candidates(mask);
    }

    /// Zeroes the cell, preserving its selection flag.
    ///
    /// # Panics
    ///
    /// Panics if the cell is a given.
    pub fn erase(&mut self, cell_ref: CellRef) {
        self.cell_mut(cell_ref).erase();
    }

    /// Moves the selection and recomputes error marks relative to it.
    pub fn select(&mut self, selection: Option<CellRef>) {
        if let Some(previous) = self.selection {
            self.cell_mut(previous).remove_flags(CellFlags::SELECTED);
        }
        self.selection = selection;
        self.clear_errors();
        if let Some(cell_ref) = selection {
            self.cell_mut(cell_ref).insert_flags(CellFlags::SELECTED);
            self.update_errors(cell_ref);
        }
    }

    /// Marks every given and solved cell as `GIVEN`.
    ///
    /// Used when committing a manually entered game: the singles present at
    /// commit time become the puzzle's givens.
    pub fn make_givens(&mut self) {
        for cell_ref in CellRef::all() {
            let cell = self.cell_mut(cell_ref);
            if cell.is_single() {
                cell.insert_flags(CellFlags::GIVEN);
            }
        }
    }

    /// Clears the `GIVEN` flag of a single cell and erases it.
    ///
    /// Retraction path for speculative givens during generation.
    pub fn retract_given(&mut self, cell_ref: CellRef) {
        let cell = self.cell_mut(cell_ref);
        cell.remove_flags(CellFlags::GIVEN);
        cell.erase();
    }

    /// Returns the number of solved cells (0-81).
    #[must_use]
    pub fn count_singles(&self) -> u8 {
        let mut count = 0;
        for cell_ref in CellRef::all() {
            if self.cell(cell_ref).is_single() {
                count += 1;
            }
        }
        count
    }

    /// Returns `true` iff every symbol is the single of exactly nine cells.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let mut counts = [0u8; 9];
        for cell_ref in CellRef::all() {
            let Some(symbol) = self.cell(cell_ref).symbol() else {
                return false;
            };
            counts[usize::from(symbol.index())] += 1;
        }
        counts.iter().all(|&count| count == 9)
    }

    /// Returns all solved cells whose symbol is in `mask`, row-major.
    #[must_use]
    pub fn singles_matching(&self, mask: SymbolSet) -> Vec<CellRef> {
        CellRef::all()
            .filter(|&cell_ref| {
                let cell = self.cell(cell_ref);
                cell.is_single() && !cell.candidates().is_disjoint(mask)
            })
            .collect()
    }

    /// Returns the symbols already solved in the three houses of `cell_ref`,
    /// ignoring the cell itself.
    #[must_use]
    pub fn solved_peers(&self, cell_ref: CellRef) -> SymbolSet {
        let mut seen = SymbolSet::EMPTY;
        for house in House::of(cell_ref) {
            for peer in house.cells() {
                if peer == cell_ref {
                    continue;
                }
                if let Some(symbol) = self.cell(peer).symbol() {
                    seen.insert(symbol);
                }
            }
        }
        seen
    }

    /// Pencils an empty, non-given cell.
    ///
    /// With `avoid_conflict` the initial candidates exclude symbols already
    /// solved in the cell's row, column and box; otherwise the cell gets all
    /// nine and error marks are refreshed so the duplicates show.
    pub fn fill_cell(&mut self, cell_ref: CellRef, avoid_conflict: bool) {
        let cell = self.cell(cell_ref);
        if cell.is_given() || !cell.is_empty() {
            return;
        }
        if avoid_conflict {
            let mask = !self.solved_peers(cell_ref);
            self.set_candidates(cell_ref, mask);
        } else {
            self.set_candidates(cell_ref, SymbolSet::FULL);
            self.clear_errors();
            self.update_errors(cell_ref);
        }
    }

    /// Pencils every empty, non-given cell. See [`fill_cell`](Grid::fill_cell).
    pub fn fill_all(&mut self, avoid_conflict: bool) {
        for cell_ref in CellRef::all() {
            if self.cell(cell_ref).is_empty() {
                self.fill_cell(cell_ref, avoid_conflict);
            }
        }
    }

    /// Propagates every solved cell by removing its symbol from all peers.
    ///
    /// A peer collapsing to a single is enqueued for further propagation. If
    /// a peer's candidate set would become empty, or two solved peers carry
    /// the same symbol, the grid cannot be completed and `false` is returned.
    /// Returns `true` once a fixed point is reached.
    #[must_use]
    pub fn remove_conflicts(&mut self) -> bool {
        let mut queue: Vec<(CellRef, SymbolSet)> = Vec::with_capacity(81);
        for cell_ref in CellRef::all() {
            let cell = self.cell(cell_ref);
            if cell.is_single() {
                queue.push((cell_ref, cell.candidates()));
            }
        }

        let mut next = 0;
        while next < queue.len() {
            let (cell_ref, mask) = queue[next];
            next += 1;

            for house in House::of(cell_ref) {
                for peer in house.cells() {
                    if peer == cell_ref {
                        continue;
                    }
                    if !self.strip_symbol(peer, mask, &mut queue) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Removes `mask` from one peer; enqueues it if it collapses to a single.
    /// Returns `false` if the peer is a solved cell with the same symbol.
    fn strip_symbol(
        &mut self,
        peer: CellRef,
        mask: SymbolSet,
        queue: &mut Vec<(CellRef, SymbolSet)>,
    ) -> bool {
        let cell = self.cell_mut(peer);
        if cell.count() > 1 {
            if !cell.candidates().is_disjoint(mask) {
                cell.strip_candidates(mask);
                if cell.is_single() {
                    let single = cell.candidates();
                    queue.push((peer, single));
                }
            }
            true
        } else {
            // A solved or empty peer: only an identical single is a conflict.
            cell.candidates() != mask
        }
    }

    /// Clears all `IN_ERROR` marks.
    pub fn clear_errors(&mut self) {
        for cell_ref in CellRef::all() {
            self.cell_mut(cell_ref).remove_flags(CellFlags::IN_ERROR);
        }
    }

    /// Marks solved peers sharing `cell_ref`'s symbol as `IN_ERROR`.
    ///
    /// Returns the number of conflicting cells found.
    pub fn update_errors(&mut self, cell_ref: CellRef) -> usize {
        let cell = self.cell(cell_ref);
        if !cell.is_single() {
            return 0;
        }
        let mask = cell.candidates();
        let mut errors = 0;
        for house in House::of(cell_ref) {
            for peer in house.cells() {
                if peer == cell_ref {
                    continue;
                }
                let peer_cell = self.cell(peer);
                if peer_cell.is_single()
                    && !peer_cell.candidates().is_disjoint(mask)
                    && !peer_cell.flags().contains(CellFlags::IN_ERROR)
                {
                    self.cell_mut(peer).insert_flags(CellFlags::IN_ERROR);
                    errors += 1;
                }
            }
        }
        errors
    }

    /// Clears all transient hint-rendering attributes.
    pub fn clear_hint_attributes(&mut self) {
        for cell_ref in CellRef::all() {
            self.cell_mut(cell_ref)
                .remove_flags(CellFlags::HINT_ATTRIBUTES);
        }
    }

    /// Adds hint-rendering attributes to one cell.
    pub fn add_hint_attributes(&mut self, cell_ref: CellRef, flags: CellFlags) {
        self.cell_mut(cell_ref)
            .insert_flags(flags & CellFlags::HINT_ATTRIBUTES);
    }
}

/// Error parsing a grid from its 81-character form.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum GridParseError {
    /// A character other than `1`-`9`, `.`, `_`, `0` or whitespace.
    #[display("unexpected character {_0:?}")]
    UnexpectedChar(#[error(not(source))] char),
    /// More or fewer than 81 cell characters.
    #[display("expected 81 cells, found {_0}")]
    WrongLength(#[error(not(source))] usize),
}

impl FromStr for Grid {
    type Err = GridParseError;

    /// Parses the compact form: 81 cell characters, row-major, where `1`-`9`
    /// is a solved (non-given) cell and `.`, `_` or `0` an empty one.
    /// Whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut grid = Grid::new();
        let mut index = 0usize;
        for ch in s.chars() {
            if ch.is_whitespace() {
                continue;
            }
            let symbol = match ch {
                '.' | '_' | '0' => None,
                '1'..='9' => Some(Symbol::from_value(ch as u8 - b'0')),
                _ => return Err(GridParseError::UnexpectedChar(ch)),
            };
            if index >= 81 {
                return Err(GridParseError::WrongLength(index + 1));
            }
            if let Some(symbol) = symbol {
                #[expect(clippy::cast_possible_truncation)]
                let cell_ref = CellRef::new((index / 9) as u8, (index % 9) as u8);
                grid.set_symbol(cell_ref, symbol, false);
            }
            index += 1;
        }
        if index != 81 {
            return Err(GridParseError::WrongLength(index));
        }
        Ok(grid)
    }
}

impl Display for Grid {
    /// Writes the compact 81-character form; `{:#}` breaks it into nine
    /// lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..9 {
            for col in 0..9 {
                let cell = self.cell(CellRef::new(row, col));
                match cell.symbol() {
                    Some(symbol) => f.write_char(symbol.as_char())?,
                    None => f.write_char('.')?,
                }
            }
            if f.alternate() && row != 8 {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Grid {
        s.parse().expect("valid grid literal")
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        let text = "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";
        let grid = parse(text);
        assert_eq!(grid.to_string(), text);
        assert_eq!(grid.cell(CellRef::new(0, 0)).symbol(), Some(Symbol::S5));
        assert_eq!(grid.cell(CellRef::new(0, 2)).symbol(), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "x".repeat(81).parse::<Grid>(),
            Err(GridParseError::UnexpectedChar('x'))
        ));
        assert!(matches!(
            ".".repeat(80).parse::<Grid>(),
            Err(GridParseError::WrongLength(80))
        ));
    }

    #[test]
    fn test_count_singles_and_is_solved() {
        let mut grid = Grid::new();
        assert_eq!(grid.count_singles(), 0);
        assert!(!grid.is_solved());

        // A full valid solution.
        let solved = parse(
            "534678912672195348198342567859761423426853791713924856961537284287419635345286179",
        );
        assert_eq!(solved.count_singles(), 81);
        assert!(solved.is_solved());

        // 81 singles with duplicated symbols is not solved.
        for cell_ref in CellRef::all() {
            grid.set_symbol(cell_ref, Symbol::S1, false);
        }
        assert_eq!(grid.count_singles(), 81);
        assert!(!grid.is_solved());
    }

    #[test]
    fn test_singles_matching() {
        let mut grid = Grid::new();
        grid.set_symbol(CellRef::new(0, 0), Symbol::S4, false);
        grid.set_symbol(CellRef::new(3, 5), Symbol::S7, false);
        grid.set_symbol(CellRef::new(8, 8), Symbol::S4, false);

        let fours = grid.singles_matching(SymbolSet::only(Symbol::S4));
        assert_eq!(fours, vec![CellRef::new(0, 0), CellRef::new(8, 8)]);
        let all = grid.singles_matching(SymbolSet::FULL);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_fill_cell_avoiding_conflicts() {
        let mut grid = Grid::new();
        grid.set_symbol(CellRef::new(0, 0), Symbol::S1, true);
        grid.set_symbol(CellRef::new(0, 5), Symbol::S2, false);
        grid.set_symbol(CellRef::new(5, 1), Symbol::S3, false);
        grid.set_symbol(CellRef::new(1, 2), Symbol::S4, false); // same box

        let target = CellRef::new(0, 1);
        grid.fill_cell(target, true);
        let cell = grid.cell(target);
        assert_eq!(cell.count(), 5);
        assert!(!cell.candidates().contains(Symbol::S1)); // row + box
        assert!(!cell.candidates().contains(Symbol::S2)); // row
        assert!(!cell.candidates().contains(Symbol::S3)); // col
        assert!(!cell.candidates().contains(Symbol::S4)); // box
        assert!(cell.candidates().contains(Symbol::S5));
    }

    #[test]
    fn test_fill_cell_ignores_given_and_nonempty() {
        let mut grid = Grid::new();
        grid.set_symbol(CellRef::new(0, 0), Symbol::S1, true);
        grid.fill_cell(CellRef::new(0, 0), true);
        assert_eq!(grid.cell(CellRef::new(0, 0)).symbol(), Some(Symbol::S1));

        grid.add_candidate(CellRef::new(1, 1), Symbol::S2);
        grid.fill_cell(CellRef::new(1, 1), false);
        assert_eq!(grid.cell(CellRef::new(1, 1)).count(), 1);
    }

    #[test]
    fn test_fill_all_pencils_every_empty_cell() {
        let mut grid = Grid::new();
        grid.set_symbol(CellRef::new(4, 4), Symbol::S5, true);
        grid.fill_all(false);
        for cell_ref in CellRef::all() {
            assert!(!grid.cell(cell_ref).is_empty());
        }
        assert_eq!(grid.cell(CellRef::new(0, 0)).count(), 9);
    }

    #[test]
    fn test_remove_conflicts_propagates() {
        let mut grid = Grid::new();
        grid.set_symbol(CellRef::new(0, 0), Symbol::S1, false);
        grid.fill_all(false);
        assert!(grid.remove_conflicts());
        // S1 removed from row, column and box peers.
        assert!(
            !grid
                .cell(CellRef::new(0, 8))
                .candidates()
                .contains(Symbol::S1)
        );
        assert!(
            !grid
                .cell(CellRef::new(8, 0))
                .candidates()
                .contains(Symbol::S1)
        );
        assert!(
            !grid
                .cell(CellRef::new(2, 2))
                .candidates()
                .contains(Symbol::S1)
        );
        // Unrelated cells untouched.
        assert_eq!(grid.cell(CellRef::new(4, 4)).count(), 9);
    }

    #[test]
    fn test_remove_conflicts_detects_duplicate_singles() {
        let mut grid = Grid::new();
        grid.set_symbol(CellRef::new(0, 0), Symbol::S1, false);
        grid.set_symbol(CellRef::new(0, 7), Symbol::S1, false);
        grid.fill_all(false);
        assert!(!grid.remove_conflicts());
    }

    #[test]
    fn test_remove_conflicts_cascades_new_singles() {
        // Row 0: cells 0..=7 solved, cell 8 penciled with everything.
        let mut grid = Grid::new();
        for (col, symbol) in (0..8).zip(Symbol::ALL) {
            grid.set_symbol(CellRef::new(0, col), symbol, false);
        }
        grid.set_candidates(CellRef::new(0, 8), SymbolSet::FULL);
        grid.set_candidates(CellRef::new(1, 8), SymbolSet::FULL);
        assert!(grid.remove_conflicts());
        // (0, 8) collapsed to 9 and propagated into its own column.
        assert_eq!(grid.cell(CellRef::new(0, 8)).symbol(), Some(Symbol::S9));
        assert!(
            !grid
                .cell(CellRef::new(1, 8))
                .candidates()
                .contains(Symbol::S9)
        );
    }

    #[test]
    fn test_select_updates_errors() {
        let mut grid = Grid::new();
        grid.set_symbol(CellRef::new(0, 0), Symbol::S5, false);
        grid.set_symbol(CellRef::new(0, 4), Symbol::S5, false);
        grid.set_symbol(CellRef::new(5, 0), Symbol::S5, false);
        grid.set_symbol(CellRef::new(8, 8), Symbol::S5, false);

        grid.select(Some(CellRef::new(0, 0)));
        let flags = |r, c| grid.cell(CellRef::new(r, c)).flags();
        assert!(flags(0, 0).contains(CellFlags::SELECTED));
        assert!(flags(0, 4).contains(CellFlags::IN_ERROR));
        assert!(flags(5, 0).contains(CellFlags::IN_ERROR));
        assert!(!flags(8, 8).contains(CellFlags::IN_ERROR));

        grid.select(None);
        let flags = |r, c| grid.cell(CellRef::new(r, c)).flags();
        assert!(!flags(0, 4).contains(CellFlags::IN_ERROR));
        assert!(!flags(0, 0).contains(CellFlags::SELECTED));
        assert_eq!(grid.selection(), None);
    }

    #[test]
    fn test_make_givens_then_retract() {
        let mut grid = Grid::new();
        grid.set_symbol(CellRef::new(2, 3), Symbol::S6, false);
        grid.make_givens();
        assert!(grid.cell(CellRef::new(2, 3)).is_given());

        grid.retract_given(CellRef::new(2, 3));
        assert!(!grid.cell(CellRef::new(2, 3)).is_given());
        assert!(grid.cell(CellRef::new(2, 3)).is_empty());
    }

    #[test]
    fn test_hint_attributes_cleared() {
        let mut grid = Grid::new();
        grid.add_hint_attributes(
            CellRef::new(1, 1),
            CellFlags::HINT | CellFlags::TRIGGER | CellFlags::PENCIL,
        );
        assert!(
            grid.cell(CellRef::new(1, 1))
                .flags()
                .contains(CellFlags::HINT)
        );
        grid.clear_hint_attributes();
        assert_eq!(grid.cell(CellRef::new(1, 1)).flags(), CellFlags::empty());
    }

    #[test]
    fn test_add_hint_attributes_masks_persistent_flags() {
        let mut grid = Grid::new();
        grid.add_hint_attributes(CellRef::new(0, 0), CellFlags::GIVEN | CellFlags::HINT);
        assert!(!grid.cell(CellRef::new(0, 0)).is_given());
        assert!(
            grid.cell(CellRef::new(0, 0))
                .flags()
                .contains(CellFlags::HINT)
        );
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        fn sparse_grid() -> impl Strategy<Value = Grid> {
            proptest::collection::vec((0u8..9, 0u8..9, 1u8..=9), 0..20).prop_map(|placements| {
                let mut grid = Grid::new();
                for (row, col, value) in placements {
                    let cell_ref = CellRef::new(row, col);
                    if !grid.cell(cell_ref).is_given() {
                        grid.set_symbol(cell_ref, Symbol::from_value(value), false);
                    }
                }
                grid
            })
        }

        proptest! {
            #[test]
            fn prop_counts_stay_in_sync(grid in sparse_grid()) {
                for cell_ref in CellRef::all() {
                    let cell = grid.cell(cell_ref);
                    prop_assert_eq!(cell.count(), cell.candidates().count());
                }
            }

            #[test]
            fn prop_remove_conflicts_never_leaves_duplicates(mut grid in sparse_grid()) {
                grid.fill_all(false);
                if grid.remove_conflicts() {
                    for house in House::all() {
                        let mut seen = SymbolSet::EMPTY;
                        for cell_ref in house.cells() {
                            if let Some(symbol) = grid.cell(cell_ref).symbol() {
                                prop_assert!(seen.insert(symbol), "duplicate in {}", house);
                            }
                        }
                    }
                }
            }

            #[test]
            fn prop_display_round_trips(grid in sparse_grid()) {
                let text = grid.to_string();
                let reparsed: Grid = text.parse().unwrap();
                prop_assert_eq!(reparsed.to_string(), text);
            }
        }
    }
}
