//! A single grid cell: candidate set, cached count and attribute flags.

use bitflags::bitflags;

use crate::{bits::SymbolSet, symbol::Symbol};

bitflags! {
    /// Cell attributes.
    ///
    /// `GIVEN`, `SELECTED` and `IN_ERROR` are persistent game state. The
    /// remaining flags are transient rendering attributes written by the hint
    /// engine and cleared on the next unrelated state change.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u16 {
        /// Preset at game start; the cell is immutable.
        const GIVEN = 1 << 0;
        /// The cell currently holds the selection.
        const SELECTED = 1 << 1;
        /// The cell conflicts with the selected cell's symbol.
        const IN_ERROR = 1 << 2;
        /// The cell is where a hint's action applies.
        const HINT = 1 << 3;
        /// The cell justifies the hint (regular flavor).
        const TRIGGER = 1 << 4;
        /// The cell justifies the hint indirectly (shown with pencils).
        const WEAK_TRIGGER = 1 << 5;
        /// Chain cell of the opposite polarity.
        const ALTERNATE_TRIGGER = 1 << 6;
        /// First cell of a displayed chain segment.
        const CHAIN_HEAD = 1 << 7;
        /// The renderer should show this cell's pencil marks.
        const PENCIL = 1 << 8;
    }
}

impl CellFlags {
    /// All transient hint-rendering attributes.
    pub const HINT_ATTRIBUTES: CellFlags = CellFlags::HINT
        .union(CellFlags::TRIGGER)
        .union(CellFlags::WEAK_TRIGGER)
        .union(CellFlags::ALTERNATE_TRIGGER)
        .union(CellFlags::CHAIN_HEAD)
        .union(CellFlags::PENCIL);
}

/// One of the 81 squares of the grid.
///
/// Holds up to nine candidate symbols as a bitmask, a cached candidate count
/// (hot paths read it without a popcount) and the attribute flags. The cached
/// count always equals `candidates.count()`; every mutation re-checks this in
/// debug builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    candidates: SymbolSet,
    count: u8,
    flags: CellFlags,
}

impl Cell {
    /// Returns the candidate set.
    #[must_use]
    pub const fn candidates(&self) -> SymbolSet {
        self.candidates
    }

    /// Returns the cached candidate count.
    #[must_use]
    pub const fn count(&self) -> u8 {
        self.count
    }

    /// Returns the attribute flags.
    #[must_use]
    pub const fn flags(&self) -> CellFlags {
        self.flags
    }

    /// Returns `true` if the cell has no candidates at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns `true` if the cell is solved (exactly one candidate).
    #[must_use]
    pub const fn is_single(&self) -> bool {
        self.count == 1
    }

    /// Returns `true` if the cell is a given.
    #[must_use]
    pub const fn is_given(&self) -> bool {
        self.flags.contains(CellFlags::GIVEN)
    }

    /// Returns the symbol of a solved cell, `None` otherwise.
    #[must_use]
    pub fn symbol(&self) -> Option<Symbol> {
        self.candidates.single()
    }

    fn check_integrity(&self) {
        debug_assert_eq!(
            self.count,
            self.candidates.count(),
            "cell count out of sync with candidate mask"
        );
    }

    fn assert_mutable(&self) {
        assert!(!self.is_given(), "attempt to modify a given cell");
    }

    /// Makes the cell a single-symbol cell, optionally marking it given.
    ///
    /// # Panics
    ///
    /// Panics if the cell is already a given.
    pub fn set_symbol(&mut self, symbol: Symbol, given: bool) {
        self.assert_mutable();
        self.candidates = SymbolSet::only(symbol);
        self.count = 1;
        if given {
            self.flags.insert(CellFlags::GIVEN);
        }
        self.check_integrity();
    }

    /// Adds a candidate if not already present.
    ///
    /// # Panics
    ///
    /// Panics if the cell is a given.
    pub fn add_candidate(&mut self, symbol: Symbol) {
        self.assert_mutable();
        if self.candidates.insert(symbol) {
            self.count += 1;
        }
        self.check_integrity();
    }

    /// Toggles a candidate.
    ///
    /// # Panics
    ///
    /// Panics if the cell is a given.
    pub fn toggle_candidate(&mut self, symbol: Symbol) {
        self.assert_mutable();
        if self.candidates.remove(symbol) {
            self.count -= 1;
        } else {
            self.candidates.insert(symbol);
            self.count += 1;
        }
        self.check_integrity();
    }

    /// Removes every candidate in `mask` from the cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell is a given.
    pub fn remove_candidates(&mut self, mask: SymbolSet) {
        self.assert_mutable();
        self.candidates = self.candidates.difference(mask);
        self.count = self.candidates.count();
        self.check_integrity();
    }

    /// Replaces the candidate set.
    ///
    /// # Panics
    ///
    /// Panics if the cell is a given.
    pub fn set_candidates(&mut self, mask: SymbolSet) {
        self.assert_mutable();
        self.candidates = mask;
        self.count = mask.count();
        self.check_integrity();
    }

    /// Zeroes the cell, keeping only a possible `SELECTED` flag.
    ///
    /// # Panics
    ///
    /// Panics if the cell is a given.
    pub fn erase(&mut self) {
        self.assert_mutable();
        self.candidates = SymbolSet::EMPTY;
        self.count = 0;
        self.flags &= CellFlags::SELECTED;
    }

    pub(crate) fn insert_flags(&mut self, flags: CellFlags) {
        self.flags.insert(flags);
    }

    pub(crate) fn remove_flags(&mut self, flags: CellFlags) {
        self.flags.remove(flags);
    }

    /// Removes a candidate during constraint propagation, bypassing the
    /// given-cell guard (propagation never reaches a given's own symbol).
    pub(crate) fn strip_candidates(&mut self, mask: SymbolSet) {
        self.candidates = self.candidates.difference(mask);
        self.count = self.candidates.count();
        self.check_integrity();
    }
}
