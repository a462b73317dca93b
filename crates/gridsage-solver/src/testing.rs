//! Test harness for hint techniques.
//!
//! [`TechniqueTester`] parses a grid literal, pencils it the way the hint
//! engine pencils its working snapshot, runs a technique and offers fluent
//! assertions over the produced descriptor and the grid state.

use std::str::FromStr as _;

use gridsage_core::{CellRef, Grid, Symbol, SymbolSet};

use crate::{
    hint::{HintAction, HintDescriptor, HintKind},
    technique::{NakedSingle, Technique},
};

/// Fluent harness around one working grid and the last technique result.
///
/// All assertion methods consume and return `self` for chaining and panic
/// with a located message on failure.
#[derive(Debug)]
pub struct TechniqueTester {
    grid: Grid,
    descriptor: Option<HintDescriptor>,
}

impl TechniqueTester {
    /// Parses a grid literal (digits solved, `.`/`_`/`0` empty, whitespace
    /// ignored) and pencils every empty cell with all nine symbols, exactly
    /// like the engine's working snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the literal is malformed.
    #[track_caller]
    pub fn from_str(text: &str) -> Self {
        let mut grid = Grid::from_str(text).expect("valid grid literal");
        grid.fill_all(false);
        Self {
            grid,
            descriptor: None,
        }
    }

    /// Runs the technique once and records its result.
    #[track_caller]
    pub fn find<T>(mut self, technique: &T) -> Self
    where
        T: Technique,
    {
        self.descriptor = technique.find(&mut self.grid);
        self
    }

    /// Runs the naked-single sweep (asserting it finds nothing, so the
    /// pencils are fully cleaned) and then the technique under test.
    #[track_caller]
    pub fn find_after_cleanup<T>(mut self, technique: &T) -> Self
    where
        T: Technique,
    {
        let cleanup = NakedSingle::new().find(&mut self.grid);
        assert!(
            cleanup.is_none(),
            "pencil cleanup unexpectedly found a naked single: {cleanup:?}"
        );
        self.descriptor = technique.find(&mut self.grid);
        self
    }

    #[track_caller]
    fn descriptor(&self) -> &HintDescriptor {
        self.descriptor
            .as_ref()
            .expect("technique produced no hint")
    }

    /// Asserts the technique found nothing.
    #[track_caller]
    pub fn assert_no_hint(self) -> Self {
        assert!(
            self.descriptor.is_none(),
            "expected no hint, found {:?}",
            self.descriptor
        );
        self
    }

    /// Asserts the hint kind.
    #[track_caller]
    pub fn assert_kind(self, kind: HintKind) -> Self {
        assert_eq!(self.descriptor().kind, kind);
        self
    }

    /// Asserts the hint action.
    #[track_caller]
    pub fn assert_action(self, action: HintAction) -> Self {
        assert_eq!(self.descriptor().action, action);
        self
    }

    /// Asserts the affected symbols, exactly.
    #[track_caller]
    pub fn assert_symbols(self, symbols: &[Symbol]) -> Self {
        let expected: SymbolSet = symbols.iter().copied().collect();
        assert_eq!(self.descriptor().symbols, expected);
        self
    }

    /// Asserts the hint cells, ignoring order.
    #[track_caller]
    pub fn assert_hints(self, cells: &[CellRef]) -> Self {
        let mut actual = self.descriptor().hints.clone();
        let mut expected = cells.to_vec();
        actual.sort();
        expected.sort();
        assert_eq!(actual, expected, "hint cells differ");
        self
    }

    /// Asserts the trigger cells in exact report order.
    #[track_caller]
    pub fn assert_trigger_cells(self, cells: &[CellRef]) -> Self {
        let actual: Vec<CellRef> = self
            .descriptor()
            .triggers
            .iter()
            .map(|&(cell, _)| cell)
            .collect();
        assert_eq!(actual, cells, "trigger cells differ");
        self
    }

    /// Asserts the number of triggers.
    #[track_caller]
    pub fn assert_trigger_count(self, count: usize) -> Self {
        assert_eq!(
            self.descriptor().triggers.len(),
            count,
            "trigger count differs: {:?}",
            self.descriptor().triggers
        );
        self
    }

    /// Asserts the locked-candidate region, ignoring order.
    #[track_caller]
    pub fn assert_candidate_cells(self, cells: &[CellRef]) -> Self {
        let mut actual = self.descriptor().candidates.clone();
        let mut expected = cells.to_vec();
        actual.sort();
        expected.sort();
        assert_eq!(actual, expected, "candidate region differs");
        self
    }

    /// Asserts the suggested selection.
    #[track_caller]
    pub fn assert_selection(self, cell: CellRef) -> Self {
        assert_eq!(self.descriptor().selection, Some(cell));
        self
    }

    /// Asserts the cell still carries the symbol as a pencil mark.
    #[track_caller]
    pub fn assert_candidate(self, cell: CellRef, symbol: Symbol) -> Self {
        assert!(
            self.grid.cell(cell).candidates().contains(symbol),
            "expected {symbol} to be a candidate of {cell}"
        );
        self
    }

    /// Asserts the cell no longer carries the symbol.
    #[track_caller]
    pub fn assert_not_candidate(self, cell: CellRef, symbol: Symbol) -> Self {
        assert!(
            !self.grid.cell(cell).candidates().contains(symbol),
            "expected {symbol} to be gone from {cell}"
        );
        self
    }

    /// Applies the recorded hint's action to the grid.
    #[track_caller]
    pub fn apply(mut self) -> Self {
        let descriptor = self.descriptor().clone();
        crate::hint::apply_hint(&mut self.grid, &descriptor);
        self
    }

    /// Direct access to the working grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}
