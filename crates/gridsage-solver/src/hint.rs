//! Hint descriptors and the hint engine driver.
//!
//! A hint descriptor is the full explanation of one deduction: what kind of
//! reasoning it is, which cells it acts on, which cells justify it and how
//! they should be highlighted. Descriptors are produced by the techniques on
//! a working snapshot, painted onto the user's snapshot as transient cell
//! attributes and discarded after a single deduction step.

use gridsage_core::{CellFlags, CellRef, Grid, GridStack, SymbolSet};
use log::debug;

use crate::technique;

/// The deduction technique that produced a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::IsVariant)]
pub enum HintKind {
    /// A cell forced to its last candidate by surrounding singles.
    NakedSingle,
    /// The only cell of a house that can hold a symbol.
    HiddenSingle,
    /// A symbol confined to one box/line intersection.
    LockedCandidate,
    /// k cells carrying exactly k symbols between them.
    NakedSubset,
    /// k symbols confined to k cells of a house.
    HiddenSubset,
    /// Two rows (or columns) confining a symbol to two columns (or rows).
    XWing,
    /// The three-line fish.
    Swordfish,
    /// The four-line fish.
    Jellyfish,
    /// Pivot-plus-two-wings deduction on bi-value cells.
    XyWing,
    /// Single-symbol forbidding chain (conjugate-pair coloring).
    ForbiddingChain,
}

/// What a hint does to its cells when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum HintAction {
    /// Display only; nothing to apply.
    #[default]
    None,
    /// Restrict the hint cells to the descriptor's symbols.
    Set,
    /// Remove the descriptor's symbols from the hint cells.
    Remove,
}

/// A fully described deduction step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintDescriptor {
    /// The technique that found the hint.
    pub kind: HintKind,
    /// How the hint changes its cells.
    pub action: HintAction,
    /// The symbols the action sets or removes.
    pub symbols: SymbolSet,
    /// Cells where the action applies.
    pub hints: Vec<CellRef>,
    /// Whether hint cells should be rendered with their pencil marks.
    pub show_pencils: bool,
    /// Justifying cells, each with its highlight flavor.
    pub triggers: Vec<(CellRef, CellFlags)>,
    /// Cells where the symbol could still go (locked-candidate region).
    pub candidates: Vec<CellRef>,
    /// The cell the UI should focus.
    pub selection: Option<CellRef>,
}

impl HintDescriptor {
    pub(crate) fn new(kind: HintKind) -> Self {
        Self {
            kind,
            action: HintAction::None,
            symbols: SymbolSet::EMPTY,
            hints: Vec::new(),
            show_pencils: false,
            triggers: Vec::new(),
            candidates: Vec::new(),
            selection: None,
        }
    }

    /// Returns `true` if applying the hint would change the grid.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        !self.action.is_none() && !self.hints.is_empty()
    }

    pub(crate) fn add_hint(&mut self, cell_ref: CellRef) {
        self.hints.push(cell_ref);
    }

    pub(crate) fn add_trigger(&mut self, cell_ref: CellRef, flavor: CellFlags) {
        self.triggers.push((cell_ref, flavor));
    }

    /// Writes the descriptor's transient attributes onto a grid.
    pub fn paint(&self, grid: &mut Grid) {
        grid.clear_hint_attributes();
        let hint_flags = if self.show_pencils {
            CellFlags::HINT | CellFlags::PENCIL
        } else {
            CellFlags::HINT
        };
        for &cell_ref in &self.hints {
            grid.add_hint_attributes(cell_ref, hint_flags);
        }
        for &(cell_ref, flavor) in &self.triggers {
            grid.add_hint_attributes(cell_ref, flavor);
        }
        for &cell_ref in &self.candidates {
            grid.add_hint_attributes(cell_ref, CellFlags::HINT | CellFlags::PENCIL);
        }
        if self.selection.is_some() {
            grid.select(self.selection);
        }
    }
}

/// Applies a hint's action to a grid.
///
/// `Set` restricts each hint cell to the descriptor's symbols (for singles
/// this solves the cell; for hidden subsets it strips the foreign
/// candidates). `Remove` strips the symbols instead. A `None` action leaves
/// the grid unchanged.
pub fn apply_hint(grid: &mut Grid, descriptor: &HintDescriptor) {
    match descriptor.action {
        HintAction::None => {}
        HintAction::Set => {
            for &cell_ref in &descriptor.hints {
                let kept = grid.cell(cell_ref).candidates() & descriptor.symbols;
                let mask = if kept.is_empty() {
                    descriptor.symbols
                } else {
                    kept
                };
                grid.set_candidates(cell_ref, mask);
            }
        }
        HintAction::Remove => {
            for &cell_ref in &descriptor.hints {
                grid.remove_candidates(cell_ref, descriptor.symbols);
            }
        }
    }
}

/// Runs the technique cascade on a working snapshot of the current grid.
///
/// The working snapshot is pushed above the caller's state (and above any
/// pending redo snapshots); the low-water mark guarantees the search cannot
/// evict the caller's snapshot. On return the stack is back at the caller's
/// level and the descriptor's visual attributes are painted on the caller's
/// grid. `None` means no technique found an actionable deduction.
pub fn find_hint(stack: &mut GridStack) -> Option<HintDescriptor> {
    let home = stack.sp();
    stack.set_low_water(home);
    stack.push_preserving_redo();
    // The working snapshot gets every empty cell penciled so deductions can
    // reach cells the user has not filled in yet.
    stack.grid_mut().fill_all(false);

    let descriptor = run_techniques(stack.grid_mut());

    stack.set_sp(home);
    stack.clear_low_water();

    if let Some(descriptor) = &descriptor {
        debug!("hint found: {:?} at {:?}", descriptor.kind, descriptor.hints);
        descriptor.paint(stack.grid_mut());
    }
    descriptor
}

/// Applies the techniques in order on a working grid.
///
/// Naked singles run first: besides producing the most elementary hints,
/// their scan strips every solved symbol from its peers' pencils, which all
/// later techniques rely on.
pub(crate) fn run_techniques(working: &mut Grid) -> Option<HintDescriptor> {
    for technique in technique::all_techniques() {
        if let Some(descriptor) = technique.find(working) {
            return Some(descriptor);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use gridsage_core::Symbol;

    use super::*;

    #[test]
    fn test_is_actionable() {
        let mut descriptor = HintDescriptor::new(HintKind::XWing);
        assert!(!descriptor.is_actionable());
        descriptor.action = HintAction::Remove;
        assert!(!descriptor.is_actionable());
        descriptor.add_hint(CellRef::new(0, 0));
        assert!(descriptor.is_actionable());
    }

    #[test]
    fn test_apply_set_hint_solves_cell() {
        let mut grid = Grid::new();
        grid.fill_all(false);
        let mut descriptor = HintDescriptor::new(HintKind::NakedSingle);
        descriptor.action = HintAction::Set;
        descriptor.symbols = SymbolSet::only(Symbol::S3);
        descriptor.add_hint(CellRef::new(4, 4));

        apply_hint(&mut grid, &descriptor);
        assert_eq!(grid.cell(CellRef::new(4, 4)).symbol(), Some(Symbol::S3));
    }

    #[test]
    fn test_apply_set_hint_restricts_subset_cells() {
        let mut grid = Grid::new();
        grid.fill_all(false);
        let pair: SymbolSet = [Symbol::S2, Symbol::S7].into_iter().collect();
        let mut descriptor = HintDescriptor::new(HintKind::HiddenSubset);
        descriptor.action = HintAction::Set;
        descriptor.symbols = pair;
        descriptor.add_hint(CellRef::new(0, 0));

        apply_hint(&mut grid, &descriptor);
        assert_eq!(grid.cell(CellRef::new(0, 0)).candidates(), pair);
    }

    #[test]
    fn test_apply_remove_hint() {
        let mut grid = Grid::new();
        grid.fill_all(false);
        let mut descriptor = HintDescriptor::new(HintKind::LockedCandidate);
        descriptor.action = HintAction::Remove;
        descriptor.symbols = SymbolSet::only(Symbol::S9);
        descriptor.add_hint(CellRef::new(2, 2));
        descriptor.add_hint(CellRef::new(2, 3));

        apply_hint(&mut grid, &descriptor);
        assert!(
            !grid
                .cell(CellRef::new(2, 2))
                .candidates()
                .contains(Symbol::S9)
        );
        assert!(
            !grid
                .cell(CellRef::new(2, 3))
                .candidates()
                .contains(Symbol::S9)
        );
        assert_eq!(grid.cell(CellRef::new(2, 4)).count(), 9);
    }

    #[test]
    fn test_paint_sets_and_clears_attributes() {
        let mut grid = Grid::new();
        let mut descriptor = HintDescriptor::new(HintKind::HiddenSingle);
        descriptor.action = HintAction::Set;
        descriptor.add_hint(CellRef::new(1, 1));
        descriptor.add_trigger(CellRef::new(1, 5), CellFlags::TRIGGER);
        descriptor.add_trigger(
            CellRef::new(2, 2),
            CellFlags::WEAK_TRIGGER | CellFlags::PENCIL,
        );
        descriptor.selection = Some(CellRef::new(1, 1));

        descriptor.paint(&mut grid);
        assert!(
            grid.cell(CellRef::new(1, 1))
                .flags()
                .contains(CellFlags::HINT)
        );
        assert!(
            grid.cell(CellRef::new(1, 5))
                .flags()
                .contains(CellFlags::TRIGGER)
        );
        assert!(
            grid.cell(CellRef::new(2, 2))
                .flags()
                .contains(CellFlags::WEAK_TRIGGER | CellFlags::PENCIL)
        );
        assert_eq!(grid.selection(), Some(CellRef::new(1, 1)));

        // Painting a new hint clears the old attributes.
        let other = HintDescriptor::new(HintKind::NakedSingle);
        other.paint(&mut grid);
        assert!(
            !grid
                .cell(CellRef::new(1, 1))
                .flags()
                .contains(CellFlags::HINT)
        );
    }

    #[test]
    fn test_find_hint_explains_a_forced_cell() {
        // Row 0 carries givens 1..8; the empty (0, 8) must take the 9. The
        // engine pencils the working snapshot itself, finds the naked
        // single and paints the explanation onto the user's grid.
        let mut stack = GridStack::new();
        for (col, symbol) in (0..8).zip(Symbol::ALL) {
            stack
                .grid_mut()
                .set_symbol(CellRef::new(0, col), symbol, true);
        }

        let descriptor = find_hint(&mut stack).expect("forced cell is found");
        assert_eq!(descriptor.kind, HintKind::NakedSingle);
        assert_eq!(descriptor.action, HintAction::Set);
        assert_eq!(descriptor.symbols, SymbolSet::only(Symbol::S9));
        assert_eq!(descriptor.hints, vec![CellRef::new(0, 8)]);
        assert_eq!(descriptor.selection, Some(CellRef::new(0, 8)));
        let trigger_cells: Vec<CellRef> =
            descriptor.triggers.iter().map(|&(c, _)| c).collect();
        let mut sorted = trigger_cells.clone();
        sorted.sort();
        let expected: Vec<CellRef> = (0..8).map(|col| CellRef::new(0, col)).collect();
        assert_eq!(sorted, expected);

        // The user's snapshot got the visual attributes, not the working one.
        let grid = stack.grid();
        assert!(grid.cell(CellRef::new(0, 8)).flags().contains(CellFlags::HINT));
        assert!(grid.cell(CellRef::new(0, 0)).flags().contains(CellFlags::TRIGGER));
        assert_eq!(grid.selection(), Some(CellRef::new(0, 8)));
        // The user's cell is still empty until the action is applied.
        assert!(grid.cell(CellRef::new(0, 8)).is_empty());
    }

    #[test]
    fn test_find_hint_restores_stack_level() {
        let mut stack = GridStack::new();
        *stack.grid_mut() = format!("{}9", ".".repeat(80)).parse().unwrap();
        stack.grid_mut().fill_all(true);
        let sp = stack.sp();
        let _ = find_hint(&mut stack);
        assert_eq!(stack.sp(), sp);
    }
}
