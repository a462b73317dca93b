//! Fish patterns: X-Wing, Swordfish and Jellyfish.

use gridsage_core::{CellFlags, CellRef, Grid, SlotSet, Symbol, SymbolSet};

use super::Technique;
use crate::hint::{HintAction, HintDescriptor, HintKind};

/// Whether the base sets are rows (cover sets columns) or the transpose.
#[derive(Debug, Clone, Copy)]
enum BaseSets {
    Rows,
    Cols,
}

impl BaseSets {
    fn cell(self, base: u8, cross: u8) -> CellRef {
        match self {
            BaseSets::Rows => CellRef::new(base, cross),
            BaseSets::Cols => CellRef::new(cross, base),
        }
    }
}

/// Row/column symbol-location matching, sizes two to four.
///
/// For one symbol, k base rows whose candidate columns fit in exactly k
/// columns pin the symbol to the k x k intersection: it can be removed from
/// those columns in every other row. The same holds with rows and columns
/// exchanged. Nothing beyond size four is searched for.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fish;

impl Fish {
    /// Creates the technique.
    #[must_use]
    pub const fn new() -> Self {
        Fish
    }

    fn kind(size: usize) -> HintKind {
        match size {
            2 => HintKind::XWing,
            3 => HintKind::Swordfish,
            _ => HintKind::Jellyfish,
        }
    }

    /// Location map per base set: which crossings still carry the symbol in
    /// an open cell.
    fn location_maps(grid: &Grid, base_sets: BaseSets, symbol: Symbol) -> [SlotSet; 9] {
        let mut maps = [SlotSet::EMPTY; 9];
        for base in 0..9u8 {
            for cross in 0..9u8 {
                let cell = grid.cell(base_sets.cell(base, cross));
                if cell.count() > 1 && cell.candidates().contains(symbol) {
                    maps[usize::from(base)].insert(cross);
                }
            }
        }
        maps
    }

    /// Bounded subset search: extends the base-set selection with any set of
    /// 2..=size locations that keeps the accumulated crossings within
    /// `size`, backtracking until a selection yields removals.
    #[expect(clippy::too_many_arguments)]
    fn extend(
        grid: &Grid,
        base_sets: BaseSets,
        symbol: Symbol,
        maps: &[SlotSet; 9],
        size: usize,
        start: u8,
        chosen: &mut Vec<u8>,
        union: SlotSet,
    ) -> Option<HintDescriptor> {
        if chosen.len() == size {
            return Self::removals(grid, base_sets, symbol, chosen, union, size);
        }
        for base in start..9 {
            let map = maps[usize::from(base)];
            let locations = usize::from(map.count());
            if locations < 2 || locations > size {
                continue;
            }
            let extended = union | map;
            if usize::from(extended.count()) > size {
                continue;
            }
            chosen.push(base);
            let found =
                Self::extend(grid, base_sets, symbol, maps, size, base + 1, chosen, extended);
            if found.is_some() {
                return found;
            }
            chosen.pop();
        }
        None
    }

    /// Builds the descriptor if the configuration removes anything: the
    /// symbol goes from the covered crossings of every other base set.
    fn removals(
        grid: &Grid,
        base_sets: BaseSets,
        symbol: Symbol,
        chosen: &[u8],
        union: SlotSet,
        size: usize,
    ) -> Option<HintDescriptor> {
        let mut descriptor = HintDescriptor::new(Self::kind(size));
        descriptor.action = HintAction::Remove;
        descriptor.symbols = SymbolSet::only(symbol);
        descriptor.show_pencils = true;

        for base in (0..9u8).filter(|b| !chosen.contains(b)) {
            for cross in union {
                let cell_ref = base_sets.cell(base, cross);
                let cell = grid.cell(cell_ref);
                if cell.count() > 1 && cell.candidates().contains(symbol) {
                    descriptor.add_hint(cell_ref);
                    if descriptor.selection.is_none() && cell.count() == 2 {
                        descriptor.selection = Some(cell_ref);
                    }
                }
            }
        }
        if descriptor.hints.is_empty() {
            return None;
        }

        for &base in chosen {
            for cross in union {
                let cell_ref = base_sets.cell(base, cross);
                let cell = grid.cell(cell_ref);
                if cell.count() > 1 && cell.candidates().contains(symbol) {
                    descriptor.add_trigger(cell_ref, CellFlags::TRIGGER | CellFlags::PENCIL);
                }
            }
        }
        Some(descriptor)
    }
}

impl Technique for Fish {
    fn name(&self) -> &'static str {
        "fish"
    }

    fn find(&self, grid: &mut Grid) -> Option<HintDescriptor> {
        for symbol in Symbol::ALL {
            for base_sets in [BaseSets::Rows, BaseSets::Cols] {
                let maps = Self::location_maps(grid, base_sets, symbol);
                for size in 2..=4 {
                    let mut chosen = Vec::with_capacity(size);
                    let found = Self::extend(
                        grid,
                        base_sets,
                        symbol,
                        &maps,
                        size,
                        0,
                        &mut chosen,
                        SlotSet::EMPTY,
                    );
                    if found.is_some() {
                        return found;
                    }
                }
            }
        }
        None
    }
}
