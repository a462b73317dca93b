//! Naked and hidden singles, the two most common deductions.

use gridsage_core::{CellFlags, CellRef, Grid, House, Symbol, SymbolSet};

use super::Technique;
use crate::hint::{HintAction, HintDescriptor, HintKind};

/// Returns a solved cell of the house whose symbol intersects `mask`.
fn single_for_mask_in(grid: &Grid, house: House, mask: SymbolSet) -> Option<CellRef> {
    house.cells().find(|&cell_ref| {
        let cell = grid.cell(cell_ref);
        cell.is_single() && !cell.candidates().is_disjoint(mask)
    })
}

/// A cell forced down to its last candidate by the singles around it.
///
/// The scan doubles as the pencil cleanup every later technique depends on:
/// each solved symbol is stripped from its peers as the grid is swept, so
/// this technique must always run first.
#[derive(Debug, Default, Clone, Copy)]
pub struct NakedSingle;

impl NakedSingle {
    /// Creates the technique.
    #[must_use]
    pub const fn new() -> Self {
        NakedSingle
    }

    /// Strips `mask` from one peer. A peer left with a single candidate is
    /// the naked single this scan is looking for.
    fn strip_peer(grid: &mut Grid, peer: CellRef, mask: SymbolSet) -> Option<SymbolSet> {
        let cell = grid.cell(peer);
        if cell.count() > 1 && !cell.candidates().is_disjoint(mask) {
            grid.remove_candidates(peer, mask);
            let cell = grid.cell(peer);
            if cell.is_single() {
                return Some(cell.candidates());
            }
        }
        None
    }

    /// Builds the descriptor for a naked single found at `found`.
    ///
    /// Triggers are the surrounding singles, box first (easiest to spot),
    /// then the rest of the row and column, deduplicated by symbol.
    fn describe(grid: &Grid, found: CellRef, single: SymbolSet) -> HintDescriptor {
        let mut descriptor = HintDescriptor::new(HintKind::NakedSingle);
        descriptor.action = HintAction::Set;
        descriptor.symbols = single;
        descriptor.add_hint(found);
        descriptor.selection = Some(found);

        let box_house = House::Box(found.box_index());
        let surrounding = box_house
            .cells()
            .chain(
                House::Row(found.row())
                    .cells()
                    .filter(|c| !box_house.contains(*c)),
            )
            .chain(
                House::Col(found.col())
                    .cells()
                    .filter(|c| !box_house.contains(*c)),
            );

        let mut seen = single;
        for cell_ref in surrounding {
            if cell_ref == found {
                continue;
            }
            if let Some(symbol) = grid.cell(cell_ref).symbol() {
                if seen.insert(symbol) {
                    descriptor.add_trigger(cell_ref, CellFlags::TRIGGER);
                }
            }
        }
        descriptor
    }
}

impl Technique for NakedSingle {
    fn name(&self) -> &'static str {
        "naked single"
    }

    fn find(&self, grid: &mut Grid) -> Option<HintDescriptor> {
        for col in 0..9 {
            for row in 0..9 {
                let cell_ref = CellRef::new(row, col);
                let cell = grid.cell(cell_ref);
                if !cell.is_single() {
                    continue;
                }
                let mask = cell.candidates();

                for house in [
                    House::Box(cell_ref.box_index()),
                    House::Col(col),
                    House::Row(row),
                ] {
                    for peer in house.cells() {
                        if peer == cell_ref {
                            continue;
                        }
                        // Row/col cells inside the box are handled by the
                        // box pass.
                        if !matches!(house, House::Box(_)) && peer.same_box(cell_ref) {
                            continue;
                        }
                        if let Some(single) = Self::strip_peer(grid, peer, mask) {
                            return Some(Self::describe(grid, peer, single));
                        }
                    }
                }
            }
        }
        None
    }
}

/// The only open cell of a house that can still hold a symbol.
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenSingle;

impl HiddenSingle {
    /// Creates the technique.
    #[must_use]
    pub const fn new() -> Self {
        HiddenSingle
    }

    /// Finds a symbol of `house` carried by exactly one open cell, with no
    /// solved cell owning it.
    fn find_in_house(grid: &Grid, house: House) -> Option<(CellRef, Symbol)> {
        'symbols: for symbol in Symbol::ALL {
            let mask = SymbolSet::only(symbol);
            let mut found = None;
            for cell_ref in house.cells() {
                let cell = grid.cell(cell_ref);
                if cell.candidates().is_disjoint(mask) {
                    continue;
                }
                if cell.is_single() || found.is_some() {
                    continue 'symbols;
                }
                found = Some(cell_ref);
            }
            if let Some(cell_ref) = found {
                return Some((cell_ref, symbol));
            }
        }
        None
    }

    /// Adds the trigger for one open cell excluded along `cross`: a solved
    /// symbol in the crossing house, or the cell itself as a weak trigger.
    fn add_cross_trigger(
        grid: &Grid,
        cross: House,
        open_cell: CellRef,
        mask: SymbolSet,
        descriptor: &mut HintDescriptor,
    ) {
        if let Some(single) = single_for_mask_in(grid, cross, mask) {
            descriptor.add_trigger(single, CellFlags::TRIGGER);
        } else {
            descriptor.add_trigger(open_cell, CellFlags::WEAK_TRIGGER | CellFlags::PENCIL);
        }
    }

    /// Triggers for a hidden single found in a row (or, transposed, a
    /// column): every open cell of the line must be excluded either by its
    /// own box's solved symbol or by the crossing line.
    fn line_triggers(
        grid: &Grid,
        line: House,
        found: CellRef,
        mask: SymbolSet,
        descriptor: &mut HintDescriptor,
    ) {
        let cross = |cell: CellRef| match line {
            House::Row(_) => House::Col(cell.col()),
            _ => House::Row(cell.row()),
        };

        let own_box = found.box_index();
        let mut other_boxes: Vec<u8> = line
            .cells()
            .map(CellRef::box_index)
            .filter(|&b| b != own_box)
            .collect();
        other_boxes.dedup();

        for box_index in other_boxes {
            let mut box_checked = false;
            for cell_ref in line.cells().filter(|c| c.box_index() == box_index) {
                if grid.cell(cell_ref).is_single() {
                    continue;
                }
                if !box_checked {
                    if let Some(single) = single_for_mask_in(grid, House::Box(box_index), mask) {
                        descriptor.add_trigger(single, CellFlags::TRIGGER);
                        break; // the box single covers its whole intersection
                    }
                    box_checked = true;
                }
                Self::add_cross_trigger(grid, cross(cell_ref), cell_ref, mask, descriptor);
            }
        }

        for cell_ref in line.cells().filter(|c| c.box_index() == own_box) {
            if cell_ref == found || grid.cell(cell_ref).is_single() {
                continue;
            }
            Self::add_cross_trigger(grid, cross(cell_ref), cell_ref, mask, descriptor);
        }
    }

    /// Triggers for a hidden single found in a box: validated row and column
    /// singles outside the box, with redundant ones dropped.
    fn box_triggers(
        grid: &Grid,
        box_index: u8,
        found: CellRef,
        mask: SymbolSet,
        descriptor: &mut HintDescriptor,
    ) {
        // Open box cells off the hint row/col, grouped by line.
        let mut row_triggers: Vec<(u8, Vec<u8>, Option<CellRef>)> = Vec::new();
        let mut col_triggers: Vec<(u8, Vec<u8>, Option<CellRef>)> = Vec::new();
        for cell_ref in House::Box(box_index).cells() {
            if cell_ref == found || grid.cell(cell_ref).is_single() {
                continue;
            }
            if cell_ref.row() != found.row() {
                match row_triggers.iter_mut().find(|(r, ..)| *r == cell_ref.row()) {
                    Some((_, cols, _)) => cols.push(cell_ref.col()),
                    None => row_triggers.push((cell_ref.row(), vec![cell_ref.col()], None)),
                }
            }
            if cell_ref.col() != found.col() {
                match col_triggers.iter_mut().find(|(c, ..)| *c == cell_ref.col()) {
                    Some((_, rows, _)) => rows.push(cell_ref.row()),
                    None => col_triggers.push((cell_ref.col(), vec![cell_ref.row()], None)),
                }
            }
        }

        // Validate each line: it needs a solved symbol outside the box.
        for (row, _, trigger) in &mut row_triggers {
            *trigger = House::Row(*row)
                .cells()
                .filter(|c| c.box_index() != box_index)
                .find(|&c| {
                    let cell = grid.cell(c);
                    cell.is_single() && !cell.candidates().is_disjoint(mask)
                });
        }
        for (col, _, trigger) in &mut col_triggers {
            *trigger = House::Col(*col)
                .cells()
                .filter(|c| c.box_index() != box_index)
                .find(|&c| {
                    let cell = grid.cell(c);
                    cell.is_single() && !cell.candidates().is_disjoint(mask)
                });
        }

        // A validated row makes its cells redundant for the columns, and
        // vice versa; lines left covering nothing lose their trigger.
        for (row, _, row_trigger) in &row_triggers {
            if row_trigger.is_none() {
                continue;
            }
            for (_, rows, col_trigger) in &mut col_triggers {
                rows.retain(|r| r != row);
                if rows.is_empty() {
                    *col_trigger = None;
                }
            }
        }
        for (col, _, col_trigger) in &col_triggers {
            if col_trigger.is_none() {
                continue;
            }
            for (_, cols, row_trigger) in &mut row_triggers {
                cols.retain(|c| c != col);
                if cols.is_empty() {
                    *row_trigger = None;
                }
            }
        }

        for (_, _, trigger) in row_triggers.into_iter().chain(col_triggers) {
            if let Some(cell_ref) = trigger {
                descriptor.add_trigger(cell_ref, CellFlags::TRIGGER);
            }
        }
    }
}

impl Technique for HiddenSingle {
    fn name(&self) -> &'static str {
        "hidden single"
    }

    fn find(&self, grid: &mut Grid) -> Option<HintDescriptor> {
        let houses = (0..9)
            .map(House::Box)
            .chain((0..9).map(House::Col))
            .chain((0..9).map(House::Row));
        for house in houses {
            let Some((found, symbol)) = Self::find_in_house(grid, house) else {
                continue;
            };
            let mask = SymbolSet::only(symbol);
            let mut descriptor = HintDescriptor::new(HintKind::HiddenSingle);
            descriptor.action = HintAction::Set;
            descriptor.symbols = mask;
            descriptor.add_hint(found);
            descriptor.selection = Some(found);

            match house {
                House::Box(box_index) => {
                    Self::box_triggers(grid, box_index, found, mask, &mut descriptor);
                }
                line => Self::line_triggers(grid, line, found, mask, &mut descriptor),
            }
            return Some(descriptor);
        }
        None
    }
}
