//! Forbidding chains: single-symbol coloring over conjugate pairs.

use std::ops::Range;

use gridsage_core::{CellFlags, CellRef, Grid, SlotSet, Symbol, SymbolSet};

use super::Technique;
use crate::hint::{HintAction, HintDescriptor, HintKind};

/// One cell of a chain, with its coloring polarity (+1 or -1; 0 once the
/// segment is hidden from display).
#[derive(Debug, Clone, Copy)]
struct Link {
    head: bool,
    cell: CellRef,
    polarity: i8,
}

/// Candidate locations of one symbol, per row, column and box.
struct Locations {
    rows: [SlotSet; 9],
    cols: [SlotSet; 9],
    boxes: [SlotSet; 9],
    total: usize,
}

impl Locations {
    fn gather(grid: &Grid, symbol: Symbol) -> Self {
        let mut locations = Self {
            rows: [SlotSet::EMPTY; 9],
            cols: [SlotSet::EMPTY; 9],
            boxes: [SlotSet::EMPTY; 9],
            total: 0,
        };
        for cell_ref in CellRef::all() {
            let cell = grid.cell(cell_ref);
            if cell.count() > 1 && cell.candidates().contains(symbol) {
                locations.rows[usize::from(cell_ref.row())].insert(cell_ref.col());
                locations.cols[usize::from(cell_ref.col())].insert(cell_ref.row());
                locations.boxes[usize::from(cell_ref.box_index())].insert(cell_ref.box_slot());
                locations.total += 1;
            }
        }
        locations
    }

    /// Takes the two cells of a conjugate house, clearing its map so the
    /// link is consumed exactly once.
    fn take_pair(&mut self, house: ChainHouse) -> Option<[CellRef; 2]> {
        let map = match house {
            ChainHouse::Row(n) => &mut self.rows[usize::from(n)],
            ChainHouse::Col(n) => &mut self.cols[usize::from(n)],
            ChainHouse::Box(n) => &mut self.boxes[usize::from(n)],
        };
        if map.count() != 2 {
            return None;
        }
        let mut taken = *map;
        *map = SlotSet::EMPTY;
        let first = taken.pop_first().expect("two slots");
        let second = taken.pop_first().expect("two slots");
        Some(match house {
            ChainHouse::Row(n) => [CellRef::new(n, first), CellRef::new(n, second)],
            ChainHouse::Col(n) => [CellRef::new(first, n), CellRef::new(second, n)],
            ChainHouse::Box(n) => [CellRef::from_box(n, first), CellRef::from_box(n, second)],
        })
    }

    fn is_pair(&self, house: ChainHouse) -> bool {
        let map = match house {
            ChainHouse::Row(n) => self.rows[usize::from(n)],
            ChainHouse::Col(n) => self.cols[usize::from(n)],
            ChainHouse::Box(n) => self.boxes[usize::from(n)],
        };
        map.count() == 2
    }
}

#[derive(Debug, Clone, Copy)]
enum ChainHouse {
    Row(u8),
    Col(u8),
    Box(u8),
}

/// Single-digit forbidding chains.
///
/// For one symbol, every row, column or box holding the symbol in exactly
/// two cells is a conjugate pair: one of the two must carry the symbol. The
/// pairs chain into two-colored components; cells caught between opposite
/// colors, and chains contradicting each other through weak links, lose the
/// symbol.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForbiddingChain;

impl ForbiddingChain {
    /// Creates the technique.
    #[must_use]
    pub const fn new() -> Self {
        ForbiddingChain
    }

    /// Appends both cells of a link, skipping cells already in the chain.
    /// The polarity alternates only on actual insertion so a shared cell
    /// keeps its established color.
    fn add_link(chain: &mut Vec<Link>, mut head: bool, mut polarity: i8, cells: [CellRef; 2]) {
        for cell in cells {
            if !chain.iter().any(|link| link.cell == cell) {
                chain.push(Link {
                    head,
                    cell,
                    polarity,
                });
                polarity = -polarity;
            }
            head = false;
        }
    }

    /// Consumes a conjugate house and transitively follows every conjugate
    /// house of the newly added cells, alternating polarities.
    fn append_conjugates(
        chain: &mut Vec<Link>,
        locations: &mut Locations,
        house: ChainHouse,
        head: bool,
        polarity: i8,
    ) {
        let Some(cells) = locations.take_pair(house) else {
            return;
        };
        let before = chain.len();
        Self::add_link(chain, head, polarity, cells);

        for index in (before..chain.len()).rev() {
            let link = chain[index];
            let row = ChainHouse::Row(link.cell.row());
            if locations.is_pair(row) {
                Self::append_conjugates(chain, locations, row, false, -link.polarity);
            }
            let col = ChainHouse::Col(link.cell.col());
            if locations.is_pair(col) {
                Self::append_conjugates(chain, locations, col, false, -link.polarity);
            }
            let box_house = ChainHouse::Box(link.cell.box_index());
            if locations.is_pair(box_house) {
                Self::append_conjugates(chain, locations, box_house, false, -link.polarity);
            }
        }
    }

    fn build_chain(grid: &Grid, symbol: Symbol) -> Option<Vec<Link>> {
        let mut locations = Locations::gather(grid, symbol);
        if locations.total < 4 {
            return None;
        }
        let mut chain = Vec::new();
        for n in 0..9 {
            let house = ChainHouse::Row(n);
            if locations.is_pair(house) {
                Self::append_conjugates(&mut chain, &mut locations, house, true, 1);
            }
        }
        for n in 0..9 {
            let house = ChainHouse::Col(n);
            if locations.is_pair(house) {
                Self::append_conjugates(&mut chain, &mut locations, house, true, 1);
            }
        }
        for n in 0..9 {
            let house = ChainHouse::Box(n);
            if locations.is_pair(house) {
                Self::append_conjugates(&mut chain, &mut locations, house, true, 1);
            }
        }
        (chain.len() >= 4).then_some(chain)
    }

    /// Splits the chain into its connected components (head to head).
    fn segments(chain: &[Link]) -> Vec<Range<usize>> {
        let mut segments = Vec::new();
        let mut start = 0;
        for (index, link) in chain.iter().enumerate() {
            if link.head && index != start {
                segments.push(start..index);
                start = index;
            }
        }
        segments.push(start..chain.len());
        segments
    }

    fn add_forbidden(descriptor: &mut HintDescriptor, grid: &Grid, cell_ref: CellRef) -> bool {
        let cell = grid.cell(cell_ref);
        if cell.count() > 1
            && !cell.candidates().is_disjoint(descriptor.symbols)
            && !descriptor.hints.contains(&cell_ref)
        {
            descriptor.add_hint(cell_ref);
            if descriptor.selection.is_none() && cell.count() == 2 {
                descriptor.selection = Some(cell_ref);
            }
            return true;
        }
        false
    }

    /// Direct exclusion inside one component: a cell on the row of one
    /// polarity and the column of the opposite polarity can never hold the
    /// symbol. The first segment producing hints wins and the other
    /// segments are hidden.
    fn direct_exclusions(
        grid: &Grid,
        chain: &mut [Link],
        descriptor: &mut HintDescriptor,
    ) -> bool {
        for segment in Self::segments(chain) {
            // Links whose row (preferred) or column is unique in the segment.
            let mut unique_rows: Vec<Link> = Vec::new();
            let mut unique_cols: Vec<Link> = Vec::new();
            for index in segment.clone() {
                let link = chain[index];
                let row_unique = segment
                    .clone()
                    .all(|other| other == index || chain[other].cell.row() != link.cell.row());
                let col_unique = segment
                    .clone()
                    .all(|other| other == index || chain[other].cell.col() != link.cell.col());
                if row_unique {
                    unique_rows.push(link);
                } else if col_unique {
                    unique_cols.push(link);
                }
            }

            let mut found = false;
            for row_link in &unique_rows {
                for col_link in &unique_cols {
                    if row_link.polarity != col_link.polarity {
                        let crossing = CellRef::new(row_link.cell.row(), col_link.cell.col());
                        found |= Self::add_forbidden(descriptor, grid, crossing);
                    }
                }
            }
            if found {
                for (index, link) in chain.iter_mut().enumerate() {
                    if !segment.contains(&index) {
                        link.polarity = 0;
                    }
                }
                return true;
            }
        }
        false
    }

    /// Weak-link exclusions between two components.
    ///
    /// Cells of different components sharing a unit cannot both hold the
    /// symbol. A clashing polarity product pins one chain cell to "false"
    /// and excludes its polarity tail; a consistent product excludes the
    /// crossings of the opposite polarities outside both chains. On the
    /// consistent case the second component's colors are flipped afterwards
    /// for display stability only.
    fn segment_pair_exclusions(
        grid: &Grid,
        chain: &mut [Link],
        first: &Range<usize>,
        second: &Range<usize>,
        descriptor: &mut HintDescriptor,
    ) -> bool {
        let mut product: i8 = 0;
        let mut prev = (first.start, second.start);
        let mut excluded: Option<usize> = None;

        'scan: for i in first.clone() {
            for j in second.clone() {
                if !chain[i].cell.sees(chain[j].cell) {
                    continue;
                }
                let pair_product = chain[i].polarity * chain[j].polarity;
                if product == 0 {
                    product = pair_product;
                    prev = (i, j);
                } else if product != pair_product {
                    // The side whose polarity did not change is impossible.
                    excluded = Some(if chain[prev.0].polarity == chain[i].polarity {
                        prev.0
                    } else {
                        prev.1
                    });
                    break 'scan;
                }
            }
        }

        let mut found = false;
        if let Some(excluded) = excluded {
            descriptor.selection = Some(chain[excluded].cell);
            let tail = if excluded < second.start {
                excluded..first.end
            } else {
                excluded..second.end
            };
            let polarity = chain[excluded].polarity;
            for index in tail {
                if chain[index].polarity == polarity {
                    descriptor.add_hint(chain[index].cell);
                    found = true;
                }
            }
            return found;
        }

        if product != 0 {
            let in_chains = |cell: CellRef| {
                first
                    .clone()
                    .chain(second.clone())
                    .any(|index| chain[index].cell == cell)
            };
            let polarity_first = chain[prev.0].polarity;
            let polarity_second = chain[prev.1].polarity;
            for i in first.clone() {
                if chain[i].polarity == polarity_first {
                    continue;
                }
                for j in second.clone() {
                    if chain[j].polarity == polarity_second {
                        continue;
                    }
                    let crossings = [
                        CellRef::new(chain[i].cell.row(), chain[j].cell.col()),
                        CellRef::new(chain[j].cell.row(), chain[i].cell.col()),
                    ];
                    for crossing in crossings {
                        if !in_chains(crossing) {
                            found |= Self::add_forbidden(descriptor, grid, crossing);
                        }
                    }
                }
            }
            if found && product == 1 {
                // Show the two chains in opposite colors.
                for index in second.clone() {
                    chain[index].polarity = -chain[index].polarity;
                }
            }
        }
        found
    }

    fn weak_relations(grid: &Grid, chain: &mut [Link], descriptor: &mut HintDescriptor) -> bool {
        let segments = Self::segments(chain);
        let mut active = vec![false; segments.len()];

        for i in 0..segments.len() {
            for j in i + 1..segments.len() {
                if Self::segment_pair_exclusions(
                    grid,
                    chain,
                    &segments[i],
                    &segments[j],
                    descriptor,
                ) {
                    active[i] = true;
                    active[j] = true;
                }
            }
        }

        let mut any = false;
        for (segment, is_active) in segments.iter().zip(&active) {
            if *is_active {
                any = true;
            } else {
                for index in segment.clone() {
                    chain[index].polarity = 0;
                }
            }
        }
        any
    }

    /// Paints the surviving chain cells as triggers: regular color for +1,
    /// alternate for -1, with the head of each displayed segment flagged.
    fn add_chain_triggers(chain: &[Link], descriptor: &mut HintDescriptor) {
        for link in chain {
            if link.polarity == 0 {
                continue;
            }
            let mut flavor = CellFlags::PENCIL
                | if link.polarity == 1 {
                    CellFlags::TRIGGER
                } else {
                    CellFlags::ALTERNATE_TRIGGER
                };
            if link.head {
                flavor |= CellFlags::CHAIN_HEAD;
            }
            descriptor.add_trigger(link.cell, flavor);
        }
    }
}

impl Technique for ForbiddingChain {
    fn name(&self) -> &'static str {
        "forbidding chain"
    }

    fn find(&self, grid: &mut Grid) -> Option<HintDescriptor> {
        let mut open_symbols = SymbolSet::EMPTY;
        for cell_ref in CellRef::all() {
            let cell = grid.cell(cell_ref);
            if cell.count() > 1 {
                open_symbols |= cell.candidates();
            }
        }

        for symbol in open_symbols {
            let Some(mut chain) = Self::build_chain(grid, symbol) else {
                continue;
            };
            let mut descriptor = HintDescriptor::new(HintKind::ForbiddingChain);
            descriptor.action = HintAction::Remove;
            descriptor.symbols = SymbolSet::only(symbol);
            descriptor.show_pencils = true;

            if Self::direct_exclusions(grid, &mut chain, &mut descriptor)
                || Self::weak_relations(grid, &mut chain, &mut descriptor)
            {
                Self::add_chain_triggers(&chain, &mut descriptor);
                return Some(descriptor);
            }
        }
        None
    }
}
