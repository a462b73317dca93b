//! Naked and hidden subsets (pairs and triples) within a house.

use gridsage_core::{CellFlags, CellRef, Grid, House, SymbolSet};

use super::Technique;
use crate::hint::{HintAction, HintDescriptor, HintKind};

/// Advances `comb` to the next lexicographic k-combination of `0..n`.
///
/// `comb` must hold an ascending combination; the first one is
/// `[0, 1, .., k-1]`. Returns `false` when all combinations are exhausted.
fn next_combination(comb: &mut [usize], n: usize) -> bool {
    let k = comb.len();
    if k == n {
        return false;
    }
    let mut i = k - 1;
    comb[i] += 1;
    while i > 0 && comb[i] >= n - k + 1 + i {
        i -= 1;
        comb[i] += 1;
    }
    if comb[0] > n - k {
        return false;
    }
    for j in i + 1..k {
        comb[j] = comb[j - 1] + 1;
    }
    true
}

/// An open cell classified against a subset mask.
#[derive(Debug, Clone, Copy)]
struct SubsetCell {
    cell_ref: CellRef,
    /// Candidates beyond the matched symbols.
    extra: u8,
}

/// Naked and hidden subsets of size two and three.
///
/// Within a house, k cells whose candidates are exactly k symbols expel
/// those symbols from the rest of the house (naked); k symbols whose
/// carriers are exactly k cells expel every other candidate from those cells
/// (hidden). Subsets of size four are not searched for.
#[derive(Debug, Default, Clone, Copy)]
pub struct Subsets;

impl Subsets {
    /// Creates the technique.
    #[must_use]
    pub const fn new() -> Self {
        Subsets
    }

    /// Union of candidates over the open cells of the house, ascending.
    fn open_symbols(grid: &Grid, house: House) -> Vec<SymbolSet> {
        let mut union = SymbolSet::EMPTY;
        for cell_ref in house.cells() {
            let cell = grid.cell(cell_ref);
            if cell.count() > 1 {
                union |= cell.candidates();
            }
        }
        union.iter().map(SymbolSet::only).collect()
    }

    fn check_pairs(grid: &Grid, house: House, symbols: &[SymbolSet]) -> Option<HintDescriptor> {
        if symbols.len() < 2 {
            return None;
        }
        let mut comb = vec![0, 1];
        loop {
            let pair = symbols[comb[0]] | symbols[comb[1]];

            // Cells carrying the whole pair, and cells carrying one symbol.
            let mut included: Vec<SubsetCell> = Vec::new();
            let mut partial: Vec<SubsetCell> = Vec::new();
            for cell_ref in house.cells() {
                let cell = grid.cell(cell_ref);
                if cell.count() <= 1 {
                    continue;
                }
                if pair.is_subset(cell.candidates()) {
                    included.push(SubsetCell {
                        cell_ref,
                        extra: cell.count() - 2,
                    });
                } else if !pair.is_disjoint(cell.candidates()) {
                    partial.push(SubsetCell {
                        cell_ref,
                        extra: cell.count() - 1,
                    });
                }
            }

            if partial.is_empty() && included.len() == 2 {
                if included.iter().any(|c| c.extra > 0) {
                    return Some(Self::hidden(pair, &included));
                }
                // Already a clean naked pair; nothing left to do with it.
            } else {
                let exact: Vec<&SubsetCell> =
                    included.iter().filter(|c| c.extra == 0).collect();
                if exact.len() == 2 {
                    return Some(Self::naked(pair, &included, &partial));
                }
            }

            if !next_combination(&mut comb, symbols.len()) {
                return None;
            }
        }
    }

    fn check_triples(grid: &Grid, house: House, symbols: &[SymbolSet]) -> Option<HintDescriptor> {
        if symbols.len() < 3 {
            return None;
        }
        let mut comb = vec![0, 1, 2];
        loop {
            let triple = symbols[comb[0]] | symbols[comb[1]] | symbols[comb[2]];

            // Cells carrying all three symbols, exactly two of them, or a
            // partial leftover. A sub-pair carried by two different cells
            // disqualifies the combination.
            let mut included: Vec<SubsetCell> = Vec::new();
            let mut partial: Vec<SubsetCell> = Vec::new();
            let mut full = 0usize;
            let mut sub_pairs: Vec<SymbolSet> = Vec::new();
            let mut valid = true;
            for cell_ref in house.cells() {
                let cell = grid.cell(cell_ref);
                if cell.count() <= 1 {
                    continue;
                }
                let matched = cell.candidates() & triple;
                match matched.count() {
                    0 => {}
                    3 => {
                        included.push(SubsetCell {
                            cell_ref,
                            extra: cell.count() - 3,
                        });
                        full += 1;
                    }
                    2 => {
                        if sub_pairs.contains(&matched) {
                            valid = false;
                            break;
                        }
                        sub_pairs.push(matched);
                        included.push(SubsetCell {
                            cell_ref,
                            extra: cell.count() - 2,
                        });
                    }
                    _ => partial.push(SubsetCell {
                        cell_ref,
                        extra: cell.count() - 1,
                    }),
                }
            }

            if valid && full + sub_pairs.len() == 3 {
                if partial.is_empty() {
                    if included.iter().any(|c| c.extra > 0) {
                        return Some(Self::hidden(triple, &included));
                    }
                } else if included.iter().all(|c| c.extra == 0) {
                    return Some(Self::naked(triple, &included, &partial));
                }
            }

            if !next_combination(&mut comb, symbols.len()) {
                return None;
            }
        }
    }

    /// Hidden subset: the carriers are restricted to the subset symbols.
    /// Dirty carriers are the hints, clean ones the triggers.
    fn hidden(mask: SymbolSet, included: &[SubsetCell]) -> HintDescriptor {
        let mut descriptor = HintDescriptor::new(HintKind::HiddenSubset);
        descriptor.action = HintAction::Set;
        descriptor.symbols = mask;
        descriptor.show_pencils = true;
        for cell in included {
            if cell.extra > 0 {
                descriptor.add_hint(cell.cell_ref);
                descriptor.selection = Some(cell.cell_ref);
            } else {
                descriptor.add_trigger(cell.cell_ref, CellFlags::TRIGGER | CellFlags::PENCIL);
            }
        }
        descriptor
    }

    /// Naked subset: the subset symbols leave every other carrier of the
    /// house. The subset cells themselves are the triggers.
    fn naked(mask: SymbolSet, included: &[SubsetCell], partial: &[SubsetCell]) -> HintDescriptor {
        let mut descriptor = HintDescriptor::new(HintKind::NakedSubset);
        descriptor.action = HintAction::Remove;
        descriptor.symbols = mask;
        descriptor.show_pencils = true;
        for cell in partial {
            descriptor.add_hint(cell.cell_ref);
            if cell.extra == 1 {
                descriptor.selection = Some(cell.cell_ref);
            }
        }
        for cell in included {
            if cell.extra == 0 {
                descriptor.add_trigger(cell.cell_ref, CellFlags::TRIGGER | CellFlags::PENCIL);
            } else {
                descriptor.add_hint(cell.cell_ref);
                if cell.extra == 1 {
                    descriptor.selection = Some(cell.cell_ref);
                }
            }
        }
        descriptor
    }
}

impl Technique for Subsets {
    fn name(&self) -> &'static str {
        "naked and hidden subsets"
    }

    fn find(&self, grid: &mut Grid) -> Option<HintDescriptor> {
        for house in House::all() {
            let symbols = Self::open_symbols(grid, house);
            if symbols.len() < 2 {
                continue;
            }
            if let Some(descriptor) = Self::check_pairs(grid, house, &symbols) {
                return Some(descriptor);
            }
            if let Some(descriptor) = Self::check_triples(grid, house, &symbols) {
                return Some(descriptor);
            }
        }
        None
    }
}
