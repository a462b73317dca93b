//! XY-Wing: pivot plus two wings over bi-value cells.

use gridsage_core::{CellFlags, CellRef, Grid, SymbolSet};

use super::Technique;
use crate::hint::{HintAction, HintDescriptor, HintKind};

/// A bi-value cell and its two candidates.
type Pair = (CellRef, SymbolSet);

/// Pivot-plus-two-wings deduction on three bi-value cells.
///
/// Three cells with candidates {a,b}, {a,c} and {b,c}, where the {a,b} cell
/// (the pivot) shares a unit with each wing, force c out of every cell that
/// sees both wings. Valid geometries are two horizontally or vertically
/// aligned boxes, or three distinct boxes forming a right angle.
#[derive(Debug, Default, Clone, Copy)]
pub struct XyWing;

impl XyWing {
    /// Creates the technique.
    #[must_use]
    pub const fn new() -> Self {
        XyWing
    }

    fn descriptor(common: SymbolSet, triple: &[Pair; 3]) -> HintDescriptor {
        let mut descriptor = HintDescriptor::new(HintKind::XyWing);
        descriptor.action = HintAction::Remove;
        descriptor.symbols = common;
        descriptor.show_pencils = true;
        for &(cell_ref, _) in triple {
            descriptor.add_trigger(cell_ref, CellFlags::TRIGGER | CellFlags::PENCIL);
        }
        descriptor
    }

    fn add_removal(descriptor: &mut HintDescriptor, grid: &Grid, cell_ref: CellRef) {
        let cell = grid.cell(cell_ref);
        if cell.count() > 1 && !cell.candidates().is_disjoint(descriptor.symbols) {
            descriptor.add_hint(cell_ref);
            if descriptor.selection.is_none() && cell.count() == 2 {
                descriptor.selection = Some(cell_ref);
            }
        }
    }

    /// Two pair cells in one box, the third in a horizontally or vertically
    /// aligned box. The common symbol of the wings leaves the cells that see
    /// both of them.
    fn two_box(grid: &Grid, same: [Pair; 2], other: Pair, triple: &[Pair; 3]) -> Option<HintDescriptor> {
        let box0 = same[0].0.box_index();
        let box1 = other.0.box_index();
        let (third, _) = other;

        let horizontal = box0 / 3 == box1 / 3;
        let vertical = box0 % 3 == box1 % 3;
        if !horizontal && !vertical {
            return None;
        }

        let line = |cell: CellRef| if horizontal { cell.row() } else { cell.col() };
        if line(same[0].0) == line(same[1].0) {
            return None;
        }
        // The pivot shares its line with the remote wing.
        let (pivot, wing) = if line(same[0].0) == line(third) {
            (same[0], same[1])
        } else if line(same[1].0) == line(third) {
            (same[1], same[0])
        } else {
            return None;
        };

        let common = wing.1 & other.1;
        let mut descriptor = Self::descriptor(common, triple);

        let cell_at = |line: u8, cross: u8| {
            if horizontal {
                CellRef::new(line, cross)
            } else {
                CellRef::new(cross, line)
            }
        };
        let box_span = |box_index: u8| {
            let first = if horizontal {
                3 * (box_index % 3)
            } else {
                3 * (box_index / 3)
            };
            first..first + 3
        };

        // The remote box along the near wing's line.
        for cross in box_span(box1) {
            Self::add_removal(&mut descriptor, grid, cell_at(line(wing.0), cross));
        }
        // The near box along the pivot's line, pivot excluded.
        let pivot_cross = if horizontal {
            pivot.0.col()
        } else {
            pivot.0.row()
        };
        for cross in box_span(box0).filter(|&c| c != pivot_cross) {
            Self::add_removal(&mut descriptor, grid, cell_at(line(pivot.0), cross));
        }

        (!descriptor.hints.is_empty()).then_some(descriptor)
    }

    /// Three distinct boxes: the pivot shares a row with one wing and a
    /// column with the other; the fourth corner loses the wings' common
    /// symbol.
    fn three_box(grid: &Grid, triple: &[Pair; 3]) -> Option<HintDescriptor> {
        for pivot_index in 0..3 {
            let (pivot, _) = triple[pivot_index];
            let wings: Vec<Pair> = triple
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != pivot_index)
                .map(|(_, &p)| p)
                .collect();
            let [(first, first_map), (second, second_map)] = wings[..] else {
                unreachable!()
            };

            let ((row_wing, row_map), (col_wing, col_map)) =
                if pivot.row() == first.row() && pivot.col() == second.col() {
                    ((first, first_map), (second, second_map))
                } else if pivot.row() == second.row() && pivot.col() == first.col() {
                    ((second, second_map), (first, first_map))
                } else {
                    continue;
                };

            let corner = CellRef::new(col_wing.row(), row_wing.col());
            let common = row_map & col_map;
            let mut descriptor = Self::descriptor(common, triple);
            Self::add_removal(&mut descriptor, grid, corner);
            if !descriptor.hints.is_empty() {
                return Some(descriptor);
            }
        }
        None
    }

    fn geometry(grid: &Grid, triple: [Pair; 3]) -> Option<HintDescriptor> {
        let [a, b, c] = triple;
        let (box_a, box_b, box_c) = (a.0.box_index(), b.0.box_index(), c.0.box_index());

        if box_a == box_b && box_b == box_c {
            None // a box-local triple is a subset, not a wing
        } else if box_a == box_b {
            Self::two_box(grid, [a, b], c, &triple)
        } else if box_a == box_c {
            Self::two_box(grid, [a, c], b, &triple)
        } else if box_b == box_c {
            Self::two_box(grid, [b, c], a, &triple)
        } else {
            Self::three_box(grid, &triple)
        }
    }
}

impl Technique for XyWing {
    fn name(&self) -> &'static str {
        "xy-wing"
    }

    fn find(&self, grid: &mut Grid) -> Option<HintDescriptor> {
        let pairs: Vec<Pair> = CellRef::all()
            .filter_map(|cell_ref| {
                let cell = grid.cell(cell_ref);
                (cell.count() == 2).then(|| (cell_ref, cell.candidates()))
            })
            .collect();
        if pairs.len() < 3 {
            return None;
        }

        for (i, &(cell_a, map_a)) in pairs.iter().enumerate() {
            for (j, &(cell_b, map_b)) in pairs.iter().enumerate().skip(i + 1) {
                if map_b == map_a || (map_a & map_b).count() != 1 {
                    continue;
                }
                // {a,x} and {a,y} need a third pair carrying exactly {x,y}.
                let third_map = map_a ^ map_b;
                for &(cell_c, map_c) in &pairs[j + 1..] {
                    if map_c != third_map {
                        continue;
                    }
                    let found = Self::geometry(
                        grid,
                        [(cell_a, map_a), (cell_b, map_b), (cell_c, map_c)],
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
