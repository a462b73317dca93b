//! Locked candidates: a symbol pinned to one box/line intersection.

use gridsage_core::{CellFlags, CellRef, Grid, House, SlotSet, Symbol, SymbolSet};

use super::Technique;
use crate::hint::{HintAction, HintDescriptor, HintKind};

/// Which way a band is read: three rows across a row of boxes, or three
/// columns down a column of boxes.
#[derive(Debug, Clone, Copy)]
enum Orientation {
    Rows,
    Cols,
}

impl Orientation {
    /// The cell at `cross` along the given line.
    fn cell(self, line: u8, cross: u8) -> CellRef {
        match self {
            Orientation::Rows => CellRef::new(line, cross),
            Orientation::Cols => CellRef::new(cross, line),
        }
    }

    /// The box covering `third` of a band's lines.
    fn box_of(self, band: u8, third: u8) -> u8 {
        match self {
            Orientation::Rows => 3 * band + third,
            Orientation::Cols => 3 * third + band,
        }
    }

    /// The house crossing a line at `cross`.
    fn crossing(self, cross: u8) -> House {
        match self {
            Orientation::Rows => House::Col(cross),
            Orientation::Cols => House::Row(cross),
        }
    }

    /// Whether a solved cell lies on one of the band's three lines.
    fn on_band_line(self, cell: CellRef, band: u8) -> bool {
        let line = match self {
            Orientation::Rows => cell.row(),
            Orientation::Cols => cell.col(),
        };
        line / 3 == band
    }

    /// Whether a solved cell lies on one of the box's three crossings.
    fn on_box_crossing(self, cell: CellRef, third: u8) -> bool {
        let cross = match self {
            Orientation::Rows => cell.col(),
            Orientation::Cols => cell.row(),
        };
        cross / 3 == third
    }
}

/// Per-band candidate locations: for each of the three lines, the crossing
/// coordinates carrying the symbol, split by box third.
type BandLocations = [[SlotSet; 3]; 3];

/// A symbol confined to a single box/line intersection.
///
/// Two flavors share the descriptor shape:
///
/// - a line whose symbol fits in only one box forbids the symbol in the rest
///   of that box;
/// - a box whose symbol fits in only one line forbids the symbol in the rest
///   of that line.
///
/// The `candidates` cells visualize the locked region itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct LockedCandidate;

impl LockedCandidate {
    /// Creates the technique.
    #[must_use]
    pub const fn new() -> Self {
        LockedCandidate
    }

    fn band_locations(grid: &Grid, orientation: Orientation, band: u8, symbol: Symbol) -> BandLocations {
        let mut locations = [[SlotSet::EMPTY; 3]; 3];
        for line_offset in 0..3 {
            let line = 3 * band + line_offset;
            for cross in 0..9 {
                let cell = grid.cell(orientation.cell(line, cross));
                if cell.count() > 1 && cell.candidates().contains(symbol) {
                    locations[usize::from(line_offset)][usize::from(cross / 3)].insert(cross);
                }
            }
        }
        locations
    }

    /// Records the locked region cells along the line.
    fn add_candidates(
        descriptor: &mut HintDescriptor,
        orientation: Orientation,
        line: u8,
        region: SlotSet,
    ) {
        for cross in region {
            descriptor.candidates.push(orientation.cell(line, cross));
        }
    }

    /// Records a hint cell, electing a bi-value cell as the selection.
    fn add_removal(
        descriptor: &mut HintDescriptor,
        grid: &Grid,
        cell_ref: CellRef,
    ) {
        descriptor.add_hint(cell_ref);
        if descriptor.selection.is_none() && grid.cell(cell_ref).count() == 2 {
            descriptor.selection = Some(cell_ref);
        }
    }

    /// Triggers for the line-confined flavor: for each band box, the solved
    /// symbol inside it, the solved symbol down each of its crossings, or a
    /// weak trigger on the open line cell itself. Locked-region cells never
    /// need a weak trigger.
    fn line_triggers(
        descriptor: &mut HintDescriptor,
        grid: &Grid,
        orientation: Orientation,
        band: u8,
        line: u8,
        locked_third: u8,
        mask: SymbolSet,
    ) {
        let mut thirds: Vec<u8> = (0..3).filter(|&t| t != locked_third).collect();
        thirds.push(locked_third);

        for third in thirds {
            if third != locked_third {
                let box_house = House::Box(orientation.box_of(band, third));
                if let Some(single) = box_house.cells().find(|&c| {
                    let cell = grid.cell(c);
                    cell.is_single() && !cell.candidates().is_disjoint(mask)
                }) {
                    descriptor.add_trigger(single, CellFlags::TRIGGER);
                    continue;
                }
            }
            for cross in 3 * third..3 * third + 3 {
                let line_cell = orientation.cell(line, cross);
                if grid.cell(line_cell).is_single() {
                    continue;
                }
                let crossing_single = orientation.crossing(cross).cells().find(|&c| {
                    let cell = grid.cell(c);
                    cell.is_single() && !cell.candidates().is_disjoint(mask)
                });
                if let Some(single) = crossing_single {
                    descriptor.add_trigger(single, CellFlags::TRIGGER);
                } else if !descriptor.candidates.contains(&line_cell) {
                    descriptor.add_trigger(line_cell, CellFlags::WEAK_TRIGGER | CellFlags::PENCIL);
                }
            }
        }
    }

    /// Triggers for the box-confined flavor: solved symbols on the band's
    /// other lines or on the box's crossings justify why the box is pinned
    /// to the locked line.
    fn box_triggers(
        descriptor: &mut HintDescriptor,
        grid: &Grid,
        orientation: Orientation,
        band: u8,
        third: u8,
        singles: &[CellRef],
    ) {
        let mut covered_crossings = SlotSet::EMPTY;
        let mut covered_lines = SlotSet::EMPTY;

        for &single in singles {
            if orientation.on_band_line(single, band) {
                let line = match orientation {
                    Orientation::Rows => single.row(),
                    Orientation::Cols => single.col(),
                };
                let open_crossing = (3 * third..3 * third + 3).find(|&cross| {
                    !covered_crossings.contains(cross)
                        && !grid.cell(orientation.cell(line, cross)).is_single()
                });
                if let Some(cross) = open_crossing {
                    covered_crossings.insert(cross);
                    descriptor.add_trigger(single, CellFlags::TRIGGER);
                }
            } else if orientation.on_box_crossing(single, third) {
                let cross = match orientation {
                    Orientation::Rows => single.col(),
                    Orientation::Cols => single.row(),
                };
                let open_line = (3 * band..3 * band + 3).find(|&line| {
                    !covered_lines.contains(line)
                        && !grid.cell(orientation.cell(line, cross)).is_single()
                });
                if let Some(line) = open_line {
                    covered_lines.insert(line);
                    descriptor.add_trigger(single, CellFlags::TRIGGER);
                }
            }
        }
    }

    fn check_band(
        grid: &Grid,
        orientation: Orientation,
        band: u8,
        symbol: Symbol,
        singles: &[CellRef],
    ) -> Option<HintDescriptor> {
        let mask = SymbolSet::only(symbol);
        let locations = Self::band_locations(grid, orientation, band, symbol);

        for line_offset in 0..3u8 {
            let row = &locations[usize::from(line_offset)];
            let line = 3 * band + line_offset;
            let thirds: Vec<u8> = (0..3).filter(|&t| !row[usize::from(t)].is_empty()).collect();

            match thirds.as_slice() {
                [] => {}
                [third] => {
                    // The line pins the symbol inside one box: the symbol
                    // goes from the rest of that box.
                    let third = *third;
                    let mut descriptor = Self::descriptor(mask);
                    let mut found = false;
                    for other in (0..3u8).filter(|&o| o != line_offset) {
                        for cross in locations[usize::from(other)][usize::from(third)] {
                            Self::add_removal(
                                &mut descriptor,
                                grid,
                                orientation.cell(3 * band + other, cross),
                            );
                            found = true;
                        }
                    }
                    if !found {
                        continue;
                    }
                    Self::add_candidates(
                        &mut descriptor,
                        orientation,
                        line,
                        row[usize::from(third)],
                    );
                    Self::line_triggers(
                        &mut descriptor,
                        grid,
                        orientation,
                        band,
                        line,
                        third,
                        mask,
                    );
                    return Some(descriptor);
                }
                _ => {
                    // A box pinned to this line: the symbol goes from the
                    // line outside that box.
                    for &third in &thirds {
                        let confined = (0..3u8).all(|other| {
                            other == line_offset
                                || locations[usize::from(other)][usize::from(third)].is_empty()
                        });
                        if !confined {
                            continue;
                        }
                        let mut descriptor = Self::descriptor(mask);
                        for &other_third in thirds.iter().filter(|&&t| t != third) {
                            for cross in row[usize::from(other_third)] {
                                Self::add_removal(
                                    &mut descriptor,
                                    grid,
                                    orientation.cell(line, cross),
                                );
                            }
                        }
                        Self::add_candidates(
                            &mut descriptor,
                            orientation,
                            line,
                            row[usize::from(third)],
                        );
                        Self::box_triggers(
                            &mut descriptor,
                            grid,
                            orientation,
                            band,
                            third,
                            singles,
                        );
                        return Some(descriptor);
                    }
                }
            }
        }
        None
    }

    fn descriptor(mask: SymbolSet) -> HintDescriptor {
        let mut descriptor = HintDescriptor::new(HintKind::LockedCandidate);
        descriptor.action = HintAction::Remove;
        descriptor.symbols = mask;
        descriptor.show_pencils = true;
        descriptor
    }
}

impl Technique for LockedCandidate {
    fn name(&self) -> &'static str {
        "locked candidate"
    }

    fn find(&self, grid: &mut Grid) -> Option<HintDescriptor> {
        for symbol in Symbol::ALL {
            let singles = grid.singles_matching(SymbolSet::only(symbol));
            for band in 0..3 {
                for orientation in [Orientation::Rows, Orientation::Cols] {
                    if let Some(descriptor) =
                        Self::check_band(grid, orientation, band, symbol, &singles)
                    {
                        return Some(descriptor);
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TechniqueTester;

    #[test]
    fn test_line_confined_to_box_removes_rest_of_box() {
        // Columns 3..8 of row 0 are solved, so in row 0 symbol 1 fits
        // only inside box 0: 1 leaves the other cells of box 0.
        TechniqueTester::from_str(
            "
            ...456789
            .........
            .........
            .........
            .........
            .........
            .........
            .........
            .........
        ",
        )
        .find_after_cleanup(&LockedCandidate::new())
        .assert_kind(HintKind::LockedCandidate)
        .assert_action(HintAction::Remove)
        .assert_symbols(&[Symbol::S1])
        .assert_candidate_cells(&[CellRef::new(0, 0), CellRef::new(0, 1), CellRef::new(0, 2)])
        .assert_hints(&[
            CellRef::new(1, 0),
            CellRef::new(1, 1),
            CellRef::new(1, 2),
            CellRef::new(2, 0),
            CellRef::new(2, 1),
            CellRef::new(2, 2),
        ]);
    }

    #[test]
    fn test_applying_the_hint_strips_the_box() {
        TechniqueTester::from_str(
            "
            ...456789
            .........
            .........
            .........
            .........
            .........
            .........
            .........
            .........
        ",
        )
        .find_after_cleanup(&LockedCandidate::new())
        .apply()
        .assert_not_candidate(CellRef::new(1, 0), Symbol::S1)
        .assert_not_candidate(CellRef::new(2, 2), Symbol::S1)
        .assert_candidate(CellRef::new(0, 0), Symbol::S1)
        .assert_candidate(CellRef::new(0, 2), Symbol::S1);
    }

    #[test]
    fn test_no_hint_without_removals() {
        // Row 0 pins 1 to box 0, but box 0 has no other 1 candidates:
        // nothing to remove anywhere for any symbol.
        TechniqueTester::from_str(&".".repeat(81))
            .find(&LockedCandidate::new())
            .assert_no_hint();
    }
}
