//! Backtracking solver over the snapshot stack.
//!
//! The solver never edits the caller's visible snapshot: it pushes working
//! snapshots, speculates on them and pops back, with the low-water mark
//! guarding the caller's state against ring wrap-around. Solutions are
//! counted up to two, which is all uniqueness checking needs.

use gridsage_core::{CellRef, Grid, GridStack, House, SymbolSet};
use log::trace;
use rand::Rng;

/// Applies hidden-single deduction to one house.
///
/// Returns `false` if a symbol is solved twice in the house (the grid is
/// inconsistent).
fn set_hidden_singles_in(grid: &mut Grid, house: House) -> bool {
    let mut solved = SymbolSet::EMPTY;
    for cell_ref in house.cells() {
        if let Some(symbol) = grid.cell(cell_ref).symbol() {
            if !solved.insert(symbol) {
                return false;
            }
        }
    }

    for symbol in (!solved).iter() {
        let mut found: Option<CellRef> = None;
        let mut hits = 0;
        for cell_ref in house.cells() {
            let cell = grid.cell(cell_ref);
            if cell.count() > 1 && cell.candidates().contains(symbol) {
                hits += 1;
                if hits > 1 {
                    break;
                }
                found = Some(cell_ref);
            }
        }
        if hits == 1 {
            let cell_ref = found.expect("hit recorded");
            grid.set_candidates(cell_ref, SymbolSet::only(symbol));
        }
    }
    true
}

/// Runs constraint propagation and hidden-single deduction to a fixed point.
///
/// Returns the number of solved cells, or `None` if the grid turned out to
/// be inconsistent.
pub(crate) fn check_candidates(grid: &mut Grid) -> Option<u8> {
    if !grid.remove_conflicts() {
        return None;
    }
    loop {
        for house in House::all() {
            if !set_hidden_singles_in(grid, house) {
                return None;
            }
        }
        let singles = grid.count_singles();
        if !grid.remove_conflicts() {
            return None;
        }
        if singles == grid.count_singles() {
            return Some(singles);
        }
    }
}

/// Finds the cells with the fewest candidates and picks one uniformly at
/// random.
///
/// # Preconditions
///
/// The grid has at least one cell with two or more candidates.
fn next_best_slot<R>(grid: &Grid, rng: &mut R) -> CellRef
where
    R: Rng + ?Sized,
{
    let mut best: Vec<CellRef> = Vec::new();
    let mut fewest = 10;
    for cell_ref in CellRef::all() {
        let count = grid.cell(cell_ref).count();
        if count > 1 {
            if count < fewest {
                fewest = count;
                best.clear();
            }
            if count == fewest {
                best.push(cell_ref);
            }
        }
    }
    assert!(!best.is_empty(), "no undecided cell left to branch on");
    best[rng.random_range(0..best.len())]
}

struct SolveControl {
    stop_at: u8,
    solutions: u8,
}

/// Tries each candidate of the most constrained cell on a pushed snapshot.
///
/// On reaching `stop_at` solutions the recursion unwinds without popping, so
/// the solution stays on top of the stack for the caller to read.
fn try_one_candidate<R>(stack: &mut GridStack, rng: &mut R, control: &mut SolveControl) -> u8
where
    R: Rng + ?Sized,
{
    let slot = next_best_slot(stack.grid(), rng);
    let candidates = stack.grid().cell(slot).candidates();
    trace!(
        "branching on {slot} with {} candidates at sp {}",
        candidates.count(),
        stack.sp()
    );

    for symbol in candidates {
        stack.push();
        stack
            .grid_mut()
            .set_candidates(slot, SymbolSet::only(symbol));

        match check_candidates(stack.grid_mut()) {
            Some(81) => {
                control.solutions += 1;
                trace!("solution {} found at sp {}", control.solutions, stack.sp());
                if control.solutions == control.stop_at {
                    return control.solutions;
                }
            }
            Some(_) => {
                if try_one_candidate(stack, rng, control) == control.stop_at {
                    return control.solutions;
                }
            }
            None => {} // dead branch
        }
        stack.pop().expect("just pushed");
    }
    control.solutions
}

/// Counts the solutions of the current snapshot, up to one or two.
///
/// | `find_all_up_to_2` | solutions | returned |
/// |--------------------|-----------|----------|
/// | false              | 0         | 0        |
/// | false              | ≥ 1       | 1        |
/// | true               | 0         | 0        |
/// | true               | 1         | 1        |
/// | true               | ≥ 2       | 2        |
///
/// On success the found solution is the current snapshot; callers that must
/// not observe it save `sp` beforehand and restore it afterwards (what
/// [`check_current_grid`] does).
pub fn solve_grid<R>(stack: &mut GridStack, rng: &mut R, find_all_up_to_2: bool) -> u8
where
    R: Rng + ?Sized,
{
    let home = stack.sp();
    stack.set_low_water(home);

    // Working snapshot with empty cells penciled {1..9}.
    stack.push_preserving_redo();
    stack.grid_mut().fill_all(false);

    let result = match check_candidates(stack.grid_mut()) {
        None => 0,
        Some(81) => 1,
        Some(_) => {
            let mut control = SolveControl {
                stop_at: if find_all_up_to_2 { 2 } else { 1 },
                solutions: 0,
            };
            try_one_candidate(stack, rng, &mut control)
        }
    };
    stack.clear_low_water();
    result
}

/// Solves the current snapshot in place, if it can be solved at all.
///
/// Returns `true` on success, leaving the solution as the current snapshot
/// (above the caller's saved state). An already solved grid returns `true`
/// without searching.
pub fn find_one_solution<R>(stack: &mut GridStack, rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    if stack.grid().is_solved() {
        return true;
    }
    solve_grid(stack, rng, false) == 1
}

/// Counts the solutions reachable from the current snapshot without touching
/// it.
///
/// Returns 0, 1 or 2 (2 meaning "several").
pub fn check_current_grid<R>(stack: &mut GridStack, rng: &mut R) -> u8
where
    R: Rng + ?Sized,
{
    let sp = stack.sp();
    let result = solve_grid(stack, rng, true);
    stack.set_sp(sp);
    result
}

#[cfg(test)]
mod tests {
    use gridsage_core::Symbol;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    fn rng() -> Pcg64 {
        Pcg64::seed_from_u64(12)
    }

    fn stack_from(text: &str) -> GridStack {
        let mut stack = GridStack::new();
        *stack.grid_mut() = text.parse().expect("valid grid literal");
        stack
    }

    const UNIQUE: &str = "
        53. .7. ...
        6.. 195 ...
        .98 ... .6.
        8.. .6. ..3
        4.. 8.3 ..1
        7.. .2. ..6
        .6. ... 28.
        ... 419 ..5
        ... .8. .79
    ";

    #[test]
    fn test_unique_puzzle_counts_one() {
        let mut stack = stack_from(UNIQUE);
        assert_eq!(check_current_grid(&mut stack, &mut rng()), 1);
    }

    #[test]
    fn test_empty_grid_counts_two() {
        let mut stack = GridStack::new();
        assert_eq!(check_current_grid(&mut stack, &mut rng()), 2);
    }

    #[test]
    fn test_unsolvable_grid_counts_zero() {
        // Two 5s in the same row.
        let mut stack = stack_from(&format!("55{}", ".".repeat(79)));
        assert_eq!(check_current_grid(&mut stack, &mut rng()), 0);
    }

    #[test]
    fn test_check_restores_callers_snapshot() {
        let mut stack = stack_from(UNIQUE);
        let before_sp = stack.sp();
        let before = stack.grid().clone();
        let _ = check_current_grid(&mut stack, &mut rng());
        assert_eq!(stack.sp(), before_sp);
        assert_eq!(stack.grid(), &before);
    }

    #[test]
    fn test_find_one_solution_is_sound() {
        let mut stack = stack_from(UNIQUE);
        let givens = stack.grid().clone();
        assert!(find_one_solution(&mut stack, &mut rng()));

        let solution = stack.grid().clone();
        assert!(solution.is_solved());
        // The solution agrees with the givens.
        for cell_ref in CellRef::all() {
            if let Some(symbol) = givens.cell(cell_ref).symbol() {
                assert_eq!(solution.cell(cell_ref).symbol(), Some(symbol));
            }
        }
        // Every house holds all nine symbols.
        for house in House::all() {
            let mut seen = SymbolSet::EMPTY;
            for cell_ref in house.cells() {
                seen.insert(solution.cell(cell_ref).symbol().expect("solved"));
            }
            assert_eq!(seen, SymbolSet::FULL);
        }
    }

    #[test]
    fn test_find_one_solution_on_solved_grid_is_noop() {
        let mut stack = stack_from(
            "534678912672195348198342567859761423426853791713924856961537284287419635345286179",
        );
        let sp = stack.sp();
        assert!(find_one_solution(&mut stack, &mut rng()));
        assert_eq!(stack.sp(), sp);
    }

    #[test]
    fn test_check_candidates_solves_by_deduction_alone() {
        // This puzzle yields to singles only; no branching should be needed.
        let mut grid: Grid = UNIQUE.parse().unwrap();
        grid.fill_all(false);
        assert_eq!(check_candidates(&mut grid), Some(81));
        assert!(grid.is_solved());
    }

    #[test]
    fn test_check_candidates_detects_inconsistency() {
        let mut grid: Grid = format!("12{}", ".".repeat(79)).parse().unwrap();
        // Leave the rest of row 0 with only the two used symbols.
        grid.fill_all(false);
        for col in 2..9 {
            let mask: SymbolSet = [Symbol::S1, Symbol::S2].into_iter().collect();
            grid.set_candidates(CellRef::new(0, col), mask);
        }
        assert_eq!(check_candidates(&mut grid), None);
    }

    #[test]
    fn test_hidden_single_deduction() {
        let mut grid = Grid::new();
        grid.fill_all(false);
        // Symbol 4 possible only at (0, 3) within row 0.
        for col in 0..9 {
            if col != 3 {
                grid.remove_candidates(CellRef::new(0, col), SymbolSet::only(Symbol::S4));
            }
        }
        assert!(set_hidden_singles_in(&mut grid, House::Row(0)));
        assert_eq!(grid.cell(CellRef::new(0, 3)).symbol(), Some(Symbol::S4));
    }

    #[test]
    fn test_same_seed_same_solution_of_ambiguous_grid() {
        let solve = |seed: u64| {
            let mut stack = GridStack::new();
            let mut rng = Pcg64::seed_from_u64(seed);
            assert!(find_one_solution(&mut stack, &mut rng));
            stack.grid().to_string()
        };
        assert_eq!(solve(7), solve(7));
    }
}
