//! Seeded generation of uniquely solvable puzzles.
//!
//! The generator places random givens one at a time, asking the solver after
//! each placement how many solutions remain. Two or more: keep adding. One:
//! done. Zero: retract the last given and try another. The whole run is
//! driven by a PRNG seeded from the game number, so the same seed always
//! produces the same puzzle.
//!
//! # Example
//!
//! ```
//! use gridsage_generator::PuzzleGenerator;
//!
//! let puzzle = PuzzleGenerator::new().generate(1).expect("seed 1 generates");
//! assert!(puzzle.count_singles() > 0);
//! ```

use gridsage_core::{CellRef, Grid, GridStack, Symbol};
use gridsage_solver::check_current_grid;
use log::{debug, trace};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg64;

/// Upper bound on fruitless placement attempts before giving up on a seed.
const MAX_TRIALS: usize = 1000;

/// Error cases of puzzle generation.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum GenerateError {
    /// The seed led nowhere within the trial budget; retry with another.
    #[display("no uniquely solvable puzzle found within {MAX_TRIALS} trials")]
    TrialsExhausted,
}

/// Generates puzzles with exactly one solution from a numeric seed.
#[derive(Debug, Default, Clone, Copy)]
pub struct PuzzleGenerator;

impl PuzzleGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new() -> Self {
        PuzzleGenerator
    }

    /// Generates the puzzle for `seed`.
    ///
    /// The returned grid carries the givens only; all other cells are empty.
    /// The same seed always yields the same puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::TrialsExhausted`] if the seed does not
    /// converge within the trial budget. Callers typically retry with a
    /// derived seed.
    pub fn generate(&self, seed: u32) -> Result<Grid, GenerateError> {
        let mut rng = Pcg64::seed_from_u64(u64::from(seed));
        let mut stack = GridStack::new();
        debug!("generating puzzle for seed {seed}");

        for trial in 0..MAX_TRIALS {
            let row = rng.random_range(0..9u8);
            let col = rng.random_range(0..9u8);
            let symbol = Symbol::from_value(rng.random_range(1..=9u8));
            let cell_ref = CellRef::new(row, col);

            if stack.grid().cell(cell_ref).is_single() {
                continue;
            }
            stack.grid_mut().set_symbol(cell_ref, symbol, true);
            trace!("trial {trial}: given {symbol} at {cell_ref}");

            match check_current_grid(&mut stack, &mut rng) {
                // Dead end: this given makes the grid impossible.
                0 => stack.grid_mut().retract_given(cell_ref),
                1 => {
                    let puzzle = stack.grid().clone();
                    debug!(
                        "seed {seed}: unique puzzle with {} givens after {trial} trials",
                        puzzle.count_singles()
                    );
                    return Ok(puzzle);
                }
                _ => {} // still ambiguous, keep adding givens
            }
        }
        debug!("seed {seed}: trial budget exhausted");
        Err(GenerateError::TrialsExhausted)
    }
}
