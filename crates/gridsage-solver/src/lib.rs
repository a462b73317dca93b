//! Solver, hint engine and difficulty rater of the gridsage engine.
//!
//! Three layers share the grid and snapshot stack from `gridsage-core`:
//!
//! - [`solve_grid`] / [`check_current_grid`] / [`find_one_solution`] - a
//!   backtracking solver that counts solutions up to two, built for
//!   uniqueness checking rather than raw speed.
//! - [`find_hint`] - the deductive hint engine: seven human techniques tried
//!   in a fixed order, each producing a [`HintDescriptor`] that explains the
//!   deduction (cells to act on, justifying triggers, suggested selection).
//! - [`evaluate_level`] - replays a puzzle with the hint engine alone and
//!   classifies it into four [`Difficulty`] tiers.
//!
//! Every speculative computation runs on pushed snapshots above a low-water
//! mark, so the caller's grid is never disturbed.
//!
//! # Example
//!
//! ```
//! use gridsage_core::GridStack;
//! use gridsage_solver::{check_current_grid, find_hint};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64;
//!
//! let mut stack = GridStack::new();
//! *stack.grid_mut() = "
//!     53. .7. ...
//!     6.. 195 ...
//!     .98 ... .6.
//!     8.. .6. ..3
//!     4.. 8.3 ..1
//!     7.. .2. ..6
//!     .6. ... 28.
//!     ... 419 ..5
//!     ... .8. .79
//! "
//! .parse()
//! .unwrap();
//!
//! let mut rng = Pcg64::seed_from_u64(1);
//! assert_eq!(check_current_grid(&mut stack, &mut rng), 1);
//!
//! let hint = find_hint(&mut stack).expect("an easy puzzle always has a hint");
//! println!("{:?} at {:?}", hint.kind, hint.hints);
//! ```

pub use self::{hint::*, rating::*, solve::*};

mod hint;
mod rating;
mod solve;
pub mod technique;

#[cfg(test)]
mod testing;
