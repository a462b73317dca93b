//! Core data structures of the gridsage engine.
//!
//! This crate holds everything the solver, the hint engine, the generator and
//! the game facade share:
//!
//! - [`Symbol`] - type-safe symbols 1-9.
//! - [`SymbolSet`] / [`SlotSet`] - 9-bit sets with deterministic ascending
//!   enumeration; candidate masks and per-house location maps.
//! - [`CellRef`] and [`House`] - coordinates and the 27 row/col/box units.
//! - [`Cell`] / [`CellFlags`] - candidates with a cached count plus the
//!   persistent (`GIVEN`, `SELECTED`, `IN_ERROR`) and transient hint
//!   attributes.
//! - [`Grid`] - the 9x9 board with selection, conflict detection and the
//!   constraint-propagation primitive [`Grid::remove_conflicts`].
//! - [`GridStack`] - the bounded snapshot ring with undo/redo, bookmarks and
//!   the low-water mark protecting speculative searches.
//!
//! # Example
//!
//! ```
//! use gridsage_core::{CellRef, Grid, GridStack, Symbol};
//!
//! let mut stack = GridStack::new();
//! stack
//!     .grid_mut()
//!     .set_symbol(CellRef::new(0, 0), Symbol::S5, true);
//!
//! // Speculate on a snapshot, then back out.
//! stack.push();
//! stack.grid_mut().fill_all(true);
//! stack.pop().unwrap();
//! assert!(stack.grid().cell(CellRef::new(1, 1)).is_empty());
//! ```

mod bits;
mod cell;
mod cellref;
mod grid;
mod house;
mod stack;
mod symbol;

pub use self::{bits::*, cell::*, cellref::*, grid::*, house::*, stack::*, symbol::*};
