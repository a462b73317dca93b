//! Game facade of the gridsage engine.
//!
//! [`Session`] is the single owner of the grid stack, the game options and
//! the PRNG; a front end drives it with user gestures and receives every
//! state change through the [`UiCallbacks`] table. The crate also implements
//! the textual save-file grammar in [`files`].
//!
//! # Example
//!
//! ```
//! use gridsage_game::{Session, UiCallbacks};
//!
//! struct Headless;
//! impl UiCallbacks for Headless {}
//!
//! let mut session = Session::new(Headless, 0);
//! session.random_game(Some(7));
//! assert!(session.grid().count_singles() > 0);
//! ```

pub use self::{session::*, ui::*};

pub mod files;
mod session;
mod ui;

/// Errors crossing the facade boundary.
///
/// Only file handling produces caller-visible errors; everything else is
/// reported through statuses or is a guarded no-op.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GameError {
    /// A malformed save file; the session state is left untouched.
    #[display("cannot parse save file: {_0}")]
    Parse(files::ParseError),
    /// An IO failure, passed through.
    #[display("{_0}")]
    Io(std::io::Error),
}
