//! The callback surface a front end plugs into the game facade.
//!
//! The core never draws anything itself: every state change is announced
//! through [`UiCallbacks`], and menus are addressed by symbolic ids rather
//! than labels so any front end can map them to its own widgets.

use gridsage_solver::HintKind;

/// Status-line messages the core can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Clear the status line.
    Blank,
    /// The last entry conflicts with a solved peer.
    Duplicate,
    /// Bookmark `n` was set.
    Mark(usize),
    /// Returned to bookmark; `n` bookmarks remain.
    Back(usize),
    /// Result of a solvability check from the current position.
    Check(bool),
    /// A hint of the given kind was found (`None`: the engine is out of
    /// ideas).
    Hint(Option<HintKind>),
    /// The entered puzzle has no solution.
    NoSolution,
    /// The entered puzzle has exactly one solution.
    OneSolution,
    /// The entered puzzle has several solutions.
    SeveralSolutions,
    /// The game is finished.
    Over,
}

/// Label of the enter-game toggle button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterMode {
    /// Offer to start entering a game.
    EnterGame,
    /// Offer to cancel the entry in progress.
    CancelGame,
    /// Offer to commit the entered game.
    CommitGame,
}

/// Top-level menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    /// File operations.
    File,
    /// Undo/redo/bookmark operations.
    Edit,
    /// Solver-backed tools.
    Tool,
}

/// Menu entries, addressed symbolically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum MenuItem {
    // File
    New,
    Pick,
    Open,
    Enter,
    Save,
    Quit,
    // Edit
    Undo,
    Redo,
    Erase,
    Mark,
    Back,
    // Tool
    FillSelection,
    FillAll,
    Check,
    Hint,
    SolveNow,
    ConflictDetection,
    AutoCheck,
}

/// Elapsed play time broken into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayDuration {
    /// Whole hours.
    pub hours: u64,
    /// Minutes past the hour.
    pub minutes: u64,
    /// Seconds past the minute.
    pub seconds: u64,
}

impl PlayDuration {
    /// Splits a second count into display units.
    #[must_use]
    pub const fn from_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }
}

/// The function table a front end implements.
///
/// All methods have empty default bodies so a front end only implements
/// what it renders; a headless test harness can use a unit struct.
pub trait UiCallbacks {
    /// The grid changed; repaint it.
    fn redraw(&mut self) {}

    /// A new game name (window title) is available.
    fn set_window_name(&mut self, name: &str) {
        let _ = name;
    }

    /// Update the status line.
    fn set_status(&mut self, status: Status) {
        let _ = status;
    }

    /// The number of bookmarks the user can go back to changed.
    fn set_back_level(&mut self, level: usize) {
        let _ = level;
    }

    /// The enter-game toggle changed meaning.
    fn set_enter_mode(&mut self, mode: EnterMode) {
        let _ = mode;
    }

    /// Enable a whole menu.
    fn enable_menu(&mut self, menu: Menu) {
        let _ = menu;
    }

    /// Disable a whole menu.
    fn disable_menu(&mut self, menu: Menu) {
        let _ = menu;
    }

    /// Enable one menu entry.
    fn enable_menu_item(&mut self, menu: Menu, item: MenuItem) {
        let _ = (menu, item);
    }

    /// Disable one menu entry.
    fn disable_menu_item(&mut self, menu: Menu, item: MenuItem) {
        let _ = (menu, item);
    }

    /// The game was completed; show the celebration.
    fn success_dialog(&mut self, duration: PlayDuration) {
        let _ = duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_duration_split() {
        let duration = PlayDuration::from_seconds(3723);
        assert_eq!(duration.hours, 1);
        assert_eq!(duration.minutes, 2);
        assert_eq!(duration.seconds, 3);

        let zero = PlayDuration::from_seconds(0);
        assert_eq!((zero.hours, zero.minutes, zero.seconds), (0, 0, 0));
    }

    #[test]
    fn test_callbacks_have_defaults() {
        struct Headless;
        impl UiCallbacks for Headless {}

        let mut ui = Headless;
        ui.redraw();
        ui.set_status(Status::Blank);
        ui.enable_menu_item(Menu::Tool, MenuItem::Hint);
    }
}
