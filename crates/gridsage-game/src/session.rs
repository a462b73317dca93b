//! The game facade: one owner for grid, stack, options and UI callbacks.

use std::{
    path::Path,
    time::Instant,
};

use gridsage_core::{BookmarkCheck, Cell, CellRef, Grid, GridStack, StackMove, Symbol};
use gridsage_generator::PuzzleGenerator;
use gridsage_solver::{HintDescriptor, check_current_grid, find_hint, find_one_solution};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg64;

use crate::{
    GameError,
    files::{self, SavedGame},
    ui::{EnterMode, Menu, MenuItem, PlayDuration, Status, UiCallbacks},
};

/// Largest pickable game number.
pub const MAX_GAME_NUMBER: u32 = 10_000;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// No game; waiting for the user to start or enter one.
    Init,
    /// The user is typing in a puzzle of their own.
    Enter,
    /// A game is being played.
    Started,
    /// The game was completed.
    Over,
}

/// Cursor movement requests from the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    /// One row up, skipping givens.
    Up,
    /// One row down, skipping givens.
    Down,
    /// One column left, skipping givens.
    Left,
    /// One column right, skipping givens.
    Right,
    /// First editable cell of the column.
    PageUp,
    /// Last editable cell of the column.
    PageDown,
    /// Top-left corner.
    Home,
    /// Bottom-right corner.
    End,
}

/// A running game session.
///
/// Owns the grid stack, the options, the PRNG and the callback table; every
/// user-facing operation goes through here, and every state change is
/// announced to the UI. The guard rails live here too: no mutation or
/// selection of given cells, bookmarks only while a game is on, and so on.
pub struct Session<C: UiCallbacks> {
    callbacks: C,
    stack: GridStack,
    state: GameState,
    enter_game_valid: bool,
    show_conflict: bool,
    auto_check: bool,
    rng: Pcg64,
    game_number: Option<u32>,
    last_hint: Option<HintDescriptor>,
    play_started: Instant,
    already_played: u64,
}

impl<C: UiCallbacks> Session<C> {
    /// Creates a session and wires the callbacks; the session starts in
    /// [`GameState::Init`].
    ///
    /// `entropy` seeds the number-picking PRNG (puzzle generation itself is
    /// seeded by the game number, so two sessions asked for game 7 always
    /// agree on its grid).
    pub fn new(callbacks: C, entropy: u64) -> Self {
        let mut session = Self {
            callbacks,
            stack: GridStack::new(),
            state: GameState::Init,
            enter_game_valid: false,
            show_conflict: true,
            auto_check: false,
            rng: Pcg64::seed_from_u64(entropy),
            game_number: None,
            last_hint: None,
            play_started: Instant::now(),
            already_played: 0,
        };
        session.enter_state(GameState::Init, true);
        session.callbacks.set_enter_mode(EnterMode::EnterGame);
        session
    }

    /// The grid the UI should render.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.stack.grid()
    }

    /// One cell, for `cell_definition`-style access.
    #[must_use]
    pub fn cell_view(&self, cell_ref: CellRef) -> &Cell {
        self.stack.grid().cell(cell_ref)
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// The descriptor of the most recent hint, if any.
    #[must_use]
    pub const fn last_hint(&self) -> Option<&HintDescriptor> {
        self.last_hint.as_ref()
    }

    /// Seconds played in the current game.
    #[must_use]
    pub fn seconds_played(&self) -> u64 {
        self.already_played + self.play_started.elapsed().as_secs()
    }

    fn solver_rng(&self) -> Pcg64 {
        Pcg64::seed_from_u64(u64::from(self.game_number.unwrap_or(0)))
    }

    fn is_playing(&self) -> bool {
        matches!(self.state, GameState::Enter | GameState::Started)
    }

    /// State transition plus the menu bookkeeping tied to it.
    fn enter_state(&mut self, state: GameState, force: bool) {
        if state == self.state && !force {
            return;
        }
        self.state = state;
        match state {
            GameState::Init => {
                self.callbacks.enable_menu(Menu::File);
                self.callbacks.disable_menu(Menu::Edit);
                self.callbacks.disable_menu(Menu::Tool);
                self.callbacks.disable_menu_item(Menu::File, MenuItem::Save);
            }
            GameState::Enter => {
                self.callbacks.enable_menu(Menu::File);
                self.callbacks.enable_menu(Menu::Edit);
                self.callbacks.disable_menu(Menu::Tool);
                self.callbacks.disable_menu_item(Menu::File, MenuItem::Save);
            }
            GameState::Started => {
                self.callbacks.enable_menu(Menu::File);
                self.callbacks.enable_menu(Menu::Edit);
                self.callbacks.enable_menu(Menu::Tool);
                self.callbacks.enable_menu_item(Menu::File, MenuItem::Save);
            }
            GameState::Over => {
                self.callbacks.disable_menu(Menu::Edit);
                self.callbacks.disable_menu(Menu::Tool);
            }
        }
        self.update_edit_menu();
    }

    fn update_edit_menu(&mut self) {
        let set = |callbacks: &mut C, item, enabled| {
            if enabled {
                callbacks.enable_menu_item(Menu::Edit, item);
            } else {
                callbacks.disable_menu_item(Menu::Edit, item);
            }
        };
        set(&mut self.callbacks, MenuItem::Undo, !self.stack.is_empty());
        set(
            &mut self.callbacks,
            MenuItem::Redo,
            self.stack.redo_level() > 0,
        );
        set(
            &mut self.callbacks,
            MenuItem::Back,
            self.stack.bookmark_count() > 0
                && self.stack.check_bookmark() != BookmarkCheck::AtMark,
        );
    }

    fn clear_hints(&mut self) {
        self.last_hint = None;
        self.stack.grid_mut().clear_hint_attributes();
    }

    /// Pushes a fresh snapshot for a user action, forking off any redo
    /// history.
    fn push_state(&mut self) {
        self.stack.cancel_redo();
        self.stack.push();
    }

    fn set_game_time(&mut self, seconds: u64) {
        self.play_started = Instant::now();
        self.already_played = seconds;
    }

    // ---- game creation ---------------------------------------------------

    /// Starts a fresh random game, optionally with a specific number.
    pub fn random_game(&mut self, number: Option<u32>) {
        let number = number.unwrap_or_else(|| self.rng.random_range(1..=MAX_GAME_NUMBER));
        let generator = PuzzleGenerator::new();

        // A seed may fail its trial budget; derive follow-up seeds from it
        // deterministically so a game number still names one puzzle.
        let mut seed = number;
        let puzzle = loop {
            match generator.generate(seed) {
                Ok(puzzle) => break puzzle,
                Err(error) => {
                    warn!("seed {seed}: {error}; retrying");
                    seed = seed.wrapping_add(MAX_GAME_NUMBER);
                }
            }
        };

        info!("starting game {number}");
        self.stack.reset();
        *self.stack.grid_mut() = puzzle;
        self.game_number = Some(number);
        self.enter_game_valid = false;
        self.last_hint = None;

        self.callbacks.set_window_name(&format!("s{number}"));
        self.callbacks.set_back_level(0);
        self.callbacks.set_status(Status::Blank);
        self.set_game_time(0);
        self.enter_state(GameState::Started, true);
        self.callbacks.redraw();
    }

    /// Starts the game named by a decimal string in `[1, 10000]`; anything
    /// else is a no-op.
    pub fn pick_game(&mut self, number: &str) {
        match number.trim().parse::<u32>() {
            Ok(n) if (1..=MAX_GAME_NUMBER).contains(&n) => self.random_game(Some(n)),
            _ => debug!("ignoring invalid game number {number:?}"),
        }
    }

    /// Loads a saved game from `path`.
    ///
    /// # Errors
    ///
    /// Propagates IO and parse errors; on error the session is unchanged.
    pub fn open_file(&mut self, path: &Path) -> Result<(), GameError> {
        let text = std::fs::read_to_string(path)?;
        let SavedGame { grid, seconds } = files::parse(&text)?;

        self.stack.reset();
        *self.stack.grid_mut() = grid;
        self.game_number = None;
        self.last_hint = None;

        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        self.callbacks.set_window_name(&name);
        self.callbacks.set_back_level(0);
        self.callbacks.set_status(Status::Blank);
        self.set_game_time(seconds);
        self.enter_state(GameState::Started, true);
        self.callbacks.redraw();
        Ok(())
    }

    /// Saves the current game to `path`.
    ///
    /// # Errors
    ///
    /// Propagates IO errors.
    pub fn save_file(&mut self, path: &Path) -> Result<(), GameError> {
        let text = files::serialize(self.stack.grid(), self.seconds_played());
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Flips between [`GameState::Init`] and [`GameState::Enter`], clearing
    /// the grid either way.
    pub fn toggle_enter_game(&mut self) {
        if self.state == GameState::Enter {
            self.callbacks.set_enter_mode(EnterMode::EnterGame);
            self.enter_state(GameState::Init, false);
        } else {
            self.callbacks.set_enter_mode(EnterMode::CancelGame);
            self.enter_state(GameState::Enter, false);
        }
        self.stack.reset();
        self.enter_game_valid = false;
        self.last_hint = None;
        self.callbacks.redraw();
    }

    /// Locks the entered singles as givens and starts playing.
    ///
    /// Only valid while entering a game whose solution is unique (the
    /// session tracks that after every entry); otherwise a no-op.
    pub fn commit_game(&mut self, name: &str) {
        if self.state != GameState::Enter || !self.enter_game_valid {
            return;
        }
        self.stack.grid_mut().make_givens();
        let committed = self.stack.grid().clone();
        self.stack.reset();
        *self.stack.grid_mut() = committed;

        self.callbacks.set_enter_mode(EnterMode::EnterGame);
        self.callbacks.set_window_name(name);
        self.callbacks.set_back_level(0);
        self.set_game_time(0);
        self.enter_state(GameState::Started, false);
        self.callbacks.redraw();
    }

    // ---- selection -------------------------------------------------------

    /// Moves the selection; selecting a given cell is refused.
    pub fn set_selection(&mut self, cell_ref: Option<CellRef>) {
        if !self.is_playing() {
            return;
        }
        if self.stack.grid().selection() == cell_ref {
            return;
        }
        if let Some(target) = cell_ref {
            if self.stack.grid().cell(target).is_given() {
                return;
            }
            self.callbacks
                .enable_menu_item(Menu::Tool, MenuItem::FillSelection);
        } else {
            self.callbacks
                .disable_menu_item(Menu::Tool, MenuItem::FillSelection);
        }
        self.clear_hints();
        self.callbacks.set_status(Status::Blank);
        self.stack.grid_mut().select(cell_ref);
        self.callbacks.redraw();
    }

    /// Moves the selection with a navigation key, skipping given cells.
    pub fn move_selection(&mut self, key: MoveKey) {
        if !self.is_playing() {
            return;
        }
        let current = self.stack.grid().selection();
        let (row, col) = current.map_or((0, 0), |c| (c.row(), c.col()));

        let target = match key {
            MoveKey::Up => (0..row).rev().map(|r| CellRef::new(r, col)).find(|&c| !self.is_given(c)),
            MoveKey::Down => {
                let start = current.map_or(0, |_| row + 1);
                (start..9).map(|r| CellRef::new(r, col)).find(|&c| !self.is_given(c))
            }
            MoveKey::Left => (0..col).rev().map(|c| CellRef::new(row, c)).find(|&c| !self.is_given(c)),
            MoveKey::Right => {
                let start = current.map_or(0, |_| col + 1);
                (start..9).map(|c| CellRef::new(row, c)).find(|&c| !self.is_given(c))
            }
            MoveKey::PageUp => (0..row).map(|r| CellRef::new(r, col)).find(|&c| !self.is_given(c)),
            MoveKey::PageDown => {
                ((row + 1)..9).rev().map(|r| CellRef::new(r, col)).find(|&c| !self.is_given(c))
            }
            MoveKey::Home => Some(CellRef::new(0, 0)).filter(|&c| !self.is_given(c)),
            MoveKey::End => Some(CellRef::new(8, 8)).filter(|&c| !self.is_given(c)),
        };
        if target.is_some() {
            self.set_selection(target);
        }
    }

    fn is_given(&self, cell_ref: CellRef) -> bool {
        self.stack.grid().cell(cell_ref).is_given()
    }

    // ---- cell edits ------------------------------------------------------

    /// Enters a symbol at the selection.
    ///
    /// While entering a game this places a solved cell and re-checks the
    /// puzzle's solution count; during play it toggles the pencil mark and
    /// runs conflict detection and, if enabled, auto checking.
    pub fn enter_symbol(&mut self, symbol: Symbol) {
        if !self.is_playing() {
            return;
        }
        let Some(cell_ref) = self.stack.grid().selection() else {
            return;
        };
        self.clear_hints();
        self.push_state();

        if self.state == GameState::Enter {
            self.stack.grid_mut().set_symbol(cell_ref, symbol, false);
            self.update_entering_state();
            self.update_edit_menu();
            self.callbacks.redraw();
            return;
        }

        self.callbacks.set_status(Status::Blank);
        self.stack.grid_mut().toggle_candidate(cell_ref, symbol);
        if self.show_conflict {
            self.stack.grid_mut().clear_errors();
            let conflicts = self.stack.grid_mut().update_errors(cell_ref);
            if conflicts > 0 {
                self.callbacks.set_status(Status::Duplicate);
            }
        }
        self.update_edit_menu();
        self.callbacks.redraw();

        if self.stack.grid().is_solved() {
            self.finish_game();
        } else if self.auto_check {
            self.check_from_current_position();
        }
    }

    /// Clears the selected cell (selection cannot rest on a given).
    pub fn erase_selection(&mut self) {
        if !self.is_playing() {
            return;
        }
        let Some(cell_ref) = self.stack.grid().selection() else {
            return;
        };
        self.clear_hints();
        self.push_state();
        self.callbacks.set_status(Status::Blank);
        self.stack.grid_mut().erase(cell_ref);
        self.update_edit_menu();
        self.callbacks.redraw();
        if self.state == GameState::Enter {
            self.update_entering_state();
        }
    }

    fn finish_game(&mut self) {
        info!("game solved after {}s", self.seconds_played());
        self.callbacks.set_status(Status::Over);
        self.callbacks
            .success_dialog(PlayDuration::from_seconds(self.seconds_played()));
        self.enter_state(GameState::Over, false);
    }

    /// Re-counts the solutions of the entered puzzle and updates the commit
    /// affordance.
    fn update_entering_state(&mut self) {
        let mut rng = self.solver_rng();
        let (status, valid) = match check_current_grid(&mut self.stack, &mut rng) {
            0 => (Status::NoSolution, false),
            1 => (Status::OneSolution, true),
            _ => (Status::SeveralSolutions, false),
        };
        self.callbacks.set_status(status);
        if valid != self.enter_game_valid {
            self.enter_game_valid = valid;
            self.callbacks.set_enter_mode(if valid {
                EnterMode::CommitGame
            } else {
                EnterMode::CancelGame
            });
        }
    }

    // ---- undo / redo / bookmarks -----------------------------------------

    /// Undoes the last action.
    pub fn undo(&mut self) {
        self.clear_hints();
        let moved = self.stack.undo();
        if moved == StackMove::Blocked {
            return;
        }
        if self.state == GameState::Enter {
            self.update_entering_state();
        } else {
            self.callbacks.set_status(Status::Blank);
        }
        if moved == StackMove::MovedAcrossBookmark {
            self.callbacks.set_back_level(self.stack.bookmark_count());
        }
        self.update_edit_menu();
        self.callbacks.redraw();
    }

    /// Redoes the last undone action.
    pub fn redo(&mut self) {
        self.clear_hints();
        let moved = self.stack.redo();
        if moved == StackMove::Blocked {
            return;
        }
        if self.state == GameState::Enter {
            self.update_entering_state();
        } else {
            self.callbacks.set_status(Status::Blank);
        }
        if moved == StackMove::MovedAcrossBookmark {
            self.callbacks.set_back_level(self.stack.bookmark_count());
        }
        self.update_edit_menu();
        self.callbacks.redraw();
    }

    /// Sets a bookmark at the current position.
    pub fn mark_state(&mut self) {
        if self.state != GameState::Started {
            return;
        }
        if let Some(mark) = self.stack.new_bookmark() {
            self.stack.cancel_redo();
            self.clear_hints();
            debug!("bookmark {mark} at sp {}", self.stack.sp());
            self.callbacks.set_status(Status::Mark(mark));
            self.callbacks.set_back_level(mark);
            self.update_edit_menu();
        }
    }

    /// Rewinds to the most recent bookmark.
    pub fn back_to_mark(&mut self) {
        if self.state != GameState::Started {
            return;
        }
        if self.stack.return_to_last_bookmark() {
            self.clear_hints();
            let remaining = self.stack.bookmark_count();
            self.callbacks.set_status(Status::Back(remaining));
            self.callbacks.set_back_level(remaining);
            self.update_edit_menu();
            self.callbacks.redraw();
        }
    }

    // ---- solver-backed tools ---------------------------------------------

    fn is_solvable_from_here(&mut self) -> bool {
        let sp = self.stack.sp();
        let mut rng = self.solver_rng();
        let solvable = find_one_solution(&mut self.stack, &mut rng);
        self.stack.set_sp(sp);
        self.stack.clear_low_water();
        solvable
    }

    /// Computes and highlights a hint for the current position.
    pub fn hint(&mut self) {
        if self.state != GameState::Started {
            return;
        }
        self.clear_hints();
        if !self.is_solvable_from_here() {
            self.callbacks.set_status(Status::NoSolution);
            return;
        }

        let descriptor = find_hint(&mut self.stack);
        self.callbacks
            .set_status(Status::Hint(descriptor.as_ref().map(|d| d.kind)));
        if let Some(descriptor) = descriptor {
            if descriptor.selection.is_some() {
                self.callbacks
                    .enable_menu_item(Menu::Tool, MenuItem::FillSelection);
            }
            self.last_hint = Some(descriptor);
            self.callbacks.redraw();
        }
    }

    /// Computes one hint and applies its action.
    ///
    /// Returns `true` if a step was taken.
    pub fn step(&mut self) -> bool {
        if self.state != GameState::Started {
            return false;
        }
        self.clear_hints();
        let Some(descriptor) = find_hint(&mut self.stack) else {
            self.callbacks.set_status(Status::Hint(None));
            return false;
        };
        self.callbacks
            .set_status(Status::Hint(Some(descriptor.kind)));
        self.push_state();
        gridsage_solver::apply_hint(self.stack.grid_mut(), &descriptor);
        self.last_hint = Some(descriptor);
        self.update_edit_menu();
        self.callbacks.redraw();
        if self.stack.grid().is_solved() {
            self.finish_game();
        }
        true
    }

    /// Pencils the selected cell with its possible candidates.
    pub fn fill(&mut self, no_conflict: bool) {
        if self.state != GameState::Started {
            return;
        }
        self.clear_hints();
        if let Some(cell_ref) = self.stack.grid().selection() {
            self.stack.cancel_redo();
            self.stack.grid_mut().fill_cell(cell_ref, no_conflict);
            self.update_edit_menu();
            self.callbacks.redraw();
        }
    }

    /// Pencils every empty cell; with `no_conflict` the result is also
    /// propagated, reporting an unsolvable position.
    pub fn fill_all(&mut self, no_conflict: bool) {
        if self.state != GameState::Started {
            return;
        }
        self.clear_hints();
        self.push_state();
        self.stack.grid_mut().fill_all(false);
        if no_conflict && !self.stack.grid_mut().remove_conflicts() {
            self.callbacks.set_status(Status::Check(false));
        }
        self.update_edit_menu();
        self.callbacks.redraw();
    }

    /// Reports whether the game can still be completed from here.
    pub fn check_from_current_position(&mut self) {
        if self.state != GameState::Started {
            return;
        }
        self.clear_hints();
        let solvable = self.is_solvable_from_here();
        self.callbacks.set_status(Status::Check(solvable));
    }

    /// Replaces the grid with a solved continuation of it, if one exists.
    pub fn solve_from_current_position(&mut self) {
        if self.state != GameState::Started {
            return;
        }
        self.clear_hints();
        let home = self.stack.sp();
        let mut rng = self.solver_rng();
        if find_one_solution(&mut self.stack, &mut rng) {
            let solution = self.stack.grid().clone();
            self.stack.set_sp(home);
            self.push_state();
            *self.stack.grid_mut() = solution;
            self.update_edit_menu();
        } else {
            self.stack.set_sp(home);
            self.callbacks.set_status(Status::Check(false));
        }
        self.stack.clear_low_water();
        self.callbacks.redraw();
    }

    // ---- options ---------------------------------------------------------

    /// Toggles conflict highlighting; returns the previous value.
    pub fn toggle_conflict_detection(&mut self) -> bool {
        let previous = self.show_conflict;
        self.show_conflict = !previous;
        if self.is_playing() {
            if self.show_conflict {
                if let Some(cell_ref) = self.stack.grid().selection() {
                    self.stack.grid_mut().update_errors(cell_ref);
                }
            } else {
                self.stack.grid_mut().clear_errors();
            }
            self.callbacks.redraw();
        }
        previous
    }

    /// Toggles automatic solvability checking; returns the previous value.
    pub fn toggle_auto_checking(&mut self) -> bool {
        let previous = self.auto_check;
        self.auto_check = !previous;
        if self.is_playing() {
            if self.auto_check {
                self.check_from_current_position();
            } else {
                self.callbacks.set_status(Status::Blank);
            }
        }
        previous
    }
}
