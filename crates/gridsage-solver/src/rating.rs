//! Difficulty rating by replaying the hint engine.

use gridsage_core::Grid;
use log::debug;

use crate::hint::{self, HintKind};

/// Difficulty tier of a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Difficulty {
    /// Solvable with naked and hidden singles only.
    Easy,
    /// Requires locked candidates or naked subsets.
    Simple,
    /// Requires hidden subsets.
    Moderate,
    /// Requires fish, XY-wings or chains, or defeats the hint engine.
    Difficult,
}

fn tier(kind: HintKind) -> Difficulty {
    match kind {
        HintKind::NakedSingle | HintKind::HiddenSingle => Difficulty::Easy,
        HintKind::LockedCandidate | HintKind::NakedSubset => Difficulty::Simple,
        HintKind::HiddenSubset => Difficulty::Moderate,
        HintKind::XWing
        | HintKind::Swordfish
        | HintKind::Jellyfish
        | HintKind::XyWing
        | HintKind::ForbiddingChain => Difficulty::Difficult,
    }
}

/// Replays the puzzle with the hint engine alone and classifies it by the
/// hardest technique used.
///
/// The caller's grid is untouched: the replay runs on a private working
/// copy with every empty cell penciled. A puzzle the engine cannot finish
/// is rated [`Difficulty::Difficult`], the engine's reasoning being the
/// yardstick.
#[must_use]
pub fn evaluate_level(grid: &Grid) -> Difficulty {
    let mut working = grid.clone();
    working.fill_all(false);

    let mut hardest = Difficulty::Easy;
    let mut steps = 0usize;
    while !working.is_solved() {
        let Some(descriptor) = hint::run_techniques(&mut working) else {
            debug!("hint engine stuck after {steps} steps");
            return Difficulty::Difficult;
        };
        hardest = hardest.max(tier(descriptor.kind));
        hint::apply_hint(&mut working, &descriptor);
        steps += 1;
    }
    debug!("rated {hardest:?} after {steps} hint steps");
    hardest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(Difficulty::Easy < Difficulty::Simple);
        assert!(Difficulty::Simple < Difficulty::Moderate);
        assert!(Difficulty::Moderate < Difficulty::Difficult);
    }

    #[test]
    fn test_singles_only_puzzle_is_easy() {
        let grid: Grid = "
            53. .7. ...
            6.. 195 ...
            .98 ... .6.
            8.. .6. ..3
            4.. 8.3 ..1
            7.. .2. ..6
            .6. ... 28.
            ... 419 ..5
            ... .8. .79
        "
        .parse()
        .unwrap();
        assert_eq!(evaluate_level(&grid), Difficulty::Easy);
    }

    #[test]
    fn test_solved_grid_is_easy() {
        let grid: Grid =
            "534678912672195348198342567859761423426853791713924856961537284287419635345286179"
                .parse()
                .unwrap();
        assert_eq!(evaluate_level(&grid), Difficulty::Easy);
    }

    #[test]
    fn test_unsolvable_for_the_engine_is_difficult() {
        // An empty grid gives the techniques nothing to deduce.
        let grid = Grid::new();
        assert_eq!(evaluate_level(&grid), Difficulty::Difficult);
    }

    #[test]
    fn test_kind_tiers() {
        assert_eq!(tier(HintKind::NakedSingle), Difficulty::Easy);
        assert_eq!(tier(HintKind::LockedCandidate), Difficulty::Simple);
        assert_eq!(tier(HintKind::NakedSubset), Difficulty::Simple);
        assert_eq!(tier(HintKind::HiddenSubset), Difficulty::Moderate);
        assert_eq!(tier(HintKind::XWing), Difficulty::Difficult);
        assert_eq!(tier(HintKind::ForbiddingChain), Difficulty::Difficult);
    }
}
