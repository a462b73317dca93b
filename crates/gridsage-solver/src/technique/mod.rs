//! The deductive techniques of the hint engine.
//!
//! Each technique implements [`Technique`] and is tried in the fixed order
//! returned by [`all_techniques`]: first the cheapest set-producing
//! deductions, then progressively harder candidate eliminations. The first
//! technique that yields an actionable descriptor wins the round.

use std::fmt::Debug;

use gridsage_core::Grid;

use crate::hint::HintDescriptor;

mod chains;
mod fish;
mod locked;
mod singles;
mod subsets;
mod xy_wing;

pub use self::{
    chains::ForbiddingChain,
    fish::Fish,
    locked::LockedCandidate,
    singles::{HiddenSingle, NakedSingle},
    subsets::Subsets,
    xy_wing::XyWing,
};

/// A deductive technique that can explain one step.
pub trait Technique: Debug {
    /// Returns the name of the technique.
    fn name(&self) -> &'static str;

    /// Searches the working grid for one deduction.
    ///
    /// The grid is the engine's working snapshot: techniques may normalize
    /// it (the naked-single scan strips solved symbols from peer pencils)
    /// but the user's snapshot is never touched.
    fn find(&self, grid: &mut Grid) -> Option<HintDescriptor>;
}

/// A boxed technique.
pub type BoxedTechnique = Box<dyn Technique>;

/// Returns the techniques in engine order, easiest first.
#[must_use]
pub fn all_techniques() -> Vec<BoxedTechnique> {
    vec![
        Box::new(NakedSingle::new()),
        Box::new(HiddenSingle::new()),
        Box::new(LockedCandidate::new()),
        Box::new(Subsets::new()),
        Box::new(Fish::new()),
        Box::new(XyWing::new()),
        Box::new(ForbiddingChain::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_order_is_fixed() {
        // Set-producing singles outrank every candidate-removal technique,
        // which keeps the hint precedence contract intact.
        let names: Vec<&str> = all_techniques().iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            [
                "naked single",
                "hidden single",
                "locked candidate",
                "naked and hidden subsets",
                "fish",
                "xy-wing",
                "forbidding chain",
            ]
        );
    }
}
