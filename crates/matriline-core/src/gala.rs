//! Gala event flow.
//!
//! ```text
//! None -> Intro -> RatHunterChoice -> Done (joined | declined)
//!              \-> Done (investigated: you | them)
//! ```
//!
//! Transitions only move forward. Once a terminal outcome is recorded the
//! gala cannot be attended again by the same subject.

use matriline_types::{GalaOutcome, GalaStage};

/// A step the subject can take in the gala flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalaStep {
    /// Attend the gala.
    Attend,
    /// Ignore the whispers.
    Ignore,
    /// Investigate the whispers.
    Investigate,
    /// Accept the rat hunters.
    Join,
    /// Decline the rat hunters.
    Decline,
}

/// Stage reached by taking `step` from `stage`, or `None` if the step is not
/// allowed there.
pub const fn next_stage(
    stage: GalaStage,
    outcome: Option<GalaOutcome>,
    step: GalaStep,
) -> Option<GalaStage> {
    match (stage, step) {
        (GalaStage::None, GalaStep::Attend) if outcome.is_none() => Some(GalaStage::Intro),
        (GalaStage::Intro, GalaStep::Ignore) => Some(GalaStage::RatHunterChoice),
        (GalaStage::Intro, GalaStep::Investigate)
        | (GalaStage::RatHunterChoice, GalaStep::Join | GalaStep::Decline) => {
            Some(GalaStage::Done)
        }
        _ => None,
    }
}

/// Outcome recorded when `step` ends the flow.
///
/// `leverage` is the investigation draw: `true` finds leverage over the
/// hosts, `false` is rebuffed.
pub const fn outcome_of(step: GalaStep, leverage: bool) -> Option<GalaOutcome> {
    match step {
        GalaStep::Investigate if leverage => Some(GalaOutcome::You),
        GalaStep::Investigate => Some(GalaOutcome::Them),
        GalaStep::Join => Some(GalaOutcome::Joined),
        GalaStep::Decline => Some(GalaOutcome::Declined),
        GalaStep::Attend | GalaStep::Ignore => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn investigate_path() {
        let s = next_stage(GalaStage::None, None, GalaStep::Attend);
        assert_eq!(s, Some(GalaStage::Intro));
        let s = next_stage(GalaStage::Intro, None, GalaStep::Investigate);
        assert_eq!(s, Some(GalaStage::Done));
        assert_eq!(outcome_of(GalaStep::Investigate, true), Some(GalaOutcome::You));
        assert_eq!(outcome_of(GalaStep::Investigate, false), Some(GalaOutcome::Them));
    }

    #[test]
    fn ignore_path() {
        let s = next_stage(GalaStage::Intro, None, GalaStep::Ignore);
        assert_eq!(s, Some(GalaStage::RatHunterChoice));
        assert_eq!(
            next_stage(GalaStage::RatHunterChoice, None, GalaStep::Join),
            Some(GalaStage::Done)
        );
        assert_eq!(
            next_stage(GalaStage::RatHunterChoice, None, GalaStep::Decline),
            Some(GalaStage::Done)
        );
    }

    #[test]
    fn no_backwards_or_replay() {
        assert_eq!(next_stage(GalaStage::Done, None, GalaStep::Attend), None);
        assert_eq!(
            next_stage(GalaStage::None, Some(GalaOutcome::Them), GalaStep::Attend),
            None
        );
        assert_eq!(next_stage(GalaStage::None, None, GalaStep::Ignore), None);
        assert_eq!(next_stage(GalaStage::RatHunterChoice, None, GalaStep::Investigate), None);
        assert_eq!(next_stage(GalaStage::Intro, None, GalaStep::Join), None);
    }
}
