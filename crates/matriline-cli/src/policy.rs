//! Decision policies that pick the next action for a subject.
//!
//! A [`DecisionPolicy`] sees the subject and the actions currently allowed
//! and returns one of them. [`ScriptedPolicy`] walks a priority list and
//! takes the first allowed action whose guard holds, falling back to
//! [`Action::Wait`].

use matriline_types::{Action, SubjectState};

/// A source of decisions for one subject.
pub trait DecisionPolicy {
    /// Choose the next action from `available`.
    ///
    /// Implementations should return an action from `available`; anything
    /// else is silently ignored by the engine and costs the subject nothing.
    fn decide(&mut self, subject: &SubjectState, available: &[Action]) -> Action;
}

/// One entry of a priority list.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// The action this rule proposes.
    pub action: Action,
    /// Extra condition on top of the engine's own precondition.
    pub guard: fn(&SubjectState) -> bool,
}

impl Rule {
    /// A rule with no extra condition.
    pub const fn always(action: Action) -> Self {
        Self {
            action,
            guard: unconditional,
        }
    }

    /// A rule that applies only when `guard` holds.
    pub const fn when(action: Action, guard: fn(&SubjectState) -> bool) -> Self {
        Self { action, guard }
    }
}

const fn unconditional(_: &SubjectState) -> bool {
    true
}

/// Picks the first allowed action from a fixed priority list.
#[derive(Debug, Clone)]
pub struct ScriptedPolicy {
    name: &'static str,
    rules: Vec<Rule>,
}

impl ScriptedPolicy {
    /// Policy with the given priority list.
    pub const fn new(name: &'static str, rules: Vec<Rule>) -> Self {
        Self { name, rules }
    }

    /// Policy name, for logging.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Family and service: marry, raise daughters, deploy twice, and take
    /// the gala route to the league when it opens.
    pub fn household() -> Self {
        Self::new(
            "household",
            vec![
                Rule::always(Action::EnactPurge),
                Rule::when(Action::AttendGala, |s| s.age >= 20.0),
                Rule::always(Action::GalaInvestigate),
                Rule::always(Action::GalaDecline),
                Rule::always(Action::FormLeague),
                Rule::when(Action::BuildHideout, |s| s.league.caches < 4),
                Rule::always(Action::ExpandLeague),
                Rule::when(Action::AddHusband, |s| s.husband_count() < 3),
                Rule::when(Action::Deploy, |s| !s.outlander && s.deployments < 2),
                Rule::when(Action::Reproduce, |s| s.age < 45.0),
            ],
        )
    }

    /// Outlander agitator: leave society, build the union and revolt.
    pub fn agitator() -> Self {
        Self::new(
            "agitator",
            vec![
                Rule::always(Action::JoinOutlanders),
                Rule::always(Action::CreateUnion),
                Rule::always(Action::Revolt),
                Rule::when(Action::BuildCache, |s| s.union.caches < 6),
                Rule::when(Action::Sabotage, |s| s.infamy < 40),
                Rule::always(Action::ExpandUnion),
                Rule::when(Action::AddHusband, |s| s.husband_count() < 2),
                Rule::when(Action::Reproduce, |s| s.age < 40.0),
            ],
        )
    }

    /// Rat hunter: take the gala's other door and work the hunts.
    pub fn hunter() -> Self {
        Self::new(
            "hunter",
            vec![
                Rule::always(Action::AttendGala),
                Rule::always(Action::GalaIgnore),
                Rule::always(Action::JoinRatHunters),
                Rule::when(Action::AttendSafari, |s| s.hunter_notoriety < 10),
                Rule::when(Action::AddHusband, |s| s.husband_count() < 2),
                Rule::when(Action::Reproduce, |s| s.age < 40.0),
            ],
        )
    }

    /// The policy used for the `life_number`-th life of a session.
    pub fn for_life(life_number: u32) -> Self {
        match life_number % 3 {
            1 => Self::household(),
            2 => Self::agitator(),
            _ => Self::hunter(),
        }
    }
}

impl DecisionPolicy for ScriptedPolicy {
    fn decide(&mut self, subject: &SubjectState, available: &[Action]) -> Action {
        self.rules
            .iter()
            .find(|rule| available.contains(&rule.action) && (rule.guard)(subject))
            .map_or(Action::Wait, |rule| rule.action)
    }
}

#[cfg(test)]
mod tests {
    use matriline_core::EngineConfig;
    use matriline_core::subject::fresh_subject;

    use super::*;

    fn subject() -> SubjectState {
        fresh_subject(&EngineConfig::default(), 1)
    }

    #[test]
    fn first_allowed_rule_wins() {
        let mut policy = ScriptedPolicy::agitator();
        let s = subject();
        let available = [Action::Wait, Action::AddHusband, Action::JoinOutlanders];
        assert_eq!(policy.decide(&s, &available), Action::JoinOutlanders);
    }

    #[test]
    fn guards_skip_rules() {
        let mut policy = ScriptedPolicy::household();
        let mut s = subject();
        s.deployments = 2;
        s.age = 50.0;
        let available = [Action::Wait, Action::Deploy, Action::Reproduce];
        assert_eq!(policy.decide(&s, &available), Action::Wait);
    }

    #[test]
    fn falls_back_to_waiting() {
        let mut policy = ScriptedPolicy::hunter();
        assert_eq!(policy.decide(&subject(), &[]), Action::Wait);
    }

    #[test]
    fn policies_rotate_by_life() {
        assert_eq!(ScriptedPolicy::for_life(1).name(), "household");
        assert_eq!(ScriptedPolicy::for_life(2).name(), "agitator");
        assert_eq!(ScriptedPolicy::for_life(3).name(), "hunter");
        assert_eq!(ScriptedPolicy::for_life(4).name(), "household");
    }
}
