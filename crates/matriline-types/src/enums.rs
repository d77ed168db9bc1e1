//! Enumeration types for the life simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Tracks
// ---------------------------------------------------------------------------

/// The lifestyle path a subject is on.
///
/// Outlander and Deployed are mutually exclusive for the life of a subject.
/// A subject starts on Baseline and may leave it for exactly one of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Track {
    /// Neither outlander nor deployed.
    Baseline,
    /// Joined the outlanders; deployment is forbidden.
    Outlander,
    /// Has deployed at least once.
    Deployed,
}

/// Selects which child-mortality curve a cohort follows.
///
/// Fixed at birth from the mother's situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum BirthPath {
    /// Born to a baseline mother.
    Baseline,
    /// Born among the outlanders.
    Outlander,
    /// Born to a deployed mother.
    Deployed,
    /// Born into a rat-hunter household.
    RatHunter,
}

/// The two member organizations a subject can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FactionKind {
    /// The clandestine labor organization (outlander track).
    Union,
    /// The counter-trafficking league (gala investigation track).
    League,
}

impl FactionKind {
    /// Dotted-key prefix used for this faction's notifications.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Union => "union",
            Self::League => "league",
        }
    }
}

impl core::fmt::Display for FactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.prefix())
    }
}

// ---------------------------------------------------------------------------
// Gala event panel
// ---------------------------------------------------------------------------

/// Position in the gala event flow.
///
/// `None -> Intro -> (RatHunterChoice | outcome) -> Done`. The flow never
/// moves backwards; once `Done`, the gala cannot be attended again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GalaStage {
    /// The gala has not been attended.
    #[default]
    None,
    /// At the gala; must ignore or investigate.
    Intro,
    /// Ignored the whispers; offered a place among the rat hunters.
    RatHunterChoice,
    /// A terminal outcome has been recorded.
    Done,
}

/// Terminal outcome of the gala flow, recorded once per subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GalaOutcome {
    /// Investigation found leverage over the hosts; unlocks the league.
    You,
    /// Investigation was rebuffed; narrative only.
    Them,
    /// Joined the rat hunters.
    Joined,
    /// Declined the rat hunters.
    Declined,
}

// ---------------------------------------------------------------------------
// Death causes
// ---------------------------------------------------------------------------

/// Every way a subject can die.
///
/// The first group is drawn from the weighted ambient pool; the rest are
/// direct outcomes of actions or faction events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DeathCause {
    // --- Ambient: universal ---
    /// A plain accident.
    Accident,
    /// Hunger in a lean season.
    Starvation,
    /// Killed by a rival house.
    RivalHouse,

    // --- Ambient: husband conflict ---
    /// A quarrel with a husband turned deadly.
    HusbandQuarrel,
    /// A jealous husband struck.
    JealousHusband,

    // --- Ambient: never deployed ---
    /// Fever.
    Fever,
    /// Complications of childbed.
    Childbed,
    /// Raiders on the road.
    Raiders,

    // --- Ambient: veteran ---
    /// Old wounds from deployment.
    OldWounds,
    /// A vendetta from a past deployment.
    Vendetta,
    /// Ambushed by old enemies.
    Ambush,

    // --- Ambient: age gated ---
    /// Old age.
    OldAge,

    // --- Action outcomes ---
    /// Killed by the house of a rejected suitor.
    SuitorHouse,
    /// Killed while deployed.
    KilledDeployed,
    /// Executed for attempting to deploy as an outlander.
    DeserterExecuted,
    /// Betrayed while founding a faction.
    FoundingBetrayed,
    /// Exposed by an informant while recruiting.
    Informant,
    /// Caught stocking a cache or hideout.
    CacheRaided,
    /// Killed during a sabotage or a hunt.
    StrikeKilled,
    /// Uncovered while the faction was in hiding.
    Uncovered,
    /// A safari went wrong.
    SafariAccident,
    /// Killed in the blood sports.
    BloodSport,
    /// Lost a duel.
    DuelLost,
    /// Hunted down for the hunter's notoriety.
    HuntedDown,
}

impl DeathCause {
    /// Stable snake-case name used in notification keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accident => "accident",
            Self::Starvation => "starvation",
            Self::RivalHouse => "rival_house",
            Self::HusbandQuarrel => "husband_quarrel",
            Self::JealousHusband => "jealous_husband",
            Self::Fever => "fever",
            Self::Childbed => "childbed",
            Self::Raiders => "raiders",
            Self::OldWounds => "old_wounds",
            Self::Vendetta => "vendetta",
            Self::Ambush => "ambush",
            Self::OldAge => "old_age",
            Self::SuitorHouse => "suitor_house",
            Self::KilledDeployed => "killed_deployed",
            Self::DeserterExecuted => "deserter_executed",
            Self::FoundingBetrayed => "founding_betrayed",
            Self::Informant => "informant",
            Self::CacheRaided => "cache_raided",
            Self::StrikeKilled => "strike_killed",
            Self::Uncovered => "uncovered",
            Self::SafariAccident => "safari_accident",
            Self::BloodSport => "blood_sport",
            Self::DuelLost => "duel_lost",
            Self::HuntedDown => "hunted_down",
        }
    }
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Every action the subject can take.
///
/// Dispatch goes through an exhaustive `match` in the engine; there is no
/// string-keyed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Action {
    /// Let half a year pass.
    Wait,
    /// Bear a litter.
    Reproduce,
    /// Court another husband.
    AddHusband,
    /// Deploy for a multi-year block.
    Deploy,
    /// Join the outlanders (one way).
    JoinOutlanders,
    /// Found the labor union.
    CreateUnion,
    /// Recruit for the union.
    ExpandUnion,
    /// Build a union cache.
    BuildCache,
    /// Sabotage an employer.
    Sabotage,
    /// Launch the union revolt.
    Revolt,
    /// Found the counter-trafficking league.
    FormLeague,
    /// Recruit for the league.
    ExpandLeague,
    /// Build a league hideout.
    BuildHideout,
    /// Hunt one of the hunters.
    HuntTheHunter,
    /// Launch the league purge.
    EnactPurge,
    /// Attend the gala.
    AttendGala,
    /// Ignore the whispers at the gala.
    GalaIgnore,
    /// Investigate the whispers at the gala.
    GalaInvestigate,
    /// Accept the rat hunters' invitation.
    JoinRatHunters,
    /// Decline the rat hunters' invitation.
    GalaDecline,
    /// Attend a safari.
    AttendSafari,
    /// Attend the blood sports.
    AttendBloodSports,
    /// Challenge someone to a duel.
    StartDuel,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Self; 23] = [
        Self::Wait,
        Self::Reproduce,
        Self::AddHusband,
        Self::Deploy,
        Self::JoinOutlanders,
        Self::CreateUnion,
        Self::ExpandUnion,
        Self::BuildCache,
        Self::Sabotage,
        Self::Revolt,
        Self::FormLeague,
        Self::ExpandLeague,
        Self::BuildHideout,
        Self::HuntTheHunter,
        Self::EnactPurge,
        Self::AttendGala,
        Self::GalaIgnore,
        Self::GalaInvestigate,
        Self::JoinRatHunters,
        Self::GalaDecline,
        Self::AttendSafari,
        Self::AttendBloodSports,
        Self::StartDuel,
    ];

    /// Stable snake-case name of the action.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wait => "wait",
            Self::Reproduce => "reproduce",
            Self::AddHusband => "add_husband",
            Self::Deploy => "deploy",
            Self::JoinOutlanders => "join_outlanders",
            Self::CreateUnion => "create_union",
            Self::ExpandUnion => "expand_union",
            Self::BuildCache => "build_cache",
            Self::Sabotage => "sabotage",
            Self::Revolt => "revolt",
            Self::FormLeague => "form_league",
            Self::ExpandLeague => "expand_league",
            Self::BuildHideout => "build_hideout",
            Self::HuntTheHunter => "hunt_the_hunter",
            Self::EnactPurge => "enact_purge",
            Self::AttendGala => "attend_gala",
            Self::GalaIgnore => "gala_ignore",
            Self::GalaInvestigate => "gala_investigate",
            Self::JoinRatHunters => "join_rat_hunters",
            Self::GalaDecline => "gala_decline",
            Self::AttendSafari => "attend_safari",
            Self::AttendBloodSports => "attend_blood_sports",
            Self::StartDuel => "start_duel",
        }
    }

    /// Look up an action by its snake-case name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }

    /// The faction an action operates on, if any.
    pub const fn faction(self) -> Option<FactionKind> {
        match self {
            Self::CreateUnion
            | Self::ExpandUnion
            | Self::BuildCache
            | Self::Sabotage
            | Self::Revolt => Some(FactionKind::Union),
            Self::FormLeague
            | Self::ExpandLeague
            | Self::BuildHideout
            | Self::HuntTheHunter
            | Self::EnactPurge => Some(FactionKind::League),
            _ => None,
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
        assert_eq!(Action::from_name("fly"), None);
    }

    #[test]
    fn faction_actions_are_split_evenly() {
        let union = Action::ALL
            .iter()
            .filter(|a| a.faction() == Some(FactionKind::Union))
            .count();
        let league = Action::ALL
            .iter()
            .filter(|a| a.faction() == Some(FactionKind::League))
            .count();
        assert_eq!(union, 5);
        assert_eq!(league, 5);
    }

    #[test]
    fn death_cause_serializes_snake_case() {
        let json = serde_json::to_string(&DeathCause::RivalHouse).ok();
        assert_eq!(json.as_deref(), Some("\"rival_house\""));
        assert_eq!(DeathCause::RivalHouse.to_string(), "rival_house");
    }

    #[test]
    fn gala_stage_defaults_to_none() {
        assert_eq!(GalaStage::default(), GalaStage::None);
    }
}
