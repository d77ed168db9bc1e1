//! Semantic notification keys and the notifications built from them.
//!
//! The engine never renders prose on its own. It emits an [`EventKey`] plus
//! parameters; the text comes from an external lookup, or from the key's
//! fallback template when the lookup has nothing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DeathCause, FactionKind};

/// Things that happen to a faction, shared by both faction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FactionEvent {
    /// The faction was founded.
    Founded,
    /// An explicit recruitment drive.
    Expanded,
    /// A cache or hideout was built.
    CacheBuilt,
    /// A sabotage or hunt succeeded.
    Strike,
    /// The revolt or purge succeeded.
    UprisingWon,
    /// The revolt or purge failed.
    UprisingFailed,
    /// Membership was cut down to what the caches could save.
    Purged,
    /// The faction went into hiding.
    Hiding,
    /// The faction came out of hiding.
    Resurfaced,
    /// Membership reached the capacity ceiling.
    FullyOrganized,
}

impl FactionEvent {
    /// Stable snake-case name used in notification keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Founded => "founded",
            Self::Expanded => "expanded",
            Self::CacheBuilt => "cache_built",
            Self::Strike => "strike",
            Self::UprisingWon => "uprising_won",
            Self::UprisingFailed => "uprising_failed",
            Self::Purged => "purged",
            Self::Hiding => "hiding",
            Self::Resurfaced => "resurfaced",
            Self::FullyOrganized => "fully_organized",
        }
    }
}

/// Semantic key of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EventKey {
    /// A new subject begins at the starting age.
    LifeBegun,
    /// Default flavor for an uneventful half year.
    TickPassed,
    /// Flavor for the tick that ends a hiding time-skip.
    EmergedFromHiding,
    /// Flavor for the tick that ends a deployment block.
    ReturnedHome,
    /// Reproduction refused for lack of a husband.
    NeedHusband,
    /// A litter was born.
    Litter,
    /// A suitor accepted.
    HusbandAccepted,
    /// A suitor declined.
    HusbandRejected,
    /// A suitor declined out of fear of the subject's infamy.
    HusbandFeared,
    /// Husbands left after their union ran its course.
    HusbandsAgedOut,
    /// One husband killed another out of jealousy.
    HusbandSlain,
    /// Prestige reached one half.
    PrestigeHalf,
    /// Prestige reached one.
    PrestigeFull,
    /// Survived a deployment.
    DeploySurvived,
    /// First deployment survived; the subject is proven.
    Proven,
    /// Joined the outlanders.
    JoinedOutlanders,
    /// Deaths among a cohort during one year.
    CohortDeaths,
    /// A cohort came of age and its daughters deployed.
    CohortDeployed,
    /// A faction event.
    Faction(FactionKind, FactionEvent),
    /// The session gained a modifier stack.
    ModifierGained,
    /// Arrived at the gala.
    GalaIntro,
    /// Ignored the whispers.
    GalaIgnored,
    /// Investigation found leverage.
    GalaLeverage,
    /// Investigation was rebuffed.
    GalaRebuffed,
    /// Joined the rat hunters.
    RatHuntersJoined,
    /// Declined the rat hunters.
    RatHuntersDeclined,
    /// Returned from a safari.
    Safari,
    /// Survived the blood sports.
    BloodSports,
    /// Won a duel.
    DuelWon,
    /// The subject died.
    Death(DeathCause),
}

impl EventKey {
    /// Dotted lookup key, e.g. `reproduce.litter` or `union.founded`.
    pub fn key(self) -> String {
        match self {
            Self::Faction(kind, event) => format!("{}.{}", kind.prefix(), event.as_str()),
            Self::Death(cause) => format!("death.{}", cause.as_str()),
            other => other.simple_key().to_owned(),
        }
    }

    const fn simple_key(self) -> &'static str {
        match self {
            Self::LifeBegun => "life.begin",
            Self::TickPassed => "tick.pass",
            Self::EmergedFromHiding => "tick.emerged",
            Self::ReturnedHome => "tick.returned",
            Self::NeedHusband => "reproduce.need_husband",
            Self::Litter => "reproduce.litter",
            Self::HusbandAccepted => "husband.accepted",
            Self::HusbandRejected => "husband.rejected",
            Self::HusbandFeared => "husband.feared",
            Self::HusbandsAgedOut => "husband.aged_out",
            Self::HusbandSlain => "husband.slain",
            Self::PrestigeHalf => "prestige.half",
            Self::PrestigeFull => "prestige.full",
            Self::DeploySurvived => "deploy.survived",
            Self::Proven => "deploy.proven",
            Self::JoinedOutlanders => "outlander.joined",
            Self::CohortDeaths => "cohort.deaths",
            Self::CohortDeployed => "cohort.deployed",
            Self::ModifierGained => "session.modifier",
            Self::GalaIntro => "gala.intro",
            Self::GalaIgnored => "gala.ignore",
            Self::GalaLeverage => "gala.outcome_you",
            Self::GalaRebuffed => "gala.outcome_them",
            Self::RatHuntersJoined => "gala.joined",
            Self::RatHuntersDeclined => "gala.declined",
            Self::Safari => "hunter.safari",
            Self::BloodSports => "hunter.blood_sports",
            Self::DuelWon => "duel.won",
            Self::Faction(..) => "faction",
            Self::Death(..) => "death",
        }
    }

    /// Deterministic fallback template (minijinja syntax) for this key.
    pub fn fallback(self) -> String {
        match self {
            Self::Faction(kind, event) => faction_fallback(kind, event),
            Self::Death(cause) => ["You die. ", death_phrase(cause)].concat(),
            other => other.simple_fallback().to_owned(),
        }
    }

    const fn simple_fallback(self) -> &'static str {
        match self {
            Self::LifeBegun => "A new life begins at {{ age }}.",
            Self::TickPassed => "Half a year passes.",
            Self::EmergedFromHiding => "You come out of hiding.",
            Self::ReturnedHome => "You return home from deployment.",
            Self::NeedHusband => "You need a husband first.",
            Self::Litter => {
                "You bear a litter of {{ count }} ({{ daughters }} daughters); {{ survivors }} survive infancy."
            }
            Self::HusbandAccepted => "A suitor accepts. You now have {{ total }} husbands.",
            Self::HusbandRejected => "The suitor declines.",
            Self::HusbandFeared => "The suitor flees from your reputation.",
            Self::HusbandsAgedOut => "{{ count }} husbands leave as their unions run their course.",
            Self::HusbandSlain => "A jealous husband kills another.",
            Self::PrestigeHalf => "Half of your daughters have proven themselves.",
            Self::PrestigeFull => "Every one of your daughters has proven herself.",
            Self::DeploySurvived => "You survive deployment number {{ deployments }}.",
            Self::Proven => "You are proven.",
            Self::JoinedOutlanders => "You join the outlanders.",
            Self::CohortDeaths => "{{ count }} of your young die in their year {{ year }}.",
            Self::CohortDeployed => {
                "{{ deployed }} daughters deploy from a grown litter; {{ survived }} come back proven."
            }
            Self::ModifierGained => "The world shifts. Advantage now stands at {{ stacks }}.",
            Self::GalaIntro => "You attend the gala. Something is whispered in the corridors.",
            Self::GalaIgnored => "You ignore the whispers. The hosts take notice of you.",
            Self::GalaLeverage => "Your investigation uncovers the trade. You hold the leverage now.",
            Self::GalaRebuffed => "Your investigation is rebuffed. Nothing comes of it.",
            Self::RatHuntersJoined => "You join the rat hunters.",
            Self::RatHuntersDeclined => "You decline the rat hunters.",
            Self::Safari => "You return from the safari.",
            Self::BloodSports => "You survive the blood sports.",
            Self::DuelWon => "You win the duel. Duels won: {{ wins }}.",
            Self::Faction(..) | Self::Death(..) => "",
        }
    }

    /// Whether this notification belongs in an archived life summary.
    pub const fn is_notable(self) -> bool {
        match self {
            Self::Proven
            | Self::PrestigeHalf
            | Self::PrestigeFull
            | Self::JoinedOutlanders
            | Self::ModifierGained
            | Self::GalaLeverage
            | Self::RatHuntersJoined
            | Self::Death(_) => true,
            Self::Faction(_, event) => matches!(
                event,
                FactionEvent::Founded
                    | FactionEvent::UprisingWon
                    | FactionEvent::UprisingFailed
                    | FactionEvent::FullyOrganized
            ),
            _ => false,
        }
    }
}

impl core::fmt::Display for EventKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.key())
    }
}

fn faction_fallback(kind: FactionKind, event: FactionEvent) -> String {
    let name = kind.prefix();
    let store = match kind {
        FactionKind::Union => "cache",
        FactionKind::League => "hideout",
    };
    match event {
        FactionEvent::Founded => ["You found the ", name, "."].concat(),
        FactionEvent::Expanded => {
            ["The ", name, " recruits {{ count }}; it now counts {{ size }}."].concat()
        }
        FactionEvent::CacheBuilt => ["You build a ", store, ". Total: {{ caches }}."].concat(),
        FactionEvent::Strike => ["The ", name, " strikes. Word spreads."].concat(),
        FactionEvent::UprisingWon => ["The ", name, " rises and wins."].concat(),
        FactionEvent::UprisingFailed => ["The ", name, " rises and is crushed."].concat(),
        FactionEvent::Purged => {
            ["The ", name, " is purged. {{ size }} survive in the ", store, "s."].concat()
        }
        FactionEvent::Hiding => ["The ", name, " goes into hiding."].concat(),
        FactionEvent::Resurfaced => ["The ", name, " resurfaces."].concat(),
        FactionEvent::FullyOrganized => ["The ", name, " is fully organized."].concat(),
    }
}

const fn death_phrase(cause: DeathCause) -> &'static str {
    match cause {
        DeathCause::Accident => "An accident.",
        DeathCause::Starvation => "A lean season starves you.",
        DeathCause::RivalHouse => "A rival house has you killed.",
        DeathCause::HusbandQuarrel => "A quarrel with a husband ends badly.",
        DeathCause::JealousHusband => "A jealous husband kills you.",
        DeathCause::Fever => "Fever takes you.",
        DeathCause::Childbed => "Childbed takes you.",
        DeathCause::Raiders => "Raiders catch you on the road.",
        DeathCause::OldWounds => "Old wounds finally claim you.",
        DeathCause::Vendetta => "A vendetta from your deployments catches up.",
        DeathCause::Ambush => "Old enemies ambush you.",
        DeathCause::OldAge => "You die of old age.",
        DeathCause::SuitorHouse => "The rejected suitor's house kills you.",
        DeathCause::KilledDeployed => "You are killed on deployment.",
        DeathCause::DeserterExecuted => "Outlanders may not deploy. You are executed.",
        DeathCause::FoundingBetrayed => "You are betrayed at the founding.",
        DeathCause::Informant => "An informant among the recruits gives you up.",
        DeathCause::CacheRaided => "You are caught stocking the cache.",
        DeathCause::StrikeKilled => "You are killed in the strike.",
        DeathCause::Uncovered => "You are uncovered in hiding.",
        DeathCause::SafariAccident => "The safari goes wrong.",
        DeathCause::BloodSport => "The blood sports claim you.",
        DeathCause::DuelLost => "You lose the duel.",
        DeathCause::HuntedDown => "You are hunted down.",
    }
}

/// One rendered notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Notification {
    /// Semantic key.
    pub key: EventKey,
    /// Rendered text (from the lookup or the fallback template).
    pub text: String,
    /// Subject age when the notification was emitted.
    pub age: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_keys() {
        assert_eq!(EventKey::Litter.key(), "reproduce.litter");
        assert_eq!(
            EventKey::Faction(FactionKind::League, FactionEvent::UprisingWon).key(),
            "league.uprising_won"
        );
        assert_eq!(EventKey::Death(DeathCause::OldAge).key(), "death.old_age");
    }

    #[test]
    fn every_simple_key_has_a_fallback() {
        let keys = [
            EventKey::LifeBegun,
            EventKey::TickPassed,
            EventKey::NeedHusband,
            EventKey::Litter,
            EventKey::DuelWon,
            EventKey::GalaIntro,
        ];
        for key in keys {
            assert!(!key.fallback().is_empty(), "{key} has no fallback");
        }
    }

    #[test]
    fn faction_fallback_names_the_faction() {
        let text = EventKey::Faction(FactionKind::Union, FactionEvent::CacheBuilt).fallback();
        assert!(text.contains("cache"));
        let text = EventKey::Faction(FactionKind::League, FactionEvent::CacheBuilt).fallback();
        assert!(text.contains("hideout"));
    }

    #[test]
    fn notable_keys() {
        assert!(EventKey::Death(DeathCause::Accident).is_notable());
        assert!(EventKey::Faction(FactionKind::Union, FactionEvent::Founded).is_notable());
        assert!(!EventKey::Faction(FactionKind::Union, FactionEvent::Expanded).is_notable());
        assert!(!EventKey::TickPassed.is_notable());
    }
}
