use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

use super::constants::{
    DEFAULT_CARD_COUNT, DEFAULT_CARD_TIME_SECS, DEFAULT_MAX_SKIPS_PER_TEAM,
    DEFAULT_TEAM_TIME_SECS,
};

/// Player identifiers as handed out by the host's player store.
/// Synthesized placeholder players use negative ids.
pub type PlayerId = i64;

/// Signed point delta of a single card. Always one of -1, 0 or 1.
pub type Points = i8;

/// A single prompt card. Cards are never mutated once dealt.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Card {
    pub text: String,
}

impl Card {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.text.fmt(f)
    }
}

/// Outcome of one resolved card.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CardResult {
    pub card_text: String,
    pub points: Points,
    /// Player responsible for the card, if any.
    pub player_id: Option<PlayerId>,
}

impl CardResult {
    pub fn new(card: &Card, points: Points, player_id: Option<PlayerId>) -> Self {
        Self {
            card_text: card.text.clone(),
            points,
            player_id,
        }
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.points > 0
    }
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Team {
    Red,
    Blue,
    /// No winner (draw), or not a team game.
    None,
}

impl Team {
    /// The opposing team. `None` has no opponent.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
            Self::None => Self::None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::None => "none",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    Standard,
    ThreeLives,
    HotPotato,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Standard => "standard",
            Self::ThreeLives => "three-lives",
            Self::HotPotato => "hot-potato",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "standard" => Ok(Self::Standard),
            "three-lives" | "threelives" | "3-lives" => Ok(Self::ThreeLives),
            "hot-potato" | "hotpotato" => Ok(Self::HotPotato),
            other => Err(format!("unknown game mode '{other}'")),
        }
    }
}

/// How a card in play was resolved.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Answer {
    Correct,
    Skip,
    TimeUp,
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Correct => "correct",
            Self::Skip => "skip",
            Self::TimeUp => "time up",
        };
        write!(f, "{repr}")
    }
}

/// Per-game rules chosen by the players before a session.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    /// Running out of time costs a point.
    pub time_up_penalty: bool,
    /// Skipping (giving up on) a card costs a point.
    pub give_up_penalty: bool,
    pub card_time_secs: u32,
    /// Cards dealt in Standard mode.
    pub card_count: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            time_up_penalty: true,
            give_up_penalty: false,
            card_time_secs: DEFAULT_CARD_TIME_SECS,
            card_count: DEFAULT_CARD_COUNT,
        }
    }
}

impl GameSettings {
    #[must_use]
    pub fn card_time(&self) -> Duration {
        Duration::from_secs(u64::from(self.card_time_secs))
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HotPotatoSettings {
    pub team_time_secs: u32,
    pub max_skips_per_team: u32,
}

impl Default for HotPotatoSettings {
    fn default() -> Self {
        Self {
            team_time_secs: DEFAULT_TEAM_TIME_SECS,
            max_skips_per_team: DEFAULT_MAX_SKIPS_PER_TEAM,
        }
    }
}

impl HotPotatoSettings {
    #[must_use]
    pub fn team_time(&self) -> Duration {
        Duration::from_secs(u64::from(self.team_time_secs))
    }
}

/// Final tally of a Hot Potato game.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TeamScores {
    pub red: u32,
    pub blue: u32,
    pub winner: Team,
}

/// Everything a finished session hands back to its host.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameOutcome {
    pub results: Vec<CardResult>,
    /// Only present for Hot Potato.
    pub team_scores: Option<TeamScores>,
}

impl GameOutcome {
    #[must_use]
    pub fn total_points(&self) -> i32 {
        self.results.iter().map(|r| i32::from(r.points)).sum()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_correct()).count()
    }
}
