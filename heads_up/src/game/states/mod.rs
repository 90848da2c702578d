//! UI-facing snapshots of each session phase.
//!
//! Hosts render these; they never feed back into the engine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::game::entities::{Card, GameOutcome, Player, Team};

/// Per-team figures shown while a Hot Potato card is in play.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TeamClocks {
    pub current_team: Team,
    pub current_player: Player,
    pub red_time_left: Duration,
    pub blue_time_left: Duration,
    pub red_skips_left: u32,
    pub blue_skips_left: u32,
}

/// A card is in play and its timer is running.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayingView {
    pub card: Card,
    pub time_left: Duration,
    pub total_time: Duration,
    /// Three Lives only.
    pub lives_remaining: Option<u32>,
    /// Hot Potato only.
    pub teams: Option<TeamClocks>,
}

/// The device is being handed to the next Hot Potato player.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PassingView {
    /// The card that was just resolved.
    pub card: Card,
    pub next_team: Team,
    pub next_player_name: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GameView {
    /// Waiting for the host to deal cards.
    Loading,
    /// Cards are dealt, waiting for the first card to be shown.
    Ready,
    Playing(PlayingView),
    PassingPhone(PassingView),
    Finished(GameOutcome),
}

impl GameView {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Playing(_) => "playing",
            Self::PassingPhone(_) => "passing phone",
            Self::Finished(_) => "finished",
        }
    }
}
